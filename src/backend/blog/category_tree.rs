/**
 * Category Tree
 *
 * Categories are stored as adjacency rows (`parent_id`). This module loads
 * them into an arena keyed by id, with children kept in display order
 * (title, then id), and answers the tree questions the handlers need:
 * level, ancestors, descendants, pre-order listing and cycle checks.
 *
 * All traversals are iterative. A row whose parent is missing from the
 * arena is treated as a root.
 */

use std::collections::{HashMap, HashSet};

use crate::backend::blog::categories::Category;

#[derive(Debug, Clone)]
struct Node {
    category: Category,
    children: Vec<i64>,
}

/// In-memory category hierarchy
#[derive(Debug, Clone, Default)]
pub struct CategoryTree {
    nodes: HashMap<i64, Node>,
    roots: Vec<i64>,
}

impl CategoryTree {
    pub fn new(categories: Vec<Category>) -> Self {
        let mut nodes: HashMap<i64, Node> = categories
            .into_iter()
            .map(|category| {
                (
                    category.id,
                    Node {
                        category,
                        children: Vec::new(),
                    },
                )
            })
            .collect();

        let mut roots = Vec::new();
        let mut links = Vec::new();
        for node in nodes.values() {
            match node.category.parent_id {
                Some(parent) if parent != node.category.id && nodes.contains_key(&parent) => {
                    links.push((parent, node.category.id))
                }
                _ => roots.push(node.category.id),
            }
        }
        for (parent, child) in links {
            if let Some(node) = nodes.get_mut(&parent) {
                node.children.push(child);
            }
        }

        let sort_key = |nodes: &HashMap<i64, Node>, id: &i64| {
            nodes
                .get(id)
                .map(|node| (node.category.title.clone(), *id))
                .unwrap_or_default()
        };
        roots.sort_by_key(|id| sort_key(&nodes, id));
        let ids: Vec<i64> = nodes.keys().copied().collect();
        for id in ids {
            let mut children = nodes.get(&id).map(|n| n.children.clone()).unwrap_or_default();
            children.sort_by_key(|child| sort_key(&nodes, child));
            if let Some(node) = nodes.get_mut(&id) {
                node.children = children;
            }
        }

        Self { nodes, roots }
    }

    pub fn get(&self, id: i64) -> Option<&Category> {
        self.nodes.get(&id).map(|node| &node.category)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Ancestors of `id`, root first
    pub fn ancestors(&self, id: i64) -> Vec<&Category> {
        let mut chain = Vec::new();
        let mut seen = HashSet::from([id]);
        let mut current = self.nodes.get(&id).and_then(|node| node.category.parent_id);

        while let Some(parent_id) = current {
            if !seen.insert(parent_id) {
                break;
            }
            let Some(parent) = self.nodes.get(&parent_id) else {
                break;
            };
            chain.push(&parent.category);
            current = parent.category.parent_id;
        }

        chain.reverse();
        chain
    }

    /// Depth below the root; roots are level 0
    pub fn level(&self, id: i64) -> usize {
        self.ancestors(id).len()
    }

    /// Descendants of `id` in pre-order, excluding `id`
    pub fn descendants(&self, id: i64) -> Vec<&Category> {
        let mut out = Vec::new();
        let Some(node) = self.nodes.get(&id) else {
            return out;
        };

        let mut stack: Vec<i64> = node.children.iter().rev().copied().collect();
        let mut seen = HashSet::from([id]);
        while let Some(next) = stack.pop() {
            if !seen.insert(next) {
                continue;
            }
            if let Some(node) = self.nodes.get(&next) {
                out.push(&node.category);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// `id` and all its descendants
    pub fn subtree_ids(&self, id: i64) -> Vec<i64> {
        let mut ids = vec![id];
        ids.extend(self.descendants(id).into_iter().map(|category| category.id));
        ids
    }

    /// Every category in pre-order with its level
    pub fn walk(&self) -> Vec<(&Category, usize)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(i64, usize)> = self.roots.iter().rev().map(|id| (*id, 0)).collect();
        let mut seen = HashSet::new();

        while let Some((id, level)) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            if let Some(node) = self.nodes.get(&id) {
                out.push((&node.category, level));
                stack.extend(node.children.iter().rev().map(|child| (*child, level + 1)));
            }
        }
        out
    }

    /// Whether making `new_parent` the parent of `id` would form a cycle
    pub fn would_cycle(&self, id: i64, new_parent: i64) -> bool {
        new_parent == id || self.descendants(id).iter().any(|category| category.id == new_parent)
    }
}
