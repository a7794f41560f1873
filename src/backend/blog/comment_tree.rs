//! Comment reply threads
//!
//! `ReplyIndex` groups a blog's comments by parent. `thread` materializes
//! the reply subtree under one comment breadth-first, stopping at a depth
//! cap, then assembles the nodes bottom-up so no recursion is needed.
//! Replies are ordered newest first.

use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};

use crate::backend::blog::comments::Comment;

/// A comment with its materialized replies
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentNode {
    #[serde(flatten)]
    pub comment: Comment,
    pub replies: Vec<CommentNode>,
    /// Set when this node has replies that were cut by the depth cap
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub replies_truncated: bool,
}

impl CommentNode {
    pub fn leaf(comment: Comment) -> Self {
        Self {
            comment,
            replies: Vec::new(),
            replies_truncated: false,
        }
    }
}

/// Comments indexed by parent
#[derive(Debug, Default)]
pub struct ReplyIndex {
    comments: HashMap<i64, Comment>,
    children: HashMap<i64, Vec<i64>>,
}

impl ReplyIndex {
    pub fn new(comments: impl IntoIterator<Item = Comment>) -> Self {
        let mut index = Self::default();
        for comment in comments {
            if let Some(parent) = comment.parent_comment_id {
                index.children.entry(parent).or_default().push(comment.id);
            }
            index.comments.insert(comment.id, comment);
        }
        for replies in index.children.values_mut() {
            replies.sort_unstable_by(|a, b| b.cmp(a));
        }
        index
    }

    fn replies_of(&self, id: i64) -> &[i64] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Reply subtree under `root`, at most `max_depth` levels deep
    pub fn thread(&self, root: &Comment, max_depth: usize) -> CommentNode {
        // breadth-first discovery
        let mut order = vec![root.id];
        let mut truncated = HashSet::new();
        let mut seen = HashSet::from([root.id]);
        let mut queue = VecDeque::from([(root.id, 0usize)]);

        while let Some((id, depth)) = queue.pop_front() {
            let replies = self.replies_of(id);
            if replies.is_empty() {
                continue;
            }
            if depth >= max_depth {
                truncated.insert(id);
                continue;
            }
            for reply in replies {
                if seen.insert(*reply) {
                    order.push(*reply);
                    queue.push_back((*reply, depth + 1));
                }
            }
        }

        // children are always discovered after their parent, so assembling
        // in reverse order finishes every child before its parent
        let mut built: HashMap<i64, CommentNode> = HashMap::with_capacity(order.len());
        for id in order.into_iter().rev() {
            let comment = if id == root.id {
                root.clone()
            } else {
                match self.comments.get(&id) {
                    Some(comment) => comment.clone(),
                    None => continue,
                }
            };
            let replies = self
                .replies_of(id)
                .iter()
                .filter_map(|reply| built.remove(reply))
                .collect();
            built.insert(
                id,
                CommentNode {
                    comment,
                    replies,
                    replies_truncated: truncated.contains(&id),
                },
            );
        }

        built
            .remove(&root.id)
            .unwrap_or_else(|| CommentNode::leaf(root.clone()))
    }
}
