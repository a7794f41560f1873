/**
 * Blog Handler Types
 *
 * Request, query and response types for the `/blog` endpoints. Update
 * requests are partial: absent fields keep their value. Nullable fields use
 * `deserialize_some` so an explicit `null` clears the value.
 */

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::backend::auth::handlers::types::deserialize_some;
use crate::backend::blog::blogs::Blog;
use crate::backend::blog::categories::Category;

/// Blog as returned by the API
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BlogResponse {
    pub id: i64,
    pub title: String,
    pub main_image: String,
    pub description: String,
    pub author: i64,
    pub category: Option<i64>,
    pub tags: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub active: bool,
}

impl BlogResponse {
    pub fn new(blog: Blog, tags: Vec<i64>) -> Self {
        Self {
            id: blog.id,
            title: blog.title,
            main_image: blog.main_image,
            description: blog.description,
            author: blog.author_id,
            category: blog.category_id,
            tags,
            created_at: blog.created_at,
            updated_at: blog.updated_at,
            active: blog.active,
        }
    }
}

/// Blog creation request
#[derive(Deserialize, Serialize, Debug)]
pub struct CreateBlogRequest {
    pub title: String,
    #[serde(default)]
    pub main_image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Option<i64>,
    #[serde(default)]
    pub tags: Vec<i64>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Partial blog update
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    pub main_image: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub category: Option<Option<i64>>,
    /// Replaces the whole tag set when present
    pub tags: Option<Vec<i64>>,
    pub active: Option<bool>,
}

/// `GET /blog/blogs` query string
#[derive(Deserialize, Debug, Default)]
pub struct BlogListQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub author: Option<i64>,
    pub category: Option<i64>,
    /// Only blogs carrying this tag
    pub tags: Option<i64>,
    pub active: Option<bool>,
    /// Whitespace-separated terms, all of which must match
    pub search: Option<String>,
    /// Inclusive day range; applied only when both ends are given
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// `GET /blog/comments` query string
#[derive(Deserialize, Debug, Default)]
pub struct CommentListQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub blog: Option<i64>,
}

/// Comment creation request
#[derive(Deserialize, Serialize, Debug)]
pub struct CreateCommentRequest {
    pub blog: i64,
    pub content: String,
    #[serde(default)]
    pub parent_comment: Option<i64>,
}

/// Partial comment update
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct UpdateCommentRequest {
    pub content: Option<String>,
    pub like: Option<i64>,
    pub dislike: Option<i64>,
}

/// Tag create/update request
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct TagRequest {
    pub name: Option<String>,
}

/// Menu creation request
#[derive(Deserialize, Serialize, Debug)]
pub struct CreateMenuRequest {
    pub title: String,
    pub seat_number: i64,
    #[serde(default)]
    pub category: Option<i64>,
    #[serde(default)]
    pub link: Option<String>,
}

/// Partial menu update
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct UpdateMenuRequest {
    pub title: Option<String>,
    pub seat_number: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub category: Option<Option<i64>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub link: Option<Option<String>>,
}

/// Category creation request
#[derive(Deserialize, Serialize, Debug)]
pub struct CreateCategoryRequest {
    pub title: String,
    #[serde(default)]
    pub parent: Option<i64>,
}

/// Partial category update
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct UpdateCategoryRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub parent: Option<Option<i64>>,
}

/// Category with its depth in the tree
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CategoryResponse {
    pub id: i64,
    pub title: String,
    pub parent: Option<i64>,
    pub level: usize,
}

impl CategoryResponse {
    pub fn new(category: &Category, level: usize) -> Self {
        Self {
            id: category.id,
            title: category.title.clone(),
            parent: category.parent_id,
            level,
        }
    }
}
