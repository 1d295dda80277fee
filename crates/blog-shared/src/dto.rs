//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Body of a create or edit request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// `YYYY-MM-DD HH:MM:SS`; empty or absent leaves the post unpublished.
    #[serde(default)]
    pub published_at: Option<String>,
}

/// A post as rendered to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub published_at: Option<String>,
}

/// Links offered next to a single post. Only present for logged-in sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostLinks {
    pub edit: String,
    pub delete: String,
}

impl PostLinks {
    pub fn for_post(id: i64) -> Self {
        Self {
            edit: format!("/api/posts/{id}"),
            delete: format!("/api/posts/{id}"),
        }
    }
}

/// Single-post view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostView {
    pub post: PostResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<PostLinks>,
}

/// One page of the post listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListResponse {
    pub posts: Vec<PostResponse>,
    pub page: u64,
    pub total: u64,
    pub total_pages: u64,
    pub previous: Option<u64>,
    pub next: Option<u64>,
}

/// Query string of the listing endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
}
