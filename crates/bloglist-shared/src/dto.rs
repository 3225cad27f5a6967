//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response containing an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub username: String,
    pub name: Option<String>,
}

/// Request to create a blog post. Required fields are optional here so the
/// handler can report them as missing instead of failing deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateBlogRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<u32>,
}

/// Partial update of a blog post. Unknown fields (such as `id` or `user`)
/// are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<u32>,
}

/// Request to append a comment to a blog post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRequest {
    pub comment: String,
}

/// Public fields of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummaryResponse {
    pub id: String,
    pub username: String,
    pub name: Option<String>,
}

/// The owner of a blog post: a bare id, or the populated user when the
/// endpoint resolves it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlogOwner {
    Populated(UserSummaryResponse),
    Id(String),
}

/// A blog post as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogResponse {
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: u32,
    pub user: BlogOwner,
    pub comments: Vec<String>,
}

/// A blog post as listed under its owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserBlogResponse {
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: u32,
}

/// A user's public information with the posts they own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub name: Option<String>,
    pub blogs: Vec<UserBlogResponse>,
}
