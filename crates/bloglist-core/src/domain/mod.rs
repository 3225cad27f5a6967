//! Domain entities - the core business objects.

mod blog;
mod user;

pub use blog::{BlogChanges, BlogPost, BlogWithOwner, NewBlogPost, validate_comment};
pub use user::{User, UserSummary, UserWithBlogs};
