//! Domain to wire conversions.

use bloglist_core::domain::{BlogPost, BlogWithOwner, UserSummary, UserWithBlogs};
use bloglist_shared::dto::{
    BlogOwner, BlogResponse, UserBlogResponse, UserResponse, UserSummaryResponse,
};

fn summary(owner: UserSummary) -> UserSummaryResponse {
    UserSummaryResponse {
        id: owner.id.to_string(),
        username: owner.username,
        name: owner.name,
    }
}

/// A post, with the owner populated when known and as a bare id otherwise.
pub fn blog(blog: BlogPost, owner: Option<UserSummary>) -> BlogResponse {
    let user = match owner {
        Some(owner) => BlogOwner::Populated(summary(owner)),
        None => BlogOwner::Id(blog.user_id.to_string()),
    };

    BlogResponse {
        id: blog.id.to_string(),
        title: blog.title,
        author: blog.author,
        url: blog.url,
        likes: blog.likes,
        user,
        comments: blog.comments,
    }
}

pub fn blog_with_owner(row: BlogWithOwner) -> BlogResponse {
    blog(row.blog, row.owner)
}

pub fn user(row: UserWithBlogs) -> UserResponse {
    UserResponse {
        id: row.user.id.to_string(),
        username: row.user.username,
        name: row.user.name,
        blogs: row
            .blogs
            .into_iter()
            .map(|b| UserBlogResponse {
                id: b.id.to_string(),
                title: b.title,
                author: b.author,
                url: b.url,
                likes: b.likes,
            })
            .collect(),
    }
}
