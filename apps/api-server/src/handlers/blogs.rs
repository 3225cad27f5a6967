//! Blog post handlers.

use actix_web::{HttpResponse, web};
use serde::Serialize;
use uuid::Uuid;

use bloglist_core::DomainError;
use bloglist_core::domain::{BlogChanges, BlogPost, NewBlogPost, validate_comment};
use bloglist_core::error::RepoError;
use bloglist_core::stats::{self, AuthorBlogs, AuthorLikes};
use bloglist_shared::dto::{BlogResponse, CommentRequest, CreateBlogRequest, UpdateBlogRequest};

use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

async fn find_blog(state: &AppState, id: Uuid) -> AppResult<BlogPost> {
    state.blogs.find_by_id(id).await?.ok_or_else(|| {
        DomainError::NotFound {
            entity_type: "blog",
            id,
        }
        .into()
    })
}

/// GET /api/blogs
pub async fn list_blogs(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let blogs: Vec<BlogResponse> = state
        .blogs
        .find_all()
        .await?
        .into_iter()
        .map(views::blog_with_owner)
        .collect();

    Ok(HttpResponse::Ok().json(blogs))
}

/// GET /api/blogs/{id}
pub async fn get_blog(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let blog = find_blog(&state, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(views::blog(blog, None)))
}

/// POST /api/blogs - Protected route
pub async fn create_blog(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreateBlogRequest>,
) -> AppResult<HttpResponse> {
    // The token may outlive its user.
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("user not found".to_string()))?;

    let req = body.into_inner();
    let draft = NewBlogPost {
        title: req.title,
        author: req.author,
        url: req.url,
        likes: req.likes,
    };
    let blog = draft.into_post(user.id)?;

    let saved = state.blogs.create(blog).await?;
    tracing::info!(blog_id = %saved.id, user = %user.username, "Blog created");

    Ok(HttpResponse::Created().json(views::blog(saved, None)))
}

/// PUT /api/blogs/{id}
pub async fn update_blog(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateBlogRequest>,
) -> AppResult<HttpResponse> {
    let mut blog = find_blog(&state, path.into_inner()).await?;

    let req = body.into_inner();
    blog.apply(BlogChanges {
        title: req.title,
        author: req.author,
        url: req.url,
        likes: req.likes,
    })?;

    let updated = state.blogs.update(blog).await?;

    Ok(HttpResponse::Ok().json(views::blog(updated, None)))
}

/// DELETE /api/blogs/{id} - Protected route, owner only
pub async fn delete_blog(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let blog = find_blog(&state, path.into_inner()).await?;

    if let Err(e) = blog.ensure_owned_by(identity.user_id) {
        tracing::warn!(blog_id = %blog.id, user = %identity.username, "Delete by non-owner refused");
        return Err(e.into());
    }

    state.blogs.delete(blog.id).await?;
    tracing::info!(blog_id = %blog.id, "Blog deleted");

    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/blogs/{id}/comments
pub async fn add_comment(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let comment = body.into_inner().comment;
    validate_comment(&comment)?;

    let updated = match state.blogs.add_comment(id, comment).await {
        Err(RepoError::NotFound) => {
            return Err(DomainError::NotFound {
                entity_type: "blog",
                id,
            }
            .into());
        }
        result => result?,
    };

    Ok(HttpResponse::Created().json(views::blog(updated, None)))
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub total_likes: u64,
    pub favorite_blog: Option<BlogResponse>,
    pub most_blogs: Option<AuthorBlogs>,
    pub most_likes: Option<AuthorLikes>,
}

/// GET /api/blogs/stats
pub async fn blog_stats(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let (blogs, owners): (Vec<_>, Vec<_>) = state
        .blogs
        .find_all()
        .await?
        .into_iter()
        .map(|row| (row.blog, row.owner))
        .unzip();

    let summary = stats::summarize(&blogs);
    let favorite_blog = summary.favorite_blog.map(|fav| {
        let owner = blogs
            .iter()
            .position(|b| b.id == fav.id)
            .and_then(|i| owners[i].clone());
        views::blog(fav.clone(), owner)
    });

    Ok(HttpResponse::Ok().json(StatsResponse {
        total_likes: summary.total_likes,
        favorite_blog,
        most_blogs: summary.most_blogs,
        most_likes: summary.most_likes,
    }))
}
