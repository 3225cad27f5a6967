//! HTTP handlers and route configuration.

mod auth;
mod blogs;
mod health;
mod users;
mod views;

#[cfg(test)]
mod tests;

use actix_web::web;

use crate::middleware::error::{json_config, path_config};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(path_config()).app_data(json_config()).service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .route("/login", web::post().to(auth::login))
            .service(
                web::scope("/users")
                    .route("", web::get().to(users::list_users))
                    .route("", web::post().to(users::create_user)),
            )
            .service(
                web::scope("/blogs")
                    .route("", web::get().to(blogs::list_blogs))
                    .route("", web::post().to(blogs::create_blog))
                    // Must precede `/{id}`, which would reject "stats" as a malformed id.
                    .route("/stats", web::get().to(blogs::blog_stats))
                    .route("/{id}", web::get().to(blogs::get_blog))
                    .route("/{id}", web::put().to(blogs::update_blog))
                    .route("/{id}", web::delete().to(blogs::delete_blog))
                    .route("/{id}/comments", web::post().to(blogs::add_comment)),
            ),
    );
}
