use std::sync::Arc;

use actix_web::{App, http::StatusCode, http::header, test, web};
use serde_json::{Value, json};

use bloglist_core::domain::{BlogPost, User};
use bloglist_infra::{Argon2PasswordService, JwtConfig, JwtTokenService};

use super::configure_routes;
use crate::state::AppState;

fn test_state() -> AppState {
    let passwords = Argon2PasswordService::with_params(1024, 1, 1).unwrap();
    AppState::in_memory(
        Arc::new(JwtTokenService::new(JwtConfig::default())),
        Arc::new(passwords),
    )
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

/// Store a user directly and return it with a valid token.
async fn seed_user(state: &AppState, username: &str) -> (User, String) {
    let hash = state.passwords.hash("sekret").unwrap();
    let user = state
        .users
        .create(User::new(username.to_string(), Some("Test User".to_string()), hash))
        .await
        .unwrap();
    let token = state.tokens.generate_token(user.id, &user.username).unwrap();
    (user, token)
}

async fn seed_blog(state: &AppState, owner: &User, title: &str, author: &str, likes: u32) -> BlogPost {
    let blog = BlogPost::new(owner.id, title.to_string(), format!("https://example.com/{likes}"))
        .with_author(author)
        .with_likes(likes);
    state.blogs.create(blog).await.unwrap()
}

fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

#[actix_web::test]
async fn test_health_reports_in_memory_storage() {
    let state = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "in-memory");
}

#[actix_web::test]
async fn test_list_blogs_returns_id_and_populated_owner() {
    let state = test_state();
    let (root, _) = seed_user(&state, "root").await;
    seed_blog(&state, &root, "React patterns", "Michael Chan", 7).await;
    seed_blog(&state, &root, "Go To Statement", "Edsger W. Dijkstra", 5).await;
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/api/blogs").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        resp.headers()
            .get(header::CONTENT_TYPE)
            .is_some_and(|v| v.to_str().unwrap().starts_with("application/json"))
    );

    let body: Value = test::read_body_json(resp).await;
    let blogs = body.as_array().unwrap();
    assert_eq!(blogs.len(), 2);
    for blog in blogs {
        assert!(blog.get("id").is_some());
        assert!(blog.get("_id").is_none());
        assert_eq!(blog["user"]["username"], "root");
    }
}

#[actix_web::test]
async fn test_create_blog_defaults_likes_to_zero() {
    let state = test_state();
    let (root, token) = seed_user(&state, "root").await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/blogs")
        .insert_header(bearer(&token))
        .set_json(json!({
            "title": "Type wars",
            "author": "Robert C. Martin",
            "url": "http://blog.cleancoder.com/uncle-bob/2016/05/01/TypeWars.html"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["likes"], 0);
    assert_eq!(body["user"], root.id.to_string());
    assert_eq!(body["comments"], json!([]));

    let stored = state.blogs.find_by_user_id(root.id).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].title, "Type wars");
}

#[actix_web::test]
async fn test_create_blog_without_title_is_rejected() {
    let state = test_state();
    let (_, token) = seed_user(&state, "root").await;
    let app = init_app!(state);

    for payload in [
        json!({ "author": "Anon", "url": "https://example.com" }),
        json!({ "title": "No url", "author": "Anon" }),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/blogs")
            .insert_header(bearer(&token))
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    assert!(state.blogs.find_all().await.unwrap().is_empty());
}

#[actix_web::test]
async fn test_create_blog_requires_token() {
    let state = test_state();
    let app = init_app!(state);

    let payload = json!({ "title": "t", "url": "https://example.com" });

    let req = test::TestRequest::post()
        .uri("/api/blogs")
        .set_json(payload.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/blogs")
        .insert_header(bearer("not-a-jwt"))
        .set_json(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 401);
    assert!(state.blogs.find_all().await.unwrap().is_empty());
}

#[actix_web::test]
async fn test_get_blog_by_id() {
    let state = test_state();
    let (root, _) = seed_user(&state, "root").await;
    let blog = seed_blog(&state, &root, "Canonical string reduction", "Edsger W. Dijkstra", 12).await;
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri(&format!("/api/blogs/{}", blog.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["id"], blog.id.to_string());
    assert_eq!(body["likes"], 12);
}

#[actix_web::test]
async fn test_unknown_and_malformed_ids() {
    let state = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri(&format!("/api/blogs/{}", uuid::Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/api/blogs/5a3d5da59070081a82a3445")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["detail"].as_str().unwrap().contains("malformatted id"));
}

#[actix_web::test]
async fn test_update_blog_likes() {
    let state = test_state();
    let (root, _) = seed_user(&state, "root").await;
    let blog = seed_blog(&state, &root, "First class tests", "Robert C. Martin", 10).await;
    let app = init_app!(state);

    let req = test::TestRequest::put()
        .uri(&format!("/api/blogs/{}", blog.id))
        .set_json(json!({ "likes": 11 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["likes"], 11);
    assert_eq!(body["title"], "First class tests");

    let stored = state.blogs.find_by_id(blog.id).await.unwrap().unwrap();
    assert_eq!(stored.likes, 11);
}

#[actix_web::test]
async fn test_update_missing_blog_is_not_found() {
    let state = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::put()
        .uri(&format!("/api/blogs/{}", uuid::Uuid::new_v4()))
        .set_json(json!({ "likes": 1 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_owner_can_delete_blog() {
    let state = test_state();
    let (root, token) = seed_user(&state, "root").await;
    let blog = seed_blog(&state, &root, "TDD harms architecture", "Robert C. Martin", 0).await;
    let app = init_app!(state);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/blogs/{}", blog.id))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    assert!(state.blogs.find_by_id(blog.id).await.unwrap().is_none());
}

#[actix_web::test]
async fn test_non_owner_cannot_delete_blog() {
    let state = test_state();
    let (root, _) = seed_user(&state, "root").await;
    let (_, other_token) = seed_user(&state, "mluukkai").await;
    let blog = seed_blog(&state, &root, "React patterns", "Michael Chan", 7).await;
    let app = init_app!(state);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/blogs/{}", blog.id))
        .insert_header(bearer(&other_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "only the creator can delete this blog");
    assert!(state.blogs.find_by_id(blog.id).await.unwrap().is_some());
}

#[actix_web::test]
async fn test_register_login_and_post() {
    let state = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/users")
        .set_json(json!({ "username": "hellas", "name": "Arto Hellas", "password": "salainen" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["username"], "hellas");
    assert!(body.get("password_hash").is_none());
    assert_eq!(body["blogs"], json!([]));

    let req = test::TestRequest::post()
        .uri("/api/login")
        .set_json(json!({ "username": "hellas", "password": "salainen" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["username"], "hellas");
    assert_eq!(body["name"], "Arto Hellas");
    let token = body["token"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/api/blogs")
        .insert_header(bearer(&token))
        .set_json(json!({ "title": "Hello", "url": "https://example.com/hello" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::get().uri("/api/users").to_request();
    let users: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(users[0]["blogs"][0]["title"], "Hello");
}

#[actix_web::test]
async fn test_login_rejects_bad_credentials() {
    let state = test_state();
    seed_user(&state, "root").await;
    let app = init_app!(state);

    for (username, password) in [("root", "wrong"), ("nobody", "sekret")] {
        let req = test::TestRequest::post()
            .uri("/api/login")
            .set_json(json!({ "username": username, "password": password }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}

#[actix_web::test]
async fn test_register_rejects_duplicate_and_short_credentials() {
    let state = test_state();
    seed_user(&state, "root").await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/users")
        .set_json(json!({ "username": "root", "password": "salainen" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::post()
        .uri("/api/users")
        .set_json(json!({ "username": "ab", "password": "salainen" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    assert_eq!(state.users.find_all().await.unwrap().len(), 1);
}

#[actix_web::test]
async fn test_add_comment() {
    let state = test_state();
    let (root, _) = seed_user(&state, "root").await;
    let blog = seed_blog(&state, &root, "React patterns", "Michael Chan", 7).await;
    let app = init_app!(state);

    let uri = format!("/api/blogs/{}/comments", blog.id);

    let req = test::TestRequest::post()
        .uri(&uri)
        .set_json(json!({ "comment": "great read" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["comments"], json!(["great read"]));

    let req = test::TestRequest::post()
        .uri(&uri)
        .set_json(json!({ "comment": "  " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let stored = state.blogs.find_by_id(blog.id).await.unwrap().unwrap();
    assert_eq!(stored.comments, vec!["great read".to_string()]);
}

#[actix_web::test]
async fn test_blog_stats() {
    let state = test_state();
    let (root, _) = seed_user(&state, "root").await;
    seed_blog(&state, &root, "React patterns", "Michael Chan", 7).await;
    seed_blog(&state, &root, "Canonical string reduction", "Edsger W. Dijkstra", 12).await;
    seed_blog(&state, &root, "First class tests", "Robert C. Martin", 10).await;
    seed_blog(&state, &root, "TDD harms architecture", "Robert C. Martin", 0).await;
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/api/blogs/stats").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["total_likes"], 29);
    assert_eq!(body["favorite_blog"]["title"], "Canonical string reduction");
    assert_eq!(body["favorite_blog"]["user"]["username"], "root");
    assert_eq!(body["most_blogs"], json!({ "author": "Robert C. Martin", "count": 2 }));
    assert_eq!(body["most_likes"], json!({ "author": "Edsger W. Dijkstra", "likes": 12 }));
}

#[actix_web::test]
async fn test_blog_stats_on_empty_list() {
    let state = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/api/blogs/stats").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["total_likes"], 0);
    assert!(body["favorite_blog"].is_null());
    assert!(body["most_blogs"].is_null());
}

#[actix_web::test]
async fn test_update_after_comment_keeps_comment() {
    let state = test_state();
    let (root, _) = seed_user(&state, "root").await;
    let blog = seed_blog(&state, &root, "React patterns", "Michael Chan", 7).await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri(&format!("/api/blogs/{}/comments", blog.id))
        .set_json(json!({ "comment": "hello" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    // The client still holds the pre-comment representation.
    let req = test::TestRequest::put()
        .uri(&format!("/api/blogs/{}", blog.id))
        .set_json(json!({ "likes": 8, "title": blog.title, "url": blog.url }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["likes"], 8);
    assert_eq!(body["comments"], json!(["hello"]));
}

#[actix_web::test]
async fn test_comment_on_missing_blog_is_not_found() {
    let state = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri(&format!("/api/blogs/{}/comments", uuid::Uuid::new_v4()))
        .set_json(json!({ "comment": "hello" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
