//! In-memory repositories - used when no database is configured, and in tests.
//!
//! Data is lost on process restart. Each method takes at most one lock at a
//! time, so the blog and user repositories can share a store without lock
//! ordering concerns.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use bloglist_core::domain::{BlogPost, BlogWithOwner, User, UserWithBlogs};
use bloglist_core::error::RepoError;
use bloglist_core::ports::{BaseRepository, BlogRepository, UserRepository};

/// Backing storage shared by the in-memory repositories, kept in insertion order.
#[derive(Default)]
pub struct InMemoryStore {
    users: RwLock<Vec<User>>,
    blogs: RwLock<Vec<BlogPost>>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    async fn user_exists(&self, id: Uuid) -> bool {
        self.users.read().await.iter().any(|u| u.id == id)
    }
}

/// In-memory user repository.
pub struct InMemoryUserRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryUserRepository {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let users = self.store.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.store.users.write().await;

        if users.iter().any(|u| u.username == user.username) {
            return Err(RepoError::Constraint(
                "Entity already exists: username must be unique".to_string(),
            ));
        }

        users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.store.users.write().await;

        if users
            .iter()
            .any(|u| u.id != user.id && u.username == user.username)
        {
            return Err(RepoError::Constraint(
                "Entity already exists: username must be unique".to_string(),
            ));
        }

        let slot = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(RepoError::NotFound)?;
        *slot = user.clone();
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        {
            let mut users = self.store.users.write().await;
            let before = users.len();
            users.retain(|u| u.id != id);
            if users.len() == before {
                return Err(RepoError::NotFound);
            }
        }

        // Cascade like the foreign key on blogs.user_id.
        self.store.blogs.write().await.retain(|b| b.user_id != id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let users = self.store.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_all(&self) -> Result<Vec<UserWithBlogs>, RepoError> {
        let users = self.store.users.read().await.clone();
        let blogs = self.store.blogs.read().await.clone();

        Ok(users
            .into_iter()
            .map(|user| {
                let owned = blogs
                    .iter()
                    .filter(|b| b.is_owned_by(user.id))
                    .cloned()
                    .collect();
                UserWithBlogs {
                    user,
                    blogs: owned,
                }
            })
            .collect())
    }
}

/// In-memory blog repository.
pub struct InMemoryBlogRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryBlogRepository {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BaseRepository<BlogPost, Uuid> for InMemoryBlogRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<BlogPost>, RepoError> {
        let blogs = self.store.blogs.read().await;
        Ok(blogs.iter().find(|b| b.id == id).cloned())
    }

    async fn create(&self, blog: BlogPost) -> Result<BlogPost, RepoError> {
        if !self.store.user_exists(blog.user_id).await {
            return Err(RepoError::Constraint(format!(
                "Referenced entity missing: user {}",
                blog.user_id
            )));
        }

        let mut blogs = self.store.blogs.write().await;
        if blogs.iter().any(|b| b.id == blog.id) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        blogs.push(blog.clone());
        Ok(blog)
    }

    async fn update(&self, blog: BlogPost) -> Result<BlogPost, RepoError> {
        let mut blogs = self.store.blogs.write().await;
        let slot = blogs
            .iter_mut()
            .find(|b| b.id == blog.id)
            .ok_or(RepoError::NotFound)?;

        // Comments only grow through `add_comment`; keep what is stored.
        let comments = std::mem::take(&mut slot.comments);
        *slot = BlogPost { comments, ..blog };
        Ok(slot.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut blogs = self.store.blogs.write().await;
        let before = blogs.len();
        blogs.retain(|b| b.id != id);

        if blogs.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl BlogRepository for InMemoryBlogRepository {
    async fn find_all(&self) -> Result<Vec<BlogWithOwner>, RepoError> {
        let blogs = self.store.blogs.read().await.clone();
        let users = self.store.users.read().await.clone();

        Ok(blogs
            .into_iter()
            .map(|blog| {
                let owner = users
                    .iter()
                    .find(|u| u.id == blog.user_id)
                    .map(User::summary);
                BlogWithOwner { blog, owner }
            })
            .collect())
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<BlogPost>, RepoError> {
        let blogs = self.store.blogs.read().await;
        Ok(blogs
            .iter()
            .filter(|b| b.is_owned_by(user_id))
            .cloned()
            .collect())
    }

    async fn add_comment(&self, id: Uuid, comment: String) -> Result<BlogPost, RepoError> {
        let mut blogs = self.store.blogs.write().await;
        let slot = blogs
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(RepoError::NotFound)?;

        slot.comments.push(comment);
        slot.updated_at = Utc::now();
        Ok(slot.clone())
    }
}
