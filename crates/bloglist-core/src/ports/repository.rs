use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{BlogPost, BlogWithOwner, User, UserWithBlogs};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity.
    async fn create(&self, entity: T) -> Result<T, RepoError>;

    /// Replace an existing entity. Fails with `RepoError::NotFound` if it is gone.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// All users with the posts they own.
    async fn find_all(&self) -> Result<Vec<UserWithBlogs>, RepoError>;
}

/// Blog post repository.
#[async_trait]
pub trait BlogRepository: BaseRepository<BlogPost, Uuid> {
    /// All posts in creation order, each with its owner's public fields.
    async fn find_all(&self) -> Result<Vec<BlogWithOwner>, RepoError>;

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<BlogPost>, RepoError>;

    /// Append one comment in a single store operation and return the stored post.
    ///
    /// `update` never writes `comments`, so this is the only way the list grows.
    async fn add_comment(&self, id: Uuid, comment: String) -> Result<BlogPost, RepoError>;
}
