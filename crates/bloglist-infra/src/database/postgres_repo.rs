//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DbBackend, EntityTrait, QueryFilter, QueryOrder, Statement};
use uuid::Uuid;

use bloglist_core::domain::{BlogPost, BlogWithOwner, User, UserWithBlogs};
use bloglist_core::error::RepoError;
use bloglist_core::ports::{BlogRepository, UserRepository};

use super::entity::blog::{self, Entity as BlogEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL blog repository.
pub type PostgresBlogRepository = PostgresBaseRepository<BlogEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_all(&self) -> Result<Vec<UserWithBlogs>, RepoError> {
        let rows = UserEntity::find()
            .find_with_related(BlogEntity)
            .order_by_asc(user::Column::CreatedAt)
            .order_by_asc(blog::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows
            .into_iter()
            .map(|(user, blogs)| UserWithBlogs {
                user: user.into(),
                blogs: blogs.into_iter().map(Into::into).collect(),
            })
            .collect())
    }
}

#[async_trait]
impl BlogRepository for PostgresBlogRepository {
    async fn find_all(&self) -> Result<Vec<BlogWithOwner>, RepoError> {
        let rows = BlogEntity::find()
            .find_also_related(UserEntity)
            .order_by_asc(blog::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows
            .into_iter()
            .map(|(blog, owner)| BlogWithOwner {
                blog: blog.into(),
                owner: owner.map(|u| User::from(u).summary()),
            })
            .collect())
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<BlogPost>, RepoError> {
        let result = BlogEntity::find()
            .filter(blog::Column::UserId.eq(user_id))
            .order_by_asc(blog::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn add_comment(&self, id: Uuid, comment: String) -> Result<BlogPost, RepoError> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            ADD_COMMENT_SQL,
            [comment.into(), id.into()],
        );

        let row = BlogEntity::find()
            .from_raw_sql(stmt)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(RepoError::NotFound)?;

        Ok(row.into())
    }
}

/// One statement; the row lock orders concurrent appends.
const ADD_COMMENT_SQL: &str = r#"UPDATE "blogs"
SET "comments" = "comments" || jsonb_build_array($1::text), "updated_at" = now()
WHERE "id" = $2
RETURNING *"#;
