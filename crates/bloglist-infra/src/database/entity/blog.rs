//! Blog entity for SeaORM.

use sea_orm::{NotSet, Set};
use sea_orm::entity::prelude::*;

use bloglist_core::domain::BlogPost;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "blogs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub author: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub url: String,
    pub likes: i64,
    /// JSON array of comment strings, oldest first.
    #[sea_orm(column_type = "JsonBinary")]
    pub comments: Json,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

fn decode_comments(id: Uuid, value: Json) -> Vec<String> {
    serde_json::from_value(value).unwrap_or_else(|e| {
        tracing::warn!(blog_id = %id, error = %e, "Malformed comments column, ignoring");
        Vec::new()
    })
}

/// Conversion from SeaORM Model to Domain BlogPost.
impl From<Model> for BlogPost {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            title: model.title,
            author: model.author,
            url: model.url,
            likes: u32::try_from(model.likes.max(0)).unwrap_or(u32::MAX),
            comments: decode_comments(model.id, model.comments),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Conversion from Domain BlogPost to SeaORM ActiveModel.
///
/// `comments` is left unset: inserts take the column default and updates
/// keep the stored list. Appends go through `BlogRepository::add_comment`.
impl From<BlogPost> for ActiveModel {
    fn from(blog: BlogPost) -> Self {
        Self {
            id: Set(blog.id),
            user_id: Set(blog.user_id),
            title: Set(blog.title),
            author: Set(blog.author),
            url: Set(blog.url),
            likes: Set(i64::from(blog.likes)),
            comments: NotSet,
            created_at: Set(blog.created_at.into()),
            updated_at: Set(blog.updated_at.into()),
        }
    }
}
