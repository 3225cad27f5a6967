use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserSummary;
use crate::error::DomainError;

/// BlogPost entity - a single blog entry saved by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: Uuid,
    /// Owning user. Set once at creation.
    pub user_id: Uuid,
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: u32,
    pub comments: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BlogPost {
    /// Create a new post with no likes and no comments.
    pub fn new(user_id: Uuid, title: String, url: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title,
            author: None,
            url,
            likes: 0,
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_likes(mut self, likes: u32) -> Self {
        self.likes = likes;
        self
    }

    /// Grouping key for author statistics. Missing and empty authors share a key.
    pub fn author_key(&self) -> Option<&str> {
        self.author.as_deref().filter(|a| !a.is_empty())
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    pub fn ensure_owned_by(&self, user_id: Uuid) -> Result<(), DomainError> {
        if self.is_owned_by(user_id) {
            Ok(())
        } else {
            Err(DomainError::NotOwner("blog"))
        }
    }

    /// Apply a partial update. The owner is not part of the change set.
    ///
    /// Nothing is changed unless every supplied field is valid.
    pub fn apply(&mut self, changes: BlogChanges) -> Result<(), DomainError> {
        let title = changes.title.map(|t| non_empty(t, "title")).transpose()?;
        let url = changes.url.map(|u| non_empty(u, "url")).transpose()?;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(url) = url {
            self.url = url;
        }
        if let Some(author) = changes.author {
            self.author = Some(author);
        }
        if let Some(likes) = changes.likes {
            self.likes = likes;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Append a comment. Blank comments are rejected.
    pub fn add_comment(&mut self, comment: impl Into<String>) -> Result<(), DomainError> {
        let comment = comment.into();
        validate_comment(&comment)?;
        self.comments.push(comment);
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Reject blank comments.
pub fn validate_comment(comment: &str) -> Result<(), DomainError> {
    if comment.trim().is_empty() {
        return Err(DomainError::Validation("comment missing".to_string()));
    }
    Ok(())
}

fn non_empty(value: String, field: &str) -> Result<String, DomainError> {
    if value.trim().is_empty() {
        Err(DomainError::Validation(format!("{field} must not be empty")))
    } else {
        Ok(value)
    }
}

/// Unvalidated input for a new post, as received from a client.
#[derive(Debug, Clone, Default)]
pub struct NewBlogPost {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<u32>,
}

impl NewBlogPost {
    /// Validate required fields and build a post owned by `user_id`.
    pub fn into_post(self, user_id: Uuid) -> Result<BlogPost, DomainError> {
        let title = self.title.filter(|t| !t.trim().is_empty());
        let url = self.url.filter(|u| !u.trim().is_empty());

        let (Some(title), Some(url)) = (title, url) else {
            return Err(DomainError::Validation("title or url missing".to_string()));
        };

        let mut post = BlogPost::new(user_id, title, url).with_likes(self.likes.unwrap_or(0));
        post.author = self.author;
        Ok(post)
    }
}

/// Partial update for an existing post.
#[derive(Debug, Clone, Default)]
pub struct BlogChanges {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<u32>,
}

/// A post together with a summary of its owner, as returned by list queries.
#[derive(Debug, Clone)]
pub struct BlogWithOwner {
    pub blog: BlogPost,
    pub owner: Option<UserSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: Option<&str>, url: Option<&str>) -> NewBlogPost {
        NewBlogPost {
            title: title.map(String::from),
            author: Some("Michael Chan".to_string()),
            url: url.map(String::from),
            likes: None,
        }
    }

    #[test]
    fn test_new_post_defaults_likes_to_zero() {
        let owner = Uuid::new_v4();
        let post = draft(Some("React patterns"), Some("https://reactpatterns.com/"))
            .into_post(owner)
            .unwrap();

        assert_eq!(post.likes, 0);
        assert!(post.comments.is_empty());
        assert!(post.is_owned_by(owner));
        assert!(post.ensure_owned_by(owner).is_ok());
        assert!(matches!(
            post.ensure_owned_by(Uuid::new_v4()),
            Err(DomainError::NotOwner("blog"))
        ));
    }

    #[test]
    fn test_new_post_requires_title_and_url() {
        let owner = Uuid::new_v4();

        for input in [
            draft(None, Some("http://x")),
            draft(Some("title"), None),
            draft(Some("  "), Some("http://x")),
        ] {
            let err = input.into_post(owner).unwrap_err();
            assert!(matches!(err, DomainError::Validation(msg) if msg == "title or url missing"));
        }
    }

    #[test]
    fn test_apply_changes_keeps_owner() {
        let owner = Uuid::new_v4();
        let mut post = BlogPost::new(owner, "t".into(), "u".into()).with_likes(3);

        post.apply(BlogChanges {
            likes: Some(4),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(post.likes, 4);
        assert_eq!(post.title, "t");
        assert_eq!(post.user_id, owner);
    }

    #[test]
    fn test_apply_rejects_empty_title() {
        let mut post = BlogPost::new(Uuid::new_v4(), "t".into(), "u".into());
        let result = post.apply(BlogChanges {
            title: Some(String::new()),
            ..Default::default()
        });

        assert!(result.is_err());
        assert_eq!(post.title, "t");
    }

    #[test]
    fn test_apply_is_all_or_nothing() {
        let mut post = BlogPost::new(Uuid::new_v4(), "t".into(), "u".into()).with_likes(3);
        let before = post.clone();

        let result = post.apply(BlogChanges {
            title: Some("new title".into()),
            url: Some("  ".into()),
            likes: Some(9),
            ..Default::default()
        });

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert_eq!(post, before);
    }

    #[test]
    fn test_add_comment() {
        let mut post = BlogPost::new(Uuid::new_v4(), "t".into(), "u".into());
        post.add_comment("first").unwrap();
        post.add_comment("second").unwrap();

        assert_eq!(post.comments, vec!["first", "second"]);
        assert!(post.add_comment("   ").is_err());
        assert_eq!(post.comments.len(), 2);
    }

    #[test]
    fn test_author_key_groups_missing_and_empty() {
        let base = BlogPost::new(Uuid::new_v4(), "t".into(), "u".into());
        assert_eq!(base.author_key(), None);
        assert_eq!(base.clone().with_author("").author_key(), None);
        assert_eq!(base.with_author("Ada").author_key(), Some("Ada"));
    }
}
