use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DomainError;

/// Post entity - a persisted blog post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: Uuid,
    pub author_name: String,
    pub title: String,
    pub content: String,
    pub created: DateTime<Utc>,
}

impl Post {
    /// Create a post from validated input, assigning a fresh id and creation time.
    pub fn new(new_post: NewPost) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_name: new_post.author_name,
            title: new_post.title,
            content: new_post.content,
            created: Utc::now(),
        }
    }
}

/// Author as supplied by clients. Only the composed name is ever stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    first_name: String,
    last_name: String,
}

impl Author {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let first_name = first_name.into();
        let last_name = last_name.into();

        if first_name.trim().is_empty() {
            return Err(DomainError::Validation(
                "author.firstName must not be empty".to_string(),
            ));
        }
        if last_name.trim().is_empty() {
            return Err(DomainError::Validation(
                "author.lastName must not be empty".to_string(),
            ));
        }

        Ok(Self {
            first_name,
            last_name,
        })
    }

    /// `"<firstName> <lastName>"`, the stored author name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Validated input for creating a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub author_name: String,
    pub title: String,
    pub content: String,
}

impl NewPost {
    pub fn new(
        author: &Author,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            author_name: author.full_name(),
            title: validate_title(title.into())?,
            content: content.into(),
        })
    }
}

/// Partial update. Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author_name: Option<String>,
}

impl PostPatch {
    pub fn with_title(mut self, title: impl Into<String>) -> Result<Self, DomainError> {
        self.title = Some(validate_title(title.into())?);
        Ok(self)
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_author(mut self, author: &Author) -> Self {
        self.author_name = Some(author.full_name());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.author_name.is_none()
    }

    /// Apply the supplied fields to `post`. `id` and `created` never change.
    pub fn apply(self, post: &mut Post) {
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(content) = self.content {
            post.content = content;
        }
        if let Some(author_name) = self.author_name {
            post.author_name = author_name;
        }
    }
}

fn validate_title(title: String) -> Result<String, DomainError> {
    if title.trim().is_empty() {
        return Err(DomainError::Validation(
            "title must not be empty".to_string(),
        ));
    }
    Ok(title)
}
