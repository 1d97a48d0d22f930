use thiserror::Error;

use crate::comments::model::NewComment;

pub const MAX_NAME_LEN: usize = 50;
pub const MAX_EMAIL_LEN: usize = 100;
pub const MAX_CONTENT_LEN: usize = 1000;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name, email and content are required")]
    MissingFields,
    #[error("name is longer than {} characters", MAX_NAME_LEN)]
    NameTooLong,
    #[error("email is longer than {} characters", MAX_EMAIL_LEN)]
    EmailTooLong,
    #[error("content is longer than {} characters", MAX_CONTENT_LEN)]
    ContentTooLong,
}

impl ValidationError {
    pub fn message_key(&self) -> &'static str {
        match self {
            ValidationError::MissingFields => "comments.error.required",
            ValidationError::NameTooLong => "comments.error.nameTooLong",
            ValidationError::EmailTooLong => "comments.error.emailTooLong",
            ValidationError::ContentTooLong => "comments.error.contentTooLong",
        }
    }

    pub fn limit(&self) -> Option<usize> {
        match self {
            ValidationError::MissingFields => None,
            ValidationError::NameTooLong => Some(MAX_NAME_LEN),
            ValidationError::EmailTooLong => Some(MAX_EMAIL_LEN),
            ValidationError::ContentTooLong => Some(MAX_CONTENT_LEN),
        }
    }
}

/// Checks the trimmed fields and builds the request body from them.
/// Lengths are counted in characters.
pub fn validate_comment(
    post_slug: &str,
    author_name: &str,
    author_email: &str,
    content: &str,
    parent_id: Option<i64>,
) -> Result<NewComment, ValidationError> {
    let author_name = author_name.trim();
    let author_email = author_email.trim();
    let content = content.trim();

    if author_name.is_empty() || author_email.is_empty() || content.is_empty() {
        return Err(ValidationError::MissingFields);
    }
    if author_name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::NameTooLong);
    }
    if author_email.chars().count() > MAX_EMAIL_LEN {
        return Err(ValidationError::EmailTooLong);
    }
    if content.chars().count() > MAX_CONTENT_LEN {
        return Err(ValidationError::ContentTooLong);
    }

    Ok(NewComment {
        post_slug: post_slug.to_string(),
        author_name: author_name.to_string(),
        author_email: author_email.to_string(),
        content: content.to_string(),
        parent_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_fields() {
        let comment = validate_comment("AI/x", "  Alice ", " alice@example.com\n", "\thello  ", Some(3)).unwrap();
        assert_eq!(comment.author_name, "Alice");
        assert_eq!(comment.author_email, "alice@example.com");
        assert_eq!(comment.content, "hello");
        assert_eq!(comment.parent_id, Some(3));
    }

    #[test]
    fn test_required_fields() {
        assert_eq!(validate_comment("AI/x", "", "a@b.c", "hi", None), Err(ValidationError::MissingFields));
        assert_eq!(validate_comment("AI/x", "Alice", "   ", "hi", None), Err(ValidationError::MissingFields));
        assert_eq!(validate_comment("AI/x", "Alice", "a@b.c", "\n\n", None), Err(ValidationError::MissingFields));
    }

    #[test]
    fn test_content_boundary() {
        let exact = "a".repeat(MAX_CONTENT_LEN);
        assert!(validate_comment("AI/x", "Alice", "a@b.c", &exact, None).is_ok());

        let over = "a".repeat(MAX_CONTENT_LEN + 1);
        assert_eq!(validate_comment("AI/x", "Alice", "a@b.c", &over, None), Err(ValidationError::ContentTooLong));
    }

    #[test]
    fn test_lengths_count_characters() {
        let name = "名".repeat(MAX_NAME_LEN);
        assert!(validate_comment("AI/x", &name, "a@b.c", "hi", None).is_ok());

        let name = "名".repeat(MAX_NAME_LEN + 1);
        assert_eq!(validate_comment("AI/x", &name, "a@b.c", "hi", None), Err(ValidationError::NameTooLong));

        let email = format!("{}@b.c", "a".repeat(MAX_EMAIL_LEN));
        assert_eq!(validate_comment("AI/x", "Alice", &email, "hi", None), Err(ValidationError::EmailTooLong));
    }
}
