use thiserror::Error;

use crate::comments::validation::ValidationError;
use crate::i18n::I18n;

pub const STATUS_TOO_MANY_REQUESTS: u16 = 429;

/// What went wrong talking to the comment service.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiError {
    #[error("comment service answered {status}: {}", .message.as_deref().unwrap_or("no details"))]
    Status { status: u16, message: Option<String> },
    #[error("could not reach the comment service: {0}")]
    Transport(String),
    #[error("unexpected response from the comment service: {0}")]
    Decode(String),
}

/// Failures the thread view reports to the reader.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CommentError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("rate limited by the comment service")]
    RateLimited,
    #[error("comment rejected ({status}): {}", .message.as_deref().unwrap_or("no details"))]
    Rejected { status: u16, message: Option<String> },
    #[error("{0}")]
    Unavailable(String),
    #[error("the thread is busy loading or sending")]
    Busy,
}

impl From<ApiError> for CommentError {
    fn from(value: ApiError) -> Self {
        match value {
            ApiError::Status { status: STATUS_TOO_MANY_REQUESTS, .. } => CommentError::RateLimited,
            ApiError::Status { status, message } => CommentError::Rejected { status, message },
            ApiError::Transport(e) | ApiError::Decode(e) => CommentError::Unavailable(e),
        }
    }
}

impl CommentError {
    /// The text shown above the form. A server supplied reason is shown
    /// as is, everything else goes through the string tables.
    pub fn localized(&self, i18n: &I18n) -> String {
        match self {
            CommentError::Invalid(e) => match e.limit() {
                Some(max) => i18n.format(e.message_key(), &[("max", &max.to_string())]),
                None => i18n.t(e.message_key()).to_string(),
            },
            CommentError::RateLimited => i18n.t("comments.error.rateLimited").to_string(),
            CommentError::Rejected { message: Some(message), .. } if !message.trim().is_empty() => message.clone(),
            CommentError::Rejected { .. } | CommentError::Unavailable(_) => i18n.t("comments.error.submitFailed").to_string(),
            CommentError::Busy => i18n.t("comments.error.busy").to_string(),
        }
    }
}
