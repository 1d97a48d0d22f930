pub mod api;
pub mod error;
pub mod model;
pub mod thread;
pub mod validation;

pub use api::{CommentApi, HttpCommentApi};
pub use error::{ApiError, CommentError};
pub use model::{count_all, Comment, NewComment};
pub use thread::{CommentThread, ReplyDraft, ReplyTarget, ThreadState};
