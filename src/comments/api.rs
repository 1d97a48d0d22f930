use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;

use crate::comments::error::ApiError;
use crate::comments::model::{Comment, NewComment};

/// The remote comment service. The thread view only talks to it through
/// this trait so it can run against a scripted fake.
#[async_trait]
pub trait CommentApi: Send + Sync {
    async fn fetch_comments(&self, post_slug: &str) -> Result<Vec<Comment>, ApiError>;
    async fn create_comment(&self, comment: &NewComment) -> Result<(), ApiError>;
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

pub struct HttpCommentApi {
    client: Client,
    api_base: String,
}

impl HttpCommentApi {
    pub fn new(api_base: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(HttpCommentApi {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    fn comments_url(&self) -> String {
        format!("{}/comments", self.api_base)
    }

    pub fn read_url(&self, post_slug: &str) -> Result<String, ApiError> {
        let query = serde_urlencoded::to_string([("post_slug", post_slug)])
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(format!("{}?{}", self.comments_url(), query))
    }

    /// Turns a non-2xx answer into an error, keeping the `{error}` field of
    /// the body when there is one.
    async fn status_error(response: Response) -> ApiError {
        let status = response.status().as_u16();
        let message = match response.text().await {
            Ok(body) => serde_json::from_str::<ErrorBody>(&body).ok().and_then(|b| b.error),
            Err(_) => None,
        };
        ApiError::Status { status, message }
    }
}

#[async_trait]
impl CommentApi for HttpCommentApi {
    async fn fetch_comments(&self, post_slug: &str) -> Result<Vec<Comment>, ApiError> {
        let url = self.read_url(post_slug)?;
        let response = self.client.get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        let comments = response.json::<Option<Vec<Comment>>>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(comments.unwrap_or_default())
    }

    async fn create_comment(&self, comment: &NewComment) -> Result<(), ApiError> {
        let response = self.client.post(self.comments_url())
            .json(comment)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }
        Ok(())
    }
}
