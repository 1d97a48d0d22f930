use spdlog::{debug, error, warn};

use crate::comments::api::CommentApi;
use crate::comments::error::{ApiError, CommentError};
use crate::comments::model::{count_all, find_comment, Comment};
use crate::comments::validation::validate_comment;
use crate::i18n::I18n;
use crate::storage::KeyValueStore;

pub const AUTHOR_NAME_KEY: &str = "comment_author_name";
pub const AUTHOR_EMAIL_KEY: &str = "comment_author_email";

#[derive(Debug, Clone, PartialEq)]
pub enum ThreadState {
    Loading,
    Loaded(Vec<Comment>),
    Submitting(Vec<Comment>),
    Failed { message: String, comments: Vec<Comment> },
}

impl ThreadState {
    pub fn comments(&self) -> &[Comment] {
        match self {
            ThreadState::Loading => &[],
            ThreadState::Loaded(comments)
            | ThreadState::Submitting(comments)
            | ThreadState::Failed { comments, .. } => comments,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ThreadState::Failed { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }

    fn take_comments(&mut self) -> Vec<Comment> {
        match std::mem::replace(self, ThreadState::Loading) {
            ThreadState::Loading => vec![],
            ThreadState::Loaded(comments)
            | ThreadState::Submitting(comments)
            | ThreadState::Failed { comments, .. } => comments,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplyTarget {
    pub comment_id: i64,
    pub author_name: String,
}

/// What the reader is typing. There is a single draft per thread, shared by
/// the main form and the one reply form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplyDraft {
    pub target: Option<ReplyTarget>,
    pub name: String,
    pub email: String,
    pub content: String,
}

/// Ties a load to the post and generation it was issued for.
#[derive(Debug)]
pub struct LoadTicket {
    generation: u64,
    post_slug: String,
}

impl LoadTicket {
    pub fn post_slug(&self) -> &str {
        &self.post_slug
    }
}

pub struct CommentThread<A, S> {
    api: A,
    store: S,
    i18n: I18n,
    post_slug: String,
    state: ThreadState,
    generation: u64,
    max_reply_depth: Option<usize>,
    pub draft: ReplyDraft,
}

impl<A: CommentApi, S: KeyValueStore> CommentThread<A, S> {
    /// Starts in `Loading`, with name and email prefilled from the store.
    pub fn mount(api: A, store: S, i18n: I18n, post_slug: &str) -> Self {
        let draft = ReplyDraft {
            name: store.get(AUTHOR_NAME_KEY).unwrap_or_default(),
            email: store.get(AUTHOR_EMAIL_KEY).unwrap_or_default(),
            ..ReplyDraft::default()
        };

        CommentThread {
            api,
            store,
            i18n,
            post_slug: post_slug.to_string(),
            state: ThreadState::Loading,
            generation: 0,
            max_reply_depth: None,
            draft,
        }
    }

    pub fn with_max_reply_depth(mut self, max_reply_depth: Option<usize>) -> Self {
        self.max_reply_depth = max_reply_depth;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn post_slug(&self) -> &str {
        &self.post_slug
    }

    pub fn state(&self) -> &ThreadState {
        &self.state
    }

    pub fn comments(&self) -> &[Comment] {
        self.state.comments()
    }

    pub fn i18n(&self) -> &I18n {
        &self.i18n
    }

    pub fn max_reply_depth(&self) -> Option<usize> {
        self.max_reply_depth
    }

    pub fn total_comments(&self) -> usize {
        count_all(self.comments())
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, ThreadState::Submitting(_))
    }

    /// Mirrors the disabled state of the send button.
    pub fn can_submit(&self) -> bool {
        !self.is_submitting()
            && !matches!(self.state, ThreadState::Loading)
            && !self.draft.name.is_empty()
            && !self.draft.email.is_empty()
            && !self.draft.content.is_empty()
    }

    /// The main form is hidden while a reply form is open.
    pub fn shows_main_form(&self) -> bool {
        self.draft.target.is_none()
    }

    /// Switches the view to another post. Anything still in flight for the
    /// previous post is ignored when it lands.
    pub fn set_post(&mut self, post_slug: &str) {
        self.post_slug = post_slug.to_string();
        self.generation += 1;
        self.state = ThreadState::Loading;
        self.draft.target = None;
        self.draft.content.clear();
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.state = ThreadState::Loading;
        LoadTicket {
            generation: self.generation,
            post_slug: self.post_slug.clone(),
        }
    }

    /// Applies a load result. Returns false when the ticket was superseded
    /// and the result got dropped.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<Vec<Comment>, ApiError>) -> bool {
        if ticket.generation != self.generation || ticket.post_slug != self.post_slug {
            debug!("Dropping stale comments for {} (generation {}, current {})",
                ticket.post_slug, ticket.generation, self.generation);
            return false;
        }

        self.state = match result {
            Ok(comments) => ThreadState::Loaded(comments),
            Err(e) => {
                error!("Error loading comments for {}: {}", ticket.post_slug, e);
                ThreadState::Failed {
                    message: self.i18n.t("comments.error.loadFailed").to_string(),
                    comments: vec![],
                }
            }
        };
        true
    }

    pub async fn load_comments(&mut self) {
        let ticket = self.begin_load();
        let result = self.api.fetch_comments(ticket.post_slug()).await;
        self.finish_load(ticket, result);
    }

    /// Opens the reply form under `comment_id`. Unknown comments and
    /// comments deeper than the reply limit are refused.
    pub fn start_reply(&mut self, comment_id: i64) -> bool {
        let Some((comment, depth)) = find_comment(self.comments(), comment_id) else {
            return false;
        };
        if let Some(max) = self.max_reply_depth {
            if depth >= max {
                return false;
            }
        }

        let target = ReplyTarget {
            comment_id,
            author_name: comment.author_name.clone(),
        };
        self.draft.target = Some(target);
        self.clear_error();
        true
    }

    pub fn cancel_reply(&mut self) {
        self.draft.target = None;
        self.draft.content.clear();
    }

    pub fn clear_error(&mut self) {
        if let ThreadState::Failed { .. } = self.state {
            let comments = self.state.take_comments();
            self.state = ThreadState::Loaded(comments);
        }
    }

    /// Sends the draft. On success the author is remembered, the whole tree
    /// is fetched again and the draft content and reply target are cleared.
    /// On failure the tree and the typed text stay as they were.
    pub async fn submit(&mut self) -> Result<(), CommentError> {
        if matches!(self.state, ThreadState::Loading | ThreadState::Submitting(_)) {
            return Err(CommentError::Busy);
        }

        let parent_id = self.draft.target.as_ref().map(|t| t.comment_id);
        let new_comment = validate_comment(
            &self.post_slug,
            &self.draft.name,
            &self.draft.email,
            &self.draft.content,
            parent_id,
        )?;

        let comments = self.state.take_comments();
        self.state = ThreadState::Submitting(comments);

        if let Err(e) = self.api.create_comment(&new_comment).await {
            let err = CommentError::from(e);
            error!("Error submitting comment for {}: {}", new_comment.post_slug, err);
            let comments = self.state.take_comments();
            self.state = ThreadState::Failed {
                message: err.localized(&self.i18n),
                comments,
            };
            return Err(err);
        }

        self.remember_author(&new_comment.author_name, &new_comment.author_email);
        self.load_comments().await;
        self.draft.content.clear();
        self.draft.target = None;
        Ok(())
    }

    fn remember_author(&mut self, name: &str, email: &str) {
        for (key, value) in [(AUTHOR_NAME_KEY, name), (AUTHOR_EMAIL_KEY, email)] {
            if let Err(e) = self.store.set(key, value) {
                warn!("Could not remember {}: {}", key, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::comments::model::test_tree::{comment, sample_tree};
    use crate::comments::model::NewComment;
    use crate::i18n::Lang;
    use crate::storage::MemoryStore;

    use super::*;

    #[derive(Default)]
    struct FakeApi {
        fetches: Mutex<VecDeque<Result<Vec<Comment>, ApiError>>>,
        creates: Mutex<VecDeque<Result<(), ApiError>>>,
        fetched: Mutex<Vec<String>>,
        created: Mutex<Vec<NewComment>>,
    }

    impl FakeApi {
        fn fetch_returns(self, result: Result<Vec<Comment>, ApiError>) -> Self {
            self.fetches.lock().unwrap().push_back(result);
            self
        }

        fn create_returns(self, result: Result<(), ApiError>) -> Self {
            self.creates.lock().unwrap().push_back(result);
            self
        }

        fn fetch_count(&self) -> usize {
            self.fetched.lock().unwrap().len()
        }

        fn created(&self) -> Vec<NewComment> {
            self.created.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CommentApi for FakeApi {
        async fn fetch_comments(&self, post_slug: &str) -> Result<Vec<Comment>, ApiError> {
            self.fetched.lock().unwrap().push(post_slug.to_string());
            self.fetches.lock().unwrap().pop_front().unwrap_or(Ok(vec![]))
        }

        async fn create_comment(&self, comment: &NewComment) -> Result<(), ApiError> {
            self.created.lock().unwrap().push(comment.clone());
            self.creates.lock().unwrap().pop_front().unwrap_or(Ok(()))
        }
    }

    fn thread(api: FakeApi) -> CommentThread<FakeApi, MemoryStore> {
        CommentThread::mount(api, MemoryStore::default(), I18n::new(Lang::En), "AI/example")
    }

    fn fill_draft(thread: &mut CommentThread<FakeApi, MemoryStore>, content: &str) {
        thread.draft.name = "Alice".to_string();
        thread.draft.email = "alice@example.com".to_string();
        thread.draft.content = content.to_string();
    }

    #[tokio::test]
    async fn test_load_success() {
        let mut thread = thread(FakeApi::default().fetch_returns(Ok(sample_tree())));
        assert_eq!(thread.state(), &ThreadState::Loading);

        thread.load_comments().await;
        assert_eq!(thread.state(), &ThreadState::Loaded(sample_tree()));
        assert_eq!(thread.total_comments(), 6);
        assert_eq!(thread.api().fetched.lock().unwrap().as_slice(), ["AI/example"]);
    }

    #[tokio::test]
    async fn test_load_failure_clears_tree() {
        let api = FakeApi::default()
            .fetch_returns(Ok(sample_tree()))
            .fetch_returns(Err(ApiError::Status { status: 500, message: None }));
        let mut thread = thread(api);

        thread.load_comments().await;
        thread.load_comments().await;
        assert!(thread.comments().is_empty());
        assert!(thread.state().error().unwrap().contains("server crashed"));
    }

    #[tokio::test]
    async fn test_prefills_author_from_store() {
        let mut store = MemoryStore::default();
        store.set(AUTHOR_NAME_KEY, "Bob").unwrap();
        store.set(AUTHOR_EMAIL_KEY, "bob@example.com").unwrap();

        let thread = CommentThread::mount(FakeApi::default(), store, I18n::default(), "AI/example");
        assert_eq!(thread.draft.name, "Bob");
        assert_eq!(thread.draft.email, "bob@example.com");
        assert!(thread.draft.content.is_empty());
    }

    #[test]
    fn test_stale_load_is_dropped() {
        let mut thread = thread(FakeApi::default());
        let first = thread.begin_load();
        thread.set_post("Snow/other");
        let second = thread.begin_load();

        let other_tree = vec![comment(9, None, "Zoe", vec![])];
        assert!(thread.finish_load(second, Ok(other_tree.clone())));
        assert!(!thread.finish_load(first, Ok(sample_tree())));
        assert_eq!(thread.comments(), other_tree.as_slice());
    }

    #[test]
    fn test_superseded_load_on_same_post_is_dropped() {
        let mut thread = thread(FakeApi::default());
        let first = thread.begin_load();
        let second = thread.begin_load();

        assert!(!thread.finish_load(first, Err(ApiError::Transport("late".to_string()))));
        assert_eq!(thread.state(), &ThreadState::Loading);
        assert!(thread.finish_load(second, Ok(sample_tree())));
        assert_eq!(thread.total_comments(), 6);
    }

    #[tokio::test]
    async fn test_submit_success_reloads_and_clears() {
        let mut updated = sample_tree();
        updated.push(comment(7, None, "Alice", vec![]));
        let api = FakeApi::default()
            .fetch_returns(Ok(sample_tree()))
            .fetch_returns(Ok(updated.clone()));
        let mut thread = thread(api);
        thread.load_comments().await;

        assert!(thread.start_reply(4));
        assert!(!thread.shows_main_form());
        fill_draft(&mut thread, "  nice post  ");
        thread.submit().await.unwrap();

        let created = thread.api().created();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].content, "nice post");
        assert_eq!(created[0].parent_id, Some(4));

        assert_eq!(thread.api().fetch_count(), 2);
        assert_eq!(thread.state(), &ThreadState::Loaded(updated));
        assert!(thread.draft.target.is_none());
        assert!(thread.shows_main_form());
        assert!(thread.draft.content.is_empty());
        assert_eq!(thread.draft.name, "Alice");
        assert_eq!(thread.store().get(AUTHOR_NAME_KEY).as_deref(), Some("Alice"));
        assert_eq!(thread.store().get(AUTHOR_EMAIL_KEY).as_deref(), Some("alice@example.com"));
    }

    #[tokio::test]
    async fn test_validation_error_makes_no_call() {
        let mut thread = thread(FakeApi::default().fetch_returns(Ok(sample_tree())));
        thread.load_comments().await;

        fill_draft(&mut thread, &"x".repeat(1001));
        let err = thread.submit().await.unwrap_err();
        assert!(matches!(err, CommentError::Invalid(_)));
        assert!(thread.api().created().is_empty());
        assert_eq!(thread.state(), &ThreadState::Loaded(sample_tree()));
        assert_eq!(thread.draft.content.len(), 1001);

        thread.draft.content = "x".repeat(1000);
        thread.submit().await.unwrap();
        assert_eq!(thread.api().created().len(), 1);
    }

    #[tokio::test]
    async fn test_rate_limited_keeps_tree_and_draft() {
        let api = FakeApi::default()
            .fetch_returns(Ok(sample_tree()))
            .create_returns(Err(ApiError::Status { status: 429, message: Some("Too many comments".to_string()) }));
        let mut thread = thread(api);
        thread.load_comments().await;
        fill_draft(&mut thread, "hello");

        let err = thread.submit().await.unwrap_err();
        assert_eq!(err, CommentError::RateLimited);
        assert_eq!(thread.comments(), sample_tree().as_slice());
        assert!(thread.state().error().unwrap().contains("wait a minute"));
        assert_eq!(thread.draft.content, "hello");
        assert_eq!(thread.api().fetch_count(), 1);
        assert!(thread.store().get(AUTHOR_NAME_KEY).is_none());
    }

    #[tokio::test]
    async fn test_server_error_message_is_shown() {
        let api = FakeApi::default()
            .fetch_returns(Ok(vec![]))
            .create_returns(Err(ApiError::Status { status: 400, message: Some("Parent comment not found".to_string()) }))
            .create_returns(Err(ApiError::Transport("connection refused".to_string())));
        let mut thread = thread(api);
        thread.load_comments().await;
        fill_draft(&mut thread, "hello");

        thread.submit().await.unwrap_err();
        assert_eq!(thread.state().error(), Some("Parent comment not found"));

        thread.submit().await.unwrap_err();
        assert_eq!(thread.state().error(), Some("Failed to submit comment"));
        assert_eq!(thread.draft.content, "hello");
    }

    #[tokio::test]
    async fn test_reply_targets() {
        let mut thread = thread(FakeApi::default().fetch_returns(Ok(sample_tree()))).with_max_reply_depth(Some(2));
        thread.load_comments().await;

        assert!(!thread.start_reply(42));
        assert!(thread.draft.target.is_none());

        assert!(!thread.start_reply(6));

        assert!(thread.start_reply(3));
        assert_eq!(thread.draft.target, Some(ReplyTarget { comment_id: 3, author_name: "Bob".to_string() }));

        assert!(thread.start_reply(2));
        assert_eq!(thread.draft.target.as_ref().unwrap().comment_id, 2);

        thread.draft.content = "half written".to_string();
        thread.cancel_reply();
        assert!(thread.draft.target.is_none());
        assert!(thread.draft.content.is_empty());
    }

    #[tokio::test]
    async fn test_start_reply_clears_error() {
        let api = FakeApi::default()
            .fetch_returns(Ok(sample_tree()))
            .create_returns(Err(ApiError::Status { status: 500, message: None }));
        let mut thread = thread(api);
        thread.load_comments().await;
        fill_draft(&mut thread, "hello");
        thread.submit().await.unwrap_err();
        assert!(thread.state().error().is_some());

        assert!(thread.start_reply(1));
        assert_eq!(thread.state(), &ThreadState::Loaded(sample_tree()));
    }

    #[tokio::test]
    async fn test_can_submit() {
        let mut thread = thread(FakeApi::default());
        fill_draft(&mut thread, "hello");
        assert!(!thread.can_submit());
        assert_eq!(thread.submit().await.unwrap_err(), CommentError::Busy);
        assert!(thread.api().created().is_empty());

        thread.load_comments().await;
        assert!(thread.can_submit());

        thread.draft.email.clear();
        assert!(!thread.can_submit());
    }
}
