use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

use crate::comments::api::CommentApi;
use crate::comments::model::Comment;
use crate::comments::thread::{CommentThread, ThreadState};
use crate::comments::validation::MAX_CONTENT_LEN;
use crate::i18n::I18n;
use crate::storage::KeyValueStore;
use crate::text_utils::format_comment_time;

pub const THREAD_TEMPLATE: &str = "{{{title}}}{{#has_comments}} ({{{total}}}){{/has_comments}}
{{#error}}! {{{message}}}
{{/error}}{{#rows}}{{#comment}}{{{indent}}}{{{author}}} · {{{time}}}{{#can_reply}} [{{{reply_label}}}]{{/can_reply}}
{{{indent}}}  {{{content}}}
{{/comment}}{{#form}}{{{indent}}}{{#has_target}}{{{reply_to}}} {{/has_target}}{{{name_label}}}: {{{name}}} | {{{email_label}}}: {{{email}}}
{{{indent}}}> {{{content}}}
{{{indent}}}{{{counter}}} [{{{send_label}}}]
{{/form}}{{/rows}}{{#loading}}{{{loading_text}}}
{{/loading}}{{#empty}}{{{empty_text}}}
{{/empty}}";

const INDENT: &str = "    ";

/// A comment with everything the view needs to know about it.
#[derive(Debug, PartialEq)]
pub struct CommentNode<'a> {
    pub comment: &'a Comment,
    pub depth: usize,
    pub can_reply: bool,
    pub show_reply_form: bool,
    /// The reply target is this comment or one of its descendants.
    pub contains_target: bool,
    pub replies: Vec<CommentNode<'a>>,
}

pub fn build_nodes<'a>(comments: &'a [Comment], reply_target: Option<i64>, max_reply_depth: Option<usize>) -> Vec<CommentNode<'a>> {
    fn build<'a>(comments: &'a [Comment], depth: usize, target: Option<i64>, max: Option<usize>) -> Vec<CommentNode<'a>> {
        comments.iter()
            .map(|comment| CommentNode {
                comment,
                depth,
                can_reply: max.map_or(true, |max| depth < max),
                show_reply_form: target == Some(comment.id),
                contains_target: target.is_some_and(|id| comment.contains(id)),
                replies: build(&comment.replies, depth + 1, target, max),
            })
            .collect()
    }

    build(comments, 0, reply_target, max_reply_depth)
}

#[derive(ramhorns::Content)]
struct ThreadPage {
    title: String,
    has_comments: bool,
    total: usize,
    error: Option<ErrorView>,
    rows: Vec<Row>,
    loading: bool,
    loading_text: String,
    empty: bool,
    empty_text: String,
}

#[derive(ramhorns::Content)]
struct ErrorView {
    message: String,
}

#[derive(ramhorns::Content)]
struct Row {
    comment: Option<CommentRow>,
    form: Option<FormView>,
}

#[derive(ramhorns::Content)]
struct CommentRow {
    indent: String,
    author: String,
    time: String,
    can_reply: bool,
    reply_label: String,
    content: String,
}

#[derive(ramhorns::Content)]
struct FormView {
    indent: String,
    has_target: bool,
    reply_to: String,
    name_label: String,
    name: String,
    email_label: String,
    email: String,
    content: String,
    counter: String,
    send_label: String,
}

pub struct ThreadRenderer<'a> {
    pub template: Template<'a>,
}

impl<'a> ThreadRenderer<'a> {
    pub fn new(thread_tpl_src: &'a str) -> io::Result<ThreadRenderer<'a>> {
        let template = match Template::new(thread_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing comment template: {}", e)));
            }
        };

        Ok(ThreadRenderer {
            template,
        })
    }

    pub fn render<A: CommentApi, S: KeyValueStore>(&self, thread: &CommentThread<A, S>) -> String {
        let i18n = thread.i18n();
        let target = thread.draft.target.as_ref().map(|t| t.comment_id);
        let nodes = build_nodes(thread.comments(), target, thread.max_reply_depth());

        let mut rows = vec![];
        if thread.shows_main_form() {
            rows.push(Row { comment: None, form: Some(form_view(thread, 0)) });
        }
        flatten(&nodes, thread, &mut rows);

        let loading = matches!(thread.state(), ThreadState::Loading);
        self.template.render(&ThreadPage {
            title: i18n.t("comments.title").to_string(),
            has_comments: thread.total_comments() > 0,
            total: thread.total_comments(),
            error: thread.state().error().map(|message| ErrorView { message: message.to_string() }),
            rows,
            loading,
            loading_text: i18n.t("comments.loading").to_string(),
            empty: !loading && thread.comments().is_empty(),
            empty_text: i18n.t("comments.empty").to_string(),
        })
    }
}

/// Pre-order: a comment, then its reply form when it is the target, then
/// its replies.
fn flatten<A: CommentApi, S: KeyValueStore>(nodes: &[CommentNode], thread: &CommentThread<A, S>, rows: &mut Vec<Row>) {
    let i18n = thread.i18n();
    for node in nodes {
        let indent = INDENT.repeat(node.depth);
        rows.push(Row {
            comment: Some(CommentRow {
                content: node.comment.content.replace('\n', &format!("\n{}  ", indent)),
                indent,
                author: node.comment.author_name.clone(),
                time: format_comment_time(&node.comment.created_at, i18n.lang),
                can_reply: node.can_reply,
                reply_label: i18n.t("comments.reply").to_string(),
            }),
            form: None,
        });
        if node.show_reply_form {
            rows.push(Row { comment: None, form: Some(form_view(thread, node.depth + 1)) });
        }
        flatten(&node.replies, thread, rows);
    }
}

fn form_view<A: CommentApi, S: KeyValueStore>(thread: &CommentThread<A, S>, depth: usize) -> FormView {
    let i18n: &I18n = thread.i18n();
    let draft = &thread.draft;
    let content = if draft.content.is_empty() {
        i18n.t("comments.placeholder").to_string()
    } else {
        draft.content.clone()
    };
    let send_label = if thread.is_submitting() {
        i18n.t("comments.sending")
    } else {
        i18n.t("comments.send")
    };

    FormView {
        indent: INDENT.repeat(depth),
        has_target: draft.target.is_some(),
        reply_to: draft.target.as_ref()
            .map(|t| i18n.format("comments.replyTo", &[("name", &t.author_name)]))
            .unwrap_or_default(),
        name_label: i18n.t("comments.name").to_string(),
        name: draft.name.clone(),
        email_label: i18n.t("comments.email").to_string(),
        email: draft.email.clone(),
        content,
        counter: i18n.format("comments.counter", &[
            ("count", &draft.content.chars().count().to_string()),
            ("max", &MAX_CONTENT_LEN.to_string()),
        ]),
        send_label: send_label.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use crate::comments::error::ApiError;
    use crate::comments::model::test_tree::sample_tree;
    use crate::comments::model::NewComment;
    use crate::i18n::Lang;
    use crate::storage::MemoryStore;

    use super::*;

    struct NoApi;

    #[async_trait]
    impl CommentApi for NoApi {
        async fn fetch_comments(&self, _post_slug: &str) -> Result<Vec<Comment>, ApiError> {
            Ok(vec![])
        }

        async fn create_comment(&self, _comment: &NewComment) -> Result<(), ApiError> {
            Ok(())
        }
    }

    fn loaded_thread(lang: Lang, comments: Vec<Comment>) -> CommentThread<NoApi, MemoryStore> {
        let mut thread = CommentThread::mount(NoApi, MemoryStore::default(), I18n::new(lang), "AI/example");
        let ticket = thread.begin_load();
        thread.finish_load(ticket, Ok(comments));
        thread
    }

    #[test]
    fn test_build_nodes() {
        let tree = sample_tree();
        let nodes = build_nodes(&tree, Some(6), Some(2));

        assert_eq!(nodes.len(), 2);
        assert!(nodes[0].contains_target);
        assert!(!nodes[1].contains_target);
        assert!(nodes[0].can_reply);

        let carol = &nodes[0].replies[1];
        assert_eq!(carol.depth, 1);
        assert!(carol.contains_target);
        assert!(!carol.show_reply_form);

        let dave = &carol.replies[0];
        assert_eq!(dave.depth, 2);
        assert!(dave.show_reply_form);
        assert!(!dave.can_reply);

        let unlimited = build_nodes(&tree, None, None);
        assert!(unlimited[0].replies[1].replies[0].can_reply);
        assert!(!unlimited[0].contains_target);
    }

    #[test]
    fn test_render_thread_with_main_form() {
        let renderer = ThreadRenderer::new(THREAD_TEMPLATE).unwrap();
        let thread = loaded_thread(Lang::En, sample_tree());
        let res = renderer.render(&thread);

        assert!(res.starts_with("Comments (6)\n"));
        assert!(res.contains("Name:  | Email: \n> Write your comment...\n0 / 1000 [Send]\n"));
        assert!(res.contains("Alice · December 3, 2025 at 11:30 AM [Reply]\n  comment 1\n"));
        assert!(res.contains("        Dave · December 3, 2025 at 11:30 AM [Reply]\n"));
        assert!(!res.contains("Reply to"));
        assert!(!res.contains("No comments yet"));

        let form = res.find("[Send]").unwrap();
        let alice = res.find("Alice").unwrap();
        assert!(form < alice);
    }

    #[test]
    fn test_reply_form_sits_under_its_target() {
        let renderer = ThreadRenderer::new(THREAD_TEMPLATE).unwrap();
        let mut thread = loaded_thread(Lang::En, sample_tree()).with_max_reply_depth(Some(2));
        assert!(thread.start_reply(4));
        thread.draft.content = "agreed".to_string();
        let res = renderer.render(&thread);

        assert_eq!(res.matches("[Send]").count(), 1);
        let carol = res.find("comment 4").unwrap();
        let form = res.find("Reply to @Carol").unwrap();
        let dave = res.find("comment 6").unwrap();
        let erin = res.find("comment 5").unwrap();
        assert!(carol < form && form < dave && dave < erin);

        assert!(res.contains("        Reply to @Carol Name:  | Email: \n        > agreed\n        6 / 1000 [Send]\n"));
        assert!(res.contains("        Dave · December 3, 2025 at 11:30 AM\n"));
    }

    #[test]
    fn test_render_loading_and_empty() {
        let renderer = ThreadRenderer::new(THREAD_TEMPLATE).unwrap();
        let mut thread = CommentThread::mount(NoApi, MemoryStore::default(), I18n::new(Lang::Zh), "AI/example");
        let ticket = thread.begin_load();

        let res = renderer.render(&thread);
        assert!(res.starts_with("评论\n"));
        assert!(res.contains("评论加载中..."));
        assert!(!res.contains("暂无评论"));

        thread.finish_load(ticket, Ok(vec![]));
        let res = renderer.render(&thread);
        assert!(res.starts_with("评论\n"));
        assert!(!res.contains("(0)"));
        assert!(res.contains("暂无评论，快来抢沙发！"));
        assert!(!res.contains("评论加载中"));
    }

    #[test]
    fn test_render_load_error() {
        let renderer = ThreadRenderer::new(THREAD_TEMPLATE).unwrap();
        let mut thread = CommentThread::mount(NoApi, MemoryStore::default(), I18n::new(Lang::En), "AI/example");
        let ticket = thread.begin_load();
        thread.finish_load(ticket, Err(ApiError::Transport("refused".to_string())));

        let res = renderer.render(&thread);
        assert!(res.contains("! This guy's server crashed"));
        let banner = res.find("! ").unwrap();
        let form = res.find("[Send]").unwrap();
        assert!(banner < form);
    }
}
