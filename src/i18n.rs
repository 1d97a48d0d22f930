use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use lazy_static::lazy_static;
use serde::Deserialize;
use spdlog::warn;

use crate::storage::KeyValueStore;

pub const LANG_KEY: &str = "lang";

#[derive(Deserialize, Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    En,
    Zh,
}

impl Display for Lang {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Lang::En => write!(f, "en"),
            Lang::Zh => write!(f, "zh"),
        }
    }
}

impl FromStr for Lang {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Lang::En),
            "zh" => Ok(Lang::Zh),
            other => Err(format!("Unsupported language {}", other)),
        }
    }
}

const EN: &[(&str, &str)] = &[
    ("nav.home", "Home"),
    ("nav.posts", "Blogs"),
    ("nav.projects", "Projects"),
    ("nav.category", "Category"),
    ("nav.category.desc", "Browse posts by category"),
    ("nav.about", "About"),
    ("pagination.previous", "Previous"),
    ("pagination.next", "Next"),
    ("pagination.pageInfo", "Page {current} of {total}"),
    ("posts.title", "My Writing"),
    ("posts.empty", "No posts yet."),
    ("post.readTime", "{minutes} min read"),
    ("post.previousPost", "Previous post"),
    ("post.nextPost", "Next post"),
    ("post.backToBlogs", "Back to blogs"),
    ("post.notFound", "Post not found"),
    ("category.notFound", "Category not found"),
    ("category.backToCategories", "Back to categories"),
    ("category.postCount", "{count} posts"),
    ("tags.title", "Tags"),
    ("comments.title", "Comments"),
    ("comments.empty", "No comments yet. Be the first to comment!"),
    ("comments.loading", "Loading comments..."),
    ("comments.name", "Name"),
    ("comments.email", "Email"),
    ("comments.placeholder", "Write your comment..."),
    ("comments.reply", "Reply"),
    ("comments.replyTo", "Reply to @{name}"),
    ("comments.send", "Send"),
    ("comments.sending", "Sending..."),
    ("comments.counter", "{count} / {max}"),
    ("comments.error.required", "Please fill in all fields"),
    ("comments.error.nameTooLong", "Name must be at most {max} characters"),
    ("comments.error.emailTooLong", "Email must be at most {max} characters"),
    ("comments.error.contentTooLong", "Comment must be at most {max} characters"),
    ("comments.error.rateLimited", "Too many comments. Please wait a minute before trying again."),
    ("comments.error.submitFailed", "Failed to submit comment"),
    ("comments.error.busy", "Please wait a moment and try again"),
    ("comments.error.loadFailed", "This guy's server crashed and didn't even know it, go remind him to maintain it!"),
];

const ZH: &[(&str, &str)] = &[
    ("nav.home", "首页"),
    ("nav.posts", "博客"),
    ("nav.projects", "项目"),
    ("nav.category", "分类"),
    ("nav.category.desc", "浏览文章分类"),
    ("nav.about", "关于"),
    ("pagination.previous", "上一页"),
    ("pagination.next", "下一页"),
    ("pagination.pageInfo", "第 {current} 页，共 {total} 页"),
    ("posts.title", "我的文章"),
    ("posts.empty", "暂无文章。"),
    ("post.readTime", "{minutes} 分钟阅读"),
    ("post.previousPost", "上一篇"),
    ("post.nextPost", "下一篇"),
    ("post.backToBlogs", "返回博客列表"),
    ("post.notFound", "文章不存在"),
    ("category.notFound", "分类不存在"),
    ("category.backToCategories", "返回分类列表"),
    ("category.postCount", "{count} 篇文章"),
    ("tags.title", "标签"),
    ("comments.title", "评论"),
    ("comments.empty", "暂无评论，快来抢沙发！"),
    ("comments.loading", "评论加载中..."),
    ("comments.name", "昵称"),
    ("comments.email", "邮箱"),
    ("comments.placeholder", "写下你的评论..."),
    ("comments.reply", "回复"),
    ("comments.replyTo", "回复 @{name}"),
    ("comments.send", "发送"),
    ("comments.sending", "发送中..."),
    ("comments.counter", "{count} / {max}"),
    ("comments.error.required", "请填写所有必填字段"),
    ("comments.error.nameTooLong", "昵称不能超过 {max} 个字符"),
    ("comments.error.emailTooLong", "邮箱不能超过 {max} 个字符"),
    ("comments.error.contentTooLong", "评论不能超过 {max} 个字符"),
    ("comments.error.rateLimited", "操作太频繁，请一分钟后再试"),
    ("comments.error.submitFailed", "评论提交失败"),
    ("comments.error.busy", "请稍候再试"),
    ("comments.error.loadFailed", "这家伙服务器崩了都不知道，快去提醒他维护！"),
];

lazy_static! {
    static ref TRANSLATIONS: HashMap<Lang, HashMap<&'static str, &'static str>> = {
        let mut m = HashMap::new();
        m.insert(Lang::En, EN.iter().copied().collect());
        m.insert(Lang::Zh, ZH.iter().copied().collect());
        m
    };
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct I18n {
    pub lang: Lang,
}

impl I18n {
    pub fn new(lang: Lang) -> Self {
        I18n { lang }
    }

    /// Reads the persisted `lang` key, falling back to `default` when it is
    /// missing or holds an unknown value.
    pub fn from_store<S: KeyValueStore + ?Sized>(store: &S, default: Lang) -> Self {
        let lang = match store.get(LANG_KEY) {
            Some(saved) => saved.parse().unwrap_or_else(|e| {
                warn!("Ignoring stored language: {}", e);
                default
            }),
            None => default,
        };
        I18n { lang }
    }

    pub fn persist<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> std::io::Result<()> {
        store.set(LANG_KEY, &self.lang.to_string())
    }

    /// Missing keys resolve to the key itself.
    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        TRANSLATIONS.get(&self.lang)
            .and_then(|table| table.get(key).copied())
            .unwrap_or(key)
    }

    pub fn format(&self, key: &str, args: &[(&str, &str)]) -> String {
        let mut text = self.t(key).to_string();
        for (name, value) in args {
            text = text.replace(&format!("{{{}}}", name), value);
        }
        text
    }
}
