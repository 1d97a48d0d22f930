use crate::post_index::PostSummary;

pub mod comment_renderer;
pub mod list_renderer;
pub mod post_renderer;

pub const BLOGS_LINK: &str = "/blogs";
pub const CATEGORIES_LINK: &str = "/category";

/// A page either has its content or tells the reader where to go back to.
#[derive(Debug, PartialEq)]
pub enum PageView<T> {
    Found(T),
    NotFound {
        message_key: &'static str,
        back_link: &'static str,
    },
}

impl<T> PageView<T> {
    pub fn post_not_found() -> Self {
        PageView::NotFound {
            message_key: "post.notFound",
            back_link: BLOGS_LINK,
        }
    }

    pub fn category_not_found() -> Self {
        PageView::NotFound {
            message_key: "category.notFound",
            back_link: CATEGORIES_LINK,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, PageView::Found(_))
    }
}

#[derive(Debug, PartialEq)]
pub struct PostDetail<'a> {
    pub post: &'a PostSummary,
    /// Newer post, if any.
    pub previous: Option<&'a PostSummary>,
    /// Older post, if any.
    pub next: Option<&'a PostSummary>,
}

#[derive(Debug, PartialEq)]
pub struct CategoryPage {
    pub name: String,
    pub display_name: String,
    pub total: usize,
    pub page: u32,
    pub page_count: u32,
    pub posts: Vec<PostSummary>,
}
