use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

use crate::i18n::I18n;
use crate::text_utils::format_post_date;
use crate::view::{PageView, PostDetail, BLOGS_LINK};

pub const POST_TEMPLATE: &str = "{{{title}}}
{{{date}}} · {{{category}}} · {{{read_time}}}{{#has_author}} · {{{author}}}{{/has_author}}
{{#has_tags}}#{{{tags}}}
{{/has_tags}}{{#has_description}}
{{{description}}}
{{/has_description}}
{{#neighbors}}{{{label}}}: {{{title}}} ({{{slug}}})
{{/neighbors}}{{{back_label}}}: {{{back_link}}}
";

pub const NOT_FOUND_TEMPLATE: &str = "{{{message}}}
{{{back_label}}}: {{{back_link}}}
";

#[derive(ramhorns::Content)]
struct ViewItem {
    title: String,
    date: String,
    category: String,
    read_time: String,
    has_author: bool,
    author: String,
    has_tags: bool,
    tags: String,
    has_description: bool,
    description: String,
    neighbors: Vec<ViewNeighbor>,
    back_label: String,
    back_link: String,
}

#[derive(ramhorns::Content)]
struct ViewNeighbor {
    label: String,
    title: String,
    slug: String,
}

#[derive(ramhorns::Content)]
struct NotFoundItem {
    message: String,
    back_label: String,
    back_link: String,
}

pub struct PostRenderer<'a> {
    pub template: Template<'a>,
    pub not_found_template: Template<'a>,
}

fn parse_template<'a>(src: &'a str, name: &str) -> io::Result<Template<'a>> {
    Template::new(src)
        .map_err(|e| io::Error::new(ErrorKind::InvalidInput, format!("Error parsing {} template: {}", name, e)))
}

impl<'a> PostRenderer<'a> {
    pub fn new(view_tpl_src: &'a str, not_found_tpl_src: &'a str) -> io::Result<PostRenderer<'a>> {
        Ok(PostRenderer {
            template: parse_template(view_tpl_src, "post view")?,
            not_found_template: parse_template(not_found_tpl_src, "not found")?,
        })
    }

    pub fn render<T>(&self, view: &PageView<T>, i18n: &I18n, found: impl FnOnce(&T) -> String) -> String {
        match view {
            PageView::Found(item) => found(item),
            PageView::NotFound { message_key, back_link } => {
                let back_label = if *back_link == BLOGS_LINK {
                    i18n.t("post.backToBlogs")
                } else {
                    i18n.t("category.backToCategories")
                };
                self.not_found_template.render(&NotFoundItem {
                    message: i18n.t(message_key).to_string(),
                    back_label: back_label.to_string(),
                    back_link: back_link.to_string(),
                })
            }
        }
    }

    pub fn render_post(&self, view: &PageView<PostDetail>, i18n: &I18n) -> String {
        self.render(view, i18n, |detail| self.render_detail(detail, i18n))
    }

    fn render_detail(&self, detail: &PostDetail, i18n: &I18n) -> String {
        let post = detail.post;
        let mut neighbors = vec![];
        if let Some(previous) = detail.previous {
            neighbors.push(ViewNeighbor {
                label: i18n.t("post.previousPost").to_string(),
                title: previous.title.clone(),
                slug: previous.slug.clone(),
            });
        }
        if let Some(next) = detail.next {
            neighbors.push(ViewNeighbor {
                label: i18n.t("post.nextPost").to_string(),
                title: next.title.clone(),
                slug: next.slug.clone(),
            });
        }

        self.template.render(&ViewItem {
            title: post.title.clone(),
            date: format_post_date(&post.date, i18n.lang),
            category: post.category.clone(),
            read_time: i18n.format("post.readTime", &[("minutes", &post.read_time.to_string())]),
            has_author: post.author.is_some(),
            author: post.author.clone().unwrap_or_default(),
            has_tags: !post.tags.is_empty(),
            tags: post.tags.join(" #"),
            has_description: !post.description.is_empty(),
            description: post.description.clone(),
            neighbors,
            back_label: i18n.t("post.backToBlogs").to_string(),
            back_link: BLOGS_LINK.to_string(),
        })
    }
}
