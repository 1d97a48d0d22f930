use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

use crate::i18n::I18n;
use crate::post_index::PostSummary;
use crate::text_utils::format_post_date;

pub const LIST_TEMPLATE: &str = "{{{heading}}}

{{#post_list}}{{{date}}}  {{{title}}}
    {{{slug}}} · {{{category}}} · {{{read_time}}}{{#has_tags}} · #{{{tags}}}{{/has_tags}}
{{#has_description}}    {{{description}}}
{{/has_description}}
{{/post_list}}{{#empty}}{{{empty_text}}}
{{/empty}}{{#show_pagination}}{{{page_info}}}
{{/show_pagination}}";

#[derive(ramhorns::Content)]
struct ListPage {
    heading: String,
    post_list: Vec<PostItem>,
    empty: bool,
    empty_text: String,
    show_pagination: bool,
    page_info: String,
}

#[derive(ramhorns::Content)]
struct PostItem {
    date: String,
    slug: String,
    title: String,
    category: String,
    read_time: String,
    has_tags: bool,
    tags: String,
    has_description: bool,
    description: String,
}

pub struct ListRenderer<'a> {
    pub template: Template<'a>,
}

impl<'a> ListRenderer<'a> {
    pub fn new(list_tpl_src: &'a str) -> io::Result<ListRenderer<'a>> {
        let template = match Template::new(list_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing list template: {}", e)));
            }
        };

        Ok(ListRenderer {
            template,
        })
    }

    pub fn render(&self, heading: &str, posts: &[PostSummary], cur_page: u32, page_count: u32, i18n: &I18n) -> String {
        let post_list: Vec<PostItem> = posts.iter()
            .map(|post| PostItem {
                date: format_post_date(&post.date, i18n.lang),
                slug: post.slug.clone(),
                title: post.title.clone(),
                category: post.category.clone(),
                read_time: i18n.format("post.readTime", &[("minutes", &post.read_time.to_string())]),
                has_tags: !post.tags.is_empty(),
                tags: post.tags.join(" #"),
                has_description: !post.description.is_empty(),
                description: post.description.clone(),
            })
            .collect();

        let page_info = i18n.format("pagination.pageInfo", &[
            ("current", &cur_page.to_string()),
            ("total", &page_count.to_string()),
        ]);

        self.template.render(&ListPage {
            heading: heading.to_string(),
            empty: post_list.is_empty(),
            post_list,
            empty_text: i18n.t("posts.empty").to_string(),
            show_pagination: page_count > 1,
            page_info,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::i18n::Lang;

    use super::*;

    fn summary(slug: &str, tags: &[&str]) -> PostSummary {
        PostSummary {
            slug: slug.to_string(),
            title: format!("Title of {}", slug),
            date: NaiveDate::from_ymd_opt(2025, 11, 28).unwrap(),
            description: "A <short> description".to_string(),
            category: "AI4Everything".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            author: None,
            read_time: 3,
        }
    }

    #[test]
    fn test_render_list() {
        let renderer = ListRenderer::new(LIST_TEMPLATE).unwrap();
        let posts = vec![summary("AI4Everything/one", &["ai", "llm"]), summary("AI4Everything/two", &[])];
        let res = renderer.render("My Writing", &posts, 1, 2, &I18n::new(Lang::En));

        assert!(res.starts_with("My Writing\n"));
        assert!(res.contains("Nov 28, 2025  Title of AI4Everything/one"));
        assert!(res.contains("AI4Everything/one · AI4Everything · 3 min read · #ai #llm"));
        assert!(res.contains("A <short> description"));
        assert!(res.contains("Page 1 of 2"));
        assert!(!res.contains("No posts yet."));
        let one = res.find("Title of AI4Everything/one").unwrap();
        let two = res.find("Title of AI4Everything/two").unwrap();
        assert!(one < two);
    }

    #[test]
    fn test_render_empty_list() {
        let renderer = ListRenderer::new(LIST_TEMPLATE).unwrap();
        let res = renderer.render("我的文章", &[], 1, 0, &I18n::new(Lang::Zh));
        assert!(res.contains("暂无文章。"));
        assert!(!res.contains("第 1 页"));
    }
}
