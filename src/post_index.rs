use std::collections::{BTreeSet, HashMap};
use std::io;
use std::io::ErrorKind;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;
use spdlog::{info, warn};

use crate::content::front_matter::parse_document;
use crate::content::ContentFormat;
use crate::paginator::Paginator;
use crate::text_utils::{format_category_name, parse_date, read_time_minutes, split_date_prefix, today};
use crate::view::{CategoryPage, PageView, PostDetail};

pub const UNCATEGORIZED: &str = "Uncategorized";

/// One raw content file as it was found, before any parsing.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub path: String,
    pub raw: String,
}

impl SourceDocument {
    pub fn new(path: impl Into<String>, raw: impl Into<String>) -> Self {
        SourceDocument {
            path: path.into(),
            raw: raw.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
    pub author: Option<String>,
    pub read_time: u32,
}

#[derive(Debug, Clone)]
pub struct IndexOptions {
    pub today: NaiveDate,
    pub words_per_minute: u32,
    pub default_author: Option<String>,
}

impl Default for IndexOptions {
    fn default() -> Self {
        IndexOptions {
            today: today(),
            words_per_minute: crate::config::DEFAULT_WORDS_PER_MINUTE,
            default_author: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryInfo {
    pub name: String,
    pub display_name: String,
    pub count: usize,
}

fn summarize(document: &SourceDocument, options: &IndexOptions) -> io::Result<PostSummary> {
    let path = Path::new(&document.path);
    if ContentFormat::guess(path).is_none() {
        return Err(io::Error::new(ErrorKind::Unsupported, "Not a markdown document"));
    }

    let file_stem = path.file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| io::Error::new(ErrorKind::InvalidInput, "Invalid post file name"))?;

    let dir_category = path.parent()
        .and_then(|parent| parent.file_name())
        .and_then(|name| name.to_str())
        .unwrap_or(UNCATEGORIZED);

    let (path_date, slug) = match split_date_prefix(file_stem) {
        Some((date, slug)) => (date, slug),
        None => (options.today, file_stem),
    };

    let parsed = parse_document(&document.raw)?;
    let front_matter = parsed.front_matter.unwrap_or_default();

    let date = match front_matter.date.as_deref() {
        Some(date) => parse_date(date).map_err(|e| io::Error::new(ErrorKind::InvalidData, e))?,
        None => path_date,
    };

    Ok(PostSummary {
        slug: format!("{}/{}", dir_category, slug),
        title: front_matter.title.clone().unwrap_or_else(|| file_stem.to_string()),
        date,
        description: front_matter.description.clone().unwrap_or_default(),
        category: front_matter.category.clone().unwrap_or_else(|| dir_category.to_string()),
        tags: front_matter.tags(),
        author: front_matter.author.clone().or_else(|| options.default_author.clone()),
        read_time: read_time_minutes(&parsed.body, options.words_per_minute),
    })
}

/// Builds the summaries newest first. Documents that fail to parse are
/// logged and left out; equal dates keep their enumeration order.
pub fn build_index_with<I>(documents: I, options: &IndexOptions) -> Vec<PostSummary>
where
    I: IntoIterator<Item = SourceDocument>,
{
    let mut posts: Vec<PostSummary> = documents.into_iter()
        .filter_map(|document| match summarize(&document, options) {
            Ok(post) => Some(post),
            Err(e) => {
                warn!("Skipping post {}: {}", document.path, e);
                None
            }
        })
        .collect();

    posts.sort_by(|a, b| b.date.cmp(&a.date));
    posts
}

pub fn build_index_at<I>(documents: I, today: NaiveDate) -> Vec<PostSummary>
where
    I: IntoIterator<Item = SourceDocument>,
{
    let options = IndexOptions {
        today,
        ..IndexOptions::default()
    };
    build_index_with(documents, &options)
}

pub fn build_index<I>(documents: I) -> Vec<PostSummary>
where
    I: IntoIterator<Item = SourceDocument>,
{
    build_index_with(documents, &IndexOptions::default())
}

pub fn filter_by_category(posts: &[PostSummary], category: &str) -> Vec<PostSummary> {
    posts.iter().filter(|post| post.category == category).cloned().collect()
}

pub fn filter_by_tag(posts: &[PostSummary], tag: &str) -> Vec<PostSummary> {
    posts.iter().filter(|post| post.tags.iter().any(|t| t == tag)).cloned().collect()
}

pub fn count_by_category(posts: &[PostSummary]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for post in posts {
        *counts.entry(post.category.clone()).or_insert(0) += 1;
    }
    counts
}

pub fn all_tags(posts: &[PostSummary]) -> Vec<String> {
    let tags: BTreeSet<&String> = posts.iter().flat_map(|post| post.tags.iter()).collect();
    tags.into_iter().cloned().collect()
}

pub fn categories(posts: &[PostSummary]) -> Vec<CategoryInfo> {
    let mut categories: Vec<CategoryInfo> = count_by_category(posts).into_iter()
        .map(|(name, count)| CategoryInfo {
            display_name: format_category_name(&name),
            name,
            count,
        })
        .collect();
    categories.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    categories
}

/// The built index plus a slug lookup for the detail pages.
pub struct PostIndex {
    posts: Vec<PostSummary>,
    slug_to_pos: HashMap<String, usize>,
}

impl PostIndex {
    pub fn new(posts: Vec<PostSummary>) -> Self {
        let mut slug_to_pos = HashMap::with_capacity(posts.len());
        for (pos, post) in posts.iter().enumerate() {
            if slug_to_pos.insert(post.slug.clone(), pos).is_some() {
                warn!("Duplicate post slug {}, the last one wins", post.slug);
            }
        }

        PostIndex { posts, slug_to_pos }
    }

    pub fn build(documents: Vec<SourceDocument>, options: &IndexOptions) -> Self {
        let document_count = documents.len();
        let index = Self::new(build_index_with(documents, options));
        info!("Indexed {} posts out of {} documents", index.len(), document_count);
        index
    }

    pub fn posts(&self) -> &[PostSummary] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn get(&self, slug: &str) -> Option<&PostSummary> {
        self.slug_to_pos.get(slug).map(|pos| &self.posts[*pos])
    }

    /// Newer and older neighbours of a post in the date ordering.
    pub fn neighbors(&self, slug: &str) -> (Option<&PostSummary>, Option<&PostSummary>) {
        let Some(&pos) = self.slug_to_pos.get(slug) else {
            return (None, None);
        };
        let previous = pos.checked_sub(1).and_then(|p| self.posts.get(p));
        let next = self.posts.get(pos + 1);
        (previous, next)
    }

    pub fn filter_by_category(&self, category: &str) -> Vec<PostSummary> {
        filter_by_category(&self.posts, category)
    }

    pub fn filter_by_tag(&self, tag: &str) -> Vec<PostSummary> {
        filter_by_tag(&self.posts, tag)
    }

    pub fn count_by_category(&self) -> HashMap<String, usize> {
        count_by_category(&self.posts)
    }

    pub fn all_tags(&self) -> Vec<String> {
        all_tags(&self.posts)
    }

    pub fn categories(&self) -> Vec<CategoryInfo> {
        categories(&self.posts)
    }

    pub fn post_view(&self, slug: &str) -> PageView<PostDetail<'_>> {
        match self.get(slug) {
            Some(post) => {
                let (previous, next) = self.neighbors(slug);
                PageView::Found(PostDetail { post, previous, next })
            }
            None => PageView::post_not_found(),
        }
    }

    pub fn category_view(&self, category: &str, page: u32, page_size: u32) -> PageView<CategoryPage> {
        let posts = self.filter_by_category(category);
        if posts.is_empty() {
            return PageView::category_not_found();
        }

        let paginator = Paginator::from(&posts, page_size);
        let page_count = paginator.page_count();
        let page_posts = paginator.get_page(page).to_vec();

        PageView::Found(CategoryPage {
            name: category.to_string(),
            display_name: format_category_name(category),
            total: posts.len(),
            page,
            page_count,
            posts: page_posts,
        })
    }
}
