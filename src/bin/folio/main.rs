use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use spdlog::{debug, warn};

use folio::comments::{CommentThread, HttpCommentApi};
use folio::config::Config;
use folio::i18n::{I18n, Lang};
use folio::logger::configure_logger;
use folio::paginator::Paginator;
use folio::post_index::{IndexOptions, PostIndex};
use folio::post_list::PostList;
use folio::storage::FileStore;
use folio::view::comment_renderer::{ThreadRenderer, THREAD_TEMPLATE};
use folio::view::list_renderer::{ListRenderer, LIST_TEMPLATE};
use folio::view::post_renderer::{PostRenderer, NOT_FOUND_TEMPLATE, POST_TEMPLATE};
use folio::view::PageView;

use crate::config::open_config;

mod config;

const CFG_FILE_NAME: &str = "folio.toml";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Config path
    #[arg(short, long)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lists posts, newest first
    Posts {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        tag: Option<String>,
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        /// Prints the summaries as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Shows one post by its slug, e.g. AI4Everything/example-ai-post
    Post { slug: String },
    /// Lists categories with their post count
    Categories,
    /// Lists every tag in use
    Tags,
    /// Shows the comment thread of a post
    Comments {
        slug: String,
        /// Opens the reply form under this comment
        #[arg(long)]
        reply_to: Option<i64>,
    },
    /// Posts a comment. Name and email default to the last ones used
    Comment {
        slug: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        content: String,
        #[arg(long)]
        reply_to: Option<i64>,
    },
    /// Sets the interface language (en or zh)
    Lang { lang: Lang },
}

fn load_index(config: &Config) -> Result<PostIndex> {
    let documents = PostList::new(&config.paths.posts_dir).retrieve_documents()?;
    let options = IndexOptions {
        words_per_minute: config.defaults.words_per_minute(),
        default_author: config.defaults.author.clone(),
        ..IndexOptions::default()
    };
    Ok(PostIndex::build(documents, &options))
}

fn open_store(config: &Config) -> Result<FileStore> {
    let path = config.paths.storage_file.as_ref()
        .ok_or_else(|| anyhow!("No storage file configured"))?;
    debug!("Using storage file {}", path.display());
    Ok(FileStore::open(path)?)
}

fn comment_thread(config: &Config, store: FileStore, i18n: I18n, slug: &str) -> Result<CommentThread<HttpCommentApi, FileStore>> {
    let timeout = config.comments.timeout_secs.map(Duration::from_secs);
    let api = HttpCommentApi::new(&config.comments.api_base, timeout)?;
    Ok(CommentThread::mount(api, store, i18n, slug).with_max_reply_depth(config.comments.max_reply_depth))
}

fn list_posts(config: &Config, i18n: &I18n, category: Option<String>, tag: Option<String>, page: u32, json: bool) -> Result<()> {
    let index = load_index(config)?;
    let page_size = config.defaults.page_size;
    let list_renderer = ListRenderer::new(LIST_TEMPLATE)?;

    if let Some(category) = category {
        let view = index.category_view(&category, page, page_size);
        if json {
            let posts = match &view {
                PageView::Found(category_page) => category_page.posts.as_slice(),
                PageView::NotFound { .. } => &[][..],
            };
            println!("{}", serde_json::to_string_pretty(posts)?);
            return Ok(());
        }

        let post_renderer = PostRenderer::new(POST_TEMPLATE, NOT_FOUND_TEMPLATE)?;
        let text = post_renderer.render(&view, i18n, |category_page| {
            list_renderer.render(&category_page.display_name, &category_page.posts,
                                 category_page.page, category_page.page_count, i18n)
        });
        println!("{}", text.trim_end());
        return Ok(());
    }

    let (heading, posts) = match tag {
        Some(tag) => (format!("#{}", tag), index.filter_by_tag(&tag)),
        None => (i18n.t("posts.title").to_string(), index.posts().to_vec()),
    };
    let paginator = Paginator::from(&posts, page_size);
    let page_posts = paginator.get_page(page);

    if json {
        println!("{}", serde_json::to_string_pretty(page_posts)?);
    } else {
        println!("{}", list_renderer.render(&heading, page_posts, page, paginator.page_count(), i18n).trim_end());
    }
    Ok(())
}

fn show_post(config: &Config, i18n: &I18n, slug: &str) -> Result<()> {
    let index = load_index(config)?;
    let renderer = PostRenderer::new(POST_TEMPLATE, NOT_FOUND_TEMPLATE)?;
    println!("{}", renderer.render_post(&index.post_view(slug), i18n).trim_end());
    Ok(())
}

fn list_categories(config: &Config, i18n: &I18n) -> Result<()> {
    let index = load_index(config)?;
    println!("{}", i18n.t("nav.category"));
    for category in index.categories() {
        let count = i18n.format("category.postCount", &[("count", &category.count.to_string())]);
        println!("  {} ({}) · {}", category.display_name, category.name, count);
    }
    Ok(())
}

fn list_tags(config: &Config, i18n: &I18n) -> Result<()> {
    let index = load_index(config)?;
    println!("{}", i18n.t("tags.title"));
    for tag in index.all_tags() {
        println!("  #{}", tag);
    }
    Ok(())
}

async fn show_comments(config: &Config, store: FileStore, i18n: I18n, slug: &str, reply_to: Option<i64>) -> Result<()> {
    let mut thread = comment_thread(config, store, i18n, slug)?;
    thread.load_comments().await;
    if let Some(id) = reply_to {
        if !thread.start_reply(id) {
            warn!("Comment {} cannot be replied to", id);
        }
    }

    let renderer = ThreadRenderer::new(THREAD_TEMPLATE)?;
    println!("{}", renderer.render(&thread).trim_end());
    Ok(())
}

struct CommentArgs {
    name: Option<String>,
    email: Option<String>,
    content: String,
    reply_to: Option<i64>,
}

async fn post_comment(config: &Config, store: FileStore, i18n: I18n, slug: &str, args: CommentArgs) -> Result<()> {
    let mut thread = comment_thread(config, store, i18n, slug)?;
    thread.load_comments().await;

    if let Some(id) = args.reply_to {
        if !thread.start_reply(id) {
            bail!("Comment {} cannot be replied to", id);
        }
    }
    if let Some(name) = args.name {
        thread.draft.name = name;
    }
    if let Some(email) = args.email {
        thread.draft.email = email;
    }
    thread.draft.content = args.content;

    let result = thread.submit().await;
    let renderer = ThreadRenderer::new(THREAD_TEMPLATE)?;
    println!("{}", renderer.render(&thread).trim_end());

    if let Err(e) = result {
        bail!(e.localized(thread.i18n()));
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config_path = args.config_path.map(PathBuf::from);

    let config = match open_config(config_path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            eprintln!("Please run folio --help");
            return Ok(());
        }
    };

    if let Err(err) = configure_logger(&config) {
        warn!("Error creating logger sinks. Using console instead. Desc={}", err);
    }

    let mut store = open_store(&config)?;
    let i18n = I18n::from_store(&store, config.defaults.lang.unwrap_or_default());

    match args.command {
        Command::Posts { category, tag, page, json } => list_posts(&config, &i18n, category, tag, page, json),
        Command::Post { slug } => show_post(&config, &i18n, &slug),
        Command::Categories => list_categories(&config, &i18n),
        Command::Tags => list_tags(&config, &i18n),
        Command::Comments { slug, reply_to } => show_comments(&config, store, i18n, &slug, reply_to).await,
        Command::Comment { slug, name, email, content, reply_to } => {
            let args = CommentArgs { name, email, content, reply_to };
            post_comment(&config, store, i18n, &slug, args).await
        }
        Command::Lang { lang } => {
            I18n::new(lang).persist(&mut store)?;
            println!("{}", lang);
            Ok(())
        }
    }
}
