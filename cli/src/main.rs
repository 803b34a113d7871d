//! textblob CLI - render content snapshots to HTML, text, and JSON

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use textblob::{
    ContentSource, FetchOptions, PageOutcome, RenderOptions, RenderedPage, Site, SiteConfig,
    SnapshotSource,
};

#[derive(Parser)]
#[command(name = "textblob")]
#[command(version)]
#[command(about = "Render Notion content snapshots to HTML, text, and JSON", long_about = None)]
struct Cli {
    /// Snapshot file with pages, block children and databases
    #[arg(
        short,
        long,
        global = true,
        value_name = "FILE",
        env = "TEXTBLOB_SNAPSHOT",
        default_value = "content.json"
    )]
    snapshot: PathBuf,

    #[command(flatten)]
    site: SiteArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SiteArgs {
    /// Page id of the experience page
    #[arg(long, global = true, env = "TEXTBLOB_EXPERIENCE_PAGE_ID")]
    experience_page: Option<String>,

    /// Page id of the publications page
    #[arg(long, global = true, env = "TEXTBLOB_PUBLICATIONS_PAGE_ID")]
    publications_page: Option<String>,

    /// Database id holding posts
    #[arg(long, global = true, env = "TEXTBLOB_WRITING_DATABASE_ID")]
    writing_db: Option<String>,

    /// Database id holding book notes
    #[arg(long, global = true, env = "TEXTBLOB_BOOKSHELF_DATABASE_ID")]
    bookshelf_db: Option<String>,

    /// Heading text that opens the news section
    #[arg(long, global = true, default_value = "Recent News")]
    news_label: String,

    /// Rows shown before a table scrolls
    #[arg(long, global = true, default_value_t = 3)]
    visible_rows: usize,

    /// Fail on the first source error instead of truncating
    #[arg(long, global = true)]
    strict: bool,

    /// Resolve children one block at a time
    #[arg(long, global = true)]
    sequential: bool,
}

#[derive(Args)]
struct OutputArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "html")]
    format: Format,

    /// Output file (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output compact JSON
    #[arg(long)]
    compact: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render any page by id
    Render {
        /// Page id
        #[arg(value_name = "PAGE_ID")]
        page_id: String,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Render the experience page
    Experience {
        #[command(flatten)]
        out: OutputArgs,
    },

    /// Render the publications page
    Publications {
        #[command(flatten)]
        out: OutputArgs,
    },

    /// Render a post by its numeric id
    Post {
        /// Post id
        #[arg(value_name = "POST_ID")]
        post_id: i64,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Render book notes by slug
    Book {
        /// Book slug
        #[arg(value_name = "SLUG")]
        slug: String,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// List posts in the writing database
    Posts {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Show rendering statistics for a page
    Info {
        /// Page id
        #[arg(value_name = "PAGE_ID")]
        page_id: String,
    },

    /// Render every configured page and post to a directory
    Export {
        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = "site")]
        output: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Format {
    /// HTML fragment
    Html,
    /// Plain text
    Text,
    /// Rendered document as JSON
    Json,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Version => {
            cmd_version();
            Ok(())
        }
        command => open_site(&cli.snapshot, &cli.site).and_then(|site| run(&site, command)),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn open_site(
    snapshot: &Path,
    args: &SiteArgs,
) -> Result<Site<SnapshotSource>, Box<dyn std::error::Error>> {
    let source = SnapshotSource::from_path(snapshot)?;

    let mut fetch = FetchOptions::new();
    if args.strict {
        fetch = fetch.strict();
    }
    if args.sequential {
        fetch = fetch.sequential();
    }

    let mut config = SiteConfig::new()
        .with_render_options(
            RenderOptions::new()
                .with_news_label(args.news_label.clone())
                .with_visible_rows(args.visible_rows),
        )
        .with_fetch_options(fetch);
    if let Some(id) = &args.experience_page {
        config = config.with_experience_page(id.clone());
    }
    if let Some(id) = &args.publications_page {
        config = config.with_publications_page(id.clone());
    }
    if let Some(id) = &args.writing_db {
        config = config.with_writing_database(id.clone());
    }
    if let Some(id) = &args.bookshelf_db {
        config = config.with_bookshelf_database(id.clone());
    }

    Ok(Site::new(source, config))
}

fn run(site: &Site<SnapshotSource>, command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Render { page_id, out } => write_page(&site.page(&page_id)?, &out),
        Commands::Experience { out } => write_page(&site.experience()?, &out),
        Commands::Publications { out } => write_page(&site.publications()?, &out),
        Commands::Post { post_id, out } => match site.post(post_id)? {
            PageOutcome::Found(page) => write_page(&page, &out),
            PageOutcome::NotFound => Err(format!("Post {} not found", post_id).into()),
        },
        Commands::Book { slug, out } => match site.book_notes(&slug)? {
            PageOutcome::Found(page) => write_page(&page, &out),
            PageOutcome::NotFound => Err(format!("Book notes '{}' not found", slug).into()),
        },
        Commands::Posts { json } => cmd_posts(site, json),
        Commands::Info { page_id } => cmd_info(site, &page_id),
        Commands::Export { output } => cmd_export(site, &output),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    }
}

fn format_page(
    page: &RenderedPage,
    out: &OutputArgs,
) -> Result<String, Box<dyn std::error::Error>> {
    let content = match out.format {
        Format::Html => page.to_html(),
        Format::Text => page.to_text(),
        Format::Json if out.compact => serde_json::to_string(page)?,
        Format::Json => serde_json::to_string_pretty(page)?,
    };
    Ok(content)
}

fn write_page(page: &RenderedPage, out: &OutputArgs) -> Result<(), Box<dyn std::error::Error>> {
    let content = format_page(page, out)?;

    if let Some(path) = &out.output {
        fs::write(path, &content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }

    Ok(())
}

fn cmd_posts(site: &Site<SnapshotSource>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let posts = site.posts()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&posts)?);
        return Ok(());
    }

    println!("{}", "Writing".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for post in &posts {
        println!(
            "{:>4}  {}  {}",
            post.post_id.to_string().bold(),
            post.date.format("%Y-%m-%d").to_string().dimmed(),
            post.title
        );
        if !post.subtitle.is_empty() {
            println!("            {}", post.subtitle.italic());
        }
    }
    println!("\n{} posts", posts.len());

    Ok(())
}

fn cmd_info(site: &Site<SnapshotSource>, page_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let page = site.page(page_id)?;
    let stats = &page.stats;

    println!("{}", "Page Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Page".bold(), page_id);
    println!("{}: {}", "Source".bold(), site.source().name());
    println!("{}: {}", "Blocks".bold(), stats.block_count);
    println!("{}: {}", "Rendered".bold(), page.document.len());

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Paragraphs".bold(), stats.paragraph_count);
    println!("{}: {}", "Headings".bold(), stats.heading_count);
    println!("{}: {}", "List items".bold(), stats.list_item_count);
    println!("{}: {}", "Dividers".bold(), stats.divider_count);
    println!(
        "{}: {} ({} rows, {} scrollable)",
        "Tables".bold(),
        stats.table_count,
        stats.table_row_count,
        stats.scrollable_table_count
    );
    println!("{}: {}", "Skipped".bold(), stats.skipped_count);
    println!("{}: {}", "Words".bold(), stats.word_count);

    Ok(())
}

fn cmd_export(site: &Site<SnapshotSource>, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = site.config();
    let posts = if config.writing_database_id.is_some() {
        site.posts()?
    } else {
        Vec::new()
    };

    let static_pages: Vec<&str> = [
        config.experience_page_id.as_ref().map(|_| "experience"),
        config.publications_page_id.as_ref().map(|_| "publications"),
    ]
    .into_iter()
    .flatten()
    .collect();

    fs::create_dir_all(output)?;

    let pb = ProgressBar::new((static_pages.len() + posts.len()) as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    for name in &static_pages {
        pb.set_message(format!("Rendering {}...", name));
        let page = if *name == "experience" {
            site.experience()?
        } else {
            site.publications()?
        };
        fs::write(output.join(format!("{}.html", name)), page.to_html())?;
        pb.inc(1);
    }

    if !posts.is_empty() {
        let writing_dir = output.join("writing");
        fs::create_dir_all(&writing_dir)?;
        for post in &posts {
            pb.set_message(format!("Rendering post {}...", post.post_id));
            match site.post(post.post_id)? {
                PageOutcome::Found(page) => {
                    fs::write(writing_dir.join(format!("{}.html", post.post_id)), page.to_html())?;
                }
                PageOutcome::NotFound => {
                    log::warn!("Post {} disappeared during export", post.post_id);
                }
            }
            pb.inc(1);
        }
        fs::write(writing_dir.join("index.json"), serde_json::to_string_pretty(&posts)?)?;
    }

    pb.finish_with_message("Done!");

    println!("\n{}", "Output files:".green().bold());
    for name in &static_pages {
        println!("  {} {}.html", "├─".dimmed(), name);
    }
    println!("  {} writing/ ({} posts)", "└─".dimmed(), posts.len());

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "textblob".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Notion content block renderer");
    println!();
    println!("License: MIT");
}
