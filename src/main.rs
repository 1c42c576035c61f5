// src/main.rs
use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use prismic_blog::output::{deliver_all, DeliveryTarget, OutputPlan};
use prismic_blog::{
    format_display_date, generate_site, render_post_on_demand, AppError, Command,
    CommandLineInput, ContentSource, Cursor, PageRenderer, PostListing, PrismicHttpClient,
    RenderedPage, SiteConfig,
};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("prismic_blog.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    // stdout carries page output, so logs go to stderr
    let console_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] {t} - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("console", Box::new(console_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("console")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

fn content_source(config: &SiteConfig) -> Result<Arc<dyn ContentSource>, AppError> {
    let client = PrismicHttpClient::new(config.endpoint.clone(), config.access_token.clone())?
        .with_document_type(config.document_type.clone())
        .with_retry_policy(config.retry);
    Ok(Arc::new(client))
}

fn page_renderer(templates: Option<&Path>) -> Result<PageRenderer, AppError> {
    match templates {
        Some(dir) => PageRenderer::with_template_dir(dir),
        None => PageRenderer::new(),
    }
}

fn print(content: String) -> Result<(), AppError> {
    deliver_all(OutputPlan::new().with_operation(DeliveryTarget::PrintToStdout { content }))?;
    Ok(())
}

async fn run_build(
    config: &SiteConfig,
    out: &Path,
    templates: Option<&Path>,
) -> anyhow::Result<()> {
    let renderer = page_renderer(templates).context("Failed to load templates")?;
    let options = config.build_options(out.to_path_buf());

    let report = generate_site(content_source(config)?, &renderer, &options)
        .await
        .context("Site build failed")?;

    println!(
        "✓ Built {} post pages into {} ({} files, {} bytes)",
        report.posts_built.len(),
        out.display(),
        report.files_written,
        report.bytes_written
    );
    for skipped in &report.posts_skipped {
        eprintln!("⚠️  Skipped '{}': {}", skipped.uid, skipped.reason);
    }
    if !report.listing_skipped.is_empty() {
        eprintln!(
            "⚠️  {} records of the first listing page could not be listed",
            report.listing_skipped.len()
        );
    }
    Ok(())
}

async fn run_list(config: &SiteConfig, pages: u32) -> anyhow::Result<()> {
    let mut listing = PostListing::new(content_source(config)?, config.page_size);
    listing.load_first().await.context("Failed to load the listing")?;

    for _ in 1..pages {
        if !listing.has_more() {
            break;
        }
        listing.load_next().await.context("Failed to load more posts")?;
    }

    let mut lines = Vec::with_capacity(listing.current_items().len() + 1);
    for post in listing.current_items() {
        let date = format_display_date(post.publication_timestamp.as_deref(), config.locale)
            .unwrap_or_else(|_| "-".to_string());
        lines.push(format!("{}  {}  {} ({})", date, post.id, post.title, post.author));
    }
    match listing.next_cursor() {
        Some(cursor) => lines.push(format!("next: {}", cursor)),
        None => lines.push("no more posts".to_string()),
    }

    print(lines.join("\n"))?;
    Ok(())
}

async fn run_post(config: &SiteConfig, slug: &str) -> anyhow::Result<()> {
    let renderer = page_renderer(None)?;
    let source = content_source(config)?;

    match render_post_on_demand(source.as_ref(), &renderer, slug, config.locale)
        .await
        .with_context(|| format!("Failed to render post '{}'", slug))?
    {
        RenderedPage::Found(html) => print(html)?,
        RenderedPage::NotFound(html) => {
            print(html)?;
            anyhow::bail!("No post found with uid '{}'", slug);
        }
    }
    Ok(())
}

async fn run_next_page(config: &SiteConfig, cursor: &str) -> anyhow::Result<()> {
    let cursor = Cursor::from_next_page(Some(cursor)).ok_or(AppError::NoCursorAvailable)?;
    let page = content_source(config)?
        .fetch_next_page(&cursor)
        .await
        .context("Failed to fetch the next page")?;

    print(serde_json::to_string_pretty(&page)?)?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose).map_err(|e| anyhow::anyhow!("Failed to set up logging: {}", e))?;

    let config = SiteConfig::resolve(cli)?;

    match config.command.clone() {
        Command::Build { out, templates } => run_build(&config, &out, templates.as_deref()).await,
        Command::List { pages } => run_list(&config, pages).await,
        Command::Post { slug } => run_post(&config, &slug).await,
        Command::NextPage { cursor } => run_next_page(&config, &cursor).await,
    }
}
