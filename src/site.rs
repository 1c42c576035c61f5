// src/site.rs
//! Page generation: the listing page, one page per post, and the
//! not-found page, either all at once for a static build or one post on
//! demand.

use crate::analytics::compute_reading_time;
use crate::api::{normalize, ContentSource};
use crate::constants::SITE_NAME;
use crate::error::AppError;
use crate::formatting::{
    embeddable_json, format_display_date, month_abbreviations, rich_text_to_html, ListingEntry, ListingView,
    NotFoundView, PageRenderer, PostView, SectionView,
};
use crate::listing::{PostListing, SkippedRecord};
use crate::model::Post;
use crate::output::{
    deliver_all, index_page_path, not_found_page_path, post_href, post_page_path, DeliveryTarget,
    OutputPlan,
};
use crate::types::{DisplayLocale, PageSize, PostUid};
use futures::stream::{self, StreamExt};
use std::path::PathBuf;
use std::sync::Arc;

/// The post pages known at build time.
///
/// `fallback` is always set: a uid published after the build is still
/// served, through [`render_post_on_demand`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticPaths {
    pub slugs: Vec<PostUid>,
    pub fallback: bool,
}

/// Enumerates every post uid for pre-building.
pub async fn static_paths(source: &dyn ContentSource) -> Result<StaticPaths, AppError> {
    let slugs = source.list_all_post_identifiers().await?;
    Ok(StaticPaths {
        slugs,
        fallback: true,
    })
}

/// Fetches and normalizes one post.
pub async fn load_post(source: &dyn ContentSource, uid: &PostUid) -> Result<Post, AppError> {
    let raw = source.fetch_post_by_identifier(uid).await?;
    normalize(&raw)
}

struct Labels {
    load_more: &'static str,
    not_found: &'static str,
    back: &'static str,
}

fn labels(locale: DisplayLocale) -> Labels {
    match locale {
        DisplayLocale::PtBr => Labels {
            load_more: "Carregar mais posts",
            not_found: "Post não encontrado",
            back: "Voltar para os posts",
        },
        DisplayLocale::EnUs => Labels {
            load_more: "Load more posts",
            not_found: "Post not found",
            back: "Back to all posts",
        },
    }
}

/// Derives everything the post template shows.
///
/// Fails with [`AppError::InvalidDate`] when the post has no displayable
/// publication date.
pub fn post_view(post: &Post, locale: DisplayLocale) -> Result<PostView, AppError> {
    let date = format_display_date(post.publication_timestamp.as_deref(), locale)?;

    Ok(PostView {
        lang: locale.tag(),
        site_name: SITE_NAME,
        uid: post.id.to_string(),
        title: post.title.clone(),
        subtitle: post.subtitle.clone(),
        author: post.author.clone(),
        date,
        reading_time: compute_reading_time(post),
        banner: post.banner.clone(),
        sections: post
            .content
            .iter()
            .map(|section| SectionView {
                heading: section.heading.clone(),
                html: rich_text_to_html(&section.body),
            })
            .collect(),
    })
}

/// Derives the listing template's data from the accumulated listing.
///
/// A post whose date cannot be shown is still listed, without a date.
pub fn listing_view(listing: &PostListing, locale: DisplayLocale) -> Result<ListingView, AppError> {
    let posts = listing
        .current_items()
        .iter()
        .map(|summary| {
            let date = match format_display_date(summary.publication_timestamp.as_deref(), locale)
            {
                Ok(date) => Some(date),
                Err(e) => {
                    log::warn!("Listing '{}' without a date: {}", summary.id, e);
                    None
                }
            };
            ListingEntry {
                uid: summary.id.to_string(),
                href: post_href(&summary.id),
                title: summary.title.clone(),
                subtitle: summary.subtitle.clone(),
                author: summary.author.clone(),
                date,
            }
        })
        .collect();

    Ok(ListingView {
        lang: locale.tag(),
        site_name: SITE_NAME,
        posts,
        next_page: listing.next_cursor().map(|c| c.as_str().to_string()),
        load_more_label: labels(locale).load_more,
        snapshot: embeddable_json(&listing.snapshot())?,
        months: embeddable_json(month_abbreviations(locale))?,
    })
}

pub fn render_listing(
    listing: &PostListing,
    renderer: &PageRenderer,
    locale: DisplayLocale,
) -> Result<String, AppError> {
    renderer.render_listing(&listing_view(listing, locale)?)
}

pub fn render_not_found(
    renderer: &PageRenderer,
    uid: Option<&str>,
    locale: DisplayLocale,
) -> Result<String, AppError> {
    let labels = labels(locale);
    renderer.render_not_found(&NotFoundView {
        lang: locale.tag(),
        site_name: SITE_NAME,
        message: labels.not_found,
        back_label: labels.back,
        uid: uid.map(str::to_string),
    })
}

/// A page served for a post request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedPage {
    Found(String),
    NotFound(String),
}

impl RenderedPage {
    pub fn html(&self) -> &str {
        match self {
            RenderedPage::Found(html) | RenderedPage::NotFound(html) => html,
        }
    }
}

/// Renders the page for a uid requested at runtime, including uids that did
/// not exist when the site was built.
///
/// Unknown or malformed uids produce the not-found page. Source faults and
/// undisplayable dates are returned as errors.
pub async fn render_post_on_demand(
    source: &dyn ContentSource,
    renderer: &PageRenderer,
    slug: &str,
    locale: DisplayLocale,
) -> Result<RenderedPage, AppError> {
    let uid = match PostUid::parse(slug) {
        Ok(uid) => uid,
        Err(e) => {
            log::debug!("Rejecting post request for '{}': {}", slug, e);
            return Ok(RenderedPage::NotFound(render_not_found(
                renderer,
                Some(slug),
                locale,
            )?));
        }
    };

    match load_post(source, &uid).await {
        Ok(post) => Ok(RenderedPage::Found(
            renderer.render_post(&post_view(&post, locale)?)?,
        )),
        Err(e) if e.is_not_found() => {
            log::info!("{}", e);
            Ok(RenderedPage::NotFound(render_not_found(
                renderer,
                Some(slug),
                locale,
            )?))
        }
        Err(e) => Err(e),
    }
}

/// Settings of a static build.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub out_dir: PathBuf,
    /// Posts on the first screen of the listing
    pub page_size: PageSize,
    pub locale: DisplayLocale,
    /// Detail pages fetched at the same time
    pub concurrency: usize,
}

/// A post that was enumerated but not built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPost {
    pub uid: PostUid,
    pub reason: String,
}

/// What a static build produced.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub posts_built: Vec<PostUid>,
    pub posts_skipped: Vec<SkippedPost>,
    /// Records of the first listing page that could not be listed
    pub listing_skipped: Vec<SkippedRecord>,
    pub has_more: bool,
    pub files_written: usize,
    pub bytes_written: usize,
}

/// Builds the whole site into `options.out_dir`.
///
/// A post that disappears between enumeration and fetch, or whose record or
/// date cannot be used, is skipped and reported. Any other failure aborts
/// the build before anything is written.
pub async fn generate_site(
    source: Arc<dyn ContentSource>,
    renderer: &PageRenderer,
    options: &BuildOptions,
) -> Result<BuildReport, AppError> {
    log::info!("Building site into {}", options.out_dir.display());

    let mut listing = PostListing::new(Arc::clone(&source), options.page_size);
    let merge = listing.load_first().await?;

    let mut plan = OutputPlan::new()
        .with_operation(DeliveryTarget::CreateDirectory {
            path: options.out_dir.clone(),
        })
        .with_operation(DeliveryTarget::WriteFile {
            path: index_page_path(&options.out_dir),
            content: render_listing(&listing, renderer, options.locale)?,
        });

    let paths = static_paths(source.as_ref()).await?;
    log::info!("Fetching {} posts", paths.slugs.len());

    let fetched: Vec<(PostUid, Result<Post, AppError>)> = stream::iter(paths.slugs)
        .map(|uid| {
            let source = Arc::clone(&source);
            async move {
                let post = load_post(source.as_ref(), &uid).await;
                (uid, post)
            }
        })
        .buffered(options.concurrency.max(1))
        .collect()
        .await;

    let mut posts_built = Vec::new();
    let mut posts_skipped = Vec::new();

    for (uid, result) in fetched {
        let page = result.and_then(|post| renderer.render_post(&post_view(&post, options.locale)?));
        match page {
            Ok(html) => {
                plan.push(DeliveryTarget::WriteFile {
                    path: post_page_path(&options.out_dir, &uid),
                    content: html,
                });
                posts_built.push(uid);
            }
            Err(e @ (AppError::NotFound { .. }
            | AppError::InvalidRecord(_)
            | AppError::InvalidDate(_))) => {
                log::warn!("Skipping post '{}': {}", uid, e);
                posts_skipped.push(SkippedPost {
                    uid,
                    reason: e.to_string(),
                });
            }
            Err(e) => {
                log::error!("Failed to build post '{}': {}", uid, e);
                return Err(e);
            }
        }
    }

    plan.push(DeliveryTarget::WriteFile {
        path: not_found_page_path(&options.out_dir),
        content: render_not_found(renderer, None, options.locale)?,
    });

    let output = deliver_all(plan)?;
    let report = BuildReport {
        posts_built,
        posts_skipped,
        listing_skipped: merge.skipped,
        has_more: listing.has_more(),
        files_written: output.written_files().count(),
        bytes_written: output.stats.bytes_written,
    };

    log::info!(
        "Built {} post pages ({} skipped), {} files written",
        report.posts_built.len(),
        report.posts_skipped.len(),
        report.files_written
    );
    Ok(report)
}
