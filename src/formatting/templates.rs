// src/formatting/templates.rs
//! Handlebars rendering of the listing, post and not-found pages.
//!
//! The renderer ships with built-in templates. A directory of `.hbs` files
//! can replace any of them by name; `header.hbs` and `load_more.hbs`
//! replace the partials of the same name.

use crate::error::AppError;
use crate::model::Banner;
use handlebars::Handlebars;
use serde::Serialize;
use std::path::Path;

pub const LISTING_TEMPLATE: &str = "listing";
pub const POST_TEMPLATE: &str = "post";
pub const NOT_FOUND_TEMPLATE: &str = "not_found";
const HEADER_PARTIAL: &str = "header";
const LOAD_MORE_PARTIAL: &str = "load_more";

const HEADER_SOURCE: &str = r#"<header class="site-header"><a href="/"><strong>{{site_name}}</strong></a></header>"#;

const LISTING_SOURCE: &str = r#"<!DOCTYPE html>
<html lang="{{lang}}">
<head>
<meta charset="utf-8" />
<title>Posts | {{site_name}}</title>
</head>
<body>
{{> header}}
<main class="posts">
{{#each posts}}
<a class="post" href="{{href}}" data-uid="{{uid}}">
<strong>{{title}}</strong>
<p>{{subtitle}}</p>
<div class="info">{{#if date}}<time>{{date}}</time>{{/if}}<span>{{author}}</span></div>
</a>
{{/each}}
{{#if next_page}}
<button type="button" class="load-more" data-next-page="{{next_page}}">{{load_more_label}}</button>
{{/if}}
</main>
<script id="listing-state" type="application/json">{{{snapshot}}}</script>
{{#if next_page}}
{{> load_more}}
{{/if}}
</body>
</html>
"#;

/// Follows the button's cursor verbatim and appends the posts it returns.
const LOAD_MORE_SOURCE: &str = r#"<script>
(function () {
  var months = {{{months}}};
  var button = document.querySelector("button.load-more");
  var list = document.querySelector("main.posts");
  var shown = new Set(Array.prototype.map.call(list.querySelectorAll("a.post"), function (a) { return a.dataset.uid; }));

  function text(value) {
    if (typeof value === "string") return value;
    if (Array.isArray(value)) return value.map(function (block) { return block.text || ""; }).join(" ");
    return "";
  }

  function displayDate(timestamp) {
    var parts = /^(\d{4})-(\d{2})-(\d{2})/.exec(timestamp || "");
    return parts ? parts[3] + " " + months[Number(parts[2]) - 1] + " " + parts[1] : null;
  }

  function entry(record) {
    var data = record.data || {};
    var link = document.createElement("a");
    link.className = "post";
    link.href = "/post/" + encodeURIComponent(record.uid);
    link.dataset.uid = record.uid;
    var title = document.createElement("strong");
    title.textContent = text(data.title);
    var subtitle = document.createElement("p");
    subtitle.textContent = text(data.subtitle);
    var info = document.createElement("div");
    info.className = "info";
    var date = displayDate(record.first_publication_date);
    if (date) {
      var time = document.createElement("time");
      time.textContent = date;
      info.appendChild(time);
    }
    var author = document.createElement("span");
    author.textContent = text(data.author);
    info.appendChild(author);
    link.append(title, subtitle, info);
    return link;
  }

  button.addEventListener("click", function () {
    button.disabled = true;
    fetch(button.dataset.nextPage)
      .then(function (response) {
        if (!response.ok) throw new Error("HTTP " + response.status);
        return response.json();
      })
      .then(function (page) {
        (page.results || []).forEach(function (record) {
          if (!record.uid || shown.has(record.uid)) return;
          shown.add(record.uid);
          list.insertBefore(entry(record), button);
        });
        if (page.next_page) {
          button.dataset.nextPage = page.next_page;
          button.disabled = false;
        } else {
          button.remove();
        }
      })
      .catch(function () {
        button.disabled = false;
      });
  });
})();
</script>"#;

const POST_SOURCE: &str = r#"<!DOCTYPE html>
<html lang="{{lang}}">
<head>
<meta charset="utf-8" />
<title>{{title}} | {{site_name}}</title>
</head>
<body>
{{> header}}
{{#if banner}}<img class="banner" src="{{banner.url}}" alt="{{banner.alt}}" />{{/if}}
<main class="post">
<article>
<h1>{{title}}</h1>
<div class="info"><time>{{date}}</time><span>{{author}}</span><span>{{reading_time}} min</span></div>
{{#each sections}}
<section>
<h2>{{heading}}</h2>
{{{html}}}
</section>
{{/each}}
</article>
</main>
</body>
</html>
"#;

const NOT_FOUND_SOURCE: &str = r#"<!DOCTYPE html>
<html lang="{{lang}}">
<head>
<meta charset="utf-8" />
<title>{{message}} | {{site_name}}</title>
</head>
<body>
{{> header}}
<main class="not-found">
<h1>{{message}}</h1>
{{#if uid}}<p><code>{{uid}}</code></p>{{/if}}
<a href="/">{{back_label}}</a>
</main>
</body>
</html>
"#;

/// One post as shown in the listing.
#[derive(Debug, Clone, Serialize)]
pub struct ListingEntry {
    pub uid: String,
    pub href: String,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    /// `None` when the post has no displayable date
    pub date: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingView {
    pub lang: &'static str,
    pub site_name: &'static str,
    pub posts: Vec<ListingEntry>,
    /// The source's next-page URL, unmodified
    pub next_page: Option<String>,
    pub load_more_label: &'static str,
    /// Listing state as JSON, safe to place inside a `<script>` element
    pub snapshot: String,
    /// Month abbreviations as a JSON array, for dates of appended posts
    pub months: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionView {
    pub heading: String,
    /// Pre-rendered, already escaped body HTML
    pub html: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub lang: &'static str,
    pub site_name: &'static str,
    pub uid: String,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub date: String,
    pub reading_time: u32,
    pub banner: Option<Banner>,
    pub sections: Vec<SectionView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NotFoundView {
    pub lang: &'static str,
    pub site_name: &'static str,
    pub message: &'static str,
    pub back_label: &'static str,
    pub uid: Option<String>,
}

/// Renders complete HTML pages from view structs.
pub struct PageRenderer {
    handlebars: Handlebars<'static>,
}

impl PageRenderer {
    /// A renderer using only the built-in templates.
    pub fn new() -> Result<Self, AppError> {
        let mut handlebars = Handlebars::new();
        register_partial(&mut handlebars, HEADER_PARTIAL, HEADER_SOURCE)?;
        register_partial(&mut handlebars, LOAD_MORE_PARTIAL, LOAD_MORE_SOURCE)?;
        register_template(&mut handlebars, LISTING_TEMPLATE, LISTING_SOURCE)?;
        register_template(&mut handlebars, POST_TEMPLATE, POST_SOURCE)?;
        register_template(&mut handlebars, NOT_FOUND_TEMPLATE, NOT_FOUND_SOURCE)?;
        Ok(Self { handlebars })
    }

    /// The built-in templates, with every `<name>.hbs` found in `dir`
    /// registered over the template of the same name.
    pub fn with_template_dir(dir: &Path) -> Result<Self, AppError> {
        let mut renderer = Self::new()?;

        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("hbs") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let source = std::fs::read_to_string(&path)?;
            if name == HEADER_PARTIAL || name == LOAD_MORE_PARTIAL {
                register_partial(&mut renderer.handlebars, name, &source)?;
            } else {
                register_template(&mut renderer.handlebars, name, &source)?;
            }
            log::info!("Loaded template '{}' from {}", name, path.display());
        }

        Ok(renderer)
    }

    pub fn render_listing(&self, view: &ListingView) -> Result<String, AppError> {
        self.render(LISTING_TEMPLATE, view)
    }

    pub fn render_post(&self, view: &PostView) -> Result<String, AppError> {
        self.render(POST_TEMPLATE, view)
    }

    pub fn render_not_found(&self, view: &NotFoundView) -> Result<String, AppError> {
        self.render(NOT_FOUND_TEMPLATE, view)
    }

    fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String, AppError> {
        self.handlebars
            .render(name, data)
            .map_err(|e| AppError::TemplateRenderError {
                name: name.to_string(),
                message: e.to_string(),
            })
    }
}

fn register_template(
    handlebars: &mut Handlebars<'static>,
    name: &str,
    source: &str,
) -> Result<(), AppError> {
    handlebars
        .register_template_string(name, source)
        .map_err(|e| AppError::TemplateRenderError {
            name: name.to_string(),
            message: e.to_string(),
        })
}

fn register_partial(
    handlebars: &mut Handlebars<'static>,
    name: &str,
    source: &str,
) -> Result<(), AppError> {
    handlebars
        .register_partial(name, source)
        .map_err(|e| AppError::TemplateRenderError {
            name: name.to_string(),
            message: e.to_string(),
        })
}

/// Serializes `value` for embedding in a `<script>` element.
pub fn embeddable_json<T: Serialize>(value: &T) -> Result<String, AppError> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SITE_NAME;

    fn listing_view(next_page: Option<&str>) -> ListingView {
        ListingView {
            lang: "pt-BR",
            site_name: SITE_NAME,
            posts: vec![ListingEntry {
                uid: "como-utilizar-hooks".to_string(),
                href: "/post/como-utilizar-hooks".to_string(),
                title: "Como utilizar Hooks".to_string(),
                subtitle: "Pensando em sincronização".to_string(),
                author: "Joseph Oliveira".to_string(),
                date: Some("15 Mar 2021".to_string()),
            }],
            next_page: next_page.map(str::to_string),
            load_more_label: "Carregar mais posts",
            snapshot: embeddable_json(&serde_json::json!({"note": "</script>"})).unwrap(),
            months: embeddable_json(&["Jan", "Fev", "Mar"]).unwrap(),
        }
    }

    #[test]
    fn listing_links_posts_and_offers_more() {
        let renderer = PageRenderer::new().unwrap();
        let html = renderer
            .render_listing(&listing_view(Some("https://blog.cdn.prismic.io/page2")))
            .unwrap();

        assert!(html.contains("<title>Posts | spacetravelling.</title>"));
        assert!(html.contains("href=\"/post/como-utilizar-hooks\""));
        assert!(html.contains("<time>15 Mar 2021</time>"));
        assert!(html.contains("Carregar mais posts"));
        assert!(html.contains("https://blog.cdn.prismic.io/page2"));
        assert!(html.contains("<\\/script>"));
        assert!(!html.contains("\"</script>"));
    }

    #[test]
    fn exhausted_listing_has_no_button() {
        let renderer = PageRenderer::new().unwrap();
        let html = renderer.render_listing(&listing_view(None)).unwrap();
        assert!(!html.contains("load-more"));
        assert!(!html.contains("addEventListener"));
    }

    #[test]
    fn load_more_script_follows_the_cursor() {
        let renderer = PageRenderer::new().unwrap();
        let html = renderer
            .render_listing(&listing_view(Some(
                "https://blog.cdn.prismic.io/api/v2/documents/search?page=2&pageSize=2",
            )))
            .unwrap();

        assert!(html.contains(
            "data-next-page=\"https://blog.cdn.prismic.io/api/v2/documents/search?page&#x3D;2&amp;pageSize&#x3D;2\""
        ));
        assert!(html.contains("data-uid=\"como-utilizar-hooks\""));
        assert!(html.contains("var months = [\"Jan\",\"Fev\",\"Mar\"];"));
        assert!(html.contains("fetch(button.dataset.nextPage)"));
        assert!(html.contains("button.dataset.nextPage = page.next_page;"));
        assert!(html.contains("button.remove();"));
        // Appended before the button, after the first screen of posts
        let button = html.find("<button").unwrap();
        let script = html.find("addEventListener").unwrap();
        assert!(button < script);
    }

    #[test]
    fn post_page_shows_reading_time_and_raw_section_html() {
        let renderer = PageRenderer::new().unwrap();
        let html = renderer
            .render_post(&PostView {
                lang: "pt-BR",
                site_name: SITE_NAME,
                uid: "hooks".to_string(),
                title: "Hooks <3".to_string(),
                subtitle: String::new(),
                author: "Danilo".to_string(),
                date: "19 Abr 2021".to_string(),
                reading_time: 4,
                banner: Some(Banner {
                    url: "https://images.prismic.io/banner.png".to_string(),
                    alt: None,
                }),
                sections: vec![SectionView {
                    heading: "Introdução".to_string(),
                    html: "<p>Olá</p>".to_string(),
                }],
            })
            .unwrap();

        assert!(html.contains("<title>Hooks &lt;3 | spacetravelling.</title>"));
        assert!(html.contains("<span>4 min</span>"));
        assert!(html.contains("<h2>Introdução</h2>"));
        assert!(html.contains("<p>Olá</p>"));
        assert!(html.contains("class=\"banner\""));
    }

    #[test]
    fn not_found_page_names_the_uid() {
        let renderer = PageRenderer::new().unwrap();
        let html = renderer
            .render_not_found(&NotFoundView {
                lang: "en-US",
                site_name: SITE_NAME,
                message: "Post not found",
                back_label: "Back to all posts",
                uid: Some("missing-slug".to_string()),
            })
            .unwrap();
        assert!(html.contains("<h1>Post not found</h1>"));
        assert!(html.contains("<code>missing-slug</code>"));
    }

    #[test]
    fn template_directory_overrides_by_name() {
        let dir = std::env::temp_dir().join(format!("prismic_blog_templates_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("not_found.hbs"), "gone: {{uid}}").unwrap();
        std::fs::write(dir.join("README.txt"), "ignored").unwrap();

        let renderer = PageRenderer::with_template_dir(&dir).unwrap();
        let html = renderer
            .render_not_found(&NotFoundView {
                lang: "pt-BR",
                site_name: SITE_NAME,
                message: "",
                back_label: "",
                uid: Some("x".to_string()),
            })
            .unwrap();
        assert_eq!(html, "gone: x");

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
