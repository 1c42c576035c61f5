// src/config.rs
use crate::constants::{
    ACCESS_TOKEN_ENV, API_ENDPOINT_ENV, DEFAULT_BUILD_CONCURRENCY, DEFAULT_DOCUMENT_TYPE,
    DEFAULT_LISTING_PAGE_SIZE, DEFAULT_RETRY_ATTEMPTS,
};
use crate::error::AppError;
use crate::error_recovery::RetryPolicy;
use crate::site::BuildOptions;
use crate::types::{AccessToken, ApiEndpoint, DisplayLocale, DocumentType, PageSize};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    #[command(subcommand)]
    pub command: Command,

    /// Content API endpoint, e.g. https://spacetravelling.cdn.prismic.io/api/v2
    /// (defaults to $PRISMIC_API_ENDPOINT, then the apiEndpoint of --sm-file)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Slice Machine configuration to read the endpoint from
    #[arg(long, global = true, default_value = "sm.json")]
    pub sm_file: PathBuf,

    /// Custom type holding the posts
    #[arg(long, global = true, default_value = DEFAULT_DOCUMENT_TYPE)]
    pub document_type: String,

    /// Posts per listing page
    #[arg(long, global = true, default_value_t = DEFAULT_LISTING_PAGE_SIZE)]
    pub page_size: u32,

    /// Locale for dates and labels (pt-BR or en-US)
    #[arg(long, global = true, default_value = "pt-BR")]
    pub locale: String,

    /// Attempts per request when the API fails transiently (1 = no retry)
    #[arg(long, global = true, default_value_t = DEFAULT_RETRY_ATTEMPTS)]
    pub retries: u32,

    /// Post pages fetched at the same time during a build
    #[arg(long, global = true, default_value_t = DEFAULT_BUILD_CONCURRENCY)]
    pub concurrency: usize,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Pre-build the listing, every post page and the not-found page
    Build {
        /// Output directory
        #[arg(short, long, default_value = "public")]
        out: PathBuf,

        /// Directory of .hbs files overriding the built-in templates
        #[arg(long)]
        templates: Option<PathBuf>,
    },
    /// Print the listing, following "load more" for the given number of pages
    List {
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Render one post page to stdout (the not-found page for unknown slugs)
    Post { slug: String },
    /// Print the raw page a "load more" cursor points to
    NextPage { cursor: String },
}

/// The part of a Slice Machine `sm.json` this tool reads.
#[derive(Debug, Deserialize)]
struct SliceMachineConfig {
    #[serde(rename = "apiEndpoint")]
    api_endpoint: Option<String>,
}

/// Resolved configuration, validated and ready to build clients and pages.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub endpoint: ApiEndpoint,
    pub access_token: Option<AccessToken>,
    pub document_type: DocumentType,
    pub page_size: PageSize,
    pub locale: DisplayLocale,
    pub retry: RetryPolicy,
    pub concurrency: usize,
    pub verbose: bool,
    pub command: Command,
}

impl SiteConfig {
    /// Resolves the configuration from CLI input and the process environment.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        Self::resolve_from(cli, |key| std::env::var(key).ok())
    }

    /// Resolves the configuration, reading environment variables via `env`.
    pub fn resolve_from<F>(cli: CommandLineInput, env: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint_str = match cli.endpoint.clone().or_else(|| non_empty(env(API_ENDPOINT_ENV))) {
            Some(endpoint) => endpoint,
            None => read_sm_endpoint(&cli.sm_file)?,
        };
        let endpoint = ApiEndpoint::parse(&endpoint_str)?;

        let access_token = non_empty(env(ACCESS_TOKEN_ENV))
            .map(AccessToken::new)
            .transpose()?;

        let config = SiteConfig {
            endpoint,
            access_token,
            document_type: DocumentType::new(cli.document_type)?,
            page_size: PageSize::new(cli.page_size)?,
            locale: cli.locale.parse()?,
            retry: RetryPolicy::with_attempts(cli.retries),
            concurrency: cli.concurrency.max(1),
            verbose: cli.verbose,
            command: cli.command,
        };

        log::debug!(
            "Repository '{}' at {}, token {}",
            config.endpoint.repository_name(),
            config.endpoint,
            config
                .access_token
                .as_ref()
                .map_or_else(|| "not set".to_string(), |t| t.to_string())
        );

        Ok(config)
    }

    /// Options for a static build into `out_dir`.
    pub fn build_options(&self, out_dir: PathBuf) -> BuildOptions {
        BuildOptions {
            out_dir,
            page_size: self.page_size,
            locale: self.locale,
            concurrency: self.concurrency,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn read_sm_endpoint(path: &Path) -> Result<String, AppError> {
    let missing = || {
        AppError::MissingConfiguration(format!(
            "no API endpoint: pass --endpoint, set {} or add apiEndpoint to {}",
            API_ENDPOINT_ENV,
            path.display()
        ))
    };

    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(missing()),
        Err(e) => return Err(e.into()),
    };

    let sm: SliceMachineConfig = serde_json::from_str(&contents).map_err(|e| {
        AppError::MissingConfiguration(format!("{} is not valid JSON: {}", path.display(), e))
    })?;

    non_empty(sm.api_endpoint).ok_or_else(missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn parse(args: &[&str]) -> CommandLineInput {
        let mut argv = vec!["prismic-blog"];
        argv.extend_from_slice(args);
        CommandLineInput::try_parse_from(argv).unwrap()
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_the_blog() {
        let cli = parse(&["list", "--endpoint", "https://spacetravelling.cdn.prismic.io/api/v2"]);
        let config = SiteConfig::resolve_from(cli, env(&[])).unwrap();

        assert_eq!(config.page_size.get(), 2);
        assert_eq!(config.locale, DisplayLocale::PtBr);
        assert_eq!(config.document_type.as_str(), "posts");
        assert_eq!(config.endpoint.repository_name(), "spacetraveling");
        assert!(config.access_token.is_none());
        assert_eq!(config.command, Command::List { pages: 1 });
    }

    #[test]
    fn endpoint_and_token_come_from_the_environment() {
        let cli = parse(&["post", "como-utilizar-hooks", "--locale", "en-US"]);
        let config = SiteConfig::resolve_from(
            cli,
            env(&[
                (API_ENDPOINT_ENV, "https://blog.cdn.prismic.io/api/v2"),
                (ACCESS_TOKEN_ENV, "MC5ZSHdLdEJFQUFDTUFf"),
            ]),
        )
        .unwrap();

        assert_eq!(config.endpoint.repository_name(), "blog");
        assert_eq!(config.access_token.unwrap().as_str(), "MC5ZSHdLdEJFQUFDTUFf");
        assert_eq!(config.locale, DisplayLocale::EnUs);
    }

    #[test]
    fn endpoint_falls_back_to_slice_machine_config() {
        let dir = std::env::temp_dir().join(format!("prismic_blog_sm_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let sm = dir.join("sm.json");
        std::fs::write(
            &sm,
            r#"{"apiEndpoint": "https://ignews.cdn.prismic.io/api/v2", "libraries": ["@/slices"]}"#,
        )
        .unwrap();

        let cli = parse(&["build", "--sm-file", sm.to_str().unwrap()]);
        let config = SiteConfig::resolve_from(cli, env(&[])).unwrap();
        assert_eq!(config.endpoint.repository_name(), "ignews");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_endpoint_is_reported() {
        let cli = parse(&["list", "--sm-file", "/nonexistent/sm.json"]);
        assert!(matches!(
            SiteConfig::resolve_from(cli, env(&[])),
            Err(AppError::MissingConfiguration(_))
        ));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let cli = parse(&["list", "--endpoint", "https://x.cdn.prismic.io/api/v2", "--page-size", "0"]);
        assert!(matches!(
            SiteConfig::resolve_from(cli, env(&[])),
            Err(AppError::Validation(_))
        ));

        let cli = parse(&["list", "--endpoint", "https://x.cdn.prismic.io/api/v2", "--locale", "fr"]);
        assert!(SiteConfig::resolve_from(cli, env(&[])).is_err());
    }
}
