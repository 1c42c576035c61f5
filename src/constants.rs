// src/constants.rs
//! Domain constants that define the operational boundaries of the system.
//!
//! Each constant is named for the domain concept it constrains, not its
//! technical role.

// ---------------------------------------------------------------------------
// Content API boundaries
// ---------------------------------------------------------------------------

/// Largest page the content API will serve in one search request.
pub const PRISMIC_MAX_PAGE_SIZE: u32 = 100;

/// Posts shown on the first screen of the listing before "load more".
pub const DEFAULT_LISTING_PAGE_SIZE: u32 = 2;

/// Custom type holding blog posts in the content repository.
pub const DEFAULT_DOCUMENT_TYPE: &str = "posts";

/// Environment variable holding the repository access token.
pub const ACCESS_TOKEN_ENV: &str = "PRISMIC_ACCESS_TOKEN";

/// Environment variable holding the API endpoint.
pub const API_ENDPOINT_ENV: &str = "PRISMIC_API_ENDPOINT";

// ---------------------------------------------------------------------------
// Retry policy
// ---------------------------------------------------------------------------

/// Attempts made for a request that keeps failing transiently.
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;

/// Delay before the first retry; doubles on each further attempt.
pub const RETRY_INITIAL_DELAY_MS: u64 = 250;

/// Upper bound on the delay between two attempts.
pub const RETRY_MAX_DELAY_MS: u64 = 4_000;

// ---------------------------------------------------------------------------
// Reading time
// ---------------------------------------------------------------------------

/// Average reading speed used for the estimated reading time.
pub const WORDS_PER_MINUTE: usize = 200;

// ---------------------------------------------------------------------------
// Site output
// ---------------------------------------------------------------------------

/// Suffix appended to every page title.
pub const SITE_NAME: &str = "spacetravelling.";

/// Detail pages fetched at the same time during a static build.
pub const DEFAULT_BUILD_CONCURRENCY: usize = 4;

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 500;
