// src/output/paths.rs
//! Where each page of the static site lives, on disk and as a URL.
//!
//! Pure functions; nothing here touches the filesystem.

use crate::types::PostUid;
use std::path::{Path, PathBuf};

pub fn index_page_path(out_dir: &Path) -> PathBuf {
    out_dir.join("index.html")
}

pub fn not_found_page_path(out_dir: &Path) -> PathBuf {
    out_dir.join("404.html")
}

/// `<out>/post/<uid>/index.html`, served as `/post/<uid>`.
pub fn post_page_path(out_dir: &Path, uid: &PostUid) -> PathBuf {
    out_dir.join("post").join(uid.as_str()).join("index.html")
}

/// Site-relative link to a post page.
pub fn post_href(uid: &PostUid) -> String {
    format!("/post/{}", uid)
}
