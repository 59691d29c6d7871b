//! Shared types used across the scan, transform and convert stages.
//!
//! These types are serialized into the scan manifest (`scan --json`) and must
//! stay stable across stages.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassificationError {
    #[error("Unknown content type: {0}")]
    UnknownContentType(String),
    #[error("Folder does not match any content convention: {0}")]
    UnrecognizedFolder(String),
    #[error("Multi-instance blog folder has an empty name: {0}")]
    EmptyBlogName(String),
}

/// How a top-level vault folder maps onto the Docusaurus tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// The `docs` plugin instance.
    DocsBase,
    /// The default `blog` plugin instance.
    BlogBase,
    /// An additional blog plugin instance (`{name}__blog` folders).
    BlogMulti,
    /// The vault's attachment folder, published under `static/`.
    Asset,
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::DocsBase => "docs_base",
            ContentType::BlogBase => "blog_base",
            ContentType::BlogMulti => "blog_multi",
            ContentType::Asset => "asset",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = ClassificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "docs_base" => Ok(ContentType::DocsBase),
            "blog_base" => Ok(ContentType::BlogBase),
            "blog_multi" => Ok(ContentType::BlogMulti),
            "asset" => Ok(ContentType::Asset),
            other => Err(ClassificationError::UnknownContentType(other.to_string())),
        }
    }
}

/// Content type plus the name used in destination paths.
///
/// Derived once per top-level folder and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentDescriptor {
    pub content_type: ContentType,
    /// `docs`, `blog`, the multi-blog plugin id, or `assets`.
    pub content_name: String,
}

impl ContentDescriptor {
    pub fn new(content_type: ContentType, content_name: impl Into<String>) -> Self {
        Self {
            content_type,
            content_name: content_name.into(),
        }
    }
}

/// Language detected from a note's file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub code: String,
    /// True only when `code` is one of the configured secondary languages.
    pub secondary: bool,
}

impl Language {
    pub fn main(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            secondary: false,
        }
    }
}
