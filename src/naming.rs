//! String helpers for vault file and folder names.
//!
//! Obsidian vaults name things for humans: spaces, URL-encoded spaces in
//! links, and ordering prefixes like `01. Introduction`. Docusaurus wants
//! slug-friendly paths. Everything here is a pure string function so the
//! classifier, the resolver and the link rewriter agree on the same rules.
//!
//! | Input | Function | Output |
//! |---|---|---|
//! | `My Note%20v2` | [`normalize_whitespace`] | `My-Note-v2` |
//! | `02. Setup` | [`strip_numeric_prefix`] | `Setup` |
//! | `%20Setup` | [`strip_leading_encoded_space`] | `Setup` |

use regex::Regex;
use std::sync::LazyLock;

/// URL-encoded space as it appears in Obsidian markdown links.
pub const ENCODED_SPACE: &str = "%20";

/// One or more `NN` groups, each followed by at least one separator.
static NUMERIC_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\d+[.\-)\s]+)+").expect("numeric prefix pattern"));

/// Replace spaces and `%20` sequences with hyphens.
///
/// Idempotent: the output contains neither token.
pub fn normalize_whitespace(s: &str) -> String {
    s.replace(ENCODED_SPACE, "-").replace(' ', "-")
}

/// Remove ordering prefixes such as `01-`, `2. `, `3)` or `1. 2. ` and trim.
///
/// Digits that are not followed by a separator are kept, so `Chapter2` and
/// `2024` pass through. Idempotent.
pub fn strip_numeric_prefix(s: &str) -> String {
    let trimmed = s.trim_start();
    NUMERIC_PREFIX.replace(trimmed, "").trim().to_string()
}

/// Remove a single leading `%20` token, if present.
pub fn strip_leading_encoded_space(s: &str) -> &str {
    s.strip_prefix(ENCODED_SPACE).unwrap_or(s)
}

/// Note file name without its note suffix: `.yml.md`, `.excalidraw.md` or `.md`.
///
/// Dots inside the name are kept, so `01. Setup__de.md` → `01. Setup__de`.
/// Names without a note suffix are returned unchanged.
pub fn note_stem(file_name: &str) -> &str {
    [".yml.md", ".excalidraw.md", ".md"]
        .iter()
        .find_map(|suffix| file_name.strip_suffix(suffix))
        .unwrap_or(file_name)
}
