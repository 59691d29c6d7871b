//! Internal markdown link rewriting.
//!
//! Relative links between notes become site-absolute paths with the same
//! clean-up the destination resolver applies to files:
//!
//! - `[text](../01-Guides/Intro__en.md)` → `[text](/Guides/Intro)`
//! - `[text](news__blog/post.md#intro)` → `[text](/news/post#intro)`
//! - `[text](Setup/Setup__de.md)` stays `/Setup/Setup`; only paths with more
//!   than two segments fold a same-named note into its folder
//!
//! Non-markdown targets (`.pdf`, images), absolute paths, URLs and in-page
//! anchors are left exactly as written.

use super::TransformSettings;
use crate::i18n::strip_language_suffix;
use crate::naming::{normalize_whitespace, strip_leading_encoded_space, strip_numeric_prefix};
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

static MARKDOWN_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(?P<text>[^\]]+)\]\((?P<target>[^)]+)\)").expect("markdown link pattern")
});

/// Rewrite every internal note link on the line.
pub fn rewrite_links<'a>(line: &'a str, settings: &TransformSettings) -> Cow<'a, str> {
    MARKDOWN_LINK.replace_all(line, |caps: &Captures| {
        match rewrite_target(
            &caps["target"],
            &settings.language_separator,
            &settings.multi_blog_suffix,
        ) {
            Some(target) => format!("[{}]({target})", &caps["text"]),
            None => caps[0].to_string(),
        }
    })
}

/// Compute the site-absolute target for a note link, or `None` to keep it.
pub fn rewrite_target(target: &str, separator: &str, blog_suffix: &str) -> Option<String> {
    if target.starts_with('/')
        || target.starts_with('#')
        || target.contains("://")
        || target.starts_with("mailto:")
    {
        return None;
    }

    let (path, fragment) = match target.split_once('#') {
        Some((path, fragment)) => (path, Some(fragment)),
        None => (target, None),
    };

    let mut parts: Vec<String> = path.split('/').map(str::to_string).collect();
    if let Some(stripped) = parts[0].strip_suffix(blog_suffix) {
        parts[0] = stripped.to_string();
    }

    let note = strip_language_suffix(parts.last()?.strip_suffix(".md")?, separator).to_string();
    let n = parts.len();
    parts[n - 1] = note;

    if n > 2 {
        let parent = strip_numeric_prefix(&parts[n - 2]);
        parts[n - 2] = strip_leading_encoded_space(&parent).to_string();
        if parts[n - 2] == parts[n - 1] {
            parts.pop();
        }
    }

    let segments: Vec<String> = parts
        .iter()
        .filter(|p| !matches!(p.as_str(), "" | "." | ".."))
        .map(|p| normalize_whitespace(p))
        .collect();

    let mut rewritten = format!("/{}", segments.join("/"));
    if let Some(fragment) = fragment {
        rewritten.push('#');
        rewritten.push_str(fragment);
    }
    Some(rewritten)
}
