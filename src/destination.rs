//! Destination path resolution.
//!
//! Maps a file's location inside its content folder onto the Docusaurus
//! directory layout. This is the only place that knows the layout:
//!
//! | Content type | Main language | Secondary language |
//! |---|---|---|
//! | `docs_base` | `/{name}/{path}` | `/i18n/{lang}/docusaurus-plugin-content-docs/current/{path}` |
//! | `blog_base` | `/{name}/{path}` | `/i18n/{lang}/docusaurus-plugin-content-blog/{path}` |
//! | `blog_multi` | `/{name}/{path}` | `/i18n/{lang}/docusaurus-plugin-content-blog-{name}/{path}` |
//! | `asset` | `/static/{subfolder}/{path}` | same as main |
//!
//! Returned paths are relative to the Docusaurus root and always start with `/`.

use crate::types::{ContentDescriptor, ContentType, Language};
use std::path::{Path, PathBuf};

/// Resolve the destination of `relative_path` (segments joined by `/`).
pub fn resolve_destination(
    relative_path: &str,
    language: &Language,
    descriptor: &ContentDescriptor,
    asset_subfolder: &str,
) -> String {
    let path = relative_path.trim_start_matches('/');
    let name = &descriptor.content_name;
    let lang = &language.code;

    match (descriptor.content_type, language.secondary) {
        (ContentType::Asset, _) => format!("/static/{asset_subfolder}/{path}"),
        (_, false) => format!("/{name}/{path}"),
        (ContentType::DocsBase, true) => {
            format!("/i18n/{lang}/docusaurus-plugin-content-docs/current/{path}")
        }
        (ContentType::BlogBase, true) => {
            format!("/i18n/{lang}/docusaurus-plugin-content-blog/{path}")
        }
        (ContentType::BlogMulti, true) => {
            format!("/i18n/{lang}/docusaurus-plugin-content-blog-{name}/{path}")
        }
    }
}

/// Join a root-relative destination (`/docs/a.md`) onto the Docusaurus root.
pub fn to_filesystem_path(docusaurus_root: &Path, destination: &str) -> PathBuf {
    destination
        .split('/')
        .filter(|s| !s.is_empty())
        .fold(docusaurus_root.to_path_buf(), |acc, seg| acc.join(seg))
}
