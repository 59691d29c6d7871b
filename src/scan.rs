//! Vault scanning and conversion planning.
//!
//! Stage 1 of the conversion. Classifies the vault's top-level folders and
//! plans a destination for every note, producing a [`VaultManifest`] that
//! [`convert`](crate::convert) consumes. Nothing is written.
//!
//! ## Vault Layout
//!
//! ```text
//! vault/
//! ├── .obsidian/                   # Ignored (configurable)
//! ├── docs/                        # docs_base → website/docs/
//! │   └── guide/
//! │       ├── 01-Intro/
//! │       │   ├── Intro__en.md     # Folder note → docs/guide/01-Intro.md
//! │       │   └── Intro__de.md     # → i18n/de/.../current/guide/01-Intro.md
//! │       └── _category_.yml.md    # Copied verbatim → _category_.yml
//! ├── blog/                        # blog_base → website/blog/
//! ├── news__blog/                  # blog_multi "news" → website/news/
//! └── assets/                      # asset → website/static/<subfolder>/
//! ```
//!
//! ## Classification Rules
//!
//! | Folder name | Content type | Content name |
//! |---|---|---|
//! | `docs` | `docs_base` | `docs` |
//! | `blog` | `blog_base` | `blog` |
//! | `<name><multi_blog_suffix>` | `blog_multi` | `<name>` |
//! | `<assets.vault_folder>` | `asset` | the folder name |
//! | anything else | skipped with a warning | |
//!
//! The asset folder is kept apart from the content sections so the convert
//! stage can always process it after every note.

use crate::config::Config;
use crate::destination::resolve_destination;
use crate::i18n::{detect_language, is_i18n_groupable, strip_language_suffix};
use crate::naming::{normalize_whitespace, note_stem};
use crate::types::{ClassificationError, ContentDescriptor, ContentType, Language};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Suffix of Docusaurus category files kept as notes in the vault.
const VERBATIM_SUFFIX: &str = ".yml.md";
/// Excalidraw drawing sources; never converted or copied.
const EXCALIDRAW_SOURCE_SUFFIX: &str = "excalidraw.md";

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Vault directory not found: {0}")]
    VaultNotFound(PathBuf),
}

/// Manifest output from the scan stage.
#[derive(Debug, Serialize)]
pub struct VaultManifest {
    pub vault_root: PathBuf,
    pub sections: Vec<ContentSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assets: Option<AssetSection>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedFolder>,
}

impl VaultManifest {
    pub fn note_count(&self) -> usize {
        self.sections.iter().map(|s| s.notes.len()).sum()
    }

    pub fn notes(&self) -> impl Iterator<Item = &PlannedNote> {
        self.sections.iter().flat_map(|s| s.notes.iter())
    }
}

/// A markdown content folder (docs, blog or a multi-instance blog).
#[derive(Debug, Serialize)]
pub struct ContentSection {
    /// Folder name inside the vault.
    pub folder: String,
    pub descriptor: ContentDescriptor,
    pub notes: Vec<PlannedNote>,
}

/// How a note's content reaches its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteKind {
    /// Rewritten by the line pipeline.
    Markdown,
    /// Copied byte for byte (`*.yml.md` category files).
    Verbatim,
}

/// Everything needed to convert one note.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedNote {
    /// Path relative to the vault root.
    pub source: PathBuf,
    /// Destination relative to the Docusaurus root, starting with `/`.
    pub destination: String,
    /// Name recorded in the run log.
    pub log_name: String,
    pub language: Language,
    /// Sidebar injected into the frontmatter (docs only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidebar: Option<String>,
    /// Folded into its parent folder's slot.
    pub grouped: bool,
    pub kind: NoteKind,
}

/// The asset folder and every file below it.
#[derive(Debug, Serialize)]
pub struct AssetSection {
    pub folder: String,
    /// Paths relative to the vault root, sorted.
    pub files: Vec<PathBuf>,
}

/// A top-level folder that was not converted.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedFolder {
    pub name: String,
    pub reason: String,
}

/// Classify a top-level vault folder by name.
pub fn classify_folder(name: &str, config: &Config) -> Result<ContentDescriptor, ClassificationError> {
    match name {
        "docs" => Ok(ContentDescriptor::new(ContentType::DocsBase, "docs")),
        "blog" => Ok(ContentDescriptor::new(ContentType::BlogBase, "blog")),
        _ => {
            if let Some(blog) = name.strip_suffix(config.content.multi_blog_suffix.as_str()) {
                if blog.is_empty() {
                    return Err(ClassificationError::EmptyBlogName(name.to_string()));
                }
                Ok(ContentDescriptor::new(ContentType::BlogMulti, blog))
            } else if name == config.assets.vault_folder {
                Ok(ContentDescriptor::new(ContentType::Asset, name))
            } else {
                Err(ClassificationError::UnrecognizedFolder(name.to_string()))
            }
        }
    }
}

/// Plan the destination of one note.
///
/// `segments` is the note's path inside its content folder, ending with the
/// file name: `["guide", "01-Intro", "Intro__de.md"]`. Pure: no filesystem
/// access.
pub fn plan_note(
    source: PathBuf,
    segments: &[&str],
    descriptor: &ContentDescriptor,
    config: &Config,
) -> PlannedNote {
    let lang_cfg = &config.language;
    let separator = lang_cfg.separator.as_str();
    let file_name = segments.last().copied().unwrap_or_default();
    let stem = note_stem(file_name);
    let kind = if file_name.ends_with(VERBATIM_SUFFIX) {
        NoteKind::Verbatim
    } else {
        NoteKind::Markdown
    };

    let sidebar = (descriptor.content_type == ContentType::DocsBase).then(|| {
        if segments.len() > 1 {
            segments[0].to_string()
        } else {
            strip_language_suffix(stem, separator).to_string()
        }
    });

    let language = detect_language(stem, separator, &lang_cfg.main, &lang_cfg.secondary);
    let depth = segments.len();
    let grouped = lang_cfg.i18n
        && depth > 1
        && is_i18n_groupable(segments[depth - 2], stem, separator);

    let mut parts: Vec<String> = segments.iter().map(|s| s.to_string()).collect();
    if grouped {
        parts.pop();
        if let Some(parent) = parts.last_mut() {
            parent.push_str(".md");
        }
    } else if language.code == lang_cfg.main || language.secondary {
        let rest = &file_name[stem.len()..];
        parts[depth - 1] = format!("{}{rest}", strip_language_suffix(stem, separator));
    }

    if kind == NoteKind::Verbatim {
        if let Some(last) = parts.last_mut() {
            if let Some(trimmed) = last.strip_suffix(".md") {
                *last = trimmed.to_string();
            }
        }
    }

    let path = parts
        .iter()
        .map(|p| normalize_whitespace(p))
        .collect::<Vec<_>>()
        .join("/");

    PlannedNote {
        source,
        destination: resolve_destination(
            &path,
            &language,
            descriptor,
            &config.assets.docusaurus_subfolder,
        ),
        log_name: file_name.to_string(),
        language,
        sidebar,
        grouped,
        kind,
    }
}

/// Scan the vault and plan the whole conversion.
pub fn scan(vault_root: &Path, config: &Config) -> Result<VaultManifest, ScanError> {
    if !vault_root.is_dir() {
        return Err(ScanError::VaultNotFound(vault_root.to_path_buf()));
    }

    let mut sections = Vec::new();
    let mut assets = None;
    let mut skipped = Vec::new();

    for (name, path) in top_level_folders(vault_root, config)? {
        match classify_folder(&name, config) {
            Ok(descriptor) if descriptor.content_type == ContentType::Asset => {
                assets = Some(AssetSection {
                    files: collect_asset_files(vault_root, &path)?,
                    folder: name,
                });
            }
            Ok(descriptor) => {
                let notes = plan_section(vault_root, &path, &descriptor, config)?;
                sections.push(ContentSection {
                    folder: name,
                    descriptor,
                    notes,
                });
            }
            Err(e) => {
                tracing::warn!(folder = %name, "skipping folder: {e}");
                skipped.push(SkippedFolder {
                    name,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(VaultManifest {
        vault_root: vault_root.to_path_buf(),
        sections,
        assets,
        skipped,
    })
}

/// Non-hidden, non-ignored top-level directories, sorted by name.
fn top_level_folders(root: &Path, config: &Config) -> Result<Vec<(String, PathBuf)>, ScanError> {
    let mut folders = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') || config.directories.ignored_folders.contains(&name) {
            continue;
        }
        if !entry.file_type()?.is_dir() {
            tracing::debug!(file = %name, "ignoring file at vault root");
            continue;
        }
        folders.push((name, entry.path()));
    }
    folders.sort();
    Ok(folders)
}

fn plan_section(
    vault_root: &Path,
    folder: &Path,
    descriptor: &ContentDescriptor,
    config: &Config,
) -> Result<Vec<PlannedNote>, ScanError> {
    let mut notes = Vec::new();
    for entry in WalkDir::new(folder)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e.file_name()))
    {
        let entry = entry?;
        if !entry.file_type().is_file() || !is_note(entry.path()) {
            continue;
        }
        let Ok(inner) = entry.path().strip_prefix(folder) else {
            continue;
        };
        let segments: Vec<String> = inner
            .components()
            .map(|c| c.as_os_str().to_string_lossy().to_string())
            .collect();
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();
        let source = entry
            .path()
            .strip_prefix(vault_root)
            .unwrap_or(entry.path())
            .to_path_buf();

        let note = plan_note(source, &segments, descriptor, config);
        let lang = &note.language;
        if !lang.secondary && lang.code != config.language.main {
            tracing::warn!(
                note = %note.source.display(),
                code = %lang.code,
                "language code is not configured; keeping file name"
            );
        }
        notes.push(note);
    }
    Ok(notes)
}

fn collect_asset_files(vault_root: &Path, folder: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(folder)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e.file_name()))
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name.ends_with(EXCALIDRAW_SOURCE_SUFFIX) {
            continue;
        }
        files.push(
            entry
                .path()
                .strip_prefix(vault_root)
                .unwrap_or(entry.path())
                .to_path_buf(),
        );
    }
    Ok(files)
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

fn is_note(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    name.ends_with(".md") && !name.ends_with(EXCALIDRAW_SOURCE_SUFFIX)
}
