//! CLI output formatting for all pipeline stages.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every note is its position and where it ends up in the site; the vault
//! path is shown as secondary context. This makes the output readable as a
//! plan of the site while still letting users trace pages back to notes.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Sections
//! 001 docs (docs_base, 3 notes)
//!     001 /docs/Welcome.md
//!         Source: docs/Welcome.md
//!     002 /i18n/de/docusaurus-plugin-content-docs/current/guide/01-Intro.md [de]
//!         Source: docs/guide/01-Intro/Intro__de.md
//!
//! Assets
//!     assets/ (6 files)
//!
//! Skipped
//!     journal: Unrecognized folder: journal
//! ```
//!
//! ## Convert
//!
//! ```text
//! docs (3 notes)
//!     001 /docs/Welcome.md
//! assets (6 files)
//!     cat.png → cat_w300.webp, cat.webp
//!     unused.png: skipped
//!
//! Converted 3 notes, 5 asset files; logged 8 entries
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::assets::AssetAction;
use crate::cleanup::CleanupReport;
use crate::convert::{ConversionReport, ConvertEvent};
use crate::scan::{NoteKind, PlannedNote, VaultManifest};
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 note`, `2 notes`; `many` is used for every count but one.
fn count(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Format a note line: index, destination, and language or copy markers.
///
/// ```text
/// 001 /docs/guide/setup.md
/// 002 /i18n/de/.../guide/01-Intro.md [de]
/// 003 /docs/guide/_category_.yml (verbatim)
/// ```
fn note_line(index: usize, destination: &str, language: Option<&str>, kind: NoteKind) -> String {
    let mut line = format!("{} {}", format_index(index), destination);
    if let Some(code) = language {
        line.push_str(&format!(" [{code}]"));
    }
    if kind == NoteKind::Verbatim {
        line.push_str(" (verbatim)");
    }
    line
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn secondary_code(note: &PlannedNote) -> Option<&str> {
    note.language
        .secondary
        .then_some(note.language.code.as_str())
}

// ============================================================================
// Stage 1: Scan output
// ============================================================================

/// Format scan output: every section with its planned notes, the asset
/// folder and the folders that were skipped.
pub fn format_scan_output(manifest: &VaultManifest) -> Vec<String> {
    let mut lines = vec!["Sections".to_string()];

    for (i, section) in manifest.sections.iter().enumerate() {
        lines.push(format!(
            "{} {} ({}, {})",
            format_index(i + 1),
            section.folder,
            section.descriptor.content_type,
            count(section.notes.len(), "note", "notes")
        ));
        for (j, note) in section.notes.iter().enumerate() {
            lines.push(format!(
                "{}{}",
                indent(1),
                note_line(j + 1, &note.destination, secondary_code(note), note.kind)
            ));
            lines.push(format!("{}Source: {}", indent(2), note.source.display()));
            if let Some(sidebar) = &note.sidebar {
                lines.push(format!("{}Sidebar: {}", indent(2), sidebar));
            }
        }
    }

    if let Some(assets) = &manifest.assets {
        lines.push(String::new());
        lines.push("Assets".to_string());
        lines.push(format!(
            "{}{}/ ({})",
            indent(1),
            assets.folder,
            count(assets.files.len(), "file", "files")
        ));
    }

    if !manifest.skipped.is_empty() {
        lines.push(String::new());
        lines.push("Skipped".to_string());
        for skipped in &manifest.skipped {
            lines.push(format!("{}{}: {}", indent(1), skipped.name, skipped.reason));
        }
    }

    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(manifest: &VaultManifest) {
    for line in format_scan_output(manifest) {
        println!("{}", line);
    }
}

/// Format the `check` summary line for a scanned vault.
pub fn format_check_output(manifest: &VaultManifest, vault_root: &Path) -> Vec<String> {
    let mut lines = vec![format!(
        "{}: {}, {}, {}",
        vault_root.display(),
        count(manifest.sections.len(), "section", "sections"),
        count(manifest.note_count(), "note", "notes"),
        count(
            manifest.assets.as_ref().map_or(0, |a| a.files.len()),
            "asset",
            "assets"
        ),
    )];
    for skipped in &manifest.skipped {
        lines.push(format!("{}skipped {}: {}", indent(1), skipped.name, skipped.reason));
    }
    lines
}

// ============================================================================
// Stage 2: Convert output
// ============================================================================

/// Format a single convert progress event as display lines.
pub fn format_convert_event(event: &ConvertEvent) -> Vec<String> {
    match event {
        ConvertEvent::SectionStarted {
            folder, note_count, ..
        } => vec![format!("{} ({})", folder, count(*note_count, "note", "notes"))],
        ConvertEvent::NoteConverted {
            index,
            destination,
            kind,
            ..
        } => vec![format!(
            "{}{}",
            indent(1),
            note_line(*index, destination, None, *kind)
        )],
        ConvertEvent::AssetsStarted { folder, file_count } => {
            vec![format!("{} ({})", folder, count(*file_count, "file", "files"))]
        }
        ConvertEvent::AssetProcessed {
            source,
            action,
            outputs,
        } => {
            let name = file_name(source);
            let line = match action {
                AssetAction::Skip => format!("{name}: skipped"),
                AssetAction::Copy => format!("{name}: copied"),
                AssetAction::Resize(_) | AssetAction::ThemeSvg(_) => {
                    let written: Vec<&str> = outputs.iter().map(|o| file_name(o)).collect();
                    format!("{name} \u{2192} {}", written.join(", "))
                }
            };
            vec![format!("{}{}", indent(1), line)]
        }
    }
}

/// Format the end-of-run summary.
pub fn format_conversion_summary(report: &ConversionReport) -> Vec<String> {
    let mut lines = vec![format!(
        "Converted {}, {}; logged {}",
        count(report.notes_written, "note", "notes"),
        count(report.asset_outputs(), "asset file", "asset files"),
        count(report.log_entries, "entry", "entries"),
    )];
    for image in report.unresolved_images() {
        lines.push(format!("{}missing image: {}", indent(1), image));
    }
    lines
}

pub fn print_conversion_summary(report: &ConversionReport) {
    for line in format_conversion_summary(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Cleanup output
// ============================================================================

/// Format what a cleanup pass removed.
pub fn format_cleanup_output(report: &CleanupReport) -> Vec<String> {
    if !report.log_found {
        return vec!["Nothing to clean (no run log)".to_string()];
    }
    let mut lines = vec![format!(
        "Cleaned {}, {}",
        count(report.files_removed.len(), "file", "files"),
        count(report.dirs_removed.len(), "directory", "directories"),
    )];
    if report.dirs_kept > 0 {
        lines.push(format!(
            "{}kept {} still in use",
            indent(1),
            count(report.dirs_kept, "directory", "directories")
        ));
    }
    for failure in &report.failures {
        lines.push(format!(
            "{}failed: {} ({})",
            indent(1),
            failure.path.display(),
            failure.error
        ));
    }
    lines
}

pub fn print_cleanup_output(report: &CleanupReport) {
    for line in format_cleanup_output(report) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleanup::CleanupFailure;
    use crate::registry::{ImageDirective, Registries};
    use crate::scan::{AssetSection, ContentSection, SkippedFolder};
    use crate::types::{ContentDescriptor, ContentType, Language};
    use std::path::PathBuf;

    fn planned(source: &str, destination: &str, language: Language, kind: NoteKind) -> PlannedNote {
        PlannedNote {
            source: source.into(),
            destination: destination.into(),
            log_name: file_name(source).into(),
            language,
            sidebar: None,
            grouped: false,
            kind,
        }
    }

    fn manifest() -> VaultManifest {
        let de = Language {
            code: "de".into(),
            secondary: true,
        };
        let mut welcome = planned(
            "docs/Welcome.md",
            "/docs/Welcome.md",
            Language::main("en"),
            NoteKind::Markdown,
        );
        welcome.sidebar = Some("Welcome".into());
        VaultManifest {
            vault_root: PathBuf::from("/vault"),
            sections: vec![ContentSection {
                folder: "docs".into(),
                descriptor: ContentDescriptor::new(ContentType::DocsBase, "docs"),
                notes: vec![
                    welcome,
                    planned(
                        "docs/guide/Intro/Intro__de.md",
                        "/i18n/de/docusaurus-plugin-content-docs/current/guide/Intro.md",
                        de,
                        NoteKind::Markdown,
                    ),
                    planned(
                        "docs/guide/_category_.yml.md",
                        "/docs/guide/_category_.yml",
                        Language::main("en"),
                        NoteKind::Verbatim,
                    ),
                ],
            }],
            assets: Some(AssetSection {
                folder: "assets".into(),
                files: vec!["assets/cat.png".into(), "assets/manual.pdf".into()],
            }),
            skipped: vec![SkippedFolder {
                name: "journal".into(),
                reason: "Unrecognized folder: journal".into(),
            }],
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn count_forms() {
        assert_eq!(count(1, "note", "notes"), "1 note");
        assert_eq!(count(0, "note", "notes"), "0 notes");
        assert_eq!(count(2, "entry", "entries"), "2 entries");
    }

    #[test]
    fn note_line_markers() {
        assert_eq!(
            note_line(2, "/i18n/de/x.md", Some("de"), NoteKind::Markdown),
            "002 /i18n/de/x.md [de]"
        );
        assert_eq!(
            note_line(3, "/docs/_category_.yml", None, NoteKind::Verbatim),
            "003 /docs/_category_.yml (verbatim)"
        );
    }

    // =========================================================================
    // Scan / check
    // =========================================================================

    #[test]
    fn scan_output_layout() {
        let lines = format_scan_output(&manifest());
        assert_eq!(lines[0], "Sections");
        assert_eq!(lines[1], "001 docs (docs_base, 3 notes)");
        assert_eq!(lines[2], "    001 /docs/Welcome.md");
        assert_eq!(lines[3], "        Source: docs/Welcome.md");
        assert_eq!(lines[4], "        Sidebar: Welcome");
        assert!(lines[5].ends_with("guide/Intro.md [de]"));
        assert!(lines.contains(&"    assets/ (2 files)".to_string()));
        assert_eq!(
            lines.last().unwrap(),
            "    journal: Unrecognized folder: journal"
        );
    }

    #[test]
    fn check_output_counts() {
        let lines = format_check_output(&manifest(), Path::new("vault"));
        assert_eq!(lines[0], "vault: 1 section, 3 notes, 2 assets");
        assert_eq!(lines[1], "    skipped journal: Unrecognized folder: journal");
    }

    // =========================================================================
    // Convert events
    // =========================================================================

    #[test]
    fn section_started_event() {
        let event = ConvertEvent::SectionStarted {
            folder: "news__blog".into(),
            descriptor: ContentDescriptor::new(ContentType::BlogMulti, "news"),
            note_count: 1,
        };
        assert_eq!(format_convert_event(&event), vec!["news__blog (1 note)"]);
    }

    #[test]
    fn note_converted_event() {
        let event = ConvertEvent::NoteConverted {
            index: 4,
            source: "blog/post.md".into(),
            destination: "/blog/post.md".into(),
            kind: NoteKind::Markdown,
        };
        assert_eq!(format_convert_event(&event), vec!["    004 /blog/post.md"]);
    }

    #[test]
    fn asset_events() {
        let resized = ConvertEvent::AssetProcessed {
            source: "assets/cat.png".into(),
            action: AssetAction::Resize(vec!["cat_w300".into(), "cat".into()]),
            outputs: vec![
                "/static/assets/cat_w300.webp".into(),
                "/static/assets/cat.webp".into(),
            ],
        };
        assert_eq!(
            format_convert_event(&resized),
            vec!["    cat.png \u{2192} cat_w300.webp, cat.webp"]
        );

        let skipped = ConvertEvent::AssetProcessed {
            source: "assets/unused.png".into(),
            action: AssetAction::Skip,
            outputs: vec![],
        };
        assert_eq!(format_convert_event(&skipped), vec!["    unused.png: skipped"]);
    }

    #[test]
    fn conversion_summary_lists_missing_images() {
        let mut registries = Registries::default();
        registries
            .images
            .register(ImageDirective::new("ghost.png", "ghost", None, None));
        let report = ConversionReport {
            notes_written: 3,
            assets: vec![],
            registries,
            log_entries: 1,
        };
        let lines = format_conversion_summary(&report);
        assert_eq!(lines[0], "Converted 3 notes, 0 asset files; logged 1 entry");
        assert_eq!(lines[1], "    missing image: ghost.png");
    }

    // =========================================================================
    // Cleanup
    // =========================================================================

    #[test]
    fn cleanup_without_log() {
        assert_eq!(
            format_cleanup_output(&CleanupReport::default()),
            vec!["Nothing to clean (no run log)"]
        );
    }

    #[test]
    fn cleanup_with_failures() {
        let report = CleanupReport {
            log_found: true,
            files_removed: vec!["a".into(), "b".into()],
            dirs_removed: vec!["d".into()],
            dirs_kept: 2,
            failures: vec![CleanupFailure {
                path: "/site/gone.md".into(),
                error: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            }],
        };
        let lines = format_cleanup_output(&report);
        assert_eq!(lines[0], "Cleaned 2 files, 1 directory");
        assert_eq!(lines[1], "    kept 2 directories still in use");
        assert_eq!(lines[2], "    failed: /site/gone.md (not found)");
    }
}
