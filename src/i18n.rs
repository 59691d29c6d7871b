//! Language detection and folder-note grouping.
//!
//! Notes carry their language in the file name: `note.md` is the main
//! language, `note__de.md` is German when `de` is a configured secondary
//! language. Translations of one note usually live together in a folder
//! named after the note (Obsidian's "folder note" convention):
//!
//! ```text
//! docs/guide/01-Intro/Intro__en.md   →  docs/guide/01-Intro.md
//! docs/guide/01-Intro/Intro__de.md   →  i18n/de/.../guide/01-Intro.md
//! ```
//!
//! Docusaurus expects one flat file per slug, so such notes are folded into
//! their parent folder's slot.

use crate::naming::strip_numeric_prefix;
use crate::types::Language;

/// Detect a note's language from its stem (`note__de` with separator `__`).
///
/// The second `separator`-delimited part is the language code. A code that
/// is not in `secondary` is still returned as-is, with `secondary = false`.
pub fn detect_language(
    file_stem: &str,
    separator: &str,
    main_language: &str,
    secondary_languages: &[String],
) -> Language {
    if separator.is_empty() {
        return Language::main(main_language);
    }
    let mut parts = file_stem.split(separator);
    parts.next();
    match parts.next() {
        Some(code) => Language {
            code: code.to_string(),
            secondary: secondary_languages.iter().any(|l| l == code),
        },
        None => Language::main(main_language),
    }
}

/// Whether a note should replace its parent folder in the destination tree.
///
/// Numeric prefixes are stripped from both names and the comparison ignores
/// case and the language suffix: `("01-Intro", "Intro__en")` groups,
/// `("Intro", "Overview__en")` does not.
pub fn is_i18n_groupable(parent_folder_name: &str, file_stem: &str, separator: &str) -> bool {
    let folder = strip_numeric_prefix(parent_folder_name).to_lowercase();
    let stem = strip_numeric_prefix(file_stem);
    let base = if separator.is_empty() {
        stem.as_str()
    } else {
        stem.split(separator).next().unwrap_or_default()
    };
    base.to_lowercase() == folder
}

/// Remove the `{separator}{code}` suffix from a stem: `note__de` → `note`.
pub fn strip_language_suffix<'a>(file_stem: &'a str, separator: &str) -> &'a str {
    if separator.is_empty() {
        return file_stem;
    }
    file_stem.split(separator).next().unwrap_or(file_stem)
}
