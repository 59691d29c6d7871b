//! # Obsidiosaurus
//!
//! Converts an Obsidian vault into the content tree of a Docusaurus site.
//! The vault's top-level folders decide where things go: `docs/` becomes the
//! docs plugin, `blog/` and every `*__blog/` folder become blog instances,
//! and the attachment folder is published under `static/`.
//!
//! # Architecture: Scan, then Convert
//!
//! ```text
//! 1. Scan      vault/    →  VaultManifest   (classify folders, plan every note)
//! 2. Convert   manifest  →  website/        (markdown phase, then asset phase)
//! ```
//!
//! The scan stage is read-only and produces a serializable plan, so
//! `obsidiosaurus scan --json` shows exactly what a conversion would write.
//!
//! The convert stage runs two phases with a hard barrier between them.
//! Rewriting notes collects every image and SVG embed into per-run
//! [`registry`] values; only when all notes are written does the asset phase
//! resize, theme and copy attachments against those complete registries.
//!
//! Every written file is recorded in a run log. The next run removes exactly
//! those files before writing again ([`cleanup`]), so hand-written pages in
//! the site survive repeated conversions.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: folder classification and per-note destination planning |
//! | [`convert`] | Stage 2: two-phase conversion with progress events |
//! | [`transform`] | Line-oriented markdown rewriter: callouts, embeds, links, frontmatter |
//! | [`registry`] | Image directives and SVG references collected during the markdown phase |
//! | [`assets`] | Asset phase: resize, SVG light/dark variants, plain copies |
//! | [`svg`] | SVG dark-theme colour substitution |
//! | [`imaging`] | Pure-Rust resize and encode behind the [`imaging::ImageBackend`] trait |
//! | [`destination`] | Docusaurus layout: content type + language → destination path |
//! | [`i18n`] | Language suffix detection and folder-note grouping |
//! | [`naming`] | Whitespace normalization and numeric-prefix stripping |
//! | [`types`] | Shared types (`ContentType`, `ContentDescriptor`, `Language`) |
//! | [`cleanup`] | Run log and previous-run cleanup |
//! | [`config`] | `obsidiosaurus.toml` loading, defaults and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Pattern Rewriter, Not a Markdown Parser
//!
//! Notes are rewritten line by line with a small set of regular expressions.
//! Obsidian's extensions (callouts, `![[embeds]]`, width suffixes) are
//! conventions layered on top of CommonMark, and rewriting them in place
//! leaves everything else in the note byte-for-byte intact. A line that
//! matches nothing passes through unchanged.
//!
//! ## Explicit Run State
//!
//! Admonition state, the sidebar name and both registries live in values
//! owned by one conversion run and passed by reference. Nothing is global,
//! so tests can convert many vaults in one process.
//!
//! ## Pure-Rust Imaging
//!
//! Resizing uses the `image` crate with Lanczos3 resampling and its built-in
//! WebP, PNG, JPEG and AVIF encoders. No ImageMagick, no system libraries.

pub mod assets;
pub mod cleanup;
pub mod config;
pub mod convert;
pub mod destination;
pub mod i18n;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod registry;
pub mod scan;
pub mod svg;
pub mod transform;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
