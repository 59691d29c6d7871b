//! Shared test utilities for the obsidiosaurus test suite.
//!
//! Builds a synthetic vault in a temp directory and provides lookup helpers
//! over scan-phase data structures (`VaultManifest`, `PlannedNote`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_vault();
//! let config = vault_config(tmp.path());
//! let manifest = scan(&tmp.path().join("vault"), &config).unwrap();
//!
//! let note = find_note(&manifest, "Intro__de.md");
//! assert!(note.grouped);
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use image::{ImageEncoder, RgbImage};

use crate::config::Config;
use crate::scan::{ContentSection, PlannedNote, VaultManifest};
use crate::transform::TransformSettings;

// =========================================================================
// Fixture setup
// =========================================================================

/// Pipeline settings for the stock config.
pub fn transform_settings() -> TransformSettings {
    TransformSettings::from_config(&Config::default())
}

/// Config pointing at the vault built by [`setup_vault`] under `root`,
/// with German as a secondary language.
pub fn vault_config(root: &Path) -> Config {
    let mut config = Config::default();
    config.directories.vault = root.join("vault").to_string_lossy().to_string();
    config.directories.docusaurus = root.join("website").to_string_lossy().to_string();
    config.language.secondary = vec!["de".to_string()];
    config
}

pub const SETUP_NOTE: &str = "\
# Setup

> [!tip] Before you start
> Install the tools first.

![A cat|300](../../assets/cat.png)
![](../../assets/photos/Beach%20Day.jpg)
See [the intro](../01-Intro/Intro__en.md#why).
Grab the manual: ![](../../assets/manual.pdf)
![[diagram.svg]]
![[Flow.excalidraw]]
";

/// Build a small vault with every content type in a temp directory.
///
/// ```text
/// <tmp>/vault/
/// ├── .obsidian/app.json
/// ├── README.md                    # file at the root, ignored
/// ├── journal/day.md               # unrecognized folder
/// ├── docs/
/// │   ├── Welcome.md
/// │   └── guide/
/// │       ├── _category_.yml.md
/// │       ├── setup.md
/// │       └── 01-Intro/{Intro__en.md, Intro__de.md}
/// ├── blog/{2024-01-01-hello.md, 2024-01-01-hello__de.md}
/// ├── news__blog/First Post.md
/// └── assets/
///     ├── cat.png (1600x800), unused.png, diagram.svg, manual.pdf
///     ├── Flow.excalidraw.md
///     └── photos/Beach Day.jpg (400x300)
/// ```
///
/// `<tmp>/website/` exists and is empty.
pub fn setup_vault() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let vault = tmp.path().join("vault");

    write(&vault, ".obsidian/app.json", "{}");
    write(&vault, "README.md", "# My vault\n");
    write(&vault, "journal/day.md", "Dear diary\n");

    write(&vault, "docs/Welcome.md", "# Welcome\n");
    write(
        &vault,
        "docs/guide/_category_.yml.md",
        "label: Guide\nposition: 2\n",
    );
    write(&vault, "docs/guide/setup.md", SETUP_NOTE);
    write(
        &vault,
        "docs/guide/01-Intro/Intro__en.md",
        "---\ntitle: Intro\n---\n# Intro\n",
    );
    write(
        &vault,
        "docs/guide/01-Intro/Intro__de.md",
        "---\ntitle: Einleitung\n---\n# Einleitung\n",
    );

    write(&vault, "blog/2024-01-01-hello.md", "# Hello\n");
    write(&vault, "blog/2024-01-01-hello__de.md", "# Hallo\n");
    write(&vault, "news__blog/First Post.md", "![](../assets/cat.png)\n");

    create_test_png(&vault.join("assets/cat.png"), 1600, 800);
    create_test_png(&vault.join("assets/unused.png"), 64, 64);
    create_test_jpeg(&vault.join("assets/photos/Beach Day.jpg"), 400, 300);
    write(&vault, "assets/diagram.svg", TEST_SVG);
    write(&vault, "assets/manual.pdf", "%PDF-1.4\n");
    write(&vault, "assets/Flow.excalidraw.md", "excalidraw-plugin: parsed\n");

    fs::create_dir_all(tmp.path().join("website")).unwrap();
    tmp
}

pub const TEST_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg"><rect fill="rgb(255, 255, 255)"/><path stroke="rgb(0, 0, 0)"/></svg>"#;

/// Write `content` to `root/rel`, creating parent directories.
pub fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = gradient(width, height);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let file = fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

pub fn create_test_png(path: &Path, width: u32, height: u32) {
    let img = gradient(width, height);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let file = fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::png::PngEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

// =========================================================================
// Lookup helpers
// =========================================================================

/// Find a content section by its vault folder name. Panics if missing.
pub fn find_section<'a>(manifest: &'a VaultManifest, folder: &str) -> &'a ContentSection {
    manifest
        .sections
        .iter()
        .find(|s| s.folder == folder)
        .unwrap_or_else(|| {
            let names: Vec<&str> = manifest.sections.iter().map(|s| s.folder.as_str()).collect();
            panic!("section '{folder}' not found, have: {names:?}")
        })
}

/// Find a planned note by its source file name. Panics if missing.
pub fn find_note<'a>(manifest: &'a VaultManifest, file_name: &str) -> &'a PlannedNote {
    manifest
        .notes()
        .find(|n| n.log_name == file_name)
        .unwrap_or_else(|| panic!("note '{file_name}' not found"))
}

/// Every planned destination, in scan order.
pub fn destinations(manifest: &VaultManifest) -> Vec<&str> {
    manifest.notes().map(|n| n.destination.as_str()).collect()
}

/// Read a file below the Docusaurus root by its `/`-prefixed destination.
pub fn read_output(docusaurus_root: &Path, destination: &str) -> String {
    let path = crate::destination::to_filesystem_path(docusaurus_root, destination);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("{}: {e}", path.display()))
}
