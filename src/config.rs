//! Converter configuration.
//!
//! Handles loading and validating `obsidiosaurus.toml`. Stock defaults are
//! the base layer; a user config file only needs the keys it wants to change.
//! The resolved [`Config`] is read-only for the rest of the run.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [directories]
//! vault = "vault"                 # Obsidian vault (source root)
//! docusaurus = "website"          # Docusaurus site root (destination)
//! ignored_folders = [".obsidian", ".trash"]
//! log_file = "obsidiosaurus.log"  # Relative to the docusaurus root
//!
//! [assets]
//! vault_folder = "assets"         # Attachment folder inside the vault
//! docusaurus_subfolder = "assets" # Published as static/<subfolder>/
//!
//! [language]
//! i18n = true
//! separator = "__"                # note__de.md
//! main = "en"
//! secondary = []                  # e.g. ["de", "fr"]
//!
//! [content]
//! admonition_types = ["note", "tip", "info", "caution", "danger"]
//! multi_blog_suffix = "__blog"
//! excalidraw = true
//!
//! [images]
//! format = "webp"                 # webp, png, jpeg, avif
//! max_width = 1200
//! quality = 90
//!
//! [svg]
//! dark_foreground = "#c9d1d9"
//! dark_background = "#0d1117"
//!
//! [processing]
//! max_processes = 4               # Omit for auto = CPU cores
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::OutputFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "obsidiosaurus.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Resolved converter configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub directories: DirectoriesConfig,
    pub assets: AssetsConfig,
    pub language: LanguageConfig,
    pub content: ContentConfig,
    pub images: ImagesConfig,
    pub svg: SvgConfig,
    pub processing: ProcessingConfig,
}

impl Config {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.language.separator.is_empty() {
            return Err(ConfigError::Validation(
                "language.separator must not be empty".into(),
            ));
        }
        if self.assets.vault_folder.is_empty() || self.assets.docusaurus_subfolder.is_empty() {
            return Err(ConfigError::Validation(
                "assets.vault_folder and assets.docusaurus_subfolder must not be empty".into(),
            ));
        }
        if self.images.max_width == 0 {
            return Err(ConfigError::Validation(
                "images.max_width must be non-zero".into(),
            ));
        }
        if self.images.quality > 100 {
            return Err(ConfigError::Validation(
                "images.quality must be 0-100".into(),
            ));
        }
        if self.content.multi_blog_suffix.is_empty() {
            return Err(ConfigError::Validation(
                "content.multi_blog_suffix must not be empty".into(),
            ));
        }
        if self.language.secondary.contains(&self.language.main) {
            return Err(ConfigError::Validation(format!(
                "language.secondary must not contain the main language '{}'",
                self.language.main
            )));
        }
        Ok(())
    }

    /// Absolute-or-relative path of the run log.
    pub fn log_path(&self) -> PathBuf {
        Path::new(&self.directories.docusaurus).join(&self.directories.log_file)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DirectoriesConfig {
    /// Obsidian vault root.
    pub vault: String,
    /// Docusaurus site root.
    pub docusaurus: String,
    /// Top-level vault folders never classified.
    pub ignored_folders: Vec<String>,
    /// Run log file name, relative to the Docusaurus root.
    pub log_file: String,
}

impl Default for DirectoriesConfig {
    fn default() -> Self {
        Self {
            vault: "vault".to_string(),
            docusaurus: "website".to_string(),
            ignored_folders: vec![".obsidian".to_string(), ".trash".to_string()],
            log_file: "obsidiosaurus.log".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetsConfig {
    /// Name of the attachment folder at the vault root.
    pub vault_folder: String,
    /// Subfolder of `static/` the assets are published into.
    pub docusaurus_subfolder: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            vault_folder: "assets".to_string(),
            docusaurus_subfolder: "assets".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LanguageConfig {
    /// Fold `note/note__xx.md` into the parent folder's slot.
    pub i18n: bool,
    /// Token between a note's slug and its language code.
    pub separator: String,
    pub main: String,
    pub secondary: Vec<String>,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            i18n: true,
            separator: "__".to_string(),
            main: "en".to_string(),
            secondary: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentConfig {
    /// Callout types converted into Docusaurus admonitions.
    pub admonition_types: Vec<String>,
    /// Folder-name suffix marking an additional blog instance.
    pub multi_blog_suffix: String,
    /// Rewrite `![[x.excalidraw]]` embeds into light/dark SVG pairs.
    pub excalidraw: bool,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            admonition_types: ["note", "tip", "info", "caution", "danger"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            multi_blog_suffix: "__blog".to_string(),
            excalidraw: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// Encoding for resized raster images.
    pub format: OutputFormat,
    /// Upper bound on output width when no size is requested.
    pub max_width: u32,
    /// Lossy encoding quality (0 = worst, 100 = best).
    pub quality: u32,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Webp,
            max_width: 1200,
            quality: 90,
        }
    }
}

/// Colours substituted into the dark variant of each referenced SVG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SvgConfig {
    pub dark_foreground: String,
    pub dark_background: String,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            dark_foreground: "#c9d1d9".to_string(),
            dark_background: "#0d1117".to_string(),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel asset workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(Config::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Parse config text, layer it over the defaults, and validate.
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let overlay: toml::Value = toml::from_str(content)?;
    let merged = merge_toml(stock_defaults_value()?, overlay);
    let config: Config = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load and validate the config file at `path`.
///
/// A missing file is an error: callers that want defaults should not call
/// this at all.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Returns a fully-commented stock config with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Obsidiosaurus Configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Directories
# ---------------------------------------------------------------------------
[directories]
# Obsidian vault to read from.
vault = "vault"

# Docusaurus site root to write into.
docusaurus = "website"

# Top-level vault folders that are never converted.
ignored_folders = [".obsidian", ".trash"]

# Run log, relative to the docusaurus root. Lists every generated file so the
# next run can remove it before converting again.
log_file = "obsidiosaurus.log"

# ---------------------------------------------------------------------------
# Assets
# ---------------------------------------------------------------------------
[assets]
# Attachment folder at the vault root.
vault_folder = "assets"

# Published as static/<docusaurus_subfolder>/ and linked as /<docusaurus_subfolder>/.
docusaurus_subfolder = "assets"

# ---------------------------------------------------------------------------
# Languages
# ---------------------------------------------------------------------------
[language]
# Fold folder notes (note/note__de.md) into the parent folder's slot.
i18n = true

# Token between a note's name and its language code: note__de.md
separator = "__"

# Language of notes without a language code.
main = "en"

# Languages written to i18n/<code>/...
secondary = []

# ---------------------------------------------------------------------------
# Content
# ---------------------------------------------------------------------------
[content]
# Callout types converted into Docusaurus admonitions. Others pass through.
admonition_types = ["note", "tip", "info", "caution", "danger"]

# Top-level folders ending in this suffix become extra blog instances.
multi_blog_suffix = "__blog"

# Rewrite excalidraw embeds into light/dark SVG image pairs.
excalidraw = true

# ---------------------------------------------------------------------------
# Images
# ---------------------------------------------------------------------------
[images]
# Output format for resized images: webp, png, jpeg, avif.
format = "webp"

# Images without a requested size are capped at this width.
max_width = 1200

# Encoding quality for lossy formats (0 = worst, 100 = best).
quality = 90

# ---------------------------------------------------------------------------
# SVG dark variants
# ---------------------------------------------------------------------------
[svg]
# Replaces rgb(0, 0, 0) in the dark variant.
dark_foreground = "#c9d1d9"

# Replaces rgb(255, 255, 255) in the dark variant.
dark_background = "#0d1117"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel asset workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
