//! Asset phase: materialize the vault's asset folder.
//!
//! Runs after every note has been converted, so the [`Registries`] filled by
//! the markdown pass are complete and read-only here. Each file below the
//! asset folder is handled independently and in parallel via
//! [rayon](https://docs.rs/rayon):
//!
//! | File | Registry hit | Output |
//! |---|---|---|
//! | `jpg`/`jpeg`/`png` | one or more directives | `{resized_name}.{format}` per directive |
//! | `jpg`/`jpeg`/`png` | none | skipped |
//! | `svg` | stem embedded by a note | `{stem}.light.svg` + `{stem}.dark.svg` |
//! | anything else | | copied under its whitespace-normalized name |
//!
//! Sub-folders are flattened: every output lands directly in
//! `static/{docusaurus_subfolder}/`, matching the links the markdown pass
//! wrote.

use crate::config::{Config, SvgConfig};
use crate::destination::to_filesystem_path;
use crate::imaging::{
    BackendError, ImageBackend, RequestedSize, ResizeConfig, create_resized_image,
    is_raster_extension,
};
use crate::naming::normalize_whitespace;
use crate::registry::Registries;
use crate::svg;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image processing failed: {0}")]
    Backend(#[from] BackendError),
    #[error("Asset not found: {0}")]
    SourceNotFound(PathBuf),
}

/// What happens to one asset file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetAction {
    /// Resize once per listed `resized_name`.
    Resize(Vec<String>),
    /// Write light and dark variants for this stem.
    ThemeSvg(String),
    Copy,
    /// Raster file no note embeds.
    Skip,
}

/// Decide what to do with an asset from its normalized file name.
pub fn plan_asset(file_name: &str, registries: &Registries) -> AssetAction {
    let Some((stem, ext)) = file_name.rsplit_once('.') else {
        return AssetAction::Copy;
    };
    if is_raster_extension(ext) {
        let names: Vec<String> = registries
            .images
            .directives_for(file_name)
            .map(|d| d.resized_name.clone())
            .collect();
        if names.is_empty() {
            AssetAction::Skip
        } else {
            AssetAction::Resize(names)
        }
    } else if ext.eq_ignore_ascii_case("svg") && registries.svgs.contains(stem) {
        AssetAction::ThemeSvg(stem.to_string())
    } else {
        AssetAction::Copy
    }
}

/// Result of processing one asset file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetOutcome {
    /// Path relative to the vault root.
    pub source: PathBuf,
    pub action: AssetAction,
    /// Written files, relative to the Docusaurus root (`/static/assets/x.webp`).
    pub outputs: Vec<String>,
}

impl AssetOutcome {
    /// Source file name, as recorded in the run log.
    pub fn source_name(&self) -> String {
        file_name_of(&self.source)
    }
}

/// An asset that failed part way. `written` lists what it produced before
/// the error, so those files can still be logged and cleaned up.
#[derive(Error, Debug)]
#[error("{}: {error}", .path.display())]
pub struct AssetFailure {
    /// Path relative to the vault root.
    pub path: PathBuf,
    pub written: Vec<String>,
    #[source]
    pub error: AssetError,
}

impl AssetFailure {
    pub fn source_name(&self) -> String {
        file_name_of(&self.path)
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Where asset outputs go and how rasters are encoded.
#[derive(Debug, Clone)]
pub struct AssetTarget {
    pub vault_root: PathBuf,
    pub docusaurus_root: PathBuf,
    /// Destination directory relative to the Docusaurus root: `/static/assets`.
    pub static_dir: String,
    pub resize: ResizeConfig,
    pub svg: SvgConfig,
}

impl AssetTarget {
    pub fn from_config(config: &Config) -> Self {
        Self {
            vault_root: PathBuf::from(&config.directories.vault),
            docusaurus_root: PathBuf::from(&config.directories.docusaurus),
            static_dir: format!("/static/{}", config.assets.docusaurus_subfolder),
            resize: ResizeConfig::from(&config.images),
            svg: config.svg.clone(),
        }
    }

    fn output_dir(&self) -> PathBuf {
        to_filesystem_path(&self.docusaurus_root, &self.static_dir)
    }
}

/// Process every asset file in parallel.
///
/// A failing file does not stop the others. Results are returned in input
/// order.
pub fn process_assets(
    backend: &impl ImageBackend,
    files: &[PathBuf],
    registries: &Registries,
    target: &AssetTarget,
) -> Vec<Result<AssetOutcome, AssetFailure>> {
    files
        .par_iter()
        .map(|rel| process_asset(backend, rel, registries, target))
        .collect()
}

/// Process one asset file given by its vault-relative path.
pub fn process_asset(
    backend: &impl ImageBackend,
    rel: &Path,
    registries: &Registries,
    target: &AssetTarget,
) -> Result<AssetOutcome, AssetFailure> {
    let file_name = rel
        .file_name()
        .map(|n| normalize_whitespace(&n.to_string_lossy()))
        .unwrap_or_default();
    let action = plan_asset(&file_name, registries);

    let mut outputs = Vec::new();
    match materialize(backend, rel, &file_name, &action, registries, target, &mut outputs) {
        Ok(()) => Ok(AssetOutcome {
            source: rel.to_path_buf(),
            action,
            outputs,
        }),
        Err(error) => Err(AssetFailure {
            path: rel.to_path_buf(),
            written: outputs,
            error,
        }),
    }
}

/// Write the outputs for `action`, pushing each one as soon as it exists.
fn materialize(
    backend: &impl ImageBackend,
    rel: &Path,
    file_name: &str,
    action: &AssetAction,
    registries: &Registries,
    target: &AssetTarget,
    outputs: &mut Vec<String>,
) -> Result<(), AssetError> {
    let source = target.vault_root.join(rel);
    if !source.is_file() {
        return Err(AssetError::SourceNotFound(source));
    }
    let output_dir = target.output_dir();
    fs::create_dir_all(&output_dir)?;

    match action {
        AssetAction::Resize(names) => {
            for name in names {
                let requested = registries
                    .images
                    .get(name)
                    .map(|d| RequestedSize {
                        width: d.width,
                        height: d.height,
                    })
                    .unwrap_or_default();
                let image = create_resized_image(
                    backend,
                    &source,
                    &output_dir,
                    name,
                    requested,
                    &target.resize,
                )?;
                tracing::debug!(
                    source = %rel.display(),
                    output = %image.file_name,
                    width = image.width,
                    height = image.height,
                    "resized image"
                );
                outputs.push(format!("{}/{}", target.static_dir, image.file_name));
            }
        }
        AssetAction::ThemeSvg(stem) => {
            let variants = svg::write_variants(&source, &output_dir, stem, &target.svg);
            outputs.extend(
                ["light", "dark"]
                    .iter()
                    .map(|theme| format!("{}/{stem}.{theme}.svg", target.static_dir))
                    .filter(|dest| to_filesystem_path(&target.docusaurus_root, dest).is_file()),
            );
            variants?;
        }
        AssetAction::Copy => {
            fs::copy(&source, output_dir.join(file_name))?;
            outputs.push(format!("{}/{file_name}", target.static_dir));
        }
        AssetAction::Skip => {
            tracing::debug!(source = %rel.display(), "raster asset not embedded, skipping");
        }
    }
    Ok(())
}
