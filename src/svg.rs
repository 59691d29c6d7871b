//! Light/dark SVG variants.
//!
//! Every SVG referenced from a note is published twice: `{stem}.light.svg`
//! holds the original bytes and `{stem}.dark.svg` has black strokes and white
//! fills swapped for the configured dark theme colours. The page picks one
//! through the `#light` / `#dark` URL fragment.

use crate::config::SvgConfig;
use regex::{Captures, Regex};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

const BLACK: &str = "rgb(0, 0, 0)";

/// Black and white as emitted by Excalidraw and most diagram exporters.
static THEME_COLOURS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"rgb\(0, 0, 0\)|rgb\(255, 255, 255\)").expect("theme colour pattern")
});

/// Swap black for the dark foreground and white for the dark background.
///
/// Both substitutions happen in one pass, so a configured colour that is
/// itself black or white is never substituted twice.
pub fn dark_variant(svg: &str, colours: &SvgConfig) -> String {
    THEME_COLOURS
        .replace_all(svg, |caps: &Captures| {
            if &caps[0] == BLACK {
                colours.dark_foreground.clone()
            } else {
                colours.dark_background.clone()
            }
        })
        .into_owned()
}

/// Output paths written by [`write_variants`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgVariants {
    pub light: PathBuf,
    pub dark: PathBuf,
}

/// Write `{stem}.light.svg` and `{stem}.dark.svg` for `source` into `output_dir`.
pub fn write_variants(
    source: &Path,
    output_dir: &Path,
    stem: &str,
    colours: &SvgConfig,
) -> io::Result<SvgVariants> {
    let data = fs::read_to_string(source)?;
    fs::create_dir_all(output_dir)?;

    let light = output_dir.join(format!("{stem}.light.svg"));
    let dark = output_dir.join(format!("{stem}.dark.svg"));
    fs::write(&light, &data)?;
    fs::write(&dark, dark_variant(&data, colours))?;
    Ok(SvgVariants { light, dark })
}
