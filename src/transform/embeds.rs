//! Asset, excalidraw and SVG embed rewriting.
//!
//! | Obsidian | Docusaurus |
//! |---|---|
//! | `![alt\|300](assets/My%20Cat.png)` | `![alt](/assets/My-Cat_w300.webp)` + image directive |
//! | `![](assets/manual.pdf)` | `[Download manual.pdf](/assets/manual.pdf)` |
//! | `![[Drawing.excalidraw]]` | dark + light `Drawing.excalidraw.*.svg` image pair |
//! | `![[diagram.svg]]` | dark + light `diagram.*.svg` image pair + SVG reference |

use super::TransformSettings;
use crate::imaging::is_raster_extension;
use crate::naming::normalize_whitespace;
use crate::registry::{ImageDirective, ImageRegistry, SvgRegistry};
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

/// `![alt|W](path)` or `![alt|WxH](path)`; alt and size are optional.
static ASSET_EMBED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[(?P<alt>[^\]|]*)(?:\|(?P<w>\d+)(?:x(?P<h>\d+))?)?\]\((?P<path>[^)]+)\)")
        .expect("asset embed pattern")
});

/// `![[folder/Name.excalidraw]]`, optionally `.excalidraw.md` and `|alias`.
static EXCALIDRAW_EMBED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[\[(?:[^\]|]*/)?(?P<name>[^\]/|]+?)\.excalidraw(?:\.md)?(?:\|[^\]]*)?\]\]")
        .expect("excalidraw embed pattern")
});

/// `![[folder/name.svg]]`, optionally with `|alias`.
static SVG_EMBED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[\[(?:[^\]|]*/)?(?P<name>[^\]/|]+?)\.svg(?:\|[^\]]*)?\]\]")
        .expect("svg embed pattern")
});

/// Rewrite every `![...](...)` embed on the line.
///
/// Raster targets register an [`ImageDirective`] and point at the resized
/// output; other targets become download links. External URLs are untouched.
pub fn rewrite_asset_embeds<'a>(
    line: &'a str,
    settings: &TransformSettings,
    images: &mut ImageRegistry,
) -> Cow<'a, str> {
    ASSET_EMBED.replace_all(line, |caps: &Captures| {
        let path = &caps["path"];
        if path.contains("://") {
            return caps[0].to_string();
        }

        let normalized = normalize_whitespace(path.trim());
        let file_name = normalized.rsplit('/').next().unwrap_or(&normalized);
        let sub = &settings.asset_subfolder;

        let Some((stem, ext)) = file_name.rsplit_once('.') else {
            return format!("[Download {file_name}](/{sub}/{file_name})");
        };
        if !is_raster_extension(ext) {
            return format!("[Download {file_name}](/{sub}/{file_name})");
        }

        let size = |name: &str| caps.name(name).map(|m| m.as_str().parse::<u32>()).transpose();
        let (width, height) = match (size("w"), size("h")) {
            (Ok(width), Ok(height)) => (width, width.and(height)),
            _ => {
                tracing::debug!(embed = &caps[0], "embed size out of range, left unchanged");
                return caps[0].to_string();
            }
        };
        let directive = ImageDirective::new(file_name, stem, width, height);
        let target = format!(
            "/{sub}/{}.{}",
            directive.resized_name,
            settings.image_format.extension()
        );
        if images.register(directive) {
            tracing::debug!(file = file_name, "registered image directive");
        }
        format!("![{}]({target})", &caps["alt"])
    })
}

/// Replace a line embedding an excalidraw drawing with a dark/light SVG pair.
pub fn rewrite_excalidraw<'a>(line: &'a str, settings: &TransformSettings) -> Cow<'a, str> {
    match EXCALIDRAW_EMBED.captures(line) {
        Some(caps) => Cow::Owned(themed_pair(
            &settings.asset_subfolder,
            &normalize_whitespace(&caps["name"]),
            ".excalidraw",
        )),
        None => Cow::Borrowed(line),
    }
}

/// Replace a line embedding an SVG with a dark/light pair and record the SVG.
pub fn rewrite_svg<'a>(
    line: &'a str,
    settings: &TransformSettings,
    svgs: &mut SvgRegistry,
) -> Cow<'a, str> {
    match SVG_EMBED.captures(line) {
        Some(caps) => {
            let name = normalize_whitespace(&caps["name"]);
            let pair = themed_pair(&settings.asset_subfolder, &name, "");
            svgs.register(name);
            Cow::Owned(pair)
        }
        None => Cow::Borrowed(line),
    }
}

fn themed_pair(sub: &str, name: &str, infix: &str) -> String {
    format!("![](/{sub}/{name}{infix}.dark.svg#dark)\n![](/{sub}/{name}{infix}.light.svg#light)")
}
