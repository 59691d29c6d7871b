//! Line transformation pipeline.
//!
//! Every note is rewritten line by line. Each line passes through these
//! stages in order, with [`FileTransformState`] carried across lines:
//!
//! | # | Stage | Module |
//! |---|---|---|
//! | 1 | Sidebar frontmatter (docs only, first line) | here |
//! | 2 | Callout → admonition state machine | [`admonition`] |
//! | 3 | Asset/image embeds | [`embeds`] |
//! | 4 | Internal links | [`links`] |
//! | 5 | Excalidraw embeds | [`embeds`] |
//! | 6 | SVG embeds | [`embeds`] |
//!
//! The pipeline is line-oriented by design: it is a pattern rewriter for a
//! fixed set of Obsidian conventions, not a markdown parser. A line that
//! matches no pattern comes out unchanged. Stage output may span several
//! lines; each emitted chunk is terminated with `\n`.

pub mod admonition;
pub mod embeds;
pub mod links;

use crate::config::Config;
use crate::imaging::OutputFormat;
use crate::registry::Registries;
use admonition::BlockState;

/// Pipeline settings derived from [`Config`] once per run.
#[derive(Debug, Clone)]
pub struct TransformSettings {
    /// Lowercase callout types converted into admonitions.
    pub admonition_types: Vec<String>,
    pub asset_subfolder: String,
    pub image_format: OutputFormat,
    pub language_separator: String,
    pub multi_blog_suffix: String,
    pub excalidraw: bool,
}

impl TransformSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            admonition_types: config
                .content
                .admonition_types
                .iter()
                .map(|t| t.to_lowercase())
                .collect(),
            asset_subfolder: config.assets.docusaurus_subfolder.clone(),
            image_format: config.images.format,
            language_separator: config.language.separator.clone(),
            multi_blog_suffix: config.content.multi_blog_suffix.clone(),
            excalidraw: config.content.excalidraw,
        }
    }
}

/// Per-file state. Reset for every note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileTransformState {
    pub block: BlockState,
    pub sidebar_written: bool,
}

/// Rewrites one note, line by line.
///
/// Recorded image and SVG references go into the run's [`Registries`].
pub struct DocumentTransformer<'a> {
    settings: &'a TransformSettings,
    registries: &'a mut Registries,
    /// `Some` for docs content: the sidebar injected into the frontmatter.
    sidebar: Option<&'a str>,
    state: FileTransformState,
    output: String,
}

impl<'a> DocumentTransformer<'a> {
    pub fn new(
        settings: &'a TransformSettings,
        registries: &'a mut Registries,
        sidebar: Option<&'a str>,
    ) -> Self {
        Self {
            settings,
            registries,
            sidebar,
            state: FileTransformState::default(),
            output: String::new(),
        }
    }

    /// Feed one input line (without its terminator).
    pub fn push_line(&mut self, line: &str) {
        let frontmatter = self.take_frontmatter(line);
        let is_delimiter = frontmatter.is_some() && line == "---";
        if let Some(frontmatter) = frontmatter {
            self.emit(&frontmatter);
        }
        if is_delimiter {
            return;
        }

        let Some(chunk) = admonition::process_line(
            line,
            &mut self.state.block,
            &self.settings.admonition_types,
        ) else {
            return;
        };

        let mut text =
            embeds::rewrite_asset_embeds(&chunk, self.settings, &mut self.registries.images)
                .into_owned();
        text = links::rewrite_links(&text, self.settings).into_owned();
        if self.settings.excalidraw {
            text = embeds::rewrite_excalidraw(&text, self.settings).into_owned();
        }
        text = embeds::rewrite_svg(&text, self.settings, &mut self.registries.svgs).into_owned();
        self.emit(&text);
    }

    /// Close any open block and return the rewritten note.
    pub fn finish(mut self) -> String {
        if let Some(frontmatter) = self.take_frontmatter("") {
            self.emit(&frontmatter);
        }
        if let Some(fence) = admonition::flush(self.state.block) {
            tracing::debug!("closing admonition left open at end of file");
            self.emit(fence);
            self.state.block = BlockState::Normal;
        }
        self.output
    }

    /// Frontmatter text to emit before `line`, once per docs note.
    ///
    /// A leading `---` gets the sidebar key appended inside the existing
    /// block; anything else gets a complete synthesized block.
    fn take_frontmatter(&mut self, line: &str) -> Option<String> {
        let sidebar = self.sidebar?;
        if self.state.sidebar_written {
            return None;
        }
        self.state.sidebar_written = true;
        if line == "---" {
            Some(format!("---\ndisplayed_sidebar: {sidebar}"))
        } else {
            Some(format!("---\ndisplayed_sidebar: {sidebar}\n---"))
        }
    }

    fn emit(&mut self, chunk: &str) {
        self.output.push_str(chunk);
        self.output.push('\n');
    }
}

/// Rewrite a whole note.
pub fn transform_document(
    content: &str,
    sidebar: Option<&str>,
    settings: &TransformSettings,
    registries: &mut Registries,
) -> String {
    let mut transformer = DocumentTransformer::new(settings, registries, sidebar);
    for line in content.lines() {
        transformer.push_line(line);
    }
    transformer.finish()
}
