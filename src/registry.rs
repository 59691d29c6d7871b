//! References collected during the markdown pass.
//!
//! The transform pipeline records every resized raster embed and every SVG
//! embed it rewrites. The asset phase reads both sets to decide which files
//! to resize and which SVGs get light/dark variants. Both registries are
//! owned by one conversion run and passed by reference; nothing is global.

use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// One resized raster output requested by an embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageDirective {
    /// Whitespace-normalized source file name, e.g. `my-cat.png`.
    pub source_filename: String,
    /// Output stem: `my-cat`, `my-cat_w300` or `my-cat_w300xh200`.
    pub resized_name: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub processed: bool,
}

impl ImageDirective {
    /// Build a directive, deriving `resized_name` from the source stem and size.
    pub fn new(source_filename: &str, stem: &str, width: Option<u32>, height: Option<u32>) -> Self {
        let resized_name = match (width, height) {
            (Some(w), Some(h)) => format!("{stem}_w{w}xh{h}"),
            (Some(w), None) => format!("{stem}_w{w}"),
            _ => stem.to_string(),
        };
        Self {
            source_filename: source_filename.to_string(),
            resized_name,
            width,
            height,
            processed: false,
        }
    }
}

/// Deduplicated image directives keyed by `resized_name`, in insertion order.
#[derive(Debug, Default)]
pub struct ImageRegistry {
    directives: Vec<ImageDirective>,
    index: HashMap<String, usize>,
}

impl ImageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless a directive with the same `resized_name` exists.
    /// Returns whether the directive was added. First writer wins.
    pub fn register(&mut self, directive: ImageDirective) -> bool {
        if self.index.contains_key(&directive.resized_name) {
            return false;
        }
        self.index
            .insert(directive.resized_name.clone(), self.directives.len());
        self.directives.push(directive);
        true
    }

    /// First directive registered for `source_filename`.
    pub fn lookup(&self, source_filename: &str) -> Option<&ImageDirective> {
        self.directives
            .iter()
            .find(|d| d.source_filename == source_filename)
    }

    /// Every directive for `source_filename`, one per distinct size.
    pub fn directives_for<'a>(
        &'a self,
        source_filename: &'a str,
    ) -> impl Iterator<Item = &'a ImageDirective> + 'a {
        self.directives
            .iter()
            .filter(move |d| d.source_filename == source_filename)
    }

    pub fn get(&self, resized_name: &str) -> Option<&ImageDirective> {
        self.index.get(resized_name).map(|&i| &self.directives[i])
    }

    /// Flag a directive as materialized. Returns false for unknown names.
    pub fn mark_processed(&mut self, resized_name: &str) -> bool {
        match self.index.get(resized_name) {
            Some(&i) => {
                self.directives[i].processed = true;
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageDirective> {
        self.directives.iter()
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }
}

/// Normalized stems of SVGs embedded by notes (`diagram` for `diagram.svg`).
#[derive(Debug, Default)]
pub struct SvgRegistry {
    names: BTreeSet<String>,
}

impl SvgRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, stem: impl Into<String>) -> bool {
        self.names.insert(stem.into())
    }

    pub fn contains(&self, stem: &str) -> bool {
        self.names.contains(stem)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Everything the markdown pass hands to the asset phase.
#[derive(Debug, Default)]
pub struct Registries {
    pub images: ImageRegistry,
    pub svgs: SvgRegistry,
}
