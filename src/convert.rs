//! Stage 2: write the Docusaurus tree from a [`VaultManifest`].
//!
//! The run has two phases with a hard barrier between them:
//!
//! 1. **Markdown.** Every planned note is read, rewritten by the
//!    [line pipeline](crate::transform) and written to its destination.
//!    Image and SVG embeds are collected into the run's [`Registries`].
//! 2. **Assets.** Only once every note is done, the asset folder is
//!    materialized against the now complete registries.
//!
//! Every file written in either phase is appended to the run log, which the
//! next run's [cleanup](crate::cleanup) consumes.
//!
//! Progress is reported as [`ConvertEvent`]s over an optional channel so
//! the CLI can print while the run continues.

use crate::assets::{AssetAction, AssetFailure, AssetOutcome, AssetTarget, process_assets};
use crate::cleanup::RunLog;
use crate::config::Config;
use crate::destination::to_filesystem_path;
use crate::imaging::ImageBackend;
use crate::registry::Registries;
use crate::scan::{NoteKind, PlannedNote, VaultManifest};
use crate::transform::{TransformSettings, transform_document};
use crate::types::ContentDescriptor;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to read note {path}: {source}")]
    ReadNote {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Asset processing failed: {0}")]
    Asset(#[from] AssetFailure),
}

/// Progress reported while converting.
#[derive(Debug, Clone)]
pub enum ConvertEvent {
    SectionStarted {
        folder: String,
        descriptor: ContentDescriptor,
        note_count: usize,
    },
    NoteConverted {
        /// 1-based position within the section.
        index: usize,
        source: String,
        destination: String,
        kind: NoteKind,
    },
    AssetsStarted {
        folder: String,
        file_count: usize,
    },
    AssetProcessed {
        source: String,
        action: AssetAction,
        outputs: Vec<String>,
    },
}

/// Summary of a finished run.
#[derive(Debug)]
pub struct ConversionReport {
    pub notes_written: usize,
    pub assets: Vec<AssetOutcome>,
    /// References collected in phase 1, with `processed` flags set by phase 2.
    pub registries: Registries,
    /// Records appended to the run log.
    pub log_entries: usize,
}

impl ConversionReport {
    pub fn asset_outputs(&self) -> usize {
        self.assets.iter().map(|a| a.outputs.len()).sum()
    }

    /// Image directives no asset file satisfied.
    pub fn unresolved_images(&self) -> Vec<&str> {
        self.registries
            .images
            .iter()
            .filter(|d| !d.processed)
            .map(|d| d.source_filename.as_str())
            .collect()
    }
}

/// Rewrite one note's content according to its plan.
pub fn render_note(
    note: &PlannedNote,
    content: &str,
    settings: &TransformSettings,
    registries: &mut Registries,
) -> String {
    match note.kind {
        NoteKind::Verbatim => content.to_string(),
        NoteKind::Markdown => {
            transform_document(content, note.sidebar.as_deref(), settings, registries)
        }
    }
}

/// Convert the whole vault described by `manifest` into the Docusaurus root
/// from `config`.
///
/// Does not clean the previous run; callers do that first.
pub fn convert(
    manifest: &VaultManifest,
    config: &Config,
    backend: &impl ImageBackend,
    progress: Option<Sender<ConvertEvent>>,
) -> Result<ConversionReport, ConvertError> {
    let docusaurus_root = Path::new(&config.directories.docusaurus);
    fs::create_dir_all(docusaurus_root)?;

    let settings = TransformSettings::from_config(config);
    let mut registries = Registries::default();
    let mut log = RunLog::open(&config.log_path())?;
    let send = |event: ConvertEvent| {
        if let Some(tx) = &progress {
            tx.send(event).ok();
        }
    };

    // Phase 1: markdown
    let mut notes_written = 0;
    for section in &manifest.sections {
        send(ConvertEvent::SectionStarted {
            folder: section.folder.clone(),
            descriptor: section.descriptor.clone(),
            note_count: section.notes.len(),
        });

        for (i, note) in section.notes.iter().enumerate() {
            let source = manifest.vault_root.join(&note.source);
            let content = fs::read_to_string(&source).map_err(|e| ConvertError::ReadNote {
                path: source.clone(),
                source: e,
            })?;
            let rendered = render_note(note, &content, &settings, &mut registries);

            let output = to_filesystem_path(docusaurus_root, &note.destination);
            if let Some(parent) = output.parent() {
                fs::create_dir_all(parent)?;
            }
            if output.exists() {
                tracing::warn!(
                    destination = %note.destination,
                    source = %note.source.display(),
                    "overwriting existing file"
                );
            }
            fs::write(&output, rendered)?;
            log.record(&note.log_name, &note.destination)?;
            notes_written += 1;

            send(ConvertEvent::NoteConverted {
                index: i + 1,
                source: note.source.to_string_lossy().into_owned(),
                destination: note.destination.clone(),
                kind: note.kind,
            });
        }
    }

    // Phase 2: assets, against the complete registries
    let mut assets = Vec::new();
    if let Some(section) = &manifest.assets {
        send(ConvertEvent::AssetsStarted {
            folder: section.folder.clone(),
            file_count: section.files.len(),
        });

        let mut target = AssetTarget::from_config(config);
        target.vault_root = manifest.vault_root.clone();
        let mut first_failure = None;
        for result in process_assets(backend, &section.files, &registries, &target) {
            match result {
                Ok(outcome) => {
                    let source_name = outcome.source_name();
                    for output in &outcome.outputs {
                        log.record(&source_name, output)?;
                    }
                    send(ConvertEvent::AssetProcessed {
                        source: outcome.source.to_string_lossy().into_owned(),
                        action: outcome.action.clone(),
                        outputs: outcome.outputs.clone(),
                    });
                    assets.push(outcome);
                }
                Err(failure) => {
                    let source_name = failure.source_name();
                    for output in &failure.written {
                        log.record(&source_name, output)?;
                    }
                    tracing::error!(asset = %failure.path.display(), "{}", failure.error);
                    if first_failure.is_none() {
                        first_failure = Some(failure);
                    }
                }
            }
        }
        if let Some(failure) = first_failure {
            return Err(failure.into());
        }

        for outcome in &assets {
            if let AssetAction::Resize(names) = &outcome.action {
                for name in names {
                    registries.images.mark_processed(name);
                }
            }
        }
    }

    for source in registries.images.iter().filter(|d| !d.processed) {
        tracing::warn!(
            image = %source.source_filename,
            "embedded image not found in the asset folder"
        );
    }

    Ok(ConversionReport {
        notes_written,
        assets,
        registries,
        log_entries: log.written(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleanup::read_log;
    use crate::imaging::Dimensions;
    use crate::imaging::backend::tests::MockBackend;
    use crate::scan::scan;
    use crate::test_helpers::*;
    use crate::types::Language;

    /// Dimensions for every resize the fixture vault triggers.
    fn mock_backend() -> MockBackend {
        MockBackend::with_dimensions(vec![
            Dimensions {
                width: 1600,
                height: 800,
            };
            8
        ])
    }

    fn run(tmp: &tempfile::TempDir) -> (ConversionReport, Config) {
        let config = vault_config(tmp.path());
        let manifest = scan(&tmp.path().join("vault"), &config).unwrap();
        let report = convert(&manifest, &config, &mock_backend(), None).unwrap();
        (report, config)
    }

    fn note(kind: NoteKind, sidebar: Option<&str>) -> PlannedNote {
        PlannedNote {
            source: "docs/a.md".into(),
            destination: "/docs/a.md".into(),
            log_name: "a.md".into(),
            language: Language::main("en"),
            sidebar: sidebar.map(String::from),
            grouped: false,
            kind,
        }
    }

    #[test]
    fn render_verbatim_note_is_unchanged() {
        let content = "label: Guide\n> [!note] not a callout here";
        let out = render_note(
            &note(NoteKind::Verbatim, Some("guide")),
            content,
            &transform_settings(),
            &mut Registries::default(),
        );
        assert_eq!(out, content);
    }

    #[test]
    fn render_markdown_note_gets_sidebar() {
        let out = render_note(
            &note(NoteKind::Markdown, Some("guide")),
            "# A\n",
            &transform_settings(),
            &mut Registries::default(),
        );
        assert_eq!(out, "---\ndisplayed_sidebar: guide\n---\n# A\n");
    }

    #[test]
    fn notes_are_written_to_destinations() {
        let tmp = setup_vault();
        let (report, _) = run(&tmp);
        let site = tmp.path().join("website");

        assert_eq!(report.notes_written, 8);
        assert_eq!(
            read_output(&site, "/docs/guide/01-Intro.md"),
            "---\ndisplayed_sidebar: guide\ntitle: Intro\n---\n# Intro\n"
        );
        assert_eq!(
            read_output(
                &site,
                "/i18n/de/docusaurus-plugin-content-docs/current/guide/01-Intro.md"
            ),
            "---\ndisplayed_sidebar: guide\ntitle: Einleitung\n---\n# Einleitung\n"
        );
        assert_eq!(
            read_output(&site, "/i18n/de/docusaurus-plugin-content-blog/2024-01-01-hello.md"),
            "# Hallo\n"
        );
        assert_eq!(
            read_output(&site, "/docs/guide/_category_.yml"),
            "label: Guide\nposition: 2\n"
        );
        assert_eq!(
            read_output(&site, "/news/First-Post.md"),
            "![](/assets/cat.webp)\n"
        );
    }

    #[test]
    fn setup_note_is_fully_rewritten() {
        let tmp = setup_vault();
        run(&tmp);
        let out = read_output(&tmp.path().join("website"), "/docs/guide/setup.md");
        let expected = "\
---
displayed_sidebar: guide
---
# Setup

:::tip Before you start
Install the tools first.
:::

![A cat](/assets/cat_w300.webp)
![](/assets/Beach-Day.webp)
See [the intro](/Intro#why).
Grab the manual: [Download manual.pdf](/assets/manual.pdf)
![](/assets/diagram.dark.svg#dark)
![](/assets/diagram.light.svg#light)
![](/assets/Flow.excalidraw.dark.svg#dark)
![](/assets/Flow.excalidraw.light.svg#light)
";
        assert_eq!(out, expected);
    }

    #[test]
    fn assets_follow_registries() {
        let tmp = setup_vault();
        let (report, _) = run(&tmp);

        let action_of = |name: &str| {
            report
                .assets
                .iter()
                .find(|a| a.source.ends_with(name))
                .map(|a| a.action.clone())
                .unwrap()
        };
        assert_eq!(
            action_of("cat.png"),
            AssetAction::Resize(vec!["cat_w300".into(), "cat".into()])
        );
        assert_eq!(action_of("unused.png"), AssetAction::Skip);
        assert_eq!(action_of("diagram.svg"), AssetAction::ThemeSvg("diagram".into()));
        assert_eq!(action_of("manual.pdf"), AssetAction::Copy);
        assert!(report.unresolved_images().is_empty());
        assert!(report.registries.images.iter().all(|d| d.processed));
    }

    #[test]
    fn every_output_is_logged() {
        let tmp = setup_vault();
        let (report, config) = run(&tmp);

        let entries = read_log(&config.log_path()).unwrap();
        assert_eq!(entries.len(), report.log_entries);
        assert_eq!(
            report.log_entries,
            report.notes_written + report.asset_outputs()
        );
        assert!(
            entries
                .iter()
                .any(|e| e.source_name == "Intro__de.md" && e.destination.starts_with("/i18n/de/"))
        );
        assert!(
            entries
                .iter()
                .any(|e| e.source_name == "Beach Day.jpg"
                    && e.destination == "/static/assets/Beach-Day.webp")
        );
    }

    #[test]
    fn events_stream_in_phase_order() {
        let tmp = setup_vault();
        let config = vault_config(tmp.path());
        let manifest = scan(&tmp.path().join("vault"), &config).unwrap();
        let (tx, rx) = std::sync::mpsc::channel();

        convert(&manifest, &config, &mock_backend(), Some(tx)).unwrap();
        let events: Vec<ConvertEvent> = rx.iter().collect();

        assert!(matches!(&events[0], ConvertEvent::SectionStarted { folder, .. } if folder == "blog"));
        let assets_started = events
            .iter()
            .position(|e| matches!(e, ConvertEvent::AssetsStarted { .. }))
            .unwrap();
        assert!(
            events[..assets_started]
                .iter()
                .all(|e| !matches!(e, ConvertEvent::AssetProcessed { .. }))
        );
        assert!(
            events[assets_started..]
                .iter()
                .all(|e| !matches!(e, ConvertEvent::NoteConverted { .. }))
        );
    }

    #[test]
    fn missing_embedded_image_is_unresolved() {
        let tmp = setup_vault();
        write(
            &tmp.path().join("vault"),
            "blog/ghost.md",
            "![](../assets/ghost.png)\n",
        );
        let (report, _) = run(&tmp);
        assert_eq!(report.unresolved_images(), vec!["ghost.png"]);
    }

    #[test]
    fn failed_asset_run_still_logs_written_files() {
        let tmp = setup_vault();
        let config = vault_config(tmp.path());
        let manifest = scan(&tmp.path().join("vault"), &config).unwrap();

        // No dimensions: every resize fails, copies and svgs still succeed.
        let result = convert(&manifest, &config, &MockBackend::new(), None);
        assert!(matches!(result, Err(ConvertError::Asset(_))));

        let site = tmp.path().join("website");
        let copied = site.join("static/assets/manual.pdf");
        assert!(copied.exists());
        let entries = read_log(&config.log_path()).unwrap();
        assert!(entries.iter().any(|e| e.destination == "/static/assets/manual.pdf"));
        assert!(entries.iter().any(|e| e.destination == "/static/assets/diagram.dark.svg"));

        crate::cleanup::clean_previous_run(&site, &config.log_path()).unwrap();
        assert!(!copied.exists());
        assert!(!site.join("docs/guide/setup.md").exists());
    }
}
