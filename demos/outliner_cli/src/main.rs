// Copyright 2026 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Command-line front end for the outliner.
//!
//! Reads a JSON document description, outlines its active layer or group,
//! and writes the resulting layer tree as JSON.
//!
//! ```text
//! outliner scene.json --color '#202020' -t 4 --separate-layers --trace
//! ```
//!
//! Logging goes through `tracing`; set `RUST_LOG` or pass `-v` for more.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use outliner_core::paint::PaintSlot;
use outliner_core::trace::{
    FrameEnterEvent, FrameExitEvent, MergeEvent, OutlineEvent, PaintEvent, SkipEvent, Tracer,
    WalkSink,
};
use outliner_core::{OutlineConfig, OutlineError, Rgb, SeparationMode};
use outliner_debug::pretty::PrettyPrintSink;
use outliner_debug::recorder::RecorderSink;
use outliner_doc::{DescriptionError, Document, DocumentDescription};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(version, about = "Outline the layers of a JSON-described document")]
struct Args {
    /// Document description to read.
    document: PathBuf,

    /// JSON file with a base outline configuration. Flags override it.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Outline color as `#rgb` or `#rrggbb`.
    #[arg(long, conflicts_with = "no_color")]
    color: Option<Rgb>,

    /// Keep the current paint color instead of setting one.
    #[arg(long)]
    no_color: bool,

    /// Grow distance in pixels.
    #[arg(short, long)]
    thickness: Option<u32>,

    /// Feather radius in pixels.
    #[arg(short, long)]
    feather: Option<u32>,

    /// Outline every group separately.
    #[arg(long)]
    separate_groups: bool,

    /// Outline every plain layer separately.
    #[arg(long)]
    separate_layers: bool,

    /// Merge each source layer into its outline.
    #[arg(long)]
    merge_source: bool,

    /// Read per-layer directives from layer names.
    #[arg(long)]
    auto: bool,

    /// Let directives apply to the children of the layer that carries them.
    #[arg(long, requires = "auto")]
    inherit: bool,

    /// Outline layers without directives using the base settings.
    #[arg(long, requires = "auto")]
    use_defaults: bool,

    /// Paint slot outlines are filled with.
    #[arg(long, value_enum)]
    fill: Option<Slot>,

    /// Print walk events to stderr.
    #[arg(long)]
    trace: bool,

    /// Record walk events to a JSON file.
    #[arg(long, value_name = "FILE")]
    record: Option<PathBuf>,

    /// Write the resulting layer tree here instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Log more detail. Ignored when `RUST_LOG` is set.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Slot {
    Foreground,
    Background,
}

impl From<Slot> for PaintSlot {
    fn from(slot: Slot) -> Self {
        match slot {
            Slot::Foreground => Self::Foreground,
            Slot::Background => Self::Background,
        }
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error("cannot read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("cannot write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("cannot serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Description(#[from] DescriptionError),
    #[error(transparent)]
    Outline(#[from] OutlineError),
}

/// Forwards events to the pretty printer and the recorder, whichever are on.
#[derive(Debug, Default)]
struct Sinks {
    pretty: Option<PrettyPrintSink>,
    recorder: Option<RecorderSink>,
}

impl Sinks {
    fn each(&mut self, mut f: impl FnMut(&mut dyn WalkSink)) {
        if let Some(pretty) = &mut self.pretty {
            f(pretty);
        }
        if let Some(recorder) = &mut self.recorder {
            f(recorder);
        }
    }

    fn is_empty(&self) -> bool {
        self.pretty.is_none() && self.recorder.is_none()
    }
}

impl WalkSink for Sinks {
    fn on_frame_enter(&mut self, e: &FrameEnterEvent<'_>) {
        self.each(|s| s.on_frame_enter(e));
    }

    fn on_frame_exit(&mut self, e: &FrameExitEvent<'_>) {
        self.each(|s| s.on_frame_exit(e));
    }

    fn on_skip(&mut self, e: &SkipEvent<'_>) {
        self.each(|s| s.on_skip(e));
    }

    fn on_outline(&mut self, e: &OutlineEvent<'_>) {
        self.each(|s| s.on_outline(e));
    }

    fn on_merge(&mut self, e: &MergeEvent<'_>) {
        self.each(|s| s.on_merge(e));
    }

    fn on_paint(&mut self, e: &PaintEvent) {
        self.each(|s| s.on_paint(e));
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);
    match outline(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "outline failed");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn outline(args: &Args) -> Result<(), CliError> {
    let description: DocumentDescription = read_json(&args.document)?;
    let mut document = Document::from_description(&description)?;
    let config = build_config(args)?;
    tracing::debug!(?config, "resolved base configuration");

    let mut sinks = Sinks {
        pretty: args.trace.then(PrettyPrintSink::stderr),
        recorder: args.record.is_some().then(RecorderSink::new),
    };
    let tracer = if sinks.is_empty() {
        Tracer::none()
    } else {
        Tracer::new(&mut sinks)
    };
    let result = outliner_core::run_traced(&mut document, &config, tracer);

    // Layers created before a failure stay in the document, so the tree and
    // the recording are written either way.
    if let (Some(path), Some(recorder)) = (&args.record, &sinks.recorder) {
        let mut file = create(path)?;
        recorder.write_json(&mut file)?;
        file.flush().map_err(|source| CliError::Write {
            path: path.clone(),
            source,
        })?;
    }
    write_snapshot(args.output.as_deref(), &document)?;

    let summary = result?;
    for &id in &summary.outlines {
        tracing::info!(outline = document.store().name(id), "created");
    }
    tracing::info!(
        outlines = summary.outlines.len(),
        merged = summary.merged,
        skipped = summary.skipped,
        "done"
    );
    Ok(())
}

fn build_config(args: &Args) -> Result<OutlineConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => read_json(path)?,
        None => OutlineConfig::default(),
    };
    if args.no_color {
        config = config.with_color(None);
    } else if let Some(color) = args.color {
        config = config.with_color(Some(color));
    }
    if let Some(thickness) = args.thickness {
        config = config.with_thickness(thickness);
    }
    if let Some(feather) = args.feather {
        config = config.with_feather(feather);
    }
    if args.separate_groups || args.separate_layers {
        config = config.with_separation(SeparationMode::from_flags(
            args.separate_groups,
            args.separate_layers,
        ));
    }
    if args.merge_source {
        config = config.with_merge_source(true);
    }
    if args.auto {
        config = config.with_auto(true, args.inherit, args.use_defaults);
    }
    if let Some(slot) = args.fill {
        config = config.with_fill_slot(slot.into());
    }
    Ok(config)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_owned(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Json {
        path: path.to_owned(),
        source,
    })
}

fn create(path: &Path) -> Result<io::BufWriter<fs::File>, CliError> {
    fs::File::create(path)
        .map(io::BufWriter::new)
        .map_err(|source| CliError::Write {
            path: path.to_owned(),
            source,
        })
}

fn write_snapshot(output: Option<&Path>, document: &Document) -> Result<(), CliError> {
    let snapshot = document.snapshot();
    match output {
        Some(path) => {
            let mut file = create(path)?;
            serde_json::to_writer_pretty(&mut file, &snapshot)?;
            file.flush().map_err(|source| CliError::Write {
                path: path.to_owned(),
                source,
            })
        }
        None => {
            let mut stdout = io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &snapshot)?;
            let _ = writeln!(stdout);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_the_base_config() {
        let args = Args::parse_from([
            "outliner",
            "doc.json",
            "--color",
            "#f00",
            "-t",
            "7",
            "--separate-layers",
            "--auto",
            "--inherit",
            "--fill",
            "foreground",
        ]);
        let config = build_config(&args).unwrap();
        assert_eq!(config.color, Some(Rgb::new(0xff, 0, 0)));
        assert_eq!(config.thickness, 7);
        assert_eq!(config.separation, SeparationMode::PerLayer);
        assert!(config.auto_mode);
        assert!(config.inherit_auto_config);
        assert!(!config.use_defaults_when_unconfigured);
        assert_eq!(config.fill_slot, PaintSlot::Foreground);
    }

    #[test]
    fn defaults_without_flags() {
        let args = Args::parse_from(["outliner", "doc.json", "--no-color"]);
        let config = build_config(&args).unwrap();
        assert_eq!(config, OutlineConfig::default().with_color(None));
    }

    #[test]
    fn inherit_requires_auto() {
        assert!(Args::try_parse_from(["outliner", "doc.json", "--inherit"]).is_err());
    }

    #[test]
    fn bad_color_is_rejected() {
        assert!(Args::try_parse_from(["outliner", "doc.json", "--color", "teal"]).is_err());
    }
}
