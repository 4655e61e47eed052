//! # arc-tracing - Main Entry Point
//!
//! Supports two operational modes:
//! - **Interactive** (`arc-tracing <TRACE>...`): terminal timeline viewer
//! - **Headless** (`--headless --svg out.svg` / `--export-frame-times f.csv`):
//!   render and export without a terminal, for scripts and CI

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use arc_tracing::cli::Args;
use arc_tracing::config::ViewConfig;
use arc_tracing::domain::{ConfigError, TraceError};
use arc_tracing::export::FrameTimesExporter;
use arc_tracing::render::svg::write_svg;
use arc_tracing::session::TracingSession;
use arc_tracing::trace_data::Model;
use arc_tracing::tui::App;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_USAGE: i32 = 2;
const EXIT_DATAERR: i32 = 65;

fn main() {
    env_logger::init();
    std::process::exit(match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            let code = exit_code_for(&e);
            eprintln!("error: {e:#}");
            code
        }
    });
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    if err.chain().any(|cause| cause.is::<TraceError>()) {
        EXIT_DATAERR
    } else if err.chain().any(|cause| cause.is::<ConfigError>()) {
        EXIT_USAGE
    } else {
        EXIT_ERROR
    }
}

fn load_config(args: &Args) -> Result<ViewConfig> {
    let mut config = match &args.config {
        Some(path) => ViewConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => ViewConfig::default(),
    };
    args.apply_overrides(&mut config);
    config.validate().context("Invalid command-line override")?;
    Ok(config)
}

fn create_output(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn run() -> Result<()> {
    let args = Args::parse();
    let quiet = args.quiet;

    if args.headless && !args.has_export() {
        anyhow::bail!("--headless needs --svg or --export-frame-times");
    }

    let config = load_config(&args)?;
    let mut session = TracingSession::new(config);
    for path in &args.traces {
        let model = Model::from_file(path)
            .with_context(|| format!("Failed to load trace: {}", path.display()))?;
        let id = session.add_model(model);
        if !quiet {
            let loaded = session.model(id).context("model missing right after loading")?;
            println!("{id} {}: {}", loaded.model.title(), loaded.metrics);
        }
    }

    if let Some(path) = &args.export_frame_times {
        let mut exporter = FrameTimesExporter::new();
        for loaded in session.models() {
            exporter.add_model(&loaded.model);
        }
        exporter
            .export(create_output(path)?)
            .context("Failed to export frame times")?;
        if !quiet {
            println!("saved: {}", path.display());
        }
    }

    if let Some(path) = &args.svg {
        let (width, height) = {
            let overview = session.layout();
            (overview.width(), overview.height())
        };
        let draw = session.draw_list();
        let mut out = create_output(path)?;
        write_svg(&mut out, &draw, width, height)
            .and_then(|()| out.flush())
            .context("Failed to write SVG")?;
        info!("SVG overview: {} commands, {width:.0}x{height:.0} px", draw.len());
        if !quiet {
            println!("saved: {}", path.display());
        }
    }

    if args.headless {
        return Ok(());
    }

    App::new(session).run()
}
