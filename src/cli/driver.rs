//! One `tsz-doc` run: load snapshots, convert, serialize.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{Level, debug, info, span};

use tsz_common::Diagnostic;
use tsz_converter::{ConvertError, Converter, ConverterOptions};
use tsz_program::Program;
use tsz_reflection::{SerializeEvent, Serializer};

use crate::cli::args::CliArgs;
use crate::cli::config::{apply_args, load_options};

/// Outcome of a run that got as far as converting.
#[derive(Debug)]
pub struct DocResult {
    /// Serialized model; `None` when conversion was blocked.
    pub json: Option<String>,
    /// Where the model was written, if not to stdout.
    pub output_path: Option<PathBuf>,
    pub reflections: usize,
    pub warnings: Vec<Diagnostic>,
    /// Diagnostics that stopped the conversion.
    pub blocking: Vec<Diagnostic>,
}

impl DocResult {
    pub fn is_blocked(&self) -> bool {
        !self.blocking.is_empty()
    }
}

/// Resolve `path` against `cwd` unless it is absolute.
fn resolve(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

pub fn load_program(path: &Path) -> Result<Program> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read program snapshot: {}", path.display()))?;
    Program::from_json_str(&source)
        .with_context(|| format!("failed to parse program snapshot: {}", path.display()))
}

/// Options file (if any) with the command-line flags layered on top.
pub fn resolve_options(args: &CliArgs, cwd: &Path) -> Result<ConverterOptions> {
    let base = match &args.options {
        Some(path) => load_options(&resolve(cwd, path))?,
        None => ConverterOptions::default(),
    };
    Ok(apply_args(base, args))
}

pub fn run(args: &CliArgs, cwd: &Path) -> Result<DocResult> {
    let _span = span!(Level::INFO, "tsz_doc").entered();
    let options = resolve_options(args, cwd)?;
    let programs = args
        .programs
        .iter()
        .map(|path| load_program(&resolve(cwd, path)))
        .collect::<Result<Vec<_>>>()?;
    debug!(programs = programs.len(), "program snapshots loaded");

    let conversion = match Converter::new(options).convert(&programs) {
        Ok(conversion) => conversion,
        Err(err @ ConvertError::Invariant(_)) => {
            return Err(err).context("conversion failed");
        }
        Err(err) => {
            info!(%err, "conversion blocked");
            return Ok(DocResult {
                json: None,
                output_path: None,
                reflections: 0,
                warnings: Vec::new(),
                blocking: err.diagnostics(),
            });
        }
    };

    let output_path = args.out.as_ref().map(|path| resolve(cwd, path));
    let event = SerializeEvent::new(output_path.clone());
    let json = Serializer::new()
        .to_json_string(&conversion.project, &event, args.pretty)
        .context("failed to serialize the documentation model")?;

    if let Some(path) = &output_path {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create output directory: {}", parent.display()))?;
        }
        std::fs::write(path, &json)
            .with_context(|| format!("failed to write model: {}", path.display()))?;
        info!(path = %path.display(), "model written");
    }

    Ok(DocResult {
        json: Some(json),
        output_path,
        reflections: conversion.project.len(),
        warnings: conversion.warnings,
        blocking: Vec::new(),
    })
}
