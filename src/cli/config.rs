//! Converter options files and their command-line overrides.

use anyhow::{Context, Result};
use std::path::Path;
use tsz_converter::ConverterOptions;

use crate::cli::args::CliArgs;

/// Parse options JSON. Unknown keys are ignored; missing keys take their
/// defaults.
pub fn parse_options(source: &str) -> Result<ConverterOptions> {
    serde_json::from_str(source).context("failed to parse converter options JSON")
}

/// Read and parse an options file.
pub fn load_options(path: &Path) -> Result<ConverterOptions> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read options file: {}", path.display()))?;
    parse_options(&source)
        .with_context(|| format!("failed to load options file: {}", path.display()))
}

/// Layer command-line flags over `options`. Flags only ever switch
/// exclusions on; `--entry` replaces the file's entry points and ignored
/// codes accumulate. Entry points come out normalized.
pub fn apply_args(mut options: ConverterOptions, args: &CliArgs) -> ConverterOptions {
    if !args.entry_points.is_empty() {
        options.entry_points = args.entry_points.clone();
    }
    options.entry_points = options
        .entry_points
        .iter()
        .map(|path| normalize_entry(path))
        .collect();
    if let Some(name) = &args.name {
        options.name = Some(name.clone());
    }
    if let Some(package_name) = &args.package_name {
        options.package_name = Some(package_name.clone());
    }
    options.exclude_private |= args.exclude_private;
    options.exclude_protected |= args.exclude_protected;
    options.exclude_internal |= args.exclude_internal;
    options.exclude_not_documented |= args.exclude_not_documented;
    options.exclude_externals |= args.exclude_externals;
    for &code in &args.ignored_diagnostic_codes {
        if !options.ignored_diagnostic_codes.contains(&code) {
            options.ignored_diagnostic_codes.push(code);
        }
    }
    options
}

/// Forward slashes, no leading `./`.
pub fn normalize_entry(path: &str) -> String {
    let normalized = path.replace('\\', "/");
    let mut trimmed = normalized.as_str();
    while let Some(rest) = trimmed.strip_prefix("./") {
        trimmed = rest;
    }
    trimmed.to_string()
}
