//! Tracing setup for the `tsz-doc` binary.
//!
//! `TSZ_LOG_FORMAT` picks the output format:
//!
//! - `text` (default): flat `tracing-subscriber` lines
//! - `tree`: indented span tree via `tracing-tree`
//! - `json`: one JSON object per span or event
//!
//! ```bash
//! TSZ_LOG=debug TSZ_LOG_FORMAT=tree tsz-doc --program program.json
//! TSZ_LOG="tsz_converter=trace,tsz_reflection=debug" tsz-doc --program program.json
//! ```
//!
//! Nothing is installed unless `TSZ_LOG` or `RUST_LOG` is set.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Tree,
    Json,
}

impl LogFormat {
    /// Unknown values fall back to [`LogFormat::Text`].
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var("TSZ_LOG_FORMAT").unwrap_or_default())
    }
}

/// `TSZ_LOG` wins over `RUST_LOG`; both use `RUST_LOG` directive syntax.
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var("TSZ_LOG") {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Install the global subscriber, writing to stderr so stdout stays free
/// for the JSON model.
pub fn init_tracing() {
    if std::env::var("TSZ_LOG").is_err() && std::env::var("RUST_LOG").is_err() {
        return;
    }

    let filter = build_filter();
    match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_writer(std::io::stderr)
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_span_retrace(true)
                .with_targets(true);
            // A subscriber may already be installed (tests, embedding hosts).
            let _ = Registry::default().with(filter).with(tree_layer).try_init();
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);
            let _ = Registry::default().with(filter).with(json_layer).try_init();
        }
        LogFormat::Text => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}

#[cfg(test)]
#[path = "tests/tracing_config_tests.rs"]
mod tests;
