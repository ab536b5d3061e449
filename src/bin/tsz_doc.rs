#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{IsTerminal, Write};

use tsz_doc::cli::args::CliArgs;
use tsz_doc::cli::{driver, reporter::Reporter};

const EXIT_SUCCESS: i32 = 0;
const EXIT_BLOCKED: i32 = 1;

fn main() -> Result<()> {
    // No-op unless TSZ_LOG or RUST_LOG is set; see src/tracing_config.rs.
    tsz_doc::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    let result = driver::run(&args, &cwd)?;

    let reporter = Reporter::new(!args.no_color && std::io::stderr().is_terminal());
    let reported = if result.is_blocked() {
        &result.blocking
    } else {
        &result.warnings
    };
    if !reported.is_empty() {
        eprintln!("{}", reporter.render(reported));
        eprintln!();
        eprintln!("{}", reporter.summary(reported));
    }

    if result.is_blocked() {
        std::process::exit(EXIT_BLOCKED);
    }
    if result.output_path.is_none()
        && let Some(json) = &result.json
    {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{json}").context("failed to write model to stdout")?;
    }
    std::process::exit(EXIT_SUCCESS);
}
