use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for the tsz-doc binary.
#[derive(Parser, Debug)]
#[command(
    name = "tsz-doc",
    version,
    about = "Generate a reflection documentation model from type-checked program snapshots"
)]
pub struct CliArgs {
    /// Program snapshot (JSON) produced by the compiler front end. Repeat for
    /// several programs; they are converted in order.
    #[arg(long = "program", short = 'p', required = true, num_args = 1..)]
    pub programs: Vec<PathBuf>,

    /// Converter options file (JSON, camelCase keys).
    #[arg(long)]
    pub options: Option<PathBuf>,

    /// Write the model here instead of stdout.
    #[arg(short = 'o', long)]
    pub out: Option<PathBuf>,

    /// Indent the JSON output.
    #[arg(long)]
    pub pretty: bool,

    /// Entry point file name as it appears in the program. Replaces the
    /// options file's entry points.
    #[arg(long = "entry", short = 'e')]
    pub entry_points: Vec<String>,

    /// Project name.
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long = "packageName", alias = "package-name")]
    pub package_name: Option<String>,

    #[arg(long = "excludePrivate", alias = "exclude-private")]
    pub exclude_private: bool,

    #[arg(long = "excludeProtected", alias = "exclude-protected")]
    pub exclude_protected: bool,

    /// Skip declarations tagged `@internal`.
    #[arg(long = "excludeInternal", alias = "exclude-internal")]
    pub exclude_internal: bool,

    #[arg(long = "excludeNotDocumented", alias = "exclude-not-documented")]
    pub exclude_not_documented: bool,

    #[arg(long = "excludeExternals", alias = "exclude-externals")]
    pub exclude_externals: bool,

    /// Error codes that should not block conversion, comma separated.
    #[arg(long = "ignoreDiagnostics", alias = "ignore-diagnostics", value_delimiter = ',')]
    pub ignored_diagnostic_codes: Vec<u32>,

    /// Disable colored warning output.
    #[arg(long = "noColor", alias = "no-color")]
    pub no_color: bool,
}
