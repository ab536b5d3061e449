use thiserror::Error;
use tsz_common::{Diagnostic, DiagnosticCategory, diagnostic_codes};
use tsz_reflection::ModelError;

/// Why a conversion produced no project.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The type checker reported errors that are not on the ignore list.
    #[error("conversion aborted: {} blocking diagnostic(s) reported by the type checker", .0.len())]
    Diagnostics(Vec<Diagnostic>),
    /// Carries the warnings met while looking for entry files (missing
    /// entry points, empty project references).
    #[error("unable to find any entry points")]
    NoEntryPoints(Vec<Diagnostic>),
    /// Internal inconsistency; a bug in the converter or a malformed program.
    #[error("internal invariant violated: {0}")]
    Invariant(String),
}

impl ConvertError {
    /// Diagnostics describing the failure, for reporting.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            ConvertError::Diagnostics(diagnostics) => diagnostics.clone(),
            ConvertError::NoEntryPoints(warnings) => {
                let mut diagnostic = Diagnostic::warning("", diagnostic_codes::NO_ENTRY_POINTS, &[]);
                diagnostic.category = DiagnosticCategory::Error;
                let mut out = warnings.clone();
                out.push(diagnostic);
                out
            }
            ConvertError::Invariant(message) => vec![Diagnostic::error(
                String::new(),
                0,
                0,
                message.clone(),
                0,
            )],
        }
    }
}

impl From<ModelError> for ConvertError {
    fn from(err: ModelError) -> Self {
        ConvertError::Invariant(err.to_string())
    }
}
