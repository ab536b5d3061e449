//! Converter options.

use serde::{Deserialize, Serialize};

/// Options controlling a conversion. Deserializes from the camelCase JSON
/// form used in options files; every field is optional there.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConverterOptions {
    /// Project name. Falls back to the package name, then to the first
    /// program's name.
    pub name: Option<String>,
    pub package_name: Option<String>,
    /// Normalized entry point paths, already expanded by the caller. Empty
    /// means every non-external file of the program.
    pub entry_points: Vec<String>,
    pub exclude_private: bool,
    pub exclude_protected: bool,
    /// Skip declarations tagged `@internal`.
    pub exclude_internal: bool,
    /// Skip declarations without a comment (namespaces and modules are kept).
    pub exclude_not_documented: bool,
    /// Skip declarations from files outside the documented package.
    pub exclude_externals: bool,
    /// Error diagnostic codes that do not block conversion.
    pub ignored_diagnostic_codes: Vec<u32>,
}

impl ConverterOptions {
    /// Name of the project root reflection.
    pub fn project_name(&self, fallback: &str) -> String {
        self.name
            .clone()
            .or_else(|| self.package_name.clone())
            .unwrap_or_else(|| fallback.to_string())
    }
}
