use colored::Colorize;

use tsz_common::{Diagnostic, DiagnosticCategory, DiagnosticRelatedInformation};

/// Renders diagnostics as `file - category TSnnnn: message` lines.
pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    pub fn render(&self, diagnostics: &[Diagnostic]) -> String {
        let mut out = String::new();
        for (index, diagnostic) in diagnostics.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(&self.format_diagnostic(diagnostic));
        }
        out
    }

    pub fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let mut output = self.format_location(&diagnostic.file, diagnostic.start);
        output.push_str(" - ");
        output.push_str(&self.format_category(diagnostic.category));
        let code = self.format_code(diagnostic.code);
        if !code.is_empty() {
            output.push(' ');
            output.push_str(&code);
        }
        output.push_str(": ");
        output.push_str(&diagnostic.message_text);

        for related in &diagnostic.related_information {
            output.push('\n');
            output.push_str(&self.format_related(related));
        }
        output
    }

    /// `Found 1 warning.` / `Found 3 errors.`; empty when there is nothing.
    pub fn summary(&self, diagnostics: &[Diagnostic]) -> String {
        let errors = diagnostics
            .iter()
            .filter(|d| d.category == DiagnosticCategory::Error)
            .count();
        let warnings = diagnostics.len() - errors;
        let mut parts = Vec::new();
        if errors > 0 {
            parts.push(plural(errors, "error"));
        }
        if warnings > 0 {
            parts.push(plural(warnings, "warning"));
        }
        if parts.is_empty() {
            return String::new();
        }
        format!("Found {}.", parts.join(" and "))
    }

    fn format_related(&self, related: &DiagnosticRelatedInformation) -> String {
        let location = self.format_location(&related.file, related.start);
        let prefix = if self.color {
            "  Related".dimmed().to_string()
        } else {
            "  Related".to_string()
        };
        format!("{}: {} - {}", prefix, location, related.message_text)
    }

    fn format_location(&self, file: &str, offset: u32) -> String {
        let location = match (file.is_empty(), offset) {
            (true, _) => "<unknown>".to_string(),
            (false, 0) => file.to_string(),
            (false, offset) => format!("{file}@{offset}"),
        };
        if self.color {
            location.cyan().to_string()
        } else {
            location
        }
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = match category {
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Suggestion => "suggestion",
            DiagnosticCategory::Message => "message",
        };

        if !self.color {
            return label.to_string();
        }

        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
            DiagnosticCategory::Suggestion => label.blue().bold().to_string(),
            DiagnosticCategory::Message => label.cyan().bold().to_string(),
        }
    }

    fn format_code(&self, code: u32) -> String {
        if code == 0 {
            return String::new();
        }

        let label = format!("TS{code}");
        if self.color {
            label.bright_blue().to_string()
        } else {
            label
        }
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
