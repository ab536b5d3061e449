//! Message table for diagnostics raised by the documentation converter.
//!
//! Codes live in the 9000 range so they never collide with type checker codes
//! carried in front-end snapshots.

use super::{DiagnosticCategory, DiagnosticMessage};

pub mod diagnostic_codes {
    pub const ENTRY_POINT_NOT_FOUND: u32 = 9001;
    pub const INHERIT_DOC_TARGET_NOT_FOUND: u32 = 9002;
    pub const INHERIT_DOC_CIRCULAR: u32 = 9003;
    pub const INHERIT_DOC_NO_SOURCE: u32 = 9004;
    pub const UNKNOWN_PARAM_TAG: u32 = 9005;
    pub const PROJECT_REFERENCE_WITHOUT_ENTRY_POINTS: u32 = 9006;
    pub const NO_ENTRY_POINTS: u32 = 9007;
    pub const UNKNOWN_TYPE_PARAM_TAG: u32 = 9008;
}

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    DiagnosticMessage {
        code: diagnostic_codes::ENTRY_POINT_NOT_FOUND,
        category: DiagnosticCategory::Warning,
        message: "The entry point '{0}' does not exist or is not part of the program and will be skipped.",
    },
    DiagnosticMessage {
        code: diagnostic_codes::INHERIT_DOC_TARGET_NOT_FOUND,
        category: DiagnosticCategory::Warning,
        message: "Failed to find '{0}' to inherit the comment from in the comment for '{1}'.",
    },
    DiagnosticMessage {
        code: diagnostic_codes::INHERIT_DOC_CIRCULAR,
        category: DiagnosticCategory::Warning,
        message: "'@inheritDoc' specifies a circular inheritance chain including '{0}'.",
    },
    DiagnosticMessage {
        code: diagnostic_codes::INHERIT_DOC_NO_SOURCE,
        category: DiagnosticCategory::Warning,
        message: "'{0}' uses '@inheritDoc' without a target but does not override or implement a documented member.",
    },
    DiagnosticMessage {
        code: diagnostic_codes::UNKNOWN_PARAM_TAG,
        category: DiagnosticCategory::Warning,
        message: "The signature '{0}' has an '@param' with name '{1}', which was not used.",
    },
    DiagnosticMessage {
        code: diagnostic_codes::PROJECT_REFERENCE_WITHOUT_ENTRY_POINTS,
        category: DiagnosticCategory::Warning,
        message: "The project reference '{0}' did not contain any of the requested entry points.",
    },
    DiagnosticMessage {
        code: diagnostic_codes::NO_ENTRY_POINTS,
        category: DiagnosticCategory::Error,
        message: "Unable to find any entry points. Check that the entry points are part of the program.",
    },
    DiagnosticMessage {
        code: diagnostic_codes::UNKNOWN_TYPE_PARAM_TAG,
        category: DiagnosticCategory::Warning,
        message: "The declaration '{0}' has an '@typeParam' with name '{1}', which was not used.",
    },
];
