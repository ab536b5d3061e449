//! Common types and utilities for the tsz documentation converter.
//!
//! This crate provides foundational types used across all tsz-doc crates:
//! - Diagnostics (`Diagnostic`, `DiagnosticCategory`) and the shared message table
//! - Converter limits and thresholds
//! - JSDoc comment text utilities

// Diagnostics shared by the front-end snapshot and the converter
pub mod diagnostics;
pub use diagnostics::{
    Diagnostic, DiagnosticCategory, DiagnosticMessage, DiagnosticRelatedInformation,
    diagnostic_codes, format_message,
};

// Centralized limits and thresholds
pub mod limits;

// Comment parsing utilities
pub mod comments;
