//! `tsz-doc`: documentation models for type-checked TypeScript programs.
//!
//! The pipeline lives in the workspace crates; this package wires it to a
//! command line:
//!
//! - [`tsz_program`]: the program surface handed over by a front end
//! - [`tsz_converter`]: program to reflection conversion
//! - [`tsz_reflection`]: the reflection model and its JSON form
//!
//! [`cli`] loads program snapshots and options files, runs the converter
//! and reports warnings. [`tracing_config`] installs the log subscriber.

pub mod cli;
pub mod tracing_config;

pub use tsz_common::{Diagnostic, DiagnosticCategory};
pub use tsz_converter::{Conversion, ConvertError, Converter, ConverterOptions};
pub use tsz_program::Program;
pub use tsz_reflection::{Project, SerializeEvent, Serializer};
