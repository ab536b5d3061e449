//! Conversion of type-checked programs into the reflection model.
//!
//! [`Converter::convert`] drives the whole pipeline:
//!
//! 1. refuse programs with blocking diagnostics
//! 2. pick entry files (expanding project references when needed)
//! 3. traverse each entry file's exports through the [`NodeConverters`]
//!    dispatch table, merging declarations by symbol identity
//! 4. resolve named `@inheritDoc` directives
//! 5. run the [`InheritanceResolver`]
//! 6. resolve the remaining `@inheritDoc` directives

pub mod comments;
pub mod context;
pub mod converter;
pub mod converters;
pub mod error;
pub mod inherit_doc;
pub mod inheritance;
pub mod options;
pub mod type_serializer;

pub use context::{ConversionState, Context, InheritDocRequest};
pub use converter::{Conversion, Converter, ConverterState};
pub use converters::{ConvertFn, ConvertResult, NodeConverters, convert_node, convert_symbol};
pub use error::ConvertError;
pub use inherit_doc::InheritDocResolver;
pub use inheritance::{InheritanceReport, InheritanceResolver, Relation};
pub use options::ConverterOptions;
pub use type_serializer::TypeSerializer;
