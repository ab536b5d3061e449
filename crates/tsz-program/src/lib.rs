//! Type-checked program surface for the tsz documentation converter.
//!
//! The documentation converter never parses or type-checks anything itself.
//! It consumes a [`Program`] handed over by a compiler front end:
//!
//! - an ordered list of [`SourceFile`]s, each with its export table
//! - a [`SymbolArena`] of named entities, each with one or more declaration nodes
//! - a [`NodeArena`] of declaration nodes (kind, location, raw comment, children)
//! - a [`TypeArena`] of resolved types, reachable only through [`TypeDatabase`]
//!
//! Programs can be assembled in memory with [`ProgramBuilder`] or loaded from
//! a JSON snapshot with [`Program::from_json_str`].

pub mod builder;
pub mod node;
pub mod program;
pub mod symbol;
pub mod types;

pub use builder::ProgramBuilder;
pub use node::{DeclarationKind, Node, NodeArena, NodeIndex, VarianceModifier, modifier_flags};
pub use program::{ExportEntry, FileId, Program, SourceFile};
pub use symbol::{Symbol, SymbolArena, SymbolId, SymbolKey, symbol_flags};
pub use types::{
    IndexSignatureShape, IntrinsicKind, LiteralValue, MappedModifier, ObjectShape, ParamShape,
    PropertyShape, SignatureShape, TemplateSpan, TupleElement, TypeArena, TypeData, TypeDatabase,
    TypeId, TypeOperatorKind, TypeParamShape,
};
