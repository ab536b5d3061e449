//! The conversion cursor and the mutable state it travels with.

use crate::comments::InheritDocDirective;
use crate::converters::NodeConverters;
use crate::options::ConverterOptions;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::warn;
use tsz_common::Diagnostic;
use tsz_program::{FileId, NodeIndex, Program};
use tsz_reflection::{Project, ReflectionId};

/// Where the traversal currently is.
///
/// Contexts are never mutated; entering a declaration derives a new one with
/// [`with_scope`](Self::with_scope).
#[derive(Clone)]
pub struct Context<'p> {
    pub program: &'p Program,
    /// Position of `program` in the conversion's program list.
    pub program_index: usize,
    pub file: Option<FileId>,
    /// Reflection that new declarations are attached to.
    pub scope: ReflectionId,
    /// Name to use instead of the declaration's own (`export { a as b }`).
    /// Only applies to the declaration converted directly in this context.
    pub export_name: Option<String>,
    /// Type parameters visible here, by name.
    type_parameters: FxHashMap<String, ReflectionId>,
    depth: u32,
}

impl<'p> Context<'p> {
    /// Top-level context of one program, scoped at `scope`.
    pub fn new(program: &'p Program, program_index: usize, scope: ReflectionId) -> Self {
        Context {
            program,
            program_index,
            file: None,
            scope,
            export_name: None,
            type_parameters: FxHashMap::default(),
            depth: 0,
        }
    }

    #[must_use]
    pub fn with_file(&self, file: FileId) -> Self {
        Context {
            file: Some(file),
            ..self.clone()
        }
    }

    /// Context for the members of `scope`.
    #[must_use]
    pub fn with_scope(&self, scope: ReflectionId) -> Self {
        Context {
            scope,
            export_name: None,
            depth: self.depth + 1,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_export_name(&self, name: &str) -> Self {
        Context {
            export_name: Some(name.to_string()),
            ..self.clone()
        }
    }

    /// Extend the visible type parameters; later bindings shadow earlier ones.
    #[must_use]
    pub fn with_type_parameters<I>(&self, bindings: I) -> Self
    where
        I: IntoIterator<Item = (String, ReflectionId)>,
    {
        let mut next = self.clone();
        next.type_parameters.extend(bindings);
        next
    }

    pub fn type_parameters(&self) -> &FxHashMap<String, ReflectionId> {
        &self.type_parameters
    }

    pub fn type_parameter(&self, name: &str) -> Option<ReflectionId> {
        self.type_parameters.get(name).copied()
    }

    pub const fn depth(&self) -> u32 {
        self.depth
    }
}

/// A queued `@inheritDoc` directive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InheritDocRequest {
    /// Reflection whose comment receives the inherited content.
    pub reflection: ReflectionId,
    /// Scope to resolve a named target from.
    pub scope: ReflectionId,
    pub directive: InheritDocDirective,
}

/// Mutable state of one conversion: the project being built, warnings and
/// deferred work. Single writer; threaded by `&mut` alongside the context.
pub struct ConversionState<'o> {
    pub project: Project,
    pub options: &'o ConverterOptions,
    pub converters: &'o NodeConverters,
    pub warnings: Vec<Diagnostic>,
    pub inherit_docs: Vec<InheritDocRequest>,
    /// Nodes already converted, per program.
    seen: FxHashSet<(usize, NodeIndex)>,
}

impl<'o> ConversionState<'o> {
    pub fn new(project: Project, options: &'o ConverterOptions, converters: &'o NodeConverters) -> Self {
        ConversionState {
            project,
            options,
            converters,
            warnings: Vec::new(),
            inherit_docs: Vec::new(),
            seen: FxHashSet::default(),
        }
    }

    /// Mark a node as converted; `false` if it already was.
    pub fn mark_seen(&mut self, ctx: &Context<'_>, node: NodeIndex) -> bool {
        self.seen.insert((ctx.program_index, node))
    }

    pub fn warn(&mut self, diagnostic: Diagnostic) {
        warn!(code = diagnostic.code, file = %diagnostic.file, "{}", diagnostic.message_text);
        self.warnings.push(diagnostic);
    }

    pub fn queue_inherit_doc(
        &mut self,
        reflection: ReflectionId,
        scope: ReflectionId,
        directive: InheritDocDirective,
    ) {
        self.inherit_docs.push(InheritDocRequest {
            reflection,
            scope,
            directive,
        });
    }
}
