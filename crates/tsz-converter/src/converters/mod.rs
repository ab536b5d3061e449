//! Node converters.
//!
//! Converting a declaration node means: look its symbol up in the project
//! registry and merge into the existing reflection on a hit, otherwise run
//! the visibility predicate, create a reflection under the context's scope
//! and register it. Kind-specific work (members, signatures, types) is done
//! by the function registered for the node's [`DeclarationKind`] in
//! [`NodeConverters`].

mod declarations;
mod signatures;

use crate::comments::{self, take_inherit_doc};
use crate::context::{ConversionState, Context};
use crate::error::ConvertError;
use crate::options::ConverterOptions;
use crate::type_serializer::TypeSerializer;
use rustc_hash::FxHashMap;
use tracing::{Level, span, trace};
use tsz_common::limits::MAX_DECLARATION_DEPTH;
use tsz_program::{
    DeclarationKind, Node, NodeIndex, SourceFile, SymbolId, TypeId, modifier_flags,
};
use tsz_reflection::{
    Comment, ReflectionFlags, ReflectionId, ReflectionKind, SomeType, SourceReference,
};

/// Result of a node converter: the reflection the node was converted into
/// (or merged into), `None` when the node was filtered out or produced
/// nothing of its own.
pub type ConvertResult = Result<Option<ReflectionId>, ConvertError>;

pub type ConvertFn = fn(&mut ConversionState<'_>, &Context<'_>, NodeIndex) -> ConvertResult;

/// Kind-keyed dispatch table.
pub struct NodeConverters {
    table: FxHashMap<DeclarationKind, ConvertFn>,
}

impl Default for NodeConverters {
    fn default() -> Self {
        let mut converters = NodeConverters {
            table: FxHashMap::default(),
        };
        for kind in [
            DeclarationKind::Module,
            DeclarationKind::Namespace,
            DeclarationKind::Class,
            DeclarationKind::Interface,
            DeclarationKind::Enum,
        ] {
            converters.register(kind, declarations::convert_container);
        }
        converters.register(DeclarationKind::EnumMember, declarations::convert_enum_member);
        converters.register(DeclarationKind::Variable, declarations::convert_variable);
        converters.register(DeclarationKind::Property, declarations::convert_property);
        converters.register(DeclarationKind::TypeAlias, declarations::convert_type_alias);
        converters.register(DeclarationKind::GetAccessor, declarations::convert_accessor);
        converters.register(DeclarationKind::SetAccessor, declarations::convert_accessor);
        converters.register(DeclarationKind::Function, signatures::convert_function_like);
        converters.register(DeclarationKind::Method, signatures::convert_function_like);
        converters.register(DeclarationKind::Constructor, signatures::convert_function_like);
        converters.register(DeclarationKind::CallSignature, signatures::convert_call_signature);
        converters.register(
            DeclarationKind::ConstructSignature,
            signatures::convert_call_signature,
        );
        converters.register(
            DeclarationKind::IndexSignature,
            signatures::convert_index_signature,
        );
        converters.register(DeclarationKind::Parameter, signatures::convert_parameter);
        converters.register(
            DeclarationKind::TypeParameter,
            signatures::convert_type_parameter,
        );
        converters
    }
}

impl NodeConverters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `convert` for `kind`, replacing any previous converter.
    pub fn register(&mut self, kind: DeclarationKind, convert: ConvertFn) -> Option<ConvertFn> {
        self.table.insert(kind, convert)
    }

    pub fn get(&self, kind: DeclarationKind) -> Option<ConvertFn> {
        self.table.get(&kind).copied()
    }

    pub fn handles(&self, kind: DeclarationKind) -> bool {
        self.table.contains_key(&kind)
    }
}

/// Convert one declaration node through the dispatch table.
///
/// Kinds without a converter are skipped; their children are visited with
/// the unchanged context.
pub fn convert_node(state: &mut ConversionState<'_>, ctx: &Context<'_>, idx: NodeIndex) -> ConvertResult {
    let Some(node) = ctx.program.node(idx) else {
        return Err(ConvertError::Invariant(format!(
            "node {} does not exist in program '{}'",
            idx.0, ctx.program.name
        )));
    };
    if ctx.depth() > MAX_DECLARATION_DEPTH {
        trace!(node = idx.0, "declaration nesting too deep, skipping");
        return Ok(None);
    }
    match state.converters.get(node.kind) {
        Some(convert) => {
            trace!(node = idx.0, kind = node.kind.as_str(), name = %node.name, "convert");
            convert(state, ctx, idx)
        }
        None => {
            trace!(node = idx.0, kind = node.kind.as_str(), "no converter, visiting children");
            for &child in &node.children {
                convert_node(state, ctx, child)?;
            }
            Ok(None)
        }
    }
}

/// Convert an exported symbol: every declaration of it, or a `Reference`
/// reflection when the symbol was already converted somewhere else.
pub fn convert_symbol(
    state: &mut ConversionState<'_>,
    ctx: &Context<'_>,
    symbol: SymbolId,
) -> ConvertResult {
    let program = ctx.program;
    let Some(sym) = program.symbol(symbol) else {
        return Err(ConvertError::Invariant(format!(
            "symbol {} does not exist in program '{}'",
            symbol.0, program.name
        )));
    };
    let name = ctx.export_name.as_deref().unwrap_or(&sym.name);
    let _span = span!(Level::DEBUG, "convert_symbol", name, symbol = symbol.0).entered();

    if let Some(key) = program.symbol_key(symbol)
        && let Some(existing) = state.project.reflection_for_symbol(&key)
    {
        let same_place = state
            .project
            .get(existing)
            .is_some_and(|r| r.parent == Some(ctx.scope) && r.name == name);
        if !same_place {
            return create_reference(state, ctx.scope, name, existing).map(Some);
        }
    }

    let mut result = None;
    for &decl in &sym.declarations {
        let id = convert_node(state, ctx, decl)?;
        result = result.or(id);
    }
    if let Some(key) = program.symbol_key(symbol)
        && let Some(id) = state.project.reflection_for_symbol(&key)
    {
        return Ok(Some(id));
    }
    Ok(result)
}

/// `Reference` reflection in `scope` pointing at `target`; reused when the
/// scope already holds an identical one.
fn create_reference(
    state: &mut ConversionState<'_>,
    scope: ReflectionId,
    name: &str,
    target: ReflectionId,
) -> Result<ReflectionId, ConvertError> {
    let project = &state.project;
    if let Some(&existing) = project.children_named(scope, name).iter().find(|&&id| {
        project.get(id).is_some_and(|r| {
            r.kind == ReflectionKind::Reference
                && r.declaration().and_then(|d| d.target) == Some(target)
        })
    }) {
        return Ok(existing);
    }
    let id = state
        .project
        .create_declaration(ReflectionKind::Reference, name, scope)?;
    if let Some(decl) = state.project.get_mut(id).and_then(|r| r.declaration_mut()) {
        decl.target = Some(target);
    }
    trace!(id = id.0, target = target.0, name, "created reference");
    Ok(id)
}

/// Convert `children` into `ctx.scope`, keeping only the ones `keep` accepts.
///
/// Wrapper nodes (kinds without a converter) that pass the filter hand their
/// own children through unfiltered; wrappers that don't are searched with
/// the same filter.
pub(crate) fn visit_members(
    state: &mut ConversionState<'_>,
    ctx: &Context<'_>,
    children: &[NodeIndex],
    keep: &dyn Fn(&Node) -> bool,
) -> Result<(), ConvertError> {
    for &child in children {
        let Some(node) = ctx.program.node(child) else {
            continue;
        };
        if keep(node) {
            convert_node(state, ctx, child)?;
        } else if !state.converters.handles(node.kind) {
            visit_members(state, ctx, &node.children, keep)?;
        }
    }
    Ok(())
}

/// Whether a declaration makes it into the model under `options`.
///
/// Pure: depends only on the node, its file, its parsed comment and the
/// options.
pub fn is_visible(
    options: &ConverterOptions,
    node: &Node,
    file: Option<&SourceFile>,
    comment: Option<&Comment>,
) -> bool {
    if comment.is_some_and(|c| c.has_modifier("@hidden") || c.has_modifier("@ignore")) {
        return false;
    }
    if options.exclude_private
        && node.has_modifier(modifier_flags::PRIVATE | modifier_flags::HASH_PRIVATE)
    {
        return false;
    }
    if options.exclude_protected && node.has_modifier(modifier_flags::PROTECTED) {
        return false;
    }
    if options.exclude_internal && comment.is_some_and(|c| c.has_modifier("@internal")) {
        return false;
    }
    if options.exclude_externals && file.is_some_and(|f| f.is_external) {
        return false;
    }
    if options.exclude_not_documented
        && !matches!(node.kind, DeclarationKind::Module | DeclarationKind::Namespace)
        && comment.is_none_or(Comment::is_empty)
    {
        return false;
    }
    true
}

/// Reflection flags for a node's modifiers.
pub fn reflection_flags(node: &Node, external: bool) -> ReflectionFlags {
    const MAPPING: [(u32, ReflectionFlags); 11] = [
        (modifier_flags::PRIVATE, ReflectionFlags::PRIVATE),
        (modifier_flags::HASH_PRIVATE, ReflectionFlags::PRIVATE),
        (modifier_flags::PROTECTED, ReflectionFlags::PROTECTED),
        (modifier_flags::PUBLIC, ReflectionFlags::PUBLIC),
        (modifier_flags::STATIC, ReflectionFlags::STATIC),
        (modifier_flags::ABSTRACT, ReflectionFlags::ABSTRACT),
        (modifier_flags::READONLY, ReflectionFlags::READONLY),
        (modifier_flags::OPTIONAL, ReflectionFlags::OPTIONAL),
        (modifier_flags::REST, ReflectionFlags::REST),
        (modifier_flags::CONST, ReflectionFlags::CONST),
        (modifier_flags::EXPORT, ReflectionFlags::EXPORTED),
    ];
    let mut flags = ReflectionFlags::empty();
    for (modifier, flag) in MAPPING {
        if node.has_modifier(modifier) {
            flags |= flag;
        }
    }
    if external {
        flags |= ReflectionFlags::EXTERNAL;
    }
    flags
}

pub(crate) fn source_of(ctx: &Context<'_>, node: &Node) -> SourceReference {
    SourceReference::new(ctx.program.file_name_of(node), node.line, node.character)
}

pub(crate) fn serialize_type(ctx: &Context<'_>, type_id: TypeId) -> SomeType {
    TypeSerializer::new(ctx).serialize_type(type_id)
}

/// Outcome of [`declare`].
#[derive(Clone, Copy, Debug)]
pub(crate) struct Declared {
    pub id: ReflectionId,
    /// `false` when the node was merged into an existing reflection.
    pub created: bool,
}

/// Find or create the reflection for a declaration node.
///
/// On a registry hit the node is merged: its source is appended, its flags
/// united, and its comment used if the reflection has none yet. On a miss
/// the visibility predicate runs first. With `attach_comment == false` the
/// comment is left for the caller (signature-producing kinds).
pub(crate) fn declare(
    state: &mut ConversionState<'_>,
    ctx: &Context<'_>,
    node: &Node,
    kind: ReflectionKind,
    attach_comment: bool,
) -> Result<Option<Declared>, ConvertError> {
    let program = ctx.program;
    let file = program.file(node.file);
    let flags = reflection_flags(node, file.is_some_and(|f| f.is_external));
    let source = source_of(ctx, node);
    let key = node.symbol.and_then(|s| program.symbol_key(s));

    if let Some(key) = &key
        && let Some(existing) = state.project.reflection_for_symbol(key)
    {
        let mut directive = None;
        if let Some(reflection) = state.project.get_mut(existing) {
            reflection.add_source(source);
            reflection.flags |= flags;
            if attach_comment
                && reflection.comment.is_none()
                && let Some(mut comment) = node.comment.as_deref().and_then(comments::extract)
            {
                directive = take_inherit_doc(&mut comment);
                reflection.comment = (!comment.is_empty()).then_some(comment);
            }
        }
        if let Some(directive) = directive {
            state.queue_inherit_doc(existing, ctx.scope, directive);
        }
        trace!(id = existing.0, name = %node.name, "merged declaration");
        return Ok(Some(Declared {
            id: existing,
            created: false,
        }));
    }

    let comment = node.comment.as_deref().and_then(comments::extract);
    if !is_visible(state.options, node, file, comment.as_ref()) {
        trace!(name = %node.name, kind = node.kind.as_str(), "filtered out");
        return Ok(None);
    }

    let name = ctx.export_name.as_deref().unwrap_or(&node.name);
    let id = state.project.create_declaration(kind, name, ctx.scope)?;
    if let Some(key) = key {
        state.project.register_symbol(key, id);
    }
    let mut directive = None;
    if let Some(reflection) = state.project.get_mut(id) {
        reflection.flags = flags;
        reflection.add_source(source);
        if attach_comment && let Some(mut comment) = comment {
            directive = take_inherit_doc(&mut comment);
            reflection.comment = (!comment.is_empty()).then_some(comment);
        }
    }
    if let Some(directive) = directive {
        state.queue_inherit_doc(id, ctx.scope, directive);
    }
    Ok(Some(Declared { id, created: true }))
}

#[cfg(test)]
#[path = "../tests/converters_tests.rs"]
mod tests;
