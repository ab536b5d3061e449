//! Converters for declarations that do not produce call signatures.

use super::signatures::{convert_type_parameters, distribute_type_param_tags};
use super::{
    ConvertResult, Declared, convert_node, declare, serialize_type, source_of, visit_members,
};
use crate::context::{ConversionState, Context};
use crate::error::ConvertError;
use tsz_program::{DeclarationKind, Node, NodeIndex, modifier_flags};
use tsz_reflection::{ReflectionFlags, ReflectionId, ReflectionKind, SomeType};

fn container_kind(kind: DeclarationKind) -> ReflectionKind {
    match kind {
        DeclarationKind::Module => ReflectionKind::Module,
        DeclarationKind::Namespace => ReflectionKind::Namespace,
        DeclarationKind::Class => ReflectionKind::Class,
        DeclarationKind::Interface => ReflectionKind::Interface,
        _ => ReflectionKind::Enum,
    }
}

/// Modules, namespaces, classes, interfaces and enums.
///
/// The reflection is found or created first and the node's members are
/// converted into it either way, so partial declarations of one symbol end up
/// with the union of their members.
pub(crate) fn convert_container(
    state: &mut ConversionState<'_>,
    ctx: &Context<'_>,
    idx: NodeIndex,
) -> ConvertResult {
    let Some(node) = ctx.program.node(idx) else {
        return Ok(None);
    };
    if !state.mark_seen(ctx, idx) {
        return Ok(node
            .symbol
            .and_then(|s| ctx.program.symbol_key(s))
            .and_then(|key| state.project.reflection_for_symbol(&key)));
    }
    let kind = container_kind(node.kind);
    let Some(Declared { id, .. }) = declare(state, ctx, node, kind, true)? else {
        return Ok(None);
    };

    let bindings = declaration_type_parameters(state, ctx, id, node)?;
    let member_ctx = ctx.with_scope(id).with_type_parameters(bindings);

    if matches!(node.kind, DeclarationKind::Class | DeclarationKind::Interface) {
        let extended: Vec<SomeType> = node
            .extends
            .iter()
            .map(|&t| serialize_type(&member_ctx, t))
            .collect();
        let implemented: Vec<SomeType> = node
            .implements
            .iter()
            .map(|&t| serialize_type(&member_ctx, t))
            .collect();
        if let Some(decl) = state.project.get_mut(id).and_then(|r| r.declaration_mut()) {
            for ty in extended {
                if !decl.extended_types.contains(&ty) {
                    decl.extended_types.push(ty);
                }
            }
            for ty in implemented {
                if !decl.implemented_types.contains(&ty) {
                    decl.implemented_types.push(ty);
                }
            }
        }
    }

    match node.kind {
        DeclarationKind::Module | DeclarationKind::Namespace => {
            let file = ctx.program.file(node.file);
            let take_all = node.has_modifier(modifier_flags::AMBIENT)
                || file.is_some_and(|f| f.is_declaration_file);
            visit_members(state, &member_ctx, &node.children, &|child: &Node| {
                take_all || child.has_modifier(modifier_flags::EXPORT)
            })?;
        }
        _ => visit_members(state, &member_ctx, &node.children, &|_: &Node| true)?,
    }
    Ok(Some(id))
}

/// Convert the type parameters of a class, interface or alias the first time
/// the reflection is seen; return the bindings visible to its members.
fn declaration_type_parameters(
    state: &mut ConversionState<'_>,
    ctx: &Context<'_>,
    id: ReflectionId,
    node: &Node,
) -> Result<Vec<(String, ReflectionId)>, ConvertError> {
    let existing: Vec<ReflectionId> = state
        .project
        .get(id)
        .and_then(|r| r.declaration())
        .map(|d| d.type_parameters.clone())
        .unwrap_or_default();
    if !existing.is_empty() || node.type_parameters.is_empty() {
        return Ok(existing
            .into_iter()
            .filter_map(|tp| state.project.get(tp).map(|r| (r.name.clone(), tp)))
            .collect());
    }
    let bindings = convert_type_parameters(state, &ctx.with_scope(id), &node.type_parameters)?;
    distribute_type_param_tags(state, id);
    Ok(bindings)
}

pub(crate) fn convert_enum_member(
    state: &mut ConversionState<'_>,
    ctx: &Context<'_>,
    idx: NodeIndex,
) -> ConvertResult {
    convert_valued(state, ctx, idx, ReflectionKind::EnumMember)
}

pub(crate) fn convert_variable(
    state: &mut ConversionState<'_>,
    ctx: &Context<'_>,
    idx: NodeIndex,
) -> ConvertResult {
    convert_valued(state, ctx, idx, ReflectionKind::Variable)
}

pub(crate) fn convert_property(
    state: &mut ConversionState<'_>,
    ctx: &Context<'_>,
    idx: NodeIndex,
) -> ConvertResult {
    convert_valued(state, ctx, idx, ReflectionKind::Property)
}

/// Declarations carrying a type and an optional initializer.
fn convert_valued(
    state: &mut ConversionState<'_>,
    ctx: &Context<'_>,
    idx: NodeIndex,
    kind: ReflectionKind,
) -> ConvertResult {
    let Some(node) = ctx.program.node(idx) else {
        return Ok(None);
    };
    if !state.mark_seen(ctx, idx) {
        return Ok(None);
    }
    let Some(Declared { id, created }) = declare(state, ctx, node, kind, true)? else {
        return Ok(None);
    };
    if !created {
        return Ok(Some(id));
    }
    let declared_type = node.type_id.map(|t| serialize_type(ctx, t));
    if let Some(decl) = state.project.get_mut(id).and_then(|r| r.declaration_mut()) {
        decl.declared_type = declared_type;
        decl.default_value = node.initializer.clone();
    }
    Ok(Some(id))
}

pub(crate) fn convert_type_alias(
    state: &mut ConversionState<'_>,
    ctx: &Context<'_>,
    idx: NodeIndex,
) -> ConvertResult {
    let Some(node) = ctx.program.node(idx) else {
        return Ok(None);
    };
    if !state.mark_seen(ctx, idx) {
        return Ok(None);
    }
    let Some(Declared { id, created }) = declare(state, ctx, node, ReflectionKind::TypeAlias, true)?
    else {
        return Ok(None);
    };
    if !created {
        return Ok(Some(id));
    }
    let bindings = declaration_type_parameters(state, ctx, id, node)?;
    let alias_ctx = ctx.with_type_parameters(bindings);
    let declared_type = node.type_id.map(|t| serialize_type(&alias_ctx, t));
    if let Some(decl) = state.project.get_mut(id).and_then(|r| r.declaration_mut()) {
        decl.declared_type = declared_type;
    }
    Ok(Some(id))
}

/// Get and set accessors of one symbol share a single `Accessor` reflection.
pub(crate) fn convert_accessor(
    state: &mut ConversionState<'_>,
    ctx: &Context<'_>,
    idx: NodeIndex,
) -> ConvertResult {
    let Some(node) = ctx.program.node(idx) else {
        return Ok(None);
    };
    if !state.mark_seen(ctx, idx) {
        return Ok(None);
    }
    let Some(Declared { id, .. }) = declare(state, ctx, node, ReflectionKind::Accessor, true)? else {
        return Ok(None);
    };

    let is_getter = node.kind == DeclarationKind::GetAccessor;
    let occupied = state
        .project
        .get(id)
        .and_then(|r| r.declaration())
        .is_some_and(|d| {
            if is_getter {
                d.get_signature.is_some()
            } else {
                d.set_signature.is_some()
            }
        });
    if occupied {
        return Ok(Some(id));
    }

    let kind = if is_getter {
        ReflectionKind::GetSignature
    } else {
        ReflectionKind::SetSignature
    };
    let signature = state.project.create_signature(kind, &node.name, id)?;
    let signature_ctx = ctx.with_scope(signature);
    let mut return_type = node.return_type.map(|t| serialize_type(ctx, t));
    if is_getter {
        return_type = return_type.or_else(|| node.type_id.map(|t| serialize_type(ctx, t)));
    } else {
        for &param in &node.parameters {
            convert_node(state, &signature_ctx, param)?;
        }
        return_type = return_type.or_else(|| Some(SomeType::intrinsic("void")));
    }
    if let Some(reflection) = state.project.get_mut(signature) {
        reflection.add_source(source_of(ctx, node));
        if node.has_modifier(modifier_flags::STATIC) {
            reflection.flags |= ReflectionFlags::STATIC;
        }
        if let Some(sig) = reflection.signature_mut() {
            sig.return_type = return_type;
        }
    }
    Ok(Some(id))
}
