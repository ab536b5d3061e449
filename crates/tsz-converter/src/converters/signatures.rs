//! Signature-producing declarations, parameters and type parameters.

use super::{ConvertResult, Declared, convert_node, declare, serialize_type, source_of};
use crate::comments::{self, take_inherit_doc};
use crate::context::{ConversionState, Context};
use crate::error::ConvertError;
use tsz_common::{Diagnostic, diagnostic_codes};
use tsz_program::{DeclarationKind, Node, NodeIndex, modifier_flags};
use tsz_reflection::{Comment, ReflectionFlags, ReflectionId, ReflectionKind};

/// Functions, methods and constructors. Each declaration adds one signature;
/// the implementation of an overloaded symbol adds none.
pub(crate) fn convert_function_like(
    state: &mut ConversionState<'_>,
    ctx: &Context<'_>,
    idx: NodeIndex,
) -> ConvertResult {
    let program = ctx.program;
    let Some(node) = program.node(idx) else {
        return Ok(None);
    };
    if !state.mark_seen(ctx, idx) {
        return Ok(None);
    }

    let overloads = node
        .symbol
        .and_then(|s| program.symbol(s))
        .map_or(1, |sym| {
            sym.declarations
                .iter()
                .filter(|&&d| program.node(d).is_some_and(|n| n.kind == node.kind))
                .count()
        });
    if node.has_body && overloads > 1 {
        let existing = node
            .symbol
            .and_then(|s| program.symbol_key(s))
            .and_then(|key| state.project.reflection_for_symbol(&key));
        if existing.is_some() {
            return Ok(existing);
        }
    }

    let (kind, signature_kind) = match node.kind {
        DeclarationKind::Function => (ReflectionKind::Function, ReflectionKind::CallSignature),
        DeclarationKind::Constructor => (
            ReflectionKind::Constructor,
            ReflectionKind::ConstructorSignature,
        ),
        _ => (ReflectionKind::Method, ReflectionKind::CallSignature),
    };
    let Some(Declared { id, .. }) = declare(state, ctx, node, kind, false)? else {
        return Ok(None);
    };

    let signature_name = if node.kind == DeclarationKind::Constructor {
        let class_name = state
            .project
            .get(ctx.scope)
            .map_or(String::new(), |r| r.name.clone());
        format!("new {class_name}")
    } else {
        state
            .project
            .get(id)
            .map_or_else(|| node.name.clone(), |r| r.name.clone())
    };
    build_signature(state, ctx, id, signature_kind, &signature_name, node)?;
    Ok(Some(id))
}

/// Call and construct signatures declared directly in an interface or type.
pub(crate) fn convert_call_signature(
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
    let scope_name = state
        .project
        .get(ctx.scope)
        .map_or(String::new(), |r| r.name.clone());
    let (kind, name) = if node.kind == DeclarationKind::ConstructSignature {
        (ReflectionKind::ConstructorSignature, format!("new {scope_name}"))
    } else {
        (ReflectionKind::CallSignature, scope_name)
    };
    build_signature(state, ctx, ctx.scope, kind, &name, node).map(Some)
}

pub(crate) fn convert_index_signature(
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
    let signature =
        state
            .project
            .create_signature(ReflectionKind::IndexSignature, "__index", ctx.scope)?;
    let signature_ctx = ctx.with_scope(signature);
    if node.parameters.is_empty() {
        if let Some(key_type) = node.constraint {
            let key = state.project.create_parameter("key", signature)?;
            let param_type = serialize_type(ctx, key_type);
            if let Some(param) = state.project.get_mut(key).and_then(|r| r.parameter_mut()) {
                param.param_type = Some(param_type);
            }
        }
    } else {
        for &param in &node.parameters {
            convert_node(state, &signature_ctx, param)?;
        }
    }
    let value_type = node.type_id.map(|t| serialize_type(ctx, t));
    let comment = node.comment.as_deref().and_then(comments::extract);
    if let Some(reflection) = state.project.get_mut(signature) {
        reflection.add_source(source_of(ctx, node));
        if node.has_modifier(modifier_flags::READONLY) {
            reflection.flags |= ReflectionFlags::READONLY;
        }
        if node.has_modifier(modifier_flags::STATIC) {
            reflection.flags |= ReflectionFlags::STATIC;
        }
        reflection.comment = comment;
        if let Some(sig) = reflection.signature_mut() {
            sig.return_type = value_type;
        }
    }
    Ok(Some(signature))
}

/// Create a signature of `owner` from a signature-like node: type
/// parameters, parameters, return type and the node's comment, with
/// `@param`/`@typeParam` blocks moved onto the matching reflections.
pub(crate) fn build_signature(
    state: &mut ConversionState<'_>,
    ctx: &Context<'_>,
    owner: ReflectionId,
    kind: ReflectionKind,
    name: &str,
    node: &Node,
) -> Result<ReflectionId, ConvertError> {
    let signature = state.project.create_signature(kind, name, owner)?;
    let signature_ctx = ctx.with_scope(signature);
    let bindings = convert_type_parameters(state, &signature_ctx, &node.type_parameters)?;
    let signature_ctx = signature_ctx.with_type_parameters(bindings);
    for &param in &node.parameters {
        convert_node(state, &signature_ctx, param)?;
    }
    let return_type = node.return_type.map(|t| serialize_type(&signature_ctx, t));

    let mut directive = None;
    let comment = node.comment.as_deref().and_then(comments::extract).map(|mut c| {
        directive = take_inherit_doc(&mut c);
        c
    });
    if let Some(reflection) = state.project.get_mut(signature) {
        reflection.add_source(source_of(ctx, node));
        reflection.comment = comment.filter(|c| !c.is_empty());
        if let Some(sig) = reflection.signature_mut() {
            sig.return_type = return_type;
        }
    }
    if let Some(directive) = directive {
        state.queue_inherit_doc(signature, owner, directive);
    }
    distribute_param_tags(state, signature);
    distribute_type_param_tags(state, signature);
    Ok(signature)
}

pub(crate) fn convert_parameter(
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
    let id = state.project.create_parameter(&node.name, ctx.scope)?;
    let param_type = node.type_id.map(|t| serialize_type(ctx, t));
    if let Some(reflection) = state.project.get_mut(id) {
        if node.has_modifier(modifier_flags::OPTIONAL) || node.initializer.is_some() {
            reflection.flags |= ReflectionFlags::OPTIONAL;
        }
        if node.has_modifier(modifier_flags::REST) {
            reflection.flags |= ReflectionFlags::REST;
        }
        if let Some(param) = reflection.parameter_mut() {
            param.param_type = param_type;
            param.default_value = node.initializer.clone();
        }
    }
    Ok(Some(id))
}

pub(crate) fn convert_type_parameter(
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
    let id = state.project.create_type_parameter(&node.name, ctx.scope)?;
    let constraint = node.constraint.map(|t| serialize_type(ctx, t));
    let default = node.default_type.map(|t| serialize_type(ctx, t));
    if let Some(reflection) = state.project.get_mut(id) {
        if node.has_modifier(modifier_flags::CONST) {
            reflection.flags |= ReflectionFlags::CONST;
        }
        if let Some(data) = reflection.type_parameter_mut() {
            data.constraint = constraint;
            data.default = default;
            data.variance = node.variance;
        }
    }
    Ok(Some(id))
}

/// Convert type parameter nodes into `ctx.scope` and return their bindings.
///
/// Constraints and defaults are serialized again once every sibling exists,
/// so `<T, U extends T>` resolves `T`.
pub(crate) fn convert_type_parameters(
    state: &mut ConversionState<'_>,
    ctx: &Context<'_>,
    nodes: &[NodeIndex],
) -> Result<Vec<(String, ReflectionId)>, ConvertError> {
    let mut bindings = Vec::with_capacity(nodes.len());
    let mut converted = Vec::with_capacity(nodes.len());
    for &idx in nodes {
        if let Some(id) = convert_node(state, ctx, idx)?
            && let Some(node) = ctx.program.node(idx)
        {
            bindings.push((node.name.clone(), id));
            converted.push((id, node));
        }
    }
    if bindings.len() > 1 {
        let scoped = ctx.with_type_parameters(bindings.iter().cloned());
        for (id, node) in converted {
            let constraint = node.constraint.map(|t| serialize_type(&scoped, t));
            let default = node.default_type.map(|t| serialize_type(&scoped, t));
            if let Some(data) = state.project.get_mut(id).and_then(|r| r.type_parameter_mut()) {
                data.constraint = constraint;
                data.default = default;
            }
        }
    }
    Ok(bindings)
}

/// Move `@param` blocks of a signature's comment onto its parameters.
fn distribute_param_tags(state: &mut ConversionState<'_>, signature: ReflectionId) {
    let Some(reflection) = state.project.get_mut(signature) else {
        return;
    };
    let Some(comment) = reflection.comment.as_mut() else {
        return;
    };
    let tags = comment.take_tags("@param");
    if tags.is_empty() {
        return;
    }
    if comment.is_empty() {
        reflection.comment = None;
    }
    let signature_name = reflection.name.clone();
    let file = reflection
        .sources
        .first()
        .map(|s| s.file_name.clone())
        .unwrap_or_default();
    let parameters = reflection
        .signature()
        .map(|s| s.parameters.clone())
        .unwrap_or_default();

    for tag in tags {
        let Some(name) = tag.name.as_deref() else {
            continue;
        };
        // `@param options.verbose` documents a property of a parameter.
        let root = name.split('.').next().unwrap_or(name);
        let target = parameters
            .iter()
            .copied()
            .find(|&p| state.project.get(p).is_some_and(|r| r.name == root));
        match target {
            Some(param) if root == name => {
                if let Some(r) = state.project.get_mut(param) {
                    r.comment
                        .get_or_insert_with(Comment::default)
                        .summary
                        .extend(tag.content);
                }
            }
            Some(_) => {}
            None => state.warn(Diagnostic::warning(
                file.clone(),
                diagnostic_codes::UNKNOWN_PARAM_TAG,
                &[signature_name.as_str(), name],
            )),
        }
    }
}

/// Move `@typeParam`/`@template` blocks of a comment onto the type
/// parameters owned by the same reflection.
pub(crate) fn distribute_type_param_tags(state: &mut ConversionState<'_>, id: ReflectionId) {
    let Some(reflection) = state.project.get_mut(id) else {
        return;
    };
    let Some(comment) = reflection.comment.as_mut() else {
        return;
    };
    let mut tags = comment.take_tags("@typeParam");
    tags.extend(comment.take_tags("@template"));
    if tags.is_empty() {
        return;
    }
    if comment.is_empty() {
        reflection.comment = None;
    }
    let owner_name = reflection.name.clone();
    let file = reflection
        .sources
        .first()
        .map(|s| s.file_name.clone())
        .unwrap_or_default();
    let type_parameters = reflection
        .declaration()
        .map(|d| d.type_parameters.clone())
        .or_else(|| reflection.signature().map(|s| s.type_parameters.clone()))
        .unwrap_or_default();

    for tag in tags {
        let Some(name) = tag.name.as_deref() else {
            continue;
        };
        let target = type_parameters
            .iter()
            .copied()
            .find(|&tp| state.project.get(tp).is_some_and(|r| r.name == name));
        match target {
            Some(tp) => {
                if let Some(r) = state.project.get_mut(tp) {
                    r.comment
                        .get_or_insert_with(Comment::default)
                        .summary
                        .extend(tag.content);
                }
            }
            None => state.warn(Diagnostic::warning(
                file.clone(),
                diagnostic_codes::UNKNOWN_TYPE_PARAM_TAG,
                &[owner_name.as_str(), name],
            )),
        }
    }
}
