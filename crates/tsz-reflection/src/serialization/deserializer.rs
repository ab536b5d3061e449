//! JSON to model ("revival").

use super::json::{JsonProject, JsonReflection};
use super::serializer::parse_variance;
use crate::kind::ReflectionKind;
use crate::project::Project;
use crate::reflection::{Reflection, ReflectionData, ReflectionId};
use crate::types::SomeType;
use thiserror::Error;
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ReviveError {
    #[error("the root reflection must be a project with id 0")]
    InvalidRoot,
    #[error("reflection id {0} appears more than once")]
    DuplicateId(u32),
    #[error("reflection id {0} is missing")]
    MissingId(u32),
    #[error("reflection {id} has unknown kind {kind}")]
    UnknownKind { id: u32, kind: u32 },
}

#[derive(Default)]
pub struct Deserializer;

impl Deserializer {
    pub fn new() -> Self {
        Deserializer
    }

    /// Rebuild a project from its serialized form. Ids, names, kinds, flags,
    /// comments, types, sources, child order and the symbol registry are
    /// preserved.
    pub fn revive_project(&self, json: &JsonProject) -> Result<Project, ReviveError> {
        let root_json = &json.root;
        if root_json.id != 0 || root_json.kind != ReflectionKind::Project.bits() {
            return Err(ReviveError::InvalidRoot);
        }

        let mut slots: Vec<Option<Reflection>> = Vec::new();
        revive_into(root_json, None, &mut slots)?;

        let mut project = Project::new(root_json.name.clone());
        project.package_name = json.package_name.clone();
        let mut revived = slots.into_iter().enumerate();
        if let Some((_, Some(root))) = revived.next() {
            project.replace_root(root);
        }
        for (index, slot) in revived {
            let reflection = slot.ok_or(ReviveError::MissingId(index as u32))?;
            project
                .push_revived(reflection)
                .map_err(|id| ReviveError::DuplicateId(id.0))?;
        }

        for (id, key) in &json.symbol_id_map {
            if let Ok(id) = id.parse::<u32>() {
                project.register_symbol(key.clone(), ReflectionId(id));
            }
        }
        debug!(reflections = project.len(), "revived project");
        Ok(project)
    }
}

fn revive_into(
    json: &JsonReflection,
    parent: Option<ReflectionId>,
    slots: &mut Vec<Option<Reflection>>,
) -> Result<ReflectionId, ReviveError> {
    let id = ReflectionId(json.id);
    let kind = ReflectionKind::from_bits(json.kind).ok_or(ReviveError::UnknownKind {
        id: json.id,
        kind: json.kind,
    })?;
    let index = json.id as usize;
    if slots.len() <= index {
        slots.resize_with(index + 1, || None);
    }
    if slots[index].is_some() {
        return Err(ReviveError::DuplicateId(json.id));
    }

    let mut reflection = Reflection::new(id, kind, json.name.clone());
    reflection.flags = json.flags.0;
    reflection.comment = json.comment.clone();
    reflection.sources = json.sources.clone();
    reflection.parent = parent;
    // Reserve the slot before recursing so nested duplicates are caught.
    slots[index] = Some(reflection.clone());

    let mut children = Vec::with_capacity(json.children.len());
    for child in &json.children {
        children.push((revive_into(child, Some(id), slots)?, child.name.as_str()));
    }

    match &mut reflection.data {
        ReflectionData::Project(container) => {
            for (child, name) in children {
                container.push(name, child);
            }
        }
        ReflectionData::Declaration(d) => {
            for (child, name) in children {
                d.container.push(name, child);
            }
            d.declared_type = json.ty.clone();
            d.default_value = json.default_value.clone();
            d.type_parameters = revive_all(&json.type_parameters, id, slots)?;
            d.signatures = revive_all(&json.signatures, id, slots)?;
            d.index_signatures = revive_all(&json.index_signatures, id, slots)?;
            d.get_signature = json
                .get_signature
                .as_deref()
                .map(|s| revive_into(s, Some(id), slots))
                .transpose()?;
            d.set_signature = json
                .set_signature
                .as_deref()
                .map(|s| revive_into(s, Some(id), slots))
                .transpose()?;
            d.extended_types = json.extended_types.clone();
            d.implemented_types = json.implemented_types.clone();
            d.extended_by = json.extended_by.iter().filter_map(link_target).collect();
            d.implemented_by = json.implemented_by.iter().filter_map(link_target).collect();
            d.links.overwrites = json.overwrites.as_ref().and_then(link_target);
            d.links.inherited_from = json.inherited_from.as_ref().and_then(link_target);
            d.links.implementation_of = json.implementation_of.as_ref().and_then(link_target);
            d.target = json.target.map(ReflectionId);
        }
        ReflectionData::Signature(s) => {
            s.type_parameters = revive_all(&json.type_parameters, id, slots)?;
            s.parameters = revive_all(&json.parameters, id, slots)?;
            s.return_type = json.ty.clone();
            s.links.overwrites = json.overwrites.as_ref().and_then(link_target);
            s.links.inherited_from = json.inherited_from.as_ref().and_then(link_target);
            s.links.implementation_of = json.implementation_of.as_ref().and_then(link_target);
        }
        ReflectionData::Parameter(p) => {
            p.param_type = json.ty.clone();
            p.default_value = json.default_value.clone();
        }
        ReflectionData::TypeParameter(tp) => {
            tp.constraint = json.ty.clone();
            tp.default = json.default.clone();
            tp.variance = json.variance_modifier.as_deref().and_then(parse_variance);
        }
    }

    slots[index] = Some(reflection);
    Ok(id)
}

fn revive_all(
    items: &[JsonReflection],
    owner: ReflectionId,
    slots: &mut Vec<Option<Reflection>>,
) -> Result<Vec<ReflectionId>, ReviveError> {
    items
        .iter()
        .map(|item| revive_into(item, Some(owner), slots))
        .collect()
}

fn link_target(ty: &SomeType) -> Option<ReflectionId> {
    ty.reference_target().and_then(|t| t.reflection())
}
