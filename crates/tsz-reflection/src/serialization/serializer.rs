//! Model to JSON.

use super::json::{JsonFlags, JsonProject, JsonReflection, SCHEMA_VERSION};
use crate::project::Project;
use crate::reflection::{Reflection, ReflectionData, ReflectionId};
use crate::types::SomeType;
use std::path::PathBuf;
use tracing::debug;
use tsz_program::VarianceModifier;

/// Context of one export pass, handed to every hook.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SerializeEvent {
    /// Where the output is going to be written, if anywhere.
    pub output_path: Option<PathBuf>,
}

impl SerializeEvent {
    pub fn new(output_path: Option<PathBuf>) -> Self {
        SerializeEvent { output_path }
    }
}

/// Lifecycle hook around one serialization pass.
///
/// `begin` runs before the tree is walked; `end` runs after, with the finished
/// output, which it may extend.
pub trait SerializerHook {
    fn begin(&mut self, _event: &SerializeEvent) {}
    fn end(&mut self, _event: &SerializeEvent, _output: &mut JsonProject) {}
}

#[derive(Default)]
pub struct Serializer {
    hooks: Vec<Box<dyn SerializerHook>>,
}

impl Serializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_hook(&mut self, hook: Box<dyn SerializerHook>) {
        self.hooks.push(hook);
    }

    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    /// Serialize the whole project. Hooks fire once each.
    pub fn project_to_object(&mut self, project: &Project, event: &SerializeEvent) -> JsonProject {
        for hook in &mut self.hooks {
            hook.begin(event);
        }

        let writer = TreeWriter { project };
        let root = project
            .get(project.root())
            .map(|r| writer.reflection(r))
            .unwrap_or_default();
        let symbol_id_map = project
            .symbol_entries()
            .into_iter()
            .map(|(id, key)| (id.0.to_string(), key.clone()))
            .collect();
        let mut output = JsonProject {
            schema_version: SCHEMA_VERSION.to_string(),
            root,
            package_name: project.package_name.clone(),
            symbol_id_map,
        };
        debug!(
            reflections = project.len(),
            output = ?event.output_path,
            "serialized project"
        );

        for hook in &mut self.hooks {
            hook.end(event, &mut output);
        }
        output
    }

    pub fn to_json_string(
        &mut self,
        project: &Project,
        event: &SerializeEvent,
        pretty: bool,
    ) -> serde_json::Result<String> {
        let output = self.project_to_object(project, event);
        if pretty {
            serde_json::to_string_pretty(&output)
        } else {
            serde_json::to_string(&output)
        }
    }
}

struct TreeWriter<'a> {
    project: &'a Project,
}

impl TreeWriter<'_> {
    fn reflection(&self, r: &Reflection) -> JsonReflection {
        let mut out = JsonReflection {
            id: r.id.0,
            name: r.name.clone(),
            variant: r.data.variant().to_string(),
            kind: r.kind.bits(),
            flags: JsonFlags(r.flags),
            comment: r.comment.clone().filter(|c| !c.is_empty()),
            sources: r.sources.clone(),
            ..JsonReflection::default()
        };

        match &r.data {
            ReflectionData::Project(container) => {
                out.children = self.many(&container.children);
            }
            ReflectionData::Declaration(d) => {
                out.children = self.many(&d.container.children);
                out.ty = d.declared_type.as_ref().map(|t| self.project.resolve_type(t));
                out.default_value = d.default_value.clone();
                out.type_parameters = self.many(&d.type_parameters);
                out.signatures = self.many(&d.signatures);
                out.index_signatures = self.many(&d.index_signatures);
                out.get_signature = d.get_signature.and_then(|id| self.one(id)).map(Box::new);
                out.set_signature = d.set_signature.and_then(|id| self.one(id)).map(Box::new);
                out.extended_types = d
                    .extended_types
                    .iter()
                    .map(|t| self.project.resolve_type(t))
                    .collect();
                out.implemented_types = d
                    .implemented_types
                    .iter()
                    .map(|t| self.project.resolve_type(t))
                    .collect();
                out.extended_by = d.extended_by.iter().filter_map(|&id| self.link(id)).collect();
                out.implemented_by = d
                    .implemented_by
                    .iter()
                    .filter_map(|&id| self.link(id))
                    .collect();
                out.overwrites = d.links.overwrites.and_then(|id| self.link(id));
                out.inherited_from = d.links.inherited_from.and_then(|id| self.link(id));
                out.implementation_of = d.links.implementation_of.and_then(|id| self.link(id));
                out.target = d.target.map(|id| id.0);
            }
            ReflectionData::Signature(s) => {
                out.type_parameters = self.many(&s.type_parameters);
                out.parameters = self.many(&s.parameters);
                out.ty = s.return_type.as_ref().map(|t| self.project.resolve_type(t));
                out.overwrites = s.links.overwrites.and_then(|id| self.link(id));
                out.inherited_from = s.links.inherited_from.and_then(|id| self.link(id));
                out.implementation_of = s.links.implementation_of.and_then(|id| self.link(id));
            }
            ReflectionData::Parameter(p) => {
                out.ty = p.param_type.as_ref().map(|t| self.project.resolve_type(t));
                out.default_value = p.default_value.clone();
            }
            ReflectionData::TypeParameter(tp) => {
                out.ty = tp.constraint.as_ref().map(|t| self.project.resolve_type(t));
                out.default = tp.default.as_ref().map(|t| self.project.resolve_type(t));
                out.variance_modifier = tp.variance.map(|v| variance_text(v).to_string());
            }
        }
        out
    }

    fn one(&self, id: ReflectionId) -> Option<JsonReflection> {
        self.project.get(id).map(|r| self.reflection(r))
    }

    fn many(&self, ids: &[ReflectionId]) -> Vec<JsonReflection> {
        ids.iter().filter_map(|&id| self.one(id)).collect()
    }

    /// Reduced reference used for back-links and inheritance links.
    fn link(&self, id: ReflectionId) -> Option<SomeType> {
        let target = self.project.get(id)?;
        // Signatures are named after their owner.
        let named = match target.data {
            ReflectionData::Signature(_) => target.parent.unwrap_or(id),
            _ => id,
        };
        Some(SomeType::reflection_reference(
            self.project.qualified_name(named),
            id,
        ))
    }
}

pub(crate) fn variance_text(variance: VarianceModifier) -> &'static str {
    match variance {
        VarianceModifier::In => "in",
        VarianceModifier::Out => "out",
        VarianceModifier::InOut => "in out",
    }
}

pub(crate) fn parse_variance(text: &str) -> Option<VarianceModifier> {
    match text {
        "in" => Some(VarianceModifier::In),
        "out" => Some(VarianceModifier::Out),
        "in out" => Some(VarianceModifier::InOut),
        _ => None,
    }
}
