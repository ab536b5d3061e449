//! Inheritance pass: back-links, override/implementation links and
//! inherited member copies.
//!
//! Runs over the finished tree. Classes and interfaces are processed bases
//! first, so a derived declaration sees the members its bases inherited
//! themselves. Every step checks before it writes, which makes a second run
//! a no-op.

use rustc_hash::FxHashMap;
use tracing::{Level, debug, span, trace};
use tsz_reflection::{
    ContainerData, DeclarationData, ModelError, Project, ReflectionData, ReflectionFlags,
    ReflectionId, ReflectionKind, SignatureData, TraversalRole, kind_masks,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Relation {
    Extends,
    Implements,
}

/// What one run changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InheritanceReport {
    /// `(original, copy)` for every reflection created by copying a base
    /// member, including the copies of its signatures and parameters.
    pub copies: Vec<(ReflectionId, ReflectionId)>,
    /// Number of `extended_by`/`implemented_by` entries added.
    pub back_links: usize,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

#[derive(Default)]
pub struct InheritanceResolver {
    marks: FxHashMap<ReflectionId, Mark>,
    report: InheritanceReport,
}

impl InheritanceResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve inheritance for every class and interface of `project`.
    pub fn resolve(mut self, project: &mut Project) -> Result<InheritanceReport, ModelError> {
        let _span = span!(Level::DEBUG, "resolve_inheritance").entered();
        for id in project.classes_and_interfaces() {
            self.visit(project, id)?;
        }
        debug!(
            copies = self.report.copies.len(),
            back_links = self.report.back_links,
            "inheritance resolved"
        );
        Ok(self.report)
    }

    fn visit(&mut self, project: &mut Project, id: ReflectionId) -> Result<(), ModelError> {
        if self.marks.contains_key(&id) {
            // Done, or on the current path: an inheritance cycle, broken here.
            return Ok(());
        }
        self.marks.insert(id, Mark::Visiting);
        let bases = bases_of(project, id);
        for &(base, _) in &bases {
            self.visit(project, base)?;
        }
        for (base, relation) in bases {
            self.inherit(project, id, base, relation)?;
        }
        self.marks.insert(id, Mark::Done);
        Ok(())
    }

    fn inherit(
        &mut self,
        project: &mut Project,
        derived: ReflectionId,
        base: ReflectionId,
        relation: Relation,
    ) -> Result<(), ModelError> {
        trace!(derived = derived.0, base = base.0, ?relation, "inherit");
        if let Some(decl) = project.get_mut(base).and_then(|r| r.declaration_mut()) {
            let list = match relation {
                Relation::Extends => &mut decl.extended_by,
                Relation::Implements => &mut decl.implemented_by,
            };
            if !list.contains(&derived) {
                list.push(derived);
                self.report.back_links += 1;
            }
        }

        let derived_is_class = project
            .get(derived)
            .is_some_and(|r| r.kind == ReflectionKind::Class);
        let members: Vec<ReflectionId> = project.children_of(base).to_vec();
        for member in members {
            let Some((name, kind)) = project.get(member).map(|r| (r.name.clone(), r.kind)) else {
                continue;
            };
            if !kind.is(kind_masks::MEMBER) {
                continue;
            }
            if kind == ReflectionKind::Constructor
                && (relation == Relation::Implements || !derived_is_class)
            {
                continue;
            }

            let same_name = project.children_named(derived, &name).to_vec();
            let local = same_name
                .iter()
                .copied()
                .find(|&c| project.get(c).is_some_and(|r| !r.has_flag(ReflectionFlags::INHERITED)));
            if let Some(local) = local {
                link_member(project, local, member, relation);
                continue;
            }
            if !same_name.is_empty() {
                // Already inherited from an earlier base (or an earlier run).
                continue;
            }
            self.copy_member(project, member, derived)?;
        }
        Ok(())
    }

    /// Copy `member` and everything it owns into `derived`.
    fn copy_member(
        &mut self,
        project: &mut Project,
        member: ReflectionId,
        derived: ReflectionId,
    ) -> Result<ReflectionId, ModelError> {
        let copy = self.copy_tree(project, member, derived, TraversalRole::Child)?;
        mark_inherited(project, member, copy);
        Ok(copy)
    }

    fn copy_tree(
        &mut self,
        project: &mut Project,
        source: ReflectionId,
        owner: ReflectionId,
        role: TraversalRole,
    ) -> Result<ReflectionId, ModelError> {
        let original = project
            .get(source)
            .cloned()
            .ok_or(ModelError::UnknownReflection(source))?;
        let id = match role {
            TraversalRole::Child => project.create_declaration(original.kind, &original.name, owner)?,
            TraversalRole::Parameter => project.create_parameter(&original.name, owner)?,
            TraversalRole::TypeParameter => project.create_type_parameter(&original.name, owner)?,
            TraversalRole::Signature
            | TraversalRole::IndexSignature
            | TraversalRole::GetSignature
            | TraversalRole::SetSignature => {
                project.create_signature(original.kind, &original.name, owner)?
            }
        };
        if let Some(copy) = project.get_mut(id) {
            copy.flags = original.flags;
            copy.comment = original.comment.clone();
            copy.sources = original.sources.clone();
            copy.data = detached_payload(&original.data);
        }
        self.report.copies.push((source, id));
        for (child, child_role) in original.owned() {
            self.copy_tree(project, child, id, child_role)?;
        }
        Ok(id)
    }
}

/// Resolved bases of a class or interface: `extends` clauses first, then
/// `implements`, in declaration order. Only classes and interfaces of this
/// project count.
pub fn bases_of(project: &Project, id: ReflectionId) -> Vec<(ReflectionId, Relation)> {
    let Some(decl) = project.get(id).and_then(|r| r.declaration()) else {
        return Vec::new();
    };
    let mut bases: Vec<(ReflectionId, Relation)> = Vec::new();
    let clauses = decl
        .extended_types
        .iter()
        .map(|t| (t, Relation::Extends))
        .chain(decl.implemented_types.iter().map(|t| (t, Relation::Implements)));
    for (ty, relation) in clauses {
        let Some(base) = ty
            .reference_target()
            .and_then(|target| project.resolve_target(target))
        else {
            continue;
        };
        let is_candidate = base != id
            && project
                .get(base)
                .is_some_and(|r| r.kind.is(kind_masks::CLASS_OR_INTERFACE));
        if is_candidate && !bases.iter().any(|&(b, _)| b == base) {
            bases.push((base, relation));
        }
    }
    bases
}

/// Link a local member to the base member it redeclares; signatures are
/// paired by position. Existing links are kept.
fn link_member(project: &mut Project, local: ReflectionId, base: ReflectionId, relation: Relation) {
    set_link(project, local, base, relation);
    let pairs = {
        let (Some(l), Some(b)) = (
            project.get(local).and_then(|r| r.declaration()),
            project.get(base).and_then(|r| r.declaration()),
        ) else {
            return;
        };
        let mut pairs: Vec<(ReflectionId, ReflectionId)> =
            l.signatures.iter().copied().zip(b.signatures.iter().copied()).collect();
        if let (Some(lg), Some(bg)) = (l.get_signature, b.get_signature) {
            pairs.push((lg, bg));
        }
        if let (Some(ls), Some(bs)) = (l.set_signature, b.set_signature) {
            pairs.push((ls, bs));
        }
        pairs
    };
    for (l, b) in pairs {
        set_link(project, l, b, relation);
    }
}

fn set_link(project: &mut Project, local: ReflectionId, base: ReflectionId, relation: Relation) {
    let Some(links) = project.get_mut(local).and_then(|r| r.links_mut()) else {
        return;
    };
    let slot = match relation {
        Relation::Extends => &mut links.overwrites,
        Relation::Implements => &mut links.implementation_of,
    };
    if slot.is_none() {
        *slot = Some(base);
    }
}

/// Flag a fresh copy and its signatures as inherited from `original`.
fn mark_inherited(project: &mut Project, original: ReflectionId, copy: ReflectionId) {
    let signature_pairs: Vec<(ReflectionId, ReflectionId)> = {
        let (Some(o), Some(c)) = (project.get(original), project.get(copy)) else {
            return;
        };
        o.owned()
            .into_iter()
            .zip(c.owned())
            .filter(|((_, role), _)| {
                matches!(
                    role,
                    TraversalRole::Signature
                        | TraversalRole::IndexSignature
                        | TraversalRole::GetSignature
                        | TraversalRole::SetSignature
                )
            })
            .map(|((o, _), (c, _))| (o, c))
            .collect()
    };
    for (o, c) in std::iter::once((original, copy)).chain(signature_pairs) {
        if let Some(reflection) = project.get_mut(c) {
            reflection.flags |= ReflectionFlags::INHERITED;
            if let Some(links) = reflection.links_mut() {
                links.inherited_from = Some(o);
            }
        }
    }
}

/// Payload of `data` without owned ids or links; the copy's own children
/// are attached as they are created.
fn detached_payload(data: &ReflectionData) -> ReflectionData {
    match data {
        ReflectionData::Project(_) => ReflectionData::Project(ContainerData::default()),
        ReflectionData::Declaration(d) => ReflectionData::Declaration(Box::new(DeclarationData {
            declared_type: d.declared_type.clone(),
            default_value: d.default_value.clone(),
            extended_types: d.extended_types.clone(),
            implemented_types: d.implemented_types.clone(),
            target: d.target,
            ..DeclarationData::default()
        })),
        ReflectionData::Signature(s) => ReflectionData::Signature(SignatureData {
            return_type: s.return_type.clone(),
            ..SignatureData::default()
        }),
        ReflectionData::Parameter(p) => ReflectionData::Parameter(p.clone()),
        ReflectionData::TypeParameter(t) => ReflectionData::TypeParameter(t.clone()),
    }
}

#[cfg(test)]
#[path = "tests/inheritance_unit_tests.rs"]
mod tests;
