//! The project: root of the model and owner of every reflection.

use crate::kind::{ReflectionKind, kind_masks};
use crate::reflection::{Reflection, ReflectionData, ReflectionId, TraversalRole};
use crate::types::{ReferenceTarget, SomeType};
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::trace;
use tsz_common::limits::INITIAL_REFLECTION_CAPACITY;
use tsz_program::SymbolKey;

/// Structural misuse of the model (attaching to a reflection that cannot own
/// the new reflection, dangling ids).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("reflection {0} does not exist")]
    UnknownReflection(ReflectionId),
    #[error("{owner} ({kind}) cannot own a {child}")]
    InvalidOwner {
        owner: ReflectionId,
        kind: &'static str,
        child: &'static str,
    },
}

/// Arena of reflections. The index of a reflection in the arena is its id;
/// ids are handed out by the project's counter in creation order.
#[derive(Clone, Debug, PartialEq)]
pub struct Project {
    reflections: Vec<Reflection>,
    next_id: u32,
    registry: FxHashMap<SymbolKey, ReflectionId>,
    /// Reverse of `registry`, for serializing the symbol id map.
    symbol_of: FxHashMap<ReflectionId, SymbolKey>,
    pub package_name: Option<String>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        let mut project = Project {
            reflections: Vec::with_capacity(INITIAL_REFLECTION_CAPACITY),
            next_id: 0,
            registry: FxHashMap::default(),
            symbol_of: FxHashMap::default(),
            package_name: None,
        };
        let root = project.allocate(ReflectionKind::Project, name.into());
        debug_assert_eq!(root, ReflectionId::ROOT);
        project
    }

    #[inline]
    pub const fn root(&self) -> ReflectionId {
        ReflectionId::ROOT
    }

    pub fn name(&self) -> &str {
        self.reflections
            .first()
            .map_or("", |root| root.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.reflections.len()
    }

    pub fn is_empty(&self) -> bool {
        // The root always exists.
        self.reflections.len() <= 1
    }

    pub fn get(&self, id: ReflectionId) -> Option<&Reflection> {
        self.reflections.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: ReflectionId) -> Option<&mut Reflection> {
        self.reflections.get_mut(id.0 as usize)
    }

    /// Every reflection, in id order.
    pub fn reflections(&self) -> impl Iterator<Item = &Reflection> {
        self.reflections.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = ReflectionId> + use<> {
        (0..self.reflections.len() as u32).map(ReflectionId)
    }

    fn allocate(&mut self, kind: ReflectionKind, name: String) -> ReflectionId {
        let id = ReflectionId(self.next_id);
        self.next_id += 1;
        self.reflections.push(Reflection::new(id, kind, name));
        id
    }

    fn expect_owner(&self, owner: ReflectionId) -> Result<&Reflection, ModelError> {
        self.get(owner).ok_or(ModelError::UnknownReflection(owner))
    }

    /// Create a declaration and append it to `parent`'s children.
    pub fn create_declaration(
        &mut self,
        kind: ReflectionKind,
        name: &str,
        parent: ReflectionId,
    ) -> Result<ReflectionId, ModelError> {
        let owner = self.expect_owner(parent)?;
        if owner.container().is_none() {
            return Err(ModelError::InvalidOwner {
                owner: parent,
                kind: owner.kind.as_str(),
                child: kind.as_str(),
            });
        }
        let id = self.allocate(kind, name.to_string());
        self.attach(parent, id, name, TraversalRole::Child);
        trace!(id = id.0, kind = kind.as_str(), name, parent = parent.0, "created declaration");
        Ok(id)
    }

    /// Create a signature owned by `owner`. The slot follows the kind: call
    /// and constructor signatures are appended to `signatures`, index
    /// signatures to `index_signatures`, get/set signatures replace the
    /// accessor's slot.
    pub fn create_signature(
        &mut self,
        kind: ReflectionKind,
        name: &str,
        owner: ReflectionId,
    ) -> Result<ReflectionId, ModelError> {
        let owner_ref = self.expect_owner(owner)?;
        let role = match kind {
            ReflectionKind::CallSignature | ReflectionKind::ConstructorSignature => {
                TraversalRole::Signature
            }
            ReflectionKind::IndexSignature => TraversalRole::IndexSignature,
            ReflectionKind::GetSignature => TraversalRole::GetSignature,
            ReflectionKind::SetSignature => TraversalRole::SetSignature,
            _ => {
                return Err(ModelError::InvalidOwner {
                    owner,
                    kind: owner_ref.kind.as_str(),
                    child: kind.as_str(),
                });
            }
        };
        if owner_ref.declaration().is_none() {
            return Err(ModelError::InvalidOwner {
                owner,
                kind: owner_ref.kind.as_str(),
                child: kind.as_str(),
            });
        }
        let id = self.allocate(kind, name.to_string());
        self.attach(owner, id, name, role);
        Ok(id)
    }

    /// Create a parameter of signature `owner`.
    pub fn create_parameter(
        &mut self,
        name: &str,
        owner: ReflectionId,
    ) -> Result<ReflectionId, ModelError> {
        let owner_ref = self.expect_owner(owner)?;
        if owner_ref.signature().is_none() {
            return Err(ModelError::InvalidOwner {
                owner,
                kind: owner_ref.kind.as_str(),
                child: ReflectionKind::Parameter.as_str(),
            });
        }
        let id = self.allocate(ReflectionKind::Parameter, name.to_string());
        self.attach(owner, id, name, TraversalRole::Parameter);
        Ok(id)
    }

    /// Create a type parameter of a declaration or signature.
    pub fn create_type_parameter(
        &mut self,
        name: &str,
        owner: ReflectionId,
    ) -> Result<ReflectionId, ModelError> {
        let owner_ref = self.expect_owner(owner)?;
        if owner_ref.declaration().is_none() && owner_ref.signature().is_none() {
            return Err(ModelError::InvalidOwner {
                owner,
                kind: owner_ref.kind.as_str(),
                child: ReflectionKind::TypeParameter.as_str(),
            });
        }
        let id = self.allocate(ReflectionKind::TypeParameter, name.to_string());
        self.attach(owner, id, name, TraversalRole::TypeParameter);
        Ok(id)
    }

    fn attach(&mut self, owner: ReflectionId, id: ReflectionId, name: &str, role: TraversalRole) {
        if let Some(child) = self.get_mut(id) {
            child.parent = Some(owner);
        }
        let Some(owner) = self.get_mut(owner) else {
            return;
        };
        match (&mut owner.data, role) {
            (ReflectionData::Project(c), TraversalRole::Child) => c.push(name, id),
            (ReflectionData::Declaration(d), TraversalRole::Child) => d.container.push(name, id),
            (ReflectionData::Declaration(d), TraversalRole::TypeParameter) => {
                d.type_parameters.push(id);
            }
            (ReflectionData::Declaration(d), TraversalRole::Signature) => d.signatures.push(id),
            (ReflectionData::Declaration(d), TraversalRole::IndexSignature) => {
                d.index_signatures.push(id);
            }
            (ReflectionData::Declaration(d), TraversalRole::GetSignature) => {
                d.get_signature = Some(id);
            }
            (ReflectionData::Declaration(d), TraversalRole::SetSignature) => {
                d.set_signature = Some(id);
            }
            (ReflectionData::Signature(s), TraversalRole::TypeParameter) => {
                s.type_parameters.push(id);
            }
            (ReflectionData::Signature(s), TraversalRole::Parameter) => s.parameters.push(id),
            // Callers validate the owner before allocating.
            _ => {}
        }
    }

    /// Add an already created reflection (e.g. revived from JSON) to the
    /// arena. Ids must arrive in order.
    pub(crate) fn push_revived(&mut self, reflection: Reflection) -> Result<(), ReflectionId> {
        if reflection.id.0 != self.next_id {
            return Err(reflection.id);
        }
        self.next_id += 1;
        self.reflections.push(reflection);
        Ok(())
    }

    /// Replace the root (revival only).
    pub(crate) fn replace_root(&mut self, root: Reflection) {
        if let Some(slot) = self.reflections.first_mut() {
            *slot = root;
        }
    }

    // ---------------------------------------------------------------------
    // Symbol registry
    // ---------------------------------------------------------------------

    /// Record that `key` was converted into `id`. The first registration wins.
    pub fn register_symbol(&mut self, key: SymbolKey, id: ReflectionId) -> bool {
        if self.registry.contains_key(&key) {
            return false;
        }
        self.symbol_of.insert(id, key.clone());
        self.registry.insert(key, id);
        true
    }

    pub fn reflection_for_symbol(&self, key: &SymbolKey) -> Option<ReflectionId> {
        self.registry.get(key).copied()
    }

    pub fn symbol_for_reflection(&self, id: ReflectionId) -> Option<&SymbolKey> {
        self.symbol_of.get(&id)
    }

    pub fn registry_len(&self) -> usize {
        self.registry.len()
    }

    /// Registry entries ordered by reflection id.
    pub fn symbol_entries(&self) -> Vec<(ReflectionId, &SymbolKey)> {
        let mut entries: Vec<_> = self.symbol_of.iter().map(|(&id, key)| (id, key)).collect();
        entries.sort_by_key(|(id, _)| *id);
        entries
    }

    /// Resolve a reference target to a reflection of this project.
    pub fn resolve_target(&self, target: &ReferenceTarget) -> Option<ReflectionId> {
        match target {
            ReferenceTarget::Reflection(id) => Some(*id),
            ReferenceTarget::Symbol(key) => self.reflection_for_symbol(key),
            ReferenceTarget::Circular | ReferenceTarget::Unresolved => None,
        }
    }

    /// Copy of `ty` with every symbol target that has been converted replaced
    /// by the reflection it was converted into.
    pub fn resolve_type(&self, ty: &SomeType) -> SomeType {
        let mut resolved = ty.clone();
        resolved.visit_mut(&mut |t| {
            if let SomeType::Reference { target, .. } = t
                && let ReferenceTarget::Symbol(key) = &*target
                && let Some(id) = self.reflection_for_symbol(key)
            {
                *target = ReferenceTarget::Reflection(id);
            }
        });
        resolved
    }

    // ---------------------------------------------------------------------
    // Navigation
    // ---------------------------------------------------------------------

    pub fn parent_of(&self, id: ReflectionId) -> Option<ReflectionId> {
        self.get(id)?.parent
    }

    /// Children of a container; empty for anything else.
    pub fn children_of(&self, id: ReflectionId) -> &[ReflectionId] {
        self.get(id)
            .and_then(Reflection::container)
            .map_or(&[], |c| c.children.as_slice())
    }

    /// Children of `scope` named `name`.
    pub fn children_named(&self, scope: ReflectionId, name: &str) -> &[ReflectionId] {
        self.get(scope)
            .and_then(Reflection::container)
            .map_or(&[], |c| c.named(name))
    }

    pub fn find_child(&self, scope: ReflectionId, name: &str) -> Option<ReflectionId> {
        self.children_named(scope, name).first().copied()
    }

    /// Call `callback` for each reflection owned by `id`, in role order
    /// (type parameters, signatures, index signatures, accessor signatures,
    /// parameters, children). Returning `false` stops the walk; the result
    /// tells whether the walk ran to completion.
    pub fn traverse<F>(&self, id: ReflectionId, mut callback: F) -> bool
    where
        F: FnMut(ReflectionId, TraversalRole) -> bool,
    {
        let Some(reflection) = self.get(id) else {
            return true;
        };
        for (child, role) in reflection.owned() {
            if !callback(child, role) {
                return false;
            }
        }
        true
    }

    /// Every reflection reachable from `id` (excluded), depth first, pre-order.
    pub fn descendants(&self, id: ReflectionId) -> Vec<ReflectionId> {
        let mut out = Vec::new();
        let mut stack: Vec<ReflectionId> = Vec::new();
        if let Some(r) = self.get(id) {
            stack.extend(r.owned().into_iter().rev().map(|(id, _)| id));
        }
        while let Some(next) = stack.pop() {
            out.push(next);
            if let Some(r) = self.get(next) {
                stack.extend(r.owned().into_iter().rev().map(|(id, _)| id));
            }
        }
        out
    }

    /// Look up a dotted name relative to `scope`: `"A.b"` finds child `b` of
    /// child `A` of `scope`.
    pub fn find_by_qualified_name(&self, scope: ReflectionId, name: &str) -> Option<ReflectionId> {
        let mut current = scope;
        for segment in name.split('.') {
            if segment.is_empty() {
                return None;
            }
            current = self.find_child(current, segment)?;
        }
        Some(current)
    }

    /// Look up a dotted name from `scope` outward: the scope itself first,
    /// then each enclosing container up to the root.
    pub fn resolve_name_from(&self, scope: ReflectionId, name: &str) -> Option<ReflectionId> {
        let mut current = Some(scope);
        let mut guard = 0usize;
        while let Some(id) = current {
            if let Some(found) = self.find_by_qualified_name(id, name) {
                return Some(found);
            }
            current = self.parent_of(id);
            guard += 1;
            if guard > self.reflections.len() {
                break;
            }
        }
        None
    }

    /// Dotted name from the first container below the root (`Ns.Class.member`).
    pub fn qualified_name(&self, id: ReflectionId) -> String {
        let mut parts = Vec::new();
        let mut current = Some(id);
        while let Some(cur) = current {
            let Some(r) = self.get(cur) else {
                break;
            };
            if r.kind == ReflectionKind::Project || parts.len() > self.reflections.len() {
                break;
            }
            parts.push(r.name.as_str());
            current = r.parent;
        }
        parts.reverse();
        parts.join(".")
    }

    /// Nearest ancestor (or `id` itself) whose kind is in `mask`.
    pub fn ancestor_of_kind(&self, id: ReflectionId, mask: u32) -> Option<ReflectionId> {
        let mut current = Some(id);
        let mut guard = 0usize;
        while let Some(cur) = current {
            let r = self.get(cur)?;
            if r.kind.is(mask) {
                return Some(cur);
            }
            current = r.parent;
            guard += 1;
            if guard > self.reflections.len() {
                break;
            }
        }
        None
    }

    /// Classes and interfaces, in id order.
    pub fn classes_and_interfaces(&self) -> Vec<ReflectionId> {
        self.reflections
            .iter()
            .filter(|r| r.kind.is(kind_masks::CLASS_OR_INTERFACE))
            .map(|r| r.id)
            .collect()
    }
}

#[cfg(test)]
#[path = "tests/project_tests.rs"]
mod tests;
