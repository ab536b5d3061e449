//! Deferred `@inheritDoc` resolution.
//!
//! Directives are collected while the tree is built and resolved in two
//! rounds: named targets (`{@inheritDoc Base.method}`) once the tree is
//! complete, unnamed ones after the inheritance pass has linked members to
//! the members they override or implement. A named directive whose chain
//! runs into an unnamed one waits for the second round.

use crate::context::{ConversionState, InheritDocRequest};
use indexmap::IndexMap;
use tracing::{debug, trace};
use tsz_common::limits::MAX_INHERIT_DOC_DEPTH;
use tsz_common::{Diagnostic, diagnostic_codes};
use tsz_reflection::{Comment, Project, ReflectionId, ReflectionKind, kind_masks};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Round {
    Named,
    Unnamed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Outcome {
    Done,
    Deferred,
    Failed,
}

/// Worklist of pending directives, keyed by the reflection they apply to.
#[derive(Debug, Default)]
pub struct InheritDocResolver {
    pending: IndexMap<ReflectionId, InheritDocRequest>,
}

impl InheritDocResolver {
    pub fn new(requests: impl IntoIterator<Item = InheritDocRequest>) -> Self {
        let mut resolver = InheritDocResolver::default();
        for request in requests {
            resolver.add(request);
        }
        resolver
    }

    /// Queue a request; the first request for a reflection wins.
    pub fn add(&mut self, request: InheritDocRequest) {
        self.pending.entry(request.reflection).or_insert(request);
    }

    pub fn is_pending(&self, id: ReflectionId) -> bool {
        self.pending.contains_key(&id)
    }

    pub fn pending(&self, id: ReflectionId) -> Option<&InheritDocRequest> {
        self.pending.get(&id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Resolve directives that name their source.
    pub fn resolve_named(&mut self, state: &mut ConversionState<'_>) {
        let ids: Vec<ReflectionId> = self
            .pending
            .iter()
            .filter(|(_, request)| request.directive.target.is_some())
            .map(|(&id, _)| id)
            .collect();
        debug!(count = ids.len(), "resolving named @inheritDoc directives");
        for id in ids {
            self.resolve(state, id, &mut Vec::new(), Round::Named);
        }
    }

    /// Resolve everything still pending.
    pub fn resolve_remaining(&mut self, state: &mut ConversionState<'_>) {
        debug!(count = self.pending.len(), "resolving remaining @inheritDoc directives");
        while let Some((&id, _)) = self.pending.first() {
            self.resolve(state, id, &mut Vec::new(), Round::Unnamed);
            // Every path through `resolve` settles `id` in the unnamed round.
            self.pending.shift_remove(&id);
        }
    }

    fn resolve(
        &mut self,
        state: &mut ConversionState<'_>,
        id: ReflectionId,
        chain: &mut Vec<ReflectionId>,
        round: Round,
    ) -> Outcome {
        let Some(request) = self.pending.get(&id).cloned() else {
            return Outcome::Done;
        };
        if chain.contains(&id) || chain.len() >= MAX_INHERIT_DOC_DEPTH as usize {
            let name = state.project.qualified_name(id);
            state.warn(Diagnostic::warning(
                file_of(&state.project, id),
                diagnostic_codes::INHERIT_DOC_CIRCULAR,
                &[name.as_str()],
            ));
            self.pending.shift_remove(&id);
            return Outcome::Failed;
        }

        let source = match &request.directive.target {
            Some(target) => match lookup_named(&state.project, request.scope, target) {
                Some(source) => source,
                None => {
                    let name = state.project.qualified_name(id);
                    state.warn(Diagnostic::warning(
                        file_of(&state.project, id),
                        diagnostic_codes::INHERIT_DOC_TARGET_NOT_FOUND,
                        &[target.as_str(), name.as_str()],
                    ));
                    self.pending.shift_remove(&id);
                    return Outcome::Failed;
                }
            },
            None if round == Round::Named => return Outcome::Deferred,
            None => match linked_source(&state.project, id) {
                Some(source) => source,
                None => {
                    let name = state.project.qualified_name(id);
                    state.warn(Diagnostic::warning(
                        file_of(&state.project, id),
                        diagnostic_codes::INHERIT_DOC_NO_SOURCE,
                        &[name.as_str()],
                    ));
                    self.pending.shift_remove(&id);
                    return Outcome::Failed;
                }
            },
        };
        let holder = comment_holder(&state.project, source, id);

        chain.push(id);
        let mut outcome = self.resolve(state, source, chain, round);
        if outcome == Outcome::Done && holder != source {
            outcome = self.resolve(state, holder, chain, round);
        }
        chain.pop();
        match outcome {
            Outcome::Deferred => return Outcome::Deferred,
            Outcome::Failed => {
                self.pending.shift_remove(&id);
                return Outcome::Failed;
            }
            Outcome::Done => {}
        }

        copy_comment(&mut state.project, holder, id);
        trace!(target = id.0, source = holder.0, "inherited comment");
        self.pending.shift_remove(&id);
        Outcome::Done
    }
}

/// Named source lookup: from the directive's scope outward, then inside each
/// module of the project.
fn lookup_named(project: &Project, scope: ReflectionId, name: &str) -> Option<ReflectionId> {
    let name = name.replace('#', ".");
    project.resolve_name_from(scope, &name).or_else(|| {
        project
            .children_of(project.root())
            .iter()
            .filter(|&&child| project.get(child).is_some_and(|r| r.kind == ReflectionKind::Module))
            .find_map(|&module| project.find_by_qualified_name(module, &name))
    })
}

/// Source of an unnamed directive: what the reflection overrides,
/// implements or was copied from, falling back to its owner's links for
/// signatures.
fn linked_source(project: &Project, id: ReflectionId) -> Option<ReflectionId> {
    let reflection = project.get(id)?;
    let pick = |links: &tsz_reflection::InheritanceLinks| {
        links
            .overwrites
            .or(links.implementation_of)
            .or(links.inherited_from)
    };
    if let Some(source) = reflection.links().and_then(pick) {
        return Some(source);
    }
    if reflection.kind.is(kind_masks::SIGNATURE) {
        let owner = project.get(reflection.parent?)?;
        return owner.links().and_then(pick);
    }
    None
}

/// The reflection whose comment is copied when `target` inherits from
/// `source`: signatures take their comment from the first signature of a
/// function-like source.
fn comment_holder(project: &Project, source: ReflectionId, target: ReflectionId) -> ReflectionId {
    let target_is_signature = project
        .get(target)
        .is_some_and(|r| r.kind.is(kind_masks::SIGNATURE));
    let Some(source_ref) = project.get(source) else {
        return source;
    };
    let first_signature = source_ref
        .declaration()
        .and_then(|d| d.signatures.first().copied());
    match first_signature {
        Some(signature) if target_is_signature || source_ref.comment.is_none() => signature,
        _ => source,
    }
}

fn copy_comment(project: &mut Project, from: ReflectionId, to: ReflectionId) {
    let Some(source) = project.get(from) else {
        return;
    };
    let comment = source.comment.clone();
    let source_params = parameter_comments(project, from);
    let target_params: Vec<ReflectionId> = project
        .get(to)
        .and_then(|r| r.signature())
        .map(|s| s.parameters.clone())
        .unwrap_or_default();

    if let Some(comment) = comment
        && let Some(target) = project.get_mut(to)
    {
        target
            .comment
            .get_or_insert_with(Comment::default)
            .inherit_from(&comment);
    }
    for param in target_params {
        let Some(reflection) = project.get_mut(param) else {
            continue;
        };
        if let Some((_, comment)) = source_params.iter().find(|(name, _)| *name == reflection.name) {
            reflection
                .comment
                .get_or_insert_with(Comment::default)
                .inherit_from(comment);
        }
    }
}

fn parameter_comments(project: &Project, signature: ReflectionId) -> Vec<(String, Comment)> {
    let Some(sig) = project.get(signature).and_then(|r| r.signature()) else {
        return Vec::new();
    };
    sig.parameters
        .iter()
        .filter_map(|&p| project.get(p))
        .filter_map(|p| p.comment.clone().map(|c| (p.name.clone(), c)))
        .collect()
}

/// File of the first source of `id` or of its nearest owner with one.
fn file_of(project: &Project, id: ReflectionId) -> String {
    let mut current = Some(id);
    let mut steps = 0usize;
    while let Some(cur) = current {
        let Some(reflection) = project.get(cur) else {
            break;
        };
        if let Some(source) = reflection.sources.first() {
            return source.file_name.clone();
        }
        current = reflection.parent;
        steps += 1;
        if steps > project.len() {
            break;
        }
    }
    String::new()
}

#[cfg(test)]
#[path = "tests/inherit_doc_tests.rs"]
mod tests;
