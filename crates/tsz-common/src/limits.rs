//! Centralized limits and thresholds for the documentation converter.
//!
//! The converter is a plain recursive descent over the front end's symbol and
//! type graphs. Cycle detection is handled by visited sets at each recursive
//! entry point; these limits are a second line of defence against pathological
//! but acyclic inputs (very deep nesting) that would otherwise exhaust the stack.

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum nesting depth when serializing a resolved type.
///
/// Self-referential types are cut by the serializer's visited set; this bound
/// only triggers for legitimately deep, acyclic type trees such as
///
/// ```typescript
/// type Deep = { a: { b: { c: { /* ... hundreds of levels ... */ } } } };
/// ```
///
/// When exceeded the serializer emits an `unknown` type named `...`.
pub const MAX_TYPE_SERIALIZATION_DEPTH: u32 = 100;

/// Maximum nesting depth of declarations visited by the node converters.
///
/// Namespaces nested deeper than this are not converted.
pub const MAX_DECLARATION_DEPTH: u32 = 256;

/// Maximum length of an `@inheritDoc` chain.
///
/// Chains are also guarded by a visiting set, so this only bounds very long
/// acyclic chains.
pub const MAX_INHERIT_DOC_DEPTH: u32 = 64;

// =============================================================================
// Capacity Limits
// =============================================================================

/// Initial capacity of the reflection arena.
///
/// Most single-package projects stay well below this.
pub const INITIAL_REFLECTION_CAPACITY: usize = 256;
