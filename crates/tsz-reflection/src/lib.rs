//! Reflection documentation model.
//!
//! A [`Project`] owns every [`Reflection`] in a flat arena indexed by
//! [`ReflectionId`]. Reflections refer to each other by id only; ownership
//! (children, signatures, parameters, type parameters) is expressed by the id
//! lists in [`ReflectionData`], back references by `parent` and the
//! inheritance links.

pub mod comment;
pub mod kind;
pub mod project;
pub mod reflection;
pub mod serialization;
pub mod types;

pub use comment::{Comment, CommentDisplayPart, CommentTag, parts_to_text};
pub use kind::{ReflectionFlags, ReflectionKind, kind_masks};
pub use project::{ModelError, Project};
pub use reflection::{
    ContainerData, DeclarationData, InheritanceLinks, ParameterData, Reflection, ReflectionData,
    ReflectionId, SignatureData, SourceReference, TraversalRole, TypeParameterData,
};
pub use serialization::{
    Deserializer, JsonFlags, JsonProject, JsonReflection, ReviveError, SCHEMA_VERSION,
    SerializeEvent, Serializer, SerializerHook,
};
pub use types::{
    ReferenceTarget, SomeType, TypeLiteral, TypeLiteralMember, TypeLiteralParameter,
    TypeLiteralSignature, TypeLiteralTypeParameter,
};
