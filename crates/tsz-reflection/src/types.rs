//! Serialized descriptions of types.
//!
//! A [`SomeType`] is a value: it owns its structure and refers to
//! reflections only through [`ReferenceTarget`]s.

use crate::kind::ReflectionKind;
use crate::reflection::ReflectionId;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use tsz_program::{LiteralValue, SymbolKey};

/// What a reference type points at.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ReferenceTarget {
    /// A reflection in the same project.
    Reflection(ReflectionId),
    /// A symbol that may or may not have been converted. Looked up in the
    /// project's symbol registry when needed.
    Symbol(SymbolKey),
    /// The type refers back to a type that is already being serialized.
    Circular,
    /// The front end could not bind the name.
    #[default]
    Unresolved,
}

impl ReferenceTarget {
    pub const fn is_unresolved(&self) -> bool {
        matches!(self, ReferenceTarget::Unresolved)
    }

    pub const fn reflection(&self) -> Option<ReflectionId> {
        match self {
            ReferenceTarget::Reflection(id) => Some(*id),
            _ => None,
        }
    }
}

/// JSON form: an id, `-1` for the cycle marker, or a symbol id object.
impl Serialize for ReferenceTarget {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ReferenceTarget::Reflection(id) => serializer.serialize_i64(i64::from(id.0)),
            ReferenceTarget::Circular => serializer.serialize_i64(-1),
            ReferenceTarget::Symbol(key) => key.serialize(serializer),
            ReferenceTarget::Unresolved => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for ReferenceTarget {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Id(i64),
            Symbol(SymbolKey),
        }

        match Option::<Repr>::deserialize(deserializer)? {
            None => Ok(ReferenceTarget::Unresolved),
            Some(Repr::Id(-1)) => Ok(ReferenceTarget::Circular),
            Some(Repr::Id(id)) => u32::try_from(id)
                .map(|id| ReferenceTarget::Reflection(ReflectionId(id)))
                .map_err(|_| de::Error::custom(format!("invalid reflection id {id}"))),
            Some(Repr::Symbol(key)) => Ok(ReferenceTarget::Symbol(key)),
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A type description.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SomeType {
    Intrinsic {
        name: String,
    },
    Literal {
        value: LiteralValue,
    },
    #[serde(rename_all = "camelCase")]
    Reference {
        name: String,
        #[serde(default, skip_serializing_if = "ReferenceTarget::is_unresolved")]
        target: ReferenceTarget,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        type_arguments: Vec<SomeType>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        package: Option<String>,
        #[serde(default, skip_serializing_if = "is_false")]
        refers_to_type_parameter: bool,
    },
    Union {
        types: Vec<SomeType>,
    },
    Intersection {
        types: Vec<SomeType>,
    },
    #[serde(rename_all = "camelCase")]
    Array {
        element_type: Box<SomeType>,
    },
    Tuple {
        #[serde(default)]
        elements: Vec<SomeType>,
    },
    #[serde(rename_all = "camelCase")]
    NamedTupleMember {
        name: String,
        #[serde(default)]
        is_optional: bool,
        element: Box<SomeType>,
    },
    #[serde(rename_all = "camelCase")]
    Optional {
        element_type: Box<SomeType>,
    },
    #[serde(rename_all = "camelCase")]
    Rest {
        element_type: Box<SomeType>,
    },
    /// Inline object or function type.
    Reflection {
        declaration: Box<TypeLiteral>,
    },
    #[serde(rename_all = "camelCase")]
    Conditional {
        check_type: Box<SomeType>,
        extends_type: Box<SomeType>,
        true_type: Box<SomeType>,
        false_type: Box<SomeType>,
    },
    #[serde(rename_all = "camelCase")]
    Mapped {
        parameter: String,
        parameter_type: Box<SomeType>,
        template_type: Box<SomeType>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name_type: Option<Box<SomeType>>,
        /// `"+"` or `"-"`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        readonly_modifier: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        optional_modifier: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    IndexedAccess {
        object_type: Box<SomeType>,
        index_type: Box<SomeType>,
    },
    TypeOperator {
        operator: String,
        target: Box<SomeType>,
    },
    /// `typeof x`
    #[serde(rename_all = "camelCase")]
    Query {
        query_type: Box<SomeType>,
    },
    #[serde(rename_all = "camelCase")]
    Predicate {
        name: String,
        #[serde(default)]
        asserts: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_type: Option<Box<SomeType>>,
    },
    TemplateLiteral {
        head: String,
        #[serde(default)]
        tail: Vec<(SomeType, String)>,
    },
    Inferred {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        constraint: Option<Box<SomeType>>,
    },
    Unknown {
        name: String,
    },
}

impl SomeType {
    pub fn intrinsic(name: impl Into<String>) -> Self {
        SomeType::Intrinsic { name: name.into() }
    }

    pub fn unknown(name: impl Into<String>) -> Self {
        SomeType::Unknown { name: name.into() }
    }

    /// Reference with no type arguments.
    pub fn reference(name: impl Into<String>, target: ReferenceTarget) -> Self {
        SomeType::Reference {
            name: name.into(),
            target,
            type_arguments: Vec::new(),
            package: None,
            refers_to_type_parameter: false,
        }
    }

    /// The reduced form used for back-links: a named reference to a reflection.
    pub fn reflection_reference(name: impl Into<String>, id: ReflectionId) -> Self {
        SomeType::reference(name, ReferenceTarget::Reflection(id))
    }

    pub fn reference_target(&self) -> Option<&ReferenceTarget> {
        match self {
            SomeType::Reference { target, .. } => Some(target),
            _ => None,
        }
    }

    /// Visit this type and every type nested in it, depth first.
    pub fn visit(&self, f: &mut dyn FnMut(&SomeType)) {
        f(self);
        self.for_each_child(&mut |child| child.visit(f));
    }

    /// Mutable counterpart of [`visit`](Self::visit).
    pub fn visit_mut(&mut self, f: &mut dyn FnMut(&mut SomeType)) {
        f(self);
        self.for_each_child_mut(&mut |child| child.visit_mut(f));
    }

    fn for_each_child(&self, f: &mut dyn FnMut(&SomeType)) {
        match self {
            SomeType::Intrinsic { .. }
            | SomeType::Literal { .. }
            | SomeType::Unknown { .. } => {}
            SomeType::Reference { type_arguments, .. } => type_arguments.iter().for_each(f),
            SomeType::Union { types } | SomeType::Intersection { types } => types.iter().for_each(f),
            SomeType::Tuple { elements } => elements.iter().for_each(f),
            SomeType::Array { element_type }
            | SomeType::Optional { element_type }
            | SomeType::Rest { element_type } => f(element_type),
            SomeType::NamedTupleMember { element, .. } => f(element),
            SomeType::Reflection { declaration } => declaration.for_each_type(f),
            SomeType::Conditional {
                check_type,
                extends_type,
                true_type,
                false_type,
            } => {
                f(check_type);
                f(extends_type);
                f(true_type);
                f(false_type);
            }
            SomeType::Mapped {
                parameter_type,
                template_type,
                name_type,
                ..
            } => {
                f(parameter_type);
                f(template_type);
                if let Some(name_type) = name_type {
                    f(name_type);
                }
            }
            SomeType::IndexedAccess {
                object_type,
                index_type,
            } => {
                f(object_type);
                f(index_type);
            }
            SomeType::TypeOperator { target, .. } => f(target),
            SomeType::Query { query_type } => f(query_type),
            SomeType::Predicate { target_type, .. } => {
                if let Some(t) = target_type {
                    f(t);
                }
            }
            SomeType::TemplateLiteral { tail, .. } => tail.iter().for_each(|(t, _)| f(t)),
            SomeType::Inferred { constraint, .. } => {
                if let Some(c) = constraint {
                    f(c);
                }
            }
        }
    }

    fn for_each_child_mut(&mut self, f: &mut dyn FnMut(&mut SomeType)) {
        match self {
            SomeType::Intrinsic { .. }
            | SomeType::Literal { .. }
            | SomeType::Unknown { .. } => {}
            SomeType::Reference { type_arguments, .. } => type_arguments.iter_mut().for_each(f),
            SomeType::Union { types } | SomeType::Intersection { types } => {
                types.iter_mut().for_each(f);
            }
            SomeType::Tuple { elements } => elements.iter_mut().for_each(f),
            SomeType::Array { element_type }
            | SomeType::Optional { element_type }
            | SomeType::Rest { element_type } => f(element_type),
            SomeType::NamedTupleMember { element, .. } => f(element),
            SomeType::Reflection { declaration } => declaration.for_each_type_mut(f),
            SomeType::Conditional {
                check_type,
                extends_type,
                true_type,
                false_type,
            } => {
                f(check_type);
                f(extends_type);
                f(true_type);
                f(false_type);
            }
            SomeType::Mapped {
                parameter_type,
                template_type,
                name_type,
                ..
            } => {
                f(parameter_type);
                f(template_type);
                if let Some(name_type) = name_type {
                    f(name_type);
                }
            }
            SomeType::IndexedAccess {
                object_type,
                index_type,
            } => {
                f(object_type);
                f(index_type);
            }
            SomeType::TypeOperator { target, .. } => f(target),
            SomeType::Query { query_type } => f(query_type),
            SomeType::Predicate { target_type, .. } => {
                if let Some(t) = target_type {
                    f(t);
                }
            }
            SomeType::TemplateLiteral { tail, .. } => tail.iter_mut().for_each(|(t, _)| f(t)),
            SomeType::Inferred { constraint, .. } => {
                if let Some(c) = constraint {
                    f(c);
                }
            }
        }
    }
}

/// Anonymous object or function type, stored inline in the type that uses
/// it. Members have no ids.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeLiteral {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TypeLiteralMember>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub signatures: Vec<TypeLiteralSignature>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub index_signatures: Vec<TypeLiteralSignature>,
}

impl TypeLiteral {
    fn for_each_type(&self, f: &mut dyn FnMut(&SomeType)) {
        for member in &self.children {
            if let Some(t) = &member.member_type {
                f(t);
            }
            for sig in &member.signatures {
                sig.for_each_type(f);
            }
        }
        for sig in self.signatures.iter().chain(&self.index_signatures) {
            sig.for_each_type(f);
        }
    }

    fn for_each_type_mut(&mut self, f: &mut dyn FnMut(&mut SomeType)) {
        for member in &mut self.children {
            if let Some(t) = &mut member.member_type {
                f(t);
            }
            for sig in &mut member.signatures {
                sig.for_each_type_mut(f);
            }
        }
        for sig in self.signatures.iter_mut().chain(&mut self.index_signatures) {
            sig.for_each_type_mut(f);
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeLiteralMember {
    pub name: String,
    /// `Property` or `Method`.
    #[serde(with = "kind_bits")]
    pub kind: ReflectionKind,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_optional: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_readonly: bool,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub member_type: Option<SomeType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub signatures: Vec<TypeLiteralSignature>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeLiteralSignature {
    /// `CallSignature`, `ConstructorSignature` or `IndexSignature`.
    #[serde(with = "kind_bits")]
    pub kind: ReflectionKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<TypeLiteralTypeParameter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<TypeLiteralParameter>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<SomeType>,
}

impl TypeLiteralSignature {
    fn for_each_type(&self, f: &mut dyn FnMut(&SomeType)) {
        for tp in &self.type_parameters {
            if let Some(c) = &tp.constraint {
                f(c);
            }
            if let Some(d) = &tp.default {
                f(d);
            }
        }
        for p in &self.parameters {
            if let Some(t) = &p.param_type {
                f(t);
            }
        }
        if let Some(r) = &self.return_type {
            f(r);
        }
    }

    fn for_each_type_mut(&mut self, f: &mut dyn FnMut(&mut SomeType)) {
        for tp in &mut self.type_parameters {
            if let Some(c) = &mut tp.constraint {
                f(c);
            }
            if let Some(d) = &mut tp.default {
                f(d);
            }
        }
        for p in &mut self.parameters {
            if let Some(t) = &mut p.param_type {
                f(t);
            }
        }
        if let Some(r) = &mut self.return_type {
            f(r);
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeLiteralParameter {
    pub name: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_optional: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_rest: bool,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub param_type: Option<SomeType>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeLiteralTypeParameter {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<SomeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<SomeType>,
}

/// Serialize a [`ReflectionKind`] as its numeric value.
pub(crate) mod kind_bits {
    use crate::kind::ReflectionKind;
    use serde::de::{self, Deserialize, Deserializer};
    use serde::ser::Serializer;

    pub fn serialize<S: Serializer>(kind: &ReflectionKind, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(kind.bits())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ReflectionKind, D::Error> {
        let bits = u32::deserialize(deserializer)?;
        ReflectionKind::from_bits(bits)
            .ok_or_else(|| de::Error::custom(format!("unknown reflection kind {bits}")))
    }
}

#[cfg(test)]
#[path = "tests/types_tests.rs"]
mod tests;
