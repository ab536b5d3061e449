//! Resolved types to [`SomeType`] descriptions.

use crate::context::Context;
use rustc_hash::{FxHashMap, FxHashSet};
use tsz_common::limits::MAX_TYPE_SERIALIZATION_DEPTH;
use tsz_program::{
    IndexSignatureShape, MappedModifier, ObjectShape, Program, SignatureShape, SymbolId,
    TupleElement, TypeData, TypeId,
};
use tsz_reflection::{
    ReferenceTarget, ReflectionId, ReflectionKind, SomeType, TypeLiteral, TypeLiteralMember,
    TypeLiteralParameter, TypeLiteralSignature, TypeLiteralTypeParameter,
};

/// Serializes types of one program, resolving type parameter names against
/// the bindings visible in the current context.
pub struct TypeSerializer<'a> {
    program: &'a Program,
    type_parameters: &'a FxHashMap<String, ReflectionId>,
}

impl<'a> TypeSerializer<'a> {
    pub fn new(ctx: &'a Context<'_>) -> Self {
        TypeSerializer {
            program: ctx.program,
            type_parameters: ctx.type_parameters(),
        }
    }

    pub fn for_program(
        program: &'a Program,
        type_parameters: &'a FxHashMap<String, ReflectionId>,
    ) -> Self {
        TypeSerializer {
            program,
            type_parameters,
        }
    }

    /// Serialize with a fresh visited set.
    pub fn serialize_type(&self, id: TypeId) -> SomeType {
        self.serialize(id, &mut FxHashSet::default())
    }

    /// Serialize `id`. `visited` holds the types currently being serialized
    /// further up the call chain; meeting one of them again yields a
    /// reference with a [`ReferenceTarget::Circular`] target.
    pub fn serialize(&self, id: TypeId, visited: &mut FxHashSet<TypeId>) -> SomeType {
        self.convert(id, visited, 0)
    }

    fn convert(&self, id: TypeId, visited: &mut FxHashSet<TypeId>, depth: u32) -> SomeType {
        let Some(data) = self.program.type_data(id) else {
            return SomeType::unknown("unknown");
        };
        if depth >= MAX_TYPE_SERIALIZATION_DEPTH {
            return SomeType::unknown("...");
        }
        if !visited.insert(id) {
            return SomeType::reference(cycle_name(data), ReferenceTarget::Circular);
        }
        let result = self.convert_data(data, visited, depth + 1);
        visited.remove(&id);
        result
    }

    fn convert_all(
        &self,
        ids: &[TypeId],
        visited: &mut FxHashSet<TypeId>,
        depth: u32,
    ) -> Vec<SomeType> {
        ids.iter().map(|&t| self.convert(t, visited, depth)).collect()
    }

    fn boxed(&self, id: TypeId, visited: &mut FxHashSet<TypeId>, depth: u32) -> Box<SomeType> {
        Box::new(self.convert(id, visited, depth))
    }

    fn convert_data(&self, data: &TypeData, visited: &mut FxHashSet<TypeId>, depth: u32) -> SomeType {
        match data {
            TypeData::Intrinsic { name } => SomeType::intrinsic(name.as_str()),
            TypeData::Literal { value } => SomeType::Literal {
                value: value.clone(),
            },
            TypeData::Reference {
                name,
                symbol,
                type_arguments,
            } => SomeType::Reference {
                name: name.clone(),
                target: self.symbol_target(*symbol),
                type_arguments: self.convert_all(type_arguments, visited, depth),
                package: symbol
                    .filter(|&s| self.program.is_external_symbol(s))
                    .and_then(|s| self.program.package_of(s))
                    .map(str::to_string),
                refers_to_type_parameter: false,
            },
            TypeData::TypeParameter { name } => SomeType::Reference {
                name: name.clone(),
                target: self
                    .type_parameters
                    .get(name)
                    .map_or(ReferenceTarget::Unresolved, |&id| {
                        ReferenceTarget::Reflection(id)
                    }),
                type_arguments: Vec::new(),
                package: None,
                refers_to_type_parameter: true,
            },
            TypeData::Union { types } => SomeType::Union {
                types: self.convert_all(types, visited, depth),
            },
            TypeData::Intersection { types } => SomeType::Intersection {
                types: self.convert_all(types, visited, depth),
            },
            TypeData::Array { element } => SomeType::Array {
                element_type: self.boxed(*element, visited, depth),
            },
            TypeData::Tuple { elements } => SomeType::Tuple {
                elements: elements
                    .iter()
                    .map(|e| self.tuple_element(e, visited, depth))
                    .collect(),
            },
            TypeData::Object { shape } => SomeType::Reflection {
                declaration: Box::new(self.object_literal(shape, visited, depth)),
            },
            TypeData::Function { signature } => SomeType::Reflection {
                declaration: Box::new(TypeLiteral {
                    signatures: vec![self.signature(
                        ReflectionKind::CallSignature,
                        signature,
                        visited,
                        depth,
                    )],
                    ..TypeLiteral::default()
                }),
            },
            TypeData::Constructor { signature, .. } => SomeType::Reflection {
                declaration: Box::new(TypeLiteral {
                    signatures: vec![self.signature(
                        ReflectionKind::ConstructorSignature,
                        signature,
                        visited,
                        depth,
                    )],
                    ..TypeLiteral::default()
                }),
            },
            TypeData::Conditional {
                check_type,
                extends_type,
                true_type,
                false_type,
            } => SomeType::Conditional {
                check_type: self.boxed(*check_type, visited, depth),
                extends_type: self.boxed(*extends_type, visited, depth),
                true_type: self.boxed(*true_type, visited, depth),
                false_type: self.boxed(*false_type, visited, depth),
            },
            TypeData::Mapped {
                type_parameter,
                constraint,
                name_type,
                template,
                readonly_modifier,
                optional_modifier,
            } => SomeType::Mapped {
                parameter: type_parameter.clone(),
                parameter_type: self.boxed(*constraint, visited, depth),
                template_type: self.boxed(*template, visited, depth),
                name_type: name_type.map(|t| self.boxed(t, visited, depth)),
                readonly_modifier: readonly_modifier.map(modifier_text),
                optional_modifier: optional_modifier.map(modifier_text),
            },
            TypeData::IndexedAccess {
                object_type,
                index_type,
            } => SomeType::IndexedAccess {
                object_type: self.boxed(*object_type, visited, depth),
                index_type: self.boxed(*index_type, visited, depth),
            },
            TypeData::TypeOperator { operator, target } => SomeType::TypeOperator {
                operator: operator.as_str().to_string(),
                target: self.boxed(*target, visited, depth),
            },
            TypeData::Query { name, symbol } => SomeType::Query {
                query_type: Box::new(SomeType::reference(name.clone(), self.symbol_target(*symbol))),
            },
            TypeData::Predicate {
                parameter,
                asserts,
                target,
            } => SomeType::Predicate {
                name: parameter.clone(),
                asserts: *asserts,
                target_type: target.map(|t| self.boxed(t, visited, depth)),
            },
            TypeData::TemplateLiteral { head, spans } => SomeType::TemplateLiteral {
                head: head.clone(),
                tail: spans
                    .iter()
                    .map(|span| (self.convert(span.type_id, visited, depth), span.text.clone()))
                    .collect(),
            },
            TypeData::Infer { name, constraint } => SomeType::Inferred {
                name: name.clone(),
                constraint: constraint.map(|t| self.boxed(t, visited, depth)),
            },
            TypeData::Unknown { text } => SomeType::unknown(text.clone()),
        }
    }

    fn symbol_target(&self, symbol: Option<SymbolId>) -> ReferenceTarget {
        symbol
            .and_then(|s| self.program.symbol_key(s))
            .map_or(ReferenceTarget::Unresolved, ReferenceTarget::Symbol)
    }

    fn tuple_element(
        &self,
        element: &TupleElement,
        visited: &mut FxHashSet<TypeId>,
        depth: u32,
    ) -> SomeType {
        let inner = self.convert(element.type_id, visited, depth);
        let inner = if element.rest {
            SomeType::Rest {
                element_type: Box::new(inner),
            }
        } else if element.optional && element.name.is_none() {
            SomeType::Optional {
                element_type: Box::new(inner),
            }
        } else {
            inner
        };
        match &element.name {
            Some(name) => SomeType::NamedTupleMember {
                name: name.clone(),
                is_optional: element.optional,
                element: Box::new(inner),
            },
            None => inner,
        }
    }

    fn object_literal(
        &self,
        shape: &ObjectShape,
        visited: &mut FxHashSet<TypeId>,
        depth: u32,
    ) -> TypeLiteral {
        let children = shape
            .properties
            .iter()
            .map(|prop| {
                let method_signature = if prop.is_method {
                    match self.program.type_data(prop.type_id) {
                        Some(TypeData::Function { signature }) => Some(signature),
                        _ => None,
                    }
                } else {
                    None
                };
                match method_signature {
                    Some(signature) => TypeLiteralMember {
                        name: prop.name.clone(),
                        kind: ReflectionKind::Method,
                        is_optional: prop.optional,
                        is_readonly: prop.readonly,
                        member_type: None,
                        signatures: vec![self.signature(
                            ReflectionKind::CallSignature,
                            signature,
                            visited,
                            depth,
                        )],
                    },
                    None => TypeLiteralMember {
                        name: prop.name.clone(),
                        kind: ReflectionKind::Property,
                        is_optional: prop.optional,
                        is_readonly: prop.readonly,
                        member_type: Some(self.convert(prop.type_id, visited, depth)),
                        signatures: Vec::new(),
                    },
                }
            })
            .collect();

        let mut signatures = Vec::new();
        for s in &shape.call_signatures {
            signatures.push(self.signature(ReflectionKind::CallSignature, s, visited, depth));
        }
        for s in &shape.construct_signatures {
            signatures.push(self.signature(
                ReflectionKind::ConstructorSignature,
                s,
                visited,
                depth,
            ));
        }

        let index_signatures = shape
            .index_signatures
            .iter()
            .map(|s| self.index_signature(s, visited, depth))
            .collect();

        TypeLiteral {
            children,
            signatures,
            index_signatures,
        }
    }

    fn signature(
        &self,
        kind: ReflectionKind,
        shape: &SignatureShape,
        visited: &mut FxHashSet<TypeId>,
        depth: u32,
    ) -> TypeLiteralSignature {
        TypeLiteralSignature {
            kind,
            type_parameters: shape
                .type_parameters
                .iter()
                .map(|tp| TypeLiteralTypeParameter {
                    name: tp.name.clone(),
                    constraint: tp.constraint.map(|t| self.convert(t, visited, depth)),
                    default: tp.default.map(|t| self.convert(t, visited, depth)),
                })
                .collect(),
            parameters: shape
                .parameters
                .iter()
                .map(|p| TypeLiteralParameter {
                    name: p.name.clone(),
                    is_optional: p.optional,
                    is_rest: p.rest,
                    param_type: Some(self.convert(p.type_id, visited, depth)),
                })
                .collect(),
            return_type: Some(self.convert(shape.return_type, visited, depth)),
        }
    }

    fn index_signature(
        &self,
        shape: &IndexSignatureShape,
        visited: &mut FxHashSet<TypeId>,
        depth: u32,
    ) -> TypeLiteralSignature {
        TypeLiteralSignature {
            kind: ReflectionKind::IndexSignature,
            type_parameters: Vec::new(),
            parameters: vec![TypeLiteralParameter {
                name: shape.key_name.clone(),
                is_optional: false,
                is_rest: false,
                param_type: Some(self.convert(shape.key_type, visited, depth)),
            }],
            return_type: Some(self.convert(shape.value_type, visited, depth)),
        }
    }
}

fn modifier_text(modifier: MappedModifier) -> String {
    match modifier {
        MappedModifier::Add => "+".to_string(),
        MappedModifier::Remove => "-".to_string(),
    }
}

/// Display name of the cycle marker for a revisited type.
fn cycle_name(data: &TypeData) -> String {
    match data {
        TypeData::Reference { name, .. } | TypeData::TypeParameter { name } => name.clone(),
        TypeData::Object { .. } | TypeData::Function { .. } | TypeData::Constructor { .. } => {
            "__type".to_string()
        }
        _ => "...".to_string(),
    }
}

#[cfg(test)]
#[path = "tests/type_serializer_tests.rs"]
mod tests;
