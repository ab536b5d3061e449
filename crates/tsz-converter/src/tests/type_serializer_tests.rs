use super::*;
use tsz_program::{
    DeclarationKind, IntrinsicKind, Node, ParamShape, ProgramBuilder, PropertyShape, SymbolKey,
};

fn serialize(program: &Program, id: TypeId) -> SomeType {
    let bindings = FxHashMap::default();
    TypeSerializer::for_program(program, &bindings).serialize_type(id)
}

#[test]
fn test_intrinsic_and_union() {
    let mut builder = ProgramBuilder::new("p");
    let string = builder.intrinsic(IntrinsicKind::String);
    let undefined = builder.intrinsic(IntrinsicKind::Undefined);
    let union = builder.union(vec![string, undefined]);
    let program = builder.finish();

    assert_eq!(serialize(&program, string), SomeType::intrinsic("string"));
    assert_eq!(
        serialize(&program, union),
        SomeType::Union {
            types: vec![SomeType::intrinsic("string"), SomeType::intrinsic("undefined")],
        }
    );
}

#[test]
fn test_self_referential_object_yields_circular_marker() {
    let mut builder = ProgramBuilder::new("p");
    let number = builder.intrinsic(IntrinsicKind::Number);
    let node = builder.reserve_type();
    builder.set_type(
        node,
        TypeData::Object {
            shape: ObjectShape {
                properties: vec![
                    PropertyShape {
                        name: "value".to_string(),
                        type_id: number,
                        optional: false,
                        readonly: false,
                        is_method: false,
                    },
                    PropertyShape {
                        name: "next".to_string(),
                        type_id: node,
                        optional: true,
                        readonly: false,
                        is_method: false,
                    },
                ],
                ..ObjectShape::default()
            },
        },
    );
    let program = builder.finish();

    let SomeType::Reflection { declaration } = serialize(&program, node) else {
        panic!("expected an inline object type");
    };
    assert_eq!(declaration.children.len(), 2);
    assert_eq!(
        declaration.children[0].member_type,
        Some(SomeType::intrinsic("number"))
    );
    let next = &declaration.children[1];
    assert!(next.is_optional);
    assert_eq!(
        next.member_type,
        Some(SomeType::reference("__type", ReferenceTarget::Circular))
    );
}

#[test]
fn test_repeated_type_is_not_a_cycle() {
    let mut builder = ProgramBuilder::new("p");
    let string = builder.intrinsic(IntrinsicKind::String);
    let array = builder.array(string);
    let union = builder.union(vec![array, array]);
    let program = builder.finish();

    let expected = SomeType::Array {
        element_type: Box::new(SomeType::intrinsic("string")),
    };
    assert_eq!(
        serialize(&program, union),
        SomeType::Union {
            types: vec![expected.clone(), expected],
        }
    );
}

#[test]
fn test_type_parameter_binding() {
    let mut builder = ProgramBuilder::new("p");
    let t = builder.type_parameter("T");
    let u = builder.type_parameter("U");
    let program = builder.finish();

    let mut bindings = FxHashMap::default();
    bindings.insert("T".to_string(), ReflectionId(7));
    let serializer = TypeSerializer::for_program(&program, &bindings);

    match serializer.serialize_type(t) {
        SomeType::Reference {
            name,
            target,
            refers_to_type_parameter,
            ..
        } => {
            assert_eq!(name, "T");
            assert_eq!(target, ReferenceTarget::Reflection(ReflectionId(7)));
            assert!(refers_to_type_parameter);
        }
        other => panic!("unexpected {other:?}"),
    }
    match serializer.serialize_type(u) {
        SomeType::Reference { target, .. } => assert_eq!(target, ReferenceTarget::Unresolved),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_reference_targets_symbol_key() {
    let mut builder = ProgramBuilder::new("p");
    let file = builder.add_file("src/shapes.ts");
    let module = builder.module_symbol(file);
    let shape = builder.symbol("Shape", module);
    builder.declare(
        file,
        Some(shape),
        Node::new(DeclarationKind::Interface, "Shape", file, 1),
    );
    let number = builder.intrinsic(IntrinsicKind::Number);
    let reference = builder.reference(shape, vec![number]);
    let missing = builder.unresolved_reference("Missing");
    let program = builder.finish();

    match serialize(&program, reference) {
        SomeType::Reference {
            name,
            target,
            type_arguments,
            package,
            ..
        } => {
            assert_eq!(name, "Shape");
            assert_eq!(
                target,
                ReferenceTarget::Symbol(SymbolKey::new("src/shapes.ts", "Shape"))
            );
            assert_eq!(type_arguments, vec![SomeType::intrinsic("number")]);
            assert_eq!(package, None);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(
        serialize(&program, missing),
        SomeType::reference("Missing", ReferenceTarget::Unresolved)
    );
}

#[test]
fn test_external_reference_carries_package() {
    let mut builder = ProgramBuilder::new("p");
    let file = builder.add_file("node_modules/events/index.d.ts");
    builder.file_mut(file).is_external = true;
    builder.file_mut(file).package_name = Some("events".to_string());
    let module = builder.module_symbol(file);
    let emitter = builder.symbol("EventEmitter", module);
    builder.declare(
        file,
        Some(emitter),
        Node::new(DeclarationKind::Class, "EventEmitter", file, 3),
    );
    let reference = builder.reference(emitter, Vec::new());
    let program = builder.finish();

    match serialize(&program, reference) {
        SomeType::Reference { package, target, .. } => {
            assert_eq!(package.as_deref(), Some("events"));
            assert!(matches!(target, ReferenceTarget::Symbol(_)));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_tuple_elements() {
    let mut builder = ProgramBuilder::new("p");
    let string = builder.intrinsic(IntrinsicKind::String);
    let number = builder.intrinsic(IntrinsicKind::Number);
    let tuple = builder.alloc_type(TypeData::Tuple {
        elements: vec![
            TupleElement {
                type_id: string,
                name: None,
                optional: false,
                rest: false,
            },
            TupleElement {
                type_id: number,
                name: Some("count".to_string()),
                optional: true,
                rest: false,
            },
            TupleElement {
                type_id: string,
                name: None,
                optional: false,
                rest: true,
            },
        ],
    });
    let program = builder.finish();

    let SomeType::Tuple { elements } = serialize(&program, tuple) else {
        panic!("expected a tuple");
    };
    assert_eq!(elements[0], SomeType::intrinsic("string"));
    assert_eq!(
        elements[1],
        SomeType::NamedTupleMember {
            name: "count".to_string(),
            is_optional: true,
            element: Box::new(SomeType::intrinsic("number")),
        }
    );
    assert_eq!(
        elements[2],
        SomeType::Rest {
            element_type: Box::new(SomeType::intrinsic("string")),
        }
    );
}

#[test]
fn test_function_type_becomes_signature_literal() {
    let mut builder = ProgramBuilder::new("p");
    let string = builder.intrinsic(IntrinsicKind::String);
    let void = builder.intrinsic(IntrinsicKind::Void);
    let function = builder.alloc_type(TypeData::Function {
        signature: SignatureShape {
            type_parameters: Vec::new(),
            parameters: vec![ParamShape {
                name: "message".to_string(),
                type_id: string,
                optional: false,
                rest: false,
            }],
            return_type: void,
        },
    });
    let program = builder.finish();

    let SomeType::Reflection { declaration } = serialize(&program, function) else {
        panic!("expected an inline signature");
    };
    assert!(declaration.children.is_empty());
    let signature = &declaration.signatures[0];
    assert_eq!(signature.kind, ReflectionKind::CallSignature);
    assert_eq!(signature.parameters[0].name, "message");
    assert_eq!(signature.return_type, Some(SomeType::intrinsic("void")));
}

#[test]
fn test_depth_limit_yields_unknown() {
    let mut builder = ProgramBuilder::new("p");
    let mut current = builder.intrinsic(IntrinsicKind::String);
    for _ in 0..(MAX_TYPE_SERIALIZATION_DEPTH + 20) {
        current = builder.array(current);
    }
    let program = builder.finish();

    let mut truncated = false;
    serialize(&program, current).visit(&mut |t| {
        if matches!(t, SomeType::Unknown { name } if name == "...") {
            truncated = true;
        }
    });
    assert!(truncated);
}

#[test]
fn test_dangling_type_id() {
    let program = ProgramBuilder::new("p").finish();
    assert_eq!(serialize(&program, TypeId(42)), SomeType::unknown("unknown"));
}
