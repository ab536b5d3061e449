//! End-to-end conversions of in-memory programs.

use tsz_common::diagnostic_codes;
use tsz_converter::{ConvertError, Converter, ConverterOptions};
use tsz_program::{
    DeclarationKind, FileId, IntrinsicKind, Node, Program, ProgramBuilder, modifier_flags,
};
use tsz_reflection::{
    Deserializer, JsonProject, Project, ReflectionFlags, ReflectionId, ReflectionKind,
    SerializeEvent, Serializer, SomeType,
};

fn convert(programs: &[Program], options: ConverterOptions) -> tsz_converter::Conversion {
    Converter::new(options)
        .convert(programs)
        .expect("conversion succeeds")
}

fn names(project: &Project, scope: ReflectionId) -> Vec<String> {
    project
        .children_of(scope)
        .iter()
        .map(|&id| project.get(id).unwrap().name.clone())
        .collect()
}

/// A library file with a class, an interface, an enum, a function, a
/// namespace and a type alias.
fn library(b: &mut ProgramBuilder, file_name: &str) -> FileId {
    let file = b.add_file(file_name);
    let module = b.module_symbol(file);
    let string = b.intrinsic(IntrinsicKind::String);
    let number = b.intrinsic(IntrinsicKind::Number);

    let color = b.symbol("Color", module);
    let color_decl = b.declare(
        file,
        Some(color),
        Node::new(DeclarationKind::Enum, "Color", file, 1).with_modifiers(modifier_flags::EXPORT),
    );
    for (line, name, value) in [(2, "Red", "red"), (3, "Green", "green")] {
        let literal = b.string_literal(value);
        let member = b.symbol(name, Some(color));
        b.declare_member(
            color_decl,
            Some(member),
            Node::new(DeclarationKind::EnumMember, name, file, line)
                .with_type(literal)
                .with_initializer(format!("\"{value}\"")),
        );
    }

    let point = b.symbol("Point", module);
    let point_decl = b.declare(
        file,
        Some(point),
        Node::new(DeclarationKind::Interface, "Point", file, 5)
            .with_comment("/** A location. */")
            .with_modifiers(modifier_flags::EXPORT),
    );
    for (line, axis) in [(6, "x"), (7, "y")] {
        let sym = b.symbol(axis, Some(point));
        b.declare_member(
            point_decl,
            Some(sym),
            Node::new(DeclarationKind::Property, axis, file, line).with_type(number),
        );
    }

    let canvas = b.symbol("Canvas", module);
    let canvas_decl = b.declare(
        file,
        Some(canvas),
        Node::new(DeclarationKind::Class, "Canvas", file, 10).with_modifiers(modifier_flags::EXPORT),
    );
    let ctor = b.symbol("__constructor", Some(canvas));
    let ctor_decl = b.declare_member(
        canvas_decl,
        Some(ctor),
        Node::new(DeclarationKind::Constructor, "constructor", file, 11).with_body(),
    );
    b.declare_parameter(
        ctor_decl,
        Node::new(DeclarationKind::Parameter, "title", file, 11).with_type(string),
    );
    let secret = b.symbol("secret", Some(canvas));
    b.declare_member(
        canvas_decl,
        Some(secret),
        Node::new(DeclarationKind::Property, "secret", file, 12)
            .with_modifiers(modifier_flags::PRIVATE)
            .with_type(string),
    );
    let point_ref = b.reference(point, Vec::new());
    let void = b.intrinsic(IntrinsicKind::Void);
    let draw = b.symbol("draw", Some(canvas));
    let draw_decl = b.declare_member(
        canvas_decl,
        Some(draw),
        Node::new(DeclarationKind::Method, "draw", file, 13)
            .with_body()
            .with_return_type(void),
    );
    b.declare_parameter(
        draw_decl,
        Node::new(DeclarationKind::Parameter, "at", file, 13).with_type(point_ref),
    );

    let distance = b.symbol("distance", module);
    let distance_decl = b.declare(
        file,
        Some(distance),
        Node::new(DeclarationKind::Function, "distance", file, 20)
            .with_body()
            .with_modifiers(modifier_flags::EXPORT)
            .with_return_type(number),
    );
    for name in ["a", "b"] {
        b.declare_parameter(
            distance_decl,
            Node::new(DeclarationKind::Parameter, name, file, 20).with_type(point_ref),
        );
    }

    let geometry = b.symbol("Geometry", module);
    let geometry_decl = b.declare(
        file,
        Some(geometry),
        Node::new(DeclarationKind::Namespace, "Geometry", file, 25)
            .with_modifiers(modifier_flags::EXPORT),
    );
    let origin = b.symbol("ORIGIN", Some(geometry));
    b.declare_member(
        geometry_decl,
        Some(origin),
        Node::new(DeclarationKind::Variable, "ORIGIN", file, 26)
            .with_modifiers(modifier_flags::EXPORT | modifier_flags::CONST)
            .with_type(point_ref),
    );

    let label = b.symbol("Label", module);
    let union = b.union(vec![string, number]);
    b.declare(
        file,
        Some(label),
        Node::new(DeclarationKind::TypeAlias, "Label", file, 30).with_type(union),
    );

    for sym in [color, point, canvas, distance, geometry, label] {
        b.export(file, sym);
    }
    file
}

#[test]
fn converts_a_library_into_a_consistent_tree() {
    let mut b = ProgramBuilder::new("tsconfig.json");
    library(&mut b, "src/index.ts");
    let conversion = convert(&[b.finish()], ConverterOptions::default());
    let project = &conversion.project;
    let root = project.root();

    assert!(conversion.warnings.is_empty());
    assert_eq!(
        names(project, root),
        vec!["Color", "Point", "Canvas", "distance", "Geometry", "Label"]
    );

    // Ids are arena indices, handed out in order, and every owned reflection
    // points back at its owner.
    let mut owned = 0usize;
    for (index, reflection) in project.reflections().enumerate() {
        assert_eq!(reflection.id.0 as usize, index);
        for (child, _) in reflection.owned() {
            assert_eq!(project.get(child).unwrap().parent, Some(reflection.id));
            owned += 1;
        }
    }
    assert_eq!(owned, project.len() - 1);

    let color = project.find_child(root, "Color").unwrap();
    assert_eq!(project.get(color).unwrap().kind, ReflectionKind::Enum);
    let red = project.get(project.find_child(color, "Red").unwrap()).unwrap();
    assert_eq!(red.kind, ReflectionKind::EnumMember);
    assert_eq!(red.declaration().unwrap().default_value.as_deref(), Some("\"red\""));

    let canvas = project.find_child(root, "Canvas").unwrap();
    assert_eq!(names(project, canvas), vec!["constructor", "secret", "draw"]);
    let secret = project.get(project.find_child(canvas, "secret").unwrap()).unwrap();
    assert!(secret.has_flag(ReflectionFlags::PRIVATE));

    let geometry = project.find_child(root, "Geometry").unwrap();
    let origin = project.get(project.find_child(geometry, "ORIGIN").unwrap()).unwrap();
    assert!(origin.has_flag(ReflectionFlags::CONST));
    let point = project.find_child(root, "Point").unwrap();
    let resolved = project.resolve_type(origin.declaration().unwrap().declared_type.as_ref().unwrap());
    assert_eq!(resolved, SomeType::reflection_reference("Point", point));

    let label = project.get(project.find_child(root, "Label").unwrap()).unwrap();
    assert_eq!(label.kind, ReflectionKind::TypeAlias);
    assert!(matches!(
        label.declaration().unwrap().declared_type,
        Some(SomeType::Union { .. })
    ));
}

#[test]
fn exclude_private_drops_private_members() {
    let mut b = ProgramBuilder::new("tsconfig.json");
    library(&mut b, "src/index.ts");
    let options = ConverterOptions {
        exclude_private: true,
        ..ConverterOptions::default()
    };
    let conversion = convert(&[b.finish()], options);
    let project = &conversion.project;
    let canvas = project.find_child(project.root(), "Canvas").unwrap();
    assert_eq!(names(project, canvas), vec!["constructor", "draw"]);
}

#[test]
fn multiple_entries_get_module_reflections() {
    let mut b = ProgramBuilder::new("tsconfig.json");
    library(&mut b, "src/shapes/index.ts");
    let util = b.add_file("src/util.ts");
    b.file_mut(util).comment = Some("/**\n * Helpers.\n * @module\n */".to_string());
    let clamp = b.symbol("clamp", b.module_symbol(util));
    b.declare(
        util,
        Some(clamp),
        Node::new(DeclarationKind::Function, "clamp", util, 3).with_body(),
    );
    b.export(util, clamp);
    let conversion = convert(&[b.finish()], ConverterOptions::default());
    let project = &conversion.project;
    let root = project.root();

    assert_eq!(names(project, root), vec!["shapes/index", "util"]);
    let util_module = project.get(project.find_child(root, "util").unwrap()).unwrap();
    assert_eq!(util_module.kind, ReflectionKind::Module);
    let comment = util_module.comment.as_ref().unwrap();
    assert_eq!(comment.summary_text(), "Helpers.");
    assert!(comment.get_tag("@module").is_none());
    assert!(project.find_by_qualified_name(root, "util.clamp").is_some());
    assert!(project.find_by_qualified_name(root, "shapes/index.Canvas").is_some());
}

#[test]
fn re_export_from_another_module_is_a_reference() {
    let mut b = ProgramBuilder::new("tsconfig.json");
    let a = b.add_file("src/a.ts");
    let widget = b.symbol("Widget", b.module_symbol(a));
    b.declare(a, Some(widget), Node::new(DeclarationKind::Class, "Widget", a, 1));
    b.export(a, widget);
    let index = b.add_file("src/index.ts");
    b.export(index, widget);
    let conversion = convert(&[b.finish()], ConverterOptions::default());
    let project = &conversion.project;
    let root = project.root();

    let original = project.find_by_qualified_name(root, "a.Widget").unwrap();
    let reexport = project.find_by_qualified_name(root, "index.Widget").unwrap();
    let reflection = project.get(reexport).unwrap();
    assert_eq!(reflection.kind, ReflectionKind::Reference);
    assert_eq!(reflection.declaration().unwrap().target, Some(original));
}

/// ```ts
/// // types/a.d.ts
/// interface Foo { bar(): string }
/// // types/b.d.ts
/// interface Foo { baz(): number }
/// ```
#[test]
fn interface_declared_in_two_global_files_merges() {
    let mut b = ProgramBuilder::new("tsconfig.json");
    let first = b.add_script_file("types/a.d.ts");
    let second = b.add_script_file("types/b.d.ts");
    let string = b.intrinsic(IntrinsicKind::String);
    let number = b.intrinsic(IntrinsicKind::Number);
    let foo = b.symbol("Foo", None);
    for (file, member, returns) in [(first, "bar", string), (second, "baz", number)] {
        let decl = b.declare(file, Some(foo), Node::new(DeclarationKind::Interface, "Foo", file, 1));
        let sym = b.symbol(member, Some(foo));
        b.declare_member(
            decl,
            Some(sym),
            Node::new(DeclarationKind::Method, member, file, 2).with_return_type(returns),
        );
        b.export(file, foo);
    }
    let conversion = convert(&[b.finish()], ConverterOptions::default());
    let project = &conversion.project;
    let root = project.root();

    assert_eq!(project.children_named(root, "Foo").len(), 1);
    let foo = project.find_child(root, "Foo").unwrap();
    let reflection = project.get(foo).unwrap();
    assert_eq!(reflection.kind, ReflectionKind::Interface);
    assert_eq!(reflection.sources.len(), 2);
    assert_eq!(reflection.sources[0].file_name, "types/a.d.ts");
    assert_eq!(reflection.sources[1].file_name, "types/b.d.ts");
    assert_eq!(names(project, foo), vec!["bar", "baz"]);

    for (member, returns) in [("bar", "string"), ("baz", "number")] {
        let method = project.get(project.find_child(foo, member).unwrap()).unwrap();
        assert_eq!(method.kind, ReflectionKind::Method);
        let signatures = &method.declaration().unwrap().signatures;
        assert_eq!(signatures.len(), 1);
        let signature = project.get(signatures[0]).unwrap();
        assert_eq!(signature.kind, ReflectionKind::CallSignature);
        assert_eq!(signature.name, member);
        assert_eq!(
            signature.signature().unwrap().return_type,
            Some(SomeType::intrinsic(returns))
        );
    }
}

#[test]
fn blocking_diagnostics_abort_without_a_project() {
    let mut b = ProgramBuilder::new("tsconfig.json");
    library(&mut b, "src/index.ts");
    b.diagnostic(tsz_common::Diagnostic::error(
        "src/index.ts".to_string(),
        10,
        3,
        "Cannot find name 'Pointt'.".to_string(),
        2304,
    ));
    let programs = vec![b.finish()];

    match Converter::new(ConverterOptions::default()).convert(&programs) {
        Err(ConvertError::Diagnostics(diagnostics)) => {
            assert_eq!(diagnostics.len(), 1);
            assert_eq!(diagnostics[0].code, 2304);
        }
        other => panic!("expected blocking diagnostics, got {other:?}"),
    }

    let options = ConverterOptions {
        ignored_diagnostic_codes: vec![2304],
        ..ConverterOptions::default()
    };
    assert!(Converter::new(options).convert(&programs).is_ok());
}

#[test]
fn missing_entry_point_is_a_warning() {
    let mut b = ProgramBuilder::new("tsconfig.json");
    library(&mut b, "src/index.ts");
    let options = ConverterOptions {
        entry_points: vec!["src/index.ts".to_string(), "src/nope.ts".to_string()],
        ..ConverterOptions::default()
    };
    let conversion = convert(&[b.finish()], options);
    assert_eq!(conversion.warnings.len(), 1);
    assert_eq!(conversion.warnings[0].code, diagnostic_codes::ENTRY_POINT_NOT_FOUND);
    assert!(conversion.project.find_child(conversion.project.root(), "Canvas").is_some());
}

#[test]
fn no_entry_points_is_an_error() {
    let mut b = ProgramBuilder::new("tsconfig.json");
    library(&mut b, "src/index.ts");
    let options = ConverterOptions {
        entry_points: vec!["src/elsewhere.ts".to_string()],
        ..ConverterOptions::default()
    };
    let err = Converter::new(options)
        .convert(&[b.finish()])
        .expect_err("nothing to convert");
    match &err {
        ConvertError::NoEntryPoints(warnings) => {
            assert_eq!(warnings.len(), 1);
            assert_eq!(warnings[0].code, diagnostic_codes::ENTRY_POINT_NOT_FOUND);
            assert_eq!(warnings[0].file, "src/elsewhere.ts");
        }
        other => panic!("expected missing entry points, got {other:?}"),
    }
    let codes: Vec<u32> = err.diagnostics().iter().map(|d| d.code).collect();
    assert_eq!(
        codes,
        vec![diagnostic_codes::ENTRY_POINT_NOT_FOUND, diagnostic_codes::NO_ENTRY_POINTS]
    );
}

#[test]
fn solution_programs_expand_into_project_references() {
    let mut a = ProgramBuilder::new("packages/a/tsconfig.json");
    library(&mut a, "packages/a/src/index.ts");
    let mut b = ProgramBuilder::new("packages/b/tsconfig.json");
    let file = b.add_file("packages/b/src/index.ts");
    let helper = b.symbol("helper", b.module_symbol(file));
    b.declare(
        file,
        Some(helper),
        Node::new(DeclarationKind::Variable, "helper", file, 1),
    );
    b.export(file, helper);
    let mut solution = ProgramBuilder::new("tsconfig.json");
    solution.project_reference(a.finish());
    solution.project_reference(b.finish());

    let conversion = convert(
        &[solution.finish()],
        ConverterOptions {
            name: Some("monorepo".to_string()),
            ..ConverterOptions::default()
        },
    );
    let project = &conversion.project;
    let root = project.root();

    assert_eq!(project.name(), "monorepo");
    assert_eq!(names(project, root), vec!["a/src/index", "b/src/index"]);
    assert!(project.find_by_qualified_name(root, "a/src/index.Canvas").is_some());
    assert!(project.find_by_qualified_name(root, "b/src/index.helper").is_some());
}

#[test]
fn converted_project_survives_a_json_round_trip() {
    let mut b = ProgramBuilder::new("tsconfig.json");
    library(&mut b, "src/index.ts");
    let conversion = convert(
        &[b.finish()],
        ConverterOptions {
            package_name: Some("geometry".to_string()),
            ..ConverterOptions::default()
        },
    );
    let event = SerializeEvent::default();
    let first = Serializer::new()
        .to_json_string(&conversion.project, &event, false)
        .unwrap();
    let parsed: JsonProject = serde_json::from_str(&first).unwrap();
    let revived = Deserializer::new().revive_project(&parsed).unwrap();
    let second = Serializer::new().to_json_string(&revived, &event, false).unwrap();

    assert_eq!(first, second);
    assert_eq!(revived.name(), "geometry");
    assert_eq!(revived.len(), conversion.project.len());
}
