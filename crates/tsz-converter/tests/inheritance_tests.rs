//! Inheritance links, member copies and `@inheritDoc` across heritage
//! clauses, driven through a full conversion.

use tsz_converter::{Converter, ConverterOptions, InheritanceReport, InheritanceResolver};
use tsz_program::{DeclarationKind, IntrinsicKind, Node, Program, ProgramBuilder, modifier_flags};
use tsz_reflection::{Project, ReflectionFlags, ReflectionId, SomeType};

fn convert(program: Program) -> Project {
    Converter::new(ConverterOptions::default())
        .convert(&[program])
        .expect("conversion succeeds")
        .project
}

fn summary(project: &Project, id: ReflectionId) -> Option<String> {
    project.get(id)?.comment.as_ref().map(|c| c.summary_text())
}

fn first_signature(project: &Project, id: ReflectionId) -> ReflectionId {
    project.get(id).unwrap().declaration().unwrap().signatures[0]
}

/// ```ts
/// export class Shape {
///     constructor();
///     /** Surface area. */
///     area(): number;
///     describe(): string;
/// }
/// export interface Named { name: string }
/// export class Circle extends Shape implements Named {
///     /** @inheritDoc */
///     area(): number;
/// }
/// ```
fn shapes() -> Program {
    let mut b = ProgramBuilder::new("tsconfig.json");
    let file = b.add_file("src/shapes.ts");
    let module = b.module_symbol(file);
    let number = b.intrinsic(IntrinsicKind::Number);
    let string = b.intrinsic(IntrinsicKind::String);

    let shape = b.symbol("Shape", module);
    let shape_decl = b.declare(
        file,
        Some(shape),
        Node::new(DeclarationKind::Class, "Shape", file, 1).with_modifiers(modifier_flags::EXPORT),
    );
    let ctor = b.symbol("__constructor", Some(shape));
    b.declare_member(
        shape_decl,
        Some(ctor),
        Node::new(DeclarationKind::Constructor, "constructor", file, 2).with_body(),
    );
    let area = b.symbol("area", Some(shape));
    b.declare_member(
        shape_decl,
        Some(area),
        Node::new(DeclarationKind::Method, "area", file, 4)
            .with_comment("/** Surface area. */")
            .with_body()
            .with_return_type(number),
    );
    let describe = b.symbol("describe", Some(shape));
    b.declare_member(
        shape_decl,
        Some(describe),
        Node::new(DeclarationKind::Method, "describe", file, 5)
            .with_body()
            .with_return_type(string),
    );

    let named = b.symbol("Named", module);
    let named_decl = b.declare(
        file,
        Some(named),
        Node::new(DeclarationKind::Interface, "Named", file, 8).with_modifiers(modifier_flags::EXPORT),
    );
    let name = b.symbol("name", Some(named));
    b.declare_member(
        named_decl,
        Some(name),
        Node::new(DeclarationKind::Property, "name", file, 8).with_type(string),
    );

    let shape_ref = b.reference(shape, Vec::new());
    let named_ref = b.reference(named, Vec::new());
    let circle = b.symbol("Circle", module);
    let circle_decl = b.declare(
        file,
        Some(circle),
        Node::new(DeclarationKind::Class, "Circle", file, 10)
            .with_modifiers(modifier_flags::EXPORT)
            .with_extends(vec![shape_ref])
            .with_implements(vec![named_ref]),
    );
    let circle_area = b.symbol("area", Some(circle));
    b.declare_member(
        circle_decl,
        Some(circle_area),
        Node::new(DeclarationKind::Method, "area", file, 12)
            .with_comment("/** @inheritDoc */")
            .with_body()
            .with_return_type(number),
    );

    for sym in [shape, named, circle] {
        b.export(file, sym);
    }
    b.finish()
}

#[test]
fn base_records_its_derived_classes() {
    let project = convert(shapes());
    let root = project.root();
    let shape = project.find_child(root, "Shape").unwrap();
    let named = project.find_child(root, "Named").unwrap();
    let circle = project.find_child(root, "Circle").unwrap();

    let circle_decl = project.get(circle).unwrap().declaration().unwrap();
    assert_eq!(circle_decl.extended_types.len(), 1);
    assert!(matches!(
        &circle_decl.extended_types[0],
        SomeType::Reference { name, .. } if name == "Shape"
    ));
    assert_eq!(circle_decl.implemented_types.len(), 1);

    assert_eq!(project.get(shape).unwrap().declaration().unwrap().extended_by, vec![circle]);
    assert_eq!(
        project.get(named).unwrap().declaration().unwrap().implemented_by,
        vec![circle]
    );
}

#[test]
fn derived_class_receives_inherited_copies() {
    let project = convert(shapes());
    let root = project.root();
    let shape = project.find_child(root, "Shape").unwrap();
    let circle = project.find_child(root, "Circle").unwrap();

    let describe = project.find_child(circle, "describe").unwrap();
    let copy = project.get(describe).unwrap();
    assert!(copy.has_flag(ReflectionFlags::INHERITED));
    assert_eq!(
        copy.links().unwrap().inherited_from,
        project.find_child(shape, "describe")
    );

    let name = project.get(project.find_child(circle, "name").unwrap()).unwrap();
    assert!(name.has_flag(ReflectionFlags::INHERITED));

    let ctor = project.find_child(circle, "constructor").unwrap();
    assert!(project.get(ctor).unwrap().has_flag(ReflectionFlags::INHERITED));

    // The local override is kept and not duplicated.
    assert_eq!(project.children_named(circle, "area").len(), 1);
}

#[test]
fn override_inherits_documentation_through_its_link() {
    let project = convert(shapes());
    let root = project.root();
    let shape = project.find_child(root, "Shape").unwrap();
    let circle = project.find_child(root, "Circle").unwrap();
    let base_area = project.find_child(shape, "area").unwrap();
    let area = project.find_child(circle, "area").unwrap();

    let reflection = project.get(area).unwrap();
    assert!(!reflection.has_flag(ReflectionFlags::INHERITED));
    assert_eq!(reflection.links().unwrap().overwrites, Some(base_area));

    let signature = first_signature(&project, area);
    assert_eq!(summary(&project, signature).as_deref(), Some("Surface area."));
    assert!(
        !project
            .get(signature)
            .unwrap()
            .comment
            .as_ref()
            .unwrap()
            .has_modifier("@inheritDoc")
    );
}

#[test]
fn first_listed_base_supplies_a_shared_member() {
    let mut b = ProgramBuilder::new("tsconfig.json");
    let file = b.add_file("src/ids.ts");
    let module = b.module_symbol(file);
    let number = b.intrinsic(IntrinsicKind::Number);
    let mut bases = Vec::new();
    for (line, base) in [(1, "Identified"), (2, "Numbered")] {
        let sym = b.symbol(base, module);
        let decl = b.declare(
            file,
            Some(sym),
            Node::new(DeclarationKind::Interface, base, file, line)
                .with_modifiers(modifier_flags::EXPORT),
        );
        let id = b.symbol("id", Some(sym));
        b.declare_member(
            decl,
            Some(id),
            Node::new(DeclarationKind::Property, "id", file, line).with_type(number),
        );
        b.export(file, sym);
        bases.push(b.reference(sym, Vec::new()));
    }
    let record = b.symbol("Record", module);
    b.declare(
        file,
        Some(record),
        Node::new(DeclarationKind::Class, "Record", file, 4)
            .with_modifiers(modifier_flags::EXPORT)
            .with_implements(bases),
    );
    b.export(file, record);

    let project = convert(b.finish());
    let root = project.root();
    let identified = project.find_child(root, "Identified").unwrap();
    let record = project.find_child(root, "Record").unwrap();

    let ids = project.children_named(record, "id");
    assert_eq!(ids.len(), 1);
    assert_eq!(
        project.get(ids[0]).unwrap().links().unwrap().inherited_from,
        project.find_child(identified, "id")
    );
}

#[test]
fn resolving_a_converted_project_again_is_a_no_op() {
    let mut project = convert(shapes());
    let before = project.len();
    let circle = project.find_child(project.root(), "Circle").unwrap();
    let children = project.children_of(circle).to_vec();

    let report = InheritanceResolver::new().resolve(&mut project).unwrap();

    assert_eq!(report, InheritanceReport::default());
    assert_eq!(project.len(), before);
    assert_eq!(project.children_of(circle), children.as_slice());
}

/// ```ts
/// export class Base {
///     /** Runs the base. */
///     run(): void;
/// }
/// export class Derived extends Base {
///     /** <derived comment> */
///     run(): void;
/// }
/// ```
fn runner(derived_comment: &str) -> Program {
    let mut b = ProgramBuilder::new("tsconfig.json");
    let file = b.add_file("src/run.ts");
    let module = b.module_symbol(file);
    let void = b.intrinsic(IntrinsicKind::Void);

    let base = b.symbol("Base", module);
    let base_decl = b.declare(
        file,
        Some(base),
        Node::new(DeclarationKind::Class, "Base", file, 1).with_modifiers(modifier_flags::EXPORT),
    );
    let base_run = b.symbol("run", Some(base));
    b.declare_member(
        base_decl,
        Some(base_run),
        Node::new(DeclarationKind::Method, "run", file, 3)
            .with_comment("/** Runs the base. */")
            .with_body()
            .with_return_type(void),
    );

    let base_ref = b.reference(base, Vec::new());
    let derived = b.symbol("Derived", module);
    let derived_decl = b.declare(
        file,
        Some(derived),
        Node::new(DeclarationKind::Class, "Derived", file, 5)
            .with_modifiers(modifier_flags::EXPORT)
            .with_extends(vec![base_ref]),
    );
    let derived_run = b.symbol("run", Some(derived));
    b.declare_member(
        derived_decl,
        Some(derived_run),
        Node::new(DeclarationKind::Method, "run", file, 7)
            .with_comment(derived_comment)
            .with_body()
            .with_return_type(void),
    );

    b.export(file, base);
    b.export(file, derived);
    b.finish()
}

fn derived_run_summary(project: &Project) -> Option<String> {
    let derived = project.find_child(project.root(), "Derived").unwrap();
    let run = project.find_child(derived, "run").unwrap();
    summary(project, first_signature(project, run))
}

#[test]
fn inline_inherit_doc_alone_copies_the_overridden_comment() {
    let conversion = Converter::new(ConverterOptions::default())
        .convert(&[runner("/** {@inheritDoc} */")])
        .expect("conversion succeeds");

    assert_eq!(
        derived_run_summary(&conversion.project).as_deref(),
        Some("Runs the base.")
    );
    assert!(conversion.warnings.is_empty());
}

#[test]
fn inline_inherit_doc_with_a_target_alone_copies_that_comment() {
    let project = convert(runner("/** {@inheritDoc Base.run} */"));
    assert_eq!(derived_run_summary(&project).as_deref(), Some("Runs the base."));
}
