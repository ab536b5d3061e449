use super::*;
use crate::comment::{Comment, CommentDisplayPart};
use crate::kind::{ReflectionFlags, ReflectionKind};
use crate::project::Project;
use crate::reflection::{ReflectionId, SourceReference};
use crate::types::{ReferenceTarget, SomeType};
use serde_json::json;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use tsz_program::SymbolKey;

fn interface_project() -> (Project, ReflectionId, ReflectionId) {
    let mut project = Project::new("demo");
    let foo = project
        .create_declaration(ReflectionKind::Interface, "Foo", project.root())
        .unwrap();
    let x = project
        .create_declaration(ReflectionKind::Property, "x", foo)
        .unwrap();
    {
        let r = project.get_mut(foo).unwrap();
        r.comment = Some(Comment::new(vec![CommentDisplayPart::text("A foo.")]));
        r.add_source(SourceReference::new("src/index.ts", 1, 17));
    }
    {
        let r = project.get_mut(x).unwrap();
        r.flags |= ReflectionFlags::OPTIONAL;
        r.declaration_mut().unwrap().declared_type = Some(SomeType::intrinsic("string"));
    }
    project.register_symbol(SymbolKey::new("src/index.ts", "Foo"), foo);
    (project, foo, x)
}

#[test]
fn test_project_json_shape() {
    let (project, _, _) = interface_project();
    let output = Serializer::new().project_to_object(&project, &SerializeEvent::default());
    let value = serde_json::to_value(&output).unwrap();
    assert_eq!(
        value,
        json!({
            "schemaVersion": SCHEMA_VERSION,
            "id": 0,
            "name": "demo",
            "variant": "project",
            "kind": 1,
            "flags": {},
            "children": [{
                "id": 1,
                "name": "Foo",
                "variant": "declaration",
                "kind": 256,
                "flags": {},
                "comment": { "summary": [{ "kind": "text", "text": "A foo." }] },
                "children": [{
                    "id": 2,
                    "name": "x",
                    "variant": "declaration",
                    "kind": 1024,
                    "flags": { "isOptional": true },
                    "type": { "type": "intrinsic", "name": "string" }
                }],
                "sources": [{ "fileName": "src/index.ts", "line": 1, "character": 17 }]
            }],
            "symbolIdMap": {
                "1": { "sourceFileName": "src/index.ts", "qualifiedName": "Foo" }
            }
        })
    );
}

#[test]
fn test_symbol_targets_resolve_at_serialization() {
    let (mut project, foo, x) = interface_project();
    project
        .get_mut(x)
        .unwrap()
        .declaration_mut()
        .unwrap()
        .declared_type = Some(SomeType::reference(
        "Foo",
        ReferenceTarget::Symbol(SymbolKey::new("src/index.ts", "Foo")),
    ));

    let output = Serializer::new().project_to_object(&project, &SerializeEvent::default());
    let x_json = &output.root.children[0].children[0];
    assert_eq!(
        x_json.ty,
        Some(SomeType::reflection_reference("Foo", foo))
    );
    // The model itself is untouched.
    assert!(matches!(
        project.get(x).unwrap().declaration().unwrap().declared_type,
        Some(SomeType::Reference {
            target: ReferenceTarget::Symbol(_),
            ..
        })
    ));
}

#[test]
fn test_back_links_serialize_as_references() {
    let mut project = Project::new("demo");
    let base = project
        .create_declaration(ReflectionKind::Class, "Base", project.root())
        .unwrap();
    let derived = project
        .create_declaration(ReflectionKind::Class, "Derived", project.root())
        .unwrap();
    project
        .get_mut(base)
        .unwrap()
        .declaration_mut()
        .unwrap()
        .extended_by
        .push(derived);

    let output = Serializer::new().project_to_object(&project, &SerializeEvent::default());
    let base_json = &output.root.children[0];
    assert_eq!(
        serde_json::to_value(&base_json.extended_by).unwrap(),
        json!([{ "type": "reference", "name": "Derived", "target": 2 }])
    );
}

#[derive(Default)]
struct Recorder {
    events: Rc<RefCell<Vec<String>>>,
}

impl SerializerHook for Recorder {
    fn begin(&mut self, event: &SerializeEvent) {
        self.events
            .borrow_mut()
            .push(format!("begin {:?}", event.output_path));
    }

    fn end(&mut self, _event: &SerializeEvent, output: &mut JsonProject) {
        self.events.borrow_mut().push("end".to_string());
        output.package_name = Some("stamped".to_string());
    }
}

#[test]
fn test_hooks_fire_once_per_pass() {
    let (project, _, _) = interface_project();
    let events = Rc::new(RefCell::new(Vec::new()));
    let mut serializer = Serializer::new();
    serializer.add_hook(Box::new(Recorder {
        events: Rc::clone(&events),
    }));
    assert_eq!(serializer.hook_count(), 1);

    let event = SerializeEvent::new(Some(PathBuf::from("docs.json")));
    let output = serializer.project_to_object(&project, &event);
    assert_eq!(output.package_name.as_deref(), Some("stamped"));
    assert_eq!(
        *events.borrow(),
        vec!["begin Some(\"docs.json\")".to_string(), "end".to_string()]
    );

    serializer.project_to_object(&project, &event);
    assert_eq!(events.borrow().len(), 4);
}

#[test]
fn test_revive_restores_model() {
    let (project, foo, x) = interface_project();
    let output = Serializer::new().project_to_object(&project, &SerializeEvent::default());
    let revived = Deserializer::new().revive_project(&output).unwrap();

    assert_eq!(revived.len(), project.len());
    for id in project.ids() {
        let a = project.get(id).unwrap();
        let b = revived.get(id).unwrap();
        assert_eq!(a.name, b.name);
        assert_eq!(a.kind, b.kind);
        assert_eq!(a.flags, b.flags);
        assert_eq!(a.comment, b.comment);
        assert_eq!(a.sources, b.sources);
        assert_eq!(a.parent, b.parent);
    }
    assert_eq!(revived.children_of(foo), &[x]);
    assert_eq!(revived.find_by_qualified_name(revived.root(), "Foo.x"), Some(x));
    assert_eq!(
        revived.reflection_for_symbol(&SymbolKey::new("src/index.ts", "Foo")),
        Some(foo)
    );
}

#[test]
fn test_revive_rejects_bad_input() {
    let (project, _, _) = interface_project();
    let output = Serializer::new().project_to_object(&project, &SerializeEvent::default());

    let mut duplicate = output.clone();
    duplicate.root.children[0].children[0].id = 1;
    assert_eq!(
        Deserializer::new().revive_project(&duplicate).unwrap_err(),
        ReviveError::DuplicateId(1)
    );

    let mut gap = output.clone();
    gap.root.children[0].children[0].id = 5;
    assert_eq!(
        Deserializer::new().revive_project(&gap).unwrap_err(),
        ReviveError::MissingId(2)
    );

    let mut bad_kind = output.clone();
    bad_kind.root.children[0].kind = 3;
    assert!(matches!(
        Deserializer::new().revive_project(&bad_kind),
        Err(ReviveError::UnknownKind { id: 1, kind: 3 })
    ));

    let mut bad_root = output;
    bad_root.root.kind = ReflectionKind::Module.bits();
    assert_eq!(
        Deserializer::new().revive_project(&bad_root).unwrap_err(),
        ReviveError::InvalidRoot
    );
}
