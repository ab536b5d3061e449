use super::args::CliArgs;
use super::driver::*;
use clap::Parser;
use std::path::Path;
use tsz_common::{Diagnostic, diagnostic_codes};
use tsz_program::{DeclarationKind, Node, ProgramBuilder, modifier_flags};

/// `export class Greeter {}` in `src/index.ts`, optionally with a type
/// checker error attached.
fn write_snapshot(dir: &Path, file_name: &str, error: Option<u32>) {
    let mut b = ProgramBuilder::new("tsconfig.json");
    let file = b.add_file("src/index.ts");
    let greeter = b.symbol("Greeter", b.module_symbol(file));
    b.declare(
        file,
        Some(greeter),
        Node::new(DeclarationKind::Class, "Greeter", file, 1)
            .with_comment("/** Says hello. */")
            .with_modifiers(modifier_flags::EXPORT),
    );
    b.export(file, greeter);
    if let Some(code) = error {
        b.diagnostic(Diagnostic::error(
            "src/index.ts".to_string(),
            0,
            1,
            "type error".to_string(),
            code,
        ));
    }
    let json = b.finish().to_json_string().unwrap();
    std::fs::write(dir.join(file_name), json).unwrap();
}

fn args(argv: &[&str]) -> CliArgs {
    CliArgs::try_parse_from(std::iter::once("tsz-doc").chain(argv.iter().copied())).unwrap()
}

#[test]
fn run_writes_the_model() {
    let dir = tempfile::tempdir().unwrap();
    write_snapshot(dir.path(), "program.json", None);

    let result = run(&args(&["-p", "program.json", "-o", "out/model.json"]), dir.path()).unwrap();

    assert!(!result.is_blocked());
    assert!(result.warnings.is_empty());
    assert_eq!(result.reflections, 2);
    let path = dir.path().join("out/model.json");
    assert_eq!(result.output_path.as_deref(), Some(path.as_path()));
    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(Some(written.as_str()), result.json.as_deref());

    let value: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(value["name"], "tsconfig.json");
    assert_eq!(value["children"][0]["name"], "Greeter");
}

#[test]
fn run_without_out_keeps_json_in_memory() {
    let dir = tempfile::tempdir().unwrap();
    write_snapshot(dir.path(), "program.json", None);

    let result = run(&args(&["-p", "program.json", "--pretty", "--name", "hello"]), dir.path()).unwrap();

    assert!(result.output_path.is_none());
    let json = result.json.unwrap();
    assert!(json.contains('\n'));
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["name"], "hello");
}

#[test]
fn blocking_diagnostics_skip_output() {
    let dir = tempfile::tempdir().unwrap();
    write_snapshot(dir.path(), "program.json", Some(2304));

    let result = run(&args(&["-p", "program.json", "-o", "model.json"]), dir.path()).unwrap();
    assert!(result.is_blocked());
    assert_eq!(result.blocking[0].code, 2304);
    assert!(result.json.is_none());
    assert!(!dir.path().join("model.json").exists());

    let result = run(
        &args(&["-p", "program.json", "--ignoreDiagnostics", "2304"]),
        dir.path(),
    )
    .unwrap();
    assert!(!result.is_blocked());
}

#[test]
fn options_file_and_missing_entry_warning() {
    let dir = tempfile::tempdir().unwrap();
    write_snapshot(dir.path(), "program.json", None);
    std::fs::write(
        dir.path().join("options.json"),
        r#"{ "name": "from-file", "entryPoints": ["src/index.ts", "src/gone.ts"] }"#,
    )
    .unwrap();

    let result = run(&args(&["-p", "program.json", "--options", "options.json"]), dir.path()).unwrap();

    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].code, diagnostic_codes::ENTRY_POINT_NOT_FOUND);
    let value: serde_json::Value = serde_json::from_str(result.json.as_deref().unwrap()).unwrap();
    assert_eq!(value["name"], "from-file");
}

#[test]
fn no_entry_points_blocks() {
    let dir = tempfile::tempdir().unwrap();
    write_snapshot(dir.path(), "program.json", None);

    let result = run(&args(&["-p", "program.json", "-e", "src/elsewhere.ts"]), dir.path()).unwrap();
    assert!(result.is_blocked());
    let codes: Vec<u32> = result.blocking.iter().map(|d| d.code).collect();
    assert_eq!(
        codes,
        vec![diagnostic_codes::ENTRY_POINT_NOT_FOUND, diagnostic_codes::NO_ENTRY_POINTS]
    );
    assert_eq!(result.blocking[0].file, "src/elsewhere.ts");
}

#[test]
fn unreadable_snapshot_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = run(&args(&["-p", "nope.json"]), dir.path()).unwrap_err();
    assert!(err.to_string().contains("failed to read program snapshot"));

    std::fs::write(dir.path().join("bad.json"), "not json").unwrap();
    let err = run(&args(&["-p", "bad.json"]), dir.path()).unwrap_err();
    assert!(err.to_string().contains("failed to parse program snapshot"));
}
