use super::args::CliArgs;
use super::config::*;
use clap::Parser;

#[test]
fn parse_options_reads_camel_case_keys() {
    let options = parse_options(
        r#"{
            "name": "geometry",
            "entryPoints": ["src/index.ts"],
            "excludeProtected": true,
            "ignoredDiagnosticCodes": [2322],
            "unknownKey": 1
        }"#,
    )
    .unwrap();
    assert_eq!(options.name.as_deref(), Some("geometry"));
    assert_eq!(options.entry_points, vec!["src/index.ts".to_string()]);
    assert!(options.exclude_protected);
    assert!(!options.exclude_private);
    assert_eq!(options.ignored_diagnostic_codes, vec![2322]);
}

#[test]
fn parse_options_rejects_malformed_json() {
    let err = parse_options("{ \"name\": ").unwrap_err();
    assert!(err.to_string().contains("failed to parse converter options JSON"));
}

#[test]
fn load_options_names_the_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.json");
    let err = load_options(&path).unwrap_err();
    assert!(format!("{err:#}").contains("missing.json"));
}

#[test]
fn load_options_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tsz-doc.json");
    std::fs::write(&path, r#"{ "excludeExternals": true }"#).unwrap();
    let options = load_options(&path).unwrap();
    assert!(options.exclude_externals);
}

#[test]
fn flags_override_the_file() {
    let file = parse_options(
        r#"{ "name": "file", "entryPoints": ["src/a.ts"], "ignoredDiagnosticCodes": [1] }"#,
    )
    .unwrap();
    let args = CliArgs::try_parse_from([
        "tsz-doc",
        "-p",
        "p.json",
        "--name",
        "cli",
        "--entry",
        "./src/b.ts",
        "--excludePrivate",
        "--ignoreDiagnostics",
        "1,2",
    ])
    .unwrap();

    let options = apply_args(file, &args);
    assert_eq!(options.name.as_deref(), Some("cli"));
    assert_eq!(options.entry_points, vec!["src/b.ts".to_string()]);
    assert!(options.exclude_private);
    assert_eq!(options.ignored_diagnostic_codes, vec![1, 2]);
}

#[test]
fn file_values_survive_without_flags() {
    let file = parse_options(r#"{ "entryPoints": ["src\\a.ts"], "excludeInternal": true }"#).unwrap();
    let args = CliArgs::try_parse_from(["tsz-doc", "-p", "p.json"]).unwrap();
    let options = apply_args(file, &args);
    assert_eq!(options.entry_points, vec!["src/a.ts".to_string()]);
    assert!(options.exclude_internal);
}

#[test]
fn normalize_entry_paths() {
    assert_eq!(normalize_entry("./src/index.ts"), "src/index.ts");
    assert_eq!(normalize_entry("src\\util\\a.ts"), "src/util/a.ts");
    assert_eq!(normalize_entry("lib/a.d.ts"), "lib/a.d.ts");
}
