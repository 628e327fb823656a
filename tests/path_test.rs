use serde_json::json;
use std::path::PathBuf;
use tplgen::path::{OutputPath, OutputPathResolver, PathWarning};
use tplgen::variables::VariableSet;

fn vars(value: serde_json::Value) -> VariableSet {
    match value {
        serde_json::Value::Object(map) => map.into_iter().collect(),
        _ => panic!("expected an object"),
    }
}

fn resolve(template: &str, variables: &VariableSet) -> OutputPath {
    let resolver = OutputPathResolver::new();
    resolver.resolve(template, "/out", variables)
}

#[test]
fn test_plain_file_keeps_its_name() {
    let resolved = resolve("README.md", &VariableSet::new());

    assert_eq!(resolved.path, PathBuf::from("/out/README.md"));
    assert!(resolved.warnings.is_empty());
}

#[test]
fn test_template_suffix_is_stripped() {
    let resolved = resolve("cmd/main.go.tpl", &VariableSet::new());
    assert_eq!(resolved.path, PathBuf::from("/out/cmd/main.go"));
}

#[test]
fn test_placeholders_are_substituted() {
    let variables = vars(json!({"module": "billing", "entity": "invoice"}));
    let resolved = resolve("__module__/__entity__/__entity___test.go.tpl", &variables);

    assert_eq!(
        resolved.path,
        PathBuf::from("/out/billing/invoice/invoice_test.go")
    );
    assert!(resolved.warnings.is_empty());
}

#[test]
fn test_missing_placeholder_is_kept_with_warning() {
    let resolved = resolve("__service__/main.go", &VariableSet::new());

    assert_eq!(resolved.path, PathBuf::from("/out/__service__/main.go"));
    assert_eq!(resolved.warnings.len(), 1);
    assert!(matches!(
        &resolved.warnings[0],
        PathWarning::Missing { name, .. } if name == "service"
    ));
}

#[test]
fn test_non_string_placeholder_is_kept_with_warning() {
    let variables = vars(json!({"version": 2, "app": {"name": "x"}}));
    let resolved = resolve("__version__/__app__.txt", &variables);

    assert_eq!(resolved.path, PathBuf::from("/out/__version__/__app__.txt"));
    assert_eq!(resolved.warnings.len(), 2);
    assert!(resolved
        .warnings
        .iter()
        .all(|w| matches!(w, PathWarning::NotAString { .. })));
}

#[test]
fn test_repeated_placeholder_warns_once() {
    let resolved = resolve("__x__/__x__.txt", &VariableSet::new());
    assert_eq!(resolved.warnings.len(), 1);
}

#[test]
fn test_resolved_path_is_normalized() {
    let variables = vars(json!({"dir": "nested/./deeper/.."}));
    let resolver = OutputPathResolver::new();
    let resolved = resolver.resolve("__dir__//file.txt", "/out/./gen", &variables);

    assert_eq!(resolved.path, PathBuf::from("/out/gen/nested/file.txt"));
}

#[test]
fn test_warning_display() {
    let warning = PathWarning::Missing {
        name: "svc".to_string(),
        path: "/out/__svc__".to_string(),
    };
    assert_eq!(
        warning.to_string(),
        "variable 'svc' used in path '/out/__svc__' is not defined, keeping the placeholder"
    );
}
