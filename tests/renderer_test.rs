use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tplgen::constants::ALLOW_UNDEFINED_KEY;
use tplgen::error::Error;
use tplgen::renderer::{RenderEngine, TemplateRenderer};
use tplgen::variables::VariableSet;

fn write_template(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

fn vars(value: serde_json::Value) -> VariableSet {
    match value {
        serde_json::Value::Object(map) => map.into_iter().collect(),
        _ => panic!("expected an object"),
    }
}

#[test]
fn test_render_simple_template() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let template = write_template(dir, "greeting.txt.tpl", "Hello, {{ greeting }}!");

    let engine = RenderEngine::new(dir);
    let variables = vars(json!({"greeting": "World"}));
    let result = engine.render(&template, &variables).unwrap();

    assert_eq!(result, "Hello, World!");
}

#[test]
fn test_render_keeps_trailing_newline() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let template = write_template(dir, "README.md", "# {{ projectName }}\n");

    let engine = RenderEngine::new(dir);
    let variables = vars(json!({"projectName": "Foo"}));
    let result = engine.render(&template, &variables).unwrap();

    assert_eq!(result, "# Foo\n");
}

#[test]
fn test_render_does_not_escape_html() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let template = write_template(dir, "index.html.tpl", "<p>{{ body }}</p>");

    let engine = RenderEngine::new(dir);
    let variables = vars(json!({"body": "<b>a & b</b>"}));
    let result = engine.render(&template, &variables).unwrap();

    assert_eq!(result, "<p><b>a & b</b></p>");
}

#[test]
fn test_nested_variables() {
    let temp_dir = TempDir::new().unwrap();
    let template = write_template(
        temp_dir.path(),
        "db.tpl",
        "{{ db.host }}:{{ db.port }}{% for s in services %} {{ s }}{% endfor %}",
    );

    let engine = RenderEngine::new(temp_dir.path());
    let variables = vars(json!({
        "db": {"host": "localhost", "port": 5432},
        "services": ["api", "web"]
    }));
    let result = engine.render(&template, &variables).unwrap();

    assert_eq!(result, "localhost:5432 api web");
}

#[test]
fn test_undefined_variable_is_an_error_by_default() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let template = write_template(dir, "strict.tpl", "value: {{ missing }}");

    let engine = RenderEngine::new(dir);
    let result = engine.render(&template, &VariableSet::new());

    match result {
        Err(Error::RenderError { path, .. }) => assert!(path.ends_with("strict.tpl")),
        other => panic!("Expected RenderError, got {other:?}"),
    }
}

#[test]
fn test_undefined_variable_is_an_error_unless_literally_true() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let template = write_template(dir, "strict.tpl", "value: {{ missing }}");

    let engine = RenderEngine::new(dir);
    let variables = vars(json!({ (ALLOW_UNDEFINED_KEY): "true" }));
    let result = engine.render(&template, &variables);

    assert!(matches!(result, Err(Error::RenderError { .. })));
}

#[test]
fn test_undefined_variable_renders_empty_when_allowed() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let template = write_template(dir, "lenient.tpl", "[{{ missing }}][{{ missing.deeper }}]");

    let engine = RenderEngine::new(dir);
    let variables = vars(json!({ (ALLOW_UNDEFINED_KEY): true }));

    assert_eq!(engine.render(&template, &variables).unwrap(), "[][]");
}

#[test]
fn test_policy_is_read_per_render() {
    let temp_dir = TempDir::new().unwrap();
    let template = write_template(temp_dir.path(), "t.tpl", "x{{ missing }}");
    let engine = RenderEngine::new(temp_dir.path());

    let lenient = vars(json!({ (ALLOW_UNDEFINED_KEY): true }));
    assert_eq!(engine.render(&template, &lenient).unwrap(), "x");
    assert!(engine.render(&template, &VariableSet::new()).is_err());
}

#[test]
fn test_syntax_error_is_a_parse_error() {
    let temp_dir = TempDir::new().unwrap();
    let template = write_template(temp_dir.path(), "broken.tpl", "{{ unclosed ");

    let engine = RenderEngine::new(temp_dir.path());
    let result = engine.render(&template, &VariableSet::new());

    match result {
        Err(Error::ParseError { path, .. }) => assert!(path.ends_with("broken.tpl")),
        other => panic!("Expected ParseError, got {other:?}"),
    }
}

#[test]
fn test_missing_template_is_a_read_error() {
    let temp_dir = TempDir::new().unwrap();
    let engine = RenderEngine::new(temp_dir.path());

    let result = engine.render(&temp_dir.path().join("nope.tpl"), &VariableSet::new());
    assert!(matches!(result, Err(Error::ReadError { .. })));
}

#[test]
fn test_current_template_path_is_injected() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let template = write_template(dir, "whoami.tpl", "{{ __current_template_path }}");

    let engine = RenderEngine::new(dir);
    let result = engine.render(&template, &VariableSet::new()).unwrap();

    assert_eq!(result, template.display().to_string());
}

#[test]
fn test_inclusion_state_renders_as_empty() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let template = write_template(dir, "state.tpl", "[{{ __inclusion }}]");

    let engine = RenderEngine::new(dir);
    let result = engine.render(&template, &vars(json!({"a": 1}))).unwrap();

    assert_eq!(result, "[]");
}

#[test]
fn test_reserved_key_from_user_is_overridden() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let template = write_template(dir, "whoami.tpl", "{{ __current_template_path }}");

    let engine = RenderEngine::new(dir);
    let variables = vars(json!({"__current_template_path": "/spoofed.tpl"}));
    let result = engine.render(&template, &variables).unwrap();

    assert_eq!(result, template.display().to_string());
}

#[test]
fn test_render_leaves_variables_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let template = write_template(dir, "t.tpl", "{{ a }}{{ __current_template_path }}");

    let engine = RenderEngine::new(dir);
    let variables = vars(json!({"a": "1", "nested": {"b": [1, 2]}}));
    let before = variables.clone();

    engine.render(&template, &variables).unwrap();

    assert_eq!(variables, before);
    assert!(!variables.contains_key("__current_template_path"));
}
