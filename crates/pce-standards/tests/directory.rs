//! Tests for loading codelists and overlays from a data directory.

use std::fs;
use std::path::Path;

use pce_model::{IssueSeverity, Property};
use pce_standards::{
    CodelistRegistry, LoadError, RegistryConfig, create_codelist_prop, validate_codelist_props,
};

const LEVELS: &str = r#"{
  "name": "levels",
  "version": "0.1",
  "title": {"en": "Levels"},
  "entries": [
    {"code": "low", "labels": {"en": "Low"}},
    {"code": "high", "labels": {"en": "High", "de": "Hoch"}}
  ]
}"#;

fn write(dir: &Path, relative: &str, content: &str) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create dir");
    }
    fs::write(path, content).expect("write file");
}

#[test]
fn loads_directory_layout() {
    let dir = tempfile::tempdir().expect("temp dir");
    write(dir.path(), "codelists/levels.json", LEVELS);
    write(
        dir.path(),
        "i18n/fr.csv",
        "codelist,code,label,definition\nlevels,low,Bas,\nlevels,ghost,Fantôme,\n",
    );
    // Non-JSON files are skipped.
    write(dir.path(), "codelists/README.md", "# notes");

    let registry =
        CodelistRegistry::load(&RegistryConfig::directory(dir.path())).expect("load dir");
    assert_eq!(registry.names().collect::<Vec<_>>(), vec!["levels"]);
    assert_eq!(registry.get_label("levels", "low", "fr"), Some("Bas"));
    assert_eq!(registry.get_label("levels", "high", "de"), Some("Hoch"));
    // Orphan overlay row is kept but never resolves.
    assert_eq!(registry.overlay().len(), 2);
    assert!(!registry.validate_code("levels", "ghost"));
}

#[test]
fn missing_overlay_directory_is_fine() {
    let dir = tempfile::tempdir().expect("temp dir");
    write(dir.path(), "codelists/levels.json", LEVELS);
    let registry = CodelistRegistry::load_dir(dir.path()).expect("load dir");
    assert!(registry.overlay().is_empty());
}

#[test]
fn missing_codelists_directory_fails() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = CodelistRegistry::load_dir(dir.path()).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
}

#[test]
fn duplicate_list_across_files_fails() {
    let dir = tempfile::tempdir().expect("temp dir");
    write(dir.path(), "codelists/a.json", LEVELS);
    write(dir.path(), "codelists/b.json", LEVELS);
    let err = CodelistRegistry::load_dir(dir.path()).unwrap_err();
    assert!(matches!(err, LoadError::DuplicateCodelist { ref name } if name == "levels"));
}

#[test]
fn malformed_definition_names_the_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    write(
        dir.path(),
        "codelists/broken.json",
        r#"{"name":"x","version":"1","title":{"en":"X"},"entries":[],"extra":1}"#,
    );
    let err = CodelistRegistry::load_dir(dir.path()).unwrap_err();
    assert!(err.to_string().contains("broken.json"));
}

#[test]
fn property_checks_against_registry() {
    let registry = CodelistRegistry::load_defaults().expect("defaults");

    let valid = create_codelist_prop("data-categories", "health-data", None);
    let invalid = create_codelist_prop("data-categories", "no-such-code", None);
    let unknown_list = create_codelist_prop("no-such-list", "x", None);
    let mut classless = create_codelist_prop("data-categories", "health-data", None);
    classless.class = None;
    let plain = Property::new("label", "anything");

    let located = vec![
        ("/props/0", &valid),
        ("/props/1", &invalid),
        ("/props/2", &unknown_list),
        ("/props/3", &classless),
        ("/props/4", &plain),
    ];
    let issues = validate_codelist_props(located, &registry);

    assert_eq!(issues.len(), 3);
    assert_eq!(issues[0].path, "/props/1");
    assert_eq!(issues[0].severity, IssueSeverity::Error);
    assert!(issues[0].message.contains("no-such-code"));
    assert_eq!(issues[1].path, "/props/2");
    assert_eq!(issues[1].severity, IssueSeverity::Warning);
    assert_eq!(issues[2].path, "/props/3");
    assert_eq!(issues[2].severity, IssueSeverity::Error);
}
