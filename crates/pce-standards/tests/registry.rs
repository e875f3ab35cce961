//! Tests for the default codelist registry.

use std::collections::HashSet;

use pce_model::Language;
use pce_standards::{CodelistRegistry, NotFound};
use proptest::prelude::*;

fn registry() -> CodelistRegistry {
    CodelistRegistry::load_defaults().expect("embedded data loads")
}

#[test]
fn loads_all_default_lists() {
    let registry = registry();
    let names: Vec<&str> = registry.names().collect();
    for expected in [
        "assurance-goals",
        "data-categories",
        "evidence-types",
        "legal-instruments",
        "mapping-schemes",
        "maturity-domains",
        "maturity-levels",
        "measure-types",
        "protection-levels",
        "recipients",
    ] {
        assert!(names.contains(&expected), "missing {expected}");
    }
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted);
}

#[test]
fn codes_are_unique_after_load() {
    let registry = registry();
    for list in registry.codelists() {
        let mut seen = HashSet::new();
        for entry in &list.entries {
            assert!(seen.insert(&entry.code), "{}/{} duplicated", list.name, entry.code);
            assert!(entry.base_label().is_some());
        }
    }
}

#[test]
fn validate_code_matches_membership() {
    let registry = registry();
    assert!(registry.validate_code("assurance-goals", "integrity"));
    assert!(!registry.validate_code("assurance-goals", "nonexistent"));
    assert!(!registry.validate_code("no-such-list", "anything"));
    assert!(!registry.validate_code("data-categories", "Health-Data"));
    // Deprecated codes remain valid.
    assert!(registry.validate_code("data-categories", "sensitive-data"));
}

#[test]
fn list_codes_keeps_authoring_order() {
    let registry = registry();
    let codes: Vec<&str> = registry
        .list_codes("maturity-levels")
        .expect("known list")
        .iter()
        .map(|e| e.code.as_str())
        .collect();
    assert_eq!(codes, vec!["1", "2", "3", "4", "5"]);

    let levels: Vec<&str> = registry
        .list_codes("protection-levels")
        .expect("known list")
        .iter()
        .map(|e| e.code.as_str())
        .collect();
    assert_eq!(levels, vec!["baseline", "standard", "enhanced"]);
}

#[test]
fn unknown_list_is_not_found() {
    let registry = registry();
    assert_eq!(
        registry.list_codes("no-such-list").unwrap_err(),
        NotFound::new("no-such-list")
    );
    assert!(registry.search("no-such-list", "x").is_err());
}

#[test]
fn labels_in_each_language() {
    let registry = registry();
    assert_eq!(
        registry.get_label("assurance-goals", "transparency", "en"),
        Some("Transparency")
    );
    assert_eq!(
        registry.get_label("assurance-goals", "transparency", "de"),
        Some("Transparenz")
    );
    // No French label anywhere, falls back to English.
    assert_eq!(
        registry.get_label("assurance-goals", "transparency", "fr"),
        Some("Transparency")
    );
    assert_eq!(
        registry.get_label("data-categories", "health-data", "de"),
        Some("Gesundheitsdaten")
    );
    assert_eq!(
        registry.get_label("data-categories", "health-data", "fr"),
        Some("Données de santé")
    );
    assert_eq!(
        registry.get_label("data-categories", "health-data", "fr-FR"),
        Some("Données de santé")
    );
}

#[test]
fn unsupported_language_uses_base_label() {
    let registry = registry();
    assert_eq!(
        registry.get_label("data-categories", "health-data", "ja"),
        Some("Health data")
    );
    assert_eq!(
        registry.get_label("data-categories", "health-data", ""),
        Some("Health data")
    );
}

#[test]
fn overlay_overrides_own_label() {
    let registry = registry();
    assert_eq!(
        registry.get_label("recipients", "eu-recipient", "de"),
        Some("Empfänger in der EU oder im EWR")
    );
}

#[test]
fn unknown_code_has_no_label() {
    let registry = registry();
    assert_eq!(registry.get_label("data-categories", "no-such-code", "en"), None);
    assert_eq!(registry.get_label("no-such-list", "health-data", "en"), None);
}

#[test]
fn definitions_follow_the_label_chain() {
    let registry = registry();
    let fr = registry
        .get_definition("data-categories", "health-data", "fr")
        .expect("fr definition");
    assert!(fr.contains("santé"));
    let de = registry
        .get_definition("protection-levels", "enhanced", "de")
        .expect("de definition from overlay");
    assert!(de.contains("existenziell"));
    // contact-data has a French label but no definition anywhere.
    assert_eq!(registry.get_definition("data-categories", "contact-data", "fr"), None);
    assert_eq!(registry.get_definition("assurance-goals", "transparency", "en"), None);
}

#[test]
fn search_matches_codes_and_labels() {
    let registry = registry();
    let codes: Vec<&str> = registry
        .search("assurance-goals", "abil")
        .expect("known list")
        .iter()
        .map(|e| e.code.as_str())
        .collect();
    assert!(codes.contains(&"intervenability"));
    assert!(codes.contains(&"availability"));
    assert!(!codes.contains(&"transparency"));

    // German own label.
    let de: Vec<&str> = registry
        .search("data-categories", "GESUNDHEIT")
        .expect("known list")
        .iter()
        .map(|e| e.code.as_str())
        .collect();
    assert_eq!(de, vec!["health-data"]);

    // French overlay label.
    let fr: Vec<&str> = registry
        .search("data-categories", "données de santé")
        .expect("known list")
        .iter()
        .map(|e| e.code.as_str())
        .collect();
    assert_eq!(fr, vec!["health-data"]);

    assert!(registry
        .search("data-categories", "zzz-nothing")
        .expect("known list")
        .is_empty());
}

#[test]
fn group_entries_outlive_the_group_name() {
    let registry = registry();
    let entries = {
        let group = String::from("special");
        registry
            .list_codes_in_group("data-categories", &group)
            .expect("known list")
    };
    assert!(entries.iter().any(|e| e.code == "health-data"));
    assert!(entries.iter().all(|e| e.group() == Some("special")));
    assert!(registry.list_codes_in_group("nope", "special").is_err());
}

#[test]
fn groups_and_metadata() {
    let registry = registry();
    let special: Vec<&str> = registry
        .list_codes_in_group("data-categories", "special")
        .expect("known list")
        .iter()
        .map(|e| e.code.as_str())
        .collect();
    assert!(special.contains(&"health-data"));
    assert!(!special.contains(&"contact-data"));

    let health = registry
        .resolve_code("data-categories", "health-data")
        .expect("health-data");
    assert_eq!(health.xoev_code(), Some("gesundheit"));
    let criminal = registry
        .resolve_code("data-categories", "criminal-data")
        .expect("criminal-data");
    assert_eq!(criminal.group(), Some("criminal"));

    let list = registry.codelist("data-categories").expect("list");
    assert!(list.active_entries().all(|e| e.code != "sensitive-data"));
}

#[test]
fn coverage_reflects_overlays() {
    let registry = registry();
    let en = registry
        .translation_coverage("protection-levels", Language::En)
        .expect("known list");
    assert!((en - 1.0).abs() < f64::EPSILON);
    let fr = registry
        .translation_coverage("protection-levels", Language::Fr)
        .expect("known list");
    assert!((fr - 1.0).abs() < f64::EPSILON);
    let fr_goals = registry
        .translation_coverage("assurance-goals", Language::Fr)
        .expect("known list");
    assert!(fr_goals < f64::EPSILON);
}

#[test]
fn registry_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<CodelistRegistry>();
}

proptest! {
    #[test]
    fn validate_code_agrees_with_list_codes(list in "[a-z-]{0,20}", code in "[a-z0-9-]{0,16}") {
        let registry = registry();
        let listed = registry
            .list_codes(&list)
            .map(|entries| entries.iter().any(|e| e.code == code));
        match listed {
            Ok(found) => prop_assert_eq!(registry.validate_code(&list, &code), found),
            Err(_) => prop_assert!(!registry.validate_code(&list, &code)),
        }
    }

    #[test]
    fn known_codes_always_resolve_a_label(lang in "[a-zA-Z-]{0,6}") {
        let registry = registry();
        for list in registry.codelists() {
            for entry in &list.entries {
                prop_assert!(registry.get_label(&list.name, &entry.code, &lang).is_some());
            }
        }
    }
}
