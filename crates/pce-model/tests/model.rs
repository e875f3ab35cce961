//! Serialization shape and display tests for the data model.

use pce_model::{
    CascadeEffect, CascadeRule, CodeEntry, Codelist, Condition, FieldRef, Language,
    LocalizedText, Operator, Requirement, RuleSet, Severity, Subject, Trigger,
};

#[test]
fn rule_json_shape() {
    let json = r#"{
        "rule_id": "special-category-requires-enhanced",
        "description": {"en": "Special category data", "de": "Besondere Kategorien"},
        "trigger": {
            "subject": "classification",
            "list": "data-categories",
            "field": "metadata.group",
            "condition": {"equals": "special"}
        },
        "effects": [{
            "severity": "critical",
            "description": {"en": "Raise protection level"},
            "requirement": {
                "target_list": "protection-levels",
                "target_field": "code",
                "operator": "set_minimum",
                "value": "enhanced"
            }
        }]
    }"#;

    let rule: CascadeRule = serde_json::from_str(json).expect("parse rule");
    assert_eq!(rule.trigger.subject, Subject::Classification);
    assert_eq!(rule.trigger.field, FieldRef::Metadata("group".into()));
    assert_eq!(rule.trigger.condition, Condition::Equals("special".into()));
    assert_eq!(rule.trigger.protection_below, None);
    assert_eq!(rule.description.get(Language::De), Some("Besondere Kategorien"));
    assert_eq!(rule.effects[0].severity, Severity::Critical);
    assert_eq!(rule.effects[0].requirement.operator, Operator::SetMinimum);
}

#[test]
fn rule_set_serializes_back() {
    let set = RuleSet {
        dimension: "retention".into(),
        version: "1.0".into(),
        rules: vec![CascadeRule {
            rule_id: "retention-schedule".into(),
            description: LocalizedText::base("Every category needs a schedule"),
            trigger: Trigger {
                subject: Subject::Classification,
                list: "data-categories".into(),
                field: FieldRef::Code,
                condition: Condition::In(vec!["contact-data".into(), "usage-data".into()]),
                protection_below: Some("enhanced".into()),
            },
            effects: vec![CascadeEffect {
                severity: Severity::Info,
                description: LocalizedText::base("Define a retention schedule"),
                requirement: Requirement {
                    target_list: "measure-types".into(),
                    target_field: "retention_schedule".into(),
                    operator: Operator::Require,
                    value: "true".into(),
                },
            }],
        }],
    };

    let json = serde_json::to_value(&set).expect("serialize");
    assert_eq!(json["rules"][0]["trigger"]["field"], "code");
    assert_eq!(json["rules"][0]["trigger"]["condition"]["in"][1], "usage-data");
    assert_eq!(json["rules"][0]["trigger"]["protection_below"], "enhanced");

    let back: RuleSet = serde_json::from_value(json).expect("deserialize");
    assert_eq!(back, set);
    assert!(back.rule("retention-schedule").is_some());
}

#[test]
fn invalid_field_reference_is_rejected() {
    let json = r#"{"subject":"recipient","list":"recipients","field":"label","condition":{"equals":"x"}}"#;
    assert!(serde_json::from_str::<Trigger>(json).is_err());
}

#[test]
fn codelist_title_keys_are_language_tags() {
    let mut list = Codelist::new("protection-levels", "1.0", "Protection levels");
    list.title.insert(Language::De, "Schutzbedarfsstufen");
    list.entries.push(CodeEntry::new("baseline", "Baseline"));
    let json = serde_json::to_value(&list).expect("serialize");
    assert_eq!(json["title"]["de"], "Schutzbedarfsstufen");
    assert_eq!(json["entries"][0]["labels"]["en"], "Baseline");
}

#[test]
fn requirement_display() {
    let req = Requirement {
        target_list: "legal-instruments".into(),
        target_field: "code".into(),
        operator: Operator::Require,
        value: "scc".into(),
    };
    assert_eq!(req.to_string(), "legal-instruments.code require scc");
}
