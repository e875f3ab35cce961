//! Rule-set parsing.
//!
//! One file holds the rules of one dimension:
//!
//! ```json
//! {
//!   "dimension": "retention",
//!   "version": "1.0",
//!   "rules": [{
//!     "rule_id": "retention-schedule-required",
//!     "description": {"en": "Every data category needs a retention schedule."},
//!     "trigger": {
//!       "subject": "classification",
//!       "list": "data-categories",
//!       "field": "metadata.group",
//!       "condition": {"in": ["general", "special", "criminal"]}
//!     },
//!     "effects": [{
//!       "severity": "info",
//!       "description": {"en": "Define deletion periods."},
//!       "requirement": {
//!         "target_list": "measure-types",
//!         "target_field": "code",
//!         "operator": "require",
//!         "value": "retention-schedule"
//!       }
//!     }]
//!   }]
//! }
//! ```
//!
//! Parsing checks structure only. References into the registry are checked
//! when the rule sets are handed to [`crate::CascadeService::new`].

use std::collections::BTreeMap;

use pce_model::{
    CascadeEffect, CascadeRule, Condition, FieldRef, Requirement, RuleSet, Severity, Subject,
    Trigger,
};
use pce_standards::LoadError;
use pce_standards::loader::localized_text;
use pce_standards::schema::{RecordSchema, array_field, check_object, invalid};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{CascadeLoadError, Result};

const RULE_SET_SCHEMA: RecordSchema = RecordSchema::new(&["dimension", "version", "rules"], &[]);
const RULE_SCHEMA: RecordSchema =
    RecordSchema::new(&["rule_id", "description", "trigger", "effects"], &[]);
const TRIGGER_SCHEMA: RecordSchema = RecordSchema::new(
    &["subject", "list", "field", "condition"],
    &["protection_below"],
);
const CONDITION_SCHEMA: RecordSchema = RecordSchema::new(&[], &["equals", "not_equals", "in"]);
const EFFECT_SCHEMA: RecordSchema =
    RecordSchema::new(&["severity", "description", "requirement"], &[]);
const REQUIREMENT_SCHEMA: RecordSchema = RecordSchema::new(
    &["target_list", "target_field", "operator", "value"],
    &[],
);

#[derive(Debug, Deserialize)]
struct RawRuleSet {
    dimension: String,
    version: String,
    rules: Vec<RawRule>,
}

#[derive(Debug, Deserialize)]
struct RawRule {
    rule_id: String,
    description: BTreeMap<String, String>,
    trigger: RawTrigger,
    effects: Vec<RawEffect>,
}

#[derive(Debug, Deserialize)]
struct RawTrigger {
    subject: Subject,
    list: String,
    field: String,
    condition: Condition,
    #[serde(default)]
    protection_below: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawEffect {
    severity: Severity,
    description: BTreeMap<String, String>,
    requirement: Requirement,
}

/// Parse one rule-set file.
pub fn parse_rule_set(content: &str, source_name: &str) -> Result<RuleSet> {
    let json_err = |source| LoadError::Json {
        source_name: source_name.to_string(),
        source,
    };
    let value: Value = serde_json::from_str(content).map_err(json_err)?;
    check_structure(&value, source_name)?;
    let raw: RawRuleSet = serde_json::from_value(value).map_err(json_err)?;

    let dimension = raw.dimension.trim().to_string();
    if dimension.is_empty() {
        return Err(invalid(source_name, "$.dimension", "dimension is empty").into());
    }

    let rules = raw
        .rules
        .into_iter()
        .enumerate()
        .map(|(index, rule)| build_rule(rule, source_name, &format!("$.rules[{index}]")))
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(
        file = %source_name,
        dimension = %dimension,
        rules = rules.len(),
        "Loaded cascade rule set"
    );

    Ok(RuleSet {
        dimension,
        version: raw.version.trim().to_string(),
        rules,
    })
}

fn check_structure(value: &Value, source_name: &str) -> Result<()> {
    let root = check_object(value, &RULE_SET_SCHEMA, source_name, "$")?;
    for (r, rule) in array_field(root, "rules", source_name, "$")?.iter().enumerate() {
        let rule_path = format!("$.rules[{r}]");
        let rule_obj = check_object(rule, &RULE_SCHEMA, source_name, &rule_path)?;

        let trigger_path = format!("{rule_path}.trigger");
        if let Some(trigger) = rule_obj.get("trigger") {
            let trigger_obj = check_object(trigger, &TRIGGER_SCHEMA, source_name, &trigger_path)?;
            if let Some(condition) = trigger_obj.get("condition") {
                let condition_path = format!("{trigger_path}.condition");
                let cond =
                    check_object(condition, &CONDITION_SCHEMA, source_name, &condition_path)?;
                if cond.len() != 1 {
                    return Err(invalid(
                        source_name,
                        &condition_path,
                        "condition needs exactly one of 'equals', 'not_equals', 'in'",
                    )
                    .into());
                }
            }
        }

        for (e, effect) in array_field(rule_obj, "effects", source_name, &rule_path)?
            .iter()
            .enumerate()
        {
            let effect_path = format!("{rule_path}.effects[{e}]");
            let effect_obj = check_object(effect, &EFFECT_SCHEMA, source_name, &effect_path)?;
            if let Some(requirement) = effect_obj.get("requirement") {
                check_object(
                    requirement,
                    &REQUIREMENT_SCHEMA,
                    source_name,
                    &format!("{effect_path}.requirement"),
                )?;
            }
        }
    }
    Ok(())
}

fn build_rule(raw: RawRule, source_name: &str, path: &str) -> Result<CascadeRule> {
    let rule_id = raw.rule_id.trim().to_string();
    if rule_id.is_empty() {
        return Err(invalid(source_name, &format!("{path}.rule_id"), "rule id is empty").into());
    }
    let description = localized_text(
        raw.description,
        source_name,
        &format!("{path}.description"),
        true,
    )?;

    let field = raw
        .trigger
        .field
        .parse::<FieldRef>()
        .map_err(|_| CascadeLoadError::InvalidFieldRef {
            source_name: source_name.to_string(),
            path: format!("{path}.trigger.field"),
            field: raw.trigger.field.clone(),
        })?;

    let trigger = Trigger {
        subject: raw.trigger.subject,
        list: raw.trigger.list.trim().to_string(),
        field,
        condition: raw.trigger.condition,
        protection_below: raw
            .trigger
            .protection_below
            .map(|level| level.trim().to_string()),
    };

    let effects = raw
        .effects
        .into_iter()
        .enumerate()
        .map(|(index, effect)| -> Result<CascadeEffect> {
            let description = localized_text(
                effect.description,
                source_name,
                &format!("{path}.effects[{index}].description"),
                true,
            )?;
            Ok(CascadeEffect {
                severity: effect.severity,
                description,
                requirement: effect.requirement,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if effects.is_empty() {
        return Err(invalid(source_name, &format!("{path}.effects"), "rule has no effects").into());
    }

    Ok(CascadeRule {
        rule_id,
        description,
        trigger,
        effects,
    })
}

/// Parse a batch of `(file name, contents)` rule sets in order.
pub fn parse_rule_sets<'a, I>(sources: I) -> Result<Vec<RuleSet>>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    sources
        .into_iter()
        .map(|(name, content)| parse_rule_set(content, name))
        .collect()
}
