//! Cascade-impact evaluation.
//!
//! A classification change ripples out in two passes:
//!
//! 1. `classification` rules are matched against the classification's entry
//!    and `recipient` rules against every recipient's entry.
//! 2. The effective protection level is raised to the highest `set_minimum`
//!    on `protection-levels` produced by pass 1, and `protection_level` rules
//!    are matched against that level's entry.
//!
//! Evaluation never mutates the registry or the rules.

use std::cmp::Reverse;
use std::collections::HashSet;
use std::path::Path;

use pce_model::{CascadeEffect, CascadeRule, FieldRef, Operator, RuleSet, Severity, Subject};
use pce_standards::paths::{self, cascade_rules_dir};
use pce_standards::schema::invalid;
use pce_standards::{CodelistRegistry, DataSource, RegistryConfig};

use crate::embedded;
use crate::error::{CascadeLoadError, Result};
use crate::loader::parse_rule_sets;

/// Codelist whose authoring order ranks protection levels.
pub const PROTECTION_LEVELS: &str = "protection-levels";

/// Level used by [`CascadeService::suggest_changes`].
pub const BASELINE_LEVEL: &str = "baseline";

/// Input to a full assessment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImpactRequest {
    pub classification: String,
    pub protection_level: Option<String>,
    pub recipients: Vec<String>,
}

impl ImpactRequest {
    pub fn new(classification: impl Into<String>) -> Self {
        Self {
            classification: classification.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_protection_level(mut self, level: impl Into<String>) -> Self {
        self.protection_level = Some(level.into());
        self
    }

    #[must_use]
    pub fn with_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipients.push(recipient.into());
        self
    }
}

/// One fired effect with its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeImpact {
    pub dimension: String,
    pub rule_id: String,
    /// The classification, recipient, or protection level that fired the rule.
    pub source_code: String,
    pub effect: CascadeEffect,
    /// A `set_minimum` on protection levels that the current level does not meet.
    pub violation: bool,
}

/// Result of [`CascadeService::assess`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImpactAssessment {
    pub classification: String,
    pub current_level: Option<String>,
    /// Current level raised by every `set_minimum` from the first pass.
    pub effective_level: Option<String>,
    /// Sorted by descending severity, ties in authoring order.
    pub impacts: Vec<CascadeImpact>,
}

impl ImpactAssessment {
    /// The effects alone, in impact order.
    pub fn effects(&self) -> Vec<CascadeEffect> {
        self.impacts.iter().map(|i| i.effect.clone()).collect()
    }

    pub fn violations(&self) -> impl Iterator<Item = &CascadeImpact> {
        self.impacts.iter().filter(|i| i.violation)
    }

    pub fn has_violations(&self) -> bool {
        self.impacts.iter().any(|i| i.violation)
    }

    pub fn highest_severity(&self) -> Option<Severity> {
        self.impacts.iter().map(|i| i.effect.severity).max()
    }
}

/// Authoring position of an impact: rule set, rule, firing, effect.
type Position = (usize, usize, usize, usize);

/// Evaluates rule sets against a codelist registry.
#[derive(Debug, Clone)]
pub struct CascadeService<'r> {
    registry: &'r CodelistRegistry,
    rule_sets: Vec<RuleSet>,
    levels: Vec<String>,
}

impl<'r> CascadeService<'r> {
    /// Validate rule sets against the registry and build the service.
    ///
    /// # Errors
    ///
    /// Fails on duplicate dimensions or rule ids, on references to unknown
    /// codelists, codes, or protection levels.
    pub fn new(registry: &'r CodelistRegistry, rule_sets: Vec<RuleSet>) -> Result<Self> {
        let levels = registry
            .codelist(PROTECTION_LEVELS)
            .map(|list| list.codes().map(str::to_string).collect())
            .unwrap_or_default();

        let service = Self {
            registry,
            rule_sets,
            levels,
        };
        service.validate()?;

        tracing::info!(
            rule_sets = service.rule_sets.len(),
            rules = service.rules().count(),
            "Cascade service ready"
        );
        Ok(service)
    }

    /// Load the embedded rule sets.
    pub fn load_defaults(registry: &'r CodelistRegistry) -> Result<Self> {
        let sets = parse_rule_sets(embedded::RULE_FILES.iter().copied())?;
        Self::new(registry, sets)
    }

    /// Load rule sets according to `config`.
    pub fn load(registry: &'r CodelistRegistry, config: &RegistryConfig) -> Result<Self> {
        match &config.source {
            DataSource::Embedded => Self::load_defaults(registry),
            DataSource::Directory(root) => Self::load_dir(registry, root),
        }
    }

    /// Load `cascade_rules/*.json` from a data directory, in file name order.
    pub fn load_dir(registry: &'r CodelistRegistry, root: &Path) -> Result<Self> {
        let files = paths::read_sorted(&cascade_rules_dir(root), "json", true)?;
        let sets = parse_rule_sets(
            files
                .iter()
                .map(|(name, content)| (name.as_str(), content.as_str())),
        )?;
        Self::new(registry, sets)
    }

    fn validate(&self) -> Result<()> {
        let mut dimensions = HashSet::new();
        let mut rule_ids = HashSet::new();

        for set in &self.rule_sets {
            if !dimensions.insert(set.dimension.as_str()) {
                return Err(CascadeLoadError::DuplicateDimension {
                    dimension: set.dimension.clone(),
                });
            }
            for rule in &set.rules {
                if !rule_ids.insert(rule.rule_id.as_str()) {
                    return Err(CascadeLoadError::DuplicateRuleId {
                        rule_id: rule.rule_id.clone(),
                        dimension: set.dimension.clone(),
                    });
                }
                self.validate_rule(rule)?;
            }
        }
        Ok(())
    }

    fn validate_rule(&self, rule: &CascadeRule) -> Result<()> {
        let trigger = &rule.trigger;
        let Some(list) = self.registry.codelist(&trigger.list) else {
            return Err(CascadeLoadError::UnknownCodelist {
                rule_id: rule.rule_id.clone(),
                list: trigger.list.clone(),
            });
        };

        if trigger.subject == Subject::ProtectionLevel && trigger.list != PROTECTION_LEVELS {
            return Err(invalid(
                &rule.rule_id,
                "trigger.list",
                format!("protection_level triggers must use '{PROTECTION_LEVELS}'"),
            )
            .into());
        }

        if trigger.field == FieldRef::Code {
            for code in trigger.condition.operands() {
                if !list.contains(code) {
                    return Err(CascadeLoadError::UnknownCode {
                        rule_id: rule.rule_id.clone(),
                        list: list.name.clone(),
                        code: code.to_string(),
                    });
                }
            }
        }

        if let Some(level) = &trigger.protection_below {
            self.require_level(rule, level)?;
        }

        for effect in &rule.effects {
            let req = &effect.requirement;
            if req.target_list == PROTECTION_LEVELS
                && matches!(req.operator, Operator::SetMinimum | Operator::SetMaximum)
            {
                self.require_level(rule, &req.value)?;
            }
            if req.target_field == "code" {
                let Some(target) = self.registry.codelist(&req.target_list) else {
                    return Err(CascadeLoadError::UnknownCodelist {
                        rule_id: rule.rule_id.clone(),
                        list: req.target_list.clone(),
                    });
                };
                if !target.contains(&req.value) {
                    return Err(CascadeLoadError::UnknownCode {
                        rule_id: rule.rule_id.clone(),
                        list: req.target_list.clone(),
                        code: req.value.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    fn require_level(&self, rule: &CascadeRule, level: &str) -> Result<()> {
        if self.rank(level).is_some() {
            Ok(())
        } else {
            Err(CascadeLoadError::UnknownProtectionLevel {
                rule_id: rule.rule_id.clone(),
                level: level.to_string(),
            })
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn registry(&self) -> &'r CodelistRegistry {
        self.registry
    }

    pub fn rule_sets(&self) -> &[RuleSet] {
        &self.rule_sets
    }

    /// Every rule in evaluation order.
    pub fn rules(&self) -> impl Iterator<Item = &CascadeRule> {
        self.rule_sets.iter().flat_map(|set| set.rules.iter())
    }

    pub fn rule(&self, rule_id: &str) -> Option<&CascadeRule> {
        self.rules().find(|r| r.rule_id == rule_id)
    }

    /// Protection level codes from lowest to highest.
    pub fn protection_levels(&self) -> &[String] {
        &self.levels
    }

    /// Rank of a protection level, `None` when unknown.
    pub fn rank(&self, level: &str) -> Option<usize> {
        self.levels.iter().position(|l| l == level)
    }

    // =========================================================================
    // Evaluation
    // =========================================================================

    /// All effects of a classification at the given protection level, sorted by
    /// descending severity. Ties keep rule-set, rule, and effect order.
    ///
    /// An unknown classification matches no classification rule.
    pub fn evaluate_impact(
        &self,
        classification: &str,
        current_protection_level: &str,
    ) -> Vec<CascadeEffect> {
        self.assess(
            &ImpactRequest::new(classification).with_protection_level(current_protection_level),
        )
        .effects()
    }

    /// Effects that `new` triggers and `old` does not, compared by requirement.
    ///
    /// Both classifications are evaluated at the baseline protection level.
    pub fn suggest_changes(&self, old: &str, new: &str) -> Vec<CascadeEffect> {
        let before = self.evaluate_impact(old, BASELINE_LEVEL);
        let existing: HashSet<_> = before.iter().map(|e| &e.requirement).collect();
        self.evaluate_impact(new, BASELINE_LEVEL)
            .into_iter()
            .filter(|e| !existing.contains(&e.requirement))
            .collect()
    }

    /// Full two-pass evaluation with provenance.
    pub fn assess(&self, request: &ImpactRequest) -> ImpactAssessment {
        let current_rank = request
            .protection_level
            .as_deref()
            .and_then(|level| self.rank(level));

        // Pass 1: classification and recipients.
        let mut fired: Vec<(Position, CascadeImpact)> = Vec::new();
        for (set_idx, set) in self.rule_sets.iter().enumerate() {
            for (rule_idx, rule) in set.rules.iter().enumerate() {
                let sources: &[String] = match rule.trigger.subject {
                    Subject::Classification => std::slice::from_ref(&request.classification),
                    Subject::Recipient => &request.recipients,
                    Subject::ProtectionLevel => continue,
                };
                for (firing, code) in sources.iter().enumerate() {
                    if self.fires(rule, code, current_rank) {
                        self.push_effects(
                            &mut fired,
                            (set_idx, rule_idx, firing),
                            set,
                            rule,
                            code,
                            current_rank,
                        );
                    }
                }
            }
        }

        // Pass 2: protection-level rules at the effective level.
        let effective_rank = fired
            .iter()
            .map(|(_, impact)| &impact.effect.requirement)
            .filter(|req| {
                req.target_list == PROTECTION_LEVELS && req.operator == Operator::SetMinimum
            })
            .filter_map(|req| self.rank(&req.value))
            .fold(current_rank, |acc, rank| acc.max(Some(rank)));
        let effective_level = effective_rank.and_then(|rank| self.levels.get(rank)).cloned();

        if let Some(level) = &effective_level {
            for (set_idx, set) in self.rule_sets.iter().enumerate() {
                for (rule_idx, rule) in set.rules.iter().enumerate() {
                    if rule.trigger.subject == Subject::ProtectionLevel
                        && self.fires(rule, level, current_rank)
                    {
                        self.push_effects(
                            &mut fired,
                            (set_idx, rule_idx, 0),
                            set,
                            rule,
                            level,
                            current_rank,
                        );
                    }
                }
            }
        }

        fired.sort_by_key(|(position, impact)| (Reverse(impact.effect.severity), *position));
        let impacts: Vec<CascadeImpact> = fired.into_iter().map(|(_, impact)| impact).collect();

        tracing::debug!(
            classification = %request.classification,
            recipients = request.recipients.len(),
            effective_level = effective_level.as_deref().unwrap_or("-"),
            impacts = impacts.len(),
            "Assessed cascade impact"
        );

        ImpactAssessment {
            classification: request.classification.clone(),
            current_level: request.protection_level.clone(),
            effective_level,
            impacts,
        }
    }

    fn fires(&self, rule: &CascadeRule, code: &str, current_rank: Option<usize>) -> bool {
        let Some(entry) = self.registry.resolve_code(&rule.trigger.list, code) else {
            return false;
        };
        if !rule.trigger.matches_entry(entry) {
            return false;
        }
        match &rule.trigger.protection_below {
            None => true,
            // An unknown current level ranks below every known level.
            Some(level) => self
                .rank(level)
                .is_some_and(|below| current_rank.is_none_or(|current| current < below)),
        }
    }

    fn push_effects(
        &self,
        fired: &mut Vec<(Position, CascadeImpact)>,
        (set_idx, rule_idx, firing): (usize, usize, usize),
        set: &RuleSet,
        rule: &CascadeRule,
        source_code: &str,
        current_rank: Option<usize>,
    ) {
        for (effect_idx, effect) in rule.effects.iter().enumerate() {
            let req = &effect.requirement;
            let violation = req.target_list == PROTECTION_LEVELS
                && req.operator == Operator::SetMinimum
                && self
                    .rank(&req.value)
                    .is_some_and(|required| current_rank.is_none_or(|current| current < required));
            fired.push((
                (set_idx, rule_idx, firing, effect_idx),
                CascadeImpact {
                    dimension: set.dimension.clone(),
                    rule_id: rule.rule_id.clone(),
                    source_code: source_code.to_string(),
                    effect: effect.clone(),
                    violation,
                },
            ));
        }
    }
}
