use std::fs;

use anyhow::{Context, Result, bail};
use comfy_table::{Cell, CellAlignment, Color, Table};
use tracing::{info, warn};

use pce_cascade::{CascadeService, ImpactAssessment, ImpactRequest};
use pce_genericode::{export_genericode, export_genericode_to_file, import_genericode};
use pce_model::{CascadeEffect, Codelist, Language};
use pce_standards::{CodelistRegistry, DataSource, NotFound, RegistryConfig};

use crate::cli::{
    CodesArgs, CoverageArgs, ExportArgs, ImpactArgs, ImportArgs, LabelArgs, SearchArgs,
    SuggestArgs, ValidateArgs,
};
use crate::summary::{
    align_column, code_cell, dim_cell, flag_cell, new_impact_table, new_table, optional_cell,
    severity_cell,
};

const CLASSIFICATIONS: &str = "data-categories";

pub fn load_registry(config: &RegistryConfig) -> Result<CodelistRegistry> {
    CodelistRegistry::load(config)
        .with_context(|| format!("load codelists from {}", describe(config)))
}

pub fn load_cascade<'r>(
    registry: &'r CodelistRegistry,
    config: &RegistryConfig,
) -> Result<CascadeService<'r>> {
    CascadeService::load(registry, config)
        .with_context(|| format!("load cascade rules from {}", describe(config)))
}

fn describe(config: &RegistryConfig) -> String {
    match &config.source {
        DataSource::Embedded => "built-in data".to_string(),
        DataSource::Directory(path) => path.display().to_string(),
    }
}

/// Language used for descriptions; unsupported tags fall back to the base.
fn display_language(tag: &str) -> Language {
    Language::from_tag(tag).unwrap_or_else(|| {
        warn!(lang = %tag, "Unsupported language, using {}", Language::BASE);
        Language::BASE
    })
}

fn codelist<'a>(registry: &'a CodelistRegistry, name: &str) -> Result<&'a Codelist> {
    Ok(registry.codelist(name).ok_or_else(|| NotFound::new(name))?)
}

pub fn run_lists(registry: &CodelistRegistry) {
    println!("{}", lists_table(registry));
}

fn lists_table(registry: &CodelistRegistry) -> Table {
    let mut table = new_table(&["Codelist", "Version", "Title", "Codes", "Source"]);
    align_column(&mut table, 3, CellAlignment::Right);
    for list in registry.codelists() {
        table.add_row(vec![
            code_cell(&list.name),
            Cell::new(&list.version),
            optional_cell(list.title.base_text()),
            Cell::new(list.len()),
            optional_cell(list.source.as_deref()),
        ]);
    }
    table
}

pub fn run_codes(registry: &CodelistRegistry, args: &CodesArgs) -> Result<()> {
    let table = codes_table(registry, args)?;
    println!("{table}");
    Ok(())
}

fn codes_table(registry: &CodelistRegistry, args: &CodesArgs) -> Result<Table> {
    let entries = match &args.group {
        Some(group) => registry.list_codes_in_group(&args.list, group)?,
        None => registry.list_codes(&args.list)?.iter().collect(),
    };

    let mut table = new_table(&["Code", "Label", "Group", "Deprecated"]);
    align_column(&mut table, 3, CellAlignment::Center);
    for entry in entries
        .into_iter()
        .filter(|e| !(args.active_only && e.is_deprecated()))
    {
        let label = registry
            .get_label(&args.list, &entry.code, &args.lang)
            .unwrap_or(&entry.code);
        table.add_row(vec![
            code_cell(&entry.code),
            Cell::new(label),
            optional_cell(entry.group()),
            flag_cell(entry.is_deprecated(), Color::Yellow),
        ]);
    }
    Ok(table)
}

/// Returns whether every code was valid.
pub fn run_validate(registry: &CodelistRegistry, args: &ValidateArgs) -> Result<bool> {
    let (table, all_valid) = validate_table(registry, args)?;
    println!("{table}");
    Ok(all_valid)
}

fn validate_table(registry: &CodelistRegistry, args: &ValidateArgs) -> Result<(Table, bool)> {
    codelist(registry, &args.list)?;
    let mut table = new_table(&["Code", "Status", "Label"]);
    align_column(&mut table, 1, CellAlignment::Center);
    let mut all_valid = true;
    for code in &args.codes {
        let valid = registry.validate_code(&args.list, code);
        all_valid &= valid;
        let status = if valid {
            Cell::new("valid").fg(Color::Green)
        } else {
            Cell::new("invalid").fg(Color::Red)
        };
        let label = registry.get_label(&args.list, code, Language::BASE.as_tag());
        table.add_row(vec![code_cell(code), status, optional_cell(label)]);
    }
    Ok((table, all_valid))
}

pub fn run_label(registry: &CodelistRegistry, args: &LabelArgs) -> Result<()> {
    codelist(registry, &args.list)?;
    let Some(label) = registry.get_label(&args.list, &args.code, &args.lang) else {
        bail!("'{}' is not a code in codelist '{}'", args.code, args.list);
    };
    println!("{label}");
    if let Some(definition) = registry.get_definition(&args.list, &args.code, &args.lang) {
        println!("{definition}");
    }
    Ok(())
}

pub fn run_search(registry: &CodelistRegistry, args: &SearchArgs) -> Result<()> {
    let matches = registry.search(&args.list, &args.query)?;
    if matches.is_empty() {
        println!("No codes in '{}' match '{}'", args.list, args.query);
        return Ok(());
    }
    let mut table = new_table(&["Code", "Label"]);
    for entry in matches {
        let label = registry
            .get_label(&args.list, &entry.code, &args.lang)
            .unwrap_or(&entry.code);
        table.add_row(vec![code_cell(&entry.code), Cell::new(label)]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_impact(cascade: &CascadeService<'_>, args: &ImpactArgs) {
    let mut request = ImpactRequest::new(&args.classification);
    if let Some(level) = &args.protection_level {
        request = request.with_protection_level(level);
    }
    for recipient in &args.recipients {
        request = request.with_recipient(recipient);
    }

    if !cascade
        .registry()
        .validate_code(CLASSIFICATIONS, &args.classification)
    {
        warn!(
            classification = %args.classification,
            "Classification is not a known data category"
        );
    }

    let assessment = cascade.assess(&request);
    let language = display_language(&args.lang);
    print_assessment(&assessment, language);
}

fn print_assessment(assessment: &ImpactAssessment, language: Language) {
    println!("Classification: {}", assessment.classification);
    println!(
        "Protection level: {} -> {}",
        assessment.current_level.as_deref().unwrap_or("-"),
        assessment.effective_level.as_deref().unwrap_or("-")
    );
    if assessment.impacts.is_empty() {
        println!("No cascade effects");
        return;
    }
    println!("{}", impact_table(assessment, language));

    let violations = assessment.violations().count();
    if violations > 0 {
        println!("{violations} protection level violation(s)");
    }
    info!(
        classification = %assessment.classification,
        effects = assessment.impacts.len(),
        violations,
        "Assessed cascade impact"
    );
}

fn impact_table(assessment: &ImpactAssessment, language: Language) -> Table {
    let mut table = new_impact_table(&[
        "Severity",
        "Dimension",
        "Rule",
        "Requirement",
        "Description",
        "Violation",
    ]);
    align_column(&mut table, 5, CellAlignment::Center);
    for impact in &assessment.impacts {
        table.add_row(vec![
            severity_cell(impact.effect.severity),
            Cell::new(&impact.dimension),
            dim_cell(&impact.rule_id),
            Cell::new(impact.effect.requirement.to_string()),
            optional_cell(impact.effect.description.get_or_base(language)),
            flag_cell(impact.violation, Color::Red),
        ]);
    }
    table
}

pub fn run_suggest(cascade: &CascadeService<'_>, args: &SuggestArgs) {
    let changes = cascade.suggest_changes(&args.old, &args.new);
    if changes.is_empty() {
        println!(
            "Reclassifying '{}' as '{}' adds no requirements",
            args.old, args.new
        );
        return;
    }
    println!("{}", effects_table(&changes, display_language(&args.lang)));
}

fn effects_table(effects: &[CascadeEffect], language: Language) -> Table {
    let mut table = new_impact_table(&["Severity", "Requirement", "Description"]);
    for effect in effects {
        table.add_row(vec![
            severity_cell(effect.severity),
            Cell::new(effect.requirement.to_string()),
            optional_cell(effect.description.get_or_base(language)),
        ]);
    }
    table
}

pub fn run_export(registry: &CodelistRegistry, args: &ExportArgs) -> Result<()> {
    let list = codelist(registry, &args.list)?;
    match &args.output {
        Some(path) => {
            export_genericode_to_file(list, path)?;
            println!("Wrote {} ({} codes)", path.display(), list.len());
        }
        None => print!("{}", export_genericode(list)?),
    }
    Ok(())
}

pub fn run_import(args: &ImportArgs) -> Result<()> {
    let content = fs::read_to_string(&args.file)
        .with_context(|| format!("read {}", args.file.display()))?;
    let list = import_genericode(&content)
        .with_context(|| format!("import {}", args.file.display()))?;

    println!("{} {} ({} codes)", list.name, list.version, list.len());
    let mut table = new_table(&["Code", "Label"]);
    for entry in &list.entries {
        table.add_row(vec![code_cell(&entry.code), optional_cell(entry.base_label())]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_coverage(registry: &CodelistRegistry, args: &CoverageArgs) -> Result<()> {
    let language: Language = args.lang.parse()?;
    let coverage = registry.translation_coverage(&args.list, language)?;
    println!("{} [{}]: {:.1}% translated", args.list, language, coverage * 100.0);

    let missing = untranslated(registry, &args.list, language)?;
    if !missing.is_empty() {
        let mut table = new_table(&["Untranslated code", "Fallback label"]);
        for code in missing {
            let fallback = registry.get_label(&args.list, code, language.as_tag());
            table.add_row(vec![code_cell(code), optional_cell(fallback)]);
        }
        println!("{table}");
    }
    Ok(())
}

fn untranslated<'a>(
    registry: &'a CodelistRegistry,
    list: &str,
    language: Language,
) -> Result<Vec<&'a str>> {
    Ok(registry
        .list_codes(list)?
        .iter()
        .filter(|e| {
            !e.labels.contains(language)
                && registry.overlay().label(list, &e.code, language).is_none()
        })
        .map(|e| e.code.as_str())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> CodelistRegistry {
        CodelistRegistry::load_defaults().expect("codelists")
    }

    #[test]
    fn lists_table_has_every_codelist() {
        let registry = registry();
        let rendered = lists_table(&registry).to_string();
        for name in registry.names() {
            assert!(rendered.contains(name), "missing {name}");
        }
    }

    #[test]
    fn codes_table_filters_group_and_deprecated() {
        let registry = registry();
        let args = CodesArgs {
            list: "data-categories".into(),
            group: Some("special".into()),
            active_only: true,
            lang: "de".into(),
        };
        let rendered = codes_table(&registry, &args).expect("table").to_string();
        assert!(rendered.contains("health-data"));
        assert!(rendered.contains("Gesundheitsdaten"));
        assert!(!rendered.contains("contact-data"));
        assert!(!rendered.contains("sensitive-data"));
    }

    #[test]
    fn codes_table_unknown_list_fails() {
        let args = CodesArgs {
            list: "nope".into(),
            group: None,
            active_only: false,
            lang: "en".into(),
        };
        assert!(codes_table(&registry(), &args).is_err());
    }

    #[test]
    fn validate_reports_invalid_codes() {
        let registry = registry();
        let args = ValidateArgs {
            list: "protection-levels".into(),
            codes: vec!["enhanced".into(), "maximum".into()],
        };
        let (table, all_valid) = validate_table(&registry, &args).expect("table");
        assert!(!all_valid);
        assert!(table.to_string().contains("invalid"));

        let args = ValidateArgs {
            list: "protection-levels".into(),
            codes: vec!["baseline".into()],
        };
        assert!(validate_table(&registry, &args).expect("table").1);
    }

    #[test]
    fn untranslated_lists_missing_codes() {
        let registry = registry();
        let missing = untranslated(&registry, "assurance-goals", Language::Fr).expect("list");
        assert!(missing.contains(&"transparency"));
    }

    #[test]
    fn export_writes_file_that_imports_back() {
        let registry = registry();
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("recipients.xml");
        let args = ExportArgs {
            list: "recipients".into(),
            output: Some(path.clone()),
        };
        run_export(&registry, &args).expect("export");

        let content = fs::read_to_string(&path).expect("read export");
        let list = import_genericode(&content).expect("import");
        assert_eq!(Some(&list), registry.codelist("recipients"));
        run_import(&ImportArgs { file: path }).expect("import command");
    }

    #[test]
    fn export_of_unknown_list_fails() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("missing.xml");
        let args = ExportArgs {
            list: "nope".into(),
            output: Some(path.clone()),
        };
        assert!(run_export(&registry(), &args).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn display_language_falls_back() {
        assert_eq!(display_language("fr-CA"), Language::Fr);
        assert_eq!(display_language("xx"), Language::BASE);
    }
}
