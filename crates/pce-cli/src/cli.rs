//! CLI argument definitions for the privacy codelist engine.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "pce",
    version,
    about = "Privacy codelist engine - query codelists and evaluate cascade impacts",
    long_about = "Query the privacy compliance codelists, resolve localized labels,\n\
                  evaluate the cascade impact of data classifications, and exchange\n\
                  codelists as OASIS Genericode 1.0."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Load codelists, translations, and rules from this directory
    /// instead of the built-in set (overrides PCE_DATA_DIR).
    #[arg(long = "data-dir", value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List all loaded codelists.
    Lists,

    /// List the codes of one codelist.
    Codes(CodesArgs),

    /// Check codes against a codelist (exit status 1 if any is invalid).
    Validate(ValidateArgs),

    /// Resolve the label of a code.
    Label(LabelArgs),

    /// Search a codelist by code or label.
    Search(SearchArgs),

    /// Show the cascade impact of a data classification.
    Impact(ImpactArgs),

    /// Show requirements added by reclassifying data.
    Suggest(SuggestArgs),

    /// Export a codelist as Genericode XML.
    Export(ExportArgs),

    /// Read a Genericode file and summarize it.
    Import(ImportArgs),

    /// Show how much of a codelist is translated into a language.
    Coverage(CoverageArgs),
}

#[derive(Parser)]
pub struct CodesArgs {
    /// Codelist name (e.g. data-categories).
    #[arg(value_name = "LIST")]
    pub list: String,

    /// Only codes whose group metadata matches.
    #[arg(long = "group", value_name = "GROUP")]
    pub group: Option<String>,

    /// Hide deprecated codes.
    #[arg(long = "active-only")]
    pub active_only: bool,

    /// Label language.
    #[arg(long = "lang", value_name = "LANG", default_value = "en")]
    pub lang: String,
}

#[derive(Parser)]
pub struct ValidateArgs {
    #[arg(value_name = "LIST")]
    pub list: String,

    #[arg(value_name = "CODE", required = true)]
    pub codes: Vec<String>,
}

#[derive(Parser)]
pub struct LabelArgs {
    #[arg(value_name = "LIST")]
    pub list: String,

    #[arg(value_name = "CODE")]
    pub code: String,

    /// Label language; unsupported languages fall back to English.
    #[arg(long = "lang", value_name = "LANG", default_value = "en")]
    pub lang: String,
}

#[derive(Parser)]
pub struct SearchArgs {
    #[arg(value_name = "LIST")]
    pub list: String,

    /// Case-insensitive text matched against codes and labels.
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Language of the labels shown in the results.
    #[arg(long = "lang", value_name = "LANG", default_value = "en")]
    pub lang: String,
}

#[derive(Parser)]
pub struct ImpactArgs {
    /// Data category code (e.g. health-data).
    #[arg(value_name = "CLASSIFICATION")]
    pub classification: String,

    /// Currently applied protection level.
    #[arg(long = "protection-level", value_name = "LEVEL")]
    pub protection_level: Option<String>,

    /// Recipient code; repeat for several recipients.
    #[arg(long = "recipient", value_name = "RECIPIENT")]
    pub recipients: Vec<String>,

    /// Language of effect descriptions.
    #[arg(long = "lang", value_name = "LANG", default_value = "en")]
    pub lang: String,
}

#[derive(Parser)]
pub struct SuggestArgs {
    /// Current data category.
    #[arg(value_name = "OLD")]
    pub old: String,

    /// New data category.
    #[arg(value_name = "NEW")]
    pub new: String,

    /// Language of effect descriptions.
    #[arg(long = "lang", value_name = "LANG", default_value = "en")]
    pub lang: String,
}

#[derive(Parser)]
pub struct ExportArgs {
    #[arg(value_name = "LIST")]
    pub list: String,

    /// Write to this file instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ImportArgs {
    /// Genericode XML file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Parser)]
pub struct CoverageArgs {
    #[arg(value_name = "LIST")]
    pub list: String,

    /// Language to measure (de, fr).
    #[arg(long = "lang", value_name = "LANG")]
    pub lang: String,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
