use camino::Utf8PathBuf;
use colored::Colorize;
use eyre::Context;
use serde::Serialize;
use std::collections::BTreeMap;
use texswap_core::{Ambiguity, Language, MappingTable};

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum CheckOutputFormat {
    /// Default human-readable table format
    #[default]
    Table,
    /// JSON output for scripting
    Json,
}

pub struct CheckArgs {
    pub mapping: Utf8PathBuf,
    pub format: CheckOutputFormat,
}

#[derive(Debug, Serialize)]
struct EntryInfo {
    destination: String,
    label: Option<String>,
    skip: bool,
    languages: BTreeMap<Language, String>,
}

#[derive(Debug, Serialize)]
struct CheckOutput {
    mapping_path: String,
    total_entries: usize,
    skipped_entries: usize,
    /// How many entries carry a source name for each language
    coverage: BTreeMap<Language, usize>,
    ambiguities: Vec<Ambiguity>,
    entries: Vec<EntryInfo>,
}

pub fn check(args: CheckArgs) -> eyre::Result<()> {
    let table = MappingTable::load(&args.mapping)
        .wrap_err_with(|| format!("failed to load mapping table {}", args.mapping))?;

    let output = collect_output(&table, args.mapping.to_string());

    match args.format {
        CheckOutputFormat::Json => print_json(&output)?,
        CheckOutputFormat::Table => print_table(&output),
    }

    Ok(())
}

fn collect_output(table: &MappingTable, mapping_path: String) -> CheckOutput {
    let mut coverage: BTreeMap<Language, usize> =
        Language::ALL.into_iter().map(|lang| (lang, 0)).collect();
    let mut entries = Vec::with_capacity(table.len());

    for (destination, entry) in table.entries() {
        for lang in entry.languages.keys() {
            *coverage.entry(*lang).or_default() += 1;
        }
        entries.push(EntryInfo {
            destination: destination.to_string(),
            label: entry.label.clone(),
            skip: entry.skip,
            languages: entry.languages.clone(),
        });
    }

    CheckOutput {
        mapping_path,
        total_entries: table.len(),
        skipped_entries: entries.iter().filter(|e| e.skip).count(),
        coverage,
        ambiguities: table.ambiguities().to_vec(),
        entries,
    }
}

fn print_json(output: &CheckOutput) -> eyre::Result<()> {
    println!("{}", serde_json::to_string_pretty(output)?);
    Ok(())
}

fn print_table(output: &CheckOutput) {
    println!(
        "{}: {}",
        "Mapping".bright_cyan().bold(),
        output.mapping_path.bright_white()
    );
    println!(
        "{}: {} ({} flagged skip)",
        "Entries".bright_cyan().bold(),
        output.total_entries.to_string().bright_yellow(),
        output.skipped_entries.to_string().bright_red()
    );
    println!(
        "{}: {}",
        "Coverage".bright_cyan().bold(),
        itertools::join(
            output
                .coverage
                .iter()
                .map(|(lang, count)| format!("{} {}", lang, count)),
            ", "
        )
    );
    println!();

    println!(
        "{:24} {:5} {:40}  {}",
        "DESTINATION".bright_blue().bold(),
        "SKIP".bright_blue().bold(),
        "SOURCES".bright_blue().bold(),
        "LABEL".bright_blue().bold()
    );
    println!("{}", "─".repeat(80).bright_black());

    for entry in &output.entries {
        let sources = itertools::join(
            entry
                .languages
                .iter()
                .map(|(lang, name)| format!("{}={}", lang, name)),
            " ",
        );
        let skip = if entry.skip {
            "yes".bright_red().to_string()
        } else {
            "no ".bright_black().to_string()
        };
        println!(
            "{:24} {:5} {:40}  {}",
            entry.destination,
            skip,
            sources,
            entry.label.as_deref().unwrap_or("").bright_black()
        );
    }

    if output.ambiguities.is_empty() {
        return;
    }

    println!();
    println!(
        "{} source names are mapped more than once (the first claim is used):",
        output.ambiguities.len().to_string().bright_yellow().bold()
    );
    for ambiguity in &output.ambiguities {
        let claims = itertools::join(
            ambiguity
                .claims
                .iter()
                .map(|c| format!("{} ({})", c.destination, c.language)),
            ", ",
        );
        println!("  {} -> {}", ambiguity.name.bright_yellow(), claims);
    }
}
