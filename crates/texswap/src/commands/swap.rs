use camino::{Utf8Path, Utf8PathBuf};
use colored::Colorize;
use eyre::{eyre, Context};
use serde::Serialize;
use std::fs::OpenOptions;
use texswap_core::{
    swap::error_chain, FallbackMode, Language, MappingTable, Origin, Resolver, SkipReason,
    SwapReport,
};

use crate::{swapper::Swapper, utils::hyperlink_path};

pub struct SwapArgs {
    pub language: Language,
    pub mapping: Utf8PathBuf,
    pub source: Utf8PathBuf,
    pub destination: Utf8PathBuf,
    pub fallback_mode: FallbackMode,
    pub dry_run: bool,
    pub report: Option<String>,
}

/// A row of the CSV report
#[derive(Debug, Serialize, PartialEq)]
struct SwapCsvRecord {
    action: String,
    source: String,
    destination: String,
    detail: String,
}

pub fn swap(args: SwapArgs) -> eyre::Result<()> {
    let table = MappingTable::load(&args.mapping)
        .wrap_err_with(|| format!("failed to load mapping table {}", args.mapping))?;

    tracing::info!(
        "Converting {} -> {} ({})",
        args.source.as_str().bright_cyan(),
        args.destination.as_str().bright_cyan(),
        args.language.display_name()
    );

    let resolver = Resolver::new(&table, args.language).with_fallback_mode(args.fallback_mode);
    let mut swapper = Swapper::new(resolver);
    swapper.set_dry_run(args.dry_run);

    let report = swapper.swap(&args.source, &args.destination)?;

    if let Some(report_path) = &args.report {
        write_report_to_csv(&report, report_path)?;
    }

    print_summary(&report, &args.destination);

    if report.is_success() {
        Ok(())
    } else {
        Err(eyre!("{} files could not be converted", report.failures.len()))
    }
}

fn print_summary(report: &SwapReport, destination: &Utf8Path) {
    let verb = if report.dry_run {
        "Would copy"
    } else {
        "Copied"
    };
    let mapped = report
        .copied
        .iter()
        .filter(|c| matches!(c.origin, Origin::Mapped { .. }))
        .count();

    println!();
    println!(
        "{}: {} ({} mapped, {} renamed by fallback)",
        verb.bright_cyan().bold(),
        report.copied.len().to_string().bright_green(),
        mapped,
        report.copied.len() - mapped
    );
    println!(
        "{}: {}",
        "Skipped".bright_cyan().bold(),
        report.skipped.len().to_string().bright_yellow()
    );
    if !report.failures.is_empty() {
        println!(
            "{}: {}",
            "Failed".bright_red().bold(),
            report.failures.len().to_string().bright_red()
        );
        for failure in &report.failures {
            println!("  {} {}", "✗".bright_red(), error_chain(failure));
        }
    }
    if !report.dry_run && !report.copied.is_empty() {
        println!(
            "{}: {}",
            "Output".bright_cyan().bold(),
            hyperlink_path(destination)
        );
    }
}

fn write_report_to_csv(report: &SwapReport, output_path: &str) -> eyre::Result<()> {
    tracing::info!("Writing report to CSV file: {}", output_path.bright_cyan());

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(output_path)
        .wrap_err_with(|| format!("failed to create report {}", output_path))?;

    let mut writer = csv::Writer::from_writer(file);
    let records = create_csv_records(report);
    for record in &records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    tracing::info!("Wrote {} rows to CSV file", records.len());
    Ok(())
}

fn create_csv_records(report: &SwapReport) -> Vec<SwapCsvRecord> {
    let mut records = Vec::<SwapCsvRecord>::new();

    for copied in &report.copied {
        records.push(SwapCsvRecord {
            action: "copied".to_string(),
            source: copied.source.to_string(),
            destination: copied.destination.to_string(),
            detail: match copied.origin {
                Origin::Mapped { language } => format!("mapped ({})", language),
                Origin::Fallback => "fallback".to_string(),
            },
        });
    }

    for skipped in &report.skipped {
        records.push(SwapCsvRecord {
            action: "skipped".to_string(),
            source: skipped.source.to_string(),
            destination: "".to_string(),
            detail: match &skipped.reason {
                SkipReason::Flagged { destination } => format!("{} is flagged skip", destination),
                SkipReason::OtherLanguage {
                    destination,
                    language,
                } => format!("{} variant of {}", language, destination),
            },
        });
    }

    for failure in &report.failures {
        records.push(SwapCsvRecord {
            action: "failed".to_string(),
            source: failure.path().unwrap_or_default(),
            destination: "".to_string(),
            detail: error_chain(failure),
        });
    }

    records
}
