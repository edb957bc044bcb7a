use camino::Utf8Path;
use clap::builder::{styling::AnsiColor, Styles};
use clap::error::ErrorKind;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::io::Write;
use texswap_core::Language;
use tracing::Level;
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{filter, fmt};
use utils::config::{
    default_config_path, load_or_create_config, resolve_and_persist_progress, Config,
};
use utils::{pause_for_exit, prompt_language};

mod commands;
mod swapper;
mod utils;

use commands::*;

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum VerbosityLevel {
    /// Show errors and above
    Error,
    /// Show warnings and above
    Warning,
    /// Show info messages and above
    Info,
    /// Show debug messages and above
    Debug,
    /// Show all messages including trace
    Trace,
}

impl From<VerbosityLevel> for Level {
    fn from(level: VerbosityLevel) -> Self {
        match level {
            VerbosityLevel::Error => Level::ERROR,
            VerbosityLevel::Warning => Level::WARN,
            VerbosityLevel::Info => Level::INFO,
            VerbosityLevel::Debug => Level::DEBUG,
            VerbosityLevel::Trace => Level::TRACE,
        }
    }
}

impl VerbosityLevel {
    pub fn to_level_filter(&self) -> LevelFilter {
        LevelFilter::from_level((*self).into())
    }
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None, styles = cli_styles())]
struct Args {
    /// Set the verbosity level
    #[arg(short = 'L', long, value_enum, default_value_t = VerbosityLevel::Info)]
    verbosity: VerbosityLevel,

    /// Optional path to a config file (TOML). Defaults to `texswap.toml` next to the executable
    #[arg(long)]
    config: Option<String>,

    /// Show or hide progress bars: true/false (overrides config). Example: --progress=false
    #[arg(long, value_name = "true|false")]
    progress: Option<bool>,

    /// Wait for Enter before exiting
    #[arg(long)]
    pause: bool,

    /// Runs `swap` with its defaults when omitted
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(ClapArgs, Debug, Default)]
pub struct SwapCommand {
    /// Language variant to keep (EN, ES, FR, DE, IT). Asked interactively when missing
    #[arg(short, long, value_parser = parse_language)]
    language: Option<Language>,

    /// Path to the JSON mapping table
    #[arg(short, long)]
    mapping: Option<String>,

    /// Directory holding the PAL replacements
    #[arg(short, long)]
    source: Option<String>,

    /// Directory to write the NTSC replacements to
    #[arg(short, long)]
    destination: Option<String>,

    /// Resolve every file and report, without writing anything
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Refuse fallback renames whose digit would drop below zero
    #[arg(long)]
    strict_fallback: bool,

    /// Write a per-file report to this .csv file
    #[arg(short, long, value_name = "CSV")]
    report: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert the replacement textures of one language variant
    ///
    /// Walks the source directory, renames every file through the mapping table
    /// (or the fallback rule for unmapped files) and copies it into the destination
    /// directory, keeping subdirectories.
    #[command(visible_alias = "s")]
    Swap(SwapCommand),
    /// Show how file names would be converted
    #[command(visible_alias = "r")]
    Resolve {
        /// Language variant to keep
        #[arg(short, long, value_parser = parse_language)]
        language: Option<Language>,

        /// Path to the JSON mapping table
        #[arg(short, long)]
        mapping: Option<String>,

        /// Refuse fallback renames whose digit would drop below zero
        #[arg(long)]
        strict_fallback: bool,

        /// File names (or paths) to resolve
        #[arg(required = true, num_args = 1..)]
        files: Vec<String>,
    },
    /// Load a mapping table and report its entries and ambiguous names
    #[command(visible_alias = "c")]
    Check {
        /// Path to the JSON mapping table
        #[arg(short, long)]
        mapping: Option<String>,

        /// Output format
        #[arg(short = 'F', long, value_enum, default_value_t = CheckOutputFormat::Table)]
        format: CheckOutputFormat,
    },
    /// List the supported language codes
    #[command(visible_alias = "langs")]
    Languages,
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let args = match Args::try_parse() {
        Ok(a) => a,
        Err(e) => {
            if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                // Ensure a default config exists even when showing help/version
                let _ = load_or_create_config(Some(default_config_path().as_path()));
                e.print()?;
                return Ok(());
            } else {
                e.exit();
            }
        }
    };

    let config_path = args
        .config
        .as_deref()
        .map(Utf8Path::new)
        .map(|p| p.to_path_buf())
        .unwrap_or_else(default_config_path);
    let (mut config, resolved_path) = load_or_create_config(Some(config_path.as_path()))?;
    let show_progress =
        resolve_and_persist_progress(&mut config, resolved_path.as_path(), args.progress)?;

    initialize_tracing(args.verbosity, show_progress)?;

    let result = run(args.command, &config);

    if !(args.pause || config.pause_on_exit.unwrap_or(false)) {
        return result;
    }

    report_then_pause(&result, &mut std::io::stderr(), pause_for_exit)?;
    if result.is_err() {
        std::process::exit(1);
    }
    Ok(())
}

/// Prints a failed run's report before waiting, so it is readable while the window stays open.
fn report_then_pause(
    result: &eyre::Result<()>,
    err_out: &mut impl Write,
    wait: impl FnOnce() -> eyre::Result<()>,
) -> eyre::Result<()> {
    if let Err(error) = result {
        writeln!(err_out, "Error: {:?}", error)?;
        err_out.flush()?;
    }
    wait()
}

fn run(command: Option<Commands>, config: &Config) -> eyre::Result<()> {
    match command.unwrap_or_else(|| Commands::Swap(SwapCommand::default())) {
        Commands::Swap(cmd) => swap(SwapArgs {
            language: select_language(cmd.language, config)?,
            mapping: config.mapping_file(cmd.mapping),
            source: config.source_dir(cmd.source),
            destination: config.destination_dir(cmd.destination),
            fallback_mode: config.fallback_mode(cmd.strict_fallback),
            dry_run: cmd.dry_run,
            report: cmd.report,
        }),
        Commands::Resolve {
            language,
            mapping,
            strict_fallback,
            files,
        } => resolve(ResolveArgs {
            language: select_language(language, config)?,
            mapping: config.mapping_file(mapping),
            fallback_mode: config.fallback_mode(strict_fallback),
            files,
        }),
        Commands::Check { mapping, format } => check(CheckArgs {
            mapping: config.mapping_file(mapping),
            format,
        }),
        Commands::Languages => {
            for lang in Language::ALL {
                println!("{}  {}", lang.code(), lang.display_name());
            }
            Ok(())
        }
    }
}

/// Command line first, then config, then the interactive menu.
fn select_language(cli: Option<Language>, config: &Config) -> eyre::Result<Language> {
    match cli.or(config.language) {
        Some(lang) => Ok(lang),
        None => prompt_language(),
    }
}

fn initialize_tracing(verbosity: VerbosityLevel, show_progress: bool) -> eyre::Result<()> {
    let indicatif_layer = IndicatifLayer::new();

    let common_format = fmt::format()
        .with_ansi(true)
        .with_level(true)
        .with_source_location(false)
        .with_line_number(false)
        .with_target(false)
        .with_timer(tracing_subscriber::fmt::time::time());

    // stdout: INFO/DEBUG/TRACE (when verbosity allows)
    let stdout_layer = fmt::layer()
        .with_writer(indicatif_layer.get_stdout_writer())
        .event_format(common_format.clone())
        .with_filter(filter::filter_fn(move |metadata| {
            let level = *metadata.level();
            match verbosity {
                VerbosityLevel::Error | VerbosityLevel::Warning => false,
                VerbosityLevel::Info => level == Level::INFO,
                VerbosityLevel::Debug => level == Level::INFO || level == Level::DEBUG,
                VerbosityLevel::Trace => level != Level::WARN && level != Level::ERROR,
            }
        }));

    // stderr: WARN/ERROR, or only ERROR at the quietest level
    let stderr_layer = fmt::layer()
        .with_writer(indicatif_layer.get_stderr_writer())
        .event_format(common_format)
        .with_filter(filter::filter_fn(move |metadata| {
            let level = *metadata.level();
            match verbosity {
                VerbosityLevel::Error => level == Level::ERROR,
                _ => level == Level::WARN || level == Level::ERROR,
            }
        }));

    let registry = tracing_subscriber::registry()
        .with(stdout_layer)
        .with(stderr_layer)
        .with(verbosity.to_level_filter());

    if show_progress {
        registry.with(indicatif_layer).init();
    } else {
        registry.init();
    }
    Ok(())
}

fn parse_language(s: &str) -> Result<Language, String> {
    s.parse::<Language>().map_err(|e| e.to_string())
}

fn cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Yellow.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default())
        .placeholder(AnsiColor::Magenta.on_default())
}
