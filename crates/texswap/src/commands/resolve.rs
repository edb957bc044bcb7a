use camino::{Utf8Path, Utf8PathBuf};
use colored::Colorize;
use eyre::Context;
use texswap_core::{
    FallbackError, FallbackMode, Language, MappingTable, Origin, Resolution, Resolver, SkipReason,
};

pub struct ResolveArgs {
    pub language: Language,
    pub mapping: Utf8PathBuf,
    pub fallback_mode: FallbackMode,
    pub files: Vec<String>,
}

/// Prints what a swap would do with each given file name. Touches nothing.
pub fn resolve(args: ResolveArgs) -> eyre::Result<()> {
    let table = MappingTable::load(&args.mapping)
        .wrap_err_with(|| format!("failed to load mapping table {}", args.mapping))?;
    let resolver = Resolver::new(&table, args.language).with_fallback_mode(args.fallback_mode);

    for file in &args.files {
        // Accept paths too; only the file name matters.
        let file_name = Utf8Path::new(file).file_name().unwrap_or(file.as_str());
        println!("{}", describe(file_name, resolver.resolve_file_name(file_name)));
    }

    Ok(())
}

fn describe(file_name: &str, resolution: Result<Resolution, FallbackError>) -> String {
    match resolution {
        Ok(Resolution::Copy { file_name: new_name, origin }) => {
            let how = match origin {
                Origin::Mapped { language } => format!("mapped, {}", language),
                Origin::Fallback => "fallback".to_string(),
            };
            format!("{} -> {} ({})", file_name, new_name.bright_green(), how)
        }
        Ok(Resolution::Skip(SkipReason::Flagged { destination })) => format!(
            "{} {} ({} is flagged skip)",
            file_name,
            "skipped".bright_yellow(),
            destination
        ),
        Ok(Resolution::Skip(SkipReason::OtherLanguage {
            destination,
            language,
        })) => format!(
            "{} {} ({} variant of {})",
            file_name,
            "skipped".bright_yellow(),
            language,
            destination
        ),
        Err(error) => format!("{} {} ({})", file_name, "error".bright_red(), error),
    }
}
