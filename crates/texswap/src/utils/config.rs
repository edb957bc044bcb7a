use camino::{Utf8Path, Utf8PathBuf};
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use texswap_core::{FallbackMode, Language};

pub const CONFIG_FILE_NAME: &str = "texswap.toml";

pub const DEFAULT_SOURCE_DIR: &str = "SCES-53326/replacements";
pub const DEFAULT_DESTINATION_DIR: &str = "SCUS-97472/replacements";
pub const DEFAULT_MAPPING_FILE: &str = "maps/SCES-53326.json";

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// Whether to show progress bars
    pub show_progress: Option<bool>,
    /// Language to use without asking
    pub language: Option<Language>,
    /// Path to the JSON mapping table
    pub mapping_file: Option<String>,
    /// Directory holding the source region's replacements
    pub source_dir: Option<String>,
    /// Directory the converted replacements are written to
    pub destination_dir: Option<String>,
    /// Refuse fallback renames whose digit would become negative
    pub strict_fallback: Option<bool>,
    /// Wait for Enter before exiting
    pub pause_on_exit: Option<bool>,
}

impl Config {
    pub fn resolve_show_progress(&self, cli_progress: Option<bool>) -> bool {
        match cli_progress {
            Some(v) => v,
            None => self.show_progress.unwrap_or(true),
        }
    }

    pub fn mapping_file(&self, cli: Option<String>) -> Utf8PathBuf {
        pick_path(cli, &self.mapping_file, DEFAULT_MAPPING_FILE)
    }

    pub fn source_dir(&self, cli: Option<String>) -> Utf8PathBuf {
        pick_path(cli, &self.source_dir, DEFAULT_SOURCE_DIR)
    }

    pub fn destination_dir(&self, cli: Option<String>) -> Utf8PathBuf {
        pick_path(cli, &self.destination_dir, DEFAULT_DESTINATION_DIR)
    }

    pub fn fallback_mode(&self, cli_strict: bool) -> FallbackMode {
        if cli_strict || self.strict_fallback.unwrap_or(false) {
            FallbackMode::Strict
        } else {
            FallbackMode::Literal
        }
    }
}

fn pick_path(cli: Option<String>, configured: &Option<String>, default: &str) -> Utf8PathBuf {
    cli.or_else(|| configured.clone())
        .map(Utf8PathBuf::from)
        .unwrap_or_else(|| Utf8PathBuf::from(default))
}

/// `texswap.toml` next to the executable, or in the working directory when
/// the executable's location cannot be expressed as UTF-8.
pub fn default_config_path() -> Utf8PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(CONFIG_FILE_NAME)))
        .and_then(|path| Utf8PathBuf::from_path_buf(path).ok())
        .unwrap_or_else(|| Utf8PathBuf::from(CONFIG_FILE_NAME))
}

pub fn load_config(path: Option<&Utf8Path>) -> Result<Config> {
    let final_path = match path {
        Some(p) => p.to_path_buf(),
        None => default_config_path(),
    };

    if final_path.exists() {
        let contents = fs::read_to_string(final_path.as_std_path())?;
        let cfg: Config = toml::from_str(&contents)
            .wrap_err_with(|| format!("invalid config file {}", final_path))?;
        Ok(cfg)
    } else {
        Ok(Config::default())
    }
}

pub fn save_config(path: Option<&Utf8Path>, cfg: &Config) -> Result<()> {
    let final_path = match path {
        Some(p) => p.to_path_buf(),
        None => default_config_path(),
    };
    let toml_str = toml::to_string_pretty(cfg)?;
    fs::write(final_path.as_std_path(), toml_str)?;
    Ok(())
}

/// Loads config and ensures a file exists by writing defaults if missing.
/// Returns the loaded config and the resolved path it was loaded/saved from.
pub fn load_or_create_config(path: Option<&Utf8Path>) -> Result<(Config, Utf8PathBuf)> {
    let final_path = match path {
        Some(p) => p.to_path_buf(),
        None => default_config_path(),
    };

    let cfg = if final_path.exists() {
        load_config(Some(final_path.as_path()))?
    } else {
        let cfg = Config::default();
        save_config(Some(final_path.as_path()), &cfg)?;
        cfg
    };

    Ok((cfg, final_path))
}

/// Resolves progress (CLI overrides config). If CLI provided, persist updated value.
pub fn resolve_and_persist_progress(
    cfg: &mut Config,
    path: &Utf8Path,
    cli_progress: Option<bool>,
) -> Result<bool> {
    let show_progress = cfg.resolve_show_progress(cli_progress);
    if cli_progress.is_some() {
        cfg.show_progress = Some(show_progress);
        save_config(Some(path), cfg)?;
    }
    Ok(show_progress)
}
