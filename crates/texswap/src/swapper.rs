use crate::utils::truncate_middle;
use camino::{Utf8Path, Utf8PathBuf};
use indicatif::ProgressStyle;
use texswap_core::{swap_textures, Resolver, SwapError, SwapOptions, SwapReport};
use tracing_indicatif::span_ext::IndicatifSpanExt;

const MAX_LOG_PATH_LEN: usize = 120;

/// Runs a swap while driving a progress bar attached to a tracing span.
pub struct Swapper<'table> {
    resolver: Resolver<'table>,
    options: SwapOptions,
}

impl<'table> Swapper<'table> {
    pub fn new(resolver: Resolver<'table>) -> Self {
        Self {
            resolver,
            options: SwapOptions::default(),
        }
    }

    pub fn set_dry_run(&mut self, dry_run: bool) {
        self.options.dry_run = dry_run;
    }

    pub fn swap(
        &self,
        source_dir: impl AsRef<Utf8Path>,
        destination_dir: impl AsRef<Utf8Path>,
    ) -> Result<SwapReport, SwapError> {
        let span = tracing::info_span!("swap", language = %self.resolver.language());
        let _entered = span.enter();
        if let Ok(style) = progress_style() {
            span.pb_set_style(&style);
        }
        span.pb_set_message("Converting textures");
        span.pb_set_finish_message("Conversion complete");

        let source_dir: Utf8PathBuf = source_dir.as_ref().to_path_buf();
        let report = swap_textures(
            &self.resolver,
            &source_dir,
            destination_dir,
            self.options,
            |i, total, path| {
                if i == 0 {
                    span.pb_set_length(total as u64);
                }
                // The callback fires before file `i` is handled, so only `i` files are done.
                span.pb_set_position(i as u64);
                span.pb_set_message(&progress_message(&source_dir, path));
            },
        )?;
        span.pb_set_position(report.processed() as u64);

        Ok(report)
    }
}

fn progress_style() -> Result<ProgressStyle, indicatif::style::TemplateError> {
    ProgressStyle::with_template("{wide_bar:40.cyan/blue} {pos}/{len} \n {spinner} {msg}")
}

/// The file path relative to the source root, shortened for the progress line.
fn progress_message(source_dir: &Utf8Path, path: &str) -> String {
    let relative = Utf8Path::new(path)
        .strip_prefix(source_dir)
        .map(|p| p.as_str())
        .unwrap_or(path);
    truncate_middle(relative, MAX_LOG_PATH_LEN)
}
