use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use std::{fs, path::Path};
use walkdir::WalkDir;

use crate::{
    error::{FileError, SwapError},
    resolver::{split_file_name, Origin, Resolution, Resolver, SkipReason},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopiedFile {
    pub source: Utf8PathBuf,
    pub destination: Utf8PathBuf,
    pub origin: Origin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub source: Utf8PathBuf,
    pub reason: SkipReason,
}

/// Everything that happened during a swap run, in walk order.
#[derive(Debug, Default)]
pub struct SwapReport {
    pub copied: Vec<CopiedFile>,
    pub skipped: Vec<SkippedFile>,
    pub failures: Vec<FileError>,
    /// Nothing was written; `copied` lists what would have been.
    pub dry_run: bool,
}

impl SwapReport {
    pub fn processed(&self) -> usize {
        self.copied.len() + self.skipped.len() + self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SwapOptions {
    pub dry_run: bool,
}

enum FileOutcome {
    Copied(CopiedFile),
    Skipped(SkippedFile),
}

/// Copies every regular file under `source_root` into `destination_root`
/// with its resolved name, keeping the relative directory layout.
///
/// A missing source directory aborts the run before anything is written.
/// Failures on individual files are recorded in the report and the walk
/// goes on. `report_progress` receives the index of the file about to be
/// processed, the total file count and the file's path.
pub fn swap_textures(
    resolver: &Resolver<'_>,
    source_root: impl AsRef<Utf8Path>,
    destination_root: impl AsRef<Utf8Path>,
    options: SwapOptions,
    mut report_progress: impl FnMut(usize, usize, &str),
) -> Result<SwapReport, SwapError> {
    let source_root = source_root.as_ref();
    let destination_root = destination_root.as_ref();

    if !source_root.is_dir() {
        return Err(SwapError::SourceDirectoryMissing(source_root.to_path_buf()));
    }

    // Symlinks count when they point at a regular file.
    let entries: Vec<_> = WalkDir::new(source_root.as_std_path())
        .sort_by_file_name()
        .into_iter()
        .filter(|entry| match entry {
            Ok(entry) => entry.path().is_file(),
            Err(_) => true,
        })
        .collect();

    let total = entries.len();
    let mut report = SwapReport {
        dry_run: options.dry_run,
        ..Default::default()
    };

    for (i, entry) in entries.into_iter().enumerate() {
        let display_path = match &entry {
            Ok(entry) => entry.path().to_string_lossy(),
            Err(error) => error.path().unwrap_or(Path::new("")).to_string_lossy(),
        };
        report_progress(i, total, &display_path);

        let outcome = entry.map_err(FileError::from).and_then(|entry| {
            swap_file(resolver, source_root, destination_root, entry.path(), options)
        });

        match outcome {
            Ok(FileOutcome::Copied(copied)) => report.copied.push(copied),
            Ok(FileOutcome::Skipped(skipped)) => report.skipped.push(skipped),
            Err(error) => {
                tracing::warn!("{}", error_chain(&error));
                report.failures.push(error);
            }
        }
    }

    tracing::info!(
        "processed {} files: {} copied, {} skipped, {} failed",
        report.processed(),
        report.copied.len(),
        report.skipped.len(),
        report.failures.len()
    );

    Ok(report)
}

fn swap_file(
    resolver: &Resolver<'_>,
    source_root: &Utf8Path,
    destination_root: &Utf8Path,
    path: &Path,
    options: SwapOptions,
) -> Result<FileOutcome, FileError> {
    let source = Utf8Path::from_path(path).ok_or_else(|| FileError::NonUtf8Path(path.into()))?;
    let file_name = source.file_name().unwrap_or_default();
    let relative_dir = source
        .parent()
        .and_then(|parent| parent.strip_prefix(source_root).ok())
        .unwrap_or(Utf8Path::new(""));

    tracing::debug!("processing {}", source);

    let (base_name, extension) = split_file_name(file_name);
    let resolution = resolver.resolve(base_name, extension).map_err(|source_error| {
        FileError::MalformedFallbackInput {
            path: source.to_path_buf(),
            source: source_error,
        }
    })?;

    let (new_name, origin) = match resolution {
        Resolution::Copy { file_name, origin } => (file_name, origin),
        Resolution::Skip(reason) => {
            tracing::debug!("skipping {} ({:?})", source, reason);
            return Ok(FileOutcome::Skipped(SkippedFile {
                source: source.to_path_buf(),
                reason,
            }));
        }
    };

    let destination = destination_root.join(relative_dir).join(&new_name);

    if !options.dry_run {
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|error| FileError::CreateDirFailed {
                path: parent.to_path_buf(),
                source: error,
            })?;
        }
        fs::copy(source, &destination).map_err(|error| FileError::CopyFailed {
            source_path: source.to_path_buf(),
            destination_path: destination.clone(),
            source: error,
        })?;
        tracing::info!("copied {} -> {}", file_name, new_name);
    }

    Ok(FileOutcome::Copied(CopiedFile {
        source: source.to_path_buf(),
        destination,
        origin,
    }))
}

/// Renders an error followed by its sources, `a: b: c`.
pub fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut current = error.source();
    while let Some(cause) = current {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        current = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{fallback::FallbackMode, language::Language, mapping::MappingTable};

    struct Fixture {
        _dir: tempfile::TempDir,
        source: Utf8PathBuf,
        destination: Utf8PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let root = Utf8Path::from_path(dir.path()).unwrap().to_path_buf();
            let source = root.join("SCES-53326/replacements");
            let destination = root.join("SCUS-97472/replacements");
            fs::create_dir_all(&source).unwrap();
            Self {
                _dir: dir,
                source,
                destination,
            }
        }

        fn add(&self, relative: &str, contents: &[u8]) {
            let path = self.source.join(relative);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, contents).unwrap();
        }

        fn run(&self, table: &MappingTable, language: Language) -> SwapReport {
            self.run_with(table, language, SwapOptions::default())
        }

        fn run_with(
            &self,
            table: &MappingTable,
            language: Language,
            options: SwapOptions,
        ) -> SwapReport {
            let resolver = Resolver::new(table, language);
            swap_textures(&resolver, &self.source, &self.destination, options, |_, _, _| {})
                .unwrap()
        }

        fn destination_files(&self) -> Vec<String> {
            if !self.destination.exists() {
                return Vec::new();
            }
            let mut files: Vec<String> = WalkDir::new(&self.destination)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .map(|e| {
                    e.path()
                        .strip_prefix(&self.destination)
                        .unwrap()
                        .to_string_lossy()
                        .replace('\\', "/")
                })
                .collect();
            files.sort();
            files
        }
    }

    fn table(json: &str) -> MappingTable {
        MappingTable::from_json_str(json).unwrap()
    }

    #[test]
    fn test_mapped_file_copied_for_its_language_only() {
        let table = table(r#"{ "tex_05": { "EN": "tex_01", "skip": false } }"#);

        let english = Fixture::new();
        english.add("tex_01.dds", b"english");
        let report = english.run(&table, Language::English);
        assert_eq!(english.destination_files(), vec!["tex_05.dds"]);
        assert_eq!(report.copied.len(), 1);

        let french = Fixture::new();
        french.add("tex_01.dds", b"english");
        let report = french.run(&table, Language::French);
        assert!(french.destination_files().is_empty());
        assert_eq!(report.skipped.len(), 1);
        assert!(report.is_success());
    }

    #[test]
    fn test_flagged_entry_never_copied() {
        let table = table(r#"{ "tex_09": { "skip": true, "EN": "tex_02" } }"#);

        for language in Language::ALL {
            let fixture = Fixture::new();
            fixture.add("tex_02.dds", b"data");
            let report = fixture.run(&table, language);

            assert!(fixture.destination_files().is_empty());
            assert_eq!(
                report.skipped,
                vec![SkippedFile {
                    source: fixture.source.join("tex_02.dds"),
                    reason: SkipReason::Flagged {
                        destination: "tex_09".to_string()
                    }
                }]
            );
        }
    }

    #[test]
    fn test_unmapped_file_uses_fallback_name() {
        let fixture = Fixture::new();
        fixture.add("abcd5xyz.dds", b"data");

        let report = fixture.run(&MappingTable::default(), Language::Italian);

        assert_eq!(fixture.destination_files(), vec!["abcd1xyz.dds"]);
        assert_eq!(report.copied[0].origin, Origin::Fallback);
    }

    #[test]
    fn test_keeps_directory_structure_and_bytes() {
        let table = table(r#"{ "tex_05": { "DE": "tex_01" } }"#);
        let fixture = Fixture::new();
        let bytes: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        fixture.add("sub/dir/tex_01.dds", &bytes);
        fixture.add("other/abcd9xyz.png", b"png");

        let report = fixture.run(&table, Language::German);

        assert_eq!(
            fixture.destination_files(),
            vec!["other/abcd5xyz.png", "sub/dir/tex_05.dds"]
        );
        let copied = fs::read(fixture.destination.join("sub/dir/tex_05.dds")).unwrap();
        assert_eq!(copied, bytes);
        assert_eq!(fs::read(fixture.source.join("sub/dir/tex_01.dds")).unwrap(), bytes);
        assert_eq!(report.copied.len(), 2);
    }

    #[test]
    fn test_overwrites_existing_destination() {
        let fixture = Fixture::new();
        fixture.add("abcd5xyz.dds", b"new");
        fs::create_dir_all(&fixture.destination).unwrap();
        fs::write(fixture.destination.join("abcd1xyz.dds"), b"old").unwrap();

        fixture.run(&MappingTable::default(), Language::English);

        assert_eq!(
            fs::read(fixture.destination.join("abcd1xyz.dds")).unwrap(),
            b"new"
        );
    }

    #[test]
    fn test_missing_source_aborts_without_touching_destination() {
        let fixture = Fixture::new();
        fs::create_dir_all(&fixture.destination).unwrap();
        fs::write(fixture.destination.join("keep.dds"), b"keep").unwrap();
        let missing = fixture.source.join("nope");

        let table = MappingTable::default();
        let resolver = Resolver::new(&table, Language::English);
        let mut calls = 0;
        let result = swap_textures(
            &resolver,
            &missing,
            &fixture.destination,
            SwapOptions::default(),
            |_, _, _| calls += 1,
        );

        assert!(matches!(result, Err(SwapError::SourceDirectoryMissing(ref p)) if *p == missing));
        assert_eq!(calls, 0);
        assert_eq!(fixture.destination_files(), vec!["keep.dds"]);
    }

    #[test]
    fn test_file_failures_do_not_stop_the_run() {
        let fixture = Fixture::new();
        fixture.add("a.dds", b"short name");
        fixture.add("abcd5xyz.dds", b"blocked");
        fixture.add("zzzz6xyz.dds", b"fine");
        // A directory where the copy wants to write a file.
        fs::create_dir_all(fixture.destination.join("abcd1xyz.dds")).unwrap();

        let report = fixture.run(&MappingTable::default(), Language::English);

        assert_eq!(report.failures.len(), 2);
        assert!(matches!(
            report.failures[0],
            FileError::MalformedFallbackInput { .. }
        ));
        assert!(matches!(report.failures[1], FileError::CopyFailed { .. }));
        assert_eq!(report.copied.len(), 1);
        assert_eq!(
            fs::read(fixture.destination.join("zzzz2xyz.dds")).unwrap(),
            b"fine"
        );
        assert!(!report.is_success());
    }

    #[test]
    fn test_strict_fallback_failure_is_per_file() {
        let fixture = Fixture::new();
        fixture.add("abcd1xyz.dds", b"negative");
        fixture.add("abcd7xyz.dds", b"ok");

        let table = MappingTable::default();
        let resolver =
            Resolver::new(&table, Language::English).with_fallback_mode(FallbackMode::Strict);
        let report = swap_textures(
            &resolver,
            &fixture.source,
            &fixture.destination,
            SwapOptions::default(),
            |_, _, _| {},
        )
        .unwrap();

        assert_eq!(report.failures.len(), 1);
        assert_eq!(fixture.destination_files(), vec!["abcd3xyz.dds"]);
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let fixture = Fixture::new();
        fixture.add("nested/abcd5xyz.dds", b"data");

        let report = fixture.run_with(
            &MappingTable::default(),
            Language::English,
            SwapOptions { dry_run: true },
        );

        assert!(!fixture.destination.exists());
        assert!(report.dry_run);
        assert_eq!(
            report.copied[0].destination,
            fixture.destination.join("nested/abcd1xyz.dds")
        );
    }

    #[test]
    fn test_progress_reports_every_file() {
        let fixture = Fixture::new();
        fixture.add("abcd5xyz.dds", b"1");
        fixture.add("sub/abcd6xyz.dds", b"2");

        let table = MappingTable::default();
        let resolver = Resolver::new(&table, Language::English);
        let mut seen = Vec::new();
        swap_textures(
            &resolver,
            &fixture.source,
            &fixture.destination,
            SwapOptions::default(),
            |i, total, _| seen.push((i, total)),
        )
        .unwrap();

        assert_eq!(seen, vec![(0, 2), (1, 2)]);
    }

    #[test]
    fn test_error_chain_includes_sources() {
        let error = FileError::MalformedFallbackInput {
            path: Utf8PathBuf::from("x/a.dds"),
            source: crate::error::FallbackError::TooShort("a.dds".to_string()),
        };
        assert_eq!(
            error_chain(&error),
            "cannot rename x/a.dds: file name 'a.dds' is shorter than 8 characters"
        );
    }

    #[test]
    fn test_file_as_source_root_is_missing_directory() {
        let fixture = Fixture::new();
        fixture.add("abcd5xyz.dds", b"1");
        let table = MappingTable::default();
        let resolver = Resolver::new(&table, Language::English);

        let result = swap_textures(
            &resolver,
            fixture.source.join("abcd5xyz.dds"),
            &fixture.destination,
            SwapOptions::default(),
            |_, _, _| {},
        );

        assert!(matches!(result, Err(SwapError::SourceDirectoryMissing(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_name_fails_alone() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let fixture = Fixture::new();
        fixture.add("abcd5xyz.dds", b"valid");
        let bad_name = OsStr::from_bytes(b"ab\xffd5xyz.dds");
        fs::write(fixture.source.as_std_path().join(bad_name), b"bad").unwrap();

        let report = fixture.run(&MappingTable::default(), Language::English);

        assert_eq!(report.failures.len(), 1);
        assert!(matches!(report.failures[0], FileError::NonUtf8Path(_)));
        assert!(report.failures[0].to_string().contains("not valid UTF-8"));
        assert_eq!(report.copied.len(), 1);
        assert_eq!(fixture.destination_files(), vec!["abcd1xyz.dds"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directory_not_followed() {
        let fixture = Fixture::new();
        fixture.add("real/abcd5xyz.dds", b"real");
        std::os::unix::fs::symlink(fixture.source.join("real"), fixture.source.join("linked"))
            .unwrap();
        std::os::unix::fs::symlink(&fixture.source, fixture.source.join("loop")).unwrap();

        let report = fixture.run(&MappingTable::default(), Language::English);

        assert!(report.is_success());
        assert_eq!(report.copied.len(), 1);
        assert_eq!(fixture.destination_files(), vec!["real/abcd1xyz.dds"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_file_copies_target_bytes() {
        let fixture = Fixture::new();
        fixture.add("real/abcd5xyz.dds", b"target");
        std::os::unix::fs::symlink(
            fixture.source.join("real/abcd5xyz.dds"),
            fixture.source.join("zzzz6xyz.dds"),
        )
        .unwrap();

        let report = fixture.run(&MappingTable::default(), Language::English);

        assert_eq!(report.copied.len(), 2);
        assert_eq!(
            fixture.destination_files(),
            vec!["real/abcd1xyz.dds", "zzzz2xyz.dds"]
        );
        assert_eq!(
            fs::read(fixture.destination.join("zzzz2xyz.dds")).unwrap(),
            b"target"
        );
    }
}
