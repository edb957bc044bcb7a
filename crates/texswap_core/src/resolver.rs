use serde::Serialize;

use crate::{
    error::FallbackError,
    fallback::{fallback_name, FallbackMode},
    language::Language,
    mapping::MappingTable,
};

/// How a destination name was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Origin {
    /// Renamed to the destination identifier of a mapping entry.
    Mapped { language: Language },
    /// Renamed with the positional fallback rule.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// The matching entry is flagged `skip`.
    Flagged { destination: String },
    /// The file is another language's variant of a mapped texture.
    OtherLanguage {
        destination: String,
        language: Language,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Resolution {
    Copy { file_name: String, origin: Origin },
    Skip(SkipReason),
}

impl Resolution {
    /// Destination file name, if the file is to be copied.
    pub fn file_name(&self) -> Option<&str> {
        match self {
            Resolution::Copy { file_name, .. } => Some(file_name),
            Resolution::Skip(_) => None,
        }
    }
}

/// Decides the destination name of source files for one selected language.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'table> {
    table: &'table MappingTable,
    language: Language,
    fallback: FallbackMode,
}

impl<'table> Resolver<'table> {
    pub fn new(table: &'table MappingTable, language: Language) -> Self {
        Self {
            table,
            language,
            fallback: FallbackMode::default(),
        }
    }

    pub fn with_fallback_mode(mut self, fallback: FallbackMode) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Resolves a source file given its base name and its extension
    /// (leading `.` included, empty when there is none).
    ///
    /// The first mapping pair claiming `base_name` decides:
    /// a flagged entry is skipped for every language, a matching language is
    /// renamed to the entry's destination identifier, any other language is
    /// skipped. Unmapped files go through [`fallback_name`].
    pub fn resolve(&self, base_name: &str, extension: &str) -> Result<Resolution, FallbackError> {
        let Some(hit) = self.table.lookup(base_name) else {
            let file_name = fallback_name(&format!("{base_name}{extension}"), self.fallback)?;
            tracing::debug!("no mapping for {base_name}, fallback name {file_name}");
            return Ok(Resolution::Copy {
                file_name,
                origin: Origin::Fallback,
            });
        };

        tracing::debug!(
            "matched mapping entry {} (language: {}, skip: {}, label: {})",
            hit.destination,
            hit.language,
            hit.entry.skip,
            hit.entry.label.as_deref().unwrap_or("")
        );

        if hit.entry.skip {
            return Ok(Resolution::Skip(SkipReason::Flagged {
                destination: hit.destination.to_string(),
            }));
        }

        if hit.language != self.language {
            return Ok(Resolution::Skip(SkipReason::OtherLanguage {
                destination: hit.destination.to_string(),
                language: hit.language,
            }));
        }

        Ok(Resolution::Copy {
            file_name: format!("{}{}", hit.destination, extension),
            origin: Origin::Mapped {
                language: hit.language,
            },
        })
    }

    /// Same as [`Resolver::resolve`], splitting a full file name the way
    /// [`std::path::Path`] does.
    pub fn resolve_file_name(&self, file_name: &str) -> Result<Resolution, FallbackError> {
        let (base_name, extension) = split_file_name(file_name);
        self.resolve(base_name, extension)
    }
}

/// Splits `name.ext` into (`name`, `.ext`). Names without a dot, or whose only
/// dot is the leading one, have an empty extension.
pub fn split_file_name(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(pos) if pos > 0 => file_name.split_at(pos),
        _ => (file_name, ""),
    }
}

/// Resolves a single file name without keeping a [`Resolver`] around.
pub fn resolve_file_name(
    table: &MappingTable,
    language: Language,
    file_name: &str,
) -> Result<Resolution, FallbackError> {
    Resolver::new(table, language).resolve_file_name(file_name)
}
