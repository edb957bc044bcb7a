use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;

use crate::{error::MappingError, language::Language};

/// Where the textures of one destination file come from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MappingEntry {
    /// Source base file name (no extension) per language variant.
    pub languages: BTreeMap<Language, String>,
    /// Never copy anything matching this entry, whatever the language.
    pub skip: bool,
    pub label: Option<String>,
}

/// One entry as it appears in the mapping file. Unknown keys are ignored.
#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    skip: bool,
    #[serde(rename = "EN", default)]
    en: Option<String>,
    #[serde(rename = "ES", default)]
    es: Option<String>,
    #[serde(rename = "FR", default)]
    fr: Option<String>,
    #[serde(rename = "DE", default)]
    de: Option<String>,
    #[serde(rename = "IT", default)]
    it: Option<String>,
}

impl From<RawEntry> for MappingEntry {
    fn from(raw: RawEntry) -> Self {
        let languages = [
            (Language::English, raw.en),
            (Language::Spanish, raw.es),
            (Language::French, raw.fr),
            (Language::German, raw.de),
            (Language::Italian, raw.it),
        ]
        .into_iter()
        .filter_map(|(lang, name)| name.map(|name| (lang, name)))
        .collect();

        Self {
            languages,
            skip: raw.skip,
            label: raw.label,
        }
    }
}

/// The pair that claims a source base file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Claim {
    pub destination: String,
    pub language: Language,
}

/// A source base file name claimed by more than one (entry, language) pair.
/// Only the first claim is ever used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ambiguity {
    pub name: String,
    pub claims: Vec<Claim>,
}

/// A successful inverse lookup.
#[derive(Debug, Clone, Copy)]
pub struct MappingMatch<'table> {
    pub destination: &'table str,
    pub language: Language,
    pub entry: &'table MappingEntry,
}

/// Destination identifier to [`MappingEntry`], queried by source base file name.
///
/// Entries are scanned by destination identifier in lexicographic order, then
/// by language in [`Language`] declaration order. When a source name is
/// claimed more than once, the first pair in that order wins. The inverse
/// index is built once at construction and encodes that rule.
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    entries: BTreeMap<String, MappingEntry>,
    index: HashMap<String, Claim>,
    ambiguities: Vec<Ambiguity>,
}

impl MappingTable {
    pub fn new(entries: BTreeMap<String, MappingEntry>) -> Self {
        let mut index: HashMap<String, Claim> = HashMap::new();
        let mut repeated: BTreeMap<String, Vec<Claim>> = BTreeMap::new();

        for (destination, entry) in &entries {
            for (language, name) in &entry.languages {
                let claim = Claim {
                    destination: destination.clone(),
                    language: *language,
                };
                match index.get(name) {
                    Some(first) => repeated
                        .entry(name.clone())
                        .or_insert_with(|| vec![first.clone()])
                        .push(claim),
                    None => {
                        index.insert(name.clone(), claim);
                    }
                }
            }
        }

        let ambiguities = repeated
            .into_iter()
            .map(|(name, claims)| Ambiguity { name, claims })
            .collect();

        Self {
            entries,
            index,
            ambiguities,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, MappingError> {
        let raw: BTreeMap<String, RawEntry> = serde_json::from_str(json)?;
        Ok(Self::new(
            raw.into_iter()
                .map(|(destination, entry)| (destination, entry.into()))
                .collect(),
        ))
    }

    /// Loads a JSON mapping file and warns about every ambiguous source name.
    pub fn load(path: impl AsRef<Utf8Path>) -> Result<Self, MappingError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path.as_std_path()).map_err(|source| {
            MappingError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let table = Self::from_json_str(&contents)?;
        tracing::info!("loaded {} mapping entries from {}", table.len(), path);
        for ambiguity in table.ambiguities() {
            let first = &ambiguity.claims[0];
            tracing::warn!(
                "'{}' is mapped {} times, using {} ({})",
                ambiguity.name,
                ambiguity.claims.len(),
                first.destination,
                first.language
            );
        }

        Ok(table)
    }

    /// Finds the first pair whose source name equals `base_name`.
    pub fn lookup(&self, base_name: &str) -> Option<MappingMatch<'_>> {
        let claim = self.index.get(base_name)?;
        let (destination, entry) = self.entries.get_key_value(&claim.destination)?;
        Some(MappingMatch {
            destination,
            language: claim.language,
            entry,
        })
    }

    pub fn get(&self, destination: &str) -> Option<&MappingEntry> {
        self.entries.get(destination)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &MappingEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn ambiguities(&self) -> &[Ambiguity] {
        &self.ambiguities
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
