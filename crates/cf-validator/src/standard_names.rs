//! CF standard-name table, a bounded table cache and report suggestions.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;

use lru::LruCache;
use nc_common::LabeledDataset;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use crate::error::ValidatorResult;
use crate::report::{Report, UnitsCheck, UnitsStatus, VariableSuggestion};

/// Default number of parsed tables kept by [`StandardNameCache`].
pub const DEFAULT_TABLE_CACHE_CAPACITY: usize = 8;

/// Maximum number of suggested standard names per variable.
pub const MAX_CANDIDATES: usize = 3;

/// Candidates scoring below this are dropped.
pub const MIN_CANDIDATE_SCORE: f64 = 0.4;

const NAME_MATCH_BONUS: f64 = 0.2;
const DOMAIN_BONUS: f64 = 0.3;

const SYNONYMS: &[(&str, &str)] = &[("ocean", "sea"), ("sea", "ocean"), ("temp", "temperature")];

const DOMAIN_KEYWORDS: &[(&str, &[&str])] = &[
    ("ocean", &["sea", "ocean", "salinity", "marine", "sea_water"]),
    ("atmosphere", &["air", "atmosphere", "aerosol", "cloud", "wind"]),
    ("land", &["soil", "land", "terrestrial", "vegetation", "canopy"]),
    ("cryosphere", &["ice", "snow", "glacier", "sea_ice"]),
    ("biogeochemistry", &["ph", "alkalinity", "nitrate", "oxygen", "chlorophyll"]),
];

const UNIT_SYNONYMS: &[(&str, &[&str])] = &[
    ("k", &["kelvin"]),
    ("kelvin", &["k"]),
    ("degrees_celsius", &["celsius", "degc", "degree_celsius"]),
    ("celsius", &["degrees_celsius", "degc", "degree_celsius"]),
    ("1", &["1.0", "dimensionless"]),
];

/// One standard name and its canonical units (empty when the table has none).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardNameEntry {
    pub name: String,
    pub canonical_units: String,
}

/// Source of standard names and their canonical units.
pub trait StandardNameTable {
    /// Canonical units for `name`, or `None` if the name is unknown.
    fn lookup(&self, name: &str) -> Option<&str>;

    /// Every entry, sorted by name.
    fn entries(&self) -> &[StandardNameEntry];
}

/// Table parsed from the CF standard-name XML document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlStandardNameTable {
    entries: Vec<StandardNameEntry>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Field {
    CanonicalUnits,
    EntryId,
}

enum Element {
    Entry { id: String, units: String },
    Alias { id: String, entry_id: String },
}

fn id_attr(e: &BytesStart<'_>) -> ValidatorResult<Option<String>> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == b"id" {
            let id = attr.unescape_value()?.trim().to_string();
            return Ok(Some(id).filter(|id| !id.is_empty()));
        }
    }
    Ok(None)
}

impl XmlStandardNameTable {
    /// Parse the XML text of a standard-name table.
    ///
    /// `<entry id>` elements contribute their `<canonical_units>`. An
    /// `<alias id>` takes the units of the entry named by its `<entry_id>`
    /// and is dropped when that entry does not exist.
    pub fn parse(xml: &str) -> ValidatorResult<Self> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut buf = Vec::new();
        let mut units_by_name: BTreeMap<String, String> = BTreeMap::new();
        let mut aliases: Vec<(String, String)> = Vec::new();
        let mut current: Option<Element> = None;
        let mut field: Option<Field> = None;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => match e.name().as_ref() {
                    b"entry" => {
                        current = id_attr(&e)?.map(|id| Element::Entry {
                            id,
                            units: String::new(),
                        });
                    }
                    b"alias" => {
                        current = id_attr(&e)?.map(|id| Element::Alias {
                            id,
                            entry_id: String::new(),
                        });
                    }
                    b"canonical_units" => field = Some(Field::CanonicalUnits),
                    b"entry_id" => field = Some(Field::EntryId),
                    _ => {}
                },
                Event::Empty(e) => {
                    if e.name().as_ref() == b"entry" {
                        if let Some(id) = id_attr(&e)? {
                            units_by_name.insert(id, String::new());
                        }
                    }
                }
                Event::Text(t) => {
                    let text = t.unescape()?;
                    match (&mut current, field) {
                        (Some(Element::Entry { units, .. }), Some(Field::CanonicalUnits)) => {
                            units.push_str(&text)
                        }
                        (Some(Element::Alias { entry_id, .. }), Some(Field::EntryId)) => {
                            entry_id.push_str(&text)
                        }
                        _ => {}
                    }
                }
                Event::End(e) => match e.name().as_ref() {
                    b"canonical_units" | b"entry_id" => field = None,
                    b"entry" | b"alias" => match current.take() {
                        Some(Element::Entry { id, units }) => {
                            units_by_name.insert(id, units.trim().to_string());
                        }
                        Some(Element::Alias { id, entry_id }) => {
                            aliases.push((id, entry_id.trim().to_string()));
                        }
                        None => {}
                    },
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        for (alias, entry_id) in aliases {
            if let Some(units) = units_by_name.get(&entry_id).cloned() {
                units_by_name.insert(alias, units);
            }
        }

        debug!(entries = units_by_name.len(), "Parsed standard-name table");
        Ok(Self {
            entries: units_by_name
                .into_iter()
                .map(|(name, canonical_units)| StandardNameEntry {
                    name,
                    canonical_units,
                })
                .collect(),
        })
    }

    /// Read and parse a table from a local file.
    pub fn load(path: &Path) -> ValidatorResult<Self> {
        let xml = std::fs::read_to_string(path)?;
        Self::parse(&xml)
    }

    /// Build a table from in-memory entries.
    pub fn from_entries(entries: impl IntoIterator<Item = StandardNameEntry>) -> Self {
        let mut entries: Vec<StandardNameEntry> = entries.into_iter().collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries.dedup_by(|a, b| a.name == b.name);
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StandardNameTable for XmlStandardNameTable {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.entries
            .binary_search_by(|entry| entry.name.as_str().cmp(name))
            .ok()
            .map(|i| self.entries[i].canonical_units.as_str())
    }

    fn entries(&self) -> &[StandardNameEntry] {
        &self.entries
    }
}

/// Hit/miss counters for [`StandardNameCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
    pub evictions: u64,
}

impl CacheStats {
    /// Fraction of lookups served from the cache (0.0 - 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Caller-owned LRU of parsed tables keyed by their source string.
///
/// Failed loads are not cached.
pub struct StandardNameCache {
    cache: LruCache<String, Arc<XmlStandardNameTable>>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl Default for StandardNameCache {
    fn default() -> Self {
        Self::new(DEFAULT_TABLE_CACHE_CAPACITY)
    }
}

impl StandardNameCache {
    /// Create a cache holding at most `capacity` tables (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)),
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Return the cached table for `source`, loading it on a miss.
    pub fn get_or_load<F>(&mut self, source: &str, loader: F) -> ValidatorResult<Arc<XmlStandardNameTable>>
    where
        F: FnOnce(&str) -> ValidatorResult<XmlStandardNameTable>,
    {
        if let Some(table) = self.cache.get(source) {
            self.hits += 1;
            return Ok(Arc::clone(table));
        }
        self.misses += 1;

        let table = Arc::new(loader(source)?);
        if let Some((evicted, _)) = self.cache.push(source.to_string(), Arc::clone(&table)) {
            if evicted != source {
                self.evictions += 1;
                debug!(source = %evicted, "Evicted standard-name table");
            }
        }
        Ok(table)
    }

    /// Load a table file through the cache, keyed by its path.
    pub fn load_path(&mut self, path: &Path) -> ValidatorResult<Arc<XmlStandardNameTable>> {
        let source = path.display().to_string();
        self.get_or_load(&source, |_| XmlStandardNameTable::load(path))
    }

    /// Drop the table cached for `source`. Returns whether one was present.
    pub fn invalidate(&mut self, source: &str) -> bool {
        self.cache.pop(source).is_some()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.cache.len(),
            evictions: self.evictions,
        }
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

/// Standard-name table state for one compliance run.
#[derive(Clone, Copy)]
pub enum StandardNames<'a> {
    /// No table configured; no suggestions are made.
    Disabled,
    Table(&'a dyn StandardNameTable),
    /// The table could not be loaded; only a note is recorded.
    Unavailable { source: &'a str, reason: &'a str },
}

impl<'a> StandardNames<'a> {
    pub fn is_disabled(&self) -> bool {
        matches!(self, StandardNames::Disabled)
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Lower-cased alphanumeric tokens of `text`, expanded with synonyms.
pub fn tokenize(text: &str) -> BTreeSet<String> {
    let normalized = normalize(text);
    let mut tokens: BTreeSet<String> = normalized
        .split(|c: char| !(c.is_ascii_lowercase() || c.is_ascii_digit()))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    let synonyms: Vec<String> = tokens
        .iter()
        .filter_map(|t| SYNONYMS.iter().find(|(word, _)| *word == t.as_str()))
        .map(|(_, synonym)| synonym.to_string())
        .collect();
    tokens.extend(synonyms);
    tokens
}

fn domain_keywords(domain: Option<&str>) -> &'static [&'static str] {
    let Some(domain) = domain.map(normalize) else {
        return &[];
    };
    DOMAIN_KEYWORDS
        .iter()
        .find(|(name, _)| *name == domain)
        .map(|(_, keywords)| *keywords)
        .unwrap_or(&[])
}

/// Whether `actual` units are equivalent to `expected`.
pub fn units_compatible(actual: &str, expected: &str) -> bool {
    let a = normalize(actual);
    let e = normalize(expected);
    if a == e {
        return true;
    }
    let related = |from: &str, to: &str| {
        UNIT_SYNONYMS
            .iter()
            .any(|(unit, synonyms)| *unit == from && synonyms.contains(&to))
    };
    related(e.as_str(), a.as_str()) || related(a.as_str(), e.as_str())
}

/// Best-scoring table entries for a variable without a `standard_name`.
pub fn best_candidates<'t>(
    var_name: &str,
    long_name: Option<&str>,
    entries: &'t [StandardNameEntry],
    domain: Option<&str>,
) -> Vec<&'t StandardNameEntry> {
    let mut query = tokenize(var_name);
    if let Some(long_name) = long_name.filter(|s| !s.is_empty()) {
        query.extend(tokenize(long_name));
    }
    if query.is_empty() {
        return Vec::new();
    }
    let keywords = domain_keywords(domain);

    let mut scored: Vec<(f64, &StandardNameEntry)> = Vec::new();
    for entry in entries {
        let tokens = tokenize(&entry.name);
        if tokens.is_empty() {
            continue;
        }
        let overlap = tokens.intersection(&query).count();
        if overlap == 0 {
            continue;
        }
        let mut score = overlap as f64 / tokens.len() as f64;
        if var_name.contains(entry.name.as_str()) {
            score += NAME_MATCH_BONUS;
        }
        if tokens.iter().any(|t| keywords.contains(&t.as_str())) {
            score += DOMAIN_BONUS;
        }
        scored.push((score, entry));
    }

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    scored
        .into_iter()
        .take(MAX_CANDIDATES)
        .filter(|(score, _)| *score >= MIN_CANDIDATE_SCORE)
        .map(|(_, entry)| entry)
        .collect()
}

fn non_empty(units: &str) -> Option<String> {
    Some(units.to_string()).filter(|u| !u.is_empty())
}

/// Add standard-name suggestions for each data variable to `report`.
///
/// A table that failed to load only adds a note.
pub fn augment_with_suggestions(
    ds: &LabeledDataset,
    report: &mut Report,
    names: &StandardNames<'_>,
    domain: Option<&str>,
) {
    let table = match names {
        StandardNames::Disabled => return,
        StandardNames::Unavailable { source, reason } => {
            report.notes.push(format!(
                "Could not read CF standard-name table '{source}': {reason}"
            ));
            return;
        }
        StandardNames::Table(table) => *table,
    };

    for var in ds.data_vars() {
        let suggestion = match var.attrs.get("standard_name") {
            None => {
                let candidates =
                    best_candidates(&var.name, var.attr_str("long_name"), table.entries(), domain);
                let Some(first) = candidates.first() else {
                    continue;
                };
                VariableSuggestion::Candidates {
                    recommended_standard_names: candidates.iter().map(|e| e.name.clone()).collect(),
                    recommended_units: non_empty(&first.canonical_units),
                    domain: domain.map(str::to_string),
                }
            }
            Some(standard_name) => {
                let standard_name = standard_name.to_string();
                let Some(expected) = table.lookup(&standard_name) else {
                    report.suggestions.variables.insert(
                        var.name.clone(),
                        VariableSuggestion::UnknownStandardName {
                            unknown_standard_name: standard_name,
                        },
                    );
                    continue;
                };
                match var.attrs.get("units").map(|u| u.to_string()) {
                    None => VariableSuggestion::Units {
                        units_check: UnitsCheck {
                            status: UnitsStatus::Missing,
                            current_units: None,
                            expected_units: non_empty(expected),
                        },
                    },
                    Some(units) if !expected.is_empty() && !units_compatible(&units, expected) => {
                        VariableSuggestion::Units {
                            units_check: UnitsCheck {
                                status: UnitsStatus::Mismatch,
                                current_units: Some(units),
                                expected_units: Some(expected.to_string()),
                            },
                        }
                    }
                    Some(_) => continue,
                }
            }
        };
        report.suggestions.variables.insert(var.name.clone(), suggestion);
    }
}
