//! # Ingredient Name Normalizer
//!
//! Maps raw column and row labels (mixed casing, unit suffixes such as `(g)` or
//! `(pcs)`) to canonical ingredient names. The canonical name is the join key
//! between recipes, shipments and sales-derived usage.
//!
//! The synonym table is declared configuration. Several raw labels may share one
//! canonical name on purpose: the default table folds both `Braised Chicken(g)`
//! and `chicken thigh (pcs)` into `Chicken`, so their usage is summed.
//!
//! Lookup is case-insensitive on the trimmed label, but a miss returns the
//! original label untouched (casing and surrounding whitespace included).

use crate::engine_errors::SynonymTableError;
use log::{debug, trace};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::LazyLock;

/// Raw label → canonical name pairs for the restaurant dataset
pub const DEFAULT_SYNONYMS: &[(&str, &str)] = &[
    ("braised beef used (g)", "Beef"),
    ("braised chicken(g)", "Chicken"),
    ("braised pork(g)", "Pork"),
    ("egg(count)", "Egg"),
    ("rice(g)", "Rice"),
    ("ramen (count)", "Ramen"),
    ("rice noodles(g)", "Rice Noodles"),
    ("chicken thigh (pcs)", "Chicken"),
    ("chicken wings (pcs)", "Chicken Wings"),
    ("flour (g)", "Flour"),
    ("pickle cabbage", "Pickle Cabbage"),
    ("green onion", "Green Onion"),
    ("cilantro", "Cilantro"),
    ("white onion", "White onion"),
    ("peas(g)", "Peas"),
    ("carrot(g)", "Carrot"),
    ("boychoy(g)", "Bokchoy"),
    ("tapioca starch", "Tapioca Starch"),
];

static DEFAULT_TABLE: LazyLock<SynonymTable> = LazyLock::new(SynonymTable::default);

/// Declared synonym table used to canonicalize ingredient labels
#[derive(Debug, Clone, PartialEq)]
pub struct SynonymTable {
    /// Lower-cased, trimmed raw label → canonical name
    entries: HashMap<String, String>,
}

impl SynonymTable {
    /// Build a table from `(raw, canonical)` pairs
    ///
    /// Raw labels are lower-cased and trimmed. The table is rejected when one
    /// label points at two different names, or when a canonical name would be
    /// rewritten by a second pass (normalization must be idempotent).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use inventory_intelligence::normalizer::SynonymTable;
    ///
    /// let table = SynonymTable::new([("Dough (kg)", "Dough")])?;
    /// assert_eq!(table.normalize("dough (KG)"), "Dough");
    /// assert_eq!(table.normalize("Basil"), "Basil");
    /// # Ok::<(), inventory_intelligence::engine_errors::SynonymTableError>(())
    /// ```
    pub fn new<I, K, V>(pairs: I) -> Result<Self, SynonymTableError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut entries: HashMap<String, String> = HashMap::new();

        for (raw, canonical) in pairs {
            let key = lookup_key(raw.as_ref());
            let canonical = canonical.as_ref().to_string();

            if let Some(existing) = entries.get(&key) {
                if *existing != canonical {
                    return Err(SynonymTableError::ConflictingEntry {
                        raw: key,
                        first: existing.clone(),
                        second: canonical,
                    });
                }
                continue;
            }
            entries.insert(key, canonical);
        }

        for canonical in entries.values() {
            if let Some(rewritten) = entries.get(&lookup_key(canonical)) {
                if rewritten != canonical {
                    return Err(SynonymTableError::NotIdempotent {
                        canonical: canonical.clone(),
                        rewritten: rewritten.clone(),
                    });
                }
            }
        }

        debug!("Built synonym table with {} entries", entries.len());
        Ok(Self { entries })
    }

    /// Table with no synonyms: every label passes through unchanged
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Load a table from a JSON object of `"raw label": "Canonical"` pairs
    pub fn from_json_str(json: &str) -> Result<Self, SynonymTableError> {
        let pairs: BTreeMap<String, String> =
            serde_json::from_str(json).map_err(|e| SynonymTableError::Load(e.to_string()))?;
        Self::new(pairs)
    }

    /// Load a table from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self, SynonymTableError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| SynonymTableError::Load(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    /// Canonical name for a raw label
    ///
    /// Total: a label without an entry comes back exactly as given.
    pub fn normalize(&self, raw: &str) -> String {
        match self.entries.get(&lookup_key(raw)) {
            Some(canonical) => {
                trace!("Normalized ingredient '{}' -> '{}'", raw, canonical);
                canonical.clone()
            }
            None => raw.to_string(),
        }
    }

    /// Raw labels (lower-cased) that collapse into the given canonical name
    pub fn synonyms_of(&self, canonical: &str) -> Vec<&str> {
        let mut labels: Vec<&str> = self
            .entries
            .iter()
            .filter(|(_, target)| target.as_str() == canonical)
            .map(|(raw, _)| raw.as_str())
            .collect();
        labels.sort_unstable();
        labels
    }

    /// Number of declared entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table declares no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SynonymTable {
    fn default() -> Self {
        let entries = DEFAULT_SYNONYMS
            .iter()
            .map(|(raw, canonical)| (lookup_key(raw), canonical.to_string()))
            .collect();
        Self { entries }
    }
}

fn lookup_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Normalize a label with the default restaurant table
pub fn normalize_ingredient_name(raw: &str) -> String {
    DEFAULT_TABLE.normalize(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(normalize_ingredient_name("Braised Chicken(g)"), "Chicken");
        assert_eq!(normalize_ingredient_name("  RICE(G) "), "Rice");
        assert_eq!(normalize_ingredient_name("Boychoy(g)"), "Bokchoy");
    }

    #[test]
    fn test_miss_preserves_original_casing() {
        assert_eq!(normalize_ingredient_name("Tomatoes"), "Tomatoes");
        assert_eq!(normalize_ingredient_name(" Olive Oil "), " Olive Oil ");
    }

    #[test]
    fn test_idempotent_on_default_table() {
        for (raw, canonical) in DEFAULT_SYNONYMS {
            let once = normalize_ingredient_name(raw);
            assert_eq!(once, *canonical);
            assert_eq!(normalize_ingredient_name(&once), once);
        }
        for raw in ["White onion", "Dough", "chicken", ""] {
            let once = normalize_ingredient_name(raw);
            assert_eq!(normalize_ingredient_name(&once), once);
        }
    }

    #[test]
    fn test_chicken_collision_is_declared() {
        let table = SynonymTable::default();
        assert_eq!(
            table.synonyms_of("Chicken"),
            vec!["braised chicken(g)", "chicken thigh (pcs)"]
        );
        assert_eq!(table.normalize("Chicken Wings (pcs)"), "Chicken Wings");
    }

    #[test]
    fn test_default_table_passes_validation() {
        let validated = SynonymTable::new(DEFAULT_SYNONYMS.iter().copied()).unwrap();
        assert_eq!(validated, SynonymTable::default());
    }

    #[test]
    fn test_conflicting_entries_rejected() {
        let result = SynonymTable::new([("Dough (kg)", "Dough"), ("dough (KG)", "Pizza Dough")]);
        assert!(matches!(
            result,
            Err(SynonymTableError::ConflictingEntry { .. })
        ));
    }

    #[test]
    fn test_non_idempotent_table_rejected() {
        let result = SynonymTable::new([("tomato (g)", "Tomato"), ("tomato", "Tomatoes")]);
        assert!(matches!(result, Err(SynonymTableError::NotIdempotent { .. })));
    }

    #[test]
    fn test_json_table() {
        let table = SynonymTable::from_json_str(r#"{"Dough (kg)": "Dough"}"#).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.normalize("DOUGH (kg)"), "Dough");

        assert!(matches!(
            SynonymTable::from_json_str("[1, 2]"),
            Err(SynonymTableError::Load(_))
        ));
    }

    #[test]
    fn test_empty_table_is_identity() {
        let table = SynonymTable::empty();
        assert!(table.is_empty());
        assert_eq!(table.normalize("Rice(g)"), "Rice(g)");
    }
}
