//! Store label resolution.
//!
//! A shift's store comes from two places: the store token in the document
//! filename and, optionally, a work-location prefix inside the shift cell
//! (a staff member covering another branch). Resolution is a best-effort
//! heuristic, not a guaranteed mapping, so the result is tagged and callers
//! surface [`StoreResolution::Unresolved`] values to the operator instead of
//! silently accepting them.

use std::collections::HashMap;

use unicode_normalization::UnicodeNormalization;

use crate::config::{BrandMatcher, StoreConfig};

/// Outcome of resolving a store label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StoreResolution {
    /// A canonical store label was found.
    Resolved(String),
    /// No rule matched; carries the raw store name unchanged.
    Unresolved(String),
}

impl StoreResolution {
    /// Returns the canonical label, or the raw input when unresolved.
    pub fn label(&self) -> &str {
        match self {
            StoreResolution::Resolved(label) | StoreResolution::Unresolved(label) => label,
        }
    }

    /// Returns true if a rule matched.
    pub fn is_resolved(&self) -> bool {
        matches!(self, StoreResolution::Resolved(_))
    }
}

/// Prioritized store resolver: exact alias table, then ordered brand matchers.
///
/// # Example
///
/// ```
/// use roster_ingest::config::ConfigLoader;
/// use roster_ingest::normalize::{StoreResolution, StoreResolver};
///
/// let loader = ConfigLoader::builtin().unwrap();
/// let resolver = StoreResolver::new(loader.config().stores());
///
/// assert_eq!(
///     resolver.resolve("Stand Banh Mi", "渋谷"),
///     StoreResolution::Resolved("SHIBUYA".to_string())
/// );
/// assert_eq!(
///     resolver.resolve("Stand Banh Mi", ""),
///     StoreResolution::Resolved("Stand Banh Mi".to_string())
/// );
/// assert!(!resolver.resolve("Pop-up Kitchen", "").is_resolved());
/// ```
#[derive(Debug, Clone)]
pub struct StoreResolver {
    placeholders: Vec<String>,
    aliases: HashMap<String, String>,
    folded_aliases: HashMap<String, String>,
    matchers: Vec<BrandMatcher>,
}

impl StoreResolver {
    /// Builds a resolver from the stores.yaml section.
    pub fn new(config: &StoreConfig) -> Self {
        let folded_aliases = config
            .aliases
            .iter()
            .map(|(alias, label)| (fold(alias), label.clone()))
            .collect();

        Self {
            placeholders: config.placeholder_locations.clone(),
            aliases: config.aliases.clone(),
            folded_aliases,
            matchers: config.brand_matchers.clone(),
        }
    }

    /// Resolves the display label for a shift.
    ///
    /// 1. A non-placeholder `work_location` is looked up in the alias table,
    ///    first verbatim and then after NFKC folding (so radical and
    ///    compatibility glyph variants of a place name meet).
    /// 2. On a miss, brand matchers are tried in order against `store_name_raw`.
    /// 3. Otherwise the raw store name is returned as `Unresolved`.
    pub fn resolve(&self, store_name_raw: &str, work_location: &str) -> StoreResolution {
        let location = work_location.trim();
        if !location.is_empty() && !self.placeholders.iter().any(|p| p == location) {
            if let Some(label) = self
                .aliases
                .get(location)
                .or_else(|| self.folded_aliases.get(&fold(location)))
            {
                return StoreResolution::Resolved(label.clone());
            }
        }

        self.match_brand(store_name_raw)
            .map(|label| StoreResolution::Resolved(label.to_string()))
            .unwrap_or_else(|| StoreResolution::Unresolved(store_name_raw.to_string()))
    }

    fn match_brand(&self, store_name_raw: &str) -> Option<&str> {
        let lowered = store_name_raw.to_lowercase();
        self.matchers
            .iter()
            .find(|matcher| {
                matcher.patterns.iter().any(|pattern| {
                    if matcher.ignore_case {
                        lowered.contains(&pattern.to_lowercase())
                    } else {
                        store_name_raw.contains(pattern.as_str())
                    }
                })
            })
            .map(|matcher| matcher.label.as_str())
    }
}

fn fold(text: &str) -> String {
    text.nfkc().collect()
}
