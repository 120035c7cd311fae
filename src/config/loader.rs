//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading roster
//! configurations from YAML files.

use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use crate::error::{RosterError, RosterResult};

use super::types::{ExtractionConfig, PolicyConfig, RosterConfig, StoreConfig};

const BUILTIN_EXTRACTION: &str = include_str!("../../config/roster/extraction.yaml");
const BUILTIN_STORES: &str = include_str!("../../config/roster/stores.yaml");
const BUILTIN_POLICY: &str = include_str!("../../config/roster/policy.yaml");

/// Loads and validates roster configuration.
///
/// # Directory Structure
///
/// ```text
/// config/roster/
/// ├── extraction.yaml  # Header keywords, placeholders, tenant code
/// ├── stores.yaml      # Alias table, brand matchers, store ids
/// └── policy.yaml      # Break tiers, payroll, simulation, sales
/// ```
///
/// # Example
///
/// ```no_run
/// use roster_ingest::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/roster")?;
/// println!("Tenant: {}", loader.config().extraction().tenant_code);
/// # Ok::<(), roster_ingest::error::RosterError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: RosterConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - The parsed values violate an invariant (see [`ConfigLoader::validate`])
    pub fn load<P: AsRef<Path>>(path: P) -> RosterResult<Self> {
        let path = path.as_ref();

        let extraction = Self::load_yaml::<ExtractionConfig>(&path.join("extraction.yaml"))?;
        let stores = Self::load_yaml::<StoreConfig>(&path.join("stores.yaml"))?;
        let policy = Self::load_yaml::<PolicyConfig>(&path.join("policy.yaml"))?;

        Self::from_parts(extraction, stores, policy)
    }

    /// Returns the configuration compiled into the binary.
    ///
    /// These are the same files shipped under `config/roster/`.
    pub fn builtin() -> RosterResult<Self> {
        let extraction = Self::parse_yaml::<ExtractionConfig>("extraction.yaml", BUILTIN_EXTRACTION)?;
        let stores = Self::parse_yaml::<StoreConfig>("stores.yaml", BUILTIN_STORES)?;
        let policy = Self::parse_yaml::<PolicyConfig>("policy.yaml", BUILTIN_POLICY)?;

        Self::from_parts(extraction, stores, policy)
    }

    fn from_parts(
        extraction: ExtractionConfig,
        stores: StoreConfig,
        policy: PolicyConfig,
    ) -> RosterResult<Self> {
        let config = RosterConfig::new(extraction, stores, policy);
        Self::validate(&config)?;
        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> RosterResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| RosterError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::parse_yaml(&path_str, &content)
    }

    fn parse_yaml<T: serde::de::DeserializeOwned>(path: &str, content: &str) -> RosterResult<T> {
        serde_yaml::from_str(content).map_err(|e| RosterError::ConfigParseError {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    /// Checks the invariants the pipeline relies on.
    ///
    /// - deduction fractions are non-negative and sum to at most 1, so net
    ///   salary can never go negative
    /// - the simulation variance range is ordered and probabilities lie in [0, 1]
    /// - the employment marker and dash glyph set are non-empty
    /// - the fallback plan month is a calendar month
    /// - store ids are unique and keyed by labels the resolver can produce
    pub fn validate(config: &RosterConfig) -> RosterResult<()> {
        let extraction = config.extraction();
        if extraction.employment_marker.trim().is_empty() {
            return Err(invalid("employment_marker must not be empty"));
        }
        if extraction.dash_glyphs.is_empty() {
            return Err(invalid("dash_glyphs must list at least one character"));
        }
        if !(1..=12).contains(&extraction.fallback.plan_month) {
            return Err(invalid(format!(
                "fallback plan_month {} is not a calendar month",
                extraction.fallback.plan_month
            )));
        }

        validate_store_ids(config.stores())?;

        let policy = config.policy();
        let deductions = &policy.payroll.deductions;
        let fractions = [
            deductions.health_insurance,
            deductions.pension_insurance,
            deductions.employment_insurance,
            deductions.income_tax,
            deductions.resident_tax,
        ];
        if fractions.iter().any(|f| f.is_sign_negative()) {
            return Err(invalid("deduction fractions must be non-negative"));
        }
        if deductions.total() > Decimal::ONE {
            return Err(invalid(format!(
                "deduction fractions sum to {} which exceeds gross salary",
                deductions.total()
            )));
        }
        if policy.payroll.hourly_rate.is_sign_negative() {
            return Err(invalid("hourly_rate must be non-negative"));
        }

        let simulation = &policy.simulation;
        if simulation.variance_minutes.min > simulation.variance_minutes.max {
            return Err(invalid(format!(
                "variance_minutes min {} is greater than max {}",
                simulation.variance_minutes.min, simulation.variance_minutes.max
            )));
        }
        for (name, p) in [
            ("late_probability", simulation.late_probability),
            ("early_leave_probability", simulation.early_leave_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(invalid(format!("{} {} is outside [0, 1]", name, p)));
            }
        }

        let sales = &policy.sales;
        if sales.actual_variance_bp < 0 || sales.plan_ratio_bp < 0 {
            return Err(invalid("sales basis-point spreads must be non-negative"));
        }
        if sales.labor_hourly_rate <= Decimal::ZERO {
            return Err(invalid("labor_hourly_rate must be positive"));
        }

        Ok(())
    }

    /// Returns the underlying roster configuration.
    pub fn config(&self) -> &RosterConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> RosterConfig {
        self.config
    }
}

fn validate_store_ids(stores: &StoreConfig) -> RosterResult<()> {
    let reachable: HashSet<&str> = stores
        .aliases
        .values()
        .map(String::as_str)
        .chain(stores.brand_matchers.iter().map(|m| m.label.as_str()))
        .collect();

    let mut labels: Vec<(&String, &i64)> = stores.store_ids.iter().collect();
    labels.sort();

    let mut owners: BTreeMap<i64, &str> = BTreeMap::new();
    for (label, id) in labels {
        if !reachable.contains(label.as_str()) {
            return Err(invalid(format!(
                "store id {} is keyed by {} which no alias or brand matcher produces",
                id, label
            )));
        }
        if let Some(owner) = owners.insert(*id, label) {
            return Err(invalid(format!(
                "store id {} is shared by {} and {}",
                id, owner, label
            )));
        }
    }
    Ok(())
}

fn invalid(message: impl Into<String>) -> RosterError {
    RosterError::InvalidConfig {
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BreakTier;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/roster"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_load_valid_config() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
    }

    #[test]
    fn test_builtin_matches_shipped_files() {
        let builtin = ConfigLoader::builtin().unwrap();
        let loaded = ConfigLoader::load(config_path()).unwrap();

        assert_eq!(
            builtin.config().extraction().tenant_code,
            loaded.config().extraction().tenant_code
        );
        assert_eq!(
            builtin.config().policy().breaks,
            loaded.config().policy().breaks
        );
    }

    #[test]
    fn test_extraction_settings_loaded() {
        let loader = ConfigLoader::builtin().unwrap();
        let extraction = loader.config().extraction();

        assert_eq!(extraction.tenant_code, "STAND_BANH_MI");
        assert_eq!(extraction.employment_marker, "社員");
        assert!(extraction.skip_keywords.iter().any(|k| k == "日付"));
        assert!(extraction.placeholder_cells.iter().any(|k| k == "/"));
        assert!(extraction.dash_glyphs.contains('〜'));
        assert_eq!(extraction.fallback.store_name, "Unknown");
    }

    #[test]
    fn test_payroll_rates_loaded() {
        let loader = ConfigLoader::builtin().unwrap();
        let payroll = &loader.config().policy().payroll;

        assert_eq!(payroll.hourly_rate, dec("1200"));
        assert_eq!(payroll.overtime_multiplier, dec("1.25"));
        assert_eq!(payroll.commute_per_day, dec("500"));
        assert_eq!(payroll.deductions.total(), dec("0.203"));
    }

    #[test]
    fn test_break_tiers_loaded() {
        let loader = ConfigLoader::builtin().unwrap();
        let breaks = &loader.config().policy().breaks;

        assert_eq!(breaks.len(), 1);
        assert_eq!(breaks[0].over_minutes, 300);
        assert_eq!(breaks[0].break_minutes, 60);
    }

    #[test]
    fn test_store_ids_loaded() {
        let loader = ConfigLoader::builtin().unwrap();
        let store_ids = &loader.config().stores().store_ids;

        assert_eq!(store_ids.get("Stand Banh Mi"), Some(&8));
        assert_eq!(store_ids.get("SHIBUYA"), Some(&10));
        assert_eq!(store_ids.get("Nowhere"), None);
    }

    fn with_store_ids(ids: &[(&str, i64)]) -> RosterConfig {
        let config = ConfigLoader::builtin().unwrap().into_config();
        let mut stores = config.stores().clone();
        stores.store_ids = ids.iter().map(|(label, id)| (label.to_string(), *id)).collect();
        RosterConfig::new(config.extraction().clone(), stores, config.policy().clone())
    }

    #[test]
    fn test_shared_store_id_rejected() {
        let config = with_store_ids(&[("Atelier", 7), ("SHIBUYA", 10), ("Stand Bo Bun", 10)]);

        match ConfigLoader::validate(&config) {
            Err(RosterError::InvalidConfig { message }) => {
                assert_eq!(message, "store id 10 is shared by SHIBUYA and Stand Bo Bun");
            }
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_unreachable_store_id_rejected() {
        let config = with_store_ids(&[("Atelier", 7), ("Tipsy Tiger", 11)]);

        match ConfigLoader::validate(&config) {
            Err(RosterError::InvalidConfig { message }) => {
                assert!(message.contains("Tipsy Tiger"));
            }
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(RosterError::ConfigNotFound { path }) => {
                assert!(path.contains("extraction.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }

    #[test]
    fn test_deductions_over_gross_rejected() {
        let mut config = ConfigLoader::builtin().unwrap().into_config();
        let mut policy = config.policy().clone();
        policy.payroll.deductions.income_tax = dec("0.90");
        config = RosterConfig::new(config.extraction().clone(), config.stores().clone(), policy);

        match ConfigLoader::validate(&config) {
            Err(RosterError::InvalidConfig { message }) => {
                assert!(message.contains("exceeds gross"));
            }
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_inverted_variance_range_rejected() {
        let config = ConfigLoader::builtin().unwrap().into_config();
        let mut policy = config.policy().clone();
        policy.simulation.variance_minutes.min = 20;
        let config = RosterConfig::new(config.extraction().clone(), config.stores().clone(), policy);

        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(RosterError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_break_tiers_sorted_on_construction() {
        let config = ConfigLoader::builtin().unwrap().into_config();
        let mut policy = config.policy().clone();
        policy.breaks = vec![
            BreakTier {
                over_minutes: 480,
                break_minutes: 90,
            },
            BreakTier {
                over_minutes: 300,
                break_minutes: 60,
            },
        ];
        let config = RosterConfig::new(config.extraction().clone(), config.stores().clone(), policy);

        assert_eq!(config.policy().breaks[0].over_minutes, 300);
        assert_eq!(config.policy().breaks[1].over_minutes, 480);
    }
}
