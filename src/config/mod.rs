//! Configuration loading and management for roster ingestion.
//!
//! This module loads extraction settings, store resolution tables and
//! business policy (breaks, payroll, synthetic variance, sales estimates)
//! from YAML files.
//!
//! # Example
//!
//! ```
//! use roster_ingest::config::ConfigLoader;
//!
//! let config = ConfigLoader::builtin().unwrap();
//! println!("Tenant: {}", config.config().extraction().tenant_code);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    BrandMatcher, BreakTier, DeductionRates, ExtractionConfig, FallbackPlan, MinuteRange,
    PayrollConfig, PolicyConfig, RosterConfig, SalesConfig, SimulationConfig, StoreConfig,
};
