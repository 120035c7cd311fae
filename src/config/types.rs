//! Configuration types for roster ingestion.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

/// Plan period and store used when a document filename carries no metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct FallbackPlan {
    /// Plan year.
    pub plan_year: i32,
    /// Plan month (1-12).
    pub plan_month: u32,
    /// Store name.
    pub store_name: String,
}

/// Table extraction settings from extraction.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
    /// Tenant code written on every extracted record.
    pub tenant_code: String,
    /// Header token marking a salaried staff member (e.g. "社員").
    pub employment_marker: String,
    /// Header cells containing any of these are not staff columns.
    pub skip_keywords: Vec<String>,
    /// Body cell contents that mean "no shift".
    pub placeholder_cells: Vec<String>,
    /// Characters accepted between the start and end of a time range.
    pub dash_glyphs: String,
    /// Metadata used for non-conforming filenames.
    pub fallback: FallbackPlan,
}

/// An ordered brand-substring rule.
#[derive(Debug, Clone, Deserialize)]
pub struct BrandMatcher {
    /// Canonical store label produced by this rule.
    pub label: String,
    /// Substrings that select this rule.
    pub patterns: Vec<String>,
    /// Compare case-insensitively.
    #[serde(default)]
    pub ignore_case: bool,
}

/// Store resolution settings from stores.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Work-location values that mean "no override".
    #[serde(default)]
    pub placeholder_locations: Vec<String>,
    /// Exact work-location → store label table.
    #[serde(default)]
    pub aliases: HashMap<String, String>,
    /// Brand matchers, tried in order against the raw store name.
    #[serde(default)]
    pub brand_matchers: Vec<BrandMatcher>,
    /// Store label → store id.
    #[serde(default)]
    pub store_ids: HashMap<String, i64>,
}

/// One break-policy tier: shifts longer than `over_minutes` get `break_minutes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BreakTier {
    /// Exclusive duration threshold in minutes.
    pub over_minutes: u32,
    /// Break granted above the threshold.
    pub break_minutes: u32,
}

/// Statutory deduction fractions of gross salary.
#[derive(Debug, Clone, Deserialize)]
pub struct DeductionRates {
    /// Health insurance.
    pub health_insurance: Decimal,
    /// Pension insurance.
    pub pension_insurance: Decimal,
    /// Employment insurance.
    pub employment_insurance: Decimal,
    /// Income tax.
    pub income_tax: Decimal,
    /// Resident tax.
    pub resident_tax: Decimal,
}

impl DeductionRates {
    /// Sum of every deduction fraction.
    pub fn total(&self) -> Decimal {
        self.health_insurance
            + self.pension_insurance
            + self.employment_insurance
            + self.income_tax
            + self.resident_tax
    }
}

/// Fixed-rate payroll parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct PayrollConfig {
    /// Hourly rate applied to every staff member.
    pub hourly_rate: Decimal,
    /// Overtime multiplier on the hourly rate.
    pub overtime_multiplier: Decimal,
    /// Flat commute allowance per day worked.
    pub commute_per_day: Decimal,
    /// Flat other allowances per payslip.
    pub other_allowances: Decimal,
    /// Day of the month salaries are paid.
    pub payment_day: u32,
    /// Statutory deductions.
    pub deductions: DeductionRates,
}

/// Inclusive integer range.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MinuteRange {
    /// Lower bound.
    pub min: i32,
    /// Upper bound.
    pub max: i32,
}

/// Parameters of the synthetic actual-vs-scheduled generator.
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    /// Range of the minute offset applied to each shift.
    pub variance_minutes: MinuteRange,
    /// Offsets below this value may be flagged late or early.
    pub lateness_threshold_minutes: i32,
    /// Probability of a late flag.
    pub late_probability: f64,
    /// Probability of an early-leave flag.
    pub early_leave_probability: f64,
}

/// Parameters of the sales estimate derived from shift counts.
#[derive(Debug, Clone, Deserialize)]
pub struct SalesConfig {
    /// Assumed hours per shift.
    pub hours_per_shift: Decimal,
    /// Assumed sales per store hour.
    pub sales_per_hour: Decimal,
    /// Actual-vs-estimate spread in basis points (±).
    pub actual_variance_bp: i32,
    /// Plan-ratio note spread in basis points (±).
    pub plan_ratio_bp: i32,
    /// Forecast as a fraction of actual sales.
    pub forecast_ratio: Decimal,
    /// Target labor cost as a fraction of forecast sales.
    pub labor_cost_ratio: Decimal,
    /// Hourly rate used to convert labor cost to hours.
    pub labor_hourly_rate: Decimal,
}

/// Business policy from policy.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyConfig {
    /// Break tiers.
    pub breaks: Vec<BreakTier>,
    /// Payroll rates.
    pub payroll: PayrollConfig,
    /// Synthetic variance.
    pub simulation: SimulationConfig,
    /// Sales estimation.
    pub sales: SalesConfig,
}

/// The complete roster configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct RosterConfig {
    extraction: ExtractionConfig,
    stores: StoreConfig,
    policy: PolicyConfig,
}

impl RosterConfig {
    /// Creates a new RosterConfig from its component parts.
    ///
    /// Break tiers are sorted by threshold so lookups can scan from the top.
    pub fn new(extraction: ExtractionConfig, stores: StoreConfig, policy: PolicyConfig) -> Self {
        let mut policy = policy;
        policy.breaks.sort_by_key(|tier| tier.over_minutes);
        Self {
            extraction,
            stores,
            policy,
        }
    }

    /// Returns the extraction settings.
    pub fn extraction(&self) -> &ExtractionConfig {
        &self.extraction
    }

    /// Returns the store resolution settings.
    pub fn stores(&self) -> &StoreConfig {
        &self.stores
    }

    /// Returns the business policy.
    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }
}
