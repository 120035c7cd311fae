//! Deduplication and aggregation pipeline.
//!
//! Extracted shift records from every document are merged into a
//! [`CanonicalShiftSet`] and exported as CSV. The synthetic-data side of the
//! pipeline derives work hours, payroll and sales estimates from a canonical
//! set, drawing all randomness from an injectable [`VarianceSource`].

mod dedup;
pub mod export;
mod payroll;
mod sales;
mod staff_directory;
mod synthetic;
mod variance;
mod work_hours;

pub use dedup::CanonicalShiftSet;
pub use synthetic::{
    DerivedDatasets, PAYROLL_AUDIT_FILE, PAYROLL_FILE, SALES_ACTUAL_FILE, SALES_FORECAST_FILE,
    WORK_HOURS_FILE,
};
pub use export::{
    SHIFT_CSV_HEADERS, canonical_rows, read_shift_csv, write_canonical_csv, write_raw_csv,
};
pub use payroll::{
    MonthlyHours, PAYMENT_STATUS_PAID, aggregate_monthly_hours, calculate_payroll,
    generate_payroll, truncate_yen,
};
pub use sales::{StoreMonth, count_store_months, days_in_month, estimate_sales};
pub use staff_directory::StaffDirectory;
pub use variance::{FixedVariance, ScriptedVariance, SeededVariance, VarianceSource};
pub use work_hours::{NOTE_EARLY_LEAVE, NOTE_LATE, simulate_work_hours};
