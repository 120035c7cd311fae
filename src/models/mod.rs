//! Data models for roster ingestion.
//!
//! Shift records and staff identities come out of the table extractor;
//! work-hours, payroll and sales records are derived from the canonical shift
//! set by the synthetic-data pipeline.

mod document;
mod payroll;
mod sales;
mod shift;
mod staff;
mod work_hours;

pub use document::DocumentMeta;
pub use payroll::{AuditStep, PayrollRecord, PayrollStatement};
pub use sales::{SalesActual, SalesForecast};
pub use shift::{EmploymentClass, ShiftKey, ShiftRecord};
pub use staff::{StaffColumn, StaffIdentity};
pub use work_hours::WorkHoursRecord;
