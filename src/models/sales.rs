//! Synthetic store sales records.

use serde::{Deserialize, Serialize};

/// Estimated actual sales for one store and month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesActual {
    /// Identifier of the form `SA<yyyymm>_<nn>`.
    pub actual_id: String,
    /// Year.
    pub year: i32,
    /// Month.
    pub month: u32,
    /// Store id from the store table, empty if the label is unknown.
    pub store_id: Option<i64>,
    /// Resolved store label the figures were aggregated under.
    pub store_name: String,
    /// Estimated sales with simulated variance, truncated.
    pub actual_sales: i64,
    /// `actual_sales` divided by the days in the month, truncated.
    pub daily_average: i64,
    /// Simulated plan comparison, e.g. `plan +2.5%`.
    pub notes: String,
}

/// Sales forecast and labor requirement for one store and month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesForecast {
    /// Identifier of the form `SF<yyyymm>_<nn>`.
    pub forecast_id: String,
    /// Year.
    pub year: i32,
    /// Month.
    pub month: u32,
    /// Store id from the store table, empty if the label is unknown.
    pub store_id: Option<i64>,
    /// Resolved store label the figures were aggregated under.
    pub store_name: String,
    /// Forecast sales, truncated.
    pub forecasted_sales: i64,
    /// Labor budget for the forecast, truncated.
    pub required_labor_cost: i64,
    /// Labor budget divided by the labor hourly rate, truncated.
    pub required_hours: i64,
    /// Free-form notes.
    pub notes: String,
}
