//! Staff identity model.

use serde::{Deserialize, Serialize};

use super::EmploymentClass;

/// A staff member as read from one document's header row.
///
/// `display_name` is normalization-stable: normalizing it again returns the
/// same text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffIdentity {
    /// Normalized display name.
    pub display_name: String,
    /// Employment class inferred from the raw header cell.
    pub employment_class: EmploymentClass,
}

/// A staff identity bound to the header column it was read from.
///
/// Body cells are mapped to staff by this column index, never by position in
/// a filtered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffColumn {
    /// Column index in the original header row.
    pub column: usize,
    /// The staff member for this column.
    pub identity: StaffIdentity,
}
