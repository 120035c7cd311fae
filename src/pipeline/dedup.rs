//! Cross-document deduplication.
//!
//! Documents are merged in processing order. The dedup key is
//! `(shift_date, staff_name, start_time, end_time)`; the store is not part of
//! it, so the same person booked for the identical slot at two stores keeps
//! only the first occurrence. That is a business rule (one person cannot
//! work one slot in two places), not an accident of the key.

use std::collections::{BTreeSet, HashSet};

use tracing::{debug, warn};

use crate::models::{ShiftKey, ShiftRecord};
use crate::normalize::{StoreResolution, StoreResolver};

/// The deduplicated, merged shifts of one batch run.
///
/// Records carry their resolved store label in `store_name` and are sorted by
/// `(shift_date, store_name, staff_name)`; ties keep processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalShiftSet {
    records: Vec<ShiftRecord>,
    duplicates_removed: usize,
    unresolved_stores: BTreeSet<String>,
}

impl CanonicalShiftSet {
    /// Builds the canonical set from records in document-processing order.
    ///
    /// The first record seen for a key wins and later ones are counted as
    /// duplicates. Store names the resolver cannot map are kept raw and
    /// reported through [`CanonicalShiftSet::unresolved_stores`].
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use roster_ingest::config::ConfigLoader;
    /// use roster_ingest::models::{EmploymentClass, ShiftRecord};
    /// use roster_ingest::normalize::StoreResolver;
    /// use roster_ingest::pipeline::CanonicalShiftSet;
    ///
    /// let loader = ConfigLoader::builtin().unwrap();
    /// let resolver = StoreResolver::new(loader.config().stores());
    /// let shift = |store: &str| ShiftRecord {
    ///     tenant_code: "STAND_BANH_MI".to_string(),
    ///     store_name: store.to_string(),
    ///     plan_year: 2025,
    ///     plan_month: 10,
    ///     shift_date: NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
    ///     staff_name: "田中".to_string(),
    ///     employment_type: EmploymentClass::Salaried,
    ///     work_location: String::new(),
    ///     start_time: "9:00".to_string(),
    ///     end_time: "13:00".to_string(),
    ///     break_minutes: 0,
    ///     notes: String::new(),
    /// };
    ///
    /// let set = CanonicalShiftSet::build(vec![shift("Atelier"), shift("Stand Banh Mi")], &resolver);
    /// assert_eq!(set.len(), 1);
    /// assert_eq!(set.duplicates_removed(), 1);
    /// assert_eq!(set.records()[0].store_name, "Atelier");
    /// ```
    pub fn build<I>(records: I, resolver: &StoreResolver) -> Self
    where
        I: IntoIterator<Item = ShiftRecord>,
    {
        let mut seen: HashSet<ShiftKey> = HashSet::new();
        let mut kept = Vec::new();
        let mut duplicates_removed = 0;
        let mut unresolved_stores = BTreeSet::new();

        for mut record in records {
            if !seen.insert(record.dedup_key()) {
                duplicates_removed += 1;
                debug!(
                    date = %record.shift_date,
                    staff = %record.staff_name,
                    store = %record.store_name,
                    "Dropping duplicate shift"
                );
                continue;
            }

            match resolver.resolve(&record.store_name, &record.work_location) {
                StoreResolution::Resolved(label) => record.store_name = label,
                StoreResolution::Unresolved(raw) => {
                    if unresolved_stores.insert(raw.clone()) {
                        warn!(store = %raw, "Store name did not resolve to a known label");
                    }
                }
            }
            kept.push(record);
        }

        kept.sort_by(|a, b| {
            (a.shift_date, &a.store_name, &a.staff_name).cmp(&(
                b.shift_date,
                &b.store_name,
                &b.staff_name,
            ))
        });

        Self {
            records: kept,
            duplicates_removed,
            unresolved_stores,
        }
    }

    /// Returns the records in canonical order.
    pub fn records(&self) -> &[ShiftRecord] {
        &self.records
    }

    /// Consumes the set and returns its records.
    pub fn into_records(self) -> Vec<ShiftRecord> {
        self.records
    }

    /// Number of records kept.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no record was kept.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of later occurrences dropped as duplicates.
    pub fn duplicates_removed(&self) -> usize {
        self.duplicates_removed
    }

    /// Raw store names that no alias or brand rule matched.
    pub fn unresolved_stores(&self) -> &BTreeSet<String> {
        &self.unresolved_stores
    }
}
