//! Staff name to staff id lookup for derived datasets.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{RosterError, RosterResult};
use crate::normalize::normalize_staff_name;

#[derive(Debug, Deserialize)]
struct DirectoryRow {
    staff_name: String,
    staff_id: String,
}

/// Maps normalized staff names to the ids of the staff master.
///
/// Names are normalized with the same rules as roster headers, so a
/// directory entry written with full-width glyphs still matches.
#[derive(Debug, Clone, Default)]
pub struct StaffDirectory {
    ids: HashMap<String, String>,
    misses: BTreeSet<String>,
}

impl StaffDirectory {
    /// An empty directory: every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a directory from `(name, id)` pairs.
    pub fn from_pairs<I, N, S>(pairs: I, marker: &str) -> Self
    where
        I: IntoIterator<Item = (N, S)>,
        N: AsRef<str>,
        S: Into<String>,
    {
        let ids = pairs
            .into_iter()
            .map(|(name, id)| (normalize_staff_name(name.as_ref(), marker), id.into()))
            .collect();
        Self {
            ids,
            misses: BTreeSet::new(),
        }
    }

    /// Loads a `staff_name,staff_id` CSV.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::InputNotFound`] for a missing file and
    /// [`RosterError::Csv`] for a malformed one.
    pub fn load(path: &Path, marker: &str) -> RosterResult<Self> {
        if !path.exists() {
            return Err(RosterError::InputNotFound {
                path: path.display().to_string(),
            });
        }
        let csv_error = |e: csv::Error| RosterError::Csv {
            path: path.display().to_string(),
            message: e.to_string(),
        };

        let mut reader = csv::Reader::from_path(path).map_err(csv_error)?;
        let rows: Vec<DirectoryRow> = reader
            .deserialize()
            .collect::<Result<_, _>>()
            .map_err(csv_error)?;

        info!(path = %path.display(), entries = rows.len(), "Loaded staff directory");
        Ok(Self::from_pairs(
            rows.into_iter().map(|row| (row.staff_name, row.staff_id)),
            marker,
        ))
    }

    /// Looks up the id for `staff_name`, warning once per unknown name.
    pub fn lookup(&mut self, staff_name: &str) -> Option<String> {
        if let Some(id) = self.ids.get(staff_name) {
            return Some(id.clone());
        }
        if !self.is_empty() && self.misses.insert(staff_name.to_string()) {
            warn!(staff = %staff_name, "Staff name not found in staff directory");
        }
        None
    }

    /// Names looked up without a match.
    pub fn misses(&self) -> &BTreeSet<String> {
        &self.misses
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if the directory has no entries.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
