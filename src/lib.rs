//! Shift-roster ingestion.
//!
//! This crate reads monthly shift rosters (PDF exports or CSV/TSV grids),
//! extracts one record per worked time range, deduplicates shifts across
//! documents and writes a canonical CSV. From a canonical CSV it can also
//! derive synthetic work-hours, payroll and sales datasets.
//!
//! # Example
//!
//! ```
//! use roster_ingest::config::ConfigLoader;
//! use roster_ingest::extract::{Grid, TableExtractor};
//! use roster_ingest::models::DocumentMeta;
//!
//! let config = ConfigLoader::builtin().unwrap().into_config();
//! let extractor = TableExtractor::new(&config).unwrap();
//! let meta = DocumentMeta::from_stem(
//!     "ROSTER_20251001-20251031_Stand+Banh+Mi",
//!     &config.extraction().fallback,
//! );
//!
//! let grid = Grid::new(vec![
//!     vec!["日付".into(), "田中(社員)".into()],
//!     vec!["10/1(水)".into(), "渋谷9:00〜13:00".into()],
//! ]);
//! let records = extractor.extract_grid(&grid, &meta);
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].work_location, "渋谷");
//! ```

#![warn(missing_docs)]

pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod normalize;
pub mod pipeline;
