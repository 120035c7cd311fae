//! Table extraction: from documents to shift records.
//!
//! A [`TableSource`] produces table grids from a document's first page;
//! [`TableExtractor`] turns each grid into [`ShiftRecord`]s by classifying
//! the header row into staff columns, the body rows into dates, and expanding
//! every staff cell into zero or more time ranges.
//!
//! [`ShiftRecord`]: crate::models::ShiftRecord

mod cell;
mod header;
mod row;
mod source;
mod table;

pub use cell::{CellParser, CellShifts, TimeRange};
pub use header::{DATE_COLUMN, classify_header};
pub use row::{RowDate, parse_row_date};
pub use source::{DelimitedTables, Grid, PdfTextTables, RawTableCell, SourceRegistry, TableSource};
pub use table::{DocumentExtraction, TableExtractor};
