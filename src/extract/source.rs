//! Table-grid sources.
//!
//! A [`TableSource`] turns one document into zero or more [`Grid`]s. Only the
//! first page of a document is read; the extractor never stitches tables
//! across pages.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::{RosterError, RosterResult};

static CELL_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\t+|[ \u{3000}]{2,}").expect("cell separator pattern"));

/// One cell of a table grid with its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawTableCell<'a> {
    /// Cell text as extracted.
    pub text: &'a str,
    /// Row index within the grid.
    pub row: usize,
    /// Column index within the row.
    pub column: usize,
}

/// A table grid: rows of cell strings. Row 0 is the header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<String>>,
}

impl Grid {
    /// Creates a grid from rows of cells.
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Returns all rows.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Returns the header row, if any.
    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Returns the rows after the header.
    pub fn body(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or_default()
    }

    /// Iterates over the cells of one row with their positions.
    pub fn row_cells(&self, row: usize) -> impl Iterator<Item = RawTableCell<'_>> {
        self.rows
            .get(row)
            .into_iter()
            .flatten()
            .enumerate()
            .map(move |(column, text)| RawTableCell {
                text: text.as_str(),
                row,
                column,
            })
    }

    /// Returns true if the grid has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The table-grid extraction capability.
///
/// Returns an empty vector when the document has no tabular structure; errors
/// are reserved for documents that cannot be read at all.
pub trait TableSource {
    /// Extracts the grids on the first page of `path`.
    fn extract_tables(&self, path: &Path) -> RosterResult<Vec<Grid>>;
}

/// Delimited text exports of a roster page (`.csv`, `.tsv`).
///
/// A blank line separates two grids.
#[derive(Debug, Clone, Copy)]
pub struct DelimitedTables {
    delimiter: u8,
}

impl DelimitedTables {
    /// Comma-separated grids.
    pub fn csv() -> Self {
        Self { delimiter: b',' }
    }

    /// Tab-separated grids.
    pub fn tsv() -> Self {
        Self { delimiter: b'\t' }
    }

    /// Parses grids from already-decoded text.
    pub fn parse_text(&self, text: &str, path: &Path) -> RosterResult<Vec<Grid>> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut grids = Vec::new();

        for block in split_blocks(text) {
            let mut reader = csv::ReaderBuilder::new()
                .has_headers(false)
                .flexible(true)
                .delimiter(self.delimiter)
                .from_reader(block.as_bytes());

            let mut rows = Vec::new();
            for record in reader.records() {
                let record = record.map_err(|e| RosterError::DocumentUnreadable {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;
                rows.push(record.iter().map(str::to_string).collect());
            }

            if !rows.is_empty() {
                grids.push(Grid::new(rows));
            }
        }

        Ok(grids)
    }
}

impl TableSource for DelimitedTables {
    fn extract_tables(&self, path: &Path) -> RosterResult<Vec<Grid>> {
        let bytes = read_document(path)?;
        let text = String::from_utf8(bytes).map_err(|e| RosterError::DocumentUnreadable {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        self.parse_text(&text, path)
    }
}

fn split_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
            continue;
        }
        current.push_str(line);
        current.push('\n');
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

/// Text-layer PDF rosters read with `pdf-extract`.
///
/// Only the first page is read. Its text is split into lines and cells are
/// separated by tabs or by runs of two or more spaces. Title and banner lines
/// above the table are dropped, so the grid starts at the first line with two
/// or more cells. Later single-cell lines are kept so row alignment survives.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextTables;

impl PdfTextTables {
    /// Splits the text of one page into a grid.
    ///
    /// Returns `None` when no line has two cells.
    pub fn grid_from_page(&self, page: &str) -> Option<Grid> {
        let rows: Vec<Vec<String>> = page
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                CELL_SEPARATOR
                    .split(line)
                    .map(|cell| cell.trim().to_string())
                    .collect::<Vec<String>>()
            })
            .skip_while(|row| row.len() < 2)
            .collect();

        if rows.is_empty() {
            None
        } else {
            Some(Grid::new(rows))
        }
    }
}

impl TableSource for PdfTextTables {
    fn extract_tables(&self, path: &Path) -> RosterResult<Vec<Grid>> {
        let bytes = read_document(path)?;
        let pages = pdf_extract::extract_text_from_mem_by_pages(&bytes).map_err(|e| {
            RosterError::DocumentUnreadable {
                path: path.display().to_string(),
                message: e.to_string(),
            }
        })?;

        let first_page = pages.first().map(String::as_str).unwrap_or_default();
        if first_page.trim().is_empty() {
            return Err(RosterError::DocumentUnreadable {
                path: path.display().to_string(),
                message: "no text layer on the first page".to_string(),
            });
        }

        debug!(
            document = %path.display(),
            pages = pages.len(),
            chars = first_page.len(),
            "Extracted PDF text"
        );
        Ok(self.grid_from_page(first_page).into_iter().collect())
    }
}

fn read_document(path: &Path) -> RosterResult<Vec<u8>> {
    fs::read(path).map_err(|e| RosterError::DocumentUnreadable {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Picks a [`TableSource`] by file extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceRegistry;

impl SourceRegistry {
    /// Creates a registry with the PDF and delimited sources.
    pub fn new() -> Self {
        Self
    }

    /// Returns the source for `path`, or `None` for unsupported extensions.
    pub fn source_for(&self, path: &Path) -> Option<Box<dyn TableSource>> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "pdf" => Some(Box::new(PdfTextTables)),
            "csv" => Some(Box::new(DelimitedTables::csv())),
            "tsv" => Some(Box::new(DelimitedTables::tsv())),
            _ => None,
        }
    }

    /// Returns true if `path` has a supported extension.
    pub fn supports(&self, path: &Path) -> bool {
        self.source_for(path).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delimited_blank_line_starts_new_grid() {
        let text = "日付,田中\n10/1(水),9:00〜13:00\n\n日付,佐藤\n10/2(木),10:00〜15:00\n";
        let grids = DelimitedTables::csv()
            .parse_text(text, Path::new("a.csv"))
            .unwrap();

        assert_eq!(grids.len(), 2);
        assert_eq!(grids[0].header().unwrap(), ["日付", "田中"]);
        assert_eq!(grids[1].body()[0][1], "10:00〜15:00");
    }

    #[test]
    fn test_delimited_ragged_rows_and_bom() {
        let text = "\u{feff}日付\t田中\t佐藤\n10/1(水)\t9:00〜13:00\n";
        let grids = DelimitedTables::tsv()
            .parse_text(text, Path::new("a.tsv"))
            .unwrap();

        assert_eq!(grids.len(), 1);
        assert_eq!(grids[0].header().unwrap()[0], "日付");
        assert_eq!(grids[0].body()[0].len(), 2);
    }

    #[test]
    fn test_pdf_text_splits_on_wide_gaps() {
        let source = PdfTextTables;
        let text = "日付  田中(社員)\t佐藤\n10/1(水)  9:00〜13:00  -\n合計\n";
        let grid = source.grid_from_page(text).unwrap();

        assert_eq!(grid.rows().len(), 3);
        assert_eq!(grid.rows()[0], ["日付", "田中(社員)", "佐藤"]);
        assert_eq!(grid.rows()[1], ["10/1(水)", "9:00〜13:00", "-"]);
        assert_eq!(grid.rows()[2], ["合計"]);
    }

    #[test]
    fn test_pdf_title_lines_dropped() {
        let source = PdfTextTables;
        let text = "Stand Banh Miのシフト\n2025年10月\n日付  田中(社員)  佐藤\n10/1(水)  渋谷9:00〜13:00  9:00〜13:00\n";
        let grid = source.grid_from_page(text).unwrap();

        assert_eq!(grid.header().unwrap(), ["日付", "田中(社員)", "佐藤"]);
        assert_eq!(grid.body().len(), 1);
    }

    #[test]
    fn test_pdf_text_without_columns_has_no_grid() {
        let source = PdfTextTables;
        assert!(source.grid_from_page("just a paragraph\nof prose").is_none());
    }

    #[test]
    fn test_registry_by_extension() {
        let registry = SourceRegistry::new();
        assert!(registry.supports(Path::new("x/ROSTER.PDF")));
        assert!(registry.supports(Path::new("x/roster.csv")));
        assert!(registry.supports(Path::new("x/roster.tsv")));
        assert!(!registry.supports(Path::new("x/notes.txt")));
        assert!(!registry.supports(Path::new("x/README")));
    }

    #[test]
    fn test_row_cells_positions() {
        let grid = Grid::new(vec![vec!["a".into(), "b".into()]]);
        let cells: Vec<_> = grid.row_cells(0).collect();
        assert_eq!(cells[1].column, 1);
        assert_eq!(cells[1].text, "b");
        assert_eq!(grid.row_cells(5).count(), 0);
    }
}
