//! Row sources
//!
//! A source yields the whole table as an ordered `Vec<Row>`; nothing is
//! streamed. Spreadsheets use the first worksheet and treat the first row as
//! the header. Each row keeps the 1-based line it was read from.

use crate::errors::{source_not_found, source_unreadable, unsupported_source, Result};
use calamine::{open_workbook_auto, Data, DataType, Reader};
use ipagency_core::transform::TIMESTAMP_FORMAT;
use ipagency_core::{CellValue, Row};
use std::path::{Path, PathBuf};

/// Where an import reads its rows from
pub trait RowSource {
    /// Short description for logs and status lines
    fn describe(&self) -> String;

    /// Fail fast before any destructive step when the source cannot exist
    fn ensure_available(&self) -> Result<()>;

    /// Read every data row in source order
    fn read_rows(&self) -> Result<Vec<SourceRow>>;
}

/// One data row and the sheet line it came from
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    pub line: usize,
    pub row: Row,
}

impl SourceRow {
    pub fn new(line: usize, row: Row) -> Self {
        Self { line, row }
    }
}

/// Line of the first data row when the header sits on line 1
pub const FIRST_DATA_LINE: usize = 2;

/// Spreadsheet formats a [`FileSource`] can read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Workbook,
    Csv,
}

impl SourceFormat {
    pub fn for_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(SourceFormat::Workbook),
            "csv" => Some(SourceFormat::Csv),
            _ => None,
        }
    }
}

/// A spreadsheet file on disk
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn format(&self) -> Result<SourceFormat> {
        SourceFormat::for_path(&self.path).ok_or_else(|| unsupported_source(&self.path))
    }
}

impl RowSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn ensure_available(&self) -> Result<()> {
        if !self.path.is_file() {
            return Err(source_not_found(&self.path));
        }
        self.format().map(|_| ())
    }

    fn read_rows(&self) -> Result<Vec<SourceRow>> {
        match self.format()? {
            SourceFormat::Workbook => read_workbook(&self.path),
            SourceFormat::Csv => read_csv(&self.path),
        }
    }
}

/// Rows held in memory (seed data)
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    label: String,
    rows: Vec<Row>,
}

impl StaticSource {
    pub fn new(label: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            label: label.into(),
            rows,
        }
    }
}

impl RowSource for StaticSource {
    fn describe(&self) -> String {
        format!("static:{}", self.label)
    }

    fn ensure_available(&self) -> Result<()> {
        Ok(())
    }

    fn read_rows(&self) -> Result<Vec<SourceRow>> {
        Ok(self
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| SourceRow::new(FIRST_DATA_LINE + index, row.clone()))
            .collect())
    }
}

fn read_workbook(path: &Path) -> Result<Vec<SourceRow>> {
    let mut workbook = open_workbook_auto(path).map_err(|e| source_unreadable(path, e))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| source_unreadable(path, "workbook has no worksheets"))?
        .map_err(|e| source_unreadable(path, e))?;

    // the used range starts at the first non-empty row, not at line 1
    let Some((header_row, _)) = range.start() else {
        return Ok(Vec::new());
    };
    let first_line = header_row as usize + FIRST_DATA_LINE;

    let mut lines = range.rows();
    let Some(header_line) = lines.next() else {
        return Ok(Vec::new());
    };
    let header: Vec<Option<String>> = header_line
        .iter()
        .map(|cell| header_name(&cell.to_string()))
        .collect();

    Ok(lines
        .enumerate()
        .map(|(index, line)| {
            let row = header
                .iter()
                .zip(line.iter())
                .filter_map(|(name, cell)| name.as_ref().map(|n| (n.clone(), cell_value(cell))))
                .collect();
            SourceRow::new(first_line + index, row)
        })
        .collect())
}

fn read_csv(path: &Path) -> Result<Vec<SourceRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| source_unreadable(path, e))?;

    let header: Vec<Option<String>> = reader
        .headers()
        .map_err(|e| source_unreadable(path, e))?
        .iter()
        .map(|h| header_name(h.trim_start_matches('\u{feff}')))
        .collect();

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| source_unreadable(path, e))?;
        // empty lines are skipped by the reader, so prefer its own position
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(FIRST_DATA_LINE + index);
        let row: Row = header
            .iter()
            .zip(record.iter())
            .filter_map(|(name, field)| {
                name.as_ref()
                    .map(|n| (n.clone(), CellValue::Text(field.to_string())))
            })
            .collect();
        rows.push(SourceRow::new(line, row));
    }
    Ok(rows)
}

fn header_name(raw: &str) -> Option<String> {
    let name = raw.trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// Largest float that still converts to i64 exactly
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(n) => CellValue::Integer(*n),
        Data::Float(f) if f.fract() == 0.0 && f.abs() <= MAX_EXACT_FLOAT => {
            CellValue::Integer(*f as i64)
        }
        Data::Float(f) => CellValue::Real(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(_) => cell
            .as_datetime()
            .map(|dt| CellValue::Text(dt.format(TIMESTAMP_FORMAT).to_string()))
            .unwrap_or(CellValue::Null),
        // formula errors (#N/A, #REF!) read as empty cells
        Data::Error(_) => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}
