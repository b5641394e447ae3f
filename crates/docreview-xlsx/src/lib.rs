//! Spreadsheet decoding for docreview.
//!
//! Reads one worksheet out of an `.xlsx`/`.xlsm`/`.xlsb`/`.xls`/`.ods` byte buffer and
//! exposes it as a [`docreview_core::Table`]: the first row of the used range becomes the
//! header row, everything below it the data rows.

use std::io::Cursor;
use std::panic::{self, AssertUnwindSafe};

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use docreview_core::{CellValue, Table, TableReader};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum XlsxReadError {
    #[error("failed to read workbook: {0}")]
    Calamine(#[from] calamine::Error),
    #[error("workbook has no worksheet {0}")]
    NoWorksheet(String),
    #[error("workbook decoder panicked: {0}")]
    Panic(String),
}

/// [`TableReader`] backed by `calamine`.
#[derive(Clone, Debug, Default)]
pub struct XlsxTableReader {
    sheet: Option<String>,
}

impl XlsxTableReader {
    /// Reads the first worksheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the worksheet called `name` instead of the first one.
    pub fn with_sheet(mut self, name: impl Into<String>) -> Self {
        self.sheet = Some(name.into());
        self
    }
}

impl TableReader for XlsxTableReader {
    type Error = XlsxReadError;

    fn read_table(&self, bytes: &[u8]) -> Result<Table, XlsxReadError> {
        // A malformed workbook must not take the whole traversal down with it.
        contain_panic(|| self.read_table_unguarded(bytes))
    }
}

fn contain_panic(
    read: impl FnOnce() -> Result<Table, XlsxReadError>,
) -> Result<Table, XlsxReadError> {
    panic::catch_unwind(AssertUnwindSafe(read)).unwrap_or_else(|payload| {
        let message = panic_message(payload.as_ref());
        log::warn!("workbook decoder panicked: {message}");
        Err(XlsxReadError::Panic(message))
    })
}

impl XlsxTableReader {
    fn read_table_unguarded(&self, bytes: &[u8]) -> Result<Table, XlsxReadError> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

        let range = match &self.sheet {
            Some(name) => {
                if !workbook.sheet_names().iter().any(|n| n == name) {
                    return Err(XlsxReadError::NoWorksheet(format!("`{name}`")));
                }
                workbook.worksheet_range(name)?
            }
            None => workbook
                .worksheet_range_at(0)
                .ok_or_else(|| XlsxReadError::NoWorksheet("at index 0".to_string()))??,
        };

        Ok(range_to_table(&range))
    }
}

fn range_to_table(range: &Range<Data>) -> Table {
    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Table::default();
    };

    let headers = header_row.iter().map(|cell| cell.to_string()).collect();
    let mut data: Vec<Vec<CellValue>> = rows
        .map(|row| row.iter().map(convert_value).collect())
        .collect();

    while data
        .last()
        .is_some_and(|row| row.iter().all(CellValue::is_empty))
    {
        data.pop();
    }

    Table::new(headers, data)
}

fn convert_value(value: &Data) -> CellValue {
    match value {
        Data::Empty => CellValue::Empty,
        Data::Bool(v) => CellValue::Boolean(*v),
        Data::Int(v) => CellValue::Number(*v as f64),
        Data::Float(v) => CellValue::Number(*v),
        Data::String(v) => CellValue::String(v.clone()),
        Data::Error(e) => CellValue::Error(e.to_string()),
        Data::DateTime(v) => CellValue::Number(v.as_f64()),
        Data::DateTimeIso(v) => CellValue::String(v.clone()),
        Data::DurationIso(v) => CellValue::String(v.clone()),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_blank_rows_are_dropped() {
        let mut range = Range::new((0, 0), (3, 1));
        range.set_value((0, 0), Data::String("Gives der aktindsigt?".into()));
        range.set_value((1, 0), Data::String("Ja".into()));
        range.set_value((2, 1), Data::Empty);

        let table = range_to_table(&range);
        assert_eq!(table.headers, vec!["Gives der aktindsigt?", ""]);
        assert_eq!(table.rows, vec![vec![CellValue::from("Ja"), CellValue::Empty]]);
    }

    #[test]
    fn blank_rows_between_data_are_kept() {
        let mut range = Range::new((0, 0), (3, 0));
        range.set_value((0, 0), Data::String("h".into()));
        range.set_value((1, 0), Data::String("Ja".into()));
        range.set_value((3, 0), Data::String("Nej".into()));

        let table = range_to_table(&range);
        assert_eq!(table.row_count(), 3);
        assert!(table.rows[1][0].is_empty());
    }

    #[test]
    fn numbers_and_errors_convert() {
        assert_eq!(convert_value(&Data::Int(3)), CellValue::Number(3.0));
        assert_eq!(convert_value(&Data::Bool(true)), CellValue::Boolean(true));
        assert_eq!(
            convert_value(&Data::Error(calamine::CellErrorType::NA)),
            CellValue::Error("#N/A".to_string())
        );
    }

    #[test]
    fn decoder_panic_becomes_error() {
        let err = contain_panic(|| panic!("index out of bounds in shared strings"))
            .expect_err("panic must be contained");
        assert!(
            matches!(&err, XlsxReadError::Panic(msg) if msg == "index out of bounds in shared strings"),
            "{err}"
        );
    }

    #[test]
    fn decoder_result_passes_through() {
        let table = contain_panic(|| Ok(Table::default())).unwrap();
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn panic_payloads_become_messages() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
    }
}
