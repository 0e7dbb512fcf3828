//! Tabular storage: cell values, A1 addressing and the [`Sheet`] seam.
//!
//! Rows and columns are 1-indexed everywhere, as in a spreadsheet.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::SheetError;

/// A single cell's content.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    /// Wall-clock date-time with no zone attached.
    DateTime(NaiveDateTime),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            CellValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<Option<f64>> for CellValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(CellValue::Empty, CellValue::Number)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(value: NaiveDateTime) -> Self {
        CellValue::DateTime(value)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => f.write_str(&format_number(*n)),
            CellValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M")),
        }
    }
}

/// Shortest plain rendering of a number: `0`, `0.01`, `65`.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // covers -0.0
        "0".to_string()
    } else {
        value.to_string()
    }
}

/// A cell address, 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    pub row: usize,
    pub column: usize,
}

impl CellRef {
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// Parse A1 notation such as `D2` or `AA10`.
    pub fn parse(a1: &str) -> Result<Self, SheetError> {
        let invalid = || SheetError::InvalidCellRef(a1.to_string());

        let split = a1.find(|c: char| c.is_ascii_digit()).ok_or_else(invalid)?;
        let (letters, digits) = a1.split_at(split);
        if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid());
        }
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let column = letters.chars().try_fold(0usize, |acc, c| {
            let digit = (c.to_ascii_uppercase() as u8 - b'A') as usize + 1;
            acc.checked_mul(26).and_then(|v| v.checked_add(digit))
        });
        let row = digits.parse::<usize>().ok().filter(|r| *r > 0);

        match (row, column) {
            (Some(row), Some(column)) => Ok(Self { row, column }),
            _ => Err(invalid()),
        }
    }

    pub fn column_letters(&self) -> String {
        let mut n = self.column;
        let mut out = Vec::new();
        while n > 0 {
            let rem = (n - 1) % 26;
            out.push((b'A' + rem as u8) as char);
            n = (n - 1) / 26;
        }
        out.iter().rev().collect()
    }
}

impl FromStr for CellRef {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CellRef::parse(s)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column_letters(), self.row)
    }
}

/// An opaque tabular store addressed by row and column.
pub trait Sheet {
    fn name(&self) -> &str;

    fn value(&self, cell: CellRef) -> CellValue;

    fn set_value(&mut self, cell: CellRef, value: CellValue);

    /// Write a rectangular block whose top-left corner is `(row, column)`.
    /// A zero row or column addresses no cell and writes nothing.
    fn set_values(&mut self, row: usize, column: usize, values: Vec<Vec<CellValue>>);

    /// Every row from row 1 to the last populated one, padded to the last
    /// populated column.
    fn data_range(&self) -> Vec<Vec<CellValue>>;

    /// Remove `row`, shifting every row below it up by one.
    fn delete_row(&mut self, row: usize) -> Result<(), SheetError>;
}

/// In-memory [`Sheet`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Grid {
    name: String,
    #[serde(default)]
    rows: Vec<Vec<CellValue>>,
}

impl Grid {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), rows: Vec::new() }
    }

    fn last_row(&self) -> usize {
        self.rows
            .iter()
            .rposition(|row| row.iter().any(|c| !c.is_empty()))
            .map_or(0, |i| i + 1)
    }

    fn last_column(&self) -> usize {
        self.rows
            .iter()
            .filter_map(|row| row.iter().rposition(|c| !c.is_empty()))
            .max()
            .map_or(0, |i| i + 1)
    }

    /// Number of populated rows, header included.
    pub fn row_count(&self) -> usize {
        self.last_row()
    }
}

impl Sheet for Grid {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self, cell: CellRef) -> CellValue {
        self.rows
            .get(cell.row.wrapping_sub(1))
            .and_then(|row| row.get(cell.column.wrapping_sub(1)))
            .cloned()
            .unwrap_or_default()
    }

    fn set_value(&mut self, cell: CellRef, value: CellValue) {
        self.set_values(cell.row, cell.column, vec![vec![value]]);
    }

    fn set_values(&mut self, row: usize, column: usize, values: Vec<Vec<CellValue>>) {
        if row == 0 || column == 0 {
            return;
        }
        for (offset, new_row) in values.into_iter().enumerate() {
            let r = row - 1 + offset;
            if self.rows.len() <= r {
                self.rows.resize_with(r + 1, Vec::new);
            }
            let target = &mut self.rows[r];
            for (c_offset, value) in new_row.into_iter().enumerate() {
                let c = column - 1 + c_offset;
                if target.len() <= c {
                    target.resize_with(c + 1, CellValue::default);
                }
                target[c] = value;
            }
        }
    }

    fn data_range(&self) -> Vec<Vec<CellValue>> {
        let width = self.last_column();
        self.rows[..self.last_row()]
            .iter()
            .map(|row| {
                let mut padded = row.clone();
                padded.resize_with(width, CellValue::default);
                padded
            })
            .collect()
    }

    fn delete_row(&mut self, row: usize) -> Result<(), SheetError> {
        if row == 0 || row > self.rows.len() {
            return Err(SheetError::RowOutOfRange {
                sheet: self.name.clone(),
                row,
                rows: self.rows.len(),
            });
        }
        self.rows.remove(row - 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn parses_a1_references() {
        assert_eq!(CellRef::parse("D2").unwrap(), CellRef::new(2, 4));
        assert_eq!(CellRef::parse("b6").unwrap(), CellRef::new(6, 2));
        assert_eq!(CellRef::parse("AA10").unwrap(), CellRef::new(10, 27));
    }

    #[test]
    fn rejects_malformed_references() {
        for bad in ["", "D", "2", "D0", "2D", "D2X", "D-2", "Ä1"] {
            assert!(CellRef::parse(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn cell_ref_display_roundtrips() {
        for a1 in ["A1", "D16", "Z3", "AA1", "AZ9", "BA2"] {
            assert_eq!(CellRef::parse(a1).unwrap().to_string(), a1);
        }
    }

    #[test]
    fn unset_cells_read_as_empty() {
        let grid = Grid::new("s");
        assert_eq!(grid.value(CellRef::new(5, 5)), CellValue::Empty);
    }

    #[test]
    fn set_values_grows_the_grid() {
        let mut grid = Grid::new("s");
        grid.set_values(2, 3, vec![vec![1.0.into()], vec![2.0.into()]]);

        assert_eq!(grid.value(CellRef::new(2, 3)), CellValue::Number(1.0));
        assert_eq!(grid.value(CellRef::new(3, 3)), CellValue::Number(2.0));
        assert_eq!(grid.row_count(), 3);
    }

    #[test]
    fn data_range_is_rectangular() {
        let mut grid = Grid::new("s");
        grid.set_value(CellRef::new(1, 1), "Time".into());
        grid.set_value(CellRef::new(3, 2), 4.5.into());

        let range = grid.data_range();
        assert_eq!(range.len(), 3);
        assert!(range.iter().all(|row| row.len() == 2));
        assert_eq!(range[2][1], CellValue::Number(4.5));
    }

    #[test]
    fn data_range_ignores_trailing_blank_rows() {
        let mut grid = Grid::new("s");
        grid.set_value(CellRef::new(1, 1), "x".into());
        grid.set_value(CellRef::new(4, 1), CellValue::Empty);

        assert_eq!(grid.data_range().len(), 1);
    }

    #[test]
    fn delete_row_shifts_rows_up() {
        let mut grid = Grid::new("s");
        grid.set_values(1, 1, vec![vec!["a".into()], vec!["b".into()], vec!["c".into()]]);

        grid.delete_row(2).unwrap();

        assert_eq!(grid.value(CellRef::new(1, 1)), CellValue::from("a"));
        assert_eq!(grid.value(CellRef::new(2, 1)), CellValue::from("c"));
        assert_eq!(grid.row_count(), 2);
    }

    #[test]
    fn zero_row_or_column_writes_nothing() {
        let mut grid = Grid::new("s");
        grid.set_values(0, 1, vec![vec![1.0.into()]]);
        grid.set_values(1, 0, vec![vec![1.0.into()]]);
        grid.set_value(CellRef::new(0, 0), "x".into());

        assert_eq!(grid, Grid::new("s"));
    }

    #[test]
    fn delete_row_out_of_range() {
        let mut grid = Grid::new("hourly");
        let err = grid.delete_row(1).unwrap_err();
        assert_eq!(err, SheetError::RowOutOfRange { sheet: "hourly".into(), row: 1, rows: 0 });
    }

    #[test]
    fn formats_numbers_like_a_spreadsheet() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.01), "0.01");
        assert_eq!(format_number(65.0), "65");
        assert_eq!(format_number(-3.5), "-3.5");
    }

    #[test]
    fn cell_values_serialize_with_type_tags() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(6, 0, 0).unwrap();
        let json = serde_json::to_string(&CellValue::DateTime(dt)).unwrap();
        assert_eq!(json, r#"{"type":"date_time","value":"2024-03-01T06:00:00"}"#);

        let back: CellValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CellValue::DateTime(dt));
    }
}
