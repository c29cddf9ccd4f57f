use crate::downloader::{MAX_COLS, MAX_ROWS};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

lazy_static! {
    static ref CELL_REF_REGEX: Regex = Regex::new(r"^\$?([A-Za-z]{1,3})\$?([0-9]{1,7})$").unwrap();
}

/// Value held by one cell of a sheet.
///
/// Text, numbers and blanks are what the editor works with. Booleans and
/// dates are kept so that cells nobody touched are written back with the
/// same type they were read with.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// Excel serial date (1900 date system).
    DateTime(f64),
}

impl CellValue {
    /// Builds a value from what the user typed into the grid.
    pub fn from_input(input: &str) -> Self {
        if input.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(input.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Text shown in the editable grid.
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Bool(true) => "TRUE".to_string(),
            CellValue::Bool(false) => "FALSE".to_string(),
            CellValue::DateTime(serial) => match serial_to_datetime(*serial) {
                Some(dt) if dt.num_seconds_from_midnight() == 0 => {
                    dt.format("%Y-%m-%d").to_string()
                }
                Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
                None => serial.to_string(),
            },
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

// Serials before 1900-03-01 are off by one day because of the Lotus leap year bug.
fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    epoch.checked_add_signed(TimeDelta::try_milliseconds(millis)?)
}

/// Zero-based cell coordinate, printed in A1 notation.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(row: usize, col: usize) -> Self {
        CellRef { row, col }
    }

    /// Parses `B3`, `$B$3` or `aa10`. Returns `None` for anything else,
    /// including references past `XFD1048576`.
    pub fn parse(name: &str) -> Option<Self> {
        let caps = CELL_REF_REGEX.captures(name.trim())?;
        let col = letter_to_column(&caps[1])?;
        let row: usize = caps[2].parse().ok()?;
        if row == 0 {
            return None;
        }
        Some(CellRef { row: row - 1, col }).filter(CellRef::is_within_limits)
    }

    /// Whether an xlsx worksheet can hold this cell.
    pub fn is_within_limits(&self) -> bool {
        self.row < MAX_ROWS && self.col < MAX_COLS
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_to_letter(self.col), self.row + 1)
    }
}

/// Converts a zero-based column index to its letters (0 -> A, 26 -> AA).
pub fn column_to_letter(col: usize) -> String {
    let mut name = Vec::new();
    let mut n = col + 1;

    while n > 0 {
        n -= 1;
        name.push(b'A' + (n % 26) as u8);
        n /= 26;
    }

    name.iter().rev().map(|&b| b as char).collect()
}

/// Converts column letters to a zero-based index (A -> 0, AA -> 26).
pub fn letter_to_column(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }
    let n = letters.chars().try_fold(0usize, |acc, c| {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = (c.to_ascii_uppercase() as u8 - b'A' + 1) as usize;
        acc.checked_mul(26)?.checked_add(digit)
    })?;
    Some(n - 1)
}
