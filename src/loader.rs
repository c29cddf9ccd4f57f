use crate::cell::CellValue;
use crate::downloader::{MAX_COLS, MAX_ROWS};
use crate::error::DecodeError;
use crate::workbook::{SheetData, Workbook};
use calamine::{Data, Dimensions, Range, Reader, Sheets, open_workbook_auto_from_rs};
use log::debug;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

/// Decode a spreadsheet container held in memory
///
/// Accepts the package-based formats (xlsx, xlsm, xlsb), the legacy binary
/// xls format and ods. Every sheet is read up front so the returned
/// workbook can later be written back without losing anything. The input
/// buffer is only read.
///
/// # Arguments
/// * `bytes` - Raw contents of the uploaded file
///
/// # Returns
/// * `Result<Workbook, DecodeError>` - The decoded workbook, with at least one sheet
///
/// # Examples
/// ```no_run
/// use sheetfix::loader::decode;
///
/// let bytes = std::fs::read("statement.xlsx").unwrap();
/// match decode(&bytes) {
///     Ok(workbook) => println!("{} sheets", workbook.len()),
///     Err(e) => eprintln!("Error loading Excel: {}", e),
/// }
/// ```
pub fn decode(bytes: &[u8]) -> Result<Workbook, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    let cursor = Cursor::new(bytes.to_vec());
    let mut sheets: Sheets<_> = open_workbook_auto_from_rs(cursor)
        .map_err(|e| DecodeError::Unsupported(e.to_string()))?;

    let sheet_names = sheets.sheet_names();
    if sheet_names.is_empty() {
        return Err(DecodeError::NoSheets);
    }

    let mut workbook = Workbook::new();
    for name in sheet_names {
        let extent = recorded_extent(&mut sheets, &name);
        let range = sheets
            .worksheet_range(&name)
            .map_err(|e| DecodeError::Sheet {
                sheet: name.clone(),
                reason: e.to_string(),
            })?;
        let data = sheet_from_range(&range, extent);
        debug!(
            "decoded sheet '{}' ({} rows x {} cols)",
            name,
            data.height(),
            data.width()
        );
        workbook.push_sheet(name, data);
    }

    debug!("decoded workbook with {} sheets", workbook.len());
    Ok(workbook)
}

/// Read a file from disk and decode it
///
/// # Arguments
/// * `filepath` - Path to the spreadsheet file
///
/// # Returns
/// * `Result<Workbook, DecodeError>` - The decoded workbook or an error
pub fn load_file(filepath: impl AsRef<Path>) -> Result<Workbook, DecodeError> {
    let bytes = std::fs::read(filepath)?;
    decode(&bytes)
}

// Last cell of the <dimension> an xlsx sheet declares. calamine drops
// valueless cells from its ranges, so blank rows and columns at the end of a
// sheet are only visible here. "A1" is what writers emit for empty sheets.
fn recorded_extent<RS: Read + Seek>(sheets: &mut Sheets<RS>, name: &str) -> Option<(usize, usize)> {
    let Sheets::Xlsx(xlsx) = sheets else {
        return None;
    };
    let Dimensions { end, .. } = xlsx.worksheet_cells_reader(name).ok()?.dimensions();
    if end == (0, 0) {
        return None;
    }
    let row = (end.0 as usize).min(MAX_ROWS - 1);
    let col = (end.1 as usize).min(MAX_COLS - 1);
    Some((row, col))
}

// calamine ranges start at the first used cell; shift them back to A1.
// `extent` is the last cell the sheet declares, which may lie past the range.
fn sheet_from_range(range: &Range<Data>, extent: Option<(usize, usize)>) -> SheetData {
    let mut rows: Vec<Vec<CellValue>> = Vec::new();
    if let Some((start_row, start_col)) = range.start() {
        rows.resize_with(start_row as usize, Vec::new);
        for row in range.rows() {
            let used = row
                .iter()
                .rposition(|cell| !matches!(cell, Data::Empty))
                .map_or(0, |last| last + 1);

            if used == 0 {
                rows.push(Vec::new());
                continue;
            }

            let mut cells = vec![CellValue::Empty; start_col as usize];
            cells.extend(row[..used].iter().map(cell_value));
            rows.push(cells);
        }
    }

    if let Some((last_row, last_col)) = extent {
        if rows.len() <= last_row + 1 {
            rows.resize_with(last_row + 1, Vec::new);
            let cells = &mut rows[last_row];
            if cells.len() <= last_col {
                cells.resize(last_col + 1, CellValue::Empty);
            }
        }
    }

    SheetData::new(rows)
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) if s.is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::DateTime(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook};

    #[test]
    fn rejects_empty_and_garbage_input() {
        assert!(matches!(decode(&[]), Err(DecodeError::Empty)));
        let garbage = [0x13u8, 0x37, 0xde, 0xad, 0xbe, 0xef, 0x00, 0x01, 0x02, 0x03];
        assert!(decode(&garbage).is_err());
    }

    #[test]
    fn anchors_cells_at_a1() {
        let mut book = XlsxWorkbook::new();
        let sheet = book.add_worksheet();
        sheet.set_name("Offset").unwrap();
        sheet.write_string(2, 1, "b3").unwrap();
        sheet.write_number(3, 2, 7.5).unwrap();
        let bytes = book.save_to_buffer().unwrap();

        let workbook = decode(&bytes).unwrap();
        let grid = workbook.grid_for("Offset").unwrap();
        assert_eq!(grid.row_count(), 4);
        assert!(grid.rows()[0].is_empty());
        assert_eq!(grid.value(2, 1), &CellValue::Text("b3".into()));
        assert_eq!(grid.value(3, 2), &CellValue::Number(7.5));
        assert_eq!(grid.rows()[2].len(), 2);
    }

    #[test]
    fn empty_sheets_are_kept() {
        let mut book = XlsxWorkbook::new();
        book.add_worksheet().set_name("Blank").unwrap();
        book.add_worksheet().set_name("Data").unwrap().write_boolean(0, 0, true).unwrap();
        let bytes = book.save_to_buffer().unwrap();

        let workbook = decode(&bytes).unwrap();
        assert_eq!(workbook.sheet_names(), ["Blank", "Data"]);
        assert_eq!(workbook.sheet("Blank").unwrap().height(), 0);
        assert_eq!(
            workbook.sheet("Data").unwrap().rows,
            vec![vec![CellValue::Bool(true)]]
        );
    }

    #[test]
    fn declared_blank_rows_extend_the_sheet() {
        let mut book = XlsxWorkbook::new();
        let sheet = book.add_worksheet();
        sheet.set_name("Padded").unwrap();
        sheet.write_string(0, 0, "a1").unwrap();
        sheet.write_blank(4, 3, &Format::new().set_bold()).unwrap();
        let bytes = book.save_to_buffer().unwrap();

        let workbook = decode(&bytes).unwrap();
        let padded = workbook.sheet("Padded").unwrap();
        assert_eq!(padded.height(), 5);
        assert_eq!(padded.width(), 4);
        assert!(padded.rows[1].is_empty());
        assert_eq!(padded.rows[4], vec![CellValue::Empty; 4]);
    }
}
