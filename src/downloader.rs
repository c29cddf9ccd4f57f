use crate::cell::CellValue;
use crate::error::EncodeError;
use crate::grid::Grid;
use crate::workbook::{SheetData, Workbook};
use log::debug;
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook, Worksheet};

/// Rows in an xlsx worksheet.
pub const MAX_ROWS: usize = 1_048_576;
/// Columns in an xlsx worksheet.
pub const MAX_COLS: usize = 16_384;
const DATE_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Bytes and suggested name of an exported document.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Convert a workbook to XLSX format
///
/// Every sheet is written in document order with the values the decoder
/// read for it. Empty cells are not written, except the bottom-right corner
/// of a sheet, which is written blank so the sheet keeps its extent.
///
/// # Arguments
/// * `workbook` - The workbook to serialize
///
/// # Returns
/// * `Result<Vec<u8>, EncodeError>` - XLSX file content as bytes or an error
pub fn to_xlsx(workbook: &Workbook) -> Result<Vec<u8>, EncodeError> {
    encode(workbook, None)
}

/// Write the edited grid back into the workbook and serialize it
///
/// The sheet named `active_sheet` is replaced by the contents of `grid`;
/// the other sheets are written unchanged. The workbook is only updated
/// once the bytes have been produced, so on error nothing changes.
///
/// # Arguments
/// * `workbook` - The workbook the grid was derived from
/// * `active_sheet` - Name of the sheet backing `grid`
/// * `grid` - The edited cells
/// * `source_filename` - Name of the uploaded file, used for the export name
///
/// # Returns
/// * `Result<ExportedFile, EncodeError>` - The XLSX bytes and their file name
pub fn export_document(
    workbook: &mut Workbook,
    active_sheet: &str,
    grid: &Grid,
    source_filename: &str,
) -> Result<ExportedFile, EncodeError> {
    if !workbook.contains(active_sheet) {
        return Err(EncodeError::MissingSheet(active_sheet.to_string()));
    }

    let edited = SheetData::from(grid);
    let bytes = encode(workbook, Some((active_sheet, &edited)))?;

    workbook
        .replace_sheet(active_sheet, edited)
        .map_err(|e| EncodeError::MissingSheet(e.0))?;

    Ok(ExportedFile {
        filename: export_filename(source_filename),
        bytes,
    })
}

/// Name for the exported copy of `source`
///
/// `releve.xlsx` becomes `releve_modified.xlsx`; a name without an
/// extension gets `.xlsx`.
///
/// # Examples
/// ```
/// use sheetfix::downloader::export_filename;
///
/// assert_eq!(export_filename("jan.2024.xls"), "jan.2024_modified.xls");
/// assert_eq!(export_filename("statement"), "statement_modified.xlsx");
/// ```
pub fn export_filename(source: &str) -> String {
    match source.rsplit_once('.') {
        Some((base, ext)) if !base.is_empty() && !ext.is_empty() => {
            format!("{}_modified.{}", base, ext)
        }
        _ => format!("{}_modified.xlsx", source),
    }
}

fn encode(workbook: &Workbook, replacement: Option<(&str, &SheetData)>) -> Result<Vec<u8>, EncodeError> {
    let mut book = XlsxWorkbook::new();
    let date_format = Format::new().set_num_format(DATE_FORMAT);

    for (name, data) in workbook.sheets() {
        let data = match replacement {
            Some((active, edited)) if active == name => edited,
            _ => data,
        };
        let worksheet = book.add_worksheet();
        worksheet.set_name(name)?;
        write_sheet(worksheet, data, &date_format)?;
        debug!("encoded sheet '{}' ({} rows)", name, data.height());
    }

    Ok(book.save_to_buffer()?)
}

fn cell_index(row: usize, col: usize) -> Result<(u32, u16), EncodeError> {
    if row >= MAX_ROWS || col >= MAX_COLS {
        return Err(EncodeError::OutOfBounds { row, col });
    }
    Ok((row as u32, col as u16))
}

fn write_sheet(worksheet: &mut Worksheet, data: &SheetData, date_format: &Format) -> Result<(), EncodeError> {
    for (r, row) in data.rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            let (row_idx, col_idx) = cell_index(r, c)?;
            match value {
                CellValue::Empty => {}
                CellValue::Text(s) => {
                    worksheet.write_string(row_idx, col_idx, s.as_str())?;
                }
                CellValue::Number(n) => {
                    worksheet.write_number(row_idx, col_idx, *n)?;
                }
                CellValue::Bool(b) => {
                    worksheet.write_boolean(row_idx, col_idx, *b)?;
                }
                CellValue::DateTime(serial) => {
                    worksheet.write_number_with_format(row_idx, col_idx, *serial, date_format)?;
                }
            }
        }
    }

    // A blank corner still widens the <dimension> the decoder sizes sheets by.
    let (height, width) = (data.height(), data.width());
    if height > 0 && width > 0 {
        let (last_row, last_col) = (height - 1, width - 1);
        if data.rows[last_row].get(last_col).is_none_or(CellValue::is_empty) {
            let (row_idx, col_idx) = cell_index(last_row, last_col)?;
            worksheet.write_blank(row_idx, col_idx, &Format::new())?;
        }
    }
    Ok(())
}
