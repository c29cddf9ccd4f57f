use thiserror::Error;

/// The uploaded bytes could not be turned into a workbook.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("the file is empty")]
    Empty,

    #[error("not a supported spreadsheet file: {0}")]
    Unsupported(String),

    #[error("failed to read sheet '{sheet}': {reason}")]
    Sheet { sheet: String, reason: String },

    #[error("the workbook contains no sheets")]
    NoSheets,

    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

/// Navigation to a sheet name the workbook does not know.
#[derive(Debug, Error)]
#[error("unknown sheet '{0}'")]
pub struct UnknownSheetError(pub String);

/// The current document could not be written back to a container.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("no document is open")]
    NoDocument,

    #[error("active sheet '{0}' is not part of the workbook")]
    MissingSheet(String),

    #[error("cell at row {row}, column {col} is outside the xlsx limits")]
    OutOfBounds { row: usize, col: usize },

    #[error("failed to write xlsx: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

/// Errors reported by a [`crate::ReviewSession`].
///
/// Every variant is recoverable: the session keeps the last valid
/// document and the caller may retry.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    UnknownSheet(#[from] UnknownSheetError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("no document is open")]
    NoDocument,

    #[error("cell at row {row}, column {col} is outside the sheet limits")]
    OutOfBounds { row: usize, col: usize },
}
