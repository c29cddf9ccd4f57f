use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("extraction failed: {0}")]
    Service(String),
}

/// A statement submitted for extraction, with its three identifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionRequest {
    pub document: Vec<u8>,
    pub filename: String,
    pub document_number: String,
    pub bank_code: String,
    pub account_number: String,
}

impl ExtractionRequest {
    /// Identifiers are trimmed; a blank one is rejected, checked in form order.
    pub fn new(
        document: Vec<u8>,
        filename: impl Into<String>,
        document_number: &str,
        bank_code: &str,
        account_number: &str,
    ) -> Result<Self, ExtractionError> {
        Ok(ExtractionRequest {
            document,
            filename: filename.into(),
            document_number: required("document number", document_number)?,
            bank_code: required("bank code", bank_code)?,
            account_number: required("account number", account_number)?,
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ExtractionError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ExtractionError::MissingField(field))
    } else {
        Ok(value.to_string())
    }
}

/// Spreadsheet produced by the extraction service.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionArtifact {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Remote service turning a bank statement into a spreadsheet.
pub trait ExtractionService {
    fn extract(&self, request: &ExtractionRequest) -> Result<ExtractionArtifact, ExtractionError>;
}
