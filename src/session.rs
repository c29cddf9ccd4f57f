use crate::cell::CellRef;
use crate::dirty::DirtyFlag;
use crate::display::GridView;
use crate::downloader::{self, ExportedFile};
use crate::error::{DecodeError, EncodeError, SessionError};
use crate::extraction::ExtractionArtifact;
use crate::grid::Grid;
use crate::loader;
use crate::transfer::FileTransfer;
use crate::workbook::Workbook;
use log::{info, warn};

/// One opened document under review.
#[derive(Debug, Clone)]
pub struct OpenDocument {
    workbook: Workbook,
    active_sheet: String,
    grid: Grid,
    dirty: DirtyFlag,
    source_name: String,
}

impl OpenDocument {
    fn new(workbook: Workbook, source_name: &str) -> Result<Self, SessionError> {
        let first = workbook
            .first_sheet()
            .ok_or(DecodeError::NoSheets)?
            .to_string();
        let grid = workbook.grid_for(&first)?;
        Ok(OpenDocument {
            workbook,
            active_sheet: first,
            grid,
            dirty: DirtyFlag::clean(),
            source_name: source_name.to_string(),
        })
    }

    pub fn workbook(&self) -> &Workbook {
        &self.workbook
    }

    pub fn active_sheet(&self) -> &str {
        &self.active_sheet
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.is_dirty()
    }
}

/// Holds the document being reviewed and drives its lifecycle.
///
/// Opening decodes a file and shows its first sheet. Switching sheets
/// rebuilds the grid from the workbook and drops unsaved edits to the
/// sheet being left. Exporting writes the active grid back and hands the
/// bytes to a [`FileTransfer`]. Failures never touch the open document;
/// they are returned and kept as the status message.
#[derive(Debug, Default)]
pub struct ReviewSession {
    document: Option<OpenDocument>,
    message: Option<String>,
}

impl ReviewSession {
    pub fn new() -> Self {
        ReviewSession::default()
    }

    /// Decodes `bytes` and replaces the open document with it.
    pub fn open(&mut self, bytes: &[u8], filename: &str) -> Result<(), SessionError> {
        let opened = loader::decode(bytes)
            .map_err(SessionError::from)
            .and_then(|workbook| OpenDocument::new(workbook, filename));

        match opened {
            Ok(document) => {
                info!(
                    "opened '{}' with {} sheet(s), showing '{}'",
                    filename,
                    document.workbook.len(),
                    document.active_sheet
                );
                self.document = Some(document);
                self.message = None;
                Ok(())
            }
            Err(e) => Err(self.fail(format!("Could not read '{}': {}", filename, e), e)),
        }
    }

    /// Opens a spreadsheet returned by the extraction service.
    pub fn open_artifact(&mut self, artifact: &ExtractionArtifact) -> Result<(), SessionError> {
        self.open(&artifact.bytes, &artifact.filename)
    }

    /// Makes `name` the active sheet, discarding unsaved edits to the current one.
    pub fn select_sheet(&mut self, name: &str) -> Result<(), SessionError> {
        let result = match self.document.as_mut() {
            None => Err(SessionError::NoDocument),
            Some(doc) => match doc.workbook.grid_for(name) {
                Ok(grid) => {
                    if doc.dirty.is_dirty() {
                        info!("discarding unsaved edits to '{}'", doc.active_sheet);
                    }
                    doc.grid = grid;
                    doc.active_sheet = name.to_string();
                    doc.dirty.reset();
                    Ok(())
                }
                Err(e) => Err(SessionError::UnknownSheet(e)),
            },
        };

        match result {
            Ok(()) => {
                info!("switched to sheet '{}'", name);
                self.message = None;
                Ok(())
            }
            Err(e) => Err(self.fail(e.to_string(), e)),
        }
    }

    /// Text at (row, col) of the active grid; empty when nothing is open.
    pub fn read_cell(&self, row: usize, col: usize) -> String {
        self.document
            .as_ref()
            .map(|doc| doc.grid.read_cell(row, col))
            .unwrap_or_default()
    }

    /// Writes user input at (row, col) and marks the document dirty.
    ///
    /// Cells past the xlsx limits are refused, since they could never be
    /// exported.
    pub fn write_cell(&mut self, row: usize, col: usize, value: &str) -> Result<(), SessionError> {
        if !CellRef::new(row, col).is_within_limits() {
            return Err(self.fail(
                format!("Cell ({}, {}) is outside the sheet limits", row, col),
                SessionError::OutOfBounds { row, col },
            ));
        }
        if let Some(doc) = self.document.as_mut() {
            doc.grid.write_cell(row, col, value);
            doc.dirty.mark();
            return Ok(());
        }
        Err(self.fail("No document is open".to_string(), SessionError::NoDocument))
    }

    /// Writes the active grid back into the workbook and delivers the result.
    ///
    /// On success the dirty flag is cleared. A delivery failure is reported
    /// in the status message but the export itself stands.
    pub fn export(&mut self, transfer: &mut dyn FileTransfer) -> Result<ExportedFile, SessionError> {
        let exported = match self.document.as_mut() {
            None => Err(EncodeError::NoDocument),
            Some(doc) => downloader::export_document(
                &mut doc.workbook,
                &doc.active_sheet,
                &doc.grid,
                &doc.source_name,
            )
            .inspect(|_| doc.dirty.reset()),
        };

        let exported = match exported {
            Ok(file) => file,
            Err(e) => {
                let e = SessionError::from(e);
                return Err(self.fail(format!("Export failed: {}", e), e));
            }
        };

        info!("exported '{}' ({} bytes)", exported.filename, exported.bytes.len());
        match transfer.deliver(&exported.filename, &exported.bytes) {
            Ok(()) => self.message = Some(format!("Saved {}", exported.filename)),
            Err(e) => {
                warn!("could not deliver '{}': {}", exported.filename, e);
                self.message = Some(format!("Could not save {}: {}", exported.filename, e));
            }
        }
        Ok(exported)
    }

    /// Closes the document and forgets any message.
    pub fn clear(&mut self) {
        if let Some(doc) = self.document.take() {
            info!("closed '{}'", doc.source_name);
        }
        self.message = None;
    }

    pub fn document(&self) -> Option<&OpenDocument> {
        self.document.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.document.is_some()
    }

    pub fn is_dirty(&self) -> bool {
        self.document.as_ref().is_some_and(OpenDocument::is_dirty)
    }

    pub fn sheet_names(&self) -> &[String] {
        self.document
            .as_ref()
            .map(|doc| doc.workbook.sheet_names())
            .unwrap_or(&[])
    }

    pub fn active_sheet(&self) -> Option<&str> {
        self.document.as_ref().map(OpenDocument::active_sheet)
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.document.as_ref().map(OpenDocument::grid)
    }

    /// Bounded view of the active sheet, if a document is open.
    pub fn view(&self) -> Option<GridView> {
        self.document.as_ref().map(|doc| {
            GridView::build(
                &doc.grid,
                &doc.active_sheet,
                doc.workbook.sheet_names(),
                doc.dirty.is_dirty(),
            )
        })
    }

    /// Last user-visible message: an error, or the result of an export.
    pub fn status_message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    fn fail(&mut self, message: String, error: SessionError) -> SessionError {
        warn!("{}", message);
        self.message = Some(message);
        error
    }
}
