/*!
# Statement Review

Opens the spreadsheets produced from bank-statement PDFs, lets an
accountant correct them cell by cell, and writes the corrected copy back
out as xlsx.

## Overview

Statements are turned into spreadsheets by a remote extraction service.
The output is not always right, so before the file goes anywhere else a
person reviews it: they open it, flip through its sheets, fix cells and
download a corrected copy. This crate is the engine behind that review.

## Architecture

### Document Layer
- **loader**: Decodes xlsx, xlsb, xls and ods bytes into a `Workbook`
- **workbook**: Ordered sheet names plus the stored contents of each sheet
- **grid**: The editable, sparse, growable cells of the active sheet
- **downloader**: Writes the active grid back and serializes the workbook as xlsx

### Session Layer
- **session**: `ReviewSession`, the owner of the open document. Handles
  open, sheet switching, edits, export and close
- **dirty**: Unsaved-changes flag
- **display**: The bounded view the editor renders (first 100 rows)

### Collaborators
- **transfer**: Where exported bytes go (a directory, or memory for HTTP)
- **extraction**: Contract of the statement extraction service

### Frontend Layer (feature `web`)
- **app**: axum routes over one `ReviewSession`

## Lifecycle

- Opening a file decodes every sheet and shows the first one, clean
- Writing a cell grows the grid as needed and marks the document dirty
- Switching sheets rebuilds the grid from the workbook; unsaved edits to
  the sheet being left are dropped
- Exporting replaces the active sheet in the workbook, produces xlsx bytes
  named `<name>_modified.<ext>` and clears the dirty flag
- Any failure leaves the open document exactly as it was and is kept as
  the session's status message

## REST API Endpoints

- `POST /api/open` - Upload a spreadsheet (multipart field `spreadsheet`)
- `GET /api/sheet` - Bounded view of the active sheet
- `POST /api/select_sheet` - Switch the active sheet
- `POST /api/update_cell` - Modify cell content
- `POST /api/export` - Download the corrected xlsx
- `POST /api/clear` - Close the document
*/

pub mod cell;
pub mod config;
pub mod dirty;
pub mod display;
pub mod downloader;
pub mod error;
pub mod extraction;
pub mod grid;
pub mod loader;
pub mod session;
pub mod transfer;
pub mod workbook;

#[cfg(feature = "web")]
pub mod app;

pub use cell::{CellRef, CellValue};
pub use error::{DecodeError, EncodeError, SessionError, UnknownSheetError};
pub use grid::Grid;
pub use session::ReviewSession;
pub use workbook::{SheetData, Workbook};
