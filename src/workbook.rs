use crate::cell::CellValue;
use crate::error::UnknownSheetError;
use crate::grid::Grid;
use std::collections::HashMap;

/// Stored contents of one sheet, anchored at A1.
///
/// This is what the decoder understood of the sheet and what the encoder
/// writes back when the sheet is not the one being edited.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct SheetData {
    pub rows: Vec<Vec<CellValue>>,
}

impl SheetData {
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        SheetData { rows }
    }

    /// Editable grid for this sheet. Every row, including the first, is data.
    pub fn to_grid(&self) -> Grid {
        Grid::from_rows(self.rows.clone())
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

impl From<&Grid> for SheetData {
    fn from(grid: &Grid) -> Self {
        SheetData::new(grid.rows().to_vec())
    }
}

/// A decoded document: sheet names in document order plus their contents.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Workbook {
    sheet_names: Vec<String>,
    sheets: HashMap<String, SheetData>,
}

impl Workbook {
    pub fn new() -> Self {
        Workbook::default()
    }

    /// Appends a sheet. A name that is already present keeps its position
    /// and has its contents replaced.
    pub fn push_sheet(&mut self, name: impl Into<String>, data: SheetData) {
        let name = name.into();
        if !self.sheets.contains_key(&name) {
            self.sheet_names.push(name.clone());
        }
        self.sheets.insert(name, data);
    }

    pub fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    pub fn first_sheet(&self) -> Option<&str> {
        self.sheet_names.first().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sheets.contains_key(name)
    }

    pub fn sheet(&self, name: &str) -> Option<&SheetData> {
        self.sheets.get(name)
    }

    /// Sheets in document order.
    pub fn sheets(&self) -> impl Iterator<Item = (&str, &SheetData)> {
        self.sheet_names
            .iter()
            .filter_map(|name| self.sheets.get(name).map(|data| (name.as_str(), data)))
    }

    pub fn len(&self) -> usize {
        self.sheet_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheet_names.is_empty()
    }

    /// Replaces the stored contents of an existing sheet.
    pub fn replace_sheet(&mut self, name: &str, data: SheetData) -> Result<(), UnknownSheetError> {
        match self.sheets.get_mut(name) {
            Some(slot) => {
                *slot = data;
                Ok(())
            }
            None => Err(UnknownSheetError(name.to_string())),
        }
    }

    /// Grid for `name`, derived exactly as on first load.
    pub fn grid_for(&self, name: &str) -> Result<Grid, UnknownSheetError> {
        self.sheet(name)
            .map(SheetData::to_grid)
            .ok_or_else(|| UnknownSheetError(name.to_string()))
    }
}
