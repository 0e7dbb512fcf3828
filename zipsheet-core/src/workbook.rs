use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::{
    error::SheetError,
    layout,
    sheet::{CellValue, Grid, Sheet},
    trigger::Trigger,
};

/// A document of named sheets plus its registered triggers.
///
/// This is the explicit handle every refresh step receives; nothing reaches
/// for an "active" document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Workbook {
    #[serde(default)]
    sheets: Vec<Grid>,
    #[serde(default)]
    triggers: Vec<Trigger>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// A workbook with the interface, hourly and daily sheets laid out and
    /// labelled, but no data.
    pub fn template() -> Self {
        let mut interface = Grid::new(layout::INTERFACE_SHEET);
        for (cell, label) in layout::INTERFACE_LABELS {
            interface.set_value(cell, label.into());
        }

        let mut hourly = Grid::new(layout::HOURLY_SHEET);
        hourly.set_values(1, 1, vec![headers(&layout::HOURLY_HEADERS)]);

        let mut daily = Grid::new(layout::DAILY_SHEET);
        daily.set_values(1, 1, vec![headers(&layout::DAILY_HEADERS)]);

        Self { sheets: vec![interface, hourly, daily], triggers: Vec::new() }
    }

    /// Add a sheet, replacing any existing sheet with the same name.
    pub fn insert_sheet(&mut self, grid: Grid) {
        match self.sheets.iter_mut().find(|s| s.name() == grid.name()) {
            Some(existing) => *existing = grid,
            None => self.sheets.push(grid),
        }
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(|s| s.name())
    }

    pub fn sheet(&self, name: &str) -> Result<&Grid, SheetError> {
        self.sheets
            .iter()
            .find(|s| s.name() == name)
            .ok_or_else(|| SheetError::MissingSheet(name.to_string()))
    }

    pub fn sheet_mut(&mut self, name: &str) -> Result<&mut Grid, SheetError> {
        self.sheets
            .iter_mut()
            .find(|s| s.name() == name)
            .ok_or_else(|| SheetError::MissingSheet(name.to_string()))
    }

    pub fn triggers(&self) -> &[Trigger] {
        &self.triggers
    }

    pub(crate) fn push_trigger(&mut self, trigger: Trigger) {
        self.triggers.push(trigger);
    }

    /// Load a workbook from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read workbook: {}", path.display()))?;

        let workbook: Workbook = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse workbook: {}", path.display()))?;

        Ok(workbook)
    }

    /// Save the workbook as JSON, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create workbook directory: {}", parent.display())
            })?;
        }

        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize workbook to JSON")?;

        fs::write(path, json)
            .with_context(|| format!("Failed to write workbook: {}", path.display()))?;

        Ok(())
    }
}

fn headers(names: &[&str]) -> Vec<CellValue> {
    names.iter().map(|h| CellValue::from(*h)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::CellRef;

    #[test]
    fn template_has_the_three_sheets() {
        let wb = Workbook::template();
        let names: Vec<_> = wb.sheet_names().collect();
        assert_eq!(names, ["interface", "hourly", "daily"]);
    }

    #[test]
    fn template_headers_and_labels() {
        let wb = Workbook::template();

        let hourly = wb.sheet("hourly").unwrap();
        assert_eq!(hourly.value(CellRef::new(1, 1)), CellValue::from("Time"));
        assert_eq!(hourly.value(CellRef::new(1, 8)), CellValue::from("Gusts (mph)"));

        let interface = wb.sheet("interface").unwrap();
        assert_eq!(interface.value(CellRef::new(10, 2)), CellValue::from("Temperature"));
        assert!(interface.value(layout::POSTAL_CODE_CELL).is_empty());
    }

    #[test]
    fn missing_sheet_is_an_error() {
        let mut wb = Workbook::new();
        assert_eq!(wb.sheet_mut("hourly").unwrap_err(), SheetError::MissingSheet("hourly".into()));
    }

    #[test]
    fn insert_sheet_replaces_by_name() {
        let mut wb = Workbook::template();
        let mut replacement = Grid::new("daily");
        replacement.set_value(CellRef::new(1, 1), "x".into());

        wb.insert_sheet(replacement.clone());

        assert_eq!(wb.sheet_names().count(), 3);
        assert_eq!(wb.sheet("daily").unwrap(), &replacement);
    }
}
