//! Writing tables back to delimited files.

use std::fs;
use std::path::Path;

use crate::error::{Result, ScourError};

use super::frame::Table;

impl Table {
    /// Write the table as comma-separated values using each cell's
    /// canonical text form. Parent directories are created as needed.
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        self.write_delimited(path, b',')
    }

    /// Write the table with a custom delimiter.
    pub fn write_delimited(&self, path: impl AsRef<Path>, delimiter: u8) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ScourError::io(parent, e))?;
        }

        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_path(path)?;
        writer.write_record(self.column_names())?;
        for row in 0..self.row_count() {
            writer.write_record(self.columns().map(|(_, c)| c[row].to_text()))?;
        }
        writer.flush().map_err(|e| ScourError::io(path, e))?;
        Ok(())
    }
}
