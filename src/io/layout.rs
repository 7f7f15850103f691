// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Local seat layout source.
//!
//! When no authority is pushing layouts, seats can be loaded from a
//! row-oriented table file (columns `x, y, id`) plus a side-channel JSON
//! document carrying the shared `SEAT_WIDTH`/`SEAT_HEIGHT`.

use crate::models::seat::{SeatDims, SeatDimsDoc, SeatRow};
use anyhow::{Context, Result};
use std::path::Path;

/// File name of the dims document expected next to the seat table.
pub const DIMS_FILE_NAME: &str = "seat_dims.json";

/// Read and parse the seat table file.
pub fn load_seat_rows(path: &Path) -> Result<Vec<SeatRow>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read seat table {}", path.display()))?;
    let rows = SeatRow::parse_table(&text)
        .with_context(|| format!("failed to parse seat table {}", path.display()))?;
    Ok(rows)
}

/// Read and parse the seat dimensions document.
pub fn load_seat_dims(path: &Path) -> Result<SeatDims> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read seat dims {}", path.display()))?;
    let doc: SeatDimsDoc = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse seat dims {}", path.display()))?;
    Ok(doc.into())
}

/// Locate the dims document next to a seat table file.
pub fn sibling_dims_path(table_path: &Path) -> std::path::PathBuf {
    table_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(DIMS_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_rows_and_dims_from_disk() {
        let dir = std::env::temp_dir().join("seatmark_layout_test");
        std::fs::create_dir_all(&dir).unwrap();
        let table = dir.join("seats.csv");
        std::fs::write(&table, "0,0,A1\n50,0,A2\n").unwrap();
        let dims_path = sibling_dims_path(&table);
        std::fs::write(&dims_path, r#"{"SEAT_WIDTH": 40, "SEAT_HEIGHT": 40}"#).unwrap();

        let rows = load_seat_rows(&table).unwrap();
        assert_eq!(rows.len(), 2);
        let dims = load_seat_dims(&dims_path).unwrap();
        assert_eq!(dims.width, 40.0);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_table_is_an_error() {
        assert!(load_seat_rows(Path::new("/nonexistent/seats.csv")).is_err());
    }
}
