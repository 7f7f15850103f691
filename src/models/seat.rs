// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Seat geometry data structures.
//!
//! This module defines the static seat layout: per-seat positions in the
//! source image's pixel space, the shared seat dimensions, and the row
//! table format (`x, y, id`) used by both the local layout file and the
//! sync wire protocol.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised while parsing or loading a seat layout.
#[derive(Error, Debug)]
pub enum LayoutError {
    /// A layout row could not be parsed into `(x, y, id)`.
    #[error("malformed layout row {row}: {reason}")]
    MalformedLayout { row: usize, reason: String },
}

/// One row of the seat table: columns `x, y, id` in that order.
#[derive(Debug, Clone, PartialEq)]
pub struct SeatRow {
    pub x: f64,
    pub y: f64,
    pub id: String,
}

impl SeatRow {
    /// Parse a whole seat table (newline-separated rows, comma-separated
    /// cells, cells trimmed). Blank lines are skipped. Any row with fewer
    /// than three cells or a non-numeric `x`/`y` fails the whole parse.
    pub fn parse_table(text: &str) -> Result<Vec<SeatRow>, LayoutError> {
        let mut rows = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let cells: Vec<&str> = line.split(',').map(str::trim).collect();
            if cells.len() < 3 {
                return Err(LayoutError::MalformedLayout {
                    row: line_no + 1,
                    reason: format!("expected 3 columns (x, y, id), got {}", cells.len()),
                });
            }
            let x: f64 = cells[0].parse().map_err(|_| LayoutError::MalformedLayout {
                row: line_no + 1,
                reason: format!("non-numeric x coordinate {:?}", cells[0]),
            })?;
            let y: f64 = cells[1].parse().map_err(|_| LayoutError::MalformedLayout {
                row: line_no + 1,
                reason: format!("non-numeric y coordinate {:?}", cells[1]),
            })?;
            rows.push(SeatRow {
                x,
                y,
                id: cells[2].to_string(),
            });
        }
        Ok(rows)
    }
}

/// Shared width/height for every seat in a layout, in image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeatDims {
    pub width: f64,
    pub height: f64,
}

/// The side-channel document shape carrying seat dimensions, as written by
/// the layout source (`{"SEAT_WIDTH": ..., "SEAT_HEIGHT": ...}`).
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SeatDimsDoc {
    #[serde(rename = "SEAT_WIDTH")]
    pub seat_width: f64,
    #[serde(rename = "SEAT_HEIGHT")]
    pub seat_height: f64,
}

impl From<SeatDimsDoc> for SeatDims {
    fn from(doc: SeatDimsDoc) -> Self {
        Self {
            width: doc.seat_width,
            height: doc.seat_height,
        }
    }
}

/// A single seat: a fixed rectangle in the source image's coordinate space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seat {
    /// Opaque unique token from the layout source.
    pub id: String,
    /// Top-left position in full-resolution image pixels.
    pub x: f64,
    pub y: f64,
}

/// The complete, ordered seat layout for one venue view.
///
/// Immutable after load except by full replacement; iteration order is
/// load order.
#[derive(Debug, Clone, Default)]
pub struct SeatLayout {
    seats: Vec<Seat>,
    by_id: HashMap<String, usize>,
    dims: Option<SeatDims>,
}

impl SeatLayout {
    /// Create an empty layout (no seats loaded yet).
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire layout atomically.
    ///
    /// Rows with an `id` already seen earlier in the same load are
    /// silently dropped (first occurrence wins) so that a layout source
    /// with duplicate ids cannot break rendering.
    pub fn load(&mut self, rows: Vec<SeatRow>, dims: SeatDims) {
        let mut seats = Vec::with_capacity(rows.len());
        let mut by_id = HashMap::with_capacity(rows.len());
        for row in rows {
            if by_id.contains_key(&row.id) {
                log::warn!("Dropping duplicate seat id {:?} from layout", row.id);
                continue;
            }
            by_id.insert(row.id.clone(), seats.len());
            seats.push(Seat {
                id: row.id,
                x: row.x,
                y: row.y,
            });
        }
        self.seats = seats;
        self.by_id = by_id;
        self.dims = Some(dims);
    }

    /// Look up a seat by id.
    pub fn get(&self, id: &str) -> Option<&Seat> {
        self.by_id.get(id).map(|&i| &self.seats[i])
    }

    /// Whether the layout contains a seat with this id.
    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// All seats, in load order.
    pub fn all(&self) -> impl Iterator<Item = &Seat> {
        self.seats.iter()
    }

    /// Number of seats in the layout.
    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    /// Shared seat dimensions, if a layout has been loaded.
    pub fn dims(&self) -> Option<SeatDims> {
        self.dims
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims() -> SeatDims {
        SeatDims {
            width: 40.0,
            height: 40.0,
        }
    }

    #[test]
    fn test_parse_table_basic() {
        let rows = SeatRow::parse_table("0,0,A1\n50, 0 ,A2\n\n100,0,A3\n").unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].x, 50.0);
        assert_eq!(rows[1].id, "A2");
    }

    #[test]
    fn test_parse_table_rejects_non_numeric() {
        let err = SeatRow::parse_table("0,0,A1\nfoo,0,A2").unwrap_err();
        match err {
            LayoutError::MalformedLayout { row, .. } => assert_eq!(row, 2),
        }
    }

    #[test]
    fn test_parse_table_rejects_short_row() {
        assert!(SeatRow::parse_table("0,0").is_err());
    }

    #[test]
    fn test_load_keeps_first_duplicate() {
        let rows = SeatRow::parse_table("0,0,A1\n50,0,A1\n100,0,A2").unwrap();
        let mut layout = SeatLayout::new();
        layout.load(rows, dims());
        assert_eq!(layout.len(), 2);
        assert_eq!(layout.get("A1").unwrap().x, 0.0);
    }

    #[test]
    fn test_iteration_order_is_load_order() {
        let rows = SeatRow::parse_table("100,0,A3\n0,0,A1\n50,0,A2").unwrap();
        let mut layout = SeatLayout::new();
        layout.load(rows, dims());
        let ids: Vec<&str> = layout.all().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["A3", "A1", "A2"]);
    }

    #[test]
    fn test_load_replaces_prior_layout() {
        let mut layout = SeatLayout::new();
        layout.load(SeatRow::parse_table("0,0,A1\n50,0,A2").unwrap(), dims());
        layout.load(SeatRow::parse_table("0,0,B1").unwrap(), dims());
        assert_eq!(layout.len(), 1);
        assert!(layout.get("A1").is_none());
        assert!(layout.contains("B1"));
    }

    #[test]
    fn test_dims_doc_conversion() {
        let doc: SeatDimsDoc =
            serde_json::from_str(r#"{"SEAT_WIDTH": 40, "SEAT_HEIGHT": 32}"#).unwrap();
        let dims: SeatDims = doc.into();
        assert_eq!(dims.width, 40.0);
        assert_eq!(dims.height, 32.0);
    }
}
