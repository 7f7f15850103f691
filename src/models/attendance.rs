// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Attendance state for the loaded seat layout.
//!
//! This module defines the per-seat status enum and the mutable store
//! mapping seat ids to statuses. The store is sparse: seats nobody has
//! marked carry no record and read back as `Unmarked`.

use crate::models::seat::SeatLayout;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised by attendance mutations.
#[derive(Error, Debug)]
pub enum AttendanceError {
    /// Status write targeting an id absent from the current layout.
    #[error("unknown seat id {0:?}")]
    UnknownSeat(String),
}

/// Occupancy status of one seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    Present,
    Absent,
    Uncertain,
    /// Implicit default for seats with no record; never stored.
    Unmarked,
}

impl SeatStatus {
    /// Display label for menus and the summary panel.
    pub fn label(self) -> &'static str {
        match self {
            SeatStatus::Present => "Present",
            SeatStatus::Absent => "Absent",
            SeatStatus::Uncertain => "Uncertain",
            SeatStatus::Unmarked => "Unmarked",
        }
    }
}

/// Per-status counts over a full layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AttendanceSummary {
    pub present: usize,
    pub absent: usize,
    pub uncertain: usize,
    pub unmarked: usize,
}

impl AttendanceSummary {
    /// Total seats counted; always equals the layout size.
    pub fn total(&self) -> usize {
        self.present + self.absent + self.uncertain + self.unmarked
    }
}

/// Mutable mapping from seat id to status.
///
/// Populated by a derived or server-pushed snapshot, then mutated by
/// local marking actions. Every read returns a defined status.
#[derive(Debug, Clone, Default)]
pub struct AttendanceStore {
    records: HashMap<String, SeatStatus>,
}

impl AttendanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard prior contents and install the snapshot.
    ///
    /// The inner map is replaced in a single assignment, so no reader can
    /// observe a mix of pre- and post-replace records. `Unmarked` entries
    /// in the snapshot are not stored (sparse-map invariant).
    pub fn replace_all(&mut self, snapshot: HashMap<String, SeatStatus>) {
        let mut records = snapshot;
        records.retain(|_, status| *status != SeatStatus::Unmarked);
        self.records = records;
    }

    /// Insert or overwrite one record.
    ///
    /// Rejects ids outside the current layout: a status for a seat that
    /// does not exist is meaningless and must not be stored. Setting
    /// `Unmarked` removes the record.
    pub fn set_status(
        &mut self,
        seat_id: &str,
        status: SeatStatus,
        layout: &SeatLayout,
    ) -> Result<(), AttendanceError> {
        if !layout.contains(seat_id) {
            return Err(AttendanceError::UnknownSeat(seat_id.to_string()));
        }
        if status == SeatStatus::Unmarked {
            self.records.remove(seat_id);
        } else {
            self.records.insert(seat_id.to_string(), status);
        }
        Ok(())
    }

    /// Status of one seat, defaulting to `Unmarked`.
    pub fn get(&self, seat_id: &str) -> SeatStatus {
        self.records
            .get(seat_id)
            .copied()
            .unwrap_or(SeatStatus::Unmarked)
    }

    /// Count every seat in the layout into exactly one status bucket.
    pub fn summarize(&self, layout: &SeatLayout) -> AttendanceSummary {
        let mut summary = AttendanceSummary::default();
        for seat in layout.all() {
            match self.get(&seat.id) {
                SeatStatus::Present => summary.present += 1,
                SeatStatus::Absent => summary.absent += 1,
                SeatStatus::Uncertain => summary.uncertain += 1,
                SeatStatus::Unmarked => summary.unmarked += 1,
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::seat::{SeatDims, SeatRow};

    fn layout_abc() -> SeatLayout {
        let mut layout = SeatLayout::new();
        layout.load(
            SeatRow::parse_table("0,0,A1\n50,0,A2\n100,0,A3").unwrap(),
            SeatDims {
                width: 40.0,
                height: 40.0,
            },
        );
        layout
    }

    #[test]
    fn test_get_defaults_to_unmarked() {
        let store = AttendanceStore::new();
        assert_eq!(store.get("A1"), SeatStatus::Unmarked);
    }

    #[test]
    fn test_set_status_rejects_unknown_seat() {
        let layout = layout_abc();
        let mut store = AttendanceStore::new();
        store
            .set_status("A1", SeatStatus::Present, &layout)
            .unwrap();
        let err = store
            .set_status("Z9", SeatStatus::Absent, &layout)
            .unwrap_err();
        assert!(matches!(err, AttendanceError::UnknownSeat(id) if id == "Z9"));
        // Store unchanged by the rejected write
        assert_eq!(store.get("A1"), SeatStatus::Present);
        assert_eq!(store.get("Z9"), SeatStatus::Unmarked);
    }

    #[test]
    fn test_set_unmarked_removes_record() {
        let layout = layout_abc();
        let mut store = AttendanceStore::new();
        store
            .set_status("A2", SeatStatus::Uncertain, &layout)
            .unwrap();
        store
            .set_status("A2", SeatStatus::Unmarked, &layout)
            .unwrap();
        assert_eq!(store.get("A2"), SeatStatus::Unmarked);
        assert_eq!(store.summarize(&layout).unmarked, 3);
    }

    #[test]
    fn test_replace_all_installs_snapshot_verbatim() {
        let layout = layout_abc();
        let mut store = AttendanceStore::new();
        store
            .set_status("A3", SeatStatus::Uncertain, &layout)
            .unwrap();

        let mut snapshot = HashMap::new();
        snapshot.insert("A1".to_string(), SeatStatus::Present);
        snapshot.insert("A2".to_string(), SeatStatus::Absent);
        store.replace_all(snapshot);

        assert_eq!(store.get("A1"), SeatStatus::Present);
        assert_eq!(store.get("A2"), SeatStatus::Absent);
        // Prior local edit discarded by the replace
        assert_eq!(store.get("A3"), SeatStatus::Unmarked);
    }

    #[test]
    fn test_summarize_counts_sum_to_layout_size() {
        let layout = layout_abc();
        let mut store = AttendanceStore::new();
        store
            .set_status("A1", SeatStatus::Present, &layout)
            .unwrap();
        store
            .set_status("A2", SeatStatus::Absent, &layout)
            .unwrap();

        let summary = store.summarize(&layout);
        assert_eq!(summary.present, 1);
        assert_eq!(summary.absent, 1);
        assert_eq!(summary.uncertain, 0);
        assert_eq!(summary.unmarked, 1);
        assert_eq!(summary.total(), layout.len());
    }

    #[test]
    fn test_layout_reload_invalidates_omitted_seats() {
        let layout_before = layout_abc();
        let mut store = AttendanceStore::new();
        store
            .set_status("A3", SeatStatus::Present, &layout_before)
            .unwrap();

        // A new layout arrives that omits A3
        let mut layout = SeatLayout::new();
        layout.load(
            SeatRow::parse_table("0,0,A1\n50,0,A2").unwrap(),
            SeatDims {
                width: 40.0,
                height: 40.0,
            },
        );
        let mut snapshot = HashMap::new();
        snapshot.insert("A1".to_string(), SeatStatus::Present);
        snapshot.insert("A2".to_string(), SeatStatus::Absent);
        store.replace_all(snapshot);

        let err = store
            .set_status("A3", SeatStatus::Uncertain, &layout)
            .unwrap_err();
        assert!(matches!(err, AttendanceError::UnknownSeat(_)));
        assert_eq!(store.summarize(&layout).total(), 2);
    }

    #[test]
    fn test_status_wire_tokens_are_lowercase() {
        assert_eq!(
            serde_json::to_string(&SeatStatus::Present).unwrap(),
            "\"present\""
        );
        let status: SeatStatus = serde_json::from_str("\"uncertain\"").unwrap();
        assert_eq!(status, SeatStatus::Uncertain);
    }
}
