// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Attendance report export.
//!
//! This module builds a full attendance report (one row per seat in
//! layout order plus the summary counts) and exports it in YAML or
//! JSON format.

use crate::models::attendance::{AttendanceStore, AttendanceSummary, SeatStatus};
use crate::models::seat::SeatLayout;
use anyhow::Result;
use serde::Serialize;
use std::path::Path;

/// One exported row: a seat and its current status.
#[derive(Debug, Clone, Serialize)]
pub struct SeatReportRow {
    pub id: String,
    pub status: SeatStatus,
}

/// Complete attendance report for one venue view.
#[derive(Debug, Serialize)]
pub struct AttendanceReport {
    pub seats: Vec<SeatReportRow>,
    pub summary: AttendanceSummary,
}

impl AttendanceReport {
    /// Build a report covering every seat in the layout, in load order.
    pub fn build(layout: &SeatLayout, store: &AttendanceStore) -> Self {
        let seats = layout
            .all()
            .map(|seat| SeatReportRow {
                id: seat.id.clone(),
                status: store.get(&seat.id),
            })
            .collect();
        Self {
            seats,
            summary: store.summarize(layout),
        }
    }
}

/// Export an attendance report to YAML format.
pub fn export_yaml(report: &AttendanceReport, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(report)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

/// Export an attendance report to JSON format.
pub fn export_json(report: &AttendanceReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::seat::{SeatDims, SeatRow};

    #[test]
    fn test_report_covers_every_seat_in_load_order() {
        let mut layout = SeatLayout::new();
        layout.load(
            SeatRow::parse_table("0,0,A1\n50,0,A2\n100,0,A3").unwrap(),
            SeatDims {
                width: 40.0,
                height: 40.0,
            },
        );
        let mut store = AttendanceStore::new();
        store
            .set_status("A2", SeatStatus::Absent, &layout)
            .unwrap();

        let report = AttendanceReport::build(&layout, &store);
        let ids: Vec<&str> = report.seats.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["A1", "A2", "A3"]);
        assert_eq!(report.seats[1].status, SeatStatus::Absent);
        assert_eq!(report.summary.total(), 3);
        assert_eq!(report.summary.unmarked, 2);
    }
}
