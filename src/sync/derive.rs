// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Initial occupancy classification.
//!
//! Turns the two independently-sourced seat lists (all seats, empty
//! seats) into a status snapshot: a seat is occupied unless explicitly
//! listed as empty.

use crate::models::attendance::SeatStatus;
use crate::models::seat::SeatRow;
use std::collections::{HashMap, HashSet};

/// Derive a status mapping from the all-seats and empty-seats lists.
///
/// Every row in `all_rows` yields exactly one record: `Absent` if its id
/// appears in `empty_rows` (exact string match), else `Present`. Ids in
/// `empty_rows` with no matching seat cannot correspond to a real seat
/// and contribute nothing.
pub fn derive_snapshot(all_rows: &[SeatRow], empty_rows: &[SeatRow]) -> HashMap<String, SeatStatus> {
    let empty_ids: HashSet<&str> = empty_rows.iter().map(|row| row.id.as_str()).collect();
    all_rows
        .iter()
        .map(|row| {
            let status = if empty_ids.contains(row.id.as_str()) {
                SeatStatus::Absent
            } else {
                SeatStatus::Present
            };
            (row.id.clone(), status)
        })
        .collect()
}
