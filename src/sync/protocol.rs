// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Wire protocol for the sync authority.
//!
//! Messages are JSON records tagged by a `type` field. Seat rows travel
//! as the same newline/comma table used by the local layout source, and
//! `seatDims` is a JSON-encoded string (a document nested inside the
//! message, as the authority writes it). Unknown `type` values are
//! ignored; anything else that fails to parse is a `MalformedMessage`.

use crate::models::attendance::SeatStatus;
use crate::models::seat::{SeatDims, SeatDimsDoc, SeatRow};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised by the sync channel.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Inbound payload failed to parse; the message is dropped and the
    /// last good snapshot stays authoritative.
    #[error("malformed message: {0}")]
    MalformedMessage(String),
    /// Transport failure; the connection is done delivering messages.
    #[error("channel closed: {0}")]
    ChannelClosed(String),
}

/// Raw inbound message shapes, tagged by `type`.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum InboundMessage {
    /// Complete layout plus the all-seats / empty-seats classification input.
    #[serde(rename = "full_emptySeats")]
    FullEmptySeats {
        seats: String,
        #[serde(rename = "emptySeats")]
        empty_seats: String,
        #[serde(rename = "seatDims")]
        seat_dims: String,
    },
    /// Complete layout plus a precomputed status mapping.
    #[serde(rename = "full_statuses")]
    FullStatuses {
        seats: String,
        #[serde(rename = "seatDims")]
        seat_dims: String,
        statuses: HashMap<String, String>,
    },
    #[serde(other)]
    Unknown,
}

/// Occupancy input carried by a full snapshot.
#[derive(Debug)]
pub enum Occupancy {
    /// All-seats rows already live in the snapshot; this is the
    /// empty-seats subset to classify against.
    EmptySeats(Vec<SeatRow>),
    /// Precomputed mapping to install verbatim.
    Statuses(HashMap<String, SeatStatus>),
}

/// A decoded full snapshot: layout rows, shared dims, occupancy input.
#[derive(Debug)]
pub struct Snapshot {
    pub rows: Vec<SeatRow>,
    pub dims: SeatDims,
    pub occupancy: Occupancy,
}

/// Decode one inbound text frame.
///
/// Returns `Ok(None)` for messages with an unknown `type` (ignored by
/// contract) and `MalformedMessage` for anything unparseable.
pub fn decode_frame(text: &str) -> Result<Option<Snapshot>, SyncError> {
    let message: InboundMessage = serde_json::from_str(text)
        .map_err(|e| SyncError::MalformedMessage(format!("bad JSON envelope: {e}")))?;

    match message {
        InboundMessage::FullEmptySeats {
            seats,
            empty_seats,
            seat_dims,
        } => {
            let rows = parse_rows(&seats, "seats")?;
            let empty_rows = parse_rows(&empty_seats, "emptySeats")?;
            let dims = parse_dims(&seat_dims)?;
            Ok(Some(Snapshot {
                rows,
                dims,
                occupancy: Occupancy::EmptySeats(empty_rows),
            }))
        }
        InboundMessage::FullStatuses {
            seats,
            seat_dims,
            statuses,
        } => {
            let rows = parse_rows(&seats, "seats")?;
            let dims = parse_dims(&seat_dims)?;
            let mut mapping = HashMap::with_capacity(statuses.len());
            for (seat_id, token) in statuses {
                let status: SeatStatus =
                    serde_json::from_value(serde_json::Value::String(token.clone())).map_err(
                        |_| SyncError::MalformedMessage(format!("unknown status {token:?}")),
                    )?;
                mapping.insert(seat_id, status);
            }
            Ok(Some(Snapshot {
                rows,
                dims,
                occupancy: Occupancy::Statuses(mapping),
            }))
        }
        InboundMessage::Unknown => Ok(None),
    }
}

fn parse_rows(table: &str, field: &str) -> Result<Vec<SeatRow>, SyncError> {
    SeatRow::parse_table(table)
        .map_err(|e| SyncError::MalformedMessage(format!("bad {field} table: {e}")))
}

fn parse_dims(doc: &str) -> Result<SeatDims, SyncError> {
    let doc: SeatDimsDoc = serde_json::from_str(doc)
        .map_err(|e| SyncError::MalformedMessage(format!("bad seatDims: {e}")))?;
    Ok(doc.into())
}

/// Outbound message shapes.
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum OutboundMessage {
    /// Fire-and-forget local status change.
    #[serde(rename = "seat_status")]
    SeatStatus {
        #[serde(rename = "seatId")]
        seat_id: String,
        status: SeatStatus,
    },
}

/// Encode a local status change for upstream forwarding.
pub fn encode_status_update(seat_id: &str, status: SeatStatus) -> String {
    let message = OutboundMessage::SeatStatus {
        seat_id: seat_id.to_string(),
        status,
    };
    // Serializing a tagged enum of plain strings cannot fail.
    serde_json::to_string(&message).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full_empty_seats() {
        let frame = serde_json::json!({
            "type": "full_emptySeats",
            "seats": "0,0,A1\n50,0,A2\n100,0,A3",
            "emptySeats": "50,0,A2",
            "seatDims": "{\"SEAT_WIDTH\": 40, \"SEAT_HEIGHT\": 40}",
        })
        .to_string();

        let snapshot = decode_frame(&frame).unwrap().unwrap();
        assert_eq!(snapshot.rows.len(), 3);
        assert_eq!(snapshot.dims.width, 40.0);
        match snapshot.occupancy {
            Occupancy::EmptySeats(rows) => {
                assert_eq!(rows.len(), 1);
                assert_eq!(rows[0].id, "A2");
            }
            other => panic!("expected EmptySeats, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_full_statuses() {
        let frame = serde_json::json!({
            "type": "full_statuses",
            "seats": "0,0,A1\n50,0,A2",
            "seatDims": "{\"SEAT_WIDTH\": 40, \"SEAT_HEIGHT\": 40}",
            "statuses": {"A1": "present", "A2": "uncertain"},
        })
        .to_string();

        let snapshot = decode_frame(&frame).unwrap().unwrap();
        match snapshot.occupancy {
            Occupancy::Statuses(mapping) => {
                assert_eq!(mapping["A1"], SeatStatus::Present);
                assert_eq!(mapping["A2"], SeatStatus::Uncertain);
            }
            other => panic!("expected Statuses, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_type_is_ignored() {
        let frame = r#"{"type": "heartbeat", "at": 12345}"#;
        assert!(decode_frame(frame).unwrap().is_none());
    }

    #[test]
    fn test_bad_json_is_malformed() {
        let err = decode_frame("{not json").unwrap_err();
        assert!(matches!(err, SyncError::MalformedMessage(_)));
    }

    #[test]
    fn test_bad_seat_dims_is_malformed() {
        let frame = serde_json::json!({
            "type": "full_emptySeats",
            "seats": "0,0,A1",
            "emptySeats": "",
            "seatDims": "not a document",
        })
        .to_string();
        assert!(matches!(
            decode_frame(&frame),
            Err(SyncError::MalformedMessage(_))
        ));
    }

    #[test]
    fn test_bad_row_table_is_malformed() {
        let frame = serde_json::json!({
            "type": "full_emptySeats",
            "seats": "zero,0,A1",
            "emptySeats": "",
            "seatDims": "{\"SEAT_WIDTH\": 40, \"SEAT_HEIGHT\": 40}",
        })
        .to_string();
        assert!(matches!(
            decode_frame(&frame),
            Err(SyncError::MalformedMessage(_))
        ));
    }

    #[test]
    fn test_unknown_status_token_is_malformed() {
        let frame = serde_json::json!({
            "type": "full_statuses",
            "seats": "0,0,A1",
            "seatDims": "{\"SEAT_WIDTH\": 40, \"SEAT_HEIGHT\": 40}",
            "statuses": {"A1": "vacant"},
        })
        .to_string();
        assert!(matches!(
            decode_frame(&frame),
            Err(SyncError::MalformedMessage(_))
        ));
    }

    #[test]
    fn test_encode_status_update() {
        let json = encode_status_update("A2", SeatStatus::Uncertain);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "seat_status");
        assert_eq!(value["seatId"], "A2");
        assert_eq!(value["status"], "uncertain");
    }
}
