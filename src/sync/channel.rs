// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Persistent connection to the sync authority.
//!
//! A dedicated thread owns a blocking WebSocket and forwards decoded
//! snapshots to the UI thread over an ordered mpsc queue; the UI drains
//! the queue once per frame and applies each event fully before the
//! next. Each connection runs `Connecting -> Open -> Closed`; after
//! `Closed` the worker dials a fresh connection with exponential
//! backoff. Outbound status updates are fire-and-forget.

use crate::models::attendance::SeatStatus;
use crate::sync::protocol::{self, Snapshot, SyncError};
use std::io::ErrorKind;
use std::net::TcpStream;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Error as WsError, Message, WebSocket};

const READ_TIMEOUT: Duration = Duration::from_millis(250);
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Connection lifecycle of one dial attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Connecting,
    Open,
    Closed,
}

impl ChannelState {
    pub fn label(self) -> &'static str {
        match self {
            ChannelState::Connecting => "Connecting",
            ChannelState::Open => "Connected",
            ChannelState::Closed => "Disconnected",
        }
    }
}

/// Events delivered to the UI thread, in arrival order.
#[derive(Debug)]
pub enum SyncEvent {
    /// Connection state changed; drives the disconnected indicator.
    State(ChannelState),
    /// A full snapshot arrived and parsed cleanly.
    Snapshot(Snapshot),
}

/// Handle to the sync worker thread.
pub struct SyncChannel {
    events: Receiver<SyncEvent>,
    outbound: Sender<String>,
    shutdown: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl SyncChannel {
    /// Spawn the worker and start dialing the authority.
    pub fn connect(url: String) -> Self {
        let (event_tx, event_rx) = channel();
        let (outbound_tx, outbound_rx) = channel();
        let shutdown = Arc::new(AtomicBool::new(false));
        let worker_shutdown = Arc::clone(&shutdown);

        let worker = std::thread::Builder::new()
            .name("seatmark-sync".to_string())
            .spawn(move || run_worker(url, event_tx, outbound_rx, worker_shutdown))
            .ok();

        Self {
            events: event_rx,
            outbound: outbound_tx,
            shutdown,
            worker,
        }
    }

    /// Next pending event, if any. Non-blocking; called once per frame
    /// in a drain loop so events apply in arrival order.
    pub fn try_recv(&self) -> Option<SyncEvent> {
        self.events.try_recv().ok()
    }

    /// Forward a local status change upstream. Fire-and-forget: no ack,
    /// no retry, and updates queued while disconnected are dropped.
    pub fn send_status(&self, seat_id: &str, status: SeatStatus) {
        let frame = protocol::encode_status_update(seat_id, status);
        let _ = self.outbound.send(frame);
    }

    /// Stop the worker permanently. A new channel must be created to
    /// resume syncing.
    pub fn shutdown(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        // The worker exits on its next timeout tick; don't block the UI
        // thread waiting for it.
        self.worker.take();
    }
}

impl Drop for SyncChannel {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Reconnect loop: dial, run the connection to failure, back off, redial.
fn run_worker(
    url: String,
    events: Sender<SyncEvent>,
    outbound: Receiver<String>,
    shutdown: Arc<AtomicBool>,
) {
    let mut backoff = INITIAL_BACKOFF;
    while !shutdown.load(Ordering::Relaxed) {
        if events.send(SyncEvent::State(ChannelState::Connecting)).is_err() {
            return;
        }

        match tungstenite::connect(url.as_str()) {
            Ok((socket, _response)) => {
                log::info!("Sync channel open to {url}");
                backoff = INITIAL_BACKOFF;
                if events.send(SyncEvent::State(ChannelState::Open)).is_err() {
                    return;
                }
                let reason = run_connection(socket, &events, &outbound, &shutdown);
                log::warn!("Sync channel closed: {reason}");
            }
            Err(e) => {
                log::warn!("Sync connect to {url} failed: {e}");
            }
        }

        if events.send(SyncEvent::State(ChannelState::Closed)).is_err() {
            return;
        }
        sleep_interruptible(backoff, &shutdown);
        backoff = next_backoff(backoff);
    }
}

/// Drive one open connection until transport failure or shutdown.
fn run_connection(
    mut socket: WebSocket<MaybeTlsStream<TcpStream>>,
    events: &Sender<SyncEvent>,
    outbound: &Receiver<String>,
    shutdown: &Arc<AtomicBool>,
) -> SyncError {
    // Short read timeout so the loop can poll outbound sends and the
    // shutdown flag between frames.
    if let MaybeTlsStream::Plain(stream) = socket.get_mut() {
        if let Err(e) = stream.set_read_timeout(Some(READ_TIMEOUT)) {
            return SyncError::ChannelClosed(format!("set_read_timeout failed: {e}"));
        }
    }

    // Updates queued while disconnected are stale; drop them.
    while outbound.try_recv().is_ok() {}

    loop {
        if shutdown.load(Ordering::Relaxed) {
            let _ = socket.close(None);
            return SyncError::ChannelClosed("shutdown".to_string());
        }

        while let Ok(frame) = outbound.try_recv() {
            if let Err(e) = socket.send(Message::text(frame)) {
                log::warn!("Dropped outbound update: {e}");
            }
        }

        match socket.read() {
            Ok(Message::Text(text)) => match protocol::decode_frame(&text) {
                Ok(Some(snapshot)) => {
                    if events.send(SyncEvent::Snapshot(snapshot)).is_err() {
                        return SyncError::ChannelClosed("event receiver dropped".to_string());
                    }
                }
                Ok(None) => {
                    log::debug!("Ignoring message with unknown type");
                }
                Err(e) => {
                    log::warn!("Dropped inbound message: {e}");
                }
            },
            Ok(Message::Close(_)) => {
                return SyncError::ChannelClosed("close frame from authority".to_string());
            }
            // Binary frames are not part of the protocol; ping/pong is
            // handled inside tungstenite.
            Ok(_) => {}
            Err(WsError::Io(e))
                if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::TimedOut => {}
            Err(WsError::ConnectionClosed | WsError::AlreadyClosed) => {
                return SyncError::ChannelClosed("connection closed".to_string());
            }
            Err(e) => {
                return SyncError::ChannelClosed(format!("transport error: {e}"));
            }
        }
    }
}

fn next_backoff(current: Duration) -> Duration {
    (current * 2).min(MAX_BACKOFF)
}

/// Sleep in short slices so shutdown doesn't wait out a long backoff.
fn sleep_interruptible(total: Duration, shutdown: &Arc<AtomicBool>) {
    let mut remaining = total;
    while !remaining.is_zero() && !shutdown.load(Ordering::Relaxed) {
        let slice = remaining.min(READ_TIMEOUT);
        std::thread::sleep(slice);
        remaining = remaining.saturating_sub(slice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_to_cap() {
        let mut backoff = INITIAL_BACKOFF;
        let mut schedule = Vec::new();
        for _ in 0..7 {
            schedule.push(backoff.as_secs());
            backoff = next_backoff(backoff);
        }
        assert_eq!(schedule, vec![1, 2, 4, 8, 16, 30, 30]);
    }

    #[test]
    fn test_state_labels() {
        assert_eq!(ChannelState::Open.label(), "Connected");
        assert_eq!(ChannelState::Closed.label(), "Disconnected");
    }
}
