// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! SEATMARK - Seat occupancy marking for venue photographs
//!
//! A cross-platform desktop application for marking per-seat attendance
//! (present / absent / uncertain) over a wide-angle venue photograph,
//! synchronized with a remote seat authority.

mod app;
mod io;
mod models;
mod sync;
mod ui;
mod util;

use anyhow::Result;
use app::{SeatmarkApp, SessionConfig};
use clap::Parser;
use std::path::PathBuf;

/// Seat occupancy marking tool.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// WebSocket URL of the seat authority (e.g. ws://localhost:8080)
    #[arg(short, long)]
    server_url: Option<String>,

    /// Opaque auth token passed to the authority as a connection parameter
    #[arg(short, long)]
    auth_token: Option<String>,

    /// Venue photograph to open at startup
    #[arg(long)]
    image: Option<PathBuf>,

    /// Seat table to load at startup (expects seat_dims.json alongside)
    #[arg(long)]
    layout: Option<PathBuf>,
}

impl CliArgs {
    fn into_config(self) -> SessionConfig {
        let server_url = self.server_url.map(|url| match self.auth_token {
            Some(token) => format!("{url}?x-authenticated-netid={token}"),
            None => url,
        });
        SessionConfig {
            server_url,
            image: self.image,
            layout: self.layout,
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let config = CliArgs::parse().into_config();

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("SEATMARK - Seat Occupancy Marking"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "SEATMARK",
        options,
        Box::new(move |_cc| Ok(Box::new(SeatmarkApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
