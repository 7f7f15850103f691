// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Attendance summary panel.
//!
//! Live per-status counts over the loaded layout plus the sync
//! connection indicator.

use crate::models::attendance::{AttendanceStore, SeatStatus};
use crate::models::seat::SeatLayout;
use crate::sync::channel::ChannelState;
use crate::ui::canvas::status_color;

/// Display the summary side panel.
pub fn show(
    ui: &mut egui::Ui,
    layout: &SeatLayout,
    store: &AttendanceStore,
    channel_state: Option<ChannelState>,
) {
    ui.heading("Attendance Summary");
    ui.separator();

    if layout.is_empty() {
        ui.label(egui::RichText::new("No seat layout loaded").weak());
    } else {
        let summary = store.summarize(layout);
        count_row(ui, SeatStatus::Present, summary.present);
        count_row(ui, SeatStatus::Absent, summary.absent);
        count_row(ui, SeatStatus::Uncertain, summary.uncertain);
        count_row(ui, SeatStatus::Unmarked, summary.unmarked);
        ui.separator();
        ui.label(format!("Total seats: {}", summary.total()));
    }

    ui.add_space(10.0);
    ui.separator();
    match channel_state {
        Some(state) => {
            let color = match state {
                ChannelState::Open => egui::Color32::from_rgb(0x4c, 0xaf, 0x50),
                ChannelState::Connecting => egui::Color32::from_rgb(0xff, 0x98, 0x00),
                ChannelState::Closed => egui::Color32::from_rgb(0xf4, 0x43, 0x36),
            };
            ui.horizontal(|ui| {
                ui.label("Sync:");
                ui.label(egui::RichText::new(state.label()).color(color));
            });
        }
        None => {
            ui.label(egui::RichText::new("Sync: not configured").weak());
        }
    }
}

fn count_row(ui: &mut egui::Ui, status: SeatStatus, count: usize) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("■").color(status_color(status)));
        ui.label(format!("{}: {count}", status.label()));
    });
}
