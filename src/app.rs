// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module owns the session: the seat layout, the attendance store,
//! the viewport transform, transient interaction state, and the sync
//! channel. Every mutation happens in `update()` in reaction to a
//! discrete event (inbound sync message, pointer action), each handled
//! to completion before the next.

use crate::io::media::LoadedImage;
use crate::models::attendance::AttendanceStore;
use crate::models::seat::SeatLayout;
use crate::sync::channel::{ChannelState, SyncChannel, SyncEvent};
use crate::sync::derive::derive_snapshot;
use crate::sync::protocol::{Occupancy, Snapshot};
use crate::ui::{canvas, summary, toolbar};
use crate::util::projection::ViewportTransform;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};

/// Transient per-session interaction state. Not attendance data; reset
/// on assignment completion, cancellation, and layout reload.
#[derive(Debug, Default)]
pub struct InteractionState {
    /// Seat currently under the pointer.
    pub hovered_seat: Option<String>,
    /// Seat targeted by the open context menu.
    pub active_seat: Option<String>,
    /// Screen position of the open context menu.
    pub menu_pos: Option<egui::Pos2>,
}

impl InteractionState {
    /// Close the context menu (assignment done or cancelled).
    pub fn close_menu(&mut self) {
        self.active_seat = None;
        self.menu_pos = None;
    }

    /// Drop everything, including hover (layout reload).
    pub fn clear(&mut self) {
        self.hovered_seat = None;
        self.close_menu();
    }
}

/// Startup configuration resolved from the command line.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// WebSocket URL of the sync authority, auth token already applied.
    pub server_url: Option<String>,
    /// Venue photograph to open at startup.
    pub image: Option<PathBuf>,
    /// Seat table to load at startup (dims document expected alongside).
    pub layout: Option<PathBuf>,
}

/// Main application state.
pub struct SeatmarkApp {
    /// Static seat geometry for the open venue view
    layout: SeatLayout,

    /// Per-seat attendance statuses
    store: AttendanceStore,

    /// Active viewport transform (scale + pan offsets)
    transform: ViewportTransform,

    /// Transient hover/menu state
    interaction: InteractionState,

    /// Connection to the sync authority, if configured
    sync_channel: Option<SyncChannel>,

    /// Last reported connection state
    channel_state: ChannelState,

    /// Loaded venue photograph for display
    image_texture: Option<egui::TextureHandle>,

    /// Image dimensions (width, height)
    image_size: Option<(u32, u32)>,

    /// Receiver for background image loading
    image_loader: Option<Receiver<Result<LoadedImage, String>>>,

    /// Loading state message
    loading_message: Option<String>,

    /// Canvas size from the previous frame, for centered zoom commands
    canvas_size: egui::Vec2,
}

impl SeatmarkApp {
    /// Create the application and kick off any startup loads.
    pub fn new(config: SessionConfig) -> Self {
        let sync_channel = config.server_url.map(SyncChannel::connect);
        let channel_state = if sync_channel.is_some() {
            ChannelState::Connecting
        } else {
            ChannelState::Closed
        };

        let mut app = Self {
            layout: SeatLayout::new(),
            store: AttendanceStore::new(),
            transform: ViewportTransform::default(),
            interaction: InteractionState::default(),
            sync_channel,
            channel_state,
            image_texture: None,
            image_size: None,
            image_loader: None,
            loading_message: None,
            canvas_size: egui::Vec2::ZERO,
        };

        if let Some(path) = config.image {
            app.load_image_file(path);
        }
        if let Some(path) = config.layout {
            app.load_layout_file(&path);
        }
        app
    }

    /// Load a venue photograph asynchronously (decode off the UI thread).
    pub fn load_image_file(&mut self, path: PathBuf) {
        let (sender, receiver) = channel();
        self.image_loader = Some(receiver);
        self.loading_message = Some("Loading image...".to_string());

        std::thread::spawn(move || {
            let result = crate::io::media::load_image(&path)
                .map_err(|e| format!("Failed to load image: {e}"));
            if let Ok(ref image) = result {
                log::info!(
                    "Loaded image: {} ({}x{})",
                    path.display(),
                    image.width,
                    image.height
                );
            }
            let _ = sender.send(result);
        });
    }

    /// Load a seat table and its dims document from disk.
    fn load_layout_file(&mut self, path: &Path) {
        let loaded = crate::io::layout::load_seat_rows(path).and_then(|rows| {
            let dims = crate::io::layout::load_seat_dims(&crate::io::layout::sibling_dims_path(
                path,
            ))?;
            Ok((rows, dims))
        });
        match loaded {
            Ok((rows, dims)) => {
                self.layout.load(rows, dims);
                // A fresh layout starts with no marks until a snapshot arrives
                self.store.replace_all(HashMap::new());
                self.interaction.clear();
                log::info!(
                    "Loaded seat layout from {} ({} seats)",
                    path.display(),
                    self.layout.len()
                );
            }
            Err(e) => {
                log::error!("Failed to load seat layout: {e:#}");
            }
        }
    }

    /// Apply one full snapshot from the authority: replace the layout,
    /// then install (or derive) the status mapping.
    fn apply_snapshot(&mut self, snapshot: Snapshot) {
        let Snapshot {
            rows,
            dims,
            occupancy,
        } = snapshot;
        let mapping = match occupancy {
            Occupancy::EmptySeats(empty_rows) => derive_snapshot(&rows, &empty_rows),
            Occupancy::Statuses(mapping) => mapping,
        };
        self.layout.load(rows, dims);
        self.store.replace_all(mapping);
        self.interaction.clear();
        log::info!("Applied snapshot: {} seats", self.layout.len());
    }

    /// Export the current attendance report.
    fn export_report(&self, path: PathBuf) {
        let report = crate::io::serialization::AttendanceReport::build(&self.layout, &self.store);
        let extension = path.extension().and_then(|s| s.to_str());
        let result = match extension {
            Some("yaml") | Some("yml") => crate::io::serialization::export_yaml(&report, &path),
            Some("json") => crate::io::serialization::export_json(&report, &path),
            _ => {
                log::error!("Unsupported file extension: {extension:?}");
                return;
            }
        };

        match result {
            Ok(_) => log::info!("Exported attendance report to {}", path.display()),
            Err(e) => log::error!("Failed to export attendance report: {e}"),
        }
    }

    /// Apply a toolbar/menu viewport command about the canvas center.
    fn apply_viewport_command(&mut self, action: toolbar::ToolbarAction) {
        let center = self.canvas_size / 2.0;
        match action {
            toolbar::ToolbarAction::ZoomIn => self.transform.zoom_in(center.x, center.y),
            toolbar::ToolbarAction::ZoomOut => self.transform.zoom_out(center.x, center.y),
            toolbar::ToolbarAction::Reset => self.transform.reset(),
            toolbar::ToolbarAction::Center => {
                if let Some((img_width, img_height)) = self.image_size {
                    self.transform.center(
                        self.canvas_size.x,
                        self.canvas_size.y,
                        img_width as f32,
                        img_height as f32,
                    );
                }
            }
            toolbar::ToolbarAction::None => {}
        }
    }

    /// Drain pending sync events, applying each fully before the next.
    fn drain_sync_events(&mut self) {
        loop {
            let event = match &self.sync_channel {
                Some(channel) => channel.try_recv(),
                None => None,
            };
            let Some(event) = event else { break };
            match event {
                SyncEvent::State(state) => {
                    if state != self.channel_state {
                        log::info!("Sync channel: {}", state.label());
                    }
                    self.channel_state = state;
                }
                SyncEvent::Snapshot(snapshot) => self.apply_snapshot(snapshot),
            }
        }
    }
}

impl eframe::App for SeatmarkApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for completed image loading
        if let Some(ref receiver) = self.image_loader {
            if let Ok(result) = receiver.try_recv() {
                self.image_loader = None;
                self.loading_message = None;

                match result {
                    Ok(loaded) => {
                        let size = [loaded.width as usize, loaded.height as usize];
                        let color_image =
                            egui::ColorImage::from_rgba_unmultiplied(size, &loaded.pixels);
                        let texture = ctx.load_texture(
                            "venue_image",
                            color_image,
                            egui::TextureOptions::LINEAR,
                        );
                        self.image_texture = Some(texture);
                        self.image_size = Some((loaded.width, loaded.height));
                        log::info!("Image loaded successfully");
                    }
                    Err(e) => {
                        log::error!("Failed to load image: {e}");
                    }
                }
            }
        }

        // Request repaint if still loading (to update spinner)
        if self.loading_message.is_some() {
            ctx.request_repaint();
        }

        // Apply authority messages in arrival order before drawing
        self.drain_sync_events();

        // Keep polling while a channel is live so snapshots apply
        // promptly even without pointer activity
        if self.sync_channel.is_some() {
            ctx.request_repaint_after(std::time::Duration::from_millis(250));
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Image...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Images", &["jpg", "jpeg", "png", "bmp", "tiff", "tif"])
                            .pick_file()
                        {
                            self.load_image_file(path);
                        }
                        ui.close_menu();
                    }
                    if ui.button("Open Seat Layout...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Seat tables", &["csv", "txt"])
                            .pick_file()
                        {
                            self.load_layout_file(&path);
                        }
                        ui.close_menu();
                    }
                    ui.separator();
                    ui.menu_button("Export Attendance", |ui| {
                        if ui.button("Export as YAML...").clicked() {
                            if let Some(path) = rfd::FileDialog::new()
                                .add_filter("YAML", &["yaml", "yml"])
                                .set_file_name("attendance.yaml")
                                .save_file()
                            {
                                self.export_report(path);
                            }
                            ui.close_menu();
                        }
                        if ui.button("Export as JSON...").clicked() {
                            if let Some(path) = rfd::FileDialog::new()
                                .add_filter("JSON", &["json"])
                                .set_file_name("attendance.json")
                                .save_file()
                            {
                                self.export_report(path);
                            }
                            ui.close_menu();
                        }
                    });
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("View", |ui| {
                    if ui.button("Zoom In").clicked() {
                        self.apply_viewport_command(toolbar::ToolbarAction::ZoomIn);
                        ui.close_menu();
                    }
                    if ui.button("Zoom Out").clicked() {
                        self.apply_viewport_command(toolbar::ToolbarAction::ZoomOut);
                        ui.close_menu();
                    }
                    if ui.button("Reset Zoom").clicked() {
                        self.apply_viewport_command(toolbar::ToolbarAction::Reset);
                        ui.close_menu();
                    }
                    if ui.button("Center").clicked() {
                        self.apply_viewport_command(toolbar::ToolbarAction::Center);
                        ui.close_menu();
                    }
                });
            });
        });

        // Toolbar
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| toolbar::show(ui, self.transform.scale * 100.0))
            .inner;
        self.apply_viewport_command(toolbar_action);

        // Summary panel (right side)
        egui::SidePanel::right("summary")
            .default_width(220.0)
            .show(ctx, |ui| {
                let channel_state = self.sync_channel.as_ref().map(|_| self.channel_state);
                summary::show(ui, &self.layout, &self.store, channel_state);
            });

        // Escape cancels an in-progress status assignment
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.interaction.close_menu();
        }

        // Main canvas (center)
        let canvas_action = egui::CentralPanel::default()
            .show(ctx, |ui| {
                self.canvas_size = ui.available_size();

                if let Some(ref message) = self.loading_message {
                    ui.centered_and_justified(|ui| {
                        ui.vertical_centered(|ui| {
                            ui.add_space(20.0);
                            ui.spinner();
                            ui.add_space(10.0);
                            ui.label(
                                egui::RichText::new(message)
                                    .size(16.0)
                                    .color(egui::Color32::from_gray(200)),
                            );
                        });
                    });
                    canvas::CanvasAction::None
                } else {
                    canvas::show(
                        ui,
                        &self.image_texture,
                        self.image_size,
                        &self.layout,
                        &self.store,
                        &mut self.transform,
                        &mut self.interaction,
                    )
                }
            })
            .inner;

        // Handle canvas actions
        match canvas_action {
            canvas::CanvasAction::AssignStatus { seat_id, status } => {
                match self.store.set_status(&seat_id, status, &self.layout) {
                    Ok(()) => {
                        log::info!("Marked seat {seat_id} as {}", status.label());
                        if let Some(ref channel) = self.sync_channel {
                            channel.send_status(&seat_id, status);
                        }
                    }
                    Err(e) => {
                        log::warn!("Rejected status write: {e}");
                    }
                }
                self.interaction.close_menu();
            }
            canvas::CanvasAction::Cancel => {
                self.interaction.close_menu();
            }
            canvas::CanvasAction::None => {}
        }
    }
}
