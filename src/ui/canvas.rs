// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Overlay canvas: venue photograph, seat hit-regions, context menu.
//!
//! Each seat is projected to its own screen rectangle and allocated as
//! an individually tagged interact region, so hover and right-click
//! resolve directly to a seat id with no geometric search. The canvas
//! also drives drag-to-pan and scroll-zoom on the viewport transform.

use crate::app::InteractionState;
use crate::models::attendance::{AttendanceStore, SeatStatus};
use crate::models::seat::SeatLayout;
use crate::util::projection::{self, ViewportTransform};

/// Result of canvas interaction, applied by the app.
pub enum CanvasAction {
    None,
    /// Assign a status to the seat targeted by the context menu
    /// (`Unmarked` clears the record).
    AssignStatus {
        seat_id: String,
        status: SeatStatus,
    },
    /// Close the context menu without assigning anything.
    Cancel,
}

/// Display the canvas and handle seat interactions.
pub fn show(
    ui: &mut egui::Ui,
    image_texture: &Option<egui::TextureHandle>,
    image_size: Option<(u32, u32)>,
    layout: &SeatLayout,
    store: &AttendanceStore,
    transform: &mut ViewportTransform,
    interaction: &mut InteractionState,
) -> CanvasAction {
    let mut action = CanvasAction::None;
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let available_size = ui.available_size();

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        let (canvas_rect, response) =
            ui.allocate_exact_size(available_size, egui::Sense::click_and_drag());

        let Some(texture) = image_texture else {
            draw_welcome(ui, canvas_rect);
            return;
        };
        let Some((img_width, img_height)) = image_size else {
            return;
        };

        // Pan and zoom on the viewport transform. Zoom keeps the image
        // point under the pointer fixed.
        if response.dragged() {
            let delta = response.drag_delta();
            transform.pan(delta.x, delta.y);
        }
        if response.hovered() {
            let scroll = ui.input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                if let Some(pointer) = response.hover_pos() {
                    let focus = pointer - canvas_rect.min;
                    transform.zoom_about(focus.x, focus.y, (scroll * 0.002).exp());
                }
            }
        }

        // Draw the photograph under the active transform
        let image_rect = egui::Rect::from_min_size(
            canvas_rect.min + egui::vec2(transform.offset_x, transform.offset_y),
            egui::vec2(
                img_width as f32 * transform.scale,
                img_height as f32 * transform.scale,
            ),
        );
        ui.painter().with_clip_rect(canvas_rect).image(
            texture.id(),
            image_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        // Project each seat and allocate its tagged hit-region
        interaction.hovered_seat = None;
        if let Some(dims) = layout.dims() {
            let painter = ui.painter().with_clip_rect(canvas_rect);
            for seat in layout.all() {
                let rect = projection::project(seat, dims, transform);
                let seat_rect = egui::Rect::from_min_size(
                    canvas_rect.min + egui::vec2(rect.left, rect.top),
                    egui::vec2(rect.width, rect.height),
                );
                if !canvas_rect.intersects(seat_rect) {
                    continue;
                }

                let seat_response = ui.interact(
                    seat_rect,
                    ui.id().with(("seat", &seat.id)),
                    egui::Sense::click(),
                );
                if seat_response.hovered() {
                    interaction.hovered_seat = Some(seat.id.clone());
                }
                if seat_response.secondary_clicked() {
                    interaction.active_seat = Some(seat.id.clone());
                    interaction.menu_pos = seat_response.interact_pointer_pos();
                }

                let status = store.get(&seat.id);
                let color = status_color(status);
                let is_hovered = interaction.hovered_seat.as_deref() == Some(seat.id.as_str());
                let is_active = interaction.active_seat.as_deref() == Some(seat.id.as_str());

                painter.rect_filled(seat_rect, 2.0, color.gamma_multiply(0.35));
                let stroke_width = if is_hovered || is_active { 3.0 } else { 1.5 };
                painter.rect_stroke(seat_rect, 2.0, egui::Stroke::new(stroke_width, color));

                if is_hovered {
                    seat_response.on_hover_text(format!("{} - {}", seat.id, status.label()));
                }
            }
        }

        // Left-click on the background closes an open context menu
        if response.clicked() && interaction.active_seat.is_some() {
            action = CanvasAction::Cancel;
        }
    });

    // Context menu for the active seat
    if let (Some(seat_id), Some(menu_pos)) =
        (interaction.active_seat.clone(), interaction.menu_pos)
    {
        if let Some(menu_action) = show_context_menu(ui.ctx(), &seat_id, menu_pos) {
            action = menu_action;
        }
    }

    // Status line
    ui.separator();
    ui.horizontal(|ui| {
        match &interaction.hovered_seat {
            Some(id) => ui.label(format!("Seat: {id}")),
            None => ui.label("Right-click a seat to mark attendance"),
        };
        ui.separator();
        ui.label(format!("Zoom: {:.0}%", transform.scale * 100.0));
    });

    action
}

/// Floating status-assignment menu anchored at the right-click position.
fn show_context_menu(
    ctx: &egui::Context,
    seat_id: &str,
    menu_pos: egui::Pos2,
) -> Option<CanvasAction> {
    let mut action = None;
    egui::Area::new(egui::Id::new("seat_context_menu"))
        .fixed_pos(menu_pos)
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.set_min_width(130.0);
                ui.label(egui::RichText::new(seat_id).strong());
                ui.separator();
                for status in [
                    SeatStatus::Present,
                    SeatStatus::Absent,
                    SeatStatus::Uncertain,
                ] {
                    let text = egui::RichText::new(status.label()).color(status_color(status));
                    if ui.button(text).clicked() {
                        action = Some(CanvasAction::AssignStatus {
                            seat_id: seat_id.to_string(),
                            status,
                        });
                    }
                }
                if ui.button("Clear mark").clicked() {
                    action = Some(CanvasAction::AssignStatus {
                        seat_id: seat_id.to_string(),
                        status: SeatStatus::Unmarked,
                    });
                }
                ui.separator();
                if ui.button("Cancel").clicked() {
                    action = Some(CanvasAction::Cancel);
                }
            });
        });
    action
}

/// Overlay color for a seat status.
pub fn status_color(status: SeatStatus) -> egui::Color32 {
    match status {
        SeatStatus::Present => egui::Color32::from_rgb(0x4c, 0xaf, 0x50),
        SeatStatus::Absent => egui::Color32::from_rgb(0xf4, 0x43, 0x36),
        SeatStatus::Uncertain => egui::Color32::from_rgb(0xff, 0x98, 0x00),
        SeatStatus::Unmarked => egui::Color32::from_rgb(0x21, 0x96, 0xf3),
    }
}

fn draw_welcome(ui: &mut egui::Ui, canvas_rect: egui::Rect) {
    ui.allocate_ui_at_rect(canvas_rect, |ui| {
        ui.centered_and_justified(|ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(20.0);
                ui.heading(
                    egui::RichText::new("SEATMARK")
                        .size(32.0)
                        .color(egui::Color32::from_gray(200)),
                );
                ui.label(
                    egui::RichText::new("Seat occupancy marking for venue photographs")
                        .size(14.0)
                        .color(egui::Color32::from_gray(150)),
                );
                ui.add_space(20.0);
                ui.label(
                    egui::RichText::new("Open a venue photograph to begin marking")
                        .color(egui::Color32::from_gray(180)),
                );
                ui.add_space(10.0);
                ui.label(
                    egui::RichText::new("File > Open Image...")
                        .weak()
                        .color(egui::Color32::from_gray(130)),
                );
            });
        });
    });
}
