// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Viewport control toolbar.
//!
//! This module provides the zoom/pan control strip above the canvas.
//! The buttons emit actions so the app can apply them with the current
//! canvas geometry.

/// Result of toolbar interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    None,
    ZoomIn,
    ZoomOut,
    Reset,
    Center,
}

/// Display the viewport controls.
pub fn show(ui: &mut egui::Ui, zoom_percent: f32) -> ToolbarAction {
    let mut action = ToolbarAction::None;
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label("View:");

        ui.separator();

        if ui.button("Zoom In (+)").clicked() {
            action = ToolbarAction::ZoomIn;
        }
        if ui.button("Zoom Out (-)").clicked() {
            action = ToolbarAction::ZoomOut;
        }
        if ui.button("Reset").clicked() {
            action = ToolbarAction::Reset;
        }
        if ui.button("Center").clicked() {
            action = ToolbarAction::Center;
        }

        ui.separator();

        ui.label(format!("{zoom_percent:.0}%"));

        ui.separator();

        ui.label(
            egui::RichText::new("Drag to pan, scroll to zoom, right-click seats to mark")
                .italics()
                .weak(),
        );
    });
    action
}
