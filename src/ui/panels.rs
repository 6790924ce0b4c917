use eframe::egui::{self, Color32, RichText, Ui};

use crate::color::ColorMapKind;
use crate::data::session::Direction;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar – load / export / exclusion / navigation / colormap
// ---------------------------------------------------------------------------

/// Render the control panel.
pub fn controls(ui: &mut Ui, state: &mut AppState) {
    let has_pairs = !state.session.is_empty();

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Load Images Folder").clicked() {
            open_folder_dialog(state);
        }

        if ui
            .add_enabled(has_pairs, egui::Button::new("Export All Depth Images"))
            .clicked()
        {
            export_dialog(state);
        }

        let toggle_text = if state.session.current_excluded() {
            "Include in Export"
        } else {
            "Exclude from Export"
        };
        if ui
            .add_enabled(state.session.cursor().is_some(), egui::Button::new(toggle_text))
            .clicked()
        {
            state.toggle_exclusion();
        }

        ui.label(format!("{} images excluded", state.session.excluded_count()));
    });

    ui.horizontal(|ui: &mut Ui| {
        if ui
            .add_enabled(has_pairs, egui::Button::new("Previous Image (←)"))
            .clicked()
        {
            state.navigate(Direction::Previous);
        }
        if ui
            .add_enabled(has_pairs, egui::Button::new("Next Image (→)"))
            .clicked()
        {
            state.navigate(Direction::Next);
        }

        let label = state.position_label();
        if state.session.current_excluded() {
            ui.label(RichText::new(label).color(Color32::RED));
        } else {
            ui.label(label);
        }
    });

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Colormap:");
        let mut selected = state.color_map;
        egui::ComboBox::from_id_salt("colormap")
            .selected_text(selected.name())
            .width(120.0)
            .show_ui(ui, |ui: &mut Ui| {
                for kind in ColorMapKind::ALL {
                    ui.selectable_value(&mut selected, kind, kind.name());
                }
            });
        state.set_color_map(selected);

        ui.separator();
        if ui.small_button("Shortcuts").clicked() {
            state.show_shortcuts = true;
        }
    });
}

/// Render the status line.
pub fn status_bar(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| match &state.status {
        Some(status) if status.is_error => {
            ui.label(RichText::new(status.text.as_str()).color(Color32::RED));
        }
        Some(status) => {
            ui.label(status.text.as_str());
        }
        None => {
            if let Some(folder) = state.session.folder() {
                ui.label(format!(
                    "{} pairs in {}",
                    state.session.len(),
                    folder.display()
                ));
            }
        }
    });
}

/// Keyboard shortcut help window.
pub fn shortcuts_window(ctx: &egui::Context, state: &mut AppState) {
    let mut open = state.show_shortcuts;
    egui::Window::new("Keyboard Shortcuts")
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui: &mut Ui| {
            egui::Grid::new("shortcut_grid")
                .num_columns(2)
                .spacing([24.0, 6.0])
                .show(ui, |ui: &mut Ui| {
                    for (key, action) in [
                        ("→ (Right Arrow)", "Next image"),
                        ("← (Left Arrow)", "Previous image"),
                        ("Space", "Toggle exclusion status"),
                    ] {
                        ui.monospace(key);
                        ui.label(action);
                        ui.end_row();
                    }
                });
        });
    state.show_shortcuts = open;
}

// ---------------------------------------------------------------------------
// Folder dialogs
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let mut dialog = rfd::FileDialog::new().set_title("Select folder with RGB and depth images");
    if let Some(folder) = state.session.folder() {
        dialog = dialog.set_directory(folder);
    }
    if let Some(path) = dialog.pick_folder() {
        state.open_folder(&path);
    }
}

pub fn export_dialog(state: &mut AppState) {
    let dialog = rfd::FileDialog::new().set_title("Select Export Directory");
    if let Some(path) = dialog.pick_folder() {
        state.export_to(&path);
    }
}
