use eframe::egui;

use crate::config::AppConfig;
use crate::data::session::Direction;
use crate::state::AppState;
use crate::ui::plot::{self, FrameTextures};
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CuratorApp {
    pub state: AppState,
    textures: Option<FrameTextures>,
}

impl CuratorApp {
    pub fn new(config: &AppConfig) -> Self {
        let mut state = AppState::new(config);
        if let Some(folder) = &config.initial_folder {
            state.open_folder(folder);
        }
        Self {
            state,
            textures: None,
        }
    }

    /// Arrow keys navigate, Space toggles exclusion unless a widget has focus.
    fn handle_keys(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let (next, prev, space) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::ArrowRight),
                i.key_pressed(egui::Key::ArrowLeft),
                i.key_pressed(egui::Key::Space),
            )
        });
        if next {
            self.state.navigate(Direction::Next);
        }
        if prev {
            self.state.navigate(Direction::Previous);
        }
        if space && ctx.memory(|m| m.focused().is_none()) {
            self.state.toggle_exclusion();
        }
    }
}

impl Default for CuratorApp {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

impl eframe::App for CuratorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_keys(ctx);

        // ---- Top panel: controls ----
        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.add_space(4.0);
            panels::controls(ui, &mut self.state);
            ui.add_space(4.0);
        });

        // ---- Bottom panel: status line ----
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            panels::status_bar(ui, &self.state);
        });

        // ---- Central panel: depth + RGB ----
        plot::sync_textures(ctx, &self.state, &mut self.textures);
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::pair_plots(ui, &mut self.state, self.textures.as_ref());
        });

        panels::shortcuts_window(ctx, &mut self.state);
    }
}
