use eframe::egui::{self, Align2, Color32, ColorImage, RichText, TextureHandle, TextureOptions, Ui};
use egui_plot::{MarkerShape, Plot, PlotImage, PlotPoint, Points, Text};

use crate::color::{ColorMap, blend};
use crate::state::AppState;

/// Red tint applied to excluded depth images.
const EXCLUDED_TINT: Color32 = Color32::from_rgb(255, 0, 0);
const EXCLUDED_TINT_AMOUNT: f32 = 0.3;

// ---------------------------------------------------------------------------
// GPU textures for the current frame
// ---------------------------------------------------------------------------

/// Textures built from the current frame, tagged with the state revision they
/// were built from.
pub struct FrameTextures {
    revision: u64,
    depth: TextureHandle,
    rgb: TextureHandle,
    size: [usize; 2],
}

/// Rebuild `cache` if the state changed since it was built.
pub fn sync_textures(ctx: &egui::Context, state: &AppState, cache: &mut Option<FrameTextures>) {
    if cache.as_ref().is_some_and(|t| t.revision == state.revision) {
        return;
    }
    let Some(frame) = &state.frame else {
        *cache = None;
        return;
    };

    let size = [frame.depth.width(), frame.depth.height()];
    let map = ColorMap::new(state.color_map);
    let mut pixels = map.colorize(&frame.depth.normalized());
    if state.session.current_excluded() {
        for px in &mut pixels {
            *px = blend(*px, EXCLUDED_TINT, EXCLUDED_TINT_AMOUNT);
        }
    }
    let mut depth_image = ColorImage::new(size, Color32::BLACK);
    depth_image.pixels = pixels;

    let rgb_image = ColorImage::from_rgb(size, frame.rgb.as_raw());

    *cache = Some(FrameTextures {
        revision: state.revision,
        depth: ctx.load_texture("depth", depth_image, TextureOptions::NEAREST),
        rgb: ctx.load_texture("rgb", rgb_image, TextureOptions::LINEAR),
        size,
    });
}

// ---------------------------------------------------------------------------
// Depth + RGB plots (central panel)
// ---------------------------------------------------------------------------

/// Render the depth view above the RGB view.
///
/// Pixel `(row, col)` covers `x ∈ [col, col+1)`, `y ∈ (-(row+1), -row]` so
/// that row 0 is at the top.
pub fn pair_plots(ui: &mut Ui, state: &mut AppState, textures: Option<&FrameTextures>) {
    let Some(tex) = textures else {
        state.hover = None;
        ui.centered_and_justified(|ui: &mut Ui| {
            if state.session.is_empty() {
                ui.heading("Load a folder of RGB/depth pairs to begin  (Load Images Folder)");
            } else {
                ui.heading("No data for this image pair");
            }
        });
        return;
    };

    let [w, h] = tex.size;
    let center = PlotPoint::new(w as f64 / 2.0, -(h as f64) / 2.0);
    let extent = egui::vec2(w as f32, h as f32);
    let plot_height = ((ui.available_height() - 48.0) / 2.0).max(80.0);

    // ---- Depth view ----
    ui.horizontal(|ui: &mut Ui| {
        ui.strong(format!("Depth Map ({}) – hover to see value", state.color_map));
        if let Some(hover) = &state.hover {
            ui.separator();
            ui.monospace(format!(
                "X: {}, Y: {}, Depth: {}",
                hover.col, hover.row, hover.value
            ));
        }
    });

    let excluded = state.session.current_excluded();
    let pointer = Plot::new("depth_plot")
        .height(plot_height)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.image(PlotImage::new(tex.depth.id(), center, extent));
            if excluded {
                plot_ui.text(
                    Text::new(
                        center,
                        RichText::new("EXCLUDED FROM EXPORT")
                            .size(24.0)
                            .strong()
                            .background_color(Color32::from_rgba_unmultiplied(200, 0, 0, 180)),
                    )
                    .color(Color32::WHITE)
                    .anchor(Align2::CENTER_CENTER),
                );
            }
            plot_ui.pointer_coordinate()
        })
        .inner;

    match pointer {
        Some(p) => state.hover_at(p.x, -p.y),
        None => state.hover = None,
    }

    ui.add_space(8.0);

    // ---- RGB view ----
    ui.strong("RGB Image – shows cursor position");
    let crosshair = state
        .hover
        .as_ref()
        .map(|hv| [hv.col as f64 + 0.5, -(hv.row as f64 + 0.5)]);

    Plot::new("rgb_plot")
        .height(plot_height)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .show(ui, |plot_ui| {
            plot_ui.image(PlotImage::new(tex.rgb.id(), center, extent));
            if let Some(point) = crosshair {
                plot_ui.points(
                    Points::new(vec![point])
                        .shape(MarkerShape::Plus)
                        .radius(8.0)
                        .color(Color32::RED),
                );
            }
        });
}
