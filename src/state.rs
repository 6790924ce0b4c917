use std::path::Path;

use crate::color::ColorMapKind;
use crate::config::AppConfig;
use crate::data::depth::DepthPixel;
use crate::data::frame::PairFrame;
use crate::data::session::{Direction, Session};

// ---------------------------------------------------------------------------
// Status line
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub text: String,
    pub is_error: bool,
}

impl Status {
    fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Depth value under the mouse pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverReadout {
    pub row: usize,
    pub col: usize,
    pub value: DepthPixel,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Pairs, cursor and exclusion set.
    pub session: Session,

    /// Decoded images of the pair under the cursor (None if not loaded or failed).
    pub frame: Option<PairFrame>,

    /// Active depth colormap.
    pub color_map: ColorMapKind,

    /// Pixel under the pointer in the depth view.
    pub hover: Option<HoverReadout>,

    /// Status / error message shown in the UI.
    pub status: Option<Status>,

    /// Whether the keyboard shortcut window is open.
    pub show_shortcuts: bool,

    /// Bumped whenever the rendered images must be rebuilt.
    pub revision: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            session: Session::new(),
            frame: None,
            color_map: config.colormap,
            hover: None,
            status: None,
            show_shortcuts: config.show_shortcuts,
            revision: 0,
        }
    }

    fn invalidate(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Load a capture folder and show its first pair.
    pub fn open_folder(&mut self, folder: &Path) {
        match self.session.load(folder) {
            Ok(summary) if summary.is_empty() => {
                self.frame = None;
                self.hover = None;
                self.invalidate();
                self.status = Some(Status::info(
                    "No matching RGB/depth image pairs found in the selected folder.",
                ));
            }
            Ok(summary) => {
                self.navigate(Direction::Next);
                // keep a frame decode error visible instead of the summary
                if self.frame.is_some() {
                    self.status = Some(Status::info(format!(
                        "Found {} RGB/depth image pairs. All are selected for export by default.",
                        summary.pairs
                    )));
                }
            }
            Err(e) => {
                log::error!("Failed to load image folder: {e}");
                self.status = Some(Status::error(format!("Failed to load image folder: {e}")));
            }
        }
    }

    /// Step through the pairs and decode the new current one.
    ///
    /// A decode failure clears the display but keeps the cursor on the
    /// failing pair so it can be retried.
    pub fn navigate(&mut self, direction: Direction) {
        let Some(pair) = self.session.step(direction).cloned() else {
            return;
        };
        self.hover = None;
        self.invalidate();
        match PairFrame::load(&pair) {
            Ok(frame) => {
                self.frame = Some(frame);
                self.status = None;
            }
            Err(e) => {
                log::error!("Failed to load pair {pair} ({:?}): {e}", e.kind());
                self.frame = None;
                self.status = Some(Status::error(format!("Failed to load image pair: {e}")));
            }
        }
    }

    pub fn toggle_exclusion(&mut self) {
        if let Some(excluded) = self.session.toggle_exclusion() {
            log::debug!(
                "Pair {:?} {}",
                self.session.cursor(),
                if excluded { "excluded" } else { "included" }
            );
            self.invalidate();
        }
    }

    pub fn export_to(&mut self, target_dir: &Path) {
        self.status = Some(match self.session.export(target_dir) {
            Ok(Some(summary)) => {
                log::info!(
                    "Exported {} depth images to {}",
                    summary.exported,
                    target_dir.display()
                );
                Status::info(format!(
                    "Exported {} depth images to {} | Excluded: {} | Total images: {}",
                    summary.exported,
                    target_dir.display(),
                    summary.excluded,
                    summary.total
                ))
            }
            Ok(None) => Status::info("Please load images first"),
            Err(e) => Status::error(format!("Failed to export images: {e}")),
        });
    }

    pub fn set_color_map(&mut self, kind: ColorMapKind) {
        if self.color_map != kind {
            self.color_map = kind;
            self.invalidate();
        }
    }

    /// Update the hover readout from a (possibly fractional) pixel position.
    pub fn hover_at(&mut self, x: f64, y: f64) {
        self.hover = self.frame.as_ref().and_then(|frame| {
            if x < 0.0 || y < 0.0 {
                return None;
            }
            let (row, col) = (y.floor() as usize, x.floor() as usize);
            frame
                .depth
                .value_at(row, col)
                .map(|value| HoverReadout { row, col, value })
        });
    }

    /// "Image i of N - Timestamp: t [EXCLUDED]"
    pub fn position_label(&self) -> String {
        match (self.session.cursor(), self.session.current()) {
            (Some(i), Some(pair)) => {
                let status = if self.session.is_excluded(i) {
                    " [EXCLUDED]"
                } else {
                    ""
                };
                format!(
                    "Image {} of {} - Timestamp: {}{status}",
                    i + 1,
                    self.session.len(),
                    pair.timestamp()
                )
            }
            _ => "No images loaded".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use image::{ImageBuffer, Luma, Rgb};
    use tempfile::TempDir;

    use super::*;

    fn capture_folder(timestamps: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for ts in timestamps {
            ImageBuffer::from_pixel(6, 4, Rgb([10u8, 20, 30]))
                .save(dir.path().join(format!("{ts}_image.jpg")))
                .unwrap();
            ImageBuffer::from_fn(3, 2, |x, y| Luma([(y * 3 + x) as u16]))
                .save(dir.path().join(format!("{ts}_depth.tiff")))
                .unwrap();
        }
        dir
    }

    #[test]
    fn open_folder_shows_first_pair() {
        let dir = capture_folder(&["2.0", "1.0"]);
        let mut state = AppState::default();
        state.open_folder(dir.path());
        assert_eq!(state.session.cursor(), Some(0));
        assert!(state.frame.is_some());
        assert_eq!(state.position_label(), "Image 1 of 2 - Timestamp: 1.0");
        assert!(!state.status.as_ref().unwrap().is_error);
    }

    #[test]
    fn empty_folder_reports_without_error() {
        let dir = TempDir::new().unwrap();
        let mut state = AppState::default();
        state.open_folder(dir.path());
        let status = state.status.unwrap();
        assert!(!status.is_error);
        assert!(status.text.contains("No matching"));
        assert!(state.frame.is_none());
    }

    #[test]
    fn unreadable_folder_reports_error() {
        let dir = TempDir::new().unwrap();
        let mut state = AppState::default();
        state.open_folder(&dir.path().join("missing"));
        let status = state.status.unwrap();
        assert!(status.is_error);
        assert!(status.text.contains("missing"));
    }

    #[test]
    fn broken_pair_clears_display_but_keeps_cursor() {
        let dir = capture_folder(&["1.0", "2.0"]);
        std::fs::write(dir.path().join("2.0_depth.tiff"), b"junk").unwrap();
        let mut state = AppState::default();
        state.open_folder(dir.path());
        state.navigate(Direction::Next);
        assert_eq!(state.session.cursor(), Some(1));
        assert!(state.frame.is_none());
        assert!(state.status.as_ref().unwrap().is_error);

        state.navigate(Direction::Previous);
        assert_eq!(state.session.cursor(), Some(0));
        assert!(state.frame.is_some());
    }

    #[test]
    fn exclusion_shows_in_label() {
        let dir = capture_folder(&["1.0"]);
        let mut state = AppState::default();
        state.open_folder(dir.path());
        let before = state.revision;
        state.toggle_exclusion();
        assert_ne!(state.revision, before);
        assert!(state.position_label().ends_with("[EXCLUDED]"));
    }

    #[test]
    fn hover_distinguishes_zero_from_outside() {
        let dir = capture_folder(&["1.0"]);
        let mut state = AppState::default();
        state.open_folder(dir.path());

        state.hover_at(0.4, 0.9);
        let hover = state.hover.clone().unwrap();
        assert_eq!((hover.row, hover.col), (0, 0));
        assert_eq!(hover.value.to_string(), "0");

        state.hover_at(2.5, 1.5);
        assert_eq!(state.hover.as_ref().unwrap().value.to_string(), "5");

        state.hover_at(3.0, 0.0);
        assert!(state.hover.is_none());
        state.hover_at(-0.5, 0.0);
        assert!(state.hover.is_none());
    }

    #[test]
    fn export_without_pairs_asks_to_load() {
        let target = TempDir::new().unwrap();
        let mut state = AppState::default();
        state.export_to(target.path());
        assert_eq!(state.status.unwrap().text, "Please load images first");
    }

    #[test]
    fn export_reports_counts() {
        let dir = capture_folder(&["1.0", "2.0"]);
        let target = TempDir::new().unwrap();
        let mut state = AppState::default();
        state.open_folder(dir.path());
        state.toggle_exclusion();
        state.export_to(target.path());
        let status = state.status.unwrap();
        assert!(status.text.contains("Exported 1 depth images"));
        assert!(status.text.contains("Excluded: 1"));
        assert!(status.text.contains("Total images: 2"));
    }
}
