use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};

/// Suffix identifying the RGB half of a capture.
pub const RGB_SUFFIX: &str = "_image.jpg";

/// Suffix identifying the depth half of a capture.
pub const DEPTH_SUFFIX: &str = "_depth.tiff";

// ---------------------------------------------------------------------------
// ImagePair – one RGB capture and its depth partner
// ---------------------------------------------------------------------------

/// An RGB image and a depth image sharing a timestamp.
///
/// The timestamp string is kept verbatim (it names the exported file); its
/// numeric value is only used for ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePair {
    timestamp: String,
    seconds: f64,
    rgb_path: PathBuf,
    depth_path: PathBuf,
}

impl ImagePair {
    /// Build a pair, or `None` if `timestamp` is not a plain decimal number.
    ///
    /// Decimals too large for `f64` are kept with an infinite value and sort
    /// after every other timestamp.
    pub fn new(
        timestamp: impl Into<String>,
        rgb_path: impl Into<PathBuf>,
        depth_path: impl Into<PathBuf>,
    ) -> Option<Self> {
        let timestamp = timestamp.into();
        if !timestamp.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
            return None;
        }
        let seconds = timestamp.parse::<f64>().ok()?;
        Some(Self {
            timestamp,
            seconds,
            rgb_path: rgb_path.into(),
            depth_path: depth_path.into(),
        })
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Timestamp interpreted as a number (seconds).
    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    pub fn rgb_path(&self) -> &Path {
        &self.rgb_path
    }

    pub fn depth_path(&self) -> &Path {
        &self.depth_path
    }

    /// File name used when this pair's depth image is exported.
    pub fn export_file_name(&self) -> String {
        format!("{}{DEPTH_SUFFIX}", self.timestamp)
    }

    /// Ascending by numeric timestamp, ties broken by the literal text.
    pub fn chronological(a: &Self, b: &Self) -> Ordering {
        a.seconds
            .total_cmp(&b.seconds)
            .then_with(|| a.timestamp.cmp(&b.timestamp))
    }
}

impl fmt::Display for ImagePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.timestamp)
    }
}
