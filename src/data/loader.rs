use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use super::model::{DEPTH_SUFFIX, ImagePair, RGB_SUFFIX};
use crate::error::{CuratorError, Result};

/// Full RGB file name: a timestamp made only of digits and dots.
static RGB_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9.]+)_image\.jpg$").expect("valid RGB name pattern"));

// ---------------------------------------------------------------------------
// Discovery result
// ---------------------------------------------------------------------------

/// Pairs found in a folder plus the RGB files that did not produce one.
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    /// Pairs sorted by numeric timestamp.
    pub pairs: Vec<ImagePair>,
    /// RGB-suffixed names whose prefix is not a usable timestamp.
    pub skipped: Vec<String>,
    /// RGB files with a valid timestamp but no `<timestamp>_depth.tiff` partner.
    pub missing_depth: Vec<String>,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Scan `folder` (non-recursively) for `<ts>_image.jpg` / `<ts>_depth.tiff` pairs.
///
/// Discovery is driven from the RGB files: a depth file without an RGB partner
/// is never looked at.
pub fn discover_pairs(folder: &Path) -> Result<Discovery> {
    let read_dir_err = |source| CuratorError::ReadDir {
        path: folder.to_path_buf(),
        source,
    };

    let mut rgb_names = Vec::new();
    let mut depth_names = HashSet::new();

    for entry in std::fs::read_dir(folder).map_err(read_dir_err)? {
        let entry = entry.map_err(read_dir_err)?;
        if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if name.ends_with(RGB_SUFFIX) {
            rgb_names.push(name);
        } else if name.ends_with(DEPTH_SUFFIX) {
            depth_names.insert(name);
        }
    }

    let mut discovery = Discovery::default();

    for rgb_name in rgb_names {
        let Some(timestamp) = RGB_NAME
            .captures(&rgb_name)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
        else {
            log::debug!("Skipping {rgb_name}: prefix is not a timestamp");
            discovery.skipped.push(rgb_name);
            continue;
        };

        let depth_name = format!("{timestamp}{DEPTH_SUFFIX}");
        if !depth_names.contains(&depth_name) {
            log::info!("Skipping {rgb_name}: no matching {depth_name}");
            discovery.missing_depth.push(rgb_name);
            continue;
        }

        let rgb_path: PathBuf = folder.join(&rgb_name);
        let depth_path: PathBuf = folder.join(&depth_name);
        match ImagePair::new(timestamp, rgb_path, depth_path) {
            Some(pair) => discovery.pairs.push(pair),
            None => {
                log::debug!("Skipping {rgb_name}: timestamp is not a number");
                discovery.skipped.push(rgb_name);
            }
        }
    }

    discovery.pairs.sort_by(ImagePair::chronological);
    discovery.skipped.sort();
    discovery.missing_depth.sort();
    Ok(discovery)
}
