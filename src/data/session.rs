use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::loader::discover_pairs;
use super::model::ImagePair;
use crate::error::{CuratorError, Result};

// ---------------------------------------------------------------------------
// Operation results
// ---------------------------------------------------------------------------

/// Outcome of [`Session::load`]. Zero pairs is a valid, empty outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub pairs: usize,
    /// RGB files skipped because their name is not a timestamp.
    pub skipped: usize,
    /// RGB files whose depth partner is missing.
    pub missing_depth: usize,
}

impl LoadSummary {
    pub fn is_empty(&self) -> bool {
        self.pairs == 0
    }
}

/// Counts reported by [`Session::export`].
/// `exported + excluded == total` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub exported: usize,
    pub excluded: usize,
    pub total: usize,
}

/// Navigation direction through the loaded pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// The curation session: loaded pairs, browsing cursor and exclusion set.
///
/// Invariants:
/// * `cursor`, when set, is a valid index into `pairs`.
/// * `excluded` only holds valid indices and is cleared whenever `pairs` is replaced.
#[derive(Debug, Default)]
pub struct Session {
    folder: Option<PathBuf>,
    pairs: Vec<ImagePair>,
    cursor: Option<usize>,
    excluded: BTreeSet<usize>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the session contents with the pairs found in `folder`.
    ///
    /// On error the session is left untouched. An empty folder still resets
    /// the session to the empty result.
    pub fn load(&mut self, folder: &Path) -> Result<LoadSummary> {
        let discovery = discover_pairs(folder)?;
        let summary = LoadSummary {
            pairs: discovery.pairs.len(),
            skipped: discovery.skipped.len(),
            missing_depth: discovery.missing_depth.len(),
        };

        self.folder = Some(folder.to_path_buf());
        self.pairs = discovery.pairs;
        self.cursor = None;
        self.excluded.clear();

        log::info!(
            "Loaded {} pairs from {} ({} skipped, {} without depth)",
            summary.pairs,
            folder.display(),
            summary.skipped,
            summary.missing_depth
        );
        Ok(summary)
    }

    /// Move the cursor one step, wrapping at both ends.
    ///
    /// From an unset cursor either direction lands on index 0.
    /// Returns `None` when nothing is loaded.
    pub fn step(&mut self, direction: Direction) -> Option<&ImagePair> {
        let len = self.pairs.len();
        if len == 0 {
            return None;
        }
        let index = match (self.cursor, direction) {
            (None, _) => 0,
            (Some(i), Direction::Next) => (i + 1) % len,
            (Some(i), Direction::Previous) => (i + len - 1) % len,
        };
        self.cursor = Some(index);
        self.pairs.get(index)
    }

    pub fn next(&mut self) -> Option<&ImagePair> {
        self.step(Direction::Next)
    }

    pub fn prev(&mut self) -> Option<&ImagePair> {
        self.step(Direction::Previous)
    }

    /// Flip the exclusion mark of the pair under the cursor.
    ///
    /// Returns the new membership (`true` = excluded), or `None` if the
    /// cursor is unset.
    pub fn toggle_exclusion(&mut self) -> Option<bool> {
        let index = self.cursor?;
        if self.excluded.remove(&index) {
            Some(false)
        } else {
            self.excluded.insert(index);
            Some(true)
        }
    }

    /// Copy every non-excluded depth image into `target_dir` as
    /// `<timestamp>_depth.tiff`.
    ///
    /// Files are copied byte for byte. The first failed copy aborts the
    /// export; files already copied are left in place. Returns `None` when
    /// nothing is loaded.
    pub fn export(&self, target_dir: &Path) -> Result<Option<ExportSummary>> {
        if self.pairs.is_empty() {
            return Ok(None);
        }

        log::info!(
            "Exporting {} of {} depth images to {}",
            self.pairs.len() - self.excluded.len(),
            self.pairs.len(),
            target_dir.display()
        );

        let mut exported = 0;
        for (index, pair) in self.pairs.iter().enumerate() {
            if self.excluded.contains(&index) {
                continue;
            }
            let destination = target_dir.join(pair.export_file_name());
            copy_depth(pair.depth_path(), &destination)?;
            exported += 1;
        }

        Ok(Some(ExportSummary {
            exported,
            excluded: self.excluded.len(),
            total: self.pairs.len(),
        }))
    }

    // -- Read access for the presentation layer --

    /// Folder of the last successful load.
    pub fn folder(&self) -> Option<&Path> {
        self.folder.as_deref()
    }

    pub fn pairs(&self) -> &[ImagePair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Pair under the cursor.
    pub fn current(&self) -> Option<&ImagePair> {
        self.cursor.and_then(|i| self.pairs.get(i))
    }

    pub fn is_excluded(&self, index: usize) -> bool {
        self.excluded.contains(&index)
    }

    /// Whether the pair under the cursor is excluded.
    pub fn current_excluded(&self) -> bool {
        self.cursor.is_some_and(|i| self.is_excluded(i))
    }

    pub fn excluded(&self) -> impl Iterator<Item = usize> + '_ {
        self.excluded.iter().copied()
    }

    pub fn excluded_count(&self) -> usize {
        self.excluded.len()
    }
}

/// Copy one depth file, skipping the copy when source and destination are
/// the same file.
/// Whether both paths name the same file, including through hard links.
#[cfg(unix)]
fn same_file(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::metadata(a), fs::metadata(b)) {
        (Ok(a), Ok(b)) => (a.dev(), a.ino()) == (b.dev(), b.ino()),
        _ => false,
    }
}

#[cfg(not(unix))]
fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn copy_depth(source: &Path, destination: &Path) -> Result<()> {
    // copying a file onto itself truncates it
    if same_file(source, destination) {
        log::debug!("{} is already in place", destination.display());
        return Ok(());
    }

    fs::copy(source, destination).map_err(|source_err| {
        log::error!("Export aborted at {}: {source_err}", destination.display());
        CuratorError::Export {
            from: source.to_path_buf(),
            to: destination.to_path_buf(),
            source: source_err,
        }
    })?;
    log::debug!("Exported {}", destination.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    /// Folder with one pair per timestamp; each depth file holds its timestamp.
    fn capture_folder(timestamps: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for ts in timestamps {
            fs::write(dir.path().join(format!("{ts}_image.jpg")), b"rgb").unwrap();
            fs::write(dir.path().join(format!("{ts}_depth.tiff")), ts.as_bytes()).unwrap();
        }
        dir
    }

    fn loaded(timestamps: &[&str]) -> (TempDir, Session) {
        let dir = capture_folder(timestamps);
        let mut session = Session::new();
        session.load(dir.path()).unwrap();
        (dir, session)
    }

    #[test]
    fn new_session_is_empty_and_inert() {
        let mut session = Session::new();
        assert!(session.is_empty());
        assert!(session.next().is_none());
        assert!(session.prev().is_none());
        assert_eq!(session.cursor(), None);
        assert_eq!(session.toggle_exclusion(), None);
        let target = TempDir::new().unwrap();
        assert_eq!(session.export(target.path()).unwrap(), None);
    }

    #[test]
    fn load_reports_count_and_leaves_cursor_unset() {
        let (dir, session) = loaded(&["1.0", "2.0"]);
        assert_eq!(session.len(), 2);
        assert_eq!(session.cursor(), None);
        assert_eq!(session.folder(), Some(dir.path()));
    }

    #[test]
    fn empty_folder_is_an_empty_result() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("readme.md"), b"").unwrap();
        let mut session = Session::new();
        let summary = session.load(dir.path()).unwrap();
        assert!(summary.is_empty());
        assert_eq!(summary.pairs, 0);
        assert!(session.pairs().is_empty());
    }

    #[test]
    fn empty_result_replaces_previous_pairs() {
        let (_dir, mut session) = loaded(&["1.0"]);
        session.next();
        let empty = TempDir::new().unwrap();
        session.load(empty.path()).unwrap();
        assert!(session.is_empty());
        assert_eq!(session.cursor(), None);
        assert!(session.current().is_none());
    }

    #[test]
    fn failed_load_keeps_state() {
        let (dir, mut session) = loaded(&["1.0", "2.0"]);
        session.next();
        session.toggle_exclusion();

        let err = session.load(&dir.path().join("missing")).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Io);
        assert_eq!(session.len(), 2);
        assert_eq!(session.cursor(), Some(0));
        assert_eq!(session.excluded().collect::<Vec<_>>(), [0]);
        assert_eq!(session.folder(), Some(dir.path()));
    }

    #[test]
    fn load_summary_counts_unpaired_files() {
        let dir = capture_folder(&["1.0"]);
        fs::write(dir.path().join("left_image.jpg"), b"").unwrap();
        fs::write(dir.path().join("4.0_image.jpg"), b"").unwrap();
        let mut session = Session::new();
        let summary = session.load(dir.path()).unwrap();
        assert_eq!(
            summary,
            LoadSummary {
                pairs: 1,
                skipped: 1,
                missing_depth: 1
            }
        );
    }

    #[test]
    fn first_step_lands_on_zero_in_either_direction() {
        let (_dir, mut session) = loaded(&["1.0", "2.0", "3.0"]);
        assert_eq!(session.prev().map(ImagePair::timestamp), Some("1.0"));
        assert_eq!(session.cursor(), Some(0));

        let (_dir, mut session) = loaded(&["1.0", "2.0", "3.0"]);
        assert_eq!(session.next().map(ImagePair::timestamp), Some("1.0"));
        assert_eq!(session.cursor(), Some(0));
    }

    #[test]
    fn navigation_wraps_around() {
        let (_dir, mut session) = loaded(&["1.0", "2.0", "3.0"]);
        session.next();
        session.next();
        session.next();
        assert_eq!(session.cursor(), Some(2));
        assert_eq!(session.next().map(ImagePair::timestamp), Some("1.0"));
        assert_eq!(session.cursor(), Some(0));
        assert_eq!(session.prev().map(ImagePair::timestamp), Some("3.0"));
        assert_eq!(session.cursor(), Some(2));
    }

    #[test]
    fn single_pair_stays_put() {
        let (_dir, mut session) = loaded(&["7.0"]);
        session.next();
        session.next();
        assert_eq!(session.cursor(), Some(0));
        session.prev();
        assert_eq!(session.cursor(), Some(0));
    }

    #[test]
    fn toggling_twice_restores_membership() {
        let (_dir, mut session) = loaded(&["1.0", "2.0"]);
        session.next();
        assert_eq!(session.toggle_exclusion(), Some(true));
        assert!(session.current_excluded());
        assert_eq!(session.toggle_exclusion(), Some(false));
        assert!(!session.current_excluded());
        assert_eq!(session.excluded_count(), 0);
    }

    #[test]
    fn toggle_does_not_move_cursor() {
        let (_dir, mut session) = loaded(&["1.0", "2.0"]);
        session.next();
        session.next();
        session.toggle_exclusion();
        assert_eq!(session.cursor(), Some(1));
        assert!(session.is_excluded(1));
        assert!(!session.is_excluded(0));
    }

    #[test]
    fn reload_clears_exclusions() {
        let (dir, mut session) = loaded(&["1.0", "2.0", "3.0"]);
        session.next();
        session.next();
        session.next();
        session.toggle_exclusion();
        assert!(session.is_excluded(2));

        session.load(dir.path()).unwrap();
        assert_eq!(session.excluded_count(), 0);
        assert!(!session.is_excluded(2));
        assert_eq!(session.cursor(), None);
    }

    #[test]
    fn export_skips_excluded_pairs() {
        let (_dir, mut session) = loaded(&["3.0", "1.0", "2.0"]);
        session.next();
        session.next();
        assert_eq!(session.current().map(ImagePair::timestamp), Some("2.0"));
        session.toggle_exclusion();

        let target = TempDir::new().unwrap();
        let summary = session.export(target.path()).unwrap().unwrap();
        assert_eq!(
            summary,
            ExportSummary {
                exported: 2,
                excluded: 1,
                total: 3
            }
        );
        assert!(target.path().join("1.0_depth.tiff").exists());
        assert!(target.path().join("3.0_depth.tiff").exists());
        assert!(!target.path().join("2.0_depth.tiff").exists());
    }

    #[test]
    fn export_copies_bytes_verbatim() {
        let (dir, mut session) = loaded(&["5.25"]);
        fs::write(dir.path().join("5.25_depth.tiff"), [0u8, 1, 2, 255, 254]).unwrap();
        session.next();

        let target = TempDir::new().unwrap();
        session.export(target.path()).unwrap();
        let copied = fs::read(target.path().join("5.25_depth.tiff")).unwrap();
        assert_eq!(copied, [0u8, 1, 2, 255, 254]);
    }

    #[test]
    fn export_counts_always_add_up() {
        let (_dir, mut session) = loaded(&["1.0", "2.0", "3.0", "4.0"]);
        for excluded_steps in [false, true, true, false] {
            session.next();
            if excluded_steps {
                session.toggle_exclusion();
            }
            let target = TempDir::new().unwrap();
            let summary = session.export(target.path()).unwrap().unwrap();
            assert_eq!(summary.exported + summary.excluded, summary.total);
            assert_eq!(summary.total, session.len());
            assert_eq!(summary.excluded, session.excluded_count());
        }
    }

    #[test]
    fn export_into_source_folder_leaves_files_intact() {
        let (dir, session) = loaded(&["1.0", "2.0"]);
        let summary = session.export(dir.path()).unwrap().unwrap();
        assert_eq!(summary.exported, 2);
        let content = fs::read(dir.path().join("1.0_depth.tiff")).unwrap();
        assert_eq!(content, b"1.0");
    }

    #[cfg(unix)]
    #[test]
    fn export_onto_hard_link_of_source_leaves_it_intact() {
        let (dir, session) = loaded(&["1.0", "2.0"]);
        let target = TempDir::new().unwrap();
        fs::hard_link(
            dir.path().join("1.0_depth.tiff"),
            target.path().join("1.0_depth.tiff"),
        )
        .unwrap();

        let summary = session.export(target.path()).unwrap().unwrap();
        assert_eq!(summary.exported, 2);
        assert_eq!(fs::read(dir.path().join("1.0_depth.tiff")).unwrap(), b"1.0");
        assert_eq!(fs::read(target.path().join("1.0_depth.tiff")).unwrap(), b"1.0");
        assert_eq!(fs::read(target.path().join("2.0_depth.tiff")).unwrap(), b"2.0");
    }

    #[test]
    fn export_aborts_on_first_failure() {
        let (dir, session) = loaded(&["1.0", "2.0"]);
        fs::remove_file(dir.path().join("2.0_depth.tiff")).unwrap();

        let target = TempDir::new().unwrap();
        let err = session.export(target.path()).unwrap_err();
        assert!(matches!(err, CuratorError::Export { .. }));
        assert_eq!(err.path(), target.path().join("2.0_depth.tiff"));
        // earlier copies are not rolled back
        assert!(target.path().join("1.0_depth.tiff").exists());
    }

    #[test]
    fn export_to_missing_directory_fails() {
        let (_dir, session) = loaded(&["1.0"]);
        let target = TempDir::new().unwrap();
        let err = session.export(&target.path().join("absent")).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Io);
    }
}
