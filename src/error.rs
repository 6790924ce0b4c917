//! Error type shared by discovery, decoding and export.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Coarse classification of a [`CuratorError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Listing, opening or writing a file failed.
    Io,
    /// The file exists but is not a decodable image.
    Decode,
}

/// Errors surfaced by session operations. Every variant names the failing path.
#[derive(Error, Debug)]
pub enum CuratorError {
    /// The capture folder could not be listed.
    #[error("failed to read folder '{}': {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An image file could not be opened.
    #[error("failed to open '{}': {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An image file was opened but could not be decoded.
    #[error("failed to decode '{}': {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A TIFF raster could not be decoded.
    #[error("failed to decode TIFF '{}': {source}", .path.display())]
    Tiff {
        path: PathBuf,
        #[source]
        source: tiff::TiffError,
    },

    /// The decoded samples do not fill the declared raster.
    #[error("'{}' has {samples} samples for a {width}x{height} raster", .path.display())]
    Raster {
        path: PathBuf,
        samples: usize,
        width: usize,
        height: usize,
    },

    /// Copying a depth image into the export directory failed.
    #[error("failed to export '{}' to '{}': {source}", .from.display(), .to.display())]
    Export {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CuratorError {
    /// Map an `image` crate error to the right variant for `path`.
    pub fn from_image(path: &Path, err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(source) => CuratorError::Open {
                path: path.to_path_buf(),
                source,
            },
            source => CuratorError::Decode {
                path: path.to_path_buf(),
                source,
            },
        }
    }

    /// Map a `tiff` crate error to the right variant for `path`.
    pub fn from_tiff(path: &Path, err: tiff::TiffError) -> Self {
        match err {
            tiff::TiffError::IoError(source) => CuratorError::Open {
                path: path.to_path_buf(),
                source,
            },
            source => CuratorError::Tiff {
                path: path.to_path_buf(),
                source,
            },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CuratorError::Decode { .. }
            | CuratorError::Tiff { .. }
            | CuratorError::Raster { .. } => ErrorKind::Decode,
            CuratorError::ReadDir { .. }
            | CuratorError::Open { .. }
            | CuratorError::Export { .. } => ErrorKind::Io,
        }
    }

    /// The path the failing operation was working on.
    /// For export failures this is the destination file.
    pub fn path(&self) -> &Path {
        match self {
            CuratorError::ReadDir { path, .. }
            | CuratorError::Open { path, .. }
            | CuratorError::Decode { path, .. }
            | CuratorError::Tiff { path, .. }
            | CuratorError::Raster { path, .. } => path,
            CuratorError::Export { to, .. } => to,
        }
    }
}

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, CuratorError>;
