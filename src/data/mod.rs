/// Data layer: pair discovery, the curation session, and image decoding.
///
/// Architecture:
/// ```text
///  <ts>_image.jpg + <ts>_depth.tiff
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  scan folder → Vec<ImagePair> (sorted by timestamp)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ session   │  cursor, exclusion set, export
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  frame    │  decode depth (lossless) + RGB resized to depth grid
///   └──────────┘
/// ```

pub mod depth;
pub mod frame;
pub mod loader;
pub mod model;
pub mod session;
