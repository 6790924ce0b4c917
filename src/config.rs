//! Startup configuration: JSON file plus command-line overrides.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::color::ColorMapKind;

/// Command-line arguments.
#[derive(Parser, Debug, Default)]
#[command(name = "depth-curator", version, about = "Browse, curate and export RGB/depth captures")]
pub struct Cli {
    /// Capture folder to open at startup
    pub folder: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Colormap for the depth view (gray, inferno, viridis, plasma, magma, cividis, hot, cool, jet)
    #[arg(long)]
    pub colormap: Option<ColorMapKind>,

    /// Do not show the keyboard shortcut help on startup
    #[arg(long)]
    pub no_shortcuts: bool,
}

/// Settings consumed by the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Initial depth colormap.
    pub colormap: ColorMapKind,
    /// Show the keyboard shortcut window on startup.
    pub show_shortcuts: bool,
    /// Folder loaded right after startup.
    pub initial_folder: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            colormap: ColorMapKind::Gray,
            show_shortcuts: true,
            initial_folder: None,
        }
    }
}

impl AppConfig {
    /// Read a configuration file; missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Defaults, then the `--config` file, then the remaining flags.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Some(kind) = cli.colormap {
            config.colormap = kind;
        }
        if cli.no_shortcuts {
            config.show_shortcuts = false;
        }
        if let Some(folder) = &cli.folder {
            config.initial_folder = Some(folder.clone());
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn write_config(dir: &TempDir, json: &str) -> PathBuf {
        let path = dir.path().join("curator.json");
        std::fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, r#"{ "colormap": "inferno" }"#);
        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.colormap, ColorMapKind::Inferno);
        assert!(config.show_shortcuts);
        assert_eq!(config.initial_folder, None);
    }

    #[test]
    fn unknown_colormap_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, r#"{ "colormap": "rainbow" }"#);
        let err = AppConfig::from_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("curator.json"));
    }

    #[test]
    fn flags_override_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"{ "colormap": "hot", "show_shortcuts": true, "initial_folder": "/data/a" }"#,
        );
        let cli = Cli::parse_from([
            "depth-curator",
            "/data/b",
            "--config",
            path.to_str().unwrap(),
            "--colormap",
            "jet",
            "--no-shortcuts",
        ]);
        let config = AppConfig::resolve(&cli).unwrap();
        assert_eq!(config.colormap, ColorMapKind::Jet);
        assert!(!config.show_shortcuts);
        assert_eq!(config.initial_folder, Some(PathBuf::from("/data/b")));
    }

    #[test]
    fn no_flags_means_defaults() {
        let cli = Cli::parse_from(["depth-curator"]);
        assert_eq!(AppConfig::resolve(&cli).unwrap(), AppConfig::default());
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let cli = Cli {
            config: Some(dir.path().join("absent.json")),
            ..Cli::default()
        };
        assert!(AppConfig::resolve(&cli).is_err());
    }
}
