use std::fmt;
use std::str::FromStr;

use eframe::egui::Color32;
use palette::{Mix, Srgb};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Colormap selection
// ---------------------------------------------------------------------------

/// Colormaps offered for the depth view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMapKind {
    #[default]
    Gray,
    Inferno,
    Viridis,
    Plasma,
    Magma,
    Cividis,
    Hot,
    Cool,
    Jet,
}

impl ColorMapKind {
    pub const ALL: [ColorMapKind; 9] = [
        ColorMapKind::Gray,
        ColorMapKind::Inferno,
        ColorMapKind::Viridis,
        ColorMapKind::Plasma,
        ColorMapKind::Magma,
        ColorMapKind::Cividis,
        ColorMapKind::Hot,
        ColorMapKind::Cool,
        ColorMapKind::Jet,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ColorMapKind::Gray => "gray",
            ColorMapKind::Inferno => "inferno",
            ColorMapKind::Viridis => "viridis",
            ColorMapKind::Plasma => "plasma",
            ColorMapKind::Magma => "magma",
            ColorMapKind::Cividis => "cividis",
            ColorMapKind::Hot => "hot",
            ColorMapKind::Cool => "cool",
            ColorMapKind::Jet => "jet",
        }
    }

    /// Color at `t` in `[0, 1]`.
    fn sample(self, t: f32) -> Srgb<f32> {
        let t = t.clamp(0.0, 1.0);
        match self {
            ColorMapKind::Gray => Srgb::new(t, t, t),
            ColorMapKind::Inferno => gradient(INFERNO, t),
            ColorMapKind::Viridis => gradient(VIRIDIS, t),
            ColorMapKind::Plasma => gradient(PLASMA, t),
            ColorMapKind::Magma => gradient(MAGMA, t),
            ColorMapKind::Cividis => gradient(CIVIDIS, t),
            ColorMapKind::Hot => Srgb::new(
                (t * 8.0 / 3.0).clamp(0.0, 1.0),
                (t * 8.0 / 3.0 - 1.0).clamp(0.0, 1.0),
                (t * 4.0 - 3.0).clamp(0.0, 1.0),
            ),
            ColorMapKind::Cool => Srgb::new(t, 1.0 - t, 1.0),
            ColorMapKind::Jet => {
                let ramp = |offset: f32| (1.5 - (4.0 * t - offset).abs()).clamp(0.0, 1.0);
                Srgb::new(ramp(3.0), ramp(2.0), ramp(1.0))
            }
        }
    }
}

impl fmt::Display for ColorMapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorMapKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        ColorMapKind::ALL
            .into_iter()
            .find(|k| k.name() == lower)
            .ok_or_else(|| {
                let names: Vec<&str> = ColorMapKind::ALL.iter().map(|k| k.name()).collect();
                format!("unknown colormap '{s}' (expected one of: {})", names.join(", "))
            })
    }
}

// -- Perceptual colormap stops (evenly spaced, sRGB) --

const INFERNO: &[[u8; 3]] = &[
    [0x00, 0x00, 0x04],
    [0x1b, 0x0c, 0x41],
    [0x4a, 0x0c, 0x6b],
    [0x78, 0x1c, 0x6d],
    [0xa5, 0x2c, 0x60],
    [0xcf, 0x44, 0x46],
    [0xed, 0x69, 0x25],
    [0xfb, 0x9b, 0x06],
    [0xf7, 0xd1, 0x3d],
    [0xfc, 0xff, 0xa4],
];

const VIRIDIS: &[[u8; 3]] = &[
    [0x44, 0x01, 0x54],
    [0x47, 0x2d, 0x7b],
    [0x3b, 0x52, 0x8b],
    [0x2c, 0x72, 0x8e],
    [0x21, 0x91, 0x8c],
    [0x28, 0xae, 0x80],
    [0x5e, 0xc9, 0x62],
    [0xad, 0xdc, 0x30],
    [0xfd, 0xe7, 0x25],
];

const PLASMA: &[[u8; 3]] = &[
    [0x0d, 0x08, 0x87],
    [0x41, 0x04, 0x9d],
    [0x6a, 0x00, 0xa8],
    [0x8f, 0x0d, 0xa4],
    [0xb1, 0x2a, 0x90],
    [0xcc, 0x47, 0x78],
    [0xe1, 0x64, 0x62],
    [0xf2, 0x84, 0x4b],
    [0xfc, 0xa6, 0x36],
    [0xfc, 0xce, 0x25],
    [0xf0, 0xf9, 0x21],
];

const MAGMA: &[[u8; 3]] = &[
    [0x00, 0x00, 0x04],
    [0x18, 0x0f, 0x3d],
    [0x44, 0x0f, 0x76],
    [0x72, 0x1f, 0x81],
    [0x9e, 0x2f, 0x7f],
    [0xcd, 0x40, 0x71],
    [0xf1, 0x60, 0x5d],
    [0xfd, 0x96, 0x68],
    [0xfe, 0xca, 0x8d],
    [0xfc, 0xfd, 0xbf],
];

const CIVIDIS: &[[u8; 3]] = &[
    [0x00, 0x22, 0x4e],
    [0x12, 0x35, 0x70],
    [0x3b, 0x49, 0x6c],
    [0x57, 0x5d, 0x6d],
    [0x70, 0x71, 0x73],
    [0x8a, 0x86, 0x78],
    [0xa5, 0x9c, 0x74],
    [0xc3, 0xb3, 0x69],
    [0xe1, 0xcc, 0x55],
    [0xfe, 0xe8, 0x38],
];

/// Piecewise-linear interpolation between evenly spaced stops.
fn gradient(stops: &[[u8; 3]], t: f32) -> Srgb<f32> {
    let to_srgb = |[r, g, b]: [u8; 3]| Srgb::new(r, g, b).into_format::<f32>();
    let segments = stops.len().saturating_sub(1);
    if segments == 0 {
        return stops.first().copied().map(to_srgb).unwrap_or_default();
    }
    let scaled = t * segments as f32;
    let i = (scaled.floor() as usize).min(segments - 1);
    to_srgb(stops[i]).mix(to_srgb(stops[i + 1]), scaled - i as f32)
}

// ---------------------------------------------------------------------------
// Lookup table: normalized depth → Color32
// ---------------------------------------------------------------------------

/// Color used for samples without a finite value.
pub const NO_DATA: Color32 = Color32::BLACK;

/// 256-entry lookup table built from a [`ColorMapKind`].
#[derive(Debug, Clone)]
pub struct ColorMap {
    pub kind: ColorMapKind,
    lut: Vec<Color32>,
}

impl ColorMap {
    pub fn new(kind: ColorMapKind) -> Self {
        let lut = (0..256)
            .map(|i| {
                let c: Srgb<u8> = kind.sample(i as f32 / 255.0).into_format();
                Color32::from_rgb(c.red, c.green, c.blue)
            })
            .collect();
        ColorMap { kind, lut }
    }

    /// Color for a normalized value in `[0, 1]`.
    pub fn color_for(&self, t: f32) -> Color32 {
        if !t.is_finite() {
            return NO_DATA;
        }
        let i = (t.clamp(0.0, 1.0) * 255.0).round() as usize;
        self.lut[i.min(255)]
    }

    pub fn colorize(&self, normalized: &[f32]) -> Vec<Color32> {
        normalized.iter().map(|&t| self.color_for(t)).collect()
    }
}

/// Blend `base` toward `tint` by `amount` (0 = unchanged, 1 = tint).
pub fn blend(base: Color32, tint: Color32, amount: f32) -> Color32 {
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * amount).round() as u8;
    Color32::from_rgb(
        mix(base.r(), tint.r()),
        mix(base.g(), tint.g()),
        mix(base.b(), tint.b()),
    )
}
