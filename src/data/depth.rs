use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::DynamicImage;
use tiff::decoder::{Decoder, DecodingResult};

use crate::error::{CuratorError, Result};

// ---------------------------------------------------------------------------
// Raw samples
// ---------------------------------------------------------------------------

/// Interleaved samples in their original bit depth.
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    I32(Vec<i32>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl Samples {
    fn len(&self) -> usize {
        match self {
            Samples::U8(v) => v.len(),
            Samples::U16(v) => v.len(),
            Samples::U32(v) => v.len(),
            Samples::I32(v) => v.len(),
            Samples::F32(v) => v.len(),
            Samples::F64(v) => v.len(),
        }
    }

    fn get(&self, i: usize) -> Option<SampleValue> {
        match self {
            Samples::U8(v) => v.get(i).copied().map(SampleValue::U8),
            Samples::U16(v) => v.get(i).copied().map(SampleValue::U16),
            Samples::U32(v) => v.get(i).copied().map(SampleValue::U32),
            Samples::I32(v) => v.get(i).copied().map(SampleValue::I32),
            Samples::F32(v) => v.get(i).copied().map(SampleValue::F32),
            Samples::F64(v) => v.get(i).copied().map(SampleValue::F64),
        }
    }
}

impl From<DecodingResult> for Samples {
    /// 8 and 16-bit signed data widen to `I32`; 64-bit integers become `F64`.
    fn from(result: DecodingResult) -> Self {
        match result {
            DecodingResult::U8(v) => Samples::U8(v),
            DecodingResult::U16(v) => Samples::U16(v),
            DecodingResult::U32(v) => Samples::U32(v),
            DecodingResult::I32(v) => Samples::I32(v),
            DecodingResult::F32(v) => Samples::F32(v),
            DecodingResult::F64(v) => Samples::F64(v),
            DecodingResult::I8(v) => Samples::I32(v.into_iter().map(i32::from).collect()),
            DecodingResult::I16(v) => Samples::I32(v.into_iter().map(i32::from).collect()),
            DecodingResult::U64(v) => Samples::F64(v.into_iter().map(|x| x as f64).collect()),
            DecodingResult::I64(v) => Samples::F64(v.into_iter().map(|x| x as f64).collect()),
        }
    }
}

/// One sample, exactly as stored in the file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleValue {
    U8(u8),
    U16(u16),
    U32(u32),
    I32(i32),
    F32(f32),
    F64(f64),
}

impl SampleValue {
    pub fn as_f64(self) -> f64 {
        match self {
            SampleValue::U8(v) => v as f64,
            SampleValue::U16(v) => v as f64,
            SampleValue::U32(v) => v as f64,
            SampleValue::I32(v) => v as f64,
            SampleValue::F32(v) => v as f64,
            SampleValue::F64(v) => v,
        }
    }
}

impl fmt::Display for SampleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleValue::U8(v) => write!(f, "{v}"),
            SampleValue::U16(v) => write!(f, "{v}"),
            SampleValue::U32(v) => write!(f, "{v}"),
            SampleValue::I32(v) => write!(f, "{v}"),
            SampleValue::F32(v) => write!(f, "{v}"),
            SampleValue::F64(v) => write!(f, "{v}"),
        }
    }
}

/// All channels of one pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthPixel(pub Vec<SampleValue>);

impl DepthPixel {
    /// The first channel, which is the depth for single-channel rasters.
    pub fn primary(&self) -> Option<SampleValue> {
        self.0.first().copied()
    }
}

impl fmt::Display for DepthPixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [single] => write!(f, "{single}"),
            values => {
                write!(f, "[")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// DepthImage
// ---------------------------------------------------------------------------

/// A decoded depth raster that keeps the original sample values.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthImage {
    width: usize,
    height: usize,
    channels: usize,
    samples: Samples,
}

impl DepthImage {
    /// Decode the raster at `path`.
    ///
    /// TIFF files go through the `tiff` decoder so 32 and 64-bit samples
    /// survive; other formats use `image`.
    pub fn open(path: &Path) -> Result<Self> {
        let is_tiff = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("tif") || e.eq_ignore_ascii_case("tiff"));
        if is_tiff {
            return Self::open_tiff(path);
        }
        let image = image::open(path).map_err(|e| CuratorError::from_image(path, e))?;
        Ok(Self::from_dynamic(image))
    }

    fn open_tiff(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| CuratorError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let tiff_err = |e| CuratorError::from_tiff(path, e);

        let mut decoder = Decoder::new(BufReader::new(file)).map_err(tiff_err)?;
        let (w, h) = decoder.dimensions().map_err(tiff_err)?;
        let samples = Samples::from(decoder.read_image().map_err(tiff_err)?);

        let (width, height) = (w as usize, h as usize);
        let pixels = width * height;
        let channels = if pixels == 0 { 1 } else { samples.len() / pixels };
        let count = samples.len();
        let raster = Self::from_samples(width, height, channels, samples);
        raster.ok_or_else(|| CuratorError::Raster {
            path: path.to_path_buf(),
            samples: count,
            width,
            height,
        })
    }

    /// Keep 8 and 16-bit integer data as is; anything else becomes 32-bit float.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        let width = image.width() as usize;
        let height = image.height() as usize;
        let (channels, samples) = match image {
            DynamicImage::ImageLuma8(b) => (1, Samples::U8(b.into_raw())),
            DynamicImage::ImageLumaA8(b) => (2, Samples::U8(b.into_raw())),
            DynamicImage::ImageRgb8(b) => (3, Samples::U8(b.into_raw())),
            DynamicImage::ImageRgba8(b) => (4, Samples::U8(b.into_raw())),
            DynamicImage::ImageLuma16(b) => (1, Samples::U16(b.into_raw())),
            DynamicImage::ImageLumaA16(b) => (2, Samples::U16(b.into_raw())),
            DynamicImage::ImageRgb16(b) => (3, Samples::U16(b.into_raw())),
            DynamicImage::ImageRgba16(b) => (4, Samples::U16(b.into_raw())),
            DynamicImage::ImageRgb32F(b) => (3, Samples::F32(b.into_raw())),
            other => (4, Samples::F32(other.into_rgba32f().into_raw())),
        };
        Self {
            width,
            height,
            channels,
            samples,
        }
    }

    /// Build a raster from raw row-major samples, or `None` if the sample
    /// count does not match the dimensions.
    pub fn from_samples(
        width: usize,
        height: usize,
        channels: usize,
        samples: Samples,
    ) -> Option<Self> {
        (channels > 0 && samples.len() == width * height * channels).then_some(Self {
            width,
            height,
            channels,
            samples,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn samples(&self) -> &Samples {
        &self.samples
    }

    /// Raw pixel at `row`/`col`, or `None` outside the raster.
    pub fn value_at(&self, row: usize, col: usize) -> Option<DepthPixel> {
        if row >= self.height || col >= self.width {
            return None;
        }
        let start = (row * self.width + col) * self.channels;
        (start..start + self.channels)
            .map(|i| self.samples.get(i))
            .collect::<Option<Vec<_>>>()
            .map(DepthPixel)
    }

    /// First-channel samples as `f32`, row-major.
    fn primary_channel(&self) -> impl Iterator<Item = f32> + '_ {
        let n = self.width * self.height;
        (0..n).map(move |p| {
            self.samples
                .get(p * self.channels)
                .map(|v| v.as_f64() as f32)
                .unwrap_or(f32::NAN)
        })
    }

    /// Min and max over finite first-channel samples.
    pub fn range(&self) -> Option<(f32, f32)> {
        self.primary_channel()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// First channel scaled to `[0, 1]` for display. A constant raster maps
    /// to zeros and non-finite samples stay NaN.
    pub fn normalized(&self) -> Vec<f32> {
        let (lo, hi) = self.range().unwrap_or((0.0, 0.0));
        let span = hi - lo;
        self.primary_channel()
            .map(|v| {
                if !v.is_finite() {
                    f32::NAN
                } else if span <= f32::EPSILON {
                    0.0
                } else {
                    (v - lo) / span
                }
            })
            .collect()
    }
}
