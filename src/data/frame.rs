use image::RgbImage;
use image::imageops::{self, FilterType};

use super::depth::DepthImage;
use super::model::ImagePair;
use crate::error::{CuratorError, Result};

/// Decoded images of one pair, ready for side-by-side display.
#[derive(Debug, Clone)]
pub struct PairFrame {
    pub depth: DepthImage,
    /// RGB image resampled onto the depth pixel grid.
    pub rgb: RgbImage,
}

impl PairFrame {
    /// Decode the depth image, then the RGB image resized (bilinear) to the
    /// depth dimensions.
    pub fn load(pair: &ImagePair) -> Result<Self> {
        let depth = DepthImage::open(pair.depth_path())?;

        let rgb_path = pair.rgb_path();
        let rgb = image::open(rgb_path)
            .map_err(|e| CuratorError::from_image(rgb_path, e))?
            .into_rgb8();

        let (w, h) = (depth.width() as u32, depth.height() as u32);
        let rgb = if rgb.dimensions() == (w, h) {
            rgb
        } else {
            imageops::resize(&rgb, w, h, FilterType::Triangle)
        };

        log::debug!("Loaded pair {pair} ({w}x{h})");
        Ok(Self { depth, rgb })
    }
}

#[cfg(test)]
mod tests {
    use image::{ImageBuffer, Luma, Rgb};
    use tempfile::TempDir;

    use super::*;
    use crate::error::ErrorKind;

    fn write_pair(dir: &TempDir, ts: &str, rgb_size: (u32, u32)) -> ImagePair {
        let rgb_path = dir.path().join(format!("{ts}_image.jpg"));
        let depth_path = dir.path().join(format!("{ts}_depth.tiff"));
        ImageBuffer::from_pixel(rgb_size.0, rgb_size.1, Rgb([200u8, 40, 40]))
            .save(&rgb_path)
            .unwrap();
        ImageBuffer::from_fn(4, 3, |x, _| Luma([x as u16 * 10]))
            .save(&depth_path)
            .unwrap();
        ImagePair::new(ts, rgb_path, depth_path).unwrap()
    }

    #[test]
    fn rgb_is_resized_to_depth_grid() {
        let dir = TempDir::new().unwrap();
        let pair = write_pair(&dir, "1.0", (16, 12));
        let frame = PairFrame::load(&pair).unwrap();
        assert_eq!(frame.rgb.dimensions(), (4, 3));
        assert_eq!(frame.depth.width(), 4);
        assert_eq!(frame.depth.value_at(0, 3).unwrap().to_string(), "30");
    }

    #[test]
    fn broken_rgb_reports_rgb_path() {
        let dir = TempDir::new().unwrap();
        let pair = write_pair(&dir, "2.0", (4, 3));
        std::fs::write(pair.rgb_path(), b"definitely not jpeg").unwrap();
        let err = PairFrame::load(&pair).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert_eq!(err.path(), pair.rgb_path());
    }
}
