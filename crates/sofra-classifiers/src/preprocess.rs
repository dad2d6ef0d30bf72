//! Image decoding and tensor preprocessing
//!
//! Mirrors the Hugging Face image processor settings found in
//! `preprocessor_config.json`: resize, rescale to 0-1, then per-channel
//! mean/std normalization into a `[1, 3, H, W]` f32 tensor.

use candle_core::{DType, Device, Tensor};
use image::imageops::FilterType;
use image::DynamicImage;
use serde::Deserialize;
use sofra_core::{Error, Result};
use std::path::Path;

/// Decode uploaded bytes, guessing the format from the content
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    if bytes.is_empty() {
        return Err(Error::decode("empty image payload"));
    }
    image::load_from_memory(bytes).map_err(|e| Error::decode(e.to_string()))
}

/// Image processor settings
#[derive(Debug, Clone, Deserialize)]
pub struct PreprocessConfig {
    #[serde(default = "default_true")]
    pub do_resize: bool,

    #[serde(default)]
    pub size: ImageSize,

    /// PIL resample filter id (0 nearest, 1 lanczos, 2 bilinear, 3 bicubic)
    #[serde(default = "default_resample")]
    pub resample: u8,

    #[serde(default = "default_true")]
    pub do_rescale: bool,

    #[serde(default = "default_rescale_factor")]
    pub rescale_factor: f64,

    #[serde(default = "default_true")]
    pub do_normalize: bool,

    #[serde(default = "default_mean_std")]
    pub image_mean: [f32; 3],

    #[serde(default = "default_mean_std")]
    pub image_std: [f32; 3],
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            do_resize: true,
            size: ImageSize::default(),
            resample: default_resample(),
            do_rescale: true,
            rescale_factor: default_rescale_factor(),
            do_normalize: true,
            image_mean: default_mean_std(),
            image_std: default_mean_std(),
        }
    }
}

/// Target size; processors write it in one of three shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ImageSize {
    HeightWidth { height: u32, width: u32 },
    ShortestEdge { shortest_edge: u32 },
    Square(u32),
}

impl Default for ImageSize {
    fn default() -> Self {
        Self::HeightWidth {
            height: 224,
            width: 224,
        }
    }
}

impl ImageSize {
    /// `(width, height)` the image is resized to
    pub fn dimensions(&self) -> (u32, u32) {
        match *self {
            Self::HeightWidth { height, width } => (width, height),
            Self::ShortestEdge { shortest_edge } => (shortest_edge, shortest_edge),
            Self::Square(edge) => (edge, edge),
        }
    }
}

impl PreprocessConfig {
    /// Load from a `preprocessor_config.json` file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn filter(&self) -> FilterType {
        match self.resample {
            0 => FilterType::Nearest,
            1 => FilterType::Lanczos3,
            3 => FilterType::CatmullRom,
            _ => FilterType::Triangle,
        }
    }

    /// Convert an image into a normalized `[1, 3, H, W]` tensor
    pub fn to_tensor(&self, image: &DynamicImage, device: &Device) -> candle_core::Result<Tensor> {
        let rgb = if self.do_resize {
            let (width, height) = self.size.dimensions();
            image.resize_exact(width, height, self.filter()).to_rgb8()
        } else {
            image.to_rgb8()
        };

        let (width, height) = rgb.dimensions();
        let pixels = Tensor::from_vec(
            rgb.into_raw(),
            (height as usize, width as usize, 3),
            device,
        )?
        .permute((2, 0, 1))?
        .to_dtype(DType::F32)?;

        let pixels = if self.do_rescale {
            pixels.affine(self.rescale_factor, 0.0)?
        } else {
            pixels
        };

        let pixels = if self.do_normalize {
            let mean = Tensor::new(self.image_mean.as_slice(), device)?.reshape((3, 1, 1))?;
            let std = Tensor::new(self.image_std.as_slice(), device)?.reshape((3, 1, 1))?;
            pixels.broadcast_sub(&mean)?.broadcast_div(&std)?
        } else {
            pixels
        };

        pixels.unsqueeze(0)
    }
}

fn default_true() -> bool {
    true
}

fn default_resample() -> u8 {
    2
}

fn default_rescale_factor() -> f64 {
    1.0 / 255.0
}

fn default_mean_std() -> [f32; 3] {
    [0.5, 0.5, 0.5]
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb(color));
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_decode_png() {
        let image = decode_image(&png_bytes(8, 4, [10, 20, 30])).unwrap();
        assert_eq!((image.width(), image.height()), (8, 4));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode_image(b"definitely not an image").unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn test_decode_rejects_empty() {
        assert!(matches!(decode_image(&[]), Err(Error::Decode(_))));
    }

    #[test]
    fn test_tensor_shape_and_normalization() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(32, 16, Rgb([255, 0, 51])));
        let tensor = PreprocessConfig::default()
            .to_tensor(&image, &Device::Cpu)
            .unwrap();

        assert_eq!(tensor.dims(), &[1, 3, 224, 224]);

        // (x / 255 - 0.5) / 0.5
        let channels = tensor.squeeze(0).unwrap().mean((1, 2)).unwrap();
        let channels = channels.to_vec1::<f32>().unwrap();
        assert!((channels[0] - 1.0).abs() < 1e-2);
        assert!((channels[1] + 1.0).abs() < 1e-2);
        assert!((channels[2] + 0.6).abs() < 1e-2);
    }

    #[test]
    fn test_no_resize_keeps_dimensions() {
        let config = PreprocessConfig {
            do_resize: false,
            do_normalize: false,
            ..Default::default()
        };
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(5, 3, Rgb([255, 255, 255])));
        let tensor = config.to_tensor(&image, &Device::Cpu).unwrap();

        assert_eq!(tensor.dims(), &[1, 3, 3, 5]);
        let max = tensor.flatten_all().unwrap().max(0).unwrap();
        assert!((max.to_scalar::<f32>().unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_parse_processor_config() {
        let json = r#"{
            "do_normalize": true,
            "do_rescale": true,
            "do_resize": true,
            "image_mean": [0.485, 0.456, 0.406],
            "image_processor_type": "ViTImageProcessor",
            "image_std": [0.229, 0.224, 0.225],
            "resample": 2,
            "rescale_factor": 0.00392156862745098,
            "size": {"height": 384, "width": 384}
        }"#;
        let config: PreprocessConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.size.dimensions(), (384, 384));
        assert_eq!(config.image_mean, [0.485, 0.456, 0.406]);
    }

    #[test]
    fn test_size_variants() {
        let edge: ImageSize = serde_json::from_str(r#"{"shortest_edge": 256}"#).unwrap();
        assert_eq!(edge.dimensions(), (256, 256));

        let square: ImageSize = serde_json::from_str("224").unwrap();
        assert_eq!(square.dimensions(), (224, 224));
    }
}
