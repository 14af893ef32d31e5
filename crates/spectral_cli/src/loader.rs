use ndarray::{Array2, Array3};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::{colortype::Gray8, TiffEncoder};
use tiff::ColorType;

use spectral_core::preprocess::to_grayscale;

#[derive(Debug)]
pub enum LoadError {
    IoError(String),
    TiffError(String),
    InvalidDimensions(String),
    UnsupportedDataType(String),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(s) => write!(f, "IO error: {}", s),
            Self::TiffError(s) => write!(f, "TIFF error: {}", s),
            Self::InvalidDimensions(s) => write!(f, "Invalid dimensions: {}", s),
            Self::UnsupportedDataType(s) => write!(f, "Unsupported data type: {}", s),
        }
    }
}

impl std::error::Error for LoadError {}

/// Load the first page of a TIFF as an 8-bit grayscale grid.
///
/// Accepts 8/16-bit grayscale and 8-bit RGB / RGBA. 16-bit samples keep their
/// high byte; colour images are reduced to luminance.
pub fn load_gray_tiff(path: &Path) -> Result<Array2<u8>, LoadError> {
    let file = File::open(path).map_err(|e| LoadError::IoError(e.to_string()))?;
    let reader = BufReader::new(file);
    let mut decoder = Decoder::new(reader).map_err(|e| LoadError::TiffError(e.to_string()))?;

    let (w, h) = decoder
        .dimensions()
        .map_err(|e| LoadError::TiffError(e.to_string()))?;
    let (width, height) = (w as usize, h as usize);
    let color_type = decoder
        .colortype()
        .map_err(|e| LoadError::TiffError(e.to_string()))?;

    let channels = match color_type {
        ColorType::Gray(8) | ColorType::Gray(16) => 1,
        ColorType::RGB(8) => 3,
        ColorType::RGBA(8) => 4,
        other => {
            return Err(LoadError::UnsupportedDataType(format!(
                "Unsupported TIFF color type: {:?}. Expected 8/16-bit gray or 8-bit RGB(A).",
                other
            )))
        }
    };

    let samples: Vec<u8> = match decoder
        .read_image()
        .map_err(|e| LoadError::TiffError(e.to_string()))?
    {
        DecodingResult::U8(data) => data,
        DecodingResult::U16(data) => data.into_iter().map(|v| (v >> 8) as u8).collect(),
        _ => {
            return Err(LoadError::UnsupportedDataType(format!(
                "Unexpected sample format for {:?}",
                color_type
            )))
        }
    };

    let expected = width * height * channels;
    if samples.len() != expected {
        return Err(LoadError::InvalidDimensions(format!(
            "expected {} samples for {}x{}x{}, got {}",
            expected,
            height,
            width,
            channels,
            samples.len()
        )));
    }

    if channels == 1 {
        return Array2::from_shape_vec((height, width), samples)
            .map_err(|e| LoadError::InvalidDimensions(e.to_string()));
    }

    let rgb = Array3::from_shape_vec((height, width, channels), samples)
        .map_err(|e| LoadError::InvalidDimensions(e.to_string()))?;
    to_grayscale(rgb.view()).map_err(|e| LoadError::InvalidDimensions(e.to_string()))
}

/// Write an 8-bit grayscale grid as a single-page TIFF.
pub fn save_gray_tiff(path: &Path, image: &Array2<u8>) -> Result<(), LoadError> {
    let file = File::create(path).map_err(|e| LoadError::IoError(e.to_string()))?;
    let writer = BufWriter::new(file);
    let mut encoder =
        TiffEncoder::new(writer).map_err(|e| LoadError::TiffError(e.to_string()))?;

    let (height, width) = image.dim();
    let data: Vec<u8> = image.iter().copied().collect();
    encoder
        .write_image::<Gray8>(width as u32, height as u32, &data)
        .map_err(|e| LoadError::TiffError(e.to_string()))
}
