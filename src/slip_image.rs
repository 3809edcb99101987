// Slip rasters and conversions between OpenCV and `image` buffers

use crate::consts::{IMAGE_EXTENSIONS_DECODED, IMAGE_EXTENSIONS_OPENCV};
use crate::error::{Result, SlipError};
use image::{DynamicImage, GrayImage};
use opencv::{
    core::{self, Mat},
    imgcodecs::{self, IMREAD_COLOR, IMREAD_GRAYSCALE},
    imgproc,
    prelude::*,
};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Grayscale,
    Color,
}

impl ColorMode {
    fn imread_flag(self) -> i32 {
        match self {
            ColorMode::Grayscale => IMREAD_GRAYSCALE,
            ColorMode::Color => IMREAD_COLOR,
        }
    }
}

/// Where a slip image came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    Path(PathBuf),
    Memory,
}

/// A decoded slip raster. Transformations produce new `Mat`s; the loaded
/// pixels are never modified in place.
pub struct SlipImage {
    mat: Mat,
    provenance: Provenance,
}

impl SlipImage {
    /// Load an image from disk. Missing files and unsupported extensions are
    /// rejected before any decoding is attempted.
    pub fn load(path: &Path, mode: ColorMode) -> Result<Self> {
        if !path.is_file() {
            return Err(SlipError::MissingFile(path.to_path_buf()));
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        let mat = if IMAGE_EXTENSIONS_OPENCV.contains(&extension.as_str()) {
            let path_str = path
                .to_str()
                .ok_or_else(|| SlipError::UnreadableImage(path.to_path_buf()))?;
            imgcodecs::imread(path_str, mode.imread_flag())?
        } else if IMAGE_EXTENSIONS_DECODED.contains(&extension.as_str()) {
            let decoded = image::open(path).map_err(|e| {
                log::warn!("Failed to decode {}: {}", path.display(), e);
                SlipError::UnreadableImage(path.to_path_buf())
            })?;
            dynamic_to_mat(&decoded, mode)?
        } else {
            return Err(SlipError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            });
        };

        if mat.empty() {
            return Err(SlipError::UnreadableImage(path.to_path_buf()));
        }

        Ok(Self {
            mat,
            provenance: Provenance::Path(path.to_path_buf()),
        })
    }

    /// Decode an encoded image (PNG, JPEG, ...) held in memory.
    pub fn from_bytes(data: &[u8], mode: ColorMode) -> Result<Self> {
        let mat = imgcodecs::imdecode(&Mat::from_slice(data)?, mode.imread_flag())?;
        if mat.empty() {
            return Err(SlipError::UnreadableImage(PathBuf::from("<memory>")));
        }
        Ok(Self {
            mat,
            provenance: Provenance::Memory,
        })
    }

    pub fn from_mat(mat: Mat, provenance: Provenance) -> Self {
        Self { mat, provenance }
    }

    pub fn mat(&self) -> &Mat {
        &self.mat
    }

    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    pub fn width(&self) -> i32 {
        self.mat.cols()
    }

    pub fn height(&self) -> i32 {
        self.mat.rows()
    }
}

fn dynamic_to_mat(img: &DynamicImage, mode: ColorMode) -> Result<Mat> {
    match mode {
        ColorMode::Grayscale => Ok(gray_to_mat(&img.to_luma8())?),
        ColorMode::Color => {
            let rgb = img.to_rgb8();
            let mat = Mat::from_slice(rgb.as_raw())?;
            let mat = mat.reshape(3, rgb.height() as i32)?;
            let mat = mat.try_clone()?;
            let mut bgr = Mat::default();
            imgproc::cvt_color_def(&mat, &mut bgr, imgproc::COLOR_RGB2BGR)?;
            Ok(bgr)
        }
    }
}

/// Copy an 8-bit grayscale buffer into a single-channel `Mat`.
pub fn gray_to_mat(img: &GrayImage) -> opencv::Result<Mat> {
    let mat = Mat::from_slice(img.as_raw())?;
    let mat = mat.reshape(1, img.height() as i32)?;
    mat.try_clone()
}

/// Copy a `Mat` into an 8-bit grayscale buffer, converting colour input.
pub fn mat_to_gray(mat: &Mat) -> opencv::Result<GrayImage> {
    let gray = match mat.channels() {
        1 => mat.try_clone()?,
        3 => {
            let mut gray = Mat::default();
            imgproc::cvt_color_def(mat, &mut gray, imgproc::COLOR_BGR2GRAY)?;
            gray
        }
        4 => {
            let mut gray = Mat::default();
            imgproc::cvt_color_def(mat, &mut gray, imgproc::COLOR_BGRA2GRAY)?;
            gray
        }
        n => {
            return Err(opencv::Error::new(
                core::StsBadArg,
                format!("unsupported channel count {n}"),
            ));
        }
    };

    let width = gray.cols() as u32;
    let height = gray.rows() as u32;
    let data = gray.data_bytes()?.to_vec();
    GrayImage::from_raw(width, height, data).ok_or_else(|| {
        opencv::Error::new(core::StsBadSize, "pixel buffer does not match image size")
    })
}
