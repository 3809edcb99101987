// Pure image transforms shared by bank identification and the physical-slip path

use opencv::{
    core::{self, Mat, Rect, Size},
    imgproc,
    prelude::*,
};

/// Convert BGR/BGRA input to single-channel grayscale. Grayscale input is copied.
pub fn to_grayscale(img: &Mat) -> opencv::Result<Mat> {
    let mut gray = Mat::default();
    match img.channels() {
        3 => imgproc::cvt_color_def(img, &mut gray, imgproc::COLOR_BGR2GRAY)?,
        4 => imgproc::cvt_color_def(img, &mut gray, imgproc::COLOR_BGRA2GRAY)?,
        _ => gray = img.try_clone()?,
    }
    Ok(gray)
}

/// Otsu-thresholded binarization of a grayscale image.
pub fn otsu_binarize(gray: &Mat) -> opencv::Result<Mat> {
    let mut binary = Mat::default();
    imgproc::threshold(
        gray,
        &mut binary,
        0.0,
        255.0,
        imgproc::THRESH_BINARY | imgproc::THRESH_OTSU,
    )?;
    Ok(binary)
}

/// The canonical clean representation fed to text recognition for e-slips.
pub fn to_grayscale_binary(img: &Mat) -> opencv::Result<Mat> {
    otsu_binarize(&to_grayscale(img)?)
}

/// Scale uniformly so the result is `width` pixels wide.
pub fn resize_to_width(img: &Mat, width: u32) -> opencv::Result<Mat> {
    let cols = img.cols().max(1);
    let height = (img.rows() as f64 * (width as f64 / cols as f64)) as i32;
    let mut resized = Mat::default();
    imgproc::resize_def(img, &mut resized, Size::new(width as i32, height.max(1)))?;
    Ok(resized)
}

/// Shrink (never enlarge) so the image fits inside `max_width` x `max_height`.
pub fn resize_to_fit(img: &Mat, max_width: i32, max_height: i32) -> opencv::Result<Mat> {
    let (width, height) = (img.cols(), img.rows());
    if width == 0 || height == 0 {
        return img.try_clone();
    }
    let scale = (max_width as f64 / width as f64).min(max_height as f64 / height as f64);
    if scale >= 1.0 {
        return img.try_clone();
    }
    let size = Size::new(
        ((width as f64 * scale) as i32).max(1),
        ((height as f64 * scale) as i32).max(1),
    );
    let mut resized = Mat::default();
    imgproc::resize_def(img, &mut resized, size)?;
    Ok(resized)
}

/// Keep the top `fraction` of the image (rounded up), discarding footer noise.
pub fn crop_top_fraction(img: &Mat, fraction: f64) -> opencv::Result<Mat> {
    let rows = ((img.rows() as f64 * fraction).ceil() as i32).clamp(1, img.rows().max(1));
    let roi = Mat::roi(img, Rect::new(0, 0, img.cols(), rows))?;
    roi.try_clone()
}

/// Copy the part of `rect` that lies inside the image.
pub fn crop_rect(img: &Mat, rect: Rect) -> opencv::Result<Mat> {
    let x = rect.x.clamp(0, img.cols());
    let y = rect.y.clamp(0, img.rows());
    let width = (rect.x + rect.width).min(img.cols()) - x;
    let height = (rect.y + rect.height).min(img.rows()) - y;
    if width <= 0 || height <= 0 {
        return Err(opencv::Error::new(
            core::StsOutOfRange,
            format!("crop {rect:?} lies outside the {}x{} image", img.cols(), img.rows()),
        ));
    }
    let roi = Mat::roi(img, Rect::new(x, y, width, height))?;
    roi.try_clone()
}

pub fn gaussian_blur(img: &Mat, kernel: i32) -> opencv::Result<Mat> {
    let mut blurred = Mat::default();
    imgproc::gaussian_blur_def(img, &mut blurred, Size::new(kernel, kernel), 0.0)?;
    Ok(blurred)
}

/// Mean-adaptive threshold with inverted polarity (ink becomes white).
/// Handles shadows and uneven lighting on photographed slips.
pub fn adaptive_binarize_inverted(gray: &Mat, block_size: i32, offset: f64) -> opencv::Result<Mat> {
    let mut binary = Mat::default();
    imgproc::adaptive_threshold(
        gray,
        &mut binary,
        255.0,
        imgproc::ADAPTIVE_THRESH_MEAN_C,
        imgproc::THRESH_BINARY_INV,
        block_size,
        offset,
    )?;
    Ok(binary)
}

/// Flip a binary image back to dark ink on a light background.
pub fn invert(binary: &Mat) -> opencv::Result<Mat> {
    let mut inverted = Mat::default();
    imgproc::threshold(binary, &mut inverted, 0.0, 255.0, imgproc::THRESH_BINARY_INV)?;
    Ok(inverted)
}
