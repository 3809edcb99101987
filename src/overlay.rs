// Diagnostic drawings. Informational only; colours come from a fixed palette
// so repeated runs produce identical images.

use crate::ocr::{Detection, TokenBox};
use opencv::{
    core::{Mat, Point, Rect, Scalar, Size, Vector},
    imgproc::{self, FONT_HERSHEY_SIMPLEX, LINE_8},
    prelude::*,
};

const PALETTE: [(f64, f64, f64); 6] = [
    (0.0, 255.0, 0.0),
    (255.0, 0.0, 0.0),
    (0.0, 0.0, 255.0),
    (0.0, 255.0, 255.0),
    (255.0, 0.0, 255.0),
    (255.0, 255.0, 0.0),
];

fn palette(i: usize) -> Scalar {
    let (b, g, r) = PALETTE[i % PALETTE.len()];
    Scalar::new(b, g, r, 0.0)
}

/// Three-channel copy for drawing in colour.
pub fn to_bgr(img: &Mat) -> opencv::Result<Mat> {
    let mut bgr = Mat::default();
    match img.channels() {
        1 => imgproc::cvt_color_def(img, &mut bgr, imgproc::COLOR_GRAY2BGR)?,
        4 => imgproc::cvt_color_def(img, &mut bgr, imgproc::COLOR_BGRA2BGR)?,
        _ => bgr = img.try_clone()?,
    }
    Ok(bgr)
}

/// The approximated slip outline with its tolerance and vertex count.
pub fn draw_approximation(
    reference: &Mat,
    approx: &Vector<Point>,
    bounds: Rect,
    epsilon: f64,
) -> opencv::Result<Mat> {
    let mut output = to_bgr(reference)?;
    let mut contours: Vector<Vector<Point>> = Vector::new();
    contours.push(approx.clone());

    imgproc::draw_contours(
        &mut output,
        &contours,
        -1,
        palette(0),
        3,
        LINE_8,
        &Mat::default(),
        i32::MAX,
        Point::default(),
    )?;

    let caption = format!("eps={:.4}, num_pts={}", epsilon, approx.len());
    imgproc::put_text(
        &mut output,
        &caption,
        Point::new(bounds.x, (bounds.y - 15).max(20)),
        FONT_HERSHEY_SIMPLEX,
        0.9,
        palette(0),
        2,
        LINE_8,
        false,
    )?;

    Ok(output)
}

/// Word boxes returned by the recognizer.
pub fn draw_tokens(img: &Mat, tokens: &[TokenBox]) -> opencv::Result<Mat> {
    let mut output = to_bgr(img)?;
    for (i, token) in tokens.iter().enumerate() {
        imgproc::rectangle(&mut output, token.rect(), palette(i), 2, LINE_8, 0)?;
    }
    Ok(output)
}

/// Best template position on the preprocessed query.
pub fn draw_template_match(query: &Mat, location: Point, size: Size) -> opencv::Result<Mat> {
    let mut output = to_bgr(query)?;
    imgproc::rectangle(
        &mut output,
        Rect::new(location.x, location.y, size.width, size.height),
        palette(0),
        2,
        LINE_8,
        0,
    )?;
    Ok(output)
}

pub fn draw_detection(img: &Mat, detection: &Detection) -> opencv::Result<Mat> {
    let mut output = to_bgr(img)?;
    imgproc::rectangle(&mut output, detection.bbox, palette(1), 2, LINE_8, 0)?;

    let label = format!("{}: {:.2}", detection.label, detection.confidence);
    imgproc::put_text(
        &mut output,
        &label,
        Point::new(detection.bbox.x, (detection.bbox.y - 5).max(15)),
        FONT_HERSHEY_SIMPLEX,
        0.6,
        palette(1),
        2,
        LINE_8,
        false,
    )?;
    Ok(output)
}
