use crate::config::LocatorConfig;
use crate::error::{Result, SlipError};
use crate::overlay;
use log::debug;
use opencv::{
    core::{Mat, Point, Point2f, Size, Vector},
    imgproc,
    prelude::*,
};

/// Slip corners in the fixed order top-left, top-right, bottom-left, bottom-right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadCorners {
    pub top_left: Point2f,
    pub top_right: Point2f,
    pub bottom_left: Point2f,
    pub bottom_right: Point2f,
}

impl QuadCorners {
    /// Split into the two upper and two lower points by y, then order each pair by x.
    pub fn from_points(points: [Point2f; 4]) -> Self {
        let mut points = points;
        points.sort_by(|a, b| a.y.total_cmp(&b.y));
        let (mut top, mut bottom) = ([points[0], points[1]], [points[2], points[3]]);
        top.sort_by(|a, b| a.x.total_cmp(&b.x));
        bottom.sort_by(|a, b| a.x.total_cmp(&b.x));

        Self {
            top_left: top[0],
            top_right: top[1],
            bottom_left: bottom[0],
            bottom_right: bottom[1],
        }
    }

    pub fn as_array(&self) -> [Point2f; 4] {
        [self.top_left, self.top_right, self.bottom_left, self.bottom_right]
    }

    /// Output canvas size: longest horizontal edge by longest vertical edge, rounded.
    pub fn target_size(&self) -> (i32, i32) {
        let top = distance(self.top_left, self.top_right);
        let bottom = distance(self.bottom_left, self.bottom_right);
        let left = distance(self.top_left, self.bottom_left);
        let right = distance(self.top_right, self.bottom_right);
        (top.max(bottom).round() as i32, left.max(right).round() as i32)
    }
}

fn distance(a: Point2f, b: Point2f) -> f32 {
    (a.x - b.x).hypot(a.y - b.y)
}

pub struct Located {
    pub corners: QuadCorners,
    /// Tolerance (fraction of the perimeter) that produced four vertices.
    pub epsilon: f64,
    /// Outline drawn on the reference image, when one was supplied.
    pub overlay: Option<Mat>,
}

pub struct QuadrilateralLocator {
    epsilons: Vec<f64>,
}

impl QuadrilateralLocator {
    pub fn new(config: &LocatorConfig) -> Self {
        Self {
            epsilons: config.epsilons(),
        }
    }

    /// Find the slip outline in a binary image.
    ///
    /// The largest external contour is approximated with increasing tolerance
    /// until it has exactly four vertices. No fallback shape is substituted
    /// when that never happens.
    pub fn locate(&self, binary: &Mat, reference: Option<&Mat>) -> Result<Located> {
        let mut contours: Vector<Vector<Point>> = Vector::new();
        imgproc::find_contours_def(
            binary,
            &mut contours,
            imgproc::RETR_EXTERNAL,
            imgproc::CHAIN_APPROX_SIMPLE,
        )?;

        let mut largest: Option<(f64, Vector<Point>)> = None;
        for contour in contours {
            let area = imgproc::contour_area_def(&contour)?;
            if largest.as_ref().is_none_or(|(best, _)| area > *best) {
                largest = Some((area, contour));
            }
        }
        let Some((_, contour)) = largest else {
            return Err(SlipError::NoContour);
        };

        let bounds = imgproc::bounding_rect(&contour)?;
        let perimeter = imgproc::arc_length(&contour, true)?;
        let mut approx: Vector<Point> = Vector::new();
        let mut overlay = None;

        for &epsilon in &self.epsilons {
            approx.clear();
            imgproc::approx_poly_dp(&contour, &mut approx, epsilon * perimeter, true)?;
            if let Some(reference) = reference {
                overlay = Some(overlay::draw_approximation(reference, &approx, bounds, epsilon)?);
            }

            if approx.len() == 4 {
                debug!("Slip outline found at eps={:.4}", epsilon);
                let corner = |i: usize| -> Result<Point2f> {
                    let p = approx.get(i)?;
                    Ok(Point2f::new(p.x as f32, p.y as f32))
                };
                let corners = QuadCorners::from_points([corner(0)?, corner(1)?, corner(2)?, corner(3)?]);
                return Ok(Located {
                    corners,
                    epsilon,
                    overlay,
                });
            }
        }

        Err(SlipError::QuadrilateralNotFound {
            vertices: approx.len(),
        })
    }
}

/// Warp the quadrilateral onto an upright canvas.
///
/// A taller-than-wide outline maps straight onto a `width x height` canvas.
/// A wider-than-tall outline is rotated into a `height x width` canvas so the
/// receipt comes out portrait.
pub fn correct_perspective(gray: &Mat, corners: &QuadCorners) -> opencv::Result<Mat> {
    let (width, height) = corners.target_size();
    let (w, h) = (width as f32, height as f32);

    let (dst, size) = if height >= width {
        (
            [
                Point2f::new(0.0, 0.0),
                Point2f::new(w, 0.0),
                Point2f::new(0.0, h),
                Point2f::new(w, h),
            ],
            Size::new(width, height),
        )
    } else {
        (
            [
                Point2f::new(0.0, w),
                Point2f::new(0.0, 0.0),
                Point2f::new(h, w),
                Point2f::new(h, 0.0),
            ],
            Size::new(height, width),
        )
    };

    let src: Vector<Point2f> = Vector::from_iter(corners.as_array());
    let dst: Vector<Point2f> = Vector::from_iter(dst);
    let transform = imgproc::get_perspective_transform_def(&src, &dst)?;

    let mut warped = Mat::default();
    imgproc::warp_perspective_def(gray, &mut warped, &transform, size)?;
    Ok(warped)
}
