mod common;

use anyhow::Result;
use common::*;
use opencv::{
    core::{Point, Point2f, Rect, Scalar, Vector},
    imgcodecs, imgproc,
    prelude::*,
};
use slip_reader::config::LocatorConfig;
use slip_reader::preprocess;
use slip_reader::quad_locator::{QuadCorners, QuadrilateralLocator, correct_perspective};
use slip_reader::slip_image::{ColorMode, Provenance, SlipImage};
use slip_reader::SlipError;

fn assert_near(actual: Point2f, expected: (f32, f32)) {
    let (x, y) = expected;
    assert!(
        (actual.x - x).abs() <= 2.0 && (actual.y - y).abs() <= 2.0,
        "corner {actual:?} is not near ({x}, {y})"
    );
}

#[test]
fn test_corner_ordering() {
    let corners = QuadCorners::from_points([
        Point2f::new(210.0, 395.0),
        Point2f::new(12.0, 8.0),
        Point2f::new(5.0, 402.0),
        Point2f::new(198.0, 15.0),
    ]);
    assert_eq!(corners.top_left, Point2f::new(12.0, 8.0));
    assert_eq!(corners.top_right, Point2f::new(198.0, 15.0));
    assert_eq!(corners.bottom_left, Point2f::new(5.0, 402.0));
    assert_eq!(corners.bottom_right, Point2f::new(210.0, 395.0));
}

#[test]
fn test_locate_portrait_rectangle() -> Result<()> {
    let mut binary = blank(600, 400, 0.0)?;
    fill_rect(&mut binary, Rect::new(50, 80, 200, 400), 255.0)?;
    let reference = blank(600, 400, 128.0)?;

    let locator = QuadrilateralLocator::new(&LocatorConfig::default());
    let located = locator.locate(&binary, Some(&reference))?;
    println!("Located {:?} at eps={}", located.corners, located.epsilon);

    assert_near(located.corners.top_left, (50.0, 80.0));
    assert_near(located.corners.top_right, (250.0, 80.0));
    assert_near(located.corners.bottom_left, (50.0, 480.0));
    assert_near(located.corners.bottom_right, (250.0, 480.0));

    let overlay = located
        .overlay
        .ok_or_else(|| anyhow::anyhow!("overlay missing"))?;
    assert_eq!(overlay.channels(), 3);
    assert_eq!((overlay.cols(), overlay.rows()), (400, 600));

    let corrected = correct_perspective(&reference, &located.corners)?;
    assert!((corrected.cols() - 200).abs() <= 2, "width {}", corrected.cols());
    assert!((corrected.rows() - 400).abs() <= 2, "height {}", corrected.rows());
    Ok(())
}

#[test]
fn test_locate_landscape_rectangle_is_turned_upright() -> Result<()> {
    let mut binary = blank(400, 600, 0.0)?;
    fill_rect(&mut binary, Rect::new(100, 100, 400, 200), 255.0)?;

    let locator = QuadrilateralLocator::new(&LocatorConfig::default());
    let located = locator.locate(&binary, None)?;
    assert!(located.overlay.is_none());

    assert_near(located.corners.top_left, (100.0, 100.0));
    assert_near(located.corners.top_right, (500.0, 100.0));
    assert_near(located.corners.bottom_left, (100.0, 300.0));
    assert_near(located.corners.bottom_right, (500.0, 300.0));

    let corrected = correct_perspective(&binary, &located.corners)?;
    assert!(corrected.rows() > corrected.cols());
    assert!((corrected.rows() - 400).abs() <= 2, "height {}", corrected.rows());
    assert!((corrected.cols() - 200).abs() <= 2, "width {}", corrected.cols());
    Ok(())
}

#[test]
fn test_locate_rejects_triangle() -> Result<()> {
    let mut binary = blank(400, 400, 0.0)?;
    let mut polygons: Vector<Vector<Point>> = Vector::new();
    polygons.push(Vector::from_iter([
        Point::new(50, 50),
        Point::new(350, 50),
        Point::new(50, 350),
    ]));
    imgproc::fill_poly_def(&mut binary, &polygons, Scalar::all(255.0))?;

    let locator = QuadrilateralLocator::new(&LocatorConfig::default());
    match locator.locate(&binary, None) {
        Err(SlipError::QuadrilateralNotFound { vertices }) => assert_ne!(vertices, 4),
        Err(e) => anyhow::bail!("unexpected error {e}"),
        Ok(located) => anyhow::bail!("triangle located as {:?}", located.corners),
    }
    Ok(())
}

#[test]
fn test_locate_empty_image() -> Result<()> {
    let binary = blank(100, 100, 0.0)?;
    let locator = QuadrilateralLocator::new(&LocatorConfig::default());
    assert!(matches!(locator.locate(&binary, None), Err(SlipError::NoContour)));
    Ok(())
}

#[test]
fn test_epsilon_sweep() {
    let eps = LocatorConfig::default().epsilons();
    assert_eq!(eps.len(), 10);
    assert!((eps[0] - 0.001).abs() < 1e-12);
    assert!((eps[9] - 0.05).abs() < 1e-12);
    assert!(eps.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_preprocess_shapes() -> Result<()> {
    let mut img = blank_color(300, 500, 255.0)?;
    fill_rect(&mut img, Rect::new(100, 100, 50, 50), 0.0)?;

    let binary = preprocess::to_grayscale_binary(&img)?;
    assert_eq!(binary.channels(), 1);
    assert_eq!(*binary.at_2d::<u8>(120, 120)?, 0);
    assert_eq!(*binary.at_2d::<u8>(10, 10)?, 255);

    let resized = preprocess::resize_to_width(&binary, 1000)?;
    assert_eq!((resized.cols(), resized.rows()), (1000, 600));

    let top = preprocess::crop_top_fraction(&resized, 1.0 / 1.5)?;
    assert_eq!((top.cols(), top.rows()), (1000, 400));

    let fitted = preprocess::resize_to_fit(&blank(1440, 2560, 0.0)?, 1280, 720)?;
    assert_eq!((fitted.cols(), fitted.rows()), (1280, 720));
    let small = preprocess::resize_to_fit(&img, 1280, 720)?;
    assert_eq!((small.cols(), small.rows()), (500, 300));

    let crop = preprocess::crop_rect(&img, Rect::new(450, 250, 100, 100))?;
    assert_eq!((crop.cols(), crop.rows()), (50, 50));
    assert!(preprocess::crop_rect(&img, Rect::new(600, 0, 10, 10)).is_err());

    let gray = preprocess::to_grayscale(&img)?;
    let adaptive = preprocess::adaptive_binarize_inverted(&gray, 21, 10.0)?;
    // Flat paper is background; only the ink edge survives.
    assert_eq!(*adaptive.at_2d::<u8>(10, 10)?, 0);
    let restored = preprocess::invert(&adaptive)?;
    assert_eq!(*restored.at_2d::<u8>(10, 10)?, 255);
    Ok(())
}

#[test]
fn test_slip_image_sources() -> Result<()> {
    let mut encoded: Vector<u8> = Vector::new();
    imgcodecs::imencode(".png", &logo()?, &mut encoded, &Vector::new())?;
    let decoded = SlipImage::from_bytes(encoded.as_slice(), ColorMode::Grayscale)?;
    assert_eq!((decoded.width(), decoded.height()), (240, 120));
    assert_eq!(decoded.provenance(), &Provenance::Memory);
    assert!(SlipImage::from_bytes(b"garbage", ColorMode::Color).is_err());

    let dir = tempfile::tempdir()?;
    let tiff = dir.path().join("scan.TIFF");
    image::GrayImage::from_pixel(64, 32, image::Luma([200u8])).save(&tiff)?;

    let gray = SlipImage::load(&tiff, ColorMode::Grayscale)?;
    assert_eq!((gray.width(), gray.height()), (64, 32));
    assert_eq!(gray.mat().channels(), 1);
    assert_eq!(*gray.mat().at_2d::<u8>(5, 5)?, 200);

    let color = SlipImage::load(&tiff, ColorMode::Color)?;
    assert_eq!(color.mat().channels(), 3);
    assert_eq!(color.provenance(), &Provenance::Path(tiff.clone()));
    Ok(())
}
