// Text recognition and slip detection engines

use crate::config::PipelineConfig;
use anyhow::Result;
use image::GrayImage;
use opencv::core::{Mat, Rect};
use serde::{Deserialize, Serialize};

pub mod tesseract_ocr;
pub mod yolo_detector;

/// How the recognizer should segment the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageLayout {
    /// Automatic segmentation, suited to app screenshots.
    Auto,
    /// One uniform block of text, suited to printed receipts.
    SingleBlock,
}

/// A recognised word and its box in image coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenBox {
    pub text: String,
    pub conf: f32,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl TokenBox {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecognizedText {
    pub text: String,
    /// Only used for diagnostic overlays.
    pub tokens: Vec<TokenBox>,
}

impl RecognizedText {
    pub fn lines(&self) -> Vec<&str> {
        self.text.lines().collect()
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub label: String,
    pub confidence: f32,
    pub bbox: Rect,
}

/// Trait for engines that turn an image into text
pub trait TextRecognizer {
    /// Recognise all text on a grayscale or binary image.
    fn recognize(&mut self, img: &GrayImage, layout: PageLayout) -> Result<RecognizedText>;
}

/// Trait for engines that find slips in a photo
pub trait SlipDetector {
    /// Detections sorted by descending confidence. Empty when nothing was found.
    fn detect(&mut self, img: &Mat) -> Result<Vec<Detection>>;
}

/// Long-lived engine handles, created once and handed to the pipeline.
pub struct Engines {
    pub recognizer: Box<dyn TextRecognizer>,
    /// Only physical slips need a detector.
    pub detector: Option<Box<dyn SlipDetector>>,
}

impl Engines {
    /// Start Tesseract and, when `with_detector` is set, load the detection model.
    pub fn init(config: &PipelineConfig, with_detector: bool) -> Result<Self> {
        let recognizer = tesseract_ocr::TesseractRecognizer::new(&config.recognition)?;
        let detector = if with_detector {
            let detector = yolo_detector::YoloSlipDetector::new(&config.detector)?;
            Some(Box::new(detector) as Box<dyn SlipDetector>)
        } else {
            None
        };

        Ok(Self {
            recognizer: Box::new(recognizer),
            detector,
        })
    }

    pub fn new(recognizer: Box<dyn TextRecognizer>, detector: Option<Box<dyn SlipDetector>>) -> Self {
        Self { recognizer, detector }
    }
}
