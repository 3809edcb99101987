pub mod consts {
    /// Width every e-slip query image is scaled to before logo matching.
    pub const QUERY_WIDTH: u32 = 1000;
    /// Width every logo template is scaled to before logo matching.
    pub const TEMPLATE_WIDTH: u32 = 240;
    /// Only the upper part of an e-slip (height / 1.5) is searched for a logo.
    pub const QUERY_CROP_FRACTION: f64 = 1.0 / 1.5;
    pub const BLUR_KERNEL: i32 = 3;

    pub const SCALE_START: f64 = 0.1;
    pub const SCALE_STEP: f64 = 0.1;
    pub const SCALE_COUNT: usize = 19;

    /// Template matching result above which a bank is accepted immediately.
    pub const CORRELATION_ACCEPT: f64 = 0.7;
    /// Lowe ratio: nearest distance must be below this fraction of the second nearest.
    pub const LOWE_RATIO: f32 = 0.7;
    /// Feature-matching good-match count above which a bank is accepted immediately.
    pub const GOOD_MATCH_ACCEPT: usize = 50;

    pub const EPSILON_MIN: f64 = 0.001;
    pub const EPSILON_MAX: f64 = 0.05;
    pub const EPSILON_STEPS: usize = 10;

    pub const DISPLAY_MAX_WIDTH: i32 = 1280;
    pub const DISPLAY_MAX_HEIGHT: i32 = 720;
    pub const ADAPTIVE_BLOCK_SIZE: i32 = 21;
    pub const ADAPTIVE_OFFSET: f64 = 10.0;

    pub const DETECTOR_INPUT_SIZE: i32 = 640;
    pub const DETECTOR_CONFIDENCE: f32 = 0.25;
    /// Overlap above which the weaker of two detections is suppressed.
    pub const DETECTOR_NMS: f32 = 0.7;
    pub const DETECTOR_LABELS: [&str; 4] = ["bkk", "kplus", "krungthai", "scb"];

    pub const OCR_LANGUAGES: &str = "tha+eng";
    pub const TEMPLATE_LIBRARY: &str = "bank_logos";
    pub const DETECTOR_MODEL: &str = "models/best.onnx";

    pub const IMAGE_EXTENSIONS_OPENCV: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];
    pub const IMAGE_EXTENSIONS_DECODED: [&str; 3] = ["webp", "tif", "tiff"];
}

pub mod bank;
pub mod bank_identifier;
pub mod batch;
pub mod config;
pub mod dialect;
pub mod error;
pub mod ocr;
pub mod overlay;
pub mod pipeline;
pub mod preprocess;
pub mod quad_locator;
pub mod record;
pub mod slip_image;

pub use bank::BankIdentity;
pub use error::SlipError;
pub use pipeline::{SlipOutcome, SlipPipeline};
pub use record::{Channel, SlipRecord};
