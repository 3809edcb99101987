use crate::consts::*;
use crate::ocr::PageLayout;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Logo identification settings. Thresholds are calibrated against real slips
/// and should not be changed without a labelled evaluation set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentifierConfig {
    pub query_width: u32,
    /// `None` matches templates at their native size.
    pub template_width: Option<u32>,
    pub crop_fraction: f64,
    pub blur_kernel: i32,
    pub scales: Vec<f64>,
    pub correlation_accept: f64,
    pub lowe_ratio: f32,
    pub good_match_accept: usize,
}

impl Default for IdentifierConfig {
    fn default() -> Self {
        Self {
            query_width: QUERY_WIDTH,
            template_width: Some(TEMPLATE_WIDTH),
            crop_fraction: QUERY_CROP_FRACTION,
            blur_kernel: BLUR_KERNEL,
            scales: (0..SCALE_COUNT)
                .map(|i| SCALE_START + SCALE_STEP * i as f64)
                .collect(),
            correlation_accept: CORRELATION_ACCEPT,
            lowe_ratio: LOWE_RATIO,
            good_match_accept: GOOD_MATCH_ACCEPT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    pub epsilon_min: f64,
    pub epsilon_max: f64,
    pub epsilon_steps: usize,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            epsilon_min: EPSILON_MIN,
            epsilon_max: EPSILON_MAX,
            epsilon_steps: EPSILON_STEPS,
        }
    }
}

impl LocatorConfig {
    /// Evenly spaced tolerances, inclusive of both ends.
    pub fn epsilons(&self) -> Vec<f64> {
        match self.epsilon_steps {
            0 => Vec::new(),
            1 => vec![self.epsilon_min],
            n => {
                let step = (self.epsilon_max - self.epsilon_min) / (n - 1) as f64;
                (0..n).map(|i| self.epsilon_min + step * i as f64).collect()
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionConfig {
    pub languages: String,
    /// Directory containing `tessdata/`. `None` uses the system default.
    pub datapath: Option<PathBuf>,
    pub eslip_layout: PageLayout,
    pub physical_layout: PageLayout,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            languages: OCR_LANGUAGES.to_string(),
            datapath: None,
            eslip_layout: PageLayout::Auto,
            physical_layout: PageLayout::SingleBlock,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub model_path: PathBuf,
    /// Class names in model output order.
    pub labels: Vec<String>,
    pub input_size: i32,
    pub confidence_threshold: f32,
    pub nms_threshold: f32,
    pub swap_rb: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DETECTOR_MODEL),
            labels: DETECTOR_LABELS.iter().map(|l| l.to_string()).collect(),
            input_size: DETECTOR_INPUT_SIZE,
            confidence_threshold: DETECTOR_CONFIDENCE,
            nms_threshold: DETECTOR_NMS,
            swap_rb: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicalConfig {
    pub max_width: i32,
    pub max_height: i32,
    pub blur_kernel: i32,
    pub adaptive_block_size: i32,
    pub adaptive_offset: f64,
}

impl Default for PhysicalConfig {
    fn default() -> Self {
        Self {
            max_width: DISPLAY_MAX_WIDTH,
            max_height: DISPLAY_MAX_HEIGHT,
            blur_kernel: BLUR_KERNEL,
            adaptive_block_size: ADAPTIVE_BLOCK_SIZE,
            adaptive_offset: ADAPTIVE_OFFSET,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory of bank-name subdirectories holding logo images.
    pub template_library: PathBuf,
    pub identifier: IdentifierConfig,
    pub locator: LocatorConfig,
    pub recognition: RecognitionConfig,
    pub detector: DetectorConfig,
    pub physical: PhysicalConfig,
    /// Keep intermediate images in each outcome.
    pub diagnostics: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            template_library: PathBuf::from(TEMPLATE_LIBRARY),
            identifier: IdentifierConfig::default(),
            locator: LocatorConfig::default(),
            recognition: RecognitionConfig::default(),
            detector: DetectorConfig::default(),
            physical: PhysicalConfig::default(),
            diagnostics: false,
        }
    }
}

impl PipelineConfig {
    /// Read a JSON config. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Cannot read config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Parse error in config {}", path.display()))
    }
}
