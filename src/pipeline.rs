use crate::bank::BankIdentity;
use crate::bank_identifier::{BankIdentifier, BankMatch, MatchMethod, TemplateLibrary};
use crate::config::PipelineConfig;
use crate::dialect::DialectRegistry;
use crate::error::{Result, SlipError};
use crate::ocr::{Detection, Engines, PageLayout, RecognizedText};
use crate::overlay;
use crate::preprocess;
use crate::quad_locator::{self, QuadrilateralLocator};
use crate::record::{Channel, SlipRecord};
use crate::slip_image::{self, ColorMode, SlipImage};
use log::{debug, info};
use opencv::core::Mat;
use std::path::Path;

/// Everything produced for one slip image.
pub struct SlipOutcome {
    pub record: SlipRecord,
    /// Unprocessed recognizer output, shown next to the record.
    pub raw_text: String,
    pub bank: BankIdentity,
    pub bank_match: Option<BankMatch>,
    pub detection: Option<Detection>,
    /// Named intermediate images. Only filled when diagnostics are enabled.
    pub diagnostics: Vec<(&'static str, Mat)>,
}

/// Turns slip images into records. Owns the engines and the logo library for
/// its whole lifetime; create one per worker thread.
pub struct SlipPipeline {
    config: PipelineConfig,
    engines: Engines,
    library: TemplateLibrary,
    identifier: BankIdentifier,
    locator: QuadrilateralLocator,
    dialects: DialectRegistry,
}

impl SlipPipeline {
    pub fn new(config: PipelineConfig, engines: Engines) -> Result<Self> {
        let library = TemplateLibrary::load(&config.template_library);
        Self::with_library(config, engines, library)
    }

    /// Use an already loaded template library instead of reading `config.template_library`.
    pub fn with_library(config: PipelineConfig, engines: Engines, library: TemplateLibrary) -> Result<Self> {
        let identifier = BankIdentifier::new(config.identifier.clone())?;
        let locator = QuadrilateralLocator::new(&config.locator);

        Ok(Self {
            config,
            engines,
            library,
            identifier,
            locator,
            dialects: DialectRegistry::with_builtin(),
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn dialects_mut(&mut self) -> &mut DialectRegistry {
        &mut self.dialects
    }

    /// Release the engines, e.g. to hand them to a new pipeline.
    pub fn into_engines(self) -> Engines {
        self.engines
    }

    pub fn process(&mut self, path: &Path, channel: Channel) -> Result<SlipOutcome> {
        debug!("Processing {} as {}", path.display(), channel);
        match channel {
            Channel::ESlip => self.process_eslip(path),
            Channel::Physical => self.process_physical(path),
        }
    }

    fn process_eslip(&mut self, path: &Path) -> Result<SlipOutcome> {
        let mut diagnostics = Vec::new();
        let image = SlipImage::load(path, ColorMode::Grayscale)?;
        let gray = image.mat();

        let binary = preprocess::to_grayscale_binary(gray)?;
        let recognized = self.recognize(&binary, self.config.recognition.eslip_layout)?;

        let bank_match = self.identifier.identify(gray, &self.library)?;
        let mut bank = bank_match
            .as_ref()
            .map_or(BankIdentity::Unknown, |m| BankIdentity::from_alias(&m.group));
        if !bank.is_known() {
            bank = BankIdentity::from_text_keywords(&recognized.text);
            if bank.is_known() {
                info!("Bank {} found by keyword scan", bank);
            }
        }

        if self.config.diagnostics {
            diagnostics.push(("binary", binary.try_clone()?));
            diagnostics.push(("tokens", overlay::draw_tokens(&binary, &recognized.tokens)?));
            if let Some(BankMatch {
                method: MatchMethod::Template { location, size, .. },
                ..
            }) = &bank_match
            {
                let query = self.identifier.prepare_query(gray)?;
                diagnostics.push(("template_match", overlay::draw_template_match(&query, *location, *size)?));
            }
        }

        if !bank.is_known() {
            return Err(SlipError::BankUnknown);
        }

        let record = self.extract(Channel::ESlip, bank, &recognized.text)?;
        Ok(SlipOutcome {
            record: record.with_provenance(bank, Channel::ESlip, None),
            raw_text: recognized.text,
            bank,
            bank_match,
            detection: None,
            diagnostics,
        })
    }

    fn process_physical(&mut self, path: &Path) -> Result<SlipOutcome> {
        let mut diagnostics = Vec::new();
        let physical = self.config.physical.clone();

        let image = SlipImage::load(path, ColorMode::Color)?;
        let fitted = preprocess::resize_to_fit(image.mat(), physical.max_width, physical.max_height)?;

        let detector = self
            .engines
            .detector
            .as_mut()
            .ok_or_else(|| SlipError::Detection(anyhow::anyhow!("no slip detector loaded")))?;
        // One receipt per photo; further detections are ignored.
        let detection = detector
            .detect(&fitted)
            .map_err(SlipError::Detection)?
            .into_iter()
            .next()
            .ok_or(SlipError::NoSlipDetected)?;
        info!(
            "Detected '{}' slip with confidence {:.2}",
            detection.label, detection.confidence
        );

        let crop = preprocess::crop_rect(&fitted, detection.bbox)?;
        let gray = preprocess::to_grayscale(&crop)?;
        let blurred = preprocess::gaussian_blur(&gray, physical.blur_kernel)?;
        let edges = preprocess::adaptive_binarize_inverted(
            &blurred,
            physical.adaptive_block_size,
            physical.adaptive_offset,
        )?;
        let outline = preprocess::invert(&edges)?;

        let reference = self.config.diagnostics.then_some(&gray);
        let located = self.locator.locate(&outline, reference)?;
        let corrected = quad_locator::correct_perspective(&gray, &located.corners)?;

        let ocr_binary = preprocess::adaptive_binarize_inverted(
            &corrected,
            physical.adaptive_block_size,
            physical.adaptive_offset,
        )?;
        let ocr_input = preprocess::invert(&ocr_binary)?;
        let recognized = self.recognize(&ocr_input, self.config.recognition.physical_layout)?;

        if self.config.diagnostics {
            diagnostics.push(("detection", overlay::draw_detection(&fitted, &detection)?));
            diagnostics.push(("crop", crop));
            diagnostics.push(("outline", outline));
            if let Some(contour) = located.overlay {
                diagnostics.push(("contour", contour));
            }
            diagnostics.push(("perspective", corrected));
            diagnostics.push(("ocr_input", ocr_input.try_clone()?));
            diagnostics.push(("tokens", overlay::draw_tokens(&ocr_input, &recognized.tokens)?));
        }

        let mut bank = BankIdentity::from_alias(&detection.label);
        if !bank.is_known() {
            bank = BankIdentity::from_text_keywords(&recognized.text);
        }
        if !bank.is_known() {
            return Err(SlipError::BankUnknown);
        }

        let record = self.extract(Channel::Physical, bank, &recognized.text)?;
        Ok(SlipOutcome {
            record: record.with_provenance(bank, Channel::Physical, Some(detection.confidence)),
            raw_text: recognized.text,
            bank,
            bank_match: None,
            detection: Some(detection),
            diagnostics,
        })
    }

    fn recognize(&mut self, img: &Mat, layout: PageLayout) -> Result<RecognizedText> {
        let gray = slip_image::mat_to_gray(img)?;
        let recognized = self
            .engines
            .recognizer
            .recognize(&gray, layout)
            .map_err(SlipError::Recognition)?;
        if recognized.is_blank() {
            return Err(SlipError::EmptyRecognition);
        }
        debug!("Recognised {} lines", recognized.lines().len());
        Ok(recognized)
    }

    fn extract(&self, channel: Channel, bank: BankIdentity, text: &str) -> Result<SlipRecord> {
        let dialect = self
            .dialects
            .get(channel, bank)
            .ok_or(SlipError::NoDialect { channel, bank })?;
        let record = dialect.extract(text);
        if record.is_empty() {
            return Err(SlipError::NoDataExtracted { bank });
        }
        Ok(record)
    }
}
