// Tesseract-backed text recognition

use super::{PageLayout, RecognizedText, TextRecognizer, TokenBox};
use crate::config::RecognitionConfig;
use anyhow::{Result, anyhow};
use image::GrayImage;
use log::debug;
use tesseract::{PageSegMode, Tesseract};

pub struct TesseractRecognizer {
    datapath: Option<String>,
    languages: String,
    /// Taken for the duration of a call because every Tesseract step consumes
    /// the handle. Left `None` if a step failed.
    engine: Option<Tesseract>,
}

impl TesseractRecognizer {
    pub fn new(config: &RecognitionConfig) -> Result<Self> {
        let datapath = config
            .datapath
            .as_ref()
            .map(|p| {
                p.to_str()
                    .map(str::to_string)
                    .ok_or_else(|| anyhow!("tessdata path is not UTF-8: {}", p.display()))
            })
            .transpose()?;

        let engine = Tesseract::new(datapath.as_deref(), Some(config.languages.as_str()))?;
        debug!("Tesseract initialised with languages {}", config.languages);

        Ok(Self {
            datapath,
            languages: config.languages.clone(),
            engine: Some(engine),
        })
    }

    fn take_engine(&mut self) -> Result<Tesseract> {
        match self.engine.take() {
            Some(engine) => Ok(engine),
            None => {
                debug!("Re-initialising Tesseract after a failed call");
                Ok(Tesseract::new(
                    self.datapath.as_deref(),
                    Some(self.languages.as_str()),
                )?)
            }
        }
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&mut self, img: &GrayImage, layout: PageLayout) -> Result<RecognizedText> {
        let (width, height) = (img.width() as i32, img.height() as i32);
        if width == 0 || height == 0 {
            return Ok(RecognizedText::default());
        }

        let mut tess = self
            .take_engine()?
            .set_frame(img.as_raw(), width, height, 1, width)?;
        tess.set_page_seg_mode(match layout {
            PageLayout::Auto => PageSegMode::PsmAuto,
            PageLayout::SingleBlock => PageSegMode::PsmSingleBlock,
        });
        let mut tess = tess.recognize()?;

        let text = tess.get_text()?;
        let tsv = tess.get_tsv_text(0)?;
        self.engine = Some(tess);

        let tokens = parse_tsv(&tsv);
        debug!("Recognised {} chars, {} tokens", text.len(), tokens.len());
        Ok(RecognizedText { text, tokens })
    }
}

/// Word-level rows (level 5) of Tesseract's TSV output.
pub fn parse_tsv(tsv: &str) -> Vec<TokenBox> {
    tsv.lines()
        .filter(|l| l.starts_with('5'))
        .filter_map(|l| parse_word(l).ok())
        .filter(|t| !t.text.trim().is_empty())
        .collect()
}

fn parse_word(line: &str) -> Result<TokenBox> {
    let tokens: Vec<&str> = line.split_terminator('\t').collect();
    if tokens.len() < 12 {
        return Err(anyhow!("unable to parse tsv result from Tesseract: {:?}", line));
    }

    Ok(TokenBox {
        x: tokens[6].parse()?,
        y: tokens[7].parse()?,
        w: tokens[8].parse()?,
        h: tokens[9].parse()?,
        conf: tokens[10].parse()?,
        text: tokens[11].to_string(),
    })
}
