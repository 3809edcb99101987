//! Failure taxonomy for a single slip image.
//!
//! Every variant is local to the image being processed; batch callers log it and
//! move on to the next file.

use crate::bank::BankIdentity;
use crate::record::Channel;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SlipError>;

#[derive(Debug, Error)]
pub enum SlipError {
    /// The input path does not exist.
    #[error("file not found: {}", .0.display())]
    MissingFile(PathBuf),

    /// The file extension is not one of the supported raster formats.
    #[error("unsupported image format '{extension}' for {}", path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// The file exists but could not be decoded.
    #[error("could not decode image {}", .0.display())]
    UnreadableImage(PathBuf),

    /// No tolerance in the approximation sweep produced exactly four vertices.
    #[error("slip boundary is not a quadrilateral (closest approximation has {vertices} vertices)")]
    QuadrilateralNotFound { vertices: usize },

    /// The binary image contained no contour at all.
    #[error("no contour found in binarized slip")]
    NoContour,

    #[error("detector found no slip in the photo")]
    NoSlipDetected,

    /// Neither logo matching nor the text keyword scan named a bank.
    #[error("bank unknown")]
    BankUnknown,

    #[error("no {channel} extractor registered for bank {bank}")]
    NoDialect { channel: Channel, bank: BankIdentity },

    #[error("recognition returned no text")]
    EmptyRecognition,

    /// The dialect ran but none of its patterns matched.
    #[error("no data extracted for bank {bank}")]
    NoDataExtracted { bank: BankIdentity },

    #[error("text recognition failed: {0}")]
    Recognition(#[source] anyhow::Error),

    #[error("slip detection failed: {0}")]
    Detection(#[source] anyhow::Error),

    #[error(transparent)]
    Vision(#[from] opencv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SlipError {
    /// Malformed input is reported before any processing happens.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            SlipError::MissingFile(_)
                | SlipError::UnsupportedFormat { .. }
                | SlipError::UnreadableImage(_)
        )
    }
}
