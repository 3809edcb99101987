use crate::bank::BankIdentity;
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the slip reached us.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Channel {
    /// Bank app screenshot.
    ESlip,
    /// Photo of a printed ATM or teller receipt.
    Physical,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::ESlip => f.write_str("e-slip"),
            Channel::Physical => f.write_str("physical"),
        }
    }
}

/// One normalised transaction per image.
///
/// All fields are optional. A record where every extracted field is unset
/// counts as an extraction failure, see [`SlipRecord::is_empty`].
/// Unset fields serialise as `null` so the column set is stable.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlipRecord {
    pub transaction_date: Option<NaiveDate>,
    pub transaction_time: Option<NaiveTime>,
    pub amount: Option<Decimal>,
    pub from_party: Option<String>,
    pub to_party: Option<String>,
    pub to_bank_or_channel: Option<String>,
    pub reference_number: Option<String>,
    pub transaction_type: Option<String>,
    pub fee_amount: Option<Decimal>,
    pub balance: Option<Decimal>,
    pub account_number: Option<String>,
    /// Unstructured lines for layouts without a field grammar.
    pub raw_lines: Vec<String>,
    pub source_bank: Option<BankIdentity>,
    pub channel: Option<Channel>,
    /// Detector confidence for physical slips.
    #[serde(rename = "confidence_or_diagnostic")]
    pub confidence: Option<f32>,
}

impl SlipRecord {
    /// True when the dialect extracted nothing. Provenance fields set by the
    /// pipeline (`source_bank`, `channel`, `confidence`) are not considered.
    pub fn is_empty(&self) -> bool {
        self.transaction_date.is_none()
            && self.transaction_time.is_none()
            && self.amount.is_none()
            && self.from_party.is_none()
            && self.to_party.is_none()
            && self.to_bank_or_channel.is_none()
            && self.reference_number.is_none()
            && self.transaction_type.is_none()
            && self.fee_amount.is_none()
            && self.balance.is_none()
            && self.account_number.is_none()
            && self.raw_lines.is_empty()
    }

    pub(crate) fn with_provenance(
        mut self,
        bank: BankIdentity,
        channel: Channel,
        confidence: Option<f32>,
    ) -> Self {
        self.source_bank = Some(bank);
        self.channel = Some(channel);
        self.confidence = confidence;
        self
    }
}
