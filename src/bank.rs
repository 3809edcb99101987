use serde::{Deserialize, Serialize};
use std::fmt;

/// Issuing bank of a slip.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BankIdentity {
    Bangkok,
    KBank,
    Scb,
    Krungthai,
    #[default]
    Unknown,
}

/// Free-text bank names (detector labels, template folder names) to canonical identity.
/// Looked up lowercase.
pub const BANK_ALIASES: &[(&str, BankIdentity)] = &[
    ("bangkok bank", BankIdentity::Bangkok),
    ("bangkok", BankIdentity::Bangkok),
    ("bkk", BankIdentity::Bangkok),
    ("bbl", BankIdentity::Bangkok),
    ("kasikornbank", BankIdentity::KBank),
    ("kbank", BankIdentity::KBank),
    ("k-bank", BankIdentity::KBank),
    ("kasikorn", BankIdentity::KBank),
    ("kplus", BankIdentity::KBank),
    ("k+", BankIdentity::KBank),
    ("scb", BankIdentity::Scb),
    ("siam commercial bank", BankIdentity::Scb),
    ("siam commercial", BankIdentity::Scb),
    ("siam", BankIdentity::Scb),
    ("krungthai", BankIdentity::Krungthai),
    ("krungthai bank", BankIdentity::Krungthai),
    ("ktb", BankIdentity::Krungthai),
    ("krung thai", BankIdentity::Krungthai),
    ("krungthai_bank", BankIdentity::Krungthai),
];

/// Substrings used when an alias is embedded in a longer label
/// (e.g. "Bangkok Bank Logo"). Checked in this order.
const ALIAS_FRAGMENTS: &[(&str, BankIdentity)] = &[
    ("bangkok", BankIdentity::Bangkok),
    ("kbank", BankIdentity::KBank),
    ("kasikorn", BankIdentity::KBank),
    ("scb", BankIdentity::Scb),
    ("siam commercial", BankIdentity::Scb),
    ("krungthai", BankIdentity::Krungthai),
    ("ktb", BankIdentity::Krungthai),
];

/// Keywords searched in recognised text when logo matching gave no answer.
const TEXT_KEYWORDS: &[(&[&str], BankIdentity)] = &[
    (&["kasikorn", "kbank"], BankIdentity::KBank),
    (&["siam commercial bank", "scb"], BankIdentity::Scb),
    (&["bangkok bank"], BankIdentity::Bangkok),
    (&["krungthai", "ktb"], BankIdentity::Krungthai),
];

impl BankIdentity {
    pub const KNOWN: [BankIdentity; 4] = [
        BankIdentity::Bangkok,
        BankIdentity::KBank,
        BankIdentity::Scb,
        BankIdentity::Krungthai,
    ];

    /// Resolve a raw label. Exact alias first, then alias fragments contained in the label.
    pub fn from_alias(label: &str) -> BankIdentity {
        let label = label.trim().to_lowercase();
        if label.is_empty() {
            return BankIdentity::Unknown;
        }
        if let Some((_, bank)) = BANK_ALIASES.iter().find(|(alias, _)| *alias == label) {
            return *bank;
        }
        ALIAS_FRAGMENTS
            .iter()
            .find(|(fragment, _)| label.contains(fragment))
            .map(|(_, bank)| *bank)
            .unwrap_or(BankIdentity::Unknown)
    }

    /// Scan recognised text for a bank name.
    pub fn from_text_keywords(text: &str) -> BankIdentity {
        let text = text.to_lowercase();
        TEXT_KEYWORDS
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| text.contains(k)))
            .map(|(_, bank)| *bank)
            .unwrap_or(BankIdentity::Unknown)
    }

    pub fn is_known(self) -> bool {
        self != BankIdentity::Unknown
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BankIdentity::Bangkok => "bangkok",
            BankIdentity::KBank => "kbank",
            BankIdentity::Scb => "scb",
            BankIdentity::Krungthai => "krungthai",
            BankIdentity::Unknown => "unknown",
        }
    }
}

impl fmt::Display for BankIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
