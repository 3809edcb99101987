use crate::bank::BankIdentity;
use crate::dialect::Dialect;
use crate::dialect::common::{
    clean_name, english_month, first_keyword, fold_sara_am, make_date, normalize_year,
    parse_amount, parse_time,
};
use crate::record::{Channel, SlipRecord};
use regex::Regex;
use std::sync::LazyLock;

static DATE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(\d{1,2})\s+(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\s+(\d{2,4})[,\s]+(\d{2}:\d{2})",
    )
    .expect("Invalid Bangkok Bank date regex")
});

static AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Amount\s+([“\-”,\d]+\.\d{2})\s*(?:tHe|THB|tie|tne)")
        .expect("Invalid Bangkok Bank amount regex")
});

static TRANSACTION_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Transaction reference\s*([A-Z0-9]{10,})")
        .expect("Invalid Bangkok Bank reference regex")
});

static BANK_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Bank reference no\.\s*(\d+)").expect("Invalid Bangkok Bank reference regex")
});

static FROM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:From\s+)?©\s*(.*?)(?:\n|\s{2,}|Bangkok Bank)")
        .expect("Invalid Bangkok Bank sender regex")
});

/// Recipient block, ended by an account number, a biller line or a bank name.
static TO_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)(?:@|To)\s*(.*?)(?:\n\s*\S{3,}-\S+-\S{3,}|\n\s*Biller ID|\n\s*Bank reference no|PromptPay|Kasikornbank|Siam Commercial Bank|Kiatnakin Phatra Bank|ttb|\d{3,}-\d+-\d{3,})",
    )
    .expect("Invalid Bangkok Bank recipient regex")
});

static LINE_MAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"น\s*(LINE MAN.*?)(?:\nBiller|\(QR by ttb\))")
        .expect("Invalid Bangkok Bank LINE MAN regex")
});

/// Checked in order against the recipient block.
const RECIPIENT_BANKS: &[(&str, &str)] = &[
    ("Kasikornbank", "Kasikornbank"),
    ("Siam Commercial Bank", "SCB"),
    ("Kiatnakin Phatra Bank", "Kiatnakin Phatra Bank"),
    ("PromptPay", "PromptPay"),
    ("ttb", "ttb"),
];

const NOT_A_NAME: &[&str] = &["THB", "successful", "Scan to verify"];

/// Bangkok Bank mobile banking: English labels, `dd Mon yy, HH:MM` dates.
pub struct BangkokESlip;

impl Dialect for BangkokESlip {
    fn channel(&self) -> Channel {
        Channel::ESlip
    }

    fn bank(&self) -> BankIdentity {
        BankIdentity::Bangkok
    }

    fn extract(&self, text: &str) -> SlipRecord {
        let text = fold_sara_am(text);
        let mut record = SlipRecord::default();

        if let Some(caps) = DATE_TIME.captures(&text) {
            let date = normalize_year(&caps[3])
                .zip(english_month(&caps[2]))
                .and_then(|(year, month)| make_date(year, month, &caps[1]));
            if date.is_some() {
                record.transaction_date = date;
                record.transaction_time = parse_time(&caps[4]);
            }
        }

        record.amount = AMOUNT.captures(&text).and_then(|c| parse_amount(&c[1]));

        record.reference_number = TRANSACTION_REF
            .captures(&text)
            .or_else(|| BANK_REF.captures(&text))
            .map(|c| c[1].trim().to_string());

        record.from_party = FROM.captures(&text).and_then(|c| clean_name(&c[1]));

        if let Some(caps) = TO_BLOCK.captures(&text) {
            let block = caps[1].trim();
            let candidate = block.lines().next().unwrap_or_default().trim();
            if !NOT_A_NAME.iter().any(|k| candidate.contains(k)) {
                record.to_party = clean_name(candidate);
            }

            // The terminator is often the bank name itself, so search the whole match.
            let haystack = format!("{} {}", &caps[0], record.to_party.as_deref().unwrap_or_default());
            if let Some(bank) = first_keyword(&haystack, RECIPIENT_BANKS) {
                record.to_bank_or_channel = Some(bank.to_string());
                // `ttb` ends the block, so a LINE MAN QR payment is only visible in the full text.
                if bank == "ttb" {
                    if let Some(name) = line_man_name(&text) {
                        record.to_party = Some(name);
                    }
                }
            }
        }

        if record.to_party.is_none() {
            if let Some(name) = line_man_name(&text) {
                if name.contains("ttb") || text.contains("ttb") {
                    record.to_bank_or_channel = Some("ttb".to_string());
                }
                record.to_party = Some(name);
            }
        }

        record
    }
}

fn line_man_name(text: &str) -> Option<String> {
    LINE_MAN.captures(text).and_then(|c| clean_name(&c[1]))
}
