use super::zeros_from_ocr;
use crate::bank::BankIdentity;
use crate::dialect::Dialect;
use crate::dialect::common::{parse_amount, parse_short_date, parse_time};
use crate::record::{Channel, SlipRecord};
use regex::Regex;
use std::sync::LazyLock;

/// Separators are frequently read as `°`, `o` or `'`; digits as `O`.
static DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)DATE\s*([\dOo°]{2})[/°oO']?([\dOo°]{2})[/°oO']?([\dOo°]{2})")
        .expect("Invalid K PLUS date regex")
});

static TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)TIME\s*([\dOo°]{2}:[\dOo°]{2})").expect("Invalid K PLUS time regex")
});

static WITHDRAWAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)WITHDRAWAL").expect("Invalid K PLUS withdrawal regex"));

static FROM_ACCOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)FR[O0]M\s*ACC[O0]UNT\s*([A-Z0-9][A-Z0-9\-]*)")
        .expect("Invalid K PLUS account regex")
});

static AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)AM[O0]UNT\s*([\dOo,]+\.[\dOo]{2})").expect("Invalid K PLUS amount regex")
});

static FEE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)FEE\s*AM[O0]UNT\s*([\dOo,]+\.[\dOo]{2})").expect("Invalid K PLUS fee regex")
});

static BALANCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)A/?C\s*BALANCE\s*([\dOo,]+\.[\dOo]{2})").expect("Invalid K PLUS balance regex")
});

/// Kasikornbank ATM receipt: one `LABEL value` pair per line, first hit wins.
pub struct KPlusPhysical;

impl Dialect for KPlusPhysical {
    fn channel(&self) -> Channel {
        Channel::Physical
    }

    fn bank(&self) -> BankIdentity {
        BankIdentity::KBank
    }

    fn extract(&self, text: &str) -> SlipRecord {
        let mut record = SlipRecord::default();

        for line in text.lines().map(str::trim) {
            if record.transaction_date.is_none() {
                record.transaction_date = DATE.captures(line).and_then(|c| {
                    let date = format!("{}/{}/{}", &c[1], &c[2], &c[3]);
                    parse_short_date(&zeros_from_ocr(&date))
                });
            }
            if record.transaction_time.is_none() {
                record.transaction_time =
                    TIME.captures(line).and_then(|c| parse_time(&zeros_from_ocr(&c[1])));
            }
            if record.transaction_type.is_none() && WITHDRAWAL.is_match(line) {
                record.transaction_type = Some("WITHDRAWAL".to_string());
            }
            if record.account_number.is_none() {
                record.account_number = FROM_ACCOUNT.captures(line).map(|c| c[1].to_uppercase());
            }

            let fee = FEE.captures(line);
            if record.fee_amount.is_none() {
                record.fee_amount = fee.as_ref().and_then(|c| parse_amount(&zeros_from_ocr(&c[1])));
            }
            if record.amount.is_none() && fee.is_none() {
                record.amount = AMOUNT.captures(line).and_then(|c| parse_amount(&zeros_from_ocr(&c[1])));
            }

            if record.balance.is_none() {
                record.balance = BALANCE.captures(line).and_then(|c| parse_amount(&zeros_from_ocr(&c[1])));
            }
        }

        record
    }
}
