use crate::bank::BankIdentity;
use crate::dialect::Dialect;
use crate::dialect::common::{clean_name, fold_sara_am, parse_amount, parse_short_date, parse_time};
use crate::record::{Channel, SlipRecord};
use regex::Regex;
use std::sync::LazyLock;

static DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)DATE\s*(\d{2}/\d{2}/\d{2})").expect("Invalid Krungthai date regex")
});

static TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)TIME\s*(\d{2}:\d{2})").expect("Invalid Krungthai time regex")
});

static DEPOSIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)AUTO\s*DEP").expect("Invalid Krungthai deposit regex"));

static AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)จำนวนเงิน\s*([\d,]+\.\d{2})\s*BAHT").expect("Invalid Krungthai amount regex")
});

static ACCOUNT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"To A/C Name\s*:\s*(.+)").expect("Invalid Krungthai account name regex")
});

/// Krungthai cash deposit machine receipt.
pub struct KrungthaiPhysical;

impl Dialect for KrungthaiPhysical {
    fn channel(&self) -> Channel {
        Channel::Physical
    }

    fn bank(&self) -> BankIdentity {
        BankIdentity::Krungthai
    }

    fn extract(&self, text: &str) -> SlipRecord {
        let text = fold_sara_am(text);
        let mut record = SlipRecord::default();

        for line in text.lines().map(str::trim) {
            if record.transaction_date.is_none() {
                record.transaction_date = DATE.captures(line).and_then(|c| parse_short_date(&c[1]));
            }
            if record.transaction_time.is_none() {
                record.transaction_time = TIME.captures(line).and_then(|c| parse_time(&c[1]));
            }
            if record.transaction_type.is_none() && DEPOSIT.is_match(line) {
                record.transaction_type = Some("AUTO DEP".to_string());
            }
            if record.amount.is_none() {
                record.amount = AMOUNT.captures(line).and_then(|c| parse_amount(&c[1]));
            }
            if record.to_party.is_none() {
                record.to_party = ACCOUNT_NAME.captures(line).and_then(|c| clean_name(&c[1]));
            }
        }

        record
    }
}
