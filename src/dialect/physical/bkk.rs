use crate::bank::BankIdentity;
use crate::dialect::Dialect;
use crate::dialect::common::{parse_amount, parse_short_date, parse_time};
use crate::record::{Channel, SlipRecord};
use regex::Regex;
use rust_decimal::Decimal;
use std::sync::LazyLock;

static DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{2}/\d{2}/\d{2}\b").expect("Invalid BKK date regex"));

static TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{2}:\d{2}\b").expect("Invalid BKK time regex"));

static WITHDRAWAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bWITHDRAWAL\b").expect("Invalid BKK withdrawal regex"));

static AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d{1,3}(?:,\d{3})*\.\d{2}\b").expect("Invalid BKK amount regex")
});

static AVAILABLE_BALANCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"AVAIL\s+BAL").expect("Invalid BKK balance regex"));

/// Bangkok Bank ATM receipt. Labels are matched on the upper-cased line,
/// values on a copy with letter/digit confusions undone.
pub struct BangkokPhysical;

impl Dialect for BangkokPhysical {
    fn channel(&self) -> Channel {
        Channel::Physical
    }

    fn bank(&self) -> BankIdentity {
        BankIdentity::Bangkok
    }

    fn extract(&self, text: &str) -> SlipRecord {
        let labels: Vec<String> = text.lines().map(str::to_uppercase).collect();
        let values: Vec<String> = labels.iter().map(|l| digits_from_ocr(l)).collect();
        let amount_near = |i: usize| -> Option<Decimal> {
            amount_in(&values[i]).or_else(|| values.get(i + 1).and_then(|next| amount_in(next)))
        };

        let mut record = SlipRecord::default();
        for (i, (label, value)) in labels.iter().zip(&values).enumerate() {
            if record.transaction_date.is_none() {
                record.transaction_date = DATE.find(value).and_then(|m| parse_short_date(m.as_str()));
            }
            if record.transaction_time.is_none() {
                record.transaction_time = TIME.find(value).and_then(|m| parse_time(m.as_str()));
            }

            if WITHDRAWAL.is_match(label) {
                record.transaction_type.get_or_insert_with(|| "WITHDRAWAL".to_string());
                if record.amount.is_none() {
                    record.amount = amount_near(i);
                }
            }

            // Later balance lines win.
            if AVAILABLE_BALANCE.is_match(label) {
                if let Some(balance) = amount_near(i) {
                    record.balance = Some(balance);
                }
            }
        }

        record
    }
}

fn digits_from_ocr(line: &str) -> String {
    line.chars()
        .filter(|c| *c != '฿')
        .map(|c| match c {
            'O' | 'o' => '0',
            'I' | 'l' => '1',
            other => other,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

fn amount_in(line: &str) -> Option<Decimal> {
    AMOUNT.find(line).and_then(|m| parse_amount(m.as_str()))
}
