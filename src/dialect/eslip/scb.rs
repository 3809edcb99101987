use crate::bank::BankIdentity;
use crate::dialect::Dialect;
use crate::dialect::common::{
    clean_name, contains_any, fold_sara_am, make_date, month_number_fuzzy, normalize_year,
    parse_amount, parse_time,
};
use crate::record::{Channel, SlipRecord};
use regex::Regex;
use std::sync::LazyLock;

static DATE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2})\s+([A-Za-zก-๎][A-Za-zก-๎\.]*)\s+(\d{4})\s+-\s+(\d{2}:\d{2})")
        .expect("Invalid SCB date regex")
});

/// Card slips sometimes carry a stray tone mark in the label.
static AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"จำนวนเงิ่?น\s*([,\d]+\.\d{2})").expect("Invalid SCB amount regex")
});

static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"รหัสอ้างอิง:\s*([A-Za-z0-9]+)").expect("Invalid SCB reference regex")
});

static FROM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"จาก\s*(?:©|@)\s*(.*?)(?:\n|XXX-XXX\d{3}-\d|\d{4}\s*\d{2}xx\s*xxxx\s*\d{4}|รหัสอ้างอิง)",
    )
    .expect("Invalid SCB sender regex")
});

static TO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"ไปยัง\s*(?:@|0|©)?\s*(.*?)(?:\n|x-\d{4}|X{3}-\d{3}|Biller ID|\d{4}\s*\d{2}xx|Comp code|บัญชีรับชำระ|เลขที่เครื่องชำระเงิน|รหัสร้านค้า|\d{3,}-\d+-\d{3,})",
    )
    .expect("Invalid SCB recipient regex")
});

/// Merchant name printed under the provider note of PromptPay payments.
static PROVIDER_NOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"ข้อมูลเพิ่มเติมจากผู้ให้บริการ\s*\n\s*(.*?)(?:\s*\(.*?\))?\s*\n")
        .expect("Invalid SCB provider regex")
});

static PLANET_NOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"ข้อมูลเพิ่มเติมจากผู้ให้บริการ\s*\n\s*([A-Z\s]+)\s*\n")
        .expect("Invalid SCB Planet regex")
});

const PLANET: &str = "PLANET SCB";
const BILLER_WORDS: &[&str] = &["เอไอเอส", "AIS", "การประปา", "การไฟฟ้า", "Biller ID", "Comp code"];
/// Characters after the recipient name searched for a bank hint.
const CONTEXT_CHARS: usize = 70;

/// SCB EASY: Thai labels, `dd เม.ย. yyyy - HH:MM` dates, sender after `จาก`,
/// recipient after `ไปยัง`.
pub struct ScbESlip;

impl Dialect for ScbESlip {
    fn channel(&self) -> Channel {
        Channel::ESlip
    }

    fn bank(&self) -> BankIdentity {
        BankIdentity::Scb
    }

    fn extract(&self, text: &str) -> SlipRecord {
        let text = fold_sara_am(text);
        let mut record = SlipRecord::default();

        if let Some(caps) = DATE_TIME.captures(&text) {
            let date = normalize_year(&caps[3])
                .zip(month_number_fuzzy(&caps[2]))
                .and_then(|(year, month)| make_date(year, month, &caps[1]));
            if date.is_some() {
                record.transaction_date = date;
                record.transaction_time = parse_time(&caps[4]);
            }
        }

        record.amount = AMOUNT.captures(&text).and_then(|c| parse_amount(&c[1]));
        record.reference_number = REFERENCE.captures(&text).map(|c| c[1].trim().to_string());

        if let Some(caps) = FROM.captures(&text) {
            let candidate = caps[1].trim();
            record.from_party = if candidate.contains(PLANET) {
                Some(PLANET.to_string())
            } else {
                clean_name(candidate)
            };
        }

        if let Some(caps) = TO.captures(&text) {
            recipient(&text, caps[1].trim(), &mut record);
        }

        record
    }
}

fn recipient(text: &str, candidate: &str, record: &mut SlipRecord) {
    record.to_party = clean_name(candidate);

    if candidate.contains("พร้อมเพย์") || candidate.contains("พร้อมแพย์") {
        record.to_bank_or_channel = Some("PromptPay".to_string());
        if let Some(caps) = PROVIDER_NOTE.captures(text) {
            let merchant = caps[1].trim();
            if merchant.chars().count() > 3 && !merchant.contains("ผู้รับเงินสามารถสแกน") {
                record.to_party = clean_name(merchant);
            }
        }
    } else if candidate.to_uppercase().contains("TRUE MONEY") {
        record.to_bank_or_channel = Some("TrueMoney".to_string());
        record.to_party = Some("TRUE MONEY CO.,LTD.".to_string());
    } else if candidate.contains(PLANET) {
        record.to_bank_or_channel = Some("SCB Planet".to_string());
        record.to_party = PLANET_NOTE
            .captures(text)
            .and_then(|c| clean_name(&c[1]))
            .or_else(|| Some(PLANET.to_string()));
    } else if contains_any(candidate, BILLER_WORDS) {
        record.to_bank_or_channel = Some("Biller".to_string());
    } else if !candidate.is_empty()
        && text
            .rfind(candidate)
            .is_some_and(|i| text[i + candidate.len()..].contains("SCB"))
    {
        record.to_bank_or_channel = Some("SCB".to_string());
    }

    if record.to_bank_or_channel.is_some() {
        return;
    }
    let Some(name) = record.to_party.as_deref() else {
        return;
    };

    // A transfer to a person only names the bank near the account number.
    let context: String = text
        .find(name)
        .map(|i| text[i + name.len()..].chars().take(CONTEXT_CHARS).collect())
        .unwrap_or_default();
    record.to_bank_or_channel = if context.contains("กสิกรไทย") || context.contains("Kasikorn") {
        Some("Kasikornbank")
    } else if context.contains("กรุงไทย") || context.contains("Krungthai") {
        Some("Krungthai")
    } else if context.contains("Bangkok Bank") {
        Some("Bangkok Bank")
    } else {
        None
    }
    .map(str::to_string);
}
