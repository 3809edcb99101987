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
    Regex::new(
        r"(\d{1,2})\s+([ก-๎A-Za-z]+\.(?:[ก-๎A-Za-z]{1,2}\.?)?)\s+(\d{4})\s+-\s+(\d{2}:\d{2})",
    )
    .expect("Invalid Krungthai date regex")
});

static AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"จำนวนเงิน\s*([,\d]+\.\d{2})\s*บาท").expect("Invalid Krungthai amount regex")
});

/// OCR sometimes reads an extra `ฮ` or `า` into the label.
static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"รหัสอ(?:ฮ|า)?้างอิง\s*([A-Za-z0-9\s]+)").expect("Invalid Krungthai reference regex")
});

static FROM_TITLED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^(?:©|๐|iG)?\s*(น\.ส\.|นาย|นาง|นส\.)\s*(.*?)\n\s*กรุงไทย")
        .expect("Invalid Krungthai sender regex")
});

static FROM_ANY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^(?:©|๐|iG)?\s*([^\n]+?)\n\s*กรุงไทย").expect("Invalid Krungthai sender regex")
});

/// Recipient after the `ไปยัง` marker (or what OCR makes of it), ended by a
/// bank line, an ID, or the amount/reference labels.
static TO_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?si)(?:ไปยัง|โปยัง|le\)|Vv|๑|๒)\s*\n?\s*(.*?)(?:\n\s*([ก-๎A-Za-z \t\.]*(?:Bank|ไทย|เพย์|Pay|Wallet|shop|G-Wallet|ออมสิน))|\n\s*\(?\d{5,}\)?|\n\s*จำนวนเงิน|\n\s*รหัสอ้างอิง\s*1|\n\s*หมายเลขอ้างอิง\s*1)",
    )
    .expect("Invalid Krungthai recipient regex")
});

static G_WALLET_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([^\n(]+)\s*\(G-WALLET\)").expect("Invalid Krungthai G-Wallet regex")
});

static G_WALLET_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\(G-WALLET\)").expect("Invalid Krungthai G-Wallet regex"));

const NOT_A_RECIPIENT: &[&str] = &["จำนวนเงิน", "ค่าธรรมเนียม", "วันที่ทำ", "รหัสอ้างอิง", "XXX-X-XX", "G-Wallet"];
const NOT_A_SENDER: &[&str] = &["Krungthai", "รหัสอ้างอิง", "G-Wallet"];

/// Wallets and shops recognised in the recipient name, upper-cased.
const NAMED_CHANNELS: &[(&str, &str)] = &[
    ("SHOPEEPAY", "ShopeePay"),
    ("MPAY", "MPAY"),
    ("K+ SHOP", "K+ shop"),
];
const MONEY_BAG_SHOP: &str = "ร้านถุงเงิน";

/// Krungthai NEXT: Thai labels, `dd เม.ย. yyyy - HH:MM` dates, sender above
/// the `กรุงไทย` line, recipient block after `ไปยัง`.
pub struct KrungthaiESlip;

impl Dialect for KrungthaiESlip {
    fn channel(&self) -> Channel {
        Channel::ESlip
    }

    fn bank(&self) -> BankIdentity {
        BankIdentity::Krungthai
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
        record.reference_number = REFERENCE.captures(&text).and_then(|c| {
            c[1].trim()
                .lines()
                .next()
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
        });

        if let Some(caps) = FROM_TITLED.captures(&text).or_else(|| FROM_ANY.captures(&text)) {
            let name = caps
                .iter()
                .skip(1)
                .flatten()
                .map(|m| m.as_str().trim())
                .filter(|p| !p.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            if !contains_any(&name, NOT_A_SENDER) && name.chars().count() > 3 {
                record.from_party = clean_name(&name);
            }
        }

        if let Some(caps) = TO_BLOCK.captures(&text) {
            let block = caps[1].trim();
            let first_line = block.lines().next().unwrap_or_default().trim();
            if !contains_any(first_line, NOT_A_RECIPIENT)
                && !G_WALLET_PREFIX.is_match(first_line)
                && first_line.chars().count() > 2
            {
                record.to_party = clean_name(first_line);
            }

            if let Some(bank_line) = caps.get(2) {
                record.to_bank_or_channel = Some(bank_from_line(bank_line.as_str().trim()));
            }

            if record.to_bank_or_channel.is_none() {
                infer_channel_from_name(block, &mut record);
            }
        }

        record
    }
}

fn bank_from_line(line: &str) -> String {
    let upper = line.to_uppercase();
    if line.contains("กสิกรไทย") {
        "Kasikornbank".to_string()
    } else if line.contains("พร้อมเพย์") || line.contains("PromptPay") {
        "PromptPay".to_string()
    } else if line.contains("ออมสิน") {
        "GSB".to_string()
    } else if upper.contains("G-WALLET") {
        "G-Wallet".to_string()
    } else if let Some((_, channel)) = NAMED_CHANNELS.iter().find(|(k, _)| upper.contains(k)) {
        channel.to_string()
    } else if line.contains(MONEY_BAG_SHOP) {
        MONEY_BAG_SHOP.to_string()
    } else {
        line.to_string()
    }
}

fn infer_channel_from_name(block: &str, record: &mut SlipRecord) {
    let Some(name) = record.to_party.clone() else {
        return;
    };
    let upper = name.to_uppercase();

    if let Some((_, channel)) = NAMED_CHANNELS.iter().find(|(k, _)| upper.contains(k)) {
        record.to_bank_or_channel = Some(channel.to_string());
    } else if name.contains(MONEY_BAG_SHOP) {
        record.to_bank_or_channel = Some(MONEY_BAG_SHOP.to_string());
    } else if block.to_uppercase().contains("G-WALLET") {
        record.to_bank_or_channel = Some("G-Wallet".to_string());
        if name.contains("G-Wallet") {
            if let Some(caps) = G_WALLET_NAME.captures(block) {
                record.to_party = clean_name(&caps[1]);
            }
        }
    }
}
