use crate::bank::BankIdentity;
use crate::dialect::Dialect;
use crate::dialect::common::{
    clean_name, contains_any, fold_sara_am, make_date, normalize_year, parse_amount, parse_time,
    thai_month, trimmed_lines,
};
use crate::record::{Channel, SlipRecord};
use regex::{Captures, Regex};
use std::sync::LazyLock;

static DATE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(\d{1,2})\s*([ก-๎]+\.[ก-๎]+\.?|[ก-๎]{2,4}\.?)\s*(\d{2,4})\s+(\d{2}:\d{2})\s*(?:น\.|u\.)",
    )
    .expect("Invalid KBank date regex")
});

static AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"จำนวน(?:เงิน)?:\s*([,\d]+\.\d{2})\s*บาท").expect("Invalid KBank amount regex")
});

static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"เลขที่รายการ:\s*([A-Z0-9]+)").expect("Invalid KBank reference regex")
});

static MASKED_ACCOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)XXX-X-X\d{3,6}-X").expect("Invalid KBank account regex")
});

static TIME_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{2}:\d{2}\s*(?:น\.|u\.)").expect("Invalid KBank time regex")
});

static DATE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,2}\s*[ก-๎]+\.").expect("Invalid KBank date line regex"));

/// A recipient line followed by the line that tells us where the money went.
static TRANSFER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)([^\n]+?)\n\s*(?:(XXX-X-X\d{3,6}-X)|(ธ\.[ก-๎ \t]+)|รหัสพร้อมเพย์|Prompt\s*Pay|Payee ID|([A-Z\s]{5,}[Ss]hop)|[A-Z\s]+Wallet|บจก\.|หจก\.)",
    )
    .expect("Invalid KBank transfer regex")
});

static PROMPT_PAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)รหัสพร้อมเพย์|prompt\s*pay|payee id").expect("Invalid KBank PromptPay regex")
});

/// One or two biller lines ahead of the reference line.
static BILLER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"([^\n]+)\s*(?:\n\s*([^\n]+))?\s*\n+(?:เลขที่รายการ|N\s+hin|Ref No\.|รหัสอ้างอิง|20\d{10,})",
    )
    .expect("Invalid KBank biller regex")
});

static LONG_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{10,}").expect("Invalid KBank number regex"));

const SENDER_BANK: &str = "ธ.กสิกรไทย";
const HEADER_WORDS: &[&str] = &[
    "โอนเงินสำเร็จ",
    "โอนเจินสำเร็จ",
    "จ่ายบิล",
    "ชำระเงิน",
    "K PLUS",
    "บาท",
];
const NAME_TITLES: &[&str] = &["น.ส.", "นาย", "นาง", "บจก.", "หจก."];
const NOT_A_RECIPIENT: &[&str] = &["เลขที่รายการ", "จำนวน", "ค่าธรรมเนียม", "บาท", "สแกนตรวจสอบสลิป"];
const SHOP_WORDS: &[&str] = &["Shop", "ร้าน", "บจก.", "หจก.", "Co., Ltd."];

/// Chars of the sender name used to find where the sender block ends.
const SENDER_TAIL_CHARS: usize = 10;
/// Where to start looking for the recipient when no landmark is found.
const FALLBACK_OFFSET_CHARS: usize = 50;

/// Kasikornbank K PLUS: Thai labels, `dd ม.ค. yy HH:MM น.` dates, sender
/// identified by the masked KBank account line under the name.
pub struct KBankESlip;

impl Dialect for KBankESlip {
    fn channel(&self) -> Channel {
        Channel::ESlip
    }

    fn bank(&self) -> BankIdentity {
        BankIdentity::KBank
    }

    fn extract(&self, text: &str) -> SlipRecord {
        let text = fold_sara_am(text);
        let mut record = SlipRecord::default();

        if let Some(caps) = DATE_TIME.captures(&text) {
            let date = normalize_year(&caps[3])
                .zip(thai_month(&caps[2]))
                .and_then(|(year, month)| make_date(year, month, &caps[1]));
            if date.is_some() {
                record.transaction_date = date;
                record.transaction_time = parse_time(&caps[4]);
            }
        }

        record.amount = AMOUNT.captures(&text).and_then(|c| parse_amount(&c[1]));
        record.reference_number = REFERENCE.captures(&text).map(|c| c[1].trim().to_string());
        record.from_party = sender(&trimmed_lines(&text));

        if let Some(from) = record.from_party.as_deref() {
            let rest = &text[sender_block_end(&text, from)..];
            if !recipient_from_transfer(rest, &mut record) {
                recipient_from_biller(rest, &mut record);
            }
        }

        record
    }
}

/// The name sits on the line above the KBank account line. A title on the
/// line before that belongs to the name when the name itself is short.
fn sender(lines: &[&str]) -> Option<String> {
    for (i, line) in lines.iter().enumerate().skip(1) {
        if !(line.contains(SENDER_BANK) || MASKED_ACCOUNT.is_match(line)) {
            continue;
        }
        let candidate = lines[i - 1];
        if contains_any(candidate, HEADER_WORDS)
            || DATE_LINE.is_match(candidate)
            || candidate.chars().count() <= 2
            || candidate.contains("รายการ:")
            || is_bank_or_account_line(candidate)
        {
            continue;
        }

        if i > 1 && contains_any(lines[i - 2], NAME_TITLES) && candidate.split_whitespace().count() <= 2 {
            return clean_name(&format!("{} {}", lines[i - 2], candidate));
        }
        return clean_name(candidate);
    }
    None
}

/// Byte offset just past the sender block.
fn sender_block_end(text: &str, from: &str) -> usize {
    let tail_start = from
        .char_indices()
        .rev()
        .nth(SENDER_TAIL_CHARS - 1)
        .map_or(0, |(i, _)| i);
    let tail = &from[tail_start..];
    if let Some(i) = text.rfind(tail) {
        return i + tail.len();
    }
    if let Some(m) = MASKED_ACCOUNT.find(text) {
        return m.end();
    }
    if let Some(m) = TIME_SUFFIX.find(text) {
        return m.end();
    }
    text.char_indices()
        .nth(FALLBACK_OFFSET_CHARS)
        .map_or(text.len(), |(i, _)| i)
}

fn is_bank_or_account_line(line: &str) -> bool {
    let line = line.trim();
    line.starts_with("ธ.") || MASKED_ACCOUNT.is_match(line)
}

fn recipient_from_transfer(rest: &str, record: &mut SlipRecord) -> bool {
    let Some(caps) = TRANSFER.captures_iter(rest).find(|c| {
        let name = c[1].trim();
        !contains_any(name, NOT_A_RECIPIENT)
            && name.chars().count() > 2
            && !is_bank_or_account_line(name)
    }) else {
        return false;
    };

    record.to_party = clean_name(&caps[1]);
    record.to_bank_or_channel = transfer_channel(&caps).map(|bank| {
        if bank.contains("กสิกรไทย") {
            "Kasikornbank".to_string()
        } else if bank.contains("ไทยพาณิชย์") {
            "SCB".to_string()
        } else {
            bank
        }
    });
    true
}

fn transfer_channel(caps: &Captures) -> Option<String> {
    if let Some(bank) = caps.get(3) {
        return Some(bank.as_str().trim().to_string());
    }
    if PROMPT_PAY.is_match(&caps[0]) {
        return Some("PromptPay".to_string());
    }
    if let Some(shop) = caps.get(4) {
        return Some(shop.as_str().trim().to_string());
    }
    caps[0].contains("Wallet").then(|| "Wallet".to_string())
}

fn recipient_from_biller(rest: &str, record: &mut SlipRecord) {
    let Some(caps) = BILLER.captures(rest) else {
        return;
    };
    let first = caps[1].trim();
    let second = caps.get(2).map_or("", |m| m.as_str().trim());

    let rejected = |line: &str| contains_any(line, NOT_A_RECIPIENT) || line.contains("XXX-X-X");
    if rejected(first) || first.chars().count() <= 2 || is_bank_or_account_line(first) {
        return;
    }

    let mut name = first.to_string();
    if !second.is_empty()
        && !rejected(second)
        && !LONG_NUMBER.is_match(second)
        && !second.contains("Pay")
        && !second.contains("ธ.")
    {
        name.push(' ');
        name.push_str(second);
    }

    record.to_party = clean_name(&name);
    if let Some(name) = record.to_party.as_deref() {
        record.to_bank_or_channel = if name.contains("Shopee") {
            Some("ShopeePay")
        } else if name.contains("TrueMoney") {
            Some("TrueMoney Wallet")
        } else if name.contains("LINE MAN") {
            Some("LINE MAN")
        } else if contains_any(name, SHOP_WORDS) {
            Some("Biller")
        } else {
            None
        }
        .map(str::to_string);
    }
}
