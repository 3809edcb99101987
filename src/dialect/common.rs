//! Normalisation rules shared by every bank dialect.

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

/// Month abbreviations as they appear on slips, including the dotless and
/// OCR-confused spellings. Order matters for prefix lookup.
pub const MONTHS: &[(&str, u32)] = &[
    ("ม.ค.", 1), ("ก.พ.", 2), ("มี.ค.", 3), ("เม.ย.", 4),
    ("พ.ค.", 5), ("มิ.ย.", 6), ("ก.ค.", 7), ("ส.ค.", 8),
    ("ก.ย.", 9), ("ต.ค.", 10), ("พ.ย.", 11), ("ธ.ค.", 12),
    ("ม.ค", 1), ("ก.พ", 2), ("มี.ค", 3), ("เม.ย", 4),
    ("พ.ค", 5), ("มิ.ย", 6), ("ก.ค", 7), ("ส.ค", 8),
    ("ก.ย", 9), ("ต.ค", 10), ("พ.ย", 11), ("ธ.ค", 12),
    ("มค.", 1), ("กพ.", 2), ("มีค.", 3), ("เมย.", 4),
    ("พค.", 5), ("มิย.", 6), ("กค.", 7), ("สค.", 8),
    ("กย.", 9), ("ตค.", 10), ("พย.", 11), ("ธค.", 12),
    ("มค", 1), ("กพ", 2), ("มีค", 3), ("เมย", 4),
    ("พค", 5), ("มิย", 6), ("กค", 7), ("สค", 8),
    ("กย", 9), ("ตค", 10), ("พย", 11), ("ธค", 12),
    ("ก.ุพ.", 2), ("ก.ุพ", 2),
    ("Jan", 1), ("Feb", 2), ("Mar", 3), ("Apr", 4),
    ("May", 5), ("Jun", 6), ("Jul", 7), ("Aug", 8),
    ("Sep", 9), ("Oct", 10), ("Nov", 11), ("Dec", 12),
];

static AMOUNT_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.[0-9]{2}$").expect("Invalid amount regex"));

static LEADING_BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:©|๐|@)\s*").expect("Invalid bullet regex"));

static SHORT_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,2})/([0-9]{1,2})/([0-9]{2,4})$").expect("Invalid short date regex")
});

/// Resolve a 2- or 4-digit year to Gregorian.
///
/// Two-digit years above 50 are read as Buddhist era (`+2500`), others as
/// Gregorian (`+2000`). Anything above 2500 is Buddhist era and loses 543.
pub fn normalize_year(raw: &str) -> Option<i32> {
    let mut year: i32 = raw.trim().parse().ok()?;
    if year < 100 {
        year += if year > 50 { 2500 } else { 2000 };
    }
    if year > 2500 {
        year -= 543;
    }
    Some(year)
}

/// Exact lookup in [`MONTHS`].
pub fn month_number(key: &str) -> Option<u32> {
    MONTHS.iter().find(|(k, _)| *k == key).map(|(_, m)| *m)
}

/// Tolerant lookup for OCR-damaged abbreviations. Exact keys win first, with or
/// without a trailing dot, then English names on their full three letters in any
/// case. Only Thai keys fall back to a two-character prefix match with dots ignored,
/// since English abbreviations share prefixes (`Jun`/`Jul`, `Mar`/`May`).
pub fn month_number_fuzzy(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if let Some(month) = month_number(raw).or_else(|| month_number(&format!("{raw}."))) {
        return Some(month);
    }
    if raw.chars().all(|c| c.is_ascii_alphabetic() || c == '.') {
        let letters = raw.trim_end_matches('.');
        return (letters.chars().count() == 3)
            .then(|| english_month(letters))
            .flatten();
    }
    let input = raw.replace('.', "");
    MONTHS
        .iter()
        .filter(|(k, _)| !k.is_ascii())
        .find(|(k, _)| {
            let prefix: String = k.replace('.', "").chars().take(2).collect();
            !prefix.is_empty() && input.starts_with(&prefix)
        })
        .map(|(_, m)| *m)
}

/// Thai abbreviation with or without its trailing dot, then the tolerant prefix match.
pub fn thai_month(raw: &str) -> Option<u32> {
    let key = raw.trim();
    month_number(key)
        .or_else(|| month_number(&format!("{key}.")))
        .or_else(|| key.strip_suffix('.').and_then(month_number))
        .or_else(|| month_number_fuzzy(key))
}

/// English month by its first three letters, any case.
pub fn english_month(raw: &str) -> Option<u32> {
    let mut chars = raw.chars().take(3);
    let first = chars.next()?.to_uppercase();
    let key: String = first.chain(chars.flat_map(char::to_lowercase)).collect();
    month_number(&key)
}

pub fn make_date(year: i32, month: u32, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day.trim().parse().ok()?)
}

/// `dd/mm/yy` as printed on ATM receipts.
pub fn parse_short_date(raw: &str) -> Option<NaiveDate> {
    let caps = SHORT_DATE.captures(raw.trim())?;
    let year = normalize_year(&caps[3])?;
    let month: u32 = caps[2].parse().ok()?;
    make_date(year, month, &caps[1])
}

/// `HH:MM` or `HH:MM:SS`.
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}

/// Parse a money amount with exactly two fraction digits. Thousands separators,
/// curly quotes, dashes, the baht sign and whitespace are OCR noise and dropped.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, ',' | '“' | '”' | '-' | '฿') && !c.is_whitespace())
        .collect();
    if !AMOUNT_SHAPE.is_match(&cleaned) {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

/// Drop a leading bullet glyph that OCR reads in front of names.
pub fn clean_name(raw: &str) -> Option<String> {
    let name = LEADING_BULLET.replace(raw.trim(), "");
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// Tesseract emits SARA AM either precomposed or as NIKHAHIT + SARA AA.
/// Fold everything to the precomposed form so patterns only need one spelling.
pub fn fold_sara_am(text: &str) -> String {
    text.replace("\u{0E4D}\u{0E32}", "\u{0E33}")
}

pub fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// First `(keyword, value)` whose keyword occurs in `haystack`, ignoring case.
pub fn first_keyword<'a>(haystack: &str, table: &[(&str, &'a str)]) -> Option<&'a str> {
    let haystack = haystack.to_lowercase();
    table
        .iter()
        .find(|(keyword, _)| haystack.contains(&keyword.to_lowercase()))
        .map(|(_, value)| *value)
}

/// Non-empty trimmed lines.
pub fn trimmed_lines(text: &str) -> Vec<&str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty()).collect()
}
