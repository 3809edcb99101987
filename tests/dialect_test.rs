mod common;

use chrono::{NaiveDate, NaiveTime};
use common::*;
use rust_decimal::Decimal;
use slip_reader::dialect::DialectRegistry;
use slip_reader::{BankIdentity, Channel, SlipRecord};

fn extract(channel: Channel, bank: BankIdentity, text: &str) -> SlipRecord {
    let registry = DialectRegistry::with_builtin();
    let dialect = registry
        .get(channel, bank)
        .unwrap_or_else(|| panic!("no dialect for {channel} {bank}"));
    dialect.extract(text)
}

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

fn time(h: u32, m: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(h, m, 0)
}

fn some(s: &str) -> Option<String> {
    Some(s.to_string())
}

#[test]
fn test_registry_covers_every_bank_and_channel() {
    let registry = DialectRegistry::with_builtin();
    assert_eq!(registry.len(), 8);
    for bank in BankIdentity::KNOWN {
        assert!(registry.get(Channel::ESlip, bank).is_some(), "e-slip {bank}");
        assert!(registry.get(Channel::Physical, bank).is_some(), "physical {bank}");
    }
    assert!(registry.get(Channel::ESlip, BankIdentity::Unknown).is_none());
}

#[test]
fn test_kbank_eslip() {
    let record = extract(Channel::ESlip, BankIdentity::KBank, KBANK_ESLIP);
    println!("{record:#?}");

    assert_eq!(record.transaction_date, date(2025, 2, 15));
    assert_eq!(record.transaction_time, time(10, 30));
    assert_eq!(record.amount, Some(Decimal::new(150000, 2)));
    assert_eq!(record.from_party, some("น.ส. สมหญิง ใจดี"));
    assert_eq!(record.to_party, some("นาย สมชาย รักไทย"));
    assert_eq!(record.to_bank_or_channel, some("SCB"));
    assert_eq!(record.reference_number, some("015046103055ATF05123"));
}

#[test]
fn test_kbank_eslip_decomposed_sara_am() {
    let decomposed = KBANK_ESLIP.replace('\u{0E33}', "\u{0E4D}\u{0E32}");
    let record = extract(Channel::ESlip, BankIdentity::KBank, &decomposed);
    assert_eq!(record.amount, Some(Decimal::new(150000, 2)));
    assert_eq!(record.reference_number, some("015046103055ATF05123"));
}

#[test]
fn test_bangkok_eslip() {
    let record = extract(Channel::ESlip, BankIdentity::Bangkok, BANGKOK_ESLIP);
    println!("{record:#?}");

    assert_eq!(record.transaction_date, date(2025, 2, 15));
    assert_eq!(record.transaction_time, time(14, 5));
    assert_eq!(record.amount, Some(Decimal::new(250000, 2)));
    assert_eq!(record.from_party, some("MR SOMCHAI RAKTHAI"));
    assert_eq!(record.to_party, some("MS SOMYING JAIDEE"));
    assert_eq!(record.to_bank_or_channel, some("Kasikornbank"));
    assert_eq!(record.reference_number, some("2025021512345678"));
}

#[test]
fn test_scb_eslip() {
    let record = extract(Channel::ESlip, BankIdentity::Scb, SCB_ESLIP);
    println!("{record:#?}");

    assert_eq!(record.transaction_date, date(2025, 2, 15));
    assert_eq!(record.transaction_time, time(9, 15));
    assert_eq!(record.amount, Some(Decimal::new(125050, 2)));
    assert_eq!(record.from_party, some("นาย สมชาย รักไทย"));
    assert_eq!(record.to_party, some("น.ส. สมหญิง ใจดี"));
    assert_eq!(record.to_bank_or_channel, some("Kasikornbank"));
    assert_eq!(record.reference_number, some("202502151234ABC"));
}

#[test]
fn test_scb_eslip_true_money() {
    let text = "จาก © นาย สมชาย รักไทย\nไปยัง © True Money Wallet\nจำนวนเงิน 100.00\n";
    let record = extract(Channel::ESlip, BankIdentity::Scb, text);
    assert_eq!(record.to_bank_or_channel, some("TrueMoney"));
    assert_eq!(record.to_party, some("TRUE MONEY CO.,LTD."));
    assert_eq!(record.amount, Some(Decimal::new(10000, 2)));
}

#[test]
fn test_krungthai_eslip() {
    let record = extract(Channel::ESlip, BankIdentity::Krungthai, KRUNGTHAI_ESLIP);
    println!("{record:#?}");

    assert_eq!(record.transaction_date, date(2025, 2, 15));
    assert_eq!(record.transaction_time, time(11, 45));
    assert_eq!(record.amount, Some(Decimal::new(300000, 2)));
    assert_eq!(record.from_party, some("นาย สมชาย รักไทย"));
    assert_eq!(record.to_party, some("น.ส. สมหญิง ใจดี"));
    assert_eq!(record.to_bank_or_channel, some("Kasikornbank"));
    assert_eq!(record.reference_number, some("202502151145KTB01"));
}

#[test]
fn test_bkk_physical() {
    let record = extract(Channel::Physical, BankIdentity::Bangkok, BKK_PHYSICAL);
    assert_eq!(record.transaction_date, date(2025, 2, 15));
    assert_eq!(record.transaction_time, time(16, 40));
    assert_eq!(record.transaction_type, some("WITHDRAWAL"));
    assert_eq!(record.amount, Some(Decimal::new(200000, 2)));
    assert_eq!(record.balance, Some(Decimal::new(850025, 2)));
}

#[test]
fn test_kplus_physical() {
    let record = extract(Channel::Physical, BankIdentity::KBank, KPLUS_PHYSICAL);
    assert_eq!(record.transaction_date, date(2025, 2, 15));
    assert_eq!(record.transaction_time, time(8, 5));
    assert_eq!(record.transaction_type, some("WITHDRAWAL"));
    assert_eq!(record.account_number, some("XXX-X-X1234-X"));
    assert_eq!(record.amount, Some(Decimal::new(100000, 2)));
    assert_eq!(record.fee_amount, Some(Decimal::new(0, 2)));
    assert_eq!(record.balance, Some(Decimal::new(1234567, 2)));
}

#[test]
fn test_kplus_physical_ocr_zeros() {
    let text = "DATE 15/O2/68 TIME O8:O5\nAMOUNT 1,OOO.OO\n";
    let record = extract(Channel::Physical, BankIdentity::KBank, text);
    assert_eq!(record.transaction_date, date(2025, 2, 15));
    assert_eq!(record.transaction_time, time(8, 5));
    assert_eq!(record.amount, Some(Decimal::new(100000, 2)));
}

#[test]
fn test_krungthai_physical() {
    let record = extract(Channel::Physical, BankIdentity::Krungthai, KRUNGTHAI_PHYSICAL);
    assert_eq!(record.transaction_date, date(2025, 2, 15));
    assert_eq!(record.transaction_time, time(13, 20));
    assert_eq!(record.transaction_type, some("AUTO DEP"));
    assert_eq!(record.amount, Some(Decimal::new(500000, 2)));
    assert_eq!(record.to_party, some("นาย สมชาย รักไทย"));
}

#[test]
fn test_scb_physical_returns_lines() {
    let record = extract(Channel::Physical, BankIdentity::Scb, SCB_PHYSICAL);
    assert_eq!(record.raw_lines, vec!["SCB", "รายการฝากเงิน", "15/02/2025 12:00"]);
    assert_eq!(record.amount, None);
    assert!(!record.is_empty());
}

#[test]
fn test_empty_text_gives_empty_record() {
    let registry = DialectRegistry::with_builtin();
    for channel in [Channel::ESlip, Channel::Physical] {
        for bank in BankIdentity::KNOWN {
            let record = registry
                .get(channel, bank)
                .map(|d| d.extract(""))
                .unwrap_or_default();
            assert!(record.is_empty(), "{channel} {bank} extracted from empty text");
        }
    }
}

#[test]
fn test_scb_eslip_english_and_thai_months() {
    let text = "โอนเงินสำเร็จ\n15 Jul 2025 - 10:00\nจำนวนเงิน\n99.00\n";
    let record = extract(Channel::ESlip, BankIdentity::Scb, text);
    assert_eq!(record.transaction_date, date(2025, 7, 15));
    assert_eq!(record.transaction_time, time(10, 0));

    let text = "โอนเงินสำเร็จ\n1 ก.ย. 2568 - 07:45\nจำนวนเงิน 10.00\n";
    let record = extract(Channel::ESlip, BankIdentity::Scb, text);
    assert_eq!(record.transaction_date, date(2025, 9, 1));
}

#[test]
fn test_partial_record_keeps_what_parsed() {
    let text = "โอนเงินสำเร็จ\n15 Jul 2025 - 10:00\nจำนวนเงิน\n99.00\n";
    let record = extract(Channel::ESlip, BankIdentity::Scb, text);
    assert_eq!(record.amount, Some(Decimal::new(9900, 2)));
    assert_eq!(record.from_party, None);
    assert_eq!(record.to_party, None);
    assert_eq!(record.to_bank_or_channel, None);
    assert_eq!(record.reference_number, None);
    assert!(!record.is_empty());
}

#[test]
fn test_scb_eslip_prompt_pay_merchant() {
    let text = "ชำระเงินสำเร็จ
9 May 2025 - 12:10
รหัสอ้างอิง: 2025050912ABC
จาก © นาย สมชาย รักไทย
XXX-XXX123-4
ไปยัง © พร้อมเพย์ ร้านกาแฟ
รหัสร้านค้า 001
ข้อมูลเพิ่มเติมจากผู้ให้บริการ
ร้านกาแฟดอย (สาขา 1)
จำนวนเงิน
45.00
";
    let record = extract(Channel::ESlip, BankIdentity::Scb, text);
    println!("{record:#?}");

    assert_eq!(record.transaction_date, date(2025, 5, 9));
    assert_eq!(record.transaction_time, time(12, 10));
    assert_eq!(record.amount, Some(Decimal::new(4500, 2)));
    assert_eq!(record.from_party, some("นาย สมชาย รักไทย"));
    assert_eq!(record.to_bank_or_channel, some("PromptPay"));
    assert_eq!(record.to_party, some("ร้านกาแฟดอย"));
    assert_eq!(record.reference_number, some("2025050912ABC"));
}

#[test]
fn test_krungthai_eslip_g_wallet() {
    let text = "โอนเงินสำเร็จ
20 Jul. 2025 - 10:00
นาย สมชาย รักไทย
กรุงไทย
XXX-X-XX123-4
ไปยัง
นาง มาลี ศรีสุข
G-Wallet
(G-WALLET) 0812345678
จำนวนเงิน
150.00 บาท
รหัสอ้างอิง
202507201000KTB02
";
    let record = extract(Channel::ESlip, BankIdentity::Krungthai, text);
    println!("{record:#?}");

    assert_eq!(record.transaction_date, date(2025, 7, 20));
    assert_eq!(record.transaction_time, time(10, 0));
    assert_eq!(record.amount, Some(Decimal::new(15000, 2)));
    assert_eq!(record.from_party, some("นาย สมชาย รักไทย"));
    assert_eq!(record.to_party, some("นาง มาลี ศรีสุข"));
    assert_eq!(record.to_bank_or_channel, some("G-Wallet"));
    assert_eq!(record.reference_number, some("202507201000KTB02"));
}

#[test]
fn test_krungthai_eslip_bank_line_and_thai_month() {
    let text = "โอนเงินสำเร็จ
3 ก.ย. 2568 - 08:00
นาย สมชาย รักไทย
กรุงไทย
XXX-X-XX123-4
ไปยัง
น.ส. สมหญิง ใจดี
ธนาคารออมสิน
XXX-X-XX567-8
จำนวนเงิน
500.00 บาท
";
    let record = extract(Channel::ESlip, BankIdentity::Krungthai, text);
    assert_eq!(record.transaction_date, date(2025, 9, 3));
    assert_eq!(record.to_party, some("น.ส. สมหญิง ใจดี"));
    assert_eq!(record.to_bank_or_channel, some("GSB"));
    assert_eq!(record.amount, Some(Decimal::new(50000, 2)));
    assert_eq!(record.reference_number, None);
}

#[test]
fn test_bangkok_eslip_line_man() {
    let text = "Payment successful
15 Mar 25, 12:30
From
© MR SOMCHAI RAKTHAI
Bangkok Bank
123-4-56789-0
To
น LINE MAN Wongnai (QR by ttb)
Biller ID 0105561234567
Amount 250.00 THB
Bank reference no. 987654321
";
    let record = extract(Channel::ESlip, BankIdentity::Bangkok, text);
    println!("{record:#?}");

    assert_eq!(record.transaction_date, date(2025, 3, 15));
    assert_eq!(record.amount, Some(Decimal::new(25000, 2)));
    assert_eq!(record.from_party, some("MR SOMCHAI RAKTHAI"));
    assert_eq!(record.to_party, some("LINE MAN Wongnai"));
    assert_eq!(record.to_bank_or_channel, some("ttb"));
    assert_eq!(record.reference_number, some("987654321"));
}

#[test]
fn test_bangkok_eslip_ttb_recipient() {
    let text = "Transfer successful
2 May 25, 08:15
From
© MR SOMCHAI RAKTHAI
Bangkok Bank
123-4-56789-0
To
@ MR DANAI MEESUK
ttb
111-2-33333-4
Amount 1,000.00 THB
Transaction reference 2025050212345678
";
    let record = extract(Channel::ESlip, BankIdentity::Bangkok, text);
    assert_eq!(record.transaction_date, date(2025, 5, 2));
    assert_eq!(record.to_party, some("MR DANAI MEESUK"));
    assert_eq!(record.to_bank_or_channel, some("ttb"));
    assert_eq!(record.reference_number, some("2025050212345678"));
}

#[test]
fn test_kbank_eslip_bill_payment() {
    let text = "จ่ายบิลสำเร็จ
15 ก.พ. 68 18:20 น.
นาย สมชาย รักไทย
ธ.กสิกรไทย
xxx-x-x1234-x
Shopee Thailand
Co., Ltd.
เลขที่รายการ:
016046182011BPM01234
จำนวน:
299.00 บาท
";
    let record = extract(Channel::ESlip, BankIdentity::KBank, text);
    println!("{record:#?}");

    assert_eq!(record.transaction_date, date(2025, 2, 15));
    assert_eq!(record.transaction_time, time(18, 20));
    assert_eq!(record.amount, Some(Decimal::new(29900, 2)));
    assert_eq!(record.from_party, some("นาย สมชาย รักไทย"));
    assert_eq!(record.to_party, some("Shopee Thailand Co., Ltd."));
    assert_eq!(record.to_bank_or_channel, some("ShopeePay"));
    assert_eq!(record.reference_number, some("016046182011BPM01234"));
}
