#![allow(dead_code)]

use anyhow::Result;
use image::GrayImage;
use opencv::{
    core::{CV_8UC1, CV_8UC3, Mat, Point, Rect, Scalar},
    imgcodecs,
    imgproc::{self, FILLED, LINE_8},
    prelude::*,
};
use slip_reader::ocr::{Detection, PageLayout, RecognizedText, SlipDetector, TextRecognizer, TokenBox};
use std::path::Path;

pub const KBANK_ESLIP: &str = "โอนเงินสำเร็จ
15 ก.พ. 68 10:30 น.
น.ส. สมหญิง ใจดี
ธ.กสิกรไทย
xxx-x-x1234-x
นาย สมชาย รักไทย
ธ.ไทยพาณิชย์
xxx-x-x5678-x
เลขที่รายการ:
015046103055ATF05123
จำนวน:
1,500.00 บาท
";

pub const BANGKOK_ESLIP: &str = "Transfer successful
15 Feb 25, 14:05
From
© MR SOMCHAI RAKTHAI
Bangkok Bank
123-4-56789-0
To
@ MS SOMYING JAIDEE
Kasikornbank
987-6-54321-0
Amount 2,500.00 THB
Fee 0.00 THB
Transaction reference 2025021512345678
";

pub const SCB_ESLIP: &str = "โอนเงินสำเร็จ
15 ก.พ. 2568 - 09:15
รหัสอ้างอิง: 202502151234ABC
จาก © นาย สมชาย รักไทย
XXX-XXX123-4
ไปยัง © น.ส. สมหญิง ใจดี
XXX-XXX567-8 กสิกรไทย
จำนวนเงิน
1,250.50
";

pub const KRUNGTHAI_ESLIP: &str = "โอนเงินสำเร็จ
15 ก.พ. 2568 - 11:45
นาย สมชาย รักไทย
กรุงไทย
XXX-X-XX123-4
ไปยัง
น.ส. สมหญิง ใจดี
ธ.กสิกรไทย
XXX-X-XX567-8
จำนวนเงิน
3,000.00 บาท
รหัสอ้างอิง
202502151145KTB01
";

pub const BKK_PHYSICAL: &str = "BANGKOK BANK
15/02/25 16:40
WITHDRAWAL
AMOUNT 2,000.00
AVAIL BAL 8,500.25
";

pub const KPLUS_PHYSICAL: &str = "K PLUS
DATE 15/02/68 TIME 08:05
WITHDRAWAL
FROM ACCOUNT XXX-X-X1234-X
AMOUNT 1,000.00
FEE AMOUNT 0.00
A/C BALANCE 12,345.67
";

pub const KRUNGTHAI_PHYSICAL: &str = "KRUNGTHAI BANK
DATE 15/02/25 TIME 13:20
AUTO DEP
To A/C Name : นาย สมชาย รักไทย
จำนวนเงิน 5,000.00 BAHT
";

pub const SCB_PHYSICAL: &str = "SCB
  รายการฝากเงิน

15/02/2025 12:00
";

/// Recognizer that always returns the same text.
pub struct FixedText {
    pub text: String,
    pub tokens: Vec<TokenBox>,
}

impl FixedText {
    pub fn boxed(text: &str) -> Box<dyn TextRecognizer> {
        Box::new(Self {
            text: text.to_string(),
            tokens: vec![TokenBox {
                text: "token".to_string(),
                conf: 90.0,
                x: 10,
                y: 10,
                w: 40,
                h: 12,
            }],
        })
    }
}

impl TextRecognizer for FixedText {
    fn recognize(&mut self, _img: &GrayImage, _layout: PageLayout) -> Result<RecognizedText> {
        Ok(RecognizedText {
            text: self.text.clone(),
            tokens: self.tokens.clone(),
        })
    }
}

/// Detector that always returns the same detections.
pub struct FixedDetections(pub Vec<Detection>);

impl FixedDetections {
    pub fn boxed(label: &str, confidence: f32, bbox: Rect) -> Box<dyn SlipDetector> {
        Box::new(Self(vec![Detection {
            label: label.to_string(),
            confidence,
            bbox,
        }]))
    }

    pub fn none() -> Box<dyn SlipDetector> {
        Box::new(Self(Vec::new()))
    }
}

impl SlipDetector for FixedDetections {
    fn detect(&mut self, _img: &Mat) -> Result<Vec<Detection>> {
        Ok(self.0.clone())
    }
}

pub fn blank(rows: i32, cols: i32, value: f64) -> Result<Mat> {
    Ok(Mat::new_rows_cols_with_default(rows, cols, CV_8UC1, Scalar::all(value))?)
}

pub fn blank_color(rows: i32, cols: i32, value: f64) -> Result<Mat> {
    Ok(Mat::new_rows_cols_with_default(rows, cols, CV_8UC3, Scalar::all(value))?)
}

pub fn fill_rect(img: &mut Mat, rect: Rect, value: f64) -> Result<()> {
    imgproc::rectangle(img, rect, Scalar::all(value), FILLED, LINE_8, 0)?;
    Ok(())
}

/// A 240x120 black-on-white logo drawn at `origin`.
pub fn draw_logo(img: &mut Mat, origin: Point) -> Result<()> {
    let black = Scalar::all(0.0);
    imgproc::rectangle(
        img,
        Rect::new(origin.x + 20, origin.y + 20, 80, 80),
        black,
        FILLED,
        LINE_8,
        0,
    )?;
    imgproc::circle(img, Point::new(origin.x + 170, origin.y + 60), 35, black, FILLED, LINE_8, 0)?;
    imgproc::line(
        img,
        Point::new(origin.x + 110, origin.y + 105),
        Point::new(origin.x + 225, origin.y + 15),
        black,
        4,
        LINE_8,
        0,
    )?;
    Ok(())
}

pub fn logo() -> Result<Mat> {
    let mut logo = blank(120, 240, 255.0)?;
    draw_logo(&mut logo, Point::new(0, 0))?;
    Ok(logo)
}

const TEXTURE_COLS: i32 = 24;
const TEXTURE_ROWS: i32 = 12;
const TEXTURE_BLOCK: i32 = 10;

/// A seeded black/white block pattern, 240x120, or 120x240 when turned a
/// quarter clockwise. Rich in corners for keypoint matching.
pub fn draw_texture(img: &mut Mat, origin: Point, seed: u32, quarter_turn: bool) -> Result<()> {
    let mut state = seed;
    for row in 0..TEXTURE_ROWS {
        for col in 0..TEXTURE_COLS {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            if (state >> 16) & 1 == 0 {
                continue;
            }
            let (x, y) = if quarter_turn {
                (TEXTURE_ROWS - 1 - row, col)
            } else {
                (col, row)
            };
            let block = Rect::new(
                origin.x + x * TEXTURE_BLOCK,
                origin.y + y * TEXTURE_BLOCK,
                TEXTURE_BLOCK,
                TEXTURE_BLOCK,
            );
            fill_rect(img, block, 0.0)?;
        }
    }
    Ok(())
}

/// The texture on a white 260x140 card.
pub fn texture_logo(seed: u32) -> Result<Mat> {
    let mut logo = blank(140, 260, 255.0)?;
    draw_texture(&mut logo, Point::new(10, 10), seed, false)?;
    Ok(logo)
}

/// A white 1000x1500 e-slip page with the logo near the top.
pub fn page_with_logo() -> Result<Mat> {
    let mut page = blank(1500, 1000, 255.0)?;
    draw_logo(&mut page, Point::new(380, 100))?;
    fill_rect(&mut page, Rect::new(100, 600, 800, 20), 0.0)?;
    Ok(page)
}

pub fn write_image(path: &Path, img: &Mat) -> Result<()> {
    let path_str = path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("non UTF-8 path"))?;
    if !imgcodecs::imwrite(path_str, img, &opencv::core::Vector::new())? {
        anyhow::bail!("Failed to write {}", path.display());
    }
    Ok(())
}
