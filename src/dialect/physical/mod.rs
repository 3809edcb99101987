// Printed ATM and counter receipt dialects

mod bkk;
mod kplus;
mod krungthai;
mod scb;

pub use bkk::BangkokPhysical;
pub use kplus::KPlusPhysical;
pub use krungthai::KrungthaiPhysical;
pub use scb::ScbPhysical;

/// Thermal print often turns zeros into `O`, `o` or `°`.
fn zeros_from_ocr(raw: &str) -> String {
    raw.chars()
        .map(|c| match c {
            'O' | 'o' | '°' => '0',
            other => other,
        })
        .collect()
}
