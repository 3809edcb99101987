// Bank app screenshot dialects

mod bangkok;
mod kbank;
mod krungthai;
mod scb;

pub use bangkok::BangkokESlip;
pub use kbank::KBankESlip;
pub use krungthai::KrungthaiESlip;
pub use scb::ScbESlip;
