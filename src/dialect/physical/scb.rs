use crate::bank::BankIdentity;
use crate::dialect::Dialect;
use crate::dialect::common::trimmed_lines;
use crate::record::{Channel, SlipRecord};

/// SCB receipts have no field grammar yet; the recognised lines are passed
/// through for display.
pub struct ScbPhysical;

impl Dialect for ScbPhysical {
    fn channel(&self) -> Channel {
        Channel::Physical
    }

    fn bank(&self) -> BankIdentity {
        BankIdentity::Scb
    }

    fn extract(&self, text: &str) -> SlipRecord {
        SlipRecord {
            raw_lines: trimmed_lines(text).into_iter().map(str::to_string).collect(),
            ..SlipRecord::default()
        }
    }
}
