// Per-bank, per-channel text dialects

use crate::bank::BankIdentity;
use crate::record::{Channel, SlipRecord};
use std::collections::HashMap;

pub mod common;
pub mod eslip;
pub mod physical;

/// Turns the recognised text of one bank's slip layout into a record.
///
/// Implementations never fail: fields that are not found stay unset, and a
/// fully unset record means nothing matched.
pub trait Dialect: Send + Sync {
    fn channel(&self) -> Channel;
    fn bank(&self) -> BankIdentity;
    fn extract(&self, text: &str) -> SlipRecord;
}

/// Dialects keyed by channel and bank. Supporting a new bank means
/// registering another implementation.
#[derive(Default)]
pub struct DialectRegistry {
    dialects: HashMap<(Channel, BankIdentity), Box<dyn Dialect>>,
}

impl DialectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every dialect shipped with the crate.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(eslip::BangkokESlip));
        registry.register(Box::new(eslip::KBankESlip));
        registry.register(Box::new(eslip::ScbESlip));
        registry.register(Box::new(eslip::KrungthaiESlip));
        registry.register(Box::new(physical::BangkokPhysical));
        registry.register(Box::new(physical::KPlusPhysical));
        registry.register(Box::new(physical::KrungthaiPhysical));
        registry.register(Box::new(physical::ScbPhysical));
        registry
    }

    /// Add or replace the dialect for its (channel, bank) pair.
    pub fn register(&mut self, dialect: Box<dyn Dialect>) {
        self.dialects
            .insert((dialect.channel(), dialect.bank()), dialect);
    }

    pub fn get(&self, channel: Channel, bank: BankIdentity) -> Option<&dyn Dialect> {
        self.dialects.get(&(channel, bank)).map(|d| d.as_ref())
    }

    pub fn len(&self) -> usize {
        self.dialects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dialects.is_empty()
    }
}
