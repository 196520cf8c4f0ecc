//! Version id generation for saved settings.
//!
//! The generator is injected into the catalog so tests can use a
//! deterministic sequence. Ids never feed into computed quantities.

use chrono::Utc;

pub trait IdGenerator: Send {
    fn next_id(&mut self) -> String;
}

/// Fresh ids of the form `v<millis>-<8 hex chars>`.
///
/// The millisecond prefix keeps ids ordered by creation time; the random
/// suffix separates saves that land in the same millisecond.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&mut self) -> String {
        let bytes: [u8; 4] = rand::random();
        let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
        format!("v{:013}-{}", Utc::now().timestamp_millis(), hex)
    }
}

/// Deterministic ids `<prefix>1`, `<prefix>2`, ...
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            next: 1,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}
