//! Order ids

use std::fmt;

use jiff::Timestamp;
use rand::Rng;
use serde::{Deserialize, Serialize};

const PREFIX: &str = "ORD";
const SUFFIX_LEN: usize = 9;

/// Locally generated order id, `ORD-<unix millis>-<9 base36 chars>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Generate an id for an order created at `now`.
    pub fn generate(now: Timestamp, rng: &mut impl Rng) -> Self {
        let suffix: String = (0..SUFFIX_LEN)
            .filter_map(|_| char::from_digit(rng.gen_range(0..36), 36))
            .map(|c| c.to_ascii_uppercase())
            .collect();

        Self(format!("{PREFIX}-{}-{suffix}", now.as_millisecond()))
    }

    /// Generate an id for an order created now, using the thread RNG.
    pub fn new_random() -> Self {
        Self::generate(Timestamp::now(), &mut rand::thread_rng())
    }

    /// The id as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for OrderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for OrderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
