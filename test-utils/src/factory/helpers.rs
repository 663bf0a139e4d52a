//! Unique values for factory defaults.

use std::sync::atomic::{AtomicU64, Ordering};

/// Generated ids are 18 digits long, like recent Discord snowflakes.
const SNOWFLAKE_BASE: u64 = 100_000_000_000_000_000;

static SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Next value of a process-wide sequence, starting at 1.
pub fn next_sequence() -> u64 {
    SEQUENCE.fetch_add(1, Ordering::Relaxed)
}

/// A unique Discord-style id in `block`, as the string the tables store.
///
/// Blocks keep channel, message and user ids of one test visually apart.
pub fn snowflake(block: u64, sequence: u64) -> String {
    (SNOWFLAKE_BASE * block + sequence).to_string()
}
