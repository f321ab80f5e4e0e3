//! # Transaction Ledger
//!
//! Append-only, timestamped record of everything that moved money or stock.
//!
//! ## Entry Format
//! ```text
//! 2024-03-01 14:02:11 Cash inserted: $2.00
//! 2024-03-01 14:02:15 Purchased Coke (A1) for $1.75
//! 2024-03-01 14:02:20 Change returned: $0.25
//! └──── timestamp ──┘ └──────── description ───────┘
//! ```
//!
//! Timestamps are UTC with second precision, so entries sort lexically.

use chrono::{DateTime, NaiveDateTime, Utc};
use std::fmt;
use std::str::FromStr;

use crate::error::EntryParseError;
use crate::money::Money;
use crate::TIMESTAMP_FORMAT;

/// Width of a formatted timestamp ("YYYY-MM-DD HH:MM:SS").
const TIMESTAMP_WIDTH: usize = 19;

// =============================================================================
// Descriptions
// =============================================================================

pub(crate) fn cash_inserted(amount: Money) -> String {
    format!("Cash inserted: {}", amount)
}

pub(crate) fn card_payment(amount: Money) -> String {
    format!("Card payment: {}", amount)
}

pub(crate) fn purchased(name: &str, code: &str, price: Money) -> String {
    format!("Purchased {} ({}) for {}", name, code, price)
}

pub(crate) fn change_returned(amount: Money) -> String {
    format!("Change returned: {}", amount)
}

pub(crate) fn restocked(quantity: u32) -> String {
    format!("Restocked all products to {}", quantity)
}

pub(crate) fn machine_reset() -> String {
    "Machine reset to defaults".to_string()
}

// =============================================================================
// Transaction Entry
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionEntry {
    pub timestamp: DateTime<Utc>,
    pub description: String,
}

impl TransactionEntry {
    pub fn new(timestamp: DateTime<Utc>, description: impl Into<String>) -> Self {
        TransactionEntry {
            timestamp,
            description: description.into(),
        }
    }
}

impl fmt::Display for TransactionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.description
        )
    }
}

impl FromStr for TransactionEntry {
    type Err = EntryParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let malformed = |reason: &str| EntryParseError {
            line: line.to_string(),
            reason: reason.to_string(),
        };

        let stamp = line
            .get(..TIMESTAMP_WIDTH)
            .ok_or_else(|| malformed("too short for a timestamp"))?;
        let rest = &line[TIMESTAMP_WIDTH..];

        let description = rest
            .strip_prefix(' ')
            .ok_or_else(|| malformed("missing separator after timestamp"))?;
        if description.trim().is_empty() {
            return Err(malformed("empty description"));
        }

        let naive = NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT)
            .map_err(|e| malformed(&e.to_string()))?;

        Ok(TransactionEntry {
            timestamp: naive.and_utc(),
            description: description.to_string(),
        })
    }
}

// =============================================================================
// Transaction Log
// =============================================================================

/// Ordered log of transaction entries. Entries are only ever appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionLog {
    entries: Vec<TransactionEntry>,
}

impl TransactionLog {
    pub fn new() -> Self {
        TransactionLog::default()
    }

    /// Parses persisted lines. Any malformed line rejects the whole list.
    pub fn from_lines<I, S>(lines: I) -> Result<Self, EntryParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = lines
            .into_iter()
            .map(|line| line.as_ref().parse())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TransactionLog { entries })
    }

    /// Appends an entry stamped with the current time.
    pub fn append(&mut self, description: impl Into<String>) {
        self.append_at(Utc::now(), description);
    }

    /// Appends an entry with an explicit timestamp.
    pub fn append_at(&mut self, timestamp: DateTime<Utc>, description: impl Into<String>) {
        self.entries.push(TransactionEntry::new(timestamp, description));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TransactionEntry> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&TransactionEntry> {
        self.entries.last()
    }

    /// The last `k` entries, oldest first.
    pub fn recent(&self, k: usize) -> &[TransactionEntry] {
        let start = self.entries.len().saturating_sub(k);
        &self.entries[start..]
    }

    /// The last `n` entries formatted for persistence, oldest first.
    pub fn tail_strings(&self, n: usize) -> Vec<String> {
        self.recent(n).iter().map(ToString::to_string).collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
