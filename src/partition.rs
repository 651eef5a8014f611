//! Partition naming.
//!
//! Each calendar day's observations live in their own table, named
//! `{month}{day}{year}` with the day and year written as unpadded
//! decimals (June 7th 2025 is `june72025`). The ingest side already
//! created tables under this convention, so the concatenation here is a
//! compatibility contract, not a style choice.

use thiserror::Error;

use crate::datetoken::DateParts;

/// Month names indexed by month number minus one.
const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Well-known partition kept populated for demos.
pub const DEMO_PARTITION: &str = "june212025";

/// Name of one physical partition table.
///
/// Values are produced only by [`Resolver::resolve`] and
/// [`PartitionId::demo`], never from raw request text. The fetcher
/// splices the name into query text as an identifier and relies on that
/// provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionId(String);

impl PartitionId {
    /// The fixed demo partition.
    pub fn demo() -> Self {
        PartitionId(DEMO_PARTITION.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PartitionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("invalid month {0} in date token, expected 01..12")]
    UnknownMonth(u32),
}

/// Maps date parts onto partition table names.
#[derive(Debug, Clone, Copy, Default)]
pub struct Resolver {
    /// Pin every resolution to [`DEMO_PARTITION`]. A plain boolean
    /// short-circuit for demo deployments; resolution errors are never
    /// rerouted here.
    pin_demo: bool,
}

impl Resolver {
    pub fn new(pin_demo: bool) -> Self {
        Resolver { pin_demo }
    }

    /// Compose the partition name for a day.
    ///
    /// The month is the only part that gets range-checked; day and year
    /// pass through, and a name for a day that was never ingested simply
    /// fails at query time.
    pub fn resolve(&self, parts: &DateParts) -> Result<PartitionId, ResolveError> {
        let month_index = parts
            .month
            .checked_sub(1)
            .filter(|i| (*i as usize) < MONTH_NAMES.len())
            .ok_or(ResolveError::UnknownMonth(parts.month))?;
        let month_name = MONTH_NAMES[month_index as usize];

        if self.pin_demo {
            return Ok(PartitionId::demo());
        }

        Ok(PartitionId(format!(
            "{}{}{}",
            month_name, parts.day, parts.year
        )))
    }
}
