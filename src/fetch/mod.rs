//! Partition record retrieval.

mod error;
mod fetcher;
mod records;

pub use error::FetchError;
pub use fetcher::PartitionFetcher;
pub use records::{FlexibleRecord, Observation, Scalar, DATE_ONLY_COLUMN, OBSERVATION_COLUMNS};
