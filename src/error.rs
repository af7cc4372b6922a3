//! Recoverable lookup failures raised while building a render.
//!
//! Neither variant is ever surfaced to the user: the caller drops the entity or marks the year as
//! missing and carries on.
use crate::region::RegionKey;
use thiserror::Error;

/// A lookup into the loaded data failed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    /// The region has no data in the loaded dataset
    #[error("No data found for region {0}")]
    NotFound(RegionKey),
    /// The price index for a year is absent or not a positive number
    #[error("No valid price index for year {0}")]
    InvalidIndex(u32),
}
