//! Error type shared by `Vector`, `ChainedHashMap` and the config builders.

use std::collections::TryReserveError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A config value is out of range; the message names the offending field.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    #[error("key already present")]
    DuplicateKey,
    #[error("key not found")]
    NotFound,
    #[error("index {index} out of bounds for vector of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    /// A resize target does not fit in a `usize`.
    #[error("capacity overflow")]
    CapacityOverflow,
    /// The allocator could not satisfy a capacity change. The container is
    /// left exactly as it was before the call.
    #[error("allocation failed: {0}")]
    Alloc(#[from] TryReserveError),
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
