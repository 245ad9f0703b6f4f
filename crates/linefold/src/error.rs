use std::collections::TryReserveError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to allocate memory: {0}")]
    Alloc(#[from] TryReserveError),

    #[error("Offset {offset} out of range for a string of {len} clusters")]
    OutOfRange { offset: isize, len: usize },

    #[error("Invalid length {length} at offset {offset}")]
    InvalidLength { offset: usize, length: isize },

    #[error("Cluster {idx} cannot both allow and prohibit a break before it")]
    ConflictingFlags { idx: usize },

    #[error("Unknown property value: {0}")]
    UnknownProperty(String),

    #[error("Invalid code point range {start:#X}..={end:#X}")]
    InvalidRange { start: u32, end: u32 },

    #[error("Overlapping code point ranges at {0:#X}")]
    OverlappingRanges(u32),
}

pub type Result<T> = std::result::Result<T, Error>;
