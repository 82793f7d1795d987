use serde::{Deserialize, Serialize};

/// Modulator, upsampler and decimator errors
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Ord, PartialOrd, Serialize, Deserialize, thiserror::Error,
)]
#[non_exhaustive]
pub enum Error {
    /// A level, rate or order parameter is out of range
    ///
    /// E.g. a non-positive high level or a zero rate.
    #[error("invalid parameter")]
    InvalidParameter,
    /// The error accumulator left the sample representation
    #[error("accumulator overflow at sample {index}")]
    Overflow {
        /// Index of the sample whose update overflowed
        index: usize,
    },
}
