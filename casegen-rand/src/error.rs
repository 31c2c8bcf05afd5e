use thiserror::Error;

/// The errors produced by the random generation module.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RandError {
    /// The generation script was empty.
    #[error("empty generation script")]
    EmptyScript,
    /// A permutation was requested with a non-positive size.
    #[error("non-positive permutation size {0}")]
    NonPositiveSize(i64),
    /// A shuffle range ends before it begins or extends past the slice.
    #[error("invalid shuffle range")]
    NegativeRange,
}
