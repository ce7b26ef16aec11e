//! Program-listing parser.
//!
//! A program listing is a comma-separated sequence of integers; parsing
//! one into initial memory contents is the only file-adjacent concern the
//! crate carries. Reading the listing from disk stays with the caller.

use thiserror::Error;

/// Error raised while parsing a program listing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgramError {
    /// A comma-separated token is not a valid integer.
    #[error("invalid integer {token:?} at listing position {index}")]
    InvalidToken {
        /// Zero-based position of the token in the listing.
        index: usize,
        /// The offending token, surrounding whitespace trimmed.
        token: String,
    },
}

/// Parses a comma-separated listing into initial memory contents.
///
/// Surrounding whitespace is tolerated around the listing and around each
/// token, so listings read straight from a file with a trailing newline
/// parse cleanly.
///
/// # Errors
///
/// Returns [`ProgramError::InvalidToken`] for the first token that is not
/// a valid integer.
pub fn parse(listing: &str) -> Result<Vec<i64>, ProgramError> {
    listing
        .trim()
        .split(',')
        .map(str::trim)
        .enumerate()
        .map(|(index, token)| {
            token.parse().map_err(|_| ProgramError::InvalidToken {
                index,
                token: token.to_owned(),
            })
        })
        .collect()
}
