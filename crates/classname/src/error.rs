//! Error types for candidate parsing.
//!
//! Structural problems with a class name are reported as [`CandidateError`].
//! Callers that compile large speculative candidate sets usually discard these
//! errors after logging; they are never fatal to a build.

use thiserror::Error;

/// Errors that can occur while splitting a class name into its parts.
///
/// # Examples
///
/// ```rust
/// use classname::{split_candidate, CandidateError};
///
/// assert_eq!(split_candidate(""), Err(CandidateError::Empty));
/// assert!(matches!(
///     split_candidate("hover:bg-[red"),
///     Err(CandidateError::Unbalanced { .. })
/// ));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CandidateError {
    /// The class name was empty or only whitespace.
    #[error("empty candidate")]
    Empty,

    /// A bracket, parenthesis or quote was opened but never closed,
    /// or a closing character had no opener.
    #[error("unbalanced `{delimiter}` at byte {position}")]
    Unbalanced { delimiter: char, position: usize },

    /// Two separators in a row (`hover::flex`) or a trailing separator.
    #[error("empty segment in `{0}`")]
    EmptySegment(String),

    /// A `/` with nothing after it.
    #[error("empty modifier in `{0}`")]
    EmptyModifier(String),

    /// The candidate contains whitespace outside of any bracketed section.
    #[error("unexpected whitespace in `{0}`")]
    Whitespace(String),
}
