//! Error types raised by resolution and citation rendering.
//!
//! Provider failures never show up here: they are absorbed into empty partial
//! records by the resolver. Only structural problems surface to callers.

use thiserror::Error;

/// Errors raised when an input cannot be turned into a lookup
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// The input matched no identifier pattern and does not look like a title
    #[error("Unknown identifier: {0}")]
    UnknownIdentifier(String),
}

/// Errors raised when a record is too sparse to be cited
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CitationError {
    /// A citation key cannot be built without a journal
    #[error("No journal is found")]
    MissingJournal,

    /// An author cannot be rendered without both names
    #[error("First name ({first:?}) or last name ({last:?}) is missing")]
    IncompleteAuthor {
        first: Option<String>,
        last: Option<String>,
    },
}
