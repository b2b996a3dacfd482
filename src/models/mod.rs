//! Core data models for bibliographic records and identifiers.

mod identifier;
mod reference;

pub use identifier::{
    classify, normalize_identifier, parse_identifier, Identifier, IdentifierKind,
    TITLE_MIN_CHARS, TITLE_MIN_WORDS,
};
pub use reference::{EntryType, FieldValue, PageRange, Person, Reference, ReferenceBuilder};
