//! Citation key derivation.
//!
//! Keys look like `Zeng_JChemTheoryComput_2023_v19_p1261`: first author's
//! last name, abbreviated journal, then year, volume and first page when known.

use super::abbrev::Abbreviator;
use super::latex::unaccent;
use crate::error::CitationError;
use crate::models::Reference;

/// Stands in for the author segment when a record has no authors
pub const NO_AUTHOR: &str = "NoAuthor";

/// Stands in for the author segment when the first author has no last name
pub const NO_LAST_NAME: &str = "NoLastName";

/// Characters that break BibTeX key syntax
const FORBIDDEN_KEY_CHARS: &[char] = &['"', '#', '%', '\'', '(', ')', ',', '=', '{', '}'];

/// Citation key and the journal abbreviation it was built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationKey {
    pub key: String,
    pub journal_abbr: String,
}

/// Abbreviated journal name of a record, if it names a journal
pub fn journal_abbreviation(reference: &Reference, abbreviator: &Abbreviator) -> Option<String> {
    reference
        .journal
        .as_deref()
        .map(|journal| abbreviator.journal_abbreviation(journal))
}

/// Derive the citation key of a record.
///
/// Depends only on the first author's last name, the journal abbreviation,
/// year, volume and first page. Fails when the record has no journal.
pub fn derive_key(
    reference: &Reference,
    abbreviator: &Abbreviator,
) -> Result<CitationKey, CitationError> {
    let journal_abbr =
        journal_abbreviation(reference, abbreviator).ok_or(CitationError::MissingJournal)?;

    let author = match reference.first_author() {
        None => NO_AUTHOR.to_string(),
        Some(person) => match person.last.as_deref().filter(|l| !l.trim().is_empty()) {
            Some(last) => unaccent(last).replace(' ', ""),
            None => NO_LAST_NAME.to_string(),
        },
    };
    let journal: String = unaccent(&journal_abbr)
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | ':' | ','))
        .collect();

    let mut key = format!("{}_{}", author, journal);
    if let Some(year) = reference.year {
        key.push_str(&format!("_{}", year));
    }
    if let Some(volume) = &reference.volume {
        key.push_str(&format!("_v{}", volume));
    }
    if let Some(pages) = &reference.pages {
        key.push_str(&format!("_p{}", pages.first()));
    }
    key.retain(|c| !FORBIDDEN_KEY_CHARS.contains(&c));

    Ok(CitationKey { key, journal_abbr })
}
