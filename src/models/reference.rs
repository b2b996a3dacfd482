//! Bibliographic record model shared by every provider.
//!
//! A [`Reference`] is a bag of independently optional fields. Providers return
//! partial references; the resolver folds them into one with [`Reference::or`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CitationError;

/// One author of a work
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Person {
    pub first: Option<String>,
    pub last: Option<String>,
    pub suffix: Option<String>,
}

impl Person {
    /// Create a person from given and family names
    pub fn new(first: impl Into<String>, last: impl Into<String>) -> Self {
        Self {
            first: Some(first.into()),
            last: Some(last.into()),
            suffix: None,
        }
    }

    /// Split a display name on its last space ("Ada King Lovelace" -> "Ada King" / "Lovelace")
    pub fn from_full_name(name: &str) -> Self {
        let name = name.split_whitespace().collect::<Vec<_>>().join(" ");
        match name.rsplit_once(' ') {
            Some((first, last)) => Self::new(first, last),
            None => Self::new("", name),
        }
    }

    /// Set the name suffix (Jr., III, ...)
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    fn names(&self) -> Result<(&str, &str), CitationError> {
        match (self.first.as_deref(), self.last.as_deref()) {
            (Some(first), Some(last)) => Ok((first, last)),
            _ => Err(CitationError::IncompleteAuthor {
                first: self.first.clone(),
                last: self.last.clone(),
            }),
        }
    }

    /// Name in BibTeX form.
    ///
    /// Multi-word last names and suffixed names are wrapped in braces so that
    /// BibTeX does not split them: `Darrin M. York`, `Ludwig {van Beethoven}`,
    /// `Martin {Luther King Jr.}`.
    pub fn bibtex_name(&self) -> Result<String, CitationError> {
        let (first, last) = self.names()?;
        let last = match &self.suffix {
            Some(suffix) => format!("{{{} {}}}", last, suffix),
            None if last.contains(' ') => format!("{{{}}}", last),
            None => last.to_string(),
        };
        if first.is_empty() {
            Ok(last)
        } else {
            Ok(format!("{} {}", first, last))
        }
    }

    /// Name as plain text, without BibTeX protection
    pub fn plain_name(&self) -> Result<String, CitationError> {
        let (first, last) = self.names()?;
        let parts = [Some(first), Some(last), self.suffix.as_deref()];
        Ok(parts
            .into_iter()
            .flatten()
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(" "))
    }
}

/// A volume, issue or page value: numeric when the provider gave digits only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(u64),
    Text(String),
}

impl FieldValue {
    /// Parse a provider string, keeping it as text unless it is all digits
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        if value.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(n) = value.parse() {
                return Some(FieldValue::Int(n));
            }
        }
        Some(FieldValue::Text(value.to_string()))
    }
}

impl From<u64> for FieldValue {
    fn from(n: u64) -> Self {
        FieldValue::Int(n)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(n) => write!(f, "{}", n),
            FieldValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Pagination of a work.
///
/// A single value is an article number or e-locator rather than a true span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageRange {
    Single(FieldValue),
    Span(FieldValue, FieldValue),
}

impl PageRange {
    /// Parse "1261-1275", "1261-75", "107206" or "e1002"
    ///
    /// Abbreviated end pages (as used by MEDLINE) are expanded from the start
    /// page. Strings with more than one separator are rejected.
    pub fn parse(pages: &str) -> Option<Self> {
        let normalized = pages.trim().replace("--", "-").replace('\u{2013}', "-");
        let parts: Vec<&str> = normalized.split('-').map(str::trim).collect();
        match parts.as_slice() {
            [single] => FieldValue::parse(single).map(PageRange::Single),
            [start, end] => {
                let start_value = FieldValue::parse(start)?;
                let end_value = match FieldValue::parse(end)? {
                    FieldValue::Int(_) if end.len() < start.len() => {
                        expand_end_page(start, end).unwrap_or_else(|| FieldValue::Text(end.to_string()))
                    }
                    other => other,
                };
                Some(PageRange::Span(start_value, end_value))
            }
            _ => None,
        }
    }

    /// The value used in citation keys: the span's start, or the single value
    pub fn first(&self) -> &FieldValue {
        match self {
            PageRange::Single(value) => value,
            PageRange::Span(start, _) => start,
        }
    }
}

/// "1261" + "75" -> 1275
fn expand_end_page(start: &str, end: &str) -> Option<FieldValue> {
    if !start.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let prefix = &start[..start.len() - end.len()];
    let expanded: u64 = format!("{}{}", prefix, end).parse().ok()?;
    let start: u64 = start.parse().ok()?;
    if expanded >= start {
        Some(FieldValue::Int(expanded))
    } else {
        None
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageRange::Single(value) => write!(f, "{}", value),
            PageRange::Span(start, end) => write!(f, "{}--{}", start, end),
        }
    }
}

/// BibTeX entry type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    #[default]
    Article,
    InBook,
    InProceedings,
    Proceedings,
}

impl EntryType {
    /// Name used after `@` in a BibTeX entry
    pub fn bibtex_name(&self) -> &'static str {
        match self {
            EntryType::Article => "Article",
            EntryType::InBook => "InBook",
            EntryType::InProceedings => "InProceedings",
            EntryType::Proceedings => "Proceedings",
        }
    }
}

/// A bibliographic record.
///
/// Every field is optional: `None` means "unknown", never "known to be empty".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Reference {
    pub authors: Option<Vec<Person>>,
    pub title: Option<String>,
    /// Full, unabbreviated journal name
    pub journal: Option<String>,
    pub year: Option<i32>,
    pub volume: Option<FieldValue>,
    pub issue: Option<FieldValue>,
    pub pages: Option<PageRange>,
    /// Free text, may still contain markup
    pub r#abstract: Option<String>,
    pub doi: Option<String>,
    pub entry_type: Option<EntryType>,
}

impl Reference {
    /// Combine two partial records, keeping every field of `self` that is set.
    ///
    /// Associative but not commutative: `a.or(b)` never lets `b` overwrite `a`.
    pub fn or(self, other: Reference) -> Reference {
        Reference {
            authors: self.authors.or(other.authors),
            title: self.title.or(other.title),
            journal: self.journal.or(other.journal),
            year: self.year.or(other.year),
            volume: self.volume.or(other.volume),
            issue: self.issue.or(other.issue),
            pages: self.pages.or(other.pages),
            r#abstract: self.r#abstract.or(other.r#abstract),
            doi: self.doi.or(other.doi),
            entry_type: self.entry_type.or(other.entry_type),
        }
    }

    /// Fold partial records left to right, highest priority first
    pub fn merge_all<I>(records: I) -> Reference
    where
        I: IntoIterator<Item = Reference>,
    {
        records.into_iter().fold(Reference::default(), Reference::or)
    }

    /// True when no field is known
    pub fn is_empty(&self) -> bool {
        self == &Reference::default()
    }

    /// True when every field is known
    pub fn is_complete(&self) -> bool {
        self.authors.is_some()
            && self.title.is_some()
            && self.journal.is_some()
            && self.year.is_some()
            && self.volume.is_some()
            && self.issue.is_some()
            && self.pages.is_some()
            && self.r#abstract.is_some()
            && self.doi.is_some()
            && self.entry_type.is_some()
    }

    /// Entry type, defaulting to article
    pub fn entry_type(&self) -> EntryType {
        self.entry_type.unwrap_or_default()
    }

    /// First author, if any
    pub fn first_author(&self) -> Option<&Person> {
        self.authors.as_ref().and_then(|a| a.first())
    }
}

/// Builder for constructing partial records in providers and tests
#[derive(Debug, Clone, Default)]
pub struct ReferenceBuilder {
    reference: Reference,
}

impl ReferenceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set authors; an empty list leaves the field unknown
    pub fn authors(mut self, authors: Vec<Person>) -> Self {
        self.reference.authors = if authors.is_empty() {
            None
        } else {
            Some(authors)
        };
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.reference.title = non_empty(title.into());
        self
    }

    pub fn journal(mut self, journal: impl Into<String>) -> Self {
        self.reference.journal = non_empty(journal.into());
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.reference.year = Some(year);
        self
    }

    pub fn volume(mut self, volume: impl Into<FieldValue>) -> Self {
        self.reference.volume = Some(volume.into());
        self
    }

    pub fn issue(mut self, issue: impl Into<FieldValue>) -> Self {
        self.reference.issue = Some(issue.into());
        self
    }

    pub fn pages(mut self, pages: PageRange) -> Self {
        self.reference.pages = Some(pages);
        self
    }

    pub fn abstract_text(mut self, abstract_text: impl Into<String>) -> Self {
        self.reference.r#abstract = non_empty(abstract_text.into());
        self
    }

    pub fn doi(mut self, doi: impl Into<String>) -> Self {
        self.reference.doi = non_empty(doi.into());
        self
    }

    pub fn entry_type(mut self, entry_type: EntryType) -> Self {
        self.reference.entry_type = Some(entry_type);
        self
    }

    pub fn build(self) -> Reference {
        self.reference
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_string())
    }
}
