//! Classification of raw user input into identifier kinds.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Kind of a scholarly identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierKind {
    Doi,
    Pmid,
    Arxiv,
    /// Free text that looks enough like a title to be searched
    Title,
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IdentifierKind::Doi => "DOI",
            IdentifierKind::Pmid => "PMID",
            IdentifierKind::Arxiv => "ARXIV",
            IdentifierKind::Title => "TITLE",
        };
        write!(f, "{}", name)
    }
}

/// A classified identifier together with the text to look up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    pub kind: IdentifierKind,
    pub value: String,
}

impl Identifier {
    pub fn new(kind: IdentifierKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Minimum number of whitespace-separated words for free text to count as a title
pub const TITLE_MIN_WORDS: usize = 3;

/// Minimum number of characters for free text to count as a title
pub const TITLE_MIN_CHARS: usize = 10;

static DOI_RE: OnceLock<Regex> = OnceLock::new();
static PMID_RE: OnceLock<Regex> = OnceLock::new();
static ARXIV_RE: OnceLock<Regex> = OnceLock::new();
static PREFIX_RE: OnceLock<Regex> = OnceLock::new();

fn patterns() -> [(IdentifierKind, &'static Regex); 3] {
    let doi = DOI_RE.get_or_init(|| {
        Regex::new(r"(?i)^10\.\d{4,9}/[-._;()/:A-Z0-9]+").expect("valid DOI regex")
    });
    let pmid = PMID_RE.get_or_init(|| Regex::new(r"^\b\d{8}\b").expect("valid PMID regex"));
    let arxiv = ARXIV_RE
        .get_or_init(|| Regex::new(r"^\d{4}\.\d{4,5}(v\d+)?").expect("valid arXiv regex"));
    [
        (IdentifierKind::Doi, doi),
        (IdentifierKind::Pmid, pmid),
        (IdentifierKind::Arxiv, arxiv),
    ]
}

/// Determine the kind of `input`.
///
/// Patterns are anchored at the start of the input and tried in the order
/// DOI, PMID, arXiv. Anything else is a title when it has at least
/// [`TITLE_MIN_WORDS`] words and [`TITLE_MIN_CHARS`] characters.
pub fn classify(input: &str) -> Option<IdentifierKind> {
    parse_identifier(input).map(|id| id.kind)
}

/// Classify `input` and extract the matched identifier text.
///
/// DOIs and titles keep the whole trimmed input, since DOI suffixes may hold
/// characters outside the matched class (`<`, `>`, `#`, `[`). PMIDs and arXiv
/// IDs keep the matched prefix.
pub fn parse_identifier(input: &str) -> Option<Identifier> {
    let input = input.trim();
    for (kind, re) in patterns() {
        if let Some(m) = re.find(input) {
            let value = match kind {
                IdentifierKind::Doi => input,
                _ => m.as_str(),
            };
            return Some(Identifier::new(kind, value));
        }
    }
    if input.split_whitespace().count() >= TITLE_MIN_WORDS
        && input.chars().count() >= TITLE_MIN_CHARS
    {
        return Some(Identifier::new(IdentifierKind::Title, input));
    }
    None
}

/// Trim `input` and strip resolver URLs and scheme prefixes
/// (`https://doi.org/`, `doi:`, `arXiv:`, `https://arxiv.org/abs/`, `PMID:`).
pub fn normalize_identifier(input: &str) -> String {
    let prefix = PREFIX_RE.get_or_init(|| {
        Regex::new(
            r"(?i)^(?:https?://(?:dx\.)?doi\.org/|doi:\s*|arxiv:\s*|https?://(?:www\.)?arxiv\.org/abs/|pmid:\s*)",
        )
        .expect("valid prefix regex")
    });
    let trimmed = input.trim();
    prefix.replace(trimmed, "").trim().to_string()
}
