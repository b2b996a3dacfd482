//! arXiv source implementation using the Atom export API.

use async_trait::async_trait;
use chrono::Datelike;
use feed_rs::parser;
use std::sync::Arc;

use crate::models::{FieldValue, PageRange, Person, Reference, ReferenceBuilder};
use crate::sources::{Source, SourceCapabilities, SourceError};
use crate::utils::{collapse_whitespace, HttpClient};

const ARXIV_API_URL: &str = "https://export.arxiv.org/api/query";

/// DOI prefix arXiv registers for every preprint
pub const ARXIV_DOI_PREFIX: &str = "10.48550/arXiv.";

/// arXiv source
#[derive(Debug, Clone)]
pub struct ArxivSource {
    client: Arc<HttpClient>,
    api_url: String,
}

impl ArxivSource {
    pub fn new() -> Result<Self, SourceError> {
        Ok(Self::with_client(Arc::new(HttpClient::new()?)))
    }

    /// Create with a custom HTTP client
    pub fn with_client(client: Arc<HttpClient>) -> Self {
        Self {
            client,
            api_url: ARXIV_API_URL.to_string(),
        }
    }

    /// Point at another API endpoint (for testing)
    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = api_url.to_string();
        self
    }

    /// The arXiv ID inside an arXiv DOI, if `doi` is one
    pub fn id_from_doi(doi: &str) -> Option<&str> {
        let prefix = doi.get(..ARXIV_DOI_PREFIX.len())?;
        if prefix.eq_ignore_ascii_case(ARXIV_DOI_PREFIX) {
            Some(&doi[ARXIV_DOI_PREFIX.len()..])
        } else {
            None
        }
    }
}

#[async_trait]
impl Source for ArxivSource {
    fn id(&self) -> &str {
        "arxiv"
    }

    fn name(&self) -> &str {
        "arXiv"
    }

    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::DOI_LOOKUP | SourceCapabilities::ARXIV_LOOKUP
    }

    async fn lookup_by_doi(&self, doi: &str) -> Result<Reference, SourceError> {
        match Self::id_from_doi(doi) {
            Some(arxiv_id) => self.lookup_by_arxiv(arxiv_id).await,
            None => Err(SourceError::NotFound(format!("{} is not an arXiv DOI", doi))),
        }
    }

    async fn lookup_by_arxiv(&self, arxiv_id: &str) -> Result<Reference, SourceError> {
        let feed = self
            .client
            .get_text(&self.api_url, &[("id_list", arxiv_id)], &[])
            .await?
            .ok_or_else(|| SourceError::NotFound(format!("arXiv {}", arxiv_id)))?;

        parse_feed(&feed, arxiv_id)
    }
}

/// Parse an Atom response for a single ID
fn parse_feed(feed: &str, arxiv_id: &str) -> Result<Reference, SourceError> {
    let feed = parser::parse(feed.as_bytes())
        .map_err(|e| SourceError::Parse(format!("Failed to parse arXiv feed: {}", e)))?;

    // Unknown or malformed IDs come back as an entry describing the error
    let entry = feed
        .entries
        .into_iter()
        .find(|e| !e.id.contains("/api/errors"))
        .ok_or_else(|| SourceError::NotFound(format!("arXiv {}", arxiv_id)))?;

    let mut builder = ReferenceBuilder::new()
        .journal("arXiv")
        .doi(format!("{}{}", ARXIV_DOI_PREFIX, arxiv_id));

    if let Some(title) = entry.title.as_ref().map(|t| collapse_whitespace(&t.content)) {
        builder = builder.title(title.trim_end_matches('.'));
    }

    let authors = entry
        .authors
        .iter()
        .map(|a| Person::from_full_name(&a.name))
        .collect();
    builder = builder.authors(authors);

    if let Some(summary) = entry.summary.as_ref() {
        builder = builder.abstract_text(collapse_whitespace(&summary.content));
    }

    if let Some(updated) = entry.updated.or(entry.published) {
        builder = builder.year(updated.year());
    }

    if let Some(pages) = FieldValue::parse(arxiv_id) {
        builder = builder.pages(PageRange::Single(pages));
    }

    Ok(builder.build())
}
