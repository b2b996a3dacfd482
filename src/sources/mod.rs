//! Bibliographic data providers behind a common trait.
//!
//! Every provider implements [`Source`]. A provider only overrides the lookups
//! it supports and advertises them through [`Source::capabilities`]; the rest
//! keep the default `NotImplemented` body. Sources are registered, in priority
//! order, in a [`SourceRegistry`].
//!
//! Lookups return a *partial* [`Reference`]: whatever fields the provider
//! knows. "No such record" is reported as [`SourceError::NotFound`] and is
//! never fatal to a resolution.

mod arxiv;
mod chemrxiv;
mod crossref;
pub mod mock;
mod pubmed;
mod registry;
mod semantic;
mod xml;

pub use arxiv::ArxivSource;
pub use chemrxiv::ChemRxivSource;
pub use crossref::CrossRefSource;
pub use mock::MockSource;
pub use pubmed::PubMedSource;
pub use registry::{SourceCapabilities, SourceRegistry};
pub use semantic::SemanticScholarSource;

use crate::models::{IdentifierKind, Reference};
use async_trait::async_trait;

/// The Source trait defines the interface of a bibliographic data provider.
///
/// # Implementing a New Source
///
/// 1. Create a struct that implements `Source`
/// 2. Implement `id`, `name` and `capabilities`
/// 3. Override the lookups named by the capabilities
/// 4. Register it in `SourceRegistry::from_config` or dynamically
#[async_trait]
pub trait Source: Send + Sync + std::fmt::Debug {
    /// Unique identifier of this source (used in configuration, e.g. "pubmed")
    fn id(&self) -> &str;

    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Describe the capabilities of this source
    fn capabilities(&self) -> SourceCapabilities;

    /// Whether this source supports lookup by DOI
    fn supports_doi_lookup(&self) -> bool {
        self.capabilities().contains(SourceCapabilities::DOI_LOOKUP)
    }

    /// Whether this source supports lookup by PubMed ID
    fn supports_pmid_lookup(&self) -> bool {
        self.capabilities().contains(SourceCapabilities::PMID_LOOKUP)
    }

    /// Whether this source supports lookup by arXiv ID
    fn supports_arxiv_lookup(&self) -> bool {
        self.capabilities().contains(SourceCapabilities::ARXIV_LOOKUP)
    }

    /// Whether this source can search titles
    fn supports_title_search(&self) -> bool {
        self.capabilities().contains(SourceCapabilities::TITLE_SEARCH)
    }

    /// Fetch the record of a DOI
    async fn lookup_by_doi(&self, _doi: &str) -> Result<Reference, SourceError> {
        Err(SourceError::NotImplemented)
    }

    /// Fetch the record of a PubMed ID
    async fn lookup_by_pmid(&self, _pmid: &str) -> Result<Reference, SourceError> {
        Err(SourceError::NotImplemented)
    }

    /// Fetch the record of an arXiv ID
    async fn lookup_by_arxiv(&self, _arxiv_id: &str) -> Result<Reference, SourceError> {
        Err(SourceError::NotImplemented)
    }

    /// Find the identifier of the best match for a title.
    ///
    /// Only a pointer is returned, never metadata: the caller resolves it.
    async fn search_by_title(
        &self,
        _title: &str,
    ) -> Result<(IdentifierKind, String), SourceError> {
        Err(SourceError::NotImplemented)
    }
}

/// Errors that can occur when interacting with a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The requested operation is not implemented for this source
    #[error("Operation not implemented for this source")]
    NotImplemented,

    /// Network or HTTP transport error
    #[error("Network error: {0}")]
    Network(String),

    /// Parsing error (XML, JSON, HTML, etc.)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Rate limit exceeded, with Retry-After seconds when the server sent one
    #[error("Rate limit exceeded")]
    RateLimit(Option<u64>),

    /// Unexpected HTTP status
    #[error("Server error: HTTP {0}")]
    Server(u16),

    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// API-level error reported by the source
    #[error("API error: {0}")]
    Api(String),

    /// The provider did not answer within the configured timeout
    #[error("Timed out")]
    Timeout,

    /// Other error
    #[error("Error: {0}")]
    Other(String),
}

impl SourceError {
    /// True for "no such record" outcomes, which are expected and logged quietly
    pub fn is_not_found(&self) -> bool {
        matches!(self, SourceError::NotFound(_) | SourceError::NotImplemented)
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SourceError::Timeout
        } else {
            SourceError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("JSON: {}", err))
    }
}

impl From<quick_xml::Error> for SourceError {
    fn from(err: quick_xml::Error) -> Self {
        SourceError::Parse(format!("XML: {}", err))
    }
}
