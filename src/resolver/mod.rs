//! Identifier resolution across providers.
//!
//! [`Resolver::resolve`] classifies its input and routes it:
//!
//! - DOI: every provider in the configured priority order, folded field by field
//! - PMID: PubMed only
//! - arXiv ID: arXiv only
//! - title: a title search yields an identifier, which is then resolved as above
//!
//! Provider failures never surface: they contribute no fields.

mod merge;
mod title;

pub use merge::{fold_sources, query, Lookup};
pub use title::title_similarity;

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::ResolveError;
use crate::models::{normalize_identifier, parse_identifier, Identifier, IdentifierKind, Reference};
use crate::sources::{Source, SourceError, SourceRegistry};

/// Source consulted for PubMed IDs
pub const PMID_SOURCE: &str = "pubmed";

/// Source consulted for arXiv IDs
pub const ARXIV_SOURCE: &str = "arxiv";

/// Resolves identifiers and titles into merged records
#[derive(Debug, Clone)]
pub struct Resolver {
    registry: SourceRegistry,
    doi_priority: Vec<String>,
    title_search: Vec<String>,
    timeout: Duration,
    title_similarity_threshold: f64,
    short_circuit: bool,
}

impl Resolver {
    /// Create a resolver over `registry`, with policy taken from `config`
    pub fn new(registry: SourceRegistry, config: &Config) -> Self {
        Self {
            registry,
            doi_priority: config.providers.doi_priority.clone(),
            title_search: config.providers.title_search.clone(),
            timeout: Duration::from_secs(config.providers.timeout_secs),
            title_similarity_threshold: config.resolver.title_similarity_threshold,
            short_circuit: config.resolver.short_circuit,
        }
    }

    /// Create a resolver over the built-in providers
    pub fn from_config(config: &Config) -> Result<Self, SourceError> {
        Ok(Self::new(SourceRegistry::from_config(config)?, config))
    }

    /// Resolve a DOI, PMID, arXiv ID or title.
    ///
    /// Common prefixes (`https://doi.org/`, `arXiv:`, ...) are stripped first.
    /// Fails only when the input is neither an identifier nor title-like; an
    /// empty record means no provider knew the work.
    pub async fn resolve(&self, input: &str) -> Result<Reference, ResolveError> {
        let normalized = normalize_identifier(input);
        let identifier = parse_identifier(&normalized)
            .ok_or_else(|| ResolveError::UnknownIdentifier(input.trim().to_string()))?;
        info!(kind = %identifier.kind, value = %identifier.value, "Resolving");
        Ok(self.resolve_identifier(&identifier).await)
    }

    /// Resolve an already classified identifier
    pub async fn resolve_identifier(&self, identifier: &Identifier) -> Reference {
        match identifier.kind {
            IdentifierKind::Doi => self.resolve_by_doi(&identifier.value).await,
            IdentifierKind::Pmid => self.resolve_by_pmid(&identifier.value).await,
            IdentifierKind::Arxiv => self.resolve_by_arxiv(&identifier.value).await,
            IdentifierKind::Title => self.resolve_by_title(&identifier.value).await,
        }
    }

    /// Fold every DOI provider, highest priority first
    pub async fn resolve_by_doi(&self, doi: &str) -> Reference {
        let sources = self.registry.ordered(&self.doi_priority);
        fold_sources(&sources, Lookup::Doi(doi), self.timeout, self.short_circuit).await
    }

    /// Look a PubMed ID up in PubMed only
    pub async fn resolve_by_pmid(&self, pmid: &str) -> Reference {
        self.resolve_single(PMID_SOURCE, Lookup::Pmid(pmid)).await
    }

    /// Look an arXiv ID up in arXiv only
    pub async fn resolve_by_arxiv(&self, arxiv_id: &str) -> Reference {
        self.resolve_single(ARXIV_SOURCE, Lookup::Arxiv(arxiv_id)).await
    }

    async fn resolve_single(&self, source_id: &str, lookup: Lookup<'_>) -> Reference {
        match self.registry.get(source_id) {
            Some(source) => query(source.as_ref(), lookup, self.timeout).await,
            None => {
                warn!("Source '{}' is not registered", source_id);
                Reference::default()
            }
        }
    }

    /// Resolve a free-text title.
    ///
    /// Title-search providers are asked in order for an identifier; the first
    /// hit is resolved in full. A resolved title that differs too much from
    /// the query is reported but still returned.
    pub async fn resolve_by_title(&self, title: &str) -> Reference {
        let Some((kind, value)) = self.search_title(title).await else {
            info!(title, "No provider matched the title");
            return Reference::default();
        };

        let reference = match kind {
            IdentifierKind::Doi => self.resolve_by_doi(&value).await,
            IdentifierKind::Pmid => self.resolve_by_pmid(&value).await,
            IdentifierKind::Arxiv => self.resolve_by_arxiv(&value).await,
            IdentifierKind::Title => {
                warn!(title, "Title search returned another title, ignoring");
                return Reference::default();
            }
        };

        if let Some(resolved) = reference.title.as_deref() {
            let similarity = title_similarity(title, resolved);
            if similarity < self.title_similarity_threshold {
                warn!(
                    input = title,
                    resolved,
                    similarity = format!("{:.2}", similarity).as_str(),
                    "Title mismatch"
                );
            }
        }
        reference
    }

    async fn search_title(&self, title: &str) -> Option<(IdentifierKind, String)> {
        for source in self.registry.ordered(&self.title_search) {
            if !source.supports_title_search() {
                continue;
            }
            if let Some(hit) = self.search_one(source.as_ref(), title).await {
                debug!(source = source.id(), kind = %hit.0, id = %hit.1, "Title matched");
                return Some(hit);
            }
        }
        None
    }

    async fn search_one(&self, source: &dyn Source, title: &str) -> Option<(IdentifierKind, String)> {
        match tokio::time::timeout(self.timeout, source.search_by_title(title)).await {
            Ok(Ok(hit)) => Some(hit),
            Ok(Err(e)) if e.is_not_found() => {
                debug!(source = source.id(), "No title match: {}", e);
                None
            }
            Ok(Err(e)) => {
                warn!(source = source.id(), "Title search failed: {}", e);
                None
            }
            Err(_) => {
                warn!(source = source.id(), "Title search timed out after {:?}", self.timeout);
                None
            }
        }
    }
}

impl From<SourceRegistry> for Resolver {
    fn from(registry: SourceRegistry) -> Self {
        Self::new(registry, &Config::default())
    }
}
