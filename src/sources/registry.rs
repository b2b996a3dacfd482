//! Registry of bibliographic sources, kept in registration order.

use std::sync::Arc;

use super::{
    ArxivSource, ChemRxivSource, CrossRefSource, PubMedSource, SemanticScholarSource, Source,
    SourceError,
};
use crate::config::Config;
use crate::utils::HttpClient;

bitflags::bitflags! {
    /// Capabilities that a source can support
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SourceCapabilities: u32 {
        const DOI_LOOKUP = 1 << 0;
        const PMID_LOOKUP = 1 << 1;
        const ARXIV_LOOKUP = 1 << 2;
        const TITLE_SEARCH = 1 << 3;
    }
}

/// Registry for all available sources
///
/// Order matters: it is the default priority used when folding records.
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    sources: Vec<Arc<dyn Source>>,
}

impl SourceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every built-in source, configured from `config`
    ///
    /// Sources share one connection pool; each gets its own rate limiter.
    pub fn from_config(config: &Config) -> Result<Self, SourceError> {
        let base = HttpClient::new()?;
        let client_for = |id: &str| {
            let client = match config.rate_for(id) {
                Some(rate) => base.clone().with_rate_limit(rate),
                None => base.clone(),
            };
            Arc::new(client)
        };
        let email = config.providers.email.clone();

        let mut registry = Self::new();
        registry.register(Arc::new(
            PubMedSource::with_client(client_for("pubmed")).with_email(email.clone()),
        ));
        registry.register(Arc::new(
            CrossRefSource::with_client(client_for("crossref")).with_email(email),
        ));
        registry.register(Arc::new(ArxivSource::with_client(client_for("arxiv"))));
        registry.register(Arc::new(ChemRxivSource::with_client(client_for(
            "chemrxiv",
        ))));
        registry.register(Arc::new(
            SemanticScholarSource::with_client(client_for("semantic"))
                .with_api_key(config.semantic_scholar_api_key()),
        ));

        Ok(registry)
    }

    /// Register a source, replacing one with the same id in place
    pub fn register(&mut self, source: Arc<dyn Source>) {
        match self.sources.iter().position(|s| s.id() == source.id()) {
            Some(index) => self.sources[index] = source,
            None => self.sources.push(source),
        }
    }

    /// Get a source by ID
    pub fn get(&self, id: &str) -> Option<&Arc<dyn Source>> {
        self.sources.iter().find(|s| s.id() == id)
    }

    /// Get a source by ID, returning an error if not found
    pub fn get_required(&self, id: &str) -> Result<&Arc<dyn Source>, SourceError> {
        self.get(id)
            .ok_or_else(|| SourceError::NotFound(format!("Source '{}' not found", id)))
    }

    /// Get all registered sources in registration order
    pub fn all(&self) -> impl Iterator<Item = &Arc<dyn Source>> {
        self.sources.iter()
    }

    /// Get all source IDs
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|s| s.id())
    }

    /// Sources named by `ids`, in that order; unknown ids are skipped with a warning
    pub fn ordered(&self, ids: &[String]) -> Vec<Arc<dyn Source>> {
        ids.iter()
            .filter_map(|id| {
                let source = self.get(id).cloned();
                if source.is_none() {
                    tracing::warn!("Unknown source '{}' in configuration, skipping", id);
                }
                source
            })
            .collect()
    }

    /// Get sources that support a specific capability
    pub fn with_capability(&self, capability: SourceCapabilities) -> Vec<&Arc<dyn Source>> {
        self.all()
            .filter(|s| s.capabilities().contains(capability))
            .collect()
    }

    /// Get the number of registered sources
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::MockSource;

    #[test]
    fn test_registry_from_config() {
        let registry = SourceRegistry::from_config(&Config::default()).unwrap();

        assert_eq!(registry.len(), 5);
        assert_eq!(
            registry.ids().collect::<Vec<_>>(),
            vec!["pubmed", "crossref", "arxiv", "chemrxiv", "semantic"]
        );
    }

    #[test]
    fn test_capabilities() {
        let registry = SourceRegistry::from_config(&Config::default()).unwrap();

        let pubmed = registry.get("pubmed").unwrap();
        assert!(pubmed.supports_doi_lookup());
        assert!(pubmed.supports_pmid_lookup());
        assert!(!pubmed.supports_title_search());

        let searchers: Vec<&str> = registry
            .with_capability(SourceCapabilities::TITLE_SEARCH)
            .into_iter()
            .map(|s| s.id())
            .collect();
        assert_eq!(searchers, vec!["crossref", "semantic"]);
    }

    #[test]
    fn test_ordered_follows_requested_order() {
        let mut registry = SourceRegistry::new();
        registry.register(Arc::new(MockSource::new("a")));
        registry.register(Arc::new(MockSource::new("b")));

        let ids = vec!["b".to_string(), "missing".to_string(), "a".to_string()];
        let ordered: Vec<String> = registry
            .ordered(&ids)
            .iter()
            .map(|s| s.id().to_string())
            .collect();
        assert_eq!(ordered, vec!["b", "a"]);
    }

    #[test]
    fn test_register_replaces_in_place() {
        let mut registry = SourceRegistry::new();
        registry.register(Arc::new(MockSource::new("a")));
        registry.register(Arc::new(MockSource::new("b")));
        registry.register(Arc::new(
            MockSource::new("a").with_capabilities(SourceCapabilities::PMID_LOOKUP),
        ));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.ids().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(!registry.get("a").unwrap().supports_doi_lookup());
        assert!(registry.get_required("c").is_err());
    }
}
