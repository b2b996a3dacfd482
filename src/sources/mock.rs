//! Mock source for testing purposes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::models::{IdentifierKind, Reference};
use crate::sources::{Source, SourceCapabilities, SourceError};

/// A mock source that answers from canned records.
///
/// Records are keyed by identifier text and shared by every lookup kind.
/// Each call is recorded so tests can check which providers were consulted.
#[derive(Debug)]
pub struct MockSource {
    id: String,
    capabilities: SourceCapabilities,
    records: HashMap<String, Reference>,
    title_hits: HashMap<String, (IdentifierKind, String)>,
    failure: Option<String>,
    delay: Option<Duration>,
    calls: Mutex<Vec<String>>,
}

impl MockSource {
    /// Create a mock source supporting every lookup
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            capabilities: SourceCapabilities::all(),
            records: HashMap::new(),
            title_hits: HashMap::new(),
            failure: None,
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer lookups of `identifier` with `reference`
    pub fn with_record(mut self, identifier: &str, reference: Reference) -> Self {
        self.records.insert(identifier.to_string(), reference);
        self
    }

    /// Answer title searches for `title`
    pub fn with_title_hit(mut self, title: &str, kind: IdentifierKind, identifier: &str) -> Self {
        self.title_hits
            .insert(title.to_string(), (kind, identifier.to_string()));
        self
    }

    /// Fail every call with a network error
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    /// Wait before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Restrict the advertised capabilities
    pub fn with_capabilities(mut self, capabilities: SourceCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Calls received so far, as "method:argument"
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    async fn answer(&self, method: &str, identifier: &str) -> Result<(), SourceError> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(format!("{}:{}", method, identifier));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.failure {
            Some(message) => Err(SourceError::Network(message.clone())),
            None => Ok(()),
        }
    }

    fn record(&self, identifier: &str) -> Result<Reference, SourceError> {
        self.records
            .get(identifier)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(identifier.to_string()))
    }
}

#[async_trait]
impl Source for MockSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        "Mock Source"
    }

    fn capabilities(&self) -> SourceCapabilities {
        self.capabilities
    }

    async fn lookup_by_doi(&self, doi: &str) -> Result<Reference, SourceError> {
        self.answer("doi", doi).await?;
        self.record(doi)
    }

    async fn lookup_by_pmid(&self, pmid: &str) -> Result<Reference, SourceError> {
        self.answer("pmid", pmid).await?;
        self.record(pmid)
    }

    async fn lookup_by_arxiv(&self, arxiv_id: &str) -> Result<Reference, SourceError> {
        self.answer("arxiv", arxiv_id).await?;
        self.record(arxiv_id)
    }

    async fn search_by_title(
        &self,
        title: &str,
    ) -> Result<(IdentifierKind, String), SourceError> {
        self.answer("title", title).await?;
        self.title_hits
            .get(title)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(title.to_string()))
    }
}
