//! Semantic Scholar source implementation using the Graph API.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use crate::models::{FieldValue, IdentifierKind, PageRange, Person, Reference, ReferenceBuilder};
use crate::sources::{Source, SourceCapabilities, SourceError};
use crate::utils::HttpClient;

const SEMANTIC_SCHOLAR_API_BASE: &str = "https://api.semanticscholar.org/graph/v1";

const PAPER_FIELDS: &str = "title,year,abstract,authors,journal,venue,externalIds";

/// Semantic Scholar source
#[derive(Debug, Clone)]
pub struct SemanticScholarSource {
    client: Arc<HttpClient>,
    base_url: String,
    api_key: Option<String>,
}

impl SemanticScholarSource {
    pub fn new() -> Result<Self, SourceError> {
        Ok(Self::with_client(Arc::new(HttpClient::new()?)))
    }

    /// Create with a custom HTTP client
    pub fn with_client(client: Arc<HttpClient>) -> Self {
        Self {
            client,
            base_url: SEMANTIC_SCHOLAR_API_BASE.to_string(),
            api_key: None,
        }
    }

    /// Point at another API host (for testing)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Authenticate with an API key for higher rate limits
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        match &self.api_key {
            Some(key) => vec![("x-api-key", key.as_str())],
            None => Vec::new(),
        }
    }

    async fn lookup(&self, paper_id: &str) -> Result<Reference, SourceError> {
        let url = format!("{}/paper/{}", self.base_url, paper_id);
        let paper: S2Paper = self
            .client
            .get_json(&url, &[("fields", PAPER_FIELDS)], &self.headers())
            .await?
            .ok_or_else(|| SourceError::NotFound(paper_id.to_string()))?;

        Ok(paper_to_reference(paper))
    }
}

#[async_trait]
impl Source for SemanticScholarSource {
    fn id(&self) -> &str {
        "semantic"
    }

    fn name(&self) -> &str {
        "Semantic Scholar"
    }

    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::DOI_LOOKUP
            | SourceCapabilities::PMID_LOOKUP
            | SourceCapabilities::ARXIV_LOOKUP
            | SourceCapabilities::TITLE_SEARCH
    }

    async fn lookup_by_doi(&self, doi: &str) -> Result<Reference, SourceError> {
        self.lookup(&format!("DOI:{}", doi)).await
    }

    async fn lookup_by_pmid(&self, pmid: &str) -> Result<Reference, SourceError> {
        self.lookup(&format!("PMID:{}", pmid)).await
    }

    async fn lookup_by_arxiv(&self, arxiv_id: &str) -> Result<Reference, SourceError> {
        self.lookup(&format!("ARXIV:{}", arxiv_id)).await
    }

    async fn search_by_title(
        &self,
        title: &str,
    ) -> Result<(IdentifierKind, String), SourceError> {
        let url = format!("{}/paper/search", self.base_url);
        let params = [("query", title), ("limit", "1"), ("fields", "externalIds")];
        let response: S2SearchResponse = self
            .client
            .get_json(&url, &params, &self.headers())
            .await?
            .ok_or_else(|| SourceError::NotFound(title.to_string()))?;

        response
            .data
            .into_iter()
            .next()
            .and_then(|hit| hit.external_ids)
            .and_then(S2ExternalIds::best_identifier)
            .ok_or_else(|| SourceError::NotFound(title.to_string()))
    }
}

fn paper_to_reference(paper: S2Paper) -> Reference {
    let mut builder = ReferenceBuilder::new();

    if let Some(title) = paper.title {
        builder = builder.title(title);
    }
    let authors = paper
        .authors
        .iter()
        .filter_map(|a| a.name.as_deref())
        .map(Person::from_full_name)
        .collect();
    builder = builder.authors(authors);

    if let Some(year) = paper.year {
        builder = builder.year(year);
    }
    if let Some(abstract_text) = paper.r#abstract {
        builder = builder.abstract_text(abstract_text);
    }

    let journal = paper.journal.unwrap_or_default();
    let non_blank = |n: &String| !n.trim().is_empty();
    if let Some(name) = journal.name.filter(non_blank).or(paper.venue.filter(non_blank)) {
        builder = builder.journal(name);
    }
    if let Some(volume) = journal.volume.as_deref().and_then(FieldValue::parse) {
        builder = builder.volume(volume);
    }
    if let Some(pages) = journal.pages.as_deref().and_then(PageRange::parse) {
        builder = builder.pages(pages);
    }

    if let Some(doi) = paper.external_ids.and_then(|ids| ids.doi) {
        builder = builder.doi(doi);
    }

    builder.build()
}

// ===== Semantic Scholar API Types =====

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct S2Paper {
    title: Option<String>,
    year: Option<i32>,
    r#abstract: Option<String>,
    #[serde(default)]
    authors: Vec<S2Author>,
    journal: Option<S2Journal>,
    venue: Option<String>,
    external_ids: Option<S2ExternalIds>,
}

#[derive(Debug, Deserialize)]
struct S2Author {
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct S2Journal {
    name: Option<String>,
    volume: Option<String>,
    pages: Option<String>,
}

#[derive(Debug, Deserialize)]
struct S2ExternalIds {
    #[serde(rename = "DOI")]
    doi: Option<String>,
    #[serde(rename = "PubMed")]
    pubmed: Option<String>,
    #[serde(rename = "ArXiv")]
    arxiv: Option<String>,
}

impl S2ExternalIds {
    /// Prefer a DOI (full multi-source enrichment), then PMID, then arXiv ID
    fn best_identifier(self) -> Option<(IdentifierKind, String)> {
        self.doi
            .map(|id| (IdentifierKind::Doi, id))
            .or_else(|| self.pubmed.map(|id| (IdentifierKind::Pmid, id)))
            .or_else(|| self.arxiv.map(|id| (IdentifierKind::Arxiv, id)))
    }
}

#[derive(Debug, Deserialize)]
struct S2SearchResponse {
    #[serde(default)]
    data: Vec<S2SearchHit>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct S2SearchHit {
    external_ids: Option<S2ExternalIds>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const PAPER_JSON: &str = r#"{
      "paperId": "204e3073870fae3d05bcbc2f6a8e263d9b72e776",
      "externalIds": {"ArXiv": "1706.03762", "DOI": "10.48550/arXiv.1706.03762"},
      "title": "Attention is All you Need",
      "abstract": null,
      "venue": "Neural Information Processing Systems",
      "year": 2017,
      "journal": {"name": "", "pages": "5998-6008", "volume": "30"},
      "authors": [
        {"authorId": "40348417", "name": "Ashish Vaswani"},
        {"authorId": "1846258", "name": "Noam M. Shazeer"}
      ]
    }"#;

    #[tokio::test]
    async fn test_lookup_by_arxiv() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/paper/ARXIV:1706.03762")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(PAPER_JSON)
            .create_async()
            .await;

        let source = SemanticScholarSource::new()
            .unwrap()
            .with_base_url(&server.url());
        let reference = source.lookup_by_arxiv("1706.03762").await.unwrap();

        assert_eq!(reference.year, Some(2017));
        assert_eq!(reference.r#abstract, None);
        assert_eq!(
            reference.journal.as_deref(),
            Some("Neural Information Processing Systems")
        );
        assert_eq!(reference.volume, Some(FieldValue::Int(30)));
        assert_eq!(reference.pages, PageRange::parse("5998-6008"));
        assert_eq!(
            reference.authors.unwrap()[1],
            Person::new("Noam M.", "Shazeer")
        );
    }

    #[tokio::test]
    async fn test_lookup_sends_api_key() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/paper/PMID:36696673")
            .match_query(Matcher::Any)
            .match_header("x-api-key", "secret")
            .with_status(200)
            .with_body(PAPER_JSON)
            .create_async()
            .await;

        let source = SemanticScholarSource::new()
            .unwrap()
            .with_base_url(&server.url())
            .with_api_key(Some("secret".to_string()));
        source.lookup_by_pmid("36696673").await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_search_prefers_doi() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/paper/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"total": 1, "data": [{"paperId": "x", "externalIds": {"ArXiv": "1706.03762", "DOI": "10.48550/arXiv.1706.03762"}}]}"#,
            )
            .create_async()
            .await;

        let source = SemanticScholarSource::new()
            .unwrap()
            .with_base_url(&server.url());
        let hit = source
            .search_by_title("Attention is all you need")
            .await
            .unwrap();

        assert_eq!(
            hit,
            (IdentifierKind::Doi, "10.48550/arXiv.1706.03762".to_string())
        );
    }

    #[test]
    fn test_best_identifier_fallbacks() {
        let ids = S2ExternalIds {
            doi: None,
            pubmed: Some("36696673".into()),
            arxiv: Some("1706.03762".into()),
        };
        assert_eq!(
            ids.best_identifier(),
            Some((IdentifierKind::Pmid, "36696673".to_string()))
        );

        let ids = S2ExternalIds {
            doi: None,
            pubmed: None,
            arxiv: None,
        };
        assert_eq!(ids.best_identifier(), None);
    }
}
