//! ChemRxiv source implementation using the Engage public API.

use async_trait::async_trait;
use chrono::{DateTime, Datelike};
use serde::Deserialize;
use std::sync::Arc;

use crate::models::{Person, Reference, ReferenceBuilder};
use crate::sources::{Source, SourceCapabilities, SourceError};
use crate::utils::HttpClient;

const CHEMRXIV_API_BASE: &str = "https://chemrxiv.org/engage/chemrxiv/public-api/v1";

/// DOI prefix of every ChemRxiv preprint
pub const CHEMRXIV_DOI_PREFIX: &str = "10.26434/chemrxiv";

/// ChemRxiv source
#[derive(Debug, Clone)]
pub struct ChemRxivSource {
    client: Arc<HttpClient>,
    base_url: String,
}

impl ChemRxivSource {
    pub fn new() -> Result<Self, SourceError> {
        Ok(Self::with_client(Arc::new(HttpClient::new()?)))
    }

    /// Create with a custom HTTP client
    pub fn with_client(client: Arc<HttpClient>) -> Self {
        Self {
            client,
            base_url: CHEMRXIV_API_BASE.to_string(),
        }
    }

    /// Point at another API host (for testing)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl Source for ChemRxivSource {
    fn id(&self) -> &str {
        "chemrxiv"
    }

    fn name(&self) -> &str {
        "ChemRxiv"
    }

    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::DOI_LOOKUP
    }

    async fn lookup_by_doi(&self, doi: &str) -> Result<Reference, SourceError> {
        let is_chemrxiv = doi
            .get(..CHEMRXIV_DOI_PREFIX.len())
            .is_some_and(|p| p.eq_ignore_ascii_case(CHEMRXIV_DOI_PREFIX));
        if !is_chemrxiv {
            return Err(SourceError::NotFound(format!("{} is not a ChemRxiv DOI", doi)));
        }

        let url = format!("{}/items/doi/{}", self.base_url, doi);
        let item: ChemRxivItem = self
            .client
            .get_json(&url, &[], &[])
            .await?
            .ok_or_else(|| SourceError::NotFound(format!("DOI {}", doi)))?;

        Ok(item_to_reference(item, doi))
    }
}

fn item_to_reference(item: ChemRxivItem, doi: &str) -> Reference {
    let mut builder = ReferenceBuilder::new().journal("ChemRxiv").doi(doi);

    if let Some(title) = item.title {
        builder = builder.title(title);
    }
    if let Some(abstract_text) = item.r#abstract {
        builder = builder.abstract_text(abstract_text);
    }

    let authors = item
        .authors
        .into_iter()
        .map(|a| Person {
            first: a.first_name,
            last: a.last_name,
            suffix: None,
        })
        .collect();
    builder = builder.authors(authors);

    if let Some(year) = item.published_date.as_deref().and_then(published_year) {
        builder = builder.year(year);
    }

    builder.build()
}

fn published_year(date: &str) -> Option<i32> {
    match DateTime::parse_from_rfc3339(date) {
        Ok(parsed) => Some(parsed.year()),
        Err(_) => date.get(..4).and_then(|y| y.parse().ok()),
    }
}

// ===== ChemRxiv API Types =====

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChemRxivItem {
    title: Option<String>,
    r#abstract: Option<String>,
    #[serde(default)]
    authors: Vec<ChemRxivAuthor>,
    published_date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChemRxivAuthor {
    first_name: Option<String>,
    last_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ITEM_JSON: &str = r#"{
      "id": "66a1",
      "doi": "10.26434/chemrxiv-2024-sq8nh",
      "title": "A Preprint About Molecules",
      "abstract": "We study molecules.",
      "authors": [
        {"firstName": "Jinzhe", "lastName": "Zeng", "institutions": []}
      ],
      "publishedDate": "2024-05-13T09:20:43.112Z"
    }"#;

    #[tokio::test]
    async fn test_lookup_by_doi() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/items/doi/10.26434/chemrxiv-2024-sq8nh")
            .with_status(200)
            .with_body(ITEM_JSON)
            .create_async()
            .await;

        let source = ChemRxivSource::new().unwrap().with_base_url(&server.url());
        let reference = source
            .lookup_by_doi("10.26434/chemrxiv-2024-sq8nh")
            .await
            .unwrap();

        assert_eq!(reference.journal.as_deref(), Some("ChemRxiv"));
        assert_eq!(reference.year, Some(2024));
        assert_eq!(reference.title.as_deref(), Some("A Preprint About Molecules"));
        assert_eq!(reference.authors.unwrap()[0], Person::new("Jinzhe", "Zeng"));
    }

    #[tokio::test]
    async fn test_other_prefix_is_not_queried() {
        let source = ChemRxivSource::new()
            .unwrap()
            .with_base_url("http://127.0.0.1:9");
        let result = source.lookup_by_doi("10.1016/j.cpc.2020.107206").await;
        assert!(matches!(result, Err(SourceError::NotFound(_))));
    }

    #[test]
    fn test_published_year() {
        assert_eq!(published_year("2024-05-13T09:20:43.112Z"), Some(2024));
        assert_eq!(published_year("2023-01-02"), Some(2023));
        assert_eq!(published_year(""), None);
    }
}
