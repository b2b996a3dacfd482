//! CrossRef source implementation.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use crate::models::{
    EntryType, FieldValue, IdentifierKind, PageRange, Person, Reference, ReferenceBuilder,
};
use crate::sources::{Source, SourceCapabilities, SourceError};
use crate::utils::{strip_markup, HttpClient};

const CROSSREF_API_BASE: &str = "https://api.crossref.org";

/// CrossRef source
///
/// Uses the CrossRef REST API for DOI metadata and bibliographic title search.
#[derive(Debug, Clone)]
pub struct CrossRefSource {
    client: Arc<HttpClient>,
    base_url: String,
    mailto: Option<String>,
}

impl CrossRefSource {
    pub fn new() -> Result<Self, SourceError> {
        Ok(Self::with_client(Arc::new(HttpClient::new()?)))
    }

    /// Create with a custom HTTP client
    pub fn with_client(client: Arc<HttpClient>) -> Self {
        Self {
            client,
            base_url: CROSSREF_API_BASE.to_string(),
            mailto: None,
        }
    }

    /// Point at another API host (for testing)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Join the polite pool with a contact address
    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.mailto = email;
        self
    }

    fn params<'a>(&'a self, extra: &[(&'a str, &'a str)]) -> Vec<(&'a str, &'a str)> {
        let mut params = extra.to_vec();
        if let Some(mailto) = &self.mailto {
            params.push(("mailto", mailto.as_str()));
        }
        params
    }
}

#[async_trait]
impl Source for CrossRefSource {
    fn id(&self) -> &str {
        "crossref"
    }

    fn name(&self) -> &str {
        "CrossRef"
    }

    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::DOI_LOOKUP | SourceCapabilities::TITLE_SEARCH
    }

    async fn lookup_by_doi(&self, doi: &str) -> Result<Reference, SourceError> {
        let url = format!("{}/works/{}", self.base_url, doi);
        let response: CRWorkResponse = self
            .client
            .get_json(&url, &self.params(&[]), &[])
            .await?
            .ok_or_else(|| SourceError::NotFound(format!("DOI {}", doi)))?;

        Ok(work_to_reference(response.message, doi))
    }

    async fn search_by_title(
        &self,
        title: &str,
    ) -> Result<(IdentifierKind, String), SourceError> {
        let url = format!("{}/works", self.base_url);
        let params = self.params(&[
            ("query.bibliographic", title),
            ("rows", "1"),
            ("select", "DOI,title"),
        ]);
        let response: CRSearchResponse = self
            .client
            .get_json(&url, &params, &[])
            .await?
            .ok_or_else(|| SourceError::NotFound(title.to_string()))?;

        response
            .message
            .items
            .into_iter()
            .find_map(|item| item.doi)
            .map(|doi| (IdentifierKind::Doi, doi))
            .ok_or_else(|| SourceError::NotFound(title.to_string()))
    }
}

/// Map a CrossRef work onto a reference; `doi` is the DOI that was asked for
fn work_to_reference(work: CRWork, doi: &str) -> Reference {
    let mut builder = ReferenceBuilder::new().doi(doi);

    if let Some(title) = work.title.into_iter().next() {
        builder = builder.title(title);
    }

    if let Some(authors) = work.author {
        let authors = authors
            .into_iter()
            .map(|a| match a.name {
                Some(name) => Person::new("", name),
                None => Person {
                    first: a.given,
                    last: a.family,
                    suffix: a.suffix,
                },
            })
            .collect();
        builder = builder.authors(authors);
    }

    if let Some(volume) = work.volume.as_deref().and_then(FieldValue::parse) {
        builder = builder.volume(volume);
    }
    if let Some(issue) = work.issue.as_deref().and_then(FieldValue::parse) {
        builder = builder.issue(issue);
    }

    if let Some(pages) = work
        .page
        .or(work.article_number)
        .as_deref()
        .and_then(PageRange::parse)
    {
        builder = builder.pages(pages);
    }

    if let Some(abstract_text) = work.r#abstract {
        builder = builder.abstract_text(abstract_text);
    }

    if let Some(year) = work
        .published_print
        .as_ref()
        .and_then(CRDate::year)
        .or_else(|| work.published_online.as_ref().and_then(CRDate::year))
    {
        builder = builder.year(year);
    }

    let journal = work
        .short_container_title
        .into_iter()
        .chain(work.container_title)
        .find(|j| !j.trim().is_empty());
    if let Some(journal) = journal {
        // Container titles are sometimes HTML escaped ("Science &amp; Technology")
        builder = builder.journal(strip_markup(&journal));
    }

    builder
        .entry_type(entry_type(work.work_type.as_deref()))
        .build()
}

fn entry_type(work_type: Option<&str>) -> EntryType {
    match work_type {
        Some(
            "book-series" | "book-set" | "book-chapter" | "book-section" | "book-part"
            | "book-track",
        ) => EntryType::InBook,
        Some("proceedings-article") => EntryType::InProceedings,
        Some("proceedings") => EntryType::Proceedings,
        _ => EntryType::Article,
    }
}

// ===== CrossRef API Types =====

#[derive(Debug, Deserialize)]
struct CRWorkResponse {
    message: CRWork,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct CRWork {
    #[serde(default)]
    title: Vec<String>,
    author: Option<Vec<CRAuthor>>,
    volume: Option<String>,
    issue: Option<String>,
    page: Option<String>,
    article_number: Option<String>,
    r#abstract: Option<String>,
    published_print: Option<CRDate>,
    published_online: Option<CRDate>,
    #[serde(default)]
    short_container_title: Vec<String>,
    #[serde(default)]
    container_title: Vec<String>,
    #[serde(rename = "type")]
    work_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CRAuthor {
    given: Option<String>,
    family: Option<String>,
    suffix: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CRDate {
    #[serde(rename = "date-parts", default)]
    date_parts: Vec<Vec<Option<i32>>>,
}

impl CRDate {
    fn year(&self) -> Option<i32> {
        self.date_parts.first()?.first().copied().flatten()
    }
}

#[derive(Debug, Deserialize)]
struct CRSearchResponse {
    message: CRSearchMessage,
}

#[derive(Debug, Deserialize)]
struct CRSearchMessage {
    #[serde(default)]
    items: Vec<CRSearchItem>,
}

#[derive(Debug, Deserialize)]
struct CRSearchItem {
    #[serde(rename = "DOI")]
    doi: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const WORK_JSON: &str = r#"{
      "status": "ok",
      "message": {
        "DOI": "10.1016/j.cpc.2020.107206",
        "type": "journal-article",
        "title": ["DP-GEN: A concurrent learning platform for the generation of reliable deep learning based potential energy models"],
        "author": [
          {"given": "Yuzhi", "family": "Zhang", "sequence": "first"},
          {"given": "Weinan", "family": "E", "sequence": "additional"}
        ],
        "volume": "253",
        "article-number": "107206",
        "published-print": {"date-parts": [[2020, 8]]},
        "published-online": {"date-parts": [[2020, 3, 2]]},
        "container-title": ["Computer Physics Communications"],
        "short-container-title": ["Computer Physics Communications"]
      }
    }"#;

    #[tokio::test]
    async fn test_lookup_by_doi() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/works/10.1016/j.cpc.2020.107206")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(WORK_JSON)
            .create_async()
            .await;

        let source = CrossRefSource::new().unwrap().with_base_url(&server.url());
        let reference = source
            .lookup_by_doi("10.1016/j.cpc.2020.107206")
            .await
            .unwrap();

        assert_eq!(reference.year, Some(2020));
        assert_eq!(reference.volume, Some(FieldValue::Int(253)));
        assert_eq!(
            reference.pages,
            Some(PageRange::Single(FieldValue::Int(107206)))
        );
        assert_eq!(
            reference.journal.as_deref(),
            Some("Computer Physics Communications")
        );
        assert_eq!(reference.issue, None);
        assert_eq!(reference.entry_type, Some(EntryType::Article));
        assert_eq!(
            reference.authors.unwrap()[1],
            Person::new("Weinan", "E")
        );
    }

    #[tokio::test]
    async fn test_lookup_missing_doi() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/works/10.1/missing")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body("Resource not found.")
            .create_async()
            .await;

        let source = CrossRefSource::new().unwrap().with_base_url(&server.url());
        let result = source.lookup_by_doi("10.1/missing").await;

        assert!(matches!(result, Err(SourceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_search_by_title() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/works")
            .match_query(Matcher::UrlEncoded(
                "query.bibliographic".into(),
                "Attention is all you need".into(),
            ))
            .with_status(200)
            .with_body(r#"{"message":{"items":[{"DOI":"10.48550/arXiv.1706.03762"}]}}"#)
            .create_async()
            .await;

        let source = CrossRefSource::new().unwrap().with_base_url(&server.url());
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
    fn test_entry_type_mapping() {
        assert_eq!(entry_type(Some("book-chapter")), EntryType::InBook);
        assert_eq!(
            entry_type(Some("proceedings-article")),
            EntryType::InProceedings
        );
        assert_eq!(entry_type(Some("proceedings")), EntryType::Proceedings);
        assert_eq!(entry_type(Some("journal-article")), EntryType::Article);
        assert_eq!(entry_type(None), EntryType::Article);
    }

    #[test]
    fn test_journal_is_unescaped() {
        let work: CRWork = serde_json::from_str(
            r#"{"short-container-title": ["Journal of Materials Science &amp; Technology"]}"#,
        )
        .unwrap();
        let reference = work_to_reference(work, "10.1016/j.jmst.2023.09.059");
        assert_eq!(
            reference.journal.as_deref(),
            Some("Journal of Materials Science & Technology")
        );
    }
}
