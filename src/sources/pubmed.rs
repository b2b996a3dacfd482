//! PubMed source using the NCBI E-utilities and the PMC ID converter.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use super::xml::Element;
use crate::models::{FieldValue, PageRange, Person, Reference, ReferenceBuilder};
use crate::sources::{Source, SourceCapabilities, SourceError};
use crate::utils::HttpClient;

const NCBI_BASE_URL: &str = "https://www.ncbi.nlm.nih.gov";
const EUTILS_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov";

/// Value of the `tool` parameter NCBI asks clients to send
const NCBI_TOOL: &str = env!("CARGO_PKG_NAME");

/// PubMed source
///
/// DOIs are mapped to PMIDs through the PMC ID converter, falling back to an
/// E-utilities search. Search hits are not trusted: a record fetched for a
/// DOI is kept only when its own DOI matches.
#[derive(Debug, Clone)]
pub struct PubMedSource {
    client: Arc<HttpClient>,
    ncbi_base: String,
    eutils_base: String,
    email: Option<String>,
}

impl PubMedSource {
    /// Create a new PubMed source
    pub fn new() -> Result<Self, SourceError> {
        Ok(Self::with_client(Arc::new(HttpClient::new()?)))
    }

    /// Create with a custom HTTP client
    pub fn with_client(client: Arc<HttpClient>) -> Self {
        Self {
            client,
            ncbi_base: NCBI_BASE_URL.to_string(),
            eutils_base: EUTILS_BASE_URL.to_string(),
            email: None,
        }
    }

    /// Send both NCBI services to `base_url` (for testing)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        self.ncbi_base = base.to_string();
        self.eutils_base = base.to_string();
        self
    }

    /// Contact address sent with every request
    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.email = email;
        self
    }

    fn params<'a>(&'a self, extra: &[(&'a str, &'a str)]) -> Vec<(&'a str, &'a str)> {
        let mut params = vec![("tool", NCBI_TOOL)];
        if let Some(email) = &self.email {
            params.push(("email", email.as_str()));
        }
        params.extend_from_slice(extra);
        params
    }

    /// DOI to PMID through the PMC ID converter
    async fn doi_to_pmid_pmc(&self, doi: &str) -> Result<Option<String>, SourceError> {
        let url = format!("{}/pmc/utils/idconv/v1.0/", self.ncbi_base);
        let params = self.params(&[("ids", doi), ("format", "json")]);
        let response: Option<IdConvResponse> = self.client.get_json(&url, &params, &[]).await?;

        Ok(response.and_then(|r| {
            if r.status.as_deref() == Some("error") {
                return None;
            }
            r.records.into_iter().next().and_then(|rec| match rec.pmid? {
                serde_json::Value::String(pmid) => Some(pmid),
                serde_json::Value::Number(pmid) => Some(pmid.to_string()),
                _ => None,
            })
        }))
    }

    /// DOI to PMID through an E-utilities search; the hit may be wrong
    async fn doi_to_pmid_search(&self, doi: &str) -> Result<Option<String>, SourceError> {
        let url = format!("{}/entrez/eutils/esearch.fcgi", self.eutils_base);
        let params = self.params(&[
            ("db", "pubmed"),
            ("term", doi),
            ("retmode", "json"),
            ("retmax", "1"),
        ]);
        let response: Option<ESearchResponse> = self.client.get_json(&url, &params, &[]).await?;

        Ok(response.and_then(|r| r.esearchresult.idlist.into_iter().next()))
    }

    async fn fetch(&self, pmid: &str) -> Result<Reference, SourceError> {
        let url = format!("{}/entrez/eutils/efetch.fcgi", self.eutils_base);
        let params = self.params(&[("db", "pubmed"), ("id", pmid), ("retmode", "xml")]);
        let xml = self
            .client
            .get_text(&url, &params, &[])
            .await?
            .ok_or_else(|| SourceError::NotFound(format!("PMID {}", pmid)))?;

        parse_pubmed_article(&xml)?.ok_or_else(|| SourceError::NotFound(format!("PMID {}", pmid)))
    }
}

#[async_trait]
impl Source for PubMedSource {
    fn id(&self) -> &str {
        "pubmed"
    }

    fn name(&self) -> &str {
        "PubMed"
    }

    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::DOI_LOOKUP | SourceCapabilities::PMID_LOOKUP
    }

    async fn lookup_by_doi(&self, doi: &str) -> Result<Reference, SourceError> {
        let pmid = match self.doi_to_pmid_pmc(doi).await? {
            Some(pmid) => Some(pmid),
            None => self.doi_to_pmid_search(doi).await?,
        };
        let pmid = pmid.ok_or_else(|| SourceError::NotFound(format!("DOI {}", doi)))?;

        let reference = self.fetch(&pmid).await?;
        let matches = reference
            .doi
            .as_deref()
            .is_some_and(|fetched| fetched.eq_ignore_ascii_case(doi));
        if !matches {
            tracing::debug!(
                "PMID {} has DOI {:?}, expected {}; discarding",
                pmid,
                reference.doi,
                doi
            );
            return Err(SourceError::NotFound(format!("DOI {}", doi)));
        }
        Ok(reference)
    }

    async fn lookup_by_pmid(&self, pmid: &str) -> Result<Reference, SourceError> {
        self.fetch(pmid).await
    }
}

/// Parse an efetch document into a reference; `None` when it holds no article
pub(crate) fn parse_pubmed_article(xml: &str) -> Result<Option<Reference>, SourceError> {
    let root = Element::parse(xml)?;
    let Some(pubmed) = root.find("PubmedArticle") else {
        return Ok(None);
    };
    let Some(article) = pubmed.find("MedlineCitation/Article") else {
        return Ok(None);
    };

    let mut builder = ReferenceBuilder::new();

    let authors: Vec<Person> = article
        .find_all("AuthorList/Author")
        .into_iter()
        .map(parse_author)
        .collect();
    builder = builder.authors(authors);

    if let Some(title) = article.find_text("ArticleTitle") {
        builder = builder.title(title.trim_end_matches('.'));
    }

    if let Some(journal) = article.find_text("Journal/Title") {
        builder = builder.journal(strip_journal_acronym(&journal));
    }

    let issue = article.find("Journal/JournalIssue");
    if let Some(year) = issue.and_then(parse_year) {
        builder = builder.year(year);
    }
    if let Some(volume) = issue
        .and_then(|i| i.find_text("Volume"))
        .and_then(|v| FieldValue::parse(&v))
    {
        builder = builder.volume(volume);
    }
    if let Some(number) = issue
        .and_then(|i| i.find_text("Issue"))
        .and_then(|v| FieldValue::parse(&v))
    {
        builder = builder.issue(number);
    }

    let pages = article
        .find_text("Pagination/MedlinePgn")
        .and_then(|p| PageRange::parse(&p))
        .or_else(|| {
            article
                .find_all("ELocationID")
                .into_iter()
                .find(|e| e.attr("EIdType") == Some("pii"))
                .and_then(|e| FieldValue::parse(&e.text()))
                .map(PageRange::Single)
        });
    if let Some(pages) = pages {
        builder = builder.pages(pages);
    }

    let sections: Vec<String> = article
        .find_all("Abstract/AbstractText")
        .into_iter()
        .map(Element::text)
        .filter(|t| !t.is_empty())
        .collect();
    if !sections.is_empty() {
        builder = builder.abstract_text(sections.join(" "));
    }

    if let Some(doi) = pubmed
        .find_all("PubmedData/ArticleIdList/ArticleId")
        .into_iter()
        .find(|e| e.attr("IdType") == Some("doi"))
    {
        builder = builder.doi(doi.text());
    }

    Ok(Some(builder.build()))
}

fn parse_author(author: &Element) -> Person {
    if let Some(collective) = author.find_text("CollectiveName") {
        return Person::new("", collective);
    }
    Person {
        first: author.find_text("ForeName").map(|f| add_initial_periods(&f)),
        last: author.find_text("LastName"),
        suffix: author.find_text("Suffix").filter(|s| !s.is_empty()),
    }
}

/// "Darrin M" -> "Darrin M."
fn add_initial_periods(first: &str) -> String {
    first
        .split_whitespace()
        .map(|part| {
            if part.chars().count() == 1 {
                format!("{}.", part)
            } else {
                part.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// "Physical chemistry chemical physics : PCCP" -> "Physical chemistry chemical physics"
fn strip_journal_acronym(journal: &str) -> &str {
    match journal.rsplit_once(" : ") {
        Some((name, acronym))
            if !acronym.is_empty()
                && acronym
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) =>
        {
            name
        }
        _ => journal,
    }
}

fn parse_year(issue: &Element) -> Option<i32> {
    if let Some(year) = issue.find_text("PubDate/Year") {
        return year.parse().ok();
    }
    issue
        .find_text("PubDate/MedlineDate")
        .and_then(|d| d.get(..4).and_then(|y| y.parse().ok()))
}

// ===== NCBI API Types =====

#[derive(Debug, Deserialize)]
struct IdConvResponse {
    status: Option<String>,
    #[serde(default)]
    records: Vec<IdConvRecord>,
}

#[derive(Debug, Deserialize)]
struct IdConvRecord {
    /// Sent as a string or a number depending on the service version
    pmid: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ESearchResponse {
    esearchresult: ESearchResult,
}

#[derive(Debug, Deserialize)]
struct ESearchResult {
    #[serde(default)]
    idlist: Vec<String>,
}
