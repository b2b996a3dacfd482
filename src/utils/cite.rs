//! Citation rendering: BibTeX, markdown and plain text.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::abbrev::Abbreviator;
use super::key::{derive_key, journal_abbreviation, CitationKey};
use super::latex::{plain_text, to_latex};
use super::wrap::wrap;
use crate::error::CitationError;
use crate::models::{FieldValue, PageRange, Person, Reference};

/// Default column width of wrapped BibTeX values
pub const DEFAULT_WRAP_WIDTH: usize = 70;

/// Column where wrapped BibTeX values continue
const CONTINUATION_INDENT: usize = 13;

/// Output format of rendered citations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CitationFormat {
    #[default]
    Bibtex,
    Markdown,
    Text,
}

impl CitationFormat {
    /// File extension for derived output filenames
    pub fn extension(&self) -> &'static str {
        match self {
            CitationFormat::Bibtex => "bib",
            CitationFormat::Markdown => "md",
            CitationFormat::Text => "txt",
        }
    }
}

impl fmt::Display for CitationFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CitationFormat::Bibtex => write!(f, "bibtex"),
            CitationFormat::Markdown => write!(f, "markdown"),
            CitationFormat::Text => write!(f, "text"),
        }
    }
}

impl FromStr for CitationFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bibtex" | "bib" => Ok(CitationFormat::Bibtex),
            "markdown" | "md" => Ok(CitationFormat::Markdown),
            "text" | "txt" => Ok(CitationFormat::Text),
            other => Err(format!("Unknown citation format: {}", other)),
        }
    }
}

/// Renders references in any [`CitationFormat`]
#[derive(Debug, Clone)]
pub struct CitationRenderer {
    abbreviator: Arc<Abbreviator>,
    wrap_width: usize,
}

impl CitationRenderer {
    pub fn new(abbreviator: Arc<Abbreviator>) -> Self {
        Self {
            abbreviator,
            wrap_width: DEFAULT_WRAP_WIDTH,
        }
    }

    /// Set the column width of wrapped BibTeX values
    pub fn with_wrap_width(mut self, wrap_width: usize) -> Self {
        self.wrap_width = wrap_width;
        self
    }

    /// Citation key of a reference
    pub fn key(&self, reference: &Reference) -> Result<CitationKey, CitationError> {
        derive_key(reference, &self.abbreviator)
    }

    /// Render one reference; the result ends with a newline
    pub fn render(
        &self,
        reference: &Reference,
        format: CitationFormat,
    ) -> Result<String, CitationError> {
        match format {
            CitationFormat::Bibtex => {
                let key = self.key(reference)?;
                format_bibtex(reference, &key, self.wrap_width)
            }
            CitationFormat::Markdown => {
                let journal = journal_abbreviation(reference, &self.abbreviator);
                format_markdown(reference, journal.as_deref())
            }
            CitationFormat::Text => {
                let journal = journal_abbreviation(reference, &self.abbreviator);
                format_text(reference, journal.as_deref())
            }
        }
    }

    /// Render several references separated by blank lines
    pub fn render_all(
        &self,
        references: &[Reference],
        format: CitationFormat,
    ) -> Result<String, CitationError> {
        let entries = references
            .iter()
            .map(|reference| self.render(reference, format))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries.join("\n"))
    }
}

/// Render a BibTeX entry under `key`.
///
/// Fields appear in a fixed order and absent fields are omitted. Numbers are
/// written bare; everything else is LaTeX-escaped, wrapped and braced.
pub fn format_bibtex(
    reference: &Reference,
    key: &CitationKey,
    wrap_width: usize,
) -> Result<String, CitationError> {
    let authors = match &reference.authors {
        Some(authors) => Some(
            authors
                .iter()
                .map(Person::bibtex_name)
                .collect::<Result<Vec<_>, _>>()?
                .join(" and "),
        ),
        None => None,
    };

    let mut lines = vec![format!(
        "@{}{{{},",
        reference.entry_type().bibtex_name(),
        key.key
    )];
    let mut field = |name: &str, value: Option<String>| {
        let Some(value) = value else {
            return;
        };
        let Some(value) = bibtex_value(name, &value, wrap_width) else {
            return;
        };
        lines.push(format!("    {:<11}{},", format!("{} =", name), value));
    };

    field("author", authors);
    field("title", reference.title.clone());
    field("journal", Some(key.journal_abbr.clone()));
    field("year", reference.year.map(|y| y.to_string()));
    field("volume", reference.volume.as_ref().map(FieldValue::to_string));
    field("number", reference.issue.as_ref().map(FieldValue::to_string));
    field("pages", reference.pages.as_ref().map(PageRange::to_string));
    field("doi", reference.doi.clone());
    field("abstract", reference.r#abstract.clone());

    lines.push("}\n".to_string());
    Ok(lines.join("\n"))
}

fn bibtex_value(name: &str, value: &str, wrap_width: usize) -> Option<String> {
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
        return Some(value.to_string());
    }

    let mut escaped = to_latex(value);
    if name == "author" {
        // Braces around multi-word last names are structural
        escaped = escaped.replace("{\\{}", "{").replace("{\\}}", "}");
    }
    let lines = wrap(&escaped, wrap_width);
    if lines.is_empty() {
        return None;
    }

    let wrapped = lines.join(&format!("\n{}", " ".repeat(CONTINUATION_INDENT)));
    if name == "title" {
        Some(format!("{{{{{}}}}}", wrapped))
    } else {
        Some(format!("{{{}}}", wrapped))
    }
}

/// `Authors. **Title**. *Journal* **Year**, *Volume* (Issue), Pages. [doi](https://doi.org/doi)`
pub fn format_markdown(
    reference: &Reference,
    journal: Option<&str>,
) -> Result<String, CitationError> {
    let parts = PlainParts::new(reference, journal, "\u{2013}")?;

    let mut segments = Vec::new();
    if let Some(authors) = parts.authors {
        segments.push(sentence(&authors));
    }
    if let Some(title) = parts.title {
        segments.push(format!("**{}**.", title.trim_end_matches('.')));
    }

    let source = [
        parts.journal.map(|j| format!("*{}*", j)),
        parts.year.map(|y| format!("**{}**", y)),
    ];
    let details = [
        volume_issue(parts.volume.map(|v| format!("*{}*", v)), parts.issue),
        parts.pages,
    ];
    if let Some(publication) = publication(&source, &details) {
        segments.push(publication);
    }
    if let Some(doi) = parts.doi {
        segments.push(format!("[{}](https://doi.org/{})", doi, doi));
    }

    Ok(format!("{}\n", segments.join(" ")))
}

/// `Authors. Title. Journal Year, Volume (Issue), Pages. https://doi.org/doi`
pub fn format_text(reference: &Reference, journal: Option<&str>) -> Result<String, CitationError> {
    let parts = PlainParts::new(reference, journal, "-")?;

    let mut segments = Vec::new();
    if let Some(authors) = parts.authors {
        segments.push(sentence(&authors));
    }
    if let Some(title) = parts.title {
        segments.push(sentence(&title));
    }

    let source = [parts.journal, parts.year.map(|y| y.to_string())];
    let details = [volume_issue(parts.volume, parts.issue), parts.pages];
    if let Some(publication) = publication(&source, &details) {
        segments.push(publication);
    }
    if let Some(doi) = parts.doi {
        segments.push(format!("https://doi.org/{}", doi));
    }

    Ok(format!("{}\n", segments.join(" ")))
}

/// Reference fields as plain, markup-free strings
struct PlainParts {
    authors: Option<String>,
    title: Option<String>,
    journal: Option<String>,
    year: Option<i32>,
    volume: Option<String>,
    issue: Option<String>,
    pages: Option<String>,
    doi: Option<String>,
}

impl PlainParts {
    fn new(
        reference: &Reference,
        journal: Option<&str>,
        range_separator: &str,
    ) -> Result<Self, CitationError> {
        let authors = match &reference.authors {
            Some(authors) => Some(
                authors
                    .iter()
                    .map(Person::plain_name)
                    .collect::<Result<Vec<_>, _>>()?
                    .join(", "),
            ),
            None => None,
        };
        let pages = reference.pages.as_ref().map(|pages| match pages {
            PageRange::Single(value) => value.to_string(),
            PageRange::Span(start, end) => format!("{}{}{}", start, range_separator, end),
        });

        Ok(Self {
            authors,
            title: reference.title.as_deref().map(plain_text),
            journal: journal.map(plain_text),
            year: reference.year,
            volume: reference.volume.as_ref().map(FieldValue::to_string),
            issue: reference.issue.as_ref().map(FieldValue::to_string),
            pages,
            doi: reference.doi.clone(),
        })
    }
}

fn sentence(text: &str) -> String {
    if text.ends_with('.') {
        text.to_string()
    } else {
        format!("{}.", text)
    }
}

fn volume_issue(volume: Option<String>, issue: Option<String>) -> Option<String> {
    match (volume, issue) {
        (Some(volume), Some(issue)) => Some(format!("{} ({})", volume, issue)),
        (Some(volume), None) => Some(volume),
        (None, Some(issue)) => Some(format!("({})", issue)),
        (None, None) => None,
    }
}

/// "Journal Year, Volume (Issue), Pages." from whichever parts are known
fn publication(source: &[Option<String>], details: &[Option<String>]) -> Option<String> {
    let source = source.iter().flatten().cloned().collect::<Vec<_>>().join(" ");
    let mut pieces: Vec<String> = details.iter().flatten().cloned().collect();
    if !source.is_empty() {
        pieces.insert(0, source);
    }
    if pieces.is_empty() {
        None
    } else {
        Some(format!("{}.", pieces.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReferenceBuilder;

    fn dpgen() -> Reference {
        ReferenceBuilder::new()
            .authors(vec![
                Person::new("Yuzhi", "Zhang"),
                Person::new("Haidi", "Wang"),
                Person::new("Weijie", "Chen"),
                Person::new("Jinzhe", "Zeng"),
                Person::new("Linfeng", "Zhang"),
                Person::new("Han", "Wang"),
                Person::new("Weinan", "E"),
            ])
            .title("DP-GEN: A concurrent learning platform for the generation of reliable deep learning based potential energy models")
            .journal("Computer Physics Communications")
            .year(2020)
            .volume(253)
            .pages(PageRange::Single(FieldValue::Int(107206)))
            .doi("10.1016/j.cpc.2020.107206")
            .build()
    }

    fn renderer() -> CitationRenderer {
        CitationRenderer::new(Arc::new(Abbreviator::new()))
    }

    const DPGEN_BIBTEX: &str = r"@Article{Zhang_ComputPhysCommun_2020_v253_p107206,
    author =   {Yuzhi Zhang and Haidi Wang and Weijie Chen and Jinzhe Zeng and Linfeng
             Zhang and Han Wang and Weinan E},
    title =    {{DP-GEN: A concurrent learning platform for the generation of reliable
             deep learning based potential energy models}},
    journal =  {Comput. Phys. Commun.},
    year =     2020,
    volume =   253,
    pages =    107206,
    doi =      {10.1016/j.cpc.2020.107206},
}
";

    #[test]
    fn test_bibtex_entry() {
        let rendered = renderer().render(&dpgen(), CitationFormat::Bibtex).unwrap();
        assert_eq!(rendered, DPGEN_BIBTEX);
    }

    #[test]
    fn test_bibtex_is_reproducible() {
        let renderer = renderer();
        assert_eq!(
            renderer.render(&dpgen(), CitationFormat::Bibtex).unwrap(),
            renderer.render(&dpgen(), CitationFormat::Bibtex).unwrap()
        );
    }

    #[test]
    fn test_bibtex_author_braces_survive_escaping() {
        let reference = ReferenceBuilder::new()
            .authors(vec![
                Person::new("Ludwig", "van Beethoven"),
                Person::new("Martin", "Luther King").with_suffix("Jr."),
            ])
            .journal("Nature")
            .build();
        let rendered = renderer().render(&reference, CitationFormat::Bibtex).unwrap();
        assert!(rendered.contains(
            "    author =   {Ludwig {van Beethoven} and Martin {Luther King Jr.}},"
        ));
    }

    #[test]
    fn test_bibtex_escapes_and_wraps_title() {
        let reference = ReferenceBuilder::new()
            .authors(vec![Person::new("Jinzhe", "Zeng")])
            .title("QDπ: A Quantum Deep Potential Interaction Model for Drug Discovery")
            .journal("Journal of chemical theory and computation")
            .build();
        let rendered = renderer().render(&reference, CitationFormat::Bibtex).unwrap();
        assert!(rendered.contains(
            "    title =    {{QD{\\ensuremath{\\pi}}: A Quantum Deep Potential Interaction Model for\n             Drug Discovery}},"
        ));
    }

    #[test]
    fn test_bibtex_page_span_and_text_values() {
        let reference = ReferenceBuilder::new()
            .authors(vec![Person::new("A", "B")])
            .journal("Nature")
            .volume(FieldValue::Text("12A".into()))
            .issue(FieldValue::Text("007".into()))
            .pages(PageRange::Span(FieldValue::Int(1261), FieldValue::Int(1275)))
            .build();
        let rendered = renderer().render(&reference, CitationFormat::Bibtex).unwrap();
        assert!(rendered.contains("    volume =   {12A},\n"));
        assert!(rendered.contains("    number =   007,\n"));
        assert!(rendered.contains("    pages =    {1261--1275},\n"));
    }

    #[test]
    fn test_bibtex_strips_abstract_markup() {
        let reference = ReferenceBuilder::new()
            .authors(vec![Person::new("A", "B")])
            .journal("Nature")
            .abstract_text("<jats:p>Heat &amp; work</jats:p>")
            .build();
        let rendered = renderer().render(&reference, CitationFormat::Bibtex).unwrap();
        assert!(rendered.contains("    abstract = {Heat {\\&} work},\n"));
    }

    #[test]
    fn test_bibtex_entry_type() {
        let mut reference = dpgen();
        reference.entry_type = Some(crate::models::EntryType::InProceedings);
        let rendered = renderer().render(&reference, CitationFormat::Bibtex).unwrap();
        assert!(rendered.starts_with("@InProceedings{Zhang_"));
    }

    #[test]
    fn test_bibtex_requires_journal() {
        let mut reference = dpgen();
        reference.journal = None;
        assert_eq!(
            renderer().render(&reference, CitationFormat::Bibtex),
            Err(CitationError::MissingJournal)
        );
    }

    #[test]
    fn test_bibtex_rejects_incomplete_author() {
        let mut reference = dpgen();
        reference.authors = Some(vec![Person {
            first: None,
            last: Some("Zhang".into()),
            suffix: None,
        }]);
        assert!(matches!(
            renderer().render(&reference, CitationFormat::Bibtex),
            Err(CitationError::IncompleteAuthor { .. })
        ));
    }

    #[test]
    fn test_markdown() {
        let reference = ReferenceBuilder::new()
            .authors(vec![Person::new("Jinzhe", "Zeng"), Person::new("Darrin M.", "York")])
            .title("QDπ: A Quantum Deep Potential Interaction Model for Drug Discovery")
            .journal("Journal of chemical theory and computation")
            .year(2023)
            .volume(19)
            .issue(4)
            .pages(PageRange::Span(FieldValue::Int(1261), FieldValue::Int(1275)))
            .doi("10.1021/acs.jctc.2c01172")
            .build();
        let rendered = renderer().render(&reference, CitationFormat::Markdown).unwrap();
        assert_eq!(
            rendered,
            "Jinzhe Zeng, Darrin M. York. **QDπ: A Quantum Deep Potential Interaction Model for Drug Discovery**. \
             *J. Chem. Theory Comput.* **2023**, *19* (4), 1261\u{2013}1275. \
             [10.1021/acs.jctc.2c01172](https://doi.org/10.1021/acs.jctc.2c01172)\n"
        );
    }

    #[test]
    fn test_text() {
        let rendered = renderer().render(&dpgen(), CitationFormat::Text).unwrap();
        assert_eq!(
            rendered,
            "Yuzhi Zhang, Haidi Wang, Weijie Chen, Jinzhe Zeng, Linfeng Zhang, Han Wang, Weinan E. \
             DP-GEN: A concurrent learning platform for the generation of reliable deep learning based potential energy models. \
             Comput. Phys. Commun. 2020, 253, 107206. https://doi.org/10.1016/j.cpc.2020.107206\n"
        );
    }

    #[test]
    fn test_plain_formats_omit_missing_parts() {
        let reference = ReferenceBuilder::new().title("Untitled draft").build();
        assert_eq!(
            renderer().render(&reference, CitationFormat::Text).unwrap(),
            "Untitled draft.\n"
        );
        assert_eq!(
            renderer().render(&reference, CitationFormat::Markdown).unwrap(),
            "**Untitled draft**.\n"
        );
    }

    #[test]
    fn test_render_all_separates_entries() {
        let renderer = renderer();
        let rendered = renderer
            .render_all(&[dpgen(), dpgen()], CitationFormat::Bibtex)
            .unwrap();
        assert_eq!(rendered, format!("{}\n{}", DPGEN_BIBTEX, DPGEN_BIBTEX));
    }

    #[test]
    fn test_format_names() {
        assert_eq!("bibtex".parse::<CitationFormat>(), Ok(CitationFormat::Bibtex));
        assert_eq!("Markdown".parse::<CitationFormat>(), Ok(CitationFormat::Markdown));
        assert!("yaml".parse::<CitationFormat>().is_err());
        assert_eq!(CitationFormat::Text.extension(), "txt");
        assert_eq!(CitationFormat::default(), CitationFormat::Bibtex);
    }
}
