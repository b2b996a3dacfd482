//! Utility modules supporting resolution and rendering.
//!
//! - [`HttpClient`]: HTTP client with rate limiting and retry
//! - [`RetryConfig`] / [`with_retry`]: exponential backoff for transient errors
//! - [`Abbreviator`]: ISO 4 journal title abbreviation
//! - [`derive_key`]: citation keys such as `Zeng_JChemTheoryComput_2023_v19_p1261`
//! - [`CitationRenderer`]: BibTeX, markdown and text output
//!
//! # Rendering
//!
//! ```rust
//! use std::sync::Arc;
//! use bibresolve::models::{Person, ReferenceBuilder};
//! use bibresolve::utils::{Abbreviator, CitationFormat, CitationRenderer};
//!
//! let reference = ReferenceBuilder::new()
//!     .authors(vec![Person::new("Yuzhi", "Zhang")])
//!     .journal("Computer Physics Communications")
//!     .year(2020)
//!     .build();
//! let renderer = CitationRenderer::new(Arc::new(Abbreviator::new()));
//! let bibtex = renderer.render(&reference, CitationFormat::Bibtex).unwrap();
//! assert!(bibtex.starts_with("@Article{Zhang_ComputPhysCommun_2020,"));
//! ```

mod abbrev;
mod cite;
mod http;
mod key;
mod latex;
mod ltwa;
mod retry;
mod wrap;

pub use abbrev::{title_case, Abbreviator};
pub use cite::{
    format_bibtex, format_markdown, format_text, CitationFormat, CitationRenderer,
    DEFAULT_WRAP_WIDTH,
};
pub use http::HttpClient;
pub use key::{derive_key, journal_abbreviation, CitationKey, NO_AUTHOR, NO_LAST_NAME};
pub use latex::{
    collapse_whitespace, latex_escape, plain_text, strip_markup, to_latex, transliterate, unaccent,
};
pub use retry::{api_retry_config, with_retry, RetryConfig, TransientError};
pub use wrap::wrap;
