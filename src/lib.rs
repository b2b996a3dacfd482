//! # bibresolve
//!
//! Resolve DOIs, PubMed IDs, arXiv IDs and free-text titles into citation
//! entries, merging metadata from several bibliographic providers.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (Reference, Person, identifiers)
//! - [`sources`]: Provider plugins (PubMed, Crossref, arXiv, ChemRxiv, Semantic Scholar)
//! - [`resolver`]: Identifier routing and the ordered record merge
//! - [`utils`]: HTTP client, journal abbreviation, citation keys and rendering
//! - [`config`]: Configuration management
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use bibresolve::config::Config;
//! use bibresolve::utils::{Abbreviator, CitationFormat, CitationRenderer};
//! use bibresolve::Resolver;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::default();
//! let resolver = Resolver::from_config(&config)?;
//! let reference = resolver.resolve("10.1021/acs.jctc.2c01172").await?;
//!
//! let renderer = CitationRenderer::new(Arc::new(Abbreviator::new()));
//! print!("{}", renderer.render(&reference, CitationFormat::Bibtex)?);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod resolver;
pub mod sources;
pub mod utils;

// Re-export commonly used types
pub use error::{CitationError, ResolveError};
pub use models::{Identifier, IdentifierKind, Reference};
pub use resolver::Resolver;
pub use sources::{Source, SourceRegistry};
pub use utils::{CitationFormat, CitationRenderer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
