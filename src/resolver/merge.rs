//! Ordered provider fold.
//!
//! Each provider contributes one partial record; records are combined left
//! to right with [`Reference::or`], so earlier providers always win. Provider
//! failures contribute an empty record and never abort the fold.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::models::Reference;
use crate::sources::{Source, SourceError};

/// One identifier-keyed lookup, dispatched to any source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    Doi(&'a str),
    Pmid(&'a str),
    Arxiv(&'a str),
}

impl Lookup<'_> {
    /// Whether `source` advertises this kind of lookup
    pub fn supported_by(&self, source: &dyn Source) -> bool {
        match self {
            Lookup::Doi(_) => source.supports_doi_lookup(),
            Lookup::Pmid(_) => source.supports_pmid_lookup(),
            Lookup::Arxiv(_) => source.supports_arxiv_lookup(),
        }
    }

    async fn run(&self, source: &dyn Source) -> Result<Reference, SourceError> {
        match *self {
            Lookup::Doi(doi) => source.lookup_by_doi(doi).await,
            Lookup::Pmid(pmid) => source.lookup_by_pmid(pmid).await,
            Lookup::Arxiv(arxiv_id) => source.lookup_by_arxiv(arxiv_id).await,
        }
    }
}

/// Query one source, absorbing every failure into an empty record
pub async fn query(source: &dyn Source, lookup: Lookup<'_>, timeout: Duration) -> Reference {
    match tokio::time::timeout(timeout, lookup.run(source)).await {
        Ok(Ok(reference)) => {
            debug!(source = source.id(), ?lookup, "Provider returned a record");
            reference
        }
        Ok(Err(e)) if e.is_not_found() => {
            debug!(source = source.id(), ?lookup, "No record: {}", e);
            Reference::default()
        }
        Ok(Err(e)) => {
            warn!(source = source.id(), ?lookup, "Lookup failed: {}", e);
            Reference::default()
        }
        Err(_) => {
            warn!(
                source = source.id(),
                ?lookup,
                "Lookup timed out after {:?}",
                timeout
            );
            Reference::default()
        }
    }
}

/// Fold the records of `sources`, highest priority first.
///
/// Sources that do not support the lookup are skipped. With `short_circuit`,
/// the remaining sources are not queried once every field is known.
pub async fn fold_sources(
    sources: &[Arc<dyn Source>],
    lookup: Lookup<'_>,
    timeout: Duration,
    short_circuit: bool,
) -> Reference {
    let mut merged = Reference::default();
    for source in sources {
        if short_circuit && merged.is_complete() {
            debug!(source = source.id(), "Record complete, skipping remaining providers");
            break;
        }
        if !lookup.supported_by(source.as_ref()) {
            continue;
        }
        let partial = query(source.as_ref(), lookup, timeout).await;
        merged = merged.or(partial);
    }
    merged
}
