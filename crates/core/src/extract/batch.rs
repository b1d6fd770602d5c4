//! Many named fields over one document.

use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::debug;

use super::{PatternExtractionResult, extract_with};
use crate::document::SpatialDocument;
use crate::params::ExtractParams;
use crate::pattern::{PatternRecord, SearchPattern};
use crate::trace::TracingObserver;

/// Extracts every field in `records`, in parallel, keeping the input order.
///
/// A field that fails (unknown pattern type, missing anchor, ...) yields an
/// unsuccessful result for that field only.
pub fn extract_batch(
    document: &SpatialDocument,
    records: &IndexMap<String, PatternRecord>,
    params: &ExtractParams,
) -> IndexMap<String, PatternExtractionResult> {
    let entries: Vec<(&String, &PatternRecord)> = records.iter().collect();

    let results: Vec<PatternExtractionResult> = entries
        .par_iter()
        .map(|(name, record)| {
            let result = match SearchPattern::try_from(*record) {
                Ok(pattern) => extract_with(document, &pattern, params, &mut TracingObserver),
                Err(failure) => PatternExtractionResult::failure(None, &failure),
            };
            debug!(field = %name, success = result.success, "field extracted");
            result
        })
        .collect();

    entries
        .into_iter()
        .map(|(name, _)| name.clone())
        .zip(results)
        .collect()
}
