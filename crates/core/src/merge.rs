//! Fragment merge pre-pass.
//!
//! OCR engines split glyphs of some scripts (Thai above/below vowels and
//! tone marks) into separate tokens stacked on top of each other. This pass
//! glues those stacks back together before extraction runs.
//!
//! Two in-script words are *mergeable* when they overlap horizontally by at
//! least `overlap_threshold` of the narrower one and the vertical gap between
//! their edges is at most `gap_tolerance`. Clusters are the connected
//! components of that relation.

use std::collections::VecDeque;

use itertools::Itertools;
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

use crate::document::{SpatialDocument, WordBoundingBox};
use crate::geometry::{HasPixelBox, bounding_rect, horizontal_overlap, vertical_edge_gap};
use crate::params::MergeParams;
use crate::trace::{ExtractionObserver, TraceEvent, TracingObserver};

/// Merges vertically stacked fragments with the default script ranges.
pub fn merge_fragments(
    document: &SpatialDocument,
    gap_tolerance: i32,
    overlap_threshold: f64,
) -> SpatialDocument {
    let params = MergeParams {
        gap_tolerance,
        overlap_threshold,
        ..MergeParams::default()
    };
    merge_fragments_with(document, &params, &mut TracingObserver)
}

/// Merges vertically stacked fragments, reporting each merged cluster.
///
/// The input is left untouched. Words outside the configured scripts pass
/// through unchanged.
pub fn merge_fragments_with(
    document: &SpatialDocument,
    params: &MergeParams,
    observer: &mut dyn ExtractionObserver,
) -> SpatialDocument {
    let words = document.words();
    let in_script: Vec<bool> = words.iter().map(|w| params.is_in_script(w.text())).collect();

    let mut order: Vec<usize> = (0..words.len()).collect();
    order.sort_unstable_by_key(|&slot| words[slot].original_index());

    let mut visited = vec![false; words.len()];
    let mut merged = Vec::with_capacity(words.len());
    let mut fragments_merged = 0usize;
    let mut clusters_merged = 0usize;

    for start in order {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        if !in_script[start] {
            merged.push(words[start].clone());
            continue;
        }

        let cluster = grow_cluster(document, params, start, &in_script, &mut visited);
        if cluster.len() == 1 {
            merged.push(words[start].clone());
            continue;
        }

        let word = merge_cluster(words, &cluster);
        observer.on_event(TraceEvent::ClusterMerged {
            members: cluster
                .iter()
                .map(|&slot| words[slot].original_index())
                .sorted_unstable()
                .collect(),
            text: word.text().to_string(),
        });
        fragments_merged += cluster.len();
        clusters_merged += 1;
        merged.push(word);
    }

    merged.sort_unstable_by_key(|w| w.original_index());
    debug!(
        before = words.len(),
        after = merged.len(),
        clusters_merged,
        "fragments merged"
    );

    let mut metadata = document.metadata().clone();
    metadata.insert("fragments_merged".to_string(), fragments_merged.to_string());
    metadata.insert("clusters_merged".to_string(), clusters_merged.to_string());
    SpatialDocument::from_trusted(document.width(), document.height(), merged, metadata)
}

fn is_mergeable(a: &WordBoundingBox, b: &WordBoundingBox, params: &MergeParams) -> bool {
    horizontal_overlap(a, b) >= params.overlap_threshold
        && vertical_edge_gap(a, b) <= params.gap_tolerance
}

/// Breadth-first walk from `start` over the mergeable relation.
fn grow_cluster(
    document: &SpatialDocument,
    params: &MergeParams,
    start: usize,
    in_script: &[bool],
    visited: &mut [bool],
) -> Vec<usize> {
    let words = document.words();
    let mut cluster = vec![start];
    let mut queue = VecDeque::from([start]);

    while let Some(base) = queue.pop_front() {
        // A zero threshold admits boxes that do not overlap at all, which the
        // window query below would miss.
        let candidates: Vec<usize> = if params.overlap_threshold > 0.0 {
            let probe = words[base].rect().expand_y(params.gap_tolerance.max(0));
            document.slots_intersecting(&probe).collect()
        } else {
            (0..words.len()).collect()
        };

        let mut next: Vec<usize> = candidates
            .into_iter()
            .filter(|&slot| !visited[slot] && in_script[slot])
            .filter(|&slot| is_mergeable(&words[base], &words[slot], params))
            .collect();
        next.sort_unstable_by_key(|&slot| words[slot].original_index());

        for slot in next {
            visited[slot] = true;
            cluster.push(slot);
            queue.push_back(slot);
        }
    }
    cluster
}

/// Folds a cluster of at least two slots into one word.
fn merge_cluster(words: &[WordBoundingBox], cluster: &[usize]) -> WordBoundingBox {
    let members: Vec<&WordBoundingBox> = cluster
        .iter()
        .map(|&slot| &words[slot])
        .sorted_by_key(|w| (w.y1(), w.x1(), w.original_index()))
        .collect();

    let first = members[0];
    let text: String = members.iter().map(|w| w.text()).collect::<String>().nfc().collect();
    let rect = bounding_rect(members.iter().copied()).unwrap_or_else(|| first.rect());
    let confidence = members.iter().map(|w| w.confidence()).sum::<f64>() / members.len() as f64;
    let original_index = members
        .iter()
        .map(|w| w.original_index())
        .fold(first.original_index(), usize::min);

    WordBoundingBox::from_parts(original_index, text, rect, confidence)
}
