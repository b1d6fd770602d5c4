//! Pattern extraction over a [`SpatialDocument`].
//!
//! Per pattern the engine moves through
//! `INIT -> ANCHOR_FOUND | ANCHOR_NOT_FOUND -> ASSEMBLY_LOOP ->
//! STOP_WORD_HIT | NO_MORE_LINES | NO_CANDIDATE -> RESULT`.
//! Every expected failure becomes an unsuccessful [`PatternExtractionResult`];
//! nothing here panics on user input.

mod anchor;
mod batch;
mod column;
mod horizontal;
mod line;
mod result;

use rustc_hash::FxHashSet;

use crate::document::{SpatialDocument, WordBoundingBox};
use crate::error::ExtractionFailure;
use crate::geometry::HasPixelBox;
use crate::params::ExtractParams;
use crate::pattern::{PatternType, SearchPattern};
use crate::trace::{ExtractionObserver, Termination, TraceEvent, TracingObserver};

use self::column::ColumnMarcher;
use self::line::LineAssembler;
use self::result::Outcome;

pub use batch::extract_batch;
pub use result::PatternExtractionResult;

/// Extracts one field with default parameters, logging through `tracing`.
pub fn extract(document: &SpatialDocument, pattern: &SearchPattern) -> PatternExtractionResult {
    extract_with(
        document,
        pattern,
        &ExtractParams::default(),
        &mut TracingObserver,
    )
}

/// Extracts one field.
///
/// The document is only read; every call tracks its own consumed set, so
/// any number of calls may share one document.
pub fn extract_with(
    document: &SpatialDocument,
    pattern: &SearchPattern,
    params: &ExtractParams,
    observer: &mut dyn ExtractionObserver,
) -> PatternExtractionResult {
    run(document, pattern, params, observer).unwrap_or_else(|failure| {
        PatternExtractionResult::failure(Some(pattern.pattern_type), &failure)
    })
}

/// First configured stop word contained in any of `words`.
///
/// `stop_words` must already be lowercased.
pub(crate) fn stop_word_in(words: &[&WordBoundingBox], stop_words: &[String]) -> Option<String> {
    words.iter().find_map(|w| {
        stop_words
            .iter()
            .find(|stop| w.contains_ignore_case(stop))
            .cloned()
    })
}

/// Reports the anchor lookup outcome to the observer.
fn located<'a>(
    observer: &mut dyn ExtractionObserver,
    found: Result<&'a WordBoundingBox, ExtractionFailure>,
) -> Result<&'a WordBoundingBox, ExtractionFailure> {
    match &found {
        Ok(anchor) => observer.on_event(TraceEvent::AnchorFound {
            index: anchor.original_index(),
            text: anchor.text().to_string(),
        }),
        Err(failure) => observer.on_event(TraceEvent::AnchorNotFound {
            reason: failure.to_string(),
        }),
    }
    found
}

fn finish(
    observer: &mut dyn ExtractionObserver,
    pattern_type: PatternType,
    anchor: &WordBoundingBox,
    words: &[&WordBoundingBox],
    outcome: &Outcome,
) -> PatternExtractionResult {
    observer.on_event(TraceEvent::Terminated {
        reason: outcome.termination,
        words: words.len(),
    });
    PatternExtractionResult::assemble(pattern_type, anchor, words, outcome)
}

fn run(
    doc: &SpatialDocument,
    pattern: &SearchPattern,
    params: &ExtractParams,
    observer: &mut dyn ExtractionObserver,
) -> Result<PatternExtractionResult, ExtractionFailure> {
    let (tol_x, tol_y) = pattern.tolerances(params)?;
    let stop_words = pattern.normalized_stop_words();
    let pattern_type = pattern.pattern_type;

    let marcher = ColumnMarcher {
        doc,
        assembler: LineAssembler::new(doc, tol_x, params),
        tolerance_x: tol_x,
        tolerance_y: tol_y,
        tight_x: params.column_tight_x,
        stop_words: &stop_words,
    };

    match pattern_type {
        PatternType::VerticalColumn => {
            let anchor = located(
                observer,
                anchor::find_by_keyword(doc, &pattern.keyword_or_coordinate),
            )?;
            let mut consumed = FxHashSet::default();
            consumed.insert(anchor.original_index());

            let column = marcher.march(anchor.x1(), anchor.y2(), &mut consumed, observer);
            let mut words = vec![anchor];
            words.extend(column.lines.iter().flatten().copied());

            let outcome = Outcome {
                termination: column.termination,
                lines: column.lines.len(),
                stop_word: column.stop_word,
            };
            Ok(finish(observer, pattern_type, anchor, &words, &outcome))
        }

        PatternType::Horizontal => {
            if stop_words.is_empty() {
                return Err(ExtractionFailure::MissingStopWords);
            }
            let anchor = located(
                observer,
                anchor::find_by_keyword(doc, &pattern.keyword_or_coordinate),
            )?;

            let scan = horizontal::scan_right(doc, anchor, tol_y, &stop_words);
            let outcome = Outcome {
                termination: scan.termination,
                lines: 1,
                stop_word: scan.stop_word,
            };
            let result = finish(observer, pattern_type, anchor, &scan.words, &outcome);
            if scan.words.len() > 1 {
                Ok(result)
            } else {
                Ok(result.fail_with(&ExtractionFailure::NoWordsRightOfAnchor))
            }
        }

        PatternType::PositionBasedColumn => {
            let anchor = located(
                observer,
                pattern
                    .coordinate()
                    .and_then(|(x, y)| anchor::find_by_coordinate(doc, x, y, tol_x, tol_y)),
            )?;

            // The anchor need not be leftmost on its own line.
            let mut consumed = FxHashSet::default();
            let first_line = marcher.assembler.assemble(anchor, &consumed);
            consumed.extend(first_line.iter().map(|w| w.original_index()));
            observer.on_event(TraceEvent::LineAssembled {
                indices: first_line.iter().map(|w| w.original_index()).collect(),
            });

            let left = first_line.iter().map(|w| w.x1()).min().unwrap_or(anchor.x1());
            let bottom = first_line.iter().map(|w| w.y2()).max().unwrap_or(anchor.y2());
            let column = marcher.march(left, bottom, &mut consumed, observer);

            let mut words = first_line;
            words.extend(column.lines.iter().flatten().copied());
            let outcome = Outcome {
                termination: column.termination,
                lines: 1 + column.lines.len(),
                stop_word: column.stop_word,
            };
            Ok(finish(observer, pattern_type, anchor, &words, &outcome))
        }

        PatternType::PositionBasedHorizontal => {
            let (_, y) = pattern.coordinate()?;
            let row = horizontal::scan_row(doc, y, tol_x, tol_y, &stop_words);
            let row = match row {
                Ok(row) => row,
                Err(failure) => {
                    observer.on_event(TraceEvent::AnchorNotFound {
                        reason: failure.to_string(),
                    });
                    return Err(failure);
                }
            };
            let anchor = located(observer, Ok(row.words[0]))?;

            let outcome = Outcome {
                termination: row.termination,
                lines: 1,
                stop_word: row.stop_word,
            };
            let result = finish(observer, pattern_type, anchor, &row.words, &outcome);
            // A lone word only counts when it is the stop word itself.
            if row.words.len() > 1 || outcome.termination == Termination::StopWordHit {
                Ok(result)
            } else {
                Ok(result.fail_with(&ExtractionFailure::RowHasSingleWord { y }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PixelRect;
    use crate::trace::RecordingObserver;

    fn doc(words: &[(&str, (i32, i32, i32, i32))]) -> SpatialDocument {
        let words = words
            .iter()
            .enumerate()
            .map(|(i, (t, r))| {
                WordBoundingBox::new(i, *t, PixelRect::new(r.0, r.1, r.2, r.3), 90.0).unwrap()
            })
            .collect();
        SpatialDocument::new(1000, 1000, words).unwrap()
    }

    fn amount_doc() -> SpatialDocument {
        doc(&[("Amount", (10, 10, 60, 30)), ("1,234.56", (10, 35, 70, 55))])
    }

    #[test]
    fn vertical_column_scenario() {
        let pattern =
            SearchPattern::new("Amount", PatternType::VerticalColumn).with_tolerance(10, 20);
        let result = extract(&amount_doc(), &pattern);
        assert!(result.success);
        assert_eq!(result.texts(), vec!["Amount", "1,234.56"]);
        assert_eq!(result.combined_text, "Amount 1,234.56");
        assert_eq!(result.anchor_word.as_ref().map(|w| w.text()), Some("Amount"));
    }

    #[test]
    fn vertical_column_with_anchor_only_still_succeeds() {
        let d = doc(&[("Amount", (10, 10, 60, 30))]);
        let pattern = SearchPattern::new("amount", PatternType::VerticalColumn);
        let result = extract(&d, &pattern);
        assert!(result.success);
        assert_eq!(result.combined_text, "Amount");
        assert_eq!(result.metadata["termination"], "no_more_lines");
    }

    #[test]
    fn horizontal_without_stop_words_fails() {
        let pattern = SearchPattern::new("Amount", PatternType::Horizontal).with_tolerance(10, 20);
        let result = extract(&amount_doc(), &pattern);
        assert!(!result.success);
        assert_eq!(
            result.error_message,
            "horizontal pattern requires at least one stop word"
        );
    }

    #[test]
    fn horizontal_with_only_anchor_fails_but_keeps_anchor() {
        let pattern = SearchPattern::new("Amount", PatternType::Horizontal)
            .with_tolerance(10, 20)
            .with_stop_words(["THB"]);
        let result = extract(&amount_doc(), &pattern);
        assert!(!result.success);
        assert_eq!(result.error_message, "no words found right of anchor");
        assert_eq!(result.texts(), vec!["Amount"]);
    }

    #[test]
    fn keyword_not_found_is_reported() {
        let mut observer = RecordingObserver::new();
        let pattern = SearchPattern::new("Balance", PatternType::VerticalColumn);
        let result = extract_with(
            &amount_doc(),
            &pattern,
            &ExtractParams::default(),
            &mut observer,
        );
        assert!(!result.success);
        assert_eq!(result.error_message, "keyword not found");
        assert_eq!(
            observer.events,
            vec![TraceEvent::AnchorNotFound {
                reason: "keyword not found".to_string()
            }]
        );
    }

    #[test]
    fn malformed_coordinate_is_a_failure() {
        let pattern = SearchPattern::new("ten,20", PatternType::PositionBasedColumn);
        let result = extract(&amount_doc(), &pattern);
        assert!(!result.success);
        assert!(result.error_message.starts_with("malformed coordinate"));
    }

    #[test]
    fn negative_tolerance_is_a_failure() {
        let pattern =
            SearchPattern::new("Amount", PatternType::VerticalColumn).with_tolerance(10, -3);
        let result = extract(&amount_doc(), &pattern);
        assert!(!result.success);
        assert_eq!(result.error_message, "negative tolerance: -3");
    }

    #[test]
    fn position_column_assembles_anchor_line_first() {
        let d = doc(&[
            ("Account", (10, 100, 80, 120)),
            ("No.", (84, 100, 110, 120)),
            ("123-4-56789", (10, 125, 130, 145)),
        ]);
        // Coordinate lands on "No.", which is not the leftmost word.
        let pattern = SearchPattern::new("85,100", PatternType::PositionBasedColumn)
            .with_tolerance(5, 26);
        let mut observer = RecordingObserver::new();
        let result = extract_with(&d, &pattern, &ExtractParams::default(), &mut observer);

        assert!(result.success);
        assert_eq!(result.texts(), vec!["Account", "No.", "123-4-56789"]);
        assert_eq!(result.anchor_word.as_ref().map(|w| w.text()), Some("No."));
        assert_eq!(result.metadata["line_count"], "2");
        assert_eq!(observer.lines(), vec![&[0, 1][..], &[2][..]]);
    }

    #[test]
    fn position_horizontal_reads_row() {
        let d = doc(&[
            ("Date:", (10, 200, 50, 220)),
            ("01/02/2024", (53, 201, 140, 221)),
            ("unrelated", (500, 200, 600, 220)),
        ]);
        let pattern = SearchPattern::new("999,205", PatternType::PositionBasedHorizontal);
        let result = extract(&d, &pattern);
        assert!(result.success);
        assert_eq!(result.combined_text, "Date: 01/02/2024");
        assert_eq!(result.anchor_word.as_ref().map(|w| w.text()), Some("Date:"));
    }

    #[test]
    fn stop_word_lookup_is_case_insensitive() {
        let d = doc(&[("SubTotal", (0, 0, 10, 10))]);
        let words: Vec<&WordBoundingBox> = d.words().iter().collect();
        assert_eq!(
            stop_word_in(&words, &["total".to_string()]),
            Some("total".to_string())
        );
        assert_eq!(stop_word_in(&words, &[]), None);
    }
}
