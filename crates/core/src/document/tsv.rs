//! Tesseract TSV import.
//!
//! Columns: level, page_num, block_num, par_num, line_num, word_num, left,
//! top, width, height, conf, text. The level-1 row carries the page size.

use super::{SpatialDocument, WordBoundingBox};
use crate::error::{GridError, Result};
use crate::geometry::PixelRect;

pub const TSV_MIN_FIELDS: usize = 12;
pub const TSV_PAGE_LEVEL: u32 = 1;
pub const TSV_WORD_LEVEL: u32 = 5;

fn field<T: std::str::FromStr>(fields: &[&str], col: usize, line: usize) -> Result<T> {
    fields[col].trim().parse().map_err(|_| GridError::TsvError {
        line,
        msg: format!("column {col} is not a number: {:?}", fields[col]),
    })
}

/// Parses Tesseract TSV into a document.
///
/// Word rows below `min_confidence`, with a negative confidence, or with
/// blank text are skipped. Confidence is clamped into 0..=100.
pub fn parse_tesseract_tsv(data: &str, min_confidence: f64) -> Result<SpatialDocument> {
    let mut page: Option<(u32, u32)> = None;
    let mut words = Vec::new();

    for (line_num, line) in data.lines().enumerate() {
        if line_num == 0 || line.trim().is_empty() {
            continue;
        }
        let line_no = line_num + 1;

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < TSV_MIN_FIELDS {
            return Err(GridError::TsvError {
                line: line_no,
                msg: format!("expected {TSV_MIN_FIELDS} columns, got {}", fields.len()),
            });
        }

        let level: u32 = field(&fields, 0, line_no)?;
        let left: i32 = field(&fields, 6, line_no)?;
        let top: i32 = field(&fields, 7, line_no)?;
        let width: i32 = field(&fields, 8, line_no)?;
        let height: i32 = field(&fields, 9, line_no)?;

        if level == TSV_PAGE_LEVEL && page.is_none() {
            let w = u32::try_from(width).unwrap_or(0);
            let h = u32::try_from(height).unwrap_or(0);
            page = Some((w, h));
            continue;
        }
        if level != TSV_WORD_LEVEL {
            continue;
        }

        let conf: f64 = field(&fields, 10, line_no)?;
        if conf < 0.0 || conf < min_confidence {
            continue;
        }
        let text = fields[11..].join("\t");
        if text.trim().is_empty() {
            continue;
        }

        let (Some(right), Some(bottom)) = (left.checked_add(width), top.checked_add(height)) else {
            return Err(GridError::TsvError {
                line: line_no,
                msg: format!("box {left},{top} {width}x{height} is out of range"),
            });
        };
        let rect = PixelRect::new(left, top, right, bottom);
        words.push(WordBoundingBox::new(
            words.len(),
            text,
            rect,
            conf.min(100.0),
        )?);
    }

    let (width, height) = page.ok_or_else(|| GridError::TsvError {
        line: 0,
        msg: "missing page row".to_string(),
    })?;
    Ok(SpatialDocument::new(width, height, words)?.with_metadata("source", "tesseract_tsv"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::HasPixelBox;

    const HEADER: &str =
        "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext";

    #[test]
    fn imports_word_rows() {
        let tsv = format!(
            "{HEADER}\n\
             1\t1\t0\t0\t0\t0\t0\t0\t800\t600\t-1\t\n\
             4\t1\t1\t1\t1\t0\t10\t10\t120\t20\t-1\t\n\
             5\t1\t1\t1\t1\t1\t10\t10\t50\t20\t96.2\tAmount\n\
             5\t1\t1\t1\t1\t2\t70\t10\t60\t20\t12.0\tnoise\n\
             5\t1\t1\t1\t1\t3\t140\t10\t10\t20\t91.0\t \n"
        );
        let doc = parse_tesseract_tsv(&tsv, 30.0).unwrap();
        assert_eq!((doc.width(), doc.height()), (800, 600));
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.words()[0].text(), "Amount");
        assert_eq!(doc.words()[0].x2(), 60);
        assert_eq!(doc.metadata()["source"], "tesseract_tsv");
    }

    #[test]
    fn rejects_malformed_numbers() {
        let tsv = format!("{HEADER}\n1\t1\t0\t0\t0\t0\t0\t0\twide\t600\t-1\t\n");
        assert!(matches!(
            parse_tesseract_tsv(&tsv, 0.0),
            Err(GridError::TsvError { line: 2, .. })
        ));
    }

    #[test]
    fn rejects_box_past_coordinate_range() {
        let tsv = format!(
            "{HEADER}\n\
             1\t1\t0\t0\t0\t0\t0\t0\t800\t600\t-1\t\n\
             5\t1\t1\t1\t1\t1\t2147483000\t10\t1000\t20\t96.2\tAmount\n"
        );
        assert!(matches!(
            parse_tesseract_tsv(&tsv, 0.0),
            Err(GridError::TsvError { line: 3, .. })
        ));
    }

    #[test]
    fn requires_page_row() {
        let tsv = format!("{HEADER}\n5\t1\t1\t1\t1\t1\t10\t10\t50\t20\t96.2\tAmount\n");
        assert!(parse_tesseract_tsv(&tsv, 0.0).is_err());
    }
}
