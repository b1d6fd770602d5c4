//! ocrgrid - Extract named fields from OCR word boxes
//!
//! Reads one page of OCR output (a JSON document or a Tesseract TSV) and a
//! JSON map of field name to search pattern, and prints a JSON map of field
//! name to extraction result.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Args, Parser};
use indexmap::IndexMap;
use ocrgrid_core::params::{DEFAULT_GAP_TOLERANCE, DEFAULT_TOLERANCE_X, DEFAULT_TOLERANCE_Y};
use ocrgrid_core::{
    DocumentInput, ExtractParams, MergeParams, PatternRecord, SpatialDocument, extract_batch,
    merge_fragments_with, parse_tesseract_tsv,
};
use ocrgrid_core::trace::TracingObserver;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Where the page's words come from.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct Source {
    /// JSON document: `{"width", "height", "words": [...]}`
    #[arg(long)]
    document: Option<PathBuf>,

    /// Tesseract TSV output (`tesseract page.png out tsv`)
    #[arg(long)]
    tsv: Option<PathBuf>,
}

/// Extract named fields from one OCR'd page.
#[derive(Parser, Debug)]
#[command(name = "ocrgrid")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    source: Source,

    /// JSON object mapping field names to search patterns
    #[arg(long)]
    patterns: PathBuf,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    /// TSV rows below this confidence are dropped
    #[arg(long = "min-confidence", default_value = "0")]
    min_confidence: f64,

    // === Fragment merging ===
    /// Merge vertically fragmented glyphs before extraction
    #[arg(long = "merge-fragments", action = ArgAction::SetTrue)]
    merge_fragments: bool,

    /// Maximum vertical gap between fragments (pixels)
    #[arg(long = "gap-tolerance", default_value_t = DEFAULT_GAP_TOLERANCE)]
    gap_tolerance: i32,

    /// Minimum horizontal overlap ratio between fragments (0.0 to 1.0)
    #[arg(long = "overlap-threshold", default_value = "0.5", value_parser = parse_ratio)]
    overlap_threshold: f64,

    // === Extraction defaults ===
    /// Horizontal tolerance for patterns that do not set one
    #[arg(long = "default-tolerance-x", default_value_t = DEFAULT_TOLERANCE_X)]
    default_tolerance_x: i32,

    /// Vertical tolerance for patterns that do not set one
    #[arg(long = "default-tolerance-y", default_value_t = DEFAULT_TOLERANCE_Y)]
    default_tolerance_y: i32,

    // === Output options ===
    /// Path to file where output is written, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,

    /// Pretty-print the JSON output
    #[arg(long, action = ArgAction::SetTrue)]
    pretty: bool,
}

fn parse_ratio(s: &str) -> std::result::Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("invalid float value: {s}"))?;
    if !(0.0..=1.0).contains(&value) {
        return Err(format!("value must be between 0 and 1, got {value}"));
    }
    Ok(value)
}

fn init_logging(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn load_document(source: &Source, min_confidence: f64) -> Result<SpatialDocument> {
    if let Some(path) = &source.document {
        let input: DocumentInput = serde_json::from_str(&read(path)?)
            .with_context(|| format!("failed to parse document {}", path.display()))?;
        return SpatialDocument::try_from(input)
            .with_context(|| format!("invalid document {}", path.display()));
    }
    if let Some(path) = &source.tsv {
        return parse_tesseract_tsv(&read(path)?, min_confidence)
            .with_context(|| format!("invalid TSV {}", path.display()));
    }
    bail!("either --document or --tsv is required")
}

fn load_patterns(path: &Path) -> Result<IndexMap<String, PatternRecord>> {
    serde_json::from_str(&read(path)?)
        .with_context(|| format!("failed to parse patterns {}", path.display()))
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_logging(args.debug);

    let mut document = load_document(&args.source, args.min_confidence)?;
    let patterns = load_patterns(&args.patterns)?;
    info!(words = document.len(), fields = patterns.len(), "inputs loaded");

    if args.merge_fragments {
        let params = MergeParams {
            gap_tolerance: args.gap_tolerance,
            overlap_threshold: args.overlap_threshold,
            ..MergeParams::default()
        };
        document = merge_fragments_with(&document, &params, &mut TracingObserver);
    }

    let params = ExtractParams {
        default_tolerance_x: args.default_tolerance_x,
        default_tolerance_y: args.default_tolerance_y,
        ..ExtractParams::default()
    };
    let results = extract_batch(&document, &patterns, &params);
    for (name, result) in &results {
        if !result.success {
            warn!(field = %name, error = %result.error_message, "field not extracted");
        }
    }

    let mut output: Box<dyn Write> = if args.outfile == "-" {
        Box::new(BufWriter::new(io::stdout()))
    } else {
        let file = File::create(&args.outfile)
            .with_context(|| format!("failed to create output file {}", args.outfile))?;
        Box::new(BufWriter::new(file))
    };
    if args.pretty {
        serde_json::to_writer_pretty(&mut output, &results)?;
    } else {
        serde_json::to_writer(&mut output, &results)?;
    }
    writeln!(output)?;
    output.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn ratio_must_be_a_fraction() {
        assert_eq!(parse_ratio("0.25"), Ok(0.25));
        assert!(parse_ratio("1.5").is_err());
        assert!(parse_ratio("half").is_err());
    }

    #[test]
    fn document_and_tsv_are_exclusive() {
        let err = Cli::try_parse_from([
            "ocrgrid",
            "--document",
            "a.json",
            "--tsv",
            "a.tsv",
            "--patterns",
            "p.json",
        ]);
        assert!(err.is_err());

        let ok = Cli::try_parse_from(["ocrgrid", "--tsv", "a.tsv", "--patterns", "p.json"]);
        assert!(ok.is_ok());
    }
}
