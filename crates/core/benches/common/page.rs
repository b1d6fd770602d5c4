//! Synthetic OCR pages: a ruled form with jittered word boxes in scrambled order.

use ocrgrid_core::{PixelRect, SpatialDocument, WordBoundingBox};

pub const PAGE_WIDTH: u32 = 2480;
pub const PAGE_HEIGHT: u32 = 3508;

const COLUMNS: i32 = 8;
const WORD_WIDTH: i32 = 180;
const WORD_GAP: i32 = 4;
const ROW_HEIGHT: i32 = 40;
const ROW_PITCH: i32 = 46;

struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform in `-spread..=spread`.
    fn jitter(&mut self, spread: i32) -> i32 {
        let span = (2 * spread + 1) as u64;
        (self.next_u64() % span) as i32 - spread
    }
}

/// A page of `rows` lines, the first column holding labels `L{row}`.
///
/// Every fifth row carries Thai text split into a base and a mark above it.
pub fn form_page(seed: u64, rows: i32) -> SpatialDocument {
    let mut rng = XorShift64::new(seed);
    let mut words = Vec::new();

    for row in 0..rows {
        let top = 20 + row * ROW_PITCH;
        for col in 0..COLUMNS {
            let left = 20 + col * (WORD_WIDTH + WORD_GAP);
            let dy = rng.jitter(2);
            let text = if col == 0 {
                format!("L{row}")
            } else if row % 5 == 0 && col == 1 {
                "\u{0E1A}\u{0E32}\u{0E17}".to_string()
            } else {
                format!("{}", rng.next_u64() % 100_000)
            };
            let rect = PixelRect::new(left, top + 8 + dy, left + WORD_WIDTH, top + ROW_HEIGHT + dy);
            words.push((text, rect));

            if row % 5 == 0 && col == 1 {
                let mark = PixelRect::new(left + 40, top, left + 70, top + 6);
                words.push(("\u{0E48}".to_string(), mark));
            }
        }
    }

    // Scramble emission order.
    for i in (1..words.len()).rev() {
        let j = (rng.next_u64() % (i as u64 + 1)) as usize;
        words.swap(i, j);
    }

    let words = words
        .into_iter()
        .enumerate()
        .filter_map(|(i, (text, rect))| WordBoundingBox::new(i, text, rect, 90.0).ok())
        .collect();
    SpatialDocument::new(PAGE_WIDTH, PAGE_HEIGHT, words).expect("synthetic page is valid")
}
