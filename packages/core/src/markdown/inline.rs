//! Inline span tokenizer
//!
//! Splits a line or paragraph into [`StyledRun`]s using a single-pass,
//! non-recursive emphasis grammar. At each step the earliest match among the
//! emphasis patterns wins; when several patterns match at the same position
//! the pattern order below decides, so `***x***` becomes one bold+italic run.

use crate::models::StyledRun;
use regex::Regex;
use std::sync::LazyLock;

/// Style a pattern applies to its captured inner text
#[derive(Debug, Clone, Copy)]
struct Emphasis {
    bold: bool,
    italic: bool,
    code: bool,
}

/// Emphasis patterns in priority order
///
/// Order matters for ties: bold-italic, then bold, then italic, then code.
static EMPHASIS_PATTERNS: LazyLock<Vec<(Regex, Emphasis)>> = LazyLock::new(|| {
    vec![
        (
            Regex::new(r"\*\*\*(.*?)\*\*\*").unwrap(),
            Emphasis { bold: true, italic: true, code: false },
        ),
        (
            Regex::new(r"\*\*(.*?)\*\*").unwrap(),
            Emphasis { bold: true, italic: false, code: false },
        ),
        (
            Regex::new(r"\*(.*?)\*").unwrap(),
            Emphasis { bold: false, italic: true, code: false },
        ),
        (
            Regex::new(r"`(.*?)`").unwrap(),
            Emphasis { bold: false, italic: false, code: true },
        ),
    ]
});

/// Earliest emphasis match at or after `cursor`
///
/// Returns `(match_start, match_end, inner_text, emphasis)`.
fn next_emphasis(text: &str, cursor: usize) -> Option<(usize, usize, &str, Emphasis)> {
    let mut best: Option<(usize, usize, &str, Emphasis)> = None;

    for (pattern, emphasis) in EMPHASIS_PATTERNS.iter() {
        let Some(captures) = pattern.captures_at(text, cursor) else {
            continue;
        };
        let (Some(whole), Some(inner)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        // Strictly earlier only: equal starts keep the higher-priority pattern
        let earlier = match best {
            Some((start, ..)) => whole.start() < start,
            None => true,
        };
        if earlier {
            best = Some((whole.start(), whole.end(), inner.as_str(), *emphasis));
        }
    }

    best
}

/// Tokenize `text` into styled runs covering it left to right
///
/// Marker characters are dropped; every other character appears in exactly
/// one run, in order. Empty runs are skipped, and an input that yields no
/// runs at all produces a single empty plain run.
pub fn tokenize(text: &str) -> Vec<StyledRun> {
    let mut runs = Vec::new();
    let mut cursor = 0;

    while let Some((start, end, inner, emphasis)) = next_emphasis(text, cursor) {
        if start > cursor {
            runs.push(StyledRun::plain(&text[cursor..start]));
        }
        if !inner.is_empty() {
            runs.push(StyledRun::styled(
                inner,
                emphasis.bold,
                emphasis.italic,
                emphasis.code,
            ));
        }
        cursor = end;
    }

    if cursor < text.len() {
        runs.push(StyledRun::plain(&text[cursor..]));
    }

    if runs.is_empty() {
        runs.push(StyledRun::plain(""));
    }

    runs
}

/// Total character length of a run sequence
pub fn runs_char_len(runs: &[StyledRun]) -> usize {
    runs.iter().map(StyledRun::char_len).sum()
}

#[cfg(test)]
#[path = "inline_test.rs"]
mod inline_test;
