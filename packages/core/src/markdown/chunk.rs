//! Paragraph chunker
//!
//! Splits text longer than a per-block cap into ordered chunks, choosing the
//! split point with a fixed priority: sentence end, then line break, then
//! space, then a hard cut at the cap. Lengths are counted in characters.

/// Default per-chunk cap, below the remote 2000-character block limit
pub const DEFAULT_MAX_CHUNK_CHARS: usize = 1800;

/// How far back from the cap each boundary kind is searched for
const SENTENCE_LOOKBACK: usize = 200;
const LINE_LOOKBACK: usize = 100;
const WORD_LOOKBACK: usize = 50;

fn is_sentence_end(c: char) -> bool {
    matches!(c, '．' | '。' | '\n')
}

/// Split position just after the last `matches` char within the final
/// `lookback` chars of `window`
fn split_after_last(
    window: &[char],
    lookback: usize,
    matches: impl Fn(char) -> bool,
) -> Option<usize> {
    let floor = window.len().saturating_sub(lookback);
    window[floor..]
        .iter()
        .rposition(|&c| matches(c))
        .map(|offset| floor + offset + 1)
}

fn find_split(window: &[char]) -> usize {
    split_after_last(window, SENTENCE_LOOKBACK, is_sentence_end)
        .or_else(|| split_after_last(window, LINE_LOOKBACK, |c| c == '\n'))
        .or_else(|| split_after_last(window, WORD_LOOKBACK, |c| c == ' '))
        .unwrap_or(window.len())
}

/// Split `text` into chunks of at most `max_chars` characters
///
/// Text within the cap comes back as one trimmed chunk. Longer text is cut
/// repeatedly at the best boundary inside the leading window; each chunk and
/// the remainder are trimmed, and chunks that trim to nothing are skipped.
/// A `max_chars` of zero is treated as one.
pub fn split_paragraph(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_chars {
        return vec![trimmed.to_string()];
    }

    let chars: Vec<char> = trimmed.chars().collect();
    let mut chunks = Vec::new();
    let mut start = 0;

    while chars.len() - start > max_chars {
        let window = &chars[start..start + max_chars];
        let split = find_split(window);

        let chunk: String = window[..split].iter().collect();
        let chunk = chunk.trim();
        if !chunk.is_empty() {
            chunks.push(chunk.to_string());
        }

        start += split;
        while start < chars.len() && chars[start].is_whitespace() {
            start += 1;
        }
    }

    let rest: String = chars[start..].iter().collect();
    let rest = rest.trim();
    if !rest.is_empty() {
        chunks.push(rest.to_string());
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Chunks must cover the trimmed text in order, with only whitespace
    /// dropped at the split points
    fn assert_reconstructs(text: &str, chunks: &[String]) {
        let mut rest = text.trim();
        for chunk in chunks {
            rest = rest
                .strip_prefix(chunk.as_str())
                .unwrap_or_else(|| panic!("chunk {chunk:?} does not continue at {rest:?}"))
                .trim_start();
        }
        assert!(rest.is_empty(), "text left over after chunks: {rest:?}");
    }

    #[test]
    fn test_short_text_is_single_trimmed_chunk() {
        assert_eq!(split_paragraph("  short text \n", 1800), vec!["short text"]);
        assert_eq!(split_paragraph("", 10), vec![""]);
    }

    #[test]
    fn test_exactly_at_cap_is_not_split() {
        let text = "a".repeat(10);
        assert_eq!(split_paragraph(&text, 10), vec![text]);
    }

    #[test]
    fn test_prefers_sentence_end() {
        let text = "これは文です。次の文はとても長く続いていきます。";
        let chunks = split_paragraph(text, 20);
        assert_eq!(chunks[0], "これは文です。");
        assert_eq!(chunks.concat(), text);
        assert!(chunks.iter().all(|c| c.chars().count() <= 20));
    }

    #[test]
    fn test_sentence_end_beats_later_space() {
        let text = "First part。then words and more words here";
        let chunks = split_paragraph(text, 30);
        assert_eq!(chunks[0], "First part。");
        assert_eq!(chunks[1], "then words and more words here");
    }

    #[test]
    fn test_falls_back_to_space() {
        let text = "alpha beta gamma delta epsilon";
        let chunks = split_paragraph(text, 12);
        assert_eq!(chunks, vec!["alpha beta", "gamma delta", "epsilon"]);
        assert_reconstructs(text, &chunks);
    }

    #[test]
    fn test_inner_whitespace_is_preserved() {
        let text = "line one\nline  two。 next\tpart of the text goes on";
        let chunks = split_paragraph(text, 16);
        assert_reconstructs(text, &chunks);
        assert!(chunks.iter().any(|c| c.contains("line  two")));
    }

    #[test]
    fn test_hard_cut_without_boundaries() {
        let text = "x".repeat(25);
        let chunks = split_paragraph(&text, 10);
        assert_eq!(chunks, vec!["x".repeat(10), "x".repeat(10), "x".repeat(5)]);
    }

    #[test]
    fn test_space_outside_lookback_is_ignored() {
        // The only space is far behind the cap, outside the word lookback
        let text = format!("ab {}", "c".repeat(150));
        let chunks = split_paragraph(&text, 73);
        assert_eq!(chunks[0].chars().count(), 73);
    }

    #[test]
    fn test_long_text_reconstructs_in_order() {
        let sentence = "大規模言語モデルの軽量化に関する研究を紹介しました。";
        let mut text = String::new();
        for i in 0..120 {
            text.push_str(sentence);
            if i % 7 == 0 {
                text.push('\n');
            }
            if i % 5 == 0 {
                text.push_str("word split here ");
            }
        }

        let chunks = split_paragraph(&text, DEFAULT_MAX_CHUNK_CHARS);
        assert!(chunks.len() > 1);
        assert!(chunks
            .iter()
            .all(|c| !c.is_empty() && c.chars().count() <= DEFAULT_MAX_CHUNK_CHARS));
        assert_reconstructs(&text, &chunks);
    }

    #[test]
    fn test_zero_cap_still_makes_progress() {
        assert_eq!(split_paragraph("abc", 0), vec!["a", "b", "c"]);
    }
}
