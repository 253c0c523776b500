//! Tests for the inline span tokenizer

use super::*;

fn concat(runs: &[StyledRun]) -> String {
    runs.iter().map(|run| run.text.as_str()).collect()
}

#[test]
fn test_plain_text_is_single_run() {
    assert_eq!(tokenize("just text"), vec![StyledRun::plain("just text")]);
}

#[test]
fn test_empty_input_yields_placeholder_run() {
    assert_eq!(tokenize(""), vec![StyledRun::plain("")]);
}

#[test]
fn test_bold_italic_wins_tie_at_same_start() {
    let runs = tokenize("***x***");
    assert_eq!(runs, vec![StyledRun::styled("x", true, true, false)]);
}

#[test]
fn test_mixed_emphasis_in_order() {
    let runs = tokenize("これは**太字**と*斜体*と`インラインコード`を含んでいます。");

    assert_eq!(
        runs,
        vec![
            StyledRun::plain("これは"),
            StyledRun::styled("太字", true, false, false),
            StyledRun::plain("と"),
            StyledRun::styled("斜体", false, true, false),
            StyledRun::plain("と"),
            StyledRun::styled("インラインコード", false, false, true),
            StyledRun::plain("を含んでいます。"),
        ]
    );
}

#[test]
fn test_bold_inner_text_is_not_rescanned() {
    let runs = tokenize("**bold *inner* text**");
    assert_eq!(
        runs,
        vec![StyledRun::styled("bold *inner* text", true, false, false)]
    );
}

#[test]
fn test_earliest_match_beats_priority() {
    // Code starts first, so the italic pattern inside it never applies
    let runs = tokenize("`a*b*c` then *it*");
    assert_eq!(
        runs,
        vec![
            StyledRun::styled("a*b*c", false, false, true),
            StyledRun::plain(" then "),
            StyledRun::styled("it", false, true, false),
        ]
    );
}

#[test]
fn test_empty_emphasis_is_dropped() {
    assert_eq!(tokenize("****"), vec![StyledRun::plain("")]);
    assert_eq!(tokenize("a****b"), vec![StyledRun::plain("a"), StyledRun::plain("b")]);
}

#[test]
fn test_unclosed_marker_stays_plain() {
    assert_eq!(tokenize("2 * 3 = 6"), vec![StyledRun::plain("2 * 3 = 6")]);
}

#[test]
fn test_runs_cover_text_without_markers() {
    let inputs = [
        "a **b** c `d` e",
        "**氏名:** 舛田 岳",
        "start *one* middle **two** end ***three***",
    ];
    let expected = [
        "a b c d e",
        "氏名: 舛田 岳",
        "start one middle two end three",
    ];

    for (input, want) in inputs.iter().zip(expected) {
        let runs = tokenize(input);
        assert_eq!(concat(&runs), want, "input: {input}");
        assert!(runs.iter().all(|run| !run.text.is_empty()));
    }
}

#[test]
fn test_runs_char_len_counts_characters() {
    let runs = tokenize("**太字**abc");
    assert_eq!(runs_char_len(&runs), 5);
}
