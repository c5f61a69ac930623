use super::*;
use crate::text::measure::DeterministicMeasurer;

fn title_font() -> FontSpec {
    FontSpec::new(FontSpec::BOLD, 60.0)
}

#[test]
fn empty_input_yields_no_lines() {
    let mut m = DeterministicMeasurer::default();
    assert!(wrap("", 768.0, title_font(), &mut m).is_empty());
    assert!(wrap(" \t\n ", 768.0, title_font(), &mut m).is_empty());
}

#[test]
fn single_word_is_never_split() {
    let mut m = DeterministicMeasurer::default();
    assert_eq!(wrap("A", 1.0, title_font(), &mut m), vec!["A".to_string()]);
    assert_eq!(
        wrap("Supercalifragilistic", 10.0, title_font(), &mut m),
        vec!["Supercalifragilistic".to_string()]
    );
}

#[test]
fn greedy_packs_words_until_width_is_exceeded() {
    let mut m = DeterministicMeasurer::default();
    // 10px font, 0.55em advance => 5.5px per char; 60px fits 10 chars.
    let font = FontSpec::new(400, 10.0);
    let lines = wrap("aaaa bbbb cccc dd e", 60.0, font, &mut m);
    assert_eq!(lines, vec!["aaaa bbbb", "cccc dd e"]);
}

#[test]
fn whitespace_runs_collapse_to_single_spaces() {
    let mut m = DeterministicMeasurer::default();
    let lines = wrap("  one \n two\tthree  ", 10_000.0, title_font(), &mut m);
    assert_eq!(lines, vec!["one two three"]);
}

#[test]
fn every_line_fits_or_is_a_single_overlong_word() {
    let mut m = DeterministicMeasurer::default();
    let font = FontSpec::new(300, 36.0);
    let text = "Generate beautiful, customizable OG images with a layout engine \
                Pneumonoultramicroscopicsilicovolcanoconiosis that packs words greedily";
    let max = 300.0;
    let lines = wrap(text, max, font, &mut m);
    assert!(lines.len() > 3);
    for line in &lines {
        let w = m.measure(line, font);
        assert!(w <= max || !line.contains(' '), "line '{line}' is {w}px");
    }
}

#[test]
fn rewrapping_joined_lines_is_idempotent() {
    let mut m = DeterministicMeasurer::default();
    let font = title_font();
    let text = "Building a deterministic Open Graph renderer in Rust with greedy wrapping";
    let first = wrap(text, 768.0, font, &mut m);
    let second = wrap(&first.join(" "), 768.0, font, &mut m);
    assert_eq!(first, second);
}

#[test]
fn truncation_happens_after_wrapping() {
    let mut m = DeterministicMeasurer::default();
    let font = FontSpec::new(400, 10.0);
    let wrapped = WrappedText::new("a b c d e", 1.0, font, 12.0, &mut m);
    assert_eq!(wrapped.len(), 5);
    let capped = wrapped.truncated(2);
    assert_eq!(capped.lines, vec!["a", "b"]);
    assert_eq!(capped.line_height, 12.0);
}
