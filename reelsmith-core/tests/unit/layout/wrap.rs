use super::*;

fn corpus() -> Vec<String> {
    let mut out = vec![
        "Gracias a Dios por este día".to_string(),
        "a".to_string(),
        "supercalifragilisticexpialidocious is long".to_string(),
        "  spaced   out    words  ".to_string(),
        "first paragraph\nsecond paragraph".to_string(),
    ];
    let words = ["sol", "esperanza", "fe", "caminar", "juntos", "siempre", "luz"];
    for n in 1..60 {
        let s: Vec<&str> = (0..n).map(|i| words[(i * 7 + n) % words.len()]).collect();
        out.push(s.join(" "));
    }
    out
}

#[test]
fn lines_never_exceed_width_except_lone_long_words() {
    for max_width in [40.0f32, 95.0, 160.0, 333.0] {
        let mut m = FixedAdvance(10.0);
        for text in corpus() {
            for line in wrap_lines(&text, max_width, &mut m) {
                let w = FixedAdvance(10.0).measure(&line);
                let single_word = !line.contains(' ');
                assert!(
                    w <= max_width || single_word,
                    "line {line:?} is {w}px > {max_width}px"
                );
            }
        }
    }
}

#[test]
fn greedy_fill_packs_words() {
    let mut m = FixedAdvance(10.0);
    let lines = wrap_lines("aa bb cc dd", 50.0, &mut m);
    assert_eq!(lines, vec!["aa bb", "cc dd"]);
}

#[test]
fn long_word_sits_alone() {
    let mut m = FixedAdvance(10.0);
    let lines = wrap_lines("hi enormousword yo", 50.0, &mut m);
    assert_eq!(lines, vec!["hi", "enormousword", "yo"]);
}

#[test]
fn line_count_is_capped() {
    let mut m = FixedAdvance(10.0);
    let text = (0..40).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
    let lines = wrap_lines(&text, 30.0, &mut m);
    assert_eq!(lines.len(), MAX_LINES);
    assert_eq!(lines[0], "w0");
    assert_eq!(lines[MAX_LINES - 1], "w7");
}

#[test]
fn newlines_start_new_lines() {
    let mut m = FixedAdvance(1.0);
    let lines = wrap_lines("one\ntwo three", 1000.0, &mut m);
    assert_eq!(lines, vec!["one", "two three"]);
}

#[test]
fn blank_text_yields_no_lines() {
    let mut m = FixedAdvance(1.0);
    assert!(wrap_lines("  \n ", 100.0, &mut m).is_empty());
}
