use crate::{
    complex::{ComplexBreaker, WordListBreaker},
    hooks::{BuiltinFormat, ForceUrgent, Format, Preprocess, Sizing, Urgent},
};

use super::*;

fn chars(text: &str) -> Vec<char> {
    text.chars().collect()
}

fn with_colmax(colmax: f64) -> Rc<Config> {
    Rc::new(Config {
        colmax,
        ..Default::default()
    })
}

fn break_str(config: &Rc<Config>, text: &str) -> String {
    break_all(config, &chars(text)).unwrap().into_iter().collect()
}

fn break_chunks(config: &Rc<Config>, chunks: &[&[char]]) -> String {
    let mut state = StreamState::default();
    let mut output = Vec::new();
    for chunk in chunks {
        output.extend(break_partial(config, &mut state, Some(chunk)).unwrap());
    }
    output.extend(break_partial(config, &mut state, None).unwrap());
    assert!(state.is_empty());
    output.into_iter().collect()
}

fn assert_chunk_invariant(config: &Rc<Config>, text: &str) {
    let text = chars(text);
    let expected: String = break_all(config, &text).unwrap().into_iter().collect();

    for split in 0..=text.len() {
        let (head, tail) = text.split_at(split);
        assert_eq!(
            expected,
            break_chunks(config, &[head, tail]),
            "split at {split}"
        );
    }

    let singles: Vec<&[char]> = text.chunks(1).collect();
    assert_eq!(expected, break_chunks(config, &singles), "single code points");
}

fn prefix_hook(phase: FormatPhase, frag: &GcString) -> Option<GcString> {
    match phase {
        FormatPhase::StartOfText | FormatPhase::StartOfParagraph => {
            let mut chars = vec!['#', ' '];
            chars.extend_from_slice(frag.as_chars());
            Some(GcString::new(chars, frag.config().clone()))
        }
        _ => None,
    }
}

/// Urgent breaking that hyphenates after every third cluster
fn hyphenate(_cols: f64, _pre: &GcString, _spc: &GcString, frag: &GcString) -> Option<GcString> {
    let mut chars = Vec::new();
    let mut cuts = Vec::new();
    for idx in 0..frag.len() {
        if idx > 0 && idx % 3 == 0 {
            chars.push('-');
            cuts.push(chars.len());
        }
        chars.extend_from_slice(frag.cluster_chars(idx));
    }

    let mut broken = GcString::new(chars, frag.config().clone());
    let starts: Vec<usize> = broken
        .clusters()
        .iter()
        .enumerate()
        .filter(|(_, cluster)| cuts.contains(&cluster.start))
        .map(|(idx, _)| idx)
        .collect();
    for idx in starts {
        broken.set_flags(idx, ClusterFlags::BREAK_BEFORE).unwrap();
    }
    Some(broken)
}

/// Every cluster is two columns wide
fn double_width(cols: f64, _pre: &GcString, spc: &GcString, frag: &GcString, max: f64) -> Option<f64> {
    if max > 0.0 {
        return None;
    }
    Some(cols + 2.0 * (spc.len() + frag.len()) as f64)
}

fn expand_tabs(text: &[char]) -> Option<Vec<char>> {
    if !text.contains(&'\t') {
        return None;
    }

    let mut expanded = Vec::new();
    for ch in text {
        match ch {
            '\t' => expanded.extend_from_slice(&[' '; 4]),
            ch => expanded.push(*ch),
        }
    }
    Some(expanded)
}

fn thai_config(colmax: f64) -> Rc<Config> {
    let breaker = WordListBreaker::new(["ภาษา", "ไทย", "ง่าย"]);
    Rc::new(Config {
        colmax,
        complex: Some(Rc::new(breaker) as Rc<dyn ComplexBreaker>),
        ..Default::default()
    })
}

#[test]
fn wrap_at_spaces() {
    assert_eq!("AB\nCD", break_str(&with_colmax(3.0), "AB CD"));
    assert_eq!(
        "the quick\nbrown fox\njumps",
        break_str(&with_colmax(10.0), "the quick brown fox jumps")
    );
}

#[test]
fn unlimited() {
    let config = with_colmax(0.0);
    let text = "no limits  here,\njust mandatory breaks\r\n";
    assert_eq!(text, break_str(&config, text));
}

#[test]
fn crlf_is_one_break() {
    let config = Rc::new(Config {
        format: Some(Rc::new(BuiltinFormat::Newline) as Rc<dyn Format>),
        ..Default::default()
    });
    assert_eq!("a\nb", break_str(&config, "a\r\nb"));

    let (head, tail) = (chars("a\r"), chars("\nb"));
    assert_eq!("a\nb", break_chunks(&config, &[&head, &tail]));
}

#[test]
fn empty_input() {
    let config = with_colmax(10.0);
    assert_eq!("", break_str(&config, ""));

    let mut state = StreamState::default();
    let output = break_partial(&config, &mut state, None).unwrap();
    assert!(output.is_empty());
    assert!(state.is_empty());
}

#[test]
fn output_waits_for_decision() {
    let mut breaker = LineBreaker::new(Config {
        colmax: 5.0,
        ..Default::default()
    });

    assert_eq!("", breaker.break_partial("abc").unwrap());
    assert_eq!(chars("abc"), breaker.state().unread);

    assert_eq!("", breaker.break_partial(" de").unwrap());
    assert_eq!(chars("abc"), breaker.state().bufstr);
    assert_eq!(chars(" "), breaker.state().bufspc);
    assert_eq!(3.0, breaker.state().bufcols);
    assert_eq!(chars("de"), breaker.state().unread);
    assert_eq!(Phase::InParagraph, breaker.state().phase);

    assert_eq!("abc\nde", breaker.finish().unwrap());
    assert!(breaker.state().is_empty());
}

#[test]
fn charmax_force_chop() {
    let config = Rc::new(Config {
        charmax: 5,
        ..Default::default()
    });
    assert_eq!("aaaaa\naaaaa\naa", break_str(&config, &"a".repeat(12)));
}

#[test]
fn long_word_stays_whole() {
    let config = with_colmax(4.0);
    assert_eq!("aaaaaaaaaa\nbb", break_str(&config, "aaaaaaaaaa bb"));
}

#[test]
fn wide_clusters_stay_whole() {
    assert_eq!("漢\n字", break_str(&with_colmax(1.0), "漢字"));
    assert_eq!("漢字\nかな", break_str(&with_colmax(4.0), "漢字かな"));
}

#[test]
fn force_urgent() {
    let config = Rc::new(Config {
        colmax: 4.0,
        urgent: Some(Rc::new(ForceUrgent) as Rc<dyn Urgent>),
        ..Default::default()
    });
    assert_eq!("aaaa\naaaa\naa\nbb", break_str(&config, "aaaaaaaaaa bb"));
}

#[test]
fn rewriting_urgent() {
    let config = Rc::new(Config {
        charmax: 5,
        urgent: Some(Rc::new(hyphenate) as Rc<dyn Urgent>),
        ..Default::default()
    });
    assert_eq!("aaa-\naaaa", break_str(&config, "aaaaaaa"));

    let (head, tail) = (chars("aaa"), chars("aaaa"));
    assert_eq!("aaa-\naaaa", break_chunks(&config, &[&head, &tail]));
}

#[test]
fn colmin() {
    let config = |colmin: f64| {
        Rc::new(Config {
            colmax: 6.0,
            colmin,
            urgent: Some(Rc::new(ForceUrgent) as Rc<dyn Urgent>),
            ..Default::default()
        })
    };

    // A line shorter than colmin is filled by breaking the next word
    assert_eq!("ab\ncdefgh", break_str(&config(0.0), "ab cdefgh"));
    assert_eq!("ab cde\nfgh", break_str(&config(3.0), "ab cdefgh"));
    assert_eq!("abcd\nefgh", break_str(&config(3.0), "abcd efgh"));
}

#[test]
fn custom_sizing() {
    let text = "ab cd ef";
    assert_eq!(text, break_str(&with_colmax(8.0), text));

    let config = Rc::new(Config {
        colmax: 8.0,
        sizing: Some(Rc::new(double_width) as Rc<dyn Sizing>),
        ..Default::default()
    });
    assert_eq!("ab\ncd\nef", break_str(&config, text));
}

#[test]
fn preprocess() {
    let config = |colmax: f64| {
        Rc::new(Config {
            colmax,
            preprocess: Some(Rc::new(expand_tabs) as Rc<dyn Preprocess>),
            ..Default::default()
        })
    };

    assert_eq!("a    b", break_str(&config(0.0), "a\tb"));
    assert_eq!("a\nbcd\nef", break_str(&config(4.0), "a\tbcd ef"));

    let (head, tail) = (chars("a\tb"), chars("cd ef"));
    assert_eq!("a\nbcd\nef", break_chunks(&config(4.0), &[&head, &tail]));
}

#[test]
fn builtin_formats() {
    let config = |format: BuiltinFormat| {
        Rc::new(Config {
            colmax: 5.0,
            format: Some(Rc::new(format) as Rc<dyn Format>),
            ..Default::default()
        })
    };

    let text = "abc   def  ";
    assert_eq!("abc\ndef  ", break_str(&config(BuiltinFormat::Default), text));
    assert_eq!("abc   \ndef  ", break_str(&config(BuiltinFormat::Simple), text));
    assert_eq!("abc\ndef", break_str(&config(BuiltinFormat::Trim), text));
    assert_eq!("abc\ndef", break_str(&config(BuiltinFormat::Newline), text));

    assert_eq!("ab  \ncd", break_str(&config(BuiltinFormat::Default), "ab  \ncd"));
    assert_eq!("ab\ncd", break_str(&config(BuiltinFormat::Trim), "ab  \ncd"));
}

#[test]
fn start_formatting() {
    let config = Rc::new(Config {
        format: Some(Rc::new(prefix_hook) as Rc<dyn Format>),
        ..Default::default()
    });

    assert_eq!("# ab cd", break_str(&config, "ab cd"));
    assert_eq!("# ab\n# cd", break_str(&config, "ab\ncd"));
}

#[test]
fn hangul_as_alphabetic() {
    let config = with_colmax(4.0);
    assert_eq!("한국\n어", break_str(&config, "한국어"));

    let config = Rc::new(Config {
        colmax: 4.0,
        options: BreakOptions::HANGUL_AS_AL,
        ..Default::default()
    });
    assert_eq!("한국어", break_str(&config, "한국어"));
}

#[test]
fn legacy_combining_marks() {
    let config = with_colmax(2.0);
    assert_eq!("a\n\u{0301}b", break_str(&config, "a \u{0301}b"));

    let config = Rc::new(Config {
        colmax: 2.0,
        options: BreakOptions::LEGACY_CM,
        ..Default::default()
    });
    assert_eq!("a \u{0301}\nb", break_str(&config, "a \u{0301}b"));
}

#[test]
fn complex_words() {
    let config = thai_config(8.0);
    assert_eq!(
        "ภาษาไทย\nง่าย ภาษา\nไทย",
        break_str(&config, "ภาษาไทยง่าย ภาษาไทย")
    );
}

#[test]
fn chunk_invariance() {
    let text = "Hello, world! This is a (test) of line-breaking.\r\n\
                Second  paragraph\nwith 漢字かな and e\u{0301}xtra\u{200B}zero  width. ";
    assert_chunk_invariant(&with_colmax(0.0), text);
    assert_chunk_invariant(&with_colmax(12.0), text);

    let trim = Rc::new(Config {
        colmax: 12.0,
        format: Some(Rc::new(BuiltinFormat::Trim) as Rc<dyn Format>),
        ..Default::default()
    });
    assert_chunk_invariant(&trim, text);
}

#[test]
fn chunk_invariance_urgent() {
    let charmax = Rc::new(Config {
        charmax: 5,
        ..Default::default()
    });
    assert_chunk_invariant(&charmax, "aaaaaaaaaaaa bbb cc");

    let force = Rc::new(Config {
        colmax: 4.0,
        urgent: Some(Rc::new(ForceUrgent) as Rc<dyn Urgent>),
        ..Default::default()
    });
    assert_chunk_invariant(&force, "aaaaaaaaaa bb cc dd");

    let colmin = Rc::new(Config {
        colmax: 6.0,
        colmin: 3.0,
        urgent: Some(Rc::new(ForceUrgent) as Rc<dyn Urgent>),
        ..Default::default()
    });
    assert_chunk_invariant(&colmin, "ab cdefghij k lmnopqrstu vw");
}

#[test]
fn chunk_invariance_rewriting_urgent() {
    let config = Rc::new(Config {
        charmax: 5,
        urgent: Some(Rc::new(hyphenate) as Rc<dyn Urgent>),
        ..Default::default()
    });
    assert_chunk_invariant(&config, "aaaaaaaaaaaa bbb cc");
    assert_chunk_invariant(
        &config,
        "c,\u{301}\u{2060}\u{200b}\u{2060}漢\t\u{301}\u{a0}ภย2漢ทา2",
    );

    let colmax = Rc::new(Config {
        colmax: 4.0,
        urgent: Some(Rc::new(hyphenate) as Rc<dyn Urgent>),
        ..Default::default()
    });
    assert_chunk_invariant(&colmax, "xy abcdefghij kl mnopqrs");
}

#[test]
fn chunk_invariance_hooks() {
    let sizing = Rc::new(Config {
        colmax: 8.0,
        sizing: Some(Rc::new(double_width) as Rc<dyn Sizing>),
        ..Default::default()
    });
    assert_chunk_invariant(&sizing, "ab cd ef ghi j");

    let preprocess = Rc::new(Config {
        colmax: 6.0,
        preprocess: Some(Rc::new(expand_tabs) as Rc<dyn Preprocess>),
        ..Default::default()
    });
    assert_chunk_invariant(&preprocess, "a\tb cd\t\tef g");
}

#[test]
fn chunk_invariance_formatting() {
    let config = Rc::new(Config {
        format: Some(Rc::new(prefix_hook) as Rc<dyn Format>),
        ..Default::default()
    });
    assert_chunk_invariant(&config, "ab cd\nef\n\ngh");
}

#[test]
fn chunk_invariance_complex() {
    assert_chunk_invariant(&thai_config(8.0), "ภาษาไทยง่าย ภาษาไทย");
}

#[test]
fn breaker_lifecycle() {
    let mut breaker = LineBreaker::new(Config {
        colmax: 3.0,
        ..Default::default()
    });
    assert_eq!("AB\nCD", breaker.break_all("AB CD").unwrap());
    assert!(breaker.state().is_empty());

    breaker.break_partial("xy z").unwrap();
    assert!(!breaker.state().is_empty());

    let copy = breaker.clone();
    assert!(copy.state().is_empty());
    assert_eq!(3.0, copy.config().colmax);

    breaker.reset();
    assert!(breaker.state().is_empty());
    assert_eq!("ab", breaker.break_all("ab").unwrap());
}
