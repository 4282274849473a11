use itertools::Itertools;

use crate::parser::blocks::{Block, Run};
use crate::parser::text;

use super::Thresholds;

#[derive(Debug, Clone, PartialEq)]
pub struct HeadwordParts {
    pub original: String,
    pub characters: Vec<String>,
}

fn is_pronunciation_run(run: &Run, th: &Thresholds) -> bool {
    run.style.is_at_least(th.large_pt) && run.style.italic && run.style.bold
}

/// Large italic bold run plus bold CJK text: a new pronunciation group.
pub fn matches(block: &Block, th: &Thresholds) -> bool {
    let has_pron = block
        .non_blank_runs()
        .any(|r| is_pronunciation_run(r, th) && text::has_latin(&r.text));
    let has_bold_han = block
        .runs
        .iter()
        .any(|r| r.style.bold && text::han_chars(&r.text).next().is_some());
    has_pron && has_bold_han
}

pub fn parse(block: &Block, th: &Thresholds) -> Option<HeadwordParts> {
    // The romanization may be split over several runs (p + a̱).
    let joined: String = block
        .runs
        .iter()
        .filter(|r| is_pronunciation_run(r, th))
        .map(|r| r.text.as_str())
        .collect();
    let before_han = match text::first_han_index(&joined) {
        Some(i) => &joined[..i],
        None => joined.as_str(),
    };
    let original = text::normalize_spaces(&text::clean_pronunciation(before_han));
    if original.is_empty() {
        return None;
    }

    let characters: Vec<String> = block
        .runs
        .iter()
        .filter(|r| r.style.bold)
        .flat_map(|r| text::han_chars(&r.text))
        .unique()
        .map(String::from)
        .collect();
    if characters.is_empty() {
        return None;
    }

    Some(HeadwordParts {
        original,
        characters,
    })
}
