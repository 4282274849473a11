use std::sync::LazyLock;

use regex::Regex;

use crate::parser::blocks::Block;
use crate::parser::text;

use super::Thresholds;

static NOTES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[（(]([^）)]+)[）)]").unwrap());
static LITERARY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"讀音作[「『]([^」』]+)[」』]").unwrap());
static VERNACULAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"語音作[「『]([^」』]+)[」』]").unwrap());

#[derive(Debug, Clone, PartialEq)]
pub struct CharacterParts {
    pub character: String,
    pub classical_notes: Option<String>,
    /// Romanization written in the paragraph itself; replaces the inherited one.
    pub pronunciation: Option<String>,
    pub literary_reading: Option<String>,
    pub vernacular_reading: Option<String>,
}

/// Leading bold single character followed somewhere by a small-font run.
pub fn matches(block: &Block, th: &Thresholds) -> bool {
    let mut runs = block.non_blank_runs();
    let Some(first) = runs.next() else {
        return false;
    };
    if !first.style.bold || !is_single_han(first.text.trim()) {
        return false;
    }
    runs.any(|r| r.style.is_at_most(th.small_pt))
}

fn is_single_han(s: &str) -> bool {
    let mut chars = s.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if text::is_han(c))
}

pub fn parse(block: &Block, th: &Thresholds) -> Option<CharacterParts> {
    let mut runs = block.non_blank_runs();
    let character = runs.next()?.text.trim().to_string();

    let pronunciation = runs
        .take_while(|r| !r.style.is_at_most(th.small_pt))
        .filter(|r| text::is_romanization(&r.text))
        .map(|r| r.text.as_str())
        .collect::<String>();
    let pronunciation = text::normalize_spaces(&text::clean_pronunciation(&pronunciation));

    let full = text::collapse_whitespace(&block.raw_text());
    let after_char = full
        .find(character.as_str())
        .map(|pos| &full[pos + character.len()..])
        .unwrap_or(full.as_str());
    let classical_notes = NOTES_RE
        .captures(after_char)
        .map(|c| text::normalize_spaces(&c[1]))
        .filter(|s| !s.is_empty());

    Some(CharacterParts {
        character,
        classical_notes,
        pronunciation: Some(pronunciation).filter(|p| !p.is_empty()),
        literary_reading: capture(&LITERARY_RE, &full),
        vernacular_reading: capture(&VERNACULAR_RE, &full),
    })
}

fn capture(re: &Regex, s: &str) -> Option<String> {
    re.captures(s).map(|c| c[1].trim().to_string())
}
