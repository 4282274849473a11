use std::sync::LazyLock;

use regex::Regex;

use crate::parser::blocks::Block;
use crate::parser::text::{self, is_definition_marker, is_example_marker, is_han};

static SOURCE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"源自([^。，]+)").unwrap());
static VARIANT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"又作[「『]([^」』]+)[」』]").unwrap());

const DEFINITION_KEYWORDS: [&str; 5] = ["源自", "又作", "意思", "屬於", "，"];

#[derive(Debug, Clone, PartialEq)]
pub struct WordParts {
    /// `None` when the paragraph has no romanization of its own.
    pub pronunciation: Option<String>,
    pub headword: String,
    pub definition_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum UnitKind {
    Syllable,
    Han,
}

#[derive(Debug, Clone, Copy)]
struct Unit {
    kind: UnitKind,
    end: usize,
}

/// Try every word shape against a paragraph, indented or not.
pub fn parse(block: &Block) -> Option<WordParts> {
    // Whitespace is collapsed but not normalized yet: the splits below rely
    // on the spaces between romanization and characters.
    let full = text::collapse_whitespace(&block.raw_text());
    let full = full.trim();
    let first = full.chars().next()?;
    if is_definition_marker(first) || is_example_marker(first) {
        return None;
    }

    match full.find(['=', '＝']) {
        Some(pos) => {
            let eq_len = full[pos..].chars().next().map_or(1, char::len_utf8);
            parse_equation(full[..pos].trim(), full[pos + eq_len..].trim())
        }
        None => parse_run_on(full),
    }
}

fn parse_equation(before: &str, definition: &str) -> Option<WordParts> {
    if before.is_empty() || definition.is_empty() {
        return None;
    }
    let units = units(before);
    let syllables = units.iter().filter(|u| u.kind == UnitKind::Syllable).count();
    let hans = units.len() - syllables;

    let (pronunciation, headword) = match (syllables, hans) {
        (0, 0) => return None,
        // 阿哥＝… : the characters alone, pronunciation comes from context.
        (0, _) => {
            if !before.chars().all(|c| is_han(c) || c == ' ') {
                return None;
            }
            (None, before.to_string())
        }
        // Loanword written only in romanization.
        (_, 0) => (Some(before.to_string()), before.to_string()),
        (s, h) if s > 2 * h => {
            // `sā ku là ha sā ku là蝦`: the romanization spells out the whole
            // headword, which itself starts with romanization.
            let split = units[units.len() / 2 - 1].end;
            (Some(before[..split].to_string()), before[split..].to_string())
        }
        _ => {
            let first_han = text::first_han_index(before)?;
            let split = split_before_han(before, first_han);
            if split == 0 {
                (None, before.to_string())
            } else {
                (Some(before[..split].to_string()), before[split..].to_string())
            }
        }
    };

    Some(WordParts {
        pronunciation: pronunciation
            .map(|p| text::normalize_spaces(&text::clean_pronunciation(&p)))
            .filter(|p| !p.is_empty()),
        headword: text::normalize_spaces(&headword),
        definition_text: definition.to_string(),
    })
}

/// Byte offset where the romanization ends in front of the first character:
/// the space right before it, or the start of a syllable glued to it.
fn split_before_han(s: &str, first_han: usize) -> usize {
    let head = &s[..first_han];
    if head.ends_with(' ') {
        return head.trim_end().len();
    }
    let glued = head
        .char_indices()
        .rev()
        .take_while(|(_, c)| text::is_latin_letter(*c) || text::is_combining_mark(*c))
        .last()
        .map(|(i, _)| i)
        .unwrap_or(first_han);
    if glued == 0 {
        first_han
    } else {
        head[..glued].trim_end().len()
    }
}

fn units(s: &str) -> Vec<Unit> {
    let mut units = Vec::new();
    let mut in_syllable = false;
    for (i, c) in s.char_indices() {
        if is_han(c) {
            if in_syllable {
                units.push(Unit { kind: UnitKind::Syllable, end: i });
                in_syllable = false;
            }
            units.push(Unit { kind: UnitKind::Han, end: i + c.len_utf8() });
        } else if text::is_latin_letter(c) || text::is_combining_mark(c) {
            in_syllable = true;
        } else if in_syllable {
            units.push(Unit { kind: UnitKind::Syllable, end: i });
            in_syllable = false;
        }
    }
    if in_syllable {
        units.push(Unit { kind: UnitKind::Syllable, end: s.len() });
    }
    units
}

/// Shapes without `=`: the romanization is also the headword.
fn parse_run_on(full: &str) -> Option<WordParts> {
    let pron_len = text::romanization_prefix_len(full);
    if pron_len == 0 {
        return None;
    }
    let pronunciation = text::normalize_spaces(&text::clean_pronunciation(&full[..pron_len]));
    if !text::has_latin(&pronunciation) {
        return None;
    }
    let rest = full[pron_len..].trim_start();
    let first = rest.chars().next()?;

    let definition_text = if is_definition_marker(first) || is_han(first) {
        rest
    } else if DEFINITION_KEYWORDS.iter().any(|kw| rest.contains(kw)) {
        rest.trim_start_matches([',', '，', ':', '：', ' '])
    } else {
        return None;
    };
    if definition_text.is_empty() {
        return None;
    }

    Some(WordParts {
        headword: pronunciation.clone(),
        pronunciation: Some(pronunciation),
        definition_text: definition_text.to_string(),
    })
}

/// Origin note (源自…) in the first sense.
pub fn source_of(definition_text: &str) -> Option<String> {
    SOURCE_RE
        .captures(first_sense(definition_text))
        .map(|c| text::normalize_spaces(&c[1]))
        .filter(|s| !s.is_empty())
}

pub fn variants_of(definition_text: &str) -> Vec<String> {
    VARIANT_RE
        .captures_iter(definition_text)
        .map(|c| text::normalize_spaces(&c[1]))
        .collect()
}

fn first_sense(s: &str) -> &str {
    let body = s.strip_prefix(|c: char| is_definition_marker(c)).unwrap_or(s);
    match body.find(is_definition_marker) {
        Some(end) => &body[..end],
        None => body,
    }
}
