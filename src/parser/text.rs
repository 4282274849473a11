use std::sync::LazyLock;

use regex::Regex;

static DASH_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-{2,}").unwrap());
static SLASH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[／/]").unwrap());

/// Combining macron below: the stored form of underlined letters.
pub const MACRON_BELOW: char = '\u{0331}';

pub const PIN_MARKER: char = '📌';
pub const DOT_MARKER: char = '⚫';

/// ①–⑲ and ❶–❿.
pub fn is_definition_marker(c: char) -> bool {
    matches!(c, '\u{2460}'..='\u{2472}' | '\u{2776}'..='\u{277F}')
}

pub fn is_example_marker(c: char) -> bool {
    c == PIN_MARKER || c == DOT_MARKER
}

/// Han ideographs, including the extension and compatibility blocks.
pub fn is_han(c: char) -> bool {
    matches!(
        c as u32,
        0x3400..=0x4DBF
            | 0x4E00..=0x9FFF
            | 0xF900..=0xFAFF
            | 0x20000..=0x2A6DF
            | 0x2A700..=0x2EBEF
            | 0x2EBF0..=0x2EE5F
            | 0x2F800..=0x2FA1F
            | 0x30000..=0x3347F
    )
}

pub fn is_pua(c: char) -> bool {
    matches!(c as u32, 0xE000..=0xF8FF)
}

/// Latin letters with or without precomposed diacritics, plus the
/// superscript n used for nasalised finals.
pub fn is_latin_letter(c: char) -> bool {
    c.is_ascii_alphabetic()
        || matches!(
            c as u32,
            0x00C0..=0x00D6 | 0x00D8..=0x00F6 | 0x00F8..=0x02AF | 0x1D00..=0x1DBF | 0x1E00..=0x1EFF
        )
        || c == 'ⁿ'
}

pub fn is_combining_mark(c: char) -> bool {
    unicode_normalization::char::is_combining_mark(c)
}

/// Characters allowed inside a romanization run.
pub fn is_romanization_char(c: char) -> bool {
    is_latin_letter(c) || is_combining_mark(c) || c == ' ' || c == '-' || c == '\''
}

/// Characters between which a space is meaningful (syllable separators).
fn is_latin_like(c: char) -> bool {
    is_latin_letter(c)
        || is_combining_mark(c)
        || c.is_ascii_digit()
        || ".,;:!?-()[]{}'\"".contains(c)
}

/// Collapse every run of whitespace (including `\n` and `\t`) to one space.
pub fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_ws = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !in_ws {
                out.push(' ');
                in_ws = true;
            }
        } else {
            out.push(ch);
            in_ws = false;
        }
    }
    out
}

/// Keep a space only when both neighbours are Latin-like; CJK text is not
/// space-delimited, romanization syllables are.
pub fn normalize_spaces(s: &str) -> String {
    let collapsed = collapse_whitespace(s);
    let chars: Vec<char> = collapsed.trim().chars().collect();
    let mut out = String::with_capacity(collapsed.len());
    for (i, &ch) in chars.iter().enumerate() {
        if ch == ' ' {
            let before = i.checked_sub(1).map(|j| chars[j]);
            let after = chars.get(i + 1).copied();
            if before.is_some_and(is_latin_like) && after.is_some_and(is_latin_like) {
                out.push(' ');
            }
        } else {
            out.push(ch);
        }
    }
    out
}

/// Clean a romanization run: collapse whitespace, drop `--` runs and slashes.
pub fn clean_pronunciation(raw: &str) -> String {
    let collapsed = collapse_whitespace(raw);
    let no_dashes = DASH_RUN_RE.replace_all(&collapsed, "");
    let no_slashes = SLASH_RE.replace_all(&no_dashes, "");
    collapse_whitespace(&no_slashes).trim().to_string()
}

pub fn first_han_index(s: &str) -> Option<usize> {
    s.char_indices().find(|(_, c)| is_han(*c)).map(|(i, _)| i)
}

pub fn han_chars(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().filter(|c| is_han(*c))
}

pub fn has_latin(s: &str) -> bool {
    s.chars().any(is_latin_letter)
}

/// Length in bytes of the leading romanization run (letters, marks, spaces,
/// hyphens), trailing spaces excluded.
pub fn romanization_prefix_len(s: &str) -> usize {
    let end = s
        .char_indices()
        .find(|(_, c)| !is_romanization_char(*c))
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    s[..end].trim_end().len()
}

/// True when the whole (trimmed) string is a romanization run.
pub fn is_romanization(s: &str) -> bool {
    let t = s.trim();
    !t.is_empty() && has_latin(t) && t.chars().all(is_romanization_char)
}

pub fn count_pua(s: &str) -> usize {
    s.chars().filter(|c| is_pua(*c)).count()
}
