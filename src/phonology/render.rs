use itertools::Itertools;
use unicode_normalization::UnicodeNormalization;

use super::dialect::{pfs_mark, Dialect};
use super::syllable::{split_initial, Syllable};

/// Church-romanization tone carriers, most preferred first.
const TONE_CARRIERS: [char; 6] = ['a', 'o', 'e', 'u', 'ṳ', 'i'];

/// Whitespace and the punctuation that separates syllables.
pub fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | ',' | '.' | ':' | ';' | '—' | '-')
}

/// All renderings of one `original` string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rendered {
    pub numbered: String,
    pub marked: String,
    pub pfs: Option<String>,
    /// Syllables whose tone could not be determined.
    pub unrecognized: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct Transducer {
    dialect: Dialect,
}

impl Transducer {
    pub fn new(dialect: Dialect) -> Self {
        Transducer { dialect }
    }

    pub fn transduce(&self, original: &str) -> Rendered {
        let normalized = original.replace("--", "—");
        let mut out = Rendered {
            pfs: self.dialect.has_pfs().then(String::new),
            ..Default::default()
        };

        let tokens = normalized.chars().group_by(|c| is_separator(*c));
        for (separator, chars) in &tokens {
            let token: String = chars.collect();
            if separator {
                out.numbered.push_str(&token);
                out.marked.push_str(&token);
                if let Some(pfs) = out.pfs.as_mut() {
                    pfs.push_str(&token);
                }
                continue;
            }
            self.syllable(&token, &mut out);
        }
        out
    }

    fn syllable(&self, written: &str, out: &mut Rendered) {
        let syl = Syllable::decompose(written);
        let tone = if syl.foreign_mark {
            None
        } else {
            self.dialect.tone(syl.mark, syl.is_checked())
        };
        if tone.is_none() {
            out.unrecognized.push(written.to_string());
        }

        let base = syl.voiced_base();
        out.numbered.push_str(&base);
        out.marked.push_str(&base);
        if let Some(t) = tone {
            out.numbered.push_str(&t.to_string());
            out.marked.push_str(self.dialect.glyph(t));
        }
        if let Some(pfs) = out.pfs.as_mut() {
            pfs.push_str(&church_spelling(written, &base, tone));
        }
    }
}

/// Siyen church romanization: palatal initials before `i`, then the tone
/// mark on the rhyme's carrier vowel (or the syllabic nasal).
fn church_spelling(written: &str, base: &str, tone: Option<u8>) -> String {
    let (initial, rhyme) = split_initial(base);
    let written_nfc: String = written.nfc().collect();
    // Compared as written, tone mark included: only an unmarked `ii` (tone 3)
    // keeps the dental initial, so `sií` goes to `x` but `sii` stays `s`.
    // TODO: confirm with a native reader whether marked `ii` rhymes
    // (`sìi`, `ziī`) should keep the dental initial as well.
    let written_rhyme = written_nfc.strip_prefix(initial).unwrap_or(&written_nfc);
    let initial = match initial {
        "z" | "c" | "s" if rhyme.starts_with('i') && written_rhyme != "ii" => match initial {
            "z" => "j",
            "c" => "q",
            _ => "x",
        },
        other => other,
    };

    let letters = format!("{}{}", initial, rhyme);
    let Some(mark) = tone.and_then(pfs_mark) else {
        return letters;
    };
    let target = carrier(&letters[initial.len()..])
        .map(|(i, c)| (i + initial.len(), c))
        .or_else(|| letters.char_indices().find(|(_, c)| matches!(c, 'm' | 'n')));
    match target {
        Some((i, c)) => {
            let at = i + c.len_utf8();
            let mut marked = String::with_capacity(letters.len() + mark.len_utf8());
            marked.push_str(&letters[..at]);
            marked.push(mark);
            marked.push_str(&letters[at..]);
            marked.nfc().collect()
        }
        None => letters,
    }
}

/// Vowel that takes the tone mark: `o` in a leading `oa`, otherwise the
/// first of a, o, e, u, ṳ, i present in the rhyme.
fn carrier(rhyme: &str) -> Option<(usize, char)> {
    if rhyme.starts_with("oa") {
        return Some((0, 'o'));
    }
    TONE_CARRIERS
        .iter()
        .find_map(|&v| rhyme.find(v).map(|i| (i, v)))
}
