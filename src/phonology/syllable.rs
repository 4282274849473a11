use unicode_normalization::UnicodeNormalization;

use crate::parser::text::is_combining_mark;

/// Longest first, so `zh` wins over `z`.
const INITIALS: [&str; 26] = [
    "zh", "ch", "sh", "ng", "rh", "bb", "gg", "zz", "b", "c", "d", "f", "g", "h", "j", "k", "l",
    "m", "n", "p", "q", "s", "t", "v", "x", "z",
];

/// Tone diacritics, declared in priority order: when a syllable carries
/// several, the smallest wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Mark {
    MacronBelow,
    DotBelow,
    Macron,
    Acute,
    Grave,
}

impl Mark {
    pub fn from_combining(c: char) -> Option<Mark> {
        match c {
            '\u{0331}' => Some(Mark::MacronBelow),
            '\u{0323}' => Some(Mark::DotBelow),
            // Caron is a print variant of the macron.
            '\u{0304}' | '\u{030C}' => Some(Mark::Macron),
            '\u{0301}' => Some(Mark::Acute),
            // Some sources print the falling tone with a circumflex.
            '\u{0300}' | '\u{0302}' => Some(Mark::Grave),
            _ => None,
        }
    }
}

/// A syllable split into bare letters and its tone diacritic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Syllable {
    /// Letters without tone marks, NFC.
    pub base: String,
    pub mark: Option<Mark>,
    /// Carries a combining mark that is not a tone mark.
    pub foreign_mark: bool,
}

impl Syllable {
    pub fn decompose(written: &str) -> Syllable {
        let mut base = String::with_capacity(written.len());
        let mut mark: Option<Mark> = None;
        let mut foreign_mark = false;

        for c in written.nfd() {
            if let Some(m) = Mark::from_combining(c) {
                mark = Some(mark.map_or(m, |prev| prev.min(m)));
            } else if is_combining_mark(c) {
                foreign_mark = true;
            } else if c == 'ⁿ' {
                base.push_str("nn");
            } else {
                base.push(c);
            }
        }

        Syllable {
            base: base.nfc().collect(),
            mark,
            foreign_mark,
        }
    }

    /// Ends in a stop coda (p, t, k).
    pub fn is_checked(&self) -> bool {
        self.base.ends_with(['p', 't', 'k'])
    }

    /// Base with the stop coda written voiced (p/t/k → b/d/g).
    pub fn voiced_base(&self) -> String {
        if !self.is_checked() {
            return self.base.clone();
        }
        let mut out = self.base.clone();
        if let Some(coda) = out.pop() {
            out.push(match coda {
                'p' => 'b',
                't' => 'd',
                _ => 'g',
            });
        }
        out
    }
}

/// Split letters into initial and rhyme; the initial may be empty.
pub fn split_initial(letters: &str) -> (&str, &str) {
    INITIALS
        .iter()
        .find(|i| letters.starts_with(**i))
        .map(|i| letters.split_at(i.len()))
        .unwrap_or(("", letters))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_free_syllable_is_unchanged() {
        for s in ["ngiam", "sii", "pak", "zhong", "a"] {
            let syl = Syllable::decompose(s);
            assert_eq!(syl.base, s);
            assert_eq!(syl.mark, None);
            assert!(!syl.foreign_mark);
        }
    }

    #[test]
    fn marks_are_extracted() {
        assert_eq!(Syllable::decompose("pà").mark, Some(Mark::Grave));
        assert_eq!(Syllable::decompose("pâ").mark, Some(Mark::Grave));
        assert_eq!(Syllable::decompose("sií").mark, Some(Mark::Acute));
        assert_eq!(Syllable::decompose("a\u{331}").base, "a");
        assert_eq!(Syllable::decompose("zụt").base, "zut");
    }

    #[test]
    fn highest_priority_mark_wins() {
        let syl = Syllable::decompose("a\u{301}\u{331}");
        assert_eq!(syl.mark, Some(Mark::MacronBelow));
        let syl = Syllable::decompose("ạ\u{304}");
        assert_eq!(syl.mark, Some(Mark::DotBelow));
    }

    #[test]
    fn other_marks_are_flagged() {
        let syl = Syllable::decompose("pä");
        assert!(syl.foreign_mark);
        assert_eq!(syl.base, "pa");
    }

    #[test]
    fn superscript_n_is_spelled_out() {
        assert_eq!(Syllable::decompose("hàⁿ").base, "hann");
    }

    #[test]
    fn checked_finals() {
        assert!(Syllable::decompose("pak").is_checked());
        assert!(!Syllable::decompose("pang").is_checked());
        assert_eq!(Syllable::decompose("lip").voiced_base(), "lib");
        assert_eq!(Syllable::decompose("zụt").voiced_base(), "zud");
    }

    #[test]
    fn initials() {
        assert_eq!(split_initial("zhong"), ("zh", "ong"));
        assert_eq!(split_initial("ngiam"), ("ng", "iam"));
        assert_eq!(split_initial("sii"), ("s", "ii"));
        assert_eq!(split_initial("am"), ("", "am"));
    }
}
