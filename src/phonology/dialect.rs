use std::fmt;
use std::str::FromStr;

use crate::error::DictError;

use super::syllable::Mark;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// 四縣
    Siyen,
    /// 海陸
    Hoiliuk,
}

impl FromStr for Dialect {
    type Err = DictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "siyen" | "四縣" => Ok(Dialect::Siyen),
            "hoiliuk" | "海陸" => Ok(Dialect::Hoiliuk),
            _ => Err(DictError::UnsupportedDialect(s.to_string())),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dialect::Siyen => "siyen",
            Dialect::Hoiliuk => "hoiliuk",
        })
    }
}

impl Dialect {
    /// Tone number for a diacritic; `checked` is true for p/t/k codas.
    /// `None` when the dialect has no tone written that way.
    pub fn tone(self, mark: Option<Mark>, checked: bool) -> Option<u8> {
        match self {
            Dialect::Siyen => match mark {
                Some(Mark::Acute) => Some(1),
                Some(Mark::Grave) => Some(if checked { 4 } else { 2 }),
                None => Some(if checked { 8 } else { 3 }),
                Some(Mark::Macron | Mark::MacronBelow) => Some(5),
                Some(Mark::DotBelow) if checked => Some(4),
                Some(Mark::DotBelow) => None,
            },
            Dialect::Hoiliuk => match mark {
                Some(Mark::Grave) => Some(if checked { 8 } else { 1 }),
                Some(Mark::Acute) => Some(2),
                Some(Mark::Macron | Mark::MacronBelow) => Some(3),
                None => Some(if checked { 5 } else { 4 }),
                Some(Mark::DotBelow) => Some(7),
            },
        }
    }

    /// Tone-contour glyph written after the syllable.
    pub fn glyph(self, tone: u8) -> &'static str {
        match (self, tone) {
            (Dialect::Siyen, 1) => "ˊ",
            (Dialect::Siyen, 2 | 4) => "ˋ",
            (Dialect::Siyen, 5) => "ˇ",
            (Dialect::Hoiliuk, 1 | 8) => "ˋ",
            (Dialect::Hoiliuk, 2) => "ˊ",
            (Dialect::Hoiliuk, 3) => "ˇ",
            (Dialect::Hoiliuk, 7) => "+",
            _ => "",
        }
    }

    /// Only Siyen has a church romanization rendering.
    pub fn has_pfs(self) -> bool {
        self == Dialect::Siyen
    }
}

/// Combining mark for a Siyen tone in church romanization.
pub fn pfs_mark(tone: u8) -> Option<char> {
    match tone {
        1 => Some('\u{0302}'),
        2 => Some('\u{0301}'),
        5 => Some('\u{0300}'),
        8 => Some('\u{030D}'),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("SiYen".parse::<Dialect>().unwrap(), Dialect::Siyen);
        assert_eq!(" hoiliuk ".parse::<Dialect>().unwrap(), Dialect::Hoiliuk);
        assert_eq!("海陸".parse::<Dialect>().unwrap(), Dialect::Hoiliuk);
    }

    #[test]
    fn unknown_dialect_is_an_error() {
        let err = "raoping".parse::<Dialect>().unwrap_err();
        assert!(matches!(err, DictError::UnsupportedDialect(ref d) if d == "raoping"));
    }

    #[test]
    fn siyen_tones() {
        let d = Dialect::Siyen;
        assert_eq!(d.tone(None, false), Some(3));
        assert_eq!(d.tone(None, true), Some(8));
        assert_eq!(d.tone(Some(Mark::Grave), false), Some(2));
        assert_eq!(d.tone(Some(Mark::Grave), true), Some(4));
        assert_eq!(d.tone(Some(Mark::DotBelow), true), Some(4));
        assert_eq!(d.tone(Some(Mark::DotBelow), false), None);
        assert_eq!(d.tone(Some(Mark::MacronBelow), false), Some(5));
        assert_eq!(d.tone(Some(Mark::Acute), false), Some(1));
        assert_eq!(d.tone(Some(Mark::Macron), false), Some(5));
    }

    #[test]
    fn macron_and_caron_share_a_tone() {
        assert_eq!(Mark::from_combining('\u{0304}'), Some(Mark::Macron));
        assert_eq!(Mark::from_combining('\u{030C}'), Some(Mark::Macron));
        assert_eq!(Dialect::Siyen.tone(Mark::from_combining('\u{030C}'), false), Some(5));
        assert_eq!(Dialect::Siyen.tone(Mark::from_combining('\u{0304}'), false), Some(5));
    }

    #[test]
    fn hoiliuk_tones() {
        let d = Dialect::Hoiliuk;
        assert_eq!(d.tone(Some(Mark::Grave), false), Some(1));
        assert_eq!(d.tone(Some(Mark::Grave), true), Some(8));
        assert_eq!(d.tone(None, false), Some(4));
        assert_eq!(d.tone(None, true), Some(5));
        assert_eq!(d.tone(Some(Mark::DotBelow), true), Some(7));
        assert_eq!(d.tone(Some(Mark::Acute), false), Some(2));
        assert_eq!(d.tone(Some(Mark::Macron), false), Some(3));
        assert_eq!(d.tone(Some(Mark::MacronBelow), false), Some(3));
    }

    #[test]
    fn glyphs() {
        assert_eq!(Dialect::Siyen.glyph(3), "");
        assert_eq!(Dialect::Siyen.glyph(5), "ˇ");
        assert_eq!(Dialect::Hoiliuk.glyph(7), "+");
        assert_eq!(Dialect::Hoiliuk.glyph(4), "");
    }
}
