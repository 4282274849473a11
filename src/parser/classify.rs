use crate::model::Definition;

use super::blocks::Block;
use super::extract::character::{self, CharacterParts};
use super::extract::definitions::split_senses;
use super::extract::headword::{self, HeadwordParts};
use super::extract::word::{self, WordParts};
use super::extract::Thresholds;
use super::text::{self, is_definition_marker, is_example_marker};

/// What a paragraph turned out to be.
#[derive(Debug, Clone, PartialEq)]
pub enum Classified {
    Headword(HeadwordParts),
    Character(CharacterParts),
    Word(WordParts),
    Continuation(Vec<Definition>),
    Unclassified(String),
}

impl Classified {
    pub fn name(&self) -> &'static str {
        match self {
            Classified::Headword(_) => "headword",
            Classified::Character(_) => "character",
            Classified::Word(_) => "word",
            Classified::Continuation(_) => "continuation",
            Classified::Unclassified(_) => "unclassified",
        }
    }
}

/// First match wins: headword, character, word, continuation.
pub fn classify(block: &Block, th: &Thresholds) -> Classified {
    if headword::matches(block, th) {
        if let Some(h) = headword::parse(block, th) {
            return Classified::Headword(h);
        }
    }
    if character::matches(block, th) {
        if let Some(c) = character::parse(block, th) {
            return Classified::Character(c);
        }
    }
    if let Some(w) = word::parse(block) {
        return Classified::Word(w);
    }

    let raw = text::collapse_whitespace(&block.raw_text());
    let raw = raw.trim();
    let leads_with_glyph = raw
        .chars()
        .next()
        .is_some_and(|c| is_definition_marker(c) || is_example_marker(c));
    if block.indented || leads_with_glyph {
        let senses = split_senses(raw);
        if !senses.is_empty() {
            return Classified::Continuation(senses);
        }
    }

    Classified::Unclassified(block.text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::blocks::parse_blocks;

    fn classify_all(body: &str) -> Vec<&'static str> {
        let th = Thresholds::default();
        parse_blocks(&format!("<body>{}</body>", body), "TextSection")
            .iter()
            .map(|b| classify(b, &th).name())
            .collect()
    }

    #[test]
    fn cascade_order() {
        let kinds = classify_all(concat!(
            r#"<p><font size="4"><i><b>a</b></i></font> <b>阿</b></p>"#,
            r#"<p><b>阿</b><font size="1">(烏何切)</font></p>"#,
            r#"<p style="margin-left:2em">①詞頭。</p>"#,
            "<p>a gô 阿哥＝哥哥。</p>",
            "<p>📌阿哥來了。</p>",
            "<p>隨便寫的一句話</p>",
        ));
        assert_eq!(
            kinds,
            vec!["headword", "character", "continuation", "word", "continuation", "unclassified"]
        );
    }

    #[test]
    fn headword_beats_character() {
        // Leading bold character, large italic bold romanization and a small
        // run: both rules apply.
        let kinds = classify_all(
            r#"<p><b>阿</b><font size="4"><i><b>a</b></i></font><font size="1">(x)</font></p>"#,
        );
        assert_eq!(kinds, vec!["headword"]);
    }

    #[test]
    fn indented_word_is_not_a_continuation() {
        let kinds = classify_all(concat!(
            r#"<p style="margin-left:2em">a gô 阿哥＝哥哥。</p>"#,
            r#"<p style="text-indent:2em">sā ku là 櫻花，源自日語。</p>"#,
            r#"<p style="margin-left:2em">哥哥的意思</p>"#,
        ));
        assert_eq!(kinds, vec!["word", "word", "continuation"]);
    }
}
