use crate::model::{Definition, Example};
use crate::parser::text::{self, is_definition_marker, is_example_marker};

const VARIATION_SELECTOR: char = '\u{FE0F}';

/// Split text into senses at definition glyphs, then each sense into its
/// gloss and examples at example glyphs. Text before the first glyph becomes
/// an unmarked sense.
pub fn split_senses(raw: &str) -> Vec<Definition> {
    let mut senses = Vec::new();
    let mut marker: Option<char> = None;
    let mut buf = String::new();

    for ch in raw.chars() {
        if is_definition_marker(ch) {
            push_sense(&mut senses, marker, &buf);
            marker = Some(ch);
            buf.clear();
        } else {
            buf.push(ch);
        }
    }
    push_sense(&mut senses, marker, &buf);
    senses
}

fn push_sense(senses: &mut Vec<Definition>, marker: Option<char>, body: &str) {
    let (gloss, examples) = split_examples(body);
    if marker.is_none() && gloss.is_empty() && examples.is_empty() {
        return;
    }
    senses.push(Definition {
        marker: marker.map(String::from),
        text: gloss,
        examples,
    });
}

/// Split a sense body at 📌/⚫; each example keeps the glyph that opened it.
pub fn split_examples(body: &str) -> (String, Vec<Example>) {
    let mut gloss = String::new();
    let mut examples: Vec<Example> = Vec::new();
    let mut current: Option<(char, String)> = None;

    for ch in body.chars() {
        if ch == VARIATION_SELECTOR {
            continue;
        }
        if is_example_marker(ch) {
            if let Some((m, t)) = current.take() {
                push_example(&mut examples, m, &t);
            }
            current = Some((ch, String::new()));
            continue;
        }
        match current.as_mut() {
            Some((_, t)) => t.push(ch),
            None => gloss.push(ch),
        }
    }
    if let Some((m, t)) = current {
        push_example(&mut examples, m, &t);
    }

    (text::normalize_spaces(&gloss), examples)
}

fn push_example(examples: &mut Vec<Example>, marker: char, raw: &str) {
    let text = text::normalize_spaces(raw);
    if !text.is_empty() {
        examples.push(Example {
            marker: marker.to_string(),
            text,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmarked_text_is_a_single_sense() {
        let senses = split_senses("叫人的語氣詞。");
        assert_eq!(senses.len(), 1);
        assert_eq!(senses[0].marker, None);
        assert_eq!(senses[0].text, "叫人的語氣詞。");
    }

    #[test]
    fn numbered_senses_keep_their_glyphs() {
        let senses = split_senses("①哥哥。②對年長男子的稱呼。❶另義。");
        let markers: Vec<_> = senses.iter().map(|d| d.marker.as_deref()).collect();
        assert_eq!(markers, vec![Some("①"), Some("②"), Some("❶")]);
        assert_eq!(senses[1].text, "對年長男子的稱呼。");
    }

    #[test]
    fn examples_are_tagged_by_glyph() {
        let senses = split_senses("①哥哥。📌阿哥來了。⚫\u{FE0F}阿哥 好。");
        assert_eq!(senses.len(), 1);
        let d = &senses[0];
        assert_eq!(d.text, "哥哥。");
        assert_eq!(d.examples.len(), 2);
        assert_eq!(d.examples[0].marker, "📌");
        assert_eq!(d.examples[0].text, "阿哥來了。");
        assert_eq!(d.examples[1].marker, "⚫");
        assert_eq!(d.examples[1].text, "阿哥好。");
    }

    #[test]
    fn leading_gloss_before_first_glyph() {
        let senses = split_senses("總說。①甲。②乙。");
        assert_eq!(senses.len(), 3);
        assert_eq!(senses[0].marker, None);
        assert_eq!(senses[0].text, "總說。");
    }

    #[test]
    fn empty_text_has_no_senses() {
        assert!(split_senses("   ").is_empty());
    }

    #[test]
    fn parenthetical_notes_stay_inline() {
        let senses = split_senses("①阿公（祖父）。");
        assert_eq!(senses[0].text, "阿公（祖父）。");
    }
}
