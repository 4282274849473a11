use itertools::Itertools;

use crate::model::{Entry, EntryBody, EntryKind};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentStats {
    pub total: usize,
    /// Entry count per kind, in kind order.
    pub by_kind: Vec<(EntryKind, usize)>,
    pub words: usize,
    pub words_with_examples: usize,
    pub words_with_several_senses: usize,
    pub characters: usize,
    pub characters_with_notes: usize,
    pub characters_with_definitions: usize,
    pub with_numbered: usize,
}

impl DocumentStats {
    pub fn collect(entries: &[Entry]) -> Self {
        let by_kind = entries
            .iter()
            .map(Entry::kind)
            .counts()
            .into_iter()
            .sorted()
            .collect();

        let mut s = DocumentStats {
            total: entries.len(),
            by_kind,
            ..Default::default()
        };
        for e in entries {
            if e.pronunciation.numbered.is_some() {
                s.with_numbered += 1;
            }
            match &e.body {
                EntryBody::Word { definitions, .. } => {
                    s.words += 1;
                    if definitions.iter().any(|d| !d.examples.is_empty()) {
                        s.words_with_examples += 1;
                    }
                    if definitions.len() > 1 {
                        s.words_with_several_senses += 1;
                    }
                }
                EntryBody::Character {
                    classical_notes,
                    definitions,
                    ..
                } => {
                    s.characters += 1;
                    if classical_notes.is_some() {
                        s.characters_with_notes += 1;
                    }
                    if !definitions.is_empty() {
                        s.characters_with_definitions += 1;
                    }
                }
                EntryBody::Headword { .. } => {}
            }
        }
        s
    }
}

/// `part` as a percentage of `whole`; 0 for an empty whole.
pub fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Definition, Example, Pronunciation};

    fn entries() -> Vec<Entry> {
        let sense = |examples: Vec<Example>| Definition {
            marker: None,
            text: "義".into(),
            examples,
        };
        vec![
            Entry {
                id: "1".into(),
                pronunciation: Pronunciation::new("a"),
                body: EntryBody::Headword {
                    characters: vec!["阿".into()],
                    create_character_entries: true,
                },
            },
            Entry {
                id: "2".into(),
                pronunciation: Pronunciation::new("a"),
                body: EntryBody::Character {
                    character: "阿".into(),
                    classical_notes: Some("烏何切".into()),
                    literary_reading: None,
                    vernacular_reading: None,
                    definitions: vec![],
                },
            },
            Entry {
                id: "3".into(),
                pronunciation: Pronunciation::new("a gô"),
                body: EntryBody::Word {
                    headword: "阿哥".into(),
                    definitions: vec![
                        sense(vec![Example {
                            marker: "📌".into(),
                            text: "阿哥來了。".into(),
                        }]),
                        sense(vec![]),
                    ],
                    source: None,
                    variants: vec![],
                },
            },
        ]
    }

    #[test]
    fn counts_by_kind_and_detail() {
        let s = DocumentStats::collect(&entries());
        assert_eq!(s.total, 3);
        assert_eq!(
            s.by_kind,
            vec![(EntryKind::Headword, 1), (EntryKind::Character, 1), (EntryKind::Word, 1)]
        );
        assert_eq!(s.words_with_examples, 1);
        assert_eq!(s.words_with_several_senses, 1);
        assert_eq!(s.characters_with_notes, 1);
        assert_eq!(s.characters_with_definitions, 0);
        assert_eq!(s.with_numbered, 0);
    }

    #[test]
    fn percent_of_nothing_is_zero() {
        assert_eq!(percent(3, 0), 0.0);
        assert_eq!(percent(1, 4), 25.0);
    }
}
