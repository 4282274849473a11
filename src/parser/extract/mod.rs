pub mod character;
pub mod definitions;
pub mod headword;
pub mod word;

use std::fmt;

use tracing::{debug, warn};

use crate::model::{Definition, Entry, EntryBody, Pronunciation};

use super::blocks::Block;
use super::classify::{classify, Classified};
use super::text;
use character::CharacterParts;
use headword::HeadwordParts;
use word::WordParts;

/// Font-size cut-offs (points) separating headword, body and note text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub large_pt: f32,
    pub small_pt: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            large_pt: 14.0,
            small_pt: 8.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WarningKind {
    Unclassified,
    OrphanDefinition,
    OrphanCharacter,
    ResidualPua(usize),
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningKind::Unclassified => f.write_str("unclassified paragraph"),
            WarningKind::OrphanDefinition => f.write_str("definition without an open entry"),
            WarningKind::OrphanCharacter => f.write_str("character without a headword"),
            WarningKind::ResidualPua(n) => write!(f, "{} private-use code points left in input", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructuralWarning {
    pub block: Option<usize>,
    pub kind: WarningKind,
    pub excerpt: String,
}

impl StructuralWarning {
    pub fn new(block: Option<usize>, kind: WarningKind, excerpt: &str) -> Self {
        let warning = StructuralWarning {
            block,
            kind,
            excerpt: excerpt.chars().take(40).collect(),
        };
        warn!(block = ?warning.block, excerpt = %warning.excerpt, "{}", warning.kind);
        warning
    }
}

#[derive(Debug, Default)]
pub struct Extraction {
    pub entries: Vec<Entry>,
    pub warnings: Vec<StructuralWarning>,
}

/// State threaded through the fold over paragraphs.
struct Context {
    entries: Vec<Entry>,
    next_id: usize,
    current_pronunciation: Option<String>,
    /// Indices of the current headword's character entries not yet enriched.
    placeholders: Vec<usize>,
    /// Most recent character or word entry; receives continuations.
    open_entry: Option<usize>,
    warnings: Vec<StructuralWarning>,
}

impl Context {
    fn new() -> Self {
        Context {
            entries: Vec::new(),
            next_id: 1,
            current_pronunciation: None,
            placeholders: Vec::new(),
            open_entry: None,
            warnings: Vec::new(),
        }
    }

    fn step(mut self, block: &Block, th: &Thresholds) -> Self {
        let classified = classify(block, th);
        debug!(block = block.index, kind = classified.name(), "classified");
        match classified {
            Classified::Headword(h) => self.headword(h),
            Classified::Character(c) => self.character(block, c),
            Classified::Word(w) => self.word(w),
            Classified::Continuation(senses) => self.continuation(block, senses),
            Classified::Unclassified(text) => self.unclassified(block, text),
        }
        self
    }

    fn push(&mut self, pronunciation: Pronunciation, body: EntryBody) -> usize {
        self.entries.push(Entry {
            id: self.next_id.to_string(),
            pronunciation,
            body,
        });
        self.next_id += 1;
        self.entries.len() - 1
    }

    fn headword(&mut self, h: HeadwordParts) {
        self.placeholders.clear();
        self.push(
            Pronunciation::new(h.original.clone()),
            EntryBody::Headword {
                characters: h.characters.clone(),
                create_character_entries: true,
            },
        );
        for ch in h.characters {
            let idx = self.push(
                Pronunciation::new(h.original.clone()),
                EntryBody::Character {
                    character: ch,
                    classical_notes: None,
                    literary_reading: None,
                    vernacular_reading: None,
                    definitions: Vec::new(),
                },
            );
            self.placeholders.push(idx);
            self.open_entry = Some(idx);
        }
        self.current_pronunciation = Some(h.original);
    }

    fn character(&mut self, block: &Block, c: CharacterParts) {
        if self.current_pronunciation.is_none() && c.pronunciation.is_none() {
            self.warnings.push(StructuralWarning::new(
                Some(block.index),
                WarningKind::OrphanCharacter,
                &c.character,
            ));
        }

        let slot = self
            .placeholders
            .iter()
            .position(|&i| self.entries[i].character() == Some(c.character.as_str()));
        if let Some(slot) = slot {
            let idx = self.placeholders.remove(slot);
            let entry = &mut self.entries[idx];
            if let Some(p) = c.pronunciation {
                entry.pronunciation = Pronunciation::new(p);
            }
            if let EntryBody::Character {
                classical_notes,
                literary_reading,
                vernacular_reading,
                ..
            } = &mut entry.body
            {
                *classical_notes = c.classical_notes;
                *literary_reading = c.literary_reading;
                *vernacular_reading = c.vernacular_reading;
            }
            self.open_entry = Some(idx);
            return;
        }

        let pronunciation = c
            .pronunciation
            .or_else(|| self.current_pronunciation.clone())
            .unwrap_or_default();
        let idx = self.push(
            Pronunciation::new(pronunciation),
            EntryBody::Character {
                character: c.character,
                classical_notes: c.classical_notes,
                literary_reading: c.literary_reading,
                vernacular_reading: c.vernacular_reading,
                definitions: Vec::new(),
            },
        );
        self.open_entry = Some(idx);
    }

    fn word(&mut self, w: WordParts) {
        let pronunciation = w
            .pronunciation
            .or_else(|| self.current_pronunciation.clone())
            .unwrap_or_default();
        let idx = self.push(
            Pronunciation::new(pronunciation),
            EntryBody::Word {
                headword: w.headword,
                definitions: definitions::split_senses(&w.definition_text),
                source: word::source_of(&w.definition_text),
                variants: word::variants_of(&w.definition_text),
            },
        );
        self.open_entry = Some(idx);
    }

    /// Open entry, or an implicit word entry standing in for a missing one.
    fn target(&mut self) -> usize {
        match self.open_entry {
            Some(idx) => idx,
            None => {
                let idx = self.push(
                    Pronunciation::default(),
                    EntryBody::Word {
                        headword: String::new(),
                        definitions: Vec::new(),
                        source: None,
                        variants: Vec::new(),
                    },
                );
                self.open_entry = Some(idx);
                idx
            }
        }
    }

    fn continuation(&mut self, block: &Block, mut senses: Vec<Definition>) {
        if self.open_entry.is_none() {
            self.warnings.push(StructuralWarning::new(
                Some(block.index),
                WarningKind::OrphanDefinition,
                &block.text(),
            ));
        }
        let idx = self.target();
        let Some(defs) = self.entries[idx].definitions_mut() else {
            return;
        };

        // A paragraph of examples belongs to the sense above it.
        let leading_examples = senses
            .first()
            .is_some_and(|s| s.marker.is_none() && s.text.is_empty());
        if leading_examples {
            if let Some(last) = defs.last_mut() {
                let first = senses.remove(0);
                last.examples.extend(first.examples);
            }
        }
        defs.extend(senses);
    }

    fn unclassified(&mut self, block: &Block, text: String) {
        self.warnings.push(StructuralWarning::new(
            Some(block.index),
            WarningKind::Unclassified,
            &text,
        ));
        let idx = self.target();
        let Some(defs) = self.entries[idx].definitions_mut() else {
            return;
        };
        match defs.last_mut() {
            Some(last) => match last.examples.last_mut() {
                Some(example) => append_text(&mut example.text, &text),
                None => append_text(&mut last.text, &text),
            },
            None => defs.push(Definition {
                marker: None,
                text,
                examples: Vec::new(),
            }),
        }
    }
}

fn append_text(field: &mut String, extra: &str) {
    *field = text::normalize_spaces(&format!("{} {}", field, extra));
}

/// Fold the paragraphs, in document order, into entries.
pub fn extract_entries(blocks: &[Block], th: &Thresholds) -> Extraction {
    let ctx = blocks
        .iter()
        .fold(Context::new(), |ctx, block| ctx.step(block, th));
    Extraction {
        entries: ctx.entries,
        warnings: ctx.warnings,
    }
}
