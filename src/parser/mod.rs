pub mod blocks;
pub mod classify;
pub mod extract;
pub mod text;

use std::fs;
use std::path::Path;

use tracing::info;

use crate::config::Settings;
use crate::error::{DictError, Result};
use extract::{Extraction, StructuralWarning, Thresholds, WarningKind};

#[derive(Debug, Clone)]
pub struct ParserOptions {
    pub text_section_id: String,
    pub thresholds: Thresholds,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            text_section_id: "TextSection".to_string(),
            thresholds: Thresholds::default(),
        }
    }
}

impl From<&Settings> for ParserOptions {
    fn from(settings: &Settings) -> Self {
        ParserOptions {
            text_section_id: settings.text_section_id.clone(),
            thresholds: Thresholds {
                large_pt: settings.large_font_pt,
                small_pt: settings.small_font_pt,
            },
        }
    }
}

pub fn read_html(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| DictError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Three-pass pipeline: HTML → styled blocks → classified blocks → entries.
pub fn process_document(html: &str, opts: &ParserOptions) -> Extraction {
    let blocks = blocks::parse_blocks(html, &opts.text_section_id);
    info!(paragraphs = blocks.len(), "parsed paragraphs");

    let mut extraction = extract::extract_entries(&blocks, &opts.thresholds);

    let pua = text::count_pua(html);
    if pua > 0 {
        let first = html.chars().find(|c| text::is_pua(*c)).map(String::from).unwrap_or_default();
        extraction
            .warnings
            .push(StructuralWarning::new(None, WarningKind::ResidualPua(pua), &first));
    }

    info!(
        entries = extraction.entries.len(),
        warnings = extraction.warnings.len(),
        "extraction finished"
    );
    extraction
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntryBody, EntryKind};

    fn fixture() -> Extraction {
        let html = std::fs::read_to_string("tests/fixtures/siyen_sample.html").unwrap();
        process_document(&html, &ParserOptions::default())
    }

    #[test]
    fn sample_entry_kinds() {
        let ex = fixture();
        let kinds: Vec<_> = ex.entries.iter().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                EntryKind::Headword,
                EntryKind::Character,
                EntryKind::Character,
                EntryKind::Word,
                EntryKind::Word,
                EntryKind::Headword,
                EntryKind::Character,
                EntryKind::Word,
                EntryKind::Word,
            ]
        );
    }

    #[test]
    fn ids_are_sequential() {
        let ex = fixture();
        for (i, e) in ex.entries.iter().enumerate() {
            assert_eq!(e.id, (i + 1).to_string());
        }
    }

    #[test]
    fn every_entry_has_its_required_fields() {
        for e in fixture().entries {
            match &e.body {
                EntryBody::Headword { characters, .. } => {
                    assert!(!characters.is_empty());
                    assert!(!e.pronunciation.original.is_empty());
                }
                EntryBody::Character { character, .. } => assert_eq!(character.chars().count(), 1),
                EntryBody::Word { headword, definitions, .. } => {
                    assert!(!headword.is_empty());
                    assert!(!definitions.is_empty());
                }
            }
        }
    }

    #[test]
    fn character_inherits_and_overrides() {
        let ex = fixture();
        // 阿 is enriched with notes and keeps the headword's pronunciation.
        let a = &ex.entries[1];
        assert_eq!(a.character(), Some("阿"));
        assert_eq!(a.pronunciation.original, "a");
        match &a.body {
            EntryBody::Character { classical_notes, definitions, .. } => {
                assert_eq!(classical_notes.as_deref(), Some("廣韻：烏何切"));
                assert_eq!(definitions.len(), 2);
                assert_eq!(definitions[1].marker.as_deref(), Some("②"));
            }
            other => panic!("unexpected body {:?}", other),
        }
        // 啊 carries its own romanization.
        assert_eq!(ex.entries[2].pronunciation.original, "à");
        // 爸 under the second headword carries the underline mark.
        assert_eq!(ex.entries[6].pronunciation.original, "pa\u{331}");
    }

    #[test]
    fn words_and_their_metadata() {
        let ex = fixture();
        let a_go = &ex.entries[3];
        assert_eq!(a_go.label(), "阿哥");
        assert_eq!(a_go.pronunciation.original, "a gô");
        match &a_go.body {
            EntryBody::Word { variants, .. } => assert_eq!(variants, &vec!["阿哥哥".to_string()]),
            other => panic!("unexpected body {:?}", other),
        }

        let sakura = &ex.entries[4];
        assert_eq!(sakura.label(), "sā ku là");
        match &sakura.body {
            EntryBody::Word { source, .. } => assert_eq!(source.as_deref(), Some("日語")),
            other => panic!("unexpected body {:?}", other),
        }

        let baba = &ex.entries[7];
        assert_eq!(baba.label(), "爸爸");
        assert_eq!(baba.pronunciation.original, "pa\u{331}");
    }

    #[test]
    fn stray_paragraph_is_kept_and_reported() {
        let ex = fixture();
        let last = ex.entries.last().unwrap();
        let defs = last.definitions();
        assert!(defs.last().unwrap().text.ends_with("（俗寫）"));
        assert!(ex.warnings.iter().any(|w| w.kind == WarningKind::Unclassified));
        assert!(ex.warnings.iter().any(|w| w.kind == WarningKind::ResidualPua(1)));
    }

    #[test]
    fn content_outside_text_section_is_ignored() {
        let ex = fixture();
        assert!(ex.entries.iter().all(|e| e.label() != "目錄"));
    }
}
