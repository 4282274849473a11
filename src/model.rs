use serde::{Deserialize, Serialize};

/// One dictionary record. The pronunciation is shared by every kind; the
/// payload depends on `body`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub pronunciation: Pronunciation,
    #[serde(flatten)]
    pub body: EntryBody,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pronunciation {
    pub original: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numbered: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marked: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pfs: Option<String>,
}

impl Pronunciation {
    pub fn new(original: impl Into<String>) -> Self {
        Pronunciation {
            original: original.into(),
            ..Default::default()
        }
    }

    pub fn clear_derived(&mut self) {
        self.numbered = None;
        self.marked = None;
        self.pfs = None;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EntryBody {
    Headword {
        characters: Vec<String>,
        create_character_entries: bool,
    },
    Character {
        character: String,
        #[serde(default)]
        classical_notes: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        literary_reading: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        vernacular_reading: Option<String>,
        #[serde(default)]
        definitions: Vec<Definition>,
    },
    Word {
        headword: String,
        #[serde(default)]
        definitions: Vec<Definition>,
        #[serde(default)]
        source: Option<String>,
        #[serde(default)]
        variants: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntryKind {
    Headword,
    Character,
    Word,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryKind::Headword => "headword",
            EntryKind::Character => "character",
            EntryKind::Word => "word",
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// One numbered (or unnumbered) sense.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    pub marker: Option<String>,
    pub text: String,
    #[serde(default)]
    pub examples: Vec<Example>,
}

/// An example sentence together with the glyph (📌 or ⚫) that introduced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    pub marker: String,
    pub text: String,
}

impl Entry {
    pub fn kind(&self) -> EntryKind {
        match self.body {
            EntryBody::Headword { .. } => EntryKind::Headword,
            EntryBody::Character { .. } => EntryKind::Character,
            EntryBody::Word { .. } => EntryKind::Word,
        }
    }

    pub fn definitions(&self) -> &[Definition] {
        match &self.body {
            EntryBody::Character { definitions, .. } | EntryBody::Word { definitions, .. } => {
                definitions
            }
            EntryBody::Headword { .. } => &[],
        }
    }

    pub fn definitions_mut(&mut self) -> Option<&mut Vec<Definition>> {
        match &mut self.body {
            EntryBody::Character { definitions, .. } | EntryBody::Word { definitions, .. } => {
                Some(definitions)
            }
            EntryBody::Headword { .. } => None,
        }
    }

    /// The grapheme of a character entry.
    pub fn character(&self) -> Option<&str> {
        match &self.body {
            EntryBody::Character { character, .. } => Some(character),
            _ => None,
        }
    }

    /// Short human label used by the CLI listing and diagnostics.
    pub fn label(&self) -> &str {
        match &self.body {
            EntryBody::Headword { .. } => &self.pronunciation.original,
            EntryBody::Character { character, .. } => character,
            EntryBody::Word { headword, .. } => headword,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_tag_is_flattened_next_to_shared_fields() {
        let entry = Entry {
            id: "1".into(),
            pronunciation: Pronunciation::new("pà"),
            body: EntryBody::Headword {
                characters: vec!["爸".into()],
                create_character_entries: true,
            },
        };
        let v = serde_json::to_value(&entry).unwrap();
        assert_eq!(v["type"], "headword");
        assert_eq!(v["pronunciation"]["original"], "pà");
        assert!(v["pronunciation"].get("numbered").is_none());
        assert_eq!(v["characters"][0], "爸");
        assert_eq!(v["create_character_entries"], true);
    }

    #[test]
    fn character_without_optional_fields_deserializes() {
        let json = r#"{"id":"7","type":"character","pronunciation":{"original":"á"},"character":"阿"}"#;
        let entry: Entry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.kind(), EntryKind::Character);
        assert_eq!(entry.character(), Some("阿"));
        assert!(entry.definitions().is_empty());
    }

    #[test]
    fn word_keeps_null_source_and_empty_variants() {
        let entry = Entry {
            id: "2".into(),
            pronunciation: Pronunciation::new("a gô"),
            body: EntryBody::Word {
                headword: "阿哥".into(),
                definitions: vec![],
                source: None,
                variants: vec![],
            },
        };
        let v = serde_json::to_value(&entry).unwrap();
        assert!(v["source"].is_null());
        assert_eq!(v["variants"].as_array().map(|a| a.len()), Some(0));
        assert_eq!(entry.label(), "阿哥");
    }
}
