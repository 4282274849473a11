pub mod dialect;
pub mod render;
pub mod syllable;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::document::Document;
use crate::model::Entry;
pub use dialect::Dialect;
use render::Transducer;

/// A syllable whose tone could not be read, with the entry it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unrecognized {
    pub entry_id: String,
    pub syllable: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionReport {
    pub dialect: Dialect,
    pub converted: usize,
    /// Entries with an empty `original`.
    pub skipped: usize,
    pub unrecognized: Vec<Unrecognized>,
}

enum Outcome {
    Converted(Vec<Unrecognized>),
    Skipped,
}

/// Recompute every derived pronunciation field from `original`.
fn convert_entry(t: &Transducer, entry: &mut Entry) -> Outcome {
    let p = &mut entry.pronunciation;
    p.clear_derived();
    if p.original.trim().is_empty() {
        return Outcome::Skipped;
    }
    let r = t.transduce(&p.original);
    p.numbered = Some(r.numbered);
    p.marked = Some(r.marked);
    p.pfs = r.pfs;
    Outcome::Converted(
        r.unrecognized
            .into_iter()
            .map(|syllable| Unrecognized {
                entry_id: entry.id.clone(),
                syllable,
            })
            .collect(),
    )
}

#[cfg(feature = "rayon")]
fn convert_chunk(t: &Transducer, chunk: &mut [Entry]) -> Vec<Outcome> {
    chunk.par_iter_mut().map(|e| convert_entry(t, e)).collect()
}

#[cfg(not(feature = "rayon"))]
fn convert_chunk(t: &Transducer, chunk: &mut [Entry]) -> Vec<Outcome> {
    chunk.iter_mut().map(|e| convert_entry(t, e)).collect()
}

/// Derive `numbered`, `marked` and (Siyen) `pfs` for every entry, in
/// batches of `chunk_size`. Running it twice gives the same document.
pub fn convert_document(doc: &mut Document, dialect: Dialect, chunk_size: usize) -> ConversionReport {
    let t = Transducer::new(dialect);
    let mut report = ConversionReport {
        dialect,
        converted: 0,
        skipped: 0,
        unrecognized: Vec::new(),
    };

    let pb = ProgressBar::new(doc.entries.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    for chunk in doc.entries.chunks_mut(chunk_size.max(1)) {
        let len = chunk.len() as u64;
        for outcome in convert_chunk(&t, chunk) {
            match outcome {
                Outcome::Converted(bad) => {
                    report.converted += 1;
                    report.unrecognized.extend(bad);
                }
                Outcome::Skipped => report.skipped += 1,
            }
        }
        pb.inc(len);
    }
    pb.finish_and_clear();
    doc.total = doc.entries.len();

    for u in &report.unrecognized {
        warn!(entry = %u.entry_id, syllable = %u.syllable, "unrecognized tone");
    }
    info!(
        %dialect,
        converted = report.converted,
        skipped = report.skipped,
        unrecognized = report.unrecognized.len(),
        "conversion finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntryBody, Pronunciation};

    fn word(id: &str, original: &str) -> Entry {
        Entry {
            id: id.into(),
            pronunciation: Pronunciation::new(original),
            body: EntryBody::Word {
                headword: "詞".into(),
                definitions: vec![],
                source: None,
                variants: vec![],
            },
        }
    }

    fn doc() -> Document {
        Document::new(vec![word("1", "a gô"), word("2", ""), word("3", "pä"), word("4", "sií")])
    }

    #[test]
    fn fills_derived_fields() {
        let mut d = doc();
        let report = convert_document(&mut d, Dialect::Siyen, 2);
        assert_eq!(report.converted, 3);
        assert_eq!(report.skipped, 1);
        let p = &d.entries[0].pronunciation;
        assert_eq!(p.numbered.as_deref(), Some("a3 go2"));
        assert_eq!(p.marked.as_deref(), Some("a goˋ"));
        assert_eq!(p.pfs.as_deref(), Some("a gó"));
        assert_eq!(d.entries[1].pronunciation.numbered, None);
        assert_eq!(
            report.unrecognized,
            vec![Unrecognized {
                entry_id: "3".into(),
                syllable: "pä".into()
            }]
        );
    }

    #[test]
    fn conversion_is_idempotent() {
        let mut once = doc();
        convert_document(&mut once, Dialect::Siyen, 500);
        let mut twice = once.clone();
        convert_document(&mut twice, Dialect::Siyen, 1);
        assert_eq!(once, twice);
    }

    #[test]
    fn reconverting_as_hoiliuk_drops_church_spelling() {
        let mut d = doc();
        convert_document(&mut d, Dialect::Siyen, 500);
        convert_document(&mut d, Dialect::Hoiliuk, 500);
        assert!(d.entries.iter().all(|e| e.pronunciation.pfs.is_none()));
        assert_eq!(d.entries[0].pronunciation.numbered.as_deref(), Some("a4 go1"));
    }

    #[test]
    fn empty_original_clears_stale_fields() {
        let mut d = doc();
        d.entries[1].pronunciation.numbered = Some("stale".into());
        convert_document(&mut d, Dialect::Siyen, 500);
        assert_eq!(d.entries[1].pronunciation, Pronunciation::new(""));
    }
}
