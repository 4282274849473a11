mod config;
mod document;
mod error;
mod model;
mod parser;
mod phonology;
mod stats;

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing::info;

use config::Settings;
use document::Document;
use model::{Entry, EntryBody};
use parser::ParserOptions;
use phonology::{ConversionReport, Dialect};
use stats::{percent, DocumentStats};

#[derive(Parser)]
#[command(name = "hakka_dict", about = "Hakka dictionary extractor and pronunciation converter")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract entries from the dictionary HTML
    Parse {
        /// Dictionary HTML (private-use glyphs already remapped)
        html: PathBuf,
        /// Output JSON (default: settings `output`)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Add numbered, marked and church-romanization pronunciations
    Convert {
        /// siyen or hoiliuk
        dialect: String,
        /// Document written by `parse`
        json: PathBuf,
        /// Output JSON (default: <input>_<dialect>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Parse + convert in one pipeline
    Run {
        /// siyen or hoiliuk
        dialect: String,
        html: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Entry statistics and a sample listing
    Stats {
        json: PathBuf,
        /// Entries to list
        #[arg(short = 'n', long, default_value = "5")]
        sample: usize,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;
    info!(?settings, "settings loaded");

    let result = match cli.command {
        Commands::Parse { html, output } => {
            let doc = extract(&html, &settings)?;
            let out = output.unwrap_or_else(|| PathBuf::from(&settings.output));
            doc.write(&out)?;
            println!("Saved {} entries to {}", doc.entries.len(), out.display());
            Ok(())
        }
        Commands::Convert { dialect, json, output } => {
            let dialect: Dialect = dialect.parse()?;
            let mut doc = Document::read(&json)?;
            if doc.entries.is_empty() {
                println!("No entries in {}.", json.display());
                return Ok(());
            }
            println!("Converting {} entries...", doc.entries.len());
            let report = phonology::convert_document(&mut doc, dialect, settings.chunk_size);
            print_report(&report);
            let out = output.unwrap_or_else(|| converted_path(&json, dialect));
            doc.write(&out)?;
            println!("Saved to {}", out.display());
            Ok(())
        }
        Commands::Run { dialect, html, output } => {
            // Reject the dialect before doing any parsing work.
            let dialect: Dialect = dialect.parse()?;

            let t_parse = Instant::now();
            let mut doc = extract(&html, &settings)?;
            println!(
                "Parsed {} entries in {:.1}s",
                doc.entries.len(),
                t_parse.elapsed().as_secs_f64()
            );

            let t_convert = Instant::now();
            let report = phonology::convert_document(&mut doc, dialect, settings.chunk_size);
            println!("Converted in {:.1}s", t_convert.elapsed().as_secs_f64());
            print_report(&report);

            let out = output.unwrap_or_else(|| PathBuf::from(&settings.output));
            doc.write(&out)?;
            println!("Saved to {}", out.display());
            Ok(())
        }
        Commands::Stats { json, sample } => {
            let doc = Document::read(&json)?;
            print_stats(&DocumentStats::collect(&doc.entries));
            print_sample(&doc.entries, sample);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn extract(html: &Path, settings: &Settings) -> anyhow::Result<Document> {
    let source = parser::read_html(html)?;
    let extraction = parser::process_document(&source, &ParserOptions::from(settings));
    if !extraction.warnings.is_empty() {
        println!("{} structural warnings (see log)", extraction.warnings.len());
    }
    Ok(Document::new(extraction.entries))
}

fn converted_path(input: &Path, dialect: Dialect) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "hakka_dict".to_string());
    input.with_file_name(format!("{}_{}.json", stem, dialect))
}

fn print_report(report: &ConversionReport) {
    println!(
        "Converted {} entries ({}), skipped {} without pronunciation.",
        report.converted, report.dialect, report.skipped
    );
    if !report.unrecognized.is_empty() {
        println!("{} unrecognized syllables:", report.unrecognized.len());
        for u in report.unrecognized.iter().take(20) {
            println!("  #{}: {}", u.entry_id, u.syllable);
        }
        if report.unrecognized.len() > 20 {
            println!("  ...");
        }
    }
}

fn print_stats(s: &DocumentStats) {
    println!("Total:      {}", s.total);
    for (kind, n) in &s.by_kind {
        println!("  {:<10} {:>6} ({:.1}%)", kind, n, percent(*n, s.total));
    }
    if s.words > 0 {
        println!("Words:      {}", s.words);
        println!(
            "  with examples   {:>6} ({:.1}%)",
            s.words_with_examples,
            percent(s.words_with_examples, s.words)
        );
        println!(
            "  several senses  {:>6} ({:.1}%)",
            s.words_with_several_senses,
            percent(s.words_with_several_senses, s.words)
        );
    }
    if s.characters > 0 {
        println!("Characters: {}", s.characters);
        println!(
            "  classical notes {:>6} ({:.1}%)",
            s.characters_with_notes,
            percent(s.characters_with_notes, s.characters)
        );
        println!(
            "  definitions     {:>6} ({:.1}%)",
            s.characters_with_definitions,
            percent(s.characters_with_definitions, s.characters)
        );
    }
    println!("Converted:  {}", s.with_numbered);
}

fn print_sample(entries: &[Entry], n: usize) {
    if n == 0 {
        return;
    }
    println!("\n--- First {} entries ---", n.min(entries.len()));
    for e in entries.iter().take(n) {
        let p = &e.pronunciation;
        println!("{:>5} | {:<9} | {} | {}", e.id, e.kind(), truncate(&p.original, 24), e.label());
        if let Some(numbered) = &p.numbered {
            println!("        {} / {}", numbered, p.marked.as_deref().unwrap_or("-"));
        }
        match &e.body {
            EntryBody::Headword { characters, .. } => println!("        {}", characters.join(" ")),
            EntryBody::Character { classical_notes: Some(notes), .. } => {
                println!("        ({})", truncate(notes, 40))
            }
            _ => {}
        }
        for d in e.definitions() {
            let marker = d.marker.as_deref().unwrap_or("-");
            println!("        {} {}", marker, truncate(&d.text, 60));
            if let Some(ex) = d.examples.first() {
                println!("          {} {}", ex.marker, truncate(&ex.text, 50));
            }
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
