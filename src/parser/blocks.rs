use std::sync::LazyLock;

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use regex::Regex;

use super::text::{self, MACRON_BELOW};

static PT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*(\d+(?:\.\d+)?)\s*pt\s*$").unwrap());
static PX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*(\d+(?:\.\d+)?)\s*px\s*$").unwrap());
static NEWLINE_TAB_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\n\t\r]+").unwrap());

/// Inherited presentation of a text run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub size_pt: Option<f32>,
    pub face: Option<String>,
}

impl RunStyle {
    pub fn is_at_least(&self, pt: f32) -> bool {
        self.size_pt.is_some_and(|s| s >= pt)
    }

    pub fn is_at_most(&self, pt: f32) -> bool {
        self.size_pt.is_some_and(|s| s <= pt)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub text: String,
    pub style: RunStyle,
}

/// One `<p>` of the dictionary body.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub index: usize,
    pub indented: bool,
    pub runs: Vec<Run>,
}

impl Block {
    /// Raw concatenated text, whitespace untouched.
    pub fn raw_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Text with spacing normalized.
    pub fn text(&self) -> String {
        text::normalize_spaces(&self.raw_text())
    }

    pub fn non_blank_runs(&self) -> impl Iterator<Item = &Run> {
        self.runs.iter().filter(|r| !r.text.trim().is_empty())
    }

    pub fn is_blank(&self) -> bool {
        self.non_blank_runs().next().is_none()
    }
}

/// Parse HTML and return the paragraphs under the element whose id is
/// `section_id`, or under the whole document if it has none.
pub fn parse_blocks(html: &str, section_id: &str) -> Vec<Block> {
    let dom = parse_document(RcDom::default(), Default::default()).one(html);
    let root = find_by_id(&dom.document, section_id).unwrap_or_else(|| {
        tracing::debug!(section_id, "text section not found, using whole document");
        dom.document.clone()
    });

    let mut paragraphs = Vec::new();
    collect_paragraphs(&root, &mut paragraphs);

    paragraphs
        .into_iter()
        .enumerate()
        .map(|(index, p)| {
            let style_attr = attr(&p, "style").unwrap_or_default();
            let indented = style_attr.contains("margin-left") || style_attr.contains("text-indent");
            let mut runs = Vec::new();
            let base = apply_element_style(&RunStyle::default(), &p);
            for child in p.children.borrow().iter() {
                walk(child, &base, &mut runs);
            }
            Block {
                index,
                indented,
                runs: merge_adjacent(runs),
            }
        })
        .filter(|b| !b.is_blank())
        .collect()
}

fn element_name(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.to_string().to_ascii_lowercase()),
        _ => None,
    }
}

fn attr(node: &Handle, key: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| a.name.local.to_string().eq_ignore_ascii_case(key))
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

fn find_by_id(node: &Handle, id: &str) -> Option<Handle> {
    if attr(node, "id").is_some_and(|v| v == id) {
        return Some(node.clone());
    }
    for c in node.children.borrow().iter() {
        if let Some(found) = find_by_id(c, id) {
            return Some(found);
        }
    }
    None
}

fn collect_paragraphs(node: &Handle, out: &mut Vec<Handle>) {
    if element_name(node).as_deref() == Some("p") {
        out.push(node.clone());
        return;
    }
    for c in node.children.borrow().iter() {
        collect_paragraphs(c, out);
    }
}

fn walk(node: &Handle, style: &RunStyle, runs: &mut Vec<Run>) {
    match &node.data {
        NodeData::Text { contents } => {
            let raw = contents.borrow().to_string();
            let text = NEWLINE_TAB_RE.replace_all(&raw, " ").into_owned();
            if !text.is_empty() {
                runs.push(Run {
                    text,
                    style: style.clone(),
                });
            }
        }
        NodeData::Element { .. } => {
            if element_name(node).as_deref() == Some("br") {
                runs.push(Run {
                    text: " ".to_string(),
                    style: style.clone(),
                });
                return;
            }
            let inner = apply_element_style(style, node);
            let before = runs.len();
            for child in node.children.borrow().iter() {
                walk(child, &inner, runs);
            }
            // Underlined letters carry a tone; keep it as a combining mark.
            if inner.underline && !style.underline && runs.len() > before {
                if let Some(last) = runs[before..].iter_mut().rev().find(|r| !r.text.trim().is_empty()) {
                    let trimmed_len = last.text.trim_end().len();
                    last.text.insert(trimmed_len, MACRON_BELOW);
                }
            }
        }
        _ => {
            for child in node.children.borrow().iter() {
                walk(child, style, runs);
            }
        }
    }
}

fn apply_element_style(parent: &RunStyle, node: &Handle) -> RunStyle {
    let mut style = parent.clone();
    match element_name(node).as_deref() {
        Some("b" | "strong") => style.bold = true,
        Some("i" | "em") => style.italic = true,
        Some("u") => style.underline = true,
        Some("font") => {
            if let Some(size) = attr(node, "size").and_then(|s| parse_font_size(&s)) {
                style.size_pt = Some(size);
            }
            if let Some(face) = attr(node, "face") {
                style.face = Some(face);
            }
        }
        _ => {}
    }
    if let Some(css) = attr(node, "style") {
        apply_css(&mut style, &css);
    }
    style
}

fn apply_css(style: &mut RunStyle, css: &str) {
    for decl in css.split(';') {
        let Some((key, value)) = decl.split_once(':') else {
            continue;
        };
        let value = value.trim().to_ascii_lowercase();
        match key.trim().to_ascii_lowercase().as_str() {
            "font-size" => {
                if let Some(size) = parse_font_size(&value) {
                    style.size_pt = Some(size);
                }
            }
            "font-weight" => {
                style.bold = value == "bold"
                    || value == "bolder"
                    || value.parse::<u32>().is_ok_and(|w| w >= 600);
            }
            "font-style" => style.italic = value == "italic" || value == "oblique",
            "text-decoration" | "text-decoration-line" => {
                if value.contains("underline") {
                    style.underline = true;
                }
            }
            "font-family" => style.face = Some(value.trim_matches(['"', '\'']).to_string()),
            _ => {}
        }
    }
}

/// `<font size>` steps, `"14pt"` and `"16px"` values, all in points.
pub fn parse_font_size(raw: &str) -> Option<f32> {
    let raw = raw.trim();
    if let Ok(step) = raw.parse::<u8>() {
        return match step {
            1 => Some(8.0),
            2 => Some(10.0),
            3 => Some(12.0),
            4 => Some(14.0),
            5 => Some(18.0),
            6 => Some(24.0),
            7 => Some(36.0),
            _ => None,
        };
    }
    if let Some(c) = PT_RE.captures(raw) {
        return c[1].parse().ok();
    }
    PX_RE
        .captures(raw)
        .and_then(|c| c[1].parse::<f32>().ok())
        .map(|px| px * 0.75)
}

fn merge_adjacent(runs: Vec<Run>) -> Vec<Run> {
    let mut merged: Vec<Run> = Vec::with_capacity(runs.len());
    for run in runs {
        match merged.last_mut() {
            Some(prev) if prev.style == run.style => prev.text.push_str(&run.text),
            _ => merged.push(run),
        }
    }
    merged
}
