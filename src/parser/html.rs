//! Rendered-page (HTML) parser
//!
//! Builds a lightweight element tree with the recovery rules browsers apply
//! to table markup, then snapshots every `<table id="...">` into a [`Table`].
//! Cell text follows rendered-text rules closely enough for export: hidden
//! raw-text elements, elements carrying `hidden` and comments are dropped,
//! `<br>` and block boundaries become line breaks, and character references
//! are decoded.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::InputFormat;
use crate::error::ExportError;
use crate::model::{Cell, CellKind, Document, Table};

use super::entities::decode_entities;
use super::Parser;

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)<!--.*?(?:-->|\z)|<![^>]*>|<\?[^>]*>|<(/?)([A-Za-z][A-Za-z0-9:-]*)((?:[^>"']|"[^"]*"|'[^']*')*)>"#,
    )
    .expect("token pattern is valid")
});

/// One attribute: name, then an optional double-quoted, single-quoted or bare value
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s"'>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+)))?"#)
        .expect("attribute pattern is valid")
});

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements whose content never reaches rendered text
const HIDDEN_RAW_ELEMENTS: &[&str] = &[
    "script", "style", "template", "noscript", "textarea", "title",
];

const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "caption", "dd", "details", "div", "dl",
    "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5",
    "h6", "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section", "summary",
    "table", "tbody", "tfoot", "thead", "tr", "ul",
];

/// Parser for rendered HTML pages
pub struct HtmlParser;

impl Parser for HtmlParser {
    fn parse_str(&self, source: &str) -> Result<Document, ExportError> {
        let tree = Tree::build(source);
        let document: Document = tree.tables().collect();
        tracing::debug!(tables = document.len(), "parsed HTML document");
        Ok(document)
    }

    fn format(&self) -> InputFormat {
        InputFormat::Html
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "html" | "htm" | "xhtml")
    }
}

#[derive(Debug)]
enum NodeKind {
    Root,
    Element {
        name: String,
        id: Option<String>,
        hidden: bool,
    },
    Text(String),
    LineBreak,
}

#[derive(Debug)]
struct Node {
    kind: NodeKind,
    children: Vec<usize>,
    line: usize,
}

impl Node {
    fn name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }

    fn is(&self, tag: &str) -> bool {
        self.name() == Some(tag)
    }
}

/// Arena-backed element tree. Node indices follow document order.
#[derive(Debug)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn build(source: &str) -> Self {
        let source = source.strip_prefix('\u{feff}').unwrap_or(source);
        // ASCII lowercasing keeps byte offsets, so raw-text end tags are
        // searched here and sliced from `source`
        let lower = source.to_ascii_lowercase();
        let mut builder = TreeBuilder::new();
        let mut pos = 0;
        let mut line = 1;

        while let Some(caps) = TOKEN_RE.captures_at(source, pos) {
            let Some(whole) = caps.get(0) else { break };
            let text = &source[pos..whole.start()];
            builder.text(text, line);
            line += text.matches('\n').count();
            let tag_line = line;
            line += whole.as_str().matches('\n').count();
            pos = whole.end();

            // comments, doctypes and processing instructions carry no name
            let Some(name) = caps.get(2) else { continue };
            let name = name.as_str().to_ascii_lowercase();
            let attrs = caps.get(3).map_or("", |m| m.as_str());

            if caps.get(1).is_some_and(|m| !m.as_str().is_empty()) {
                builder.close(&name);
                continue;
            }

            if HIDDEN_RAW_ELEMENTS.contains(&name.as_str()) {
                let end = find_raw_text_end(&lower, pos, &name);
                line += source[pos..end].matches('\n').count();
                pos = end;
                continue;
            }

            // a trailing `/` means nothing on HTML elements: `<td/>` still opens a cell
            builder.open(name, TagAttrs::parse(attrs), tag_line);
        }

        builder.text(&source[pos..], line);
        Tree {
            nodes: builder.nodes,
        }
    }

    /// Snapshots of every table carrying a non-empty id, in document order
    fn tables(&self) -> impl Iterator<Item = Table> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(idx, node)| match &node.kind {
                NodeKind::Element {
                    name, id: Some(id), ..
                } if name == "table" && !id.is_empty() => {
                    Some(self.snapshot(idx, id))
                }
                _ => None,
            })
    }

    fn snapshot(&self, table_idx: usize, id: &str) -> Table {
        let mut table = Table::new(id);
        for tr in self.descendants(table_idx).filter(|&i| self.nodes[i].is("tr")) {
            let cells = self
                .descendants(tr)
                .filter_map(|i| {
                    let kind = match self.nodes[i].name()? {
                        "th" => CellKind::Header,
                        "td" => CellKind::Data,
                        _ => return None,
                    };
                    let mut text = String::new();
                    self.collect_children_text(i, &mut text);
                    Some(Cell::new(kind, text))
                })
                .collect();
            table.add_row(cells, self.nodes[tr].line);
        }
        table
    }

    /// Pre-order descendants, excluding `idx` itself
    fn descendants(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        let mut stack: Vec<usize> = self.nodes[idx].children.iter().rev().copied().collect();
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(self.nodes[next].children.iter().rev().copied());
            Some(next)
        })
    }

    fn collect_children_text(&self, idx: usize, out: &mut String) {
        for &child in &self.nodes[idx].children {
            self.collect_text(child, out);
        }
    }

    fn collect_text(&self, idx: usize, out: &mut String) {
        let node = &self.nodes[idx];
        match &node.kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::LineBreak => out.push('\n'),
            NodeKind::Element { hidden: true, .. } => {}
            NodeKind::Element { name, .. } => {
                let name = name.as_str();
                if BLOCK_ELEMENTS.contains(&name) {
                    out.push('\n');
                    self.collect_children_text(idx, out);
                    out.push('\n');
                } else if name == "td" || name == "th" {
                    self.collect_children_text(idx, out);
                    out.push('\t');
                } else {
                    self.collect_children_text(idx, out);
                }
            }
            NodeKind::Root => self.collect_children_text(idx, out),
        }
    }
}

struct TreeBuilder {
    nodes: Vec<Node>,
    /// Open elements, root at the bottom
    open: Vec<usize>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Root,
                children: Vec::new(),
                line: 1,
            }],
            open: vec![0],
        }
    }

    fn current(&self) -> usize {
        self.open.last().copied().unwrap_or(0)
    }

    fn append(&mut self, kind: NodeKind, line: usize) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(Node {
            kind,
            children: Vec::new(),
            line,
        });
        let parent = self.current();
        self.nodes[parent].children.push(idx);
        idx
    }

    fn text(&mut self, raw: &str, line: usize) {
        if raw.is_empty() {
            return;
        }
        let text = decode_entities(raw).into_owned();
        self.append(NodeKind::Text(text), line);
    }

    fn open(&mut self, name: String, attrs: TagAttrs, line: usize) {
        match name.as_str() {
            "tr" => self.close_implied(&["tr", "td", "th"]),
            "td" | "th" => {
                self.close_implied(&["td", "th"]);
                if self.needs_implied_row() {
                    let tr = self.append(
                        NodeKind::Element {
                            name: "tr".to_string(),
                            id: None,
                            hidden: false,
                        },
                        line,
                    );
                    self.open.push(tr);
                }
            }
            "tbody" | "thead" | "tfoot" => {
                self.close_implied(&["tbody", "thead", "tfoot", "tr", "td", "th"])
            }
            _ => {}
        }

        if name == "br" {
            self.append(NodeKind::LineBreak, line);
            return;
        }

        let is_void = VOID_ELEMENTS.contains(&name.as_str());
        let kind = NodeKind::Element {
            name,
            id: attrs.id,
            hidden: attrs.hidden,
        };
        let idx = self.append(kind, line);
        if !is_void {
            self.open.push(idx);
        }
    }

    /// A cell opened directly inside a table or table section gets a `tr`
    fn needs_implied_row(&self) -> bool {
        for &idx in self.open.iter().rev() {
            match self.nodes[idx].name() {
                Some("tr") => return false,
                Some("table") => return true,
                _ => {}
            }
        }
        false
    }

    /// Close the outermost open element named in `tags` that sits above the
    /// nearest open table, along with everything opened inside it.
    fn close_implied(&mut self, tags: &[&str]) {
        let mut cut = None;
        for (pos, &idx) in self.open.iter().enumerate().rev() {
            let node = &self.nodes[idx];
            if node.is("table") {
                break;
            }
            if node.name().is_some_and(|n| tags.contains(&n)) {
                cut = Some(pos);
            }
        }
        if let Some(pos) = cut {
            self.open.truncate(pos);
        }
    }

    fn close(&mut self, name: &str) {
        if name == "br" {
            // `</br>` renders as a line break
            let line = self.nodes[self.current()].line;
            self.append(NodeKind::LineBreak, line);
            return;
        }
        let mut matched = None;
        for (pos, &idx) in self.open.iter().enumerate().rev() {
            let node = &self.nodes[idx];
            if node.is(name) {
                matched = Some(pos);
                break;
            }
            // stray end tags inside a table must not close the table's ancestors
            if node.is("table") {
                break;
            }
        }
        if let Some(pos) = matched {
            self.open.truncate(pos);
        }
    }
}

/// Attributes the tree cares about
#[derive(Debug, Default, PartialEq)]
struct TagAttrs {
    id: Option<String>,
    hidden: bool,
}

impl TagAttrs {
    /// Walk attributes in order; the first occurrence of a name wins
    fn parse(attrs: &str) -> Self {
        let mut parsed = Self::default();
        let mut seen_id = false;
        for caps in ATTR_RE.captures_iter(attrs) {
            let Some(name) = caps.get(1) else { continue };
            let name = name.as_str();
            if name.eq_ignore_ascii_case("hidden") {
                parsed.hidden = true;
            } else if name.eq_ignore_ascii_case("id") && !seen_id {
                seen_id = true;
                let value = caps
                    .get(2)
                    .or_else(|| caps.get(3))
                    .or_else(|| caps.get(4))
                    .map_or("", |m| m.as_str());
                parsed.id = Some(decode_entities(value).into_owned());
            }
        }
        parsed
    }
}

/// Byte offset just past the end tag closing a raw-text element, or the end
/// of input when it is never closed. `lower` is the ASCII-lowercased source.
fn find_raw_text_end(lower: &str, from: usize, name: &str) -> usize {
    let needle = format!("</{}", name);
    let mut search = from;
    while let Some(found) = lower[search..].find(&needle) {
        let after = search + found + needle.len();
        match lower.as_bytes().get(after) {
            Some(b'>' | b' ' | b'\t' | b'\n' | b'\r' | b'\x0c' | b'/') => {
                return lower[after..].find('>').map_or(lower.len(), |i| after + i + 1);
            }
            None => return lower.len(),
            Some(_) => search = after,
        }
    }
    lower.len()
}
