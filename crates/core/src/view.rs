//! Typed view tree.
//!
//! Server-supplied strings only ever enter the tree as [`Node::Text`] or attribute
//! values, and both renderers escape them, so result fields can never inject markup.

use std::fmt::Write as _;

/// Tags rendered on their own line by [`Node::to_text`].
const BLOCK_TAGS: &[&str] = &["div", "a", "p", "li", "ul"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: &'static str,
    pub classes: Vec<String>,
    pub attrs: Vec<(&'static str, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self { tag, classes: Vec::new(), attrs: Vec::new(), children: Vec::new() }
    }

    /// Add whitespace-separated classes.
    pub fn class(mut self, classes: &str) -> Self {
        self.classes.extend(classes.split_whitespace().map(str::to_string));
        self
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(nodes);
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.iter().find(|(n, _)| *n == name).map(|(_, v)| v.as_str())
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }

    /// Depth-first search for every element matching `pred`.
    pub fn find_all<'a>(&'a self, pred: &dyn Fn(&Element) -> bool) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.walk(&mut |el| {
            if pred(el) {
                found.push(el);
            }
        });
        found
    }

    fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Element)) {
        if let Node::Element(el) = self {
            visit(el);
            for child in &el.children {
                child.walk(visit);
            }
        }
    }

    /// Concatenated text content, whitespace-collapsed.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_inline(&mut out);
        out
    }

    fn collect_inline(&self, out: &mut String) {
        match self {
            Node::Text(t) => push_words(out, t),
            Node::Element(el) => {
                for child in &el.children {
                    child.collect_inline(out);
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // HTML
    // -----------------------------------------------------------------------

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Text(t) => out.push_str(&escape_html(t)),
            Node::Element(el) => {
                out.push('<');
                out.push_str(el.tag);
                if !el.classes.is_empty() {
                    let _ = write!(out, " class=\"{}\"", escape_html(&el.classes.join(" ")));
                }
                for (name, value) in &el.attrs {
                    let _ = write!(out, " {name}=\"{}\"", escape_html(value));
                }
                out.push('>');
                for child in &el.children {
                    child.write_html(out);
                }
                let _ = write!(out, "</{}>", el.tag);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Plain text
    // -----------------------------------------------------------------------

    /// Terminal rendering: one line per block element, badges in brackets,
    /// links followed by their target.
    pub fn to_text(&self) -> String {
        let mut lines = Vec::new();
        let mut current = String::new();
        self.write_text(&mut lines, &mut current);
        flush_line(&mut lines, &mut current);
        lines.join("\n")
    }

    fn write_text(&self, lines: &mut Vec<String>, current: &mut String) {
        match self {
            Node::Text(t) => push_words(current, t),
            Node::Element(el) => {
                let block = BLOCK_TAGS.contains(&el.tag);
                if block {
                    flush_line(lines, current);
                }
                if el.has_class("badge") {
                    let label = Node::Element(el.clone()).text_content();
                    push_words(current, &format!("[{label}]"));
                } else {
                    for child in &el.children {
                        child.write_text(lines, current);
                    }
                }
                if el.tag == "a" {
                    if let Some(href) = el.get_attr("href") {
                        push_words(current, &format!("-> {href}"));
                    }
                }
                if block {
                    flush_line(lines, current);
                }
            }
        }
    }
}

fn push_words(out: &mut String, text: &str) {
    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
}

fn flush_line(lines: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        lines.push(std::mem::take(current));
    }
}

/// Escape text for use in HTML content and double- or single-quoted attributes.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
