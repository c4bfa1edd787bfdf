// SPDX-License-Identifier: PMPL-1.0-or-later

//! Rendering to a DOM-equivalent node tree
//!
//! Renderers never touch the surface directly: they take borrowed content
//! and return [`Node`]s, which the controller hands to a
//! [`Surface`](crate::surface::Surface). Nodes serialize to escaped HTML
//! for snapshots and to plain text for the terminal browser.

pub mod blocks;
pub mod chrome;

use serde::Serialize;

pub use blocks::{badge_class, render_block, render_section_body, BadgeClass};

/// Elements rendered without a closing tag.
const VOID_TAGS: &[&str] = &["img", "br", "hr"];

/// Elements that start on a new line in plain-text output.
const BLOCK_TAGS: &[&str] = &[
    "article", "div", "h1", "h2", "h3", "li", "p", "section", "table", "tr", "ul",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    pub tag: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attrs: Vec<(String, String)>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| n == name) {
            Some(pair) => pair.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
        self
    }

    pub fn class(self, class: &str) -> Self {
        self.attr("class", class)
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

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    pub fn text_content(&self) -> String {
        self.children.iter().map(Node::text_content).collect()
    }

    /// Links and buttons with an id can take keyboard focus.
    pub fn is_focusable(&self) -> bool {
        matches!(self.tag, "a" | "button") && self.get_attr("id").is_some()
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

    /// Concatenated text of this node and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => el.children.iter().for_each(|c| c.collect_text(out)),
        }
    }

    /// Elements in document order (pre-order, including `self`).
    pub fn elements(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        self.collect_elements(&mut out);
        out
    }

    fn collect_elements<'a>(&'a self, out: &mut Vec<&'a Element>) {
        if let Node::Element(el) = self {
            out.push(el);
            for child in &el.children {
                child.collect_elements(out);
            }
        }
    }

    pub fn find_by_class(&self, class: &str) -> Vec<&Element> {
        self.elements()
            .into_iter()
            .filter(|el| el.has_class(class))
            .collect()
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    pub fn write_html(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(&escape_html(text)),
            Node::Element(el) => {
                out.push('<');
                out.push_str(el.tag);
                for (name, value) in &el.attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape_html(value));
                    out.push('"');
                }
                out.push('>');
                if VOID_TAGS.contains(&el.tag) {
                    return;
                }
                for child in &el.children {
                    child.write_html(out);
                }
                out.push_str("</");
                out.push_str(el.tag);
                out.push('>');
            }
        }
    }

    /// Plain-text rendering for terminals: block elements on their own
    /// lines, table cells separated by `|`, images as `[image: alt]`.
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        self.write_plain(&mut out);
        out.lines()
            .map(str::trim_end)
            .filter(|line| !line.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn write_plain(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                let block = BLOCK_TAGS.contains(&el.tag);
                if block && !out.ends_with('\n') && !out.is_empty() {
                    out.push('\n');
                }
                if el.tag == "img" {
                    out.push_str(&format!("[image: {}]", el.get_attr("alt").unwrap_or("")));
                    out.push('\n');
                    return;
                }
                for child in &el.children {
                    child.write_plain(out);
                }
                match el.tag {
                    "td" | "th" => out.push_str(" | "),
                    "span" => out.push(' '),
                    _ => {}
                }
                if block {
                    out.push('\n');
                }
            }
        }
    }
}

/// Escape special HTML characters.
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}
