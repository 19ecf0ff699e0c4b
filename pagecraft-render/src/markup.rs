//! Render output: a small HTML element tree and its serializer.

use crate::style::StyleAttributes;
use std::fmt::Write;

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &["img", "hr", "br", "input", "source"];

/// A rendered node.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderNode {
    Element(Element),
    Text(String),
    /// Already-sanitized HTML, written verbatim.
    Raw(String),
}

/// An HTML element with ordered attributes and an inline style.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub style: StyleAttributes,
    pub children: Vec<RenderNode>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: Vec::new(),
            style: StyleAttributes::new(),
            children: Vec::new(),
        }
    }

    /// Appends a class token.
    pub fn class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn add_class(&mut self, class: &str) {
        if class.trim().is_empty() {
            return;
        }
        match self.attrs.iter_mut().find(|(k, _)| k == "class") {
            Some((_, existing)) => {
                existing.push(' ');
                existing.push_str(class.trim());
            }
            None => self.attrs.push(("class".to_string(), class.trim().to_string())),
        }
    }

    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Sets an attribute, replacing an existing value in place.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, existing)) => *existing = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    pub fn style(mut self, property: &str, value: impl Into<String>) -> Self {
        self.style.set(property, value);
        self
    }

    /// Merges a style mapping; later values win.
    pub fn with_style(mut self, style: &StyleAttributes) -> Self {
        self.style.merge(style);
        self
    }

    pub fn child(mut self, child: impl Into<RenderNode>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = RenderNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn text(self, text: &str) -> Self {
        self.child(RenderNode::Text(text.to_string()))
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }
}

impl From<Element> for RenderNode {
    fn from(element: Element) -> Self {
        RenderNode::Element(element)
    }
}

impl RenderNode {
    pub fn text(text: &str) -> Self {
        RenderNode::Text(text.to_string())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            RenderNode::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            RenderNode::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Serializes the subtree to HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_html(&mut out);
        out
    }

    pub fn write_html(&self, out: &mut String) -> std::fmt::Result {
        match self {
            RenderNode::Text(text) => write!(out, "{}", escape_html(text)),
            RenderNode::Raw(html) => write!(out, "{}", html),
            RenderNode::Element(el) => {
                write!(out, "<{}", el.tag)?;
                for (name, value) in &el.attrs {
                    write!(out, " {}=\"{}\"", name, escape_html(value))?;
                }
                if !el.style.is_empty() {
                    write!(out, " style=\"{}\"", escape_html(&el.style.to_css()))?;
                }
                write!(out, ">")?;
                if VOID_ELEMENTS.contains(&el.tag.as_str()) {
                    return Ok(());
                }
                for child in &el.children {
                    child.write_html(out)?;
                }
                write!(out, "</{}>", el.tag)
            }
        }
    }

    /// All elements in the subtree carrying `class`, in document order.
    pub fn find_all(&self, class: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect_by_class(class, &mut found);
        found
    }

    fn collect_by_class<'a>(&'a self, class: &str, found: &mut Vec<&'a Element>) {
        if let RenderNode::Element(el) = self {
            if el.has_class(class) {
                found.push(el);
            }
            for child in &el.children {
                child.collect_by_class(class, found);
            }
        }
    }

    /// Concatenated text of the subtree (raw HTML excluded).
    pub fn text_content(&self) -> String {
        match self {
            RenderNode::Text(text) => text.clone(),
            RenderNode::Raw(_) => String::new(),
            RenderNode::Element(el) => el.children.iter().map(RenderNode::text_content).collect(),
        }
    }
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
