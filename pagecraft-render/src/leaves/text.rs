//! Text leaves: paragraph, heading, rich text and quote.

use super::{multiline, text_align};
use crate::markup::{Element, RenderNode};
use crate::sanitize::markdown_to_safe_html;
use crate::style::format_px;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParagraphConfig {
    pub text: String,
    pub align: Option<String>,
    pub font_size: Option<f64>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeadingConfig {
    pub text: String,
    /// 1 to 6; out-of-range levels are clamped.
    pub level: u8,
    pub align: Option<String>,
    pub color: Option<String>,
}

impl Default for HeadingConfig {
    fn default() -> Self {
        Self {
            text: "Heading".to_string(),
            level: 2,
            align: None,
            color: None,
        }
    }
}

/// Markdown body.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RichTextConfig {
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteConfig {
    pub text: String,
    pub author: Option<String>,
    pub role: Option<String>,
}

pub fn paragraph(config: &ParagraphConfig) -> Element {
    let mut p = Element::new("p").class("pc-paragraph");
    if let Some(align) = text_align(config.align.as_deref()) {
        p = p.style("text-align", align);
    }
    if let Some(size) = config.font_size.filter(|s| *s > 0.0) {
        p = p.style("font-size", format_px(size));
    }
    if let Some(color) = config.color.as_deref().filter(|c| !c.is_empty()) {
        p = p.style("color", color);
    }
    multiline(p, &config.text)
}

pub fn heading(config: &HeadingConfig) -> Element {
    let level = config.level.clamp(1, 6);
    let mut h = Element::new(&format!("h{}", level))
        .class("pc-heading")
        .text(&config.text);
    if let Some(align) = text_align(config.align.as_deref()) {
        h = h.style("text-align", align);
    }
    if let Some(color) = config.color.as_deref().filter(|c| !c.is_empty()) {
        h = h.style("color", color);
    }
    h
}

pub fn rich_text(config: &RichTextConfig) -> Element {
    Element::new("div")
        .class("pc-rich-text")
        .child(RenderNode::Raw(markdown_to_safe_html(&config.content)))
}

pub fn quote(config: &QuoteConfig) -> Element {
    let mut figure = Element::new("figure")
        .class("pc-quote")
        .child(multiline(Element::new("blockquote"), &config.text));
    if let Some(author) = config.author.as_deref().filter(|a| !a.is_empty()) {
        let mut caption = Element::new("figcaption").text(author);
        if let Some(role) = config.role.as_deref().filter(|r| !r.is_empty()) {
            caption = caption.text(", ").child(Element::new("cite").text(role));
        }
        figure = figure.child(caption);
    }
    figure
}
