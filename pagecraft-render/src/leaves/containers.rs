//! Leaves that place their children: Column and Section.

use crate::markup::{Element, RenderNode};
use crate::style::format_px;
use serde::Deserialize;

/// Tags a Section may render as.
const SECTION_TAGS: &[&str] = &["section", "div", "article", "header", "footer", "main", "aside"];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnConfig {
    pub gap: f64,
    /// Cross-axis alignment: start, center, end or stretch.
    pub align: Option<String>,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self { gap: 8.0, align: None }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SectionConfig {
    pub tag: String,
    pub background_color: Option<String>,
    pub padding: f64,
    pub max_width: Option<f64>,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            tag: "section".to_string(),
            background_color: None,
            padding: 16.0,
            max_width: None,
        }
    }
}

pub fn column(config: &ColumnConfig, children: Vec<RenderNode>) -> Element {
    let mut el = Element::new("div")
        .class("pc-column")
        .style("display", "flex")
        .style("flex-direction", "column")
        .style("gap", format_px(config.gap.max(0.0)))
        .style("min-width", "0");
    let align = match config.align.as_deref() {
        Some("start") => Some("flex-start"),
        Some("center") => Some("center"),
        Some("end") => Some("flex-end"),
        Some("stretch") => Some("stretch"),
        _ => None,
    };
    if let Some(align) = align {
        el = el.style("align-items", align);
    }
    el.children(children)
}

pub fn section(config: &SectionConfig, children: Vec<RenderNode>) -> Element {
    let tag = if SECTION_TAGS.contains(&config.tag.as_str()) {
        config.tag.as_str()
    } else {
        "section"
    };
    let mut el = Element::new(tag)
        .class("pc-section")
        .style("padding", format_px(config.padding.max(0.0)));
    if let Some(color) = config.background_color.as_deref().filter(|c| !c.is_empty()) {
        el = el.style("background-color", color);
    }
    if let Some(max) = config.max_width.filter(|m| *m > 0.0) {
        el = el
            .style("max-width", format_px(max))
            .style("margin-left", "auto")
            .style("margin-right", "auto");
    }
    el.children(children)
}
