//! Layout container adapters.
//!
//! Purely presentational: slot contents arrive already rendered. Empty slots
//! get a visible placeholder, so the column count never changes.

use super::{slot_width_expr, LayoutKind};
use crate::markup::{Element, RenderNode};
use crate::style::format_px;

/// Tag and modifier class of one slot wrapper.
struct SlotRole {
    tag: &'static str,
    modifier: Option<&'static str>,
}

impl LayoutKind {
    fn slot_role(self, index: usize) -> SlotRole {
        match (self, index) {
            (LayoutKind::SidebarMainLayout, 0) => SlotRole {
                tag: "aside",
                modifier: Some("pc-slot--sidebar"),
            },
            (LayoutKind::SidebarMainLayout, _) => SlotRole {
                tag: "section",
                modifier: Some("pc-slot--main"),
            },
            (LayoutKind::ThreeColumnsWideCenter, 1) => SlotRole {
                tag: "div",
                modifier: Some("pc-slot--center"),
            },
            _ => SlotRole {
                tag: "div",
                modifier: None,
            },
        }
    }
}

/// Visible stand-in for a slot without content. `index` is zero-based.
pub fn empty_slot_placeholder(index: usize) -> RenderNode {
    Element::new("div")
        .class("pc-slot-empty")
        .text(&format!("Column {} (Empty)", index + 1))
        .into()
}

/// Draws a layout: one wrapper per width, in order. `slots[i]` is the
/// content of slot `i`; missing or `None` entries render the placeholder.
pub fn render_layout(
    kind: LayoutKind,
    slots: Vec<Option<RenderNode>>,
    widths: &[f64],
    gap: f64,
) -> Element {
    let count = widths.len();
    let mut contents = slots.into_iter();

    let mut container = Element::new("div")
        .class("pc-layout")
        .class(&format!("pc-layout--{}", kind.css_modifier()))
        .attr("data-layout", kind.name())
        .style("display", "flex")
        .style("flex-wrap", "wrap")
        .style("gap", format_px(gap))
        .style("width", "100%");

    for (index, width) in widths.iter().enumerate() {
        let role = kind.slot_role(index);
        let expr = slot_width_expr(*width, gap, count);
        let mut wrapper = Element::new(role.tag)
            .class("pc-slot")
            .attr("data-slot", index.to_string())
            .style("flex", format!("0 0 {}", expr))
            .style("max-width", expr)
            .style("min-width", "0")
            .style("box-sizing", "border-box");
        if let Some(modifier) = role.modifier {
            wrapper.add_class(modifier);
        }
        let content = contents
            .next()
            .flatten()
            .unwrap_or_else(|| empty_slot_placeholder(index));
        container = container.child(wrapper.child(content));
    }
    container
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn keeps_slot_count_with_missing_content() {
        let kind = LayoutKind::ThreeEqualColumns;
        let slots = vec![Some(RenderNode::text("a"))];
        let layout: RenderNode = render_layout(kind, slots, kind.default_widths(), 16.0).into();
        assert_eq!(layout.find_all("pc-slot").len(), 3);
        assert_eq!(layout.find_all("pc-slot-empty").len(), 2);
        assert_eq!(layout.text_content(), "aColumn 2 (Empty)Column 3 (Empty)");
    }

    #[test]
    fn sidebar_main_uses_semantic_wrappers() {
        let kind = LayoutKind::SidebarMainLayout;
        let layout = render_layout(kind, vec![None, None], kind.default_widths(), 16.0);
        let tags: Vec<&str> = layout
            .children
            .iter()
            .filter_map(|c| c.as_element())
            .map(|e| e.tag.as_str())
            .collect();
        assert_eq!(tags, vec!["aside", "section"]);
    }

    #[test]
    fn slot_widths_follow_distribution() {
        let kind = LayoutKind::TwoEqualColumns;
        let layout = render_layout(kind, vec![None, None], kind.default_widths(), 16.0);
        let first = layout.children[0].as_element().unwrap();
        assert_eq!(first.style.get("max-width"), Some("calc(50% - 8px)"));
    }
}
