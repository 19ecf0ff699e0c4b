//! Style derivation from the loosely-typed props bag.

use crate::tree::Props;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Border color used when a border has a width but no color.
pub const DEFAULT_BORDER_COLOR: &str = "#e5e7eb";

/// Border style used when a border has a width but no style.
pub const DEFAULT_BORDER_STYLE: &str = "solid";

/// CSS properties whose numeric values carry no unit.
const UNITLESS_PROPERTIES: &[&str] = &[
    "opacity",
    "z-index",
    "font-weight",
    "line-height",
    "flex",
    "flex-grow",
    "flex-shrink",
    "order",
];

/// Ordered CSS declarations. Setting an existing property replaces its value
/// without moving it. Declarations with an invalid property name or a value
/// that could end the declaration are dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleAttributes {
    entries: Vec<(String, String)>,
}

impl StyleAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, property: &str, value: impl Into<String>) {
        let value = value.into();
        if !is_css_property_name(property) || !is_safe_css_value(&value) {
            tracing::debug!("dropping css declaration {:?}: {:?}", property, value);
            return;
        }
        match self.entries.iter_mut().find(|(p, _)| p == property) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((property.to_string(), value)),
        }
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, property: &str) -> bool {
        self.get(property).is_some()
    }

    /// Applies `other` on top of `self`.
    pub fn merge(&mut self, other: &StyleAttributes) {
        for (property, value) in &other.entries {
            self.set(property, value.clone());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, v)| (p.as_str(), v.as_str()))
    }

    pub fn to_css(&self) -> String {
        self.entries
            .iter()
            .map(|(p, v)| format!("{}:{};", p, v))
            .collect()
    }
}

/// Derives margin, border and shadow declarations from a props bag.
///
/// Pure: unrecognized keys are ignored and malformed sub-fields are skipped.
pub fn derive_layout_style(props: &Props) -> StyleAttributes {
    let mut style = StyleAttributes::new();
    if let Some(margin) = props.get("margin") {
        apply_margin(&mut style, margin);
    }
    if let Some(border) = props.get("border").and_then(Value::as_object) {
        apply_border(&mut style, border);
    }
    if let Some(shadow) = props
        .get("shadow")
        .and_then(Value::as_str)
        .and_then(shadow_preset)
    {
        style.set("box-shadow", shadow);
    }
    style
}

/// Inline `props.style` declarations merged with [`derive_layout_style`];
/// derived values win.
pub fn merged_style(props: &Props) -> StyleAttributes {
    let mut style = inline_style(props);
    style.merge(&derive_layout_style(props));
    style
}

/// Converts a `props.style` object (camelCase keys) into declarations.
pub fn inline_style(props: &Props) -> StyleAttributes {
    let mut style = StyleAttributes::new();
    let Some(map) = props.get("style").and_then(Value::as_object) else {
        return style;
    };
    for (key, value) in map {
        let property = css_property_name(key);
        if !is_css_property_name(&property) {
            continue;
        }
        let rendered = match value {
            Value::String(s) if is_safe_css_value(s) => s.trim().to_string(),
            Value::Number(n) => match n.as_f64() {
                Some(v) if UNITLESS_PROPERTIES.contains(&property.as_str()) => format_number(v),
                Some(v) => format_px(v),
                None => continue,
            },
            _ => continue,
        };
        if !rendered.is_empty() {
            style.set(&property, rendered);
        }
    }
    style
}

fn apply_margin(style: &mut StyleAttributes, margin: &Value) {
    if let Some(all) = px_value(margin) {
        for side in ["top", "right", "bottom", "left"] {
            style.set(&format!("margin-{}", side), format_px(all));
        }
        return;
    }
    let Some(sides) = margin.as_object() else {
        return;
    };
    let values: Vec<Option<f64>> = ["top", "right", "bottom", "left"]
        .iter()
        .map(|side| sides.get(*side).and_then(px_value))
        .collect();
    if values.iter().all(Option::is_none) {
        return;
    }
    for (side, value) in ["top", "right", "bottom", "left"].iter().zip(values) {
        style.set(&format!("margin-{}", side), format_px(value.unwrap_or(0.0)));
    }
}

fn apply_border(style: &mut StyleAttributes, border: &Props) {
    let width = border.get("width").and_then(px_value).unwrap_or(0.0);
    if width > 0.0 {
        style.set("border-width", format_px(width));
        let line = border
            .get("style")
            .and_then(Value::as_str)
            .filter(|s| is_safe_css_value(s) && !s.is_empty())
            .unwrap_or(DEFAULT_BORDER_STYLE);
        style.set("border-style", line);
        let color = border
            .get("color")
            .and_then(Value::as_str)
            .filter(|s| is_safe_css_value(s) && !s.is_empty())
            .unwrap_or(DEFAULT_BORDER_COLOR);
        style.set("border-color", color);
    }

    let Some(radius) = border.get("radius") else {
        return;
    };
    let corners = [
        ("topLeft", "border-top-left-radius"),
        ("topRight", "border-top-right-radius"),
        ("bottomRight", "border-bottom-right-radius"),
        ("bottomLeft", "border-bottom-left-radius"),
    ];
    if let Some(all) = px_value(radius) {
        for (_, property) in corners {
            style.set(property, format_px(all));
        }
    } else if let Some(map) = radius.as_object() {
        for (key, property) in corners {
            let value = map.get(key).and_then(px_value).unwrap_or(0.0);
            style.set(property, format_px(value));
        }
    }
}

/// Fixed shadow definition for a symbolic size.
pub fn shadow_preset(size: &str) -> Option<&'static str> {
    match size {
        "sm" => Some("0 1px 2px 0 rgba(0,0,0,0.05)"),
        "md" => Some("0 4px 6px -1px rgba(0,0,0,0.1), 0 2px 4px -2px rgba(0,0,0,0.1)"),
        "lg" => Some("0 10px 15px -3px rgba(0,0,0,0.1), 0 4px 6px -4px rgba(0,0,0,0.1)"),
        "xl" => Some("0 20px 25px -5px rgba(0,0,0,0.1), 0 8px 10px -6px rgba(0,0,0,0.1)"),
        _ => None,
    }
}

/// Reads a pixel quantity from a number or a numeric string (`"8"`, `"8px"`).
pub fn px_value(value: &Value) -> Option<f64> {
    let v = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches("px").trim().parse::<f64>().ok(),
        _ => None,
    }?;
    v.is_finite().then_some(v)
}

pub fn format_px(v: f64) -> String {
    format!("{}px", format_number(v))
}

/// Formats a number without a trailing `.0` and with at most two decimals.
pub fn format_number(v: f64) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{}", rounded)
}

/// camelCase key to kebab-case CSS property name.
fn css_property_name(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Lowercase words joined by hyphens, optionally vendor-prefixed.
fn is_css_property_name(property: &str) -> bool {
    static PROPERTY: OnceLock<Regex> = OnceLock::new();
    PROPERTY
        .get_or_init(|| Regex::new(r"^-?[a-z]+(-[a-z]+)*$").unwrap())
        .is_match(property)
}

/// Rejects values that could break out of a single declaration.
fn is_safe_css_value(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    !value.contains([';', '{', '}', '<', '>', '\\'])
        && !lower.contains("javascript:")
        && !lower.contains("expression(")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn props(value: Value) -> Props {
        match value {
            Value::Object(map) => map,
            _ => Props::new(),
        }
    }

    fn pairs(style: &StyleAttributes) -> Vec<(&str, &str)> {
        style.iter().collect()
    }

    #[test]
    fn radius_without_border_width() {
        let style = derive_layout_style(&props(json!({
            "border": {
                "width": 0,
                "radius": { "topLeft": 8, "topRight": 8, "bottomLeft": 8, "bottomRight": 8 }
            }
        })));
        assert_eq!(
            pairs(&style),
            vec![
                ("border-top-left-radius", "8px"),
                ("border-top-right-radius", "8px"),
                ("border-bottom-right-radius", "8px"),
                ("border-bottom-left-radius", "8px"),
            ]
        );
        assert!(!style.contains("border-width"));
        assert!(!style.contains("border-color"));
    }

    #[test]
    fn border_defaults_style_and_color() {
        let style = derive_layout_style(&props(json!({ "border": { "width": 2 } })));
        assert_eq!(style.get("border-width"), Some("2px"));
        assert_eq!(style.get("border-style"), Some(DEFAULT_BORDER_STYLE));
        assert_eq!(style.get("border-color"), Some(DEFAULT_BORDER_COLOR));
    }

    #[test]
    fn border_keeps_explicit_style_and_color() {
        let style = derive_layout_style(&props(json!({
            "border": { "width": "1px", "style": "dashed", "color": "#ff0000" }
        })));
        assert_eq!(style.get("border-style"), Some("dashed"));
        assert_eq!(style.get("border-color"), Some("#ff0000"));
    }

    #[test]
    fn margin_emits_four_sides() {
        let style = derive_layout_style(&props(json!({ "margin": { "top": 4, "bottom": 12 } })));
        assert_eq!(
            pairs(&style),
            vec![
                ("margin-top", "4px"),
                ("margin-right", "0px"),
                ("margin-bottom", "12px"),
                ("margin-left", "0px"),
            ]
        );
    }

    #[test]
    fn malformed_margin_is_skipped() {
        let style = derive_layout_style(&props(json!({ "margin": { "top": "wide" } })));
        assert!(style.is_empty());
        let style = derive_layout_style(&props(json!({ "margin": [1, 2] })));
        assert!(style.is_empty());
    }

    #[test]
    fn shadow_presets() {
        for size in ["sm", "md", "lg", "xl"] {
            let style = derive_layout_style(&props(json!({ "shadow": size })));
            assert_eq!(style.get("box-shadow"), shadow_preset(size));
        }
        assert!(derive_layout_style(&props(json!({ "shadow": "none" }))).is_empty());
        assert!(derive_layout_style(&props(json!({ "shadow": "huge" }))).is_empty());
    }

    #[test]
    fn empty_props_yield_empty_style() {
        assert!(derive_layout_style(&Props::new()).is_empty());
        let bag = props(json!({ "text": "hello", "color": "red" }));
        assert!(derive_layout_style(&bag).is_empty());
    }

    #[test]
    fn derivation_is_repeatable() {
        let bag = props(json!({
            "margin": { "top": 1, "right": 2, "bottom": 3, "left": 4 },
            "border": { "width": 1, "radius": 6 },
            "shadow": "lg",
        }));
        assert_eq!(derive_layout_style(&bag), derive_layout_style(&bag));
    }

    #[test]
    fn inline_style_converts_keys_and_units() {
        let style = inline_style(&props(json!({
            "style": {
                "backgroundColor": "#fafafa",
                "paddingTop": 10,
                "opacity": 0.5,
                "color": "red; x:y"
            }
        })));
        assert_eq!(
            pairs(&style),
            vec![("background-color", "#fafafa"), ("opacity", "0.5"), ("padding-top", "10px")]
        );
    }

    #[test]
    fn inline_style_drops_injected_property_names() {
        let style = inline_style(&props(json!({
            "style": {
                "color:red;background-image:url(x);x": "1",
                "width}body{display": "none",
                "font_size": "12px",
                "WebkitTransform": "none",
                "marginLeft": 4
            }
        })));
        assert_eq!(pairs(&style), vec![("-webkit-transform", "none"), ("margin-left", "4px")]);
        assert_eq!(style.to_css(), "-webkit-transform:none;margin-left:4px;");
    }

    #[test]
    fn set_rejects_unsafe_declarations() {
        let mut style = StyleAttributes::new();
        style.set("color", "red;position:fixed");
        style.set("color", "expression(alert(1))");
        style.set("background", "url(javascript:alert(1))");
        style.set("top;left", "0");
        style.set("color", "#123456");
        assert_eq!(pairs(&style), vec![("color", "#123456")]);
    }

    #[test]
    fn derived_style_wins_over_inline() {
        let style = merged_style(&props(json!({
            "style": { "marginTop": "3px" },
            "margin": { "top": 9, "right": 0, "bottom": 0, "left": 0 },
        })));
        assert_eq!(style.get("margin-top"), Some("9px"));
    }
}
