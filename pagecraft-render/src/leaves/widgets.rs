//! Small interactive-looking widgets. Output is static; client scripts
//! pick up the `data-*` attributes when present.

use super::{empty_state, multiline};
use crate::markup::Element;
use crate::sanitize::safe_url;
use crate::style::format_px;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ButtonConfig {
    pub text: String,
    pub href: Option<String>,
    /// primary, secondary, outline or link.
    pub variant: String,
    pub new_tab: bool,
    pub full_width: bool,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            text: "Button".to_string(),
            href: None,
            variant: "primary".to_string(),
            new_tab: false,
            full_width: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DividerConfig {
    pub thickness: f64,
    pub color: String,
    pub line_style: String,
    /// Vertical space above and below.
    pub spacing: f64,
}

impl Default for DividerConfig {
    fn default() -> Self {
        Self {
            thickness: 1.0,
            color: "#e5e7eb".to_string(),
            line_style: "solid".to_string(),
            spacing: 16.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpacerConfig {
    pub height: f64,
}

impl Default for SpacerConfig {
    fn default() -> Self {
        Self { height: 32.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CountdownConfig {
    pub target_date: Option<String>,
    pub title: Option<String>,
    pub expired_message: String,
    pub show_seconds: bool,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            target_date: None,
            title: None,
            expired_message: "The event has started".to_string(),
            show_seconds: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccordionItem {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccordionConfig {
    pub items: Vec<AccordionItem>,
    pub first_open: bool,
}

impl Default for AccordionConfig {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            first_open: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlertConfig {
    pub message: String,
    pub title: Option<String>,
    /// info, success, warning or error.
    pub variant: String,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            message: String::new(),
            title: None,
            variant: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkItem {
    pub label: String,
    pub href: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkListConfig {
    pub title: Option<String>,
    pub links: Vec<LinkItem>,
    pub new_tab: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileCardConfig {
    pub name: String,
    pub role: Option<String>,
    pub avatar: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
}

const BUTTON_VARIANTS: &[&str] = &["primary", "secondary", "outline", "link"];
const ALERT_VARIANTS: &[&str] = &["info", "success", "warning", "error"];

pub fn button(config: &ButtonConfig) -> Element {
    let variant = if BUTTON_VARIANTS.contains(&config.variant.as_str()) {
        config.variant.as_str()
    } else {
        "primary"
    };
    let mut el = match config.href.as_deref().and_then(safe_url) {
        Some(href) => {
            let mut a = Element::new("a").attr("href", href);
            if config.new_tab {
                a = a.attr("target", "_blank").attr("rel", "noopener noreferrer");
            }
            a
        }
        None => Element::new("button").attr("type", "button"),
    };
    el = el
        .class("pc-button")
        .class(&format!("pc-button--{}", variant))
        .text(&config.text);
    if config.full_width {
        el = el.style("display", "block").style("width", "100%");
    }
    el
}

pub fn divider(config: &DividerConfig) -> Element {
    let line_style = match config.line_style.as_str() {
        "dashed" | "dotted" | "double" => config.line_style.as_str(),
        _ => "solid",
    };
    Element::new("hr")
        .class("pc-divider")
        .style("border", "0")
        .style(
            "border-top",
            format!("{} {} {}", format_px(config.thickness.max(0.0)), line_style, config.color),
        )
        .style("margin", format!("{} 0", format_px(config.spacing.max(0.0))))
}

pub fn spacer(config: &SpacerConfig) -> Element {
    Element::new("div")
        .class("pc-spacer")
        .attr("aria-hidden", "true")
        .style("height", format_px(config.height.max(0.0)))
}

/// Parses the target of a countdown. Accepts RFC 3339, a bare date or a
/// date with minutes; values without an offset are taken as UTC.
pub fn parse_target(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Remaining time split into days, hours, minutes and seconds.
pub fn remaining(target: DateTime<Utc>, now: DateTime<Utc>) -> Option<[i64; 4]> {
    let secs = (target - now).num_seconds();
    if secs <= 0 {
        return None;
    }
    Some([secs / 86_400, secs % 86_400 / 3_600, secs % 3_600 / 60, secs % 60])
}

pub fn countdown(config: &CountdownConfig, now: DateTime<Utc>) -> Element {
    let Some(target) = config.target_date.as_deref().and_then(parse_target) else {
        return empty_state("pc-countdown", "No date set");
    };
    let mut root = Element::new("div")
        .class("pc-countdown")
        .attr("data-target", target.to_rfc3339());
    if let Some(title) = config.title.as_deref().filter(|t| !t.is_empty()) {
        root = root.child(Element::new("h3").text(title));
    }
    let Some(parts) = remaining(target, now) else {
        root.add_class("pc-countdown--expired");
        return root.child(
            Element::new("p")
                .class("pc-countdown-expired")
                .text(&config.expired_message),
        );
    };
    let labels = ["days", "hours", "minutes", "seconds"];
    let shown = if config.show_seconds { 4 } else { 3 };
    let mut units = Element::new("div").class("pc-countdown-units");
    for (value, label) in parts.iter().zip(labels).take(shown) {
        units = units.child(
            Element::new("div")
                .class("pc-countdown-unit")
                .attr("data-unit", label)
                .child(Element::new("strong").text(&format!("{:02}", value)))
                .child(Element::new("span").text(label)),
        );
    }
    root.child(units)
}

pub fn accordion(config: &AccordionConfig) -> Element {
    if config.items.is_empty() {
        return empty_state("pc-accordion", "No items");
    }
    let mut root = Element::new("div").class("pc-accordion");
    for (index, item) in config.items.iter().enumerate() {
        let mut details = Element::new("details")
            .class("pc-accordion-item")
            .child(Element::new("summary").text(&item.title))
            .child(multiline(Element::new("div").class("pc-accordion-body"), &item.content));
        if index == 0 && config.first_open {
            details = details.attr("open", "open");
        }
        root = root.child(details);
    }
    root
}

pub fn alert(config: &AlertConfig) -> Element {
    let variant = if ALERT_VARIANTS.contains(&config.variant.as_str()) {
        config.variant.as_str()
    } else {
        "info"
    };
    let role = if variant == "error" || variant == "warning" {
        "alert"
    } else {
        "status"
    };
    let mut root = Element::new("div")
        .class("pc-alert")
        .class(&format!("pc-alert--{}", variant))
        .attr("role", role);
    if let Some(title) = config.title.as_deref().filter(|t| !t.is_empty()) {
        root = root.child(Element::new("strong").class("pc-alert-title").text(title));
    }
    root.child(multiline(Element::new("p"), &config.message))
}

pub fn link_list(config: &LinkListConfig) -> Element {
    let mut root = Element::new("nav").class("pc-link-list");
    if let Some(title) = config.title.as_deref().filter(|t| !t.is_empty()) {
        root = root.child(Element::new("h3").text(title));
    }
    let mut list = Element::new("ul");
    for link in &config.links {
        let label = if link.label.is_empty() { &link.href } else { &link.label };
        let mut anchor = match safe_url(&link.href) {
            Some(href) => Element::new("a").attr("href", href),
            None => Element::new("span"),
        };
        if config.new_tab && anchor.tag == "a" {
            anchor = anchor.attr("target", "_blank").attr("rel", "noopener noreferrer");
        }
        let mut item = Element::new("li").child(anchor.text(label));
        if let Some(description) = link.description.as_deref().filter(|d| !d.is_empty()) {
            item = item.child(Element::new("small").text(description));
        }
        list = list.child(item);
    }
    if list.children.is_empty() {
        return root.child(empty_state("pc-link-list-empty", "No links"));
    }
    root.child(list)
}

/// Up to two initials for the avatar fallback.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

pub fn profile_card(config: &ProfileCardConfig) -> Element {
    let avatar = match config.avatar.as_deref().and_then(safe_url) {
        Some(src) => Element::new("img")
            .class("pc-avatar")
            .attr("src", src)
            .attr("alt", config.name.as_str()),
        None => Element::new("div")
            .class("pc-avatar")
            .class("pc-avatar--initials")
            .text(&initials(&config.name)),
    };
    let mut card = Element::new("div")
        .class("pc-profile-card")
        .child(avatar)
        .child(Element::new("h4").text(if config.name.is_empty() {
            "Unnamed"
        } else {
            config.name.as_str()
        }));
    if let Some(role) = config.role.as_deref().filter(|r| !r.is_empty()) {
        card = card.child(Element::new("p").class("pc-profile-role").text(role));
    }
    if let Some(email) = config.email.as_deref().filter(|e| !e.is_empty()) {
        card = card.child(
            Element::new("a")
                .class("pc-profile-email")
                .attr("href", format!("mailto:{}", email))
                .text(email),
        );
    }
    if let Some(bio) = config.bio.as_deref().filter(|b| !b.is_empty()) {
        card = card.child(multiline(Element::new("p").class("pc-profile-bio"), bio));
    }
    card
}
