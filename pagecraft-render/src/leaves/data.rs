//! Data display leaves: table, kanban board, stats, progress bar, timeline.

use super::{empty_state, value_text};
use crate::markup::Element;
use crate::style::format_number;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableConfig {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    pub striped: bool,
    pub caption: Option<String>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            headers: Vec::new(),
            rows: Vec::new(),
            striped: true,
            caption: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KanbanCard {
    pub title: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub assignee: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KanbanColumn {
    pub title: String,
    pub color: Option<String>,
    pub cards: Vec<KanbanCard>,
}

impl KanbanColumn {
    fn titled(title: &str, color: &str) -> Self {
        Self {
            title: title.to_string(),
            color: Some(color.to_string()),
            cards: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KanbanBoardConfig {
    pub title: Option<String>,
    pub columns: Vec<KanbanColumn>,
}

impl Default for KanbanBoardConfig {
    fn default() -> Self {
        Self {
            title: None,
            columns: vec![
                KanbanColumn::titled("To do", "#94a3b8"),
                KanbanColumn::titled("In progress", "#3b82f6"),
                KanbanColumn::titled("Done", "#22c55e"),
            ],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatItem {
    pub label: String,
    pub value: Value,
    /// Change indicator such as `+12%`; a leading `-` renders as negative.
    pub delta: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatsConfig {
    pub items: Vec<StatItem>,
    pub columns: u32,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            columns: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressBarConfig {
    pub value: f64,
    pub max: f64,
    pub label: Option<String>,
    pub show_percentage: bool,
    pub color: String,
}

impl Default for ProgressBarConfig {
    fn default() -> Self {
        Self {
            value: 0.0,
            max: 100.0,
            label: None,
            show_percentage: true,
            color: "#3b82f6".to_string(),
        }
    }
}

impl ProgressBarConfig {
    /// Completion in percent, clamped to 0..=100.
    pub fn percent(&self) -> f64 {
        if self.max <= 0.0 || !self.value.is_finite() {
            return 0.0;
        }
        (self.value / self.max * 100.0).clamp(0.0, 100.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimelineItem {
    pub date: String,
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimelineConfig {
    pub items: Vec<TimelineItem>,
}

pub fn table(config: &TableConfig) -> Element {
    if config.headers.is_empty() && config.rows.is_empty() {
        return empty_state("pc-table", "Empty table");
    }
    let mut table = Element::new("table").class("pc-table");
    if config.striped {
        table.add_class("pc-table--striped");
    }
    if let Some(caption) = config.caption.as_deref().filter(|c| !c.is_empty()) {
        table = table.child(Element::new("caption").text(caption));
    }
    if !config.headers.is_empty() {
        let mut tr = Element::new("tr");
        for header in &config.headers {
            tr = tr.child(Element::new("th").attr("scope", "col").text(header));
        }
        table = table.child(Element::new("thead").child(tr));
    }
    let width = config
        .rows
        .iter()
        .map(Vec::len)
        .max()
        .unwrap_or(0)
        .max(config.headers.len());
    let mut body = Element::new("tbody");
    for row in &config.rows {
        let mut tr = Element::new("tr");
        for index in 0..width {
            let cell = row.get(index).map(value_text).unwrap_or_default();
            tr = tr.child(Element::new("td").text(&cell));
        }
        body = body.child(tr);
    }
    table.child(body)
}

pub fn kanban_board(config: &KanbanBoardConfig) -> Element {
    let mut board = Element::new("div").class("pc-kanban-board");
    if let Some(title) = config.title.as_deref().filter(|t| !t.is_empty()) {
        board = board.child(Element::new("h3").text(title));
    }
    let mut lanes = Element::new("div")
        .class("pc-kanban-lanes")
        .style("display", "flex")
        .style("gap", "12px")
        .style("overflow-x", "auto");
    for column in &config.columns {
        let mut header = Element::new("header")
            .class("pc-kanban-column-title")
            .text(&column.title)
            .child(
                Element::new("span")
                    .class("pc-kanban-count")
                    .text(&column.cards.len().to_string()),
            );
        if let Some(color) = column.color.as_deref().filter(|c| !c.is_empty()) {
            header = header.style("border-top", format!("3px solid {}", color));
        }
        let mut lane = Element::new("section")
            .class("pc-kanban-column")
            .style("flex", "1 1 0")
            .style("min-width", "200px")
            .child(header);
        for card in &column.cards {
            let mut item = Element::new("article")
                .class("pc-kanban-card")
                .child(Element::new("h4").text(&card.title));
            if let Some(description) = card.description.as_deref().filter(|d| !d.is_empty()) {
                item = item.child(Element::new("p").text(description));
            }
            if !card.tags.is_empty() {
                let mut tags = Element::new("div").class("pc-kanban-tags");
                for tag in &card.tags {
                    tags = tags.child(Element::new("span").class("pc-tag").text(tag));
                }
                item = item.child(tags);
            }
            if let Some(assignee) = card.assignee.as_deref().filter(|a| !a.is_empty()) {
                item = item.child(
                    Element::new("footer")
                        .class("pc-kanban-assignee")
                        .text(assignee),
                );
            }
            lane = lane.child(item);
        }
        lanes = lanes.child(lane);
    }
    board.child(lanes)
}

pub fn stats(config: &StatsConfig) -> Element {
    if config.items.is_empty() {
        return empty_state("pc-stats", "No statistics");
    }
    let columns = config.columns.clamp(1, 6);
    let mut grid = Element::new("div")
        .class("pc-stats")
        .style("display", "grid")
        .style("grid-template-columns", format!("repeat({}, minmax(0, 1fr))", columns))
        .style("gap", "16px");
    for item in &config.items {
        let mut stat = Element::new("div")
            .class("pc-stat")
            .child(Element::new("div").class("pc-stat-value").text(&value_text(&item.value)))
            .child(Element::new("div").class("pc-stat-label").text(&item.label));
        if let Some(delta) = item.delta.as_deref().filter(|d| !d.is_empty()) {
            let direction = if delta.trim_start().starts_with('-') {
                "pc-stat-delta--down"
            } else {
                "pc-stat-delta--up"
            };
            stat = stat.child(
                Element::new("div")
                    .class("pc-stat-delta")
                    .class(direction)
                    .text(delta),
            );
        }
        grid = grid.child(stat);
    }
    grid
}

pub fn progress_bar(config: &ProgressBarConfig) -> Element {
    let percent = config.percent();
    let mut root = Element::new("div").class("pc-progress-bar");
    if config.label.is_some() || config.show_percentage {
        let mut head = Element::new("div").class("pc-progress-label");
        if let Some(label) = config.label.as_deref() {
            head = head.child(Element::new("span").text(label));
        }
        if config.show_percentage {
            head = head.child(
                Element::new("span")
                    .class("pc-progress-value")
                    .text(&format!("{}%", format_number(percent.round()))),
            );
        }
        root = root.child(head);
    }
    let track = Element::new("div")
        .class("pc-progress-track")
        .attr("role", "progressbar")
        .attr("aria-valuemin", "0")
        .attr("aria-valuemax", format_number(config.max.max(0.0)))
        .attr("aria-valuenow", format_number(config.value))
        .style("background", "#e5e7eb")
        .style("border-radius", "9999px")
        .style("overflow", "hidden")
        .child(
            Element::new("div")
                .class("pc-progress-fill")
                .style("width", format!("{}%", format_number(percent)))
                .style("height", "8px")
                .style("background", config.color.as_str()),
        );
    root.child(track)
}

pub fn timeline(config: &TimelineConfig) -> Element {
    if config.items.is_empty() {
        return empty_state("pc-timeline", "No events");
    }
    let mut list = Element::new("ol").class("pc-timeline");
    for item in &config.items {
        let mut entry = Element::new("li")
            .class("pc-timeline-item")
            .child(Element::new("time").text(&item.date))
            .child(Element::new("h4").text(&item.title));
        if let Some(description) = item.description.as_deref().filter(|d| !d.is_empty()) {
            entry = entry.child(Element::new("p").text(description));
        }
        list = list.child(entry);
    }
    list
}
