//! Leaf presentational components.
//!
//! Every leaf decodes its props once into a config struct whose fields all
//! have defaults, so a partial or missing props bag still renders. Leaves
//! never walk the tree; children arrive already rendered.

pub mod containers;
pub mod data;
pub mod media;
pub mod social;
pub mod text;
pub mod widgets;

use crate::context::RenderContext;
use crate::markup::{Element, RenderNode};
use crate::registry::LeafKind;
use crate::tree::Props;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// What the interpreter hands a leaf.
pub struct LeafInput<'a> {
    pub node_id: &'a str,
    pub props: &'a Props,
    pub children: Vec<RenderNode>,
    pub ctx: &'a RenderContext,
}

/// Decoded configuration of one leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum LeafConfig {
    Paragraph(text::ParagraphConfig),
    Heading(text::HeadingConfig),
    RichText(text::RichTextConfig),
    Quote(text::QuoteConfig),
    Image(media::ImageConfig),
    Video(media::VideoConfig),
    Banner(media::BannerConfig),
    Gallery(media::GalleryConfig),
    Carousel(media::CarouselConfig),
    NewsCarousel(media::NewsCarouselConfig),
    Table(data::TableConfig),
    KanbanBoard(data::KanbanBoardConfig),
    Stats(data::StatsConfig),
    ProgressBar(data::ProgressBarConfig),
    Timeline(data::TimelineConfig),
    Button(widgets::ButtonConfig),
    Divider(widgets::DividerConfig),
    Spacer(widgets::SpacerConfig),
    Countdown(widgets::CountdownConfig),
    Accordion(widgets::AccordionConfig),
    Alert(widgets::AlertConfig),
    LinkList(widgets::LinkListConfig),
    ProfileCard(widgets::ProfileCardConfig),
    Column(containers::ColumnConfig),
    Section(containers::SectionConfig),
    CommentsSection(social::CommentsSectionConfig),
    BirthdayList(social::BirthdayListConfig),
}

impl LeafConfig {
    /// Decodes the props bag for `kind`. A bag that does not fit the
    /// config falls back to the defaults.
    pub fn from_props(kind: LeafKind, props: &Props) -> Self {
        match kind {
            LeafKind::Paragraph => LeafConfig::Paragraph(decode(kind, props)),
            LeafKind::Heading => LeafConfig::Heading(decode(kind, props)),
            LeafKind::RichText => LeafConfig::RichText(decode(kind, props)),
            LeafKind::Quote => LeafConfig::Quote(decode(kind, props)),
            LeafKind::Image => LeafConfig::Image(decode(kind, props)),
            LeafKind::Video => LeafConfig::Video(decode(kind, props)),
            LeafKind::Banner => LeafConfig::Banner(decode(kind, props)),
            LeafKind::Gallery => LeafConfig::Gallery(decode(kind, props)),
            LeafKind::Carousel => LeafConfig::Carousel(decode(kind, props)),
            LeafKind::NewsCarousel => LeafConfig::NewsCarousel(decode(kind, props)),
            LeafKind::Table => LeafConfig::Table(decode(kind, props)),
            LeafKind::KanbanBoard => LeafConfig::KanbanBoard(decode(kind, props)),
            LeafKind::Stats => LeafConfig::Stats(decode(kind, props)),
            LeafKind::ProgressBar => LeafConfig::ProgressBar(decode(kind, props)),
            LeafKind::Timeline => LeafConfig::Timeline(decode(kind, props)),
            LeafKind::Button => LeafConfig::Button(decode(kind, props)),
            LeafKind::Divider => LeafConfig::Divider(decode(kind, props)),
            LeafKind::Spacer => LeafConfig::Spacer(decode(kind, props)),
            LeafKind::Countdown => LeafConfig::Countdown(decode(kind, props)),
            LeafKind::Accordion => LeafConfig::Accordion(decode(kind, props)),
            LeafKind::Alert => LeafConfig::Alert(decode(kind, props)),
            LeafKind::LinkList => LeafConfig::LinkList(decode(kind, props)),
            LeafKind::ProfileCard => LeafConfig::ProfileCard(decode(kind, props)),
            LeafKind::Column => LeafConfig::Column(decode(kind, props)),
            LeafKind::Section => LeafConfig::Section(decode(kind, props)),
            LeafKind::CommentsSection => LeafConfig::CommentsSection(decode(kind, props)),
            LeafKind::BirthdayList => LeafConfig::BirthdayList(decode(kind, props)),
        }
    }

    pub fn render(&self, input: LeafInput<'_>) -> Element {
        match self {
            LeafConfig::Paragraph(c) => text::paragraph(c),
            LeafConfig::Heading(c) => text::heading(c),
            LeafConfig::RichText(c) => text::rich_text(c),
            LeafConfig::Quote(c) => text::quote(c),
            LeafConfig::Image(c) => media::image(c),
            LeafConfig::Video(c) => media::video(c),
            LeafConfig::Banner(c) => media::banner(c, input.children),
            LeafConfig::Gallery(c) => media::gallery(c),
            LeafConfig::Carousel(c) => media::carousel(c),
            LeafConfig::NewsCarousel(c) => media::news_carousel(c),
            LeafConfig::Table(c) => data::table(c),
            LeafConfig::KanbanBoard(c) => data::kanban_board(c),
            LeafConfig::Stats(c) => data::stats(c),
            LeafConfig::ProgressBar(c) => data::progress_bar(c),
            LeafConfig::Timeline(c) => data::timeline(c),
            LeafConfig::Button(c) => widgets::button(c),
            LeafConfig::Divider(c) => widgets::divider(c),
            LeafConfig::Spacer(c) => widgets::spacer(c),
            LeafConfig::Countdown(c) => widgets::countdown(c, input.ctx.now),
            LeafConfig::Accordion(c) => widgets::accordion(c),
            LeafConfig::Alert(c) => widgets::alert(c),
            LeafConfig::LinkList(c) => widgets::link_list(c),
            LeafConfig::ProfileCard(c) => widgets::profile_card(c),
            LeafConfig::Column(c) => containers::column(c, input.children),
            LeafConfig::Section(c) => containers::section(c, input.children),
            LeafConfig::CommentsSection(c) => {
                social::comments_section(c, input.ctx.leaf_data.get(input.node_id), input.ctx.now)
            }
            LeafConfig::BirthdayList(c) => {
                social::birthday_list(c, input.ctx.leaf_data.get(input.node_id), input.ctx.now)
            }
        }
    }
}

/// Decodes and renders one leaf.
pub fn render_leaf(kind: LeafKind, input: LeafInput<'_>) -> Element {
    if !input.children.is_empty() && !kind.accepts_children() {
        tracing::debug!(
            "{} node {} has children; {} does not place children",
            kind.name(),
            input.node_id,
            kind.name()
        );
    }
    LeafConfig::from_props(kind, input.props).render(input)
}

fn decode<T: DeserializeOwned + Default>(kind: LeafKind, props: &Props) -> T {
    serde_json::from_value(Value::Object(props.clone())).unwrap_or_else(|err| {
        tracing::debug!("{} props did not decode, using defaults: {}", kind.name(), err);
        T::default()
    })
}

/// Box shown in place of a leaf that has nothing to show.
pub(crate) fn empty_state(class: &str, message: &str) -> Element {
    Element::new("div").class(class).class("pc-empty-state").text(message)
}

/// Text of a scalar JSON value; `null` and containers render empty.
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// `text-align` for a recognized alignment keyword.
pub(crate) fn text_align(align: Option<&str>) -> Option<&'static str> {
    match align? {
        "left" => Some("left"),
        "center" => Some("center"),
        "right" => Some("right"),
        "justify" => Some("justify"),
        _ => None,
    }
}

/// Appends text with line breaks kept as `<br>`.
pub(crate) fn multiline(mut el: Element, text: &str) -> Element {
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            el = el.child(Element::new("br"));
        }
        el = el.text(line);
    }
    el
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> Props {
        match value {
            Value::Object(map) => map,
            _ => Props::new(),
        }
    }

    #[test]
    fn every_kind_renders_with_empty_props() {
        let ctx = RenderContext::new();
        let empty = Props::new();
        for name in crate::registry::Registry::builtin().names() {
            let kind = crate::registry::Registry::builtin().resolve(name).unwrap();
            let input = LeafInput {
                node_id: "n",
                props: &empty,
                children: Vec::new(),
                ctx: &ctx,
            };
            let el = render_leaf(kind, input);
            assert!(!el.tag.is_empty(), "{} rendered nothing", name);
        }
    }

    #[test]
    fn mistyped_props_fall_back_to_defaults() {
        let config = LeafConfig::from_props(LeafKind::Heading, &props(json!({ "level": "big" })));
        assert_eq!(config, LeafConfig::Heading(text::HeadingConfig::default()));
    }

    #[test]
    fn multiline_keeps_breaks() {
        let node: RenderNode = multiline(Element::new("p"), "a\nb").into();
        assert_eq!(node.to_html(), "<p>a<br>b</p>");
    }
}
