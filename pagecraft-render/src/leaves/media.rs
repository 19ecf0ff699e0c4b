//! Media leaves: image, video, banner, gallery and carousels.

use super::empty_state;
use crate::markup::{Element, RenderNode};
use crate::sanitize::safe_url;
use crate::style::{format_number, format_px};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageConfig {
    pub src: String,
    pub alt: String,
    pub width: Option<f64>,
    pub height: Option<f64>,
    /// object-fit keyword.
    pub fit: String,
    pub link: Option<String>,
    pub caption: Option<String>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            src: String::new(),
            alt: String::new(),
            width: None,
            height: None,
            fit: "cover".to_string(),
            link: None,
            caption: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoConfig {
    pub url: String,
    pub title: String,
    pub autoplay: bool,
    pub controls: bool,
    /// CSS aspect-ratio, e.g. `16/9`.
    pub aspect_ratio: String,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            title: "Video".to_string(),
            autoplay: false,
            controls: true,
            aspect_ratio: "16/9".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BannerConfig {
    pub title: String,
    pub subtitle: String,
    pub background_image: Option<String>,
    pub background_color: String,
    pub text_color: String,
    pub height: f64,
    pub cta_text: Option<String>,
    pub cta_href: Option<String>,
    pub align: String,
    /// Darkening over the background image, 0 to 1.
    pub overlay_opacity: f64,
}

impl Default for BannerConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            subtitle: String::new(),
            background_image: None,
            background_color: "#1f2937".to_string(),
            text_color: "#ffffff".to_string(),
            height: 320.0,
            cta_text: None,
            cta_href: None,
            align: "center".to_string(),
            overlay_opacity: 0.4,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GalleryImage {
    pub src: String,
    pub alt: String,
    pub caption: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GalleryConfig {
    pub images: Vec<GalleryImage>,
    pub columns: u32,
    pub gap: f64,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            images: Vec::new(),
            columns: 3,
            gap: 8.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Slide {
    pub image: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CarouselConfig {
    pub slides: Vec<Slide>,
    pub autoplay: bool,
    /// Milliseconds between slides.
    pub interval: u64,
    pub show_indicators: bool,
    pub height: f64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            slides: Vec::new(),
            autoplay: true,
            interval: 5000,
            show_indicators: true,
            height: 360.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewsItem {
    pub title: String,
    pub summary: Option<String>,
    pub image: Option<String>,
    pub date: Option<String>,
    pub href: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewsCarouselConfig {
    pub title: String,
    pub items: Vec<NewsItem>,
    pub items_per_view: u32,
    pub autoplay: bool,
}

impl Default for NewsCarouselConfig {
    fn default() -> Self {
        Self {
            title: "News".to_string(),
            items: Vec::new(),
            items_per_view: 3,
            autoplay: false,
        }
    }
}

pub fn image(config: &ImageConfig) -> Element {
    let Some(src) = safe_url(&config.src) else {
        return empty_state("pc-image", "No image selected");
    };
    let mut img = Element::new("img")
        .attr("src", src)
        .attr("alt", config.alt.as_str())
        .attr("loading", "lazy")
        .style("object-fit", config.fit.as_str())
        .style("max-width", "100%");
    if let Some(w) = config.width.filter(|w| *w > 0.0) {
        img = img.style("width", format_px(w));
    }
    if let Some(h) = config.height.filter(|h| *h > 0.0) {
        img = img.style("height", format_px(h));
    }
    let body: RenderNode = match config.link.as_deref().and_then(safe_url) {
        Some(href) => Element::new("a").attr("href", href).child(img).into(),
        None => img.into(),
    };
    let mut figure = Element::new("figure").class("pc-image").child(body);
    if let Some(caption) = config.caption.as_deref().filter(|c| !c.is_empty()) {
        figure = figure.child(Element::new("figcaption").text(caption));
    }
    figure
}

/// Embed URL for YouTube and Vimeo links.
pub fn embed_url(url: &str) -> Option<String> {
    let url = url.trim();
    let after_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    let host_path = after_scheme.strip_prefix("www.").unwrap_or(after_scheme);
    if let Some(rest) = host_path.strip_prefix("youtu.be/") {
        return video_id(rest).map(|id| format!("https://www.youtube.com/embed/{}", id));
    }
    if let Some(rest) = host_path.strip_prefix("youtube.com/watch") {
        let query = rest.split_once('?').map(|(_, q)| q).unwrap_or(rest);
        return query
            .split('&')
            .find_map(|pair| pair.strip_prefix("v="))
            .and_then(video_id)
            .map(|id| format!("https://www.youtube.com/embed/{}", id));
    }
    if let Some(rest) = host_path.strip_prefix("youtube.com/embed/") {
        return video_id(rest).map(|id| format!("https://www.youtube.com/embed/{}", id));
    }
    if let Some(rest) = host_path.strip_prefix("vimeo.com/") {
        return video_id(rest)
            .filter(|id| id.chars().all(|c| c.is_ascii_digit()))
            .map(|id| format!("https://player.vimeo.com/video/{}", id));
    }
    None
}

fn video_id(rest: &str) -> Option<&str> {
    let id = rest.split(['?', '&', '#', '/']).next()?;
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    valid.then_some(id)
}

pub fn video(config: &VideoConfig) -> Element {
    let wrapper = Element::new("div")
        .class("pc-video")
        .style("aspect-ratio", config.aspect_ratio.as_str())
        .style("width", "100%");
    if let Some(embed) = embed_url(&config.url) {
        let src = if config.autoplay {
            format!("{}?autoplay=1&mute=1", embed)
        } else {
            embed
        };
        return wrapper.child(
            Element::new("iframe")
                .attr("src", src)
                .attr("title", config.title.as_str())
                .attr("allowfullscreen", "true")
                .attr("loading", "lazy")
                .style("width", "100%")
                .style("height", "100%")
                .style("border", "0"),
        );
    }
    let Some(src) = safe_url(&config.url) else {
        return empty_state("pc-video", "No video selected");
    };
    let mut player = Element::new("video")
        .attr("src", src)
        .attr("title", config.title.as_str())
        .attr("preload", "metadata")
        .style("width", "100%")
        .style("height", "100%");
    if config.controls {
        player = player.attr("controls", "controls");
    }
    if config.autoplay {
        player = player.attr("autoplay", "autoplay").attr("muted", "muted");
    }
    wrapper.child(player)
}

pub fn banner(config: &BannerConfig, children: Vec<RenderNode>) -> Element {
    let align = match config.align.as_str() {
        "left" => "flex-start",
        "right" => "flex-end",
        _ => "center",
    };
    let mut section = Element::new("section")
        .class("pc-banner")
        .style("display", "flex")
        .style("flex-direction", "column")
        .style("justify-content", "center")
        .style("align-items", align)
        .style("min-height", format_px(config.height.max(0.0)))
        .style("background-color", config.background_color.as_str())
        .style("color", config.text_color.as_str())
        .style("background-size", "cover")
        .style("background-position", "center");
    if let Some(image) = config.background_image.as_deref().and_then(safe_url) {
        let overlay = format_number(config.overlay_opacity.clamp(0.0, 1.0));
        section = section.style(
            "background-image",
            format!(
                "linear-gradient(rgba(0,0,0,{o}),rgba(0,0,0,{o})), url('{}')",
                image.replace('\'', "%27"),
                o = overlay
            ),
        );
    }
    if !config.title.is_empty() {
        section = section.child(Element::new("h2").class("pc-banner-title").text(&config.title));
    }
    if !config.subtitle.is_empty() {
        section = section.child(
            Element::new("p")
                .class("pc-banner-subtitle")
                .text(&config.subtitle),
        );
    }
    let cta_href = config.cta_href.as_deref().and_then(safe_url);
    if let (Some(text), Some(href)) = (config.cta_text.as_deref(), cta_href) {
        section = section.child(
            Element::new("a")
                .class("pc-button")
                .class("pc-button--primary")
                .attr("href", href)
                .text(text),
        );
    }
    section.children(children)
}

pub fn gallery(config: &GalleryConfig) -> Element {
    let images: Vec<_> = config
        .images
        .iter()
        .filter_map(|img| safe_url(&img.src).map(|src| (src, img)))
        .collect();
    if images.is_empty() {
        return empty_state("pc-gallery", "No images in gallery");
    }
    let columns = config.columns.clamp(1, 6);
    let mut grid = Element::new("div")
        .class("pc-gallery")
        .style("display", "grid")
        .style("grid-template-columns", format!("repeat({}, minmax(0, 1fr))", columns))
        .style("gap", format_px(config.gap.max(0.0)));
    for (src, img) in images {
        let mut figure = Element::new("figure").class("pc-gallery-item").child(
            Element::new("img")
                .attr("src", src)
                .attr("alt", img.alt.as_str())
                .attr("loading", "lazy")
                .style("width", "100%")
                .style("object-fit", "cover"),
        );
        if let Some(caption) = img.caption.as_deref().filter(|c| !c.is_empty()) {
            figure = figure.child(Element::new("figcaption").text(caption));
        }
        grid = grid.child(figure);
    }
    grid
}

pub fn carousel(config: &CarouselConfig) -> Element {
    let slides: Vec<_> = config
        .slides
        .iter()
        .filter_map(|slide| safe_url(&slide.image).map(|src| (src, slide)))
        .collect();
    if slides.is_empty() {
        return empty_state("pc-carousel", "No slides");
    }
    let mut root = Element::new("div")
        .class("pc-carousel")
        .attr("data-autoplay", config.autoplay.to_string())
        .attr("data-interval", config.interval.to_string())
        .style("position", "relative")
        .style("overflow", "hidden")
        .style("height", format_px(config.height.max(0.0)));
    let count = slides.len();
    for (index, (src, slide)) in slides.into_iter().enumerate() {
        let mut item = Element::new("div")
            .class("pc-carousel-slide")
            .attr("data-index", index.to_string())
            .style("background-image", format!("url('{}')", src.replace('\'', "%27")))
            .style("background-size", "cover")
            .style("background-position", "center");
        if index == 0 {
            item.add_class("is-active");
        }
        let mut caption = Element::new("div").class("pc-carousel-caption");
        if let Some(title) = slide.title.as_deref().filter(|t| !t.is_empty()) {
            caption = caption.child(Element::new("h3").text(title));
        }
        if let Some(description) = slide.description.as_deref().filter(|d| !d.is_empty()) {
            caption = caption.child(Element::new("p").text(description));
        }
        if !caption.children.is_empty() {
            item = item.child(caption);
        }
        let item: RenderNode = match slide.link.as_deref().and_then(safe_url) {
            Some(href) => Element::new("a").attr("href", href).child(item).into(),
            None => item.into(),
        };
        root = root.child(item);
    }
    if config.show_indicators && count > 1 {
        let mut dots = Element::new("div").class("pc-carousel-indicators");
        for index in 0..count {
            let mut dot = Element::new("span").class("pc-carousel-dot");
            if index == 0 {
                dot.add_class("is-active");
            }
            dots = dots.child(dot);
        }
        root = root.child(dots);
    }
    root
}

pub fn news_carousel(config: &NewsCarouselConfig) -> Element {
    let root = Element::new("section")
        .class("pc-news-carousel")
        .attr("data-autoplay", config.autoplay.to_string())
        .child(Element::new("h3").text(&config.title));
    if config.items.is_empty() {
        return root.child(empty_state("pc-news-empty", "No news yet"));
    }
    let per_view = config.items_per_view.clamp(1, 6);
    let mut track = Element::new("div")
        .class("pc-news-track")
        .style("display", "grid")
        .style("grid-template-columns", format!("repeat({}, minmax(0, 1fr))", per_view))
        .style("gap", "16px");
    for item in &config.items {
        let mut card = Element::new("article").class("pc-news-card");
        if let Some(src) = item.image.as_deref().and_then(safe_url) {
            card = card.child(
                Element::new("img")
                    .attr("src", src)
                    .attr("alt", item.title.as_str()),
            );
        }
        if let Some(date) = item.date.as_deref().filter(|d| !d.is_empty()) {
            card = card.child(Element::new("time").text(date));
        }
        let title = Element::new("h4").text(&item.title);
        card = match item.href.as_deref().and_then(safe_url) {
            Some(href) => card.child(Element::new("a").attr("href", href).child(title)),
            None => card.child(title),
        };
        if let Some(summary) = item.summary.as_deref().filter(|s| !s.is_empty()) {
            card = card.child(Element::new("p").text(summary));
        }
        track = track.child(card);
    }
    root.child(track)
}
