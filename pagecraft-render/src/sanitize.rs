//! URL checks and markdown rendering for author-supplied content.

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};

/// Schemes allowed in author-supplied links and media sources.
const ALLOWED_SCHEMES: &[&str] = &["http", "https", "mailto", "tel"];

/// Whether a URL may be emitted into `href`/`src`. Relative URLs pass;
/// absolute ones need an allowed scheme. `data:image/` is allowed for images
/// pasted into the editor.
pub fn is_safe_url(url: &str) -> bool {
    let cleaned: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    if cleaned.is_empty() {
        return false;
    }
    if cleaned.starts_with("data:image/") {
        return true;
    }
    let scheme_end = cleaned.find(':');
    let path_start = cleaned.find(['/', '?', '#']);
    match (scheme_end, path_start) {
        (Some(colon), Some(path)) if colon > path => true,
        (Some(colon), _) => ALLOWED_SCHEMES.contains(&&cleaned[..colon]),
        (None, _) => true,
    }
}

/// Returns the URL when it is safe to emit.
pub fn safe_url(url: &str) -> Option<&str> {
    let trimmed = url.trim();
    is_safe_url(trimmed).then_some(trimmed)
}

/// Renders markdown to HTML. Raw HTML in the source is shown as text and
/// unsafe link/image targets are neutralized.
pub fn markdown_to_safe_html(md: &str) -> String {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_TABLES);
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    let events = Parser::new_ext(md, opts).map(|event| match event {
        Event::Html(raw) => Event::Text(raw),
        Event::Start(tag) => Event::Start(neutralize(tag)),
        Event::End(tag) => Event::End(neutralize(tag)),
        other => other,
    });
    let mut out = String::new();
    html::push_html(&mut out, events);
    out
}

fn neutralize(tag: Tag<'_>) -> Tag<'_> {
    match tag {
        Tag::Link(kind, dest, title) if !is_safe_url(&dest) => {
            Tag::Link(kind, CowStr::Borrowed("#"), title)
        }
        Tag::Image(kind, dest, title) if !is_safe_url(&dest) => {
            Tag::Image(kind, CowStr::Borrowed(""), title)
        }
        other => other,
    }
}
