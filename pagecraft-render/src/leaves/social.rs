//! Self-fetching social leaves. Their data is fetched before the render
//! and handed over through the context; when it is missing or the fetch
//! failed they draw sample content with a notice.

use crate::context::{Birthday, Comment, CommentThread, LeafData};
use crate::markup::Element;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::Deserialize;

const SAMPLE_NOTICE: &str = "Showing sample content";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommentsSectionConfig {
    pub title: String,
    pub allow_likes: bool,
    pub max_comments: usize,
    pub empty_message: String,
}

impl Default for CommentsSectionConfig {
    fn default() -> Self {
        Self {
            title: "Comments".to_string(),
            allow_likes: true,
            max_comments: 20,
            empty_message: "No comments yet".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BirthdayListConfig {
    pub title: String,
    /// Only list birthdays in the current month.
    pub show_month_only: bool,
    pub limit: usize,
    pub empty_message: String,
}

impl Default for BirthdayListConfig {
    fn default() -> Self {
        Self {
            title: "Birthdays".to_string(),
            show_month_only: true,
            limit: 10,
            empty_message: "No birthdays this month".to_string(),
        }
    }
}

fn notice(reason: &str) -> Element {
    Element::new("div")
        .class("pc-notice")
        .attr("role", "status")
        .attr("title", reason)
        .text(SAMPLE_NOTICE)
}

fn sample_comments(now: DateTime<Utc>) -> CommentThread {
    let comments = vec![
        Comment {
            id: "sample-1".to_string(),
            author: "Alex Morgan".to_string(),
            body: "Great update, thanks for sharing!".to_string(),
            created_at: now - Duration::hours(2),
            likes: 3,
        },
        Comment {
            id: "sample-2".to_string(),
            author: "Sam Lee".to_string(),
            body: "Looking forward to the next one.".to_string(),
            created_at: now - Duration::days(1),
            likes: 1,
        },
    ];
    CommentThread {
        total: comments.len(),
        comments,
    }
}

fn sample_birthdays(now: DateTime<Utc>) -> Vec<Birthday> {
    let today = now.date_naive();
    [(3, "Jordan Silva", "Engineering"), (17, "Priya Patel", "Design")]
        .into_iter()
        .filter_map(|(day, name, department)| {
            NaiveDate::from_ymd_opt(1990, today.month(), day).map(|date| Birthday {
                name: name.to_string(),
                date,
                department: Some(department.to_string()),
                avatar_url: None,
            })
        })
        .collect()
}

/// Short relative age such as `2h ago`.
pub fn relative_time(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - at).num_seconds();
    match secs {
        s if s < 60 => "just now".to_string(),
        s if s < 3_600 => format!("{}m ago", s / 60),
        s if s < 86_400 => format!("{}h ago", s / 3_600),
        s if s < 86_400 * 30 => format!("{}d ago", s / 86_400),
        _ => at.format("%Y-%m-%d").to_string(),
    }
}

pub fn comments_section(
    config: &CommentsSectionConfig,
    data: Option<&LeafData>,
    now: DateTime<Utc>,
) -> Element {
    let mut root = Element::new("section")
        .class("pc-comments-section")
        .child(Element::new("h3").text(&config.title));
    let thread = match data {
        Some(LeafData::Comments(thread)) => thread.clone(),
        Some(LeafData::Unavailable(reason)) => {
            root = root.child(notice(reason));
            sample_comments(now)
        }
        Some(_) | None => {
            root = root.child(notice("comments not loaded"));
            sample_comments(now)
        }
    };
    if thread.comments.is_empty() {
        return root.child(Element::new("p").class("pc-empty-state").text(&config.empty_message));
    }
    let total = thread.total.max(thread.comments.len());
    root = root.attr("data-total", total.to_string());
    let mut list = Element::new("ul").class("pc-comment-list");
    for comment in thread.comments.iter().take(config.max_comments) {
        let mut item = Element::new("li")
            .class("pc-comment")
            .attr("data-comment-id", comment.id.as_str())
            .child(
                Element::new("header")
                    .child(Element::new("strong").text(&comment.author))
                    .child(
                        Element::new("time")
                            .attr("datetime", comment.created_at.to_rfc3339())
                            .text(&relative_time(comment.created_at, now)),
                    ),
            )
            .child(Element::new("p").text(&comment.body));
        if config.allow_likes {
            item = item.child(
                Element::new("button")
                    .class("pc-comment-like")
                    .attr("type", "button")
                    .text(&format!("♥ {}", comment.likes)),
            );
        }
        list = list.child(item);
    }
    root = root.child(list);
    let shown = thread.comments.len().min(config.max_comments);
    if total > shown {
        root = root.child(
            Element::new("p")
                .class("pc-comment-more")
                .text(&format!("{} more comments", total - shown)),
        );
    }
    root
}

pub fn birthday_list(
    config: &BirthdayListConfig,
    data: Option<&LeafData>,
    now: DateTime<Utc>,
) -> Element {
    let mut root = Element::new("section")
        .class("pc-birthday-list")
        .child(Element::new("h3").text(&config.title));
    let mut people = match data {
        Some(LeafData::Birthdays(people)) => people.clone(),
        Some(LeafData::Unavailable(reason)) => {
            root = root.child(notice(reason));
            sample_birthdays(now)
        }
        Some(_) | None => {
            root = root.child(notice("birthdays not loaded"));
            sample_birthdays(now)
        }
    };
    let today = now.date_naive();
    if config.show_month_only {
        people.retain(|b| b.date.month() == today.month());
    }
    people.sort_by_key(|b| (b.date.month(), b.date.day(), b.name.clone()));
    people.truncate(config.limit);
    if people.is_empty() {
        return root.child(Element::new("p").class("pc-empty-state").text(&config.empty_message));
    }
    let mut list = Element::new("ul");
    for person in &people {
        let mut item = Element::new("li").class("pc-birthday");
        if person.date.month() == today.month() && person.date.day() == today.day() {
            item.add_class("pc-birthday--today");
        }
        item = item
            .child(Element::new("strong").text(&person.name))
            .child(Element::new("time").text(&person.date.format("%d/%m").to_string()));
        if let Some(department) = person.department.as_deref().filter(|d| !d.is_empty()) {
            item = item.child(
                Element::new("span")
                    .class("pc-birthday-department")
                    .text(department),
            );
        }
        list = list.child(item);
    }
    root.child(list)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::RenderNode;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 5, 17, 12, 0, 0).unwrap()
    }

    #[test]
    fn unavailable_data_falls_back_to_sample_with_notice() {
        let data = LeafData::Unavailable("timeout".into());
        let node: RenderNode =
            comments_section(&CommentsSectionConfig::default(), Some(&data), now()).into();
        assert_eq!(node.find_all("pc-notice").len(), 1);
        assert_eq!(node.find_all("pc-comment").len(), 2);
    }

    #[test]
    fn fetched_comments_render_without_notice() {
        let thread = CommentThread {
            comments: vec![Comment {
                id: "c1".into(),
                author: "Ana".into(),
                body: "Hello".into(),
                created_at: now() - Duration::minutes(5),
                likes: 0,
            }],
            total: 4,
        };
        let node: RenderNode = comments_section(
            &CommentsSectionConfig::default(),
            Some(&LeafData::Comments(thread)),
            now(),
        )
        .into();
        assert!(node.find_all("pc-notice").is_empty());
        assert!(node.text_content().contains("5m ago"));
        assert!(node.text_content().contains("3 more comments"));
    }

    #[test]
    fn birthdays_filter_to_current_month_and_mark_today() {
        let people = vec![
            Birthday {
                name: "May".into(),
                date: NaiveDate::from_ymd_opt(1991, 5, 17).unwrap(),
                department: None,
                avatar_url: None,
            },
            Birthday {
                name: "June".into(),
                date: NaiveDate::from_ymd_opt(1991, 6, 1).unwrap(),
                department: None,
                avatar_url: None,
            },
        ];
        let node: RenderNode = birthday_list(
            &BirthdayListConfig::default(),
            Some(&LeafData::Birthdays(people)),
            now(),
        )
        .into();
        assert_eq!(node.find_all("pc-birthday").len(), 1);
        assert_eq!(node.find_all("pc-birthday--today").len(), 1);
    }

    #[test]
    fn sample_birthdays_fall_in_current_month() {
        let node: RenderNode = birthday_list(&BirthdayListConfig::default(), None, now()).into();
        assert_eq!(node.find_all("pc-birthday").len(), 2);
    }
}
