// ABOUTME: Markdown and plain-text rendering of typed page records.
// ABOUTME: Topic threads become one section per post with its date and attachment list.

use chrono::{DateTime, Utc};
use ipsforum_view::formats::html_to_markdown;

use crate::pagination::Pagination;
use crate::records::{ForumIndex, ForumListing, LoginForm, Record, TopicThread};

fn format_date(date: Option<DateTime<Utc>>) -> String {
    date.map(|d| d.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "unknown date".to_string())
}

fn escape_link_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '[' | ']') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

// parens and spaces would end the link destination early
fn escape_link_url(url: &str) -> String {
    url.replace('(', "%28").replace(')', "%29").replace(' ', "%20")
}

fn link(title: &str, url: Option<&str>) -> String {
    match url {
        Some(u) => format!("[{}]({})", escape_link_text(title), escape_link_url(u)),
        None => title.to_string(),
    }
}

fn pagination_line(p: &Pagination) -> Option<String> {
    if p.is_single_page() {
        return None;
    }
    let mut parts = Vec::new();
    match (p.current_page(), p.page_count()) {
        (Some(cur), Some(total)) => parts.push(format!("Page {} of {}", cur, total)),
        (Some(cur), None) => parts.push(format!("Page {}", cur)),
        _ => {}
    }
    if let Some(ref next) = p.next {
        parts.push(format!("next: {}", next));
    }
    Some(parts.join(" | "))
}

impl ForumIndex {
    pub fn to_markdown(&self) -> String {
        self.forums
            .iter()
            .map(|f| format!("- {} (last post {})", link(&f.title, f.url.as_deref()), format_date(f.last_post)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl ForumListing {
    pub fn to_markdown(&self) -> String {
        let mut lines: Vec<String> = self
            .topics
            .iter()
            .map(|t| format!("- {} (last post {})", link(&t.title, t.url.as_deref()), format_date(t.last_post)))
            .collect();
        if let Some(line) = pagination_line(&self.pagination) {
            lines.push(String::new());
            lines.push(line);
        }
        lines.join("\n")
    }
}

impl TopicThread {
    /// Renders the thread as Markdown, one `##` section per post.
    pub fn to_markdown(&self) -> String {
        let mut parts = Vec::new();
        for (i, comment) in self.comments.iter().enumerate() {
            parts.push(format!("## #{} · {}", i + 1, format_date(comment.date)));
            let body = html_to_markdown(&comment.body_html);
            if !body.is_empty() {
                parts.push(body);
            }
            if !comment.attachments.is_empty() {
                let list = comment
                    .attachments
                    .iter()
                    .map(|a| format!("- {}", link(&a.name, a.url.as_deref())))
                    .collect::<Vec<_>>()
                    .join("\n");
                parts.push(format!("Attachments:\n{}", list));
            }
        }
        if let Some(line) = pagination_line(&self.pagination) {
            parts.push(format!("---\n{}", line));
        }
        parts.join("\n\n")
    }

    pub fn to_text(&self) -> String {
        self.comments
            .iter()
            .map(|c| format!("[{}]\n{}", format_date(c.date), c.body_text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl LoginForm {
    pub fn to_markdown(&self) -> String {
        format!(
            "- username field: `{}`\n- password field: `{}`\n- submit: {}",
            self.username_field,
            self.password_field,
            self.submit_label.as_deref().unwrap_or("(no label)")
        )
    }
}

impl Record {
    pub fn to_markdown(&self) -> String {
        match self {
            Record::Login(r) => r.to_markdown(),
            Record::Index(r) => r.to_markdown(),
            Record::Forum(r) => r.to_markdown(),
            Record::Topic(r) => r.to_markdown(),
        }
    }

    /// Plain text; only topics differ from the Markdown rendering.
    pub fn to_text(&self) -> String {
        match self {
            Record::Topic(r) => r.to_text(),
            other => other.to_markdown(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Attachment, Comment, Topic};
    use chrono::TimeZone;

    fn thread() -> TopicThread {
        TopicThread {
            comments: vec![Comment {
                date: Some(Utc.with_ymd_and_hms(2020, 2, 3, 4, 5, 6).unwrap()),
                body_html: "<p>Hello <strong>there</strong></p>".to_string(),
                body_text: "Hello there".to_string(),
                attachments: vec![Attachment {
                    name: "notes.txt".to_string(),
                    url: Some("https://f.example/file?id=1".to_string()),
                }],
            }],
            pagination: Pagination::default(),
        }
    }

    #[test]
    fn thread_markdown_has_sections_and_attachments() {
        let md = thread().to_markdown();
        assert!(md.starts_with("## #1 · 2020-02-03 04:05 UTC"));
        assert!(md.contains("**there**"));
        assert!(md.contains("- [notes.txt](https://f.example/file?id=1)"));
        assert!(!md.contains("Page "));
    }

    #[test]
    fn thread_text() {
        assert_eq!(thread().to_text(), "[2020-02-03 04:05 UTC]\nHello there");
    }

    #[test]
    fn link_text_and_url_are_escaped() {
        assert_eq!(
            link("[Solved] fix (again)]", Some("https://f.example/t/1-fix_(again)/")),
            r"[\[Solved\] fix (again)\]](https://f.example/t/1-fix_%28again%29/)"
        );
        assert_eq!(link("plain [x]", None), "plain [x]");
    }

    #[test]
    fn listing_shows_pagination() {
        let listing = ForumListing {
            topics: vec![Topic {
                title: "Welcome".to_string(),
                url: None,
                last_post: None,
            }],
            pagination: Pagination {
                next: Some("https://f.example/forum/2-x/page/2/".to_string()),
                last: Some("https://f.example/forum/2-x/page/3/".to_string()),
                ..Default::default()
            },
        };
        let md = listing.to_markdown();
        assert!(md.starts_with("- Welcome (last post unknown date)"));
        assert!(md.contains("Page 1 of 3 | next: https://f.example/forum/2-x/page/2/"));
    }
}
