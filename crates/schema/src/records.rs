// ABOUTME: Typed records built from the generic extraction tree of each IPS page.
// ABOUTME: Converts PageValues into ForumIndex, ForumListing, TopicThread and LoginForm.

use chrono::{DateTime, Utc};
use ipsforum_view::formats::{html_to_text, sanitize_html};
use ipsforum_view::{Engine, ExtractError, Extracted, Html, PageValues, Result, Values};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::pages::{PageKind, FORUM_PAGE, INDEX_PAGE, LOGIN_PAGE, TOPIC_PAGE};
use crate::pagination::Pagination;

/// A forum row on the index page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forum {
    pub title: String,
    pub url: Option<String>,
    pub last_post: Option<DateTime<Utc>>,
}

/// A topic row on a forum listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub title: String,
    pub url: Option<String>,
    pub last_post: Option<DateTime<Utc>>,
}

/// A downloadable file linked from a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub url: Option<String>,
}

/// One post of a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub date: Option<DateTime<Utc>>,
    /// Sanitized body HTML.
    pub body_html: String,
    pub body_text: String,
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForumIndex {
    pub forums: Vec<Forum>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForumListing {
    pub topics: Vec<Topic>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicThread {
    pub comments: Vec<Comment>,
    pub pagination: Pagination,
}

/// Form control names found on the login page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginForm {
    pub username_field: String,
    pub password_field: String,
    pub submit_label: Option<String>,
}

/// A typed record for any page kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum Record {
    Login(LoginForm),
    Index(ForumIndex),
    Forum(ForumListing),
    Topic(TopicThread),
}

impl Record {
    pub fn from_values(kind: PageKind, values: &PageValues) -> Result<Self> {
        Ok(match kind {
            PageKind::Login => Record::Login(LoginForm::from_values(values)?),
            PageKind::Index => Record::Index(ForumIndex::from_values(values)?),
            PageKind::Forum => Record::Forum(ForumListing::from_values(values)?),
            PageKind::Topic => Record::Topic(TopicThread::from_values(values)?),
        })
    }
}

/// Extracts `kind` from `html` and builds its typed record.
pub fn scrape(engine: &Engine, kind: PageKind, html: &str) -> Result<Record> {
    let doc = Html::parse_document(html);
    let values = engine.extract_page(&doc, kind.schema())?;
    let record = Record::from_values(kind, &values)?;
    debug!(page = %kind, "record built");
    Ok(record)
}

fn expect_page(values: &PageValues, name: &str) -> Result<()> {
    if values.page == name {
        Ok(())
    } else {
        Err(ExtractError::record(
            name,
            "",
            Some(anyhow::anyhow!("values were extracted for {}", values.page)),
        ))
    }
}

fn group<'a>(values: &'a PageValues, name: &str) -> &'a [Extracted] {
    values.get(name).map(|e| e.as_group()).unwrap_or(&[])
}

fn item_view<'a>(page: &str, path: &str, item: &'a Extracted) -> Result<&'a Values> {
    item.as_view().ok_or_else(|| {
        ExtractError::record(page, path, Some(anyhow::anyhow!("expected a view entry")))
    })
}

/// Title and link of a listing row; the title link is required.
fn title_link(page: &str, path: &str, view: &Values) -> Result<(String, Option<String>)> {
    let field = view
        .get("title")
        .and_then(|e| e.as_field())
        .ok_or_else(|| ExtractError::missing_field(page, format!("{}.title", path)))?;
    Ok((field.text.clone(), field.href.clone()))
}

fn date(view: &Values, name: &str) -> Option<DateTime<Utc>> {
    view.get(name).and_then(|e| e.as_field()).and_then(|f| f.datetime)
}

impl ForumIndex {
    pub fn from_values(values: &PageValues) -> Result<Self> {
        expect_page(values, INDEX_PAGE)?;
        let mut forums = Vec::new();
        for (i, item) in group(values, "forums").iter().enumerate() {
            let path = format!("forums[{}]", i);
            let view = item_view(INDEX_PAGE, &path, item)?;
            let (title, url) = title_link(INDEX_PAGE, &path, view)?;
            forums.push(Forum {
                title,
                url,
                last_post: date(view, "date"),
            });
        }
        Ok(Self { forums })
    }
}

impl ForumListing {
    pub fn from_values(values: &PageValues) -> Result<Self> {
        expect_page(values, FORUM_PAGE)?;
        let mut topics = Vec::new();
        for (i, item) in group(values, "topics").iter().enumerate() {
            let path = format!("topics[{}]", i);
            let view = item_view(FORUM_PAGE, &path, item)?;
            let (title, url) = title_link(FORUM_PAGE, &path, view)?;
            topics.push(Topic {
                title,
                url,
                last_post: date(view, "date"),
            });
        }
        Ok(Self {
            topics,
            pagination: Pagination::from_nav(values.get("nav").and_then(|e| e.as_view())),
        })
    }
}

impl TopicThread {
    pub fn from_values(values: &PageValues) -> Result<Self> {
        expect_page(values, TOPIC_PAGE)?;
        let mut comments = Vec::new();
        for (i, item) in group(values, "comments").iter().enumerate() {
            let path = format!("comments[{}]", i);
            let view = item_view(TOPIC_PAGE, &path, item)?;
            let body = view
                .get("body")
                .and_then(|e| e.as_field())
                .ok_or_else(|| ExtractError::missing_field(TOPIC_PAGE, format!("{}.body", path)))?;

            let attachments = view
                .get("attachments")
                .map(|e| e.as_group())
                .unwrap_or(&[])
                .iter()
                .filter_map(|a| a.as_field())
                .map(|f| Attachment {
                    name: f.text.clone(),
                    url: f.href.clone(),
                })
                .collect();

            let body_html = sanitize_html(&body.html).trim().to_string();
            comments.push(Comment {
                date: date(view, "date"),
                body_text: html_to_text(&body_html),
                body_html,
                attachments,
            });
        }
        Ok(Self {
            comments,
            pagination: Pagination::from_nav(values.get("nav").and_then(|e| e.as_view())),
        })
    }
}

impl LoginForm {
    pub fn from_values(values: &PageValues) -> Result<Self> {
        expect_page(values, LOGIN_PAGE)?;
        let control_name = |name: &str| -> Result<String> {
            let field = values
                .get(name)
                .and_then(|e| e.as_field())
                .ok_or_else(|| ExtractError::missing_field(LOGIN_PAGE, name))?;
            // IPS login inputs always carry a name; fall back to the id the
            // schema located them by
            Ok(field.name.clone().unwrap_or_else(|| name.to_string()))
        };
        let submit_label = values
            .get("submit")
            .and_then(|e| e.as_field())
            .map(|f| f.text.clone())
            .filter(|t| !t.is_empty());
        Ok(Self {
            username_field: control_name("username")?,
            password_field: control_name("password")?,
            submit_label,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::topic_page;

    const TOPIC_HTML: &str = r#"
        <html><body>
        <article class="ipsComment">
            <div class="ipsComment_meta"><time datetime="2020-02-03T04:05:06Z">Feb 3</time></div>
            <div class="ipsComment_content"><p>Hello <b>there</b></p><script>bad()</script></div>
        </article>
        </body></html>
    "#;

    #[test]
    fn topic_without_nav_is_single_page() {
        let record = scrape(&Engine::default(), PageKind::Topic, TOPIC_HTML).unwrap();
        let Record::Topic(thread) = record else {
            panic!("expected a topic record");
        };
        assert_eq!(thread.comments.len(), 1);
        assert!(thread.pagination.is_single_page());
        let comment = &thread.comments[0];
        assert_eq!(comment.body_text, "Hello there");
        assert!(!comment.body_html.contains("script"));
        assert!(comment.attachments.is_empty());
    }

    #[test]
    fn wrong_page_values_are_rejected() {
        let values = Engine::default().extract_html(TOPIC_HTML, topic_page()).unwrap();
        let err = ForumIndex::from_values(&values).unwrap_err();
        assert!(err.is_record());
    }

    #[test]
    fn missing_title_is_reported_with_index() {
        let html = r#"<div class="cForumList"><div class="ipsDataItem"><span>no title</span></div></div>"#;
        let err = scrape(&Engine::default(), PageKind::Index, html).unwrap_err();
        assert!(err.is_missing_field());
        assert_eq!(err.path, "forums[0].title");
    }

    #[test]
    fn record_serializes_with_page_tag() {
        let record = Record::Index(ForumIndex { forums: vec![] });
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["page"], "index");
        assert_eq!(json["forums"], serde_json::json!([]));
    }
}
