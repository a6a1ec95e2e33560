// ABOUTME: Page and item schemas for forums running the IPS Community Suite theme.
// ABOUTME: Pages are built once per process and shared as &'static references.

//! IPS page schemas.
//!
//! | Page        | Fields                                     |
//! |-------------|--------------------------------------------|
//! | `LoginPage` | `username`, `password`, `submit`           |
//! | `IndexPage` | `forums` (group of [`forum_item`])         |
//! | `ForumPage` | `topics` (group of [`topic_item`]), `nav`  |
//! | `TopicPage` | `comments` (group of [`comment_item`]), `nav` |
//!
//! Item shapes are plain functions so the same template can be mounted under
//! different container locators.

use std::fmt;
use std::str::FromStr;

use ipsforum_view::{Field, Group, Locator, Page, View};
use once_cell::sync::Lazy;

pub const LOGIN_PAGE: &str = "LoginPage";
pub const INDEX_PAGE: &str = "IndexPage";
pub const FORUM_PAGE: &str = "ForumPage";
pub const TOPIC_PAGE: &str = "TopicPage";

/// One row of the forum index.
pub fn forum_item(locator: Locator) -> View {
    View::new(locator)
        .with("title", Field::css(".ipsDataItem_title > a"))
        .with("date", Field::css(".ipsDataItem_lastPoster time"))
}

/// One row of a forum's topic list.
pub fn topic_item(locator: Locator) -> View {
    View::new(locator)
        .with("title", Field::css(".ipsDataItem_title .ipsContained > a"))
        .with("date", Field::css(".ipsDataItem_lastPoster time"))
}

/// One post in a topic.
///
/// Attachment links carrying `data-fileid` are inline embeds and are left
/// out of `attachments`.
pub fn comment_item(locator: Locator) -> View {
    View::new(locator)
        .with("date", Field::css(".ipsComment_meta time"))
        .with("body", Field::css(".ipsComment_content"))
        .with(
            "attachments",
            Group::of_field(Field::css("a.ipsAttachLink:not([data-fileid])")),
        )
}

/// Pagination bar. Every link is optional: page one has no first/prev and
/// the final page has no next/last.
pub fn nav_view(locator: Locator) -> View {
    View::new(locator)
        .with("first", Field::css(".ipsPagination_first > a").optional())
        .with("prev", Field::css(".ipsPagination_prev > a").optional())
        .with("next", Field::css(".ipsPagination_next > a").optional())
        .with("last", Field::css(".ipsPagination_last > a").optional())
}

static LOGIN: Lazy<Page> = Lazy::new(|| {
    Page::new(LOGIN_PAGE)
        .with("username", Field::id("auth"))
        .with("password", Field::id("password"))
        .with("submit", Field::css("button[type=submit]"))
});

static INDEX: Lazy<Page> = Lazy::new(|| {
    Page::new(INDEX_PAGE).with(
        "forums",
        Group::of_view(forum_item(Locator::css(".cForumList .ipsDataItem"))),
    )
});

static FORUM: Lazy<Page> = Lazy::new(|| {
    Page::new(FORUM_PAGE)
        .with(
            "topics",
            Group::of_view(topic_item(Locator::css(
                ".cTopicList:not(.cForumQuestions) .ipsDataItem",
            ))),
        )
        .with("nav", nav_view(Locator::css(".ipsButtonBar .ipsPagination")))
});

static TOPIC: Lazy<Page> = Lazy::new(|| {
    Page::new(TOPIC_PAGE)
        .with("comments", Group::of_view(comment_item(Locator::css(".ipsComment"))))
        .with("nav", nav_view(Locator::css(".ipsSpacer_bottom .ipsPagination")))
});

pub fn login_page() -> &'static Page {
    &LOGIN
}

pub fn index_page() -> &'static Page {
    &INDEX
}

pub fn forum_page() -> &'static Page {
    &FORUM
}

pub fn topic_page() -> &'static Page {
    &TOPIC
}

/// The page types of the forum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    Login,
    Index,
    Forum,
    Topic,
}

impl PageKind {
    pub const ALL: [PageKind; 4] = [
        PageKind::Login,
        PageKind::Index,
        PageKind::Forum,
        PageKind::Topic,
    ];

    pub fn schema(self) -> &'static Page {
        match self {
            PageKind::Login => login_page(),
            PageKind::Index => index_page(),
            PageKind::Forum => forum_page(),
            PageKind::Topic => topic_page(),
        }
    }

    /// Short lowercase name used on the command line.
    pub fn name(self) -> &'static str {
        match self {
            PageKind::Login => "login",
            PageKind::Index => "index",
            PageKind::Forum => "forum",
            PageKind::Topic => "topic",
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for PageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "login" | "loginpage" => Ok(PageKind::Login),
            "index" | "indexpage" => Ok(PageKind::Index),
            "forum" | "forumpage" => Ok(PageKind::Forum),
            "topic" | "topicpage" => Ok(PageKind::Topic),
            other => Err(format!("unknown page kind: {}", other)),
        }
    }
}
