// ABOUTME: Page schema for forums built on the IPS Community Suite theme.
// ABOUTME: Re-exports the page definitions, PageKind, typed records and pagination helpers.

//! IPS forum page schema.
//!
//! Declares, for each page type of an IPS forum, which fields exist and how
//! to locate them. Evaluation is done by [`ipsforum_view::Engine`]; this
//! crate adds typed records on top of the raw extraction output.
//!
//! # Example
//!
//! ```
//! use ipsforum_schema::{scrape, PageKind, Record};
//! use ipsforum_view::Engine;
//!
//! let html = r#"<div class="cForumList"><div class="ipsDataItem">
//!     <h4 class="ipsDataItem_title"><a href="/forum/1-news/">News</a></h4>
//! </div></div>"#;
//! let record = scrape(&Engine::default(), PageKind::Index, html).unwrap();
//! let Record::Index(index) = record else { unreachable!() };
//! assert_eq!(index.forums[0].title, "News");
//! ```

pub mod pages;
pub mod pagination;
pub mod records;
pub mod render;

pub use crate::pages::{
    comment_item, forum_item, forum_page, index_page, login_page, nav_view, topic_item,
    topic_page, PageKind,
};
pub use crate::pagination::{page_number, Pagination};
pub use crate::records::{
    scrape, Attachment, Comment, Forum, ForumIndex, ForumListing, LoginForm, Record, Topic,
    TopicThread,
};
