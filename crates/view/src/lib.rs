// ABOUTME: Main library entry point for the ipsforum view engine.
// ABOUTME: Re-exports the public API: schema nodes, Locator, Engine, EngineBuilder, extraction values and errors.

//! A small declarative view/selector engine.
//!
//! A schema is a tree of [`Page`], [`View`], [`Group`] and [`Field`] nodes,
//! each carrying a [`Locator`]. The [`Engine`] resolves that tree against a
//! parsed HTML document and returns a matching tree of [`Extracted`] values.
//! Fetching, pagination walking and persistence are left to the caller.
//!
//! # Example
//!
//! ```
//! use ipsforum_view::{Engine, Field, Group, Page, View};
//!
//! let item = View::css(".item").with("title", Field::css("a"));
//! let page = Page::new("ListPage").with("items", Group::of_view(item));
//!
//! let html = r#"<ul><li class="item"><a href="/1">One</a></li></ul>"#;
//! let values = Engine::default().extract_html(html, &page).unwrap();
//! assert_eq!(values.get("items").unwrap().as_group().len(), 1);
//! ```

pub mod compiled;
pub mod document;
pub mod engine;
pub mod error;
pub mod formats;
pub mod locator;
pub mod node;
pub mod options;
pub mod time_parse;
pub mod value;

pub use crate::document::decode_document;
pub use crate::engine::Engine;
pub use crate::error::{ErrorCode, ExtractError, Result};
pub use crate::locator::{Locator, Strategy};
pub use crate::node::{Field, Group, Node, Page, Template, View};
pub use crate::options::{EngineBuilder, Options};
pub use crate::value::{Extracted, FieldValue, PageValues, Values};

/// Re-exported so callers can hold a parsed document without depending on
/// scraper directly.
pub use scraper::Html;
