// ABOUTME: Extraction output: per-element FieldValue and the Extracted tree mirroring the schema.
// ABOUTME: Serializes untagged so JSON output reads like the page itself.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Values read from one matched element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FieldValue {
    /// Text content with whitespace collapsed.
    pub text: String,
    /// Inner HTML, untouched.
    pub html: String,
    /// `href` attribute, joined onto the base URL when the engine has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Parsed `datetime` attribute, or the text of a `<time>` element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datetime: Option<DateTime<Utc>>,
    /// `name` attribute, for form controls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Ordered child values of a page or view.
pub type Values = IndexMap<String, Extracted>;

/// One node of extraction output. Shape follows the schema node it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Extracted {
    Field(Option<FieldValue>),
    Group(Vec<Extracted>),
    View(Option<Values>),
}

impl Extracted {
    pub fn as_field(&self) -> Option<&FieldValue> {
        match self {
            Extracted::Field(v) => v.as_ref(),
            _ => None,
        }
    }

    pub fn as_group(&self) -> &[Extracted] {
        match self {
            Extracted::Group(items) => items,
            _ => &[],
        }
    }

    pub fn as_view(&self) -> Option<&Values> {
        match self {
            Extracted::View(v) => v.as_ref(),
            _ => None,
        }
    }

    /// True for an absent field or view and for an empty group.
    pub fn is_absent(&self) -> bool {
        match self {
            Extracted::Field(v) => v.is_none(),
            Extracted::Group(items) => items.is_empty(),
            Extracted::View(v) => v.is_none(),
        }
    }
}

/// Output of extracting one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageValues {
    pub page: String,
    pub values: Values,
}

impl PageValues {
    pub fn get(&self, name: &str) -> Option<&Extracted> {
        self.values.get(name)
    }

    /// Looks up a dotted path through nested views, e.g. `nav.next`.
    /// Groups are not traversed.
    pub fn lookup(&self, path: &str) -> Option<&Extracted> {
        let mut parts = path.split('.');
        let mut current = self.values.get(parts.next()?)?;
        for part in parts {
            current = current.as_view()?.get(part)?;
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(text: &str) -> Extracted {
        Extracted::Field(Some(FieldValue {
            text: text.to_string(),
            ..Default::default()
        }))
    }

    #[test]
    fn lookup_follows_nested_views() {
        let mut nav = Values::new();
        nav.insert("next".to_string(), field("Next"));
        nav.insert("prev".to_string(), Extracted::Field(None));
        let mut values = Values::new();
        values.insert("nav".to_string(), Extracted::View(Some(nav)));
        let page = PageValues {
            page: "ForumPage".to_string(),
            values,
        };

        assert_eq!(page.lookup("nav.next").and_then(|e| e.as_field()).map(|f| f.text.as_str()), Some("Next"));
        assert!(page.lookup("nav.prev").unwrap().is_absent());
        assert!(page.lookup("nav.missing").is_none());
        assert!(page.lookup("other").is_none());
    }

    #[test]
    fn serializes_untagged() {
        let mut values = Values::new();
        values.insert("title".to_string(), field("Hello"));
        values.insert("files".to_string(), Extracted::Group(vec![]));
        values.insert("nav".to_string(), Extracted::View(None));
        let json = serde_json::to_value(&values).unwrap();
        assert_eq!(json["title"]["text"], "Hello");
        assert!(json["title"].get("href").is_none());
        assert_eq!(json["files"], serde_json::json!([]));
        assert!(json["nav"].is_null());
    }
}
