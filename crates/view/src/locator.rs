// ABOUTME: Locator type pairing a lookup strategy with an expression.
// ABOUTME: Locators are translated to CSS and compiled lazily by the engine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a locator expression is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum Strategy {
    /// Exact match on the element's `id` attribute.
    Id,
    /// A CSS selector, resolved with full selector semantics.
    Css,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Strategy::Id => "id",
            Strategy::Css => "css",
        };
        write!(f, "{}", s)
    }
}

/// A `(strategy, expression)` pair identifying elements within a scope.
///
/// The expression is not checked here; a malformed CSS expression only
/// surfaces when the engine compiles it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    pub by: Strategy,
    pub expr: String,
}

impl Locator {
    pub fn new(by: Strategy, expr: impl Into<String>) -> Self {
        Self {
            by,
            expr: expr.into(),
        }
    }

    pub fn id(id: impl Into<String>) -> Self {
        Self::new(Strategy::Id, id)
    }

    pub fn css(selector: impl Into<String>) -> Self {
        Self::new(Strategy::Css, selector)
    }

    /// Returns the CSS selector this locator compiles to.
    ///
    /// Id locators become a quoted attribute selector so that ids which are
    /// not valid CSS identifiers still match exactly.
    pub fn to_css(&self) -> String {
        match self.by {
            Strategy::Css => self.expr.clone(),
            Strategy::Id => {
                let escaped = self.expr.replace('\\', "\\\\").replace('"', "\\\"");
                format!("[id=\"{}\"]", escaped)
            }
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.by, self.expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_locator_passes_through() {
        let loc = Locator::css(".ipsComment");
        assert_eq!(loc.to_css(), ".ipsComment");
        assert_eq!(loc.to_string(), "css=.ipsComment");
    }

    #[test]
    fn id_locator_becomes_attribute_selector() {
        assert_eq!(Locator::id("auth").to_css(), "[id=\"auth\"]");
        assert_eq!(Locator::id("a\"b").to_css(), "[id=\"a\\\"b\"]");
    }

    #[test]
    fn serializes_with_snake_case_strategy() {
        let json = serde_json::to_string(&Locator::id("password")).unwrap();
        assert_eq!(json, r#"{"by":"id","expr":"password"}"#);
        let back: Locator = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Locator::id("password"));
    }
}
