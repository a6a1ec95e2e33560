// ABOUTME: Pagination links read from an extracted nav view, plus page-number helpers.
// ABOUTME: A missing `next` link means the current page is the last one.

use ipsforum_view::Values;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static PAGE_PATH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"/page/(\d+)/?").unwrap());
static PAGE_QUERY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[?&]page=(\d+)").unwrap());

/// The four pagination links of a listing or topic page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub first: Option<String>,
    pub prev: Option<String>,
    pub next: Option<String>,
    pub last: Option<String>,
}

impl Pagination {
    /// Reads the links from an extracted nav view. An absent view (single
    /// page listings carry no pagination bar) yields no links.
    pub fn from_nav(nav: Option<&Values>) -> Self {
        let link = |name: &str| {
            nav.and_then(|v| v.get(name))
                .and_then(|e| e.as_field())
                .and_then(|f| f.href.clone())
        };
        Self {
            first: link("first"),
            prev: link("prev"),
            next: link("next"),
            last: link("last"),
        }
    }

    pub fn is_first_page(&self) -> bool {
        self.prev.is_none()
    }

    pub fn is_last_page(&self) -> bool {
        self.next.is_none()
    }

    pub fn is_single_page(&self) -> bool {
        self.is_first_page() && self.is_last_page()
    }

    /// Page number of the current page, derived from its neighbours.
    ///
    /// A `prev` link without a page number points at page 1, so the current
    /// page is 2.
    pub fn current_page(&self) -> Option<u32> {
        if let Some(n) = self.next.as_deref().and_then(page_number) {
            return n.checked_sub(1);
        }
        match self.prev.as_deref() {
            Some(prev) => match page_number(prev) {
                Some(p) => p.checked_add(1),
                None => Some(2),
            },
            None => Some(1),
        }
    }

    /// Total number of pages, when it can be told from the `last` link or
    /// from being on the last page.
    pub fn page_count(&self) -> Option<u32> {
        if let Some(last) = self.last.as_deref() {
            return page_number(last);
        }
        if self.is_last_page() {
            return self.current_page();
        }
        None
    }
}

/// Extracts the page number from an IPS pagination URL.
///
/// Understands both the friendly form (`/topic/12-foo/page/3/`) and the
/// query form (`?page=3`). The first page is usually linked without either,
/// in which case this returns `None`.
pub fn page_number(url: &str) -> Option<u32> {
    PAGE_PATH_RE
        .captures(url)
        .or_else(|| PAGE_QUERY_RE.captures(url))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipsforum_view::{Extracted, FieldValue};

    fn nav(links: &[(&str, &str)]) -> Values {
        let mut values = Values::new();
        for name in ["first", "prev", "next", "last"] {
            values.insert(name.to_string(), Extracted::Field(None));
        }
        for (name, href) in links {
            values.insert(
                name.to_string(),
                Extracted::Field(Some(FieldValue {
                    href: Some(href.to_string()),
                    ..Default::default()
                })),
            );
        }
        values
    }

    #[test]
    fn test_page_number_forms() {
        assert_eq!(page_number("https://f.example/forum/3-general/page/4/"), Some(4));
        assert_eq!(page_number("https://f.example/index.php?showforum=3&page=12"), Some(12));
        assert_eq!(page_number("https://f.example/forum/3-general/"), None);
    }

    #[test]
    fn first_of_many() {
        let p = Pagination::from_nav(Some(&nav(&[
            ("next", "https://f.example/forum/3-general/page/2/"),
            ("last", "https://f.example/forum/3-general/page/5/"),
        ])));
        assert!(p.is_first_page());
        assert!(!p.is_last_page());
        assert_eq!(p.current_page(), Some(1));
        assert_eq!(p.page_count(), Some(5));
    }

    #[test]
    fn last_page() {
        let p = Pagination::from_nav(Some(&nav(&[
            ("first", "https://f.example/forum/3-general/"),
            ("prev", "https://f.example/forum/3-general/page/4/"),
        ])));
        assert!(p.is_last_page());
        assert_eq!(p.current_page(), Some(5));
        assert_eq!(p.page_count(), Some(5));
    }

    #[test]
    fn second_of_two_pages() {
        let p = Pagination::from_nav(Some(&nav(&[
            ("first", "https://f.example/forum/3-general/"),
            ("prev", "https://f.example/forum/3-general/"),
        ])));
        assert!(p.is_last_page());
        assert_eq!(p.current_page(), Some(2));
        assert_eq!(p.page_count(), Some(2));
    }

    #[test]
    fn huge_prev_page_number_does_not_overflow() {
        let p = Pagination {
            prev: Some(format!("https://f.example/x?page={}", u32::MAX)),
            ..Default::default()
        };
        assert_eq!(p.current_page(), None);
        assert_eq!(p.page_count(), None);
    }

    #[test]
    fn missing_nav_is_a_single_page() {
        let p = Pagination::from_nav(None);
        assert!(p.is_single_page());
        assert_eq!(p.page_count(), Some(1));
    }
}
