// ABOUTME: Pre-compiled CSS selector cache shared by every engine in the process.
// ABOUTME: Eliminates repeated parsing of the same locator expressions across pages and items.

//! Selector caching for repeated locator resolution.
//!
//! A group template is resolved once per matched element, so the same
//! expression is looked up many times per page. Selectors are compiled once
//! and reused; invalid expressions are cached too, with their parse error.

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;
use scraper::Selector;

type Compiled = Result<Selector, String>;

static SELECTOR_CACHE: Lazy<RwLock<HashMap<String, Compiled>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

fn compile(css: &str) -> Compiled {
    Selector::parse(css).map_err(|e| e.to_string())
}

/// Gets or compiles a CSS selector, caching the result.
///
/// Returns the parse error message for invalid selectors. Subsequent calls
/// with the same string return the cached result.
pub fn get_or_compile(css: &str) -> Compiled {
    {
        let cache = SELECTOR_CACHE.read().unwrap_or_else(|e| e.into_inner());
        if let Some(cached) = cache.get(css) {
            return cached.clone();
        }
    }

    let compiled = compile(css);
    let mut cache = SELECTOR_CACHE.write().unwrap_or_else(|e| e.into_inner());
    // another thread may have inserted while we compiled
    if let Some(cached) = cache.get(css) {
        return cached.clone();
    }
    cache.insert(css.to_string(), compiled.clone());
    compiled
}

/// Precompiles a batch of selectors into the cache.
///
/// Call this once after building a schema to avoid lock contention during
/// extraction.
pub fn precompile_selectors<I, S>(selectors: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut cache = SELECTOR_CACHE.write().unwrap_or_else(|e| e.into_inner());
    for css in selectors {
        let css = css.as_ref();
        if !cache.contains_key(css) {
            cache.insert(css.to_string(), compile(css));
        }
    }
}
