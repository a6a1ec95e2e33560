// ABOUTME: The view engine: resolves schema locators against a parsed document and extracts values.
// ABOUTME: Children are always resolved relative to their parent's matched element, never the document.

//! Locator resolution and extraction.
//!
//! Key behaviors:
//! - Page children resolve against the document root; children of a view or
//!   group entry resolve against that element's descendants only.
//! - Matches come back in document order.
//! - A field with no match is absent; a group with no match is empty; a view
//!   with no match is absent and its children are not evaluated.
//! - Fields and views take their first match. In strict mode a required field
//!   without a match, or a field with several, is an error.
//! - Nothing is cached per document, so extracting the same document twice
//!   yields identical values.

use indexmap::IndexMap;
use scraper::{ElementRef, Html};
use tracing::{debug, trace, warn};

use crate::compiled::{get_or_compile, precompile_selectors};
use crate::error::{ExtractError, Result};
use crate::locator::Locator;
use crate::node::{Field, Group, Node, Page, Template};
use crate::options::{EngineBuilder, Options};
use crate::time_parse::parse_timestamp;
use crate::value::{Extracted, FieldValue, PageValues, Values};

/// Normalizes whitespace in a string by collapsing runs of whitespace into single spaces.
fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", parent, name)
    }
}

/// Evaluates [`Page`] schemas against documents.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    opts: Options,
}

impl Engine {
    pub fn new(opts: Options) -> Self {
        Self { opts }
    }

    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    pub fn options(&self) -> &Options {
        &self.opts
    }

    /// Compiles every locator in the page, reporting the first invalid one.
    ///
    /// Valid selectors are left in the shared cache.
    pub fn validate(&self, page: &Page) -> Result<()> {
        let locators = page.locators();
        precompile_selectors(locators.iter().map(|(_, loc)| loc.to_css()));
        for (path, loc) in &locators {
            compile_locator(&page.name, path, loc)?;
        }
        debug!(page = %page.name, locators = locators.len(), "schema validated");
        Ok(())
    }

    /// Parses `html` as a full document and extracts `page` from it.
    pub fn extract_html(&self, html: &str, page: &Page) -> Result<PageValues> {
        let doc = Html::parse_document(html);
        self.extract_page(&doc, page)
    }

    /// Extracts every node of `page` from an already parsed document.
    pub fn extract_page(&self, doc: &Html, page: &Page) -> Result<PageValues> {
        debug!(page = %page.name, "extracting page");
        let values = self.extract_children(&page.name, "", doc.root_element(), &page.children)?;
        Ok(PageValues {
            page: page.name.clone(),
            values,
        })
    }

    /// Resolves a locator inside `scope`, returning matching descendants in
    /// document order.
    pub fn resolve<'a>(&self, scope: ElementRef<'a>, locator: &Locator) -> Result<Vec<ElementRef<'a>>> {
        resolve_in("resolve", &locator.to_string(), scope, locator)
    }

    fn extract_children(
        &self,
        page: &str,
        parent: &str,
        scope: ElementRef<'_>,
        children: &IndexMap<String, Node>,
    ) -> Result<Values> {
        let mut values = Values::with_capacity(children.len());
        for (name, node) in children {
            let path = join_path(parent, name);
            let value = self.extract_node(page, &path, scope, node)?;
            values.insert(name.clone(), value);
        }
        Ok(values)
    }

    fn extract_node(&self, page: &str, path: &str, scope: ElementRef<'_>, node: &Node) -> Result<Extracted> {
        match node {
            Node::Field(field) => self.extract_field(page, path, scope, field),
            Node::Group(group) => self.extract_group(page, path, scope, group),
            Node::View(view) => {
                let matches = resolve_in(page, path, scope, &view.locator)?;
                match matches.first() {
                    Some(el) => {
                        let values = self.extract_children(page, path, *el, &view.children)?;
                        Ok(Extracted::View(Some(values)))
                    }
                    None => {
                        trace!(page, path, "view absent");
                        Ok(Extracted::View(None))
                    }
                }
            }
        }
    }

    fn extract_field(&self, page: &str, path: &str, scope: ElementRef<'_>, field: &Field) -> Result<Extracted> {
        let matches = resolve_in(page, path, scope, &field.locator)?;
        trace!(page, path, matches = matches.len(), "field resolved");

        if self.opts.strict {
            if matches.is_empty() && !field.optional {
                warn!(page, path, locator = %field.locator, "required field has no match");
                return Err(ExtractError::missing_field(page, path));
            }
            if matches.len() > 1 {
                warn!(page, path, locator = %field.locator, matches = matches.len(), "field is ambiguous");
                return Err(ExtractError::ambiguous_field(page, path, matches.len()));
            }
        }

        Ok(Extracted::Field(matches.first().map(|el| self.read_element(*el))))
    }

    fn extract_group(&self, page: &str, path: &str, scope: ElementRef<'_>, group: &Group) -> Result<Extracted> {
        let matches = resolve_in(page, path, scope, group.locator())?;
        debug!(page, path, matches = matches.len(), "group resolved");

        let mut items = Vec::with_capacity(matches.len());
        for (i, el) in matches.into_iter().enumerate() {
            let item = match &group.template {
                Template::Field(_) => Extracted::Field(Some(self.read_element(el))),
                Template::View(view) => {
                    let entry = format!("{}[{}]", path, i);
                    Extracted::View(Some(self.extract_children(page, &entry, el, &view.children)?))
                }
            };
            items.push(item);
        }
        Ok(Extracted::Group(items))
    }

    fn read_element(&self, el: ElementRef<'_>) -> FieldValue {
        let element = el.value();
        let text = normalize_whitespace(&el.text().collect::<String>());

        let datetime = element
            .attr("datetime")
            .and_then(parse_timestamp)
            .or_else(|| {
                if element.name() == "time" {
                    parse_timestamp(&text)
                } else {
                    None
                }
            });

        FieldValue {
            href: element.attr("href").map(|h| self.resolve_href(h.trim())),
            datetime,
            name: element.attr("name").map(|n| n.to_string()),
            html: el.inner_html(),
            text,
        }
    }

    fn resolve_href(&self, href: &str) -> String {
        match &self.opts.base_url {
            Some(base) => match base.join(href) {
                Ok(joined) => joined.to_string(),
                Err(e) => {
                    debug!(href, error = %e, "href not joinable, keeping as is");
                    href.to_string()
                }
            },
            None => href.to_string(),
        }
    }
}

fn compile_locator(page: &str, path: &str, locator: &Locator) -> Result<scraper::Selector> {
    get_or_compile(&locator.to_css()).map_err(|msg| {
        ExtractError::invalid_selector(page, path, Some(anyhow::anyhow!("{}: {}", locator, msg)))
    })
}

fn resolve_in<'a>(page: &str, path: &str, scope: ElementRef<'a>, locator: &Locator) -> Result<Vec<ElementRef<'a>>> {
    let selector = compile_locator(page, path, locator)?;
    let scope_id = scope.id();
    // the scope element itself is never one of its own matches
    Ok(scope.select(&selector).filter(|el| el.id() != scope_id).collect())
}
