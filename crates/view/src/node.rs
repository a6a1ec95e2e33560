// ABOUTME: Schema tree node kinds: Field, Group, View and the top-level Page.
// ABOUTME: Nodes are built once with chained constructors and never mutated afterwards.

//! Schema tree.
//!
//! A [`Page`] is an ordered mapping of names to [`Node`]s scoped to the whole
//! document. A [`View`] is the same thing scoped to one matched element. A
//! [`Group`] repeats its [`Template`] once per element its locator matches.
//!
//! Reusable item shapes are plain functions returning a `View`; nothing here
//! carries per-run state.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::locator::Locator;

/// Leaf node: one scalar extraction point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub locator: Locator,
    /// Absent matches are expected for this field (pagination links at the
    /// first or last page, for instance).
    #[serde(default)]
    pub optional: bool,
}

impl Field {
    pub fn new(locator: Locator) -> Self {
        Self {
            locator,
            optional: false,
        }
    }

    pub fn css(selector: impl Into<String>) -> Self {
        Self::new(Locator::css(selector))
    }

    pub fn id(id: impl Into<String>) -> Self {
        Self::new(Locator::id(id))
    }

    /// Marks the field as legitimately absent on some pages.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// Composite node scoped to the first element its locator matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    pub locator: Locator,
    #[serde(default)]
    pub children: IndexMap<String, Node>,
}

impl View {
    pub fn new(locator: Locator) -> Self {
        Self {
            locator,
            children: IndexMap::new(),
        }
    }

    pub fn css(selector: impl Into<String>) -> Self {
        Self::new(Locator::css(selector))
    }

    /// Adds a named child, keeping declaration order.
    pub fn with(mut self, name: impl Into<String>, node: impl Into<Node>) -> Self {
        self.children.insert(name.into(), node.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.children.get(name)
    }
}

/// What a [`Group`] produces for every matched element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Template {
    Field(Field),
    View(View),
}

impl Template {
    pub fn locator(&self) -> &Locator {
        match self {
            Template::Field(f) => &f.locator,
            Template::View(v) => &v.locator,
        }
    }
}

/// Repeating container. The template's own locator selects the repeated
/// elements; the template is then applied to each of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub template: Template,
}

impl Group {
    pub fn of_field(field: Field) -> Self {
        Self {
            template: Template::Field(field),
        }
    }

    pub fn of_view(view: View) -> Self {
        Self {
            template: Template::View(view),
        }
    }

    pub fn locator(&self) -> &Locator {
        self.template.locator()
    }
}

/// Tagged union of the node kinds that can appear under a page or view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Field(Field),
    Group(Group),
    View(View),
}

impl Node {
    pub fn locator(&self) -> &Locator {
        match self {
            Node::Field(f) => &f.locator,
            Node::Group(g) => g.locator(),
            Node::View(v) => &v.locator,
        }
    }
}

impl From<Field> for Node {
    fn from(f: Field) -> Self {
        Node::Field(f)
    }
}

impl From<Group> for Node {
    fn from(g: Group) -> Self {
        Node::Group(g)
    }
}

impl From<View> for Node {
    fn from(v: View) -> Self {
        Node::View(v)
    }
}

/// Top-level view scoped to a whole document; one per page type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub name: String,
    #[serde(default)]
    pub children: IndexMap<String, Node>,
}

impl Page {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: IndexMap::new(),
        }
    }

    pub fn with(mut self, name: impl Into<String>, node: impl Into<Node>) -> Self {
        self.children.insert(name.into(), node.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.children.get(name)
    }

    /// Every locator in the tree with its dotted path, depth first in
    /// declaration order.
    pub fn locators(&self) -> Vec<(String, &Locator)> {
        let mut out = Vec::new();
        for (name, node) in &self.children {
            collect_locators(name, node, &mut out);
        }
        out
    }
}

fn collect_locators<'a>(path: &str, node: &'a Node, out: &mut Vec<(String, &'a Locator)>) {
    match node {
        Node::Field(f) => out.push((path.to_string(), &f.locator)),
        Node::Group(g) => {
            out.push((path.to_string(), g.locator()));
            if let Template::View(v) = &g.template {
                collect_view_children(path, v, out);
            }
        }
        Node::View(v) => {
            out.push((path.to_string(), &v.locator));
            collect_view_children(path, v, out);
        }
    }
}

fn collect_view_children<'a>(path: &str, view: &'a View, out: &mut Vec<(String, &'a Locator)>) {
    for (name, child) in &view.children {
        collect_locators(&format!("{}.{}", path, name), child, out);
    }
}
