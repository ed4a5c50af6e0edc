//! Owned, navigable view of a forecast XML response.
//!
//! The service wraps every response in a top-level element that carries no
//! forecast data; [`ForecastDocument::parse`] drops it and roots the tree at
//! its first child element.
//!
//! Element and attribute names keep the prefix used in the source, so
//! `xsi:noNamespaceSchemaLocation` is looked up under that full name.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::YrError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub nodes: Vec<Node>,
}

impl Element {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.iter().find(|a| a.name == name).map(|a| a.value.as_str())
    }

    /// Attribute parsed as a number, e.g. `value="12.3"` on a `temperature` element.
    pub fn attribute_f64(&self, name: &str) -> Option<f64> {
        self.attribute(name)?.trim().parse().ok()
    }

    /// Attribute parsed as an RFC 3339 timestamp, e.g. `from` on a `time` element.
    pub fn attribute_datetime(&self, name: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(self.attribute(name)?.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Child elements, skipping text nodes.
    pub fn children(&self) -> impl Iterator<Item = &Element> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }

    pub fn children_named<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Element> {
        self.children().filter(move |el| el.name == name)
    }

    /// First child element called `name`.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children_named(name).next()
    }

    /// Concatenated text of the direct text children, trimmed.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for node in &self.nodes {
            if let Node::Text(t) = node {
                text.push_str(t);
            }
        }
        text.trim().to_string()
    }

    /// All descendants called `name`, in document order. The element itself is not included.
    pub fn descendants_named<'a>(&'a self, name: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        let mut stack: Vec<&Element> = self.children().collect();
        stack.reverse();

        while let Some(el) = stack.pop() {
            if el.name == name {
                found.push(el);
            }
            let len = stack.len();
            stack.extend(el.children());
            stack[len..].reverse();
        }

        found
    }

    /// Elements reached by following a `/`-separated path of child names.
    ///
    /// `select("time/location/temperature")` visits every matching child at
    /// every step, so it returns all temperatures of all time entries.
    pub fn select<'a>(&'a self, path: &str) -> Vec<&'a Element> {
        let mut current = vec![self];
        for step in path.split('/').filter(|s| !s.is_empty()) {
            current = current.into_iter().flat_map(|el| el.children_named(step)).collect();
        }
        current
    }

    fn from_xml(node: roxmltree::Node<'_, '_>) -> Self {
        let attributes = node
            .attributes()
            .map(|a| Attribute {
                name: qualified_name(node, a.namespace(), a.name()),
                value: a.value().to_string(),
            })
            .collect();

        let nodes = node
            .children()
            .filter_map(|child| {
                if child.is_element() {
                    Some(Node::Element(Element::from_xml(child)))
                } else if child.is_text() {
                    child
                        .text()
                        .filter(|t| !t.trim().is_empty())
                        .map(|t| Node::Text(t.to_string()))
                } else {
                    None
                }
            })
            .collect();

        let tag = node.tag_name();
        Element { name: qualified_name(node, tag.namespace(), tag.name()), attributes, nodes }
    }
}

fn qualified_name(node: roxmltree::Node<'_, '_>, namespace: Option<&str>, local: &str) -> String {
    match namespace.and_then(|uri| node.lookup_prefix(uri)) {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}:{local}"),
        _ => local.to_string(),
    }
}

/// A parsed forecast response, rooted below the service's wrapper element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ForecastDocument {
    root: Element,
}

impl ForecastDocument {
    pub fn parse(xml: &str) -> Result<Self, YrError> {
        let doc = roxmltree::Document::parse(xml)?;
        let first = doc
            .root_element()
            .children()
            .find(|n| n.is_element())
            .ok_or(YrError::EmptyDocument)?;

        Ok(Self { root: Element::from_xml(first) })
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn into_root(self) -> Element {
        self.root
    }
}

impl std::ops::Deref for ForecastDocument {
    type Target = Element;

    fn deref(&self) -> &Element {
        &self.root
    }
}
