//! Generic ordered configuration tree
//!
//! A `ConfigTree` node holds an optional scalar value and an ordered list of
//! keyed children; keys may repeat. JSON and XML documents are loaded into
//! this shape before rules are compiled from it.

use crate::core::error::{LogxxError, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Key under which XML-sourced trees keep element attributes.
pub const XML_ATTR_KEY: &str = "<xmlattr>";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigTree {
    value: Option<String>,
    children: Vec<(String, ConfigTree)>,
}

impl ConfigTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// A childless node carrying `value`.
    pub fn leaf(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            children: Vec::new(),
        }
    }

    /// Builder-style append of a child node.
    #[must_use]
    pub fn child(mut self, key: impl Into<String>, node: ConfigTree) -> Self {
        self.push(key, node);
        self
    }

    /// Builder-style append of a leaf child.
    #[must_use]
    pub fn attr(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.child(key, ConfigTree::leaf(value))
    }

    pub fn push(&mut self, key: impl Into<String>, node: ConfigTree) {
        self.children.push((key.into(), node));
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn children(&self) -> impl Iterator<Item = (&str, &ConfigTree)> {
        self.children.iter().map(|(key, node)| (key.as_str(), node))
    }

    /// First child stored under `key`.
    pub fn get(&self, key: &str) -> Option<&ConfigTree> {
        self.children
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, node)| node)
    }

    /// Value of the first child stored under `key`.
    pub fn get_value(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ConfigTree::value)
    }

    /// Flatten every `<xmlattr>` group into ordinary children, in place of
    /// the group, so attributes and elements look the same to consumers.
    pub fn normalize(&self) -> ConfigTree {
        let mut normalized = ConfigTree {
            value: self.value.clone(),
            children: Vec::with_capacity(self.children.len()),
        };

        for (key, node) in &self.children {
            if key == XML_ATTR_KEY {
                for (attr_key, attr) in node.children() {
                    normalized.push(attr_key, attr.normalize());
                }
            } else {
                normalized.push(key.clone(), node.normalize());
            }
        }

        normalized
    }

    /// Build a tree from a JSON value.
    ///
    /// Object members keep document order. An array stored under a key
    /// becomes one sibling per element, all under that key; elements of a
    /// bare array are stored under the empty key.
    pub fn from_json_value(value: &Value) -> ConfigTree {
        match value {
            Value::Object(map) => {
                let mut tree = ConfigTree::new();
                for (key, member) in map {
                    match member {
                        Value::Array(items) => {
                            for item in items {
                                tree.push(key.clone(), Self::from_json_value(item));
                            }
                        }
                        other => tree.push(key.clone(), Self::from_json_value(other)),
                    }
                }
                tree
            }
            Value::Array(items) => {
                let mut tree = ConfigTree::new();
                for item in items {
                    tree.push("", Self::from_json_value(item));
                }
                tree
            }
            Value::String(s) => ConfigTree::leaf(s.clone()),
            Value::Number(n) => ConfigTree::leaf(n.to_string()),
            Value::Bool(b) => ConfigTree::leaf(b.to_string()),
            Value::Null => ConfigTree::new(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<ConfigTree> {
        let value: Value = serde_json::from_str(json)?;
        Ok(Self::from_json_value(&value).normalize())
    }

    /// Build a tree from an XML document.
    ///
    /// The document element becomes the root, so its attributes and child
    /// elements sit where a JSON document's top-level members would.
    /// Attributes are grouped under [`XML_ATTR_KEY`] before normalization;
    /// trimmed element text becomes the node value. Comments are ignored.
    pub fn from_xml_str(xml: &str) -> Result<ConfigTree> {
        let document = roxmltree::Document::parse(xml)?;
        Ok(Self::from_xml_element(document.root_element()).normalize())
    }

    fn from_xml_element(element: roxmltree::Node<'_, '_>) -> ConfigTree {
        let mut tree = ConfigTree::new();

        let mut attributes = ConfigTree::new();
        for attribute in element.attributes() {
            attributes.push(attribute.name(), ConfigTree::leaf(attribute.value()));
        }
        if !attributes.is_leaf() {
            tree.push(XML_ATTR_KEY, attributes);
        }

        let mut text = String::new();
        for child in element.children() {
            if child.is_element() {
                tree.push(child.tag_name().name(), Self::from_xml_element(child));
            } else if child.is_text() {
                text.push_str(child.text().unwrap_or(""));
            }
        }

        let text = text.trim();
        if !text.is_empty() {
            tree.value = Some(text.to_string());
        }
        tree
    }

    /// Load a configuration document: `.json` files as JSON, anything else
    /// as XML.
    pub fn load(path: impl AsRef<Path>) -> Result<ConfigTree> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let content = fs::read_to_string(path).map_err(|e| {
            LogxxError::io_operation(
                "reading configuration",
                path.display().to_string(),
                e,
            )
        })?;

        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_xml_str(&content)
        }
    }
}
