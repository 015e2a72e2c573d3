//! Resource documents and scoped views into them.
//!
//! A [`Body`] is the full resource document as received from the watch
//! stream: a nested string-keyed JSON mapping. [`DocView`] is a read-only
//! window into one fixed top-level section (`spec`, `metadata`, `status`),
//! handed to handlers so they address fields relative to the section.
//!
//! All metadata accessors are defensive: an absent field is `None`, never an
//! error, because watch payloads are not guaranteed to be well-formed.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Full resource document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Body {
    root: Value,
}

impl Body {
    /// Wraps a raw JSON document.
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    /// Returns the raw document.
    pub fn raw(&self) -> &Value {
        &self.root
    }

    /// Walks a key path through nested objects.
    pub fn get(&self, path: &[&str]) -> Option<&Value> {
        let mut current = &self.root;
        for key in path {
            current = current.get(*key)?;
        }
        Some(current)
    }

    /// Returns the `metadata` section, if present.
    pub fn metadata(&self) -> Option<&Value> {
        self.root.get("metadata")
    }

    /// Returns `metadata.uid`, if present.
    pub fn uid(&self) -> Option<&str> {
        self.metadata_str("uid")
    }

    /// Returns `metadata.name`, if present.
    pub fn name(&self) -> Option<&str> {
        self.metadata_str("name")
    }

    /// Returns `metadata.namespace`, if present (cluster-scoped objects have none).
    pub fn namespace(&self) -> Option<&str> {
        self.metadata_str("namespace")
    }

    /// Returns `metadata.labels`, if present.
    pub fn labels(&self) -> Option<&Map<String, Value>> {
        self.metadata()?.get("labels")?.as_object()
    }

    /// Returns `metadata.annotations`, if present.
    pub fn annotations(&self) -> Option<&Map<String, Value>> {
        self.metadata()?.get("annotations")?.as_object()
    }

    fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata()?.get(key)?.as_str()
    }
}

impl From<Value> for Body {
    fn from(root: Value) -> Self {
        Self::new(root)
    }
}

/// Read-only view into one top-level section of a [`Body`].
///
/// The view shares the body; it never copies the document. A missing section
/// behaves as an empty one.
#[derive(Clone, Debug)]
pub struct DocView {
    body: Arc<Body>,
    section: Arc<str>,
}

impl DocView {
    /// Creates a view scoped to `section` of `body`.
    pub fn new(body: Arc<Body>, section: impl Into<Arc<str>>) -> Self {
        Self {
            body,
            section: section.into(),
        }
    }

    /// The section key this view is scoped to.
    pub fn section(&self) -> &str {
        &self.section
    }

    /// The viewed subtree, if the section exists.
    pub fn root(&self) -> Option<&Value> {
        self.body.raw().get(self.section.as_ref())
    }

    /// Walks a key path relative to the section.
    pub fn get(&self, path: &[&str]) -> Option<&Value> {
        let mut current = self.root()?;
        for key in path {
            current = current.get(*key)?;
        }
        Some(current)
    }

    /// Clones the viewed subtree, or `Value::Null` if the section is absent.
    pub fn to_value(&self) -> Value {
        self.root().cloned().unwrap_or(Value::Null)
    }

    /// The body this view is scoped into.
    pub fn body(&self) -> &Arc<Body> {
        &self.body
    }
}
