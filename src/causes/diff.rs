//! Structured change descriptions for resource-changing causes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of change at one field path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffOp {
    /// The field appeared.
    Add,
    /// The field's value changed.
    Change,
    /// The field disappeared.
    Remove,
}

/// One changed field: operation, path, and both sides of the change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiffItem {
    /// What happened at this path.
    pub op: DiffOp,
    /// Key path from the document root.
    pub field: Vec<String>,
    /// Value before the change (`None` for additions).
    pub old: Option<Value>,
    /// Value after the change (`None` for removals).
    pub new: Option<Value>,
}

impl DiffItem {
    /// Creates a diff item for an added field.
    pub fn added(field: Vec<String>, new: Value) -> Self {
        Self {
            op: DiffOp::Add,
            field,
            old: None,
            new: Some(new),
        }
    }

    /// Creates a diff item for a changed field.
    pub fn changed(field: Vec<String>, old: Value, new: Value) -> Self {
        Self {
            op: DiffOp::Change,
            field,
            old: Some(old),
            new: Some(new),
        }
    }

    /// Creates a diff item for a removed field.
    pub fn removed(field: Vec<String>, old: Value) -> Self {
        Self {
            op: DiffOp::Remove,
            field,
            old: Some(old),
            new: None,
        }
    }
}

/// Ordered list of changed fields between two resource snapshots.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diff {
    items: Vec<DiffItem>,
}

impl Diff {
    /// Creates an empty diff.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one item.
    pub fn push(&mut self, item: DiffItem) {
        self.items.push(item);
    }

    /// Iterates the items in order.
    pub fn iter(&self) -> std::slice::Iter<'_, DiffItem> {
        self.items.iter()
    }

    /// Number of changed fields.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if nothing changed.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<DiffItem> for Diff {
    fn from_iter<I: IntoIterator<Item = DiffItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Diff {
    type Item = &'a DiffItem;
    type IntoIter = std::slice::Iter<'a, DiffItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
