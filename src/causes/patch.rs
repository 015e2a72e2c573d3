//! Pending mutation accumulated by handlers.
//!
//! A [`Patch`] is a shared JSON object that handlers fill in during an
//! invocation; the surrounding machinery applies it to the server afterwards.
//! The invocation core itself only passes the patch through. Interior
//! mutability lets every handler in a chain see and extend the same patch.

use parking_lot::Mutex;
use serde_json::{Map, Value};

/// Accumulated JSON merge fragment for one resource.
#[derive(Debug, Default)]
pub struct Patch {
    fields: Mutex<Map<String, Value>>,
}

impl Patch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a value at a nested key path, creating intermediate objects.
    ///
    /// A non-object value already sitting on the path is replaced; the last
    /// writer wins, as with the upstream merge-patch semantics.
    pub fn set(&self, path: &[&str], value: Value) {
        let Some((last, parents)) = path.split_last() else {
            return;
        };
        let mut guard = self.fields.lock();
        let mut cursor: &mut Map<String, Value> = &mut guard;
        for key in parents {
            let slot = cursor
                .entry((*key).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            match slot.as_object_mut() {
                Some(next) => cursor = next,
                None => return,
            }
        }
        cursor.insert((*last).to_string(), value);
    }

    /// Deep-merges an object fragment into the patch.
    ///
    /// Nested objects merge recursively; everything else (including `null`,
    /// which is the merge-patch deletion marker) overwrites.
    pub fn merge(&self, fragment: &Value) {
        if let Value::Object(fields) = fragment {
            let mut guard = self.fields.lock();
            merge_into(&mut guard, fields);
        }
    }

    /// True if no fields have been set.
    pub fn is_empty(&self) -> bool {
        self.fields.lock().is_empty()
    }

    /// Snapshots the patch as a JSON object value.
    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.lock().clone())
    }
}

fn merge_into(target: &mut Map<String, Value>, fields: &Map<String, Value>) {
    for (key, incoming) in fields {
        let merged = match target.get_mut(key) {
            Some(Value::Object(existing)) => {
                if let Value::Object(nested) = incoming {
                    merge_into(existing, nested);
                    true
                } else {
                    false
                }
            }
            _ => false,
        };
        if !merged {
            target.insert(key.clone(), incoming.clone());
        }
    }
}
