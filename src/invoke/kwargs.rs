//! # Keyword-argument maps and the cause overlay.
//!
//! Handlers receive one [`Kwargs`] map per invocation. The map starts from
//! the caller's explicit kwargs and is enriched by [`build_kwargs`] with
//! aliases derived from the cause, tier by tier. Later overlays win over
//! earlier ones and over explicit keys: cause-derived aliases take
//! precedence so handlers cannot be fed stale data under the same name.
//!
//! Handlers tolerate unknown keys by construction: they look up only the
//! keys they use, which keeps them forward-compatible with new aliases.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::causes::{
    Activity, Body, CauseRef, Diff, DocView, Logger, Memo, Patch, Reason,
};

/// A typed keyword-argument value.
///
/// The union of everything a cause can contribute, plus free-form JSON and
/// text for caller-supplied kwargs.
#[derive(Clone, Debug)]
pub enum ArgValue {
    /// The whole cause (`cause`).
    Cause(CauseRef),
    /// The cause's logger (`logger`).
    Logger(Logger),
    /// Lifecycle activity (`activity`).
    Activity(Activity),
    /// Reconciliation reason (`reason`, and the deprecated `event` alias).
    Reason(Reason),
    /// Shared pending mutation (`patch`).
    Patch(Arc<Patch>),
    /// Per-resource user state (`memo`).
    Memo(Memo),
    /// Full resource document (`body`).
    Body(Arc<Body>),
    /// Scoped view into the body (`spec`, `meta`, `status`).
    View(DocView),
    /// Prior/current resource snapshot (`old`, `new`); `None` inside means
    /// the snapshot does not exist (creation has no `old`, deletion no `new`).
    Snapshot(Option<Arc<Body>>),
    /// Field-level changes (`diff`).
    Diff(Diff),
    /// Free-form JSON, e.g. the raw watch payload (`event` on watching causes).
    Json(Value),
    /// Short text such as `type`, or caller-supplied strings.
    Text(Arc<str>),
    /// Present-but-absent: the key applies but the source field is missing
    /// (e.g. `namespace` of a cluster-scoped object).
    Null,
}

impl ArgValue {
    /// True for [`ArgValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, ArgValue::Null)
    }

    /// Text content, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ArgValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// JSON content, if this is a JSON value.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ArgValue::Json(value) => Some(value),
            _ => None,
        }
    }

    /// The cause, if this is the `cause` value.
    pub fn as_cause(&self) -> Option<&CauseRef> {
        match self {
            ArgValue::Cause(cause) => Some(cause),
            _ => None,
        }
    }

    /// The logger, if this is the `logger` value.
    pub fn as_logger(&self) -> Option<&Logger> {
        match self {
            ArgValue::Logger(logger) => Some(logger),
            _ => None,
        }
    }

    /// The activity, if this is an activity value.
    pub fn as_activity(&self) -> Option<Activity> {
        match self {
            ArgValue::Activity(activity) => Some(*activity),
            _ => None,
        }
    }

    /// The reason, if this is a reason value.
    pub fn as_reason(&self) -> Option<Reason> {
        match self {
            ArgValue::Reason(reason) => Some(*reason),
            _ => None,
        }
    }

    /// The patch, if this is the `patch` value.
    pub fn as_patch(&self) -> Option<&Arc<Patch>> {
        match self {
            ArgValue::Patch(patch) => Some(patch),
            _ => None,
        }
    }

    /// The memo, if this is the `memo` value.
    pub fn as_memo(&self) -> Option<&Memo> {
        match self {
            ArgValue::Memo(memo) => Some(memo),
            _ => None,
        }
    }

    /// The body, if this is the `body` value.
    pub fn as_body(&self) -> Option<&Arc<Body>> {
        match self {
            ArgValue::Body(body) => Some(body),
            _ => None,
        }
    }

    /// The view, if this is a `spec`/`meta`/`status` value.
    pub fn as_view(&self) -> Option<&DocView> {
        match self {
            ArgValue::View(view) => Some(view),
            _ => None,
        }
    }

    /// The snapshot, if this is an `old`/`new` value.
    pub fn as_snapshot(&self) -> Option<&Option<Arc<Body>>> {
        match self {
            ArgValue::Snapshot(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    /// The diff, if this is the `diff` value.
    pub fn as_diff(&self) -> Option<&Diff> {
        match self {
            ArgValue::Diff(diff) => Some(diff),
            _ => None,
        }
    }
}

impl From<Value> for ArgValue {
    fn from(value: Value) -> Self {
        ArgValue::Json(value)
    }
}

impl From<&str> for ArgValue {
    fn from(text: &str) -> Self {
        ArgValue::Text(Arc::from(text))
    }
}

/// Ordered keyword-argument map passed to handlers.
#[derive(Clone, Debug, Default)]
pub struct Kwargs {
    entries: BTreeMap<String, ArgValue>,
}

impl Kwargs {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, returning the previous one under the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: ArgValue) -> Option<ArgValue> {
        self.entries.insert(key.into(), value)
    }

    /// Looks up a value by key.
    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.entries.get(key)
    }

    /// True if the key is present (even as [`ArgValue::Null`]).
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Overlays `other` onto this map; `other` wins on key collisions.
    pub fn merge(&mut self, other: Kwargs) {
        self.entries.extend(other.entries);
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Iterates keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl FromIterator<(String, ArgValue)> for Kwargs {
    fn from_iter<I: IntoIterator<Item = (String, ArgValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Kwargs {
    type Item = (String, ArgValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, ArgValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Expands explicit kwargs with aliases derived from the cause.
///
/// Overlays are applied in tier order (base, activity, resource, watching,
/// changing), so descendant tiers win. On changing causes the deprecated
/// `event` alias carries the reason and overwrites the watching-tier `event`
/// key; the two tiers are structurally exclusive here, but the overlay order
/// is kept regardless.
///
/// A `None` cause yields a copy of `explicit`, unchanged.
pub fn build_kwargs(cause: Option<&CauseRef>, explicit: &Kwargs) -> Kwargs {
    let mut kwargs = explicit.clone();
    let Some(cause) = cause else {
        return kwargs;
    };

    kwargs.insert("cause", ArgValue::Cause(Arc::clone(cause)));
    kwargs.insert("logger", ArgValue::Logger(cause.logger().clone()));

    if let Some(activity) = cause.activity() {
        kwargs.insert("activity", ArgValue::Activity(activity));
    }

    if let Some(resource) = cause.resource() {
        kwargs.insert("patch", ArgValue::Patch(Arc::clone(&resource.patch)));
        kwargs.insert("memo", ArgValue::Memo(resource.memo.clone()));
        kwargs.insert("body", ArgValue::Body(Arc::clone(&resource.body)));
        kwargs.insert("spec", ArgValue::View(resource.spec()));
        kwargs.insert("meta", ArgValue::View(resource.meta()));
        kwargs.insert("status", ArgValue::View(resource.status()));
        kwargs.insert("uid", text_or_null(resource.body.uid()));
        kwargs.insert("name", text_or_null(resource.body.name()));
        kwargs.insert("namespace", text_or_null(resource.body.namespace()));
    }

    if let Some(watching) = cause.watching() {
        kwargs.insert("event", ArgValue::Json(watching.raw.clone()));
        let event_type = match &watching.event_type {
            Some(event_type) => ArgValue::Text(Arc::clone(event_type)),
            None => ArgValue::Null,
        };
        kwargs.insert("type", event_type);
    }

    if let Some(changing) = cause.changing() {
        // Deprecated alias; kept for handlers that predate `reason`.
        kwargs.insert("event", ArgValue::Reason(changing.reason));
        kwargs.insert("reason", ArgValue::Reason(changing.reason));
        kwargs.insert("diff", ArgValue::Diff(changing.diff.clone()));
        kwargs.insert("old", ArgValue::Snapshot(changing.old.clone()));
        kwargs.insert("new", ArgValue::Snapshot(changing.new.clone()));
    }

    kwargs
}

fn text_or_null(text: Option<&str>) -> ArgValue {
    match text {
        Some(text) => ArgValue::Text(Arc::from(text)),
        None => ArgValue::Null,
    }
}
