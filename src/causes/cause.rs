//! The cause hierarchy: one enum, three concrete variants, shared tier data.
//!
//! Tier data is composed, not duplicated: both watching and changing causes
//! embed a [`ResourceCause`], which carries the base-tier logger. Accessors
//! on [`Cause`] answer "does this cause satisfy tier T" for the kwargs
//! builder, which overlays tier fields in ancestor-to-descendant order.

use std::sync::Arc;

use serde_json::Value;

use crate::causes::{Activity, Body, Diff, DocView, Logger, Memo, Patch, Reason};

/// Shared handle to a cause.
pub type CauseRef = Arc<Cause>;

/// Cause of an operator lifecycle activity (startup, cleanup, ...).
#[derive(Clone, Debug)]
pub struct ActivityCause {
    /// Logger scoped to the activity.
    pub logger: Logger,
    /// Which activity is running.
    pub activity: Activity,
}

impl ActivityCause {
    /// Creates an activity cause with a logger scoped to the activity label.
    pub fn new(activity: Activity) -> Self {
        Self {
            logger: Logger::new(activity.as_str()),
            activity,
        }
    }
}

/// Resource tier: everything a handler needs to work on one object.
#[derive(Clone, Debug)]
pub struct ResourceCause {
    /// Logger carrying the object's coordinates.
    pub logger: Logger,
    /// Pending mutation, shared by all handlers of this invocation round.
    pub patch: Arc<Patch>,
    /// Per-resource user state.
    pub memo: Memo,
    /// Full resource document.
    pub body: Arc<Body>,
}

impl ResourceCause {
    /// Creates a resource cause with a fresh patch and memo.
    ///
    /// The logger is derived from the body's metadata coordinates.
    pub fn new(body: Arc<Body>) -> Self {
        let logger = Logger::for_resource(body.namespace(), body.name());
        Self {
            logger,
            patch: Arc::new(Patch::new()),
            memo: Memo::new(),
            body,
        }
    }

    /// Reuses an existing patch and memo (continuation of a handling round).
    pub fn with_state(body: Arc<Body>, patch: Arc<Patch>, memo: Memo) -> Self {
        let logger = Logger::for_resource(body.namespace(), body.name());
        Self {
            logger,
            patch,
            memo,
            body,
        }
    }

    /// View of the body's `spec` section.
    pub fn spec(&self) -> DocView {
        DocView::new(Arc::clone(&self.body), "spec")
    }

    /// View of the body's `metadata` section.
    pub fn meta(&self) -> DocView {
        DocView::new(Arc::clone(&self.body), "metadata")
    }

    /// View of the body's `status` section.
    pub fn status(&self) -> DocView {
        DocView::new(Arc::clone(&self.body), "status")
    }
}

/// Cause of a low-level watch-event delivery.
#[derive(Clone, Debug)]
pub struct ResourceWatchingCause {
    /// Resource tier data.
    pub resource: ResourceCause,
    /// The raw watch-event payload, exactly as received.
    pub raw: Value,
    /// The watch-event type string (`ADDED`, `MODIFIED`, ...), if present.
    pub event_type: Option<Arc<str>>,
}

impl ResourceWatchingCause {
    /// Builds a watching cause, extracting the event type from the payload.
    pub fn from_event(resource: ResourceCause, raw: Value) -> Self {
        let event_type = raw
            .get("type")
            .and_then(Value::as_str)
            .map(Arc::<str>::from);
        Self {
            resource,
            raw,
            event_type,
        }
    }
}

/// Cause of a high-level resource change (create/resume/update/delete).
#[derive(Clone, Debug)]
pub struct ResourceChangingCause {
    /// Resource tier data.
    pub resource: ResourceCause,
    /// Why the resource is being reconciled.
    pub reason: Reason,
    /// Field-level changes between the snapshots.
    pub diff: Diff,
    /// Prior snapshot (`None` on creation).
    pub old: Option<Arc<Body>>,
    /// Current snapshot (`None` on deletion).
    pub new: Option<Arc<Body>>,
}

/// Why a handler is being invoked. One concrete variant per cause value.
#[derive(Clone, Debug)]
pub enum Cause {
    /// Operator lifecycle activity.
    Activity(ActivityCause),
    /// Raw watch-event delivery.
    ResourceWatching(ResourceWatchingCause),
    /// High-level resource change.
    ResourceChanging(ResourceChangingCause),
}

impl Cause {
    /// Base tier: every cause carries a logger.
    pub fn logger(&self) -> &Logger {
        match self {
            Cause::Activity(cause) => &cause.logger,
            Cause::ResourceWatching(cause) => &cause.resource.logger,
            Cause::ResourceChanging(cause) => &cause.resource.logger,
        }
    }

    /// Activity tier, if this cause is one.
    pub fn activity(&self) -> Option<Activity> {
        match self {
            Cause::Activity(cause) => Some(cause.activity),
            _ => None,
        }
    }

    /// Resource tier, if this cause carries one.
    pub fn resource(&self) -> Option<&ResourceCause> {
        match self {
            Cause::Activity(_) => None,
            Cause::ResourceWatching(cause) => Some(&cause.resource),
            Cause::ResourceChanging(cause) => Some(&cause.resource),
        }
    }

    /// Watching tier, if this cause is one.
    pub fn watching(&self) -> Option<&ResourceWatchingCause> {
        match self {
            Cause::ResourceWatching(cause) => Some(cause),
            _ => None,
        }
    }

    /// Changing tier, if this cause is one.
    pub fn changing(&self) -> Option<&ResourceChangingCause> {
        match self {
            Cause::ResourceChanging(cause) => Some(cause),
            _ => None,
        }
    }
}

impl From<ActivityCause> for Cause {
    fn from(cause: ActivityCause) -> Self {
        Cause::Activity(cause)
    }
}

impl From<ResourceWatchingCause> for Cause {
    fn from(cause: ResourceWatchingCause) -> Self {
        Cause::ResourceWatching(cause)
    }
}

impl From<ResourceChangingCause> for Cause {
    fn from(cause: ResourceChangingCause) -> Self {
        Cause::ResourceChanging(cause)
    }
}
