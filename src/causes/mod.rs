//! # Causes: typed context describing why a handler runs.
//!
//! A cause is produced upstream (by the watching/reconciliation machinery)
//! and only read here. The hierarchy is strictly additive:
//!
//! ```text
//! base tier          logger
//!   ├─ Activity      + activity
//!   └─ resource tier + patch, memo, body (spec/meta/status views, uid/name/namespace)
//!        ├─ ResourceWatching  + raw event payload, event type
//!        └─ ResourceChanging  + reason, diff, old/new snapshots
//! ```
//!
//! Exactly one concrete variant is active per [`Cause`] value; tier accessors
//! ([`Cause::resource`], [`Cause::watching`], ...) express the "satisfies
//! tier" checks the kwargs builder overlays on.

mod activity;
mod body;
mod cause;
mod diff;
mod logger;
mod memo;
mod patch;
mod reason;

pub use activity::Activity;
pub use body::{Body, DocView};
pub use cause::{
    ActivityCause, Cause, CauseRef, ResourceCause, ResourceChangingCause, ResourceWatchingCause,
};
pub use diff::{Diff, DiffItem, DiffOp};
pub use logger::Logger;
pub use memo::Memo;
pub use patch::Patch;
pub use reason::Reason;
