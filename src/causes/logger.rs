//! Per-cause logger bound to a tracing span.
//!
//! Every cause carries a [`Logger`] so that handlers log with the resource
//! or activity coordinates already attached, without threading identifiers
//! through every call.

use std::fmt;

use tracing::Span;

/// A cheap, clonable logger scoped to one invocation subject.
///
/// Wraps a [`tracing::Span`]; the convenience methods emit events inside the
/// span so subscribers see the subject fields on every record.
#[derive(Clone, Debug)]
pub struct Logger {
    span: Span,
}

impl Logger {
    /// Creates a logger with a free-form scope label.
    pub fn new(scope: &str) -> Self {
        Self {
            span: tracing::info_span!("handler", %scope),
        }
    }

    /// Creates a logger carrying resource coordinates.
    ///
    /// Cluster-scoped objects have no namespace; unnamed objects can occur
    /// in admission flows. Both render as `-` rather than being omitted.
    pub fn for_resource(namespace: Option<&str>, name: Option<&str>) -> Self {
        let namespace = namespace.unwrap_or("-");
        let name = name.unwrap_or("-");
        Self {
            span: tracing::info_span!("resource", %namespace, %name),
        }
    }

    /// Returns the underlying span, e.g. to instrument handler futures.
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Emits a debug-level event inside the logger's span.
    pub fn debug(&self, message: impl fmt::Display) {
        let _guard = self.span.enter();
        tracing::debug!("{}", message);
    }

    /// Emits an info-level event inside the logger's span.
    pub fn info(&self, message: impl fmt::Display) {
        let _guard = self.span.enter();
        tracing::info!("{}", message);
    }

    /// Emits a warn-level event inside the logger's span.
    pub fn warn(&self, message: impl fmt::Display) {
        let _guard = self.span.enter();
        tracing::warn!("{}", message);
    }

    /// Emits an error-level event inside the logger's span.
    pub fn error(&self, message: impl fmt::Display) {
        let _guard = self.span.enter();
        tracing::error!("{}", message);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new("handler")
    }
}
