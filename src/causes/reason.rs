//! Reasons for reconciling a resource.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a resource-changing handler is being invoked.
///
/// Also exposed to handlers under the deprecated `event` kwarg alias, kept
/// for callers that predate the `reason` name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reason {
    /// The resource was just created.
    Create,
    /// The resource existed before the operator started; processing resumes.
    Resume,
    /// The resource changed.
    Update,
    /// The resource is being deleted.
    Delete,
}

impl Reason {
    /// Returns a short stable label (lowercase) for logs and kwargs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::Create => "create",
            Reason::Resume => "resume",
            Reason::Update => "update",
            Reason::Delete => "delete",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
