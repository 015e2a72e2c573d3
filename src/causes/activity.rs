//! Lifecycle activities that trigger activity handlers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A lifecycle activity of the operator process itself.
///
/// Unlike resource-driven invocations, activities are not tied to any object;
/// their causes carry only the base tier plus this discriminator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activity {
    /// The operator is starting up.
    Startup,
    /// Credentials are being (re-)acquired.
    Authentication,
    /// A liveness probe is being served.
    Probe,
    /// The operator is shutting down.
    Cleanup,
}

impl Activity {
    /// Returns a short stable label (lowercase) for logs and kwargs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Activity::Startup => "startup",
            Activity::Authentication => "authentication",
            Activity::Probe => "probe",
            Activity::Cleanup => "cleanup",
        }
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
