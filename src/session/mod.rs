//! Device Session collaborator : everything the reconciliation loop needs to
//! know about a transport is `fetch` and `apply` over a locator the session
//! understands.

pub mod cli;
pub mod restconf;

#[cfg(test)]
pub(crate) mod mock;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

/// Either a hierarchical RESTCONF path or an opaque CLI command string.
/// The reconciliation loop never looks inside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ResourceLocator {
    Restconf(String),
    Cli(String),
}

impl ResourceLocator {
    pub fn restconf(path: &str) -> ResourceLocator {
        ResourceLocator::Restconf(path.to_string())
    }

    pub fn cli(command: &str) -> ResourceLocator {
        ResourceLocator::Cli(command.to_string())
    }
}

impl std::fmt::Display for ResourceLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceLocator::Restconf(path) => write!(f, "{}", path),
            ResourceLocator::Cli(command) => write!(f, "{}", command),
        }
    }
}

/// How an apply payload is merged into device state. `Replace` maps to a
/// RESTCONF PUT, `Merge` to a PATCH. CLI sessions ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ApplyMethod {
    Replace,
    Merge,
}

/// A fully rendered corrective change, ready to be handed to a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRequest {
    pub locator: ResourceLocator,
    pub method: ApplyMethod,
    pub payload: Value,
}

/// Outcome of one apply. A refused change (bad payload, rejected config line)
/// is a `Failure`, not an `Error` : the loop keeps the check as Failed and
/// moves on without retrying.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ApplyOutcome {
    Success,
    Failure(String),
}

impl ApplyOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ApplyOutcome::Success)
    }
}

/// Which transport a session speaks, so remediations can render themselves
/// into the matching `ChangeRequest`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SessionFlavor {
    Restconf,
    Cli,
}

pub trait DeviceSession {
    fn connect(&mut self) -> Result<(), Error>;

    fn is_connected(&mut self) -> bool;

    fn disconnect(&mut self) -> Result<(), Error>;

    fn flavor(&self) -> SessionFlavor;

    /// Fetch the state tree behind a locator. Always reflects device state as
    /// of this point in the sequence, including any prior apply in the run.
    fn fetch(&mut self, locator: &ResourceLocator) -> Result<Value, Error>;

    /// Push one corrective change. No pre-condition check is performed on the
    /// device before sending.
    fn apply(&mut self, change: &ChangeRequest) -> Result<ApplyOutcome, Error>;
}
