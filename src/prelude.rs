pub use crate::error::Error;
pub use crate::intent::{DeviceIntent, IntentSource, InterfaceIntent};
pub use crate::managed_device::{ManagedDevice, reconcile_fleet};
pub use crate::report::Reporter;
pub use crate::report::snapshot::SnapshotPhase;
pub use crate::session::cli::{CliAuthMode, CliSession};
pub use crate::session::restconf::{RestconfCredentials, RestconfSession};
pub use crate::session::{
    ApplyMethod, ApplyOutcome, ChangeRequest, DeviceSession, ResourceLocator, SessionFlavor,
};
pub use crate::state::attribute::{AssessAttribute, Attribute, Remediation};
pub use crate::state::compliance::{
    Assessment, AttributeReport, CheckResult, DeviceReport, RemediationRecord, RunReport, Verdict,
};
pub use crate::state::diff::{DiffEntry, structural_diff};
