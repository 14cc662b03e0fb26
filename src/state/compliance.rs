//! Verdicts, check results and the report structures accumulated over a run.

use chrono::{DateTime, Utc};
use nanoid::nanoid;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::session::ApplyOutcome;
use crate::state::attribute::Remediation;
use crate::state::diff::DiffEntry;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Verdict {
    Passed,
    Failed,
    Skipped,
    NotApplicable,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Passed => write!(f, "Passed"),
            Verdict::Failed => write!(f, "Failed"),
            Verdict::Skipped => write!(f, "Skipped"),
            Verdict::NotApplicable => write!(f, "N/A"),
        }
    }
}

/// One comparison of observed against expected. Immutable once created;
/// consumed by the Reporter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub device: String,
    pub attribute: String,
    pub subject: String,
    pub observed: String,
    pub expected: String,
    pub verdict: Verdict,
    pub apply_error: Option<String>,
}

impl CheckResult {
    pub fn from(
        device: &str,
        attribute: &str,
        subject: &str,
        observed: &str,
        expected: &str,
        verdict: Verdict,
    ) -> CheckResult {
        CheckResult {
            device: device.to_string(),
            attribute: attribute.to_string(),
            subject: subject.to_string(),
            observed: observed.to_string(),
            expected: expected.to_string(),
            verdict,
            apply_error: None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.verdict, Verdict::Failed)
    }
}

/// What one attribute plugin concluded from one state tree : results for the
/// report plus the corrective changes that would fix the failures.
#[derive(Debug, Clone)]
pub struct Assessment {
    pub results: Vec<CheckResult>,
    pub remediations: Vec<Remediation>,
}

impl Assessment {
    pub fn new() -> Assessment {
        Assessment {
            results: Vec::new(),
            remediations: Vec::new(),
        }
    }

    pub fn has_failures(&self) -> bool {
        self.results.iter().any(|result| result.is_failed())
    }
}

impl Default for Assessment {
    fn default() -> Assessment {
        Assessment::new()
    }
}

/// Audit record of the single remediation attempt made for one attribute.
/// Exists iff the triggering assessment failed and the plugin produced at
/// least one remediation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemediationRecord {
    pub actions_taken: Vec<(Remediation, ApplyOutcome)>,
    pub pre_snapshot: Value,
    pub post_snapshot: Value,
    pub structural_diff: Vec<DiffEntry>,
    pub retest_results: Vec<CheckResult>,
}

impl RemediationRecord {
    pub fn reached_compliance(&self) -> bool {
        self.actions_taken
            .iter()
            .all(|(_, outcome)| outcome.is_success())
            && !self.retest_results.iter().any(|result| result.is_failed())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeReport {
    pub attribute: String,
    pub results: Vec<CheckResult>,
    pub remediation: Option<RemediationRecord>,
}

impl AttributeReport {
    /// Final verdicts : the retest replaces the initial assessment when a
    /// remediation was attempted.
    pub fn final_results(&self) -> &[CheckResult] {
        match &self.remediation {
            Some(record) => &record.retest_results,
            None => &self.results,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.final_results().iter().any(|result| result.is_failed())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceReport {
    pub device: String,
    pub attributes: Vec<AttributeReport>,
    /// Set when a transport failure ended this device's run early. Other
    /// devices are unaffected.
    pub fatal: Option<String>,
}

impl DeviceReport {
    pub fn new(device: &str) -> DeviceReport {
        DeviceReport {
            device: device.to_string(),
            attributes: Vec::new(),
            fatal: None,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.fatal.is_some()
            || self
                .attributes
                .iter()
                .any(|attribute_report| attribute_report.has_failures())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub devices: Vec<DeviceReport>,
}

impl RunReport {
    pub fn new() -> RunReport {
        RunReport {
            run_id: nanoid!(10),
            started_at: Utc::now(),
            devices: Vec::new(),
        }
    }

    pub fn has_failures(&self) -> bool {
        self.devices.iter().any(|device| device.has_failures())
    }

    /// Non-zero iff any final check result is Failed or a device run was cut
    /// short.
    pub fn exit_code(&self) -> i32 {
        if self.has_failures() { 1 } else { 0 }
    }
}

impl Default for RunReport {
    fn default() -> RunReport {
        RunReport::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retest_results_supersede_the_initial_assessment() {
        let initial = CheckResult::from(
            "dist-rtr01",
            "domain-name",
            "system",
            "old.example.com",
            "example.com",
            Verdict::Failed,
        );
        let retest = CheckResult {
            observed: "example.com".to_string(),
            verdict: Verdict::Passed,
            ..initial.clone()
        };

        let report = AttributeReport {
            attribute: "domain-name".to_string(),
            results: vec![initial],
            remediation: Some(RemediationRecord {
                actions_taken: Vec::new(),
                pre_snapshot: Value::Null,
                post_snapshot: Value::Null,
                structural_diff: Vec::new(),
                retest_results: vec![retest],
            }),
        };

        assert!(!report.has_failures());
    }

    #[test]
    fn exit_code_is_nonzero_on_any_failure() {
        let mut run = RunReport::new();
        assert_eq!(run.exit_code(), 0);

        let mut device = DeviceReport::new("dist-rtr01");
        device.fatal = Some("unreachable".to_string());
        run.devices.push(device);
        assert_eq!(run.exit_code(), 1);
    }
}
