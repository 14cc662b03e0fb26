//! The generic reconciliation driver : one device, one ordered list of
//! attribute checks, each run through fetch / assess / remediate-once /
//! re-fetch / diff / retest with an explicit per-check context.

use rayon::prelude::*;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::Error;
use crate::intent::{DeviceIntent, IntentSource};
use crate::report::Reporter;
use crate::report::snapshot::SnapshotPhase;
use crate::session::{ApplyOutcome, DeviceSession, ResourceLocator};
use crate::state::attribute::{AssessAttribute, Attribute, Remediation};
use crate::state::compliance::{AttributeReport, DeviceReport, RemediationRecord, RunReport};
use crate::state::diff::structural_diff;
use crate::state::lookup::subtree;

pub struct ManagedDevice<Session>
where
    Session: DeviceSession,
{
    name: String,
    pub session: Session,
}

/// Everything one check carries between its pipeline stages. Passed
/// explicitly so no stage relies on shared mutable fields.
struct CheckContext {
    locator: ResourceLocator,
    pre_state: Value,
    remediations: Vec<Remediation>,
}

impl<Session: DeviceSession> ManagedDevice<Session> {
    pub fn new(name: &str, session: Session) -> ManagedDevice<Session> {
        ManagedDevice {
            name: name.to_string(),
            session,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn connect(&mut self) -> Result<(), Error> {
        self.session.connect()
    }

    pub fn is_connected(&mut self) -> bool {
        self.session.is_connected()
    }

    pub fn disconnect(&mut self) -> Result<(), Error> {
        self.session.disconnect()
    }

    /// Dry run : fetch and compare every check, no corrective change is
    /// pushed. A transport failure aborts this device's assessment.
    pub fn assess_compliance(
        &mut self,
        intent: &DeviceIntent,
        checks: &[Attribute],
    ) -> Result<DeviceReport, Error> {
        if !self.is_connected() {
            return Err(Error::NotConnectedToDevice);
        }

        let mut report = DeviceReport::new(&self.name);

        for check in checks {
            let locator = check.fetch_locator(self.session.flavor());
            let state = self.session.fetch(&locator)?;
            report.attributes.push(AttributeReport {
                attribute: check.attribute_name().to_string(),
                results: check.assess(&self.name, intent, &state).results,
                remediation: None,
            });
        }

        Ok(report)
    }

    /// Full reconciliation : assess each check in declared order and push the
    /// corrective changes for the ones that failed, at most once each. A
    /// transport failure is fatal for this device's remaining checks but is
    /// captured in the report rather than propagated.
    pub fn reconcile(
        &mut self,
        intent: &DeviceIntent,
        checks: &[Attribute],
        reporter: &Reporter,
    ) -> DeviceReport {
        let mut report = DeviceReport::new(&self.name);

        if !self.is_connected() {
            report.fatal = Some(Error::NotConnectedToDevice.to_string());
            return report;
        }

        for check in checks {
            match self.run_check(check, intent, reporter) {
                Ok(attribute_report) => report.attributes.push(attribute_report),
                Err(error_detail) => {
                    warn!(
                        "{} : abandoning remaining checks : {}",
                        self.name, error_detail
                    );
                    report.fatal = Some(format!("{}", error_detail));
                    break;
                }
            }
        }

        report
    }

    fn run_check(
        &mut self,
        check: &Attribute,
        intent: &DeviceIntent,
        reporter: &Reporter,
    ) -> Result<AttributeReport, Error> {
        let locator = check.fetch_locator(self.session.flavor());

        // Every check re-fetches : state reflects this point in the sequence,
        // including effects of earlier remediations in the same run.
        let pre_state = self.session.fetch(&locator)?;
        let assessment = check.assess(&self.name, intent, &pre_state);
        reporter.log_results(
            &format!("{} : {}", self.name, check.attribute_name()),
            &assessment.results,
        );

        if assessment.remediations.is_empty() {
            return Ok(AttributeReport {
                attribute: check.attribute_name().to_string(),
                results: assessment.results,
                remediation: None,
            });
        }

        let context = CheckContext {
            locator,
            pre_state,
            remediations: assessment.remediations,
        };
        let record = self.remediate_once(check, intent, context, reporter)?;

        Ok(AttributeReport {
            attribute: check.attribute_name().to_string(),
            results: assessment.results,
            remediation: Some(record),
        })
    }

    /// The single bounded remediation attempt : one apply pass, one re-fetch,
    /// one re-comparison. The retest outcome is reported but never triggers a
    /// second attempt, even if still failing.
    fn remediate_once(
        &mut self,
        check: &Attribute,
        intent: &DeviceIntent,
        context: CheckContext,
        reporter: &Reporter,
    ) -> Result<RemediationRecord, Error> {
        let model = check.model_label();
        let scope = check.diff_scope();

        reporter.write_snapshot(&self.name, model, SnapshotPhase::Pre, &context.pre_state)?;
        let pre_scope = subtree(&context.pre_state, &scope);

        let flavor = self.session.flavor();
        let mut actions_taken: Vec<(Remediation, ApplyOutcome)> = Vec::new();
        let mut apply_error: Option<String> = None;

        for remediation in &context.remediations {
            let change = remediation.change_for(flavor);
            info!("{} : applying : {}", self.name, remediation.display());

            let outcome = self.session.apply(&change)?;
            if let ApplyOutcome::Failure(detail) = &outcome {
                warn!("{} : apply refused : {}", self.name, detail);
                apply_error = Some(Error::ApplyFailure(detail.clone()).to_string());
            }
            actions_taken.push((remediation.clone(), outcome));

            // A refused apply ends the pass. No retry.
            if apply_error.is_some() {
                break;
            }
        }

        let post_state = self.session.fetch(&context.locator)?;
        reporter.write_snapshot(&self.name, model, SnapshotPhase::Post, &post_state)?;

        let post_scope = subtree(&post_state, &scope);
        let entries = structural_diff(&pre_scope, &post_scope);
        reporter.log_diff(&self.name, check.attribute_name(), &entries);

        let mut retest = check.assess(&self.name, intent, &post_state);
        if let Some(detail) = &apply_error {
            for result in retest.results.iter_mut() {
                if result.is_failed() {
                    result.apply_error = Some(detail.clone());
                }
            }
        }
        reporter.log_results(
            &format!("{} : {} (retest)", self.name, check.attribute_name()),
            &retest.results,
        );

        Ok(RemediationRecord {
            actions_taken,
            pre_snapshot: pre_scope,
            post_snapshot: post_scope,
            structural_diff: entries,
            retest_results: retest.results,
        })
    }

}

/// Reconcile a set of independent devices in parallel. Each device owns its
/// session, snapshots and report slice; a device-fatal error never aborts the
/// other devices.
pub fn reconcile_fleet<Session>(
    devices: &mut [ManagedDevice<Session>],
    intent_source: &IntentSource,
    checks: &[Attribute],
    reporter: &Reporter,
) -> RunReport
where
    Session: DeviceSession + Send,
{
    let mut run_report = RunReport::new();
    info!("starting compliance run {}", run_report.run_id);

    run_report.devices = devices
        .par_iter_mut()
        .map(|device| {
            let intent = intent_source
                .device(device.name())
                .cloned()
                .unwrap_or_default();

            if let Err(error_detail) = device.connect() {
                let mut report = DeviceReport::new(device.name());
                report.fatal = Some(format!("{}", error_detail));
                return report;
            }

            let report = device.reconcile(&intent, checks, reporter);

            if let Err(error_detail) = device.disconnect() {
                warn!("{} : disconnect failed : {}", device.name(), error_detail);
            }

            report
        })
        .collect();

    run_report
}
