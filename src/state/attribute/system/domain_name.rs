//! Domain name check : `native/ip/domain/name` must equal the intent's
//! `domain_name`. A missing path observes as empty, so any intended domain on
//! an unconfigured device fails and triggers a remediation PUT.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::intent::DeviceIntent;
use crate::session::{ResourceLocator, SessionFlavor};
use crate::state::attribute::{AssessAttribute, NATIVE_PATH, NATIVE_ROOT, Remediation};
use crate::state::compliance::{Assessment, CheckResult, Verdict};
use crate::state::lookup::lookup_str_or;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DomainNameExpectedState {}

impl DomainNameExpectedState {
    pub fn new() -> DomainNameExpectedState {
        DomainNameExpectedState {}
    }
}

impl AssessAttribute for DomainNameExpectedState {
    fn attribute_name(&self) -> &'static str {
        "domain-name"
    }

    fn model_label(&self) -> &'static str {
        "Cisco_IOS_XE_Native"
    }

    fn fetch_locator(&self, flavor: SessionFlavor) -> ResourceLocator {
        match flavor {
            SessionFlavor::Restconf => ResourceLocator::restconf(NATIVE_PATH),
            SessionFlavor::Cli => ResourceLocator::cli("show running-config"),
        }
    }

    fn diff_scope(&self) -> Vec<&'static str> {
        vec![NATIVE_ROOT, "ip", "domain"]
    }

    fn assess(&self, device: &str, intent: &DeviceIntent, state: &Value) -> Assessment {
        let mut assessment = Assessment::new();

        let expected = match &intent.domain_name {
            Some(domain) => domain,
            None => {
                assessment.results.push(CheckResult::from(
                    device,
                    self.attribute_name(),
                    "system",
                    "",
                    "(no intent)",
                    Verdict::Skipped,
                ));
                return assessment;
            }
        };

        let observed = lookup_str_or(state, &[NATIVE_ROOT, "ip", "domain", "name"], "");

        let verdict = if observed == expected {
            Verdict::Passed
        } else {
            assessment.remediations.push(Remediation::SetDomainName {
                domain: expected.clone(),
            });
            Verdict::Failed
        };

        assessment.results.push(CheckResult::from(
            device,
            self.attribute_name(),
            "system",
            observed,
            expected,
            verdict,
        ));
        assessment
    }
}
