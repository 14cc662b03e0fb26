//! Interface description check against the OpenConfig interfaces model. A
//! configured interface with no `description` key observes as an empty
//! string, so a non-empty intended description always fails and remediates.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::intent::DeviceIntent;
use crate::session::{ResourceLocator, SessionFlavor};
use crate::state::attribute::interface::{interface_name, openconfig_interfaces};
use crate::state::attribute::{
    AssessAttribute, OPENCONFIG_INTERFACES_PATH, OPENCONFIG_INTERFACES_ROOT, Remediation,
};
use crate::state::compliance::{Assessment, CheckResult, Verdict};
use crate::state::lookup::lookup_str_or;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterfaceDescriptionExpectedState {}

impl InterfaceDescriptionExpectedState {
    pub fn new() -> InterfaceDescriptionExpectedState {
        InterfaceDescriptionExpectedState {}
    }
}

impl AssessAttribute for InterfaceDescriptionExpectedState {
    fn attribute_name(&self) -> &'static str {
        "interface-description"
    }

    fn model_label(&self) -> &'static str {
        "OpenConfig_Interfaces"
    }

    fn fetch_locator(&self, flavor: SessionFlavor) -> ResourceLocator {
        match flavor {
            SessionFlavor::Restconf => ResourceLocator::restconf(OPENCONFIG_INTERFACES_PATH),
            SessionFlavor::Cli => ResourceLocator::cli("show interfaces"),
        }
    }

    fn diff_scope(&self) -> Vec<&'static str> {
        vec![OPENCONFIG_INTERFACES_ROOT]
    }

    fn assess(&self, device: &str, intent: &DeviceIntent, state: &Value) -> Assessment {
        let mut assessment = Assessment::new();
        let interfaces = openconfig_interfaces(state);

        for intended in &intent.interfaces {
            let configured = interfaces
                .iter()
                .find(|entry| interface_name(entry) == intended.name);

            let entry = match configured {
                Some(entry) => entry,
                None => {
                    // Presence reconciliation owns this mismatch; here there
                    // is nothing to compare against.
                    assessment.results.push(CheckResult::from(
                        device,
                        self.attribute_name(),
                        &intended.name,
                        "(not configured)",
                        &intended.description,
                        Verdict::NotApplicable,
                    ));
                    continue;
                }
            };

            let observed = lookup_str_or(entry, &["config", "description"], "");

            let verdict = if observed == intended.description {
                Verdict::Passed
            } else {
                assessment
                    .remediations
                    .push(Remediation::SetInterfaceDescription {
                        interface: intended.name.clone(),
                        description: intended.description.clone(),
                    });
                Verdict::Failed
            };

            assessment.results.push(CheckResult::from(
                device,
                self.attribute_name(),
                &intended.name,
                observed,
                &intended.description,
                verdict,
            ));
        }

        assessment
    }
}
