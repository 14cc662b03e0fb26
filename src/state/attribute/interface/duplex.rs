//! Negotiated duplex mode check : every ethernet interface must run full
//! duplex. Interfaces without an ethernet branch (loopbacks, VLANs) produce
//! no row at all; an ethernet branch with no negotiated mode is N/A.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::intent::DeviceIntent;
use crate::session::{ResourceLocator, SessionFlavor};
use crate::state::attribute::interface::{interface_name, openconfig_interfaces};
use crate::state::attribute::{
    AssessAttribute, OPENCONFIG_INTERFACES_PATH, OPENCONFIG_INTERFACES_ROOT,
};
use crate::state::compliance::{Assessment, CheckResult, Verdict};
use crate::state::lookup::lookup_str;

const ETHERNET_BRANCH: &str = "openconfig-if-ethernet:ethernet";
const FULL_DUPLEX: &str = "FULL";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DuplexExpectedState {}

impl DuplexExpectedState {
    pub fn new() -> DuplexExpectedState {
        DuplexExpectedState {}
    }
}

impl AssessAttribute for DuplexExpectedState {
    fn attribute_name(&self) -> &'static str {
        "duplex-mode"
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

    fn assess(&self, device: &str, _intent: &DeviceIntent, state: &Value) -> Assessment {
        let mut assessment = Assessment::new();

        for entry in openconfig_interfaces(state) {
            if entry.get(ETHERNET_BRANCH).is_none() {
                continue;
            }
            let name = interface_name(entry);

            match lookup_str(entry, &[ETHERNET_BRANCH, "state", "negotiated-duplex-mode"]) {
                Some(observed) => {
                    let verdict = if observed == FULL_DUPLEX {
                        Verdict::Passed
                    } else {
                        Verdict::Failed
                    };
                    assessment.results.push(CheckResult::from(
                        device,
                        self.attribute_name(),
                        name,
                        observed,
                        FULL_DUPLEX,
                        verdict,
                    ));
                }
                None => {
                    assessment.results.push(CheckResult::from(
                        device,
                        self.attribute_name(),
                        name,
                        "N/A",
                        FULL_DUPLEX,
                        Verdict::NotApplicable,
                    ));
                }
            }
        }

        assessment
    }
}
