//! Admin/oper status agreement : an interface whose operational status does
//! not match its administrative status is failing. Interfaces that expose no
//! admin-status are not assessed.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::intent::DeviceIntent;
use crate::session::{ResourceLocator, SessionFlavor};
use crate::state::attribute::interface::{interface_name, openconfig_interfaces};
use crate::state::attribute::{
    AssessAttribute, OPENCONFIG_INTERFACES_PATH, OPENCONFIG_INTERFACES_ROOT,
};
use crate::state::compliance::{Assessment, CheckResult, Verdict};
use crate::state::lookup::{lookup_str, lookup_str_or};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdminOperStatusExpectedState {}

impl AdminOperStatusExpectedState {
    pub fn new() -> AdminOperStatusExpectedState {
        AdminOperStatusExpectedState {}
    }
}

impl AssessAttribute for AdminOperStatusExpectedState {
    fn attribute_name(&self) -> &'static str {
        "admin-oper-status"
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
            let admin_status = match lookup_str(entry, &["state", "admin-status"]) {
                Some(admin_status) => admin_status,
                None => continue,
            };
            let oper_status = lookup_str_or(entry, &["state", "oper-status"], "");

            let verdict = if oper_status == admin_status {
                Verdict::Passed
            } else {
                Verdict::Failed
            };

            assessment.results.push(CheckResult::from(
                device,
                self.attribute_name(),
                interface_name(entry),
                oper_status,
                admin_status,
                verdict,
            ));
        }

        assessment
    }
}
