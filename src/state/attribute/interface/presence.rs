//! Interface presence reconciliation, checked in both directions
//! independently : an interface is "extra" when configured but absent from
//! the intent, "missing" when intended but not configured. Missing interfaces
//! are remediated by a creation patch; extra interfaces are only reported.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::intent::DeviceIntent;
use crate::session::{ResourceLocator, SessionFlavor};
use crate::state::attribute::interface::configured_native_interfaces;
use crate::state::attribute::{AssessAttribute, NATIVE_PATH, NATIVE_ROOT, Remediation};
use crate::state::compliance::{Assessment, CheckResult, Verdict};

pub const CONFIGURED_IN_INTENT: &str = "configured-in-intent";
pub const INTENDED_IN_CONFIG: &str = "intended-in-config";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterfacePresenceExpectedState {}

impl InterfacePresenceExpectedState {
    pub fn new() -> InterfacePresenceExpectedState {
        InterfacePresenceExpectedState {}
    }
}

impl AssessAttribute for InterfacePresenceExpectedState {
    fn attribute_name(&self) -> &'static str {
        "interface-presence"
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
        vec![NATIVE_ROOT, "interface"]
    }

    fn assess(&self, device: &str, intent: &DeviceIntent, state: &Value) -> Assessment {
        let mut assessment = Assessment::new();

        let configured = configured_native_interfaces(state);
        let intended = intent.interface_names();

        // Direction 1 : everything configured must appear in the intent.
        for interface in &configured {
            let verdict = if intended.contains(&interface.as_str()) {
                Verdict::Passed
            } else {
                Verdict::Failed
            };
            assessment.results.push(CheckResult::from(
                device,
                CONFIGURED_IN_INTENT,
                interface,
                "configured",
                "in intent",
                verdict,
            ));
        }

        // Direction 2 : everything intended must be configured. Missing ones
        // get a creation remediation.
        for interface in &intended {
            let verdict = if configured.iter().any(|name| name == interface) {
                Verdict::Passed
            } else {
                assessment.remediations.push(Remediation::CreateInterface {
                    interface: interface.to_string(),
                });
                Verdict::Failed
            };
            assessment.results.push(CheckResult::from(
                device,
                INTENDED_IN_CONFIG,
                interface,
                if verdict == Verdict::Passed {
                    "configured"
                } else {
                    "not configured"
                },
                "configured",
                verdict,
            ));
        }

        assessment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::InterfaceIntent;
    use serde_json::json;

    fn intent_with_interfaces(names: &[&str]) -> DeviceIntent {
        DeviceIntent {
            interfaces: names
                .iter()
                .map(|name| InterfaceIntent::from(name, ""))
                .collect(),
            ..DeviceIntent::default()
        }
    }

    fn state_with_gigabit(numbers: &[&str]) -> Value {
        let entries: Vec<Value> = numbers.iter().map(|number| json!({ "name": number })).collect();
        json!({
            "Cisco-IOS-XE-native:native": {
                "interface": { "GigabitEthernet": entries }
            }
        })
    }

    fn failed_subjects(assessment: &Assessment, direction: &str) -> Vec<String> {
        assessment
            .results
            .iter()
            .filter(|result| result.attribute == direction && result.is_failed())
            .map(|result| result.subject.clone())
            .collect()
    }

    #[test]
    fn interface_in_both_sets_appears_in_neither_failure_set() {
        let state = state_with_gigabit(&["0/1"]);
        let intent = intent_with_interfaces(&["GigabitEthernet0/1"]);

        let assessment = InterfacePresenceExpectedState::new().assess("dist-rtr01", &intent, &state);

        assert!(failed_subjects(&assessment, CONFIGURED_IN_INTENT).is_empty());
        assert!(failed_subjects(&assessment, INTENDED_IN_CONFIG).is_empty());
        assert!(assessment.remediations.is_empty());
    }

    #[test]
    fn missing_interface_fails_one_direction_and_remediates() {
        let state = state_with_gigabit(&["0/1"]);
        let intent = intent_with_interfaces(&["GigabitEthernet0/1", "GigabitEthernet0/2"]);

        let assessment = InterfacePresenceExpectedState::new().assess("dist-rtr01", &intent, &state);

        assert!(failed_subjects(&assessment, CONFIGURED_IN_INTENT).is_empty());
        assert_eq!(
            failed_subjects(&assessment, INTENDED_IN_CONFIG),
            vec!["GigabitEthernet0/2"]
        );
        assert_eq!(
            assessment.remediations,
            vec![Remediation::CreateInterface {
                interface: "GigabitEthernet0/2".to_string()
            }]
        );
    }

    #[test]
    fn extra_interface_fails_the_other_direction_without_remediation() {
        let state = state_with_gigabit(&["0/1", "0/9"]);
        let intent = intent_with_interfaces(&["GigabitEthernet0/1"]);

        let assessment = InterfacePresenceExpectedState::new().assess("dist-rtr01", &intent, &state);

        assert_eq!(
            failed_subjects(&assessment, CONFIGURED_IN_INTENT),
            vec!["GigabitEthernet0/9"]
        );
        assert!(failed_subjects(&assessment, INTENDED_IN_CONFIG).is_empty());
        assert!(assessment.remediations.is_empty());
    }
}
