//! Counter threshold checks over the OpenConfig interfaces model. One plugin
//! instance per counter kind, threshold 0 : any non-zero count is a failure.
//! An interface with no such counter at all is reported as N/A, never Failed.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::intent::DeviceIntent;
use crate::session::{ResourceLocator, SessionFlavor};
use crate::state::attribute::interface::{interface_name, openconfig_interfaces};
use crate::state::attribute::{
    AssessAttribute, OPENCONFIG_INTERFACES_PATH, OPENCONFIG_INTERFACES_ROOT,
};
use crate::state::compliance::{Assessment, CheckResult, Verdict};
use crate::state::lookup::lookup_u64;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CounterKind {
    InDiscards,
    InErrors,
    InFcsErrors,
    InUnknownProtos,
    OutDiscards,
    OutErrors,
}

impl CounterKind {
    pub fn all() -> [CounterKind; 6] {
        [
            CounterKind::InDiscards,
            CounterKind::InErrors,
            CounterKind::InFcsErrors,
            CounterKind::InUnknownProtos,
            CounterKind::OutDiscards,
            CounterKind::OutErrors,
        ]
    }

    pub fn yang_key(&self) -> &'static str {
        match self {
            CounterKind::InDiscards => "in-discards",
            CounterKind::InErrors => "in-errors",
            CounterKind::InFcsErrors => "in-fcs-errors",
            CounterKind::InUnknownProtos => "in-unknown-protos",
            CounterKind::OutDiscards => "out-discards",
            CounterKind::OutErrors => "out-errors",
        }
    }

    fn check_name(&self) -> &'static str {
        match self {
            CounterKind::InDiscards => "counter-in-discards",
            CounterKind::InErrors => "counter-in-errors",
            CounterKind::InFcsErrors => "counter-in-fcs-errors",
            CounterKind::InUnknownProtos => "counter-in-unknown-protos",
            CounterKind::OutDiscards => "counter-out-discards",
            CounterKind::OutErrors => "counter-out-errors",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CounterThresholdExpectedState {
    pub counter: CounterKind,
    #[serde(default)]
    pub threshold: u64,
}

impl CounterThresholdExpectedState {
    pub fn new(counter: CounterKind) -> CounterThresholdExpectedState {
        CounterThresholdExpectedState {
            counter,
            threshold: 0,
        }
    }
}

impl AssessAttribute for CounterThresholdExpectedState {
    fn attribute_name(&self) -> &'static str {
        self.counter.check_name()
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
        let expected = format!("<= {}", self.threshold);

        for entry in openconfig_interfaces(state) {
            let name = interface_name(entry);

            match lookup_u64(entry, &["state", "counters", self.counter.yang_key()]) {
                Some(observed) => {
                    let verdict = if observed > self.threshold {
                        Verdict::Failed
                    } else {
                        Verdict::Passed
                    };
                    assessment.results.push(CheckResult::from(
                        device,
                        self.attribute_name(),
                        name,
                        &observed.to_string(),
                        &expected,
                        verdict,
                    ));
                }
                None => {
                    assessment.results.push(CheckResult::from(
                        device,
                        self.attribute_name(),
                        name,
                        "N/A",
                        &expected,
                        Verdict::NotApplicable,
                    ));
                }
            }
        }

        assessment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn assess(state: &Value) -> Assessment {
        CounterThresholdExpectedState::new(CounterKind::InDiscards).assess(
            "dist-rtr01",
            &DeviceIntent::default(),
            state,
        )
    }

    #[test]
    fn zero_counter_passes_and_nonzero_fails() {
        let state = json!({
            "openconfig-interfaces:interfaces": {
                "interface": [
                    { "name": "Gi0/1", "state": { "counters": { "in-discards": 0 } } },
                    { "name": "Gi0/2", "state": { "counters": { "in-discards": 12 } } }
                ]
            }
        });

        let assessment = assess(&state);

        assert_eq!(assessment.results[0].verdict, Verdict::Passed);
        assert_eq!(assessment.results[1].verdict, Verdict::Failed);
        assert_eq!(assessment.results[1].observed, "12");
        // counter checks never remediate
        assert!(assessment.remediations.is_empty());
    }

    #[test]
    fn absent_counter_is_not_applicable_never_failed() {
        let state = json!({
            "openconfig-interfaces:interfaces": {
                "interface": [
                    { "name": "Null0", "state": { "counters": {} } },
                    { "name": "Vlan1", "state": {} }
                ]
            }
        });

        let assessment = assess(&state);

        for result in &assessment.results {
            assert_eq!(result.verdict, Verdict::NotApplicable);
        }
    }

    #[test]
    fn string_encoded_counters_are_compared_numerically() {
        let state = json!({
            "openconfig-interfaces:interfaces": {
                "interface": [
                    { "name": "Gi0/1", "state": { "counters": { "in-discards": "42" } } }
                ]
            }
        });

        let assessment = assess(&state);
        assert_eq!(assessment.results[0].verdict, Verdict::Failed);
    }
}
