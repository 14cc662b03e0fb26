//! MOTD banner check : `native/banner/motd/banner` must equal the intent's
//! `motd_banner`. Absence at any depth observes as empty.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::intent::DeviceIntent;
use crate::session::{ResourceLocator, SessionFlavor};
use crate::state::attribute::{AssessAttribute, NATIVE_PATH, NATIVE_ROOT, Remediation};
use crate::state::compliance::{Assessment, CheckResult, Verdict};
use crate::state::lookup::lookup_str_or;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MotdBannerExpectedState {}

impl MotdBannerExpectedState {
    pub fn new() -> MotdBannerExpectedState {
        MotdBannerExpectedState {}
    }
}

impl AssessAttribute for MotdBannerExpectedState {
    fn attribute_name(&self) -> &'static str {
        "motd-banner"
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
        vec![NATIVE_ROOT, "banner", "motd"]
    }

    fn assess(&self, device: &str, intent: &DeviceIntent, state: &Value) -> Assessment {
        let mut assessment = Assessment::new();

        let expected = match &intent.motd_banner {
            Some(banner) => banner,
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

        let observed = lookup_str_or(state, &[NATIVE_ROOT, "banner", "motd", "banner"], "");

        let verdict = if observed == expected {
            Verdict::Passed
        } else {
            assessment.remediations.push(Remediation::SetMotdBanner {
                banner: expected.clone(),
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn intent_with_banner(banner: &str) -> DeviceIntent {
        DeviceIntent {
            motd_banner: Some(banner.to_string()),
            ..DeviceIntent::default()
        }
    }

    #[test]
    fn correct_banner_passes() {
        let state = json!({
            "Cisco-IOS-XE-native:native": {
                "banner": { "motd": { "banner": "Keep out" } }
            }
        });

        let assessment =
            MotdBannerExpectedState::new().assess("dist-rtr01", &intent_with_banner("Keep out"), &state);

        assert_eq!(assessment.results[0].verdict, Verdict::Passed);
        assert!(assessment.remediations.is_empty());
    }

    #[test]
    fn missing_banner_branch_fails_with_empty_observed() {
        let state = json!({ "Cisco-IOS-XE-native:native": {} });

        let assessment =
            MotdBannerExpectedState::new().assess("dist-rtr01", &intent_with_banner("Keep out"), &state);

        assert_eq!(assessment.results[0].observed, "");
        assert_eq!(assessment.results[0].verdict, Verdict::Failed);
        assert_eq!(
            assessment.remediations,
            vec![Remediation::SetMotdBanner {
                banner: "Keep out".to_string()
            }]
        );
    }

    #[test]
    fn wrong_banner_fails() {
        let state = json!({
            "Cisco-IOS-XE-native:native": {
                "banner": { "motd": { "banner": "welcome" } }
            }
        });

        let assessment =
            MotdBannerExpectedState::new().assess("dist-rtr01", &intent_with_banner("Keep out"), &state);

        assert_eq!(assessment.results[0].verdict, Verdict::Failed);
        assert_eq!(assessment.results[0].observed, "welcome");
    }
}
