//! # Netconform
//!
//! A reconciliation loop for network device configuration : fetch the
//! observed state, compare it to the declared intent, report every check as a
//! pass/fail table, push corrective changes for the failures (at most once),
//! then re-fetch and retest so the report shows whether the fleet converged.
//!
//! # Most basic example : reconcile one router over RESTCONF
//! ```rust
//!use netconform::prelude::*;
//!
//!fn main() {
//!
//!    // First we declare what the expected state of the devices is.
//!    let my_intent = "---
//!devices:
//!  dist-rtr01:
//!    domain_name: example.com
//!    motd_banner: Unauthorized access prohibited
//!    interfaces:
//!      - name: GigabitEthernet0/1
//!        description: uplink to core
//!      - name: Loopback100
//!        ";
//!    let intent_source = IntentSource::from_yaml_str(my_intent).unwrap();
//!
//!    // Then we open a session towards the device...
//!    let session = RestconfSession::from(
//!        "https://10.10.20.48",
//!        RestconfCredentials::from("developer", "C1sco12345"),
//!    )
//!    .accept_invalid_certs(true);
//!
//!    // ... and wrap it into a managed device.
//!    let mut my_devices = vec![ManagedDevice::new("dist-rtr01", session)];
//!
//!    // We can finally run the whole check catalog against the fleet.
//!    let reporter = Reporter::new("JSON");
//!    let run_report = reconcile_fleet(
//!        &mut my_devices,
//!        &intent_source,
//!        &Attribute::standard_catalog(),
//!        &reporter,
//!    );
//!
//!    // Non-zero when any check is still failing after remediation.
//!    std::process::exit(run_report.exit_code());
//!}
//! ```

pub mod error;
pub mod intent;
pub mod managed_device;
pub mod prelude;
pub mod report;
pub mod session;
pub mod state;
