//! Attribute checks : each variant compares one property of observed device
//! state against the intent and, where a fix exists, produces the corrective
//! change. A single generic driver (`ManagedDevice::reconcile`) runs them all
//! the same way.

pub mod interface;
pub mod system;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::intent::DeviceIntent;
use crate::session::cli::split_interface_name;
use crate::session::{ApplyMethod, ChangeRequest, ResourceLocator, SessionFlavor};
use crate::state::attribute::interface::counters::CounterThresholdExpectedState;
use crate::state::attribute::interface::description::InterfaceDescriptionExpectedState;
use crate::state::attribute::interface::duplex::DuplexExpectedState;
use crate::state::attribute::interface::presence::InterfacePresenceExpectedState;
use crate::state::attribute::interface::status::AdminOperStatusExpectedState;
use crate::state::attribute::system::domain_name::DomainNameExpectedState;
use crate::state::attribute::system::motd_banner::MotdBannerExpectedState;
use crate::state::compliance::Assessment;

pub const NATIVE_PATH: &str = "/restconf/data/Cisco-IOS-XE-native:native";
pub const OPENCONFIG_INTERFACES_PATH: &str = "/restconf/data/openconfig-interfaces:interfaces";
pub const NATIVE_ROOT: &str = "Cisco-IOS-XE-native:native";
pub const OPENCONFIG_INTERFACES_ROOT: &str = "openconfig-interfaces:interfaces";

/// Contract every attribute plugin implements. Stateless across runs : the
/// same plugin value can assess any number of state trees.
pub trait AssessAttribute {
    fn attribute_name(&self) -> &'static str;

    /// Model label used in snapshot file names.
    fn model_label(&self) -> &'static str;

    /// Where to fetch the state this check reads over the given transport.
    fn fetch_locator(&self, flavor: SessionFlavor) -> ResourceLocator;

    /// Smallest sub-tree containing the checked attribute. Pre/post snapshots
    /// are diffed at this scope only, so diff output stays attributable to
    /// one check.
    fn diff_scope(&self) -> Vec<&'static str>;

    fn assess(&self, device: &str, intent: &DeviceIntent, state: &Value) -> Assessment;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Attribute {
    DomainName(DomainNameExpectedState),
    MotdBanner(MotdBannerExpectedState),
    InterfacePresence(InterfacePresenceExpectedState),
    InterfaceDescription(InterfaceDescriptionExpectedState),
    InterfaceCounter(CounterThresholdExpectedState),
    DuplexMode(DuplexExpectedState),
    AdminOperStatus(AdminOperStatusExpectedState),
}

impl AssessAttribute for Attribute {
    fn attribute_name(&self) -> &'static str {
        match self {
            Attribute::DomainName(check) => check.attribute_name(),
            Attribute::MotdBanner(check) => check.attribute_name(),
            Attribute::InterfacePresence(check) => check.attribute_name(),
            Attribute::InterfaceDescription(check) => check.attribute_name(),
            Attribute::InterfaceCounter(check) => check.attribute_name(),
            Attribute::DuplexMode(check) => check.attribute_name(),
            Attribute::AdminOperStatus(check) => check.attribute_name(),
        }
    }

    fn model_label(&self) -> &'static str {
        match self {
            Attribute::DomainName(check) => check.model_label(),
            Attribute::MotdBanner(check) => check.model_label(),
            Attribute::InterfacePresence(check) => check.model_label(),
            Attribute::InterfaceDescription(check) => check.model_label(),
            Attribute::InterfaceCounter(check) => check.model_label(),
            Attribute::DuplexMode(check) => check.model_label(),
            Attribute::AdminOperStatus(check) => check.model_label(),
        }
    }

    fn fetch_locator(&self, flavor: SessionFlavor) -> ResourceLocator {
        match self {
            Attribute::DomainName(check) => check.fetch_locator(flavor),
            Attribute::MotdBanner(check) => check.fetch_locator(flavor),
            Attribute::InterfacePresence(check) => check.fetch_locator(flavor),
            Attribute::InterfaceDescription(check) => check.fetch_locator(flavor),
            Attribute::InterfaceCounter(check) => check.fetch_locator(flavor),
            Attribute::DuplexMode(check) => check.fetch_locator(flavor),
            Attribute::AdminOperStatus(check) => check.fetch_locator(flavor),
        }
    }

    fn diff_scope(&self) -> Vec<&'static str> {
        match self {
            Attribute::DomainName(check) => check.diff_scope(),
            Attribute::MotdBanner(check) => check.diff_scope(),
            Attribute::InterfacePresence(check) => check.diff_scope(),
            Attribute::InterfaceDescription(check) => check.diff_scope(),
            Attribute::InterfaceCounter(check) => check.diff_scope(),
            Attribute::DuplexMode(check) => check.diff_scope(),
            Attribute::AdminOperStatus(check) => check.diff_scope(),
        }
    }

    fn assess(&self, device: &str, intent: &DeviceIntent, state: &Value) -> Assessment {
        match self {
            Attribute::DomainName(check) => check.assess(device, intent, state),
            Attribute::MotdBanner(check) => check.assess(device, intent, state),
            Attribute::InterfacePresence(check) => check.assess(device, intent, state),
            Attribute::InterfaceDescription(check) => check.assess(device, intent, state),
            Attribute::InterfaceCounter(check) => check.assess(device, intent, state),
            Attribute::DuplexMode(check) => check.assess(device, intent, state),
            Attribute::AdminOperStatus(check) => check.assess(device, intent, state),
        }
    }
}

impl Attribute {
    /// The full catalog in the order the original compliance suite ran it.
    pub fn standard_catalog() -> Vec<Attribute> {
        use crate::state::attribute::interface::counters::CounterKind;

        let mut catalog = vec![
            Attribute::MotdBanner(MotdBannerExpectedState::new()),
            Attribute::DomainName(DomainNameExpectedState::new()),
            Attribute::InterfacePresence(InterfacePresenceExpectedState::new()),
            Attribute::InterfaceDescription(InterfaceDescriptionExpectedState::new()),
        ];
        for kind in CounterKind::all() {
            catalog.push(Attribute::InterfaceCounter(
                CounterThresholdExpectedState::new(kind),
            ));
        }
        catalog.push(Attribute::DuplexMode(DuplexExpectedState::new()));
        catalog.push(Attribute::AdminOperStatus(AdminOperStatusExpectedState::new()));
        catalog
    }
}

/// A semantic corrective change. Rendering to a transport-specific
/// `ChangeRequest` is deferred until the driver knows which session flavor it
/// is talking to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Remediation {
    SetDomainName { domain: String },
    SetMotdBanner { banner: String },
    CreateInterface { interface: String },
    SetInterfaceDescription { interface: String, description: String },
}

impl Remediation {
    pub fn display(&self) -> String {
        match self {
            Remediation::SetDomainName { domain } => {
                format!("Set domain name to '{}'", domain)
            }
            Remediation::SetMotdBanner { banner } => {
                format!("Set MOTD banner to '{}'", banner)
            }
            Remediation::CreateInterface { interface } => {
                format!("Create interface {}", interface)
            }
            Remediation::SetInterfaceDescription {
                interface,
                description,
            } => {
                format!("Set {} description to '{}'", interface, description)
            }
        }
    }

    pub fn change_for(&self, flavor: SessionFlavor) -> ChangeRequest {
        match flavor {
            SessionFlavor::Restconf => self.restconf_change(),
            SessionFlavor::Cli => self.cli_change(),
        }
    }

    fn restconf_change(&self) -> ChangeRequest {
        match self {
            Remediation::SetDomainName { domain } => ChangeRequest {
                locator: ResourceLocator::restconf(
                    "/restconf/data/Cisco-IOS-XE-native:native/ip/domain/name",
                ),
                method: ApplyMethod::Replace,
                payload: json!({ "Cisco-IOS-XE-native:name": domain }),
            },
            Remediation::SetMotdBanner { banner } => ChangeRequest {
                locator: ResourceLocator::restconf(
                    "/restconf/data/Cisco-IOS-XE-native:native/banner/motd/banner",
                ),
                method: ApplyMethod::Replace,
                payload: json!({ "Cisco-IOS-XE-native:banner": banner }),
            },
            // Sent without checking whether the interface appeared in the
            // meantime : a creation racing this patch is not guarded.
            Remediation::CreateInterface { interface } => {
                let (kind, number) = split_interface_name(interface);
                let mut by_kind = serde_json::Map::new();
                by_kind.insert(kind.to_string(), json!([ { "name": number } ]));
                ChangeRequest {
                    locator: ResourceLocator::restconf(
                        "/restconf/data/Cisco-IOS-XE-native:native/interface",
                    ),
                    method: ApplyMethod::Merge,
                    payload: json!({ "Cisco-IOS-XE-native:interface": by_kind }),
                }
            }
            Remediation::SetInterfaceDescription {
                interface,
                description,
            } => ChangeRequest {
                locator: ResourceLocator::restconf(&format!(
                    "/restconf/data/openconfig-interfaces:interfaces/interface={}/config/description",
                    interface
                )),
                method: ApplyMethod::Replace,
                payload: json!({ "openconfig-interfaces:description": description }),
            },
        }
    }

    fn cli_change(&self) -> ChangeRequest {
        let commands = match self {
            Remediation::SetDomainName { domain } => format!("ip domain name {}", domain),
            Remediation::SetMotdBanner { banner } => format!("banner motd #{}#", banner),
            Remediation::CreateInterface { interface } => format!("interface {}", interface),
            Remediation::SetInterfaceDescription {
                interface,
                description,
            } => format!("interface {}\n description {}", interface, description),
        };
        ChangeRequest {
            locator: ResourceLocator::cli(&commands),
            method: ApplyMethod::Merge,
            payload: Value::Null,
        }
    }
}
