//! Intent Source : the externally declared desired configuration, keyed by
//! device name. Static for the duration of a run.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tera::{Context, Tera};

use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceIntent {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl InterfaceIntent {
    pub fn from(name: &str, description: &str) -> InterfaceIntent {
        InterfaceIntent {
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceIntent {
    pub domain_name: Option<String>,
    pub motd_banner: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<InterfaceIntent>,
}

impl DeviceIntent {
    pub fn interface(&self, name: &str) -> Option<&InterfaceIntent> {
        self.interfaces.iter().find(|intent| intent.name == name)
    }

    pub fn interface_names(&self) -> Vec<&str> {
        self.interfaces
            .iter()
            .map(|intent| intent.name.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IntentSource {
    pub devices: HashMap<String, DeviceIntent>,
}

impl IntentSource {
    pub fn new() -> IntentSource {
        IntentSource {
            devices: HashMap::new(),
        }
    }

    pub fn with_device(mut self, name: &str, intent: DeviceIntent) -> IntentSource {
        self.devices.insert(name.to_string(), intent);
        self
    }

    pub fn device(&self, name: &str) -> Option<&DeviceIntent> {
        self.devices.get(name)
    }

    pub fn from_yaml_str(raw: &str) -> Result<IntentSource, Error> {
        serde_yaml::from_str(raw)
            .map_err(|error_detail| Error::FailureToParseContent(format!("{}", error_detail)))
    }

    /// Render `{{ var }}` placeholders in the raw document before parsing it.
    pub fn from_yaml_str_with_vars(
        raw: &str,
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Result<IntentSource, Error> {
        let mut tera_context = Context::new();
        for (key, value) in vars {
            tera_context.insert(key, &value);
        }

        let rendered = Tera::one_off(raw, &tera_context, false)
            .map_err(|error_detail| Error::FailureToParseContent(format!("{}", error_detail)))?;

        IntentSource::from_yaml_str(&rendered)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<IntentSource, Error> {
        let raw = std::fs::read_to_string(path)
            .map_err(|error_detail| Error::FailureToParseContent(format!("{}", error_detail)))?;
        IntentSource::from_yaml_str(&raw)
    }
}
