//! RESTCONF transport over HTTPS, blocking. YANG data is exchanged as JSON.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde_json::Value;
use tracing::debug;

use crate::error::Error;
use crate::session::{
    ApplyMethod, ApplyOutcome, ChangeRequest, DeviceSession, ResourceLocator, SessionFlavor,
};

const YANG_JSON: &str = "application/yang-data+json";

#[derive(Debug, Clone)]
pub struct RestconfCredentials {
    pub username: String,
    pub password: String,
}

impl RestconfCredentials {
    pub fn from(username: &str, password: &str) -> RestconfCredentials {
        RestconfCredentials {
            username: username.to_string(),
            password: password.to_string(),
        }
    }
}

/// One HTTPS session towards one device's RESTCONF endpoint.
pub struct RestconfSession {
    base_url: String,
    credentials: RestconfCredentials,
    timeout: Duration,
    accept_invalid_certs: bool,
    client: Option<Client>,
}

impl RestconfSession {
    pub fn from(base_url: &str, credentials: RestconfCredentials) -> RestconfSession {
        RestconfSession {
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            timeout: Duration::from_secs(30),
            accept_invalid_certs: false,
            client: None,
        }
    }

    /// A hung fetch would otherwise block the device's checks indefinitely.
    pub fn with_timeout(mut self, timeout: Duration) -> RestconfSession {
        self.timeout = timeout;
        self
    }

    /// Lab devices commonly present self-signed certificates.
    pub fn accept_invalid_certs(mut self, setting: bool) -> RestconfSession {
        self.accept_invalid_certs = setting;
        self
    }

    fn client(&self) -> Result<&Client, Error> {
        self.client.as_ref().ok_or(Error::NotConnectedToDevice)
    }

    fn url_for(&self, locator: &ResourceLocator) -> Result<String, Error> {
        match locator {
            ResourceLocator::Restconf(path) => Ok(format!("{}{}", self.base_url, path)),
            ResourceLocator::Cli(command) => Err(Error::WrongLocatorFlavor(format!(
                "RESTCONF session cannot handle CLI locator '{}'",
                command
            ))),
        }
    }
}

impl DeviceSession for RestconfSession {
    fn connect(&mut self) -> Result<(), Error> {
        let client = Client::builder()
            .timeout(self.timeout)
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .build()
            .map_err(|error_detail| Error::FailedInitialization(format!("{}", error_detail)))?;

        // Probe the datastore root so total loss of connectivity surfaces at
        // session-setup time rather than mid-run.
        let probe_url = format!("{}/restconf/data", self.base_url);
        let response = client
            .get(&probe_url)
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .header("Accept", YANG_JSON)
            .send()
            .map_err(|error_detail| Error::TransportFailure(format!("{}", error_detail)))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(Error::FailedInitialization(
                "RESTCONF authentication refused".to_string(),
            ));
        }

        self.client = Some(client);
        Ok(())
    }

    fn is_connected(&mut self) -> bool {
        self.client.is_some()
    }

    fn disconnect(&mut self) -> Result<(), Error> {
        self.client = None;
        Ok(())
    }

    fn flavor(&self) -> SessionFlavor {
        SessionFlavor::Restconf
    }

    fn fetch(&mut self, locator: &ResourceLocator) -> Result<Value, Error> {
        let url = self.url_for(locator)?;
        let response = self
            .client()?
            .get(&url)
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .header("Accept", YANG_JSON)
            .send()
            .map_err(|error_detail| Error::TransportFailure(format!("{}", error_detail)))?;

        debug!("GET {} -> {}", url, response.status());

        if !response.status().is_success() {
            return Err(Error::TransportFailure(format!(
                "GET {} returned {}",
                url,
                response.status()
            )));
        }

        response
            .json::<Value>()
            .map_err(|error_detail| Error::FailureToParseContent(format!("{}", error_detail)))
    }

    fn apply(&mut self, change: &ChangeRequest) -> Result<ApplyOutcome, Error> {
        let url = self.url_for(&change.locator)?;
        let client = self.client()?;

        let request = match change.method {
            ApplyMethod::Replace => client.put(&url),
            ApplyMethod::Merge => client.patch(&url),
        };

        let response = request
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .header("Content-Type", YANG_JSON)
            .header("Accept", YANG_JSON)
            .json(&change.payload)
            .send()
            .map_err(|error_detail| Error::TransportFailure(format!("{}", error_detail)))?;

        let status = response.status();
        debug!("{:?} {} -> {}", change.method, url, status);

        if status.is_success() {
            Ok(ApplyOutcome::Success)
        } else {
            let body = response.text().unwrap_or_default();
            Ok(ApplyOutcome::Failure(format!(
                "{} returned {} : {}",
                url, status, body
            )))
        }
    }
}
