//! Scripted in-memory session used by the crate's own tests. Fetches are
//! served from a queue and applies are recorded, so tests can assert on the
//! exact fetch/apply sequence the reconciliation driver produces.

use std::collections::VecDeque;

use serde_json::Value;

use crate::error::Error;
use crate::session::{
    ApplyOutcome, ChangeRequest, DeviceSession, ResourceLocator, SessionFlavor,
};

pub(crate) struct MockSession {
    fetch_queue: VecDeque<Value>,
    pub fetch_count: usize,
    pub fetched_locators: Vec<ResourceLocator>,
    pub applied_changes: Vec<ChangeRequest>,
    pub apply_outcome: ApplyOutcome,
    flavor: SessionFlavor,
    connected: bool,
}

impl MockSession {
    pub(crate) fn with_fetches(fetches: Vec<Value>) -> MockSession {
        MockSession {
            fetch_queue: fetches.into(),
            fetch_count: 0,
            fetched_locators: Vec::new(),
            applied_changes: Vec::new(),
            apply_outcome: ApplyOutcome::Success,
            flavor: SessionFlavor::Restconf,
            connected: false,
        }
    }

    pub(crate) fn failing_applies(mut self, detail: &str) -> MockSession {
        self.apply_outcome = ApplyOutcome::Failure(detail.to_string());
        self
    }

    pub(crate) fn with_flavor(mut self, flavor: SessionFlavor) -> MockSession {
        self.flavor = flavor;
        self
    }
}

impl DeviceSession for MockSession {
    fn connect(&mut self) -> Result<(), Error> {
        self.connected = true;
        Ok(())
    }

    fn is_connected(&mut self) -> bool {
        self.connected
    }

    fn disconnect(&mut self) -> Result<(), Error> {
        self.connected = false;
        Ok(())
    }

    fn flavor(&self) -> SessionFlavor {
        self.flavor
    }

    fn fetch(&mut self, locator: &ResourceLocator) -> Result<Value, Error> {
        self.fetch_count += 1;
        self.fetched_locators.push(locator.clone());
        self.fetch_queue
            .pop_front()
            .ok_or_else(|| Error::TransportFailure("mock fetch queue exhausted".to_string()))
    }

    fn apply(&mut self, change: &ChangeRequest) -> Result<ApplyOutcome, Error> {
        self.applied_changes.push(change.clone());
        Ok(self.apply_outcome.clone())
    }
}
