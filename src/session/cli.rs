//! CLI transport over SSHv2. Device state is "learned" : command output is
//! parsed into the same native-shaped tree the RESTCONF transport returns, so
//! one set of extractors serves both transports.

use std::io::{Read, Write};
use std::net::TcpStream;
use std::path::PathBuf;
use std::time::Duration;

use serde_json::{Map, Value, json};
use ssh2::Session;
use tracing::debug;

use crate::error::Error;
use crate::session::{
    ApplyOutcome, ChangeRequest, DeviceSession, ResourceLocator, SessionFlavor,
};

#[derive(Debug, Clone, PartialEq)]
pub enum CliAuthMode {
    UsernamePassword(String, String),
    KeyFile(String, PathBuf),
}

pub struct CmdResult {
    pub rc: i32,
    pub stdout: String,
}

/// One SSH session towards one device.
pub struct CliSession {
    endpoint: String,
    authmode: CliAuthMode,
    timeout: Duration,
    sshsession: Option<Session>,
}

impl CliSession {
    pub fn from(endpoint: &str, authmode: CliAuthMode) -> CliSession {
        CliSession {
            endpoint: endpoint.to_string(),
            authmode,
            timeout: Duration::from_secs(30),
            sshsession: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> CliSession {
        self.timeout = timeout;
        self
    }

    fn session(&self) -> Result<&Session, Error> {
        self.sshsession.as_ref().ok_or(Error::NotConnectedToDevice)
    }

    pub fn run_command(&self, command: &str) -> Result<CmdResult, Error> {
        let session = self.session()?;
        let mut channel = session
            .channel_session()
            .map_err(|error_detail| Error::TransportFailure(format!("{}", error_detail)))?;

        channel
            .exec(command)
            .map_err(|error_detail| Error::TransportFailure(format!("{}", error_detail)))?;

        let mut stdout = String::new();
        channel
            .read_to_string(&mut stdout)
            .map_err(|error_detail| Error::TransportFailure(format!("{}", error_detail)))?;
        channel
            .wait_close()
            .map_err(|error_detail| Error::TransportFailure(format!("{}", error_detail)))?;

        let rc = channel
            .exit_status()
            .map_err(|error_detail| Error::TransportFailure(format!("{}", error_detail)))?;

        Ok(CmdResult { rc, stdout })
    }

    /// Network operating systems expect configuration through an interactive
    /// shell rather than one exec per line.
    fn run_config_commands(&self, commands: &str) -> Result<ApplyOutcome, Error> {
        let session = self.session()?;
        let mut channel = session
            .channel_session()
            .map_err(|error_detail| Error::TransportFailure(format!("{}", error_detail)))?;

        channel
            .shell()
            .map_err(|error_detail| Error::TransportFailure(format!("{}", error_detail)))?;

        let script = format!("configure terminal\n{}\nend\nexit\n", commands.trim());
        channel
            .write_all(script.as_bytes())
            .map_err(|error_detail| Error::TransportFailure(format!("{}", error_detail)))?;
        channel
            .send_eof()
            .map_err(|error_detail| Error::TransportFailure(format!("{}", error_detail)))?;

        let mut echoed = String::new();
        channel
            .read_to_string(&mut echoed)
            .map_err(|error_detail| Error::TransportFailure(format!("{}", error_detail)))?;
        channel
            .wait_close()
            .map_err(|error_detail| Error::TransportFailure(format!("{}", error_detail)))?;

        debug!("config session output : {}", echoed);

        if echoed.contains("% Invalid input") {
            Ok(ApplyOutcome::Failure(format!(
                "device rejected configuration : {}",
                echoed
            )))
        } else {
            Ok(ApplyOutcome::Success)
        }
    }
}

impl DeviceSession for CliSession {
    fn connect(&mut self) -> Result<(), Error> {
        if self.sshsession.is_some() {
            return Ok(());
        }

        // "address" or "address:port"
        let (address, port) = match self.endpoint.split_once(':') {
            Some((address, port)) => {
                let port: u16 = port.parse().map_err(|error_detail| {
                    Error::FailedInitialization(format!(
                        "failure to parse given port : {}",
                        error_detail
                    ))
                })?;
                (address, port)
            }
            None => (self.endpoint.as_str(), 22),
        };

        let tcp = TcpStream::connect(format!("{}:{}", address, port))
            .map_err(|error_detail| Error::TransportFailure(format!("{:?}", error_detail)))?;

        let mut session = Session::new()
            .map_err(|error_detail| Error::FailedInitialization(format!("{}", error_detail)))?;
        session.set_tcp_stream(tcp);
        session.set_timeout(self.timeout.as_millis() as u32);
        session
            .handshake()
            .map_err(|error_detail| Error::FailedInitialization(format!("{:?}", error_detail)))?;

        match &self.authmode {
            CliAuthMode::UsernamePassword(username, password) => {
                session
                    .userauth_password(username, password)
                    .map_err(|error_detail| {
                        Error::FailedInitialization(format!("{}", error_detail))
                    })?;
            }
            CliAuthMode::KeyFile(username, private_key_path) => {
                session
                    .userauth_pubkey_file(username, None, private_key_path, None)
                    .map_err(|error_detail| {
                        Error::FailedInitialization(format!("{}", error_detail))
                    })?;
            }
        }

        if !session.authenticated() {
            return Err(Error::FailedInitialization(
                "SSH authentication failed".to_string(),
            ));
        }

        self.sshsession = Some(session);
        Ok(())
    }

    fn is_connected(&mut self) -> bool {
        self.sshsession.is_some()
    }

    fn disconnect(&mut self) -> Result<(), Error> {
        self.sshsession = None;
        Ok(())
    }

    fn flavor(&self) -> SessionFlavor {
        SessionFlavor::Cli
    }

    fn fetch(&mut self, locator: &ResourceLocator) -> Result<Value, Error> {
        let command = match locator {
            ResourceLocator::Cli(command) => command,
            ResourceLocator::Restconf(path) => {
                return Err(Error::WrongLocatorFlavor(format!(
                    "CLI session cannot handle RESTCONF locator '{}'",
                    path
                )));
            }
        };

        let cmd_result = self.run_command(command)?;

        if command.contains("running-config") {
            Ok(native_tree_from_running_config(&cmd_result.stdout))
        } else if command.contains("show interfaces") {
            Ok(openconfig_tree_from_show_interfaces(&cmd_result.stdout))
        } else {
            // Unrecognized commands come back as raw output for the caller to
            // interpret.
            Ok(Value::String(cmd_result.stdout))
        }
    }

    fn apply(&mut self, change: &ChangeRequest) -> Result<ApplyOutcome, Error> {
        match &change.locator {
            ResourceLocator::Cli(commands) => self.run_config_commands(commands),
            ResourceLocator::Restconf(path) => Err(Error::WrongLocatorFlavor(format!(
                "CLI session cannot handle RESTCONF locator '{}'",
                path
            ))),
        }
    }
}

/// Parse `show running-config` output into the shape of the
/// `Cisco-IOS-XE-native:native` RESTCONF tree, covering the branches the
/// check catalog reads : domain name, MOTD banner and the interface tree.
pub fn native_tree_from_running_config(raw: &str) -> Value {
    let mut native = Map::new();
    let mut interfaces: Map<String, Value> = Map::new();

    let lines: Vec<&str> = raw.lines().collect();
    let mut index = 0;

    while index < lines.len() {
        let line = lines[index];
        let trimmed = line.trim_end();

        if let Some(domain) = trimmed.strip_prefix("ip domain name ") {
            native.insert(
                "ip".to_string(),
                json!({ "domain": { "name": domain.trim() } }),
            );
        } else if let Some(rest) = trimmed.strip_prefix("banner motd ") {
            let (banner, consumed) = read_banner(rest, &lines[index + 1..]);
            native.insert(
                "banner".to_string(),
                json!({ "motd": { "banner": banner } }),
            );
            index += consumed;
        } else if let Some(interface) = trimmed.strip_prefix("interface ") {
            let (kind, number) = split_interface_name(interface.trim());
            let mut entry = Map::new();
            entry.insert("name".to_string(), Value::String(number.to_string()));

            // Indented block lines belong to this interface.
            while index + 1 < lines.len() && lines[index + 1].starts_with(' ') {
                index += 1;
                let block_line = lines[index].trim();
                if let Some(description) = block_line.strip_prefix("description ") {
                    entry.insert(
                        "description".to_string(),
                        Value::String(description.to_string()),
                    );
                }
            }

            if let Some(list) = interfaces
                .entry(kind.to_string())
                .or_insert_with(|| Value::Array(Vec::new()))
                .as_array_mut()
            {
                list.push(Value::Object(entry));
            }
        }

        index += 1;
    }

    if !interfaces.is_empty() {
        native.insert("interface".to_string(), Value::Object(interfaces));
    }

    json!({ "Cisco-IOS-XE-native:native": native })
}

// Banner text runs from the delimiter character to its next occurrence,
// possibly spanning lines.
fn read_banner(first_line_rest: &str, following: &[&str]) -> (String, usize) {
    let mut chars = first_line_rest.trim().chars();
    let delimiter = match chars.next() {
        Some(delimiter) => delimiter,
        None => return (String::new(), 0),
    };

    let remainder: String = chars.collect();
    if let Some(end) = remainder.find(delimiter) {
        return (remainder[..end].to_string(), 0);
    }

    let mut banner = remainder;
    for (consumed, line) in following.iter().enumerate() {
        match line.find(delimiter) {
            Some(end) => {
                banner.push('\n');
                banner.push_str(&line[..end]);
                return (banner.trim().to_string(), consumed + 1);
            }
            None => {
                banner.push('\n');
                banner.push_str(line);
            }
        }
    }

    (banner.trim().to_string(), following.len())
}

/// Parse `show interfaces` output into the shape of the
/// `openconfig-interfaces:interfaces` RESTCONF tree, covering the branches
/// the check catalog reads : description, negotiated duplex, admin/oper
/// status and the error counters. Counters the output does not expose are
/// simply absent from the tree.
pub fn openconfig_tree_from_show_interfaces(raw: &str) -> Value {
    let mut interfaces: Vec<Value> = Vec::new();
    let mut current: Option<LearnedInterface> = None;

    for line in raw.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if !line.starts_with(' ') {
            if let Some(finished) = current.take() {
                interfaces.push(finished.into_value());
            }
            current = LearnedInterface::from_header(line);
        } else if let Some(entry) = current.as_mut() {
            entry.consume_block_line(trimmed);
        }
    }
    if let Some(finished) = current.take() {
        interfaces.push(finished.into_value());
    }

    json!({ "openconfig-interfaces:interfaces": { "interface": interfaces } })
}

struct LearnedInterface {
    name: String,
    admin_status: &'static str,
    oper_status: &'static str,
    description: Option<String>,
    duplex: Option<String>,
    counters: Map<String, Value>,
}

impl LearnedInterface {
    // "GigabitEthernet0/1 is up, line protocol is up"
    fn from_header(line: &str) -> Option<LearnedInterface> {
        let (left, oper_part) = line.split_once(", line protocol is ")?;
        let (name, admin_part) = left.split_once(" is ")?;

        // "administratively down" and plain "down" both count as DOWN
        let admin_status = if admin_part.contains("down") { "DOWN" } else { "UP" };
        let oper_status = if oper_part.trim_start().starts_with("up") {
            "UP"
        } else {
            "DOWN"
        };

        Some(LearnedInterface {
            name: name.to_string(),
            admin_status,
            oper_status,
            description: None,
            duplex: None,
            counters: Map::new(),
        })
    }

    fn consume_block_line(&mut self, line: &str) {
        if let Some(description) = line.strip_prefix("Description: ") {
            self.description = Some(description.to_string());
        } else if let Some((_, rest)) = line.split_once("Total output drops: ") {
            if let Some(count) = leading_count(rest) {
                self.counters.insert("out-discards".to_string(), count.into());
            }
        } else if line.contains("input errors") {
            if let Some(count) = leading_count(line) {
                self.counters.insert("in-errors".to_string(), count.into());
            }
            for segment in line.split(',') {
                if segment.trim_end().ends_with("CRC") {
                    if let Some(count) = leading_count(segment) {
                        self.counters
                            .insert("in-fcs-errors".to_string(), count.into());
                    }
                }
            }
        } else if line.contains("output errors") {
            if let Some(count) = leading_count(line) {
                self.counters.insert("out-errors".to_string(), count.into());
            }
        } else if line.contains("unknown protocol drops") {
            if let Some(count) = leading_count(line) {
                self.counters
                    .insert("in-unknown-protos".to_string(), count.into());
            }
        } else if self.duplex.is_none() {
            // "Full-duplex, 1000Mb/s, ..." or "Half Duplex, 100Mbps, ..."
            let first = line
                .split(',')
                .next()
                .unwrap_or("")
                .to_ascii_lowercase()
                .replace('-', " ");
            if let Some(mode) = first.strip_suffix(" duplex") {
                self.duplex = Some(mode.trim().to_ascii_uppercase());
            }
        }
    }

    fn into_value(self) -> Value {
        let mut entry = Map::new();
        entry.insert("name".to_string(), Value::String(self.name));

        if let Some(description) = self.description {
            entry.insert("config".to_string(), json!({ "description": description }));
        }

        let mut state = Map::new();
        state.insert(
            "admin-status".to_string(),
            Value::String(self.admin_status.to_string()),
        );
        state.insert(
            "oper-status".to_string(),
            Value::String(self.oper_status.to_string()),
        );
        if !self.counters.is_empty() {
            state.insert("counters".to_string(), Value::Object(self.counters));
        }
        entry.insert("state".to_string(), Value::Object(state));

        // Interfaces that report no duplex (loopbacks, VLANs) carry no
        // ethernet branch, matching the RESTCONF tree.
        if let Some(duplex) = self.duplex {
            entry.insert(
                "openconfig-if-ethernet:ethernet".to_string(),
                json!({ "state": { "negotiated-duplex-mode": duplex } }),
            );
        }

        Value::Object(entry)
    }
}

fn leading_count(text: &str) -> Option<u64> {
    text.split_whitespace().next()?.parse().ok()
}

/// "GigabitEthernet0/1" -> ("GigabitEthernet", "0/1")
pub fn split_interface_name(full_name: &str) -> (&str, &str) {
    match full_name.find(|character: char| character.is_ascii_digit()) {
        Some(position) => full_name.split_at(position),
        None => (full_name, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::lookup::lookup;

    const RUNNING_CONFIG: &str = "\
hostname dist-rtr01
ip domain name example.com
banner motd #Unauthorized access prohibited#
interface GigabitEthernet0/1
 description uplink
 no shutdown
interface GigabitEthernet0/2
 shutdown
";

    #[test]
    fn learned_config_matches_native_tree_shape() {
        let tree = native_tree_from_running_config(RUNNING_CONFIG);

        assert_eq!(
            lookup(&tree, &["Cisco-IOS-XE-native:native", "ip", "domain", "name"]),
            Some(&Value::String("example.com".to_string()))
        );
        assert_eq!(
            lookup(
                &tree,
                &["Cisco-IOS-XE-native:native", "banner", "motd", "banner"]
            ),
            Some(&Value::String("Unauthorized access prohibited".to_string()))
        );

        let gigabit = lookup(
            &tree,
            &["Cisco-IOS-XE-native:native", "interface", "GigabitEthernet"],
        )
        .and_then(|value| value.as_array())
        .unwrap();
        assert_eq!(gigabit.len(), 2);
        assert_eq!(gigabit[0]["name"], "0/1");
        assert_eq!(gigabit[0]["description"], "uplink");
        assert_eq!(gigabit[1]["name"], "0/2");
        assert!(gigabit[1].get("description").is_none());
    }

    #[test]
    fn multi_line_banner_is_captured_up_to_the_delimiter() {
        let raw = "banner motd #first line\nsecond line#\nip domain name lab.local\n";
        let tree = native_tree_from_running_config(raw);

        assert_eq!(
            lookup(
                &tree,
                &["Cisco-IOS-XE-native:native", "banner", "motd", "banner"]
            )
            .and_then(|value| value.as_str()),
            Some("first line\nsecond line")
        );
        assert_eq!(
            lookup(&tree, &["Cisco-IOS-XE-native:native", "ip", "domain", "name"])
                .and_then(|value| value.as_str()),
            Some("lab.local")
        );
    }

    const SHOW_INTERFACES: &str = "\
GigabitEthernet0/1 is up, line protocol is up
  Hardware is iGbE, address is 5254.0012.3456
  Description: uplink to core
  MTU 1500 bytes, BW 1000000 Kbit/sec, DLY 10 usec,
  Full-duplex, 1000Mb/s, media type is RJ45
  Input queue: 0/75/0/0 (size/max/drops/flushes); Total output drops: 4
     7 input errors, 3 CRC, 0 frame, 0 overrun, 0 ignored
     2 output errors, 0 collisions, 1 interface resets
     5 unknown protocol drops
GigabitEthernet0/2 is administratively down, line protocol is down
  MTU 1500 bytes, BW 1000000 Kbit/sec, DLY 10 usec,
  Half-duplex, 100Mb/s, media type is RJ45
     0 input errors, 0 CRC, 0 frame, 0 overrun, 0 ignored
Loopback0 is up, line protocol is up
  MTU 1514 bytes, BW 8000000 Kbit/sec, DLY 5000 usec,
";

    #[test]
    fn learned_interfaces_match_openconfig_tree_shape() {
        use crate::state::lookup::{lookup_str, lookup_u64};

        let tree = openconfig_tree_from_show_interfaces(SHOW_INTERFACES);
        let entries = lookup(&tree, &["openconfig-interfaces:interfaces", "interface"])
            .and_then(|value| value.as_array())
            .unwrap();
        assert_eq!(entries.len(), 3);

        let gi1 = &entries[0];
        assert_eq!(gi1["name"], "GigabitEthernet0/1");
        assert_eq!(
            lookup_str(gi1, &["config", "description"]),
            Some("uplink to core")
        );
        assert_eq!(lookup_str(gi1, &["state", "admin-status"]), Some("UP"));
        assert_eq!(lookup_str(gi1, &["state", "oper-status"]), Some("UP"));
        assert_eq!(lookup_u64(gi1, &["state", "counters", "in-errors"]), Some(7));
        assert_eq!(
            lookup_u64(gi1, &["state", "counters", "in-fcs-errors"]),
            Some(3)
        );
        assert_eq!(lookup_u64(gi1, &["state", "counters", "out-errors"]), Some(2));
        assert_eq!(
            lookup_u64(gi1, &["state", "counters", "out-discards"]),
            Some(4)
        );
        assert_eq!(
            lookup_u64(gi1, &["state", "counters", "in-unknown-protos"]),
            Some(5)
        );
        assert_eq!(
            lookup_str(
                gi1,
                &[
                    "openconfig-if-ethernet:ethernet",
                    "state",
                    "negotiated-duplex-mode"
                ]
            ),
            Some("FULL")
        );

        let gi2 = &entries[1];
        assert_eq!(lookup_str(gi2, &["state", "admin-status"]), Some("DOWN"));
        assert_eq!(lookup_str(gi2, &["state", "oper-status"]), Some("DOWN"));
        assert_eq!(
            lookup_str(
                gi2,
                &[
                    "openconfig-if-ethernet:ethernet",
                    "state",
                    "negotiated-duplex-mode"
                ]
            ),
            Some("HALF")
        );
        // no Description line, no description key
        assert!(gi2.get("config").is_none());

        let loopback = &entries[2];
        assert_eq!(loopback["name"], "Loopback0");
        // no duplex line, no ethernet branch
        assert!(loopback.get("openconfig-if-ethernet:ethernet").is_none());
    }

    #[test]
    fn learned_interface_tree_drives_the_openconfig_checks() {
        use crate::intent::DeviceIntent;
        use crate::state::attribute::AssessAttribute;
        use crate::state::attribute::interface::counters::{
            CounterKind, CounterThresholdExpectedState,
        };
        use crate::state::attribute::interface::duplex::DuplexExpectedState;
        use crate::state::compliance::Verdict;

        let tree = openconfig_tree_from_show_interfaces(SHOW_INTERFACES);

        let duplex =
            DuplexExpectedState::new().assess("dist-rtr01", &DeviceIntent::default(), &tree);
        // the loopback produces no duplex row
        assert_eq!(duplex.results.len(), 2);
        assert_eq!(duplex.results[0].verdict, Verdict::Passed);
        assert_eq!(duplex.results[1].verdict, Verdict::Failed);

        let in_errors = CounterThresholdExpectedState::new(CounterKind::InErrors).assess(
            "dist-rtr01",
            &DeviceIntent::default(),
            &tree,
        );
        assert_eq!(in_errors.results[0].verdict, Verdict::Failed);
        assert_eq!(in_errors.results[1].verdict, Verdict::Passed);
        assert_eq!(in_errors.results[2].verdict, Verdict::NotApplicable);

        // a counter kind the CLI output never exposes stays N/A on every row
        let in_discards = CounterThresholdExpectedState::new(CounterKind::InDiscards).assess(
            "dist-rtr01",
            &DeviceIntent::default(),
            &tree,
        );
        for result in &in_discards.results {
            assert_eq!(result.verdict, Verdict::NotApplicable);
        }
    }

    #[test]
    fn interface_names_split_at_first_digit() {
        assert_eq!(
            split_interface_name("GigabitEthernet0/1"),
            ("GigabitEthernet", "0/1")
        );
        assert_eq!(split_interface_name("Loopback100"), ("Loopback", "100"));
        assert_eq!(split_interface_name("Tunnel"), ("Tunnel", ""));
    }
}
