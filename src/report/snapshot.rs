//! Snapshot files : write-only audit output, one pre-change and one
//! post-change JSON document per remediated attribute group per device,
//! named `{device}_{model}_{PRE|POST}_TEST.json`.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SnapshotPhase {
    Pre,
    Post,
}

impl std::fmt::Display for SnapshotPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotPhase::Pre => write!(f, "PRE"),
            SnapshotPhase::Post => write!(f, "POST"),
        }
    }
}

pub fn snapshot_file_name(device: &str, model: &str, phase: SnapshotPhase) -> String {
    format!("{}_{}_{}_TEST.json", device, model, phase)
}

pub fn write_snapshot(
    output_dir: &Path,
    device: &str,
    model: &str,
    phase: SnapshotPhase,
    state: &Value,
) -> Result<PathBuf, Error> {
    fs::create_dir_all(output_dir)
        .map_err(|error_detail| Error::SnapshotWriteFailure(format!("{}", error_detail)))?;

    let path = output_dir.join(snapshot_file_name(device, model, phase));
    let rendered = serde_json::to_string_pretty(state)
        .map_err(|error_detail| Error::SnapshotWriteFailure(format!("{}", error_detail)))?;
    fs::write(&path, rendered)
        .map_err(|error_detail| Error::SnapshotWriteFailure(format!("{}", error_detail)))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn file_names_follow_the_audit_convention() {
        assert_eq!(
            snapshot_file_name("dist-rtr01", "Cisco_IOS_XE_Native", SnapshotPhase::Pre),
            "dist-rtr01_Cisco_IOS_XE_Native_PRE_TEST.json"
        );
        assert_eq!(
            snapshot_file_name("dist-rtr01", "OpenConfig_Interfaces", SnapshotPhase::Post),
            "dist-rtr01_OpenConfig_Interfaces_POST_TEST.json"
        );
    }

    #[test]
    fn snapshots_round_trip_through_disk() {
        let output_dir = std::env::temp_dir().join("netconform-snapshot-test");
        let state = json!({ "domain": { "name": "example.com" } });

        let path = write_snapshot(
            &output_dir,
            "dist-rtr01",
            "Cisco_IOS_XE_Native",
            SnapshotPhase::Pre,
            &state,
        )
        .unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let reread: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(reread, state);

        let _ = std::fs::remove_file(path);
    }
}
