//! Reporter : renders pass/fail tables and structural diffs to the log sink
//! and writes state snapshots for later inspection. The reconciliation loop
//! never reads any of this back.

pub mod snapshot;
pub mod table;

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::info;

use crate::error::Error;
use crate::report::snapshot::{SnapshotPhase, write_snapshot};
use crate::report::table::render_table;
use crate::state::compliance::CheckResult;
use crate::state::diff::DiffEntry;

#[derive(Debug, Clone)]
pub struct Reporter {
    output_dir: PathBuf,
}

impl Reporter {
    pub fn new(output_dir: impl AsRef<Path>) -> Reporter {
        Reporter {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    pub fn log_results(&self, title: &str, results: &[CheckResult]) {
        if results.is_empty() {
            return;
        }

        let rows: Vec<Vec<String>> = results
            .iter()
            .map(|result| {
                vec![
                    result.device.clone(),
                    result.subject.clone(),
                    result.observed.clone(),
                    result.expected.clone(),
                    result.verdict.to_string(),
                ]
            })
            .collect();

        let table = render_table(
            &["Device", "Subject", "Observed", "Expected", "Passed/Failed"],
            &rows,
        );
        info!("{}\n{}", title, table);
    }

    pub fn log_diff(&self, device: &str, attribute: &str, entries: &[DiffEntry]) {
        if entries.is_empty() {
            info!("{} {} : no structural difference", device, attribute);
            return;
        }
        for entry in entries {
            info!("{} {} : {}", device, attribute, entry);
        }
    }

    pub fn write_snapshot(
        &self,
        device: &str,
        model: &str,
        phase: SnapshotPhase,
        state: &Value,
    ) -> Result<(), Error> {
        let path = write_snapshot(&self.output_dir, device, model, phase, state)?;
        info!("wrote {} snapshot {}", phase, path.display());
        Ok(())
    }
}
