use crate::error::{Error, Result};
use crate::gate::GateOptions;
use crate::orchestrator::RunResult;
use crate::timing;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// One JSON line per gate run.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub timestamp: u64,
    pub root: String,
    pub mode: &'static str,
    pub schedule: &'static str,
    pub overall_passed: bool,
    pub failures: usize,
    pub checks: Vec<CheckReport>,
}

#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub description: String,
    pub passed: bool,
    pub elapsed_ms: u64,
}

impl RunReport {
    pub fn new(root: &Path, options: &GateOptions, result: &RunResult) -> Self {
        Self {
            timestamp: timing::unix_now_secs(),
            root: root.display().to_string(),
            mode: options.mode(),
            schedule: options.schedule.as_str(),
            overall_passed: result.overall_passed,
            failures: result.failures.len(),
            checks: result
                .outcomes
                .iter()
                .map(|o| CheckReport {
                    description: o.description.clone(),
                    passed: o.passed,
                    elapsed_ms: o.elapsed.as_millis() as u64,
                })
                .collect(),
        }
    }
}

pub fn append_report(path: &Path, report: &RunReport) -> Result<()> {
    let line = serde_json::to_string(report)?;
    let write_err = |source: std::io::Error| Error::ReportWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(write_err)?;
    writeln!(file, "{line}").map_err(write_err)
}
