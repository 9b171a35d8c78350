use std::process::ExitCode;

use crate::orchestrator::RunReport;

/// Exit status of a run.
///
/// - `Success` (0): every unit translated, up to date, or pending in a dry run
/// - `Failure` (1): the run completed but at least one unit failed
/// - `Error` (2): the run could not start (bad arguments, config, credential)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
    Error,
}

impl From<&RunReport> for ExitStatus {
    fn from(report: &RunReport) -> Self {
        if report.all_done() {
            ExitStatus::Success
        } else {
            ExitStatus::Failure
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
