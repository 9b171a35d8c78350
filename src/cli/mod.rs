use anyhow::Result;

mod args;
mod exit_status;
mod report;
mod run;

pub use args::Arguments;
pub use exit_status::ExitStatus;
pub use report::{FAILURE_MARK, PENDING_MARK, SUCCESS_MARK};

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let report = run::run(&args)?;
    report::print(&report, args.verbose);

    Ok(ExitStatus::from(&report))
}
