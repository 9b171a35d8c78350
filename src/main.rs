use std::process::ExitCode;

use clap::Parser;
use locsync::{
    cli::{Arguments, ExitStatus},
    logging,
};

fn main() -> ExitCode {
    let args = Arguments::parse();
    logging::init(args.verbose);

    match locsync::cli::run_cli(args) {
        Ok(status) => status.into(),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitStatus::Error.into()
        }
    }
}
