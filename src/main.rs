use std::process::ExitCode;

use clap::Parser;

use pixelfe::cli::{self, CliArgs};
use pixelfe::logger;

fn main() -> ExitCode {
    logger::init();
    let args = CliArgs::parse();
    cli::run(args)
}
