mod platform;

use std::process::ExitCode;

use clap::Parser;

fn main() -> anyhow::Result<ExitCode> {
    let args = platform::cli::Args::parse();
    platform::app::run_app(args)
}
