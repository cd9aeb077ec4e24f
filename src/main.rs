use clap::Parser;

use crate::cli::Cli;
use dds_loader::args::Args;
use dds_loader::run;

mod cli;

fn main() {
    let cli = Cli::parse();

    if let Err(error) = run(Args {
        command: cli.command.into(),
    }) {
        log::error!("{error:#}");
        std::process::exit(1);
    }
}
