//! Binary entry point for the reachability checker

use benchreach::cmd::Cli;
use clap::Parser;

fn main() {
    let cli = Cli::parse();
    std::process::exit(cli.run());
}
