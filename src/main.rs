mod args;
mod tally;

use clap::Parser;
use log::{info, LevelFilter};
use snafu::ErrorCompat;

fn main() {
    let args = args::Args::parse();
    if args.verbose {
        env_logger::Builder::new()
            .filter_level(LevelFilter::Debug)
            .init();
    } else {
        env_logger::init();
    }
    info!("args: {:?}", args);

    if let Err(e) = tally::run_election(&args) {
        eprintln!("An error occured: {}", e);
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("trace: {}", bt);
        }
        std::process::exit(1);
    }
}
