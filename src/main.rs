//! Provides the main entry point to the program.
use human_panic::{metadata, setup_panic};
use invest_explorer::cli::run_cli;
use invest_explorer::log::is_logger_initialised;

fn main() {
    setup_panic!(metadata!().support("Open an issue with the steps that led to the crash."));

    if let Err(err) = run_cli() {
        if is_logger_initialised() {
            ::log::error!("{err:?}");
        } else {
            eprintln!("Error: {err:?}");
        }

        // Terminate program, signalling an error
        std::process::exit(1);
    }
}
