// src/main.rs

use pybuild::{cli, logging, run};

/// Exit status for a wrong invocation (unknown or missing target).
const USAGE_EXIT_CODE: i32 = 2;

fn main() {
    let args = cli::parse();
    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("pybuild error: {err:?}");
        std::process::exit(1);
    }

    match run(&args) {
        Ok(_) => {}
        // Already reported by the dispatcher.
        Err(err) if err.is_usage_error() => std::process::exit(USAGE_EXIT_CODE),
        Err(err) => {
            eprintln!("pybuild error: {err:?}");
            std::process::exit(1);
        }
    }
}
