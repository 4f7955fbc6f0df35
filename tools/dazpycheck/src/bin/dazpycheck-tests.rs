use clap::Parser;
use dazpycheck::config::DEFAULT_TEST_ROOT;
use dazpycheck::test_runner;
use dazpycheck::{ConsoleReporter, GateConfig, RealCommandRunner, Reporter};
use std::path::PathBuf;
use std::process;

/// Discover `test_*` / `*_test.py` files and run each under pytest or unittest.
#[derive(Debug, Parser)]
#[command(name = "dazpycheck-tests", version)]
struct Args {
    /// Directory to search for tests.
    #[arg(default_value = DEFAULT_TEST_ROOT)]
    directory: PathBuf,
}

fn main() {
    let args = Args::parse();
    let reporter = ConsoleReporter;

    // A missing test root means there is nothing to run.
    if !args.directory.is_dir() {
        reporter.info(&format!("Running tests in {}...", args.directory.display()));
        reporter.info("No tests found.");
        process::exit(0);
    }

    let config = match GateConfig::load(&args.directory) {
        Ok(config) => config,
        Err(error) => {
            reporter.error(&format!("Error: {error}"));
            process::exit(1);
        }
    };

    let summary = test_runner::run_tests(&args.directory, &config, &reporter, &RealCommandRunner);
    process::exit(summary.exit_code());
}
