use clap::Parser;
use dazpycheck::gate::{self, GateOptions};
use dazpycheck::report::{self, RunReport};
use dazpycheck::{ConsoleReporter, GateConfig, RealCommandRunner, Reporter, Schedule};
use std::path::PathBuf;
use std::process;

/// Run banned-word, lint, type and compile checks over a Python tree.
#[derive(Debug, Parser)]
#[command(name = "dazpycheck", version)]
struct Args {
    /// Directory to check.
    #[arg(default_value = ".")]
    directory: PathBuf,

    /// Format the tree with black before checking.
    #[arg(long)]
    fix: bool,

    /// Run checks one after another instead of on a worker pool.
    #[arg(long)]
    single_thread: bool,

    /// Append a JSON line describing this run to FILE.
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();
    let reporter = ConsoleReporter;

    let config = match GateConfig::load(&args.directory) {
        Ok(config) => config,
        Err(error) => {
            reporter.error(&format!("Error: {error}"));
            process::exit(1);
        }
    };

    let options = GateOptions {
        fix: args.fix,
        schedule: Schedule::from_single_thread(args.single_thread),
    };
    let result = gate::run_gate(&config, &options, &reporter, &RealCommandRunner);

    if let Some(path) = args.report.as_deref() {
        let record = RunReport::new(&config.root_dir, &options, &result);
        if let Err(error) = report::append_report(path, &record) {
            reporter.error(&format!("Error: {error}"));
        }
    }

    process::exit(result.exit_code());
}
