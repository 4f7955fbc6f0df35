pub mod check;
pub mod config;
pub mod error;
pub mod gate;
pub mod orchestrator;
pub mod report;
pub mod reporter;
pub mod runner;
pub mod scanner;
pub mod syntax;
pub mod test_runner;
pub mod timing;
pub mod walker;

pub use check::{Check, Finding, Outcome, RunContext};
pub use config::GateConfig;
pub use error::{Error, Result};
pub use orchestrator::{run_checks, RunResult, Schedule};
pub use reporter::{CapturedReporter, ConsoleReporter, Level, Reporter};
pub use runner::{CommandCall, CommandResult, CommandRunner, RealCommandRunner};
