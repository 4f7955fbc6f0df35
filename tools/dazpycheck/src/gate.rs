use crate::check::{Check, RunContext};
use crate::config::GateConfig;
use crate::orchestrator::{self, RunResult, Schedule};
use crate::reporter::{self, Reporter};
use crate::runner::{CommandCall, CommandRunner};
use crate::{scanner, syntax};

#[derive(Debug, Clone, Copy, Default)]
pub struct GateOptions {
    /// Run the formatter over the tree before checking.
    pub fix: bool,
    pub schedule: Schedule,
}

impl GateOptions {
    pub fn mode(&self) -> &'static str {
        if self.fix {
            "fix"
        } else {
            "readonly"
        }
    }
}

/// The checks that decide the verdict, in declaration order.
pub fn build_checks(config: &GateConfig) -> Vec<Check> {
    let root = config.root_dir.display().to_string();
    vec![
        scanner::banned_words_check(config),
        Check::process(
            "Flake8 linting",
            CommandCall::python_module(&config.python, "flake8", &[&root]),
        ),
        Check::process(
            "Pyright type check",
            CommandCall::python_module(&config.python, "pyright", &[&root]),
        ),
        syntax::py_compile_check(config),
    ]
}

pub fn fix_command(config: &GateConfig) -> CommandCall {
    let root = config.root_dir.display().to_string();
    CommandCall::python_module(&config.python, "black", &[&root])
}

/// Format the tree in place. Whatever happens is ignored by the verdict.
pub fn run_fix(config: &GateConfig, ctx: &RunContext<'_>) {
    let formatter = Check::process("Black formatting", fix_command(config));
    let _ = formatter.execute(ctx);
}

/// Optional fix step, then every check, then the summary.
pub fn run_gate(
    config: &GateConfig,
    options: &GateOptions,
    reporter: &dyn Reporter,
    runner: &dyn CommandRunner,
) -> RunResult {
    reporter.info(&format!(
        "Running dazpycheck in {} mode on directory: {}",
        options.mode(),
        config.root_dir.display()
    ));

    let ctx = RunContext {
        root: &config.root_dir,
        reporter,
        runner,
    };

    if options.fix {
        run_fix(config, &ctx);
    }

    let checks = build_checks(config);
    let result = orchestrator::run_checks(&checks, options.schedule, &ctx);
    reporter::print_summary(reporter, &result);
    result
}
