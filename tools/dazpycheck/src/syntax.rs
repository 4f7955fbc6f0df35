use crate::check::{Check, Finding, RunContext};
use crate::config::GateConfig;
use crate::runner::CommandCall;
use crate::walker;
use std::collections::HashSet;

pub const DESCRIPTION: &str = "py_compile check";
pub const SOURCE_EXTENSION: &str = ".py";

/// Byte-compiles every source file under the run root, one interpreter per file.
pub fn py_compile_check(config: &GateConfig) -> Check {
    let python = config.python.clone();
    let skip_dirs = config.skip_dirs.clone();
    Check::scan(DESCRIPTION, move |ctx: &RunContext<'_>| compile_all(ctx, &python, &skip_dirs))
}

/// One finding per file that failed to compile. Every file is attempted.
pub fn compile_all(ctx: &RunContext<'_>, python: &str, skip_dirs: &HashSet<String>) -> Vec<Finding> {
    let mut findings = Vec::new();

    for file in walker::collect_files_with_extension(ctx.root, SOURCE_EXTENSION, skip_dirs) {
        let path = file.display().to_string();
        let call = CommandCall::python_module(python, "py_compile", &[&path]);

        match ctx.runner.run(&call) {
            Ok(result) if result.success() => {}
            Ok(result) => {
                let output = result.combined();
                let output = output.trim_end();
                if output.is_empty() {
                    findings.push(format!("Failed to compile {path}"));
                } else {
                    findings.push(format!("Failed to compile {path}\n{output}"));
                }
            }
            Err(error) => {
                findings.push(format!("Failed to compile {path}\nfailed to launch `{python}`: {error}"));
            }
        }
    }

    if findings.is_empty() {
        ctx.reporter.success("All python files compiled successfully.");
    }
    findings
}
