use std::io;
use std::process::{Command, Stdio};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandCall {
    pub program: String,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// Exit code, or `None` when the child was killed by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// stdout followed by stderr.
    pub fn combined(&self) -> String {
        let mut merged = String::with_capacity(self.stdout.len() + self.stderr.len() + 1);
        merged.push_str(&self.stdout);
        if !self.stdout.is_empty() && !self.stderr.is_empty() && !self.stdout.ends_with('\n') {
            merged.push('\n');
        }
        merged.push_str(&self.stderr);
        merged
    }
}

/// Runs one external command to completion with its output captured.
///
/// `Err` means the command could not be launched at all.
pub trait CommandRunner: Send + Sync {
    fn run(&self, command: &CommandCall) -> io::Result<CommandResult>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RealCommandRunner;

impl CommandRunner for RealCommandRunner {
    fn run(&self, command: &CommandCall) -> io::Result<CommandResult> {
        let mut process = Command::new(&command.program);
        process
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let output = process.output()?;
        Ok(CommandResult {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

impl CommandCall {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// `<python> -m <module> <args...>`
    pub fn python_module(python: &str, module: &str, args: &[&str]) -> Self {
        let mut argv = Vec::with_capacity(2 + args.len());
        argv.push("-m".to_string());
        argv.push(module.to_string());
        argv.extend(args.iter().map(|a| a.to_string()));
        Self::new(python, argv)
    }

    pub fn to_vec(&self) -> Vec<String> {
        let mut parts = Vec::with_capacity(1 + self.args.len());
        parts.push(self.program.clone());
        parts.extend(self.args.iter().cloned());
        parts
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> CommandCall {
        CommandCall::new("sh", vec!["-c".to_string(), script.to_string()])
    }

    #[test]
    fn run_captures_stdout_and_stderr_separately() {
        let result = RealCommandRunner.run(&sh("printf out; printf err >&2")).unwrap();
        assert!(result.success());
        assert_eq!(result.stdout, "out");
        assert_eq!(result.stderr, "err");
        assert_eq!(result.combined(), "out\nerr");
    }

    #[test]
    fn run_reports_nonzero_status() {
        let result = RealCommandRunner.run(&sh("exit 2")).unwrap();
        assert_eq!(result.status, Some(2));
        assert!(!result.success());
    }

    #[test]
    fn run_reports_spawn_failure_for_missing_program() {
        let call = CommandCall::new("this-command-does-not-exist-xyz", Vec::new());
        assert!(RealCommandRunner.run(&call).is_err());
    }

    #[test]
    fn python_module_builds_argv() {
        let call = CommandCall::python_module("python3", "flake8", &["src"]);
        assert_eq!(call.program, "python3");
        assert_eq!(call.to_vec(), vec!["python3", "-m", "flake8", "src"]);
    }

    #[test]
    fn signal_death_is_not_success() {
        let result = CommandResult {
            status: None,
            stdout: String::new(),
            stderr: String::new(),
        };
        assert!(!result.success());
    }
}
