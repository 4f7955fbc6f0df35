//! Companion pipeline: find test files, sort them by framework, run each in
//! its own interpreter.

use crate::config::GateConfig;
use crate::reporter::Reporter;
use crate::runner::{CommandCall, CommandRunner};
use crate::walker;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// `test_*` prefix or `*_test.py` suffix.
static TEST_FILE_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^test_|_test\.py$").unwrap());

const PYTEST_MARKER: &str = "import pytest";
const UNITTEST_MARKER: &str = "import unittest";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framework {
    Pytest,
    Unittest,
    Unrecognized,
}

impl Framework {
    /// pytest wins when a file mentions both.
    pub fn classify(content: &str) -> Self {
        if content.contains(PYTEST_MARKER) {
            Framework::Pytest
        } else if content.contains(UNITTEST_MARKER) {
            Framework::Unittest
        } else {
            Framework::Unrecognized
        }
    }

    fn module(&self) -> Option<&'static str> {
        match self {
            Framework::Pytest => Some("pytest"),
            Framework::Unittest => Some("unittest"),
            Framework::Unrecognized => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Framework::Pytest => "Pytest",
            Framework::Unittest => "Unittest",
            Framework::Unrecognized => "Unrecognized",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestFileRecord {
    pub path: PathBuf,
    pub framework: Framework,
}

pub fn is_test_file_name(name: &str) -> bool {
    TEST_FILE_NAME.is_match(name)
}

#[derive(Debug, Default)]
pub struct Discovery {
    pub records: Vec<TestFileRecord>,
    /// Matched by name but could not be read.
    pub unreadable: Vec<PathBuf>,
}

/// Walk `root` for test files and classify each by reading it once.
pub fn discover(root: &Path, config: &GateConfig, reporter: &dyn Reporter) -> Discovery {
    let mut discovery = Discovery::default();
    for path in walker::collect_files(root, &config.skip_dirs, is_test_file_name) {
        match fs::read(&path) {
            Ok(bytes) => {
                let framework = Framework::classify(&String::from_utf8_lossy(&bytes));
                discovery.records.push(TestFileRecord { path, framework });
            }
            Err(error) => {
                reporter.error(&format!("Error reading file {}: {error}", path.display()));
                discovery.unreadable.push(path);
            }
        }
    }
    discovery
}

#[derive(Debug, Default)]
pub struct TestRunSummary {
    pub passed: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

impl TestRunSummary {
    pub fn all_passed(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn exit_code(&self) -> i32 {
        if self.all_passed() {
            0
        } else {
            1
        }
    }
}

/// Run every classified test file; one failure never stops the others.
pub fn run_tests(
    root: &Path,
    config: &GateConfig,
    reporter: &dyn Reporter,
    runner: &dyn CommandRunner,
) -> TestRunSummary {
    reporter.info(&format!("Running tests in {}...", root.display()));

    let discovery = discover(root, config, reporter);
    let mut summary = TestRunSummary {
        failed: discovery.unreadable,
        ..TestRunSummary::default()
    };

    if discovery.records.is_empty() && summary.failed.is_empty() {
        reporter.info("No tests found.");
        return summary;
    }

    for record in discovery.records {
        reporter.info(&format!("Running test: {}", record.path.display()));

        let Some(module) = record.framework.module() else {
            reporter.info(&format!(
                "Skipping {} as it does not seem to be a pytest or unittest file.",
                record.path.display()
            ));
            summary.skipped.push(record.path);
            continue;
        };

        let path = record.path.display().to_string();
        let call = CommandCall::python_module(&config.python, module, &[&path]);
        match runner.run(&call) {
            Ok(result) if result.success() => summary.passed.push(record.path),
            Ok(result) => {
                reporter.error(&format!("{} failed for {path}", record.framework.label()));
                if !result.stdout.trim().is_empty() {
                    reporter.error(result.stdout.trim_end());
                }
                if !result.stderr.trim().is_empty() {
                    reporter.error(result.stderr.trim_end());
                }
                summary.failed.push(record.path);
            }
            Err(error) => {
                reporter.error(&format!(
                    "{} failed for {path}: failed to launch `{}`: {error}",
                    record.framework.label(),
                    config.python
                ));
                summary.failed.push(record.path);
            }
        }
    }

    if summary.all_passed() {
        reporter.success("\nAll tests passed!");
    } else {
        reporter.error("\nSome tests failed.");
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::{CapturedReporter, Level};
    use crate::runner::fake::{exited, ScriptedRunner};

    fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_file_naming_convention() {
        assert!(is_test_file_name("test_models.py"));
        assert!(is_test_file_name("models_test.py"));
        assert!(is_test_file_name("test_data.json"));
        assert!(!is_test_file_name("models.py"));
        assert!(!is_test_file_name("contest.py"));
        assert!(!is_test_file_name("models_test.pyc"));
    }

    #[test]
    fn classifies_by_import_marker() {
        assert_eq!(Framework::classify("import pytest\n"), Framework::Pytest);
        assert_eq!(Framework::classify("import unittest\n"), Framework::Unittest);
        assert_eq!(
            Framework::classify("import unittest\nimport pytest\n"),
            Framework::Pytest
        );
        assert_eq!(Framework::classify("print('hi')\n"), Framework::Unrecognized);
    }

    #[test]
    fn discovery_only_picks_named_test_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let a = write(root, "pkg/test_a.py", "import pytest\n");
        let b = write(root, "pkg/b_test.py", "import unittest\n");
        write(root, "pkg/helpers.py", "import pytest\n");

        let reporter = CapturedReporter::new();
        let discovery = discover(root, &GateConfig::from_root(root), &reporter);

        assert_eq!(
            discovery.records,
            vec![
                TestFileRecord { path: b, framework: Framework::Unittest },
                TestFileRecord { path: a, framework: Framework::Pytest },
            ]
        );
    }

    #[test]
    fn empty_root_is_a_successful_run() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ScriptedRunner::new(|_| exited(1, "", ""));
        let reporter = CapturedReporter::new();

        let summary = run_tests(dir.path(), &GateConfig::from_root(dir.path()), &reporter, &runner);

        assert!(summary.all_passed());
        assert_eq!(summary.exit_code(), 0);
        assert!(reporter.contains(Level::Info, "No tests found."));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn runs_each_file_with_its_framework_and_skips_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "test_py.py", "import pytest\n");
        write(root, "test_ut.py", "import unittest\n");
        let plain = write(root, "test_plain.py", "assert True\n");

        let runner = ScriptedRunner::new(|_| exited(0, "", ""));
        let reporter = CapturedReporter::new();
        let summary = run_tests(root, &GateConfig::from_root(root), &reporter, &runner);

        assert!(summary.all_passed());
        assert_eq!(summary.passed.len(), 2);
        assert_eq!(summary.skipped, vec![plain]);
        assert!(reporter.contains(Level::Info, "does not seem to be a pytest or unittest file"));
        assert!(reporter.contains(Level::Success, "All tests passed!"));

        let modules: Vec<String> = runner.calls().iter().map(|c| c.args[1].clone()).collect();
        assert_eq!(modules, vec!["pytest", "unittest"]);
    }

    #[test]
    fn one_failure_fails_the_run_without_stopping_it() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let bad = write(root, "test_a.py", "import pytest\n");
        write(root, "test_b.py", "import unittest\n");

        let runner = ScriptedRunner::new(|call| {
            if call.args[2].ends_with("test_a.py") {
                exited(1, "1 failed", "")
            } else {
                exited(0, "", "")
            }
        });
        let reporter = CapturedReporter::new();
        let summary = run_tests(root, &GateConfig::from_root(root), &reporter, &runner);

        assert!(!summary.all_passed());
        assert_eq!(summary.exit_code(), 1);
        assert_eq!(summary.failed, vec![bad]);
        assert_eq!(summary.passed.len(), 1);
        assert_eq!(runner.calls().len(), 2);
        assert!(reporter.contains(Level::Error, "Pytest failed for"));
        assert!(reporter.contains(Level::Error, "1 failed"));
        assert!(reporter.contains(Level::Error, "Some tests failed."));
    }

    #[test]
    fn launch_failure_counts_as_test_failure() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "test_a.py", "import unittest\n");

        let runner = ScriptedRunner::new(|_| Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing")));
        let reporter = CapturedReporter::new();
        let summary = run_tests(root, &GateConfig::from_root(root), &reporter, &runner);

        assert!(!summary.all_passed());
        assert!(reporter.contains(Level::Error, "Unittest failed for"));
        assert!(reporter.contains(Level::Error, "failed to launch `python3`"));
    }
}
