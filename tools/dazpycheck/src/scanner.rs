use crate::check::{Check, Finding, RunContext};
use crate::config::GateConfig;
use crate::reporter::Reporter;
use crate::walker;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

pub const DESCRIPTION: &str = "Banned words";

/// Scan check over the run root with the configured word list.
pub fn banned_words_check(config: &GateConfig) -> Check {
    let words = config.banned_words.clone();
    let skip_dirs = config.skip_dirs.clone();
    Check::scan(DESCRIPTION, move |ctx: &RunContext<'_>| {
        find_banned_words(ctx.root, &words, &skip_dirs, ctx.reporter)
    })
}

/// One finding per (file, line, word) where `word` occurs in the line.
///
/// Matching is case-sensitive substring matching. Files are decoded lossily.
/// A file that cannot be read is reported through `reporter` and skipped.
pub fn find_banned_words(
    root: &Path,
    words: &[String],
    skip_dirs: &HashSet<String>,
    reporter: &dyn Reporter,
) -> Vec<Finding> {
    let mut findings = Vec::new();

    for file in walker::collect_all_files(root, skip_dirs) {
        let bytes = match fs::read(&file) {
            Ok(bytes) => bytes,
            Err(error) => {
                reporter.error(&format!("Error reading file {}: {error}", file.display()));
                continue;
            }
        };
        let content = String::from_utf8_lossy(&bytes);

        for (i, line) in text_lines(&content).into_iter().enumerate() {
            for word in words {
                if line.contains(word.as_str()) {
                    findings.push(format!(
                        "{}:{}: Banned word '{}' found.",
                        file.display(),
                        i + 1,
                        word,
                    ));
                }
            }
        }
    }

    findings
}

/// Split on `\n`, `\r\n` or a lone `\r`. A trailing terminator does not start a new line.
fn text_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                i += if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                start = i;
            }
            _ => i += 1,
        }
    }
    if start < bytes.len() {
        lines.push(&text[start..]);
    }
    lines
}
