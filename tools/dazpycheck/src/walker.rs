use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Recursively collect regular files under `root` whose file name passes `include`.
///
/// Directories named in `skip_dirs` are not descended into (the root itself is
/// never skipped). Names that are not valid UTF-8 are matched lossily, never
/// dropped. Entries are visited in file-name order so a fixed tree always
/// yields the same list. Unreadable directories are silently left out.
pub fn collect_files<F>(root: &Path, skip_dirs: &HashSet<String>, include: F) -> Vec<PathBuf>
where
    F: Fn(&str) -> bool,
{
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_skipped_dir(entry, skip_dirs))
        .filter_map(Result::ok)
        .filter(|entry| !entry.file_type().is_dir() && entry.path().is_file())
        .filter(|entry| include(&entry.file_name().to_string_lossy()))
        .map(DirEntry::into_path)
        .collect()
}

/// Every regular file under `root`.
pub fn collect_all_files(root: &Path, skip_dirs: &HashSet<String>) -> Vec<PathBuf> {
    collect_files(root, skip_dirs, |_| true)
}

/// Files whose name ends with `extension` (e.g. `".py"`).
pub fn collect_files_with_extension(root: &Path, extension: &str, skip_dirs: &HashSet<String>) -> Vec<PathBuf> {
    collect_files(root, skip_dirs, |name| name.ends_with(extension))
}

fn is_skipped_dir(entry: &DirEntry, skip_dirs: &HashSet<String>) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && skip_dirs.contains(&*entry.file_name().to_string_lossy())
}
