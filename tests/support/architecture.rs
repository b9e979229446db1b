use std::fs;
use std::path::{Path, PathBuf};

/// `(relative path, 1-based line, line text)`
pub type Hit = (String, usize, String);

fn root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

fn relative_path(path: &Path) -> String {
    path.strip_prefix(root())
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

fn collect_rs_files(dir: &Path, files: &mut Vec<PathBuf>) {
    let entries = fs::read_dir(dir).unwrap_or_else(|e| {
        panic!("failed to read dir {}: {e}", dir.display());
    });

    for entry in entries {
        let path = entry
            .unwrap_or_else(|e| panic!("failed to read dir entry: {e}"))
            .path();
        if path.is_dir() {
            collect_rs_files(&path, files);
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            files.push(path);
        }
    }
}

fn sources(relative_dir: &str) -> Vec<(String, String)> {
    let mut files = Vec::new();
    collect_rs_files(&root().join(relative_dir), &mut files);
    files.sort();
    files
        .into_iter()
        .map(|file| {
            let content = fs::read_to_string(&file)
                .unwrap_or_else(|e| panic!("failed to read {}: {e}", file.display()));
            (relative_path(&file), content)
        })
        .collect()
}

fn scan(relative_dir: &str, patterns: &[&str], code_only: bool) -> Vec<Hit> {
    let mut hits = Vec::new();
    for (path, content) in sources(relative_dir) {
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim_start();
            if code_only && trimmed == "#[cfg(test)]" {
                break;
            }
            if code_only && trimmed.starts_with("//") {
                continue;
            }
            if patterns.iter().any(|p| line.contains(p)) {
                hits.push((path.clone(), idx + 1, line.to_string()));
            }
        }
    }
    hits
}

/// Every line under `relative_dir` containing any of `patterns`.
pub fn find_lines_containing(relative_dir: &str, patterns: &[&str]) -> Vec<Hit> {
    scan(relative_dir, patterns, false)
}

/// Like [`find_lines_containing`], ignoring comments and `#[cfg(test)]` modules.
pub fn find_code_lines_containing(relative_dir: &str, patterns: &[&str]) -> Vec<Hit> {
    scan(relative_dir, patterns, true)
}

pub fn path_exists(relative_path: &str) -> bool {
    root().join(relative_path).exists()
}

pub fn read_relative(relative_path: &str) -> String {
    fs::read_to_string(root().join(relative_path))
        .unwrap_or_else(|e| panic!("failed to read {relative_path}: {e}"))
}
