use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

fn build_globset(patterns: &[String]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        if let Ok(glob) = Glob::new(pattern) {
            builder.add(glob);
        }
    }
    builder
        .build()
        .unwrap_or_else(|_| GlobSetBuilder::new().build().unwrap())
}

fn normalized_rel_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

/// Discover source files under `root` matching the include patterns and not
/// matching the exclude patterns. The result is sorted so repeated scans of
/// an unchanged tree produce identical report ordering.
pub fn find_source_files(root: &Path, include: &[String], exclude: &[String]) -> Vec<PathBuf> {
    let include_set = build_globset(include);
    let exclude_set = build_globset(exclude);

    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            let rel = normalized_rel_path(root, e.path());
            include_set.is_match(&rel) && !exclude_set.is_match(&rel)
        })
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

/// Discover just the files whose base name equals `file_name`, for
/// single-file scans. Exclusions still apply.
pub fn find_named_files(root: &Path, file_name: &str, exclude: &[String]) -> Vec<PathBuf> {
    let target = file_name_from_path(file_name);
    let exclude_set = build_globset(exclude);

    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_type().is_file()
                && e.file_name().to_string_lossy() == target
                && !exclude_set.is_match(normalized_rel_path(root, e.path()))
        })
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

/// Base name of a path string, tolerating either separator.
pub fn file_name_from_path(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Companion-file resolution: given a base name referenced from a source file
/// (e.g. a `templateUrl`), find that file in the workspace and return its
/// content. Absence is a normal outcome, not a failure.
pub trait TemplateResolver: Send + Sync {
    fn resolve(&self, file_name: &str) -> Option<String>;
}

/// Workspace-backed resolver: searches under the scan root for the first
/// file with a matching base name and reads it.
pub struct WorkspaceTemplates {
    root: PathBuf,
    exclude: GlobSet,
}

impl WorkspaceTemplates {
    pub fn new(root: &Path, exclude: &[String]) -> Self {
        Self {
            root: root.to_path_buf(),
            exclude: build_globset(exclude),
        }
    }
}

impl TemplateResolver for WorkspaceTemplates {
    fn resolve(&self, file_name: &str) -> Option<String> {
        let target = file_name_from_path(file_name);
        WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .find(|e| {
                e.file_type().is_file()
                    && e.file_name().to_string_lossy() == target
                    && !self
                        .exclude
                        .is_match(normalized_rel_path(&self.root, e.path()))
            })
            .and_then(|e| std::fs::read_to_string(e.path()).ok())
    }
}
