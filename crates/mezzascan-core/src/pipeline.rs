use std::path::{Path, PathBuf};

use anyhow::Result;
use rayon::prelude::*;

use crate::analyzer::FrameworkAnalyzer;
use crate::config::Config;
use crate::types::{AggregateReport, ComponentReport, ModuleReport};
use crate::workspace::{self, TemplateResolver, WorkspaceTemplates};

/// Per-file analysis output before merging into the aggregate.
type FileReports = (Option<ModuleReport>, Option<ComponentReport>);

/// Drives the scan: discovery, text-level gating, per-file analysis, and
/// aggregation. Reusable across CLI invocations and scan modes.
pub struct ScanPipeline {
    analyzers: Vec<Box<dyn FrameworkAnalyzer>>,
    config: Config,
}

impl ScanPipeline {
    pub fn new(analyzers: Vec<Box<dyn FrameworkAnalyzer>>, config: Config) -> Self {
        Self { analyzers, config }
    }

    /// Scan every matching source file under `root`.
    pub fn scan(&self, root: &Path) -> Result<AggregateReport> {
        if !root.exists() {
            anyhow::bail!("scan path '{}' does not exist", root.display());
        }
        let files = workspace::find_source_files(
            root,
            &self.config.scan.include,
            &self.config.scan.exclude,
        );
        Ok(self.scan_files(root, &files))
    }

    /// Scan just the files matching one base name, for edited-file rescans.
    pub fn scan_file(&self, root: &Path, file_name: &str) -> Result<AggregateReport> {
        if !root.exists() {
            anyhow::bail!("scan path '{}' does not exist", root.display());
        }
        let files = workspace::find_named_files(root, file_name, &self.config.scan.exclude);
        Ok(self.scan_files(root, &files))
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn scan_files(&self, root: &Path, files: &[PathBuf]) -> AggregateReport {
        let templates = WorkspaceTemplates::new(root, &self.config.scan.exclude);

        // Files are independent; analyze in parallel and merge in input
        // order so the aggregate ordering stays deterministic.
        let file_results: Vec<FileReports> = files
            .par_iter()
            .map(|file_path| self.analyze_one(file_path, &templates))
            .collect();

        let mut report = AggregateReport::default();
        for (module, component) in file_results {
            if let Some(module) = module {
                report.modules.push(module);
            }
            if let Some(component) = component {
                report.components.push(component);
            }
        }
        report
    }

    /// Analyze a single file. Any failure excludes the file from both
    /// report lists and the scan continues.
    fn analyze_one(&self, file_path: &Path, templates: &dyn TemplateResolver) -> FileReports {
        let content = match std::fs::read_to_string(file_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Warning: failed to read {}: {e}", file_path.display());
                return (None, None);
            }
        };

        for analyzer in &self.analyzers {
            let handles = file_path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| analyzer.file_extensions().contains(&ext));
            if !handles {
                continue;
            }
            match self.run_analyzer(analyzer.as_ref(), file_path, &content, templates) {
                Ok(reports) => return reports,
                Err(e) => {
                    eprintln!("Warning: failed to analyze {}: {e:#}", file_path.display());
                    return (None, None);
                }
            }
        }
        (None, None)
    }

    fn run_analyzer(
        &self,
        analyzer: &dyn FrameworkAnalyzer,
        file_path: &Path,
        content: &str,
        templates: &dyn TemplateResolver,
    ) -> Result<FileReports> {
        let module = if analyzer.may_contain_module(content) {
            analyzer.analyze_module(file_path, content)?
        } else {
            None
        };
        let component = if analyzer.may_contain_component(content) {
            analyzer.analyze_component(file_path, content, templates)?
        } else {
            None
        };
        Ok((module, component))
    }
}
