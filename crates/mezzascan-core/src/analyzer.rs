use std::path::Path;

use anyhow::Result;

use crate::types::{ComponentReport, ModuleReport};
use crate::workspace::TemplateResolver;

/// Trait that each framework rule-set must implement.
///
/// `Ok(None)` means the file carries no decorated class of the requested
/// kind; that is a normal outcome. `Err` means the file could not be
/// analyzed at all (unreadable companion file, parse failure) and the
/// pipeline excludes it from both report lists.
pub trait FrameworkAnalyzer: Send + Sync {
    /// Framework name (e.g., "angular")
    fn framework(&self) -> &'static str;

    /// File extensions this analyzer handles (e.g., &["ts"])
    fn file_extensions(&self) -> &[&str];

    /// Cheap text-level gate: can this file possibly declare a module?
    fn may_contain_module(&self, content: &str) -> bool;

    /// Cheap text-level gate: can this file possibly declare a component?
    fn may_contain_component(&self, content: &str) -> bool;

    /// Classify the file's module declarations against the instrumentation
    /// contract.
    fn analyze_module(&self, path: &Path, content: &str) -> Result<Option<ModuleReport>>;

    /// Classify the file's primary component declaration. External template
    /// references are resolved through `templates`.
    fn analyze_component(
        &self,
        path: &Path,
        content: &str,
        templates: &dyn TemplateResolver,
    ) -> Result<Option<ComponentReport>>;
}
