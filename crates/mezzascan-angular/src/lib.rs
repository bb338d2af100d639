mod component;
mod module;
pub mod source;

use std::path::Path;

use anyhow::Result;

use mezzascan_core::analyzer::FrameworkAnalyzer;
use mezzascan_core::config::InstrumentationConfig;
use mezzascan_core::types::{ComponentReport, ModuleReport};
use mezzascan_core::workspace::TemplateResolver;

use source::SourceParser;

/// Name of the framework's module-registration decorator.
pub const MODULE_DECORATOR: &str = "NgModule";
/// Name of the framework's component decorator.
pub const COMPONENT_DECORATOR: &str = "Component";

/// Decorator tokens as they appear in raw source, for the text-level
/// pre-filter that gates structural analysis.
const MODULE_DECORATOR_TOKEN: &str = "@NgModule";
const COMPONENT_DECORATOR_TOKEN: &str = "@Component";

/// Angular compliance analyzer: inspects decorated class declarations in
/// TypeScript sources for the instrumentation conventions.
pub struct AngularAnalyzer {
    parser: SourceParser,
    tokens: InstrumentationConfig,
}

impl AngularAnalyzer {
    pub fn new(tokens: InstrumentationConfig) -> Result<Self> {
        Ok(Self {
            parser: SourceParser::new()?,
            tokens,
        })
    }
}

impl FrameworkAnalyzer for AngularAnalyzer {
    fn framework(&self) -> &'static str {
        "angular"
    }

    fn file_extensions(&self) -> &[&str] {
        &["ts", "tsx"]
    }

    /// Necessary-but-not-sufficient gate: the token may occur in a comment
    /// or string, in which case structural analysis finds nothing.
    fn may_contain_module(&self, content: &str) -> bool {
        content.contains(MODULE_DECORATOR_TOKEN)
    }

    fn may_contain_component(&self, content: &str) -> bool {
        content.contains(COMPONENT_DECORATOR_TOKEN)
    }

    fn analyze_module(&self, path: &Path, content: &str) -> Result<Option<ModuleReport>> {
        let parsed = self.parser.parse(path, content)?;
        Ok(module::analyze(&self.parser, &parsed, &self.tokens))
    }

    fn analyze_component(
        &self,
        path: &Path,
        content: &str,
        templates: &dyn TemplateResolver,
    ) -> Result<Option<ComponentReport>> {
        let parsed = self.parser.parse(path, content)?;
        component::analyze(&self.parser, &parsed, &self.tokens, templates)
    }
}
