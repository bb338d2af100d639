use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration from `.mezzascan.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub instrumentation: InstrumentationConfig,
}

/// Which files the workspace scan considers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default = "default_include_patterns")]
    pub include: Vec<String>,
    #[serde(default = "default_exclude_patterns")]
    pub exclude: Vec<String>,
}

fn default_include_patterns() -> Vec<String> {
    vec!["**/*.ts".to_string()]
}

fn default_exclude_patterns() -> Vec<String> {
    vec!["**/node_modules/**".to_string()]
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            include: default_include_patterns(),
            exclude: default_exclude_patterns(),
        }
    }
}

/// Token table for the instrumentation conventions being checked.
/// Defaults target the Mezzurite Angular package; an alternative
/// instrumentation stack can be scanned by overriding these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentationConfig {
    /// Import specifier that must appear in a compliant module file.
    #[serde(default = "default_package")]
    pub package: String,
    /// Callee of the root-registration call expected in the module
    /// decorator's `imports` array.
    #[serde(default = "default_root_call")]
    pub root_call: String,
    /// Type name expected on a constructor parameter of a compliant module.
    #[serde(default = "default_routing_service")]
    pub routing_service: String,
    /// Method that must be invoked from that constructor's body.
    #[serde(default = "default_start_method")]
    pub start_method: String,
    /// Attribute searched for in template text to decide tracking status.
    #[serde(default = "default_marker")]
    pub marker: String,
}

fn default_package() -> String {
    "@microsoft/mezzurite-angular".to_string()
}

fn default_root_call() -> String {
    "MezzuriteAngularModule.forRoot".to_string()
}

fn default_routing_service() -> String {
    "RoutingService".to_string()
}

fn default_start_method() -> String {
    "start".to_string()
}

fn default_marker() -> String {
    "mezzurite".to_string()
}

impl Default for InstrumentationConfig {
    fn default() -> Self {
        Self {
            package: default_package(),
            root_call: default_root_call(),
            routing_service: default_routing_service(),
            start_method: default_start_method(),
            marker: default_marker(),
        }
    }
}

impl Config {
    /// Load configuration from a `.mezzascan.toml` file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        let config: Config = toml::from_str(&content).with_context(|| {
            format!(
                "failed to parse '{}'. Run `mezzascan init` to create a valid config file",
                path.display()
            )
        })?;
        Ok(config)
    }

    /// Load from `.mezzascan.toml` in the given directory or any ancestor,
    /// or return defaults.
    pub fn load_or_default(dir: &Path) -> Self {
        let start = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
        let mut current = start.as_path();
        loop {
            let config_path = current.join(".mezzascan.toml");
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(config) => config,
                    Err(e) => {
                        eprintln!(
                            "Warning: failed to load config from '{}': {e:#}. Using defaults.",
                            config_path.display()
                        );
                        Self::default()
                    }
                };
            }
            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }
        Self::default()
    }

    /// Generate default TOML content for `mezzascan init`.
    pub fn default_toml() -> String {
        r#"# Mezzascan - Instrumentation Compliance Configuration

[scan]
# Glob patterns relative to the scanned workspace root
include = ["**/*.ts"]
exclude = ["**/node_modules/**"]

[instrumentation]
# Tokens the compliance checks look for. Defaults target Mezzurite.
package = "@microsoft/mezzurite-angular"
root_call = "MezzuriteAngularModule.forRoot"
routing_service = "RoutingService"
start_method = "start"
marker = "mezzurite"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_targets_mezzurite() {
        let config = Config::default();
        assert_eq!(config.instrumentation.package, "@microsoft/mezzurite-angular");
        assert_eq!(config.instrumentation.root_call, "MezzuriteAngularModule.forRoot");
        assert_eq!(config.instrumentation.marker, "mezzurite");
        assert_eq!(config.scan.include, vec!["**/*.ts"]);
        assert_eq!(config.scan.exclude, vec!["**/node_modules/**"]);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [instrumentation]
            marker = "tracked"
            "#,
        )
        .unwrap();
        assert_eq!(config.instrumentation.marker, "tracked");
        assert_eq!(config.instrumentation.routing_service, "RoutingService");
        assert_eq!(config.scan.include, vec!["**/*.ts"]);
    }

    #[test]
    fn test_default_toml_round_trips() {
        let config: Config = toml::from_str(&Config::default_toml()).unwrap();
        assert_eq!(config.instrumentation.start_method, "start");
    }

    #[test]
    fn test_load_or_default_walks_ancestors() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        std::fs::write(
            root.join(".mezzascan.toml"),
            "[instrumentation]\nmarker = \"perf\"\n",
        )
        .unwrap();
        let nested = root.join("src/app");
        std::fs::create_dir_all(&nested).unwrap();

        let config = Config::load_or_default(&nested);
        assert_eq!(config.instrumentation.marker, "perf");
    }

    #[test]
    fn test_load_missing_file_errors() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(Config::load(&tmp.path().join(".mezzascan.toml")).is_err());
    }
}
