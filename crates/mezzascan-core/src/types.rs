use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel stored in `ComponentReport::template` when a component carries an
/// inline template. The literal template contents are never copied into the
/// report.
pub const INLINE_TEMPLATE: &str = "Inline template provided";

/// Whether a component's rendered template carries the tracking marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackingStatus {
    Marked,
    #[default]
    Unmarked,
}

impl fmt::Display for TrackingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackingStatus::Marked => write!(f, "marked"),
            TrackingStatus::Unmarked => write!(f, "unmarked"),
        }
    }
}

/// Compliance facts for one component-decorated class.
///
/// Only the first component class found in a file is ever reported; a file
/// with no component class produces no report at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentReport {
    pub component_name: String,
    pub file_path: String,
    pub status: TrackingStatus,
    /// `INLINE_TEMPLATE` when an inline template was present, else empty.
    pub template: String,
    /// The literal `templateUrl` value when present, else empty.
    pub template_url: String,
}

impl ComponentReport {
    pub fn is_tracked(&self) -> bool {
        self.status == TrackingStatus::Marked
    }
}

/// Compliance facts for one file's module declarations.
///
/// Booleans start false and are set true once discovered. `module_name` is
/// overwritten by each module-decorated class in declaration order, so the
/// last one wins while the booleans accumulate across all of them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleReport {
    pub module_name: String,
    pub file_path: String,
    pub import_stmt: bool,
    pub for_root: bool,
    pub router_start: bool,
}

impl ModuleReport {
    /// True when the module satisfies the full three-part contract.
    pub fn is_compliant(&self) -> bool {
        self.import_stmt && self.for_root && self.router_start
    }
}

/// Terminal artifact of a scan, ordered by file-processing order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregateReport {
    pub components: Vec<ComponentReport>,
    pub modules: Vec<ModuleReport>,
}

impl AggregateReport {
    pub fn is_empty(&self) -> bool {
        self.components.is_empty() && self.modules.is_empty()
    }
}
