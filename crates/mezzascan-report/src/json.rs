use serde::Serialize;

use mezzascan_core::types::AggregateReport;

/// Format a full compliance report as JSON.
pub fn format_report(report: &AggregateReport, compact: bool) -> String {
    if compact {
        serde_json::to_string(report).expect("AggregateReport should be serializable")
    } else {
        serde_json::to_string_pretty(report).expect("AggregateReport should be serializable")
    }
}

/// Wrapper for check output that adds pass/fail metadata.
#[derive(Debug, Serialize)]
pub struct CheckOutput<'a> {
    #[serde(flatten)]
    pub report: &'a AggregateReport,
    pub check: CheckStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckStatus {
    pub passed: bool,
    pub noncompliant_module_count: usize,
    pub unmarked_component_count: usize,
}

/// Format a check result as JSON. Returns (json_string, passed).
pub fn format_check(report: &AggregateReport, compact: bool) -> (String, bool) {
    let noncompliant_modules = report
        .modules
        .iter()
        .filter(|m| !m.is_compliant())
        .count();
    let unmarked_components = report
        .components
        .iter()
        .filter(|c| !c.is_tracked())
        .count();

    let passed = noncompliant_modules == 0 && unmarked_components == 0;

    let output = CheckOutput {
        report,
        check: CheckStatus {
            passed,
            noncompliant_module_count: noncompliant_modules,
            unmarked_component_count: unmarked_components,
        },
    };

    let json = if compact {
        serde_json::to_string(&output).expect("CheckOutput should be serializable")
    } else {
        serde_json::to_string_pretty(&output).expect("CheckOutput should be serializable")
    };

    (json, passed)
}
