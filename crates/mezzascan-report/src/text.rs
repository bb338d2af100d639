use colored::Colorize;

use mezzascan_core::types::{AggregateReport, ModuleReport, TrackingStatus};

/// Format a full compliance report for terminal output.
pub fn format_report(report: &AggregateReport) -> String {
    let mut out = String::new();

    // Header
    out.push_str(&format!(
        "\n{}\n",
        "Mezzascan - Instrumentation Compliance".bold()
    ));
    out.push_str(&format!("{}\n", "=".repeat(40)));

    if report.is_empty() {
        out.push_str("\nNo modules or components found.\n\n");
        return out;
    }

    // Modules
    if !report.modules.is_empty() {
        let compliant = report.modules.iter().filter(|m| m.is_compliant()).count();
        out.push_str(&format!(
            "\n{} ({} found, {} compliant)\n{}\n",
            "Modules".bold(),
            report.modules.len(),
            compliant,
            "-".repeat(40),
        ));
        for module in &report.modules {
            out.push_str(&format_module(module));
        }
    }

    // Components
    if !report.components.is_empty() {
        let marked = report.components.iter().filter(|c| c.is_tracked()).count();
        out.push_str(&format!(
            "\n{} ({} found, {} marked)\n{}\n",
            "Components".bold(),
            report.components.len(),
            marked,
            "-".repeat(40),
        ));
        for component in &report.components {
            let status = match component.status {
                TrackingStatus::Marked => "MARKED".green().bold().to_string(),
                TrackingStatus::Unmarked => "UNMARKED".yellow().bold().to_string(),
            };
            out.push_str(&format!(
                "  {} {} ({})\n",
                status, component.component_name, component.file_path,
            ));
        }
    }

    // Stats
    out.push_str(&format!(
        "\n{}: {} modules, {} components\n\n",
        "Summary".bold(),
        report.modules.len(),
        report.components.len(),
    ));

    out
}

fn format_module(module: &ModuleReport) -> String {
    let mut out = String::new();
    let name = if module.module_name.is_empty() {
        "<unnamed>"
    } else {
        module.module_name.as_str()
    };
    out.push_str(&format!("  {} ({})\n", name.bold(), module.file_path));
    out.push_str(&format!(
        "    import statement:     {}\n",
        flag(module.import_stmt)
    ));
    out.push_str(&format!(
        "    forRoot registration: {}\n",
        flag(module.for_root)
    ));
    out.push_str(&format!(
        "    router start:         {}\n",
        flag(module.router_start)
    ));
    out
}

fn flag(value: bool) -> String {
    if value {
        "yes".green().to_string()
    } else {
        "no".red().to_string()
    }
}

/// Format a check result for CI use. Returns (text, passed): passed iff
/// every module is fully compliant and every component is marked.
pub fn format_check(report: &AggregateReport) -> (String, bool) {
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

    let mut out = format_report(report);

    if passed {
        out.push_str(&format!("{}\n", "CHECK PASSED".green().bold()));
    } else {
        out.push_str(&format!(
            "{}: {} non-compliant module(s), {} unmarked component(s)\n",
            "CHECK FAILED".red().bold(),
            noncompliant_modules,
            unmarked_components,
        ));
    }

    (out, passed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mezzascan_core::types::{ComponentReport, INLINE_TEMPLATE};

    fn sample_report(compliant: bool) -> AggregateReport {
        AggregateReport {
            components: vec![ComponentReport {
                component_name: "AppComponent".to_string(),
                file_path: "src/app.component.ts".to_string(),
                status: if compliant {
                    TrackingStatus::Marked
                } else {
                    TrackingStatus::Unmarked
                },
                template: INLINE_TEMPLATE.to_string(),
                template_url: String::new(),
            }],
            modules: vec![ModuleReport {
                module_name: "AppModule".to_string(),
                file_path: "src/app.module.ts".to_string(),
                import_stmt: true,
                for_root: compliant,
                router_start: true,
            }],
        }
    }

    #[test]
    fn test_format_report_lists_modules_and_components() {
        let text = format_report(&sample_report(true));
        assert!(text.contains("AppModule"));
        assert!(text.contains("AppComponent"));
        assert!(text.contains("forRoot registration"));
        assert!(text.contains("1 modules, 1 components"));
    }

    #[test]
    fn test_format_report_empty() {
        let text = format_report(&AggregateReport::default());
        assert!(text.contains("No modules or components found"));
    }

    #[test]
    fn test_format_check_passed() {
        let (text, passed) = format_check(&sample_report(true));
        assert!(passed);
        assert!(text.contains("CHECK PASSED"));
    }

    #[test]
    fn test_format_check_failed_counts() {
        let (text, passed) = format_check(&sample_report(false));
        assert!(!passed);
        assert!(text.contains("CHECK FAILED"));
        assert!(text.contains("1 non-compliant module(s)"));
        assert!(text.contains("1 unmarked component(s)"));
    }

    #[test]
    fn test_unnamed_module_renders_placeholder() {
        let report = AggregateReport {
            components: vec![],
            modules: vec![ModuleReport::default()],
        };
        let text = format_report(&report);
        assert!(text.contains("<unnamed>"));
    }
}
