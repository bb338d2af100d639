use anyhow::Result;

use mezzascan_core::config::InstrumentationConfig;
use mezzascan_core::types::{ComponentReport, TrackingStatus, INLINE_TEMPLATE};
use mezzascan_core::workspace::{self, TemplateResolver};

use crate::source::{string_literal_value, ParsedSource, SourceParser};
use crate::COMPONENT_DECORATOR;

/// Classify the file's primary component: the first class carrying the
/// component decorator. Returns `Ok(None)` when no such class exists.
///
/// An external template that cannot be resolved is an error; the caller
/// drops the whole file's contribution. A resolved template without the
/// marker is a normal unmarked report.
pub(crate) fn analyze(
    parser: &SourceParser,
    parsed: &ParsedSource,
    tokens: &InstrumentationConfig,
    templates: &dyn TemplateResolver,
) -> Result<Option<ComponentReport>> {
    let classes = parser.classes(parsed);
    let Some((class, decorator)) = classes
        .iter()
        .find_map(|c| c.decorator(COMPONENT_DECORATOR).map(|d| (*c, d)))
    else {
        return Ok(None);
    };

    let mut report = ComponentReport {
        component_name: class.name().unwrap_or_default(),
        file_path: parsed.path.to_string_lossy().to_string(),
        ..Default::default()
    };

    let template_url = decorator
        .property_value("templateUrl")
        .and_then(|value| string_literal_value(value, &parsed.content))
        .filter(|url| !url.is_empty());

    if let Some(url) = template_url {
        let file_name = workspace::file_name_from_path(&url).to_string();
        report.template_url = url;
        let Some(template) = templates.resolve(&file_name) else {
            anyhow::bail!(
                "template file '{}' referenced by '{}' not found in workspace",
                file_name,
                parsed.path.display()
            );
        };
        if template.contains(&tokens.marker) {
            report.status = TrackingStatus::Marked;
        }
    } else if let Some(template) = decorator
        .property_value("template")
        .and_then(|value| string_literal_value(value, &parsed.content))
        .filter(|template| !template.is_empty())
    {
        report.template = INLINE_TEMPLATE.to_string();
        if template.contains(&tokens.marker) {
            report.status = TrackingStatus::Marked;
        }
    }

    Ok(Some(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::Path;

    struct FakeTemplates(HashMap<String, String>);

    impl FakeTemplates {
        fn empty() -> Self {
            Self(HashMap::new())
        }

        fn with(name: &str, content: &str) -> Self {
            let mut map = HashMap::new();
            map.insert(name.to_string(), content.to_string());
            Self(map)
        }
    }

    impl TemplateResolver for FakeTemplates {
        fn resolve(&self, file_name: &str) -> Option<String> {
            self.0.get(file_name).cloned()
        }
    }

    fn analyze_str(
        content: &str,
        templates: &dyn TemplateResolver,
    ) -> Result<Option<ComponentReport>> {
        let parser = SourceParser::new().unwrap();
        let parsed = parser
            .parse(Path::new("src/app.component.ts"), content)
            .unwrap();
        analyze(
            &parser,
            &parsed,
            &InstrumentationConfig::default(),
            templates,
        )
    }

    #[test]
    fn test_inline_template_with_marker_is_marked() {
        let report = analyze_str(
            r#"
@Component({ template: '<div mezzurite>Hi</div>' })
export class AppComponent {}
"#,
            &FakeTemplates::empty(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(report.component_name, "AppComponent");
        assert_eq!(report.status, TrackingStatus::Marked);
        assert_eq!(report.template, INLINE_TEMPLATE);
        assert_eq!(report.template_url, "");
    }

    #[test]
    fn test_inline_template_without_marker_is_unmarked() {
        let report = analyze_str(
            r#"
@Component({ template: '<div>Hi</div>' })
export class AppComponent {}
"#,
            &FakeTemplates::empty(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(report.status, TrackingStatus::Unmarked);
        assert_eq!(report.template, INLINE_TEMPLATE);
    }

    #[test]
    fn test_backtick_template_is_scanned() {
        let report = analyze_str(
            "@Component({ template: `\n<h1 component-title=\"barrel\" mezzurite>\nHello\n</h1>` })\nexport class BarrelComponent {}\n",
            &FakeTemplates::empty(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(report.status, TrackingStatus::Marked);
    }

    #[test]
    fn test_template_url_resolved_without_marker_is_unmarked() {
        let report = analyze_str(
            r#"
@Component({ templateUrl: './x.html' })
export class AppComponent {}
"#,
            &FakeTemplates::with("x.html", "<div>plain</div>"),
        )
        .unwrap()
        .unwrap();
        assert_eq!(report.status, TrackingStatus::Unmarked);
        assert_eq!(report.template_url, "./x.html");
        assert_eq!(report.template, "");
    }

    #[test]
    fn test_template_url_resolved_with_marker_is_marked() {
        let report = analyze_str(
            r#"
@Component({ templateUrl: './views/home.html' })
export class HomeComponent {}
"#,
            &FakeTemplates::with("home.html", "<section mezzurite></section>"),
        )
        .unwrap()
        .unwrap();
        assert_eq!(report.status, TrackingStatus::Marked);
        assert_eq!(report.template_url, "./views/home.html");
    }

    #[test]
    fn test_unresolvable_template_url_is_an_error() {
        let result = analyze_str(
            r#"
@Component({ templateUrl: './missing.html' })
export class AppComponent {}
"#,
            &FakeTemplates::empty(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_no_component_decorator_yields_no_report() {
        let result = analyze_str(
            r#"
@NgModule({})
export class AppModule {}
"#,
            &FakeTemplates::empty(),
        )
        .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_component_without_template_properties_is_reportable() {
        let report = analyze_str(
            r#"
@Component({ selector: 'app-root' })
export class AppComponent {}
"#,
            &FakeTemplates::empty(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(report.status, TrackingStatus::Unmarked);
        assert_eq!(report.template, "");
        assert_eq!(report.template_url, "");
    }

    #[test]
    fn test_empty_template_url_falls_back_to_inline_template() {
        let report = analyze_str(
            r#"
@Component({ templateUrl: '', template: '<div mezzurite></div>' })
export class AppComponent {}
"#,
            &FakeTemplates::empty(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(report.status, TrackingStatus::Marked);
        assert_eq!(report.template, INLINE_TEMPLATE);
        assert_eq!(report.template_url, "");
    }

    #[test]
    fn test_only_first_component_class_is_reported() {
        let report = analyze_str(
            r#"
@Component({ template: '<div>plain</div>' })
export class FirstComponent {}

@Component({ template: '<div mezzurite></div>' })
export class SecondComponent {}
"#,
            &FakeTemplates::empty(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(report.component_name, "FirstComponent");
        assert_eq!(report.status, TrackingStatus::Unmarked);
    }

    #[test]
    fn test_non_literal_template_url_is_treated_as_absent() {
        let report = analyze_str(
            r#"
@Component({ templateUrl: TEMPLATE_PATH })
export class AppComponent {}
"#,
            &FakeTemplates::empty(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(report.status, TrackingStatus::Unmarked);
        assert_eq!(report.template_url, "");
    }
}
