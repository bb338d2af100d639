use mezzascan_core::config::InstrumentationConfig;
use mezzascan_core::types::ModuleReport;

use crate::source::{
    call_argument_count, call_callee, contains_call_to, ClassDecl, Decorator, ParsedSource,
    SourceParser,
};
use crate::MODULE_DECORATOR;

/// Classify one file's module declarations against the three-part
/// instrumentation contract. Returns `None` when no class in the file
/// carries the module decorator.
///
/// Every class is scanned: the booleans accumulate across all of them while
/// the module name is overwritten by each decorated class in turn.
pub(crate) fn analyze(
    parser: &SourceParser,
    parsed: &ParsedSource,
    tokens: &InstrumentationConfig,
) -> Option<ModuleReport> {
    let mut report = ModuleReport::default();
    let mut module_found = false;

    if parser
        .import_specifiers(parsed)
        .iter()
        .any(|specifier| specifier == &tokens.package)
    {
        report.import_stmt = true;
    }

    for class in parser.classes(parsed) {
        if let Some(decorator) = class.decorator(MODULE_DECORATOR) {
            module_found = true;
            report.module_name = class.name().unwrap_or_default();
            if !report.for_root && registers_root(&decorator, parsed, tokens) {
                report.for_root = true;
            }
        }
        if !report.router_start && starts_routing(&class, parsed, tokens) {
            report.router_start = true;
        }
        if report.import_stmt && report.for_root && report.router_start {
            break;
        }
    }

    if !module_found {
        return None;
    }
    report.file_path = parsed.path.to_string_lossy().to_string();
    Some(report)
}

/// True when the decorator's `imports` array contains the root-registration
/// call: a call expression whose callee equals the configured path and whose
/// argument list is empty. A similarly-shaped call to another module does
/// not qualify.
fn registers_root(
    decorator: &Decorator,
    parsed: &ParsedSource,
    tokens: &InstrumentationConfig,
) -> bool {
    decorator.import_elements().into_iter().any(|element| {
        call_callee(element, &parsed.content).as_deref() == Some(tokens.root_call.as_str())
            && call_argument_count(element) == 0
    })
}

/// True when some constructor on the class both declares a parameter typed
/// with the routing-service type and invokes the start method from an
/// expression statement in its body.
fn starts_routing(
    class: &ClassDecl,
    parsed: &ParsedSource,
    tokens: &InstrumentationConfig,
) -> bool {
    class.constructors().into_iter().any(|ctor| {
        ctor.parameter_types()
            .iter()
            .any(|ty| ty.contains(&tokens.routing_service))
            && ctor.body_statements().into_iter().any(|stmt| {
                stmt.kind() == "expression_statement"
                    && contains_call_to(stmt, &parsed.content, &tokens.start_method)
            })
    })
}
