use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tree_sitter::{Language, Node, Parser, Query, QueryCursor, StreamingIterator, Tree};

/// Holds queries compiled for a specific TypeScript dialect.
struct QuerySet {
    class_query: Query,
    import_query: Query,
}

const CLASS_QUERY_SRC: &str = r#"
(class_declaration
  name: (type_identifier) @name) @class
"#;

const IMPORT_QUERY_SRC: &str = r#"
(import_statement
  source: (string) @path)
"#;

fn compile_queries(language: &Language) -> Result<QuerySet> {
    Ok(QuerySet {
        class_query: Query::new(language, CLASS_QUERY_SRC)
            .context("failed to compile class query")?,
        import_query: Query::new(language, IMPORT_QUERY_SRC)
            .context("failed to compile import query")?,
    })
}

/// A parsed source file with its tree-sitter AST and original content.
pub struct ParsedSource {
    pub path: PathBuf,
    pub tree: Tree,
    pub content: String,
}

/// Explicit parsing context for TypeScript/TSX sources. Created once and
/// reused for every file in a scan.
pub struct SourceParser {
    ts_language: Language,
    tsx_language: Language,
    ts_queries: QuerySet,
    tsx_queries: QuerySet,
}

impl SourceParser {
    pub fn new() -> Result<Self> {
        let ts_language: Language = tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into();
        let tsx_language: Language = tree_sitter_typescript::LANGUAGE_TSX.into();

        let ts_queries = compile_queries(&ts_language)?;
        let tsx_queries = compile_queries(&tsx_language)?;

        Ok(Self {
            ts_language,
            tsx_language,
            ts_queries,
            tsx_queries,
        })
    }

    fn language_for_file(&self, path: &Path) -> &Language {
        match path.extension().and_then(|e| e.to_str()) {
            Some("tsx") => &self.tsx_language,
            _ => &self.ts_language,
        }
    }

    fn queries_for_file(&self, path: &Path) -> &QuerySet {
        match path.extension().and_then(|e| e.to_str()) {
            Some("tsx") => &self.tsx_queries,
            _ => &self.ts_queries,
        }
    }

    pub fn parse(&self, path: &Path, content: &str) -> Result<ParsedSource> {
        let language = self.language_for_file(path);
        let mut parser = Parser::new();
        parser
            .set_language(language)
            .context("failed to set TypeScript language")?;
        let tree = parser
            .parse(content, None)
            .context("failed to parse TypeScript file")?;
        Ok(ParsedSource {
            path: path.to_path_buf(),
            tree,
            content: content.to_string(),
        })
    }

    /// All class declarations in the file, in declaration order.
    pub fn classes<'a>(&self, parsed: &'a ParsedSource) -> Vec<ClassDecl<'a>> {
        let queries = self.queries_for_file(&parsed.path);
        let class_idx = queries
            .class_query
            .capture_names()
            .iter()
            .position(|n| *n == "class")
            .unwrap_or(0);

        let mut classes = Vec::new();
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(
            &queries.class_query,
            parsed.tree.root_node(),
            parsed.content.as_bytes(),
        );

        while let Some(m) = matches.next() {
            for capture in m.captures {
                if capture.index as usize == class_idx {
                    classes.push(ClassDecl {
                        node: capture.node,
                        source: &parsed.content,
                    });
                }
            }
        }
        classes.sort_by_key(|c| c.node.start_byte());
        classes
    }

    /// Import specifiers declared in the file, quotes stripped.
    pub fn import_specifiers(&self, parsed: &ParsedSource) -> Vec<String> {
        let queries = self.queries_for_file(&parsed.path);
        let path_idx = queries
            .import_query
            .capture_names()
            .iter()
            .position(|n| *n == "path")
            .unwrap_or(0);

        let mut specifiers = Vec::new();
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(
            &queries.import_query,
            parsed.tree.root_node(),
            parsed.content.as_bytes(),
        );

        while let Some(m) = matches.next() {
            for capture in m.captures {
                if capture.index as usize == path_idx {
                    let raw = node_text(capture.node, &parsed.content);
                    specifiers.push(raw.trim_matches('"').trim_matches('\'').to_string());
                }
            }
        }
        specifiers
    }
}

/// A class declaration together with its decorators and constructors.
#[derive(Clone, Copy)]
pub struct ClassDecl<'a> {
    node: Node<'a>,
    source: &'a str,
}

impl<'a> ClassDecl<'a> {
    pub fn name(&self) -> Option<String> {
        self.node
            .child_by_field_name("name")
            .map(|n| node_text(n, self.source))
    }

    /// Decorators attached to this class. A decorator written before an
    /// `export` keyword hangs off the enclosing export statement in the
    /// grammar; both placements belong to the class.
    pub fn decorators(&self) -> Vec<Decorator<'a>> {
        let mut decorators = Vec::new();
        collect_decorators(self.node, self.source, &mut decorators);
        if let Some(parent) = self.node.parent() {
            if parent.kind() == "export_statement" {
                collect_decorators(parent, self.source, &mut decorators);
            }
        }
        decorators
    }

    /// First decorator with the given name, if any. Absence is a normal
    /// outcome.
    pub fn decorator(&self, name: &str) -> Option<Decorator<'a>> {
        self.decorators()
            .into_iter()
            .find(|d| d.name().as_deref() == Some(name))
    }

    /// Constructor declarations in this class body.
    pub fn constructors(&self) -> Vec<Constructor<'a>> {
        let mut constructors = Vec::new();
        if let Some(body) = self.node.child_by_field_name("body") {
            let mut cursor = body.walk();
            for member in body.named_children(&mut cursor) {
                if member.kind() == "method_definition"
                    && member
                        .child_by_field_name("name")
                        .is_some_and(|n| node_text(n, self.source) == "constructor")
                {
                    constructors.push(Constructor {
                        node: member,
                        source: self.source,
                    });
                }
            }
        }
        constructors
    }
}

fn collect_decorators<'a>(node: Node<'a>, source: &'a str, out: &mut Vec<Decorator<'a>>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "decorator" {
            out.push(Decorator {
                node: child,
                source,
            });
        }
    }
}

/// A decorator annotation: a name plus an ordered argument list of
/// property bags.
#[derive(Clone, Copy)]
pub struct Decorator<'a> {
    node: Node<'a>,
    source: &'a str,
}

impl<'a> Decorator<'a> {
    /// The decorator's name as written, without the `@` sigil or any
    /// qualifying path.
    pub fn name(&self) -> Option<String> {
        let expr = self.node.named_child(0)?;
        let target = match expr.kind() {
            "call_expression" => expr.child_by_field_name("function")?,
            _ => expr,
        };
        match target.kind() {
            "identifier" => Some(node_text(target, self.source)),
            "member_expression" => target
                .child_by_field_name("property")
                .map(|p| node_text(p, self.source)),
            _ => None,
        }
    }

    /// Argument expressions, in call order. A bare decorator has none.
    pub fn arguments(&self) -> Vec<Node<'a>> {
        let Some(expr) = self.node.named_child(0) else {
            return Vec::new();
        };
        if expr.kind() != "call_expression" {
            return Vec::new();
        }
        let Some(args) = expr.child_by_field_name("arguments") else {
            return Vec::new();
        };
        let mut cursor = args.walk();
        args.named_children(&mut cursor).collect()
    }

    /// Value of the first property named `name` across the decorator's
    /// object-literal arguments, in argument order. Decorators may
    /// legitimately have no matching property.
    pub fn property_value(&self, name: &str) -> Option<Node<'a>> {
        for arg in self.arguments() {
            if arg.kind() != "object" {
                continue;
            }
            let mut cursor = arg.walk();
            for entry in arg.named_children(&mut cursor) {
                if entry.kind() != "pair" {
                    continue;
                }
                let Some(key) = entry.child_by_field_name("key") else {
                    continue;
                };
                if key_matches(key, self.source, name) {
                    return entry.child_by_field_name("value");
                }
            }
        }
        None
    }

    /// Elements of the `imports` array property. A missing property or a
    /// non-array initializer yields an empty sequence, never an error.
    pub fn import_elements(&self) -> Vec<Node<'a>> {
        match self.property_value("imports") {
            Some(value) if value.kind() == "array" => {
                let mut cursor = value.walk();
                value.named_children(&mut cursor).collect()
            }
            _ => Vec::new(),
        }
    }
}

fn key_matches(key: Node, source: &str, name: &str) -> bool {
    match key.kind() {
        "string" => string_literal_value(key, source).as_deref() == Some(name),
        _ => node_text(key, source) == name,
    }
}

/// A constructor declaration inside a class body.
#[derive(Clone, Copy)]
pub struct Constructor<'a> {
    node: Node<'a>,
    source: &'a str,
}

impl<'a> Constructor<'a> {
    /// Declared type text of each parameter that carries a type annotation.
    pub fn parameter_types(&self) -> Vec<String> {
        let Some(params) = self.node.child_by_field_name("parameters") else {
            return Vec::new();
        };
        let mut cursor = params.walk();
        params
            .named_children(&mut cursor)
            .filter_map(|p| p.child_by_field_name("type"))
            .filter_map(|annotation| annotation.named_child(0))
            .map(|ty| node_text(ty, self.source))
            .collect()
    }

    /// Statements of the constructor body, in order.
    pub fn body_statements(&self) -> Vec<Node<'a>> {
        let Some(body) = self.node.child_by_field_name("body") else {
            return Vec::new();
        };
        let mut cursor = body.walk();
        body.named_children(&mut cursor).collect()
    }
}

/// Extract text from a tree-sitter node.
pub fn node_text(node: Node, source: &str) -> String {
    source[node.byte_range()].to_string()
}

/// Literal value of a string or template-string node. Interpolated
/// substitutions are skipped; escape sequences are kept as written.
pub fn string_literal_value(node: Node, source: &str) -> Option<String> {
    match node.kind() {
        "string" | "template_string" => {
            let mut out = String::new();
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                if matches!(child.kind(), "string_fragment" | "escape_sequence") {
                    out.push_str(&source[child.byte_range()]);
                }
            }
            Some(out)
        }
        _ => None,
    }
}

/// Callee path of a call expression with all whitespace stripped, so
/// formatting differences do not affect matching.
pub fn call_callee(node: Node, source: &str) -> Option<String> {
    if node.kind() != "call_expression" {
        return None;
    }
    let func = node.child_by_field_name("function")?;
    Some(
        source[func.byte_range()]
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect(),
    )
}

/// Number of arguments passed in a call expression.
pub fn call_argument_count(node: Node) -> usize {
    node.child_by_field_name("arguments")
        .map(|args| args.named_child_count())
        .unwrap_or(0)
}

/// True when the subtree contains a call whose callee is the given method
/// name, either as a bare identifier or as the final member of a path.
pub fn contains_call_to(node: Node, source: &str, method: &str) -> bool {
    if node.kind() == "call_expression" {
        if let Some(func) = node.child_by_field_name("function") {
            let name = match func.kind() {
                "identifier" => Some(node_text(func, source)),
                "member_expression" => func
                    .child_by_field_name("property")
                    .map(|p| node_text(p, source)),
                _ => None,
            };
            if name.as_deref() == Some(method) {
                return true;
            }
        }
    }
    let mut cursor = node.walk();
    let found = node
        .named_children(&mut cursor)
        .any(|child| contains_call_to(child, source, method));
    found
}
