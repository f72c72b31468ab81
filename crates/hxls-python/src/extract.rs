use camino::Utf8Path;
use ruff_python_ast::statement_visitor::walk_stmt;
use ruff_python_ast::statement_visitor::StatementVisitor;
use ruff_python_ast::Stmt;
use ruff_python_ast::StmtClassDef;

use crate::ext::literal_assignment;
use crate::ext::ExprExt;
use crate::rules::BaseClassRules;
use crate::types::HandlerDefinition;

const NAME_ATTRIBUTE: &str = "name";
const GET_TEMPLATE_ATTRIBUTE: &str = "GET_template";
const POST_TEMPLATE_ATTRIBUTE: &str = "POST_template";

/// Extract handler definitions from Python source text using the built-in
/// base class rules.
///
/// Source that fails to parse yields no definitions; a half-typed file is
/// the normal state while editing.
#[must_use]
pub fn parse_definitions(source: &str, file: &Utf8Path) -> Vec<HandlerDefinition> {
    parse_definitions_with(source, file, &BaseClassRules::default())
}

/// Extract handler definitions, deciding candidacy with `rules`.
///
/// Every class statement is considered, including classes nested in other
/// classes, functions, or conditional blocks. Definitions are returned in
/// source order.
#[must_use]
pub fn parse_definitions_with(
    source: &str,
    file: &Utf8Path,
    rules: &BaseClassRules,
) -> Vec<HandlerDefinition> {
    let Ok(parsed) = ruff_python_parser::parse_module(source) else {
        tracing::debug!(%file, "Skipping Python file with syntax errors");
        return Vec::new();
    };
    let module = parsed.into_syntax();

    let mut collector = HandlerCollector {
        source,
        file,
        rules,
        definitions: Vec::new(),
    };
    collector.visit_body(&module.body);
    collector.definitions
}

struct HandlerCollector<'a> {
    source: &'a str,
    file: &'a Utf8Path,
    rules: &'a BaseClassRules,
    definitions: Vec<HandlerDefinition>,
}

impl StatementVisitor<'_> for HandlerCollector<'_> {
    fn visit_stmt(&mut self, stmt: &Stmt) {
        if let Stmt::ClassDef(class) = stmt {
            if let Some(definition) = self.extract_definition(class) {
                self.definitions.push(definition);
            }
        }
        walk_stmt(self, stmt);
    }
}

impl HandlerCollector<'_> {
    fn extract_definition(&self, class: &StmtClassDef) -> Option<HandlerDefinition> {
        let base_classes: Vec<String> = class
            .arguments
            .as_deref()
            .map(|args| args.args.iter().filter_map(ExprExt::dotted_name).collect())
            .unwrap_or_default();

        if !self
            .rules
            .is_candidate(base_classes.iter().map(String::as_str))
        {
            return None;
        }

        let mut name = None;
        let mut get_template = None;
        let mut post_template = None;

        for stmt in &class.body {
            if let Some(value) = literal_assignment(stmt, NAME_ATTRIBUTE) {
                name = Some(value);
            } else if let Some(value) = literal_assignment(stmt, GET_TEMPLATE_ATTRIBUTE) {
                get_template = Some(value);
            } else if let Some(value) = literal_assignment(stmt, POST_TEMPLATE_ATTRIBUTE) {
                post_template = Some(value);
            }
        }

        let Some(name) = name.filter(|name| !name.is_empty()) else {
            tracing::trace!(class = %class.name, "Handler base without a literal name");
            return None;
        };

        Some(HandlerDefinition {
            name,
            class_name: class.name.to_string(),
            base_classes,
            docstring: class_docstring(&class.body),
            get_template,
            post_template,
            file: self.file.to_owned(),
            // The identifier sits on the `class` line even when decorators
            // precede it.
            line_number: line_number(self.source, class.name.range.start().to_usize()),
        })
    }
}

fn class_docstring(body: &[Stmt]) -> Option<String> {
    let Some(Stmt::Expr(expr)) = body.first() else {
        return None;
    };
    let raw = expr.value.string_literal()?;
    let cleaned = clean_docstring(&raw);
    (!cleaned.is_empty()).then_some(cleaned)
}

/// Normalise docstring indentation the way Python's `inspect.cleandoc` does.
fn clean_docstring(raw: &str) -> String {
    let expanded = raw.replace('\t', "        ");
    let mut lines = expanded.lines();
    let first = lines.next().unwrap_or_default().trim();
    let rest: Vec<&str> = lines.collect();

    let margin = rest
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut cleaned: Vec<&str> = Vec::with_capacity(rest.len() + 1);
    cleaned.push(first);
    for line in rest {
        cleaned.push(line.get(margin..).unwrap_or_else(|| line.trim_start()).trim_end());
    }

    while cleaned.first().is_some_and(|line| line.is_empty()) {
        cleaned.remove(0);
    }
    while cleaned.last().is_some_and(|line| line.is_empty()) {
        cleaned.pop();
    }

    cleaned.join("\n")
}

fn line_number(source: &str, offset: usize) -> usize {
    source[..offset].bytes().filter(|&b| b == b'\n').count() + 1
}
