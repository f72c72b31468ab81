use ruff_python_ast::Expr;
use ruff_python_ast::ExprAttribute;
use ruff_python_ast::ExprName;
use ruff_python_ast::ExprStringLiteral;
use ruff_python_ast::Stmt;

pub(crate) trait ExprExt {
    /// Extract the full string value from a string literal expression.
    fn string_literal(&self) -> Option<String>;

    /// Render a `Name` or chain of attribute accesses as dotted text
    /// (`hx_requests.BaseHxRequest`). Any other expression yields `None`.
    fn dotted_name(&self) -> Option<String>;

    /// Check if the expression is the bare name `id`.
    fn is_name(&self, id: &str) -> bool;
}

impl ExprExt for Expr {
    fn string_literal(&self) -> Option<String> {
        if let Expr::StringLiteral(ExprStringLiteral { value, .. }) = self {
            return Some(value.to_str().to_string());
        }
        None
    }

    fn dotted_name(&self) -> Option<String> {
        match self {
            Expr::Name(ExprName { id, .. }) => Some(id.to_string()),
            Expr::Attribute(ExprAttribute { value, attr, .. }) => {
                let prefix = value.dotted_name()?;
                Some(format!("{prefix}.{}", attr.as_str()))
            }
            _ => None,
        }
    }

    fn is_name(&self, id: &str) -> bool {
        matches!(self, Expr::Name(name) if name.id.as_str() == id)
    }
}

/// The string assigned to `attribute` by a plain or annotated assignment
/// statement, if `stmt` is one.
pub(crate) fn literal_assignment(stmt: &Stmt, attribute: &str) -> Option<String> {
    match stmt {
        Stmt::Assign(assign) => {
            if assign.targets.iter().any(|target| target.is_name(attribute)) {
                assign.value.string_literal()
            } else {
                None
            }
        }
        Stmt::AnnAssign(assign) if assign.target.is_name(attribute) => {
            assign.value.as_deref().and_then(ExprExt::string_literal)
        }
        _ => None,
    }
}
