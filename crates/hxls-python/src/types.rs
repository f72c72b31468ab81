use camino::Utf8PathBuf;
use serde::Serialize;

/// One declared handler class.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HandlerDefinition {
    /// The literal the handler is addressed by from templates.
    pub name: String,
    pub class_name: String,
    /// Immediate bases as written, dotted for attribute bases.
    pub base_classes: Vec<String>,
    pub docstring: Option<String>,
    pub get_template: Option<String>,
    pub post_template: Option<String>,
    pub file: Utf8PathBuf,
    /// 1-based line of the `class` statement.
    pub line_number: usize,
}
