use hxls_python::HandlerDefinition;
use serde::Serialize;

/// What a full build found.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub source_files: usize,
    pub template_files: usize,
    /// Files the walk returned but that could not be read.
    pub skipped_files: usize,
    /// Distinct handler names with a current definition.
    pub definitions: usize,
    /// Every recorded reference, variables included.
    pub usages: usize,
}

/// A handler name declared by more than one file.
///
/// `winner` is what `get_definition` returns; `shadowed` holds the other
/// declarations, most recently indexed first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DuplicateDefinition {
    pub name: String,
    pub winner: HandlerDefinition,
    pub shadowed: Vec<HandlerDefinition>,
}
