/// File classification for routing to the matching parser.
///
/// Classification is purely by filename; see `hxls_workspace::FileConventions`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum FileKind {
    /// Python module that may declare handlers
    Python,
    /// Django template that may reference handlers
    Template,
    /// Anything else; never indexed
    Other,
}

impl FileKind {
    #[must_use]
    pub fn is_indexed(self) -> bool {
        !matches!(self, FileKind::Other)
    }
}
