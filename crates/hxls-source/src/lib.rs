mod file;
mod position;

pub use file::FileKind;
pub use position::ByteOffset;
pub use position::LineCol;
pub use position::LineIndex;
