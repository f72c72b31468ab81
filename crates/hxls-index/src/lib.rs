//! The handler cross-reference index.
//!
//! [`HandlerIndex`] ties handler definitions parsed from Python modules to the
//! template tags that name them, and keeps both sides current as individual
//! files change. It is an ordinary value: share it by reference or `Arc`.

mod error;
mod index;
mod options;
mod state;
mod types;

pub use error::IndexError;
pub use index::HandlerIndex;
pub use options::IndexOptions;
pub use types::DuplicateDefinition;
pub use types::IndexStats;

pub use hxls_python::HandlerDefinition;
pub use hxls_templates::HandlerReference;
pub use hxls_templates::TagKind;
