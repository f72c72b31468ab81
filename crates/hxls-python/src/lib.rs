//! Handler definitions extracted from Python source.
//!
//! A handler is a class whose immediate bases match [`BaseClassRules`] and
//! whose body assigns a string literal to `name`. Matching is lexical: bases
//! are compared by the identifier text as written, imports are never
//! resolved.

mod ext;
mod extract;
mod rules;
mod types;

pub use extract::parse_definitions;
pub use extract::parse_definitions_with;
pub use rules::BaseClassRules;
pub use types::HandlerDefinition;
