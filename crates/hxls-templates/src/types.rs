use std::fmt;

use camino::Utf8PathBuf;
use serde::Serialize;

/// The template tags that can name a handler.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TagKind {
    HxGet,
    HxPost,
    HxRequest,
    /// Names the handler through its `hx_request_name=` keyword argument.
    HxVals,
}

impl TagKind {
    #[must_use]
    pub fn from_tag_name(name: &str) -> Option<Self> {
        match name {
            "hx_get" => Some(TagKind::HxGet),
            "hx_post" => Some(TagKind::HxPost),
            "hx_request" => Some(TagKind::HxRequest),
            "hx_vals" => Some(TagKind::HxVals),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TagKind::HxGet => "hx_get",
            TagKind::HxPost => "hx_post",
            TagKind::HxRequest => "hx_request",
            TagKind::HxVals => "hx_vals",
        }
    }

    /// Whether the handler name is the first positional argument.
    #[must_use]
    pub fn is_positional(self) -> bool {
        !matches!(self, TagKind::HxVals)
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One place a template names a handler.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HandlerReference {
    pub name: String,
    pub tag_type: TagKind,
    pub file: Utf8PathBuf,
    /// 1-based.
    pub line_number: usize,
    /// 0-based character offset of the first character of `name`, after any
    /// opening quote.
    pub column: usize,
    /// The name was an unquoted template variable, so its target is only
    /// known at render time.
    pub is_variable: bool,
}

/// A handler name found under a cursor position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NameAtPosition {
    pub name: String,
    /// 0-based start column, inclusive.
    pub start: usize,
    /// 0-based end column, exclusive.
    pub end: usize,
    pub tag_type: TagKind,
    pub is_variable: bool,
}
