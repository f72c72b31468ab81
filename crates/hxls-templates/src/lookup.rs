use hxls_source::ByteOffset;
use hxls_source::LineIndex;

use crate::scanner::scan_names;
use crate::types::NameAtPosition;

/// Find the handler name whose token covers a cursor position.
///
/// `line` is 1-based and `column` 0-based, both in characters. The match is
/// against the name itself, quotes excluded, so the cursor must sit on one of
/// the name's characters. Variable names are returned as well as literals.
#[must_use]
pub fn name_at_position(source: &str, line: usize, column: usize) -> Option<NameAtPosition> {
    let line_index = LineIndex::from_text(source);
    if line == 0 || line > line_index.line_count() {
        return None;
    }

    scan_names(source).into_iter().find_map(|token| {
        let position = line_index.to_char_line_col(source, ByteOffset::from_usize(token.offset));
        if position.line() as usize + 1 != line {
            return None;
        }

        let start = position.column() as usize;
        let end = start + token.name.chars().count();
        (start..end).contains(&column).then(|| NameAtPosition {
            name: token.name.to_string(),
            start,
            end,
            tag_type: token.tag,
            is_variable: token.is_variable,
        })
    })
}
