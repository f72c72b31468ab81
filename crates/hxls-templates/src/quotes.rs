/// Find positions of a delimiter character in `s`, skipping occurrences inside
/// single- or double-quoted regions.
///
/// When `handle_escapes` is true, `\` inside a quoted region escapes the next
/// character (so `\"` does not close the quote).
///
/// The callback receives the byte index of each unquoted delimiter found.
/// Return `true` from the callback to stop early.
pub(crate) fn for_each_unquoted(
    s: &str,
    delimiter: impl Fn(char) -> bool,
    handle_escapes: bool,
    mut cb: impl FnMut(usize) -> bool,
) {
    let mut quote: Option<char> = None;
    let mut escape = false;

    for (idx, ch) in s.char_indices() {
        if escape {
            escape = false;
            continue;
        }
        match ch {
            '\\' if handle_escapes && quote.is_some() => {
                escape = true;
            }
            '"' | '\'' if quote == Some(ch) => {
                quote = None;
            }
            '"' | '\'' if quote.is_none() => {
                quote = Some(ch);
            }
            _ if quote.is_some() => {}
            _ if delimiter(ch) => {
                if cb(idx) {
                    return;
                }
            }
            _ => {}
        }
    }
}

/// Byte index of the first unquoted `=` in `s`.
pub(crate) fn find_unquoted_equals(s: &str) -> Option<usize> {
    let mut found = None;
    for_each_unquoted(
        s,
        |ch| ch == '=',
        true,
        |idx| {
            found = Some(idx);
            true
        },
    );
    found
}

/// Split `s` on whitespace while respecting quoted regions (with escape
/// handling), keeping the byte offset of each piece within `s`.
pub(crate) fn split_on_whitespace(s: &str) -> Vec<(usize, &str)> {
    let mut pieces = Vec::with_capacity((s.len() / 8).clamp(2, 8));
    let mut start = None;
    let mut quote: Option<char> = None;
    let mut escape = false;

    for (idx, ch) in s.char_indices() {
        if escape {
            escape = false;
            continue;
        }
        match ch {
            '\\' if quote.is_some() => {
                escape = true;
            }
            '"' | '\'' if quote == Some(ch) => {
                quote = None;
            }
            '"' | '\'' if quote.is_none() => {
                quote = Some(ch);
                start.get_or_insert(idx);
            }
            _ if quote.is_some() => {}
            _ if ch.is_whitespace() => {
                if let Some(s_start) = start.take() {
                    pieces.push((s_start, &s[s_start..idx]));
                }
            }
            _ => {
                start.get_or_insert(idx);
            }
        }
    }
    if let Some(s_start) = start {
        pieces.push((s_start, &s[s_start..]));
    }
    pieces
}

/// Strip a matching pair of quotes from the front of `token`.
///
/// Returns the quoted text and its byte offset within `token`, or `None` when
/// `token` does not start with a quote or the quote is never closed. Text
/// after the closing quote (a filter, say) is ignored.
pub(crate) fn unquote(token: &str) -> Option<(usize, &str)> {
    let quote = token.chars().next().filter(|ch| matches!(ch, '"' | '\''))?;
    let inner = &token[1..];
    let mut escape = false;
    for (idx, ch) in inner.char_indices() {
        if escape {
            escape = false;
            continue;
        }
        match ch {
            '\\' => escape = true,
            _ if ch == quote => return Some((1, &inner[..idx])),
            _ => {}
        }
    }
    None
}
