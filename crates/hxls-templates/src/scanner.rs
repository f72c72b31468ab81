use camino::Utf8Path;
use hxls_source::ByteOffset;
use hxls_source::LineIndex;

use crate::quotes::find_unquoted_equals;
use crate::quotes::split_on_whitespace;
use crate::quotes::unquote;
use crate::types::HandlerReference;
use crate::types::TagKind;

const BLOCK_TAG_START: &str = "{%";
const BLOCK_TAG_END: &str = "%}";
const HX_REQUEST_NAME_KWARG: &str = "hx_request_name";

/// Extract every handler reference from template text, in source order.
#[must_use]
pub fn parse_references(source: &str, file: &Utf8Path) -> Vec<HandlerReference> {
    let line_index = LineIndex::from_text(source);

    scan_names(source)
        .into_iter()
        .map(|token| {
            let position = line_index.to_char_line_col(source, ByteOffset::from_usize(token.offset));
            HandlerReference {
                name: token.name.to_string(),
                tag_type: token.tag,
                file: file.to_owned(),
                line_number: position.line() as usize + 1,
                column: position.column() as usize,
                is_variable: token.is_variable,
            }
        })
        .collect()
}

/// A handler name token inside a directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NameToken<'a> {
    pub(crate) tag: TagKind,
    pub(crate) name: &'a str,
    /// Byte offset of the first character of `name` in the template.
    pub(crate) offset: usize,
    pub(crate) is_variable: bool,
}

pub(crate) fn scan_names(source: &str) -> Vec<NameToken<'_>> {
    BlockScanner::new(source)
        .filter_map(|block| name_in_block(block.content, block.offset))
        .collect()
}

/// Content of one `{% ... %}` block and the byte offset where it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Block<'a> {
    content: &'a str,
    offset: usize,
}

/// Iterates `{% ... %}` blocks, which may span lines.
///
/// A `{%` that is never closed ends the scan. A `{%` followed by another `{%`
/// before any `%}` is abandoned in favour of the inner one.
struct BlockScanner<'a> {
    source: &'a str,
    current: usize,
}

impl<'a> BlockScanner<'a> {
    fn new(source: &'a str) -> Self {
        Self { source, current: 0 }
    }
}

impl<'a> Iterator for BlockScanner<'a> {
    type Item = Block<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let start = self.current + self.source.get(self.current..)?.find(BLOCK_TAG_START)?;
            let content_start = start + BLOCK_TAG_START.len();
            let rest = &self.source[content_start..];

            let Some(end) = rest.find(BLOCK_TAG_END) else {
                self.current = self.source.len();
                return None;
            };

            if let Some(nested) = rest[..end].find(BLOCK_TAG_START) {
                self.current = content_start + nested;
                continue;
            }

            self.current = content_start + end + BLOCK_TAG_END.len();
            return Some(Block {
                content: &rest[..end],
                offset: content_start,
            });
        }
    }
}

fn name_in_block(content: &str, offset: usize) -> Option<NameToken<'_>> {
    let pieces = split_on_whitespace(content);
    let (_, tag_name) = pieces.first()?;
    let tag = TagKind::from_tag_name(tag_name)?;
    let arguments = &pieces[1..];

    let (start, token) = if tag.is_positional() {
        let &(start, token) = arguments.first()?;
        if find_unquoted_equals(token).is_some() {
            return None;
        }
        (start, token)
    } else {
        arguments.iter().find_map(|&(start, token)| {
            let equals = find_unquoted_equals(token)?;
            (&token[..equals] == HX_REQUEST_NAME_KWARG)
                .then(|| (start + equals + 1, &token[equals + 1..]))
        })?
    };

    classify(token, offset + start, tag)
}

/// Decide whether an argument token names a handler.
///
/// Quoted tokens are literal names; unquoted plain identifiers are template
/// variables; dotted lookups and any other expression are dropped.
fn classify(token: &str, offset: usize, tag: TagKind) -> Option<NameToken<'_>> {
    if let Some((inner_start, name)) = unquote(token) {
        return (!name.is_empty()).then_some(NameToken {
            tag,
            name,
            offset: offset + inner_start,
            is_variable: false,
        });
    }

    if token.starts_with(['"', '\'']) || token.contains('.') || !is_identifier(token) {
        return None;
    }

    Some(NameToken {
        tag,
        name: token,
        offset,
        is_variable: true,
    })
}

fn is_identifier(token: &str) -> bool {
    let mut chars = token.chars();
    chars
        .next()
        .is_some_and(|first| first == '_' || first.is_alphabetic())
        && chars.all(|ch| ch == '_' || ch.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Vec<HandlerReference> {
        parse_references(source, Utf8Path::new("templates/page.html"))
    }

    fn names(source: &str) -> Vec<String> {
        parse(source).into_iter().map(|r| r.name).collect()
    }

    #[test]
    fn hx_post_single_quotes() {
        let refs = parse("{% hx_post 'update_status' object=item %}");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].name, "update_status");
        assert_eq!(refs[0].tag_type, TagKind::HxPost);
        assert_eq!(refs[0].file, "templates/page.html");
    }

    #[test]
    fn hx_post_double_quotes() {
        assert_eq!(
            names(r#"{% hx_post "update_status" object=item %}"#),
            vec!["update_status"]
        );
    }

    #[test]
    fn hx_get_and_hx_request() {
        let refs = parse("{% hx_get 'fetch_data' %}{% hx_request 'my_request' %}");
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].tag_type, TagKind::HxGet);
        assert_eq!(refs[0].name, "fetch_data");
        assert_eq!(refs[1].tag_type, TagKind::HxRequest);
        assert_eq!(refs[1].name, "my_request");
    }

    #[test]
    fn hx_vals_keyword_argument() {
        let refs = parse("{% hx_vals hx_request_name='modal_form' title='Edit' %}");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].name, "modal_form");
        assert_eq!(refs[0].tag_type, TagKind::HxVals);
        assert!(!refs[0].is_variable);
    }

    #[test]
    fn hx_vals_keyword_not_first() {
        let refs = parse("{% hx_vals title='Edit' hx_request_name=\"later\" %}");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].name, "later");
        assert_eq!(refs[0].column, 41);
    }

    #[test]
    fn hx_vals_without_keyword_records_nothing() {
        assert!(parse("{% hx_vals title='Edit' object=item %}").is_empty());
        assert!(parse("{% hx_vals 'positional' %}").is_empty());
    }

    #[test]
    fn hx_vals_unquoted_is_variable() {
        let refs = parse("{% hx_vals hx_request_name=dynamic_name %}");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].name, "dynamic_name");
        assert!(refs[0].is_variable);
    }

    #[test]
    fn multiple_usages_same_line() {
        assert_eq!(
            names("{% hx_post 'first' %} {% hx_post 'second' %}"),
            vec!["first", "second"]
        );
    }

    #[test]
    fn multiple_lines_and_line_numbers() {
        let source = "line 1\n{% hx_post 'first' %}\nline 3\n{% hx_get 'second' %}\n";
        let refs = parse(source);
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].line_number, 2);
        assert_eq!(refs[1].line_number, 4);
    }

    #[test]
    fn column_points_after_quote() {
        let refs = parse("  {% hx_post 'my_action' %}");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].column, 14);
    }

    #[test]
    fn column_counts_characters() {
        let refs = parse("<p>héllo</p>{% hx_get 'x' %}");
        assert_eq!(refs[0].column, 23);
    }

    #[test]
    fn dotted_variable_is_dropped() {
        assert!(parse("{% hx_post some_var.hx_name %}").is_empty());
        assert!(parse("{% hx_vals hx_request_name=obj.attr %}").is_empty());
    }

    #[test]
    fn quoted_names_are_literals() {
        let refs = parse("{% hx_post 'my_request' %}");
        assert!(!refs[0].is_variable);
    }

    #[test]
    fn unquoted_names_are_variables() {
        let refs = parse("{% hx_post task_hx_name object=item %}");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].name, "task_hx_name");
        assert!(refs[0].is_variable);
    }

    #[test]
    fn keyword_in_name_position_is_not_a_name() {
        assert!(parse("{% hx_post object=item %}").is_empty());
    }

    #[test]
    fn expressions_and_bad_quotes_are_dropped() {
        assert!(parse("{% hx_post name|lower %}").is_empty());
        assert!(parse("{% hx_post 42 %}").is_empty());
        assert!(parse("{% hx_post '' %}").is_empty());
        assert!(parse("{% hx_post 'unterminated %}").is_empty());
        assert!(parse("{% hx_post %}").is_empty());
    }

    #[test]
    fn other_tags_ignored() {
        assert!(parse("{% load hx_tags %}{% url 'home' %}{{ hx_post }}").is_empty());
        assert!(parse("{% hx_posted 'x' %}").is_empty());
    }

    #[test]
    fn unterminated_block_records_nothing() {
        assert!(parse("{% hx_post 'never_closed'").is_empty());
    }

    #[test]
    fn abandoned_block_does_not_swallow_next() {
        let refs = parse("{% hx_post 'broken'\n<div {% hx_get 'ok' %}>");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].name, "ok");
        assert_eq!(refs[0].line_number, 2);
    }

    #[test]
    fn multiline_directive_uses_name_line() {
        let source = r"
<button hx-target='#modal'
        {% hx_vals hx_request_name='edit_modal'
                   object=item
                   title='Edit Item' %}>
";
        let refs = parse(source);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].name, "edit_modal");
        assert_eq!(refs[0].line_number, 3);
        assert_eq!(refs[0].column, 36);
    }

    #[test]
    fn complex_template() {
        let source = r##"
{% load hx_tags %}

<div class="container">
    <button hx-target="#modal"
            {% hx_vals hx_request_name='edit_modal'
                       object=item
                       title='Edit Item' %}>
        Edit
    </button>

    <button {% hx_post 'delete_item' object=item row_object=item %}>
        Delete
    </button>

    <div hx-get="{% hx_get 'refresh_list' %}">
        Refresh
    </div>
</div>
"##;
        insta::assert_yaml_snapshot!(parse(source), @r"
        - name: edit_modal
          tag_type: hx_vals
          file: templates/page.html
          line_number: 6
          column: 40
          is_variable: false
        - name: delete_item
          tag_type: hx_post
          file: templates/page.html
          line_number: 12
          column: 24
          is_variable: false
        - name: refresh_list
          tag_type: hx_get
          file: templates/page.html
          line_number: 16
          column: 28
          is_variable: false
        ");
    }

    #[test]
    fn literal_count_matches_quoted_tokens() {
        let source = "{% hx_get 'a' %}{% hx_post \"b\" %}{% hx_request 'c' %}\
                      {% hx_vals hx_request_name='d' %}{% hx_post var %}{% hx_post 'a' %}";
        let literals = parse(source).iter().filter(|r| !r.is_variable).count();
        assert_eq!(literals, 5);
    }

    #[test]
    fn block_scanner_offsets() {
        let blocks: Vec<_> = BlockScanner::new("a{% x %}b{%y%}").collect();
        assert_eq!(
            blocks,
            vec![
                Block {
                    content: " x ",
                    offset: 3
                },
                Block {
                    content: "y",
                    offset: 11
                },
            ]
        );
    }
}
