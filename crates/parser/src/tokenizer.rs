//! A `nom`-based tokenizer that splits source into text runs and tag markers.
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{is_not, tag, take_while1},
    character::complete::{char, multispace0},
    combinator::{consumed, map, not, opt, recognize},
    multi::many0,
    sequence::{delimited, terminated},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'s> {
    Text(&'s str),
    BlockOpen { name: &'s str, raw_attributes: &'s str },
    /// `source` is the full marker text, kept so a mismatched close can
    /// be emitted as literal text.
    BlockClose { name: &'s str, source: &'s str },
    Value { name: &'s str, raw_attributes: &'s str },
}

/// Longest marker, in bytes, the tokenizer looks for. Longer markers are
/// kept as text, which bounds the rescan after an unterminated marker.
pub const MAX_MARKER_LEN: usize = 4096;

/// Splits `source` into tokens. Adjacent literal text is always returned as
/// a single `Text` token.
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut text_start = 0;
    let mut pos = 0;

    while let Some(offset) = source[pos..].find(['<', '{']) {
        let at = pos + offset;
        let rest = window(&source[at..]);
        match marker(rest) {
            Ok((remaining, token)) => {
                if text_start < at {
                    tokens.push(Token::Text(&source[text_start..at]));
                }
                tokens.push(token);
                pos = at + (rest.len() - remaining.len());
                text_start = pos;
            }
            // Both marker characters are one byte wide.
            Err(_) => pos = at + 1,
        }
    }

    if text_start < source.len() {
        tokens.push(Token::Text(&source[text_start..]));
    }
    tokens
}

fn window(rest: &str) -> &str {
    let mut end = rest.len().min(MAX_MARKER_LEN);
    while !rest.is_char_boundary(end) {
        end -= 1;
    }
    &rest[..end]
}

// --- Combinators ---

fn marker(input: &str) -> IResult<&str, Token<'_>> {
    alt((block_close, block_open, value_tag)).parse(input)
}

fn tag_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '-' || c == '.').parse(input)
}

fn quoted(input: &str) -> IResult<&str, &str> {
    recognize((char('"'), opt(is_not("\"")), char('"'))).parse(input)
}

/// Everything up to the closing `>`, skipping over `>` inside quotes.
fn open_attributes(input: &str) -> IResult<&str, &str> {
    recognize(many0(alt((quoted, is_not("\">"))))).parse(input)
}

/// Everything up to the closing `}}`, skipping over braces inside quotes.
fn value_attributes(input: &str) -> IResult<&str, &str> {
    recognize(many0(alt((
        quoted,
        is_not("\"}"),
        terminated(tag("}"), not(char('}'))),
    ))))
    .parse(input)
}

fn block_open(input: &str) -> IResult<&str, Token<'_>> {
    map(
        (tag("<tag:"), tag_name, open_attributes, char('>')),
        |(_, name, raw_attributes, _)| Token::BlockOpen {
            name,
            raw_attributes: raw_attributes.trim(),
        },
    )
    .parse(input)
}

fn block_close(input: &str) -> IResult<&str, Token<'_>> {
    map(
        consumed(delimited(tag("</tag:"), tag_name, (multispace0, char('>')))),
        |(source, name)| Token::BlockClose { name, source },
    )
    .parse(input)
}

fn value_tag(input: &str) -> IResult<&str, Token<'_>> {
    map(
        (tag("{{tag:"), tag_name, value_attributes, tag("}}")),
        |(_, name, raw_attributes, _)| Token::Value {
            name,
            raw_attributes: raw_attributes.trim(),
        },
    )
    .parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_one_token() {
        assert_eq!(tokenize("hello <b>world</b> {x}"), vec![Token::Text("hello <b>world</b> {x}")]);
    }

    #[test]
    fn test_unterminated_markers_stay_text() {
        let source = "<tag:A x=\"1\" ".repeat(5000);
        assert_eq!(tokenize(&source), vec![Token::Text(&source)]);

        let source = "{{tag:V ".repeat(5000);
        assert_eq!(tokenize(&source), vec![Token::Text(&source)]);
    }

    #[test]
    fn test_marker_longer_than_limit_is_text() {
        let long = format!("{{{{tag:V a=\"{}\"}}}}", "é".repeat(MAX_MARKER_LEN));
        assert_eq!(tokenize(&long), vec![Token::Text(&long)]);

        let fits = format!("{{{{tag:V a=\"{}\"}}}}", "x".repeat(MAX_MARKER_LEN / 2));
        assert!(matches!(tokenize(&fits)[..], [Token::Value { name: "V", .. }]));
    }

    #[test]
    fn test_empty_source() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_block_open_and_close() {
        let tokens = tokenize(r#"a<tag:Bold class="x">b</tag:Bold>c"#);
        assert_eq!(
            tokens,
            vec![
                Token::Text("a"),
                Token::BlockOpen { name: "Bold", raw_attributes: r#"class="x""# },
                Token::Text("b"),
                Token::BlockClose { name: "Bold", source: "</tag:Bold>" },
                Token::Text("c"),
            ]
        );
    }

    #[test]
    fn test_close_tag_allows_trailing_whitespace() {
        let tokens = tokenize("</tag:Bold  >");
        assert_eq!(tokens, vec![Token::BlockClose { name: "Bold", source: "</tag:Bold  >" }]);
    }

    #[test]
    fn test_value_tag() {
        let tokens = tokenize(r#"{{tag:Upper value="abc"}}"#);
        assert_eq!(tokens, vec![Token::Value { name: "Upper", raw_attributes: r#"value="abc""# }]);
    }

    #[test]
    fn test_value_tag_without_attributes() {
        assert_eq!(tokenize("{{tag:Parent}}"), vec![Token::Value { name: "Parent", raw_attributes: "" }]);
    }

    #[test]
    fn test_quoted_delimiters_do_not_end_tags() {
        let tokens = tokenize(r#"<tag:If test="a > b">{{tag:Var name="}}"}}"#);
        assert_eq!(
            tokens,
            vec![
                Token::BlockOpen { name: "If", raw_attributes: r#"test="a > b""# },
                Token::Value { name: "Var", raw_attributes: r#"name="}}""# },
            ]
        );
    }

    #[test]
    fn test_single_brace_inside_value_attributes() {
        let tokens = tokenize(r#"{{tag:Json raw={a}}}"#);
        assert_eq!(tokens, vec![Token::Value { name: "Json", raw_attributes: "raw={a" }, Token::Text("}")]);
    }

    #[test]
    fn test_incomplete_markers_stay_text() {
        let source = r#"<tag: x> {{tag:Open <tag:A b="unterminated> {{ tag:B}}"#;
        assert_eq!(tokenize(source), vec![Token::Text(source)]);
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let tokens = tokenize("<tag:bold></tag:Bold>");
        assert_eq!(
            tokens,
            vec![
                Token::BlockOpen { name: "bold", raw_attributes: "" },
                Token::BlockClose { name: "Bold", source: "</tag:Bold>" },
            ]
        );
    }

    #[test]
    fn test_multibyte_text_around_markers() {
        let tokens = tokenize("héllo{{tag:X}}wörld");
        assert_eq!(
            tokens,
            vec![
                Token::Text("héllo"),
                Token::Value { name: "X", raw_attributes: "" },
                Token::Text("wörld"),
            ]
        );
    }
}
