//! Parsing of `key="value"` pairs inside a tag's opening delimiter.
use nom::{
    IResult, Parser,
    bytes::complete::{take_till, take_while1},
    character::complete::char,
    sequence::{delimited, separated_pair},
};
use taglet_template_core::Attributes;

/// Parses the raw attribute text of a tag.
///
/// The text is split on whitespace outside double quotes and each piece must
/// be a complete `key="value"` pair. Malformed pieces are skipped. Values are
/// not interpreted.
pub fn parse_attributes(raw: &str) -> Attributes {
    split_outside_quotes(raw)
        .into_iter()
        .filter_map(|piece| match attribute_pair(piece) {
            Ok(("", pair)) => Some(pair),
            _ => {
                log::debug!("Skipping malformed attribute '{}'", piece);
                None
            }
        })
        .collect()
}

fn attribute_key(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '-' || c == ':' || c == '.').parse(input)
}

fn attribute_pair(input: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(
        attribute_key,
        char('='),
        delimited(char('"'), take_till(|c| c == '"'), char('"')),
    )
    .parse(input)
}

fn split_outside_quotes(raw: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = None;
    let mut in_quotes = false;

    for (i, c) in raw.char_indices() {
        if c == '"' {
            in_quotes = !in_quotes;
        }
        if c.is_whitespace() && !in_quotes {
            if let Some(s) = start.take() {
                pieces.push(&raw[s..i]);
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        pieces.push(&raw[s..]);
    }
    pieces
}
