//! S-expression reader.
//!
//! Reads source text into [`Node`] trees. Lists read as array-form, except
//! dotted lists which read as cell chains with the dotted tail.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, multispace1, not_line_ending},
    combinator::{cut, value},
    error::ErrorKind,
    multi::many0,
    sequence::preceded,
};
use thiserror::Error;

use crate::{MAX_PARSE_DEPTH, Node};

/// Errors that can occur while reading source text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReadError {
    #[error("syntax error at offset {offset} near '{near}'")]
    Syntax { offset: usize, near: String },

    #[error("unexpected end of input")]
    Incomplete,

    #[error("expression too deeply nested (max depth: {limit})")]
    TooDeeplyNested { limit: usize },

    #[error("unexpected content after expression at offset {offset}")]
    TrailingContent { offset: usize },

    #[error("invalid JSON node: {0}")]
    Json(String),
}

/// Characters that end a bare token.
fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | '"' | ';' | '\'')
}

/// Skip whitespace and `;` line comments.
fn skip(input: &str) -> IResult<&str, ()> {
    value(
        (),
        many0(alt((multispace1, preceded(char(';'), not_line_ending)))),
    )
    .parse(input)
}

/// Returns true if the token at the start of `input` is a lone `.`.
fn at_dot(input: &str) -> bool {
    let mut chars = input.chars();
    chars.next() == Some('.') && chars.next().is_none_or(is_delimiter)
}

/// Parse a string literal. Once the opening quote is consumed, errors are
/// failures so they are not retried as symbols.
fn parse_string(input: &str) -> IResult<&str, Node> {
    let (mut remaining, _) = char('"').parse(input)?;
    let mut text = String::new();

    loop {
        let mut chars = remaining.chars();
        match chars.next() {
            Some('"') => return Ok((chars.as_str(), Node::string(text))),
            Some('\\') => {
                match chars.next() {
                    Some('n') => text.push('\n'),
                    Some('t') => text.push('\t'),
                    Some('r') => text.push('\r'),
                    Some('\\') => text.push('\\'),
                    Some('"') => text.push('"'),
                    Some(_) => {
                        return Err(nom::Err::Failure(nom::error::Error::new(
                            remaining,
                            ErrorKind::Escaped,
                        )));
                    }
                    None => {
                        return Err(nom::Err::Failure(nom::error::Error::new(
                            chars.as_str(),
                            ErrorKind::Eof,
                        )));
                    }
                }
                remaining = chars.as_str();
            }
            Some(c) => {
                text.push(c);
                remaining = chars.as_str();
            }
            None => {
                return Err(nom::Err::Failure(nom::error::Error::new(
                    remaining,
                    ErrorKind::Eof,
                )));
            }
        }
    }
}

/// Parse a bare token: boolean, number, or symbol.
fn parse_token(input: &str) -> IResult<&str, Node> {
    let (rest, token) = take_while1(|c: char| !is_delimiter(c)).parse(input)?;

    let node = match token {
        "#t" => Node::bool(true),
        "#f" => Node::bool(false),
        _ if looks_numeric(token) => match token.parse::<f64>() {
            Ok(n) => Node::number(n),
            Err(_) => Node::symbol(token),
        },
        _ => Node::symbol(token),
    };
    Ok((rest, node))
}

/// Numbers start with a digit, or a sign or `.` followed by a digit.
/// Keeps tokens such as `inf`, `NaN` and `-` as symbols.
fn looks_numeric(token: &str) -> bool {
    let unsigned = token.strip_prefix(['-', '+']).unwrap_or(token);
    let unsigned = unsigned.strip_prefix('.').unwrap_or(unsigned);
    unsigned.starts_with(|c: char| c.is_ascii_digit())
}

/// Parse `'datum` as `(quote datum)`.
fn parse_quote(input: &str, depth: usize) -> IResult<&str, Node> {
    let (input, _) = char('\'').parse(input)?;
    let (input, datum) = cut(|i| parse_datum(i, depth + 1)).parse(input)?;
    Ok((input, Node::list(vec![Node::symbol("quote"), datum])))
}

/// Parse a list, with an optional dotted tail.
fn parse_list(input: &str, depth: usize) -> IResult<&str, Node> {
    let (mut input, _) = char('(').parse(input)?;
    let mut items = Vec::new();

    loop {
        let (rest, _) = skip(input)?;

        if let Some(rest) = rest.strip_prefix(')') {
            let node = if items.is_empty() {
                Node::Nil
            } else {
                Node::list(items)
            };
            return Ok((rest, node));
        }

        if at_dot(rest) {
            if items.is_empty() {
                return Err(nom::Err::Failure(nom::error::Error::new(
                    rest,
                    ErrorKind::Char,
                )));
            }
            let (rest, tail) = cut(|i| parse_datum(i, depth + 1)).parse(&rest[1..])?;
            let (rest, _) = skip(rest)?;
            let (rest, _) = cut(char(')')).parse(rest)?;
            // `(a . (b c))` is `(a b c)`
            let tail = match tail {
                Node::List(more) => Node::chain(more),
                tail => tail,
            };
            return Ok((rest, Node::improper(items, tail)));
        }

        let (rest, item) = cut(|i| parse_datum(i, depth + 1)).parse(rest)?;
        items.push(item);
        input = rest;
    }
}

/// Parse one datum, skipping leading whitespace and comments.
fn parse_datum(input: &str, depth: usize) -> IResult<&str, Node> {
    if depth >= MAX_PARSE_DEPTH {
        return Err(nom::Err::Failure(nom::error::Error::new(
            input,
            ErrorKind::TooLarge,
        )));
    }
    let (input, _) = skip(input)?;
    alt((
        |i| parse_quote(i, depth),
        |i| parse_list(i, depth),
        parse_string,
        parse_token,
    ))
    .parse(input)
}

/// Convert nom errors to [`ReadError`]s.
fn to_read_error(input: &str, error: nom::Err<nom::error::Error<&str>>) -> ReadError {
    match error {
        nom::Err::Incomplete(_) => ReadError::Incomplete,
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            if e.code == ErrorKind::TooLarge {
                ReadError::TooDeeplyNested {
                    limit: MAX_PARSE_DEPTH,
                }
            } else if e.input.is_empty() {
                ReadError::Incomplete
            } else {
                ReadError::Syntax {
                    offset: input.len() - e.input.len(),
                    near: e.input.chars().take(10).collect(),
                }
            }
        }
    }
}

/// Read exactly one datum from `input`.
pub fn read(input: &str) -> Result<Node, ReadError> {
    let (rest, node) = parse_datum(input, 0).map_err(|e| to_read_error(input, e))?;
    let (rest, _) = skip(rest).map_err(|e| to_read_error(input, e))?;
    if rest.is_empty() {
        Ok(node)
    } else {
        Err(ReadError::TrailingContent {
            offset: input.len() - rest.len(),
        })
    }
}

/// Read every datum in `input`, in order.
pub fn read_all(input: &str) -> Result<Vec<Node>, ReadError> {
    let mut nodes = Vec::new();
    let mut rest = input;
    loop {
        let (remaining, _) = skip(rest).map_err(|e| to_read_error(input, e))?;
        if remaining.is_empty() {
            return Ok(nodes);
        }
        let (remaining, node) =
            parse_datum(remaining, 0).map_err(|e| to_read_error(input, e))?;
        nodes.push(node);
        rest = remaining;
    }
}

/// Read one datum, unwrapping a top-level quote.
///
/// Template and style files are usually written as quoted data, as they
/// would be passed to a registration call: `'(html ...)`.
pub fn read_document(input: &str) -> Result<Node, ReadError> {
    let node = read(input)?;
    match node.as_list() {
        Some([head, datum]) if head.as_symbol() == Some("quote") => Ok(datum.clone()),
        _ => Ok(node),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_atoms() {
        assert_eq!(read("\"hello\"").unwrap(), Node::string("hello"));
        assert_eq!(read("div").unwrap(), Node::symbol("div"));
        assert_eq!(read("42").unwrap(), Node::number(42));
        assert_eq!(read("-3.5").unwrap(), Node::number(-3.5));
        assert_eq!(read(".5").unwrap(), Node::number(0.5));
        assert_eq!(read("#t").unwrap(), Node::bool(true));
        assert_eq!(read("#f").unwrap(), Node::bool(false));
    }

    #[test]
    fn test_read_special_symbols() {
        for name in ["$", "$raw", "@", "@media", "user.name", "--primary", "-", "inf"] {
            assert_eq!(read(name).unwrap(), Node::symbol(name), "reading {}", name);
        }
    }

    #[test]
    fn test_read_string_escapes() {
        assert_eq!(
            read(r#""a\"b\\c\nd""#).unwrap(),
            Node::string("a\"b\\c\nd")
        );
        assert!(matches!(read(r#""bad \q""#), Err(ReadError::Syntax { .. })));
    }

    #[test]
    fn test_read_list() {
        let node = read("(p (@ \"class\" \"lead\") \"hi\")").unwrap();
        assert_eq!(
            node,
            Node::list(vec![
                Node::symbol("p"),
                Node::list(vec![
                    Node::symbol("@"),
                    Node::string("class"),
                    Node::string("lead"),
                ]),
                Node::string("hi"),
            ])
        );
    }

    #[test]
    fn test_read_empty_list_is_nil() {
        assert_eq!(read("()").unwrap(), Node::Nil);
        assert_eq!(read("( ; nothing\n )").unwrap(), Node::Nil);
    }

    #[test]
    fn test_read_dotted() {
        let node = read("(a b . c)").unwrap();
        assert!(node.as_pair().is_some());
        assert_eq!(node.to_string(), "(a b . c)");
        assert!(matches!(read("(. a)"), Err(ReadError::Syntax { .. })));
    }

    #[test]
    fn test_read_dotted_list_tail() {
        let node = read("(a . (b c))").unwrap();
        assert_eq!(node.to_string(), "(a b c)");
        let items = crate::sequence(&node).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[2].as_symbol(), Some("c"));
    }

    #[test]
    fn test_read_quote() {
        assert_eq!(
            read("'x").unwrap(),
            Node::list(vec![Node::symbol("quote"), Node::symbol("x")])
        );
        assert_eq!(read_document("'(br)").unwrap(), read("(br)").unwrap());
        assert_eq!(read_document("(br)").unwrap(), read("(br)").unwrap());
    }

    #[test]
    fn test_read_comments() {
        let node = read("; header\n(h1 ; title\n \"x\")\n; trailing").unwrap();
        assert_eq!(node.to_string(), "(h1 \"x\")");
    }

    #[test]
    fn test_read_all() {
        let nodes = read_all("(a) \"b\" c").unwrap();
        assert_eq!(nodes.len(), 3);
        assert!(read_all("  ").unwrap().is_empty());
    }

    #[test]
    fn test_read_errors() {
        assert_eq!(read("(a b"), Err(ReadError::Incomplete));
        assert_eq!(read("\"open"), Err(ReadError::Incomplete));
        assert_eq!(read(""), Err(ReadError::Incomplete));
        assert!(matches!(read(")"), Err(ReadError::Syntax { offset: 0, .. })));
        assert_eq!(
            read("(a) (b)"),
            Err(ReadError::TrailingContent { offset: 4 })
        );
    }

    #[test]
    fn test_read_depth_limit() {
        let deep = format!("{}{}", "(".repeat(MAX_PARSE_DEPTH + 1), ")".repeat(MAX_PARSE_DEPTH + 1));
        assert_eq!(
            read(&deep),
            Err(ReadError::TooDeeplyNested {
                limit: MAX_PARSE_DEPTH
            })
        );
    }

    #[test]
    fn test_display_round_trip() {
        let source = "(html (head (title \"A \\\"quoted\\\" page\")) (body (@ id 7) #t 2.5))";
        let node = read(source).unwrap();
        let printed = node.to_string();
        assert_eq!(printed, source);
        assert_eq!(read(&printed).unwrap(), node);
    }
}
