//! Parser
//!
//! Converts source text into AST nodes with source spans. Purely syntactic:
//! no symbol resolution and no macro expansion happen here, only reader-macro
//! rewriting.

use pest::{error::Error, iterators::Pair, Parser};
use pest_derive::Parser;

use crate::ast::{AstNode, Span};
use crate::diagnostics::{QuasiError, SourceArc};
use crate::err_src;
use crate::syntax::reader_macros;

#[derive(Parser)]
#[grammar = "syntax/grammar.pest"]
struct QuasiParser;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parses every top-level form in `text`.
///
/// `source` is attached to any error; it should name and contain `text`.
pub fn parse(text: &str, source: &SourceArc) -> Result<Vec<AstNode>, QuasiError> {
    if text.trim().is_empty() {
        return Ok(vec![]);
    }

    let mut pairs = QuasiParser::parse(Rule::program, text)
        .map_err(|e| convert_parse_error(e, text, source))?;

    let program = pairs.next().ok_or_else(|| {
        err_src!(Internal, "parser produced no program", source, Span::default())
    })?;

    program
        .into_inner()
        .filter(|p| p.as_rule() != Rule::EOI)
        .map(|p| build_ast_node(p, source))
        .collect()
}

/// Parses exactly one form. Empty input and trailing forms are parse errors.
pub fn parse_one(text: &str, source: &SourceArc) -> Result<AstNode, QuasiError> {
    let mut nodes = parse(text, source)?;
    match nodes.len() {
        1 => Ok(nodes.remove(0)),
        0 => Err(err_src!(
            Parse,
            "expected a form, found end of input",
            source,
            Span::new(0, text.len())
        )),
        _ => Err(err_src!(
            Parse,
            "expected a single form, found trailing input",
            source,
            nodes[1].span.join(nodes[nodes.len() - 1].span)
        )),
    }
}

// ============================================================================
// AST BUILDERS
// ============================================================================

fn build_ast_node(pair: Pair<Rule>, source: &SourceArc) -> Result<AstNode, QuasiError> {
    let span = get_span(&pair);

    match pair.as_rule() {
        Rule::number => {
            let text = pair.as_str();
            let value = text.parse::<f64>().map_err(|_| {
                err_src!(Parse, format!("invalid number literal '{text}'"), source, span)
            })?;
            Ok(AstNode::number(value, span))
        }

        Rule::boolean => Ok(AstNode::bool(pair.as_str() == "true", span)),

        Rule::nil => Ok(AstNode::nil(span)),

        Rule::string => Ok(AstNode::string(unescape_string(pair.as_str()), span)),

        Rule::symbol => Ok(AstNode::symbol(pair.as_str(), span)),

        Rule::list => {
            let children = pair
                .into_inner()
                .map(|p| build_ast_node(p, source))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(AstNode::list(children, span))
        }

        Rule::prefixed => build_prefixed(pair, source),

        rule => Err(err_src!(
            Internal,
            format!("unsupported grammar rule: {rule:?}"),
            source,
            span
        )),
    }
}

/// Applies the reader macro named by the leading trigger character.
fn build_prefixed(pair: Pair<Rule>, source: &SourceArc) -> Result<AstNode, QuasiError> {
    let span = get_span(&pair);
    let mut inner = pair.into_inner();

    let trigger = inner
        .next()
        .and_then(|p| p.as_str().chars().next())
        .ok_or_else(|| err_src!(Internal, "reader macro without trigger", source, span))?;
    let form_pair = inner
        .next()
        .ok_or_else(|| err_src!(Parse, format!("expected a form after '{trigger}'"), source, span))?;
    let rewrite = reader_macros::lookup(trigger).ok_or_else(|| {
        err_src!(Parse, format!("no reader macro for '{trigger}'"), source, span)
    })?;

    let form = build_ast_node(form_pair, source)?;
    Ok(rewrite(form, span))
}

// ============================================================================
// UTILITIES
// ============================================================================

fn get_span(pair: &Pair<Rule>) -> Span {
    Span {
        start: pair.as_span().start(),
        end: pair.as_span().end(),
    }
}

fn unescape_string(text: &str) -> String {
    let inner = &text[1..text.len() - 1];
    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('\\') => result.push('\\'),
            Some('"') => result.push('"'),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }

    result
}

fn convert_parse_error(error: Error<Rule>, text: &str, source: &SourceArc) -> QuasiError {
    let span = match error.location {
        pest::error::InputLocation::Pos(pos) => Span {
            start: pos,
            end: pos,
        },
        pest::error::InputLocation::Span((start, end)) => Span { start, end },
    };
    let at_end = span.start >= text.len();
    let message = if at_end {
        "unexpected end of input (unclosed list or string?)".to_string()
    } else {
        format!("syntax error: {}", error.variant.message())
    };
    err_src!(Parse, message, source, span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expr;
    use crate::diagnostics::{to_error_source, ErrorType};

    fn parse_str(text: &str) -> Result<Vec<AstNode>, QuasiError> {
        parse(text, &to_error_source("test", text))
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_str("").unwrap().is_empty());
        assert!(parse_str("  ; only a comment\n").unwrap().is_empty());
    }

    #[test]
    fn test_atoms() {
        let nodes = parse_str(r#"42 -1.5 true nil "a\nb" foo-bar? -"#).unwrap();
        let rendered: Vec<String> = nodes.iter().map(|n| n.to_string()).collect();
        assert_eq!(
            rendered,
            vec!["42", "-1.5", "true", "nil", "\"a\\nb\"", "foo-bar?", "-"]
        );
        assert_eq!(*nodes[2].value, Expr::Bool(true));
        assert_eq!(*nodes[4].value, Expr::String("a\nb".to_string()));
    }

    #[test]
    fn test_reader_macros() {
        let nodes = parse_str("'x `(a ,b) ',c").unwrap();
        assert_eq!(nodes[0].to_string(), "(quote x)");
        assert_eq!(nodes[1].to_string(), "(quasiquote (a (unquote b)))");
        assert_eq!(nodes[2].to_string(), "(quote (unquote c))");
    }

    #[test]
    fn test_spans_cover_source() {
        let nodes = parse_str("(a b)").unwrap();
        assert_eq!(nodes[0].span, Span::new(0, 5));
        let items = nodes[0].value.as_list().unwrap();
        assert_eq!(items[1].span, Span::new(3, 4));
    }

    #[test]
    fn test_unmatched_paren() {
        let err = parse_str("(a b").unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Parse);
    }

    #[test]
    fn test_parse_one_rejects_trailing_forms() {
        let source = to_error_source("t", "a b");
        assert!(parse_one("a b", &source).is_err());
        assert!(parse_one("", &source).is_err());
        assert_eq!(parse_one("(x)", &source).unwrap().to_string(), "(x)");
    }
}
