use crate::error::SyntaxError;
use crate::lang::ast::{AstNode, LiteralValue};
use crate::lang::lexer::Lexer;
use crate::lang::parser::Parser;

fn parse(source: &str) -> Result<AstNode, SyntaxError> {
    Parser::new(Lexer::new().lex(source)).parse()
}

fn top_level_words(source: &str) -> Vec<AstNode> {
    match parse(source) {
        Ok(AstNode::Root(children)) => match children.into_iter().next() {
            Some(AstNode::TopLevel(words)) => words,
            other => panic!("expected a top level, got {other:?}"),
        },
        other => panic!("parse failed: {other:?}"),
    }
}

#[test]
fn calls_and_literals() {
    let words = top_level_words("console 'hi' log");
    assert_eq!(
        words,
        vec![
            AstNode::FunctionCall {
                name: "console".to_owned()
            },
            AstNode::Literal(LiteralValue::Str("hi".to_owned())),
            AstNode::FunctionCall {
                name: "log".to_owned()
            },
        ]
    );
}

#[test]
fn assignment_binds_the_following_word() {
    let words = top_level_words("a = 'x'");
    assert_eq!(
        words,
        vec![AstNode::Assignment {
            name: "a".to_owned(),
            word: Box::new(AstNode::Literal(LiteralValue::Str("x".to_owned()))),
        }]
    );
}

#[test]
fn quote_wraps_a_single_word() {
    let words = top_level_words("`a");
    assert_eq!(
        words,
        vec![AstNode::Quote(Box::new(AstNode::FunctionCall {
            name: "a".to_owned()
        }))]
    );
}

#[test]
fn quoted_list_nests() {
    let words = top_level_words("`(a 'x')");
    assert_eq!(
        words,
        vec![AstNode::Quote(Box::new(AstNode::List(vec![
            AstNode::FunctionCall {
                name: "a".to_owned()
            },
            AstNode::Literal(LiteralValue::Str("x".to_owned())),
        ])))]
    );
}

#[test]
fn assignment_to_a_quoted_list() {
    let words = top_level_words("say = `(console `msg log)");
    let AstNode::Assignment { name, word } = &words[0] else {
        panic!("expected an assignment, got {words:?}");
    };
    assert_eq!(name, "say");
    let AstNode::Quote(inner) = word.as_ref() else {
        panic!("expected a quote, got {word:?}");
    };
    let AstNode::List(items) = inner.as_ref() else {
        panic!("expected a list, got {inner:?}");
    };
    assert_eq!(items.len(), 3);
    assert_eq!(
        items[1],
        AstNode::Quote(Box::new(AstNode::FunctionCall {
            name: "msg".to_owned()
        }))
    );
}

#[test]
fn consecutive_calls() {
    let words = top_level_words("a b");
    assert_eq!(words.len(), 2);
}

#[test]
fn empty_source_is_an_error() {
    assert!(matches!(
        parse(""),
        Err(SyntaxError::UnexpectedEnd { .. })
    ));
}

#[test]
fn unterminated_string_is_an_error() {
    assert!(matches!(
        parse("'abc"),
        Err(SyntaxError::TrailingInput { .. })
    ));
}

#[test]
fn leading_whitespace_is_an_error() {
    assert!(matches!(
        parse("  console"),
        Err(SyntaxError::TrailingInput { .. })
    ));
}

#[test]
fn dangling_assignment_is_an_error() {
    assert!(matches!(
        parse("a ="),
        Err(SyntaxError::UnexpectedEnd { .. })
    ));
}

#[test]
fn unclosed_list_is_an_error() {
    assert!(matches!(
        parse("`(a b"),
        Err(SyntaxError::UnexpectedEnd { .. })
    ));
}

#[test]
fn quote_needs_a_word() {
    assert!(matches!(
        parse("``"),
        Err(SyntaxError::UnexpectedEnd { .. })
    ));
}

#[test]
fn trailing_backtick_after_whitespace_is_junk() {
    // End of input never classifies a lone backtick, so it is rejected as
    // trailing input rather than an unfinished quote.
    assert!(matches!(
        parse("a `"),
        Err(SyntaxError::TrailingInput { .. })
    ));
}

#[test]
fn bare_list_cannot_start_the_program() {
    // A paren at the very start never gets classified, so it surfaces as
    // unparseable trailing input.
    assert!(matches!(
        parse("(a b)"),
        Err(SyntaxError::TrailingInput { .. })
    ));
}
