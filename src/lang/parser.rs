use std::collections::VecDeque;

use crate::error::SyntaxError;
use crate::lang::ast::{AstNode, LiteralValue};
use crate::lang::lexer::{Token, TokenKind};

/// Recursive-descent parser over a token stream. One token of lookahead,
/// plus a second to tell an assignment from a call since both start with an
/// identifier. The parser owns a private buffer and consumes it from the
/// front; callers keep their own copy if they still need the tokens.
#[derive(Debug)]
pub struct Parser {
    tokens: VecDeque<Token>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens: tokens.into(),
        }
    }

    pub fn parse(mut self) -> Result<AstNode, SyntaxError> {
        self.consume(TokenKind::Start)?;
        let top_level = self.parse_top_level()?;

        // Anything the top level could not start a word with is malformed
        // input, not trailing garbage to ignore. This is where unterminated
        // strings and stray parentheses surface.
        if let Some(extra) = self.tokens.front() {
            return Err(SyntaxError::TrailingInput {
                found: extra.describe(),
            });
        }

        Ok(AstNode::Root(vec![top_level]))
    }

    fn parse_top_level(&mut self) -> Result<AstNode, SyntaxError> {
        let mut words = Vec::new();

        while self.has_next_word() {
            let word = match (self.kind_at(0), self.kind_at(1)) {
                (Some(TokenKind::Identifier), Some(TokenKind::Equals)) => {
                    self.parse_assignment()?
                }
                (Some(TokenKind::Identifier), _) => self.parse_function_call()?,
                (Some(TokenKind::Str), _) => self.parse_literal()?,
                _ => self.parse_word()?,
            };
            words.push(word);
        }

        Ok(AstNode::TopLevel(words))
    }

    fn parse_word(&mut self) -> Result<AstNode, SyntaxError> {
        match self.kind_at(0) {
            Some(TokenKind::Backtick) => self.parse_quote(),
            Some(TokenKind::LParen) => self.parse_list(),
            Some(TokenKind::Identifier) => self.parse_function_call(),
            Some(TokenKind::Str) => self.parse_literal(),
            _ => Err(self.expected_word()),
        }
    }

    fn parse_assignment(&mut self) -> Result<AstNode, SyntaxError> {
        let name = self.consume(TokenKind::Identifier)?;
        self.consume(TokenKind::Equals)?;
        let word = self.parse_word()?;
        Ok(AstNode::Assignment {
            name,
            word: Box::new(word),
        })
    }

    fn parse_list(&mut self) -> Result<AstNode, SyntaxError> {
        self.consume(TokenKind::LParen)?;
        let mut words = Vec::new();
        loop {
            match self.kind_at(0) {
                Some(TokenKind::RParen) => break,
                None if self.tokens.is_empty() => {
                    return Err(SyntaxError::UnexpectedEnd {
                        expected: "')'".to_owned(),
                    });
                }
                _ => words.push(self.parse_word()?),
            }
        }
        self.consume(TokenKind::RParen)?;
        Ok(AstNode::List(words))
    }

    fn parse_quote(&mut self) -> Result<AstNode, SyntaxError> {
        self.consume(TokenKind::Backtick)?;
        let word = self.parse_word()?;
        Ok(AstNode::Quote(Box::new(word)))
    }

    fn parse_function_call(&mut self) -> Result<AstNode, SyntaxError> {
        let name = self.consume(TokenKind::Identifier)?;
        Ok(AstNode::FunctionCall { name })
    }

    fn parse_literal(&mut self) -> Result<AstNode, SyntaxError> {
        match self.kind_at(0) {
            Some(TokenKind::Str) => {
                let text = self.consume(TokenKind::Str)?;
                Ok(AstNode::Literal(LiteralValue::Str(text)))
            }
            _ => Err(self.expected_word()),
        }
    }

    /// Only identifiers, strings and backticks can begin a top-level word.
    /// A bare list cannot; lists only occur nested inside quotes and other
    /// lists.
    fn has_next_word(&self) -> bool {
        matches!(
            self.kind_at(0),
            Some(TokenKind::Identifier | TokenKind::Str | TokenKind::Backtick)
        )
    }

    fn kind_at(&self, index: usize) -> Option<TokenKind> {
        self.tokens.get(index).and_then(|token| token.kind)
    }

    fn consume(&mut self, kind: TokenKind) -> Result<String, SyntaxError> {
        match self.tokens.front() {
            Some(token) if token.kind == Some(kind) => Ok(self
                .tokens
                .pop_front()
                .map(|token| token.text)
                .unwrap_or_default()),
            Some(token) => Err(SyntaxError::Unexpected {
                expected: kind.name().to_owned(),
                found: token.describe(),
            }),
            None => Err(SyntaxError::UnexpectedEnd {
                expected: kind.name().to_owned(),
            }),
        }
    }

    fn expected_word(&self) -> SyntaxError {
        match self.tokens.front() {
            Some(token) => SyntaxError::ExpectedWord {
                found: token.describe(),
            },
            None => SyntaxError::UnexpectedEnd {
                expected: "a word".to_owned(),
            },
        }
    }
}
