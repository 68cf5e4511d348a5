use serde::{Deserialize, Serialize};

/// Classified kinds of lexical units. `Start` is the synthetic sentinel that
/// opens every token stream; the parser consumes it before anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    Start,
    Identifier,
    Str,
    Equals,
    Backtick,
    LParen,
    RParen,
}

impl TokenKind {
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Start => "start",
            TokenKind::Identifier => "identifier",
            TokenKind::Str => "string",
            TokenKind::Equals => "'='",
            TokenKind::Backtick => "'`'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
        }
    }
}

/// A lexical unit. `kind` stays `None` while the lexer is still accumulating
/// the token and for tokens it never managed to classify, such as the open
/// token of an unterminated string; the parser rejects those.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: Option<TokenKind>,
    pub text: String,
}

impl Token {
    fn open(text: impl Into<String>) -> Self {
        Token {
            kind: None,
            text: text.into(),
        }
    }

    fn classified(kind: TokenKind, text: impl Into<String>) -> Self {
        Token {
            kind: Some(kind),
            text: text.into(),
        }
    }

    pub fn describe(&self) -> String {
        match self.kind {
            Some(kind) => format!("{} '{}'", kind.name(), self.text),
            None => format!("unclassified '{}'", self.text),
        }
    }
}

fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '-'
}

fn is_identifier(text: &str) -> bool {
    !text.is_empty() && text.chars().all(is_identifier_char)
}

fn is_space(ch: char) -> bool {
    ch == ' ' || ch == '\n'
}

/// Append the token, or replace the trailing placeholder when the previous
/// token is still empty and unclassified.
fn push_or_replace_empty(tokens: &mut Vec<Token>, token: Token) {
    if let Some(last) = tokens.last_mut() {
        if last.kind.is_none() && last.text.is_empty() {
            *last = token;
            return;
        }
    }
    tokens.push(token);
}

/// Single characters whose kind is known the moment they start a token.
fn infer_kind(ch: char) -> Option<TokenKind> {
    match ch {
        '=' => Some(TokenKind::Equals),
        '`' => Some(TokenKind::Backtick),
        '(' => Some(TokenKind::LParen),
        _ => None,
    }
}

/// Converts raw source text into an ordered token sequence. The lexer itself
/// never fails; malformed input simply yields tokens the parser will reject.
///
/// Classification is lazy: the in-progress token keeps accumulating as long
/// as it still looks like an identifier, and is finalized the moment the next
/// character would break that, or by a whitespace run, or by end of input.
#[derive(Debug, Default)]
pub struct Lexer {
    in_string: bool,
    at_start: bool,
    knows_kind: bool,
    in_whitespace: bool,
}

impl Lexer {
    pub fn new() -> Self {
        Lexer {
            in_string: false,
            at_start: true,
            knows_kind: false,
            in_whitespace: false,
        }
    }

    pub fn lex(mut self, source: &str) -> Vec<Token> {
        let mut tokens = vec![Token::classified(TokenKind::Start, "")];
        for ch in source.chars() {
            self.step(&mut tokens, ch);
        }
        self.finish(&mut tokens);
        tokens
    }

    fn step(&mut self, tokens: &mut Vec<Token>, ch: char) {
        if ch == '\'' {
            self.in_string = !self.in_string;
        }

        if self.in_string {
            if ch == '\'' {
                // Opening apostrophe. The token only becomes a string when
                // the closing apostrophe arrives. A string may open the
                // source, so this leaves start handling behind too.
                push_or_replace_empty(tokens, Token::open(""));
                self.at_start = false;
                self.knows_kind = true;
            } else if let Some(last) = tokens.last_mut() {
                last.text.push(ch);
            }
            return;
        }

        if ch == '\'' {
            // Closing apostrophe finalizes the string and opens a fresh
            // placeholder token.
            if let Some(last) = tokens.last_mut() {
                last.kind = Some(TokenKind::Str);
            }
            tokens.push(Token::open(""));
            self.knows_kind = false;
            return;
        }

        if self.at_start {
            tokens.push(Token::open(ch));
            self.at_start = false;
            self.knows_kind = false;
            return;
        }

        if self.in_whitespace {
            if !is_space(ch) {
                self.in_whitespace = false;
                push_or_replace_empty(tokens, Token::open(ch));
                self.knows_kind = false;
            }
            return;
        }
        if is_space(ch) {
            // A whitespace run terminates the current token and is itself
            // discarded.
            self.in_whitespace = true;
            if let Some(last) = tokens.last_mut() {
                force_token_finish(last);
            }
            self.knows_kind = true;
            return;
        }

        if !self.knows_kind {
            if let Some(last) = tokens.last_mut() {
                if is_identifier(&last.text) && !is_identifier_char(ch) {
                    last.kind = Some(TokenKind::Identifier);
                } else if last.text == "=" {
                    last.kind = Some(TokenKind::Equals);
                } else if last.text == "`" {
                    last.kind = Some(TokenKind::Backtick);
                } else if last.text == "(" {
                    last.kind = Some(TokenKind::LParen);
                } else if last.text == ")" {
                    last.kind = Some(TokenKind::RParen);
                }

                if last.kind.is_some() {
                    let next_kind = infer_kind(ch);
                    tokens.push(Token {
                        kind: next_kind,
                        text: ch.to_string(),
                    });
                    self.knows_kind = next_kind.is_some();
                } else {
                    last.text.push(ch);
                }
            }
            return;
        }

        match ch {
            '=' => push_or_replace_empty(tokens, Token::classified(TokenKind::Equals, "=")),
            '`' => tokens.push(Token::classified(TokenKind::Backtick, "`")),
            '(' => tokens.push(Token::classified(TokenKind::LParen, "(")),
            ')' => push_or_replace_empty(tokens, Token::classified(TokenKind::RParen, ")")),
            other => push_or_replace_empty(tokens, Token::open(other)),
        }
        self.knows_kind = tokens.last().is_some_and(|last| last.kind.is_some());
    }

    fn finish(&mut self, tokens: &mut Vec<Token>) {
        let Some(last) = tokens.last_mut() else {
            return;
        };
        if last.text.is_empty() {
            tokens.pop();
            return;
        }
        // An unterminated string stays unclassified so the parser rejects it.
        if !self.in_string {
            force_token_finish(last);
        }
    }
}

fn force_token_finish(token: &mut Token) {
    if is_identifier(&token.text) {
        token.kind = Some(TokenKind::Identifier);
    } else if token.text == "=" {
        token.kind = Some(TokenKind::Equals);
    } else if token.text == ")" {
        token.kind = Some(TokenKind::RParen);
    }
}
