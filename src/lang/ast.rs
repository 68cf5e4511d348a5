use serde::{Deserialize, Serialize};

/// The payload of a literal word. Strings are the only literal data type the
/// language has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiteralValue {
    Str(String),
}

/// A node of the abstract syntax tree. The parser produces exactly one
/// `Root` wrapping one `TopLevel`; everything below is a word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AstNode {
    Root(Vec<AstNode>),
    TopLevel(Vec<AstNode>),
    Assignment { name: String, word: Box<AstNode> },
    FunctionCall { name: String },
    Literal(LiteralValue),
    Quote(Box<AstNode>),
    List(Vec<AstNode>),
}

impl AstNode {
    pub fn kind_name(&self) -> &'static str {
        match self {
            AstNode::Root(_) => "root",
            AstNode::TopLevel(_) => "top-level",
            AstNode::Assignment { .. } => "assignment",
            AstNode::FunctionCall { .. } => "function call",
            AstNode::Literal(_) => "literal",
            AstNode::Quote(_) => "quote",
            AstNode::List(_) => "list",
        }
    }
}
