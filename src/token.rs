use core::fmt;

pub const EOQ: char = '\0';

#[derive(Debug, PartialEq, Clone)]
pub enum TokenType {
    Eoq,
    Error { msg: Box<str> },

    Dot,
    Index { value: Box<str> },
    LBracket,
    Name { value: Box<str> },
    QuotedName { value: Box<str> },
    RBracket,

    And,
    Comma,
    Eq,
    False,
    Float { value: Box<str> },
    Function { name: Box<str> },
    Ge,
    Gt,
    Int { value: Box<str> },
    Le,
    LParen,
    Lt,
    Minus,
    Ne,
    Not,
    Null,
    Or,
    Percent,
    Plus,
    RParen,
    Slash,
    Star,
    StringLiteral { value: Box<str> },
    True,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::Eoq => f.write_str("'end of expression'"),
            TokenType::Error { msg } => write!(f, "error: {}", *msg),
            TokenType::Dot => f.write_str("'.'"),
            TokenType::Index { value } => write!(f, "'{}'", *value),
            TokenType::LBracket => f.write_str("'['"),
            TokenType::Name { value } => write!(f, "'{}'", *value),
            TokenType::QuotedName { value } => write!(f, "'`{}`'", *value),
            TokenType::RBracket => f.write_str("']'"),
            TokenType::And => f.write_str("'&&'"),
            TokenType::Comma => f.write_str("','"),
            TokenType::Eq => f.write_str("'=='"),
            TokenType::False => f.write_str("'false'"),
            TokenType::Float { value } => write!(f, "{}", *value),
            TokenType::Function { name } => write!(f, "'{}'", *name),
            TokenType::Ge => f.write_str("'>='"),
            TokenType::Gt => f.write_str("'>'"),
            TokenType::Int { value } => write!(f, "{}", *value),
            TokenType::Le => f.write_str("'<='"),
            TokenType::LParen => f.write_str("'('"),
            TokenType::Lt => f.write_str("'<'"),
            TokenType::Minus => f.write_str("'-'"),
            TokenType::Ne => f.write_str("'!='"),
            TokenType::Not => f.write_str("'!'"),
            TokenType::Null => f.write_str("'null'"),
            TokenType::Or => f.write_str("'||'"),
            TokenType::Percent => f.write_str("'%'"),
            TokenType::Plus => f.write_str("'+'"),
            TokenType::RParen => f.write_str("')'"),
            TokenType::Slash => f.write_str("'/'"),
            TokenType::Star => f.write_str("'*'"),
            TokenType::StringLiteral { value } => write!(f, "'{}'", *value),
            TokenType::True => f.write_str("'true'"),
        }
    }
}

/// An expression token, as produced by the lexer.
#[derive(Debug, PartialEq, Clone)]
pub struct Token {
    pub kind: TokenType,
    pub span: (usize, usize),
}

impl Token {
    pub fn new(kind: TokenType, start: usize, end: usize) -> Self {
        Self {
            kind,
            span: (start, end),
        }
    }
}
