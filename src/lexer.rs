use crate::{
    errors::ExpressionError,
    token::{Token, TokenType, EOQ},
};

use std::str::CharIndices;

enum State {
    Error,
    EndOfExpression,
    LexExpression,
    LexField,
    LexIndex,
    LexQuotedName,
    LexString,
}

/// An expression tokenizer, producing a vector of tokens.
struct Lexer<'q> {
    text: &'q str,
    tokens: Vec<Token>,

    chars: CharIndices<'q>,
    start: usize,
    pos: usize,

    paren_depth: u32,
}

impl<'q> Lexer<'q> {
    fn new(text: &'q str) -> Self {
        Self {
            text,
            tokens: Vec::new(),
            start: 0,
            pos: 0,
            chars: text.char_indices(),
            paren_depth: 0,
        }
    }

    fn run(&mut self) {
        let mut state = State::LexExpression;
        loop {
            match state {
                State::Error | State::EndOfExpression => break,
                State::LexExpression => state = lex_expression(self),
                State::LexField => state = lex_field(self),
                State::LexIndex => state = lex_index(self),
                State::LexQuotedName => state = lex_quoted(self, '`'),
                State::LexString => state = lex_quoted(self, '\''),
            }
        }
    }

    fn emit(&mut self, t: TokenType) {
        self.tokens.push(Token::new(t, self.start, self.pos));
        self.start = self.pos;
    }

    fn value(&self) -> &str {
        // start and pos always sit on char boundaries
        self.text.get(self.start..self.pos).unwrap_or_default()
    }

    fn boxed_value(&self) -> Box<str> {
        self.value().to_string().into_boxed_str()
    }

    fn next(&mut self) -> Option<char> {
        if let Some((pos, ch)) = self.chars.next() {
            self.pos = pos + ch.len_utf8();

            #[cfg(debug_assertions)]
            debug_assert!(
                self.pos <= self.text.len(),
                "current position is out of bounds"
            );

            Some(ch)
        } else {
            None
        }
    }

    fn ignore(&mut self) {
        self.start = self.pos;
    }

    fn peek(&mut self) -> char {
        if let Some((_, ch)) = self.chars.clone().next() {
            ch
        } else {
            EOQ
        }
    }

    /// True once every character has been consumed. A NUL in the text
    /// peeks the same as `EOQ`, so the sentinel alone is not enough.
    fn at_end(&self) -> bool {
        self.pos == self.text.len()
    }

    fn accept(&mut self, ch: char) -> bool {
        if self.peek() == ch {
            self.next();
            true
        } else {
            false
        }
    }

    fn accept_if(&mut self, pred: impl FnOnce(char) -> bool) -> bool {
        if pred(self.peek()) {
            self.next();
            true
        } else {
            false
        }
    }

    fn accept_run(&mut self, pred: impl Fn(char) -> bool) -> bool {
        let mut accepted = false;
        while pred(self.peek()) {
            self.next();
            accepted = true;
        }
        accepted
    }

    fn ignore_whitespace(&mut self) -> bool {
        #[cfg(debug_assertions)]
        debug_assert!(
            self.pos == self.start,
            "must emit or ignore before eating whitespace"
        );

        if self.accept_run(is_whitespace_char) {
            self.ignore();
            true
        } else {
            false
        }
    }

    /// Emit a single character token and carry on lexing an expression.
    fn single(&mut self, t: TokenType) -> State {
        self.next();
        self.emit(t);
        State::LexExpression
    }

    fn error(&mut self, msg: String) -> State {
        self.tokens.push(Token::new(
            TokenType::Error {
                msg: msg.into_boxed_str(),
            },
            self.start,
            self.pos,
        ));
        State::Error
    }
}

pub fn tokenize(text: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(text);
    lexer.run();
    lexer.tokens
}

pub fn lex(text: &str) -> Result<Vec<Token>, ExpressionError> {
    let tokens = tokenize(text);

    match tokens.last() {
        Some(Token {
            kind: TokenType::Error { msg },
            span,
        }) => Err(ExpressionError::lexer((*msg).to_string(), *span)),
        _ => Ok(tokens),
    }
}

fn lex_expression(l: &mut Lexer) -> State {
    l.ignore_whitespace();

    match l.peek() {
        EOQ if l.at_end() => {
            if l.paren_depth > 0 {
                return l.error(String::from("unbalanced parentheses"));
            }
            l.emit(TokenType::Eoq);
            State::EndOfExpression
        }
        '.' => {
            l.next();
            l.emit(TokenType::Dot);
            State::LexField
        }
        '[' => {
            l.next();
            l.emit(TokenType::LBracket);
            State::LexIndex
        }
        '`' => {
            l.next();
            State::LexQuotedName
        }
        '\'' => {
            l.next();
            State::LexString
        }
        '(' => {
            l.paren_depth += 1;
            l.single(TokenType::LParen)
        }
        ')' => {
            if l.paren_depth == 0 {
                l.next();
                return l.error(String::from("unbalanced parentheses"));
            }
            l.paren_depth -= 1;
            l.single(TokenType::RParen)
        }
        ',' => l.single(TokenType::Comma),
        '+' => l.single(TokenType::Plus),
        '-' => l.single(TokenType::Minus),
        '*' => l.single(TokenType::Star),
        '/' => l.single(TokenType::Slash),
        '%' => l.single(TokenType::Percent),
        '!' => {
            l.next();
            if l.accept('=') {
                l.emit(TokenType::Ne);
            } else {
                l.emit(TokenType::Not);
            }
            State::LexExpression
        }
        '=' => {
            l.next();
            if l.accept('=') {
                l.emit(TokenType::Eq);
                State::LexExpression
            } else {
                l.error(String::from("expected '==', found '='"))
            }
        }
        '<' => {
            l.next();
            if l.accept('=') {
                l.emit(TokenType::Le);
            } else if l.accept('>') {
                l.emit(TokenType::Ne);
            } else {
                l.emit(TokenType::Lt);
            }
            State::LexExpression
        }
        '>' => {
            l.next();
            if l.accept('=') {
                l.emit(TokenType::Ge);
            } else {
                l.emit(TokenType::Gt);
            }
            State::LexExpression
        }
        '&' => {
            l.next();
            if l.accept('&') {
                l.emit(TokenType::And);
                State::LexExpression
            } else {
                l.error(String::from("unexpected '&', did you mean '&&'?"))
            }
        }
        '|' => {
            l.next();
            if l.accept('|') {
                l.emit(TokenType::Or);
                State::LexExpression
            } else {
                l.error(String::from("unexpected '|', did you mean '||'?"))
            }
        }
        ch if is_digit(ch) => lex_number(l),
        ch if is_name_first(ch) => {
            l.accept_run(is_name_char);
            match l.value().to_ascii_lowercase().as_str() {
                "true" => l.emit(TokenType::True),
                "false" => l.emit(TokenType::False),
                "null" => l.emit(TokenType::Null),
                "and" => l.emit(TokenType::And),
                "or" => l.emit(TokenType::Or),
                "not" => l.emit(TokenType::Not),
                _ => {
                    if l.peek() == '(' {
                        l.emit(TokenType::Function {
                            name: l.boxed_value(),
                        });
                    } else {
                        l.emit(TokenType::Name {
                            value: l.boxed_value(),
                        });
                    }
                }
            }
            State::LexExpression
        }
        ch => {
            l.next();
            l.error(format!("unexpected character '{}'", ch))
        }
    }
}

fn lex_field(l: &mut Lexer) -> State {
    if l.accept_run(is_whitespace_char) {
        return l.error(String::from("unexpected whitespace after dot"));
    }

    if l.accept('`') {
        State::LexQuotedName
    } else if l.accept_if(is_name_first) {
        // keywords are plain field names after a dot
        l.accept_run(is_name_char);
        l.emit(TokenType::Name {
            value: l.boxed_value(),
        });
        State::LexExpression
    } else {
        let msg = format!(
            "expected a field name after '.', found '{}'",
            l.next().unwrap_or(EOQ)
        );
        l.error(msg)
    }
}

fn lex_index(l: &mut Lexer) -> State {
    l.ignore_whitespace();

    match l.peek() {
        EOQ if l.at_end() => l.error(String::from("unclosed array index")),
        '-' => {
            l.next();
            l.error(String::from("array index must not be negative"))
        }
        ch if is_digit(ch) => {
            l.accept_run(is_digit);
            l.emit(TokenType::Index {
                value: l.boxed_value(),
            });
            l.ignore_whitespace();
            if l.accept(']') {
                l.emit(TokenType::RBracket);
                State::LexExpression
            } else if l.at_end() {
                l.error(String::from("unclosed array index"))
            } else {
                let msg = format!("expected ']', found '{}'", l.peek());
                l.next();
                l.error(msg)
            }
        }
        ch => {
            l.next();
            l.error(format!("expected an array index, found '{}'", ch))
        }
    }
}

/// Lex a quoted field name or string literal. Escapes are validated here
/// but the token value keeps them; the parser unescapes.
fn lex_quoted(l: &mut Lexer, quote: char) -> State {
    l.ignore(); // ignore open quote

    loop {
        match l.peek() {
            '\\' => {
                l.next();
                if !l.accept_if(|c| is_escape_char(c, quote)) {
                    return l.error(String::from("invalid escape sequence"));
                }
            }
            EOQ if l.at_end() => {
                let what = if quote == '`' { "field name" } else { "string" };
                let msg = format!("unclosed {} starting at index {}", what, l.start);
                return l.error(msg);
            }
            ch if ch == quote => {
                if quote == '`' {
                    l.emit(TokenType::QuotedName {
                        value: l.boxed_value(),
                    });
                } else {
                    l.emit(TokenType::StringLiteral {
                        value: l.boxed_value(),
                    });
                }
                l.next();
                l.ignore(); // ignore closing quote
                return State::LexExpression;
            }
            _ => {
                l.next();
            }
        }
    }
}

fn lex_number(l: &mut Lexer) -> State {
    l.accept_run(is_digit);

    let mut float = false;

    if l.peek() == '.' {
        l.next();
        if !l.accept_run(is_digit) {
            return l.error(String::from(
                "a fractional digit is required after a decimal point",
            ));
        }
        float = true;
    }

    if l.accept_if(|ch| ch == 'e' || ch == 'E') {
        l.accept_if(|ch| ch == '+' || ch == '-');
        if !l.accept_run(is_digit) {
            return l.error(String::from("at least one exponent digit is required"));
        }
        float = true;
    }

    if is_name_first(l.peek()) {
        let msg = format!("unexpected '{}' after number", l.peek());
        l.next();
        return l.error(msg);
    }

    if float {
        l.emit(TokenType::Float {
            value: l.boxed_value(),
        });
    } else {
        l.emit(TokenType::Int {
            value: l.boxed_value(),
        });
    }

    State::LexExpression
}

pub(crate) fn is_name_first(ch: char) -> bool {
    let code_point = ch as u32;
    // surrogate pair code points are not representable with char
    (0x41..=0x5A).contains(&code_point)
        || code_point == 0x5F
        || (0x61..=0x7A).contains(&code_point)
        || code_point >= 0x80
}

pub(crate) fn is_name_char(ch: char) -> bool {
    is_name_first(ch) || is_digit(ch) || ch == '$'
}

fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

fn is_escape_char(ch: char, quote: char) -> bool {
    match quote {
        '`' => matches!(ch, '`' | '\\'),
        _ => matches!(ch, '\'' | '\\' | 'n' | 'r' | 't'),
    }
}

fn is_whitespace_char(ch: char) -> bool {
    matches!(ch, ' ' | '\n' | '\r' | '\t')
}
