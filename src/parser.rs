use std::{iter::Peekable, vec::IntoIter};

use crate::{
    env::{Env, FunctionSignature},
    errors::ExpressionError,
    expression::{BinaryOperator, ExpressionPosition, Literal, LogicalExpression, UnaryOperator},
    lexer::lex,
    path::FieldPath,
    segment::{validate_name, PathSegment, Step},
    token::{Token, TokenType},
};

use TokenType::*;

const EOQ_TOKEN: Token = Token {
    kind: Eoq,
    span: (0, 0),
};

type Tokens = Peekable<IntoIter<Token>>;

const PRECEDENCE_LOWEST: u8 = 1;
const PRECEDENCE_LOGICAL_OR: u8 = 2;
const PRECEDENCE_LOGICAL_AND: u8 = 3;
const PRECEDENCE_RELATIONAL: u8 = 4;
const PRECEDENCE_SUM: u8 = 5;
const PRECEDENCE_PRODUCT: u8 = 6;
const PRECEDENCE_PREFIX: u8 = 7;

/// Parses expression text into a [`LogicalExpression`].
///
/// A parser holds no state between calls to [`Parser::parse`], so one
/// instance can be shared freely between threads.
pub struct Parser {
    env: Env,
}

impl Default for Parser {
    fn default() -> Self {
        Parser::new(Env::standard())
    }
}

impl Parser {
    pub fn new(env: Env) -> Self {
        Parser { env }
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn parse(&self, text: &str) -> Result<LogicalExpression, ExpressionError> {
        let tokens = lex(text)?;
        log::trace!("lexed {} tokens from {:?}", tokens.len(), text);

        let mut it = tokens.into_iter().peekable();
        let expr = self.parse_expression(&mut it, text, PRECEDENCE_LOWEST)?;

        match it.next() {
            Some(Token { kind: Eoq, .. }) | None => Ok(expr),
            Some(token) => Err(ExpressionError::syntax(
                format!("expected end of expression, found {}", token.kind),
                token.span,
            )),
        }
    }

    fn parse_expression(
        &self,
        it: &mut Tokens,
        text: &str,
        precedence: u8,
    ) -> Result<LogicalExpression, ExpressionError> {
        let mut left = self.parse_prefix(it, text)?;

        loop {
            let peek_kind = it.peek().map_or(&Eoq, |t| &t.kind);
            match binary_operator(peek_kind) {
                Some(_) if self.precedence(peek_kind) > precedence => {
                    left = self.parse_infix(it, text, left)?;
                }
                _ => break,
            }
        }

        Ok(left)
    }

    fn parse_infix(
        &self,
        it: &mut Tokens,
        text: &str,
        left: LogicalExpression,
    ) -> Result<LogicalExpression, ExpressionError> {
        let token = it.next().unwrap_or(EOQ_TOKEN);
        let operator = binary_operator(&token.kind).ok_or_else(|| {
            ExpressionError::syntax(
                format!("unexpected infix operator {}", token.kind),
                token.span,
            )
        })?;
        let right = self.parse_expression(it, text, self.precedence(&token.kind))?;

        Ok(LogicalExpression::binary(
            left,
            operator,
            right,
            ExpressionPosition::in_text(text, token.span.0),
        ))
    }

    fn parse_prefix(
        &self,
        it: &mut Tokens,
        text: &str,
    ) -> Result<LogicalExpression, ExpressionError> {
        let token = match it.peek() {
            Some(Token {
                kind: Name { .. } | QuotedName { .. } | LBracket,
                ..
            }) => return self.parse_path(it, text).map(LogicalExpression::FieldPath),
            Some(Token {
                kind: Function { .. },
                ..
            }) => return self.parse_function_call(it, text),
            _ => it.next().unwrap_or(EOQ_TOKEN),
        };

        let position = ExpressionPosition::in_text(text, token.span.0);

        match token.kind {
            Int { ref value } => {
                let i = parse_int(value, token.span)?;
                Ok(LogicalExpression::literal(Literal::Int(i), position))
            }
            Float { ref value } => {
                let f = parse_float(value, token.span)?;
                Ok(LogicalExpression::literal(Literal::Float(f), position))
            }
            StringLiteral { ref value } => {
                let s = unescape_string(value, token.span.0)?;
                Ok(LogicalExpression::literal(Literal::String(s), position))
            }
            True => Ok(LogicalExpression::literal(Literal::Boolean(true), position)),
            False => Ok(LogicalExpression::literal(
                Literal::Boolean(false),
                position,
            )),
            Null => Ok(LogicalExpression::literal(Literal::Null, position)),
            Minus => {
                // a minus sign directly before a number is part of the literal
                match it.peek().map(|t| &t.kind) {
                    Some(Int { value }) => {
                        let i = parse_int(&format!("-{value}"), token.span)?;
                        it.next();
                        Ok(LogicalExpression::literal(Literal::Int(i), position))
                    }
                    Some(Float { value }) => {
                        let f = parse_float(value, token.span)?;
                        it.next();
                        Ok(LogicalExpression::literal(Literal::Float(-f), position))
                    }
                    _ => {
                        let operand = self.parse_expression(it, text, PRECEDENCE_PREFIX)?;
                        Ok(LogicalExpression::unary(
                            UnaryOperator::Negate,
                            operand,
                            position,
                        ))
                    }
                }
            }
            Not => {
                let operand = self.parse_expression(it, text, PRECEDENCE_PREFIX)?;
                Ok(LogicalExpression::unary(
                    UnaryOperator::Not,
                    operand,
                    position,
                ))
            }
            LParen => self.parse_grouped_expression(it, text),
            Eoq => Err(ExpressionError::syntax(
                String::from("unexpected end of expression"),
                token.span,
            )),
            kind => Err(ExpressionError::syntax(
                format!("unexpected expression token {}", kind),
                token.span,
            )),
        }
    }

    fn parse_grouped_expression(
        &self,
        it: &mut Tokens,
        text: &str,
    ) -> Result<LogicalExpression, ExpressionError> {
        let expr = self.parse_expression(it, text, PRECEDENCE_LOWEST)?;

        match it.next().unwrap_or(EOQ_TOKEN) {
            Token { kind: RParen, .. } => Ok(expr),
            Token { kind: Eoq, span } => Err(ExpressionError::syntax(
                String::from("unbalanced parentheses"),
                span,
            )),
            token => Err(ExpressionError::syntax(
                format!("expected ')', found {}", token.kind),
                token.span,
            )),
        }
    }

    fn parse_function_call(
        &self,
        it: &mut Tokens,
        text: &str,
    ) -> Result<LogicalExpression, ExpressionError> {
        let token = it.next().unwrap_or(EOQ_TOKEN);
        let name = match &token.kind {
            Function { name } => name.to_string(),
            kind => {
                return Err(ExpressionError::syntax(
                    format!("expected a function call, found {}", kind),
                    token.span,
                ))
            }
        };

        #[cfg(debug_assertions)]
        debug_assert!(
            matches!(it.peek(), Some(Token { kind: LParen, .. })),
            "expected an open paren after a function name"
        );

        it.next(); // eat open paren
        let mut args: Vec<LogicalExpression> = Vec::new();

        if matches!(it.peek(), Some(Token { kind: RParen, .. })) {
            it.next();
        } else {
            loop {
                args.push(self.parse_expression(it, text, PRECEDENCE_LOWEST)?);

                match it.next().unwrap_or(EOQ_TOKEN) {
                    Token { kind: RParen, .. } => break,
                    Token { kind: Comma, .. } => continue,
                    token => {
                        return Err(ExpressionError::syntax(
                            format!("expected ',' or ')', found {}", token.kind),
                            token.span,
                        ))
                    }
                }
            }
        }

        self.check_function(&name, args.len(), token.span)?;

        Ok(LogicalExpression::function_call(
            &name,
            args,
            ExpressionPosition::in_text(text, token.span.0),
        ))
    }

    fn check_function(
        &self,
        name: &str,
        arg_count: usize,
        span: (usize, usize),
    ) -> Result<(), ExpressionError> {
        match self.env.function(name) {
            Some(signature) if !signature.accepts(arg_count) => Err(ExpressionError::typ(
                arity_message(name, signature, arg_count),
                span,
            )),
            Some(_) => Ok(()),
            None if self.env.permissive_functions => Ok(()),
            None => Err(ExpressionError::name(
                format!("unknown function `{}`", name),
                span,
            )),
        }
    }

    fn parse_path(&self, it: &mut Tokens, text: &str) -> Result<FieldPath, ExpressionError> {
        let start = it.peek().map_or(0, |t| t.span.0);
        let mut steps: Vec<Step> = Vec::new();

        loop {
            match it.peek().map(|t| &t.kind) {
                Some(Name { .. } | QuotedName { .. }) if steps.is_empty() => {
                    steps.push(self.parse_name(it)?);
                }
                Some(Dot) if !steps.is_empty() => {
                    it.next();
                    steps.push(self.parse_name(it)?);
                }
                Some(LBracket) => {
                    steps.push(self.parse_index(it)?);
                }
                _ => break,
            }
        }

        let root = PathSegment::from_steps(steps)
            .map_err(|err| ExpressionError::syntax(err.to_string(), (start, start)))?;

        Ok(FieldPath::new(root).with_position(ExpressionPosition::in_text(text, start)))
    }

    fn parse_name(&self, it: &mut Tokens) -> Result<Step, ExpressionError> {
        let token = it.next().unwrap_or(EOQ_TOKEN);
        let name = match token.kind {
            Name { value } => value.to_string(),
            QuotedName { value } => unescape_string(&value, token.span.0)?,
            kind => {
                return Err(ExpressionError::syntax(
                    format!("expected a field name, found {}", kind),
                    token.span,
                ))
            }
        };

        validate_name(&name)
            .map_err(|err| ExpressionError::syntax(err.to_string(), token.span))?;

        Ok(Step::Name(name))
    }

    fn parse_index(&self, it: &mut Tokens) -> Result<Step, ExpressionError> {
        #[cfg(debug_assertions)]
        debug_assert!(
            matches!(it.peek(), Some(Token { kind: LBracket, .. })),
            "expected the start of an array index"
        );

        it.next(); // eat open bracket

        let token = it.next().unwrap_or(EOQ_TOKEN);
        let index = match &token.kind {
            Index { value } => value.parse::<u64>().map_err(|_| {
                ExpressionError::syntax(format!("invalid array index '{}'", value), token.span)
            })?,
            kind => {
                return Err(ExpressionError::syntax(
                    format!("expected an array index, found {}", kind),
                    token.span,
                ))
            }
        };

        if index > self.env.max_index {
            return Err(ExpressionError::syntax(
                format!(
                    "array index {} exceeds the maximum of {}",
                    index, self.env.max_index
                ),
                token.span,
            ));
        }

        match it.next() {
            Some(Token { kind: RBracket, .. }) => (),
            Some(token) => {
                return Err(ExpressionError::syntax(
                    format!("expected ']', found {}", token.kind),
                    token.span,
                ))
            }
            None => {
                return Err(ExpressionError::syntax(
                    String::from("unclosed array index"),
                    token.span,
                ))
            }
        }

        let index = usize::try_from(index).map_err(|_| {
            ExpressionError::syntax(format!("array index {} is too large", index), token.span)
        })?;

        Ok(Step::Index(index))
    }

    fn precedence(&self, kind: &TokenType) -> u8 {
        match kind {
            Or => PRECEDENCE_LOGICAL_OR,
            And => PRECEDENCE_LOGICAL_AND,
            Eq | Ne | Lt | Le | Gt | Ge => PRECEDENCE_RELATIONAL,
            Plus | Minus => PRECEDENCE_SUM,
            Star | Slash | Percent => PRECEDENCE_PRODUCT,
            Not => PRECEDENCE_PREFIX,
            _ => PRECEDENCE_LOWEST,
        }
    }
}

fn binary_operator(kind: &TokenType) -> Option<BinaryOperator> {
    match kind {
        Plus => Some(BinaryOperator::Add),
        Minus => Some(BinaryOperator::Subtract),
        Star => Some(BinaryOperator::Multiply),
        Slash => Some(BinaryOperator::Divide),
        Percent => Some(BinaryOperator::Modulo),
        Eq => Some(BinaryOperator::Eq),
        Ne => Some(BinaryOperator::Ne),
        Lt => Some(BinaryOperator::Lt),
        Le => Some(BinaryOperator::Le),
        Gt => Some(BinaryOperator::Gt),
        Ge => Some(BinaryOperator::Ge),
        And => Some(BinaryOperator::And),
        Or => Some(BinaryOperator::Or),
        _ => None,
    }
}

fn arity_message(name: &str, signature: &FunctionSignature, given: usize) -> String {
    let plural = |n: usize| if n == 1 { "argument" } else { "arguments" };
    let expected = match signature.max_args {
        Some(max) if max == signature.min_args => format!("{} {}", max, plural(max)),
        Some(max) => format!("{} to {} arguments", signature.min_args, max),
        None => format!(
            "at least {} {}",
            signature.min_args,
            plural(signature.min_args)
        ),
    };
    format!("{}() takes {} but {} were given", name, expected, given)
}

fn parse_int(value: &str, span: (usize, usize)) -> Result<i64, ExpressionError> {
    value.parse::<i64>().map_err(|_| {
        ExpressionError::syntax(format!("integer literal {} is out of range", value), span)
    })
}

fn parse_float(value: &str, span: (usize, usize)) -> Result<f64, ExpressionError> {
    let f = value
        .parse::<f64>()
        .map_err(|_| ExpressionError::syntax(String::from("invalid float literal"), span))?;

    if f.is_finite() {
        Ok(f)
    } else {
        Err(ExpressionError::syntax(
            format!("float literal {} is out of range", value),
            span,
        ))
    }
}

/// Resolve backslash escapes in a quoted field name or string literal. The
/// lexer has already checked that every escape is one the quote allows.
fn unescape_string(value: &str, token_start: usize) -> Result<String, ExpressionError> {
    let mut rv = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            rv.push(ch);
            continue;
        }

        match chars.next() {
            Some('n') => rv.push('\n'),
            Some('r') => rv.push('\r'),
            Some('t') => rv.push('\t'),
            Some(c @ ('\\' | '\'' | '`')) => rv.push(c),
            _ => {
                return Err(ExpressionError::syntax(
                    String::from("invalid escape"),
                    (token_start, token_start + value.len()),
                ))
            }
        }
    }

    Ok(rv)
}
