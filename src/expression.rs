//! The logical expression tree that a [`FieldPath`] is a leaf of.
//!
//! [`LogicalExpression`] is a closed set of node kinds. Behaviour that
//! varies by node kind is added with an [`ExprVisitor`], which has one
//! method per kind and no defaults, so every visitor handles every node.
//!
//! Node positions are diagnostic only. They never take part in equality.
use std::{collections::HashSet, convert::Infallible, fmt};

use crate::{path::FieldPath, render::ExpressionStringBuilder};

/// Where a node started in the text it was parsed from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ExpressionPosition {
    #[default]
    Unknown,
    At {
        line: usize,
        column: usize,
    },
}

impl ExpressionPosition {
    /// The 1-based line and column of byte `offset` in `text`.
    pub fn in_text(text: &str, offset: usize) -> Self {
        let mut line = 1;
        let mut column = 1;
        for (i, ch) in text.char_indices() {
            if i >= offset {
                break;
            }
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        ExpressionPosition::At { line, column }
    }
}

impl fmt::Display for ExpressionPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionPosition::Unknown => f.write_str("unknown position"),
            ExpressionPosition::At { line, column } => write!(f, "line {line}, column {column}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Boolean(bool),
    Int(i64),
    Float(f64),
    String(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Negate,
    Not,
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOperator::Negate => f.write_str("-"),
            UnaryOperator::Not => f.write_str("!"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryOperator::Add => f.write_str("+"),
            BinaryOperator::Subtract => f.write_str("-"),
            BinaryOperator::Multiply => f.write_str("*"),
            BinaryOperator::Divide => f.write_str("/"),
            BinaryOperator::Modulo => f.write_str("%"),
            BinaryOperator::Eq => f.write_str("=="),
            BinaryOperator::Ne => f.write_str("!="),
            BinaryOperator::Lt => f.write_str("<"),
            BinaryOperator::Le => f.write_str("<="),
            BinaryOperator::Gt => f.write_str(">"),
            BinaryOperator::Ge => f.write_str(">="),
            BinaryOperator::And => f.write_str("&&"),
            BinaryOperator::Or => f.write_str("||"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LiteralExpression {
    pub value: Literal,
    pub position: ExpressionPosition,
}

#[derive(Debug, Clone)]
pub struct UnaryExpression {
    pub operator: UnaryOperator,
    pub operand: Box<LogicalExpression>,
    pub position: ExpressionPosition,
}

#[derive(Debug, Clone)]
pub struct BinaryExpression {
    pub left: Box<LogicalExpression>,
    pub operator: BinaryOperator,
    pub right: Box<LogicalExpression>,
    pub position: ExpressionPosition,
}

#[derive(Debug, Clone)]
pub struct FunctionCall {
    pub name: String,
    pub args: Vec<LogicalExpression>,
    pub position: ExpressionPosition,
}

impl PartialEq for LiteralExpression {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl PartialEq for UnaryExpression {
    fn eq(&self, other: &Self) -> bool {
        self.operator == other.operator && self.operand == other.operand
    }
}

impl PartialEq for BinaryExpression {
    fn eq(&self, other: &Self) -> bool {
        self.operator == other.operator && self.left == other.left && self.right == other.right
    }
}

impl PartialEq for FunctionCall {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.args == other.args
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogicalExpression {
    FieldPath(FieldPath),
    Literal(LiteralExpression),
    Unary(UnaryExpression),
    Binary(BinaryExpression),
    FunctionCall(FunctionCall),
}

impl LogicalExpression {
    pub fn literal(value: Literal, position: ExpressionPosition) -> Self {
        LogicalExpression::Literal(LiteralExpression { value, position })
    }

    pub fn unary(
        operator: UnaryOperator,
        operand: LogicalExpression,
        position: ExpressionPosition,
    ) -> Self {
        LogicalExpression::Unary(UnaryExpression {
            operator,
            operand: Box::new(operand),
            position,
        })
    }

    pub fn binary(
        left: LogicalExpression,
        operator: BinaryOperator,
        right: LogicalExpression,
        position: ExpressionPosition,
    ) -> Self {
        LogicalExpression::Binary(BinaryExpression {
            left: Box::new(left),
            operator,
            right: Box::new(right),
            position,
        })
    }

    pub fn function_call(
        name: &str,
        args: Vec<LogicalExpression>,
        position: ExpressionPosition,
    ) -> Self {
        LogicalExpression::FunctionCall(FunctionCall {
            name: name.to_owned(),
            args,
            position,
        })
    }

    /// Dispatch to the visitor method for this node's kind.
    pub fn accept<V, X>(&self, visitor: &mut X, value: V) -> Result<X::Output, X::Error>
    where
        X: ExprVisitor<V> + ?Sized,
    {
        match self {
            LogicalExpression::FieldPath(path) => visitor.visit_field_path(path, value),
            LogicalExpression::Literal(literal) => visitor.visit_literal(literal, value),
            LogicalExpression::Unary(unary) => visitor.visit_unary(unary, value),
            LogicalExpression::Binary(binary) => visitor.visit_binary(binary, value),
            LogicalExpression::FunctionCall(call) => visitor.visit_function_call(call, value),
        }
    }

    /// Direct sub-expressions, in source order.
    pub fn children(&self) -> Vec<&LogicalExpression> {
        match self {
            LogicalExpression::FieldPath(_) | LogicalExpression::Literal(_) => Vec::new(),
            LogicalExpression::Unary(unary) => vec![&*unary.operand],
            LogicalExpression::Binary(binary) => vec![&*binary.left, &*binary.right],
            LogicalExpression::FunctionCall(call) => call.args.iter().collect(),
        }
    }

    pub fn position(&self) -> ExpressionPosition {
        match self {
            LogicalExpression::FieldPath(path) => path.position(),
            LogicalExpression::Literal(literal) => literal.position,
            LogicalExpression::Unary(unary) => unary.position,
            LogicalExpression::Binary(binary) => binary.position,
            LogicalExpression::FunctionCall(call) => call.position,
        }
    }

    pub fn is_field_path(&self) -> bool {
        matches!(self, LogicalExpression::FieldPath(_))
    }

    pub fn as_field_path(&self) -> Option<&FieldPath> {
        match self {
            LogicalExpression::FieldPath(path) => Some(path),
            _ => None,
        }
    }

    /// Narrow this node to a path, handing the node back if it is
    /// something else.
    pub fn into_field_path(self) -> Result<FieldPath, LogicalExpression> {
        match self {
            LogicalExpression::FieldPath(path) => Ok(path),
            other => Err(other),
        }
    }

    /// A short name for this node's kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            LogicalExpression::FieldPath(_) => "field path",
            LogicalExpression::Literal(_) => "literal",
            LogicalExpression::Unary(_) => "unary expression",
            LogicalExpression::Binary(_) => "binary expression",
            LogicalExpression::FunctionCall(_) => "function call",
        }
    }
}

impl From<FieldPath> for LogicalExpression {
    fn from(path: FieldPath) -> Self {
        LogicalExpression::FieldPath(path)
    }
}

/// Canonical text, which parses back to an equal expression.
impl fmt::Display for LogicalExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.accept(&mut ExpressionStringBuilder::new(f), ())
    }
}

/// Per node kind behaviour over a [`LogicalExpression`] tree.
///
/// `V` is a context value passed down with each visit.
pub trait ExprVisitor<V> {
    type Output;
    type Error;

    fn visit_field_path(&mut self, path: &FieldPath, value: V)
        -> Result<Self::Output, Self::Error>;

    fn visit_literal(
        &mut self,
        literal: &LiteralExpression,
        value: V,
    ) -> Result<Self::Output, Self::Error>;

    fn visit_unary(
        &mut self,
        unary: &UnaryExpression,
        value: V,
    ) -> Result<Self::Output, Self::Error>;

    fn visit_binary(
        &mut self,
        binary: &BinaryExpression,
        value: V,
    ) -> Result<Self::Output, Self::Error>;

    fn visit_function_call(
        &mut self,
        call: &FunctionCall,
        value: V,
    ) -> Result<Self::Output, Self::Error>;
}

#[derive(Default)]
struct PathCollector {
    paths: HashSet<FieldPath>,
}

impl PathCollector {
    fn visit_all(&mut self, exprs: &[&LogicalExpression]) -> Result<(), Infallible> {
        exprs.iter().try_for_each(|e| e.accept(&mut *self, ()))
    }
}

impl ExprVisitor<()> for PathCollector {
    type Output = ();
    type Error = Infallible;

    fn visit_field_path(&mut self, path: &FieldPath, _: ()) -> Result<(), Infallible> {
        self.paths.insert(path.clone());
        Ok(())
    }

    fn visit_literal(&mut self, _: &LiteralExpression, _: ()) -> Result<(), Infallible> {
        Ok(())
    }

    fn visit_unary(&mut self, unary: &UnaryExpression, _: ()) -> Result<(), Infallible> {
        unary.operand.accept(self, ())
    }

    fn visit_binary(&mut self, binary: &BinaryExpression, _: ()) -> Result<(), Infallible> {
        self.visit_all(&[&*binary.left, &*binary.right])
    }

    fn visit_function_call(&mut self, call: &FunctionCall, _: ()) -> Result<(), Infallible> {
        self.visit_all(&call.args.iter().collect::<Vec<_>>())
    }
}

/// The distinct field paths read by `expr`.
pub fn referenced_paths(expr: &LogicalExpression) -> HashSet<FieldPath> {
    let mut collector = PathCollector::default();
    match expr.accept(&mut collector, ()) {
        Ok(()) => collector.paths,
        Err(never) => match never {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(names: &[&str]) -> LogicalExpression {
        FieldPath::compound(names).unwrap().into()
    }

    fn int(i: i64) -> LogicalExpression {
        LogicalExpression::literal(Literal::Int(i), ExpressionPosition::Unknown)
    }

    #[test]
    fn position_in_text() {
        assert_eq!(
            ExpressionPosition::in_text("a +\n  b", 6),
            ExpressionPosition::At { line: 2, column: 3 }
        );
        assert_eq!(
            ExpressionPosition::in_text("abc", 0),
            ExpressionPosition::At { line: 1, column: 1 }
        );
    }

    #[test]
    fn positions_do_not_affect_equality() {
        let a = LogicalExpression::literal(Literal::Int(1), ExpressionPosition::Unknown);
        let b = LogicalExpression::literal(
            Literal::Int(1),
            ExpressionPosition::At { line: 3, column: 9 },
        );
        assert_eq!(a, b);
    }

    #[test]
    fn children() {
        let expr = LogicalExpression::binary(
            path(&["a"]),
            BinaryOperator::Add,
            int(1),
            ExpressionPosition::Unknown,
        );
        assert_eq!(expr.children(), vec![&path(&["a"]), &int(1)]);
        assert!(path(&["a", "b"]).children().is_empty());
    }

    #[test]
    fn narrowing() {
        assert!(path(&["a"]).into_field_path().is_ok());
        let not_a_path = int(1).into_field_path().unwrap_err();
        assert_eq!(not_a_path.kind_name(), "literal");
    }

    #[test]
    fn collect_referenced_paths() {
        let expr = LogicalExpression::function_call(
            "concat",
            vec![
                path(&["a", "b"]),
                LogicalExpression::unary(
                    UnaryOperator::Negate,
                    path(&["c"]),
                    ExpressionPosition::Unknown,
                ),
                path(&["a", "b"]),
            ],
            ExpressionPosition::Unknown,
        );
        let paths = referenced_paths(&expr);
        assert_eq!(paths.len(), 2);
        assert!(paths.contains(&FieldPath::compound(&["a", "b"]).unwrap()));
        assert!(paths.contains(&FieldPath::simple("c").unwrap()));
    }
}
