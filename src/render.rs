//! Canonical text for expressions.
//!
//! Field names are always backtick quoted and binary expressions are
//! always parenthesised, so the text parses back to an equal tree
//! regardless of operator precedence or what characters a name holds.
use std::fmt::{self, Write};

use crate::{
    expression::{
        BinaryExpression, ExprVisitor, FunctionCall, Literal, LiteralExpression,
        LogicalExpression, UnaryExpression,
    },
    path::FieldPath,
    segment::Step,
};

/// An [`ExprVisitor`] writing canonical text to any [`fmt::Write`].
pub struct ExpressionStringBuilder<'a> {
    out: &'a mut dyn Write,
}

impl<'a> ExpressionStringBuilder<'a> {
    pub fn new(out: &'a mut dyn Write) -> Self {
        ExpressionStringBuilder { out }
    }

    /// Render `expr` to a new string.
    pub fn render(expr: &LogicalExpression) -> String {
        expr.to_string()
    }

    fn write_args(&mut self, args: &[LogicalExpression]) -> fmt::Result {
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.out.write_str(", ")?;
            }
            arg.accept(self, ())?;
        }
        Ok(())
    }
}

impl ExprVisitor<()> for ExpressionStringBuilder<'_> {
    type Output = ();
    type Error = fmt::Error;

    fn visit_field_path(&mut self, path: &FieldPath, _: ()) -> fmt::Result {
        write_path(&mut *self.out, path)
    }

    fn visit_literal(&mut self, literal: &LiteralExpression, _: ()) -> fmt::Result {
        match &literal.value {
            Literal::Null => self.out.write_str("null"),
            Literal::Boolean(b) => write!(self.out, "{b}"),
            Literal::Int(i) => write!(self.out, "{i}"),
            // Debug formatting keeps a fractional part or exponent
            Literal::Float(f) => write!(self.out, "{f:?}"),
            Literal::String(s) => {
                self.out.write_char('\'')?;
                for ch in s.chars() {
                    match ch {
                        '\'' => self.out.write_str("\\'")?,
                        '\\' => self.out.write_str("\\\\")?,
                        '\n' => self.out.write_str("\\n")?,
                        '\r' => self.out.write_str("\\r")?,
                        '\t' => self.out.write_str("\\t")?,
                        c => self.out.write_char(c)?,
                    }
                }
                self.out.write_char('\'')
            }
        }
    }

    fn visit_unary(&mut self, unary: &UnaryExpression, _: ()) -> fmt::Result {
        write!(self.out, "{}", unary.operator)?;
        if let LogicalExpression::Binary(_) = *unary.operand {
            unary.operand.accept(self, ())
        } else {
            // `-(1)` must not read back as the literal -1
            self.out.write_char('(')?;
            unary.operand.accept(self, ())?;
            self.out.write_char(')')
        }
    }

    fn visit_binary(&mut self, binary: &BinaryExpression, _: ()) -> fmt::Result {
        self.out.write_char('(')?;
        binary.left.accept(self, ())?;
        write!(self.out, " {} ", binary.operator)?;
        binary.right.accept(self, ())?;
        self.out.write_char(')')
    }

    fn visit_function_call(&mut self, call: &FunctionCall, _: ()) -> fmt::Result {
        write!(self.out, "{}(", call.name)?;
        self.write_args(&call.args)?;
        self.out.write_char(')')
    }
}

/// Write the canonical form of `path`, e.g. `` `a`.`b`[2] ``.
pub fn write_path<W: Write + ?Sized>(out: &mut W, path: &FieldPath) -> fmt::Result {
    for (i, segment) in path.segments().enumerate() {
        match segment.step() {
            Step::Name(name) => {
                if i > 0 {
                    out.write_char('.')?;
                }
                out.write_char('`')?;
                for ch in name.chars() {
                    if ch == '`' || ch == '\\' {
                        out.write_char('\\')?;
                    }
                    out.write_char(ch)?;
                }
                out.write_char('`')?;
            }
            Step::Index(index) => write!(out, "[{index}]")?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{BinaryOperator, ExpressionPosition, UnaryOperator};

    const NOWHERE: ExpressionPosition = ExpressionPosition::Unknown;

    fn path(names: &[&str]) -> LogicalExpression {
        FieldPath::compound(names).unwrap().into()
    }

    fn lit(value: Literal) -> LogicalExpression {
        LogicalExpression::literal(value, NOWHERE)
    }

    #[test]
    fn path_with_index() {
        let p = FieldPath::compound(["a", "b"])
            .and_then(|p| p.with_child_index(3))
            .and_then(|p| p.with_child_field("c"))
            .unwrap();
        assert_eq!(p.to_string(), "`a`.`b`[3].`c`");
    }

    #[test]
    fn escaped_names() {
        assert_eq!(path(&[r"a\b"]).to_string(), r"`a\\b`");
        assert_eq!(path(&["x`y"]).to_string(), r"`x\`y`");
    }

    #[test]
    fn literals() {
        assert_eq!(lit(Literal::Null).to_string(), "null");
        assert_eq!(lit(Literal::Boolean(true)).to_string(), "true");
        assert_eq!(lit(Literal::Int(-7)).to_string(), "-7");
        assert_eq!(lit(Literal::Float(1.0)).to_string(), "1.0");
        assert_eq!(
            lit(Literal::String(String::from("it's\n"))).to_string(),
            r"'it\'s\n'"
        );
    }

    #[test]
    fn operators() {
        let expr = LogicalExpression::binary(
            path(&["a"]),
            BinaryOperator::Add,
            LogicalExpression::binary(
                lit(Literal::Int(2)),
                BinaryOperator::Multiply,
                path(&["b", "c"]),
                NOWHERE,
            ),
            NOWHERE,
        );
        assert_eq!(expr.to_string(), "(`a` + (2 * `b`.`c`))");

        let negated =
            LogicalExpression::unary(UnaryOperator::Negate, lit(Literal::Int(1)), NOWHERE);
        assert_eq!(negated.to_string(), "-(1)");

        let not = LogicalExpression::unary(UnaryOperator::Not, expr, NOWHERE);
        assert_eq!(not.to_string(), "!(`a` + (2 * `b`.`c`))");
    }

    #[test]
    fn function_call() {
        let call = LogicalExpression::function_call(
            "concat",
            vec![path(&["a"]), lit(Literal::String(String::from("x")))],
            NOWHERE,
        );
        assert_eq!(ExpressionStringBuilder::render(&call), "concat(`a`, 'x')");
    }
}
