//! Field paths and a small expression language for addressing nested record
//! fields, with an injectable codec for storing paths as text.
//!
//! ## Field paths
//!
//! A [`FieldPath`] is an immutable chain of [`PathSegment`]s, each either a
//! field name or an array index. Paths compare and hash by their segments
//! alone, so they work as map keys wherever they came from.
//!
//! ```
//! use field_path::{errors::PathError, FieldPath};
//!
//! fn main() -> Result<(), PathError> {
//!     let path = FieldPath::compound(["customer", "address"])?
//!         .with_child_index(0)?
//!         .with_child_field("zip code")?;
//!
//!     assert_eq!(path.to_canonical_text(), "`customer`.`address`[0].`zip code`");
//!     assert_eq!(path.as_unescaped_dotted_string()?, "customer.address[0].zip code");
//!     Ok(())
//! }
//! ```
//!
//! ## Expressions
//!
//! [`Parser::parse`] accepts the full expression language: literals, unary and
//! binary operators, function calls and field paths. Function names are
//! checked against the parser's [`Env`].
//!
//! ```
//! use field_path::{errors::ExpressionError, referenced_paths, FieldPath, Parser};
//!
//! fn main() -> Result<(), ExpressionError> {
//!     let expr = Parser::default().parse("lower(a.b) == 'x' && c[1] > -2")?;
//!
//!     println!("{}", expr);
//!     assert_eq!(referenced_paths(&expr).len(), 2);
//!     Ok(())
//! }
//! ```
//!
//! An expression is displayed in its canonical form when printed.
//!
//! ```text
//! ((lower(`a`.`b`) == 'x') && (`c`[1] > -2))
//! ```
//!
//! ## Storing paths as text
//!
//! A [`PathCodec`] turns paths into canonical text and back, rejecting
//! anything that is not a bare path. See [`binding`] for using a codec with
//! serde.
//!
//! ```
//! use field_path::{PathCodec, errors::PathError};
//!
//! let codec = PathCodec::default();
//! let path = codec.decode("a.b[1]").unwrap();
//! assert_eq!(codec.decode(&codec.encode(&path)).unwrap(), path);
//!
//! assert!(matches!(codec.decode("1 + 1"), Err(PathError::MalformedPath(_))));
//! ```
pub mod binding;
pub mod codec;
pub mod env;
pub mod errors;
pub mod expression;
pub mod lexer;
pub mod parser;
pub mod path;
pub mod render;
pub mod segment;
mod token;

pub use binding::PathSeed;
pub use codec::PathCodec;
pub use env::Env;
pub use env::FunctionSignature;
pub use errors::ExpressionError;
pub use errors::ExpressionErrorType;
pub use errors::PathError;
pub use expression::referenced_paths;
pub use expression::ExprVisitor;
pub use expression::ExpressionPosition;
pub use expression::LogicalExpression;
pub use parser::Parser;
pub use path::FieldPath;
pub use render::ExpressionStringBuilder;
pub use segment::PathSegment;
pub use segment::Step;
