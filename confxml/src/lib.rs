//! A small configuration language with constants and expressions, rendered as XML.
//!
//! # Syntax
//!
//! - **Comments** begin with a `\` and extend to the end of the line.
//!
//! - **Constants** are declared with `let NAME = EXPR;` and can be used by any
//!   later declaration and by the document itself. Names match
//!   `[a-zA-Z_][a-zA-Z0-9_]*`. Declaring a name again replaces its value.
//!
//! - **Integers** are written as decimal digits with an optional leading `-`.
//!
//! - **Strings** are written as `q(...)`. The text between the parentheses is
//!   taken verbatim. There is no escaping, so a string cannot contain `)`.
//!
//! - **Arrays** are written as `{a, b, c}`. Blank items are ignored.
//!
//! - **Dictionaries** are written as `$[key: value, ...]`. Keys follow the same
//!   rules as constant names and keep their order.
//!
//! - **Expressions** are written between `|` and evaluate to an integer or a
//!   string. An expression is a single value, a constant, `abs(x)`, or `x + y`
//!   where the operands are integers, strings or constant names.
//!
//! A document is a single dictionary or array. Empty input is an empty dictionary.
//!
//! ```text
//! \ database defaults
//! let PORT = 5432;
//! let OFFSET = -10;
//! $[
//!   db: $[host: q(localhost), port: |PORT + 1|],
//!   features: {q(auth), q(logging)},
//!   shift: |abs(OFFSET)|
//! ]
//! ```

pub mod constants;
pub(crate) mod escape;
pub mod eval;
pub(crate) mod lexer;
pub mod normalize;
pub mod parser;
pub mod printer;
pub mod value;
pub mod xml;

pub use constants::Constants;
pub use parser::{from_str, from_str_with_options, ErrorKind, ParseError, ParseOptions};
pub use printer::{to_string, to_string_pretty};
pub use value::{Document, Map, Scalar, Value};
