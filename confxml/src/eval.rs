//! Evaluation of `|...|` expressions and constant declarations.
//!
//! The grammar is deliberately small:
//!
//! ```text
//! expr := "|" expr "|" | "abs" "(" atom ")" | atom "+" atom | atom
//! atom := integer | q(...) | constant-name
//! ```
//!
//! Chained additions such as `A + B + C` are rejected.
use crate::constants::Constants;
use crate::parser::{ErrorKind, Parse, ParseBuffer, ParseOptions, Parser, Result, Separator};
use crate::value::Scalar;

impl Parse for Scalar {
    fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        let cursor = parser.cursor();

        if cursor.is_empty() {
            return Err(cursor.empty_value());
        }

        if cursor.is_single() && cursor.peek_expr() {
            return parser.expr(|parser| parser.parse());
        }

        if is_abs_call(parser) {
            parser.ident()?;
            let value = parser.group(atom)?;
            return match value {
                Scalar::Int(int) => int.checked_abs().map(Scalar::Int).ok_or_else(|| {
                    cursor.error(
                        ErrorKind::IntegerOverflow,
                        format!("Integer overflow: {}", cursor.text()),
                    )
                }),
                Scalar::Text(_) => Err(cursor.error(
                    ErrorKind::TypeMismatch,
                    format!("Type mismatch: abs of {}", value.type_name()),
                )),
            };
        }

        if cursor.contains(Separator::Plus) {
            let (left, _) = parser.segment(Separator::Plus, atom)?;

            if parser.cursor().contains(Separator::Plus) {
                return Err(cursor.unknown_value());
            }

            let right = atom(parser)?;
            return add(left, right).map_err(|kind| {
                let message = match kind {
                    ErrorKind::IntegerOverflow => format!("Integer overflow: {}", cursor.text()),
                    _ => format!("Type mismatch: {}", cursor.text()),
                };
                cursor.error(kind, message)
            });
        }

        atom(parser)
    }
}

/// `abs` immediately followed by a parenthesized group.
fn is_abs_call(parser: &Parser<'_>) -> bool {
    let cursor = parser.cursor();
    match cursor.ident() {
        Some((name, rest)) => {
            name == "abs"
                && rest.is_single()
                && rest.peek_group()
                && rest.span().start == cursor.span().start + name.len()
        }
        None => false,
    }
}

/// Resolves a single integer, string or constant name.
fn atom(parser: &mut Parser<'_>) -> Result<Scalar> {
    let cursor = parser.cursor();

    if cursor.is_empty() {
        return Err(cursor.empty_value());
    }

    if !cursor.is_single() {
        return Err(cursor.unknown_value());
    }

    if cursor.int().is_some() {
        Ok(Scalar::Int(parser.int()?))
    } else if cursor.string().is_some() {
        Ok(Scalar::Text(parser.string()?.clone()))
    } else if cursor.ident().is_some() {
        parser.constant()
    } else {
        Err(cursor.unknown_value())
    }
}

fn add(left: Scalar, right: Scalar) -> std::result::Result<Scalar, ErrorKind> {
    match (left, right) {
        (Scalar::Int(left), Scalar::Int(right)) => left
            .checked_add(right)
            .map(Scalar::Int)
            .ok_or(ErrorKind::IntegerOverflow),
        _ => Err(ErrorKind::TypeMismatch),
    }
}

/// Evaluates the right-hand side of a constant declaration.
pub fn evaluate(source: &str, constants: &Constants, options: &ParseOptions) -> Result<Scalar> {
    let buffer = ParseBuffer::new(source, options)?;
    let mut parser = buffer.parser(constants);
    let value = parser.parse()?;

    if !parser.is_empty() {
        return Err(parser.unknown_value());
    }

    Ok(value)
}

#[cfg(test)]
mod test {
    use super::evaluate;
    use crate::constants::Constants;
    use crate::parser::{ErrorKind, ParseOptions};
    use crate::value::Scalar;
    use rstest::rstest;

    fn constants() -> Constants {
        let mut constants = Constants::new();
        constants.insert("A", Scalar::Int(10));
        constants.insert("B", Scalar::Int(20));
        constants.insert("NEG", Scalar::Int(-42));
        constants.insert("NAME", Scalar::Text("db".into()));
        constants
    }

    fn eval(source: &str) -> crate::parser::Result<Scalar> {
        evaluate(source, &constants(), &ParseOptions::default())
    }

    #[rstest]
    #[case("42", Scalar::Int(42))]
    #[case("-7", Scalar::Int(-7))]
    #[case("q(hello world)", Scalar::Text("hello world".into()))]
    #[case("NAME", Scalar::Text("db".into()))]
    #[case("|A|", Scalar::Int(10))]
    #[case("A + B", Scalar::Int(30))]
    #[case("|A + B|", Scalar::Int(30))]
    #[case("||A||", Scalar::Int(10))]
    #[case("||abs(NEG)||", Scalar::Int(42))]
    #[case("A + -15", Scalar::Int(-5))]
    #[case("abs(NEG)", Scalar::Int(42))]
    #[case("|abs(-3)|", Scalar::Int(3))]
    #[case("abs(7)", Scalar::Int(7))]
    #[case("abs( NEG )", Scalar::Int(42))]
    #[case("q(a+b)", Scalar::Text("a+b".into()))]
    fn test_evaluate(#[case] source: &str, #[case] expected: Scalar) {
        assert_eq!(expected, eval(source).unwrap());
    }

    #[rstest]
    #[case("", ErrorKind::EmptyValue)]
    #[case("||", ErrorKind::EmptyValue)]
    #[case("A +", ErrorKind::EmptyValue)]
    #[case("UNDEF", ErrorKind::UndefinedReference)]
    #[case("A + UNDEF", ErrorKind::UndefinedReference)]
    #[case("A + B + A", ErrorKind::UnknownValueForm)]
    #[case("{1, 2}", ErrorKind::UnknownValueForm)]
    #[case("abs(A + B)", ErrorKind::UnknownValueForm)]
    #[case("abs(A) + 1", ErrorKind::UnknownValueForm)]
    #[case("abs (NEG)", ErrorKind::UnknownValueForm)]
    #[case("A B", ErrorKind::UnknownValueForm)]
    #[case("abs(NAME)", ErrorKind::TypeMismatch)]
    #[case("NAME + NAME", ErrorKind::TypeMismatch)]
    #[case("A + NAME", ErrorKind::TypeMismatch)]
    #[case("9223372036854775807 + 1", ErrorKind::IntegerOverflow)]
    #[case("abs(-9223372036854775808)", ErrorKind::IntegerOverflow)]
    fn test_evaluate_errors(#[case] source: &str, #[case] kind: ErrorKind) {
        assert_eq!(kind, eval(source).unwrap_err().kind());
    }
}
