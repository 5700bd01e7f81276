use std::fmt::Display;

use logos::{Lexer, Logos};
use smol_str::SmolStr;

use crate::parser::{ErrorKind, ParseBuffer, ParseError, Span, Token};

#[derive(Debug, Clone, PartialEq, Logos)]
#[logos(skip r"[ \t\r\n\f]+")]
pub(crate) enum LexerToken {
    #[token("{")]
    OpenSeq,
    #[token("}")]
    CloseSeq,
    #[token("$[")]
    OpenMap,
    #[token("]")]
    CloseMap,
    #[token("(")]
    OpenGroup,
    #[token(")")]
    CloseGroup,
    #[token("|")]
    Pipe,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token("+")]
    Plus,
    #[regex(r"-?[0-9]+")]
    Int,
    // The closing parenthesis is optional so that an unterminated string is
    // reported as such instead of as a stray `q` followed by a group.
    #[regex(r"q\([^)]*\)?")]
    String,
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
}

/// Kind of a bracketed group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Delimiter {
    Seq,
    Map,
    Group,
    Expr,
}

impl Delimiter {
    fn closer(self) -> &'static str {
        match self {
            Delimiter::Seq => "}",
            Delimiter::Map => "]",
            Delimiter::Group => ")",
            Delimiter::Expr => "|",
        }
    }

    fn token(self, size: usize) -> Token {
        match self {
            Delimiter::Seq => Token::Seq(size),
            Delimiter::Map => Token::Map(size),
            Delimiter::Group => Token::Group(size),
            Delimiter::Expr => Token::Expr(size),
        }
    }
}

impl Display for Delimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Delimiter::Seq => write!(f, "array"),
            Delimiter::Map => write!(f, "dictionary"),
            Delimiter::Group => write!(f, "group"),
            Delimiter::Expr => write!(f, "expression"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LexError {
    #[error("Unclosed {1}")]
    Unclosed(Span, Delimiter),
    #[error("Unclosed string")]
    UnclosedString(Span),
    #[error("Mismatched delimiter, expected `{}`", .1.closer())]
    Mismatched(Span, Delimiter),
    #[error("Unexpected delimiter")]
    UnexpectedClose(Span),
    #[error("Integer out of range")]
    Overflow(Span),
    #[error("Nesting deeper than {1} levels")]
    TooDeep(Span, usize),
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::Unclosed(span, _) => span.clone(),
            LexError::UnclosedString(span) => span.clone(),
            LexError::Mismatched(span, _) => span.clone(),
            LexError::UnexpectedClose(span) => span.clone(),
            LexError::Overflow(span) => span.clone(),
            LexError::TooDeep(span, _) => span.clone(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LexError::Unclosed(..) | LexError::UnclosedString(_) => ErrorKind::UnclosedLiteral,
            LexError::Mismatched(..) | LexError::UnexpectedClose(_) => {
                ErrorKind::MismatchedDelimiter
            }
            LexError::Overflow(_) => ErrorKind::IntegerOverflow,
            LexError::TooDeep(..) => ErrorKind::TooDeep,
        }
    }

    /// Converts into a [`ParseError`] whose message quotes the offending source text.
    pub fn into_parse_error(self, source: &str) -> ParseError {
        let span = self.span();
        let text = source.get(span.clone()).unwrap_or_default();
        ParseError::new(self.kind(), format!("{self}: {text}"), span)
    }
}

/// Whether the next token can begin the contents of an expression.
fn starts_operand(lexer: &Lexer<'_, LexerToken>) -> bool {
    match lexer.clone().next() {
        None => false,
        Some(token) => !matches!(
            token,
            Ok(LexerToken::CloseSeq
                | LexerToken::CloseMap
                | LexerToken::CloseGroup
                | LexerToken::Comma
                | LexerToken::Colon)
        ),
    }
}

pub fn lex(str: &str, max_depth: usize) -> Result<ParseBuffer<'_>, LexError> {
    let mut lexer = LexerToken::lexer(str);
    let mut tokens = Vec::new();
    let mut spans: Vec<Span> = Vec::new();
    let mut open_stack: Vec<(usize, Delimiter)> = Vec::new();

    while let Some(token) = lexer.next() {
        let span = lexer.span();

        let token = match token {
            Ok(token) => token,
            Err(()) => {
                // Stray characters are kept so that the parser can report them in context.
                tokens.push(Token::Unknown);
                spans.push(span);
                continue;
            }
        };

        let open = match token {
            LexerToken::OpenSeq => Some(Delimiter::Seq),
            LexerToken::OpenMap => Some(Delimiter::Map),
            LexerToken::OpenGroup => Some(Delimiter::Group),
            LexerToken::Pipe => match open_stack.last() {
                // `||x||`: a pipe right after an expression opener nests, unless
                // it closes an empty `||`.
                Some(&(pos, Delimiter::Expr)) => {
                    let nested = pos + 1 == tokens.len() && starts_operand(&lexer);
                    nested.then_some(Delimiter::Expr)
                }
                _ => Some(Delimiter::Expr),
            },
            _ => None,
        };

        if let Some(delimiter) = open {
            if open_stack.len() >= max_depth {
                return Err(LexError::TooDeep(span, max_depth));
            }
            open_stack.push((tokens.len(), delimiter));
            tokens.push(delimiter.token(usize::MAX));
            spans.push(span);
            continue;
        }

        let close = match token {
            LexerToken::CloseSeq => Some(Delimiter::Seq),
            LexerToken::CloseMap => Some(Delimiter::Map),
            LexerToken::CloseGroup => Some(Delimiter::Group),
            LexerToken::Pipe => Some(Delimiter::Expr),
            _ => None,
        };

        if let Some(delimiter) = close {
            let Some((pos, expected)) = open_stack.pop() else {
                return Err(LexError::UnexpectedClose(span));
            };

            if expected != delimiter {
                return Err(LexError::Mismatched(span, expected));
            }

            tokens[pos] = expected.token(tokens.len() - pos - 1);
            spans[pos].end = span.end;
            continue;
        }

        match token {
            LexerToken::Comma => tokens.push(Token::Comma),
            LexerToken::Colon => tokens.push(Token::Colon),
            LexerToken::Plus => tokens.push(Token::Plus),
            LexerToken::Int => {
                let int = lexer
                    .slice()
                    .parse()
                    .map_err(|_| LexError::Overflow(span.clone()))?;
                tokens.push(Token::Int(int));
            }
            LexerToken::String => {
                let slice = lexer.slice();
                if slice.len() < 3 || !slice.ends_with(')') {
                    return Err(LexError::UnclosedString(span.start..str.len()));
                }
                tokens.push(Token::String(slice[2..slice.len() - 1].into()));
            }
            LexerToken::Ident => tokens.push(Token::Ident(SmolStr::from(lexer.slice()))),
            _ => unreachable!("delimiters are handled above"),
        }
        spans.push(span);
    }

    if let Some((pos, delimiter)) = open_stack.pop() {
        return Err(LexError::Unclosed(spans[pos].start..str.len(), delimiter));
    }

    Ok(ParseBuffer {
        source: str,
        tokens,
        spans,
    })
}
