//! Parse documents from configuration text.
use crate::constants::{self, Constants};
use crate::lexer::lex;
use crate::normalize::normalize;
use crate::value::{Document, Scalar};
use delegate::delegate;
use smol_str::SmolStr;
use std::fmt::Display;
use std::ops::Range;

#[derive(Debug, Clone)]
pub(crate) enum Token {
    Seq(usize),
    Map(usize),
    Group(usize),
    Expr(usize),
    Comma,
    Colon,
    Plus,
    Int(i64),
    String(SmolStr),
    Ident(SmolStr),
    Unknown,
}

impl Token {
    /// Number of tokens taken up by the tree that starts with this token.
    fn tree_len(&self) -> usize {
        match self {
            Token::Seq(size) | Token::Map(size) | Token::Group(size) | Token::Expr(size) => {
                size + 1
            }
            _ => 1,
        }
    }
}

/// Top-level punctuation that separates the parts of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    Comma,
    Colon,
    Plus,
}

impl Separator {
    fn matches(self, token: &Token) -> bool {
        matches!(
            (self, token),
            (Separator::Comma, Token::Comma)
                | (Separator::Colon, Token::Colon)
                | (Separator::Plus, Token::Plus)
        )
    }
}

/// Limits applied while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum nesting of arrays, dictionaries, groups and expressions.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { max_depth: 128 }
    }
}

/// A lexed representation of configuration text that can be parsed.
#[derive(Debug, Clone)]
pub struct ParseBuffer<'a> {
    pub(crate) source: &'a str,
    pub(crate) tokens: Vec<Token>,
    pub(crate) spans: Vec<Span>,
}

impl<'a> ParseBuffer<'a> {
    pub fn new(str: &'a str, options: &ParseOptions) -> Result<Self> {
        lex(str, options.max_depth).map_err(|err| err.into_parse_error(str))
    }

    #[inline]
    pub fn cursor(&'a self) -> Cursor<'a> {
        Cursor {
            buffer: self,
            index: 0,
            end_index: self.tokens.len(),
            parent: None,
        }
    }

    #[inline]
    pub fn parser(&'a self, constants: &'a Constants) -> Parser<'a> {
        Parser::new(self.cursor(), constants)
    }
}

/// A parser that is stepping through a [`ParseBuffer`].
///
/// Bare identifiers are resolved against the constant table the parser was created with.
#[derive(Clone)]
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    constants: &'a Constants,
}

impl<'a> Parser<'a> {
    #[inline]
    pub fn new(cursor: Cursor<'a>, constants: &'a Constants) -> Self {
        Self { cursor, constants }
    }

    #[inline]
    pub fn parse<T>(&mut self) -> Result<T>
    where
        T: Parse,
    {
        T::parse(self)
    }

    pub fn ident(&mut self) -> Result<&'a SmolStr> {
        self.step(|cursor| {
            cursor
                .ident()
                .ok_or_else(|| cursor.unknown_value())
        })
    }

    pub fn int(&mut self) -> Result<i64> {
        self.step(|cursor| cursor.int().ok_or_else(|| cursor.unknown_value()))
    }

    pub fn string(&mut self) -> Result<&'a SmolStr> {
        self.step(|cursor| {
            cursor
                .string()
                .ok_or_else(|| cursor.unknown_value())
        })
    }

    /// Looks up the identifier under the cursor in the constant table.
    pub fn constant(&mut self) -> Result<Scalar> {
        let cursor = self.cursor;
        let name = self.ident()?;
        self.constants.get(name).cloned().ok_or_else(|| {
            cursor.error(
                ErrorKind::UndefinedReference,
                format!("Undefined constant: {name}"),
            )
        })
    }

    pub fn seq<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        let (inner, after) = self.cursor.seq().ok_or_else(|| self.unknown_value())?;
        self.enter(inner, after, f)
    }

    pub fn map<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        let (inner, after) = self.cursor.map().ok_or_else(|| self.unknown_value())?;
        self.enter(inner, after, f)
    }

    pub fn group<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        let (inner, after) = self.cursor.group().ok_or_else(|| self.unknown_value())?;
        self.enter(inner, after, f)
    }

    pub fn expr<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        let (inner, after) = self.cursor.expr().ok_or_else(|| self.unknown_value())?;
        self.enter(inner, after, f)
    }

    /// Parses the tokens up to the next top-level `separator` with `f` and moves
    /// past the separator. Without a separator the segment runs to the end.
    ///
    /// Returns whether a separator was found along with the result.
    pub fn segment<T, F>(&mut self, separator: Separator, f: F) -> Result<(T, bool)>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        let (inner, after, found) = self.cursor.split_off(separator);
        let result = self.enter(inner, after, f)?;
        Ok((result, found))
    }

    fn enter<T, F>(&mut self, inner: Cursor<'a>, after: Cursor<'a>, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        self.cursor = inner;
        let result = f(self)?;

        if !self.cursor.is_empty() {
            return Err(inner.unknown_value());
        }

        self.cursor = after;
        Ok(result)
    }

    #[inline]
    pub fn step<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(Cursor<'a>) -> Result<(T, Cursor<'a>)>,
    {
        let (result, cursor) = f(self.cursor)?;
        self.cursor = cursor;
        Ok(result)
    }

    /// Skips a single token tree.
    pub fn skip(&mut self) {
        self.cursor = self.cursor.skip();
    }

    #[inline]
    pub fn cursor(&self) -> Cursor<'a> {
        self.cursor
    }

    delegate! {
        to self.cursor {
            pub fn is_empty(&self) -> bool;
            pub fn is_single(&self) -> bool;
            pub fn span(&self) -> Span;
            pub fn text(&self) -> &'a str;
            pub fn error(&self, kind: ErrorKind, message: impl Display) -> ParseError;
            pub fn empty_value(&self) -> ParseError;
            pub fn unknown_value(&self) -> ParseError;
        }
    }
}

/// A position into a [`ParseBuffer`].
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    buffer: &'a ParseBuffer<'a>,
    index: usize,
    end_index: usize,
    parent: Option<usize>,
}

impl<'a> Cursor<'a> {
    pub fn error(self, kind: ErrorKind, message: impl Display) -> ParseError {
        ParseError::new(kind, message, self.span())
    }

    pub fn empty_value(self) -> ParseError {
        self.error(ErrorKind::EmptyValue, "Empty value")
    }

    pub fn unknown_value(self) -> ParseError {
        self.error(
            ErrorKind::UnknownValueForm,
            format!("Unknown value: {}", self.text()),
        )
    }

    fn advance(self, size: usize) -> Self {
        Self {
            buffer: self.buffer,
            index: self.index + size,
            end_index: self.end_index,
            parent: self.parent,
        }
    }

    /// Moves past the token tree under the cursor.
    pub fn skip(self) -> Self {
        match self.get() {
            Some(token) => self.advance(token.tree_len()),
            None => self,
        }
    }

    pub fn ident(self) -> Option<(&'a SmolStr, Self)> {
        match self.get()? {
            Token::Ident(ident) => Some((ident, self.advance(1))),
            _ => None,
        }
    }

    pub fn int(self) -> Option<(i64, Self)> {
        match self.get()? {
            Token::Int(int) => Some((*int, self.advance(1))),
            _ => None,
        }
    }

    pub fn string(self) -> Option<(&'a SmolStr, Self)> {
        match self.get()? {
            Token::String(string) => Some((string, self.advance(1))),
            _ => None,
        }
    }

    pub fn seq(self) -> Option<(Self, Self)> {
        match self.get()? {
            Token::Seq(size) => Some(self.split(1, *size)),
            _ => None,
        }
    }

    pub fn map(self) -> Option<(Self, Self)> {
        match self.get()? {
            Token::Map(size) => Some(self.split(1, *size)),
            _ => None,
        }
    }

    pub fn group(self) -> Option<(Self, Self)> {
        match self.get()? {
            Token::Group(size) => Some(self.split(1, *size)),
            _ => None,
        }
    }

    pub fn expr(self) -> Option<(Self, Self)> {
        match self.get()? {
            Token::Expr(size) => Some(self.split(1, *size)),
            _ => None,
        }
    }

    /// Consumes a top-level separator token.
    pub fn separator(self, separator: Separator) -> Option<Self> {
        match self.get()? {
            token if separator.matches(token) => Some(self.advance(1)),
            _ => None,
        }
    }

    fn split(self, skip: usize, size: usize) -> (Self, Self) {
        let left = Cursor {
            buffer: self.buffer,
            index: self.index + skip,
            end_index: self.index + size + skip,
            parent: Some(self.index),
        };

        let right = Cursor {
            buffer: self.buffer,
            index: self.index + skip + size,
            end_index: self.end_index,
            parent: self.parent,
        };

        (left, right)
    }

    /// Splits at the next top-level `separator`.
    ///
    /// Returns the tokens before the separator, the cursor after it and whether
    /// the separator was found. Separators nested inside groups are skipped.
    pub fn split_off(self, separator: Separator) -> (Self, Self, bool) {
        let mut rest = self;

        while let Some(token) = rest.get() {
            if separator.matches(token) {
                let before = Cursor {
                    end_index: rest.index,
                    ..self
                };
                return (before, rest.advance(1), true);
            }
            rest = rest.skip();
        }

        (self, rest, false)
    }

    /// Whether `separator` occurs at the top level of the remaining tokens.
    pub fn contains(self, separator: Separator) -> bool {
        self.split_off(separator).2
    }

    pub fn peek_seq(self) -> bool {
        self.seq().is_some()
    }

    pub fn peek_map(self) -> bool {
        self.map().is_some()
    }

    pub fn peek_group(self) -> bool {
        self.group().is_some()
    }

    pub fn peek_expr(self) -> bool {
        self.expr().is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.index >= self.end_index
    }

    /// Whether the remaining tokens form exactly one token tree.
    pub fn is_single(&self) -> bool {
        !self.is_empty() && self.skip().is_empty()
    }

    #[inline]
    fn get(&self) -> Option<&'a Token> {
        if self.is_empty() {
            None
        } else {
            Some(&self.buffer.tokens[self.index])
        }
    }

    /// Span of the remaining tokens, or an empty span at the end of the parent.
    pub fn span(&self) -> Span {
        if self.is_empty() {
            let offset = self.parent_span().end;
            return offset..offset;
        }

        let start = self.buffer.spans[self.index].start;
        let mut end = start;
        let mut rest = *self;
        while !rest.is_empty() {
            end = self.buffer.spans[rest.index].end;
            rest = rest.skip();
        }
        start..end
    }

    #[inline]
    pub fn parent_span(&self) -> Span {
        match self.parent {
            Some(parent) => self.buffer.spans[parent].clone(),
            None => 0..self.buffer.source.len(),
        }
    }

    /// Source text of the remaining tokens.
    pub fn text(&self) -> &'a str {
        let source: &'a str = self.buffer.source;
        source.get(self.span()).unwrap_or_default()
    }
}

/// Trait for types that can be parsed from configuration text.
pub trait Parse: Sized {
    fn parse(parser: &mut Parser<'_>) -> Result<Self>;
}

/// Category of a [`ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A value position is blank.
    EmptyValue,
    /// A string, array, dictionary or expression is never closed.
    UnclosedLiteral,
    /// A dictionary key is not an identifier.
    InvalidKeyName,
    /// A name is used before a constant of that name is declared.
    UndefinedReference,
    /// A value matches none of the value forms.
    UnknownValueForm,
    /// `abs` or `+` applied to text.
    TypeMismatch,
    /// A closing delimiter that does not match the innermost open one.
    MismatchedDelimiter,
    /// An integer literal or result outside the 64-bit range.
    IntegerOverflow,
    /// The document is neither a dictionary nor an array.
    InvalidRoot,
    /// Input left over after the top-level value.
    TrailingInput,
    /// Nesting beyond [`ParseOptions::max_depth`].
    TooDeep,
}

/// A parse error.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    kind: ErrorKind,
    message: String,
    span: Span,
}

impl ParseError {
    pub fn new(kind: ErrorKind, message: impl Display, span: Span) -> Self {
        ParseError {
            kind,
            message: message.to_string(),
            span,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Span of the error within the text that was being parsed.
    pub fn span(&self) -> Span {
        self.span.clone()
    }

    /// Shifts the span by `offset` bytes, for errors in text embedded in a larger input.
    pub(crate) fn offset(mut self, offset: usize) -> Self {
        self.span = self.span.start + offset..self.span.end + offset;
        self
    }
}

/// Shorthand for a result specialised to parse errors.
pub type Result<T, E = ParseError> = std::result::Result<T, E>;

/// Span within a string.
pub type Span = Range<usize>;

/// Parse a [`Document`] from configuration text.
pub fn from_str(source: &str) -> Result<Document> {
    from_str_with_options(source, &ParseOptions::default())
}

/// Parse a [`Document`] from configuration text with the given limits.
///
/// Spans of errors in constant declarations refer to the normalized text, all
/// others to the text left after the declarations are removed.
pub fn from_str_with_options(source: &str, options: &ParseOptions) -> Result<Document> {
    let normalized = normalize(source);
    let (constants, residual) = constants::extract(&normalized, options)?;
    log::trace!(
        "parsing document with {} constants: {residual}",
        constants.len()
    );
    let buffer = ParseBuffer::new(&residual, options)?;
    let mut parser = buffer.parser(&constants);
    parser.parse()
}
