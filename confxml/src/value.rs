//! The document model produced by the parser.
use crate::parser::{ErrorKind, Parse, Parser, Result, Separator};
use crate::printer::{Print, Printer};
use proptest::arbitrary::Arbitrary;
use smol_str::SmolStr;

/// Whether `str` matches `[a-zA-Z_][a-zA-Z0-9_]*`.
pub fn is_identifier(str: &str) -> bool {
    let mut chars = str.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// A scalar produced by an expression or bound to a constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    Int(i64),
    Text(SmolStr),
}

impl Scalar {
    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            Scalar::Int(_) => "integer",
            Scalar::Text(_) => "text",
        }
    }
}

/// A configuration value represented as a recursive enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Text(SmolStr),
    Seq(Vec<Value>),
    Map(Map),
}

impl From<Scalar> for Value {
    fn from(value: Scalar) -> Self {
        match value {
            Scalar::Int(int) => Value::Int(int),
            Scalar::Text(text) => Value::Text(text),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.into())
    }
}

impl From<Map> for Value {
    fn from(value: Map) -> Self {
        Self::Map(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::Seq(value)
    }
}

/// Dictionary entries in insertion order.
///
/// Keys are unique. Inserting an existing key replaces the value but keeps the
/// position of the first insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Map {
    entries: Vec<(SmolStr, Value)>,
}

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry, returning the value previously stored under `key`.
    pub fn insert(&mut self, key: impl Into<SmolStr>, value: Value) -> Option<Value> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &SmolStr> {
        self.entries.iter().map(|(key, _)| key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SmolStr, &Value)> {
        self.entries.iter().map(|(key, value)| (key, value))
    }
}

impl<K: Into<SmolStr>> FromIterator<(K, Value)> for Map {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        let mut map = Map::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

/// A parsed configuration: either a top-level dictionary or a top-level array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document {
    Map(Map),
    Seq(Vec<Value>),
}

impl Default for Document {
    fn default() -> Self {
        Document::Map(Map::new())
    }
}

impl Parse for Value {
    fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        let cursor = parser.cursor();

        if cursor.is_empty() {
            return Err(cursor.empty_value());
        }

        if !cursor.is_single() {
            return Err(cursor.unknown_value());
        }

        if cursor.peek_expr() {
            parser.expr(|parser| Ok(Value::from(parser.parse::<Scalar>()?)))
        } else if cursor.int().is_some() {
            Ok(Value::Int(parser.int()?))
        } else if cursor.string().is_some() {
            Ok(Value::Text(parser.string()?.clone()))
        } else if cursor.peek_seq() {
            parser.seq(|parser| Ok(Value::Seq(parser.parse()?)))
        } else if cursor.peek_map() {
            parser.map(|parser| Ok(Value::Map(parser.parse()?)))
        } else if cursor.ident().is_some() {
            Ok(Value::from(parser.constant()?))
        } else {
            Err(cursor.unknown_value())
        }
    }
}

/// Array items, separated by top-level commas. Blank items are skipped.
impl Parse for Vec<Value> {
    fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        let mut items = Vec::new();

        while !parser.is_empty() {
            let (item, _) = parser.segment(Separator::Comma, |parser| {
                if parser.is_empty() {
                    Ok(None)
                } else {
                    parser.parse::<Value>().map(Some)
                }
            })?;
            items.extend(item);
        }

        Ok(items)
    }
}

/// Dictionary entries of the form `key: value`, separated by top-level commas.
impl Parse for Map {
    fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        let mut map = Map::new();

        loop {
            while parser.cursor().separator(Separator::Comma).is_some() {
                parser.skip();
            }

            if parser.is_empty() {
                break;
            }

            let (key, found) = parser.segment(Separator::Colon, |parser| {
                let cursor = parser.cursor();
                match cursor.ident() {
                    Some((key, rest)) if rest.is_empty() => {
                        parser.skip();
                        Ok(key.clone())
                    }
                    _ => Err(cursor.error(
                        ErrorKind::InvalidKeyName,
                        format!("Invalid key name: {}", cursor.text()),
                    )),
                }
            })?;

            if !found {
                return Err(parser.error(
                    ErrorKind::EmptyValue,
                    format!("Missing value for key: {key}"),
                ));
            }

            let (value, _) = parser.segment(Separator::Comma, |parser| parser.parse::<Value>())?;
            if map.insert(key.clone(), value).is_some() {
                log::debug!("duplicate key `{key}` replaces the earlier value");
            }
        }

        Ok(map)
    }
}

impl Parse for Document {
    fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        let cursor = parser.cursor();

        let document = if cursor.is_empty() {
            Document::default()
        } else if cursor.peek_map() {
            Document::Map(parser.map(|parser| parser.parse())?)
        } else if cursor.peek_seq() {
            Document::Seq(parser.seq(|parser| parser.parse())?)
        } else {
            return Err(cursor.error(
                ErrorKind::InvalidRoot,
                format!("Expected `$[` or `{{` at top level: {}", cursor.text()),
            ));
        };

        if !parser.is_empty() {
            return Err(parser.error(
                ErrorKind::TrailingInput,
                format!("Unexpected input after document: {}", parser.text()),
            ));
        }

        Ok(document)
    }
}

impl Print for Value {
    fn print<P: Printer>(&self, printer: &mut P) -> std::result::Result<(), P::Error> {
        match self {
            Value::Int(int) => printer.int(*int),
            Value::Text(text) => printer.text(text),
            Value::Seq(items) => printer.seq(|printer| printer.print(items)),
            Value::Map(map) => printer.print(map),
        }
    }
}

impl Print for Map {
    fn print<P: Printer>(&self, printer: &mut P) -> std::result::Result<(), P::Error> {
        printer.map(|printer| {
            for (key, value) in self.iter() {
                printer.entry(key, |printer| printer.print(value))?;
            }
            Ok(())
        })
    }
}

impl Print for Document {
    fn print<P: Printer>(&self, printer: &mut P) -> std::result::Result<(), P::Error> {
        match self {
            Document::Map(map) => printer.print(map),
            Document::Seq(items) => printer.seq(|printer| printer.print(items)),
        }
    }
}

impl Arbitrary for Value {
    type Parameters = ();
    type Strategy = proptest::strategy::BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        use proptest::prelude::*;

        // Text is limited to what a `q(...)` literal can carry on a single line.
        let leaf = prop_oneof![
            any::<i64>().prop_map(Value::Int),
            "[a-zA-Z0-9 ,.:;=!?_{}$|+-]{0,16}".prop_map(|text| Value::Text(text.into())),
        ];
        leaf.prop_recursive(6, 128, 8, |inner| {
            proptest::prop_oneof![
                proptest::collection::vec(inner.clone(), 0..8).prop_map(Value::Seq),
                proptest::collection::vec(("[a-zA-Z_][a-zA-Z0-9_]{0,8}", inner), 0..8)
                    .prop_map(|entries| Value::Map(entries.into_iter().collect()))
            ]
        })
        .boxed()
    }
}
