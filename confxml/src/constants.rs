//! Constant declarations of the form `let NAME = EXPR;`.
use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use smol_str::SmolStr;

use crate::eval::evaluate;
use crate::parser::{ParseOptions, Result};
use crate::value::Scalar;

/// A declaration runs up to the first `;`, so expressions cannot contain one.
static DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\blet\s+([a-zA-Z_][a-zA-Z0-9_]*)\s*=\s*(.+?);").unwrap()
});

/// The start of a declaration. Any later `;` completes it.
static DECLARATION_HEAD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\blet\s+[a-zA-Z_][a-zA-Z0-9_]*\s*=").unwrap());

/// Whether `text` contains something that would be read as a declaration.
pub(crate) fn contains_declaration(text: &str) -> bool {
    DECLARATION_HEAD.is_match(text)
}

/// Named scalars bound by `let` declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Constants {
    values: HashMap<SmolStr, Scalar>,
}

impl Constants {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Scalar> {
        self.values.get(name)
    }

    /// Binds `name`, returning the value it was previously bound to.
    pub fn insert(&mut self, name: impl Into<SmolStr>, value: Scalar) -> Option<Scalar> {
        self.values.insert(name.into(), value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Evaluates all declarations in `text` from left to right and removes them.
///
/// Each expression sees the constants declared before it. Returns the constant
/// table and the trimmed text that remains.
pub fn extract(text: &str, options: &ParseOptions) -> Result<(Constants, String)> {
    let mut constants = Constants::new();

    for captures in DECLARATION.captures_iter(text) {
        let (Some(name), Some(expr)) = (captures.get(1), captures.get(2)) else {
            continue;
        };

        let value = evaluate(expr.as_str(), &constants, options)
            .map_err(|err| err.offset(expr.start()))?;
        log::debug!("let {} = {value:?}", name.as_str());

        if constants.insert(name.as_str(), value).is_some() {
            log::debug!("constant {} redefined", name.as_str());
        }
    }

    let residual = DECLARATION.replace_all(text, "");
    Ok((constants, residual.trim().to_string()))
}
