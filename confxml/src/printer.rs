//! Print documents back into configuration text.
//!
//! The output contains no constants or expressions: every value is written as
//! the literal it was resolved to, so parsing the output yields an equal document.
mod pretty;
mod simple;
pub use self::pretty::to_string_pretty;
pub use self::simple::to_string;

/// Trait for types that can print configuration text.
pub trait Printer: Sized {
    type Error;

    /// Print an integer literal.
    fn int(&mut self, int: i64) -> Result<(), Self::Error>;

    /// Print a `q(...)` string literal.
    fn text(&mut self, text: &str) -> Result<(), Self::Error>;

    /// Print an array given a function that prints the items.
    fn seq<F>(&mut self, f: F) -> Result<(), Self::Error>
    where
        F: FnOnce(&mut Self) -> Result<(), Self::Error>;

    /// Print a dictionary given a function that prints the entries.
    fn map<F>(&mut self, f: F) -> Result<(), Self::Error>
    where
        F: FnOnce(&mut Self) -> Result<(), Self::Error>;

    /// Print a `key: value` dictionary entry given a function that prints the value.
    fn entry<F>(&mut self, key: &str, f: F) -> Result<(), Self::Error>
    where
        F: FnOnce(&mut Self) -> Result<(), Self::Error>;

    /// Print a printable value.
    fn print(&mut self, value: impl Print) -> Result<(), Self::Error> {
        value.print(self)
    }
}

/// Trait for types that can be printed as configuration text.
pub trait Print {
    fn print<P: Printer>(&self, printer: &mut P) -> Result<(), P::Error>;
}

impl<T: Print + ?Sized> Print for &T {
    #[inline]
    fn print<P: Printer>(&self, printer: &mut P) -> Result<(), P::Error> {
        (*self).print(printer)
    }
}

/// Prints the items one after another, as array items.
impl<T: Print> Print for Vec<T> {
    #[inline]
    fn print<P: Printer>(&self, printer: &mut P) -> Result<(), P::Error> {
        for item in self {
            printer.print(item)?;
        }
        Ok(())
    }
}

/// Error for values that have no representation in configuration text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PrintError {
    #[error("text {text:?} cannot be written as q(...): contains {char:?}")]
    Unrepresentable { text: String, char: char },
    #[error("text {text:?} cannot be written as q(...): contains a constant declaration")]
    Declaration { text: String },
}
