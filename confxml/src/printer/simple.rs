use crate::escape::quote;
use std::fmt::Write as _;

use super::{Print, PrintError, Printer};

/// A printer that writes everything on a single line.
struct SimplePrinter {
    needs_separator: bool,
    string: String,
}

impl SimplePrinter {
    pub fn new() -> Self {
        Self {
            needs_separator: false,
            string: String::new(),
        }
    }

    #[inline]
    fn separate(&mut self) {
        if self.needs_separator {
            self.string.push_str(", ");
        }
        self.needs_separator = true;
    }

    #[inline]
    fn print_delimited<F>(&mut self, open: &str, close: &str, f: F) -> Result<(), PrintError>
    where
        F: FnOnce(&mut Self) -> Result<(), PrintError>,
    {
        self.separate();
        self.string.push_str(open);
        self.needs_separator = false;
        f(self)?;
        self.string.push_str(close);
        self.needs_separator = true;

        Ok(())
    }
}

impl Printer for SimplePrinter {
    type Error = PrintError;

    fn int(&mut self, int: i64) -> Result<(), Self::Error> {
        self.separate();
        let _ = write!(&mut self.string, "{}", int);
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<(), Self::Error> {
        let quoted = quote(text)?;
        self.separate();
        self.string.push_str(&quoted);
        Ok(())
    }

    #[inline]
    fn seq<F>(&mut self, f: F) -> Result<(), Self::Error>
    where
        F: FnOnce(&mut Self) -> Result<(), Self::Error>,
    {
        self.print_delimited("{", "}", f)
    }

    #[inline]
    fn map<F>(&mut self, f: F) -> Result<(), Self::Error>
    where
        F: FnOnce(&mut Self) -> Result<(), Self::Error>,
    {
        self.print_delimited("$[", "]", f)
    }

    fn entry<F>(&mut self, key: &str, f: F) -> Result<(), Self::Error>
    where
        F: FnOnce(&mut Self) -> Result<(), Self::Error>,
    {
        self.separate();
        self.string.push_str(key);
        self.string.push_str(": ");
        self.needs_separator = false;
        f(self)?;
        self.needs_separator = true;
        Ok(())
    }
}

/// Print a `T` into configuration text on a single line.
///
/// Where human readability is a concern, consider using the [`to_string_pretty`]
/// function instead.
///
/// [`to_string_pretty`]: `crate::printer::to_string_pretty`
pub fn to_string<T: Print>(value: T) -> Result<String, PrintError> {
    let mut printer = SimplePrinter::new();
    value.print(&mut printer)?;
    Ok(printer.string)
}
