use crate::escape::quote;

use super::{Print, PrintError, Printer};
use pretty::DocAllocator as _;

/// A pretty printer that uses the `pretty` crate to format the output.
struct PrettyPrinter<'a> {
    arena: &'a pretty::Arena<'a>,
    items: Vec<pretty::DocBuilder<'a, pretty::Arena<'a>>>,
}

impl<'a> PrettyPrinter<'a> {
    fn print_delimited<F>(
        &mut self,
        open: &'static str,
        close: &'static str,
        f: F,
    ) -> Result<(), PrintError>
    where
        F: FnOnce(&mut Self) -> Result<(), PrintError>,
    {
        let position = self.items.len();
        f(self)?;
        let items = self.items.drain(position..);

        let separator = self.arena.text(",").append(self.arena.line());
        let docs = self
            .arena
            .intersperse(items, separator)
            .nest(2)
            .group();

        self.items.push(
            self.arena
                .text(open)
                .append(docs)
                .append(self.arena.text(close)),
        );

        Ok(())
    }
}

impl<'a> Printer for PrettyPrinter<'a> {
    type Error = PrintError;

    fn int(&mut self, int: i64) -> Result<(), Self::Error> {
        let doc = self.arena.text(int.to_string());
        self.items.push(doc);
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<(), Self::Error> {
        let doc = self.arena.text(quote(text)?);
        self.items.push(doc);
        Ok(())
    }

    fn seq<F>(&mut self, f: F) -> Result<(), Self::Error>
    where
        F: FnOnce(&mut Self) -> Result<(), Self::Error>,
    {
        self.print_delimited("{", "}", f)
    }

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
        let position = self.items.len();
        f(self)?;
        let value = self.arena.concat(self.items.drain(position..));

        self.items.push(
            self.arena
                .text(format!("{key}: "))
                .append(value),
        );

        Ok(())
    }
}

/// Pretty print a `T` into configuration text that fits within `width` columns where possible.
pub fn to_string_pretty<T: Print>(value: T, width: usize) -> Result<String, PrintError> {
    let arena = pretty::Arena::new();
    let mut printer = PrettyPrinter {
        items: vec![],
        arena: &arena,
    };

    value.print(&mut printer)?;

    let doc = arena.concat(printer.items);

    let mut string = String::new();
    let _ = doc.render_fmt(width, &mut string);
    Ok(string)
}

#[cfg(test)]
mod test {
    use super::to_string_pretty;
    use crate::value::{Document, Map, Value};

    fn document() -> Document {
        let db: Map = [
            ("host", Value::from("localhost")),
            ("port", Value::from(5432)),
        ]
        .into_iter()
        .collect();
        let config: Map = [
            ("db", Value::Map(db)),
            ("features", Value::Seq(vec!["auth".into(), "logging".into()])),
        ]
        .into_iter()
        .collect();
        Document::Map([("config", Value::Map(config))].into_iter().collect())
    }

    #[test]
    fn test_wide_output_stays_on_one_line() {
        assert_eq!(
            "$[config: $[db: $[host: q(localhost), port: 5432], features: {q(auth), q(logging)}]]",
            to_string_pretty(&document(), 200).unwrap()
        );
    }

    #[test]
    fn test_narrow_output_breaks_lines() {
        let text = to_string_pretty(&document(), 20).unwrap();
        assert!(text.lines().count() > 1);
        assert_eq!(document(), crate::from_str(&text).unwrap());
    }
}
