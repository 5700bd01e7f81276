use crate::constants::contains_declaration;
use crate::normalize::COMMENT_MARKER;
use crate::printer::PrintError;

/// Characters that cannot appear inside a `q(...)` literal.
///
/// There is no escape syntax: `)` ends the literal, the comment marker cuts the
/// line, and line breaks are folded into spaces when the input is normalized.
const FORBIDDEN: [char; 4] = [')', COMMENT_MARKER, '\n', '\r'];

/// Writes `text` as a `q(...)` literal.
pub fn quote(text: &str) -> Result<String, PrintError> {
    if let Some(c) = text.chars().find(|c| FORBIDDEN.contains(c)) {
        return Err(PrintError::Unrepresentable {
            text: text.to_string(),
            char: c,
        });
    }

    if contains_declaration(text) {
        return Err(PrintError::Declaration {
            text: text.to_string(),
        });
    }

    let mut output = String::with_capacity(text.len() + 3);
    output.push_str("q(");
    output.push_str(text);
    output.push(')');
    Ok(output)
}
