//! Line codec for the catalog data file
//!
//! One record per line:
//!
//! ```text
//! <id>|<title>|<author>|<available: 0 or 1>
//! ```
//!
//! Inside title and author, `\` is written as `\\`, `|` as `\|`, and line
//! breaks as `\n` / `\r`. Text without those characters is written verbatim,
//! so files produced by older, non-escaping writers read back unchanged.

use shelfwise_core::{Book, BookId};
use thiserror::Error;

/// Field separator
pub const DELIMITER: char = '|';

const ESCAPE: char = '\\';
const FIELD_COUNT: usize = 4;

/// Why a line could not be decoded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("expected 4 fields, found {found}")]
    FieldCount { found: usize },

    #[error("invalid id '{value}'")]
    InvalidId { value: String },

    #[error("invalid availability flag '{value}' (expected 0 or 1)")]
    InvalidAvailability { value: String },

    #[error("line is not valid UTF-8")]
    InvalidUtf8,
}

/// Encodes a book as a single line, without the trailing newline
pub fn encode_line(book: &Book) -> String {
    format!(
        "{}{d}{}{d}{}{d}{}",
        book.id,
        escape_field(&book.title),
        escape_field(&book.author),
        u8::from(book.available),
        d = DELIMITER
    )
}

/// Decodes one line, with or without its line terminator
pub fn decode_line(line: &str) -> Result<Book, LineError> {
    let line = line.trim_end_matches(['\n', '\r']);
    let fields = split_fields(line);

    let [id, title, author, available]: [String; FIELD_COUNT] =
        fields
            .try_into()
            .map_err(|fields: Vec<String>| LineError::FieldCount {
                found: fields.len(),
            })?;

    let id = id
        .trim()
        .parse::<BookId>()
        .map_err(|_| LineError::InvalidId { value: id.clone() })?;

    let flag = match available.trim() {
        "0" => Some(false),
        "1" => Some(true),
        _ => None,
    };
    let available = flag.ok_or(LineError::InvalidAvailability { value: available })?;

    Ok(Book {
        id,
        title,
        author,
        available,
    })
}

fn escape_field(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            ESCAPE => escaped.push_str("\\\\"),
            DELIMITER => escaped.push_str("\\|"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Splits on unescaped delimiters, resolving escapes as it goes.
///
/// Unknown escapes and a trailing lone backslash are kept literally.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::with_capacity(FIELD_COUNT);
    let mut current = String::new();
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            DELIMITER => fields.push(std::mem::take(&mut current)),
            ESCAPE => match chars.next() {
                Some(ESCAPE) => current.push(ESCAPE),
                Some(DELIMITER) => current.push(DELIMITER),
                Some('n') => current.push('\n'),
                Some('r') => current.push('\r'),
                Some(other) => {
                    current.push(ESCAPE);
                    current.push(other);
                }
                None => current.push(ESCAPE),
            },
            _ => current.push(c),
        }
    }

    fields.push(current);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: i32, title: &str, author: &str, available: bool) -> Book {
        Book::new(BookId::new(id), title, author).with_availability(available)
    }

    #[test]
    fn test_encode_plain() {
        let line = encode_line(&book(5, "Dune", "Frank Herbert", true));
        assert_eq!(line, "5|Dune|Frank Herbert|1");

        let line = encode_line(&book(-2, "T", "A", false));
        assert_eq!(line, "-2|T|A|0");
    }

    #[test]
    fn test_decode_plain() {
        let decoded = decode_line("12|Livro 7|Autor 3|0\n").unwrap();
        assert_eq!(decoded, book(12, "Livro 7", "Autor 3", false));
    }

    #[test]
    fn test_decode_crlf() {
        let decoded = decode_line("1|T|A|1\r\n").unwrap();
        assert_eq!(decoded, book(1, "T", "A", true));
    }

    #[test]
    fn test_decode_keeps_inner_spaces() {
        let decoded = decode_line("3|  Spaced Title |Some One|1").unwrap();
        assert_eq!(decoded.title, "  Spaced Title ");
    }

    #[test]
    fn test_delimiter_in_text_is_escaped() {
        let original = book(9, "Either|Or", "Kierkegaard \\ S.", true);
        let line = encode_line(&original);

        assert_eq!(line, "9|Either\\|Or|Kierkegaard \\\\ S.|1");
        assert_eq!(decode_line(&line).unwrap(), original);
    }

    #[test]
    fn test_line_breaks_in_text_are_escaped() {
        let original = book(4, "Two\nLines", "Carriage\rReturn", false);
        let line = encode_line(&original);

        assert!(!line.contains('\n'));
        assert!(!line.contains('\r'));
        assert_eq!(decode_line(&line).unwrap(), original);
    }

    #[test]
    fn test_unknown_escape_kept_literally() {
        let decoded = decode_line("1|C:\\dir|A\\|1").unwrap_err();
        // "A\|1" swallows the last delimiter, leaving three fields
        assert_eq!(decoded, LineError::FieldCount { found: 3 });

        let decoded = decode_line("1|C:\\dir|A|1").unwrap();
        assert_eq!(decoded.title, "C:\\dir");
    }

    #[test]
    fn test_missing_fields() {
        assert_eq!(
            decode_line("1|Title only").unwrap_err(),
            LineError::FieldCount { found: 2 }
        );
        assert_eq!(
            decode_line("1|T|A|1|extra").unwrap_err(),
            LineError::FieldCount { found: 5 }
        );
    }

    #[test]
    fn test_invalid_id() {
        assert_eq!(
            decode_line("abc|T|A|1").unwrap_err(),
            LineError::InvalidId {
                value: "abc".to_string()
            }
        );
        assert!(matches!(
            decode_line("99999999999|T|A|1"),
            Err(LineError::InvalidId { .. })
        ));
    }

    #[test]
    fn test_invalid_availability() {
        assert_eq!(
            decode_line("1|T|A|yes").unwrap_err(),
            LineError::InvalidAvailability {
                value: "yes".to_string()
            }
        );
        assert!(decode_line("1|T|A|2").is_err());
        assert!(decode_line("1|T|A|").is_err());
    }

    #[test]
    fn test_empty_text_fields_allowed() {
        let decoded = decode_line("1|||1").unwrap();
        assert_eq!(decoded.title, "");
        assert_eq!(decoded.author, "");
    }
}
