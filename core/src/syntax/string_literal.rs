/// String literal escaping and unescaping for Brisk syntax.
///
/// The lexer uses [`unescape_char`] to decode escape sequences inside quoted
/// literals, and value rendering uses [`escape_string`] to produce a literal
/// that the lexer would read back as the same string.
use core::fmt;

/// Controls which quote style to use when escaping strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteStyle {
    /// Always use single quotes: `'...'`
    AlwaysSingle,
    /// Always use double quotes: `"..."`
    AlwaysDouble,
    /// Prefer double quotes, use single if string contains double quotes but not single
    #[default]
    PreferDouble,
}

/// Decode the character following a backslash inside a string literal.
///
/// Returns `None` for sequences the language does not define.
pub fn unescape_char(escaped: char) -> Option<char> {
    match escaped {
        'n' => Some('\n'),
        't' => Some('\t'),
        'r' => Some('\r'),
        '\\' => Some('\\'),
        '"' => Some('"'),
        '\'' => Some('\''),
        _ => None,
    }
}

/// Escape special characters in strings for Brisk string literals.
///
/// Converts runtime strings to their source code representation by escaping
/// the active quote character, `\`, newline, carriage return and tab.
///
/// # Example
///
/// ```ignore
/// let mut output = String::new();
/// escape_string(&mut output, "hello\nworld", QuoteStyle::PreferDouble).unwrap();
/// assert_eq!(output, r#""hello\nworld""#);
/// ```
pub fn escape_string(f: &mut impl fmt::Write, s: &str, style: QuoteStyle) -> fmt::Result {
    let quote_char = match style {
        QuoteStyle::AlwaysDouble => '"',
        QuoteStyle::AlwaysSingle => '\'',
        QuoteStyle::PreferDouble => {
            if s.contains('"') && !s.contains('\'') {
                '\''
            } else {
                '"'
            }
        }
    };

    f.write_char(quote_char)?;
    for ch in s.chars() {
        match ch {
            c if c == quote_char => write!(f, "\\{}", c)?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c => f.write_char(c)?,
        }
    }
    f.write_char(quote_char)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escape(s: &str, style: QuoteStyle) -> String {
        let mut output = String::new();
        escape_string(&mut output, s, style).unwrap();
        output
    }

    #[test]
    fn test_escape_empty() {
        assert_eq!(escape("", QuoteStyle::PreferDouble), r#""""#);
        assert_eq!(escape("", QuoteStyle::AlwaysSingle), "''");
    }

    #[test]
    fn test_escape_common_escapes() {
        assert_eq!(
            escape("hello\nworld", QuoteStyle::PreferDouble),
            r#""hello\nworld""#
        );
        assert_eq!(escape("tab\there", QuoteStyle::PreferDouble), r#""tab\there""#);
        assert_eq!(
            escape("back\\slash", QuoteStyle::PreferDouble),
            r#""back\\slash""#
        );
    }

    #[test]
    fn test_escape_quote_selection_prefer_double() {
        assert_eq!(escape(r#"say "hi""#, QuoteStyle::PreferDouble), r#"'say "hi"'"#);
        assert_eq!(
            escape(r#"say "hi" and 'bye'"#, QuoteStyle::PreferDouble),
            r#""say \"hi\" and 'bye'""#
        );
    }

    #[test]
    fn test_escape_always_single() {
        assert_eq!(escape("it's", QuoteStyle::AlwaysSingle), r"'it\'s'");
    }

    #[test]
    fn test_unescape_char_table() {
        assert_eq!(unescape_char('n'), Some('\n'));
        assert_eq!(unescape_char('\''), Some('\''));
        assert_eq!(unescape_char('q'), None);
        assert_eq!(unescape_char('0'), None);
    }
}
