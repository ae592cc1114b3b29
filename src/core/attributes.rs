//! XML Attribute Parsing
//!
//! Parses the attribute list of a start tag (the text between the element
//! name and `>` or `/>`).

use super::entities::decode_text;
use super::scanner::Scanner;
use memchr::memchr;
use std::borrow::Cow;

/// A parsed XML attribute
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute<'a> {
    /// Attribute name (may include namespace prefix)
    pub name: &'a str,
    /// Attribute value (normalized, entities decoded)
    pub value: Cow<'a, str>,
}

/// Parse error inside an attribute list: message and offset into the list
pub type AttributeError = (&'static str, usize);

/// Parse attributes from raw tag content.
///
/// Strict mode rejects duplicate names, a missing separator between
/// attributes, `<` inside a value and unknown entities.
pub fn parse_attributes(input: &str, strict: bool) -> Result<Vec<Attribute<'_>>, AttributeError> {
    let mut attributes: Vec<Attribute<'_>> = Vec::new();
    let mut scanner = Scanner::new(input);

    loop {
        let before = scanner.position();
        scanner.skip_whitespace();
        if scanner.is_eof() {
            break;
        }

        if strict && !attributes.is_empty() && scanner.position() == before {
            return Err(("missing whitespace between attributes", before));
        }

        let start = scanner.position();
        let Some(name) = scanner.read_name() else {
            if strict {
                return Err(("invalid attribute name", start));
            }
            break;
        };

        scanner.skip_whitespace();
        if scanner.peek() != Some(b'=') {
            if strict {
                return Err(("attribute without value", scanner.position()));
            }
            break;
        }
        scanner.advance(1);
        scanner.skip_whitespace();

        let quote_pos = scanner.position();
        let quote = match scanner.peek() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => {
                if strict {
                    return Err(("attribute value must be quoted", quote_pos));
                }
                break;
            }
        };
        scanner.advance(1);

        let value_start = scanner.position();
        let Some(len) = memchr(quote, scanner.rest().as_bytes()) else {
            return Err(("unterminated attribute value", value_start));
        };
        let raw = scanner.slice(value_start, value_start + len);
        scanner.advance(len + 1);

        if strict && raw.contains('<') {
            return Err(("'<' not allowed in attribute value", value_start));
        }

        let value = normalize_value(raw, strict).map_err(|msg| (msg, value_start))?;

        if attributes.iter().any(|a| a.name == name) {
            if strict {
                return Err(("duplicate attribute", start));
            }
            continue;
        }
        attributes.push(Attribute { name, value });
    }

    Ok(attributes)
}

/// Literal whitespace becomes a space before references are expanded
fn normalize_value(raw: &str, strict: bool) -> Result<Cow<'_, str>, &'static str> {
    if raw.bytes().any(|b| matches!(b, b'\t' | b'\n' | b'\r')) {
        let spaced: String = raw
            .chars()
            .map(|c| if matches!(c, '\t' | '\n' | '\r') { ' ' } else { c })
            .collect();
        return decode_text(&spaced, strict).map(|v| Cow::Owned(v.into_owned()));
    }
    decode_text(raw, strict)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_attributes() {
        let attrs = parse_attributes(r#" uID="wing1" isLink='w2'"#, true).unwrap();
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].name, "uID");
        assert_eq!(attrs[0].value, "wing1");
        assert_eq!(attrs[1].name, "isLink");
        assert_eq!(attrs[1].value, "w2");
    }

    #[test]
    fn test_entities_and_normalization() {
        let attrs = parse_attributes(" a=\"x &amp; y\tz\"", true).unwrap();
        assert_eq!(attrs[0].value, "x & y z");
    }

    #[test]
    fn test_spaces_around_equals() {
        let attrs = parse_attributes(" mapType = \"vector\" ", true).unwrap();
        assert_eq!(attrs[0].value, "vector");
    }

    #[test]
    fn test_strict_errors() {
        assert!(parse_attributes(" a=\"1\" a=\"2\"", true).is_err());
        assert!(parse_attributes(" a=\"1\"b=\"2\"", true).is_err());
        assert!(parse_attributes(" a=1", true).is_err());
        assert!(parse_attributes(" a=\"<\"", true).is_err());
        assert!(parse_attributes(" a=\"open", true).is_err());
    }

    #[test]
    fn test_lenient_keeps_first_duplicate() {
        let attrs = parse_attributes(" a=\"1\" a=\"2\"", false).unwrap();
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].value, "1");
    }
}
