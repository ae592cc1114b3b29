//! XML Entity Decoding and Escaping
//!
//! Handles:
//! - Built-in entities: &lt; &gt; &amp; &quot; &apos;
//! - Numeric character references: &#123; &#x7B;
//! - Escaping of text and attribute values on output
//!
//! Uses Cow so that text without entities is never copied.

use memchr::{memchr, memchr3};
use std::borrow::Cow;

/// Decode entity references in text or attribute content.
///
/// In strict mode an unknown entity, an unterminated reference or a
/// reference to a character outside the XML `Char` production is an
/// error. Lenient mode keeps such references verbatim.
pub fn decode_text(input: &str, strict: bool) -> Result<Cow<'_, str>, &'static str> {
    // Fast path: no entities
    if memchr(b'&', input.as_bytes()).is_none() {
        return Ok(Cow::Borrowed(input));
    }

    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp) = memchr(b'&', rest.as_bytes()) {
        result.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let Some(semi) = memchr(b';', rest.as_bytes()) else {
            if strict {
                return Err("unterminated entity reference");
            }
            result.push_str(rest);
            return Ok(Cow::Owned(result));
        };

        match decode_entity(&rest[1..semi]) {
            Some(c) => {
                result.push(c);
                rest = &rest[semi + 1..];
            }
            None if strict => return Err("unknown or invalid entity reference"),
            None => {
                result.push('&');
                rest = &rest[1..];
            }
        }
    }
    result.push_str(rest);

    Ok(Cow::Owned(result))
}

/// Decode a single entity (without & and ;)
fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let digits = entity.strip_prefix('#')?;
            let codepoint = match digits.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse::<u32>().ok()?,
            };
            char::from_u32(codepoint).filter(|&c| is_xml_char(c))
        }
    }
}

/// XML 1.0 `Char` production
#[inline]
pub fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\u{9}' | '\u{A}' | '\u{D}'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

/// Escape character data for element content
pub fn escape_text(input: &str) -> Cow<'_, str> {
    if memchr3(b'&', b'<', b'>', input.as_bytes()).is_none() {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len() + 8);
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Escape an attribute value for a double-quoted attribute
pub fn escape_attribute(input: &str) -> Cow<'_, str> {
    let needs_escape = input
        .bytes()
        .any(|b| matches!(b, b'&' | b'<' | b'"' | b'\n' | b'\r' | b'\t'));
    if !needs_escape {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len() + 8);
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#9;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}
