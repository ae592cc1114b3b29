//! Slice Reader
//!
//! Pull parser over borrowed document text. Strict mode reports the first
//! well-formedness violation; lenient mode salvages what it can by skipping
//! stray content, closing unbalanced tags and keeping unknown entities.

use super::events::{StartElement, XmlEvent};
use crate::core::attributes::parse_attributes;
use crate::core::entities::decode_text;
use crate::core::scanner::Scanner;

/// Well-formedness error with the byte offset it was detected at
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at byte {position}")]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, position: usize) -> Self {
        ParseError {
            message: message.into(),
            position,
        }
    }
}

/// XML reader over a string slice
pub struct SliceReader<'a> {
    scanner: Scanner<'a>,
    len: usize,
    strict: bool,
    open: Vec<&'a str>,
    seen_root: bool,
}

impl<'a> SliceReader<'a> {
    /// Create a strict reader
    pub fn new(input: &'a str) -> Self {
        Self::with_mode(input, true)
    }

    /// Create a lenient reader
    pub fn lenient(input: &'a str) -> Self {
        Self::with_mode(input, false)
    }

    pub fn with_mode(input: &'a str, strict: bool) -> Self {
        let input = input.strip_prefix('\u{feff}').unwrap_or(input);
        SliceReader {
            scanner: Scanner::new(input),
            len: input.len(),
            strict,
            open: Vec::with_capacity(16),
            seen_root: false,
        }
    }

    /// Number of currently open elements
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    fn error<T>(&self, message: impl Into<String>, position: usize) -> Result<T, ParseError> {
        Err(ParseError::new(message, position))
    }

    /// Get the next XML event, `Ok(None)` at a well-formed end of input
    pub fn next_event(&mut self) -> Result<Option<XmlEvent<'a>>, ParseError> {
        loop {
            if self.scanner.is_eof() {
                return self.finish();
            }

            let start = self.scanner.position();

            if self.scanner.peek() != Some(b'<') {
                let end = self.scanner.find_tag_start().unwrap_or(self.len);
                let raw = self.scanner.slice(start, end);
                self.scanner.set_position(end);

                if self.open.is_empty() {
                    if self.strict && !is_whitespace(raw) {
                        return self.error("content outside the root element", start);
                    }
                    continue;
                }
                if self.strict && raw.contains("]]>") {
                    return self.error("']]>' not allowed in text", start);
                }
                let text = decode_text(raw, self.strict).map_err(|m| ParseError::new(m, start))?;
                return Ok(Some(XmlEvent::Text(text)));
            }

            if self.scanner.starts_with("<!--") {
                self.scanner.advance(4);
                let body = self.read_until("-->", "unterminated comment", start)?;
                return Ok(Some(XmlEvent::Comment(body)));
            }

            if self.scanner.starts_with("<![CDATA[") {
                self.scanner.advance(9);
                let body = self.read_until("]]>", "unterminated CDATA section", start)?;
                if self.open.is_empty() {
                    if self.strict {
                        return self.error("CDATA outside the root element", start);
                    }
                    continue;
                }
                return Ok(Some(XmlEvent::CData(body)));
            }

            if self.scanner.starts_with("<!DOCTYPE") {
                if self.strict && self.seen_root {
                    return self.error("DOCTYPE after the root element", start);
                }
                self.scanner.advance(9);
                let body_start = self.scanner.position();
                let Some(end) = self.find_doctype_end() else {
                    return self.error("unterminated DOCTYPE", start);
                };
                self.scanner.set_position(end + 1);
                return Ok(Some(XmlEvent::DocType(self.scanner.slice(body_start, end).trim())));
            }

            if self.scanner.starts_with("<?") {
                self.scanner.advance(2);
                let Some(target) = self.scanner.read_name() else {
                    return self.error("invalid processing instruction target", start);
                };
                let body = self.read_until("?>", "unterminated processing instruction", start)?;

                if target == "xml" {
                    if self.strict && start != 0 {
                        return self.error("XML declaration not at start of document", start);
                    }
                    return Ok(Some(XmlEvent::XmlDeclaration(body.trim())));
                }
                if self.strict && target.eq_ignore_ascii_case("xml") {
                    return self.error("reserved processing instruction target", start);
                }
                return Ok(Some(XmlEvent::ProcessingInstruction {
                    target,
                    data: body.trim_start(),
                }));
            }

            if self.scanner.starts_with("</") {
                self.scanner.advance(2);
                let Some(name) = self.scanner.read_name() else {
                    return self.error("invalid end tag", start);
                };
                self.scanner.skip_whitespace();
                if self.scanner.peek() != Some(b'>') {
                    return self.error("unterminated end tag", start);
                }
                self.scanner.advance(1);

                match self.open.iter().rposition(|open| *open == name) {
                    Some(i) if i + 1 == self.open.len() || !self.strict => {
                        self.open.truncate(i);
                        return Ok(Some(XmlEvent::EndElement(name)));
                    }
                    _ if self.strict => {
                        return self.error(format!("mismatched end tag </{name}>"), start);
                    }
                    _ => continue,
                }
            }

            if self.scanner.starts_with("<!") {
                if self.strict {
                    return self.error("unsupported markup declaration", start);
                }
                let end = self.scanner.find_tag_end_quoted().unwrap_or(self.len);
                self.scanner.set_position(end + 1);
                continue;
            }

            return self.read_start_tag(start).map(Some);
        }
    }

    fn read_start_tag(&mut self, start: usize) -> Result<XmlEvent<'a>, ParseError> {
        self.scanner.advance(1);
        let Some(name) = self.scanner.read_name() else {
            return self.error("invalid element name", start);
        };
        let Some(end) = self.scanner.find_tag_end_quoted() else {
            return self.error("unterminated start tag", start);
        };

        let body_start = self.scanner.position();
        let mut body = self.scanner.slice(body_start, end);
        let empty = body.ends_with('/');
        if empty {
            body = &body[..body.len() - 1];
        }
        if self.strict && !body.is_empty() && !body.starts_with([' ', '\t', '\n', '\r']) {
            return self.error("invalid character in element name", body_start);
        }

        let attributes = parse_attributes(body, self.strict)
            .map_err(|(message, offset)| ParseError::new(message, body_start + offset))?;
        self.scanner.set_position(end + 1);

        if self.open.is_empty() {
            if self.seen_root {
                return self.error("multiple root elements", start);
            }
            self.seen_root = true;
        }

        let element = StartElement::new(name, attributes);
        if empty {
            Ok(XmlEvent::EmptyElement(element))
        } else {
            self.open.push(name);
            Ok(XmlEvent::StartElement(element))
        }
    }

    /// Consume through `terminator`, returning the text before it
    fn read_until(
        &mut self,
        terminator: &str,
        message: &'static str,
        start: usize,
    ) -> Result<&'a str, ParseError> {
        let Some(end) = self.scanner.find_sequence(terminator) else {
            return self.error(message, start);
        };
        let body = self.scanner.slice(self.scanner.position(), end);
        self.scanner.set_position(end + terminator.len());
        Ok(body)
    }

    /// '>' closing a DOCTYPE, skipping an internal subset and quoted literals
    fn find_doctype_end(&self) -> Option<usize> {
        let rest = self.scanner.rest().as_bytes();
        let base = self.scanner.position();
        let mut depth = 0usize;
        let mut quote: Option<u8> = None;

        for (i, &b) in rest.iter().enumerate() {
            match (quote, b) {
                (Some(q), _) if b == q => quote = None,
                (Some(_), _) => {}
                (None, b'"' | b'\'') => quote = Some(b),
                (None, b'[') => depth += 1,
                (None, b']') => depth = depth.saturating_sub(1),
                (None, b'>') if depth == 0 => return Some(base + i),
                _ => {}
            }
        }
        None
    }

    fn finish(&mut self) -> Result<Option<XmlEvent<'a>>, ParseError> {
        if let Some(&name) = self.open.last() {
            if self.strict {
                return self.error(format!("unclosed element <{name}>"), self.len);
            }
            self.open.pop();
            return Ok(Some(XmlEvent::EndElement(name)));
        }
        if !self.seen_root {
            return self.error("no root element", self.len);
        }
        Ok(None)
    }
}

#[inline]
fn is_whitespace(text: &str) -> bool {
    text.bytes().all(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\r'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(input: &str, strict: bool) -> Result<Vec<XmlEvent<'_>>, ParseError> {
        let mut reader = SliceReader::with_mode(input, strict);
        let mut events = Vec::new();
        while let Some(event) = reader.next_event()? {
            events.push(event);
        }
        Ok(events)
    }

    #[test]
    fn test_simple_document() {
        let events = collect("<?xml version=\"1.0\"?><a x=\"1\"><b/>hi</a>", true).unwrap();
        assert_eq!(events.len(), 5);
        assert!(matches!(events[0], XmlEvent::XmlDeclaration("version=\"1.0\"")));
        match &events[1] {
            XmlEvent::StartElement(start) => {
                assert_eq!(start.name, "a");
                assert_eq!(start.attribute("x"), Some("1"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(&events[2], XmlEvent::EmptyElement(e) if e.name == "b"));
        assert!(matches!(&events[3], XmlEvent::Text(t) if t == "hi"));
        assert!(matches!(events[4], XmlEvent::EndElement("a")));
    }

    #[test]
    fn test_comments_cdata_pi() {
        let events = collect("<r><!-- c --><![CDATA[<x>]]><?pi data?></r>", true).unwrap();
        assert!(matches!(events[1], XmlEvent::Comment(" c ")));
        assert!(matches!(events[2], XmlEvent::CData("<x>")));
        assert!(matches!(
            events[3],
            XmlEvent::ProcessingInstruction {
                target: "pi",
                data: "data"
            }
        ));
    }

    #[test]
    fn test_doctype_with_internal_subset() {
        let events = collect("<!DOCTYPE r [<!ELEMENT r ANY>]><r/>", true).unwrap();
        assert!(matches!(events[0], XmlEvent::DocType("r [<!ELEMENT r ANY>]")));
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_strict_errors() {
        assert!(collect("<a><b></a>", true).is_err());
        assert!(collect("<a>", true).is_err());
        assert!(collect("<a/><b/>", true).is_err());
        assert!(collect("text<a/>", true).is_err());
        assert!(collect("", true).is_err());
        assert!(collect("<a>&bogus;</a>", true).is_err());
        assert!(collect("<a x=\"1\"y=\"2\"/>", true).is_err());
    }

    #[test]
    fn test_error_position() {
        let err = collect("<a></b>", true).unwrap_err();
        assert_eq!(err.position, 3);
        assert!(err.message.contains("</b>"));
    }

    #[test]
    fn test_lenient_recovers() {
        let events = collect("<a><b>text</a>", false).unwrap();
        assert!(matches!(events.last(), Some(XmlEvent::EndElement("a"))));

        let events = collect("<a><b>", false).unwrap();
        assert!(matches!(events[2], XmlEvent::EndElement("b")));
        assert!(matches!(events[3], XmlEvent::EndElement("a")));
    }
}
