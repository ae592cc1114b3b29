//! SIMD-accelerated XML scanning using memchr
//!
//! Works on `&str` input so every slice handed out is valid UTF-8. All
//! delimiters searched for are ASCII, which keeps slice boundaries on
//! character boundaries.

use memchr::{memchr, memmem};

/// Cursor over document text for delimiter detection
pub struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    #[inline]
    pub fn new(input: &'a str) -> Self {
        Scanner { input, pos: 0 }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos.min(self.input.len());
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    #[inline]
    fn bytes(&self) -> &'a [u8] {
        self.input.as_bytes()
    }

    /// Text between two absolute positions
    #[inline]
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.input[start..end]
    }

    /// Text from the cursor to the end of input
    #[inline]
    pub fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.bytes().get(self.pos).copied()
    }

    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.input.len());
    }

    #[inline]
    pub fn starts_with(&self, needle: &str) -> bool {
        self.bytes()[self.pos..].starts_with(needle.as_bytes())
    }

    /// Skip whitespace characters (space, tab, newline, carriage return)
    #[inline]
    pub fn skip_whitespace(&mut self) {
        let bytes = self.bytes();
        while self.pos < bytes.len() {
            match bytes[self.pos] {
                b' ' | b'\t' | b'\n' | b'\r' => self.pos += 1,
                _ => break,
            }
        }
    }

    /// Find next '<' (tag start) using SIMD
    #[inline]
    pub fn find_tag_start(&self) -> Option<usize> {
        memchr(b'<', &self.bytes()[self.pos..]).map(|i| self.pos + i)
    }

    /// Returns the position of the first '>' that is not inside quotes
    pub fn find_tag_end_quoted(&self) -> Option<usize> {
        let bytes = self.bytes();
        let mut pos = self.pos;
        let mut quote: Option<u8> = None;

        while pos < bytes.len() {
            let b = bytes[pos];
            match quote {
                Some(q) if b == q => quote = None,
                Some(_) => {}
                None if b == b'"' || b == b'\'' => quote = Some(b),
                None if b == b'>' => return Some(pos),
                None => {}
            }
            pos += 1;
        }
        None
    }

    /// Find the start of `needle` at or after the cursor
    #[inline]
    pub fn find_sequence(&self, needle: &str) -> Option<usize> {
        memmem::find(&self.bytes()[self.pos..], needle.as_bytes()).map(|i| self.pos + i)
    }

    /// Read an XML name at the cursor, advancing past it
    pub fn read_name(&mut self) -> Option<&'a str> {
        let bytes = self.bytes();
        let start = self.pos;
        if start >= bytes.len() || !is_name_start_byte(bytes[start]) {
            return None;
        }

        self.pos += 1;
        while self.pos < bytes.len() && is_name_byte(bytes[self.pos]) {
            self.pos += 1;
        }

        Some(&self.input[start..self.pos])
    }
}

/// ASCII name start characters plus every non-ASCII byte
#[inline]
pub(crate) fn is_name_start_byte(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

#[inline]
pub(crate) fn is_name_byte(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_' | b'-' | b'.' | b':') || b >= 0x80
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_tag_start() {
        let scanner = Scanner::new("hello <world>");
        assert_eq!(scanner.find_tag_start(), Some(6));
    }

    #[test]
    fn test_find_tag_end_quoted() {
        let scanner = Scanner::new("<a attr=\">te'st\">content");
        assert_eq!(scanner.find_tag_end_quoted(), Some(16));
    }

    #[test]
    fn test_read_name() {
        let mut scanner = Scanner::new("wing-section>");
        assert_eq!(scanner.read_name(), Some("wing-section"));
        assert_eq!(scanner.position(), 12);
    }

    #[test]
    fn test_read_name_unicode() {
        let mut scanner = Scanner::new("flügel/>");
        assert_eq!(scanner.read_name(), Some("flügel"));
        assert_eq!(scanner.peek(), Some(b'/'));
    }

    #[test]
    fn test_find_sequence() {
        let mut scanner = Scanner::new("<!-- note -->rest");
        scanner.advance(4);
        assert_eq!(scanner.find_sequence("-->"), Some(10));
    }

    #[test]
    fn test_skip_whitespace() {
        let mut scanner = Scanner::new("  \t\n hello");
        scanner.skip_whitespace();
        assert_eq!(scanner.position(), 5);
        assert_eq!(scanner.rest(), "hello");
    }
}
