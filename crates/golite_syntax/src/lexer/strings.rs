//! String, raw string and rune literal scanning.

use super::{Lexer, TokenKind};

impl<'a> Lexer<'a> {
    /// Scan an interpreted string `"..."`. The opening quote is already consumed.
    ///
    /// Interpreted strings may not span lines.
    pub(super) fn scan_string(&mut self, start: usize) {
        let mut value = String::new();
        loop {
            match self.peek() {
                None | Some('\n') => {
                    self.error("string literal not terminated", start);
                    return;
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    if let Some(c) = self.scan_escape('"') {
                        value.push(c);
                    }
                }
                Some(c) => {
                    self.advance();
                    value.push(c);
                }
            }
        }
        self.add_token(TokenKind::String(value), start);
    }

    /// Scan a raw string `` `...` ``. Carriage returns are dropped, everything else is literal.
    pub(super) fn scan_raw_string(&mut self, start: usize) {
        let mut value = String::new();
        loop {
            match self.advance() {
                None => {
                    self.error("raw string literal not terminated", start);
                    return;
                }
                Some('`') => break,
                Some('\r') => {}
                Some(c) => value.push(c),
            }
        }
        self.add_token(TokenKind::String(value), start);
    }

    /// Scan a rune literal `'x'`. The opening quote is already consumed.
    pub(super) fn scan_rune(&mut self, start: usize) {
        let value = match self.peek() {
            None | Some('\n') | Some('\'') => {
                if self.peek() == Some('\'') {
                    self.advance();
                }
                self.error("empty rune literal or unescaped ' in rune literal", start);
                return;
            }
            Some('\\') => {
                self.advance();
                self.scan_escape('\'')
            }
            Some(c) => {
                self.advance();
                Some(c)
            }
        };

        if !self.match_char('\'') {
            // Skip to the closing quote on this line so the rest of the line lexes normally.
            while let Some(c) = self.peek() {
                if c == '\n' {
                    break;
                }
                self.advance();
                if c == '\'' {
                    break;
                }
            }
            self.error("rune literal not terminated", start);
            return;
        }

        if let Some(c) = value {
            self.add_token(TokenKind::Rune(c), start);
        }
    }

    /// Scan one escape sequence after a backslash. `quote` is the delimiter that may be escaped.
    ///
    /// Reports an error and returns `None` for unknown or malformed escapes.
    fn scan_escape(&mut self, quote: char) -> Option<char> {
        let escape_start = self.current_pos.saturating_sub(1);
        let c = self.advance()?;
        let value = match c {
            'a' => '\u{07}',
            'b' => '\u{08}',
            'f' => '\u{0C}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\u{0B}',
            '\\' => '\\',
            c if c == quote => c,
            'x' => return self.scan_hex_escape(2, escape_start),
            'u' => return self.scan_hex_escape(4, escape_start),
            'U' => return self.scan_hex_escape(8, escape_start),
            '0'..='7' => {
                let mut code = c.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match self.peek().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            self.advance();
                            code = code * 8 + d;
                        }
                        None => {
                            self.error("octal escape needs exactly three digits", escape_start);
                            return None;
                        }
                    }
                }
                if code > 255 {
                    self.error("octal escape value > 255", escape_start);
                    return None;
                }
                return char::from_u32(code);
            }
            _ => {
                self.error("unknown escape sequence", escape_start);
                return None;
            }
        };
        Some(value)
    }

    fn scan_hex_escape(&mut self, digits: usize, escape_start: usize) -> Option<char> {
        let mut code: u32 = 0;
        for _ in 0..digits {
            match self.peek().and_then(|d| d.to_digit(16)) {
                Some(d) => {
                    self.advance();
                    code = code * 16 + d;
                }
                None => {
                    self.error(format!("escape sequence needs {digits} hex digits"), escape_start);
                    return None;
                }
            }
        }
        let value = char::from_u32(code);
        if value.is_none() {
            self.error("escape sequence is invalid Unicode code point", escape_start);
        }
        value
    }
}
