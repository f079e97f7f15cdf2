//! Numeric literal scanning: decimal, legacy octal, `0x`/`0o`/`0b` prefixed integers, floats with
//! exponents, `_` digit separators and the imaginary `i` suffix.

use super::{Lexer, TokenKind, is_ident_continue};

impl<'a> Lexer<'a> {
    /// Scan a number whose first character (a digit or `.`) is already consumed.
    pub(super) fn scan_number(&mut self, start: usize, first: char) {
        if first == '0' && matches!(self.peek(), Some('x' | 'X' | 'o' | 'O' | 'b' | 'B')) {
            self.scan_prefixed_int(start);
            return;
        }

        let mut is_float = first == '.';
        self.skip_digits(10);

        if !is_float && self.peek() == Some('.') {
            self.advance();
            is_float = true;
            self.skip_digits(10);
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            self.advance();
            if matches!(self.peek(), Some('+' | '-')) {
                self.advance();
            }
            if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.error("exponent has no digits", start);
                return;
            }
            self.skip_digits(10);
            is_float = true;
        }

        let text = self.source[start..self.current_pos].replace('_', "");
        let imaginary = self.match_char('i');
        if self.reject_suffix(start) {
            return;
        }

        if is_float || imaginary {
            match text.parse::<f64>() {
                Ok(v) if imaginary => self.add_token(TokenKind::Imaginary(v), start),
                Ok(v) => self.add_token(TokenKind::Float(v), start),
                Err(_) => self.error(format!("malformed float literal '{text}'"), start),
            }
            return;
        }

        // A leading zero means octal (`0755`).
        let (digits, radix) = if text.len() > 1 && text.starts_with('0') {
            (&text[1..], 8)
        } else {
            (text.as_str(), 10)
        };
        if radix == 8 && digits.contains(['8', '9']) {
            self.error(format!("invalid digit in octal literal '{text}'"), start);
            return;
        }
        self.push_int(digits, radix, start);
    }

    fn scan_prefixed_int(&mut self, start: usize) {
        let radix = match self.advance() {
            Some('x' | 'X') => 16,
            Some('o' | 'O') => 8,
            _ => 2,
        };
        let digits_start = self.current_pos;
        self.skip_digits(radix);
        let digits = self.source[digits_start..self.current_pos].replace('_', "");
        if self.reject_suffix(start) {
            return;
        }
        if digits.is_empty() {
            self.error(format!("base-{radix} literal has no digits"), start);
            return;
        }
        self.push_int(&digits, radix, start);
    }

    fn push_int(&mut self, digits: &str, radix: u32, start: usize) {
        match u64::from_str_radix(digits, radix) {
            Ok(v) => self.add_token(TokenKind::Int(v), start),
            Err(_) => self.error("integer literal overflows 64 bits", start),
        }
    }

    fn skip_digits(&mut self, radix: u32) {
        while let Some(c) = self.peek() {
            if c.is_digit(radix) || c == '_' {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Consume and report any identifier characters glued to the literal (`12abc`, `0x1g`).
    fn reject_suffix(&mut self, start: usize) -> bool {
        if !self.peek().is_some_and(is_ident_continue) {
            return false;
        }
        while self.peek().is_some_and(is_ident_continue) {
            self.advance();
        }
        let text = &self.source[start..self.current_pos];
        self.error(format!("invalid digit or suffix in number literal '{text}'"), start);
        true
    }
}
