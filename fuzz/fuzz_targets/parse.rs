#![no_main]

use golite_syntax::{lexer, parser};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    if let Ok(s) = std::str::from_utf8(data) {
        // Fuzz the lexer
        if let Ok(tokens) = lexer::lex(s) {
            // If lexing succeeds, fuzz the parser, then the position mapping it carries
            if let Ok(file) = parser::parse(&tokens, s) {
                for import in &file.imports {
                    let _ = file.position(import.span);
                }
            }
        }
    }
});
