//! Tokenizer for pasted Playwright scripts.
//!
//! Produces a flat token stream with exact source spans so that later
//! stages can report positions and re-emit unrecognized statements
//! verbatim. Whitespace and comments are discarded.

use crate::error::ImportError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Ident(String),
    /// String literal with escapes resolved. Single-, double- and
    /// backtick-quoted forms all lex to the same kind.
    Str(String),
    /// Numeric literal, kept as written.
    Number(String),
    Punct(char),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte span in the source text.
    pub start: usize,
    pub end: usize,
    /// 1-based position of the token's first character.
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn ident(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Ident(name) => Some(name),
            _ => None,
        }
    }

    pub fn string(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_punct(&self, ch: char) -> bool {
        self.kind == TokenKind::Punct(ch)
    }
}

struct Lexer<'a> {
    src: &'a [u8],
    pos: usize,
    line: usize,
    column: usize,
}

/// Tokenize a whole script. Fails on an unterminated string literal or a
/// character outside the recognized set, carrying the line/column of the
/// offending position.
pub fn tokenize(source: &str) -> Result<Vec<Token>, ImportError> {
    let mut lexer = Lexer {
        src: source.as_bytes(),
        pos: 0,
        line: 1,
        column: 1,
    };
    let mut tokens = Vec::new();

    while let Some(b) = lexer.peek() {
        if b.is_ascii_whitespace() {
            lexer.bump();
            continue;
        }
        if b == b'/' && lexer.peek_at(1) == Some(b'/') {
            lexer.skip_line_comment();
            continue;
        }
        if b == b'/' && lexer.peek_at(1) == Some(b'*') {
            lexer.skip_block_comment()?;
            continue;
        }

        let (start, line, column) = (lexer.pos, lexer.line, lexer.column);
        let kind = match b {
            b'\'' | b'"' | b'`' => lexer.lex_string(b)?,
            b'0'..=b'9' => lexer.lex_number(),
            b if b == b'_' || b == b'$' || b.is_ascii_alphabetic() => lexer.lex_ident(),
            b'(' | b')' | b'{' | b'}' | b'[' | b']' | b'.' | b',' | b';' | b':' | b'=' | b'>'
            | b'<' | b'!' | b'+' | b'-' | b'*' | b'/' | b'&' | b'|' | b'?' => {
                lexer.bump();
                TokenKind::Punct(b as char)
            }
            other => {
                return Err(ImportError::Lex {
                    line,
                    column,
                    message: format!("unrecognized character '{}'", other as char),
                })
            }
        };

        tokens.push(Token {
            kind,
            start,
            end: lexer.pos,
            line,
            column,
        });
    }

    Ok(tokens)
}

impl<'a> Lexer<'a> {
    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(b)
    }

    fn skip_line_comment(&mut self) {
        while let Some(b) = self.peek() {
            if b == b'\n' {
                break;
            }
            self.bump();
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), ImportError> {
        let (line, column) = (self.line, self.column);
        self.bump();
        self.bump();
        loop {
            match self.peek() {
                Some(b'*') if self.peek_at(1) == Some(b'/') => {
                    self.bump();
                    self.bump();
                    return Ok(());
                }
                Some(_) => {
                    self.bump();
                }
                None => {
                    return Err(ImportError::Lex {
                        line,
                        column,
                        message: "unterminated block comment".to_string(),
                    })
                }
            }
        }
    }

    fn lex_string(&mut self, quote: u8) -> Result<TokenKind, ImportError> {
        let (line, column) = (self.line, self.column);
        self.bump();
        let mut value: Vec<u8> = Vec::new();
        loop {
            match self.peek() {
                Some(b) if b == quote => {
                    self.bump();
                    return Ok(TokenKind::Str(
                        String::from_utf8_lossy(&value).into_owned(),
                    ));
                }
                Some(b'\\') => {
                    self.bump();
                    match self.bump() {
                        Some(b'n') => value.push(b'\n'),
                        Some(b't') => value.push(b'\t'),
                        Some(b'r') => value.push(b'\r'),
                        Some(escaped) => value.push(escaped),
                        None => {
                            return Err(ImportError::Lex {
                                line,
                                column,
                                message: "unterminated string literal".to_string(),
                            })
                        }
                    }
                }
                // A plain quote cannot span lines; backtick strings can.
                Some(b'\n') if quote != b'`' => {
                    return Err(ImportError::Lex {
                        line,
                        column,
                        message: "unterminated string literal".to_string(),
                    })
                }
                Some(b) => {
                    self.bump();
                    value.push(b);
                }
                None => {
                    return Err(ImportError::Lex {
                        line,
                        column,
                        message: "unterminated string literal".to_string(),
                    })
                }
            }
        }
    }

    fn lex_number(&mut self) -> TokenKind {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_digit() || b == b'.' {
                self.bump();
            } else {
                break;
            }
        }
        TokenKind::Number(String::from_utf8_lossy(&self.src[start..self.pos]).into_owned())
    }

    fn lex_ident(&mut self) -> TokenKind {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b == b'_' || b == b'$' || b.is_ascii_alphanumeric() {
                self.bump();
            } else {
                break;
            }
        }
        TokenKind::Ident(String::from_utf8_lossy(&self.src[start..self.pos]).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_call_chain() {
        let tokens = tokenize("await page.getByRole('button').click();").unwrap();
        let kinds: Vec<&TokenKind> = tokens.iter().map(|t| &t.kind).collect();
        assert_eq!(kinds[0], &TokenKind::Ident("await".to_string()));
        assert_eq!(kinds[1], &TokenKind::Ident("page".to_string()));
        assert_eq!(kinds[2], &TokenKind::Punct('.'));
        assert_eq!(kinds[3], &TokenKind::Ident("getByRole".to_string()));
        assert_eq!(kinds[4], &TokenKind::Punct('('));
        assert_eq!(kinds[5], &TokenKind::Str("button".to_string()));
        assert!(tokens.iter().any(|t| t.is_punct(';')));
    }

    #[test]
    fn test_comments_are_discarded() {
        let tokens = tokenize("a // line\n/* block */ b").unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].ident(), Some("a"));
        assert_eq!(tokens[1].ident(), Some("b"));
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn test_string_escapes() {
        let tokens = tokenize(r"'it\'s'").unwrap();
        assert_eq!(tokens[0].string(), Some("it's"));
    }

    #[test]
    fn test_unterminated_string_reports_position() {
        let err = tokenize("await page.goto('https://e\n").unwrap_err();
        match err {
            ImportError::Lex { line, column, message } => {
                assert_eq!(line, 1);
                assert_eq!(column, 17);
                assert!(message.contains("unterminated"));
            }
            other => panic!("expected lex error, got {other:?}"),
        }
    }

    #[test]
    fn test_unrecognized_character() {
        let err = tokenize("page # oops").unwrap_err();
        assert!(matches!(err, ImportError::Lex { .. }));
    }

    #[test]
    fn test_spans_slice_back_into_source() {
        let src = "await page.goto('x');";
        let tokens = tokenize(src).unwrap();
        let first = &tokens[0];
        assert_eq!(&src[first.start..first.end], "await");
    }
}
