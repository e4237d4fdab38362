//! Splits a tokenized script into the statements of its journey body.
//!
//! The body is the callback of the `test('…', async ({ page }) => { … })`
//! wrapper. Everything before the wrapper is kept as an opaque prologue and
//! re-emitted verbatim on export. Splitting tracks bracket depth so that
//! multi-line chained calls stay in one statement.

use crate::error::ImportError;
use crate::parser::lexer::{Token, TokenKind};

#[derive(Debug)]
pub struct ScriptBody {
    /// Source text preceding the test block, trimmed of surrounding
    /// whitespace. Empty when the script starts at the wrapper.
    pub prologue: String,
    pub statements: Vec<Statement>,
}

#[derive(Debug)]
pub struct Statement {
    pub tokens: Vec<Token>,
    /// Exact source slice, kept for opaque re-emission.
    pub raw: String,
}

/// Locate the journey body and split it into top-level statements.
///
/// Fails with `ImportError::Structure` when no wrapper is found or the
/// body's bracket nesting is unbalanced; a broken statement boundary makes
/// everything downstream unreliable, so the whole import is rejected.
pub fn split_statements(source: &str, tokens: &[Token]) -> Result<ScriptBody, ImportError> {
    let test_idx = find_test_call(tokens).ok_or_else(|| {
        ImportError::Structure("no test(...) block was found in the script".to_string())
    })?;

    let body_open = find_body_open(tokens, test_idx).ok_or_else(|| {
        ImportError::Structure("test(...) block has no callback body".to_string())
    })?;

    let body_close = find_matching_brace(tokens, body_open)?;

    let prologue = source[..tokens[test_idx].start].trim().to_string();
    let statements = split_body(source, &tokens[body_open + 1..body_close]);

    Ok(ScriptBody {
        prologue,
        statements,
    })
}

/// First `test(` at the top level of the script.
fn find_test_call(tokens: &[Token]) -> Option<usize> {
    let mut depth = 0i32;
    for (i, token) in tokens.iter().enumerate() {
        if let TokenKind::Punct(ch) = token.kind {
            match ch {
                '(' | '{' | '[' => depth += 1,
                ')' | '}' | ']' => depth -= 1,
                _ => {}
            }
        }
        if depth == 0
            && token.ident() == Some("test")
            && tokens.get(i + 1).is_some_and(|t| t.is_punct('('))
        {
            return Some(i);
        }
    }
    None
}

/// The `{` opening the callback body: the first one after the `=>` inside
/// the test call's argument list.
fn find_body_open(tokens: &[Token], test_idx: usize) -> Option<usize> {
    let mut i = test_idx + 2;
    while i + 1 < tokens.len() {
        if tokens[i].is_punct('=') && tokens[i + 1].is_punct('>') {
            let mut j = i + 2;
            while j < tokens.len() {
                if tokens[j].is_punct('{') {
                    return Some(j);
                }
                // An arrow body that is not a block is not a journey body.
                if !tokens[j].is_punct('(') {
                    return None;
                }
                j += 1;
            }
            return None;
        }
        i += 1;
    }
    None
}

/// Matching `}` for the brace at `open`, tracking all bracket kinds.
fn find_matching_brace(tokens: &[Token], open: usize) -> Result<usize, ImportError> {
    let mut depth = 0i32;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        if let TokenKind::Punct(ch) = token.kind {
            match ch {
                '(' | '{' | '[' => depth += 1,
                ')' | '}' | ']' => {
                    depth -= 1;
                    if depth < 0 {
                        return Err(ImportError::Structure(format!(
                            "unbalanced '{}' at line {}",
                            ch, token.line
                        )));
                    }
                    if depth == 0 {
                        if ch != '}' {
                            return Err(ImportError::Structure(format!(
                                "journey body closed by mismatched '{}' at line {}",
                                ch, token.line
                            )));
                        }
                        return Ok(i);
                    }
                }
                _ => {}
            }
        }
    }
    Err(ImportError::Structure(
        "journey body is not closed (unbalanced brackets)".to_string(),
    ))
}

/// Split body tokens into statements on `;` at nesting depth 0.
fn split_body(source: &str, tokens: &[Token]) -> Vec<Statement> {
    let mut statements = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;

    for (i, token) in tokens.iter().enumerate() {
        if let TokenKind::Punct(ch) = token.kind {
            match ch {
                '(' | '{' | '[' => depth += 1,
                ')' | '}' | ']' => depth -= 1,
                ';' if depth == 0 => {
                    if i > start {
                        statements.push(make_statement(source, &tokens[start..i], token.end));
                    }
                    start = i + 1;
                }
                _ => {}
            }
        }
    }
    if start < tokens.len() {
        let last_end = tokens[tokens.len() - 1].end;
        statements.push(make_statement(source, &tokens[start..], last_end));
    }
    statements
}

fn make_statement(source: &str, tokens: &[Token], raw_end: usize) -> Statement {
    let raw_start = tokens[0].start;
    Statement {
        tokens: tokens.to_vec(),
        raw: source[raw_start..raw_end].to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize;

    const SCRIPT: &str = r#"import { test, expect } from '@playwright/test';

test('test', async ({ page }) => {
  await page.goto('https://example.com');
  await page.getByRole('button', { name: 'Submit' }).first().click();
  await expect(page.locator('.success-message')).toBeVisible();
});
"#;

    fn split(src: &str) -> Result<ScriptBody, ImportError> {
        let tokens = tokenize(src)?;
        split_statements(src, &tokens)
    }

    #[test]
    fn test_splits_body_into_statements() {
        let body = split(SCRIPT).unwrap();
        assert_eq!(body.statements.len(), 3);
        assert_eq!(
            body.prologue,
            "import { test, expect } from '@playwright/test';"
        );
        assert!(body.statements[0].raw.starts_with("await page.goto"));
        assert!(body.statements[0].raw.ends_with(';'));
    }

    #[test]
    fn test_multiline_chain_stays_one_statement() {
        let src = r#"test('t', async ({ page }) => {
  await page
    .getByRole('button', { name: 'Go' })
    .click();
  await page.goto('https://example.com');
});"#;
        let body = split(src).unwrap();
        assert_eq!(body.statements.len(), 2);
        assert!(body.statements[0].raw.contains("getByRole"));
    }

    #[test]
    fn test_missing_block_is_rejected() {
        let err = split("const x = 1;").unwrap_err();
        match err {
            ImportError::Structure(message) => assert!(message.contains("test(")),
            other => panic!("expected structure error, got {other:?}"),
        }
    }

    #[test]
    fn test_unbalanced_paren_fails_whole_import() {
        let src = r#"test('t', async ({ page }) => {
  await page.getByRole('button', { name: 'Go' }.click();
});"#;
        assert!(split(src).is_err());
    }

    #[test]
    fn test_empty_prologue() {
        let src = "test('t', async ({ page }) => { await page.goto('https://a'); });";
        let body = split(src).unwrap();
        assert!(body.prologue.is_empty());
        assert_eq!(body.statements.len(), 1);
    }
}
