//! Locator-chain parser.
//!
//! Turns the token span of a selector expression into a structured
//! `Locator`: one base locating call plus ordered `first`/`last`/`nth`
//! modifiers. Option objects are validated against a fixed per-method
//! schema so unknown options are rejected instead of silently accepted,
//! and canonical rendering stays deterministic.

use std::collections::BTreeMap;

use crate::error::LocatorSyntaxError;
use crate::journey::{BaseLocator, Locator, LocatorChain, LocatorMethod, Modifier, OptionValue};
use crate::parser::lexer::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Str,
    Bool,
    Int,
}

pub struct OptionSpec {
    pub key: &'static str,
    pub kind: OptionKind,
}

const ROLE_OPTIONS: &[OptionSpec] = &[
    OptionSpec { key: "name", kind: OptionKind::Str },
    OptionSpec { key: "exact", kind: OptionKind::Bool },
    OptionSpec { key: "level", kind: OptionKind::Int },
];

const TEXT_OPTIONS: &[OptionSpec] = &[OptionSpec { key: "exact", kind: OptionKind::Bool }];

const NO_OPTIONS: &[OptionSpec] = &[];

/// Option schema for a base method. The slice order is the canonical
/// rendering order of the options object.
pub fn method_options(method: LocatorMethod) -> &'static [OptionSpec] {
    match method {
        LocatorMethod::GetByRole => ROLE_OPTIONS,
        LocatorMethod::GetByText
        | LocatorMethod::GetByLabel
        | LocatorMethod::GetByPlaceholder
        | LocatorMethod::GetByAltText
        | LocatorMethod::GetByTitle => TEXT_OPTIONS,
        LocatorMethod::GetByTestId | LocatorMethod::Locator => NO_OPTIONS,
    }
}

/// Parse a selector expression. `text` is the expression's source form,
/// carried into errors so a rejected edit can be shown next to its input.
///
/// A single string literal is an opaque `Raw` selector; otherwise the span
/// must be a `page.<method>(…)` / `<method>(…)` chain. A `locator('css')`
/// call with no options and no modifiers collapses to `Raw` so its edit
/// field shows the CSS text itself.
pub fn parse_locator_tokens(tokens: &[Token], text: &str) -> Result<Locator, LocatorSyntaxError> {
    if tokens.is_empty() {
        return Err(LocatorSyntaxError::new(1, "empty selector expression", text));
    }
    if tokens.len() == 1 {
        if let Some(value) = tokens[0].string() {
            return Ok(Locator::raw(value));
        }
    }

    let mut cursor = Cursor::new(tokens, text);

    // Optional receiver prefix, present in script form but not in the
    // canonical field form.
    if cursor.peek_ident() == Some("page") && cursor.peek_punct_at(1, '.') {
        cursor.advance(2);
    }

    let method_name = cursor
        .next_ident()
        .ok_or_else(|| cursor.error("expected a locator method"))?;
    let method = LocatorMethod::from_name(&method_name)
        .ok_or_else(|| cursor.error(format!("unknown locator method '{method_name}'")))?;

    cursor.expect_punct('(')?;
    let positional = cursor
        .next_string()
        .ok_or_else(|| cursor.error(format!("{method_name}() requires a string argument")))?;

    let mut options = BTreeMap::new();
    if cursor.eat_punct(',') {
        let schema = method_options(method);
        if schema.is_empty() {
            return Err(cursor.error(format!("{method_name}() takes a single string argument")));
        }
        options = parse_options_object(&mut cursor, schema)?;
    }
    cursor.expect_punct(')')?;

    let mut modifiers = Vec::new();
    while cursor.eat_punct('.') {
        let name = cursor
            .next_ident()
            .ok_or_else(|| cursor.error("expected a modifier after '.'"))?;
        match name.as_str() {
            "first" | "last" => {
                cursor.expect_punct('(')?;
                cursor.expect_punct(')')?;
                modifiers.push(if name == "first" {
                    Modifier::First
                } else {
                    Modifier::Last
                });
            }
            "nth" => {
                cursor.expect_punct('(')?;
                let index = parse_nth_index(&mut cursor)?;
                cursor.expect_punct(')')?;
                modifiers.push(Modifier::Nth { index });
            }
            other if LocatorMethod::from_name(other).is_some() => {
                return Err(
                    cursor.error("locator chain may contain only one locating call")
                );
            }
            other => {
                return Err(cursor.error(format!("unknown locator modifier '{other}'")));
            }
        }
    }

    if let Some(token) = cursor.peek() {
        return Err(LocatorSyntaxError::new(
            token.column,
            "unexpected trailing tokens after locator chain",
            text,
        ));
    }

    // Bare locator('css') is just the CSS selector.
    if method == LocatorMethod::Locator && options.is_empty() && modifiers.is_empty() {
        return Ok(Locator::raw(positional));
    }

    Ok(Locator::Chain(LocatorChain {
        base: BaseLocator {
            method,
            positional,
            options,
        },
        modifiers,
    }))
}

fn parse_nth_index(cursor: &mut Cursor) -> Result<u32, LocatorSyntaxError> {
    if cursor.peek_punct('-') {
        return Err(cursor.error("nth() index must be a non-negative integer"));
    }
    let literal = cursor
        .next_number()
        .ok_or_else(|| cursor.error("nth() requires an integer argument"))?;
    literal
        .parse::<u32>()
        .map_err(|_| cursor.error("nth() index must be a non-negative integer"))
}

/// `{ key: value, … }` with keys in either identifier or quoted form
/// (scripts write `{ name: 'x' }`, canonical fields `{"name":"x"}`).
fn parse_options_object(
    cursor: &mut Cursor,
    schema: &[OptionSpec],
) -> Result<BTreeMap<String, OptionValue>, LocatorSyntaxError> {
    cursor.expect_punct('{')?;
    let mut options = BTreeMap::new();

    loop {
        if cursor.eat_punct('}') {
            return Ok(options);
        }
        let key = cursor
            .next_ident_or_string()
            .ok_or_else(|| cursor.error("expected an option name"))?;
        let spec = schema
            .iter()
            .find(|s| s.key == key)
            .ok_or_else(|| cursor.error(format!("unknown option '{key}'")))?;
        cursor.expect_punct(':')?;

        let value = parse_option_value(cursor, spec)?;
        if options.insert(key.clone(), value).is_some() {
            return Err(cursor.error(format!("duplicate option '{key}'")));
        }

        if !cursor.eat_punct(',') {
            cursor.expect_punct('}')?;
            return Ok(options);
        }
    }
}

fn parse_option_value(
    cursor: &mut Cursor,
    spec: &OptionSpec,
) -> Result<OptionValue, LocatorSyntaxError> {
    match spec.kind {
        OptionKind::Str => cursor
            .next_string()
            .map(OptionValue::Str)
            .ok_or_else(|| cursor.error(format!("option '{}' expects a string", spec.key))),
        OptionKind::Bool => match cursor.next_ident().as_deref() {
            Some("true") => Ok(OptionValue::Bool(true)),
            Some("false") => Ok(OptionValue::Bool(false)),
            _ => Err(cursor.error(format!("option '{}' expects true or false", spec.key))),
        },
        OptionKind::Int => {
            let negative = cursor.eat_punct('-');
            let literal = cursor
                .next_number()
                .ok_or_else(|| cursor.error(format!("option '{}' expects an integer", spec.key)))?;
            let value: i64 = literal
                .parse()
                .map_err(|_| cursor.error(format!("option '{}' expects an integer", spec.key)))?;
            Ok(OptionValue::Int(if negative { -value } else { value }))
        }
    }
}

struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
    text: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(tokens: &'a [Token], text: &'a str) -> Self {
        Self {
            tokens,
            pos: 0,
            text,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self, count: usize) {
        self.pos += count;
    }

    fn peek_ident(&self) -> Option<&str> {
        self.peek().and_then(Token::ident)
    }

    fn peek_punct(&self, ch: char) -> bool {
        self.peek().is_some_and(|t| t.is_punct(ch))
    }

    fn peek_punct_at(&self, offset: usize, ch: char) -> bool {
        self.tokens
            .get(self.pos + offset)
            .is_some_and(|t| t.is_punct(ch))
    }

    fn next_ident(&mut self) -> Option<String> {
        let name = self.peek_ident()?.to_string();
        self.pos += 1;
        Some(name)
    }

    fn next_string(&mut self) -> Option<String> {
        let value = self.peek().and_then(Token::string)?.to_string();
        self.pos += 1;
        Some(value)
    }

    fn next_number(&mut self) -> Option<String> {
        match self.peek().map(|t| &t.kind) {
            Some(TokenKind::Number(literal)) => {
                let literal = literal.clone();
                self.pos += 1;
                Some(literal)
            }
            _ => None,
        }
    }

    fn next_ident_or_string(&mut self) -> Option<String> {
        self.next_ident().or_else(|| self.next_string())
    }

    fn eat_punct(&mut self, ch: char) -> bool {
        if self.peek_punct(ch) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_punct(&mut self, ch: char) -> Result<(), LocatorSyntaxError> {
        if self.eat_punct(ch) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{ch}'")))
        }
    }

    fn column(&self) -> usize {
        self.peek()
            .or_else(|| self.tokens.last())
            .map(|t| t.column)
            .unwrap_or(1)
    }

    fn error(&self, message: impl Into<String>) -> LocatorSyntaxError {
        LocatorSyntaxError::new(self.column(), message, self.text)
    }
}
