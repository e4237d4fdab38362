//! Canonical selector text: the single deterministic rendering of a
//! `Locator` shown in (and accepted from) the editor's selector fields.
//!
//! Raw selectors render verbatim. Chains render as
//! `method('positional', {"key":value,…}).modifier(…)…` with the options
//! object in the method's schema order and JSON-style quoting, e.g.
//! `getByRole('button', {"name":"Submit"}).first()`. Rendered strings
//! re-parse byte-exactly.

use crate::error::LocatorSyntaxError;
use crate::journey::{Locator, LocatorChain, LocatorMethod, Modifier};
use crate::parser::lexer;
use crate::parser::locator::{method_options, parse_locator_tokens};

/// Render a locator to its canonical editable text.
pub fn render(locator: &Locator) -> String {
    match locator {
        Locator::Raw(text) => text.clone(),
        Locator::Chain(chain) => render_chain(chain),
    }
}

/// Canonical text of a chain, without any `page.` receiver prefix.
pub fn render_chain(chain: &LocatorChain) -> String {
    let mut out = String::new();
    out.push_str(chain.base.method.as_str());
    out.push('(');
    out.push_str(&quote_single(&chain.base.positional));

    if !chain.base.options.is_empty() {
        out.push_str(", {");
        let mut first = true;
        for spec in method_options(chain.base.method) {
            if let Some(value) = chain.base.options.get(spec.key) {
                if !first {
                    out.push(',');
                }
                first = false;
                out.push('"');
                out.push_str(spec.key);
                out.push_str("\":");
                // OptionValue is untagged, so this is the bare JSON literal.
                out.push_str(&serde_json::to_string(value).unwrap_or_default());
            }
        }
        out.push('}');
    }
    out.push(')');

    for modifier in &chain.modifiers {
        match modifier {
            Modifier::First => out.push_str(".first()"),
            Modifier::Last => out.push_str(".last()"),
            Modifier::Nth { index } => {
                out.push_str(".nth(");
                out.push_str(&index.to_string());
                out.push(')');
            }
        }
    }
    out
}

/// Parse canonical selector text back into a `Locator`.
///
/// Text that opens with an optional `page.` prefix followed by a known
/// locating method and `(` is parsed as a chain and rejected with a
/// `LocatorSyntaxError` when malformed; anything else is an opaque raw
/// selector kept verbatim.
pub fn parse(text: &str) -> Result<Locator, LocatorSyntaxError> {
    if !looks_like_chain(text) {
        return Ok(Locator::raw(text));
    }

    let tokens = lexer::tokenize(text).map_err(|err| match err {
        crate::error::ImportError::Lex { column, message, .. } => {
            LocatorSyntaxError::new(column, message, text)
        }
        crate::error::ImportError::Structure(message) => LocatorSyntaxError::new(1, message, text),
    })?;
    parse_locator_tokens(&tokens, text)
}

fn looks_like_chain(text: &str) -> bool {
    let trimmed = text.trim_start();
    let rest = trimmed
        .strip_prefix("page.")
        .map(str::trim_start)
        .unwrap_or(trimmed);

    const METHODS: &[&str] = &[
        "getByRole",
        "getByText",
        "getByLabel",
        "getByPlaceholder",
        "getByTestId",
        "getByAltText",
        "getByTitle",
        "locator",
    ];
    METHODS.iter().any(|method| {
        rest.strip_prefix(method)
            .is_some_and(|after| after.trim_start().starts_with('('))
    })
}

/// Single-quoted JS string literal.
pub fn quote_single(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journey::{BaseLocator, OptionValue};
    use std::collections::BTreeMap;

    fn role_submit_first() -> Locator {
        let mut options = BTreeMap::new();
        options.insert("name".to_string(), OptionValue::Str("Submit".to_string()));
        Locator::Chain(LocatorChain {
            base: BaseLocator {
                method: LocatorMethod::GetByRole,
                positional: "button".to_string(),
                options,
            },
            modifiers: vec![Modifier::First],
        })
    }

    #[test]
    fn test_render_matches_editor_field_value() {
        // The exact field values the journey editor displays.
        assert_eq!(
            render(&role_submit_first()),
            r#"getByRole('button', {"name":"Submit"}).first()"#
        );
        assert_eq!(render(&Locator::raw(".success-message")), ".success-message");
    }

    #[test]
    fn test_parse_render_round_trip_is_byte_exact() {
        let cases = [
            r#"getByRole('button', {"name":"Submit"}).first()"#,
            r#"getByRole('heading', {"name":"Stats","exact":true,"level":2})"#,
            "getByText('Welcome').nth(4)",
            "getByTestId('row-42').last()",
            "locator('#login > .field').first()",
            ".success-message",
            "//div[@id='app']",
        ];
        for case in cases {
            let parsed = parse(case).unwrap();
            assert_eq!(render(&parsed), case, "round-trip failed for {case}");
        }
    }

    #[test]
    fn test_parse_is_structural_inverse_of_render() {
        let locator = role_submit_first();
        assert_eq!(parse(&render(&locator)).unwrap(), locator);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        // Script-style spelling normalizes once, then stays fixed.
        let parsed = parse("page.getByRole('button', { name: 'Submit' }).first()").unwrap();
        let canonical = render(&parsed);
        assert_eq!(canonical, r#"getByRole('button', {"name":"Submit"}).first()"#);
        assert_eq!(render(&parse(&canonical).unwrap()), canonical);
    }

    #[test]
    fn test_option_order_is_schema_order_not_input_order() {
        let parsed = parse("getByRole('heading', { level: 3, name: 'Totals' })").unwrap();
        assert_eq!(
            render(&parsed),
            r#"getByRole('heading', {"name":"Totals","level":3})"#
        );
    }

    #[test]
    fn test_nth_index_survives_round_trip() {
        for index in [0u32, 1, 7, 4294967295] {
            let text = format!("getByText('x').nth({index})");
            let parsed = parse(&text).unwrap();
            assert_eq!(render(&parsed), text);
        }
    }

    #[test]
    fn test_raw_text_is_kept_verbatim() {
        let css = "div.card:nth-child(2) span";
        assert_eq!(parse(css).unwrap(), Locator::raw(css));
    }

    #[test]
    fn test_malformed_chain_is_rejected_not_stored() {
        let err = parse("getByRole('button'").unwrap_err();
        assert_eq!(err.text, "getByRole('button'");
        assert!(parse("getByRole('button', { bogus: 1 })").is_err());
    }

    #[test]
    fn test_positional_quoting_escapes() {
        let parsed = parse(r"getByText('it\'s here')").unwrap();
        assert_eq!(render(&parsed), r"getByText('it\'s here')");
    }
}
