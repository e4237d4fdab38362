//! Maps each journey-body statement onto a recognized action shape.
//!
//! The form table mirrors what the hosting application generates and
//! replays: `page.goto`, the interaction verbs on a locator chain,
//! `page.waitForSelector`, and `expect(...)` assertions with an optional
//! `.not`. A statement matching no form — or whose locator sub-expression
//! is malformed — degrades to an opaque step carrying its raw text, so one
//! unfamiliar line never sinks the import.

use log::debug;

use crate::journey::{
    Action, AssertAttributeParams, AssertParams, AssertTextParams, FillParams, GotoParams,
    Locator, SelectOptionParams, Step, TargetParams, UnsupportedParams,
};
use crate::parser::lexer::Token;
use crate::parser::locator::parse_locator_tokens;
use crate::parser::statement::Statement;

/// Extract the ordered action list from the journey body's statements.
pub fn extract_actions(source: &str, statements: &[Statement]) -> Vec<Action> {
    statements
        .iter()
        .enumerate()
        .map(|(i, statement)| Action {
            step: extract_step(source, statement),
            source_order: i,
        })
        .collect()
}

fn extract_step(source: &str, statement: &Statement) -> Step {
    match try_extract(source, statement) {
        Some(step) => step,
        None => {
            debug!("keeping unrecognized statement verbatim: {}", statement.raw);
            Step::Unsupported(UnsupportedParams {
                raw: statement.raw.clone(),
            })
        }
    }
}

fn try_extract(source: &str, statement: &Statement) -> Option<Step> {
    let mut tokens: &[Token] = &statement.tokens;
    if tokens.first()?.ident() == Some("await") {
        tokens = &tokens[1..];
    }
    if tokens.is_empty() {
        return None;
    }

    if let Some(args) = match_page_call(tokens, "goto") {
        let url = args.first()?.string()?;
        return Some(Step::Goto(GotoParams {
            url: url.to_string(),
        }));
    }

    if let Some(args) = match_page_call(tokens, "waitForSelector") {
        let [arg] = args else { return None };
        return Some(Step::WaitForSelector(TargetParams {
            selector: Locator::raw(arg.string()?),
        }));
    }

    if tokens.first()?.ident() == Some("expect") {
        return extract_assertion(source, tokens);
    }

    extract_interaction(source, tokens)
}

/// `page.<method>(args…)` spanning the whole statement; returns the
/// argument tokens.
fn match_page_call<'t>(tokens: &'t [Token], method: &str) -> Option<&'t [Token]> {
    if tokens.len() < 5
        || tokens[0].ident() != Some("page")
        || !tokens[1].is_punct('.')
        || tokens[2].ident() != Some(method)
        || !tokens[3].is_punct('(')
    {
        return None;
    }
    let close = matching_paren(tokens, 3)?;
    if close != tokens.len() - 1 {
        return None;
    }
    Some(&tokens[4..close])
}

/// `expect(<locator>)[.not].<matcher>(args…)`.
fn extract_assertion(source: &str, tokens: &[Token]) -> Option<Step> {
    if !tokens.get(1)?.is_punct('(') {
        return None;
    }
    let close = matching_paren(tokens, 1)?;
    let selector = parse_locator_in(source, &tokens[2..close])?;

    let mut rest = &tokens[close + 1..];
    let mut not = false;
    if rest.first()?.is_punct('.') && rest.get(1)?.ident() == Some("not") {
        not = true;
        rest = &rest[2..];
    }
    if !rest.first()?.is_punct('.') {
        return None;
    }
    let matcher = rest.get(1)?.ident()?;
    if !rest.get(2)?.is_punct('(') || !rest.last()?.is_punct(')') {
        return None;
    }
    let args = &rest[3..rest.len() - 1];

    match matcher {
        "toBeVisible" if args.is_empty() => {
            Some(Step::ToBeVisible(AssertParams { selector, not }))
        }
        "toHaveText" | "toContainText" => {
            let [arg] = args else { return None };
            let params = AssertTextParams {
                selector,
                text: arg.string()?.to_string(),
                not,
            };
            Some(if matcher == "toHaveText" {
                Step::ToHaveText(params)
            } else {
                Step::ToContainText(params)
            })
        }
        "toHaveAttribute" => {
            let [attribute, comma, value] = args else { return None };
            if !comma.is_punct(',') {
                return None;
            }
            Some(Step::ToHaveAttribute(AssertAttributeParams {
                selector,
                attribute: attribute.string()?.to_string(),
                value: value.string()?.to_string(),
                not,
            }))
        }
        _ => None,
    }
}

/// `<locator-expr>.<verb>(args…)` where the verb call is the statement's
/// final call. The receiver sub-expression is everything before the last
/// `.verb(`.
fn extract_interaction(source: &str, tokens: &[Token]) -> Option<Step> {
    if !tokens.last()?.is_punct(')') {
        return None;
    }
    let open = opening_paren(tokens)?;
    let verb = tokens.get(open.checked_sub(1)?)?.ident()?;
    if !tokens.get(open.checked_sub(2)?)?.is_punct('.') {
        return None;
    }
    let receiver = &tokens[..open - 2];
    let args = &tokens[open + 1..tokens.len() - 1];

    let step = match verb {
        "click" if args.is_empty() => {
            Step::Click(TargetParams {
                selector: parse_locator_in(source, receiver)?,
            })
        }
        "fill" | "type" | "press" => {
            let [arg] = args else { return None };
            let params = FillParams {
                selector: parse_locator_in(source, receiver)?,
                text: arg.string()?.to_string(),
            };
            match verb {
                "fill" => Step::Fill(params),
                "type" => Step::Type(params),
                _ => Step::Press(params),
            }
        }
        "selectOption" => {
            let [arg] = args else { return None };
            Step::SelectOption(SelectOptionParams {
                selector: parse_locator_in(source, receiver)?,
                value: arg.string()?.to_string(),
            })
        }
        _ => return None,
    };
    Some(step)
}

/// Delegate a locator sub-expression to the chain parser; a malformed
/// chain degrades the statement rather than failing the import.
fn parse_locator_in(source: &str, tokens: &[Token]) -> Option<Locator> {
    let first = tokens.first()?;
    let last = tokens.last()?;
    let text = &source[first.start..last.end];
    match parse_locator_tokens(tokens, text) {
        Ok(locator) => Some(locator),
        Err(err) => {
            debug!("locator '{}' rejected: {err}", text);
            None
        }
    }
}

fn matching_paren(tokens: &[Token], open: usize) -> Option<usize> {
    let mut depth = 0i32;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        if token.is_punct('(') {
            depth += 1;
        } else if token.is_punct(')') {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// Index of the `(` opening the statement's final call (the last token is
/// its `)`).
fn opening_paren(tokens: &[Token]) -> Option<usize> {
    let mut depth = 0i32;
    for (i, token) in tokens.iter().enumerate().rev() {
        if token.is_punct(')') {
            depth += 1;
        } else if token.is_punct('(') {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize;
    use crate::parser::statement::split_statements;
    use crate::selector;

    fn extract(body: &str) -> Vec<Action> {
        let src = format!("test('t', async ({{ page }}) => {{\n{body}\n}});");
        let tokens = tokenize(&src).unwrap();
        let script = split_statements(&src, &tokens).unwrap();
        extract_actions(&src, &script.statements)
    }

    #[test]
    fn test_goto_extraction() {
        let actions = extract("await page.goto('https://example.com');");
        assert_eq!(actions.len(), 1);
        assert_eq!(
            actions[0].step,
            Step::Goto(GotoParams {
                url: "https://example.com".to_string()
            })
        );
    }

    #[test]
    fn test_click_on_chain_renders_expected_selector() {
        let actions =
            extract("await page.getByRole('button', { name: 'Submit' }).first().click();");
        let selector = actions[0].step.selector().unwrap();
        assert_eq!(
            selector::render(selector),
            r#"getByRole('button', {"name":"Submit"}).first()"#
        );
    }

    #[test]
    fn test_fill_keeps_value_argument() {
        let actions = extract("await page.getByLabel('Email').fill('a@b.c');");
        match &actions[0].step {
            Step::Fill(params) => {
                assert_eq!(params.text, "a@b.c");
                assert_eq!(selector::render(&params.selector), "getByLabel('Email')");
            }
            other => panic!("expected fill, got {other:?}"),
        }
    }

    #[test]
    fn test_assertion_on_raw_selector() {
        let actions = extract("await expect(page.locator('.success-message')).toBeVisible();");
        match &actions[0].step {
            Step::ToBeVisible(params) => {
                assert!(!params.not);
                assert_eq!(selector::render(&params.selector), ".success-message");
            }
            other => panic!("expected toBeVisible, got {other:?}"),
        }
    }

    #[test]
    fn test_negated_assertion() {
        let actions =
            extract("await expect(page.getByText('Error')).not.toContainText('fatal');");
        match &actions[0].step {
            Step::ToContainText(params) => {
                assert!(params.not);
                assert_eq!(params.text, "fatal");
            }
            other => panic!("expected toContainText, got {other:?}"),
        }
    }

    #[test]
    fn test_to_have_attribute() {
        let actions =
            extract("await expect(page.getByTestId('link')).toHaveAttribute('href', '/home');");
        match &actions[0].step {
            Step::ToHaveAttribute(params) => {
                assert_eq!(params.attribute, "href");
                assert_eq!(params.value, "/home");
            }
            other => panic!("expected toHaveAttribute, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_statement_degrades_to_opaque() {
        let actions = extract("await page.screenshot({ path: 'x.png' });");
        match &actions[0].step {
            Step::Unsupported(params) => {
                assert!(params.raw.contains("page.screenshot"));
            }
            other => panic!("expected unsupported, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_locator_degrades_only_that_statement() {
        let actions = extract(
            "await page.getByRole('button', { bogus: 1 }).click();\n\
             await page.goto('https://example.com');",
        );
        assert!(matches!(actions[0].step, Step::Unsupported(_)));
        assert!(matches!(actions[1].step, Step::Goto(_)));
        assert_eq!(actions[1].source_order, 1);
    }

    #[test]
    fn test_source_order_is_statement_order() {
        let actions = extract(
            "await page.goto('https://a');\n\
             await page.getByText('Go').click();\n\
             await expect(page.locator('#done')).toBeVisible();",
        );
        let orders: Vec<usize> = actions.iter().map(|a| a.source_order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }
}
