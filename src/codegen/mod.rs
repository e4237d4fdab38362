//! Serializes a journey back into runnable Playwright source.
//!
//! Each recognized step has a fixed line template; opaque steps are
//! emitted as their stored raw text unchanged. Statement order follows
//! `source_order` exactly.

use crate::journey::{Journey, Locator, Step};
use crate::selector;

const DEFAULT_PROLOGUE: &str = "import { test, expect } from '@playwright/test';";

/// Generate a runnable script from a journey.
pub fn generate_playwright_code(journey: &Journey) -> String {
    let mut code = String::new();
    code.push_str(journey.prologue.as_deref().unwrap_or(DEFAULT_PROLOGUE));
    code.push_str("\n\n");
    code.push_str(&format!(
        "test({}, async ({{ page }}) => {{\n",
        selector::quote_single(&journey.name)
    ));

    let mut steps: Vec<_> = journey.steps.iter().collect();
    steps.sort_by_key(|action| action.source_order);

    for action in steps {
        code.push_str("  ");
        code.push_str(&step_line(&action.step));
        code.push('\n');
    }

    code.push_str("});\n");
    code
}

fn step_line(step: &Step) -> String {
    match step {
        Step::Goto(p) => format!("await page.goto({});", selector::quote_single(&p.url)),
        Step::Click(p) => format!("await {}.click();", locator_source(&p.selector)),
        Step::Fill(p) => format!(
            "await {}.fill({});",
            locator_source(&p.selector),
            selector::quote_single(&p.text)
        ),
        Step::Type(p) => format!(
            "await {}.type({});",
            locator_source(&p.selector),
            selector::quote_single(&p.text)
        ),
        Step::Press(p) => format!(
            "await {}.press({});",
            locator_source(&p.selector),
            selector::quote_single(&p.text)
        ),
        Step::SelectOption(p) => format!(
            "await {}.selectOption({});",
            locator_source(&p.selector),
            selector::quote_single(&p.value)
        ),
        Step::WaitForSelector(p) => format!(
            "await page.waitForSelector({});",
            selector::quote_single(&raw_text(&p.selector))
        ),
        Step::ToBeVisible(p) => format!(
            "await expect({}){}.toBeVisible();",
            locator_source(&p.selector),
            not_infix(p.not)
        ),
        Step::ToHaveText(p) => format!(
            "await expect({}){}.toHaveText({});",
            locator_source(&p.selector),
            not_infix(p.not),
            selector::quote_single(&p.text)
        ),
        Step::ToContainText(p) => format!(
            "await expect({}){}.toContainText({});",
            locator_source(&p.selector),
            not_infix(p.not),
            selector::quote_single(&p.text)
        ),
        Step::ToHaveAttribute(p) => format!(
            "await expect({}){}.toHaveAttribute({}, {});",
            locator_source(&p.selector),
            not_infix(p.not),
            selector::quote_single(&p.attribute),
            selector::quote_single(&p.value)
        ),
        Step::Unsupported(p) => p.raw.clone(),
    }
}

/// Source form of a locator as a page expression: chains keep their
/// canonical spelling, raw selectors fall back to `page.locator('…')`.
fn locator_source(locator: &Locator) -> String {
    match locator {
        Locator::Raw(text) => format!("page.locator({})", selector::quote_single(text)),
        Locator::Chain(chain) => format!("page.{}", selector::render_chain(chain)),
    }
}

/// `waitForSelector` takes the selector string itself, not a locator.
fn raw_text(locator: &Locator) -> String {
    match locator {
        Locator::Raw(text) => text.clone(),
        Locator::Chain(chain) => selector::render_chain(chain),
    }
}

fn not_infix(not: bool) -> &'static str {
    if not {
        ".not"
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journey::{Action, GotoParams};
    use crate::parser::import_journey;

    const SCRIPT: &str = r#"
import { test, expect } from '@playwright/test';

test('test', async ({ page }) => {
  await page.goto('https://example.com');
  await page.getByRole('button', { name: 'Submit' }).first().click();
  await expect(page.locator('.success-message')).toBeVisible();
});
"#;

    #[test]
    fn test_export_contains_expected_lines() {
        let journey = import_journey("test", SCRIPT).unwrap();
        let code = generate_playwright_code(&journey);

        assert!(code.starts_with("import { test, expect } from '@playwright/test';"));
        assert!(code.contains("test('test', async ({ page }) => {"));
        assert!(code.contains("  await page.goto('https://example.com');"));
        assert!(code
            .contains(r#"  await page.getByRole('button', {"name":"Submit"}).first().click();"#));
        assert!(code.contains("  await expect(page.locator('.success-message')).toBeVisible();"));
        assert!(code.trim_end().ends_with("});"));
    }

    #[test]
    fn test_export_import_is_behaviorally_stable() {
        let journey = import_journey("test", SCRIPT).unwrap();
        let code = generate_playwright_code(&journey);
        let reimported = import_journey("test", &code).unwrap();

        assert_eq!(journey.steps, reimported.steps);
    }

    #[test]
    fn test_opaque_steps_are_emitted_verbatim() {
        let script = r#"
test('t', async ({ page }) => {
  await page.goto('https://example.com');
  await page.screenshot({ path: 'shot.png' });
});
"#;
        let journey = import_journey("t", script).unwrap();
        let code = generate_playwright_code(&journey);
        assert!(code.contains("  await page.screenshot({ path: 'shot.png' });"));
    }

    #[test]
    fn test_steps_are_emitted_in_source_order() {
        let mut journey = import_journey("t", SCRIPT).unwrap();
        journey.steps.reverse();
        let code = generate_playwright_code(&journey);

        let goto = code.find("page.goto").unwrap();
        let click = code.find(".click()").unwrap();
        let visible = code.find("toBeVisible").unwrap();
        assert!(goto < click && click < visible);
    }

    #[test]
    fn test_default_prologue_when_none_stored() {
        let journey = crate::journey::Journey::new(
            "fresh",
            None,
            vec![Action {
                step: Step::Goto(GotoParams {
                    url: "https://a".to_string(),
                }),
                source_order: 0,
            }],
        );
        let code = generate_playwright_code(&journey);
        assert!(code.starts_with(DEFAULT_PROLOGUE));
    }
}
