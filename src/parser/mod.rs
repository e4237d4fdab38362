//! Import pipeline: pasted script text in, structured journey out.
//!
//! Lexing and statement delimiting are all-or-nothing; everything after
//! that degrades per statement.

pub mod extract;
pub mod lexer;
pub mod locator;
pub mod statement;

use log::debug;

use crate::error::ImportError;
use crate::journey::{Journey, Step};

/// Parse a pasted automation script into a journey.
///
/// Fails with `ImportError::Lex` / `ImportError::Structure` when the
/// script cannot be tokenized or its journey body cannot be delimited, and
/// when not a single statement was recognizable — an import that produced
/// nothing actionable is rejected rather than stored empty.
pub fn import_journey(name: &str, code: &str) -> Result<Journey, ImportError> {
    let tokens = lexer::tokenize(code)?;
    let body = statement::split_statements(code, &tokens)?;
    let steps = extract::extract_actions(code, &body.statements);

    if !steps
        .iter()
        .any(|action| !matches!(action.step, Step::Unsupported(_)))
    {
        return Err(ImportError::Structure(
            "could not parse any actionable steps from the code provided".to_string(),
        ));
    }

    debug!(
        "imported journey '{}': {} steps ({} opaque)",
        name,
        steps.len(),
        steps
            .iter()
            .filter(|a| matches!(a.step, Step::Unsupported(_)))
            .count()
    );

    let prologue = if body.prologue.is_empty() {
        None
    } else {
        Some(body.prologue)
    };
    Ok(Journey::new(name, prologue, steps))
}
