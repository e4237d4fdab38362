//! Interactive per-field selector edits.
//!
//! An edit re-parses the submitted canonical text; only a successful parse
//! replaces the step's selector. On any failure the journey is left
//! exactly as it was and the caller gets the pinpointed reason, so the UI
//! can revert the field.

use crate::error::EditError;
use crate::journey::{Journey, Locator};
use crate::selector;

/// Replace the selector of the step at `step_index` with the parsed form
/// of `text`, returning the new locator.
pub fn edit_selector(
    journey: &mut Journey,
    step_index: usize,
    text: &str,
) -> Result<Locator, EditError> {
    let action = journey
        .steps
        .get_mut(step_index)
        .ok_or(EditError::OutOfRange(step_index))?;
    let slot = action
        .step
        .selector_mut()
        .ok_or(EditError::NoSelector(step_index))?;

    let locator = selector::parse(text)?;
    *slot = locator.clone();
    Ok(locator)
}
