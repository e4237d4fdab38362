use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// A structured, editable journey produced by one import pass.
///
/// The journey is replaced wholesale on re-import; individual steps are
/// mutated in place by the editor. Persistence belongs to the hosting
/// application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Journey {
    /// Import-session identity.
    pub id: Uuid,

    pub name: String,

    /// Source text preceding the test block (imports, top-level
    /// declarations), re-emitted verbatim on export. Empty when the pasted
    /// script had no prologue.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prologue: Option<String>,

    pub steps: Vec<Action>,

    pub imported_at: DateTime<Utc>,
}

impl Journey {
    pub fn new(name: impl Into<String>, prologue: Option<String>, steps: Vec<Action>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            prologue,
            steps,
            imported_at: Utc::now(),
        }
    }
}

/// One step of a journey, in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    #[serde(flatten)]
    pub step: Step,

    /// Stable position in the imported script; defines replay and export
    /// order.
    #[serde(default)]
    pub source_order: usize,
}

/// All recognized step shapes. Serializes to the `{action, params}` wire
/// form the hosting application stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "params", rename_all = "camelCase")]
pub enum Step {
    // Navigation
    Goto(GotoParams),

    // Interactions
    Click(TargetParams),
    Fill(FillParams),
    Type(FillParams),
    Press(FillParams),
    SelectOption(SelectOptionParams),
    WaitForSelector(TargetParams),

    // Assertions
    ToBeVisible(AssertParams),
    ToHaveText(AssertTextParams),
    ToContainText(AssertTextParams),
    ToHaveAttribute(AssertAttributeParams),

    /// A statement the importer did not recognize, preserved verbatim and
    /// re-emitted unchanged on export.
    Unsupported(UnsupportedParams),
}

impl Step {
    /// Wire name of the step's action, as shown in the editor row.
    pub fn name(&self) -> &'static str {
        match self {
            Step::Goto(_) => "goto",
            Step::Click(_) => "click",
            Step::Fill(_) => "fill",
            Step::Type(_) => "type",
            Step::Press(_) => "press",
            Step::SelectOption(_) => "selectOption",
            Step::WaitForSelector(_) => "waitForSelector",
            Step::ToBeVisible(_) => "toBeVisible",
            Step::ToHaveText(_) => "toHaveText",
            Step::ToContainText(_) => "toContainText",
            Step::ToHaveAttribute(_) => "toHaveAttribute",
            Step::Unsupported(_) => "unsupported",
        }
    }

    /// The step's primary selector, if it targets an element.
    pub fn selector(&self) -> Option<&Locator> {
        match self {
            Step::Click(p) | Step::WaitForSelector(p) => Some(&p.selector),
            Step::Fill(p) | Step::Type(p) | Step::Press(p) => Some(&p.selector),
            Step::SelectOption(p) => Some(&p.selector),
            Step::ToBeVisible(p) => Some(&p.selector),
            Step::ToHaveText(p) | Step::ToContainText(p) => Some(&p.selector),
            Step::ToHaveAttribute(p) => Some(&p.selector),
            Step::Goto(_) | Step::Unsupported(_) => None,
        }
    }

    pub fn selector_mut(&mut self) -> Option<&mut Locator> {
        match self {
            Step::Click(p) | Step::WaitForSelector(p) => Some(&mut p.selector),
            Step::Fill(p) | Step::Type(p) | Step::Press(p) => Some(&mut p.selector),
            Step::SelectOption(p) => Some(&mut p.selector),
            Step::ToBeVisible(p) => Some(&mut p.selector),
            Step::ToHaveText(p) | Step::ToContainText(p) => Some(&mut p.selector),
            Step::ToHaveAttribute(p) => Some(&mut p.selector),
            Step::Goto(_) | Step::Unsupported(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GotoParams {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetParams {
    pub selector: Locator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillParams {
    pub selector: Locator,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOptionParams {
    pub selector: Locator,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssertParams {
    pub selector: Locator,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub not: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssertTextParams {
    pub selector: Locator,
    pub text: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub not: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssertAttributeParams {
    pub selector: Locator,
    pub attribute: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub not: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnsupportedParams {
    /// The statement's raw source text, exactly as pasted.
    pub raw: String,
}

/// An element selector: either an opaque CSS/XPath string rendered
/// verbatim, or a structured locator chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Locator {
    Raw(String),
    Chain(LocatorChain),
}

impl Locator {
    pub fn raw(text: impl Into<String>) -> Self {
        Locator::Raw(text.into())
    }
}

/// A base locating call plus zero or more positionally-meaningful
/// modifiers. Modifier order is exactly the order written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocatorChain {
    pub base: BaseLocator,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<Modifier>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseLocator {
    pub method: LocatorMethod,

    /// The implicit first argument (role name, text, CSS selector, ...).
    pub positional: String,

    /// Named options, e.g. `name` / `exact` for `getByRole`. Keys are
    /// validated against the method's schema; canonical rendering orders
    /// them by the schema, not by insertion.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, OptionValue>,
}

/// The fixed set of recognized base locating methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LocatorMethod {
    GetByRole,
    GetByText,
    GetByLabel,
    GetByPlaceholder,
    GetByTestId,
    GetByAltText,
    GetByTitle,
    Locator,
}

impl LocatorMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocatorMethod::GetByRole => "getByRole",
            LocatorMethod::GetByText => "getByText",
            LocatorMethod::GetByLabel => "getByLabel",
            LocatorMethod::GetByPlaceholder => "getByPlaceholder",
            LocatorMethod::GetByTestId => "getByTestId",
            LocatorMethod::GetByAltText => "getByAltText",
            LocatorMethod::GetByTitle => "getByTitle",
            LocatorMethod::Locator => "locator",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "getByRole" => Some(LocatorMethod::GetByRole),
            "getByText" => Some(LocatorMethod::GetByText),
            "getByLabel" => Some(LocatorMethod::GetByLabel),
            "getByPlaceholder" => Some(LocatorMethod::GetByPlaceholder),
            "getByTestId" => Some(LocatorMethod::GetByTestId),
            "getByAltText" => Some(LocatorMethod::GetByAltText),
            "getByTitle" => Some(LocatorMethod::GetByTitle),
            "locator" => Some(LocatorMethod::Locator),
            _ => None,
        }
    }
}

/// Chain modifiers. `nth` keeps its index exactly as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "camelCase")]
pub enum Modifier {
    First,
    Last,
    Nth { index: u32 },
}

/// A literal option value inside a locator options object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Str(String),
}
