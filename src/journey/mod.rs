pub mod types;

pub use types::{
    Action, AssertAttributeParams, AssertParams, AssertTextParams, BaseLocator, FillParams,
    GotoParams, Journey, Locator, LocatorChain, LocatorMethod, Modifier, OptionValue,
    SelectOptionParams, Step, TargetParams, UnsupportedParams,
};
