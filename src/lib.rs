pub mod codegen;
pub mod editor;
pub mod error;
pub mod journey;
pub mod parser;
pub mod selector;

// Re-export common items
pub use codegen::generate_playwright_code;
pub use editor::edit_selector;
pub use parser::import_journey;
