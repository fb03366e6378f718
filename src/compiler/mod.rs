pub mod core;
pub mod expander;
pub mod label;
pub mod loader;
