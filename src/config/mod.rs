//! Configuration loading and merging
//!
//! Precedence is CLI flags over config file values over built-in defaults.

pub mod loader;
pub mod overrides;

pub use loader::load_options;
pub use overrides::OptionOverrides;
