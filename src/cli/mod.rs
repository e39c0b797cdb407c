//! Command-line interface module.

mod args;
pub mod bundle;
pub mod upgrade;

pub use args::{BundleArgs, Cli};
