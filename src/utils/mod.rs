//! Utility modules shared by the pipeline and the CLI.

pub mod exec;
mod plural;

pub use plural::plural_count;
