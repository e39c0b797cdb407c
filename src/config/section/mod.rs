//! Configuration section definitions.
//!
//! Each module corresponds to a section in `train.toml`:
//!
//! | Module      | TOML Section          | Purpose                          |
//! |-------------|-----------------------|----------------------------------|
//! | `build`     | `[build]`             | Source/output paths, partials    |
//! | `compress`  | `[build.compress]`    | Java minifier                    |
//! | `compilers` | `[build.compilers]`   | Preprocessor commands            |
//! | `upgrade`   | `[upgrade]`           | Self-update command              |

mod build;
mod compilers;
mod compress;
mod upgrade;

pub use build::BuildSectionConfig;
pub use compilers::CompilersConfig;
pub use compress::CompressConfig;
pub use upgrade::UpgradeConfig;
