//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Asset build pipeline: bundle, compile, minify and fingerprint web assets
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (searched upward from the current directory)
    #[arg(short = 'C', long, global = true, default_value = "train.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Print per-file progress
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands (default: bundle)
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub bundle: BundleArgs,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Build the public asset tree and write the manifest
    #[command(visible_alias = "b")]
    Bundle {
        #[command(flatten)]
        args: BundleArgs,
    },

    /// Update train through the configured updater command
    Upgrade,
}

/// Arguments of the bundle run, also accepted without the subcommand.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BundleArgs {
    /// Source asset directory (overrides `build.assets`)
    #[arg(value_name = "ASSETS", value_hint = clap::ValueHint::DirPath)]
    pub assets: Option<PathBuf>,

    /// Output root (overrides `build.public`)
    #[arg(value_name = "PUBLIC", value_hint = clap::ValueHint::DirPath)]
    pub public: Option<PathBuf>,

    /// Manifest file path (overrides `build.manifest`)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub manifest: Option<PathBuf>,

    /// Skip the minifier
    #[arg(long)]
    pub no_compress: bool,
}

impl Cli {
    /// Bundle arguments, whether given after `bundle` or bare.
    pub fn bundle_args(&self) -> BundleArgs {
        match &self.command {
            Some(Commands::Bundle { args }) => args.clone(),
            _ => self.bundle.clone(),
        }
    }

    pub const fn is_upgrade(&self) -> bool {
        matches!(self.command, Some(Commands::Upgrade))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_invocation_bundles() {
        let cli = Cli::parse_from(["train", "src", "www"]);
        assert!(cli.command.is_none());
        let args = cli.bundle_args();
        assert_eq!(args.assets, Some(PathBuf::from("src")));
        assert_eq!(args.public, Some(PathBuf::from("www")));
    }

    #[test]
    fn test_bundle_subcommand() {
        let cli = Cli::parse_from(["train", "bundle", "src", "--no-compress", "-v"]);
        let args = cli.bundle_args();
        assert_eq!(args.assets, Some(PathBuf::from("src")));
        assert_eq!(args.public, None);
        assert!(args.no_compress);
        assert!(cli.verbose);
    }

    #[test]
    fn test_upgrade() {
        let cli = Cli::parse_from(["train", "upgrade", "-C", "conf/train.toml"]);
        assert!(cli.is_upgrade());
        assert_eq!(cli.config, PathBuf::from("conf/train.toml"));
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
