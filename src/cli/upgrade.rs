//! `train upgrade`: replace the running binary through the configured updater.

use anyhow::{Context, Result};

use crate::config::UpgradeConfig;
use crate::log;
use crate::utils::exec::Cmd;

/// Run the updater in a PTY so its progress output renders as on a terminal.
pub fn run(upgrade: &UpgradeConfig) -> Result<()> {
    let name = upgrade.display_name();
    log!("upgrade"; "running `{}`", upgrade.command.join(" "));

    Cmd::from_slice(&upgrade.command)
        .pty(true)
        .run()
        .with_context(|| format!("upgrade through `{name}` failed"))?;

    log!("upgrade"; "done");
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_failing_updater_is_reported() {
        let upgrade = UpgradeConfig {
            command: vec!["false".into()],
        };
        let err = run(&upgrade).unwrap_err();
        assert!(err.to_string().contains("false"));
    }
}
