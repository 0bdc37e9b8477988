//! Config command implementation.

use anyhow::{Context, Result};
use clap::Args;

use super::common::TreeArgs;

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(flatten)]
    pub tree: TreeArgs,

    /// Also validate the configuration and fail if it cannot be generated
    #[arg(long)]
    pub check: bool,
}

/// Print the merged configuration as YAML, ready to be saved and edited.
pub fn cmd_config(args: &ConfigArgs) -> Result<()> {
    let config = args.tree.load()?;
    if args.check {
        config.validate().context("configuration is not valid")?;
    }
    let yaml = serde_yaml::to_string(&config).context("serializing configuration")?;
    print!("{}", yaml);
    Ok(())
}
