//! The `init` command: write a starter config file.

use anyhow::{bail, Result};
use std::fs;
use std::path::Path;

use crate::config::{default_config_template, CONFIG_FILE_NAME};

pub fn init_config(force: bool) -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() && !force {
        bail!("{CONFIG_FILE_NAME} already exists. Use --force to overwrite.");
    }

    fs::write(path, default_config_template())?;
    println!("Created {CONFIG_FILE_NAME}");
    Ok(())
}
