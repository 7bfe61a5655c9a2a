// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use tk_client::config::config_path;
use tk_client::ClientConfig;

use crate::error::Result;

pub fn run(url: String, anon_key: String, table: String) -> Result<()> {
    let path = config_path();
    let mut config = if path.exists() {
        ClientConfig::load(&path)?
    } else {
        ClientConfig::default()
    };
    config.url = url;
    config.anon_key = anon_key;
    config.table = table;
    config.validate()?;
    config.save(&path)?;

    println!("Saved configuration to {}", path.display());
    Ok(())
}
