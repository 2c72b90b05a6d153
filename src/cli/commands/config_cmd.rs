//! config command - Get, set, or list configuration values

use anyhow::{Context as _, Result};

use super::{load_config, Context};

/// Get a configuration value.
pub fn get(_ctx: &Context, key: &str) -> Result<()> {
    let config = load_config()?;
    let value = config.get(key)?;
    println!("{}", value);
    Ok(())
}

/// Set a configuration value.
pub fn set(ctx: &Context, key: &str, value: &str) -> Result<()> {
    let mut config = load_config()?;
    config.set(key, value)?;
    let path = config.save().context("Failed to write config")?;

    if !ctx.quiet {
        println!("Set {} = {} in {}", key, value, path.display());
    }
    Ok(())
}

/// List all configuration values.
pub fn list(ctx: &Context) -> Result<()> {
    let config = load_config()?;

    if ctx.json {
        let map: serde_json::Map<String, serde_json::Value> = config
            .entries()
            .into_iter()
            .map(|(key, value)| (key.to_string(), serde_json::Value::String(value)))
            .collect();
        crate::ui::output::print_json(&map)?;
        return Ok(());
    }

    match config.loaded_from() {
        Some(path) => println!("# {}", path.display()),
        None => println!("# defaults (no config file)"),
    }
    for (key, value) in config.entries() {
        println!("{} = {}", key, value);
    }
    Ok(())
}
