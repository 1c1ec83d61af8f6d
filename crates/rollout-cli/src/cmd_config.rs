use std::path::Path;

use anyhow::Context;
use clap::Subcommand;
use rollout_store::config::{parse_value, read_config, write_config};
use rollout_store::persist::{config_path, store_path};
use rollout_store::ConsoleConfig;

// ── CLI Schema ──

#[derive(Subcommand)]
pub enum ConfigCmd {
    /// Set a config value
    Set {
        /// Config key (e.g. progressive_releases)
        key: String,
        /// Config value (true/false/number/string)
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
}

// ── Dispatch ──

pub fn run(cmd: ConfigCmd, root: &Path) -> anyhow::Result<()> {
    ensure_initialized(root)?;
    match cmd {
        ConfigCmd::Set { key, value } => set(root, &key, &value),
        ConfigCmd::Get { key } => get(root, &key),
        ConfigCmd::List => list(root),
    }
}

// ── Command Implementations ──

fn ensure_initialized(root: &Path) -> anyhow::Result<()> {
    if !store_path(root).exists() {
        anyhow::bail!("No .rollout/ workspace found. Run `rollout init` first.");
    }
    Ok(())
}

/// `rollout config set <key> <value>`
///
/// Rejects values that would make the file unreadable as [`ConsoleConfig`].
pub fn set(root: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    let path = config_path(root);
    let mut config = read_config(&path)?;
    config.insert(key.to_string(), parse_value(value));
    serde_json::from_value::<ConsoleConfig>(serde_json::Value::Object(config.clone()))
        .with_context(|| format!("invalid value for {key}: {value}"))?;
    write_config(&path, &config)?;
    println!("{key} = {value}");
    Ok(())
}

/// Effective settings: keys from the file first, then console defaults the
/// file leaves unset. The flag marks values read from the file.
fn entries(root: &Path) -> anyhow::Result<Vec<(String, serde_json::Value, bool)>> {
    let file = read_config(&config_path(root))?;
    let serde_json::Value::Object(defaults) = serde_json::to_value(ConsoleConfig::default())?
    else {
        anyhow::bail!("config did not serialize to an object");
    };
    let mut out: Vec<_> = file
        .iter()
        .map(|(k, v)| (k.clone(), v.clone(), true))
        .collect();
    out.extend(
        defaults
            .into_iter()
            .filter(|(k, _)| !file.contains_key(k))
            .map(|(k, v)| (k, v, false)),
    );
    Ok(out)
}

fn describe(value: &serde_json::Value, from_file: bool) -> String {
    if from_file {
        value.to_string()
    } else {
        format!("{value} (default)")
    }
}

/// `rollout config get <key>`
pub fn get(root: &Path, key: &str) -> anyhow::Result<()> {
    match entries(root)?.into_iter().find(|(k, _, _)| k == key) {
        Some((_, value, from_file)) => println!("{}", describe(&value, from_file)),
        None => println!("(not set)"),
    }
    Ok(())
}

/// `rollout config list`
pub fn list(root: &Path) -> anyhow::Result<()> {
    for (key, value, from_file) in entries(root)? {
        println!("{key} = {}", describe(&value, from_file));
    }
    Ok(())
}
