use std::path::Path;

use rollout_core::Store;
use rollout_store::config::write_config;
use rollout_store::persist::{config_path, save_store, store_path};
use rollout_store::ConsoleConfig;

pub fn execute(root: &Path) -> anyhow::Result<()> {
    let store_file = store_path(root);
    if store_file.exists() {
        println!("Already initialized at {}", store_file.display());
        return Ok(());
    }

    let config_file = config_path(root);
    let config = ConsoleConfig::default();
    if !config_file.exists() {
        let serde_json::Value::Object(map) = serde_json::to_value(&config)? else {
            anyhow::bail!("config did not serialize to an object");
        };
        write_config(&config_file, &map)?;
    }

    let mut store = Store::default();
    ConsoleConfig::load(root)?.apply(&mut store);
    save_store(root, &store)?;

    println!("Initialized .rollout/ (track={})", store.current_track);
    Ok(())
}
