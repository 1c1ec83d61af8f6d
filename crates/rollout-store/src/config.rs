use std::path::Path;

use anyhow::{Context, Result};
use rollout_core::{Store, DEFAULT_TRACK};
use serde::{Deserialize, Serialize};

use crate::persist::{config_path, write_atomic};

/// Console settings from `.rollout/config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Enables progressive rollout state and classification.
    pub progressive_releases: bool,
    /// Tracks offered in addition to the ones seen in the release log.
    pub tracks: Vec<String>,
    /// Track selected when the store has none.
    pub default_track: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            progressive_releases: false,
            tracks: vec![DEFAULT_TRACK.to_string()],
            default_track: DEFAULT_TRACK.to_string(),
        }
    }
}

impl ConsoleConfig {
    /// Typed view of the config file. Missing file or keys use defaults.
    pub fn load(root: &Path) -> Result<Self> {
        let map = read_config(&config_path(root))?;
        serde_json::from_value(serde_json::Value::Object(map))
            .with_context(|| format!("invalid config: {}", config_path(root).display()))
    }

    /// Copy settings into the store's options.
    pub fn apply(&self, store: &mut Store) {
        store.options.flags.is_progressive_releases_enabled = self.progressive_releases;
        for track in &self.tracks {
            if !store.options.tracks.contains(track) {
                store.options.tracks.push(track.clone());
            }
        }
        if store.current_track.is_empty() {
            store.current_track = self.default_track.clone();
        }
    }
}

/// Raw key/value view of `.rollout/config.json`.
///
/// A missing file reads as an empty map. Keys the console does not know are
/// kept so `config set` never drops them.
pub fn read_config(path: &Path) -> Result<serde_json::Map<String, serde_json::Value>> {
    if !path.exists() {
        return Ok(serde_json::Map::new());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config: {}", path.display()))?;
    match serde_json::from_str::<serde_json::Value>(&content)
        .with_context(|| format!("parsing config: {}", path.display()))?
    {
        serde_json::Value::Object(map) => Ok(map),
        _ => anyhow::bail!("config is not a JSON object: {}", path.display()),
    }
}

pub fn write_config(path: &Path, config: &serde_json::Map<String, serde_json::Value>) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    write_atomic(path, json.as_bytes())
        .with_context(|| format!("writing config: {}", path.display()))
}

/// Interpret a `rollout config set` argument: `true`/`false`, an integer, a
/// finite float, otherwise the string itself.
pub fn parse_value(s: &str) -> serde_json::Value {
    use serde_json::Value;

    if let Ok(b) = s.parse::<bool>() {
        return Value::Bool(b);
    }
    if let Ok(n) = s.parse::<i64>() {
        return Value::from(n);
    }
    s.parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map_or_else(|| Value::String(s.to_string()), Value::Number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ConsoleConfig::load(dir.path()).unwrap();
        assert_eq!(cfg, ConsoleConfig::default());
    }

    #[test]
    fn partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let mut map = serde_json::Map::new();
        map.insert("progressive_releases".into(), parse_value("true"));
        write_config(&config_path(dir.path()), &map).unwrap();

        let cfg = ConsoleConfig::load(dir.path()).unwrap();
        assert!(cfg.progressive_releases);
        assert_eq!(cfg.default_track, "latest");
    }

    #[test]
    fn wrong_type_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut map = serde_json::Map::new();
        map.insert("progressive_releases".into(), parse_value("maybe"));
        write_config(&config_path(dir.path()), &map).unwrap();
        assert!(ConsoleConfig::load(dir.path()).is_err());
    }

    #[test]
    fn apply_sets_flags_tracks_and_default_track() {
        let cfg = ConsoleConfig {
            progressive_releases: true,
            tracks: vec!["latest".into(), "22.04".into()],
            default_track: "22.04".into(),
        };
        let mut store = Store::default();
        cfg.apply(&mut store);
        assert!(store.options.flags.is_progressive_releases_enabled);
        assert_eq!(store.options.tracks, vec!["latest".to_string(), "22.04".to_string()]);
        assert_eq!(store.current_track, "22.04");

        store.current_track = "latest".into();
        cfg.apply(&mut store);
        assert_eq!(store.current_track, "latest");
    }

    #[test]
    fn parse_value_types() {
        assert_eq!(parse_value("false"), serde_json::Value::Bool(false));
        assert_eq!(parse_value("7"), serde_json::json!(7));
        assert_eq!(parse_value("0.5"), serde_json::json!(0.5));
        assert_eq!(parse_value("edge"), serde_json::json!("edge"));
        assert_eq!(parse_value("NaN"), serde_json::json!("NaN"));
        assert_eq!(parse_value("22.04/beta"), serde_json::json!("22.04/beta"));
    }

    #[test]
    fn non_object_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write_atomic(&config_path(dir.path()), b"[1, 2]").unwrap();
        let err = ConsoleConfig::load(dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("not a JSON object"));
    }
}
