use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rollout_core::Store;
use tracing::info;

/// Directory holding console files, relative to the working directory.
pub const ROLLOUT_DIR: &str = ".rollout";

/// Location: `{root}/.rollout/store.json`
pub fn store_path(root: &Path) -> PathBuf {
    root.join(ROLLOUT_DIR).join("store.json")
}

/// Location: `{root}/.rollout/config.json`
pub fn config_path(root: &Path) -> PathBuf {
    root.join(ROLLOUT_DIR).join("config.json")
}

/// Replace `path` in one step: write a sibling temp file, sync it, rename it
/// over the target. Creates `.rollout/` on first use.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .with_context(|| format!("no parent directory: {}", path.display()))?;
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .with_context(|| format!("replacing {}", path.display()))?;
    Ok(())
}

/// Load the store snapshot. Returns None if it doesn't exist.
pub fn load_store(root: &Path) -> Result<Option<Store>> {
    let path = store_path(root);
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path)
        .with_context(|| format!("reading store: {}", path.display()))?;
    let store: Store = serde_json::from_str(&content)
        .with_context(|| format!("parsing store: {}", path.display()))?;
    info!(
        path = %path.display(),
        revisions = store.revisions.len(),
        releases = store.releases.len(),
        "loaded store"
    );
    Ok(Some(store))
}

pub fn save_store(root: &Path, store: &Store) -> Result<()> {
    let path = store_path(root);
    let data = serde_json::to_string_pretty(store)?;
    write_atomic(&path, data.as_bytes())
        .with_context(|| format!("saving store: {}", path.display()))?;
    info!(path = %path.display(), "saved store");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{release, rev};

    #[test]
    fn store_path_format() {
        let p = store_path(Path::new("/project"));
        assert!(p.to_string_lossy().contains(".rollout"));
        assert!(p.to_string_lossy().ends_with("store.json"));
    }

    #[test]
    fn load_nonexistent_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_store(dir.path()).unwrap().is_none());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = Store::default();
        store.revisions.insert(3, rev(3, &["amd64"]));
        store.releases.push(release(Some(3), "latest", "edge", "amd64", 100));
        store.current_track = "latest".into();

        save_store(dir.path(), &store).unwrap();
        let loaded = load_store(dir.path()).unwrap().unwrap();
        assert_eq!(loaded, store);
    }

    #[test]
    fn corrupt_store_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        write_atomic(&store_path(dir.path()), b"not json").unwrap();
        let err = load_store(dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("parsing store"));
    }
}
