use std::fs;
use std::path::Path;
use std::time::SystemTime;

use anyhow::{Context, Result};

use crate::state::Snapshot;

pub fn parse_snapshot_json(raw: &str) -> Result<Snapshot> {
    serde_json::from_str(raw.trim()).context("invalid snapshot json")
}

pub fn load(path: &Path) -> Result<Snapshot> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read snapshot {}", path.display()))?;
    parse_snapshot_json(&raw).with_context(|| format!("parse snapshot {}", path.display()))
}

pub fn save(path: &Path, snapshot: &Snapshot) -> Result<()> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir).ok();
    }
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(snapshot).context("serialize snapshot")?;
    fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("swap snapshot {}", path.display()))?;
    Ok(())
}

pub fn modified_at(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}
