use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::nba_fetch::LineScoreRow;

const CACHE_DIR: &str = "hoops_terminal";
const CACHE_FILE: &str = "line_scores.json";
const CACHE_VERSION: u32 = 1;

/// Line scores of finished days, keyed by `YYYY-MM-DD`. A day stored with an
/// empty list had no games, which is different from a day never fetched.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LineScoreStore {
    version: u32,
    #[serde(default)]
    days: HashMap<String, Vec<LineScoreRow>>,
}

impl LineScoreStore {
    pub fn get(&self, date: &str) -> Option<&[LineScoreRow]> {
        self.days.get(date).map(Vec::as_slice)
    }

    pub fn insert(&mut self, date: &str, rows: Vec<LineScoreRow>) {
        self.days.insert(date.to_string(), rows);
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Drops days older than `oldest` so the file doesn't grow forever.
    pub fn retain_since(&mut self, oldest: &str) {
        self.days.retain(|date, _| date.as_str() >= oldest);
    }
}

pub fn load_line_scores() -> LineScoreStore {
    cache_path()
        .map(|path| load_from(&path))
        .unwrap_or_default()
}

pub fn save_line_scores(store: &LineScoreStore) -> Result<()> {
    let Some(path) = cache_path() else {
        return Ok(());
    };
    save_to(&path, store)
}

pub fn load_from(path: &Path) -> LineScoreStore {
    let Ok(raw) = fs::read_to_string(path) else {
        return LineScoreStore::default();
    };
    let store = serde_json::from_str::<LineScoreStore>(&raw).unwrap_or_default();
    if store.version != CACHE_VERSION {
        return LineScoreStore::default();
    }
    store
}

pub fn save_to(path: &Path, store: &LineScoreStore) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).ok();
    }
    let mut out = store.clone();
    out.version = CACHE_VERSION;
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string(&out).context("serialize line score cache")?;
    fs::write(&tmp, json).context("write line score cache")?;
    fs::rename(&tmp, path).context("swap line score cache")?;
    Ok(())
}

fn cache_path() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME")
        && !base.trim().is_empty()
    {
        return Some(PathBuf::from(base).join(CACHE_DIR).join(CACHE_FILE));
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".cache")
            .join(CACHE_DIR)
            .join(CACHE_FILE),
    )
}
