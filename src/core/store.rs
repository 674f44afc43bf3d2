//! # Listing Memory
//!
//! Listing commands remember which ids they printed so `view 3` can mean
//! "the third story I just saw". The ids live in `~/.hncli/last_ids.json`.
//!
//! Writes use atomic rename (write `.tmp`, then `rename()`).

use std::fs;
use std::io;
use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Default, Debug, PartialEq)]
pub struct LastIds {
    pub ids: Vec<u64>,
}

impl LastIds {
    /// Resolves a `view` target: 1-based positions in the last listing win,
    /// anything else is taken as a raw item id.
    pub fn resolve(&self, target: u64) -> u64 {
        match usize::try_from(target) {
            Ok(n) if n >= 1 && n <= self.ids.len() => self.ids[n - 1],
            _ => target,
        }
    }
}

pub fn save_last_ids(path: &Path, ids: &[u64]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string(&LastIds { ids: ids.to_vec() })
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    debug!("Saved {} listing ids to {}", ids.len(), path.display());
    Ok(())
}

/// Missing or unreadable files yield an empty listing.
pub fn load_last_ids(path: &Path) -> LastIds {
    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return LastIds::default(),
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            return LastIds::default();
        }
    };
    serde_json::from_str(&contents).unwrap_or_else(|e| {
        warn!("Ignoring malformed {}: {}", path.display(), e);
        LastIds::default()
    })
}
