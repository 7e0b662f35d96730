use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::domain::ListingId;

/// Most recent ids kept between runs.
pub const MAX_SEEN_IDS: usize = 5000;

/// Listing ids already scored by earlier runs, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunState {
    #[serde(default)]
    seen_ids: Vec<ListingId>,
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to access run state {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("run state {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl RunState {
    /// Read the state file; a missing file is an empty state.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StateError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path).map_err(|source| StateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| StateError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), StateError> {
        let path = path.as_ref();
        let io_error = |source| StateError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        let rendered = serde_json::to_string_pretty(self).map_err(|source| StateError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, rendered).map_err(io_error)
    }

    pub fn seen_ids(&self) -> &[ListingId] {
        &self.seen_ids
    }

    pub fn has_seen(&self, id: &ListingId) -> bool {
        self.seen_ids.contains(id)
    }

    /// Append ids not yet recorded, then drop the oldest beyond [`MAX_SEEN_IDS`].
    pub fn record<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = ListingId>,
    {
        let mut known: HashSet<ListingId> = self.seen_ids.iter().cloned().collect();
        for id in ids {
            if !id.is_blank() && known.insert(id.clone()) {
                self.seen_ids.push(id);
            }
        }
        if self.seen_ids.len() > MAX_SEEN_IDS {
            let excess = self.seen_ids.len() - MAX_SEEN_IDS;
            self.seen_ids.drain(..excess);
        }
    }
}
