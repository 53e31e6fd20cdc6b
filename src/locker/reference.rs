//! Operator-maintained reference lists
//!
//! Two flat text files, one cosmetic id per line: the exclusivity list (its
//! order is the presentation order of the exclusive bucket) and the
//! most-wanted list. Loaded once per login and read-only afterwards.

use crate::logger::{self, LogTag};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct RankedList {
    ids: Vec<String>,
    positions: HashMap<String, usize>,
}

impl RankedList {
    /// Lines are trimmed and lowercased; blank lines and `#` comments are
    /// skipped; a repeated id keeps its first position.
    pub fn from_text(text: &str) -> Self {
        let mut list = Self::default();
        for line in text.lines() {
            let id = line.trim();
            if id.is_empty() || id.starts_with('#') {
                continue;
            }
            let id = id.to_lowercase();
            if !list.positions.contains_key(&id) {
                list.positions.insert(id.clone(), list.ids.len());
                list.ids.push(id);
            }
        }
        list
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(&id.to_lowercase())
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(&id.to_lowercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceLists {
    pub exclusive: RankedList,
    pub popular: RankedList,
}

impl ReferenceLists {
    pub fn from_text(exclusive: &str, popular: &str) -> Self {
        Self {
            exclusive: RankedList::from_text(exclusive),
            popular: RankedList::from_text(popular),
        }
    }

    /// A missing or unreadable file yields an empty list and a warning
    pub fn load(exclusive_path: &Path, popular_path: &Path) -> Self {
        let lists = Self {
            exclusive: load_list(exclusive_path, "exclusive"),
            popular: load_list(popular_path, "most wanted"),
        };
        logger::debug(
            LogTag::Locker,
            &format!(
                "Reference lists loaded: {} exclusive, {} most wanted",
                lists.exclusive.len(),
                lists.popular.len()
            ),
        );
        lists
    }

    pub fn is_exclusive(&self, id: &str) -> bool {
        self.exclusive.contains(id)
    }

    pub fn is_popular(&self, id: &str) -> bool {
        self.popular.contains(id)
    }
}

fn load_list(path: &Path, label: &str) -> RankedList {
    match std::fs::read_to_string(path) {
        Ok(text) => RankedList::from_text(&text),
        Err(e) => {
            logger::warning(
                LogTag::Locker,
                &format!(
                    "Cannot read {} list {}: {}, using an empty list",
                    label,
                    path.display(),
                    e
                ),
            );
            RankedList::default()
        }
    }
}
