//! Integer list store
//!
//! Maps a key to an ordered list of integers. A missing key reads as an
//! empty list and is created on the first write; lists are never deleted.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::store::window::{CountSpec, Window};

/// Lists keyed by name, as stored and snapshotted
pub type ListMap = HashMap<String, Vec<i64>>;

/// How LPOP/RPOP treat elements between the list end and the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PopMode {
    /// Keep only what lies beyond the window (`list[end:]` for LPOP,
    /// `list[:len-end]` for RPOP). Elements skipped by a window that does
    /// not start at the list end are dropped.
    #[default]
    Legacy,
    /// Remove exactly the window and keep everything else
    Exact,
}

/// In-memory list store
pub struct ListStore {
    data: RwLock<ListMap>,
    mode: PopMode,
}

impl ListStore {
    /// Create a new empty store with the default pop mode
    pub fn new() -> Self {
        Self::with_mode(PopMode::default())
    }

    pub fn with_mode(mode: PopMode) -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
            mode,
        }
    }

    pub fn mode(&self) -> PopMode {
        self.mode
    }

    /// LPUSH: prepend `elements` in the given order, return the new length
    pub fn lpush(&self, key: &str, elements: &[i64]) -> Result<usize, StoreError> {
        let mut data = self.data.write().map_err(|_| StoreError::LockPoisoned)?;
        let list = data.entry(key.to_string()).or_default();
        list.splice(0..0, elements.iter().copied());
        Ok(list.len())
    }

    /// RPUSH: append `elements` in the given order, return the new length
    pub fn rpush(&self, key: &str, elements: &[i64]) -> Result<usize, StoreError> {
        let mut data = self.data.write().map_err(|_| StoreError::LockPoisoned)?;
        let list = data.entry(key.to_string()).or_default();
        list.extend_from_slice(elements);
        Ok(list.len())
    }

    /// RADDTOSET: append each element not already present in the list.
    ///
    /// Elements added earlier in the same call count as present, so a value
    /// repeated in `elements` is appended at most once.
    pub fn raddtoset(&self, key: &str, elements: &[i64]) -> Result<usize, StoreError> {
        let mut data = self.data.write().map_err(|_| StoreError::LockPoisoned)?;
        let list = data.entry(key.to_string()).or_default();

        let mut seen: HashSet<i64> = list.iter().copied().collect();
        for &element in elements {
            if seen.insert(element) {
                list.push(element);
            }
        }
        Ok(list.len())
    }

    /// LPOP: remove and return the window counted from the front
    pub fn lpop(&self, key: &str, count: CountSpec) -> Result<Vec<i64>, StoreError> {
        let mut data = self.data.write().map_err(|_| StoreError::LockPoisoned)?;
        let list = match data.get_mut(key) {
            Some(list) if !list.is_empty() => list,
            _ => return Err(StoreError::EmptyOrMissing),
        };
        let window = Window::resolve(count, list.len())?;

        let removed = match self.mode {
            PopMode::Legacy => {
                if window.start > 0 {
                    warn!(
                        key,
                        dropped = window.start,
                        "LPOP window skips the list head, skipped elements are dropped"
                    );
                }
                let removed = list[window.start..window.end].to_vec();
                list.drain(..window.end);
                removed
            }
            PopMode::Exact => list.drain(window.start..window.end).collect(),
        };

        debug!(key, removed = removed.len(), remaining = list.len(), "LPOP");
        Ok(removed)
    }

    /// RPOP: remove and return the window counted from the back.
    ///
    /// Back-relative offsets `[start, end)` select absolute indices
    /// `[len - end, len - start)`; the removed elements keep list order.
    pub fn rpop(&self, key: &str, count: CountSpec) -> Result<Vec<i64>, StoreError> {
        let mut data = self.data.write().map_err(|_| StoreError::LockPoisoned)?;
        let list = match data.get_mut(key) {
            Some(list) if !list.is_empty() => list,
            _ => return Err(StoreError::EmptyOrMissing),
        };
        let len = list.len();
        let window = Window::resolve(count, len)?;
        let (from, to) = (len - window.end, len - window.start);

        let removed = match self.mode {
            PopMode::Legacy => {
                if window.start > 0 {
                    warn!(
                        key,
                        dropped = window.start,
                        "RPOP window skips the list tail, skipped elements are dropped"
                    );
                }
                let removed = list[from..to].to_vec();
                list.truncate(from);
                removed
            }
            PopMode::Exact => list.drain(from..to).collect(),
        };

        debug!(key, removed = removed.len(), remaining = list.len(), "RPOP");
        Ok(removed)
    }

    /// LSET: overwrite the element at `index`, negative indices count from the end
    pub fn lset(&self, key: &str, index: i64, element: i64) -> Result<(), StoreError> {
        let mut data = self.data.write().map_err(|_| StoreError::LockPoisoned)?;
        let list = data.get_mut(key).ok_or(StoreError::IndexOutOfRange)?;
        let idx = resolve_index(index, list.len())?;
        list[idx] = element;
        Ok(())
    }

    /// LGET: read the element at `index`, negative indices count from the end
    pub fn lget(&self, key: &str, index: i64) -> Result<i64, StoreError> {
        let data = self.data.read().map_err(|_| StoreError::LockPoisoned)?;
        let list = data.get(key).ok_or(StoreError::IndexOutOfRange)?;
        let idx = resolve_index(index, list.len())?;
        Ok(list[idx])
    }

    /// Length of the list at `key`, zero when absent
    pub fn len(&self, key: &str) -> Result<usize, StoreError> {
        let data = self.data.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(data.get(key).map(Vec::len).unwrap_or(0))
    }

    /// Copy of the whole list at `key`, empty when absent
    pub fn range(&self, key: &str) -> Result<Vec<i64>, StoreError> {
        let data = self.data.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(data.get(key).cloned().unwrap_or_default())
    }

    /// Copy of every list, for snapshotting
    pub fn snapshot(&self) -> Result<ListMap, StoreError> {
        let data = self.data.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(data.clone())
    }

    /// Replace all lists with `lists`
    pub fn restore(&self, lists: ListMap) -> Result<(), StoreError> {
        let mut data = self.data.write().map_err(|_| StoreError::LockPoisoned)?;
        *data = lists;
        Ok(())
    }
}

impl Default for ListStore {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve_index(index: i64, len: usize) -> Result<usize, StoreError> {
    let len = len as i64;
    if index >= len || index < -len {
        return Err(StoreError::IndexOutOfRange);
    }
    let idx = if index < 0 { len + index } else { index };
    Ok(idx as usize)
}
