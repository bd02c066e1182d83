//! Persisted item lists with a derived favorites view.
//!
//! Each [`ItemKind`] owns one flat list stored under a fixed key. Every
//! mutation reads the whole list, applies the change and writes the whole
//! list back; there are no partial updates. Lists that fail to decode are
//! treated as empty rather than surfaced as errors.

use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{StoreError, StoreResult};
use crate::item::{FavoriteFilter, FavoriteItem, GeneratedItem, ItemKind};
use crate::storage::KeyValueStorage;

/// Store for generated still and pseudo-animated items.
///
/// # Example
///
/// ```
/// use wallpaper_core::{ItemKind, ItemStore, MemoryStorage};
///
/// let store = ItemStore::new(MemoryStorage::new());
/// let item = store
///     .add(ItemKind::Image, "data:image/png;base64,AA==", "ocean sunset")
///     .unwrap();
/// store.toggle_favorite(ItemKind::Image, &item.id).unwrap();
/// assert_eq!(store.favorites(Default::default()).len(), 1);
/// ```
#[derive(Clone)]
pub struct ItemStore {
    storage: Arc<dyn KeyValueStorage>,
    /// Serializes read-modify-write cycles from this process.
    write_lock: Arc<Mutex<()>>,
}

impl std::fmt::Debug for ItemStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemStore").finish_non_exhaustive()
    }
}

impl ItemStore {
    /// Create a store over the given backend.
    #[must_use]
    pub fn new(storage: impl KeyValueStorage + 'static) -> Self {
        Self::from_shared(Arc::new(storage))
    }

    /// Create a store over an already shared backend.
    #[must_use]
    pub fn from_shared(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Load the full list for `kind`, newest first.
    ///
    /// Missing keys, unreadable storage and undecodable JSON all yield an
    /// empty list.
    #[must_use]
    pub fn items(&self, kind: ItemKind) -> Vec<GeneratedItem> {
        self.load(kind).unwrap_or_else(|e| {
            tracing::warn!("Failed to read saved {kind} items: {e}");
            Vec::new()
        })
    }

    /// Look up a single item.
    #[must_use]
    pub fn get(&self, kind: ItemKind, id: &str) -> Option<GeneratedItem> {
        self.items(kind).into_iter().find(|item| item.id == id)
    }

    /// Record a newly composed image at the front of its list.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::EmptyPrompt`] for a blank prompt, or a
    /// persistence error if the list cannot be written.
    pub fn add(&self, kind: ItemKind, url: &str, prompt: &str) -> StoreResult<GeneratedItem> {
        self.add_at(kind, url, prompt, current_timestamp_ms())
    }

    /// Like [`add`](Self::add) with an explicit creation time.
    ///
    /// # Errors
    ///
    /// See [`add`](Self::add).
    pub fn add_at(
        &self,
        kind: ItemKind,
        url: &str,
        prompt: &str,
        timestamp: i64,
    ) -> StoreResult<GeneratedItem> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(StoreError::EmptyPrompt);
        }
        self.mutate(kind, |items| {
            let id = next_id(items, timestamp);
            let item = GeneratedItem::new(id, url, prompt, timestamp);
            items.insert(0, item.clone());
            Ok(item)
        })
    }

    /// Flip the favorite flag and return its new value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ItemNotFound`] if `id` is not in the list.
    pub fn toggle_favorite(&self, kind: ItemKind, id: &str) -> StoreResult<bool> {
        self.mutate(kind, |items| {
            let item = find_mut(items, id)?;
            item.is_favorite = !item.is_favorite;
            Ok(item.is_favorite)
        })
    }

    /// Set the favorite flag explicitly.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ItemNotFound`] if `id` is not in the list.
    pub fn set_favorite(&self, kind: ItemKind, id: &str, favorite: bool) -> StoreResult<()> {
        self.mutate(kind, |items| {
            find_mut(items, id)?.is_favorite = favorite;
            Ok(())
        })
    }

    /// Remove one item.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ItemNotFound`] if `id` is not in the list.
    pub fn delete(&self, kind: ItemKind, id: &str) -> StoreResult<GeneratedItem> {
        self.mutate(kind, |items| {
            let pos = items
                .iter()
                .position(|item| item.id == id)
                .ok_or_else(|| StoreError::ItemNotFound(id.to_string()))?;
            Ok(items.remove(pos))
        })
    }

    /// Remove every item of `kind`, returning how many were dropped.
    ///
    /// # Errors
    ///
    /// Returns a persistence error if the empty list cannot be written.
    pub fn clear(&self, kind: ItemKind) -> StoreResult<usize> {
        self.mutate(kind, |items| {
            let count = items.len();
            items.clear();
            Ok(count)
        })
    }

    /// Favorites across both lists, newest first.
    ///
    /// Always computed from the current source lists; nothing is cached.
    #[must_use]
    pub fn favorites(&self, filter: FavoriteFilter) -> Vec<FavoriteItem> {
        let mut favorites: Vec<FavoriteItem> = ItemKind::ALL
            .into_iter()
            .filter(|kind| filter.accepts(*kind))
            .flat_map(|kind| {
                self.items(kind)
                    .into_iter()
                    .filter(|item| item.is_favorite)
                    .map(move |item| FavoriteItem::from_item(&item, kind))
            })
            .collect();
        favorites.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        favorites
    }

    /// Overwrite the whole list for `kind`.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be serialized or written.
    pub fn save(&self, kind: ItemKind, items: &[GeneratedItem]) -> StoreResult<()> {
        let json = serde_json::to_string(items)?;
        self.storage.set(kind.storage_key(), &json)
    }

    /// Read errors propagate. Only undecodable JSON reads as empty.
    fn load(&self, kind: ItemKind) -> StoreResult<Vec<GeneratedItem>> {
        let Some(raw) = self.storage.get(kind.storage_key())? else {
            return Ok(Vec::new());
        };
        Ok(serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!("Failed to load saved {kind} items, treating as empty: {e}");
            Vec::new()
        }))
    }

    fn mutate<T>(
        &self,
        kind: ItemKind,
        f: impl FnOnce(&mut Vec<GeneratedItem>) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut items = self.load(kind)?;
        let out = f(&mut items)?;
        self.save(kind, &items)?;
        Ok(out)
    }
}

fn find_mut<'a>(items: &'a mut [GeneratedItem], id: &str) -> StoreResult<&'a mut GeneratedItem> {
    items
        .iter_mut()
        .find(|item| item.id == id)
        .ok_or_else(|| StoreError::ItemNotFound(id.to_string()))
}

/// Derive an id from the creation time, stepping forward past ids already
/// taken in this list.
fn next_id(items: &[GeneratedItem], timestamp: i64) -> String {
    let mut candidate = timestamp;
    loop {
        let id = candidate.to_string();
        if !items.iter().any(|item| item.id == id) {
            return id;
        }
        candidate += 1;
    }
}

/// Get the current Unix timestamp in milliseconds.
fn current_timestamp_ms() -> i64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| {
        // Timestamp will not exceed i64 max for millennia
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        {
            d.as_millis() as i64
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn store() -> (ItemStore, MemoryStorage) {
        let storage = MemoryStorage::new();
        (ItemStore::new(storage.clone()), storage)
    }

    #[test]
    fn test_empty_store_has_no_items() {
        let (store, _) = store();
        assert!(store.items(ItemKind::Image).is_empty());
        assert!(store.items(ItemKind::Animated).is_empty());
    }

    #[test]
    fn test_add_prepends_newest_first() {
        let (store, _) = store();
        store.add_at(ItemKind::Image, "u1", "first", 100).expect("add");
        store.add_at(ItemKind::Image, "u2", "second", 200).expect("add");

        let items = store.items(ItemKind::Image);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].prompt, "second");
        assert_eq!(items[1].prompt, "first");
        assert!(!items[0].is_favorite);
    }

    #[test]
    fn test_add_trims_and_rejects_empty_prompt() {
        let (store, _) = store();
        let item = store
            .add_at(ItemKind::Image, "u", "  padded  ", 1)
            .expect("add");
        assert_eq!(item.prompt, "padded");

        let result = store.add(ItemKind::Image, "u", "   ");
        assert!(matches!(result, Err(StoreError::EmptyPrompt)));
    }

    #[test]
    fn test_ids_unique_for_same_timestamp() {
        let (store, _) = store();
        let a = store.add_at(ItemKind::Image, "u", "a", 42).expect("add");
        let b = store.add_at(ItemKind::Image, "u", "b", 42).expect("add");
        let c = store.add_at(ItemKind::Image, "u", "c", 42).expect("add");
        assert_eq!(a.id, "42");
        assert_eq!(b.id, "43");
        assert_eq!(c.id, "44");
    }

    #[test]
    fn test_lists_are_independent() {
        let (store, _) = store();
        store.add_at(ItemKind::Image, "u", "still", 1).expect("add");
        store.add_at(ItemKind::Animated, "u", "moving", 1).expect("add");
        assert_eq!(store.items(ItemKind::Image).len(), 1);
        assert_eq!(store.items(ItemKind::Animated).len(), 1);
        assert_eq!(store.items(ItemKind::Animated)[0].prompt, "moving");
    }

    #[test]
    fn test_toggle_favorite() {
        let (store, _) = store();
        let item = store.add_at(ItemKind::Image, "u", "p", 1).expect("add");

        assert!(store.toggle_favorite(ItemKind::Image, &item.id).expect("toggle"));
        assert!(store.get(ItemKind::Image, &item.id).expect("get").is_favorite);
        assert!(!store.toggle_favorite(ItemKind::Image, &item.id).expect("toggle"));
    }

    #[test]
    fn test_toggle_missing_item_fails() {
        let (store, _) = store();
        let result = store.toggle_favorite(ItemKind::Image, "nope");
        assert!(matches!(result, Err(StoreError::ItemNotFound(_))));
    }

    #[test]
    fn test_delete_and_clear() {
        let (store, _) = store();
        let a = store.add_at(ItemKind::Image, "u", "a", 1).expect("add");
        store.add_at(ItemKind::Image, "u", "b", 2).expect("add");

        let removed = store.delete(ItemKind::Image, &a.id).expect("delete");
        assert_eq!(removed.prompt, "a");
        assert_eq!(store.items(ItemKind::Image).len(), 1);

        assert_eq!(store.clear(ItemKind::Image).expect("clear"), 1);
        assert!(store.items(ItemKind::Image).is_empty());
        assert!(matches!(
            store.delete(ItemKind::Image, &a.id),
            Err(StoreError::ItemNotFound(_))
        ));
    }

    #[test]
    fn test_corrupt_json_reads_as_empty() {
        let (store, storage) = store();
        storage
            .set(ItemKind::Image.storage_key(), "{not json")
            .expect("set");
        assert!(store.items(ItemKind::Image).is_empty());
        assert!(store.favorites(FavoriteFilter::All).is_empty());
    }

    /// Memory storage whose next `get` fails with an I/O error.
    struct FlakyStorage {
        inner: MemoryStorage,
        fail_next_get: std::sync::atomic::AtomicBool,
    }

    impl KeyValueStorage for FlakyStorage {
        fn get(&self, key: &str) -> StoreResult<Option<String>> {
            if self
                .fail_next_get
                .swap(false, std::sync::atomic::Ordering::SeqCst)
            {
                return Err(std::io::Error::other("disk unavailable").into());
            }
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> StoreResult<()> {
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> StoreResult<()> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn test_read_error_does_not_overwrite_history() {
        let inner = MemoryStorage::new();
        let flaky = Arc::new(FlakyStorage {
            inner: inner.clone(),
            fail_next_get: std::sync::atomic::AtomicBool::new(false),
        });
        let store = ItemStore::from_shared(flaky.clone());
        for (i, prompt) in ["a", "b", "c"].into_iter().enumerate() {
            store
                .add_at(ItemKind::Image, "u", prompt, i64::try_from(i).expect("index"))
                .expect("add");
        }

        flaky
            .fail_next_get
            .store(true, std::sync::atomic::Ordering::SeqCst);
        let result = store.add_at(ItemKind::Image, "u", "d", 10);
        assert!(matches!(result, Err(StoreError::Io(_))));

        let raw = inner
            .get(ItemKind::Image.storage_key())
            .expect("get")
            .expect("written");
        let kept: Vec<GeneratedItem> = serde_json::from_str(&raw).expect("decode");
        let prompts: Vec<_> = kept.iter().map(|item| item.prompt.as_str()).collect();
        assert_eq!(prompts, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_mutation_writes_full_list() {
        let (store, storage) = store();
        store.add_at(ItemKind::Animated, "u1", "a", 1).expect("add");
        store.add_at(ItemKind::Animated, "u2", "b", 2).expect("add");

        let raw = storage
            .get(ItemKind::Animated.storage_key())
            .expect("get")
            .expect("written");
        let decoded: Vec<GeneratedItem> = serde_json::from_str(&raw).expect("decode");
        assert_eq!(decoded, store.items(ItemKind::Animated));
    }

    #[test]
    fn test_favorites_aggregate_newest_first() {
        let (store, _) = store();
        let old_image = store.add_at(ItemKind::Image, "u", "old", 10).expect("add");
        let new_gif = store.add_at(ItemKind::Animated, "u", "new", 30).expect("add");
        let mid_image = store.add_at(ItemKind::Image, "u", "mid", 20).expect("add");
        store.add_at(ItemKind::Image, "u", "plain", 40).expect("add");

        for (kind, id) in [
            (ItemKind::Image, &old_image.id),
            (ItemKind::Animated, &new_gif.id),
            (ItemKind::Image, &mid_image.id),
        ] {
            store.toggle_favorite(kind, id).expect("toggle");
        }

        let all = store.favorites(FavoriteFilter::All);
        let prompts: Vec<_> = all.iter().map(|f| f.prompt.as_str()).collect();
        assert_eq!(prompts, vec!["new", "mid", "old"]);
        assert_eq!(all[0].kind, ItemKind::Animated);

        let gifs = store.favorites(FavoriteFilter::Only(ItemKind::Animated));
        assert_eq!(gifs.len(), 1);
    }

    #[test]
    fn test_favorites_reflect_current_state() {
        let (store, _) = store();
        let item = store.add_at(ItemKind::Image, "u", "p", 1).expect("add");
        store.set_favorite(ItemKind::Image, &item.id, true).expect("set");
        assert_eq!(store.favorites(FavoriteFilter::All).len(), 1);

        store.delete(ItemKind::Image, &item.id).expect("delete");
        assert!(store.favorites(FavoriteFilter::All).is_empty());
    }
}
