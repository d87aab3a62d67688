//! JSON snapshot storage for item records.

use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use fs2::FileExt;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use lostfound_core::error::StorageError;
use lostfound_core::types::{DeletedItem, Item, ItemId, ItemStatus, MediaRef, NewItem};
use lostfound_core::{Error, ItemStore, MediaStore, Result};

/// Record store backed by a single JSON array on disk.
///
/// The whole collection lives in memory behind a mutex. Each mutation
/// builds the next collection, rewrites the snapshot, and only then
/// replaces the in-memory state, all while holding the lock.
pub struct FileItemStore {
    path: PathBuf,
    items: Mutex<Vec<Item>>,
    media: Arc<dyn MediaStore>,
}

impl std::fmt::Debug for FileItemStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileItemStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl FileItemStore {
    /// Load the snapshot at `path`, creating an empty one if none exists.
    ///
    /// `media` is used to clean up images when their item is deleted.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>, media: Arc<dyn MediaStore>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let items = match read_snapshot(&path)? {
            Some(items) => {
                debug!(count = items.len(), "Loaded snapshot");
                items
            }
            None => {
                write_snapshot(&path, &[])?;
                debug!("Initialized empty snapshot");
                Vec::new()
            }
        };

        Ok(Self {
            path,
            items: Mutex::new(items),
            media,
        })
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the snapshot from disk, replacing the in-memory collection.
    pub async fn reload(&self) -> Result<Vec<Item>> {
        let mut items = self.items.lock().await;
        let loaded = read_snapshot(&self.path)?.unwrap_or_default();
        *items = loaded.clone();
        Ok(loaded)
    }

    fn position(items: &[Item], id: &ItemId) -> Result<usize> {
        items
            .iter()
            .position(|item| &item.id == id)
            .ok_or_else(|| Error::not_found(id.as_str()))
    }
}

/// Next id: the current epoch milliseconds, bumped past every existing
/// millisecond id so ids stay unique when several items land in the same
/// millisecond.
///
/// If the highest id is `u64::MAX` the next free value at or after the
/// clock is used instead, wrapping to zero.
fn next_id(items: &[Item], now_millis: u64) -> ItemId {
    let taken: HashSet<u64> = items.iter().filter_map(|item| item.id.as_millis()).collect();
    let highest = taken.iter().copied().max();

    let bumped = match highest {
        Some(highest) if highest >= now_millis => highest.checked_add(1),
        _ => Some(now_millis),
    };

    let millis = bumped.unwrap_or_else(|| {
        (now_millis..=u64::MAX)
            .chain(0..now_millis)
            .find(|millis| !taken.contains(millis))
            // A finite collection always leaves a value free.
            .unwrap_or(now_millis)
    });

    ItemId::from_millis(millis)
}

fn read_snapshot(path: &Path) -> Result<Option<Vec<Item>>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StorageError::io(path, e).into()),
    };

    let items = serde_json::from_str(&content).map_err(|source| StorageError::Corrupt {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(Some(items))
}

/// Rewrite the snapshot: write a sibling temp file, then rename over the
/// original while holding an exclusive lock file.
fn write_snapshot(path: &Path, items: &[Item]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
    }

    let content = serde_json::to_string_pretty(items).map_err(StorageError::Encode)?;

    let lock_path = path.with_extension("lock");
    let lock_file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(&lock_path)
        .map_err(|e| StorageError::io(&lock_path, e))?;

    lock_file
        .lock_exclusive()
        .map_err(|e| StorageError::io(&lock_path, e))?;

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, &content).map_err(|e| StorageError::io(&temp_path, e))?;
    fs::rename(&temp_path, path).map_err(|e| StorageError::io(path, e))?;

    lock_file
        .unlock()
        .map_err(|e| StorageError::io(&lock_path, e))?;

    Ok(())
}

#[async_trait]
impl ItemStore for FileItemStore {
    async fn list(&self) -> Result<Vec<Item>> {
        Ok(self.items.lock().await.clone())
    }

    async fn get(&self, id: &ItemId) -> Result<Item> {
        let items = self.items.lock().await;
        let index = Self::position(&items, id)?;
        Ok(items[index].clone())
    }

    #[instrument(skip(self, item))]
    async fn create(&self, item: NewItem) -> Result<Item> {
        let item = item.validated()?;

        let mut items = self.items.lock().await;
        let now = Utc::now();
        let id = next_id(&items, now.timestamp_millis().max(0) as u64);
        let created = item.into_item(id, now);

        let mut next = Vec::with_capacity(items.len() + 1);
        next.push(created.clone());
        next.extend(items.iter().cloned());

        write_snapshot(&self.path, &next)?;
        *items = next;

        debug!(id = %created.id, "Created item");

        Ok(created)
    }

    #[instrument(skip(self))]
    async fn update_status(&self, id: &ItemId, status: ItemStatus) -> Result<Item> {
        let mut items = self.items.lock().await;
        let index = Self::position(&items, id)?;

        let mut next = items.clone();
        next[index].status = status;
        next[index].updated_at = Some(Utc::now());
        let updated = next[index].clone();

        write_snapshot(&self.path, &next)?;
        *items = next;

        debug!(id = %id, %status, "Updated item status");

        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &ItemId) -> Result<DeletedItem> {
        let mut items = self.items.lock().await;
        let index = Self::position(&items, id)?;

        let mut next = items.clone();
        let removed = next.remove(index);

        write_snapshot(&self.path, &next)?;
        *items = next;

        if let Some(filename) = removed.image_filename() {
            match MediaRef::new(filename) {
                Ok(media) => {
                    if let Err(e) = self.media.remove(&media).await {
                        warn!(id = %id, media = %media, error = %e, "Failed to delete image file");
                    }
                }
                Err(e) => {
                    warn!(id = %id, image_url = %removed.image_url, error = %e, "Skipping image cleanup");
                }
            }
        }

        debug!(id = %id, "Deleted item");

        Ok(DeletedItem::new(removed.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use lostfound_core::MediaUpload;
    use lostfound_core::error::ValidationError;
    use tempfile::TempDir;

    use crate::MediaDir;

    fn wallet() -> NewItem {
        NewItem::new("Black Wallet", "Lost near library", "jane@example.com")
    }

    fn open_store(dir: &TempDir) -> (FileItemStore, Arc<MediaDir>) {
        let media = Arc::new(MediaDir::open(dir.path().join("uploads")).unwrap());
        let store = FileItemStore::open(dir.path().join("items.json"), media.clone()).unwrap();
        (store, media)
    }

    /// Media store whose removals always fail.
    struct BrokenMedia {
        removals: AtomicUsize,
    }

    #[async_trait]
    impl MediaStore for BrokenMedia {
        async fn store(&self, _upload: MediaUpload) -> Result<MediaRef> {
            unreachable!("not used by the record store")
        }

        async fn remove(&self, media: &MediaRef) -> Result<()> {
            self.removals.fetch_add(1, Ordering::SeqCst);
            Err(StorageError::io(
                media.as_str(),
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            )
            .into())
        }
    }

    #[tokio::test]
    async fn open_initializes_empty_snapshot() {
        let dir = TempDir::new().unwrap();
        let (store, _) = open_store(&dir);

        assert!(store.list().await.unwrap().is_empty());
        let content = fs::read_to_string(store.path()).unwrap();
        assert!(serde_json::from_str::<Vec<Item>>(&content).unwrap().is_empty());
    }

    #[tokio::test]
    async fn open_rejects_corrupt_snapshot() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("items.json"), "{not json").unwrap();

        let media = Arc::new(MediaDir::open(dir.path().join("uploads")).unwrap());
        let err = FileItemStore::open(dir.path().join("items.json"), media).unwrap_err();
        assert!(matches!(err, Error::Storage(StorageError::Corrupt { .. })));
    }

    #[tokio::test]
    async fn create_wallet_scenario() {
        let dir = TempDir::new().unwrap();
        let (store, _) = open_store(&dir);

        let item = store.create(wallet()).await.unwrap();
        assert_eq!(item.status, ItemStatus::Active);
        assert_eq!(item.location, "");
        assert!(!item.id.as_str().is_empty());
        assert!(item.updated_at.is_none());
        assert!(item.created_at <= Utc::now());
    }

    #[tokio::test]
    async fn create_prepends_with_unique_ids() {
        let dir = TempDir::new().unwrap();
        let (store, _) = open_store(&dir);

        let mut ids = Vec::new();
        for i in 0..20 {
            let item = store
                .create(NewItem::new(format!("Item {}", i), "desc", "contact"))
                .await
                .unwrap();
            ids.push(item.id);
        }

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 20);
        assert_eq!(listed[0].title, "Item 19");
        assert_eq!(listed[19].title, "Item 0");

        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), ids.len());
    }

    #[tokio::test]
    async fn create_with_missing_field_leaves_collection_untouched() {
        let dir = TempDir::new().unwrap();
        let (store, _) = open_store(&dir);
        store.create(wallet()).await.unwrap();
        let before = fs::read_to_string(store.path()).unwrap();

        let err = store
            .create(NewItem::new("Keys", "", "bob@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Validation(ValidationError::MissingFields)
        ));
        assert_eq!(store.list().await.unwrap().len(), 1);
        assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
    }

    #[tokio::test]
    async fn update_status_resolves_item() {
        let dir = TempDir::new().unwrap();
        let (store, _) = open_store(&dir);
        let item = store.create(wallet()).await.unwrap();

        let updated = store
            .update_status(&item.id, ItemStatus::Resolved)
            .await
            .unwrap();
        assert_eq!(updated.status, ItemStatus::Resolved);
        assert!(updated.updated_at.is_some());
        assert_eq!(updated.created_at, item.created_at);

        let listed = store.list().await.unwrap();
        assert_eq!(listed[0].status, ItemStatus::Resolved);
    }

    #[tokio::test]
    async fn update_status_twice_refreshes_timestamp() {
        let dir = TempDir::new().unwrap();
        let (store, _) = open_store(&dir);
        let item = store.create(wallet()).await.unwrap();

        let first = store
            .update_status(&item.id, ItemStatus::Resolved)
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = store
            .update_status(&item.id, ItemStatus::Resolved)
            .await
            .unwrap();

        assert!(second.updated_at > first.updated_at);
    }

    #[tokio::test]
    async fn update_status_unknown_id() {
        let dir = TempDir::new().unwrap();
        let (store, _) = open_store(&dir);

        let err = store
            .update_status(&ItemId::from_millis(1), ItemStatus::Resolved)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[tokio::test]
    async fn delete_then_delete_again() {
        let dir = TempDir::new().unwrap();
        let (store, _) = open_store(&dir);
        let item = store.create(wallet()).await.unwrap();

        let deleted = store.delete(&item.id).await.unwrap();
        assert_eq!(deleted.deleted_id, item.id);
        assert_eq!(deleted.message, "Item deleted successfully");
        assert!(store.list().await.unwrap().is_empty());

        let err = store.delete(&item.id).await.unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[tokio::test]
    async fn delete_unknown_id_leaves_collection_untouched() {
        let dir = TempDir::new().unwrap();
        let (store, _) = open_store(&dir);
        store.create(wallet()).await.unwrap();

        let err = store.delete(&ItemId::from_millis(1)).await.unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_removes_image_file() {
        let dir = TempDir::new().unwrap();
        let (store, media) = open_store(&dir);

        let stored = media
            .store(MediaUpload::new(vec![0xff, 0xd8], "wallet.jpg", "image/jpeg"))
            .await
            .unwrap();
        let path = media.path(&stored);
        assert!(path.exists());

        let item = store
            .create(wallet().with_image_url(format!("http://localhost:3000/uploads/{}", stored)))
            .await
            .unwrap();

        store.delete(&item.id).await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn delete_succeeds_when_image_already_missing() {
        let dir = TempDir::new().unwrap();
        let (store, _) = open_store(&dir);

        let item = store
            .create(wallet().with_image_url("http://localhost:3000/uploads/1-gone.png"))
            .await
            .unwrap();

        store.delete(&item.id).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_ignores_media_failures() {
        let dir = TempDir::new().unwrap();
        let media = Arc::new(BrokenMedia {
            removals: AtomicUsize::new(0),
        });
        let store = FileItemStore::open(dir.path().join("items.json"), media.clone()).unwrap();

        let item = store
            .create(wallet().with_image_url("http://localhost:3000/uploads/1-wallet.png"))
            .await
            .unwrap();

        store.delete(&item.id).await.unwrap();
        assert_eq!(media.removals.load(Ordering::SeqCst), 1);
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn snapshot_round_trips_after_each_mutation() {
        let dir = TempDir::new().unwrap();
        let (store, media) = open_store(&dir);

        let a = store.create(wallet()).await.unwrap();
        let b = store
            .create(NewItem::new("Keys", "Ring of 3", "555-0100").with_location("Park"))
            .await
            .unwrap();
        store
            .update_status(&a.id, ItemStatus::Resolved)
            .await
            .unwrap();
        store.delete(&b.id).await.unwrap();

        let in_memory = store.list().await.unwrap();
        let reopened = FileItemStore::open(store.path(), media).unwrap();
        assert_eq!(reopened.list().await.unwrap(), in_memory);
        assert_eq!(store.reload().await.unwrap(), in_memory);
    }

    #[tokio::test]
    async fn concurrent_creates_are_not_lost() {
        let dir = TempDir::new().unwrap();
        let (store, media) = open_store(&dir);
        let store = Arc::new(store);

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .create(NewItem::new(format!("Item {}", i), "desc", "contact"))
                        .await
                        .unwrap()
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.list().await.unwrap().len(), 16);
        let reopened = FileItemStore::open(store.path(), media).unwrap();
        assert_eq!(reopened.list().await.unwrap().len(), 16);
    }

    #[test]
    fn next_id_uses_clock_when_ahead() {
        let items = Vec::new();
        assert_eq!(next_id(&items, 1000).as_str(), "1000");
    }

    #[test]
    fn next_id_bumps_past_existing() {
        let item = NewItem::new("t", "d", "c").into_item(ItemId::from_millis(1000), Utc::now());
        assert_eq!(next_id(&[item.clone()], 1000).as_str(), "1001");
        assert_eq!(next_id(&[item], 900).as_str(), "1001");
    }

    #[test]
    fn next_id_after_max_id_picks_free_value() {
        let at = |millis: u64| {
            NewItem::new("t", "d", "c").into_item(ItemId::from_millis(millis), Utc::now())
        };
        let items = [at(u64::MAX), at(1000)];
        assert_eq!(next_id(&items, 1000).as_str(), "1001");
        assert_eq!(next_id(&items, 5).as_str(), "5");
    }

    #[tokio::test]
    async fn create_after_loading_max_id_does_not_overflow() {
        let dir = TempDir::new().unwrap();
        let existing = NewItem::new("Old", "desc", "contact")
            .into_item(ItemId::from_millis(u64::MAX), Utc::now());
        fs::write(
            dir.path().join("items.json"),
            serde_json::to_string(&[existing]).unwrap(),
        )
        .unwrap();

        let (store, _media) = open_store(&dir);
        let created = store.create(wallet()).await.unwrap();

        assert_ne!(created.id.as_str(), u64::MAX.to_string());
        assert_eq!(store.list().await.unwrap().len(), 2);
    }
}
