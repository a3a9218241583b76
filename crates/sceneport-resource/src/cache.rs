use std::collections::HashMap;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};
use thiserror::Error;

use crate::archive;
use crate::key::ResourceKey;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
    #[error("resource not found: {key}")]
    NotFound { key: String },
    #[error("failed to read {key}: {message}")]
    Io { key: String, message: String },
    #[error("failed to read archive entry {key}: {message}")]
    Archive { key: String, message: String },
}

enum SlotState {
    Pending,
    Done(Result<Arc<[u8]>, ResourceError>),
}

/// One cache entry. The first resolver of a key owns the I/O; concurrent
/// resolvers of the same key block on `ready` instead of duplicating it.
struct Slot {
    state: Mutex<SlotState>,
    ready: Condvar,
}

impl Slot {
    fn pending() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(SlotState::Pending),
            ready: Condvar::new(),
        })
    }

    fn done(result: Result<Arc<[u8]>, ResourceError>) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(SlotState::Done(result)),
            ready: Condvar::new(),
        })
    }

    fn fill(&self, result: Result<Arc<[u8]>, ResourceError>) {
        let mut state = self.state.lock();
        *state = SlotState::Done(result);
        self.ready.notify_all();
    }

    fn wait(&self) -> Result<Arc<[u8]>, ResourceError> {
        let mut state = self.state.lock();
        loop {
            if let SlotState::Done(result) = &*state {
                return result.clone();
            }
            self.ready.wait(&mut state);
        }
    }
}

/// Process-wide content cache over file and archive-entry resources.
///
/// Opening and decompression happen at most once per distinct key, even under
/// concurrent callers; results (including `NotFound`) are retained until
/// [`ResourceCache::invalidate_all`]. Unrelated keys never serialize on each
/// other, only duplicate requests for the same key coalesce.
pub struct ResourceCache {
    slots: Mutex<HashMap<String, Arc<Slot>>>,
    opens: AtomicUsize,
}

impl Default for ResourceCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceCache {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            opens: AtomicUsize::new(0),
        }
    }

    /// Resolves `key` to its content, performing the backing open on first
    /// request. A missing file or archive entry is a [`ResourceError::NotFound`],
    /// which callers running a fallback chain treat as "try the next candidate".
    pub fn resolve(&self, key: &ResourceKey) -> Result<Arc<[u8]>, ResourceError> {
        let cache_key = key.to_string();

        let (slot, is_loader) = {
            let mut slots = self.slots.lock();
            match slots.get(&cache_key) {
                Some(slot) => (slot.clone(), false),
                None => {
                    let slot = Slot::pending();
                    slots.insert(cache_key, slot.clone());
                    (slot, true)
                }
            }
        };

        if is_loader {
            self.opens.fetch_add(1, Ordering::Relaxed);
            let result = open_resource(key);
            if let Err(err) = &result {
                log::debug!("Resource open failed: {err}");
            }
            slot.fill(result.clone());
            result
        } else {
            slot.wait()
        }
    }

    /// Seeds the cache with bytes that already live in memory (e.g. textures
    /// embedded in a scene file). No-op when the key is already present.
    pub fn insert(&self, key: &ResourceKey, data: impl Into<Arc<[u8]>>) {
        let mut slots = self.slots.lock();
        slots
            .entry(key.to_string())
            .or_insert_with(|| Slot::done(Ok(data.into())));
    }

    /// Number of backing open/decompress operations performed so far.
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::Relaxed)
    }

    /// Drops every entry, successes and cached misses alike. Callers must
    /// quiesce in-flight conversions first; entries being waited on are
    /// still filled by their loader, only the map forgets them.
    pub fn invalidate_all(&self) {
        self.slots.lock().clear();
    }
}

fn open_resource(key: &ResourceKey) -> Result<Arc<[u8]>, ResourceError> {
    match key {
        ResourceKey::File(path) => match fs::read(path) {
            Ok(data) => Ok(data.into()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(ResourceError::NotFound {
                    key: key.to_string(),
                })
            }
            Err(err) => Err(ResourceError::Io {
                key: key.to_string(),
                message: err.to_string(),
            }),
        },
        ResourceKey::ArchiveEntry { archive, entry } => archive::read_entry(key, archive, entry),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &std::path::Path, name: &str, contents: &[u8]) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).expect("create fixture");
        file.write_all(contents).expect("write fixture");
        path
    }

    #[test]
    fn repeated_resolves_open_once() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_file(dir.path(), "mesh.bin", b"vertices");

        let cache = ResourceCache::new();
        let key = ResourceKey::file(&path);

        let first = cache.resolve(&key).expect("first resolve");
        let second = cache.resolve(&key).expect("second resolve");
        assert_eq!(&first[..], b"vertices");
        assert_eq!(first, second);
        assert_eq!(cache.open_count(), 1);
    }

    #[test]
    fn missing_file_is_not_found_and_cached() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = ResourceCache::new();
        let key = ResourceKey::file(dir.path().join("absent.png"));

        for _ in 0..3 {
            let err = cache.resolve(&key).unwrap_err();
            assert!(matches!(err, ResourceError::NotFound { .. }));
        }
        assert_eq!(cache.open_count(), 1);
    }

    #[test]
    fn concurrent_resolves_coalesce_to_one_open() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_file(dir.path(), "shared.png", b"pixels");

        let cache = ResourceCache::new();
        let key = ResourceKey::file(&path);

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..100)
                .map(|_| {
                    let cache = &cache;
                    let key = key.clone();
                    scope.spawn(move || cache.resolve(&key).expect("resolve"))
                })
                .collect();
            for handle in handles {
                assert_eq!(&handle.join().expect("join")[..], b"pixels");
            }
        });

        assert_eq!(cache.open_count(), 1);
    }

    #[test]
    fn invalidate_all_forgets_entries() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_file(dir.path(), "tex.png", b"abc");

        let cache = ResourceCache::new();
        let key = ResourceKey::file(&path);

        cache.resolve(&key).expect("resolve");
        cache.invalidate_all();
        cache.resolve(&key).expect("resolve after invalidate");
        assert_eq!(cache.open_count(), 2);
    }

    #[test]
    fn inserted_bytes_resolve_without_backing_file() {
        let cache = ResourceCache::new();
        let key = ResourceKey::archive_entry("/scene.fbx", "*0");

        cache.insert(&key, vec![1u8, 2, 3]);
        let data = cache.resolve(&key).expect("resolve inserted");
        assert_eq!(&data[..], &[1, 2, 3]);
        assert_eq!(cache.open_count(), 0);
    }
}
