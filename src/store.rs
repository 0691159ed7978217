use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex as StdMutex;
use tokio::sync::{watch, Mutex};
use tracing::warn;

use crate::error::StorageError;
use crate::models::Movie;

/// The two user-curated collections. Keys double as storage entry names, so
/// persisted data stays compatible across restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Watchlist,
    Favorites,
}

impl Collection {
    pub fn key(self) -> &'static str {
        match self {
            Collection::Watchlist => "movie_watchlist",
            Collection::Favorites => "movie_favorites",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collection::Watchlist => write!(f, "watchlist"),
            Collection::Favorites => write!(f, "favorites"),
        }
    }
}

/// Persistence seam behind the store. Payloads are opaque JSON strings, one
/// entry per collection; the store owns (de)serialization.
pub trait CollectionStorage: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn save(&self, key: &str, payload: &str) -> Result<(), StorageError>;
}

/// One `<key>.json` file per collection under a data directory.
#[derive(Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl CollectionStorage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(payload) => Ok(Some(payload)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, key: &str, payload: &str) -> Result<(), StorageError> {
        fs::write(self.path_for(key), payload)?;
        Ok(())
    }
}

/// Ephemeral backend for tests and keyless trial runs.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: StdMutex<HashMap<String, String>>,
}

impl CollectionStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned())
    }

    fn save(&self, key: &str, payload: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), payload.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreChange {
    Added,
    Removed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreEvent {
    pub collection: Collection,
    pub movie_id: i64,
    pub change: StoreChange,
}

#[derive(Default)]
struct Lists {
    watchlist: Vec<Movie>,
    favorites: Vec<Movie>,
}

impl Lists {
    fn get(&self, collection: Collection) -> &Vec<Movie> {
        match collection {
            Collection::Watchlist => &self.watchlist,
            Collection::Favorites => &self.favorites,
        }
    }

    fn get_mut(&mut self, collection: Collection) -> &mut Vec<Movie> {
        match collection {
            Collection::Watchlist => &mut self.watchlist,
            Collection::Favorites => &mut self.favorites,
        }
    }
}

/// Durable membership tracking for watchlist and favorites. Constructed once
/// at startup with an injected backend; every mutation rewrites the whole
/// collection and publishes a change event to subscribers.
pub struct ProfileStore {
    storage: Box<dyn CollectionStorage>,
    lists: Mutex<Lists>,
    events: watch::Sender<Option<StoreEvent>>,
}

impl ProfileStore {
    /// Hydrates both collections once. Absent or malformed payloads read as
    /// empty; there is no migration of the persisted shape.
    pub fn open(storage: Box<dyn CollectionStorage>) -> Self {
        let lists = Lists {
            watchlist: hydrate(storage.as_ref(), Collection::Watchlist),
            favorites: hydrate(storage.as_ref(), Collection::Favorites),
        };
        let (events, _) = watch::channel(None);
        Self {
            storage,
            lists: Mutex::new(lists),
            events,
        }
    }

    /// Idempotent on movie id: returns false (and writes nothing) when the
    /// movie is already a member.
    pub async fn add(&self, collection: Collection, movie: Movie) -> Result<bool, StorageError> {
        let mut lists = self.lists.lock().await;
        let list = lists.get_mut(collection);
        if list.iter().any(|m| m.id == movie.id) {
            return Ok(false);
        }
        let movie_id = movie.id;
        list.push(movie);
        if let Err(e) = persist(self.storage.as_ref(), collection, list) {
            list.pop();
            return Err(e);
        }
        let _ = self.events.send(Some(StoreEvent {
            collection,
            movie_id,
            change: StoreChange::Added,
        }));
        Ok(true)
    }

    /// Removes every matching entry (expected at most one). Returns false
    /// for non-members without touching the backend.
    pub async fn remove(&self, collection: Collection, movie_id: i64) -> Result<bool, StorageError> {
        let mut lists = self.lists.lock().await;
        let list = lists.get_mut(collection);
        let before = list.len();
        list.retain(|m| m.id != movie_id);
        if list.len() == before {
            return Ok(false);
        }
        persist(self.storage.as_ref(), collection, list)?;
        let _ = self.events.send(Some(StoreEvent {
            collection,
            movie_id,
            change: StoreChange::Removed,
        }));
        Ok(true)
    }

    pub async fn contains(&self, collection: Collection, movie_id: i64) -> bool {
        self.lists
            .lock()
            .await
            .get(collection)
            .iter()
            .any(|m| m.id == movie_id)
    }

    pub async fn movies(&self, collection: Collection) -> Vec<Movie> {
        self.lists.lock().await.get(collection).clone()
    }

    /// Change feed for interested observers; receivers see the most recent
    /// mutation.
    pub fn subscribe(&self) -> watch::Receiver<Option<StoreEvent>> {
        self.events.subscribe()
    }
}

fn hydrate(storage: &dyn CollectionStorage, collection: Collection) -> Vec<Movie> {
    let payload = match storage.load(collection.key()) {
        Ok(Some(payload)) => payload,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!("Failed to read stored {}: {}", collection, e);
            return Vec::new();
        }
    };
    match serde_json::from_str(&payload) {
        Ok(movies) => movies,
        Err(e) => {
            warn!("Ignoring malformed stored {}: {}", collection, e);
            Vec::new()
        }
    }
}

fn persist(
    storage: &dyn CollectionStorage,
    collection: Collection,
    list: &[Movie],
) -> Result<(), StorageError> {
    let payload = serde_json::to_string(list)?;
    storage.save(collection.key(), &payload)
}
