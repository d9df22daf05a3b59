//! Flat-file persistence: one pretty-printed JSON array per collection.
//!
//! Every collection has its own async lock. Reads take it briefly; read-modify-write cycles
//! hold it from load to save through [`Locked`], so concurrent writers never overwrite each
//! other's changes. Saves go to a temp file which is then renamed over the original.

use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};
use tokio::{
    fs,
    sync::{Mutex, MutexGuard},
};

use crate::{
    error::AppResult,
    models::{CartItem, CatalogueItem, Customer, JobCard, Order, SupportTicket, User},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Jobs,
    Orders,
    Cart,
    Rewards,
    Catalogue,
    Tickets,
    Users,
}

impl Collection {
    pub const ALL: [Collection; 7] = [
        Collection::Jobs,
        Collection::Orders,
        Collection::Cart,
        Collection::Rewards,
        Collection::Catalogue,
        Collection::Tickets,
        Collection::Users,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            Collection::Jobs => "jobs.json",
            Collection::Orders => "orders.json",
            Collection::Cart => "cart.json",
            Collection::Rewards => "rewards.json",
            Collection::Catalogue => "catalogue.json",
            Collection::Tickets => "tickets.json",
            Collection::Users => "users.json",
        }
    }

    fn index(&self) -> usize {
        match self {
            Collection::Jobs => 0,
            Collection::Orders => 1,
            Collection::Cart => 2,
            Collection::Rewards => 3,
            Collection::Catalogue => 4,
            Collection::Tickets => 5,
            Collection::Users => 6,
        }
    }
}

/// A typed record living in exactly one collection, addressed by a string key.
pub trait Record: Serialize + DeserializeOwned + Send {
    const COLLECTION: Collection;

    fn key(&self) -> &str;
}

impl Record for JobCard {
    const COLLECTION: Collection = Collection::Jobs;

    fn key(&self) -> &str {
        &self.job_id
    }
}

impl Record for Order {
    const COLLECTION: Collection = Collection::Orders;

    fn key(&self) -> &str {
        &self.order_id
    }
}

impl Record for CartItem {
    const COLLECTION: Collection = Collection::Cart;

    fn key(&self) -> &str {
        &self.item_name
    }
}

impl Record for Customer {
    const COLLECTION: Collection = Collection::Rewards;

    fn key(&self) -> &str {
        &self.customer_id
    }
}

impl Record for CatalogueItem {
    const COLLECTION: Collection = Collection::Catalogue;

    fn key(&self) -> &str {
        &self.part_id
    }
}

impl Record for SupportTicket {
    const COLLECTION: Collection = Collection::Tickets;

    fn key(&self) -> &str {
        &self.ticket_id
    }
}

impl Record for User {
    const COLLECTION: Collection = Collection::Users;

    fn key(&self) -> &str {
        &self.username
    }
}

pub struct JsonStore {
    dir: PathBuf,
    locks: [Mutex<()>; 7],
}

impl JsonStore {
    pub async fn open(dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        tracing::debug!(dir = %dir.display(), "json store opened");
        Ok(Self {
            dir,
            locks: Collection::ALL.map(|_| Mutex::new(())),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_of(&self, collection: Collection) -> PathBuf {
        self.dir.join(collection.file_name())
    }

    pub async fn load<T: Record>(&self) -> AppResult<Vec<T>> {
        let _guard = self.locks[T::COLLECTION.index()].lock().await;
        Ok(self.read(T::COLLECTION).await)
    }

    pub async fn find<T: Record>(&self, key: &str) -> AppResult<Option<T>> {
        let items = self.load::<T>().await?;
        Ok(items.into_iter().find(|item| item.key() == key))
    }

    /// Locks the collection and loads it; changes are persisted by [`Locked::commit`].
    pub async fn lock<T: Record>(&self) -> AppResult<Locked<'_, T>> {
        let guard = self.locks[T::COLLECTION.index()].lock().await;
        let items = self.read(T::COLLECTION).await;
        Ok(Locked {
            store: self,
            _guard: guard,
            items,
        })
    }

    /// Load, apply `f`, save. Nothing is written when `f` fails.
    pub async fn update<T, R, F>(&self, f: F) -> AppResult<R>
    where
        T: Record,
        F: FnOnce(&mut Vec<T>) -> AppResult<R>,
    {
        let mut locked = self.lock::<T>().await?;
        let out = f(&mut locked.items)?;
        locked.commit().await?;
        Ok(out)
    }

    /// Removes the record with `key`; returns whether one existed.
    pub async fn remove<T: Record>(&self, key: &str) -> AppResult<bool> {
        let mut locked = self.lock::<T>().await?;
        let before = locked.items.len();
        locked.items.retain(|item| item.key() != key);
        if locked.items.len() == before {
            return Ok(false);
        }
        locked.commit().await?;
        Ok(true)
    }

    /// Replaces the whole collection.
    pub async fn replace<T: Record>(&self, items: Vec<T>) -> AppResult<()> {
        let mut locked = self.lock::<T>().await?;
        locked.items = items;
        locked.commit().await
    }

    async fn read<T: DeserializeOwned>(&self, collection: Collection) -> Vec<T> {
        let path = self.path_of(collection);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(err) => {
                tracing::warn!(file = %path.display(), error = %err, "collection unreadable, treating as empty");
                return Vec::new();
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(items) => items,
            Err(err) => {
                tracing::warn!(file = %path.display(), error = %err, "collection malformed, treating as empty");
                Vec::new()
            }
        }
    }

    async fn write<T: Serialize>(&self, collection: Collection, items: &[T]) -> AppResult<()> {
        let path = self.path_of(collection);
        let tmp_path = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(items)?;

        fs::write(&tmp_path, &bytes).await?;
        if let Err(err) = fs::rename(&tmp_path, &path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(err.into());
        }
        tracing::debug!(file = %path.display(), records = items.len(), "collection saved");
        Ok(())
    }
}

/// A loaded collection held under its lock.
pub struct Locked<'a, T: Record> {
    store: &'a JsonStore,
    _guard: MutexGuard<'a, ()>,
    pub items: Vec<T>,
}

impl<T: Record> Locked<'_, T> {
    pub fn get(&self, key: &str) -> Option<&T> {
        self.items.iter().find(|item| item.key() == key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.key() == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Writes the collection and keeps holding the lock.
    pub async fn save(&self) -> AppResult<()> {
        self.store.write(T::COLLECTION, &self.items).await
    }

    pub async fn commit(self) -> AppResult<()> {
        self.save().await
    }
}
