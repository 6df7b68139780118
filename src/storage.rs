//! Storage Adapter
//!
//! Typed JSON values over a synchronous string key-value store
//! (`window.localStorage` in the browser).

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::marker::PhantomData;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("StorageKey \"{0}\" already used")]
    DuplicateKey(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage read failed: {0}")]
    Read(String),

    #[error("Storage write failed: {0}")]
    Write(String),

    #[error("Stored JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Synchronous string key-value store
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove_item(&self, key: &str) -> StorageResult<()>;
}

/// `window.localStorage`
pub struct BrowserStorage {
    storage: web_sys::Storage,
}

impl BrowserStorage {
    pub fn local() -> StorageResult<Self> {
        let window = web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|e| StorageError::Unavailable(format!("{:?}", e)))?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".to_string()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for BrowserStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        self.storage.get_item(key).map_err(|e| StorageError::Read(format!("{:?}", e)))
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StorageError::Write(format!("{:?}", e)))
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.storage.remove_item(key).map_err(|e| StorageError::Write(format!("{:?}", e)))
    }
}

/// In-memory store
#[derive(Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// Storage key carrying the type of its payload
pub struct StorageKey<T> {
    name: &'static str,
    _payload: PhantomData<fn() -> T>,
}

impl<T> Clone for StorageKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for StorageKey<T> {}

impl<T> StorageKey<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Hands out storage keys, each name at most once
#[derive(Debug, Default)]
pub struct StorageKeys {
    used: HashSet<&'static str>,
}

impl StorageKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key<T>(&mut self, name: &'static str) -> StorageResult<StorageKey<T>> {
        if !self.used.insert(name) {
            return Err(StorageError::DuplicateKey(name.to_string()));
        }
        Ok(StorageKey {
            name,
            _payload: PhantomData,
        })
    }
}

/// get/set/update of one typed key
pub struct TypedStorage<T> {
    store: Rc<dyn KeyValueStore>,
    key: StorageKey<T>,
}

impl<T> Clone for TypedStorage<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            key: self.key,
        }
    }
}

impl<T: Serialize + DeserializeOwned> TypedStorage<T> {
    pub fn new(store: Rc<dyn KeyValueStore>, key: StorageKey<T>) -> Self {
        Self { store, key }
    }

    /// Missing, empty or JSON `null` entries read as `None`
    pub fn get(&self) -> StorageResult<Option<T>> {
        match self.store.get_item(self.key.name())? {
            Some(data) if !data.is_empty() => Ok(serde_json::from_str::<Option<T>>(&data)?),
            _ => Ok(None),
        }
    }

    /// `None` removes the entry
    pub fn set(&self, item: Option<&T>) -> StorageResult<()> {
        match item {
            Some(item) => {
                let data = serde_json::to_string(item)?;
                self.store.set_item(self.key.name(), &data)
            }
            None => self.store.remove_item(self.key.name()),
        }
    }

    pub fn update<F>(&self, f: F) -> StorageResult<()>
    where
        F: FnOnce(Option<T>) -> Option<T>,
    {
        let next = f(self.get()?);
        self.set(next.as_ref())
    }
}
