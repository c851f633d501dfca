//! Opaque key-value storage contracts and adapters used for desktop persistence.

use std::{cell::RefCell, collections::HashMap, future::Future, pin::Pin, rc::Rc};

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Object-safe boxed future used by [`KeyValueStore`] async methods.
pub type KeyValueFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Failures raised by a [`KeyValueStore`] or the typed helpers around it.
pub enum StorageError {
    /// The backing store rejected or failed the operation.
    #[error("storage backend failed for `{key}`: {message}")]
    Backend {
        /// Key being read or written.
        key: String,
        /// Backend-provided reason.
        message: String,
    },
    /// A stored value could not be decoded into the requested type.
    #[error("stored value for `{key}` is corrupt: {message}")]
    Corrupt {
        /// Key being read.
        key: String,
        /// Decoder message.
        message: String,
    },
    /// A value could not be encoded for storage.
    #[error("value for `{key}` could not be encoded: {message}")]
    Encode {
        /// Key being written.
        key: String,
        /// Encoder message.
        message: String,
    },
}

/// Host service storing raw JSON text under string keys.
pub trait KeyValueStore {
    /// Loads the raw JSON stored under `key`, if any.
    fn load_raw<'a>(
        &'a self,
        key: &'a str,
    ) -> KeyValueFuture<'a, Result<Option<String>, StorageError>>;

    /// Stores raw JSON under `key`, replacing any previous value.
    fn save_raw<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> KeyValueFuture<'a, Result<(), StorageError>>;

    /// Removes `key` from the store.
    fn delete<'a>(&'a self, key: &'a str) -> KeyValueFuture<'a, Result<(), StorageError>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Store that remembers nothing; every load is empty and every save succeeds.
pub struct NoopKeyValueStore;

impl KeyValueStore for NoopKeyValueStore {
    fn load_raw<'a>(
        &'a self,
        _key: &'a str,
    ) -> KeyValueFuture<'a, Result<Option<String>, StorageError>> {
        Box::pin(async { Ok(None) })
    }

    fn save_raw<'a>(
        &'a self,
        _key: &'a str,
        _raw_json: &'a str,
    ) -> KeyValueFuture<'a, Result<(), StorageError>> {
        Box::pin(async { Ok(()) })
    }

    fn delete<'a>(&'a self, _key: &'a str) -> KeyValueFuture<'a, Result<(), StorageError>> {
        Box::pin(async { Ok(()) })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory store. Clones share the same map, so a test can keep a handle and inspect writes.
pub struct MemoryKeyValueStore {
    inner: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryKeyValueStore {
    /// Returns the raw value currently stored under `key`.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.borrow().get(key).cloned()
    }

    /// Seeds `key` with raw text, bypassing serialization. Useful for corrupt-data cases.
    pub fn insert_raw(&self, key: impl Into<String>, raw: impl Into<String>) {
        self.inner.borrow_mut().insert(key.into(), raw.into());
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn load_raw<'a>(
        &'a self,
        key: &'a str,
    ) -> KeyValueFuture<'a, Result<Option<String>, StorageError>> {
        Box::pin(async move { Ok(self.inner.borrow().get(key).cloned()) })
    }

    fn save_raw<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> KeyValueFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            self.inner
                .borrow_mut()
                .insert(key.to_string(), raw_json.to_string());
            Ok(())
        })
    }

    fn delete<'a>(&'a self, key: &'a str) -> KeyValueFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            self.inner.borrow_mut().remove(key);
            Ok(())
        })
    }
}

#[derive(Debug, Clone, Default)]
/// Store whose every operation fails. Exercises the log-and-continue paths.
pub struct FailingKeyValueStore;

impl FailingKeyValueStore {
    fn failure(key: &str) -> StorageError {
        StorageError::Backend {
            key: key.to_string(),
            message: "store unavailable".to_string(),
        }
    }
}

impl KeyValueStore for FailingKeyValueStore {
    fn load_raw<'a>(
        &'a self,
        key: &'a str,
    ) -> KeyValueFuture<'a, Result<Option<String>, StorageError>> {
        Box::pin(async move { Err(Self::failure(key)) })
    }

    fn save_raw<'a>(
        &'a self,
        key: &'a str,
        _raw_json: &'a str,
    ) -> KeyValueFuture<'a, Result<(), StorageError>> {
        Box::pin(async move { Err(Self::failure(key)) })
    }

    fn delete<'a>(&'a self, key: &'a str) -> KeyValueFuture<'a, Result<(), StorageError>> {
        Box::pin(async move { Err(Self::failure(key)) })
    }
}

/// Loads and decodes a typed value through a [`KeyValueStore`].
///
/// # Errors
///
/// Returns [`StorageError::Backend`] when the store fails and [`StorageError::Corrupt`] when the
/// stored JSON does not decode into `T`.
pub async fn load_typed<S: KeyValueStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let Some(raw) = store.load_raw(key).await? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|err| StorageError::Corrupt {
            key: key.to_string(),
            message: err.to_string(),
        })
}

/// Loads a typed value, falling back to `T::default()` on absence or any failure.
///
/// Failures are logged; this never returns an error to the caller.
pub async fn load_or_default<S: KeyValueStore + ?Sized, T: DeserializeOwned + Default>(
    store: &S,
    key: &str,
) -> T {
    match load_typed(store, key).await {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(err) => {
            tracing::warn!(%key, error = %err, "falling back to default value");
            T::default()
        }
    }
}

/// Encodes and saves a typed value through a [`KeyValueStore`].
///
/// # Errors
///
/// Returns [`StorageError::Encode`] when serialization fails or the store's own error on save.
pub async fn save_typed<S: KeyValueStore + ?Sized, T: Serialize + ?Sized>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|err| StorageError::Encode {
        key: key.to_string(),
        message: err.to_string(),
    })?;
    store.save_raw(key, &raw).await
}
