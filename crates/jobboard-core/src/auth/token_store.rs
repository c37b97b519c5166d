use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{OnceCell, RwLock};
use tracing::{debug, warn};

use super::backend::TokenBackend;

/// Initialization progress of a [`TokenStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing has touched the store yet.
    Uninitialized,
    /// The first access is reading the backend; other callers wait on it.
    Loading,
    Ready,
}

/// Holds at most one bearer token and mirrors it into an optional backend.
///
/// The backend is read lazily on first access. Backend failures are logged
/// and otherwise ignored, so a store without a working backend behaves as
/// an in-memory store.
pub struct TokenStore {
    backend: Option<Arc<dyn TokenBackend>>,
    loaded: OnceCell<()>,
    loading: AtomicBool,
    token: RwLock<Option<String>>,
}

impl TokenStore {
    pub fn new(backend: Arc<dyn TokenBackend>) -> Self {
        Self {
            backend: Some(backend),
            loaded: OnceCell::new(),
            loading: AtomicBool::new(false),
            token: RwLock::new(None),
        }
    }

    /// Store with no persistence at all.
    pub fn in_memory() -> Self {
        Self {
            backend: None,
            loaded: OnceCell::new(),
            loading: AtomicBool::new(false),
            token: RwLock::new(None),
        }
    }

    pub fn state(&self) -> LoadState {
        if self.loaded.initialized() {
            LoadState::Ready
        } else if self.loading.load(Ordering::SeqCst) {
            LoadState::Loading
        } else {
            LoadState::Uninitialized
        }
    }

    /// Wait until the backend has been read. Only the first caller reads it.
    pub async fn ready(&self) {
        self.loaded
            .get_or_init(|| async {
                let _loading = LoadingFlag::raise(&self.loading);
                let loaded = self.load_from_backend().await;
                debug!(present = loaded.is_some(), "Token store initialized");
                *self.token.write().await = loaded;
            })
            .await;
    }

    pub async fn get(&self) -> Option<String> {
        self.ready().await;
        self.token.read().await.clone()
    }

    /// Replace the held token. `None` (or an empty string) clears both memory
    /// and the persisted slot.
    pub async fn set(&self, token: Option<String>) {
        self.ready().await;
        let token = token.filter(|t| !t.is_empty());

        // Persist under the write lock so memory and backend agree on the last writer.
        let mut held = self.token.write().await;
        *held = token.clone();
        if let Some(backend) = self.backend.clone() {
            persist(backend, token).await;
        }
    }

    pub async fn clear(&self) {
        self.set(None).await;
    }

    pub async fn is_authenticated(&self) -> bool {
        self.get().await.is_some()
    }

    async fn load_from_backend(&self) -> Option<String> {
        let backend = Arc::clone(self.backend.as_ref()?);
        match tokio::task::spawn_blocking(move || backend.load()).await {
            Ok(Ok(token)) => token.filter(|t| !t.is_empty()),
            Ok(Err(e)) => {
                warn!(error = %e, "Failed to load stored token, continuing without one");
                None
            }
            Err(e) => {
                warn!(error = %e, "Token load task failed");
                None
            }
        }
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("persistent", &self.backend.is_some())
            .field("state", &self.state())
            .finish()
    }
}

/// Marks a load in progress; lowered on drop, including when the loading
/// future is cancelled.
struct LoadingFlag<'a>(&'a AtomicBool);

impl<'a> LoadingFlag<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for LoadingFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

async fn persist(backend: Arc<dyn TokenBackend>, token: Option<String>) {
    let result = tokio::task::spawn_blocking(move || match token {
        Some(ref t) => backend.save(t),
        None => backend.remove(),
    })
    .await;

    match result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "Failed to persist token, keeping it in memory only"),
        Err(e) => warn!(error = %e, "Token persist task failed"),
    }
}
