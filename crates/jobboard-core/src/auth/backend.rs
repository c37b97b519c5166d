//! Persistence backends for the bearer token.
//!
//! Each backend owns exactly one slot, addressed by [`TOKEN_KEY`].

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use keyring::Entry;

/// Fixed name of the persisted token slot.
pub const TOKEN_KEY: &str = "auth_token";

/// Keychain service the token is filed under.
const SERVICE_NAME: &str = "jobboard";

/// Application directory under the user cache dir.
const APP_NAME: &str = "jobboard";

/// A single key-value slot that outlives the process.
///
/// Calls are blocking; the token store runs them off the async executor.
pub trait TokenBackend: Send + Sync {
    /// Read the slot. A missing slot is `Ok(None)`, not an error.
    fn load(&self) -> Result<Option<String>>;

    fn save(&self, token: &str) -> Result<()>;

    /// Delete the slot. Deleting a missing slot succeeds.
    fn remove(&self) -> Result<()>;
}

// ============================================================================
// OS keychain
// ============================================================================

/// Stores the token in the OS keychain.
pub struct KeyringBackend {
    service: String,
}

impl KeyringBackend {
    pub fn new() -> Self {
        Self::with_service(SERVICE_NAME)
    }

    /// Use a different keychain service name (e.g. one per environment).
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self) -> Result<Entry> {
        Entry::new(&self.service, TOKEN_KEY).context("Failed to create keyring entry")
    }
}

impl Default for KeyringBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenBackend for KeyringBackend {
    fn load(&self) -> Result<Option<String>> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("Failed to retrieve token from keychain"),
        }
    }

    fn save(&self, token: &str) -> Result<()> {
        self.entry()?
            .set_password(token)
            .context("Failed to store token in keychain")
    }

    fn remove(&self) -> Result<()> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete token from keychain"),
        }
    }
}

// ============================================================================
// Plain-text file
// ============================================================================

/// Stores the token as plain text in a file named [`TOKEN_KEY`].
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// File backend rooted at `<cache_dir>/jobboard`.
    pub fn in_cache_dir() -> Result<Self> {
        let cache_dir =
            dirs::cache_dir().ok_or_else(|| anyhow!("Could not find cache directory"))?;
        Ok(Self::new(cache_dir.join(APP_NAME)))
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(TOKEN_KEY)
    }
}

impl TokenBackend for FileBackend {
    fn load(&self) -> Result<Option<String>> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path).context("Failed to read token file")?;
        let token = contents.trim();
        Ok((!token.is_empty()).then(|| token.to_string()))
    }

    fn save(&self, token: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir).context("Failed to create token directory")?;
        std::fs::write(self.path(), token).context("Failed to write token file")?;
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        let path = self.path();
        if path.exists() {
            std::fs::remove_file(path).context("Failed to remove token file")?;
        }
        Ok(())
    }
}

// ============================================================================
// In-process
// ============================================================================

/// Process-local slot. Counts loads so callers can observe lazy initialization.
#[derive(Default)]
pub struct MemoryBackend {
    slot: Mutex<Option<String>>,
    loads: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend whose slot already holds `token`.
    pub fn seeded(token: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(token.into())),
            loads: AtomicUsize::new(0),
        }
    }

    /// Current slot contents, without counting as a load.
    pub fn peek(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl TokenBackend for MemoryBackend {
    fn load(&self) -> Result<Option<String>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        let slot = self.slot.lock().map_err(|_| anyhow!("token slot poisoned"))?;
        Ok(slot.clone())
    }

    fn save(&self, token: &str) -> Result<()> {
        let mut slot = self.slot.lock().map_err(|_| anyhow!("token slot poisoned"))?;
        *slot = Some(token.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        let mut slot = self.slot.lock().map_err(|_| anyhow!("token slot poisoned"))?;
        *slot = None;
        Ok(())
    }
}
