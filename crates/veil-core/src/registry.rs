//! Virtual-path → encrypted-blob store.
//!
//! Lookups decrypt on demand with the passphrase captured at construction.
//! In raw mode the map is bypassed entirely and paths are read from a base
//! directory on disk, which keeps development builds debuggable without a
//! packaging step.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use parking_lot::RwLock;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::crypto;

/// How lookups are answered: from the in-memory encrypted map, or straight
/// from a directory on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupMode {
    Registry,
    Raw { base_dir: PathBuf },
}

/// Outcome of a tagged lookup. Outward callers see only bytes, possibly
/// empty; the tag keeps not-found and decrypt-empty distinguishable for
/// logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(Vec<u8>),
    NotFound,
    DecryptEmpty,
}

impl Resolution {
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Resolution::Found(bytes) => bytes,
            Resolution::NotFound | Resolution::DecryptEmpty => Vec::new(),
        }
    }
}

struct RegistryState {
    entries: HashMap<String, Vec<u8>>,
    mode: LookupMode,
}

/// The map and the mode flag share one lock: many concurrent resolves, or
/// one writer. The passphrase is injected per instance, so independent
/// registries with different secrets can coexist.
pub struct ResourceRegistry {
    state: RwLock<RegistryState>,
    secret: Zeroizing<String>,
}

impl ResourceRegistry {
    pub fn new(secret: impl Into<String>) -> Self {
        let secret = Zeroizing::new(secret.into());
        debug!(key = %crypto::key_fingerprint(&secret), "registry created");
        Self {
            state: RwLock::new(RegistryState {
                entries: HashMap::new(),
                mode: LookupMode::Registry,
            }),
            secret,
        }
    }

    /// Register an encrypted payload under `path`. Later registrations
    /// overwrite earlier ones; byte content is not validated.
    pub fn register(&self, path: &str, encrypted: Vec<u8>) {
        let key = normalize_path(path);
        let mut state = self.state.write();
        if state.entries.insert(key.clone(), encrypted).is_some() {
            debug!(path = %key, "registration overwrote an existing entry");
        }
    }

    /// Route all lookups to `base_dir` on disk, bypassing the map.
    pub fn set_raw_mode(&self, base_dir: impl Into<PathBuf>) {
        let base_dir = base_dir.into();
        info!(base_dir = %base_dir.display(), "raw mode enabled");
        self.state.write().mode = LookupMode::Raw { base_dir };
    }

    /// Route lookups back through the in-memory encrypted map.
    pub fn set_registry_mode(&self) {
        self.state.write().mode = LookupMode::Registry;
    }

    pub fn mode(&self) -> LookupMode {
        self.state.read().mode.clone()
    }

    /// Number of registered entries. Raw mode leaves the map untouched.
    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().entries.is_empty()
    }

    /// Resolve to plain bytes. Empty means the path could not be served;
    /// callers that need to know why use [`resolve_tagged`].
    ///
    /// [`resolve_tagged`]: Self::resolve_tagged
    pub fn resolve(&self, path: &str) -> Vec<u8> {
        self.resolve_tagged(path).into_bytes()
    }

    pub fn resolve_tagged(&self, path: &str) -> Resolution {
        let key = normalize_path(path);
        let state = self.state.read();
        match &state.mode {
            LookupMode::Raw { base_dir } => {
                let file = base_dir.join(&key);
                match fs::read(&file) {
                    Ok(bytes) => Resolution::Found(bytes),
                    Err(err) => {
                        warn!(path = %key, file = %file.display(), %err, "raw read failed");
                        Resolution::NotFound
                    }
                }
            }
            LookupMode::Registry => match state.entries.get(&key) {
                Some(blob) => {
                    let plain = crypto::decrypt(blob, &self.secret);
                    if plain.is_empty() {
                        warn!(path = %key, blob_len = blob.len(), "decryption produced no data");
                        Resolution::DecryptEmpty
                    } else {
                        Resolution::Found(plain)
                    }
                }
                None => {
                    warn!(path = %key, registered = state.entries.len(), "no entry for path");
                    Resolution::NotFound
                }
            },
        }
    }
}

/// Strip every leading separator so "///a/b.qml" and "a/b.qml" share one key.
pub fn normalize_path(path: &str) -> String {
    path.trim_start_matches('/').to_string()
}
