//! Named-permission grants with pluggable persistence.
//!
//! The alternative to the role ladder: callers hold named permission
//! strings in a [`GrantStore`], and a [`GrantGate`] checks requirements
//! against that set. The store keeps one document: caller id to granted
//! permissions (with grant timestamps) plus a catalogue describing every
//! known permission name.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use banter_types::Caller;

use crate::{Level, PermissionGate, Requirement};

/// Grant every caller implicitly holds.
pub const DEFAULT_GRANT: &str = "default";

/// Grant that satisfies every requirement.
pub const ADMIN_GRANT: &str = "admin";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from grant store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read grant store: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse grant store: {0}")]
    Parse(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Store contract
// ---------------------------------------------------------------------------

/// One granted permission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantRecord {
    /// When the grant was made.
    pub granted_at: DateTime<Utc>,
}

impl GrantRecord {
    fn now() -> Self {
        Self {
            granted_at: Utc::now(),
        }
    }
}

/// Persistence contract for named permission grants.
///
/// Implementations must serialize read-modify-write cycles so that
/// concurrent grants and revokes for the same caller cannot interleave.
pub trait GrantStore: Send + Sync {
    /// The set of permissions granted to a caller.
    fn grants(&self, user: &str) -> Result<BTreeSet<String>, StoreError>;

    /// Grant a permission. Returns `false` if the caller already held it.
    fn grant(&self, user: &str, permission: &str) -> Result<bool, StoreError>;

    /// Revoke a permission. Returns `false` if the caller did not hold it.
    fn revoke(&self, user: &str, permission: &str) -> Result<bool, StoreError>;

    /// Every caller id with at least one grant, in stable order.
    fn users(&self) -> Result<Vec<String>, StoreError>;

    /// Record a permission name in the catalogue with a description.
    fn define(&self, permission: &str, description: &str) -> Result<(), StoreError>;

    /// Look up a catalogued permission's description.
    fn describe(&self, permission: &str) -> Result<Option<String>, StoreError>;

    /// The full catalogue of known permissions.
    fn catalog(&self) -> Result<BTreeMap<String, String>, StoreError>;
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// The persisted document. Ordered maps keep the file diffable.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GrantFileData {
    version: u32,
    /// Caller id -> permission name -> grant record.
    grants: BTreeMap<String, BTreeMap<String, GrantRecord>>,
    /// Permission name -> description.
    catalog: BTreeMap<String, String>,
}

impl GrantFileData {
    fn new() -> Self {
        Self {
            version: 1,
            grants: BTreeMap::new(),
            catalog: BTreeMap::new(),
        }
    }

    fn grants_for(&self, user: &str) -> BTreeSet<String> {
        self.grants
            .get(user)
            .map(|perms| perms.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn apply_grant(&mut self, user: &str, permission: &str) -> bool {
        self.grants
            .entry(user.to_string())
            .or_default()
            .insert(permission.to_string(), GrantRecord::now())
            .is_none()
    }

    fn apply_revoke(&mut self, user: &str, permission: &str) -> bool {
        let Some(perms) = self.grants.get_mut(user) else {
            return false;
        };
        let removed = perms.remove(permission).is_some();
        if perms.is_empty() {
            self.grants.remove(user);
        }
        removed
    }
}

impl Default for GrantFileData {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// File-backed store
// ---------------------------------------------------------------------------

/// Grant store persisted as one JSON document.
///
/// The whole document is rewritten on every mutation; the mutex is held
/// across mutate-and-save, which is what serializes read-modify-write.
pub struct FileGrantStore {
    path: PathBuf,
    data: Mutex<GrantFileData>,
}

impl FileGrantStore {
    /// Open a store at the given path, loading it if the file exists.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let data = if path.exists() {
            let file = File::open(&path)?;
            let reader = BufReader::new(file);
            serde_json::from_reader(reader)?
        } else {
            GrantFileData::new()
        };

        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }

    /// Open a store in the default location for an application:
    /// `<config dir>/<app>/grants.json`.
    pub fn default_for_app(app_name: &str) -> Result<Self, StoreError> {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from(".config"));
        let path = config_dir.join(app_name).join("grants.json");
        Self::new(path)
    }

    /// The store file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the document to disk. Called with the data mutex held.
    fn save(&self, data: &GrantFileData) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = File::create(&self.path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, data)?;
        debug!(path = %self.path.display(), "grant store saved");
        Ok(())
    }
}

impl GrantStore for FileGrantStore {
    fn grants(&self, user: &str) -> Result<BTreeSet<String>, StoreError> {
        let data = self.data.lock().unwrap();
        Ok(data.grants_for(user))
    }

    fn grant(&self, user: &str, permission: &str) -> Result<bool, StoreError> {
        let mut data = self.data.lock().unwrap();
        let added = data.apply_grant(user, permission);
        if added {
            self.save(&data)?;
        }
        Ok(added)
    }

    fn revoke(&self, user: &str, permission: &str) -> Result<bool, StoreError> {
        let mut data = self.data.lock().unwrap();
        let removed = data.apply_revoke(user, permission);
        if removed {
            self.save(&data)?;
        }
        Ok(removed)
    }

    fn users(&self) -> Result<Vec<String>, StoreError> {
        let data = self.data.lock().unwrap();
        Ok(data.grants.keys().cloned().collect())
    }

    fn define(&self, permission: &str, description: &str) -> Result<(), StoreError> {
        let mut data = self.data.lock().unwrap();
        data.catalog
            .insert(permission.to_string(), description.to_string());
        self.save(&data)
    }

    fn describe(&self, permission: &str) -> Result<Option<String>, StoreError> {
        let data = self.data.lock().unwrap();
        Ok(data.catalog.get(permission).cloned())
    }

    fn catalog(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let data = self.data.lock().unwrap();
        Ok(data.catalog.clone())
    }
}

impl fmt::Debug for FileGrantStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileGrantStore")
            .field("path", &self.path)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Grant store for tests and session-only deployments.
pub struct MemoryGrantStore {
    data: Mutex<GrantFileData>,
}

impl MemoryGrantStore {
    pub fn new() -> Self {
        Self {
            data: Mutex::new(GrantFileData::new()),
        }
    }

    /// Number of callers holding at least one grant.
    pub fn len(&self) -> usize {
        self.data.lock().unwrap().grants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.lock().unwrap().grants.is_empty()
    }
}

impl Default for MemoryGrantStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GrantStore for MemoryGrantStore {
    fn grants(&self, user: &str) -> Result<BTreeSet<String>, StoreError> {
        let data = self.data.lock().unwrap();
        Ok(data.grants_for(user))
    }

    fn grant(&self, user: &str, permission: &str) -> Result<bool, StoreError> {
        let mut data = self.data.lock().unwrap();
        Ok(data.apply_grant(user, permission))
    }

    fn revoke(&self, user: &str, permission: &str) -> Result<bool, StoreError> {
        let mut data = self.data.lock().unwrap();
        Ok(data.apply_revoke(user, permission))
    }

    fn users(&self) -> Result<Vec<String>, StoreError> {
        let data = self.data.lock().unwrap();
        Ok(data.grants.keys().cloned().collect())
    }

    fn define(&self, permission: &str, description: &str) -> Result<(), StoreError> {
        let mut data = self.data.lock().unwrap();
        data.catalog
            .insert(permission.to_string(), description.to_string());
        Ok(())
    }

    fn describe(&self, permission: &str) -> Result<Option<String>, StoreError> {
        let data = self.data.lock().unwrap();
        Ok(data.catalog.get(permission).cloned())
    }

    fn catalog(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let data = self.data.lock().unwrap();
        Ok(data.catalog.clone())
    }
}

impl fmt::Debug for MemoryGrantStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryGrantStore")
            .field("users", &self.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Gate
// ---------------------------------------------------------------------------

/// Gate backed by named permission grants.
///
/// The literal [`DEFAULT_GRANT`] is satisfied by anyone; a caller holding
/// [`ADMIN_GRANT`] satisfies everything. Level requirements above
/// [`Level::Everyone`] have no named counterpart and resolve to
/// admin-grant-only. Store failures deny.
pub struct GrantGate {
    store: Arc<dyn GrantStore>,
}

impl GrantGate {
    pub fn new(store: Arc<dyn GrantStore>) -> Self {
        Self { store }
    }
}

impl PermissionGate for GrantGate {
    fn permits(&self, caller: &Caller, requirement: &Requirement) -> bool {
        let grants = match self.store.grants(&caller.id) {
            Ok(grants) => grants,
            Err(e) => {
                warn!(caller = %caller.id, error = %e, "grant lookup failed, denying");
                return false;
            }
        };

        if grants.contains(ADMIN_GRANT) {
            return true;
        }

        match requirement {
            Requirement::MinimumLevel(Level::Everyone) => true,
            Requirement::MinimumLevel(_) => false,
            Requirement::Named(name) => name == DEFAULT_GRANT || grants.contains(name),
        }
    }
}

impl fmt::Debug for GrantGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrantGate").finish()
    }
}
