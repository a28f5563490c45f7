use crate::domain::model::UserSession;
use crate::domain::ports::SessionStorage;
use crate::utils::error::{BillError, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const USER_KEY: &str = "user";
pub const TOKEN_KEY: &str = "jwt";

/// Key-value session storage, optionally persisted as a JSON object file.
#[derive(Debug, Clone, Default)]
pub struct LocalSessionStorage {
    items: BTreeMap<String, String>,
    path: Option<PathBuf>,
}

impl LocalSessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a JSON object file. String values are kept as is; other values
    /// are stored as their JSON text, the way local storage holds them.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)?;
        let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&content)?;

        let items = object
            .into_iter()
            .map(|(key, value)| match value {
                serde_json::Value::String(s) => (key, s),
                other => (key, other.to_string()),
            })
            .collect();

        Ok(Self {
            items,
            path: Some(path.as_ref().to_path_buf()),
        })
    }

    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Err(BillError::SessionError {
                message: "session storage has no backing file".to_string(),
            });
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(&self.items)?)?;
        Ok(())
    }
}

impl SessionStorage for LocalSessionStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) {
        self.items.insert(key.to_string(), value.to_string());
    }
}

pub fn read_user_session<T: SessionStorage + ?Sized>(storage: &T) -> Result<UserSession> {
    let raw = storage
        .get_item(USER_KEY)
        .ok_or_else(|| BillError::SessionError {
            message: format!("no '{}' entry in session storage", USER_KEY),
        })?;

    serde_json::from_str(&raw).map_err(|e| BillError::SessionError {
        message: format!("malformed '{}' entry: {}", USER_KEY, e),
    })
}

pub fn read_token<T: SessionStorage + ?Sized>(storage: &T) -> Option<String> {
    storage.get_item(TOKEN_KEY).filter(|t| !t.trim().is_empty())
}
