//! Key-value stores backing [`LocalGateway`](super::LocalGateway).

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::GatewayError;

/// String values under string keys, like browser local storage.
pub trait RecordStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, GatewayError>;
    fn set(&self, key: &str, value: &str) -> Result<(), GatewayError>;
}

/// Process-local storage; contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, GatewayError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| GatewayError::Storage("memory storage poisoned".into()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), GatewayError> {
        self.entries
            .write()
            .map_err(|_| GatewayError::Storage("memory storage poisoned".into()))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, GatewayError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Keys may hold user names; anything outside `[A-Za-z0-9_-]` is hex-escaped.
    fn path_for(&self, key: &str) -> PathBuf {
        let mut file_name = String::with_capacity(key.len() + 5);
        for byte in key.bytes() {
            match byte {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' => {
                    file_name.push(byte as char)
                }
                _ => file_name.push_str(&format!("%{byte:02X}")),
            }
        }
        file_name.push_str(".json");
        self.dir.join(file_name)
    }
}

impl RecordStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, GatewayError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), GatewayError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}
