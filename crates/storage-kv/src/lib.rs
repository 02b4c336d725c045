//! Durable on-device key-value substrate backed by one file per key.
//!
//! Keys are namespaced strings (`tripsByUser:<id>`); values are serialized
//! entity lists. Each `get`/`set`/`remove` is a single filesystem operation,
//! which is the only atomicity the store provides. Writes go through a
//! temp-file rename so a crash mid-write cannot leave a torn value behind.

use async_trait::async_trait;
use log::debug;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tokio::fs;

use wayfarer_core::cache::KeyValueStorage;
use wayfarer_core::{Error, Result};

/// File-backed [`KeyValueStorage`] rooted at a device data directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Open (and create if needed) a store rooted at `root`.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .await
            .map_err(|e| Error::cache(format!("cannot create storage dir: {}", e)))?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", encode_key(key)))
    }
}

/// Map an arbitrary key onto a safe filename. Alphanumerics, `-`, `_` and
/// `.` pass through; everything else becomes `%XX`.
fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'.' => {
                out.push(byte as char)
            }
            _ => {
                let _ = write!(out, "%{:02X}", byte);
            }
        }
    }
    out
}

async fn write_atomic(path: &Path, value: &str) -> std::io::Result<()> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, value).await?;
    fs::rename(&tmp, path).await
}

#[async_trait]
impl KeyValueStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::cache(format!("read of {} failed: {}", key, e))),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        debug!("storing {} bytes under {}", value.len(), key);
        write_atomic(&path, value)
            .await
            .map_err(|e| Error::cache(format!("write of {} failed: {}", key, e)))
    }

    async fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::cache(format!("remove of {} failed: {}", key, e))),
        }
    }
}
