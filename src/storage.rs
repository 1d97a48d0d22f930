use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::{fs, io};

use spdlog::warn;

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> io::Result<()>;
}

#[derive(Default, Debug, Clone)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Flat JSON object on disk. Every `set` rewrites the whole file.
pub struct FileStore {
    path: PathBuf,
    items: BTreeMap<String, String>,
}

impl FileStore {
    pub fn open(path: &Path) -> io::Result<FileStore> {
        let items = match fs::read_to_string(path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => match serde_json::from_str(&content) {
                Ok(items) => items,
                Err(e) => {
                    warn!("Discarding unreadable storage file {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(io::Error::new(e.kind(), format!("Error opening storage file {}: {}", path.display(), e))),
        };

        Ok(FileStore {
            path: path.to_path_buf(),
            items,
        })
    }

    fn flush(&self) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.items)
            .map_err(|e| io::Error::new(ErrorKind::InvalidData, e))?;
        fs::write(&self.path, content)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        self.flush()
    }
}
