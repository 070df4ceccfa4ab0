use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::debug;
use once_cell::sync::Lazy;

use crate::error::{CsvIndexError, Result};

static FILE_CACHE: Lazy<FileCache> = Lazy::new(FileCache::default);

/// Process-wide cache of file contents, keyed by path.
///
/// Repeated indexing of the same file reads it from disk only once.
#[derive(Debug, Default)]
pub struct FileCache {
    files: Mutex<HashMap<PathBuf, Arc<[u8]>>>,
}

impl FileCache {
    pub fn global() -> &'static FileCache {
        &FILE_CACHE
    }

    /// Returns the contents of `path`, reading and caching them if `path` was not requested before
    pub fn find(&self, path: &Path) -> Result<Arc<[u8]>> {
        if let Some(data) = self.lock().get(path) {
            return Ok(data.clone());
        }
        let data: Arc<[u8]> = read_file(path)?.into();
        debug!("[FC] cached {path:?} ({} bytes)", data.len());
        self.lock().insert(path.to_path_buf(), data.clone());
        Ok(data)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.lock().contains_key(path)
    }

    /// Evicts `path`, returns whether it was cached
    pub fn remove(&self, path: &Path) -> bool {
        self.lock().remove(path).is_some()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, Arc<[u8]>>> {
        //the map stays consistent even if a holder panicked
        self.files.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub(crate) fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| CsvIndexError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn contents_are_read_once() {
        let cache = FileCache::default();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "x,y\n1,2\n").unwrap();

        let first = cache.find(file.path()).unwrap();
        assert!(cache.contains(file.path()));

        //later changes are not picked up until the entry is evicted
        write!(file, "3,4\n").unwrap();
        assert_eq!(cache.find(file.path()).unwrap(), first);
        assert!(cache.remove(file.path()));
        assert_eq!(&*cache.find(file.path()).unwrap(), b"x,y\n1,2\n3,4\n");
    }

    #[test]
    fn missing_files_are_not_cached() {
        let cache = FileCache::default();
        let path = Path::new("/definitely/not/here.csv");
        assert!(matches!(cache.find(path), Err(CsvIndexError::Io { .. })));
        assert!(!cache.contains(path));
    }
}
