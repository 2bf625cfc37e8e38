//! File-backed token store
//!
//! Persists the token as the whole content of a single file so it survives
//! restarts. Clearing the token removes the file.

use log::warn;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::LocalTokenStore;

#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LocalTokenStore for FileTokenStore {
    fn token(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let token = content.trim();
                (!token.is_empty()).then(|| token.to_string())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!("Failed to read token file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn set_token(&mut self, token: Option<String>) {
        let result = match token {
            Some(token) => {
                if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    if let Err(e) = fs::create_dir_all(parent) {
                        warn!("Failed to create token directory {}: {}", parent.display(), e);
                    }
                }
                fs::write(&self.path, token)
            }
            None => match fs::remove_file(&self.path) {
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                other => other,
            },
        };

        if let Err(e) = result {
            warn!("Failed to update token file {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_means_no_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("token"));
        assert_eq!(store.token(), None);
    }

    #[test]
    fn test_write_read_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("token");
        let mut store = FileTokenStore::new(&path);

        store.set_token(Some("abc-123".into()));
        assert!(path.exists());
        assert_eq!(store.token().as_deref(), Some("abc-123"));

        // A fresh instance on the same path sees the persisted token.
        assert_eq!(FileTokenStore::new(&path).token().as_deref(), Some("abc-123"));

        store.set_token(None);
        assert!(!path.exists());
        assert_eq!(store.token(), None);

        // Clearing twice is harmless.
        store.set_token(None);
    }

    #[test]
    fn test_blank_file_means_no_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        fs::write(&path, "  \n").unwrap();
        assert_eq!(FileTokenStore::new(&path).token(), None);
    }
}
