//! Token store backed by a small JSON file.
//!
//! The three values are written to a freshly created, owner-only temp file in
//! the same directory which is then renamed over the target, so readers only
//! ever see the old or the new group.
//! Unreadable or incomplete files read as "no session".

use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use secrecy::ExposeSecret;
use tempfile::NamedTempFile;
use tracing::warn;

use crate::app_error::{AppError, AppResult};
use crate::application::ports::token_store::{ROLE_KEY, TOKEN_KEY, TokenStore, USERNAME_KEY};
use crate::entities::credential::Credential;

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

    fn dir(&self) -> &Path {
        self.path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }
}

impl TokenStore for FileTokenStore {
    fn save(&self, credential: &Credential) -> AppResult<()> {
        let values: HashMap<&str, &str> = HashMap::from([
            (TOKEN_KEY, credential.token.expose_secret()),
            (USERNAME_KEY, credential.subject.as_str()),
            (ROLE_KEY, credential.role.as_str()),
        ]);
        let body = serde_json::to_vec_pretty(&values).map_err(|e| AppError::Storage(e.to_string()))?;

        let dir = self.dir();
        fs::create_dir_all(dir).map_err(|e| AppError::Storage(e.to_string()))?;

        // Unique name, exclusive create, 0600 from the first byte
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| AppError::Storage(e.to_string()))?;
        tmp.write_all(&body).map_err(|e| AppError::Storage(e.to_string()))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| AppError::Storage(e.to_string()))?;
        tmp.persist(&self.path)
            .map(|_| ())
            .map_err(|e| AppError::Storage(e.error.to_string()))
    }

    fn read(&self) -> Option<Credential> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cannot read token store");
                return None;
            }
        };

        let mut values: HashMap<String, String> = match serde_json::from_slice(&raw) {
            Ok(values) => values,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "token store is corrupted, treating as logged out");
                return None;
            }
        };

        let credential = Credential::from_parts(
            values.remove(TOKEN_KEY),
            values.remove(USERNAME_KEY),
            values.remove(ROLE_KEY),
        );
        if credential.is_none() {
            warn!(path = %self.path.display(), "token store is incomplete, treating as logged out");
        }
        credential
    }

    fn clear(&self) -> AppResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> FileTokenStore {
        FileTokenStore::new(dir.path().join("nested").join("session.json"))
    }

    #[test]
    fn test_save_creates_parent_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.save(&Credential::new("abc", "alice", "USER")).unwrap();

        let read = store.read().unwrap();
        assert_eq!(read.token.expose_secret(), "abc");
        assert_eq!(read.subject, "alice");
        assert_eq!(read.role, "USER");

        let entries: Vec<_> = fs::read_dir(store.path().parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("session.json")]);
    }

    #[test]
    fn test_file_uses_fixed_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save(&Credential::new("abc", "alice", "USER")).unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&fs::read(store.path()).unwrap()).unwrap();
        assert_eq!(raw["ai_verifier_token"], "abc");
        assert_eq!(raw["ai_verifier_username"], "alice");
        assert_eq!(raw["ai_verifier_role"], "USER");
    }

    #[test]
    fn test_save_replaces_previous_credential() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save(&Credential::new("old", "admin", "ADMIN")).unwrap();
        store.save(&Credential::new("new", "alice", "USER")).unwrap();

        let read = store.read().unwrap();
        assert_eq!(read.token.expose_secret(), "new");
        assert_eq!(read.role, "USER");
    }

    #[test]
    fn test_missing_key_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(
            store.path(),
            r#"{"ai_verifier_token":"abc","ai_verifier_username":"alice"}"#,
        )
        .unwrap();

        assert!(store.read().is_none());
    }

    #[test]
    fn test_corrupted_file_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), b"{not json").unwrap();

        assert!(store.read().is_none());
        // A later save heals the store
        store.save(&Credential::new("abc", "alice", "USER")).unwrap();
        assert!(store.read().is_some());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.clear().unwrap();

        store.save(&Credential::new("abc", "alice", "USER")).unwrap();
        store.clear().unwrap();
        assert!(store.read().is_none());
        assert!(!store.path().exists());
        store.clear().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_save_ignores_planted_symlink_at_old_temp_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let parent = store.path().parent().unwrap();
        fs::create_dir_all(parent).unwrap();
        let elsewhere = dir.path().join("elsewhere.txt");
        fs::write(&elsewhere, b"untouched").unwrap();
        std::os::unix::fs::symlink(&elsewhere, parent.join("session.json.tmp")).unwrap();

        store
            .save(&Credential::new("secret-token", "alice", "USER"))
            .unwrap();

        assert_eq!(fs::read(&elsewhere).unwrap(), b"untouched");
        let meta = fs::symlink_metadata(store.path()).unwrap();
        assert!(!meta.file_type().is_symlink());
        assert_eq!(store.read().unwrap().token.expose_secret(), "secret-token");
    }

    #[cfg(unix)]
    #[test]
    fn test_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save(&Credential::new("abc", "alice", "USER")).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
