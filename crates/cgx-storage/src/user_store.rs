//! User accounts kept in `users.toml`
//!
//! ```toml
//! [[users]]
//! username = "alice"
//! email = "alice@example.com"
//! is_staff = true
//! ```

use crate::course_store::FileSystemStore;
use cgx_core::content::{UserAccount, UserDirectory};
use cgx_core::error::{CgxError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::debug;

#[derive(Debug, Default, Serialize, Deserialize)]
struct UsersFile {
    #[serde(default)]
    users: Vec<UserAccount>,
}

impl FileSystemStore {
    /// All accounts; empty when the file does not exist yet
    pub fn load_accounts(&self) -> Result<Vec<UserAccount>> {
        if !self.users_path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.users_path)?;
        let file: UsersFile = toml::from_str(&content)
            .map_err(|e| CgxError::Toml(format!("{:?}: {}", self.users_path, e)))?;
        Ok(file.users)
    }

    pub fn find_account(&self, username: &str) -> Result<Option<UserAccount>> {
        Ok(self
            .load_accounts()?
            .into_iter()
            .find(|u| u.username == username))
    }

    /// Insert or replace the account with the same username
    pub fn save_account(&self, account: UserAccount) -> Result<()> {
        let mut users = self.load_accounts()?;
        match users.iter_mut().find(|u| u.username == account.username) {
            Some(existing) => *existing = account,
            None => users.push(account),
        }
        users.sort_by(|a, b| a.username.cmp(&b.username));

        let content = toml::to_string_pretty(&UsersFile { users })
            .map_err(|e| CgxError::Toml(e.to_string()))?;
        fs::write(&self.users_path, content)?;
        debug!("Saved users to {:?}", self.users_path);
        Ok(())
    }
}

impl UserDirectory for FileSystemStore {
    fn find_user(&self, username: &str) -> Result<Option<UserAccount>> {
        self.find_account(username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = FileSystemStore::new(temp.path()).unwrap();
        assert!(store.load_accounts().unwrap().is_empty());
        assert!(store.find_user("alice").unwrap().is_none());
    }

    #[test]
    fn test_save_upserts() {
        let temp = TempDir::new().unwrap();
        let store = FileSystemStore::new(temp.path()).unwrap();

        store
            .save_account(UserAccount::new("bob", "bob@example.com"))
            .unwrap();
        store
            .save_account(UserAccount::new("alice", "old@example.com"))
            .unwrap();
        store
            .save_account(UserAccount::new("alice", "alice@example.com"))
            .unwrap();

        let users = store.load_accounts().unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].username, "alice");
        assert_eq!(
            store.find_user("alice").unwrap().unwrap().email,
            "alice@example.com"
        );
    }

    #[test]
    fn test_reads_hand_written_file() {
        let temp = TempDir::new().unwrap();
        let store = FileSystemStore::new(temp.path()).unwrap();
        fs::write(
            temp.path().join("users.toml"),
            "[[users]]\nusername = \"alice\"\nemail = \"alice@example.com\"\nis_staff = true\n",
        )
        .unwrap();

        let alice = store.find_user("alice").unwrap().unwrap();
        assert!(alice.is_staff);
    }

    #[test]
    fn test_malformed_file() {
        let temp = TempDir::new().unwrap();
        let store = FileSystemStore::new(temp.path()).unwrap();
        fs::write(temp.path().join("users.toml"), "users = 3").unwrap();

        let err = store.find_user("alice").unwrap_err();
        assert!(matches!(err, CgxError::Toml(_)));
    }
}
