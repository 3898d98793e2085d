//! File-backed vouch store.

use crate::book::VouchBook;
use chrono::Utc;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use vouch_common::{GuildId, LoadPolicy, Result, Vouch, VouchError};

/// Vouch store backed by one JSON document.
///
/// Reads always load the whole document. Writes replace it through a sibling
/// temp file and a rename, so readers see either the old or the new document.
/// Writers inside this process are serialised by an internal mutex; separate
/// processes sharing the file are not coordinated.
#[derive(Debug)]
pub struct VouchStore {
    path: PathBuf,
    policy: LoadPolicy,
    write_lock: Mutex<()>,
}

impl VouchStore {
    /// Creates a store for the document at `path`. Nothing is read yet.
    pub fn new(path: impl Into<PathBuf>, policy: LoadPolicy) -> Self {
        Self {
            path: path.into(),
            policy,
            write_lock: Mutex::new(()),
        }
    }

    /// Location of the document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole document.
    ///
    /// A missing file is an empty book. An unreadable or malformed file is an
    /// empty book under [`LoadPolicy::Lenient`] and an error under
    /// [`LoadPolicy::Strict`]. The file itself is left where it is.
    pub async fn load(&self) -> Result<VouchBook> {
        self.read_document(false).await
    }

    /// Replaces the whole document with `book`.
    pub async fn save(&self, book: &VouchBook) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.write_document(book).await
    }

    /// The ledger of one guild, in insertion order.
    pub async fn ledger(&self, guild: GuildId) -> Result<Vec<Vouch>> {
        Ok(self.load().await?.ledger(guild).to_vec())
    }

    /// Appends `vouch` to the ledger of `guild` and persists it.
    ///
    /// Returns the vouch's 1-based ordinal within the guild. If the write
    /// fails the append is discarded and nothing becomes visible.
    ///
    /// Under [`LoadPolicy::Lenient`] an unreadable document is first renamed
    /// to `<file>.corrupt-<timestamp>` so the new document never replaces the
    /// only copy of the old one. If it cannot be moved the append fails.
    pub async fn append(&self, guild: GuildId, vouch: Vouch) -> Result<usize> {
        let _guard = self.write_lock.lock().await;

        let mut book = self.read_document(true).await?;
        let ordinal = book.append(guild, vouch);
        self.write_document(&book).await?;

        debug!(%guild, ordinal, "Appended vouch");
        Ok(ordinal)
    }

    async fn write_document(&self, book: &VouchBook) -> Result<()> {
        let json = serde_json::to_string_pretty(book)
            .map_err(|e| VouchError::persistence_with_source("Failed to encode vouches", e))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| self.write_error(e))?;
        }

        let temp_path = self.temp_path();
        let mut file = fs::File::create(&temp_path)
            .await
            .map_err(|e| self.write_error(e))?;
        file.write_all(json.as_bytes())
            .await
            .map_err(|e| self.write_error(e))?;
        file.sync_all().await.map_err(|e| self.write_error(e))?;
        drop(file);

        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| self.write_error(e))?;

        debug!(
            path = %self.path.display(),
            guilds = book.guild_count(),
            vouches = book.vouch_count(),
            "Saved vouch document"
        );
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        self.sibling(".tmp")
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map_or_else(|| OsString::from("vouches.json"), OsString::from);
        name.push(suffix);
        self.path.with_file_name(name)
    }

    fn write_error(&self, error: std::io::Error) -> VouchError {
        VouchError::persistence_with_source(
            format!("Failed to write {}", self.path.display()),
            error,
        )
    }

    async fn read_document(&self, set_aside: bool) -> Result<VouchBook> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No vouch document yet");
                return Ok(VouchBook::new());
            }
            Err(e) => {
                // Only undecodable content is moved aside; other read failures
                // say nothing about what the file holds.
                let undecodable = e.kind() == ErrorKind::InvalidData;
                return self
                    .unreadable("Failed to read vouch document", e, set_aside && undecodable)
                    .await;
            }
        };

        match serde_json::from_str(&content) {
            Ok(book) => Ok(book),
            Err(e) => {
                self.unreadable("Vouch document could not be parsed", e, set_aside)
                    .await
            }
        }
    }

    async fn unreadable<E>(&self, message: &str, error: E, set_aside: bool) -> Result<VouchBook>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        if self.policy == LoadPolicy::Strict {
            return Err(VouchError::persistence_with_source(
                format!("{message}: {}", self.path.display()),
                error,
            ));
        }

        if set_aside {
            let aside = self.set_aside().await?;
            warn!(
                path = %self.path.display(),
                moved_to = %aside.display(),
                error = %error,
                "{message}; moved it aside and starting empty"
            );
        } else {
            warn!(
                path = %self.path.display(),
                error = %error,
                "{message}; treating it as empty"
            );
        }
        Ok(VouchBook::new())
    }

    async fn set_aside(&self) -> Result<PathBuf> {
        let aside = self.sibling(&format!(
            ".corrupt-{}",
            Utc::now().format("%Y%m%dT%H%M%S%3fZ")
        ));
        fs::rename(&self.path, &aside).await.map_err(|e| {
            VouchError::persistence_with_source(
                format!(
                    "Refusing to overwrite unreadable {}: could not move it aside",
                    self.path.display()
                ),
                e,
            )
        })?;
        Ok(aside)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vouch_common::test_utils::{discord_fixtures, vouch_fixtures};

    #[test]
    fn test_temp_path_is_sibling() {
        let store = VouchStore::new("/data/vouches.json", LoadPolicy::Lenient);
        assert_eq!(store.temp_path(), PathBuf::from("/data/vouches.json.tmp"));
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = VouchStore::new(dir.path().join("vouches.json"), LoadPolicy::Strict);
        let book = store.load().await.unwrap();
        assert!(book.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_respects_policy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vouches.json");
        std::fs::write(&path, "{ not json").unwrap();

        let lenient = VouchStore::new(&path, LoadPolicy::Lenient);
        assert!(lenient.load().await.unwrap().is_empty());

        let strict = VouchStore::new(&path, LoadPolicy::Strict);
        let err = strict.load().await.unwrap_err();
        assert!(matches!(err, VouchError::Persistence { .. }));
    }

    #[tokio::test]
    async fn test_append_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = VouchStore::new(dir.path().join("nested/data/vouches.json"), LoadPolicy::Strict);
        let actor = discord_fixtures::test_actor(5);
        let guild = discord_fixtures::test_guild_id();

        let ordinal = store
            .append(guild, vouch_fixtures::sample_vouch(&actor, 1))
            .await
            .unwrap();
        assert_eq!(ordinal, 1);
        assert!(store.path().exists());
        assert!(!store.temp_path().exists());
    }

    #[tokio::test]
    async fn test_failed_write_leaves_nothing_visible() {
        let dir = tempfile::tempdir().unwrap();
        // The document path is a directory, so the final rename must fail.
        let path = dir.path().join("vouches.json");
        std::fs::create_dir(&path).unwrap();
        let store = VouchStore::new(&path, LoadPolicy::Lenient);
        let actor = discord_fixtures::test_actor(5);
        let guild = discord_fixtures::test_guild_id();

        let result = store.append(guild, vouch_fixtures::sample_vouch(&actor, 1)).await;
        assert!(matches!(result, Err(VouchError::Persistence { .. })));
        assert!(store.ledger(guild).await.unwrap().is_empty());
    }

    const DRIFTED: &str = r#"{"1": [{"userId": "5", "stars": 5, "productChannel": "p", "reason": "r", "proof": null, "timestamp": "yesterday"}]}"#;

    fn corrupt_copies(dir: &std::path::Path) -> Vec<PathBuf> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|p| p.to_string_lossy().contains("vouches.json.corrupt-"))
            .collect()
    }

    #[tokio::test]
    async fn test_lenient_append_moves_unparseable_document_aside() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vouches.json");
        std::fs::write(&path, DRIFTED).unwrap();
        let store = VouchStore::new(&path, LoadPolicy::Lenient);
        let actor = discord_fixtures::test_actor(5);
        let guild = discord_fixtures::test_guild_id();

        // Reading alone never moves the file.
        assert!(store.load().await.unwrap().is_empty());
        assert!(corrupt_copies(dir.path()).is_empty());

        let ordinal = store
            .append(guild, vouch_fixtures::sample_vouch(&actor, 1))
            .await
            .unwrap();
        assert_eq!(ordinal, 1);

        let copies = corrupt_copies(dir.path());
        assert_eq!(copies.len(), 1);
        assert_eq!(std::fs::read_to_string(&copies[0]).unwrap(), DRIFTED);
        assert_eq!(store.load().await.unwrap().vouch_count(), 1);
    }

    #[tokio::test]
    async fn test_strict_append_keeps_unparseable_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vouches.json");
        std::fs::write(&path, DRIFTED).unwrap();
        let store = VouchStore::new(&path, LoadPolicy::Strict);
        let actor = discord_fixtures::test_actor(5);

        let result = store
            .append(discord_fixtures::test_guild_id(), vouch_fixtures::sample_vouch(&actor, 1))
            .await;
        assert!(matches!(result, Err(VouchError::Persistence { .. })));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), DRIFTED);
        assert!(corrupt_copies(dir.path()).is_empty());
    }
}
