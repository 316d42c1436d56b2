//! Local-disk storage for request photos
//!
//! Files are written into a single uploads directory that is also served
//! read-only over HTTP. Stored names are `{unix millis}-{original filename}`.

use chrono::Utc;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::core::config::StorageConfig;
use crate::core::error::AppError;

/// Name used when the client sends no usable filename
const FALLBACK_FILE_NAME: &str = "upload";

/// Upper bound on name bumps before giving up on a free name
const MAX_NAME_ATTEMPTS: i64 = 1000;

/// A file written to the uploads directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Generated name inside the uploads directory
    pub file_name: String,
    /// Percent-encoded path the file is served under, e.g. `/uploads/1700000000000-my%20photo.jpg`
    pub public_path: String,
    /// Location on disk
    pub disk_path: PathBuf,
}

/// Uploads directory on local disk
#[derive(Debug)]
pub struct LocalStorage {
    root: PathBuf,
    public_prefix: String,
}

impl LocalStorage {
    /// Open the uploads directory, creating it when missing
    pub async fn new(config: StorageConfig) -> Result<Self, AppError> {
        fs::create_dir_all(&config.uploads_dir).await?;

        info!("Uploads directory ready: {}", config.uploads_dir.display());

        Ok(Self {
            root: config.uploads_dir,
            public_prefix: config.public_prefix.trim_end_matches('/').to_string(),
        })
    }

    /// Directory the files live in
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// URL prefix the directory is served under
    pub fn public_prefix(&self) -> &str {
        &self.public_prefix
    }

    /// Build the stored name for an upload
    pub fn generate_file_name(timestamp_millis: i64, original_filename: &str) -> String {
        format!(
            "{}-{}",
            timestamp_millis,
            Self::sanitize_file_name(original_filename)
        )
    }

    /// Keep only the last path component so a crafted name cannot leave the directory
    fn sanitize_file_name(original_filename: &str) -> &str {
        let name = original_filename
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default()
            .trim();

        match name {
            "" | "." | ".." => FALLBACK_FILE_NAME,
            name => name,
        }
    }

    /// Write an upload under a fresh generated name
    ///
    /// Existing files are never overwritten: when the generated name is taken the
    /// timestamp prefix is bumped until a free name is found.
    pub async fn save(
        &self,
        original_filename: &str,
        data: &[u8],
    ) -> Result<StoredFile, AppError> {
        let mut timestamp_millis = Utc::now().timestamp_millis();

        for _ in 0..MAX_NAME_ATTEMPTS {
            let file_name = Self::generate_file_name(timestamp_millis, original_filename);
            let disk_path = self.root.join(&file_name);

            let mut file = match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&disk_path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    timestamp_millis += 1;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            if let Err(e) = write_all(&mut file, data).await {
                // Do not leave a truncated file behind
                drop(file);
                let _ = fs::remove_file(&disk_path).await;
                return Err(e.into());
            }

            debug!("Upload stored: name={}, size={}", file_name, data.len());

            return Ok(StoredFile {
                public_path: format!(
                    "{}/{}",
                    self.public_prefix,
                    urlencoding::encode(&file_name)
                ),
                file_name,
                disk_path,
            });
        }

        Err(std::io::Error::new(
            ErrorKind::AlreadyExists,
            format!("no free upload name for '{}'", original_filename),
        )
        .into())
    }
}

async fn write_all(file: &mut fs::File, data: &[u8]) -> std::io::Result<()> {
    file.write_all(data).await?;
    file.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn storage_in(dir: &Path) -> LocalStorage {
        LocalStorage::new(StorageConfig::new(dir.join("uploads")))
            .await
            .unwrap()
    }

    #[test]
    fn test_generate_file_name_prefixes_timestamp() {
        assert_eq!(
            LocalStorage::generate_file_name(1700000000000, "fridge.jpg"),
            "1700000000000-fridge.jpg"
        );
    }

    #[test]
    fn test_generate_file_name_strips_directories() {
        assert_eq!(
            LocalStorage::generate_file_name(1, "../../etc/passwd"),
            "1-passwd"
        );
        assert_eq!(
            LocalStorage::generate_file_name(1, "C:\\Users\\me\\oven.png"),
            "1-oven.png"
        );
        assert_eq!(LocalStorage::generate_file_name(1, ".."), "1-upload");
        assert_eq!(LocalStorage::generate_file_name(1, ""), "1-upload");
    }

    #[tokio::test]
    async fn test_new_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(dir.path()).await;

        assert!(storage.root().is_dir());
        assert_eq!(storage.public_prefix(), "/uploads");

        // Opening again over an existing directory is fine
        storage_in(dir.path()).await;
    }

    #[tokio::test]
    async fn test_save_writes_bytes_and_public_path() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(dir.path()).await;

        let stored = storage.save("washer.jpg", b"\x89PNG fake").await.unwrap();

        assert!(stored.file_name.ends_with("-washer.jpg"));
        assert_eq!(stored.public_path, format!("/uploads/{}", stored.file_name));
        assert_eq!(stored.disk_path, storage.root().join(&stored.file_name));
        assert_eq!(fs::read(&stored.disk_path).await.unwrap(), b"\x89PNG fake");
    }

    #[tokio::test]
    async fn test_public_path_is_percent_encoded() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(dir.path()).await;

        let stored = storage.save("a#b?c d.jpg", b"bytes").await.unwrap();

        assert!(stored.file_name.ends_with("-a#b?c d.jpg"));
        assert!(stored.public_path.ends_with("-a%23b%3Fc%20d.jpg"));
        assert_eq!(fs::read(&stored.disk_path).await.unwrap(), b"bytes");
    }

    #[tokio::test]
    async fn test_save_never_overwrites_same_name() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(dir.path()).await;

        let first = storage.save("photo.jpg", b"first").await.unwrap();
        let second = storage.save("photo.jpg", b"second").await.unwrap();

        assert_ne!(first.file_name, second.file_name);
        assert_eq!(fs::read(&first.disk_path).await.unwrap(), b"first");
        assert_eq!(fs::read(&second.disk_path).await.unwrap(), b"second");
    }
}
