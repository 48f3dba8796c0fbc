//! Local filesystem content store.

use std::io::SeekFrom;
use std::ops::Range;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::StreamExt;
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio_util::io::ReaderStream;
use tracing::{debug, error, warn};

use vault_core::error::{AppError, ErrorKind};
use vault_core::result::AppResult;
use vault_core::traits::content::{ByteSource, ByteStream, ContentStore};
use vault_core::types::ContentKey;

/// Content store backed by a local directory.
///
/// Keys map to `<root>/<first two hex chars>/<key>` so no single directory
/// accumulates every object. Writes stream into a `.part` sibling first and
/// rename into place on success; a failed or aborted stream removes the
/// partial file before the error propagates, so an incomplete transfer
/// never leaves bytes behind.
#[derive(Debug, Clone)]
pub struct LocalContentStore {
    root: PathBuf,
}

impl LocalContentStore {
    /// Create a store rooted at the given directory, creating it if needed.
    pub async fn new(root_path: impl Into<PathBuf>) -> AppResult<Self> {
        let root = root_path.into();
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create content root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Resolve a key to its on-disk path.
    fn resolve(&self, key: ContentKey) -> PathBuf {
        let name = key.as_uuid().simple().to_string();
        self.root.join(&name[..2]).join(name)
    }

    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create content directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }

    /// Open a key for reading. A missing file here means the tree index
    /// holds a key the store does not — a fatal integrity error, since
    /// every read goes through an owned file record.
    async fn open(&self, key: ContentKey) -> AppResult<fs::File> {
        let path = self.resolve(key);
        fs::File::open(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                error!(%key, "Content key has no bytes behind it");
                AppError::integrity(format!("Orphaned content key: {key}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to open content: {key}"),
                    e,
                )
            }
        })
    }
}

#[async_trait]
impl ContentStore for LocalContentStore {
    fn store_type(&self) -> &str {
        "local"
    }

    async fn write_stream(&self, key: ContentKey, mut stream: ByteSource<'_>) -> AppResult<u64> {
        let path = self.resolve(key);
        self.ensure_parent(&path).await?;
        let partial = path.with_extension("part");

        let mut file = fs::File::create(&partial).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create content file: {key}"),
                e,
            )
        })?;

        let mut total_bytes = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    drop(file);
                    discard_partial(&partial).await;
                    return Err(AppError::with_source(
                        ErrorKind::ContentTransfer,
                        format!("Content stream failed after {total_bytes} bytes"),
                        e,
                    ));
                }
            };
            total_bytes += chunk.len() as u64;
            if let Err(e) = file.write_all(&chunk).await {
                drop(file);
                discard_partial(&partial).await;
                return Err(AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to write content chunk: {key}"),
                    e,
                ));
            }
        }

        if let Err(e) = file.flush().await {
            drop(file);
            discard_partial(&partial).await;
            return Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to flush content: {key}"),
                e,
            ));
        }
        drop(file);

        fs::rename(&partial, &path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to commit content: {key}"),
                e,
            )
        })?;

        debug!(%key, bytes = total_bytes, "Content written");
        Ok(total_bytes)
    }

    async fn read_stream(&self, key: ContentKey) -> AppResult<ByteStream> {
        let file = self.open(key).await?;
        let stream = ReaderStream::new(file);
        Ok(Box::pin(stream))
    }

    async fn read_range(&self, key: ContentKey, range: Range<u64>) -> AppResult<ByteStream> {
        let mut file = self.open(key).await?;
        file.seek(SeekFrom::Start(range.start)).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to seek content: {key}"),
                e,
            )
        })?;
        let limited = file.take(range.end - range.start);
        Ok(Box::pin(ReaderStream::new(limited)))
    }

    async fn delete(&self, key: ContentKey) -> AppResult<()> {
        let path = self.resolve(key);
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(%key, "Content deleted");
                Ok(())
            }
            // Release is idempotent so crash recovery can retry it.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete content: {key}"),
                e,
            )),
        }
    }

    async fn exists(&self, key: ContentKey) -> AppResult<bool> {
        Ok(fs::try_exists(self.resolve(key)).await.unwrap_or(false))
    }

    async fn len(&self, key: ContentKey) -> AppResult<u64> {
        let path = self.resolve(key);
        let meta = fs::metadata(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                error!(%key, "Content key has no bytes behind it");
                AppError::integrity(format!("Orphaned content key: {key}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to stat content: {key}"),
                    e,
                )
            }
        })?;
        Ok(meta.len())
    }
}

/// Best-effort removal of a partial write; the original error is what the
/// caller needs to see.
async fn discard_partial(partial: &Path) {
    if let Err(e) = fs::remove_file(partial).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %partial.display(), error = %e, "Failed to discard partial content");
        }
    }
}
