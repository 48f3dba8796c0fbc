//! File content operations: upload, content replacement, streamed reads,
//! rename, star, delete.
//!
//! Content transfers never hold the per-owner mutation lock — only the
//! metadata transition that binds or releases a content key does (inside
//! the tree index). A failed or aborted transfer discards the partial key
//! and commits nothing.

use std::sync::Arc;

use tracing::{error, warn};

use vault_core::error::AppError;
use vault_core::result::AppResult;
use vault_core::traits::content::{ByteSource, ByteStream, ContentStore};
use vault_core::types::{ContentKey, FileId, FolderId};
use vault_entity::file::{CreateFile, File};
use vault_index::TreeIndex;

use crate::context::RequestContext;

/// Parameters for a streaming upload. The stream may borrow from the
/// transport's request machinery; it is fully drained before `upload`
/// returns.
pub struct UploadParams<'a> {
    /// The file name as sent by the client.
    pub name: String,
    /// Target folder (None for root-level).
    pub folder_id: Option<FolderId>,
    /// MIME type declared by the client, if any.
    pub declared_mime: Option<String>,
    /// The content byte stream.
    pub content: ByteSource<'a>,
}

/// A requested byte range, as parsed from a `Range` header:
/// `bytes=start-end`, `bytes=start-`, or `bytes=-suffix`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    /// First byte offset, if given.
    pub start: Option<u64>,
    /// Last byte offset (inclusive) for `start-end`, or the suffix length
    /// for `-suffix`.
    pub end: Option<u64>,
}

/// An open read stream plus the metadata the transport needs to frame it.
pub struct FileStream {
    /// The file record (ownership already verified).
    pub file: File,
    /// The content byte stream.
    pub stream: ByteStream,
    /// Number of bytes the stream will yield.
    pub content_length: u64,
    /// `(first, last, total)` when this is a partial response.
    pub range: Option<(u64, u64, u64)>,
}

impl std::fmt::Debug for FileStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStream")
            .field("file", &self.file)
            .field("content_length", &self.content_length)
            .field("range", &self.range)
            .finish_non_exhaustive()
    }
}

/// Handles file content binding and streaming.
#[derive(Debug, Clone)]
pub struct FileService {
    index: Arc<TreeIndex>,
    content: Arc<dyn ContentStore>,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(index: Arc<TreeIndex>, content: Arc<dyn ContentStore>) -> Self {
        Self { index, content }
    }

    /// Uploads a file: streams the content into a fresh key, then commits
    /// the record. All-or-nothing — a stream failure discards the partial
    /// key, and a commit failure (say the target folder was deleted while
    /// bytes were in flight) releases the freshly written key.
    pub async fn upload(&self, ctx: &RequestContext, params: UploadParams<'_>) -> AppResult<File> {
        // Cheap pre-check so a doomed transfer fails before the bytes move.
        // The index re-validates under the owner lock at commit time.
        if let Some(folder_id) = params.folder_id {
            self.index.get_folder(ctx.owner_id, folder_id)?;
        }

        let key = ContentKey::new();
        let size = self.content.write_stream(key, params.content).await?;
        let mime_type = resolve_mime(params.declared_mime.as_deref(), &params.name);

        let record = CreateFile {
            name: params.name,
            folder_id: params.folder_id,
            size,
            mime_type,
            content_key: key,
        };
        match self.index.insert_file(ctx.owner_id, record).await {
            Ok(file) => Ok(file),
            Err(e) => {
                self.discard(key).await;
                Err(e)
            }
        }
    }

    /// Replaces a file's content: writes the new key, swaps it into the
    /// record, and only then releases the old key, so a reader that
    /// started before the swap still completes against valid bytes.
    pub async fn replace_content(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
        content: ByteSource<'_>,
        declared_mime: Option<String>,
    ) -> AppResult<File> {
        // Ownership gate before any byte is accepted.
        let existing = self.index.get_file(ctx.owner_id, file_id)?;

        let key = ContentKey::new();
        let size = self.content.write_stream(key, content).await?;
        let mime_type = resolve_mime(declared_mime.as_deref(), &existing.name);

        let (file, old_key) = match self
            .index
            .set_file_content(ctx.owner_id, file_id, key, size, mime_type)
            .await
        {
            Ok(swapped) => swapped,
            Err(e) => {
                self.discard(key).await;
                return Err(e);
            }
        };

        if let Err(e) = self.content.delete(old_key).await {
            error!(key = %old_key, error = %e, "Failed to release replaced content key");
            return Err(AppError::integrity(format!(
                "Replaced content key {old_key} could not be released"
            )));
        }
        Ok(file)
    }

    /// Opens a read stream for download or preview. The ownership check
    /// happens here, before any byte is served — the content store itself
    /// is not owner-aware.
    pub async fn open_stream(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
        range: Option<ByteRange>,
    ) -> AppResult<FileStream> {
        let file = self.index.get_file(ctx.owner_id, file_id)?;

        if let Some(range) = range {
            let (first, last) = resolve_range(range, file.size)?;
            let stream = self.content.read_range(file.content_key, first..last + 1).await?;
            return Ok(FileStream {
                content_length: last - first + 1,
                range: Some((first, last, file.size)),
                stream,
                file,
            });
        }

        let stream = self.content.read_stream(file.content_key).await?;
        Ok(FileStream {
            content_length: file.size,
            range: None,
            stream,
            file,
        })
    }

    /// Gets a file record by ID.
    pub fn get_file(&self, ctx: &RequestContext, file_id: FileId) -> AppResult<File> {
        self.index.get_file(ctx.owner_id, file_id)
    }

    /// Renames a file (metadata only).
    pub async fn rename_file(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
        new_name: &str,
    ) -> AppResult<File> {
        self.index
            .rename_file(ctx.owner_id, file_id, new_name)
            .await
    }

    /// Flips the starred flag.
    pub async fn toggle_star(&self, ctx: &RequestContext, file_id: FileId) -> AppResult<File> {
        self.index.toggle_star(ctx.owner_id, file_id).await
    }

    /// Deletes a file and releases its content key.
    pub async fn delete_file(&self, ctx: &RequestContext, file_id: FileId) -> AppResult<()> {
        let file = self.index.delete_file(ctx.owner_id, file_id).await?;
        if let Err(e) = self.content.delete(file.content_key).await {
            error!(key = %file.content_key, error = %e, "Failed to release deleted file's content key");
            return Err(AppError::integrity(format!(
                "Content key {} could not be released",
                file.content_key
            )));
        }
        Ok(())
    }

    /// Best-effort discard of a key that never reached a committed record.
    async fn discard(&self, key: ContentKey) {
        if let Err(e) = self.content.delete(key).await {
            warn!(%key, error = %e, "Failed to discard uncommitted content key");
        }
    }
}

/// Pick the MIME type for a file: the declared type wins unless it is
/// absent or the generic fallback, in which case the name is sniffed.
fn resolve_mime(declared: Option<&str>, name: &str) -> String {
    match declared {
        Some(mime) if !mime.is_empty() && mime != "application/octet-stream" => mime.to_string(),
        _ => mime_guess::from_path(name)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string(),
    }
}

/// Resolve a parsed range request against the stored size, returning
/// inclusive `(first, last)` offsets.
fn resolve_range(range: ByteRange, size: u64) -> AppResult<(u64, u64)> {
    let (first, last) = match (range.start, range.end) {
        (Some(start), Some(end)) => (start, end.min(size.saturating_sub(1))),
        (Some(start), None) => (start, size.saturating_sub(1)),
        // Suffix range: the last `n` bytes.
        (None, Some(n)) => (size.saturating_sub(n), size.saturating_sub(1)),
        (None, None) => return Err(AppError::validation("Empty byte range")),
    };
    if size == 0 || first >= size || first > last {
        return Err(AppError::validation("Requested range not satisfiable"));
    }
    Ok((first, last))
}
