//! Content store trait for durable byte storage.

use std::ops::Range;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;

use crate::result::AppResult;
use crate::types::ContentKey;

/// An owned byte stream handed out by read operations.
pub type ByteStream = BoxStream<'static, Result<Bytes, std::io::Error>>;

/// A possibly borrowed byte stream consumed by write operations, so a
/// transport can feed request bodies or multipart fields straight through
/// without buffering them first.
pub type ByteSource<'a> = BoxStream<'a, Result<Bytes, std::io::Error>>;

/// Trait for durable byte storage addressed by opaque [`ContentKey`]s.
///
/// The content store knows nothing about owners, names, or paths — the
/// tree index holds that mapping and performs every ownership check before
/// a key reaches this layer. Each key is written once and then either
/// replaced wholesale (a new key is bound to the file record before the
/// old one is released) or deleted.
///
/// The trait is defined here in `vault-core` and implemented in
/// `vault-content`.
#[async_trait]
pub trait ContentStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the store type name (e.g., "local").
    fn store_type(&self) -> &str;

    /// Stream bytes into the given key, returning the observed byte count.
    ///
    /// If the stream yields an error the partially written key must be
    /// discarded before the error propagates — an incomplete stream never
    /// leaves bytes behind.
    async fn write_stream(&self, key: ContentKey, stream: ByteSource<'_>) -> AppResult<u64>;

    /// Open a full read stream for the given key.
    async fn read_stream(&self, key: ContentKey) -> AppResult<ByteStream>;

    /// Open a read stream covering `range` (byte offsets) of the given key.
    ///
    /// The caller is responsible for clamping the range to the stored
    /// length before requesting it.
    async fn read_range(&self, key: ContentKey, range: Range<u64>) -> AppResult<ByteStream>;

    /// Delete the bytes behind the given key. Deleting an absent key is
    /// not an error (release must be idempotent for crash recovery).
    async fn delete(&self, key: ContentKey) -> AppResult<()>;

    /// Check whether the given key holds content.
    async fn exists(&self, key: ContentKey) -> AppResult<bool>;

    /// Return the stored length in bytes for the given key.
    async fn len(&self, key: ContentKey) -> AppResult<u64>;
}
