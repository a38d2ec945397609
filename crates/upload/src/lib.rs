//! Document upload workflow for the practice platform.
//!
//! Transfers client documents to the platform's ingestion API, choosing
//! between single-shot and chunked transfer by file size, with server
//! pre-flight validation, whole-operation retry with exponential backoff,
//! two-level progress reporting, and sequential batch upload.

mod api;
mod batch;
mod chunked;
mod http;
mod orchestrator;
mod progress;
mod retry;
mod single_shot;
mod validation;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{ApiFuture, ChunkUpload, DocumentApi};
pub use chunked::{ChunkReader, ChunkedUploader, FileChunk, total_chunks_for};
pub use http::HttpDocumentApi;
pub use orchestrator::Uploader;
pub use progress::{ChunkProgressFn, FileProgressFn, OverallProgressFn, ProgressHandle, ProgressSinks};
pub use retry::RetryPolicy;
pub use single_shot::SingleShotUploader;
pub use validation::{guess_mime_type, validate_file};

/// Files at or below this size go through the single-shot path: 10 MiB.
pub const SINGLE_SHOT_THRESHOLD: u64 = 10 * 1024 * 1024;

/// Default chunk size for the chunked path: 5 MiB.
///
/// The server may negotiate a different size via
/// `ChunkedUploadConfig.chunk_size`.
pub const DEFAULT_CHUNK_SIZE: u64 = 5 * 1024 * 1024;

/// Errors produced by the upload workflow.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("transport error: {0}")]
    Transport(#[from] docferry_transport::TransportError),

    #[error("file rejected by validation: {}", errors.join("; "))]
    Validation { errors: Vec<String> },

    #[error("file too large for single-shot upload: {size} bytes (limit {limit})")]
    TooLarge { size: u64, limit: u64 },

    #[error("unexpected API response: {0}")]
    Protocol(String),
}
