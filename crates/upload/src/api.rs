//! Abstract ingestion API and the chunk-call payload.
//!
//! `DocumentApi` is the seam between upload logic and HTTP: production code
//! uses [`HttpDocumentApi`](crate::HttpDocumentApi), tests use mocks.

use std::future::Future;
use std::pin::Pin;

use docferry_protocol::{
    ChunkResponse, ChunkedUploadConfig, FileValidationResult, InitiateUploadRequest,
    UploadProgress, UploadResult, UploadStatistics, UploadTarget, ValidateDocumentRequest,
};
pub use docferry_transport::ByteProgressFn;

use crate::UploadError;

/// Boxed future returned by [`DocumentApi`] methods.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, UploadError>> + Send + 'a>>;

/// One part of a chunked upload.
///
/// Target metadata is repeated on every part because the server is stateless
/// per call and re-validates target fields each time.
#[derive(Debug, Clone)]
pub struct ChunkUpload {
    pub upload_id: String,
    pub part_number: u32,
    pub total_parts: u32,
    pub file_name: String,
    pub target: UploadTarget,
    pub data: Vec<u8>,
}

/// Client-side view of the document-ingestion API.
pub trait DocumentApi: Send + Sync {
    /// Pre-flight validation of a proposed upload.
    fn validate(&self, req: &ValidateDocumentRequest) -> ApiFuture<'_, FileValidationResult>;

    /// Whole-file upload without target metadata (simple path).
    fn upload_file(
        &self,
        file_name: &str,
        mime_type: &str,
        data: Vec<u8>,
        progress: Option<ByteProgressFn>,
    ) -> ApiFuture<'_, UploadResult>;

    /// Whole-file document upload with target metadata (single-shot path).
    fn upload_document(
        &self,
        file_name: &str,
        mime_type: &str,
        data: Vec<u8>,
        target: &UploadTarget,
        progress: Option<ByteProgressFn>,
    ) -> ApiFuture<'_, UploadResult>;

    /// Starts a chunked upload session.
    fn initiate(&self, req: &InitiateUploadRequest) -> ApiFuture<'_, ChunkedUploadConfig>;

    /// Uploads one part of a chunked session.
    fn upload_chunk(
        &self,
        chunk: ChunkUpload,
        progress: Option<ByteProgressFn>,
    ) -> ApiFuture<'_, ChunkResponse>;

    /// Releases server-side resources for a failed session.
    fn abort(&self, upload_id: &str) -> ApiFuture<'_, ()>;

    /// Server-side progress for a session, `None` if unknown.
    fn fetch_progress(&self, upload_id: &str) -> ApiFuture<'_, Option<UploadProgress>>;

    /// Aggregate upload counters.
    fn statistics(&self) -> ApiFuture<'_, UploadStatistics>;
}
