//! Wire types for the practice platform's document-ingestion API.
//!
//! All JSON field names are camelCase to match the platform's HTTP API.
//! Request payloads live in [`messages`], shared domain types in [`types`].

pub mod messages;
pub mod types;

pub use messages::{
    AbortUploadRequest, ChunkAck, ChunkResponse, ChunkedUploadConfig, InitiateUploadRequest,
    UploadStatistics, ValidateDocumentRequest,
};
pub use types::{FileValidationResult, UploadProgress, UploadResult, UploadStatus, UploadTarget};
