use serde::{Deserialize, Serialize};

use crate::types::{UploadResult, UploadTarget};

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

/// Asks the server whether an upload should proceed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateDocumentRequest {
    pub file_name: String,
    pub file_size: u64,
    pub mime_type: String,
    pub document_type: String,
}

/// Starts a chunked upload session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiateUploadRequest {
    pub file_name: String,
    pub file_size: u64,
    pub mime_type: String,
    #[serde(flatten)]
    pub target: UploadTarget,
}

/// Aborts an active chunked upload session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbortUploadRequest {
    pub upload_id: String,
}

// ---------------------------------------------------------------------------
// Response payloads
// ---------------------------------------------------------------------------

/// Server-allocated chunked upload session.
///
/// The client treats `upload_id` as an opaque token. `chunk_size` is the
/// server's negotiated slice size (0 means "use the client default").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkedUploadConfig {
    pub upload_id: String,
    pub file_name: String,
    pub file_path: String,
    pub chunk_size: u64,
    pub total_chunks: u32,
}

/// Acknowledgement for an intermediate chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkAck {
    pub upload_id: String,
    pub part_number: u32,
    pub total_parts: u32,
    pub upload_status: String,
}

/// Response to a chunk upload.
///
/// Intermediate parts return an [`ChunkAck`]; the final part returns the
/// authoritative [`UploadResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChunkResponse {
    Completed(UploadResult),
    Ack(ChunkAck),
}

/// Aggregate upload counters reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadStatistics {
    pub total_uploads: u64,
    pub completed: u64,
    pub failed: u64,
    pub aborted: u64,
    pub total_bytes: u64,
}
