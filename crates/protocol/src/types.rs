use serde::{Deserialize, Serialize};

/// Destination metadata for an uploaded document.
///
/// Immutable once an upload attempt starts; repeated on every chunk call
/// because the server re-validates target fields per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTarget {
    pub client_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_id: Option<String>,
    pub document_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
}

/// Current state of an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UploadStatus {
    #[serde(rename = "initiated")]
    Initiated,
    #[serde(rename = "uploading")]
    Uploading,
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "failed")]
    Failed,
    #[serde(rename = "aborted")]
    Aborted,
}

impl UploadStatus {
    /// Returns `true` once the upload can no longer make progress.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Aborted)
    }
}

/// Progress of an active upload, in whole chunks.
///
/// `progress` is `round(uploaded_chunks / total_chunks * 100)` and only
/// decreases when the upload fails or is aborted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadProgress {
    pub upload_id: String,
    pub file_name: String,
    pub total_chunks: u32,
    pub uploaded_chunks: u32,
    pub progress: u8,
    pub status: UploadStatus,
}

/// Terminal result of a successful upload.
///
/// Produced once, by the final chunk's response or the single-shot call.
/// Downstream document processing is tracked separately by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub document_id: String,
    pub file_name: String,
    pub file_size: u64,
    pub upload_status: String,
    pub processing_status: String,
    pub storage_url: String,
}

/// Server's pre-flight verdict on a proposed upload.
///
/// Advisory only: the server re-validates the actual bytes on upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileValidationResult {
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    pub max_size: u64,
    pub allowed_types: Vec<String>,
    #[serde(rename = "estimatedProcessingTime", default)]
    pub estimated_processing_time_secs: u64,
}
