//! Whole-file transfer for documents at or below the single-shot threshold.

use std::path::Path;
use std::sync::Arc;

use docferry_protocol::{UploadResult, UploadTarget};
use tracing::debug;

use crate::api::{ByteProgressFn, DocumentApi};
use crate::progress::ProgressSinks;
use crate::{SINGLE_SHOT_THRESHOLD, UploadError};

/// Posts an entire small file in one multipart request.
///
/// Progress is linear in bytes sent, mapped onto the overall channel. Retry
/// is the orchestrator's responsibility, not this component's.
pub struct SingleShotUploader<'a> {
    api: &'a dyn DocumentApi,
    size_limit: u64,
}

impl<'a> SingleShotUploader<'a> {
    pub fn new(api: &'a dyn DocumentApi) -> Self {
        Self {
            api,
            size_limit: SINGLE_SHOT_THRESHOLD,
        }
    }

    pub fn with_size_limit(mut self, size_limit: u64) -> Self {
        self.size_limit = size_limit;
        self
    }

    pub async fn upload(
        &self,
        path: &Path,
        file_name: &str,
        mime_type: &str,
        target: &UploadTarget,
        sinks: &ProgressSinks,
    ) -> Result<UploadResult, UploadError> {
        let data = tokio::fs::read(path).await?;
        let size = data.len() as u64;
        if size > self.size_limit {
            return Err(UploadError::TooLarge {
                size,
                limit: self.size_limit,
            });
        }

        let byte_progress = sinks.overall.clone().map(|callback| {
            let progress: ByteProgressFn = Arc::new(move |sent, total| {
                if total > 0 {
                    callback((sent as f64 / total as f64 * 100.0).round() as u8);
                }
            });
            progress
        });

        debug!(file = %file_name, size, "single-shot upload");
        let result = self
            .api
            .upload_document(file_name, mime_type, data, target, byte_progress)
            .await?;
        sinks.emit_overall(100);
        Ok(result)
    }
}
