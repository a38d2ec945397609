//! Strategy selection and the validate-then-upload retry wrapper.

use std::path::Path;
use std::sync::Arc;

use docferry_protocol::{FileValidationResult, UploadResult, UploadTarget};
use tracing::{debug, warn};

use crate::api::DocumentApi;
use crate::chunked::ChunkedUploader;
use crate::progress::ProgressSinks;
use crate::retry::RetryPolicy;
use crate::single_shot::SingleShotUploader;
use crate::validation::{file_name_of, guess_mime_type, validate_file};
use crate::{DEFAULT_CHUNK_SIZE, SINGLE_SHOT_THRESHOLD, UploadError};

/// Upload orchestrator: picks single-shot or chunked transfer by file size
/// and wraps the whole operation in validation and retry-with-backoff.
pub struct Uploader {
    api: Arc<dyn DocumentApi>,
    retry: RetryPolicy,
    chunk_size: u64,
    single_shot_threshold: u64,
}

impl Uploader {
    pub fn new(api: Arc<dyn DocumentApi>) -> Self {
        Self {
            api,
            retry: RetryPolicy::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            single_shot_threshold: SINGLE_SHOT_THRESHOLD,
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_single_shot_threshold(mut self, threshold: u64) -> Self {
        self.single_shot_threshold = threshold;
        self
    }

    /// Direct access to the underlying API (progress polling, statistics).
    pub fn api(&self) -> &dyn DocumentApi {
        self.api.as_ref()
    }

    /// Server pre-flight validation for `path`.
    pub async fn validate(
        &self,
        path: &Path,
        target: &UploadTarget,
    ) -> Result<FileValidationResult, UploadError> {
        validate_file(self.api.as_ref(), path, target).await
    }

    /// Uploads one file, choosing the strategy by size. Does no validation
    /// and no retry; [`validate_and_upload`](Self::validate_and_upload) is
    /// the full pipeline.
    pub async fn upload(
        &self,
        path: &Path,
        target: &UploadTarget,
        sinks: &ProgressSinks,
    ) -> Result<UploadResult, UploadError> {
        let size = tokio::fs::metadata(path).await?.len();
        let file_name = file_name_of(path)?;
        let mime_type = guess_mime_type(&file_name);

        if size <= self.single_shot_threshold {
            debug!(file = %file_name, size, "using single-shot path");
            SingleShotUploader::new(self.api.as_ref())
                .with_size_limit(self.single_shot_threshold)
                .upload(path, &file_name, mime_type, target, sinks)
                .await
        } else {
            debug!(file = %file_name, size, "using chunked path");
            ChunkedUploader::new(self.api.as_ref())
                .with_chunk_size(self.chunk_size)
                .upload(path, &file_name, mime_type, target, sinks)
                .await
        }
    }

    /// Uploads with whole-operation retry but without pre-flight validation.
    pub async fn upload_with_retry(
        &self,
        path: &Path,
        target: &UploadTarget,
        sinks: &ProgressSinks,
    ) -> Result<UploadResult, UploadError> {
        self.retry.run(|| self.upload(path, target, sinks)).await
    }

    /// Validates once, then uploads with whole-operation retry.
    ///
    /// Validation is never retried: a rejection short-circuits before any
    /// transfer, and a validation call that cannot reach the server aborts
    /// the upload. After exhausting retries the last error is returned.
    pub async fn validate_and_upload(
        &self,
        path: &Path,
        target: &UploadTarget,
        sinks: &ProgressSinks,
    ) -> Result<UploadResult, UploadError> {
        let verdict = self.validate(path, target).await?;
        if !verdict.is_valid {
            return Err(UploadError::Validation {
                errors: verdict.errors,
            });
        }
        for warning in &verdict.warnings {
            warn!(file = %path.display(), warning = %warning, "validation warning");
        }

        self.upload_with_retry(path, target, sinks).await
    }
}
