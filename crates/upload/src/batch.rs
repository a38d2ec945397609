//! Sequential multi-file uploads with per-file failure isolation.

use std::path::PathBuf;

use docferry_protocol::{UploadResult, UploadTarget};
use tracing::{info, warn};

use crate::orchestrator::Uploader;
use crate::progress::{FileProgressFn, OverallProgressFn, ProgressSinks, percent};

impl Uploader {
    /// Uploads `paths` one after another into the same target.
    ///
    /// Each file goes through the full validate-retry-upload pipeline. A
    /// failed file is logged and skipped; the remaining files still run.
    /// Returns the results of the files that succeeded, in input order.
    ///
    /// `per_file` receives `(index, percent)` for the file currently in
    /// flight. `batch_progress` receives whole-batch percent and advances
    /// after every file, failed ones included.
    pub async fn upload_many(
        &self,
        paths: &[PathBuf],
        target: &UploadTarget,
        per_file: Option<FileProgressFn>,
        batch_progress: Option<OverallProgressFn>,
    ) -> Vec<UploadResult> {
        let total = paths.len() as u32;
        let mut results = Vec::with_capacity(paths.len());

        for (index, path) in paths.iter().enumerate() {
            let sinks = match &per_file {
                Some(callback) => {
                    let callback = callback.clone();
                    ProgressSinks::new()
                        .on_overall(std::sync::Arc::new(move |pct| callback(index, pct)))
                }
                None => ProgressSinks::new(),
            };

            match self.validate_and_upload(path, target, &sinks).await {
                Ok(result) => {
                    info!(
                        file = %path.display(),
                        document_id = %result.document_id,
                        "uploaded"
                    );
                    results.push(result);
                }
                Err(err) => {
                    warn!(file = %path.display(), error = %err, "upload failed, continuing");
                }
            }

            if let Some(callback) = &batch_progress {
                callback(percent(index as u32 + 1, total));
            }
        }

        results
    }
}
