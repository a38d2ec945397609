use std::sync::{Arc, RwLock};

use docferry_protocol::{UploadProgress, UploadStatus};

/// Callback invoked with overall progress (0–100) in the chunk domain
/// (single file) or batch domain (multi-file), never both at once.
pub type OverallProgressFn = Arc<dyn Fn(u8) + Send + Sync>;

/// Callback invoked with `(part_number, percent)` for one chunk's own
/// transfer progress.
pub type ChunkProgressFn = Arc<dyn Fn(u32, u8) + Send + Sync>;

/// Callback invoked with `(file_index, percent)` during a batch upload.
pub type FileProgressFn = Arc<dyn Fn(usize, u8) + Send + Sync>;

/// The two progress channels of a single-file upload.
///
/// Kept separate because they report different domains: `overall` is whole
/// chunks out of `total_chunks`, `chunk` is bytes within one part.
#[derive(Clone, Default)]
pub struct ProgressSinks {
    pub overall: Option<OverallProgressFn>,
    pub chunk: Option<ChunkProgressFn>,
}

impl ProgressSinks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_overall(mut self, callback: OverallProgressFn) -> Self {
        self.overall = Some(callback);
        self
    }

    pub fn on_chunk(mut self, callback: ChunkProgressFn) -> Self {
        self.chunk = Some(callback);
        self
    }

    pub(crate) fn emit_overall(&self, percent: u8) {
        if let Some(callback) = &self.overall {
            callback(percent);
        }
    }

    pub(crate) fn emit_chunk(&self, part_number: u32, percent: u8) {
        if let Some(callback) = &self.chunk {
            callback(part_number, percent);
        }
    }
}

/// Rounded whole-unit percentage, the same formula for both progress domains.
pub(crate) fn percent(done: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    (f64::from(done) / f64::from(total) * 100.0).round() as u8
}

/// Thread-safe progress state for one chunked upload (single writer).
///
/// Counters only move forward while the upload runs; `fail`/`abort` reset
/// them along with the status.
pub struct ProgressHandle {
    inner: RwLock<UploadProgress>,
}

impl ProgressHandle {
    /// Creates a handle in the `initiated` state.
    pub fn new(upload_id: &str, file_name: &str, total_chunks: u32) -> Self {
        Self {
            inner: RwLock::new(UploadProgress {
                upload_id: upload_id.to_owned(),
                file_name: file_name.to_owned(),
                total_chunks,
                uploaded_chunks: 0,
                progress: 0,
                status: UploadStatus::Initiated,
            }),
        }
    }

    /// Marks the transfer as running.
    pub fn start(&self) {
        let mut p = self.inner.write().unwrap();
        p.status = UploadStatus::Uploading;
    }

    /// Records one completed chunk and returns the new overall percentage.
    pub fn chunk_done(&self) -> u8 {
        let mut p = self.inner.write().unwrap();
        p.uploaded_chunks = (p.uploaded_chunks + 1).min(p.total_chunks);
        p.progress = percent(p.uploaded_chunks, p.total_chunks);
        p.progress
    }

    /// Marks the upload completed at 100%.
    pub fn complete(&self) {
        let mut p = self.inner.write().unwrap();
        p.uploaded_chunks = p.total_chunks;
        p.progress = 100;
        p.status = UploadStatus::Completed;
    }

    /// Marks the upload failed, resetting counters.
    pub fn fail(&self) {
        let mut p = self.inner.write().unwrap();
        p.uploaded_chunks = 0;
        p.progress = 0;
        p.status = UploadStatus::Failed;
    }

    /// Marks the session aborted, resetting counters.
    pub fn abort(&self) {
        let mut p = self.inner.write().unwrap();
        p.uploaded_chunks = 0;
        p.progress = 0;
        p.status = UploadStatus::Aborted;
    }

    /// Returns a copy of the current progress.
    pub fn snapshot(&self) -> UploadProgress {
        self.inner.read().unwrap().clone()
    }
}
