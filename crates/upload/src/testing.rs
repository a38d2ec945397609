//! Scriptable [`DocumentApi`] mock shared by the workflow tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use docferry_protocol::messages::ChunkAck;
use docferry_protocol::{
    ChunkResponse, ChunkedUploadConfig, FileValidationResult, InitiateUploadRequest,
    UploadProgress, UploadResult, UploadStatistics, UploadTarget, ValidateDocumentRequest,
};

use crate::UploadError;
use crate::api::{ApiFuture, ByteProgressFn, ChunkUpload, DocumentApi};

/// Mock ingestion API. Defaults to accepting everything; individual tests
/// flip the failure switches.
pub(crate) struct MockApi {
    pub validate_result: Mutex<FileValidationResult>,
    pub validate_calls: AtomicU32,
    pub fail_validate: AtomicBool,

    pub document_calls: AtomicU32,
    pub fail_document_uploads: AtomicBool,
    /// File names whose single-shot upload fails (batch failure isolation).
    pub fail_files: Mutex<Vec<String>>,

    pub file_calls: AtomicU32,

    pub initiate_calls: AtomicU32,
    /// Overrides `chunk_size` in the initiate response (None = 0, client default).
    pub server_chunk_size: Mutex<Option<u64>>,
    /// Path deleted during `initiate`, simulating a file that vanishes after
    /// the session is allocated.
    pub remove_on_initiate: Mutex<Option<std::path::PathBuf>>,

    pub chunk_parts: Mutex<Vec<u32>>,
    pub chunk_lens: Mutex<Vec<usize>>,
    pub fail_on_part: Mutex<Option<u32>>,
    pub ack_final_part: AtomicBool,

    pub aborts: Mutex<Vec<String>>,
    pub fail_abort: AtomicBool,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            validate_result: Mutex::new(FileValidationResult {
                is_valid: true,
                errors: Vec::new(),
                warnings: Vec::new(),
                max_size: 50 * 1024 * 1024,
                allowed_types: vec!["application/pdf".into(), "text/csv".into()],
                estimated_processing_time_secs: 5,
            }),
            validate_calls: AtomicU32::new(0),
            fail_validate: AtomicBool::new(false),
            document_calls: AtomicU32::new(0),
            fail_document_uploads: AtomicBool::new(false),
            fail_files: Mutex::new(Vec::new()),
            file_calls: AtomicU32::new(0),
            initiate_calls: AtomicU32::new(0),
            server_chunk_size: Mutex::new(None),
            remove_on_initiate: Mutex::new(None),
            chunk_parts: Mutex::new(Vec::new()),
            chunk_lens: Mutex::new(Vec::new()),
            fail_on_part: Mutex::new(None),
            ack_final_part: AtomicBool::new(false),
            aborts: Mutex::new(Vec::new()),
            fail_abort: AtomicBool::new(false),
        }
    }

    pub fn last_chunk_len(&self) -> Option<usize> {
        self.chunk_lens.lock().unwrap().last().copied()
    }

    fn make_result(file_name: &str, file_size: u64) -> UploadResult {
        UploadResult {
            document_id: format!("doc-{file_name}"),
            file_name: file_name.to_owned(),
            file_size,
            upload_status: "completed".into(),
            processing_status: "pending".into(),
            storage_url: format!("https://store/{file_name}"),
        }
    }
}

impl DocumentApi for MockApi {
    fn validate(&self, req: &ValidateDocumentRequest) -> ApiFuture<'_, FileValidationResult> {
        let _ = req;
        Box::pin(async move {
            self.validate_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_validate.load(Ordering::SeqCst) {
                return Err(UploadError::Protocol("injected validate failure".into()));
            }
            Ok(self.validate_result.lock().unwrap().clone())
        })
    }

    fn upload_file(
        &self,
        file_name: &str,
        _mime_type: &str,
        data: Vec<u8>,
        progress: Option<ByteProgressFn>,
    ) -> ApiFuture<'_, UploadResult> {
        let file_name = file_name.to_owned();
        Box::pin(async move {
            self.file_calls.fetch_add(1, Ordering::SeqCst);
            let len = data.len() as u64;
            if let Some(cb) = progress {
                cb(len, len);
            }
            Ok(Self::make_result(&file_name, len))
        })
    }

    fn upload_document(
        &self,
        file_name: &str,
        _mime_type: &str,
        data: Vec<u8>,
        _target: &UploadTarget,
        progress: Option<ByteProgressFn>,
    ) -> ApiFuture<'_, UploadResult> {
        let file_name = file_name.to_owned();
        Box::pin(async move {
            self.document_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_document_uploads.load(Ordering::SeqCst)
                || self.fail_files.lock().unwrap().iter().any(|f| f == &file_name)
            {
                return Err(UploadError::Protocol("injected single-shot failure".into()));
            }
            let len = data.len() as u64;
            if let Some(cb) = &progress {
                if len > 1 {
                    cb(len / 2, len);
                }
                cb(len, len);
            }
            Ok(Self::make_result(&file_name, len))
        })
    }

    fn initiate(&self, req: &InitiateUploadRequest) -> ApiFuture<'_, ChunkedUploadConfig> {
        let file_name = req.file_name.clone();
        Box::pin(async move {
            let n = self.initiate_calls.fetch_add(1, Ordering::SeqCst) + 1;
            if let Some(path) = self.remove_on_initiate.lock().unwrap().take() {
                let _ = std::fs::remove_file(path);
            }
            Ok(ChunkedUploadConfig {
                upload_id: format!("mock-upload-{n}"),
                file_path: format!("uploads/{file_name}"),
                file_name,
                chunk_size: self.server_chunk_size.lock().unwrap().unwrap_or(0),
                total_chunks: 0,
            })
        })
    }

    fn upload_chunk(
        &self,
        chunk: ChunkUpload,
        progress: Option<ByteProgressFn>,
    ) -> ApiFuture<'_, ChunkResponse> {
        Box::pin(async move {
            self.chunk_parts.lock().unwrap().push(chunk.part_number);
            self.chunk_lens.lock().unwrap().push(chunk.data.len());
            if *self.fail_on_part.lock().unwrap() == Some(chunk.part_number) {
                return Err(UploadError::Protocol("injected chunk failure".into()));
            }
            let len = chunk.data.len() as u64;
            if let Some(cb) = &progress {
                if len > 1 {
                    cb(len / 2, len);
                }
                cb(len, len);
            }
            let is_final =
                chunk.part_number == chunk.total_parts && !self.ack_final_part.load(Ordering::SeqCst);
            if is_final {
                Ok(ChunkResponse::Completed(Self::make_result(
                    &chunk.file_name,
                    len,
                )))
            } else {
                Ok(ChunkResponse::Ack(ChunkAck {
                    upload_id: chunk.upload_id,
                    part_number: chunk.part_number,
                    total_parts: chunk.total_parts,
                    upload_status: "uploading".into(),
                }))
            }
        })
    }

    fn abort(&self, upload_id: &str) -> ApiFuture<'_, ()> {
        let upload_id = upload_id.to_owned();
        Box::pin(async move {
            self.aborts.lock().unwrap().push(upload_id);
            if self.fail_abort.load(Ordering::SeqCst) {
                return Err(UploadError::Protocol("injected abort failure".into()));
            }
            Ok(())
        })
    }

    fn fetch_progress(&self, _upload_id: &str) -> ApiFuture<'_, Option<UploadProgress>> {
        Box::pin(async move { Ok(None) })
    }

    fn statistics(&self) -> ApiFuture<'_, UploadStatistics> {
        Box::pin(async move {
            Ok(UploadStatistics {
                total_uploads: 0,
                completed: 0,
                failed: 0,
                aborted: 0,
                total_bytes: 0,
            })
        })
    }
}
