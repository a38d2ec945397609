//! Chunked transfer: fixed-size file slicing and the sequential part loop.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use docferry_protocol::{ChunkResponse, InitiateUploadRequest, UploadResult, UploadTarget};
use tracing::{debug, trace, warn};

use crate::api::{ByteProgressFn, ChunkUpload, DocumentApi};
use crate::progress::{ProgressHandle, ProgressSinks};
use crate::{DEFAULT_CHUNK_SIZE, UploadError};

/// Number of parts needed to move `file_size` bytes in `chunk_size` slices.
pub fn total_chunks_for(file_size: u64, chunk_size: u64) -> u32 {
    file_size.div_ceil(chunk_size.max(1)) as u32
}

/// One slice of a file, numbered from 1.
#[derive(Debug, Clone)]
pub struct FileChunk {
    pub part_number: u32,
    pub offset: u64,
    pub data: Vec<u8>,
}

/// Reads a file in fixed-size chunks with 1-based part numbering.
pub struct ChunkReader {
    file: std::fs::File,
    chunk_size: u64,
    offset: u64,
    file_size: u64,
    next_part: u32,
    total_chunks: u32,
}

impl ChunkReader {
    /// Opens `path` for chunked reading.
    ///
    /// If `chunk_size` is 0, [`DEFAULT_CHUNK_SIZE`] is used.
    pub fn new(path: &Path, chunk_size: u64) -> Result<Self, UploadError> {
        let file = std::fs::File::open(path)?;
        let file_size = file.metadata()?.len();
        let chunk_size = if chunk_size == 0 {
            DEFAULT_CHUNK_SIZE
        } else {
            chunk_size
        };
        Ok(Self {
            file,
            chunk_size,
            offset: 0,
            file_size,
            next_part: 1,
            total_chunks: total_chunks_for(file_size, chunk_size),
        })
    }

    /// Reads the next chunk. Returns `None` at EOF.
    pub fn next_chunk(&mut self) -> Result<Option<FileChunk>, UploadError> {
        let remaining = self.file_size.saturating_sub(self.offset);
        if remaining == 0 {
            return Ok(None);
        }

        let read_size = remaining.min(self.chunk_size) as usize;
        let mut buf = vec![0u8; read_size];
        self.file.read_exact(&mut buf)?;

        let chunk = FileChunk {
            part_number: self.next_part,
            offset: self.offset,
            data: buf,
        };
        self.offset += read_size as u64;
        self.next_part += 1;
        Ok(Some(chunk))
    }

    /// Total file size in bytes.
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Total number of parts this file will produce.
    pub fn total_chunks(&self) -> u32 {
        self.total_chunks
    }

    /// Bytes remaining to read.
    pub fn remaining(&self) -> u64 {
        self.file_size - self.offset
    }
}

/// Moves a large file through the ingestion API in sequential parts.
///
/// Parts are strictly ordered: part N+1 is sent only after part N has been
/// acknowledged. Every part is sent exactly once; the final part's response
/// is the authoritative [`UploadResult`].
pub struct ChunkedUploader<'a> {
    api: &'a dyn DocumentApi,
    chunk_size: u64,
}

impl<'a> ChunkedUploader<'a> {
    pub fn new(api: &'a dyn DocumentApi) -> Self {
        Self {
            api,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Runs the full chunked transfer: initiate, sequential parts, result.
    ///
    /// On any part failure the session is aborted server-side before the
    /// error is returned; a failed abort is logged, never escalated.
    pub async fn upload(
        &self,
        path: &Path,
        file_name: &str,
        mime_type: &str,
        target: &UploadTarget,
        sinks: &ProgressSinks,
    ) -> Result<UploadResult, UploadError> {
        let file_size = std::fs::metadata(path)?.len();
        let req = InitiateUploadRequest {
            file_name: file_name.to_owned(),
            file_size,
            mime_type: mime_type.to_owned(),
            target: target.clone(),
        };
        let config = self.api.initiate(&req).await?;

        // Honor the server-negotiated chunk size when one is given.
        let chunk_size = if config.chunk_size > 0 {
            config.chunk_size
        } else if self.chunk_size > 0 {
            self.chunk_size
        } else {
            DEFAULT_CHUNK_SIZE
        };
        let total = total_chunks_for(file_size, chunk_size);
        if config.total_chunks > 0 && config.total_chunks != total {
            warn!(
                upload_id = %config.upload_id,
                server = config.total_chunks,
                client = total,
                "server chunk count differs, using client computation"
            );
        }

        let handle = ProgressHandle::new(&config.upload_id, file_name, total);
        handle.start();
        debug!(
            upload_id = %config.upload_id,
            file = %file_name,
            total_chunks = total,
            chunk_size,
            "chunked upload initiated"
        );

        // The session exists from here on; every failure path must release it.
        match self
            .run_transfer(path, chunk_size, &config.upload_id, total, file_name, target, sinks, &handle)
            .await
        {
            Ok(result) => {
                handle.complete();
                Ok(result)
            }
            Err(err) => {
                handle.fail();
                // Release the server-side session. A failed abort must not
                // mask the original error.
                if let Err(abort_err) = self.api.abort(&config.upload_id).await {
                    warn!(
                        upload_id = %config.upload_id,
                        error = %abort_err,
                        "failed to abort upload session"
                    );
                } else {
                    handle.abort();
                }
                Err(err)
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn run_transfer(
        &self,
        path: &Path,
        chunk_size: u64,
        upload_id: &str,
        total: u32,
        file_name: &str,
        target: &UploadTarget,
        sinks: &ProgressSinks,
        handle: &ProgressHandle,
    ) -> Result<UploadResult, UploadError> {
        let mut reader = ChunkReader::new(path, chunk_size)?;
        self.send_parts(&mut reader, upload_id, total, file_name, target, sinks, handle)
            .await
    }

    #[allow(clippy::too_many_arguments)]
    async fn send_parts(
        &self,
        reader: &mut ChunkReader,
        upload_id: &str,
        total: u32,
        file_name: &str,
        target: &UploadTarget,
        sinks: &ProgressSinks,
        handle: &ProgressHandle,
    ) -> Result<UploadResult, UploadError> {
        let mut final_result = None;

        while let Some(chunk) = reader.next_chunk()? {
            let part_number = chunk.part_number;
            let upload = ChunkUpload {
                upload_id: upload_id.to_owned(),
                part_number,
                total_parts: total,
                file_name: file_name.to_owned(),
                target: target.clone(),
                data: chunk.data,
            };

            let byte_progress = sinks.chunk.clone().map(|callback| {
                let progress: ByteProgressFn = Arc::new(move |sent, total_bytes| {
                    if total_bytes > 0 {
                        let pct = (sent as f64 / total_bytes as f64 * 100.0).round() as u8;
                        callback(part_number, pct);
                    }
                });
                progress
            });

            let resp = self.api.upload_chunk(upload, byte_progress).await?;

            sinks.emit_chunk(part_number, 100);
            let overall = handle.chunk_done();
            sinks.emit_overall(overall);

            if part_number == total {
                match resp {
                    ChunkResponse::Completed(result) => final_result = Some(result),
                    ChunkResponse::Ack(_) => {
                        return Err(UploadError::Protocol(
                            "final part answered with an ack, expected the upload result".into(),
                        ));
                    }
                }
            } else {
                // Intermediate responses carry acknowledgement metadata only
                // and are discarded for result purposes.
                if let ChunkResponse::Ack(ack) = &resp {
                    trace!(upload_id = %upload_id, part = ack.part_number, "chunk acknowledged");
                }
            }
        }

        final_result.ok_or_else(|| UploadError::Protocol("file produced no chunks".into()))
    }
}
