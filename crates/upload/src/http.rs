//! Production [`DocumentApi`] over the authenticated HTTP transport.

use docferry_protocol::messages::AbortUploadRequest;
use docferry_protocol::{
    ChunkResponse, ChunkedUploadConfig, FileValidationResult, InitiateUploadRequest,
    UploadProgress, UploadResult, UploadStatistics, UploadTarget, ValidateDocumentRequest,
};
use docferry_transport::{ApiClient, ByteProgressFn, progress_part};
use reqwest::multipart::Form;

use crate::api::{ApiFuture, ChunkUpload, DocumentApi};

const VALIDATE_PATH: &str = "/upload/document/validate";
const FILE_PATH: &str = "/upload/file";
const DOCUMENT_PATH: &str = "/upload/document";
const INITIATE_PATH: &str = "/upload/document/initiate";
const CHUNK_PATH: &str = "/upload/document/chunk";
const ABORT_PATH: &str = "/upload/document/abort";
const PROGRESS_PATH: &str = "/upload/progress";
const STATISTICS_PATH: &str = "/upload/statistics";

/// [`DocumentApi`] implementation backed by [`ApiClient`].
pub struct HttpDocumentApi {
    client: ApiClient,
}

impl HttpDocumentApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

/// Appends target metadata as form fields, skipping absent optionals.
fn with_target_fields(form: Form, target: &UploadTarget) -> Form {
    let mut form = form
        .text("clientId", target.client_id.clone())
        .text("documentType", target.document_type.clone());
    if let Some(business_id) = &target.business_id {
        form = form.text("businessId", business_id.clone());
    }
    if let Some(folder_id) = &target.folder_id {
        form = form.text("folderId", folder_id.clone());
    }
    form
}

fn progress_url(upload_id: &str) -> String {
    format!("{PROGRESS_PATH}/{upload_id}")
}

impl DocumentApi for HttpDocumentApi {
    fn validate(&self, req: &ValidateDocumentRequest) -> ApiFuture<'_, FileValidationResult> {
        let req = req.clone();
        Box::pin(async move { Ok(self.client.post_json(VALIDATE_PATH, &req).await?) })
    }

    fn upload_file(
        &self,
        file_name: &str,
        mime_type: &str,
        data: Vec<u8>,
        progress: Option<ByteProgressFn>,
    ) -> ApiFuture<'_, UploadResult> {
        let file_name = file_name.to_owned();
        let mime_type = mime_type.to_owned();
        Box::pin(async move {
            let result = self
                .client
                .post_multipart(FILE_PATH, || {
                    let part =
                        progress_part(data.clone(), &file_name, &mime_type, progress.clone())?;
                    Ok(Form::new().part("file", part))
                })
                .await?;
            Ok(result)
        })
    }

    fn upload_document(
        &self,
        file_name: &str,
        mime_type: &str,
        data: Vec<u8>,
        target: &UploadTarget,
        progress: Option<ByteProgressFn>,
    ) -> ApiFuture<'_, UploadResult> {
        let file_name = file_name.to_owned();
        let mime_type = mime_type.to_owned();
        let target = target.clone();
        Box::pin(async move {
            let result = self
                .client
                .post_multipart(DOCUMENT_PATH, || {
                    let part =
                        progress_part(data.clone(), &file_name, &mime_type, progress.clone())?;
                    Ok(with_target_fields(
                        Form::new().part("file", part),
                        &target,
                    ))
                })
                .await?;
            Ok(result)
        })
    }

    fn initiate(&self, req: &InitiateUploadRequest) -> ApiFuture<'_, ChunkedUploadConfig> {
        let req = req.clone();
        Box::pin(async move { Ok(self.client.post_json(INITIATE_PATH, &req).await?) })
    }

    fn upload_chunk(
        &self,
        chunk: ChunkUpload,
        progress: Option<ByteProgressFn>,
    ) -> ApiFuture<'_, ChunkResponse> {
        Box::pin(async move {
            let resp = self
                .client
                .post_multipart(CHUNK_PATH, || {
                    let part = progress_part(
                        chunk.data.clone(),
                        &chunk.file_name,
                        "application/octet-stream",
                        progress.clone(),
                    )?;
                    let form = Form::new()
                        .part("chunk", part)
                        .text("uploadId", chunk.upload_id.clone())
                        .text("partNumber", chunk.part_number.to_string())
                        .text("totalParts", chunk.total_parts.to_string())
                        .text("fileName", chunk.file_name.clone());
                    Ok(with_target_fields(form, &chunk.target))
                })
                .await?;
            Ok(resp)
        })
    }

    fn abort(&self, upload_id: &str) -> ApiFuture<'_, ()> {
        let req = AbortUploadRequest {
            upload_id: upload_id.to_owned(),
        };
        Box::pin(async move { Ok(self.client.post_json_unit(ABORT_PATH, &req).await?) })
    }

    fn fetch_progress(&self, upload_id: &str) -> ApiFuture<'_, Option<UploadProgress>> {
        let path = progress_url(upload_id);
        Box::pin(async move { Ok(self.client.get_json_opt(&path).await?) })
    }

    fn statistics(&self) -> ApiFuture<'_, UploadStatistics> {
        Box::pin(async move { Ok(self.client.get_json(STATISTICS_PATH).await?) })
    }
}
