//! Server pre-flight validation and MIME-type guessing.

use std::path::Path;

use docferry_protocol::{FileValidationResult, UploadTarget, ValidateDocumentRequest};

use crate::UploadError;
use crate::api::DocumentApi;

/// Guesses a MIME type from the file extension.
///
/// The guess is advisory; the server inspects the actual bytes. Unknown
/// extensions fall back to `application/octet-stream`.
pub fn guess_mime_type(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "csv" => "text/csv",
        "txt" => "text/plain",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}

/// Extracts the final path component as the upload file name.
pub(crate) fn file_name_of(path: &Path) -> Result<String, UploadError> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            UploadError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("not a file path: {}", path.display()),
            ))
        })
}

/// Asks the server whether `path` should be uploaded to `target`.
///
/// Does not read file bytes; only the declared name, size and MIME type
/// are submitted. A call that fails to reach the server is a hard error:
/// callers abort rather than silently bypassing validation.
pub async fn validate_file(
    api: &dyn DocumentApi,
    path: &Path,
    target: &UploadTarget,
) -> Result<FileValidationResult, UploadError> {
    let meta = tokio::fs::metadata(path).await?;
    let file_name = file_name_of(path)?;
    let req = ValidateDocumentRequest {
        mime_type: guess_mime_type(&file_name).to_owned(),
        file_name,
        file_size: meta.len(),
        document_type: target.document_type.clone(),
    };
    api.validate(&req).await
}
