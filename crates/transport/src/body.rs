use std::convert::Infallible;
use std::sync::Arc;

use futures_util::{Stream, StreamExt};

use crate::TransportError;

/// Callback invoked with `(bytes_sent, total_bytes)` as a request body streams.
pub type ByteProgressFn = Arc<dyn Fn(u64, u64) + Send + Sync>;

/// Slice size for progress-reporting body streams.
const STREAM_CHUNK: usize = 64 * 1024;

/// Splits `data` into a byte stream that reports cumulative progress as the
/// HTTP client pulls it.
fn progress_stream(
    data: Vec<u8>,
    progress: ByteProgressFn,
) -> impl Stream<Item = Result<Vec<u8>, Infallible>> + Send {
    let total = data.len() as u64;
    let chunks: Vec<Vec<u8>> = data.chunks(STREAM_CHUNK).map(<[u8]>::to_vec).collect();
    let mut sent = 0u64;
    futures_util::stream::iter(chunks).map(move |chunk| {
        sent += chunk.len() as u64;
        progress(sent, total);
        Ok(chunk)
    })
}

/// Builds a multipart file part, optionally wrapping the body in a
/// progress-reporting stream.
pub fn progress_part(
    data: Vec<u8>,
    file_name: &str,
    mime_type: &str,
    progress: Option<ByteProgressFn>,
) -> Result<reqwest::multipart::Part, TransportError> {
    let part = match progress {
        None => reqwest::multipart::Part::bytes(data),
        Some(callback) => {
            let len = data.len() as u64;
            let body = reqwest::Body::wrap_stream(progress_stream(data, callback));
            reqwest::multipart::Part::stream_with_length(body, len)
        }
    };
    Ok(part.file_name(file_name.to_owned()).mime_str(mime_type)?)
}
