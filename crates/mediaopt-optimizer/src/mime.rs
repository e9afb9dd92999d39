//! MIME type detection for files on local disk

use crate::error::OptimizerResult;
use mediaopt_core::constants::UNKNOWN_MIME_TYPE;
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Number of leading bytes inspected for magic numbers
const SNIFF_LEN: u64 = 8192;

/// Detect the MIME type of a file
///
/// Magic bytes win. If they are inconclusive, the file extension is used for
/// the common web image types. Anything else is `application/octet-stream`.
pub async fn detect_mime_type(path: &Path) -> OptimizerResult<String> {
    let file = tokio::fs::File::open(path).await?;
    let mut head = Vec::with_capacity(SNIFF_LEN as usize);
    file.take(SNIFF_LEN).read_to_end(&mut head).await?;

    if let Some(kind) = infer::get(&head) {
        return Ok(kind.mime_type().to_string());
    }

    Ok(mime_type_from_extension(path)
        .unwrap_or(UNKNOWN_MIME_TYPE)
        .to_string())
}

fn mime_type_from_extension(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}
