/// Name of the scratch directory created under the system temp dir when
/// `SCRATCH_DIR` is not set.
pub const DEFAULT_SCRATCH_DIR_NAME: &str = "mediaopt-scratch";

/// JPEG quality used by the in-process JPEG optimizer when `JPEG_QUALITY` is not set.
pub const DEFAULT_JPEG_QUALITY: u8 = 85;

/// MIME type reported for content that could not be identified.
pub const UNKNOWN_MIME_TYPE: &str = "application/octet-stream";
