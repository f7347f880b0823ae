/// Prefix of every catalog route.
pub const API_PREFIX: &str = "/api/v1";

/// Headroom over the upload limit for multipart boundaries and the `name` part.
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;
