/// Multipart field carrying the optional photo
pub const IMAGE_FIELD: &str = "image";

/// Format for `createdAt`. Fixed width, so string order matches time order.
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f UTC";
