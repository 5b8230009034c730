use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

static BOUNDARY_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Characters escaped when an identifier is placed in a URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// A 32 hex digit multipart boundary, unique per call within the process.
pub(crate) fn multipart_boundary() -> String {
    let sequence = BOUNDARY_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let current_time_nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();

    let mut hasher = DefaultHasher::new();
    sequence.hash(&mut hasher);
    current_time_nanos.hash(&mut hasher);
    let high = hasher.finish();
    std::process::id().hash(&mut hasher);
    let low = hasher.finish();

    format!("{:016x}{:016x}", high, low)
}

/// Escape an identifier for use as (part of) a URL path.
///
/// `/` is kept so media URLs with several segments pass through.
pub(crate) fn encode_path(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}
