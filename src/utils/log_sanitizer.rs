//! Log truncation utilities.
//!
//! Response bodies can be large and can embed credentials or record data;
//! debug logs only ever see a bounded prefix.

/// Maximum number of bytes of a value included in log output.
const TRUNCATE_LIMIT: usize = 200;

/// Truncate a string for safe logging.
///
/// Values within the limit pass through unchanged; longer ones keep the
/// first [`TRUNCATE_LIMIT`] bytes (rounded down to a char boundary) plus a
/// suffix noting the full length.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        return s.to_string();
    }
    let mut end = TRUNCATE_LIMIT;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... ({} bytes total)", &s[..end], s.len())
}
