//! Charset-negotiated response body decoding.
//!
//! Cloud DNS APIs in the wild answer in more than UTF-8: legacy Chinese
//! endpoints still emit GBK/GB2312 bodies, and some error pages carry no
//! charset at all. Decoding therefore tries the declared charset first and
//! falls through a fixed candidate list; it always yields *some* string.

use std::borrow::Cow;

use encoding_rs::Encoding;

/// Fallback charsets tried after the declared one, in order.
const FALLBACK_CHARSETS: [&str; 4] = ["utf-8", "gbk", "ascii", "latin-1"];

/// Decode raw response bytes to text using the `Content-Type` charset hint.
///
/// Tries, in order: the declared `charset=` parameter (with `gb2312`/
/// `iso-8859-1` aliases mapped), then `utf-8`, `gbk`, `ascii`, `latin-1`.
/// The first charset that decodes without error wins. If everything fails,
/// the bytes are decoded as UTF-8 with replacement characters. This function
/// never fails.
pub fn decode_body(raw: &[u8], content_type: Option<&str>) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let declared = content_type.and_then(charset_param);

    let mut candidates: Vec<&str> = Vec::with_capacity(FALLBACK_CHARSETS.len() + 1);
    if let Some(label) = declared.as_deref() {
        candidates.push(map_alias(label));
    }
    for label in FALLBACK_CHARSETS {
        if !candidates.contains(&label) {
            candidates.push(label);
        }
    }

    for label in candidates {
        if let Some(text) = try_decode(raw, label) {
            return text;
        }
    }

    // Last resort: replacement characters instead of an error.
    String::from_utf8_lossy(raw).into_owned()
}

/// Extract the `charset=` parameter from a `Content-Type` value.
///
/// Surrounding quotes are stripped and the label is lowercased, e.g.
/// `text/html; charset="GB2312"` yields `gb2312`.
fn charset_param(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if name.trim().eq_ignore_ascii_case("charset") {
            let label = value.trim().trim_matches('"').to_ascii_lowercase();
            (!label.is_empty()).then_some(label)
        } else {
            None
        }
    })
}

/// Map charset labels whose common spelling differs from the decoder we use.
fn map_alias(label: &str) -> &str {
    match label {
        "gb2312" => "gbk",
        "iso-8859-1" => "latin-1",
        other => other,
    }
}

/// Strictly decode `raw` as `label`, returning `None` on any invalid sequence.
fn try_decode(raw: &[u8], label: &str) -> Option<String> {
    match label {
        "ascii" => raw
            .is_ascii()
            .then(|| String::from_utf8_lossy(raw).into_owned()),
        // ISO-8859-1 proper: every byte maps 1:1 to U+00..U+FF, cannot fail.
        "latin-1" => Some(raw.iter().map(|&b| char::from(b)).collect()),
        other => {
            let encoding = Encoding::for_label(other.as_bytes())?;
            encoding
                .decode_without_bom_handling_and_without_replacement(raw)
                .map(Cow::into_owned)
        }
    }
}
