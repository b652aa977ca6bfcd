//! Generic canonical-request signing (HMAC-SHA256).
//!
//! The major Chinese cloud vendors all sign API requests the same way at the
//! core — hash a canonical serialization of the request, splice the hash into
//! a vendor-specific string-to-sign, HMAC it, splice the result into a
//! vendor-specific Authorization format — and differ only in the literal
//! fields around that core (algorithm names, timestamps, credential scopes).
//! [`sign_authorization`] factors the shared core into one routine driven by
//! two caller-supplied templates; it reproduces the published worked examples
//! of Alibaba's ACS3-HMAC-SHA256, Huawei's SDK-HMAC-SHA256, and Tencent's
//! TC3-HMAC-SHA256 byte-for-byte (see `tests/signer_vectors_test.rs`).
//!
//! Vendor literals (timestamps, nonces, credential scopes) are substituted
//! into the templates by the caller *before* signing. For schemes with a
//! derived signing key (Tencent TC3), the caller performs the HMAC key chain
//! with [`hmac_sha256`] and passes the derived key bytes as `secret_key`.

use std::fmt::Write;

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::error::{Result, TransportError};

type HmacSha256 = Hmac<Sha256>;

/// Placeholder in the signing-string template replaced with the hex SHA-256
/// of the canonical request.
pub const HASHED_CANONICAL_REQUEST_PLACEHOLDER: &str = "{HashedCanonicalRequest}";

/// Placeholder in the authorization-format template replaced with the sorted
/// `;`-joined signed header names.
pub const SIGNED_HEADERS_PLACEHOLDER: &str = "{SignedHeaders}";

/// Placeholder in the authorization-format template replaced with the final
/// hex HMAC-SHA256 signature.
pub const SIGNATURE_PLACEHOLDER: &str = "{Signature}";

/// HMAC-SHA256 of `data` under `key`.
///
/// Also the building block for derived-key schemes: Tencent TC3 chains
/// `HMAC("TC3" + secret, date)` → service → `"tc3_request"` caller-side and
/// signs with the final link.
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// Lowercase hex SHA-256 of `data`. Used by callers to produce body hashes.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Build a vendor Authorization header value from a canonical request and
/// two vendor templates.
///
/// Pure function, no I/O, no shared state. Steps:
///
/// 1. Normalize headers: lowercase names, trim value whitespace.
/// 2. `SignedHeaders` = sorted, deduplicated lowercase names joined with `;`.
/// 3. Canonical header block: `"name:value\n"` per header in sorted order.
/// 4. Canonical request = `\n`-joined uppercased method, path, raw query,
///    header block, `SignedHeaders`, body hash.
/// 5. Hash the canonical request (hex SHA-256).
/// 6. Substitute into `signing_string_template` → string to sign.
/// 7. Signature = hex HMAC-SHA256 of the string to sign under `secret_key`.
/// 8. Substitute `SignedHeaders` and the signature into
///    `authorization_format_template`.
///
/// `secret_key` accepts text or raw bytes; equal content signs identically.
///
/// # Errors
///
/// [`TransportError::Contract`] when `signing_string_template` lacks
/// `{HashedCanonicalRequest}` or `authorization_format_template` lacks
/// `{Signature}` — caller programming errors, surfaced immediately.
/// `{SignedHeaders}` is substituted where present but not required.
#[allow(clippy::too_many_arguments)]
pub fn sign_authorization(
    secret_key: impl AsRef<[u8]>,
    method: &str,
    path: &str,
    query: &str,
    headers: &[(String, String)],
    body_hash_hex: &str,
    signing_string_template: &str,
    authorization_format_template: &str,
) -> Result<String> {
    if !signing_string_template.contains(HASHED_CANONICAL_REQUEST_PLACEHOLDER) {
        return Err(TransportError::Contract {
            detail: format!(
                "signing string template is missing the {HASHED_CANONICAL_REQUEST_PLACEHOLDER} placeholder"
            ),
        });
    }
    if !authorization_format_template.contains(SIGNATURE_PLACEHOLDER) {
        return Err(TransportError::Contract {
            detail: format!(
                "authorization format template is missing the {SIGNATURE_PLACEHOLDER} placeholder"
            ),
        });
    }

    // 1. Normalize and sort (stable, so duplicate names keep caller order)
    let mut normalized: Vec<(String, String)> = headers
        .iter()
        .map(|(name, value)| (name.to_lowercase(), value.trim().to_string()))
        .collect();
    normalized.sort_by(|a, b| a.0.cmp(&b.0));

    // 2. Signed header list, deduplicated
    let mut names: Vec<&str> = normalized.iter().map(|(name, _)| name.as_str()).collect();
    names.dedup();
    let signed_headers = names.join(";");

    // 3. Canonical header block (each entry newline-terminated)
    let canonical_headers = normalized
        .iter()
        .fold(String::new(), |mut acc, (name, value)| {
            let _ = writeln!(acc, "{name}:{value}");
            acc
        });

    // 4. Canonical request
    let method = method.to_uppercase();
    let canonical_request = format!(
        "{method}\n{path}\n{query}\n{canonical_headers}\n{signed_headers}\n{body_hash_hex}"
    );

    // 5-6. Hash and splice into the string to sign
    let hashed_canonical_request = sha256_hex(canonical_request.as_bytes());
    let string_to_sign = signing_string_template
        .replace(HASHED_CANONICAL_REQUEST_PLACEHOLDER, &hashed_canonical_request);

    // 7. Sign
    let signature = hex::encode(hmac_sha256(secret_key.as_ref(), string_to_sign.as_bytes()));

    // 8. Assemble the Authorization value
    Ok(authorization_format_template
        .replace(SIGNED_HEADERS_PLACEHOLDER, &signed_headers)
        .replace(SIGNATURE_PLACEHOLDER, &signature))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGNING_TEMPLATE: &str = "TEST-HMAC-SHA256\n{HashedCanonicalRequest}";
    const AUTH_TEMPLATE: &str =
        "TEST-HMAC-SHA256 Credential=ak,SignedHeaders={SignedHeaders},Signature={Signature}";

    fn default_headers() -> Vec<(String, String)> {
        vec![
            ("Host".to_string(), "dns.example.com".to_string()),
            ("X-Date".to_string(), "20240115T080000Z".to_string()),
        ]
    }

    fn sign_default(headers: &[(String, String)]) -> String {
        sign_authorization(
            "test-secret",
            "GET",
            "/v2/zones",
            "limit=10",
            headers,
            &sha256_hex(b""),
            SIGNING_TEMPLATE,
            AUTH_TEMPLATE,
        )
        .unwrap()
    }

    fn extract_signature(auth: &str) -> &str {
        auth.rsplit("Signature=").next().unwrap()
    }

    #[test]
    fn deterministic() {
        let headers = default_headers();
        assert_eq!(sign_default(&headers), sign_default(&headers));
    }

    #[test]
    fn signed_headers_lowercased_sorted_deduplicated() {
        let headers = vec![
            ("X-Header".to_string(), "1".to_string()),
            ("Host".to_string(), "h".to_string()),
            ("x-header".to_string(), "2".to_string()),
        ];
        let auth = sign_default(&headers);
        assert!(
            auth.contains("SignedHeaders=host;x-header,"),
            "unexpected SignedHeaders in {auth}"
        );
    }

    #[test]
    fn header_value_change_changes_signature() {
        let mut headers = default_headers();
        let before = sign_default(&headers);
        headers[1].1 = "20240115T080001Z".to_string();
        let after = sign_default(&headers);
        assert_ne!(extract_signature(&before), extract_signature(&after));
    }

    #[test]
    fn header_values_trimmed() {
        let spaced = vec![("Host".to_string(), "  dns.example.com  ".to_string())];
        let tight = vec![("Host".to_string(), "dns.example.com".to_string())];
        assert_eq!(sign_default(&spaced), sign_default(&tight));
    }

    #[test]
    fn method_uppercased() {
        let headers = default_headers();
        let lower = sign_authorization(
            "test-secret",
            "get",
            "/v2/zones",
            "",
            &headers,
            &sha256_hex(b""),
            SIGNING_TEMPLATE,
            AUTH_TEMPLATE,
        )
        .unwrap();
        let upper = sign_authorization(
            "test-secret",
            "GET",
            "/v2/zones",
            "",
            &headers,
            &sha256_hex(b""),
            SIGNING_TEMPLATE,
            AUTH_TEMPLATE,
        )
        .unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn text_and_byte_keys_sign_identically() {
        let headers = default_headers();
        let from_str = sign_authorization(
            "secret",
            "GET",
            "/",
            "",
            &headers,
            &sha256_hex(b""),
            SIGNING_TEMPLATE,
            AUTH_TEMPLATE,
        )
        .unwrap();
        let from_bytes = sign_authorization(
            b"secret".as_slice(),
            "GET",
            "/",
            "",
            &headers,
            &sha256_hex(b""),
            SIGNING_TEMPLATE,
            AUTH_TEMPLATE,
        )
        .unwrap();
        assert_eq!(from_str, from_bytes);
    }

    #[test]
    fn missing_hash_placeholder_is_contract_error() {
        let result = sign_authorization(
            "secret",
            "GET",
            "/",
            "",
            &default_headers(),
            &sha256_hex(b""),
            "TEST-HMAC-SHA256\nno-placeholder-here",
            AUTH_TEMPLATE,
        );
        assert!(
            matches!(&result, Err(TransportError::Contract { .. })),
            "unexpected result: {result:?}"
        );
    }

    #[test]
    fn missing_signature_placeholder_is_contract_error() {
        let result = sign_authorization(
            "secret",
            "GET",
            "/",
            "",
            &default_headers(),
            &sha256_hex(b""),
            SIGNING_TEMPLATE,
            "TEST-HMAC-SHA256 SignedHeaders={SignedHeaders}",
        );
        assert!(
            matches!(&result, Err(TransportError::Contract { .. })),
            "unexpected result: {result:?}"
        );
    }

    #[test]
    fn auth_template_without_signed_headers_is_accepted() {
        let auth = sign_authorization(
            "secret",
            "GET",
            "/",
            "",
            &default_headers(),
            &sha256_hex(b""),
            SIGNING_TEMPLATE,
            "TEST {Signature}",
        )
        .unwrap();
        assert!(auth.starts_with("TEST "));
        assert_eq!(auth.len(), "TEST ".len() + 64);
    }

    #[test]
    fn sha256_hex_empty_input() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn hmac_sha256_known_vector() {
        // RFC 4231 test case 2
        let out = hmac_sha256(b"Jefe", b"what do ya want for nothing?");
        assert_eq!(
            hex::encode(out),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }
}
