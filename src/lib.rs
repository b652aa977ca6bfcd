//! # dns-courier-transport
//!
//! A reusable authenticated HTTP transport for cloud DNS provider
//! integrations: one blocking entry point that layers proxy fallback, SSL
//! verification handling (with one-shot auto-downgrade), exponential-backoff
//! retry, and charset-negotiated body decoding — plus a generic
//! HMAC-SHA256 canonical-request signer that covers several vendors' signing
//! schemes from two caller-supplied templates.
//!
//! ## Signing schemes covered
//!
//! | Vendor | Scheme | Key |
//! |--------|--------|-----|
//! | Alibaba Cloud | ACS3-HMAC-SHA256 | access key secret |
//! | Huawei Cloud | SDK-HMAC-SHA256 | secret access key |
//! | Tencent Cloud | TC3-HMAC-SHA256 | derived key (caller-side HMAC chain) |
//!
//! The vendor-specific literals (algorithm names, timestamps, credential
//! scopes) live in the two templates; [`sign_authorization`] contributes only
//! the shared canonical-request core. The golden-vector tests pin all three
//! schemes byte-for-byte against their published worked examples.
//!
//! ## TLS backend
//!
//! - **`native-tls`** *(default)* — the platform's native TLS implementation.
//! - **`rustls`** — rustls; recommended for cross-compilation.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use dns_courier_transport::{CallOptions, HttpRequest, HttpTransport, SslVerify};
//!
//! fn main() -> Result<(), dns_courier_transport::TransportError> {
//!     let transport = HttpTransport::new();
//!     let request = HttpRequest::new("GET", "https://api.example.com/v1/zones")
//!         .header("Accept", "application/json");
//!     let options = CallOptions {
//!         verify: SslVerify::Auto,
//!         ..CallOptions::default()
//!     };
//!
//!     let response = transport.execute(&request, &options)?;
//!     // HTTP error statuses are data, not errors: branch on `status`.
//!     println!("{} {}: {}", response.status, response.reason, response.body);
//!     Ok(())
//! }
//! ```
//!
//! ## Signing a request
//!
//! ```rust
//! use dns_courier_transport::{sha256_hex, sign_authorization};
//!
//! # fn main() -> Result<(), dns_courier_transport::TransportError> {
//! let headers = vec![
//!     ("Host".to_string(), "alidns.cn-hangzhou.aliyuncs.com".to_string()),
//!     ("x-acs-date".to_string(), "2024-01-15T08:00:00Z".to_string()),
//! ];
//! let authorization = sign_authorization(
//!     "access-key-secret",
//!     "POST",
//!     "/",
//!     "DomainName=example.com",
//!     &headers,
//!     &sha256_hex(b""),
//!     "ACS3-HMAC-SHA256\n{HashedCanonicalRequest}",
//!     "ACS3-HMAC-SHA256 Credential=ak,SignedHeaders={SignedHeaders},Signature={Signature}",
//! )?;
//! # let _ = authorization;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error handling
//!
//! All operations return [`Result<T, TransportError>`](TransportError).
//! Transient failures ([`TransportError::Network`], [`TransportError::Timeout`])
//! and the retryable status codes ([`RETRYABLE_STATUS`]) are retried with
//! exponential backoff inside [`HttpTransport::execute`]; only the final,
//! budget-exhausted failure surfaces. Non-2xx responses are returned as
//! ordinary [`Response`] values — inspect `status`, don't expect errors.

mod charset;
mod error;
mod proxy;
mod request;
mod response;
mod retry;
mod signer;
mod tls;
mod transport;
mod utils;

pub use charset::decode_body;
pub use error::{Result, TransportError};
pub use proxy::{ProxyCandidate, parse_proxy_list};
pub use request::HttpRequest;
pub use response::Response;
pub use retry::RETRYABLE_STATUS;
pub use signer::{
    HASHED_CANONICAL_REQUEST_PLACEHOLDER, SIGNATURE_PLACEHOLDER, SIGNED_HEADERS_PLACEHOLDER,
    hmac_sha256, sha256_hex, sign_authorization,
};
pub use tls::SslVerify;
pub use transport::{CallOptions, DEFAULT_MAX_RETRIES, HttpTransport};
