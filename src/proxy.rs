//! Proxy fallback chain vocabulary and parsing.
//!
//! A proxy list is an ordered sequence of candidates tried left to right
//! until one completes a transport-level exchange. Accepted spellings:
//!
//! | Spelling | Meaning |
//! |----------|---------|
//! | `http://host:port` | explicit proxy URL |
//! | `DIRECT` | force a direct connection, bypassing any proxy |
//! | `SYSTEM` / `DEFAULT` | inherit the OS proxy configuration |
//! | `host:port` | legacy form, normalized to `http://host:port` |

use crate::error::{Result, TransportError};

/// One entry in a proxy fallback chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyCandidate {
    /// Connect directly, bypassing any configured proxy.
    Direct,
    /// Inherit the OS proxy configuration (environment variables).
    System,
    /// Route through an explicit proxy URL.
    Url(String),
}

impl ProxyCandidate {
    /// Parse a single proxy spelling.
    ///
    /// # Errors
    ///
    /// [`TransportError::Contract`] for empty strings, unsupported schemes,
    /// and spellings that are neither a keyword, a proxy URL, nor a legacy
    /// `host:port` pair.
    pub fn parse(spec: &str) -> Result<Self> {
        let trimmed = spec.trim();
        if trimmed.is_empty() {
            return Err(TransportError::Contract {
                detail: "empty proxy string".to_string(),
            });
        }

        match trimmed.to_ascii_uppercase().as_str() {
            "DIRECT" => return Ok(Self::Direct),
            "SYSTEM" | "DEFAULT" => return Ok(Self::System),
            _ => {}
        }

        if let Some((scheme, rest)) = trimmed.split_once("://") {
            return match scheme.to_ascii_lowercase().as_str() {
                "http" | "https" if !rest.is_empty() => Ok(Self::Url(trimmed.to_string())),
                "http" | "https" => Err(TransportError::Contract {
                    detail: format!("proxy URL '{trimmed}' has no host"),
                }),
                other => Err(TransportError::Contract {
                    detail: format!("unsupported proxy scheme '{other}' in '{trimmed}'"),
                }),
            };
        }

        if is_host_port(trimmed) {
            log::warn!("[proxy] legacy proxy spelling '{trimmed}', assuming http://{trimmed}");
            return Ok(Self::Url(format!("http://{trimmed}")));
        }

        Err(TransportError::Contract {
            detail: format!("malformed proxy string '{trimmed}'"),
        })
    }

    /// Stable key for client-cache lookups.
    pub(crate) fn cache_key(&self) -> String {
        match self {
            Self::Direct => "direct".to_string(),
            Self::System => "system".to_string(),
            Self::Url(url) => url.clone(),
        }
    }
}

impl std::fmt::Display for ProxyCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct => f.write_str("DIRECT"),
            Self::System => f.write_str("SYSTEM"),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// Parse an ordered proxy list, preserving order.
///
/// # Errors
///
/// Fails on the first malformed entry, see [`ProxyCandidate::parse`].
pub fn parse_proxy_list<S: AsRef<str>>(specs: &[S]) -> Result<Vec<ProxyCandidate>> {
    specs
        .iter()
        .map(|spec| ProxyCandidate::parse(spec.as_ref()))
        .collect()
}

/// `host:port` with a numeric port and a non-empty host.
fn is_host_port(s: &str) -> bool {
    match s.rsplit_once(':') {
        Some((host, port)) => {
            !host.is_empty()
                && !host.contains('/')
                && !port.is_empty()
                && port.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}
