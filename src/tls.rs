//! TLS verification modes, the per-call downgrade state machine, and the
//! process-wide client cache.
//!
//! reqwest binds TLS configuration and proxy routing at client construction,
//! so "SSL context" here means a fully built [`reqwest::blocking::Client`].
//! The cache memoizes clients per (effective verification mode, proxy
//! candidate); entries are built once under an insert-if-absent lock and
//! reused for the life of the process (`Client` clones share the pool).

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use reqwest::blocking::{Client, ClientBuilder};
use reqwest::{Certificate, Proxy};

use crate::error::{Result, TransportError, error_chain};
use crate::proxy::ProxyCandidate;

/// Connection establishment timeout, separate from the per-request deadline.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Well-known CA bundle locations scanned when the platform store is absent
/// (minimal containers, stripped-down images).
const CA_BUNDLE_PATHS: [&str; 5] = [
    "/etc/ssl/certs/ca-certificates.crt",
    "/etc/pki/tls/certs/ca-bundle.crt",
    "/etc/ssl/ca-bundle.pem",
    "/etc/ssl/cert.pem",
    "/usr/local/etc/openssl/cert.pem",
];

/// TLS certificate verification policy for a request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SslVerify {
    /// Full certificate validation against the platform trust store.
    #[default]
    Strict,
    /// No certificate validation at all.
    Disabled,
    /// Start strict; downgrade to no validation once per logical call when
    /// the failure is the local-issuer-certificate class.
    Auto,
    /// Validate against an explicit CA bundle file (PEM).
    CustomCa(PathBuf),
}

impl SslVerify {
    /// Parse the configuration spelling: `true`/`strict`, `false`/`disabled`,
    /// `auto`, anything else is treated as a CA bundle path.
    #[must_use]
    pub fn parse(spec: &str) -> Self {
        match spec.trim().to_ascii_lowercase().as_str() {
            "" | "true" | "strict" => Self::Strict,
            "false" | "disabled" | "none" => Self::Disabled,
            "auto" => Self::Auto,
            _ => Self::CustomCa(PathBuf::from(spec.trim())),
        }
    }
}

impl From<bool> for SslVerify {
    fn from(verify: bool) -> Self {
        if verify { Self::Strict } else { Self::Disabled }
    }
}

/// Effective verification mode after resolving `Auto`, used as a cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum VerifyKey {
    Strict,
    Insecure,
    Ca(String),
}

/// Sticky per-call verification state.
///
/// Built fresh for every logical request and threaded through its retry and
/// proxy attempts; never shared across calls, so concurrent requests cannot
/// observe each other's downgrade.
#[derive(Debug)]
pub(crate) struct VerifyState {
    mode: SslVerify,
    downgraded: bool,
}

impl VerifyState {
    pub(crate) fn new(mode: SslVerify) -> Self {
        Self {
            mode,
            downgraded: false,
        }
    }

    /// The mode actually used for the next attempt.
    pub(crate) fn effective_key(&self) -> VerifyKey {
        match &self.mode {
            SslVerify::Strict => VerifyKey::Strict,
            SslVerify::Disabled => VerifyKey::Insecure,
            SslVerify::Auto => {
                if self.downgraded {
                    VerifyKey::Insecure
                } else {
                    VerifyKey::Strict
                }
            }
            SslVerify::CustomCa(path) => VerifyKey::Ca(path.display().to_string()),
        }
    }

    /// Whether an `Auto` downgrade is still available for this call.
    pub(crate) fn can_downgrade(&self) -> bool {
        matches!(self.mode, SslVerify::Auto) && !self.downgraded
    }

    /// Record the one permitted downgrade. Sticky for the rest of the call.
    pub(crate) fn downgrade(&mut self) {
        self.downgraded = true;
    }
}

/// Whether a TLS failure belongs to the class `Auto` mode may recover from:
/// an incomplete local trust chain, not a bad server certificate.
pub(crate) fn is_downgradable_tls_error(detail: &str) -> bool {
    let lower = detail.to_ascii_lowercase();
    lower.contains("unable to get local issuer certificate")
        || (lower.contains("basic constraints") && lower.contains("not marked critical"))
}

/// Memoizing map from (verification mode, proxy candidate) to a built client.
pub(crate) struct ClientCache {
    clients: Mutex<HashMap<(VerifyKey, String), Client>>,
}

impl ClientCache {
    pub(crate) fn new() -> Self {
        Self {
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Fetch the cached client for this key, building it on first use.
    ///
    /// The lock is held across the build so a miss is filled exactly once.
    pub(crate) fn client_for(&self, verify: &VerifyKey, proxy: &ProxyCandidate) -> Result<Client> {
        let key = (verify.clone(), proxy.cache_key());
        let mut clients = self
            .clients
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(client) = clients.get(&key) {
            return Ok(client.clone());
        }
        let client = build_client(verify, proxy)?;
        clients.insert(key, client.clone());
        Ok(client)
    }
}

fn build_client(verify: &VerifyKey, proxy: &ProxyCandidate) -> Result<Client> {
    match configure(verify, proxy, None)?.build() {
        Ok(client) => Ok(client),
        // A strict build can fail on hosts without a usable platform trust
        // store; scan the known bundle locations before giving up.
        Err(e) if *verify == VerifyKey::Strict => {
            let Some(bundle) = find_ca_bundle() else {
                return Err(TransportError::Ssl {
                    detail: error_chain(&e),
                });
            };
            log::warn!(
                "[tls] platform trust store unavailable ({e}), loading CA bundle {}",
                bundle.display()
            );
            configure(verify, proxy, Some(&bundle))?
                .build()
                .map_err(|e2| TransportError::Ssl {
                    detail: error_chain(&e2),
                })
        }
        Err(e) => Err(TransportError::Ssl {
            detail: error_chain(&e),
        }),
    }
}

fn configure(
    verify: &VerifyKey,
    proxy: &ProxyCandidate,
    extra_roots: Option<&Path>,
) -> Result<ClientBuilder> {
    let mut builder = Client::builder().connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS));

    builder = match proxy {
        ProxyCandidate::Direct => builder.no_proxy(),
        // reqwest reads the proxy environment by default
        ProxyCandidate::System => builder,
        ProxyCandidate::Url(url) => {
            builder.proxy(Proxy::all(url).map_err(|e| TransportError::Contract {
                detail: format!("invalid proxy URL '{url}': {e}"),
            })?)
        }
    };

    builder = match verify {
        VerifyKey::Strict => builder,
        VerifyKey::Insecure => builder.danger_accept_invalid_certs(true),
        VerifyKey::Ca(path) => add_root_certificates(builder, Path::new(path))?,
    };

    if let Some(path) = extra_roots {
        builder = add_root_certificates(builder, path)?;
    }

    Ok(builder)
}

fn add_root_certificates(mut builder: ClientBuilder, path: &Path) -> Result<ClientBuilder> {
    let pem = fs::read(path).map_err(|e| TransportError::Ssl {
        detail: format!("cannot read CA bundle {}: {e}", path.display()),
    })?;
    let certificates = Certificate::from_pem_bundle(&pem).map_err(|e| TransportError::Ssl {
        detail: format!("invalid CA bundle {}: {}", path.display(), error_chain(&e)),
    })?;
    for certificate in certificates {
        builder = builder.add_root_certificate(certificate);
    }
    Ok(builder)
}

fn find_ca_bundle() -> Option<PathBuf> {
    CA_BUNDLE_PATHS
        .iter()
        .map(PathBuf::from)
        .find(|path| path.is_file())
}
