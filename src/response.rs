use std::collections::HashMap;

/// Uniform HTTP response handed back to provider integrations.
///
/// HTTP error statuses are data, not errors: the transport returns 4xx/5xx
/// responses normally (after retrying the retryable subset) and callers
/// branch on [`status`](Self::status).
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Canonical reason phrase for the status, empty when unknown.
    pub reason: String,
    /// Response headers, names lowercased; repeated headers comma-joined.
    pub headers: HashMap<String, String>,
    /// Body decoded to text via charset negotiation; never missing.
    pub body: String,
}

impl Response {
    /// Whether the status is in the 2xx range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Case-insensitive header lookup.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_with(status: u16, headers: &[(&str, &str)]) -> Response {
        Response {
            status,
            reason: String::new(),
            headers: headers
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            body: String::new(),
        }
    }

    #[test]
    fn success_range() {
        assert!(response_with(200, &[]).is_success());
        assert!(response_with(204, &[]).is_success());
        assert!(!response_with(199, &[]).is_success());
        assert!(!response_with(301, &[]).is_success());
        assert!(!response_with(500, &[]).is_success());
    }

    #[test]
    fn header_lookup_case_insensitive() {
        let response = response_with(200, &[("content-type", "application/json")]);
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(response.header("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(response.header("x-missing"), None);
    }
}
