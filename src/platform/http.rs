//! Process-wide HTTP client plus the auth and status-mapping helpers the
//! REST backend builds on.

use std::sync::OnceLock;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::error::CourierError;

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// The lazily built client every backend request goes through.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .pool_max_idle_per_host(10)
            .build()
            .expect("Failed to build HTTP client")
    })
}

/// JSON content type plus the platform's bearer credential.
pub fn bearer_headers(api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(val) = HeaderValue::from_str(&format!("Bearer {api_key}")) {
        headers.insert(AUTHORIZATION, val);
    }
    headers
}

/// Classify a non-success response; 401/403 are credential problems.
pub fn status_to_error(status: u16, body: &str) -> CourierError {
    match status {
        401 | 403 => CourierError::Authentication(body.to_string()),
        _ => CourierError::api(status, body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_maps_to_authentication() {
        assert!(matches!(
            status_to_error(401, "bad key"),
            CourierError::Authentication(_)
        ));
        assert!(matches!(
            status_to_error(403, "forbidden"),
            CourierError::Authentication(_)
        ));
    }

    #[test]
    fn other_statuses_map_to_api_errors() {
        match status_to_error(500, "boom") {
            CourierError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
