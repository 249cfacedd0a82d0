use crate::config::Config;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use tracing::warn;

/// Caller headers plus `Authorization: Bearer <token>` when a token is configured.
pub fn headers(config: &Config, extra: HeaderMap) -> HeaderMap {
    let mut headers = extra;
    if config.has_token() {
        match HeaderValue::from_str(&format!("Bearer {}", config.token)) {
            Ok(mut value) => {
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
            Err(_) => warn!("access token is not a valid header value; sending request without it"),
        }
    }
    headers
}
