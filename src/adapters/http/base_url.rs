use axum::http::{HeaderMap, header::HOST};

use crate::infra::config::AppConfig;

const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Origin that verification links point at.
///
/// Behind a trusted proxy the link follows the host the user actually reached;
/// otherwise it is the configured `APP_ORIGIN`.
pub fn request_base_url(config: &AppConfig, headers: &HeaderMap) -> String {
    if config.trust_proxy {
        if let Some(host) = header_str(headers, HOST.as_str()) {
            let proto = header_str(headers, FORWARDED_PROTO)
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .filter(|p| matches!(*p, "http" | "https"))
                .unwrap_or("http");
            return format!("{proto}://{host}");
        }
    }
    config.app_origin.as_str().trim_end_matches('/').to_string()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
