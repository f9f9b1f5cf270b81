//! Build-time configuration.
//!
//! `API_BASE_URL` points the client at the booking API (for example
//! `https://api.delapre.example`). It is read at compile time; when unset the
//! client talks to a local development server.

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

/// Base URL of the booking API, without a trailing slash.
#[must_use]
pub fn api_base_url() -> String {
    api_base_with(option_env!("API_BASE_URL"))
}

/// Console log level: `debug` for debug builds, `info` otherwise.
#[must_use]
pub const fn log_level() -> log::Level {
    if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    }
}

fn api_base_with(configured: Option<&str>) -> String {
    let base = configured
        .map(str::trim)
        .filter(|base| !base.is_empty())
        .unwrap_or(DEFAULT_API_BASE_URL);
    base.trim_end_matches('/').to_string()
}

/// Join an API base and an endpoint path with exactly one slash between them.
pub(crate) fn join(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_base_defaults_to_local_server() {
        assert_eq!(api_base_with(None), DEFAULT_API_BASE_URL);
        assert_eq!(api_base_with(Some("  ")), DEFAULT_API_BASE_URL);
    }

    #[test]
    fn api_base_drops_trailing_slashes() {
        assert_eq!(
            api_base_with(Some("https://api.delapre.example//")),
            "https://api.delapre.example"
        );
        assert_eq!(
            join("https://api.delapre.example/", "/api/events"),
            "https://api.delapre.example/api/events"
        );
    }
}
