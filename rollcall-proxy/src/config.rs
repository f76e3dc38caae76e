use std::env;

use tracing::{info, warn};

pub const ENV_BACKEND_URL: &str = "ROLLCALL_BACKEND_URL";
pub const ENV_PROXY_BIND: &str = "ROLLCALL_PROXY_BIND";

const DEFAULT_BIND: &str = "127.0.0.1:3001";

pub struct ProxyConfig {
    pub bind: String,
    /// Where requests are relayed. Unset is allowed; every relay then fails.
    pub upstream: Option<String>,
}

impl ProxyConfig {
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let upstream = lookup(ENV_BACKEND_URL).filter(|url| !url.trim().is_empty());
        if upstream.is_none() {
            warn!("{ENV_BACKEND_URL} not set, requests will fail until it is configured");
        }

        let bind = lookup(ENV_PROXY_BIND).unwrap_or_else(|| {
            info!("{ENV_PROXY_BIND} not set, using default: {DEFAULT_BIND}");
            DEFAULT_BIND.to_string()
        });

        Self { bind, upstream }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_upstream_does_not_fail() {
        let config = ProxyConfig::from_lookup(|_| None);
        assert_eq!(config.upstream, None);
        assert_eq!(config.bind, DEFAULT_BIND);
    }

    #[test]
    fn test_blank_upstream_counts_as_missing() {
        let config = ProxyConfig::from_lookup(|key| (key == ENV_BACKEND_URL).then(|| "  ".into()));
        assert_eq!(config.upstream, None);
    }

    #[test]
    fn test_reads_both_variables() {
        let config = ProxyConfig::from_lookup(|key| match key {
            ENV_BACKEND_URL => Some("http://127.0.0.1:8080/exec".into()),
            ENV_PROXY_BIND => Some("0.0.0.0:4000".into()),
            _ => None,
        });
        assert_eq!(config.upstream.as_deref(), Some("http://127.0.0.1:8080/exec"));
        assert_eq!(config.bind, "0.0.0.0:4000");
    }
}
