//! Configuration management for the relay server.
//!
//! Configuration is read from environment variables once at startup and then
//! shared read-only with every handler through [`crate::api::AppState`].

use anyhow::Result;
use std::fmt;
use std::path::PathBuf;

/// Default base URL of the Anthropic API.
pub const DEFAULT_API_BASE: &str = "https://api.anthropic.com";

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Upstream API settings (credential, base URL)
    pub anthropic: AnthropicConfig,

    /// Server configuration (host, port)
    pub server: ServerConfig,

    /// Whether to verify SSL certificates for upstream requests
    pub verify_ssl: bool,

    /// Request timeout in seconds for the upstream call
    pub request_timeout_secs: u64,

    /// Directory served as static files, if any
    pub static_dir: Option<PathBuf>,
}

/// Settings for the upstream Messages API.
#[derive(Clone)]
pub struct AnthropicConfig {
    /// API key sent as `x-api-key`. `None` when unset or blank.
    pub api_key: Option<String>,

    /// Base URL without trailing slash
    pub api_base: String,
}

impl AnthropicConfig {
    /// Full URL of the Messages endpoint.
    pub fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.api_base)
    }
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl fmt::Debug for AnthropicConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnthropicConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// Server-specific configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            anthropic: AnthropicConfig::default(),
            server: ServerConfig::default(),
            verify_ssl: default_verify_ssl(),
            request_timeout_secs: default_request_timeout(),
            static_dir: Some(PathBuf::from(default_static_dir())),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_verify_ssl() -> bool {
    true
}

fn default_request_timeout() -> u64 {
    120
}

fn default_static_dir() -> &'static str {
    "public"
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// `.env` is expected to have been applied already (see `main`).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Examples
    ///
    /// ```
    /// use llm_relay::core::config::AppConfig;
    ///
    /// let config = AppConfig::from_lookup(|key| match key {
    ///     "PORT" => Some("8080".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    /// assert_eq!(config.server.port, 8080);
    /// assert!(config.anthropic.api_key.is_none());
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();

        config.anthropic.api_key = lookup("ANTHROPIC_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        if let Some(base) = lookup("ANTHROPIC_API_BASE") {
            let base = base.trim().trim_end_matches('/');
            if !base.is_empty() {
                config.anthropic.api_base = base.to_string();
            }
        }

        if let Some(host) = lookup("HOST") {
            config.server.host = host;
        }

        if let Some(port_str) = lookup("PORT") {
            match port_str.parse::<u16>() {
                Ok(port) => config.server.port = port,
                Err(_) => tracing::warn!(value = %port_str, "Ignoring invalid PORT"),
            }
        }

        if let Some(verify_ssl_str) = lookup("VERIFY_SSL") {
            config.verify_ssl = str_to_bool(&verify_ssl_str);
        }

        if let Some(timeout_str) = lookup("REQUEST_TIMEOUT_SECS") {
            if let Ok(timeout) = timeout_str.parse::<u64>() {
                config.request_timeout_secs = timeout;
            }
        }

        if let Some(dir) = lookup("STATIC_DIR") {
            config.static_dir = if dir.is_empty() {
                None
            } else {
                Some(PathBuf::from(dir))
            };
        }

        Ok(config)
    }

    /// Whether an upstream credential is available.
    pub fn has_api_key(&self) -> bool {
        self.anthropic.api_key.is_some()
    }
}

/// Convert string to boolean.
///
/// Accepts: "true", "1", "yes", "on" (case-insensitive)
fn str_to_bool(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_str_to_bool() {
        assert!(str_to_bool("true"));
        assert!(str_to_bool("TRUE"));
        assert!(str_to_bool("1"));
        assert!(str_to_bool("yes"));
        assert!(str_to_bool("On"));
        assert!(!str_to_bool("false"));
        assert!(!str_to_bool("0"));
        assert!(!str_to_bool("off"));
        assert!(!str_to_bool(""));
        assert!(!str_to_bool("invalid"));
    }

    #[test]
    fn test_default_values() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert!(config.verify_ssl);
        assert_eq!(config.request_timeout_secs, 120);
        assert_eq!(config.static_dir, Some(PathBuf::from("public")));
        assert_eq!(config.anthropic.api_base, DEFAULT_API_BASE);
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_api_key_loaded() {
        let config =
            AppConfig::from_lookup(lookup_from(&[("ANTHROPIC_API_KEY", "sk-ant-test")])).unwrap();
        assert_eq!(config.anthropic.api_key.as_deref(), Some("sk-ant-test"));
        assert!(config.has_api_key());
    }

    #[test]
    fn test_blank_api_key_is_missing() {
        let config = AppConfig::from_lookup(lookup_from(&[("ANTHROPIC_API_KEY", "")])).unwrap();
        assert!(!config.has_api_key());

        let config = AppConfig::from_lookup(lookup_from(&[("ANTHROPIC_API_KEY", "   ")])).unwrap();
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("VERIFY_SSL", "false"),
            ("REQUEST_TIMEOUT_SECS", "15"),
            ("STATIC_DIR", "assets"),
            ("ANTHROPIC_API_BASE", "http://localhost:9000/"),
        ]))
        .unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert!(!config.verify_ssl);
        assert_eq!(config.request_timeout_secs, 15);
        assert_eq!(config.static_dir, Some(PathBuf::from("assets")));
        assert_eq!(config.anthropic.api_base, "http://localhost:9000");
        assert_eq!(
            config.anthropic.messages_url(),
            "http://localhost:9000/v1/messages"
        );
    }

    #[test]
    fn test_invalid_port_falls_back() {
        let config = AppConfig::from_lookup(lookup_from(&[("PORT", "not-a-port")])).unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_empty_static_dir_disables_serving() {
        let config = AppConfig::from_lookup(lookup_from(&[("STATIC_DIR", "")])).unwrap();
        assert!(config.static_dir.is_none());
    }

    #[test]
    fn test_default_messages_url() {
        let config = AnthropicConfig::default();
        assert_eq!(
            config.messages_url(),
            "https://api.anthropic.com/v1/messages"
        );
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = AnthropicConfig {
            api_key: Some("sk-ant-secret".to_string()),
            api_base: DEFAULT_API_BASE.to_string(),
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-ant-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    #[serial]
    fn test_from_env() {
        unsafe {
            std::env::set_var("ANTHROPIC_API_KEY", "env-key");
            std::env::set_var("PORT", "4321");
        }

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.anthropic.api_key.as_deref(), Some("env-key"));
        assert_eq!(config.server.port, 4321);

        unsafe {
            std::env::remove_var("ANTHROPIC_API_KEY");
            std::env::remove_var("PORT");
        }
    }
}
