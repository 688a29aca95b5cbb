//! Server configuration from the environment.

/// Where the web server listens. Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerConfig {
    pub host: String,
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

impl ServerConfig {
    /// Read HOST and PORT, keeping defaults for missing or unparsable values.
    pub fn from_env() -> Self {
        Self::from_vars(std::env::var("HOST").ok(), std::env::var("PORT").ok())
    }

    pub fn from_vars(host: Option<String>, port: Option<String>) -> Self {
        Self {
            host: host
                .filter(|h| !h.trim().is_empty())
                .unwrap_or_else(default_host),
            port: port
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or_else(default_port),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}
