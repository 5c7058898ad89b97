//! Startup configuration, read from the environment.

use duolink_transport::OriginPolicy;

/// Default listening port when `PORT` is unset.
const DEFAULT_PORT: u16 = 3001;

/// Default allowed origin when `ALLOWED_ORIGIN` is unset (the local dev
/// frontend).
const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";

/// Server startup parameters. Not part of the core logic — both values
/// are plain plumbing consumed once at bind time.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// TCP port to listen on.
    pub port: u16,

    /// Origin allowed to connect from browsers. `None` disables the
    /// check entirely.
    pub allowed_origin: Option<String>,
}

impl ServerConfig {
    /// Reads configuration from `PORT` and `ALLOWED_ORIGIN`.
    ///
    /// Unset or unparseable values fall back to the defaults; the
    /// special value `ALLOWED_ORIGIN=*` disables the origin check.
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let allowed_origin = match std::env::var("ALLOWED_ORIGIN") {
            Ok(origin) if origin == "*" => None,
            Ok(origin) => Some(origin),
            Err(_) => Some(DEFAULT_ALLOWED_ORIGIN.to_string()),
        };

        Self {
            port,
            allowed_origin,
        }
    }

    /// The socket address string to bind.
    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    /// The origin policy for the transport handshake.
    pub fn origin_policy(&self) -> OriginPolicy {
        match &self.allowed_origin {
            Some(origin) => OriginPolicy::only(origin.clone()),
            None => OriginPolicy::allow_any(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            allowed_origin: Some(DEFAULT_ALLOWED_ORIGIN.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 3001);
        assert_eq!(
            config.allowed_origin.as_deref(),
            Some("http://localhost:5173")
        );
        assert_eq!(config.bind_addr(), "0.0.0.0:3001");
    }
}
