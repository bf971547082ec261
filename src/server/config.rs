//! Server configuration

use std::net::{Ipv4Addr, SocketAddr};

/// Default listening port
pub const DEFAULT_PORT: u16 = 18793;

/// Default route for viewer upgrades
pub const DEFAULT_PATH: &str = "/a2ui/activity";

/// Server configuration options
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_addr: SocketAddr,

    /// HTTP path viewers upgrade on
    pub path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            path: DEFAULT_PATH.to_string(),
        }
    }
}

impl ServerConfig {
    /// Create a new config with custom bind address
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            bind_addr: addr,
            ..Default::default()
        }
    }

    /// Set the bind address
    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set the upgrade path; a leading `/` is added if missing
    pub fn path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.path = if path.starts_with('/') {
            path
        } else {
            format!("/{}", path)
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();

        assert_eq!(config.bind_addr.port(), DEFAULT_PORT);
        assert!(config.bind_addr.ip().is_loopback());
        assert_eq!(config.path, DEFAULT_PATH);
    }

    #[test]
    fn test_with_addr() {
        let addr: SocketAddr = "0.0.0.0:9000".parse().unwrap();
        let config = ServerConfig::with_addr(addr);

        assert_eq!(config.bind_addr, addr);
        assert_eq!(config.path, DEFAULT_PATH);
    }

    #[test]
    fn test_path_normalized() {
        assert_eq!(ServerConfig::default().path("live").path, "/live");
        assert_eq!(ServerConfig::default().path("/x/y").path, "/x/y");
    }

    #[test]
    fn test_builder_chaining() {
        let addr: SocketAddr = "127.0.0.1:1".parse().unwrap();
        let config = ServerConfig::default().bind(addr).path("/activity");

        assert_eq!(config.bind_addr, addr);
        assert_eq!(config.path, "/activity");
    }
}
