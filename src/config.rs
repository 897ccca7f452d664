//! Environment configuration: transport selection, server identity, bearer
//! token and bind address.

use std::{env, net::SocketAddr};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Stdio,
    Http,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub transport: TransportKind,
    pub server_name: String,
    pub api_token: Option<String>,
    pub bind_addr: String,
    pub bind_port: u16,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("MCP_TRANSPORT must be one of: stdio, http")]
    InvalidTransport,
    #[error("MCP_API_TOKEN is required and must not be empty for the http transport")]
    MissingApiToken,
    #[error("MCP_SERVER_NAME must not be empty")]
    EmptyServerName,
    #[error("BIND_PORT must be a valid u16")]
    InvalidPort,
    #[error("invalid bind address or port")]
    InvalidSocket,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let transport = match var("MCP_TRANSPORT")
            .map(|value| value.trim().to_ascii_lowercase())
            .filter(|value| !value.is_empty())
            .as_deref()
        {
            None | Some("stdio") => TransportKind::Stdio,
            Some("http") => TransportKind::Http,
            Some(_) => return Err(ConfigError::InvalidTransport),
        };

        let server_name = match var("MCP_SERVER_NAME") {
            Some(name) if name.trim().is_empty() => return Err(ConfigError::EmptyServerName),
            Some(name) => name.trim().to_string(),
            None => env!("CARGO_PKG_NAME").to_string(),
        };

        let api_token = var("MCP_API_TOKEN")
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty());
        if transport == TransportKind::Http && api_token.is_none() {
            return Err(ConfigError::MissingApiToken);
        }

        let bind_addr = var("BIND_ADDR").unwrap_or_else(|| "127.0.0.1".to_string());
        let bind_port = var("BIND_PORT")
            .map(|value| value.parse::<u16>().map_err(|_| ConfigError::InvalidPort))
            .transpose()?
            .unwrap_or(8080);

        let config = Self {
            transport,
            server_name,
            api_token,
            bind_addr,
            bind_port,
        };

        if transport == TransportKind::Http {
            let _ = config.bind_socket()?;
        }
        Ok(config)
    }

    pub fn bind_socket(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.bind_port)
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidSocket)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn parse_defaults() {
        let config = config_from(&[]).expect("config should parse");

        assert_eq!(config.transport, TransportKind::Stdio);
        assert_eq!(config.server_name, env!("CARGO_PKG_NAME"));
        assert_eq!(config.api_token, None);
        assert_eq!(config.bind_addr, "127.0.0.1");
        assert_eq!(config.bind_port, 8080);
    }

    #[test]
    fn http_transport_requires_token() {
        let err = config_from(&[("MCP_TRANSPORT", "http")]).expect_err("missing token");
        assert!(matches!(err, ConfigError::MissingApiToken));

        let err = config_from(&[("MCP_TRANSPORT", "http"), ("MCP_API_TOKEN", "   ")])
            .expect_err("blank token");
        assert!(matches!(err, ConfigError::MissingApiToken));
    }

    #[test]
    fn http_transport_parses_bind_settings() {
        let config = config_from(&[
            ("MCP_TRANSPORT", " HTTP "),
            ("MCP_API_TOKEN", "abc"),
            ("BIND_ADDR", "0.0.0.0"),
            ("BIND_PORT", "9090"),
        ])
        .expect("config should parse");

        assert_eq!(config.transport, TransportKind::Http);
        assert_eq!(config.api_token.as_deref(), Some("abc"));
        assert_eq!(
            config.bind_socket().expect("socket"),
            "0.0.0.0:9090".parse().expect("valid socket")
        );
    }

    #[test]
    fn rejects_unknown_transport() {
        let err = config_from(&[("MCP_TRANSPORT", "sse")]).expect_err("unknown transport");
        assert!(matches!(err, ConfigError::InvalidTransport));
    }

    #[test]
    fn rejects_invalid_port() {
        let err = config_from(&[("BIND_PORT", "70000")]).expect_err("port out of range");
        assert!(matches!(err, ConfigError::InvalidPort));
    }

    #[test]
    fn rejects_invalid_bind_address_for_http() {
        let err = config_from(&[
            ("MCP_TRANSPORT", "http"),
            ("MCP_API_TOKEN", "abc"),
            ("BIND_ADDR", "not an address"),
        ])
        .expect_err("invalid socket");
        assert!(matches!(err, ConfigError::InvalidSocket));
    }

    #[test]
    fn custom_server_name_is_trimmed() {
        let config =
            config_from(&[("MCP_SERVER_NAME", "  my-server ")]).expect("config should parse");
        assert_eq!(config.server_name, "my-server");

        let err = config_from(&[("MCP_SERVER_NAME", " ")]).expect_err("empty name");
        assert!(matches!(err, ConfigError::EmptyServerName));
    }
}
