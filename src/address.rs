//! Endpoint parsing: user-typed address string → [`TransferTarget`].
//!
//! Two shapes are accepted, one per transport:
//!
//! ```text
//! raw    192.168.0.10:5000         exactly host:port
//! http   192.168.0.10:5000/        host[:port][/], optional http:// prefix
//! ```
//!
//! A port that does not parse is replaced by the configured default port
//! (5000 out of the box) unless strict mode is on, in which case the address
//! is rejected. A [`TransferTarget`] only exists for addresses that passed.

use crate::config::NetworkConfig;
use crate::error::TransferError;
use std::fmt;
use std::str::FromStr;

const HTTP_PORT: u16 = 80;

/// Which transport a target is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Raw,
    Http,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Raw => f.write_str("raw"),
            Scheme::Http => f.write_str("http"),
        }
    }
}

impl FromStr for Scheme {
    type Err = TransferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "raw" | "tcp" | "socket" => Ok(Scheme::Raw),
            "http" => Ok(Scheme::Http),
            other => Err(TransferError::InvalidAddressFormat(format!(
                "unknown transport '{other}' (expected raw or http)"
            ))),
        }
    }
}

/// A validated destination: non-empty host, port in 1–65535, and scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferTarget {
    host: String,
    port: u16,
    scheme: Scheme,
}

impl TransferTarget {
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// `host:port`, as handed to the socket resolver.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Full request URL for the receiver route, e.g. `http://10.0.0.2:5000/upload`.
    ///
    /// The port is left out when it is the HTTP default.
    pub fn upload_url(&self, path: &str) -> String {
        if self.port == HTTP_PORT {
            format!("http://{}{}", self.host, path)
        } else {
            format!("http://{}:{}{}", self.host, self.port, path)
        }
    }
}

impl fmt::Display for TransferTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}", self.scheme, self.host, self.port)
    }
}

/// How to treat a port that is not a number in 1–65535.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortPolicy {
    /// Substitute the given port.
    Fallback(u16),
    /// Reject the address.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressParser {
    policy: PortPolicy,
}

impl Default for AddressParser {
    fn default() -> Self {
        Self::new(PortPolicy::Fallback(5000))
    }
}

impl AddressParser {
    pub fn new(policy: PortPolicy) -> Self {
        Self { policy }
    }

    pub fn from_config(network: &NetworkConfig) -> Self {
        if network.strict_port {
            Self::new(PortPolicy::Strict)
        } else {
            Self::new(PortPolicy::Fallback(network.default_port))
        }
    }

    /// Parse `input` into a target for the given scheme.
    pub fn parse(&self, input: &str, scheme: Scheme) -> Result<TransferTarget, TransferError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(invalid(input, "address is empty"));
        }
        match scheme {
            Scheme::Raw => self.parse_raw(input),
            Scheme::Http => self.parse_http(input),
        }
    }

    fn parse_raw(&self, input: &str) -> Result<TransferTarget, TransferError> {
        let parts: Vec<&str> = input.split(':').collect();
        if parts.len() != 2 || parts.iter().any(|p| p.is_empty()) {
            return Err(invalid(input, "expected host:port"));
        }
        Ok(TransferTarget {
            host: parts[0].to_string(),
            port: self.port(input, parts[1])?,
            scheme: Scheme::Raw,
        })
    }

    fn parse_http(&self, input: &str) -> Result<TransferTarget, TransferError> {
        let trimmed = input.strip_prefix("http://").unwrap_or(input);
        let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
        if trimmed.contains('/') {
            return Err(invalid(input, "expected host[:port] without a path"));
        }

        let parts: Vec<&str> = trimmed.split(':').collect();
        let (host, port) = match parts.as_slice() {
            [host] => (*host, HTTP_PORT),
            [host, port] if !port.is_empty() => (*host, self.port(input, port)?),
            _ => return Err(invalid(input, "expected host[:port]")),
        };
        if host.is_empty() {
            return Err(invalid(input, "host is empty"));
        }
        Ok(TransferTarget {
            host: host.to_string(),
            port,
            scheme: Scheme::Http,
        })
    }

    fn port(&self, input: &str, raw: &str) -> Result<u16, TransferError> {
        match raw.parse::<u16>() {
            Ok(port) if port != 0 => Ok(port),
            _ => match self.policy {
                PortPolicy::Fallback(port) => {
                    tracing::debug!(address = input, port, "unparsable port, using default");
                    Ok(port)
                }
                PortPolicy::Strict => Err(invalid(input, "port must be a number in 1-65535")),
            },
        }
    }
}

fn invalid(input: &str, why: &str) -> TransferError {
    TransferError::InvalidAddressFormat(format!("'{input}': {why}"))
}
