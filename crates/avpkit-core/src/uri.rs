//! DiameterURI (RFC 6733 §4.3.1)
//!
//! ```text
//! "aaa://" FQDN [ port ] [ transport ] [ protocol ]
//! "aaas://" FQDN [ port ] [ transport ] [ protocol ]
//! ```

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

lazy_static! {
    static ref URI_RE: Regex = Regex::new(
        r"^(?i)(aaas?)://([a-z0-9](?:[a-z0-9._-]*[a-z0-9])?)(?::([0-9]{1,5}))?((?:;[^;=\s]+=[^;=\s]+)*)$"
    )
    .expect("valid DiameterURI pattern");
}

/// URI parse errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UriError {
    #[error("not a DiameterURI: {0:?}")]
    Syntax(String),

    #[error("invalid port: {0}")]
    InvalidPort(String),

    #[error("unknown transport: {0}")]
    UnknownTransport(String),

    #[error("unknown protocol: {0}")]
    UnknownProtocol(String),

    #[error("unknown or repeated parameter: {0}")]
    BadParameter(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Tcp,
    Sctp,
    Udp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UriProtocol {
    Diameter,
    Radius,
    TacacsPlus,
}

impl Transport {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::Sctp => "sctp",
            Self::Udp => "udp",
        }
    }
}

impl FromStr for Transport {
    type Err = UriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tcp" => Ok(Self::Tcp),
            "sctp" => Ok(Self::Sctp),
            "udp" => Ok(Self::Udp),
            _ => Err(UriError::UnknownTransport(s.to_string())),
        }
    }
}

impl UriProtocol {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Diameter => "diameter",
            Self::Radius => "radius",
            Self::TacacsPlus => "tacacs+",
        }
    }
}

impl FromStr for UriProtocol {
    type Err = UriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "diameter" => Ok(Self::Diameter),
            "radius" => Ok(Self::Radius),
            "tacacs+" => Ok(Self::TacacsPlus),
            _ => Err(UriError::UnknownProtocol(s.to_string())),
        }
    }
}

/// Parsed DiameterURI
///
/// `Display` yields the canonical form: lowercase scheme, host and parameter
/// values, with `transport` before `protocol`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiameterUri {
    pub secure: bool,
    pub host: String,
    pub port: Option<u16>,
    pub transport: Option<Transport>,
    pub protocol: Option<UriProtocol>,
}

impl DiameterUri {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            secure: false,
            host: host.into().to_ascii_lowercase(),
            port: None,
            transport: None,
            protocol: None,
        }
    }
}

impl FromStr for DiameterUri {
    type Err = UriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = URI_RE
            .captures(s.trim())
            .ok_or_else(|| UriError::Syntax(s.to_string()))?;

        let secure = caps[1].eq_ignore_ascii_case("aaas");
        let host = caps[2].to_ascii_lowercase();
        let port = caps
            .get(3)
            .map(|m| {
                m.as_str()
                    .parse::<u16>()
                    .map_err(|_| UriError::InvalidPort(m.as_str().to_string()))
            })
            .transpose()?;

        let mut uri = Self {
            secure,
            host,
            port,
            transport: None,
            protocol: None,
        };

        let params = caps.get(4).map_or("", |m| m.as_str());
        for param in params.split(';').filter(|p| !p.is_empty()) {
            let (key, value) = param
                .split_once('=')
                .ok_or_else(|| UriError::BadParameter(param.to_string()))?;
            match key.to_ascii_lowercase().as_str() {
                "transport" if uri.transport.is_none() => uri.transport = Some(value.parse()?),
                "protocol" if uri.protocol.is_none() => uri.protocol = Some(value.parse()?),
                _ => return Err(UriError::BadParameter(key.to_string())),
            }
        }

        Ok(uri)
    }
}

impl fmt::Display for DiameterUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scheme = if self.secure { "aaas" } else { "aaa" };
        write!(f, "{scheme}://{}", self.host)?;
        if let Some(port) = self.port {
            write!(f, ":{port}")?;
        }
        if let Some(transport) = self.transport {
            write!(f, ";transport={}", transport.as_str())?;
        }
        if let Some(protocol) = self.protocol {
            write!(f, ";protocol={}", protocol.as_str())?;
        }
        Ok(())
    }
}
