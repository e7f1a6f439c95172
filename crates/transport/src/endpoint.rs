//! Minimal `danejoe://host:port` URL parsing.

use crate::error::TransportError;

const SCHEME: &str = "danejoe://";
/// Port assumed when the URL omits one.
pub const DEFAULT_PORT: u16 = 8080;

/// A resolved `(host, port)` pair addressing a remote server.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Endpoint {
    /// Hostname or IP literal.
    pub host: String,
    /// TCP port.
    pub port: u16,
}

impl Endpoint {
    /// Parses a `danejoe://host` or `danejoe://host:port` string.
    ///
    /// This is intentionally minimal: only the `danejoe` scheme, a host,
    /// and an optional `:port` are recognized. There is no support for
    /// paths, query strings, or userinfo.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidUrl`] if the scheme is missing,
    /// the host is empty, or the port segment is not a valid `u16`.
    pub fn parse(url: &str) -> Result<Endpoint, TransportError> {
        let rest = url
            .strip_prefix(SCHEME)
            .ok_or_else(|| TransportError::InvalidUrl(url.to_string()))?;
        if rest.is_empty() {
            return Err(TransportError::InvalidUrl(url.to_string()));
        }

        let (host, port) = match rest.rsplit_once(':') {
            Some((host, port_str)) => {
                let port = port_str
                    .parse::<u16>()
                    .map_err(|_| TransportError::InvalidUrl(url.to_string()))?;
                (host, port)
            }
            None => (rest, DEFAULT_PORT),
        };

        if host.is_empty() {
            return Err(TransportError::InvalidUrl(url.to_string()));
        }

        Ok(Endpoint {
            host: host.to_string(),
            port,
        })
    }

    /// Formats as a `host:port` pair suitable for `ToSocketAddrs`.
    #[must_use]
    pub fn socket_addr_string(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
