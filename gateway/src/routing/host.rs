//! Where the hostname to classify comes from.

use crate::error::GatewayError;
use http::header::HOST;
use http::{HeaderMap, HeaderName, Uri};

/// Header an outer proxy uses to pass the original host along when the
/// gateway is not directly exposed.
pub const FORWARDED_HOST_HEADER: &str = "x-wsproxy-host";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostSource {
    /// The request's own host, with any `:port` stripped.
    Host,
    /// A header whose value is used verbatim.
    Header(HeaderName),
}

impl HostSource {
    pub fn from_header_name(name: &str) -> Result<Self, GatewayError> {
        if name.eq_ignore_ascii_case(HOST.as_str()) {
            return Ok(HostSource::Host);
        }
        HeaderName::from_bytes(name.as_bytes())
            .map(HostSource::Header)
            .map_err(|_| GatewayError::InvalidHeader(name.to_string()))
    }

    /// Extract the hostname. Returns `""` when the source is absent or not
    /// valid text, which never matches any branch.
    pub fn hostname<'a>(&self, headers: &'a HeaderMap, uri: &'a Uri) -> &'a str {
        match self {
            HostSource::Host => {
                // HTTP/2 requests carry the host in the `:authority` pseudo header.
                let host = headers
                    .get(HOST)
                    .and_then(|v| v.to_str().ok())
                    .or_else(|| uri.authority().map(|a| a.as_str()))
                    .unwrap_or("");
                host.split(':').next().unwrap_or(host)
            }
            HostSource::Header(name) => headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or(""),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            HostSource::Host => "Host",
            HostSource::Header(name) => name.as_str(),
        }
    }
}
