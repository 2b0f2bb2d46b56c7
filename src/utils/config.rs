use std::net::{Ipv4Addr, SocketAddrV4};
use std::str::FromStr;

use reqwest::{Method, Url};

use crate::models::error::{ProbeError, ProbeResult};

/// Default SOCKS5 proxy used for anonymity-network (`.onion`) targets when
/// no explicit proxy endpoint is supplied.
pub const DEFAULT_ONION_PROXY: SocketAddrV4 = SocketAddrV4::new(Ipv4Addr::new(127, 0, 0, 1), 9050);

/// Host suffix that triggers routing through the default SOCKS5 proxy.
pub const ONION_SUFFIX: &str = ".onion";

/// How the received status code is compared against expectations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusPolicy {
    /// Strict mode: the status code must equal this value exactly.
    Exact(u16),
    /// Legacy mode: any code in [200, 299] counts as success.
    SuccessRange,
}

impl StatusPolicy {
    pub fn matches(&self, code: u16) -> bool {
        match self {
            StatusPolicy::Exact(expected) => code == *expected,
            StatusPolicy::SuccessRange => (200..=299).contains(&code),
        }
    }
}

/// Validated configuration for a single probe invocation.
///
/// All command-line input is validated here, before any network activity.
/// Each violation is fatal on its own; there is no partial recovery.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub target: Url,
    pub method: Method,
    pub policy: StatusPolicy,
    /// Explicit proxy endpoint. Always takes precedence over the
    /// suffix-based onion default.
    pub proxy: Option<SocketAddrV4>,
    /// Fallback proxy for `.onion` targets with no explicit endpoint.
    pub onion_proxy: SocketAddrV4,
}

impl ProbeConfig {
    pub fn from_args(
        url: &str,
        method: &str,
        expect: u16,
        any_success: bool,
        proxy: Option<&str>,
    ) -> ProbeResult<Self> {
        let target = parse_target_url(url)?;

        let policy = if any_success {
            StatusPolicy::SuccessRange
        } else {
            if expect == 0 || expect > 999 {
                return Err(ProbeError::InvalidExpectedStatus(expect));
            }
            StatusPolicy::Exact(expect)
        };

        let method = parse_method(method)?;
        let proxy = proxy.map(parse_proxy_endpoint).transpose()?;

        Ok(ProbeConfig {
            target,
            method,
            policy,
            proxy,
            onion_proxy: DEFAULT_ONION_PROXY,
        })
    }
}

/// Parse the positional target URL. Empty input and anything the URL parser
/// rejects (missing scheme, relative reference) is a configuration error.
pub fn parse_target_url(input: &str) -> ProbeResult<Url> {
    if input.trim().is_empty() {
        return Err(ProbeError::InvalidTargetUrl("empty URL".to_string()));
    }

    Url::parse(input).map_err(|e| ProbeError::InvalidTargetUrl(format!("{}: {}", input, e)))
}

/// Upper-case and validate the HTTP method string.
pub fn parse_method(input: &str) -> ProbeResult<Method> {
    if input.is_empty() {
        return Err(ProbeError::InvalidMethod("empty method".to_string()));
    }

    Method::from_bytes(input.to_uppercase().as_bytes())
        .map_err(|_| ProbeError::InvalidMethod(input.to_string()))
}

/// Parse an `IP:PORT` proxy endpoint: exactly two colon-separated parts,
/// a dotted-quad IPv4 host, and a port in [1, 65535].
pub fn parse_proxy_endpoint(input: &str) -> ProbeResult<SocketAddrV4> {
    let parts: Vec<&str> = input.split(':').collect();
    if parts.len() != 2 {
        return Err(ProbeError::InvalidProxySpec(input.to_string()));
    }

    let address = Ipv4Addr::from_str(parts[0])
        .map_err(|_| ProbeError::InvalidProxyAddress(parts[0].to_string()))?;

    let port: u32 = parts[1]
        .parse()
        .map_err(|_| ProbeError::InvalidProxyPort(parts[1].to_string()))?;
    if port == 0 || port > 65535 {
        return Err(ProbeError::InvalidProxyPort(parts[1].to_string()));
    }

    Ok(SocketAddrV4::new(address, port as u16))
}
