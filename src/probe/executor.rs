use std::net::SocketAddrV4;

use log::debug;
use reqwest::redirect;

use crate::models::error::{ProbeError, ProbeResult};
use crate::utils::config::{ProbeConfig, StatusPolicy, ONION_SUFFIX};

/// Outcome of the single request attempt.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub host: String,
    pub status_line: String,
    pub body_bytes: usize,
    pub matched: bool,
}

impl ProbeReport {
    /// One-line report: `<host>: <status line>, <n> bytes`, prefixed with a
    /// SUCCESS/FAILURE tag in strict mode.
    pub fn render(&self, policy: StatusPolicy) -> String {
        let report = format!("{}: {}, {} bytes", self.host, self.status_line, self.body_bytes);
        match policy {
            StatusPolicy::Exact(_) => {
                let tag = if self.matched { "SUCCESS" } else { "FAILURE" };
                format!("{}, {}", tag, report)
            }
            StatusPolicy::SuccessRange => report,
        }
    }
}

/// Performs exactly one HTTP request and decides success or failure.
///
/// The executor holds no state beyond its configuration; one instance
/// serves one invocation.
pub struct ProbeExecutor {
    config: ProbeConfig,
}

impl ProbeExecutor {
    pub fn new(config: ProbeConfig) -> Self {
        Self { config }
    }

    /// Endpoint the SOCKS5 dial should target, if any. An explicit proxy
    /// always wins; otherwise hosts ending in the onion suffix fall back
    /// to the configured default local proxy.
    pub fn proxy_endpoint(&self) -> Option<SocketAddrV4> {
        if self.config.proxy.is_some() {
            return self.config.proxy;
        }

        let host = self.config.target.host_str().unwrap_or_default();
        if host.ends_with(ONION_SUFFIX) {
            Some(self.config.onion_proxy)
        } else {
            None
        }
    }

    // Redirects stay disabled: the first response is authoritative. No
    // client timeout either; the invoking supervisor owns that.
    fn build_client(&self) -> ProbeResult<reqwest::Client> {
        let mut builder = reqwest::Client::builder().redirect(redirect::Policy::none());

        if let Some(endpoint) = self.proxy_endpoint() {
            debug!("Routing through SOCKS5 proxy {}", endpoint);
            // socks5h so hostname resolution happens on the proxy, which
            // onion services require.
            let proxy = reqwest::Proxy::all(format!("socks5h://{}", endpoint)).map_err(|e| {
                ProbeError::ProxyError {
                    address: endpoint.to_string(),
                    message: e.to_string(),
                }
            })?;
            builder = builder.proxy(proxy);
        }

        builder
            .build()
            .map_err(|e| ProbeError::RequestError(e.to_string()))
    }

    /// Perform the single request attempt and report the outcome. Every
    /// failure is terminal; nothing is retried.
    pub async fn execute(&self) -> ProbeResult<ProbeReport> {
        let client = self.build_client()?;
        let host = self.config.target.host_str().unwrap_or_default().to_string();

        let request = client
            .request(self.config.method.clone(), self.config.target.clone())
            .build()
            .map_err(|e| ProbeError::RequestError(e.to_string()))?;

        debug!("{} {}", self.config.method, self.config.target);
        let response = client
            .execute(request)
            .await
            .map_err(|e| ProbeError::TransportError(e.to_string()))?;

        let status = response.status();
        let status_line = match status.canonical_reason() {
            Some(reason) => format!("{} {}", status.as_u16(), reason),
            None => status.as_u16().to_string(),
        };

        let body = response
            .bytes()
            .await
            .map_err(|e| ProbeError::BodyError(e.to_string()))?;

        Ok(ProbeReport {
            host,
            status_line,
            body_bytes: body.len(),
            matched: self.config.policy.matches(status.as_u16()),
        })
    }
}
