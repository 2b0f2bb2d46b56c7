use thiserror::Error;

/// A custom error type for the health probe.
///
/// Every variant is terminal: one invocation performs one attempt, and any
/// failure at any stage (parse, dial, send, read) ends the process with
/// exit code 1. There is no retry path.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Invalid HTTP target URL specified: {0}")]
    InvalidTargetUrl(String),

    #[error("Invalid expected status code specified: {0} (must be 1-999)")]
    InvalidExpectedStatus(u16),

    #[error("Invalid HTTP method specified: {0}")]
    InvalidMethod(String),

    #[error("Invalid proxy server specified: {0} (expected IP:PORT)")]
    InvalidProxySpec(String),

    #[error("Invalid IPv4 address specified for the proxy server: {0}")]
    InvalidProxyAddress(String),

    #[error("Invalid port number specified for the proxy server: {0}")]
    InvalidProxyPort(String),

    #[error("Failed to connect to proxy {address}: {message}")]
    ProxyError { address: String, message: String },

    #[error("Failed to create HTTP request: {0}")]
    RequestError(String),

    #[error("Failed to execute HTTP request: {0}")]
    TransportError(String),

    #[error("Failed to read response body: {0}")]
    BodyError(String),
}

// Define a type alias for our Result type
pub type ProbeResult<T> = Result<T, ProbeError>;
