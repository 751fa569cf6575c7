use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use tracing::debug;

use crate::app::error::NetworkError;

/// Blocking HTTP access. Only ever called from a background thread.
pub trait Fetcher: Send + Sync {
    fn fetch_text(&self, url: &str) -> Result<String, NetworkError>;

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, NetworkError>;
}

/// Answers "is there a network path right now?".
pub trait Connectivity: Send + Sync {
    fn is_connected(&self) -> bool;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str) -> Result<Self, NetworkError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(NetworkError::Client)?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn get(&self, url: &str) -> Result<Response, NetworkError> {
        debug!(url = %redact_api_key(url), "GET");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| NetworkError::Request(e.without_url()))?;

        if !response.status().is_success() {
            return Err(NetworkError::Status {
                status: response.status().as_u16(),
                url: redact_api_key(url),
            });
        }

        Ok(response)
    }
}

impl Fetcher for HttpFetcher {
    fn fetch_text(&self, url: &str) -> Result<String, NetworkError> {
        self.get(url)?
            .text()
            .map_err(|e| NetworkError::Body(e.without_url()))
    }

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, NetworkError> {
        let bytes = self
            .get(url)?
            .bytes()
            .map_err(|e| NetworkError::Body(e.without_url()))?;
        Ok(bytes.to_vec())
    }
}

/// Keeps API keys out of logs and error messages.
pub fn redact_api_key(url: &str) -> String {
    match url.find("api_key=") {
        Some(start) => {
            let value_start = start + "api_key=".len();
            let value_end = url[value_start..]
                .find('&')
                .map_or(url.len(), |offset| value_start + offset);
            format!("{}***{}", &url[..value_start], &url[value_end..])
        }
        None => url.to_string(),
    }
}

/// Reachability check: can we open a TCP connection to the API host?
pub struct TcpProbe {
    host: String,
    port: u16,
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }

    /// Probe the host and port the given URL points at.
    pub fn for_url(url: &str, timeout: Duration) -> Option<Self> {
        let parsed = reqwest::Url::parse(url).ok()?;
        let host = parsed.host_str()?.to_string();
        let port = parsed.port_or_known_default()?;
        Some(Self::new(host, port, timeout))
    }

    fn addresses(&self) -> Vec<SocketAddr> {
        match (self.host.as_str(), self.port).to_socket_addrs() {
            Ok(addrs) => addrs.collect(),
            Err(e) => {
                debug!(host = %self.host, error = %e, "could not resolve host");
                Vec::new()
            }
        }
    }
}

impl Connectivity for TcpProbe {
    fn is_connected(&self) -> bool {
        self.addresses()
            .iter()
            .any(|addr| TcpStream::connect_timeout(addr, self.timeout).is_ok())
    }
}
