//! Error types for the fetch pipeline

use thiserror::Error;

#[derive(Error, Debug)]
#[error("No active network connection")]
pub struct ConnectivityError;

/// Transport failures. Wrapped `reqwest::Error`s have their URL stripped so the
/// API key never reaches logs or terminal output.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("HTTP request failed")]
    Request(#[source] reqwest::Error),

    #[error("Request to {url} failed with status {status}")]
    Status { status: u16, url: String },

    #[error("Failed to read response body")]
    Body(#[source] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Malformed catalog JSON")]
    Json(#[from] serde_json::Error),

    #[error("Catalog document has no '{0}' array")]
    MissingResults(&'static str),
}

/// Everything that can go wrong between "start fetch" and "records ready".
#[derive(Error, Debug)]
pub enum FetchError {
    #[error(transparent)]
    Connectivity(#[from] ConnectivityError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

#[derive(Error, Debug)]
pub enum PosterError {
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("Failed to decode poster image")]
    Image(#[from] image::ImageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_source_is_not_repeated_in_chain() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let json_text = json_err.to_string();
        let err = anyhow::Error::from(FetchError::from(ParseError::from(json_err)));

        let chain = format!("{:#}", err);
        assert_eq!(chain.matches(&json_text).count(), 1);
        assert!(chain.starts_with("Malformed catalog JSON: "));
    }
}
