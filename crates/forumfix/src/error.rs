#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Network error on {url}: {message}")]
    Network { url: String, message: String },

    #[error("{method} {url} returned HTTP {status}")]
    Status {
        method: &'static str,
        url: String,
        status: u16,
    },

    #[error("Failed to parse response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("Post {0} not found in its topic")]
    PostNotFound(u64),
}

impl Error {
    pub fn network(url: &str, err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else {
            err.to_string()
        };

        Error::Network {
            url: url.to_string(),
            message,
        }
    }
}
