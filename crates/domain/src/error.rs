/// Shared error type used across all map explorer crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP: {0}")]
    Http(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("provider {provider}: {message}")]
    Provider { provider: String, message: String },

    /// The map surface refused to create or fit an overlay.
    #[error("map: {0}")]
    Map(String),

    #[error("config: {0}")]
    Config(String),

    #[error("auth: {0}")]
    Auth(String),

    /// The model stream ended without a single accepted structured call.
    /// `transcript` holds whatever narrative text the model produced instead.
    #[error("Could not generate any results. Try again, or try a different prompt.")]
    NoResults { transcript: String },

    /// A newer query reset the overlay while this one was still streaming.
    #[error("query superseded by a newer query (epoch {epoch})")]
    Superseded { epoch: u64 },
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_results_message_is_user_facing() {
        let err = Error::NoResults {
            transcript: "I could not find anything.".into(),
        };
        assert_eq!(
            err.to_string(),
            "Could not generate any results. Try again, or try a different prompt."
        );
    }

    #[test]
    fn provider_error_names_provider() {
        let err = Error::Provider {
            provider: "google".into(),
            message: "HTTP 403 - forbidden".into(),
        };
        assert_eq!(err.to_string(), "provider google: HTTP 403 - forbidden");
    }
}
