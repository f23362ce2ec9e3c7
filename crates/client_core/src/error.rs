use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContactsError {
    #[error("invalid api base url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("unsupported api base url scheme '{scheme}' (expected http or https)")]
    UnsupportedScheme { scheme: String },
}
