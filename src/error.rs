use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Post {0} not found")]
    NotFound(u64),

    #[error("No post id left after {0}")]
    IdsExhausted(u64),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Server error: {0}")]
    Server(String),
}

pub type Result<T> = std::result::Result<T, Error>;
