use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ChatError {
    #[error("{0}")]
    Validation(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("A response is already being generated")]
    Busy,

    #[error("Unknown session: {0}")]
    SessionNotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("JS interop error: {0}")]
    JsInterop(String),

    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for ChatError {
    fn from(e: serde_json::Error) -> Self {
        ChatError::Serialization(e.to_string())
    }
}
