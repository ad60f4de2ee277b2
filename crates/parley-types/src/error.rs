use thiserror::Error;

/// Errors from the external agent pipeline (LLM-backed execution).
#[derive(Debug, Clone, Error)]
pub enum PipelineError {
    #[error("pipeline request failed: {0}")]
    Request(String),

    #[error("pipeline reported an error: {0}")]
    Reported(String),

    #[error("pipeline returned an empty response")]
    EmptyResponse,
}

/// Errors from content encryption.
///
/// IMPORTANT: These errors never include plaintext, key material, or
/// ciphertext in their Display/Debug output.
#[derive(Debug, Error)]
pub enum CipherError {
    #[error("encryption failed")]
    EncryptionFailed,

    #[error("decryption failed")]
    DecryptionFailed,

    #[error("invalid ciphertext: too short")]
    CiphertextTooShort,

    #[error("invalid room key: {0}")]
    InvalidKey(String),
}

/// Errors from repository operations (used by port definitions in parley-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,
}

/// Errors from loading the agent/task catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },
}

/// User-visible outcomes of a command that did not produce an agent reply.
///
/// The Display text of each variant is exactly what is sent back to the room.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Rate limit exceeded. Please try again later.")]
    RateLimitExceeded,

    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    #[error("Unknown task: {0}")]
    UnknownTask(String),

    #[error("Error: Room not registered")]
    RoomNotRegistered,

    #[error("Error: {0}")]
    Registry(#[from] RepositoryError),

    #[error("Error: {0}")]
    Pipeline(#[from] PipelineError),
}
