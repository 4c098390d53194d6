use thiserror::Error;

/// A stored or supplied identity that is not a well-formed UUID.
#[derive(Debug, Error)]
#[error("malformed identity {id:?}: {source}")]
pub struct IdentityError {
    pub id: String,
    #[source]
    pub source: uuid::Error,
}

/// Persistence failure when reading or writing one of the JSON files.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("atomic replace failed: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Reported by a [`crate::host::CommandExecutor`] when a reward command did not run.
#[derive(Debug, Error)]
#[error("command `{command}` failed: {reason}")]
pub struct ExecutorError {
    pub command: String,
    pub reason: String,
}
