use thiserror::Error;

#[derive(Error, Debug)]
pub enum CopyeditError {
    /// Invalid combination of inputs (e.g. --replace with stdin).
    #[error("{0}")]
    Usage(String),

    #[error("Configuration not initialized. Run: copyedit_ai self init")]
    NotInitialized,

    #[error("Template '{0}' already exists. Use --force to overwrite.")]
    AlreadyExists(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    Template(#[from] serde_yaml::Error),

    #[error("Model service error: {0}")]
    Model(String),
}

pub type Result<T> = std::result::Result<T, CopyeditError>;
