use geoloc_core::error::StreamError;

/// A failed bulk write. The transaction has been rolled back.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Write hook failed: {0}")]
    Hook(String),
}

/// A failed import run. Nothing from the run was committed.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Cannot open source {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Source(#[from] StreamError),

    #[error(transparent)]
    Load(#[from] LoadError),
}
