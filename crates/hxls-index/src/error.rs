use camino::Utf8PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Workspace root does not exist: {path}")]
    RootNotFound { path: Utf8PathBuf },

    #[error("Workspace root is not a directory: {path}")]
    NotADirectory { path: Utf8PathBuf },

    #[error("Failed to read workspace root: {path}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}
