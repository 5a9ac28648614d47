use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NoteError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("transcript is empty")]
    EmptyTranscript,

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid keyword file {}", path.display())]
    Keywords {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, NoteError>;
