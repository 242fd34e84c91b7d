//! Error types for mesh loading.

/// Errors that can occur while reading or writing OBJ meshes
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Line {line}: {kind} index {index} out of range ({count} defined)")]
    IndexOutOfRange {
        line: usize,
        kind: &'static str,
        index: i64,
        count: usize,
    },
}

pub type Result<T> = std::result::Result<T, BuildError>;
