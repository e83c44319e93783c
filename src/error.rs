use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, StickError>;

#[derive(thiserror::Error, Debug)]
pub enum StickError {
    #[error("Shape mismatch for {what}: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        what: &'static str,
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    #[error("Protocol has no measurements")]
    EmptyProtocol,

    #[error("Invalid b-value {value} at row {row}")]
    InvalidBValue { row: usize, value: f32 },

    #[error("Non-finite gradient component at row {row}")]
    NonFiniteGradient { row: usize },

    #[error("Failed to parse {source_name}, line {line}: {message}")]
    Parse {
        source_name: String,
        line: usize,
        message: String,
    },

    #[error("CUDA launch failed with error code {code}")]
    CudaLaunch { code: i32 },

    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
