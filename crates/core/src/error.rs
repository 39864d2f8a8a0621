use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Problem set is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
