use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GameError
{
    #[error("Digit count must be between {min} and {max}, got {got}")]
    InvalidConfig { got: usize, min: usize, max: usize },
}

#[derive(Error, Debug)]
pub enum StoreError
{
    #[error("Score store I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("Score store is malformed: {source}")]
    Malformed {
        #[from]
        source: serde_json::Error,
    },
}
