use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Input the numeric routines refuse to work with: empty sample sets,
    /// zero-sized grids, mismatched coordinate lengths.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("plotting failed: {0}")]
    Plot(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }
}

// chart helpers report backend failures as boxed errors
impl From<Box<dyn std::error::Error>> for Error {
    fn from(e: Box<dyn std::error::Error>) -> Self {
        Error::Plot(e.to_string())
    }
}
