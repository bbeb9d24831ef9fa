use thiserror::Error;

#[derive(Error, Debug)]
pub enum WindcraftError {
    #[error("I/O error: {0}")]
    IO(#[from] std::io::Error),

    #[error(transparent)]
    Compile(#[from] wcss::WcssError),

    #[error("Logger error: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error("No candidates were given")]
    NoCandidates,
}

// Create a type alias for convenience
pub type Result<T> = std::result::Result<T, WindcraftError>;
