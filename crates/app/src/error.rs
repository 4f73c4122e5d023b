use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Engine(#[from] engine::EngineError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("terminal error: {0}")]
    Terminal(String),
}

impl AppError {
    /// Process exit status: 2 for rejected input, 1 for everything else.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Engine(err) if err.is_validation() => 2,
            _ => 1,
        }
    }
}
