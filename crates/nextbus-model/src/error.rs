use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("invalid stop number '{0}': expected a positive integer")]
    InvalidStopId(String),

    #[error("invalid stop target '{0}': expected '<id>' or '<label>=<id>'")]
    InvalidTarget(String),
}
