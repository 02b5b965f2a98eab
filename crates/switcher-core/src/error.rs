use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SwitcherError {
    #[error("No PDF elements found")]
    NoDocuments,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("DOM operation failed: {0}")]
    Dom(String),
}
