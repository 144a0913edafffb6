use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown Darwin Core term: {name}")]
    UnknownTerm { name: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
