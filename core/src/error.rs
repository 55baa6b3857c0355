use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("empty document: {0}")]
    EmptyDocument(String),

    #[error("module validation: {0}")]
    ModuleValidation(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;
