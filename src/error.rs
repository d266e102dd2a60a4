use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("task '{0}' is not bound to a source")]
    UnboundTask(String),

    #[error("task not on todo list: {0}")]
    TaskNotFound(String),

    #[error("task already on todo list: {0}")]
    DuplicateTask(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("tag source requires at least one scope tag")]
    EmptyScope,

    #[error("unknown source: {0}")]
    UnknownSource(String),

    #[error("config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    ConfigValidation(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
