use crate::schema::SchemaValidationError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    #[error("IO error when reading `{}`: {source}", .path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Front-matter error in `{}`: {message}", .path.display())]
    FrontMatter { path: PathBuf, message: String },

    #[error("`{}`: {source}", .path.display())]
    Schema {
        path: PathBuf,
        #[source]
        source: SchemaValidationError,
    },

    #[error("Duplicate project id {id} at indices {indices:?}")]
    DuplicateId { id: String, indices: Vec<usize> },

    #[error("{}: {source}", .path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::IoError {
            path: path.into(),
            source,
        }
    }

    /// Attach the file an error came from. IO errors already carry it.
    pub(crate) fn in_file(path: impl Into<PathBuf>, err: Error) -> Self {
        match err {
            Error::IoError { .. } | Error::InFile { .. } => err,
            other => Error::InFile {
                path: path.into(),
                source: Box::new(other),
            },
        }
    }

    /// The error without any file wrapper
    pub fn cause(&self) -> &Error {
        match self {
            Error::InFile { source, .. } => source.cause(),
            other => other,
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::ConfigParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
