use std::fmt;
use std::io;

#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    NullInput(&'static str),
    SizeMismatch(String),
    UnsupportedFormat(String),
    Allocation(String),
    MalformedLut(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "IO error: {}", e),
            Error::NullInput(what) => write!(f, "Missing input: {}", what),
            Error::SizeMismatch(msg) => write!(f, "Size mismatch: {}", msg),
            Error::UnsupportedFormat(msg) => write!(f, "Unsupported format: {}", msg),
            Error::Allocation(msg) => write!(f, "Allocation failure: {}", msg),
            Error::MalformedLut(msg) => write!(f, "Malformed LUT: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
