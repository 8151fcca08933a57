use std::convert::From;
use std::error;
use std::fmt;
use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: Option<String>,
}

#[derive(Debug)]
pub enum ErrorKind {
    InvalidArgument,
    InvalidRecord,
    ConfigParse,
    DataParse,
    IOError(io::Error),
}

impl Error {
    pub fn new(kind: ErrorKind, msg: &str) -> Self {
        Error {
            kind,
            message: Some(msg.to_owned()),
        }
    }

    pub fn with_msg(mut self, message: &str) -> Self {
        self.message = Some(message.to_owned());
        self
    }

    pub fn invalid_argument(msg: &str) -> Self {
        Error::new(ErrorKind::InvalidArgument, msg)
    }

    pub fn invalid_record(msg: &str) -> Self {
        Error::new(ErrorKind::InvalidRecord, msg)
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidArgument)
    }

    pub fn is_invalid_record(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidRecord)
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            kind,
            message: None,
        }
    }
}

impl From<io::ErrorKind> for Error {
    fn from(kind: io::ErrorKind) -> Error {
        Error::from(io::Error::from(kind))
    }
}

impl From<io::Error> for Error {
    fn from(io_error: io::Error) -> Error {
        Error::from(ErrorKind::IOError(io_error))
    }
}

impl From<chrono::ParseError> for Error {
    fn from(parse_error: chrono::ParseError) -> Error {
        Error::new(
            ErrorKind::InvalidArgument,
            &format!("Could not parse date: {}", parse_error),
        )
    }
}

impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Error::new(ErrorKind::DataParse, &error.to_string())
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        if let ErrorKind::IOError(err) = err.kind {
            err
        } else {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                err.message.unwrap_or_else(|| "invalid input".to_owned()),
            )
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{}: {}", self.kind.as_str(), msg),
            None => write!(f, "{}", self.kind.as_str()),
        }
    }
}

impl error::Error for Error {}

impl ErrorKind {
    pub fn as_str(&self) -> String {
        match self {
            ErrorKind::InvalidArgument => "invalid argument".to_owned(),
            ErrorKind::InvalidRecord => "invalid record".to_owned(),
            ErrorKind::ConfigParse => "invalid configuration".to_owned(),
            ErrorKind::DataParse => "invalid data file".to_owned(),
            ErrorKind::IOError(err) => err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_and_without_message() {
        let bare = Error::from(ErrorKind::InvalidArgument);
        assert_eq!(bare.to_string(), "invalid argument");

        let err = Error::invalid_record("participants must not be empty");
        assert_eq!(
            err.to_string(),
            "invalid record: participants must not be empty"
        );
    }

    #[test]
    fn io_roundtrip_keeps_original_error() {
        let err = Error::from(io::ErrorKind::NotFound);
        let io_err: io::Error = err.into();
        assert_eq!(io_err.kind(), io::ErrorKind::NotFound);

        let io_err: io::Error = Error::invalid_argument("month 13").into();
        assert_eq!(io_err.kind(), io::ErrorKind::InvalidInput);
    }
}
