//
// Errors
//
use std::io;
use std::result;
use std::error;
use std::fmt;
use glob;

/// Type alias for nounfreq errors
pub type Result<X> = result::Result<X, Error>;

/// Wrapper for many kinds of errors occuring while counting a corpus
#[derive(Debug)]
pub enum Error {
    IOError(io::Error),
    PatternError(glob::PatternError),
    GlobError(glob::GlobError),
    AnalyzerUnavailable(String, io::Error),
    MalformedOutput(String),
    MalformedFeature(String),
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::IOError(ref err) => write!(f, "IO error: {}", err),
            Error::PatternError(ref err) => write!(f, "Bad file pattern: {}", err),
            Error::GlobError(ref err) => write!(f, "Error listing input files: {}", err),
            Error::AnalyzerUnavailable(ref cmd, ref err) => write!(f,
                "Could not run the morphological analyzer `{}`. Is it installed and on the PATH? \
                The OS error was: {}",
                cmd, err),
            Error::MalformedOutput(ref line) => write!(f, "Analyzer produced an unreadable line: {:?}", line),
            Error::MalformedFeature(ref feature) => write!(f,
                "Analyzer classification needs at least a category and a sub-category, got {:?}",
                feature),
            Error::Other(ref info) => write!(f, "{}", info),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::IOError(ref err) => Some(err),
            Error::PatternError(ref err) => Some(err),
            Error::GlobError(ref err) => Some(err),
            Error::AnalyzerUnavailable(_, ref err) => Some(err),
            Error::MalformedOutput(_) => None,
            Error::MalformedFeature(_) => None,
            Error::Other(_) => None,
        }
    }
}
//
// Convert everything else into Error
//
impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::IOError(err)
    }
}
impl From<glob::PatternError> for Error {
    fn from(err: glob::PatternError) -> Self {
        Error::PatternError(err)
    }
}
impl From<glob::GlobError> for Error {
    fn from(err: glob::GlobError) -> Self {
        Error::GlobError(err)
    }
}

//
// Convert Error into a general io Error
//
impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::IOError(err) => err,
            other => io::Error::new(io::ErrorKind::Other, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn io_errors_round_trip() {
        let err: Error = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(err.source().is_some());
        let back: io::Error = err.into();
        assert_eq!(back.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn malformed_feature_names_the_input() {
        let err = Error::MalformedFeature("名詞".to_string());
        assert!(err.to_string().contains("名詞"));
        let back: io::Error = err.into();
        assert_eq!(back.kind(), io::ErrorKind::Other);
    }
}
