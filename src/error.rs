use thiserror::Error as ThisError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed document structure, unknown or forbidden cast.
    Parse,
    /// Construction failure: constructor, setter, validation.
    Build,
    /// Text or value could not be converted to the requested shape.
    Conversion,
    /// Object graph could not be serialized against the model.
    Write,
    /// Schema configuration error found while freezing the model.
    Model,
    Io,
}

#[derive(Debug, Clone, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
    pub line: Option<usize>,
}

impl Error {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            line: None,
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parse, message)
    }

    /// Parse fault tagged with the 1-based line it was detected on.
    pub fn parse_at(message: impl AsRef<str>, line: usize) -> Self {
        Self {
            kind: ErrorKind::Parse,
            message: format!("{} (:{line})", message.as_ref()),
            line: Some(line),
        }
    }

    pub fn end_of_stream(line: usize) -> Self {
        Self::parse_at("End of stream.", line)
    }

    pub fn build(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Build, message)
    }

    pub fn conversion(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conversion, message)
    }

    pub fn write(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Write, message)
    }

    pub fn model(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Model, message)
    }

    pub fn io(err: &std::io::Error) -> Self {
        Self::new(ErrorKind::Io, format!("i/o failed: {err}"))
    }

    pub fn is_parse(&self) -> bool {
        self.kind == ErrorKind::Parse
    }

    pub fn is_build(&self) -> bool {
        matches!(self.kind, ErrorKind::Build | ErrorKind::Conversion)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::io(&err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    fn test_parse_at_appends_line_suffix() {
        let err = Error::parse_at("Class 'Bogus' not found.", 7);
        assert_eq!(err.kind, ErrorKind::Parse);
        assert_eq!(err.line, Some(7));
        assert_eq!(err.to_string(), "Class 'Bogus' not found. (:7)");
    }

    #[rstest::rstest]
    fn test_conversion_counts_as_build_fault() {
        assert!(Error::conversion("bad int").is_build());
        assert!(Error::build("no setter").is_build());
        assert!(!Error::write("no description").is_build());
    }

    #[rstest::rstest]
    fn test_io_error_converts() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(err.kind, ErrorKind::Io);
        assert!(err.message.contains("gone"));
    }
}
