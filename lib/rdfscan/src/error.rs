use std::{fmt, io};

/// A position in a text i.e. a `line` number starting from 0, a `column` number starting from 0 (in number of bytes from the start of the line) and a global stream `offset` starting from 0 (in number of bytes).
#[derive(Eq, PartialEq, Debug, Copy, Clone, Default)]
pub struct TextPosition {
    pub line: u64,
    pub column: u64,
    pub offset: u64,
}

impl fmt::Display for TextPosition {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {} column {}", self.line + 1, self.column + 1)
    }
}

/// An error in the syntax of the decoded stream.
///
/// It covers invalid UTF-8 byte sequences, scanner errors and statement grammar errors.
/// It is composed of a message and the position where the faulty construct starts.
#[derive(Debug, Clone, thiserror::Error)]
pub struct SyntaxError {
    location: TextPosition,
    message: String,
}

impl SyntaxError {
    pub(crate) fn new(location: TextPosition, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
        }
    }

    /// The location of the error inside of the stream.
    #[inline]
    pub fn location(&self) -> TextPosition {
        self.location
    }

    /// The error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for SyntaxError {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parser error at {}: {}", self.location, self.message)
    }
}

impl From<SyntaxError> for io::Error {
    #[inline]
    fn from(error: SyntaxError) -> Self {
        Self::new(io::ErrorKind::InvalidData, error)
    }
}

/// A decoding error.
///
/// It is the union of [`SyntaxError`] and [`io::Error`].
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// I/O error while reading the byte source.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// An error in the stream syntax.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

impl From<ParseError> for io::Error {
    #[inline]
    fn from(error: ParseError) -> Self {
        match error {
            ParseError::Syntax(e) => e.into(),
            ParseError::Io(e) => e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_one_based() {
        let error = SyntaxError::new(
            TextPosition {
                line: 0,
                column: 4,
                offset: 4,
            },
            "unterminated literal",
        );
        assert_eq!(
            error.to_string(),
            "Parser error at line 1 column 5: unterminated literal"
        );
    }

    #[test]
    fn converts_to_io_error() {
        let error: io::Error =
            ParseError::from(SyntaxError::new(TextPosition::default(), "bad")).into();
        assert_eq!(error.kind(), io::ErrorKind::InvalidData);
    }
}
