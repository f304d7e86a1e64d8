use crate::error::ParseError;

/// Something decoding RDF statements one at a time.
///
/// The first error is fatal: once [`StatementDecoder::decode`] returned an error, later calls return `Ok(None)`.
pub trait StatementDecoder {
    type Statement;

    /// Decodes the next statement. `Ok(None)` means the input is exhausted.
    fn decode(&mut self) -> Result<Option<Self::Statement>, ParseError>;

    /// Decodes all the remaining statements, stopping at the first error.
    fn decode_all(&mut self) -> Result<Vec<Self::Statement>, ParseError> {
        let mut statements = Vec::new();
        while let Some(statement) = self.decode()? {
            statements.push(statement);
        }
        Ok(statements)
    }
}
