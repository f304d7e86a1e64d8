//! A [N-Quads](https://www.w3.org/TR/n-quads/) streaming decoder implemented by [`NQuadsParser`].

use crate::decoder::StatementDecoder;
use crate::error::ParseError;
use crate::lexer::{Lexer, ScanMode};
use crate::line_formats::LineDecoder;
use crate::stream::{TokenSource, TokenStream};
use oxrdf::Quad;
use std::io::{self, BufReader, Read};

/// A [N-Quads](https://www.w3.org/TR/n-quads/) streaming parser.
///
/// Count the number of people:
/// ```
/// use rdfscan::NQuadsParser;
///
/// let file = b"<http://example.com/foo> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://schema.org/Person> <http://example.com/g> .
/// <http://example.com/foo> <http://schema.org/name> \"Foo\" <http://example.com/g> .
/// <http://example.com/bar> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://schema.org/Person> .
/// <http://example.com/bar> <http://schema.org/name> \"Bar\" .";
///
/// let mut count = 0;
/// for quad in NQuadsParser::new().for_slice(file) {
///     let quad = quad?;
///     if quad.predicate == "http://www.w3.org/1999/02/22-rdf-syntax-ns#type" {
///         count += 1;
///     }
/// }
/// assert_eq!(2, count);
/// # Result::<_,Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Default, Clone)]
#[must_use]
pub struct NQuadsParser {
    unchecked: bool,
}

impl NQuadsParser {
    /// Builds a new [`NQuadsParser`].
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assumes the file is valid to make parsing faster.
    ///
    /// IRIs and language tags are not validated anymore.
    /// Note that if the file is actually not valid, then broken RDF might be emitted by the parser.
    #[inline]
    pub fn unchecked(mut self) -> Self {
        self.unchecked = true;
        self
    }

    /// Parses a N-Quads file from a byte slice.
    pub fn for_slice(self, slice: &[u8]) -> NQuadsDecoder<Lexer<&[u8]>> {
        self.for_source(Lexer::new(slice, ScanMode::Line))
    }

    /// Parses a N-Quads file from a [`Read`] implementation.
    pub fn for_reader<R: Read>(self, reader: R) -> NQuadsDecoder<Lexer<BufReader<R>>> {
        self.for_source(Lexer::new(BufReader::new(reader), ScanMode::Line))
    }

    /// Parses a N-Quads file from a [`Read`] implementation, scanning it in a background thread.
    pub fn for_reader_spawned<R: Read + Send + 'static>(
        self,
        reader: R,
    ) -> io::Result<NQuadsDecoder<TokenStream>> {
        let stream = Lexer::new(BufReader::new(reader), ScanMode::Line).spawn()?;
        Ok(self.for_source(stream))
    }

    /// Parses the tokens of an existing [`TokenSource`]. It must scan in [`ScanMode::Line`].
    pub fn for_source<S: TokenSource>(self, source: S) -> NQuadsDecoder<S> {
        NQuadsDecoder {
            inner: LineDecoder::new(source, true, self.unchecked),
        }
    }
}

/// Decodes the quads of a N-Quads file. Can be built using the [`NQuadsParser`] `for_*` methods.
#[must_use]
pub struct NQuadsDecoder<S> {
    inner: LineDecoder<S>,
}

impl<S: TokenSource> StatementDecoder for NQuadsDecoder<S> {
    type Statement = Quad;

    #[inline]
    fn decode(&mut self) -> Result<Option<Quad>, ParseError> {
        self.inner.decode_quad()
    }
}

impl<S: TokenSource> Iterator for NQuadsDecoder<S> {
    type Item = Result<Quad, ParseError>;

    fn next(&mut self) -> Option<Result<Quad, ParseError>> {
        self.decode().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::{BlankNode, GraphName, NamedNode};

    #[test]
    fn default_and_named_graphs() {
        let quads = NQuadsParser::new()
            .for_slice(b"<http://e/s> <http://e/p> <http://e/o> .\n<http://e/s> <http://e/p> <http://e/o> _:g .\n")
            .decode_all()
            .unwrap();
        assert_eq!(quads.len(), 2);
        assert_eq!(quads[0].graph_name, GraphName::DefaultGraph);
        assert_eq!(
            quads[1].graph_name,
            GraphName::BlankNode(BlankNode::new_unchecked("g"))
        );
    }

    #[test]
    fn unchecked_keeps_invalid_iris() {
        let quads = NQuadsParser::new()
            .unchecked()
            .for_slice(b"<http://[e/s> <http://e/p> <http://e/o> <http://e/g> .")
            .decode_all()
            .unwrap();
        assert_eq!(quads[0].subject.to_string(), "<http://[e/s>");
        assert_eq!(
            quads[0].graph_name,
            GraphName::NamedNode(NamedNode::new_unchecked("http://e/g"))
        );
    }
}
