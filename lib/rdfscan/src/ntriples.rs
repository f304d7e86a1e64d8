//! A [N-Triples](https://www.w3.org/TR/n-triples/) streaming decoder implemented by [`NTriplesParser`].

use crate::decoder::StatementDecoder;
use crate::error::ParseError;
use crate::lexer::{Lexer, ScanMode};
use crate::line_formats::LineDecoder;
use crate::stream::{TokenSource, TokenStream};
use oxrdf::Triple;
use std::io::{self, BufReader, Read};

/// A [N-Triples](https://www.w3.org/TR/n-triples/) streaming parser.
///
/// Count the number of people:
/// ```
/// use rdfscan::NTriplesParser;
/// use oxrdf::{NamedNode, Term};
///
/// let file = b"<http://example.com/foo> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://schema.org/Person> .
/// <http://example.com/foo> <http://schema.org/name> \"Foo\" .
/// <http://example.com/bar> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://schema.org/Person> .
/// <http://example.com/bar> <http://schema.org/name> \"Bar\" .";
///
/// let schema_person = Term::from(NamedNode::new("http://schema.org/Person")?);
/// let mut count = 0;
/// for triple in NTriplesParser::new().for_slice(file) {
///     let triple = triple?;
///     if triple.predicate == "http://www.w3.org/1999/02/22-rdf-syntax-ns#type" && triple.object == schema_person {
///         count += 1;
///     }
/// }
/// assert_eq!(2, count);
/// # Result::<_,Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Default, Clone)]
#[must_use]
pub struct NTriplesParser {
    unchecked: bool,
}

impl NTriplesParser {
    /// Builds a new [`NTriplesParser`].
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

    /// Parses a N-Triples file from a byte slice.
    pub fn for_slice(self, slice: &[u8]) -> NTriplesDecoder<Lexer<&[u8]>> {
        self.for_source(Lexer::new(slice, ScanMode::Line))
    }

    /// Parses a N-Triples file from a [`Read`] implementation.
    ///
    /// Only the line being decoded is kept in memory.
    pub fn for_reader<R: Read>(self, reader: R) -> NTriplesDecoder<Lexer<BufReader<R>>> {
        self.for_source(Lexer::new(BufReader::new(reader), ScanMode::Line))
    }

    /// Parses a N-Triples file from a [`Read`] implementation, scanning it in a background thread.
    ///
    /// ```
    /// use rdfscan::{NTriplesParser, StatementDecoder};
    ///
    /// let file = b"<http://example.com/s> <http://example.com/p> \"o\" .\n";
    /// let triples = NTriplesParser::new().for_reader_spawned(file.as_slice())?.decode_all()?;
    /// assert_eq!(triples.len(), 1);
    /// # Result::<_,Box<dyn std::error::Error>>::Ok(())
    /// ```
    pub fn for_reader_spawned<R: Read + Send + 'static>(
        self,
        reader: R,
    ) -> io::Result<NTriplesDecoder<TokenStream>> {
        let stream = Lexer::new(BufReader::new(reader), ScanMode::Line).spawn()?;
        Ok(self.for_source(stream))
    }

    /// Parses the tokens of an existing [`TokenSource`]. It must scan in [`ScanMode::Line`].
    pub fn for_source<S: TokenSource>(self, source: S) -> NTriplesDecoder<S> {
        NTriplesDecoder {
            inner: LineDecoder::new(source, false, self.unchecked),
        }
    }
}

/// Decodes the triples of a N-Triples file. Can be built using the [`NTriplesParser`] `for_*` methods.
#[must_use]
pub struct NTriplesDecoder<S> {
    inner: LineDecoder<S>,
}

impl<S: TokenSource> StatementDecoder for NTriplesDecoder<S> {
    type Statement = Triple;

    fn decode(&mut self) -> Result<Option<Triple>, ParseError> {
        Ok(self.inner.decode_quad()?.map(Into::into))
    }
}

impl<S: TokenSource> Iterator for NTriplesDecoder<S> {
    type Item = Result<Triple, ParseError>;

    fn next(&mut self) -> Option<Result<Triple, ParseError>> {
        self.decode().transpose()
    }
}
