//! RDFScan is a streaming scanner for the Turtle family of RDF syntaxes
//! ([N-Triples](https://www.w3.org/TR/n-triples/), [N-Quads](https://www.w3.org/TR/n-quads/) and [Turtle](https://www.w3.org/TR/turtle/))
//! with statement decoders for the line based ones.
//!
//! The [`Lexer`] turns a byte stream into [`Token`]s. It can be pulled directly or moved to a
//! background thread with [`Lexer::spawn`]. [`NTriplesParser`] and [`NQuadsParser`] build
//! [`StatementDecoder`]s on top of it.
//!
//! Usage example:
//! ```
//! use rdfscan::NQuadsParser;
//!
//! let file = b"<http://example.com/s> <http://example.com/p> \"o\"@en <http://example.com/g> .\n";
//! for quad in NQuadsParser::new().for_slice(file) {
//!     assert_eq!(quad?.to_string(), "<http://example.com/s> <http://example.com/p> \"o\"@en <http://example.com/g>");
//! }
//! # Result::<_,Box<dyn std::error::Error>>::Ok(())
//! ```

pub mod chars;
mod decoder;
mod error;
mod escape;
mod lexer;
mod line_formats;
pub mod nquads;
pub mod ntriples;
mod rune;
mod stream;
mod token;

pub use crate::decoder::StatementDecoder;
pub use crate::error::{ParseError, SyntaxError, TextPosition};
pub use crate::escape::{unescape_numeric, unescape_reserved};
pub use crate::lexer::{Lexer, ScanMode};
pub use crate::nquads::{NQuadsDecoder, NQuadsParser};
pub use crate::ntriples::{NTriplesDecoder, NTriplesParser};
pub use crate::rune::{Rune, decode_rune};
pub use crate::stream::{TokenSource, TokenStream};
pub use crate::token::{Token, TokenKind};
