//! End to end decoding of N-Triples and N-Quads files and Turtle token streams.

use rdfscan::{
    Lexer, NQuadsParser, NTriplesParser, ParseError, ScanMode, StatementDecoder, TokenKind,
};
use oxrdf::{GraphName, Literal, NamedNode, Quad, Term, Triple};
use std::fmt::Write as _;
use std::io::{Seek, SeekFrom, Write};

const NTRIPLES: &str = r#"# A small graph
<http://example.com/alice> <http://xmlns.com/foaf/0.1/name> "Alice"@en .
<http://example.com/alice> <http://xmlns.com/foaf/0.1/age> "42"^^<http://www.w3.org/2001/XMLSchema#integer> .
<http://example.com/alice> <http://xmlns.com/foaf/0.1/knows> _:bob .

_:bob <http://xmlns.com/foaf/0.1/name> "Bob \"the builder\"\u00E9" .
"#;

fn expected_triples() -> Vec<Triple> {
    let alice = NamedNode::new_unchecked("http://example.com/alice");
    let name = NamedNode::new_unchecked("http://xmlns.com/foaf/0.1/name");
    let bob = oxrdf::BlankNode::new_unchecked("bob");
    vec![
        Triple::new(
            alice.clone(),
            name.clone(),
            Literal::new_language_tagged_literal_unchecked("Alice", "en"),
        ),
        Triple::new(
            alice.clone(),
            NamedNode::new_unchecked("http://xmlns.com/foaf/0.1/age"),
            Literal::new_typed_literal(
                "42",
                NamedNode::new_unchecked("http://www.w3.org/2001/XMLSchema#integer"),
            ),
        ),
        Triple::new(
            alice,
            NamedNode::new_unchecked("http://xmlns.com/foaf/0.1/knows"),
            bob.clone(),
        ),
        Triple::new(
            bob,
            name,
            Literal::new_simple_literal("Bob \"the builder\"\u{E9}"),
        ),
    ]
}

#[test]
fn ntriples_from_slice() {
    let triples = NTriplesParser::new()
        .for_slice(NTRIPLES.as_bytes())
        .decode_all()
        .unwrap();
    assert_eq!(triples, expected_triples());
}

#[test]
fn ntriples_from_file() {
    let mut file = tempfile::tempfile().unwrap();
    file.write_all(NTRIPLES.as_bytes()).unwrap();
    file.seek(SeekFrom::Start(0)).unwrap();
    let triples = NTriplesParser::new()
        .for_reader(file)
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(triples, expected_triples());
}

#[test]
fn ntriples_from_spawned_scanner() {
    let mut file = tempfile::tempfile().unwrap();
    file.write_all(NTRIPLES.as_bytes()).unwrap();
    file.seek(SeekFrom::Start(0)).unwrap();
    let triples = NTriplesParser::new()
        .for_reader_spawned(file)
        .unwrap()
        .decode_all()
        .unwrap();
    assert_eq!(triples, expected_triples());
}

#[test]
fn empty_file_is_exhausted_immediately() {
    let mut decoder = NTriplesParser::new().for_slice(b"");
    assert!(decoder.decode().unwrap().is_none());
    let mut decoder = NQuadsParser::new().for_reader_spawned(&b""[..]).unwrap();
    assert!(decoder.decode().unwrap().is_none());
}

#[test]
fn carriage_return_line_ends() {
    let triples = NTriplesParser::new()
        .for_slice(
            b"<http://e/s> <http://e/p> <http://e/o> .\r<http://e/s> <http://e/p> \"o\" .\r\r\n# done\r",
        )
        .decode_all()
        .unwrap();
    assert_eq!(
        triples,
        [
            Triple::new(
                NamedNode::new_unchecked("http://e/s"),
                NamedNode::new_unchecked("http://e/p"),
                NamedNode::new_unchecked("http://e/o"),
            ),
            Triple::new(
                NamedNode::new_unchecked("http://e/s"),
                NamedNode::new_unchecked("http://e/p"),
                Literal::new_simple_literal("o"),
            ),
        ]
    );
    let error = NQuadsParser::new()
        .for_slice(b"<http://e/s> <http://e/p> <http://e/o> .\r<http://e/s> <http://e/p> .\r")
        .decode_all()
        .unwrap_err();
    let ParseError::Syntax(error) = error else {
        panic!("a syntax error is expected");
    };
    assert_eq!(error.location().line, 1);
}

#[test]
fn unterminated_literal_halts_the_decoder() {
    let mut decoder = NTriplesParser::new().for_slice(
        b"<http://e/s> <http://e/p> \"hi@en .\n<http://e/s> <http://e/p> <http://e/o> .\n",
    );
    let Err(ParseError::Syntax(error)) = decoder.decode() else {
        panic!("a syntax error is expected");
    };
    assert!(error.message().contains("unterminated literal"));
    assert_eq!(error.location().line, 0);
    assert!(decoder.decode().unwrap().is_none());
    assert!(decoder.next().is_none());
}

#[test]
fn many_quads_through_the_rendezvous() {
    let mut data = String::new();
    for i in 0..1000 {
        writeln!(
            data,
            "<http://e/s{i}> <http://e/p> \"{i}\" <http://e/g{}> .",
            i % 3
        )
        .unwrap();
    }
    let quads = NQuadsParser::new()
        .for_reader_spawned(std::io::Cursor::new(data.into_bytes()))
        .unwrap()
        .decode_all()
        .unwrap();
    assert_eq!(quads.len(), 1000);
    assert_eq!(
        quads[999],
        Quad::new(
            NamedNode::new_unchecked("http://e/s999"),
            NamedNode::new_unchecked("http://e/p"),
            Literal::new_simple_literal("999"),
            GraphName::NamedNode(NamedNode::new_unchecked("http://e/g0"))
        )
    );
}

#[test]
fn dropping_a_spawned_decoder_early() {
    let data = "<http://e/s> <http://e/p> <http://e/o> .\n".repeat(100);
    let mut decoder = NQuadsParser::new()
        .for_reader_spawned(std::io::Cursor::new(data.into_bytes()))
        .unwrap();
    let first = decoder.next().unwrap().unwrap();
    assert_eq!(
        first.object,
        Term::NamedNode(NamedNode::new_unchecked("http://e/o"))
    );
    drop(decoder);
}

#[test]
fn turtle_document_tokens() {
    let turtle = r#"@prefix foaf: <http://xmlns.com/foaf/0.1/> .
BASE <http://example.com/>

<alice> a foaf:Person ;
    foaf:age 42, 4.2, 4.2e1, true ;
    foaf:knows [ foaf:name """Bob
the builder"""@en-GB ] ;
    foaf:nick ( "al" 'ally' ) .
"#;
    let kinds = Lexer::new(turtle.as_bytes(), ScanMode::Block)
        .map(|token| token.map(|token| token.kind))
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(
        kinds,
        [
            TokenKind::PrefixDirective,
            TokenKind::PrefixLabel,
            TokenKind::IriAbsolute,
            TokenKind::Dot,
            TokenKind::SparqlBase,
            TokenKind::IriAbsolute,
            TokenKind::IriRelative,
            TokenKind::RdfType,
            TokenKind::PrefixLabel,
            TokenKind::IriSuffix,
            TokenKind::Semicolon,
            TokenKind::PrefixLabel,
            TokenKind::IriSuffix,
            TokenKind::Integer,
            TokenKind::Comma,
            TokenKind::Decimal,
            TokenKind::Comma,
            TokenKind::Double,
            TokenKind::Comma,
            TokenKind::Boolean,
            TokenKind::Semicolon,
            TokenKind::PrefixLabel,
            TokenKind::IriSuffix,
            TokenKind::PropertyListStart,
            TokenKind::PrefixLabel,
            TokenKind::IriSuffix,
            TokenKind::LongLiteral,
            TokenKind::LangMarker,
            TokenKind::LangTag,
            TokenKind::PropertyListEnd,
            TokenKind::Semicolon,
            TokenKind::PrefixLabel,
            TokenKind::IriSuffix,
            TokenKind::CollectionStart,
            TokenKind::Literal,
            TokenKind::Literal,
            TokenKind::CollectionEnd,
            TokenKind::Dot,
            TokenKind::EndOfStream,
        ]
    );
}
