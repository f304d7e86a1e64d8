//! Shared decoder implementation for N-Triples and N-Quads.

use crate::error::{ParseError, SyntaxError};
use crate::stream::TokenSource;
use crate::token::{Token, TokenKind};
use oxrdf::vocab::rdf;
use oxrdf::{BlankNode, GraphName, Literal, NamedNode, Quad, Subject, Term};

/// Reads one statement per line from a [`TokenSource`] running in [`ScanMode::Line`](crate::ScanMode::Line).
pub struct LineDecoder<S> {
    source: S,
    peeked: Option<Token>,
    with_graph_name: bool,
    unchecked: bool,
    is_poisoned: bool,
}

impl<S: TokenSource> LineDecoder<S> {
    pub fn new(source: S, with_graph_name: bool, unchecked: bool) -> Self {
        Self {
            source,
            peeked: None,
            with_graph_name,
            unchecked,
            is_poisoned: false,
        }
    }

    pub fn decode_quad(&mut self) -> Result<Option<Quad>, ParseError> {
        if self.is_poisoned {
            return Ok(None);
        }
        self.read_quad().inspect_err(|e| {
            tracing::debug!(error = %e, "statement decoder poisoned");
            self.is_poisoned = true;
        })
    }

    fn read_quad(&mut self) -> Result<Option<Quad>, ParseError> {
        let first = loop {
            let token = self.next_token()?;
            if token.kind != TokenKind::EndOfLine {
                break token;
            }
        };
        if first.kind == TokenKind::EndOfStream {
            self.peeked = Some(first);
            return Ok(None);
        }
        let subject = self.subject(first)?;
        let predicate = self.predicate()?;
        let object = self.object()?;
        let mut token = self.next_token()?;
        let kind = token.kind;
        let graph_name = match kind {
            TokenKind::IriAbsolute | TokenKind::IriRelative if self.with_graph_name => {
                let graph_name = GraphName::from(self.named_node(token)?);
                token = self.next_token()?;
                graph_name
            }
            TokenKind::BlankNode if self.with_graph_name => {
                let graph_name = GraphName::from(BlankNode::new_unchecked(token.text));
                token = self.next_token()?;
                graph_name
            }
            _ => GraphName::DefaultGraph,
        };
        if token.kind != TokenKind::Dot {
            return Err(unexpected(token, "'.'").into());
        }
        let token = self.next_token()?;
        match token.kind {
            TokenKind::EndOfLine => (),
            TokenKind::EndOfStream => self.peeked = Some(token),
            _ => return Err(unexpected(token, "the end of the line after '.'").into()),
        }
        Ok(Some(Quad::new(subject, predicate, object, graph_name)))
    }

    fn subject(&self, token: Token) -> Result<Subject, SyntaxError> {
        match token.kind {
            TokenKind::IriAbsolute | TokenKind::IriRelative => Ok(self.named_node(token)?.into()),
            TokenKind::BlankNode => Ok(BlankNode::new_unchecked(token.text).into()),
            _ => Err(unexpected(token, "an IRI or a blank node")),
        }
    }

    fn predicate(&mut self) -> Result<NamedNode, ParseError> {
        let token = self.next_token()?;
        match token.kind {
            TokenKind::IriAbsolute | TokenKind::IriRelative => Ok(self.named_node(token)?),
            _ => Err(unexpected(token, "an IRI").into()),
        }
    }

    fn object(&mut self) -> Result<Term, ParseError> {
        let token = self.next_token()?;
        match token.kind {
            TokenKind::IriAbsolute | TokenKind::IriRelative => Ok(self.named_node(token)?.into()),
            TokenKind::BlankNode => Ok(BlankNode::new_unchecked(token.text).into()),
            TokenKind::Literal => Ok(self.literal(token)?.into()),
            TokenKind::LongLiteral => Err(SyntaxError::new(
                token.position,
                "triple-quoted literals are not allowed in N-Triples and N-Quads",
            )
            .into()),
            _ => Err(unexpected(token, "an IRI, a blank node or a literal").into()),
        }
    }

    fn literal(&mut self, value: Token) -> Result<Literal, ParseError> {
        let next = self.peek_token()?.kind;
        match next {
            TokenKind::LangMarker => {
                self.next_token()?;
                let tag = self.next_token()?;
                if tag.kind != TokenKind::LangTag {
                    return Err(unexpected(tag, "a language tag").into());
                }
                if self.unchecked {
                    return Ok(Literal::new_language_tagged_literal_unchecked(
                        value.text,
                        tag.text.to_ascii_lowercase(),
                    ));
                }
                Literal::new_language_tagged_literal(value.text, &tag.text).map_err(|e| {
                    SyntaxError::new(
                        tag.position,
                        format!("invalid language tag '{}': {e}", tag.text),
                    )
                    .into()
                })
            }
            TokenKind::DatatypeMarker => {
                self.next_token()?;
                let datatype = self.next_token()?;
                if !matches!(
                    datatype.kind,
                    TokenKind::IriAbsolute | TokenKind::IriRelative
                ) {
                    return Err(unexpected(datatype, "a datatype IRI").into());
                }
                let position = datatype.position;
                let datatype = self.named_node(datatype)?;
                if datatype == rdf::LANG_STRING {
                    return Err(SyntaxError::new(
                        position,
                        "the datatype rdf:langString is only allowed on language-tagged literals",
                    )
                    .into());
                }
                Ok(Literal::new_typed_literal(value.text, datatype))
            }
            _ => Ok(Literal::new_simple_literal(value.text)),
        }
    }

    fn named_node(&self, token: Token) -> Result<NamedNode, SyntaxError> {
        if token.kind == TokenKind::IriRelative {
            return Err(SyntaxError::new(
                token.position,
                format!("relative IRIs are not allowed: <{}>", token.text),
            ));
        }
        if self.unchecked {
            return Ok(NamedNode::new_unchecked(token.text));
        }
        NamedNode::new(token.text.as_str()).map_err(|e| {
            SyntaxError::new(token.position, format!("invalid IRI <{}>: {e}", token.text))
        })
    }

    fn next_token(&mut self) -> Result<Token, ParseError> {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.source.next_token()?,
        };
        if token.kind == TokenKind::Error {
            return Err(SyntaxError::new(token.position, token.text).into());
        }
        Ok(token)
    }

    fn peek_token(&mut self) -> Result<&Token, ParseError> {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.source.next_token()?,
        };
        if token.kind == TokenKind::Error {
            return Err(SyntaxError::new(token.position, token.text).into());
        }
        Ok(self.peeked.insert(token))
    }
}

fn unexpected(token: Token, expected: &str) -> SyntaxError {
    let message = match token.kind {
        TokenKind::Error => return SyntaxError::new(token.position, token.text),
        TokenKind::EndOfStream => format!("unexpected end of file, expected {expected}"),
        TokenKind::EndOfLine => format!("unexpected end of line, expected {expected}"),
        _ => format!("unexpected {token}, expected {expected}"),
    };
    SyntaxError::new(token.position, message)
}
